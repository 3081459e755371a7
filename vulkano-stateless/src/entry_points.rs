// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The `pre_call_validate_*` wrappers of the device-level entry points.
//!
//! Each wrapper runs the matching `validate_*` method, hands every violation to the sink of the
//! validator, and returns `true` if the call should be skipped.

use crate::StatelessValidator;
use ash::vk;
use std::ffi::c_void;

macro_rules! pre_call_validate {
    ($(
        $api:literal => $pre_call:ident => $validate:ident($($arg:ident: $ty:ty),* $(,)?);
    )+) => {
        impl StatelessValidator {
            $(
                #[doc = concat!(
                    "Reports the violations found by [`Self::",
                    stringify!($validate),
                    "`] for `",
                    $api,
                    "`, and returns whether the call should be skipped.",
                )]
                ///
                /// # Safety
                ///
                #[doc = concat!("Same as [`Self::", stringify!($validate), "`].")]
                #[inline]
                pub unsafe fn $pre_call(&self, $($arg: $ty),*) -> bool {
                    self.report($api, self.$validate($($arg),*))
                }
            )+
        }
    };
}

pre_call_validate! {
    // Resources
    "vkCreateBuffer" => pre_call_validate_create_buffer => validate_create_buffer(
        create_info: &vk::BufferCreateInfo<'_>,
    );
    "vkCreateBufferView" => pre_call_validate_create_buffer_view => validate_create_buffer_view(
        create_info: &vk::BufferViewCreateInfo<'_>,
    );
    "vkCreateImage" => pre_call_validate_create_image => validate_create_image(
        create_info: &vk::ImageCreateInfo<'_>,
    );
    "vkCreateImageView" => pre_call_validate_create_image_view => validate_create_image_view(
        create_info: &vk::ImageViewCreateInfo<'_>,
    );
    "vkCreateSampler" => pre_call_validate_create_sampler => validate_create_sampler(
        create_info: &vk::SamplerCreateInfo<'_>,
    );
    "vkAllocateMemory" => pre_call_validate_allocate_memory => validate_allocate_memory(
        allocate_info: &vk::MemoryAllocateInfo<'_>,
    );
    "vkMapMemory" => pre_call_validate_map_memory => validate_map_memory(
        memory: vk::DeviceMemory,
        offset: vk::DeviceSize,
        size: vk::DeviceSize,
        flags: vk::MemoryMapFlags,
    );
    "vkFlushMappedMemoryRanges" => pre_call_validate_flush_mapped_memory_ranges
        => validate_flush_mapped_memory_ranges(
        memory_range_count: u32,
        p_memory_ranges: *const vk::MappedMemoryRange<'_>,
    );
    "vkCreateQueryPool" => pre_call_validate_create_query_pool => validate_create_query_pool(
        create_info: &vk::QueryPoolCreateInfo<'_>,
    );
    "vkGetQueryPoolResults" => pre_call_validate_get_query_pool_results
        => validate_get_query_pool_results(
        query_pool: vk::QueryPool,
        first_query: u32,
        query_count: u32,
        data_size: usize,
        p_data: *const c_void,
        stride: vk::DeviceSize,
        flags: vk::QueryResultFlags,
    );

    // Descriptors
    "vkCreateDescriptorSetLayout" => pre_call_validate_create_descriptor_set_layout
        => validate_create_descriptor_set_layout(
        create_info: &vk::DescriptorSetLayoutCreateInfo<'_>,
    );
    "vkCreateDescriptorPool" => pre_call_validate_create_descriptor_pool
        => validate_create_descriptor_pool(
        create_info: &vk::DescriptorPoolCreateInfo<'_>,
    );
    "vkAllocateDescriptorSets" => pre_call_validate_allocate_descriptor_sets
        => validate_allocate_descriptor_sets(
        allocate_info: &vk::DescriptorSetAllocateInfo<'_>,
    );
    "vkUpdateDescriptorSets" => pre_call_validate_update_descriptor_sets
        => validate_update_descriptor_sets(
        descriptor_write_count: u32,
        p_descriptor_writes: *const vk::WriteDescriptorSet<'_>,
        descriptor_copy_count: u32,
        p_descriptor_copies: *const vk::CopyDescriptorSet<'_>,
    );

    // Pipelines
    "vkCreatePipelineLayout" => pre_call_validate_create_pipeline_layout
        => validate_create_pipeline_layout(
        create_info: &vk::PipelineLayoutCreateInfo<'_>,
    );
    "vkCreateGraphicsPipelines" => pre_call_validate_create_graphics_pipelines
        => validate_create_graphics_pipelines(
        pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::GraphicsPipelineCreateInfo<'_>,
    );
    "vkCreateComputePipelines" => pre_call_validate_create_compute_pipelines
        => validate_create_compute_pipelines(
        pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::ComputePipelineCreateInfo<'_>,
    );
    "vkCreateRayTracingPipelinesKHR" => pre_call_validate_create_ray_tracing_pipelines_khr
        => validate_create_ray_tracing_pipelines_khr(
        deferred_operation: vk::DeferredOperationKHR,
        pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::RayTracingPipelineCreateInfoKHR<'_>,
    );

    // Render passes
    "vkCreateRenderPass" => pre_call_validate_create_render_pass => validate_create_render_pass(
        create_info: &vk::RenderPassCreateInfo<'_>,
    );
    "vkCreateRenderPass2" => pre_call_validate_create_render_pass2
        => validate_create_render_pass2(
        create_info: &vk::RenderPassCreateInfo2<'_>,
    );
    "vkCmdBeginRendering" => pre_call_validate_cmd_begin_rendering
        => validate_cmd_begin_rendering(
        command_buffer: vk::CommandBuffer,
        rendering_info: &vk::RenderingInfo<'_>,
    );

    // Command buffers
    "vkCreateCommandPool" => pre_call_validate_create_command_pool
        => validate_create_command_pool(
        create_info: &vk::CommandPoolCreateInfo<'_>,
    );
    "vkAllocateCommandBuffers" => pre_call_validate_allocate_command_buffers
        => validate_allocate_command_buffers(
        allocate_info: &vk::CommandBufferAllocateInfo<'_>,
    );
    "vkBeginCommandBuffer" => pre_call_validate_begin_command_buffer
        => validate_begin_command_buffer(
        command_buffer: vk::CommandBuffer,
        begin_info: &vk::CommandBufferBeginInfo<'_>,
    );
    "vkCmdDrawIndirect" => pre_call_validate_cmd_draw_indirect => validate_cmd_draw_indirect(
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        draw_count: u32,
        stride: u32,
    );
    "vkCmdDrawIndexedIndirect" => pre_call_validate_cmd_draw_indexed_indirect
        => validate_cmd_draw_indexed_indirect(
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        draw_count: u32,
        stride: u32,
    );
    "vkCmdDrawIndirectCount" => pre_call_validate_cmd_draw_indirect_count
        => validate_cmd_draw_indirect_count(
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        count_buffer: vk::Buffer,
        count_buffer_offset: vk::DeviceSize,
        max_draw_count: u32,
        stride: u32,
    );
    "vkCmdDispatch" => pre_call_validate_cmd_dispatch => validate_cmd_dispatch(
        command_buffer: vk::CommandBuffer,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    );
    "vkCmdDispatchBase" => pre_call_validate_cmd_dispatch_base => validate_cmd_dispatch_base(
        command_buffer: vk::CommandBuffer,
        base_group_x: u32,
        base_group_y: u32,
        base_group_z: u32,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    );
    "vkCmdDispatchIndirect" => pre_call_validate_cmd_dispatch_indirect
        => validate_cmd_dispatch_indirect(
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
    );
    "vkCmdDrawMeshTasksEXT" => pre_call_validate_cmd_draw_mesh_tasks_ext
        => validate_cmd_draw_mesh_tasks_ext(
        command_buffer: vk::CommandBuffer,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    );
    "vkCmdTraceRaysKHR" => pre_call_validate_cmd_trace_rays_khr => validate_cmd_trace_rays_khr(
        command_buffer: vk::CommandBuffer,
        raygen_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        miss_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        hit_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        callable_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        width: u32,
        height: u32,
        depth: u32,
    );
    "vkCmdTraceRaysIndirectKHR" => pre_call_validate_cmd_trace_rays_indirect_khr
        => validate_cmd_trace_rays_indirect_khr(
        command_buffer: vk::CommandBuffer,
        raygen_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        miss_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        hit_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        callable_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        indirect_device_address: vk::DeviceAddress,
    );
    "vkCmdCopyBuffer" => pre_call_validate_cmd_copy_buffer => validate_cmd_copy_buffer(
        command_buffer: vk::CommandBuffer,
        src_buffer: vk::Buffer,
        dst_buffer: vk::Buffer,
        region_count: u32,
        p_regions: *const vk::BufferCopy,
    );
    "vkCmdUpdateBuffer" => pre_call_validate_cmd_update_buffer => validate_cmd_update_buffer(
        command_buffer: vk::CommandBuffer,
        dst_buffer: vk::Buffer,
        dst_offset: vk::DeviceSize,
        data_size: vk::DeviceSize,
        p_data: *const c_void,
    );
    "vkCmdFillBuffer" => pre_call_validate_cmd_fill_buffer => validate_cmd_fill_buffer(
        command_buffer: vk::CommandBuffer,
        dst_buffer: vk::Buffer,
        dst_offset: vk::DeviceSize,
        size: vk::DeviceSize,
        data: u32,
    );
    "vkCmdClearAttachments" => pre_call_validate_cmd_clear_attachments
        => validate_cmd_clear_attachments(
        command_buffer: vk::CommandBuffer,
        attachment_count: u32,
        p_attachments: *const vk::ClearAttachment,
        rect_count: u32,
        p_rects: *const vk::ClearRect,
    );
    "vkCmdPushConstants" => pre_call_validate_cmd_push_constants => validate_cmd_push_constants(
        command_buffer: vk::CommandBuffer,
        layout: vk::PipelineLayout,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        size: u32,
        p_values: *const c_void,
    );
    "vkCmdPushDescriptorSetKHR" => pre_call_validate_cmd_push_descriptor_set_khr
        => validate_cmd_push_descriptor_set_khr(
        command_buffer: vk::CommandBuffer,
        pipeline_bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        set: u32,
        descriptor_write_count: u32,
        p_descriptor_writes: *const vk::WriteDescriptorSet<'_>,
    );
    "vkCmdBindVertexBuffers" => pre_call_validate_cmd_bind_vertex_buffers
        => validate_cmd_bind_vertex_buffers(
        command_buffer: vk::CommandBuffer,
        first_binding: u32,
        binding_count: u32,
        p_buffers: *const vk::Buffer,
        p_offsets: *const vk::DeviceSize,
    );
    "vkCmdBindIndexBuffer" => pre_call_validate_cmd_bind_index_buffer
        => validate_cmd_bind_index_buffer(
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    );
    "vkCmdBindDescriptorSets" => pre_call_validate_cmd_bind_descriptor_sets
        => validate_cmd_bind_descriptor_sets(
        command_buffer: vk::CommandBuffer,
        pipeline_bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
        dynamic_offset_count: u32,
        p_dynamic_offsets: *const u32,
    );

    // Dynamic state
    "vkCmdSetViewport" => pre_call_validate_cmd_set_viewport => validate_cmd_set_viewport(
        command_buffer: vk::CommandBuffer,
        first_viewport: u32,
        viewport_count: u32,
        p_viewports: *const vk::Viewport,
    );
    "vkCmdSetViewportWithCount" => pre_call_validate_cmd_set_viewport_with_count
        => validate_cmd_set_viewport_with_count(
        command_buffer: vk::CommandBuffer,
        viewport_count: u32,
        p_viewports: *const vk::Viewport,
    );
    "vkCmdSetScissor" => pre_call_validate_cmd_set_scissor => validate_cmd_set_scissor(
        command_buffer: vk::CommandBuffer,
        first_scissor: u32,
        scissor_count: u32,
        p_scissors: *const vk::Rect2D,
    );
    "vkCmdSetScissorWithCount" => pre_call_validate_cmd_set_scissor_with_count
        => validate_cmd_set_scissor_with_count(
        command_buffer: vk::CommandBuffer,
        scissor_count: u32,
        p_scissors: *const vk::Rect2D,
    );
    "vkCmdSetLineWidth" => pre_call_validate_cmd_set_line_width => validate_cmd_set_line_width(
        command_buffer: vk::CommandBuffer,
        line_width: f32,
    );
    "vkCmdSetDepthBounds" => pre_call_validate_cmd_set_depth_bounds
        => validate_cmd_set_depth_bounds(
        command_buffer: vk::CommandBuffer,
        min_depth_bounds: f32,
        max_depth_bounds: f32,
    );
    "vkCmdSetDepthBias" => pre_call_validate_cmd_set_depth_bias => validate_cmd_set_depth_bias(
        command_buffer: vk::CommandBuffer,
        depth_bias_constant_factor: f32,
        depth_bias_clamp: f32,
        depth_bias_slope_factor: f32,
    );

    // Synchronization
    "vkCreateSemaphore" => pre_call_validate_create_semaphore => validate_create_semaphore(
        create_info: &vk::SemaphoreCreateInfo<'_>,
    );
    "vkCreateFence" => pre_call_validate_create_fence => validate_create_fence(
        create_info: &vk::FenceCreateInfo<'_>,
    );
    "vkCreateEvent" => pre_call_validate_create_event => validate_create_event(
        create_info: &vk::EventCreateInfo<'_>,
    );
    "vkGetSemaphoreFdKHR" => pre_call_validate_get_semaphore_fd_khr
        => validate_get_semaphore_fd_khr(
        get_fd_info: &vk::SemaphoreGetFdInfoKHR<'_>,
    );
    "vkImportSemaphoreFdKHR" => pre_call_validate_import_semaphore_fd_khr
        => validate_import_semaphore_fd_khr(
        import_info: &vk::ImportSemaphoreFdInfoKHR<'_>,
    );
    "vkImportSemaphoreWin32HandleKHR" => pre_call_validate_import_semaphore_win32_handle_khr
        => validate_import_semaphore_win32_handle_khr(
        import_info: &vk::ImportSemaphoreWin32HandleInfoKHR<'_>,
    );
    "vkGetFenceFdKHR" => pre_call_validate_get_fence_fd_khr => validate_get_fence_fd_khr(
        get_fd_info: &vk::FenceGetFdInfoKHR<'_>,
    );
    "vkImportFenceFdKHR" => pre_call_validate_import_fence_fd_khr
        => validate_import_fence_fd_khr(
        import_info: &vk::ImportFenceFdInfoKHR<'_>,
    );
    "vkImportFenceWin32HandleKHR" => pre_call_validate_import_fence_win32_handle_khr
        => validate_import_fence_win32_handle_khr(
        import_info: &vk::ImportFenceWin32HandleInfoKHR<'_>,
    );
    "vkCmdPipelineBarrier" => pre_call_validate_cmd_pipeline_barrier
        => validate_cmd_pipeline_barrier(
        command_buffer: vk::CommandBuffer,
        src_stage_mask: vk::PipelineStageFlags,
        dst_stage_mask: vk::PipelineStageFlags,
        dependency_flags: vk::DependencyFlags,
        memory_barrier_count: u32,
        p_memory_barriers: *const vk::MemoryBarrier<'_>,
        buffer_memory_barrier_count: u32,
        p_buffer_memory_barriers: *const vk::BufferMemoryBarrier<'_>,
        image_memory_barrier_count: u32,
        p_image_memory_barriers: *const vk::ImageMemoryBarrier<'_>,
    );
    "vkCmdPipelineBarrier2" => pre_call_validate_cmd_pipeline_barrier2
        => validate_cmd_pipeline_barrier2(
        command_buffer: vk::CommandBuffer,
        dependency_info: &vk::DependencyInfo<'_>,
    );

    // Acceleration structures
    "vkCreateAccelerationStructureKHR" => pre_call_validate_create_acceleration_structure_khr
        => validate_create_acceleration_structure_khr(
        create_info: &vk::AccelerationStructureCreateInfoKHR<'_>,
    );
    "vkCmdBuildAccelerationStructuresKHR"
        => pre_call_validate_cmd_build_acceleration_structures_khr
        => validate_cmd_build_acceleration_structures_khr(
        command_buffer: vk::CommandBuffer,
        info_count: u32,
        p_infos: *const vk::AccelerationStructureBuildGeometryInfoKHR<'_>,
        pp_build_range_infos: *const *const vk::AccelerationStructureBuildRangeInfoKHR,
    );
    "vkBuildAccelerationStructuresKHR" => pre_call_validate_build_acceleration_structures_khr
        => validate_build_acceleration_structures_khr(
        deferred_operation: vk::DeferredOperationKHR,
        info_count: u32,
        p_infos: *const vk::AccelerationStructureBuildGeometryInfoKHR<'_>,
        pp_build_range_infos: *const *const vk::AccelerationStructureBuildRangeInfoKHR,
    );
    "vkGetAccelerationStructureBuildSizesKHR"
        => pre_call_validate_get_acceleration_structure_build_sizes_khr
        => validate_get_acceleration_structure_build_sizes_khr(
        build_type: vk::AccelerationStructureBuildTypeKHR,
        build_info: &vk::AccelerationStructureBuildGeometryInfoKHR<'_>,
        p_max_primitive_counts: *const u32,
        size_info: &vk::AccelerationStructureBuildSizesInfoKHR<'_>,
    );
    "vkCmdCopyAccelerationStructureKHR" => pre_call_validate_cmd_copy_acceleration_structure_khr
        => validate_cmd_copy_acceleration_structure_khr(
        command_buffer: vk::CommandBuffer,
        info: &vk::CopyAccelerationStructureInfoKHR<'_>,
    );
    "vkCmdCopyAccelerationStructureToMemoryKHR"
        => pre_call_validate_cmd_copy_acceleration_structure_to_memory_khr
        => validate_cmd_copy_acceleration_structure_to_memory_khr(
        command_buffer: vk::CommandBuffer,
        info: &vk::CopyAccelerationStructureToMemoryInfoKHR<'_>,
    );
    "vkCmdCopyMemoryToAccelerationStructureKHR"
        => pre_call_validate_cmd_copy_memory_to_acceleration_structure_khr
        => validate_cmd_copy_memory_to_acceleration_structure_khr(
        command_buffer: vk::CommandBuffer,
        info: &vk::CopyMemoryToAccelerationStructureInfoKHR<'_>,
    );
    "vkCmdWriteAccelerationStructuresPropertiesKHR"
        => pre_call_validate_cmd_write_acceleration_structures_properties_khr
        => validate_cmd_write_acceleration_structures_properties_khr(
        command_buffer: vk::CommandBuffer,
        acceleration_structure_count: u32,
        p_acceleration_structures: *const vk::AccelerationStructureKHR,
        query_type: vk::QueryType,
        query_pool: vk::QueryPool,
        first_query: u32,
    );

    // Swapchains
    "vkCreateSwapchainKHR" => pre_call_validate_create_swapchain_khr
        => validate_create_swapchain_khr(
        create_info: &vk::SwapchainCreateInfoKHR<'_>,
    );
    "vkQueuePresentKHR" => pre_call_validate_queue_present_khr => validate_queue_present_khr(
        queue: vk::Queue,
        present_info: &vk::PresentInfoKHR<'_>,
    );
}

#[cfg(test)]
mod tests {
    use crate::tests::collecting_validator;
    use ash::vk::{self, Handle};

    #[test]
    fn reports_each_violation_once_per_call() {
        let (validator, sink) = collecting_validator();
        let create_info = vk::BufferCreateInfo::default()
            .size(0)
            .usage(vk::BufferUsageFlags::VERTEX_BUFFER);

        assert!(unsafe { validator.pre_call_validate_create_buffer(&create_info) });
        let first = sink.reports.lock().clone();
        assert!(!first.is_empty());
        assert!(first.iter().all(|&(api, _)| api == "vkCreateBuffer"));
        assert!(first
            .iter()
            .any(|&(_, vuid)| vuid == "VUID-VkBufferCreateInfo-size-00912"));

        // Stateless checks give the same answer every time.
        assert!(unsafe { validator.pre_call_validate_create_buffer(&create_info) });
        let reports = sink.reports.lock();
        assert_eq!(reports.len(), first.len() * 2);
        assert_eq!(reports[first.len()..], first[..]);
    }

    #[test]
    fn valid_calls_are_not_skipped() {
        let (validator, sink) = collecting_validator();

        let skip = unsafe {
            validator.pre_call_validate_cmd_dispatch(vk::CommandBuffer::from_raw(0x10), 1, 1, 1)
        };
        assert!(!skip);
        assert!(sink.reports.lock().is_empty());

        let skip = unsafe {
            validator.pre_call_validate_cmd_set_line_width(vk::CommandBuffer::from_raw(0x10), 2.0)
        };
        assert!(!skip);
        assert!(sink.reports.lock().is_empty());
    }
}
