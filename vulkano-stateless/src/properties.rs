// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::predicates::is_true;
use ash::vk;

/// The limits and other properties of a physical device that the rules compare against.
///
/// Properties that come from an extension are `None` if the extension is not supported.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct DeviceProperties {
    // Vulkan 1.0 limits
    pub max_image_dimension1_d: u32,
    pub max_image_dimension2_d: u32,
    pub max_image_dimension3_d: u32,
    pub max_image_dimension_cube: u32,
    pub max_image_array_layers: u32,
    pub max_texel_buffer_elements: u32,
    pub max_uniform_buffer_range: u32,
    pub max_storage_buffer_range: u32,
    pub max_push_constants_size: u32,
    pub max_memory_allocation_count: u32,
    pub max_sampler_allocation_count: u32,
    pub max_bound_descriptor_sets: u32,
    pub max_vertex_input_attributes: u32,
    pub max_vertex_input_bindings: u32,
    pub max_vertex_input_attribute_offset: u32,
    pub max_vertex_input_binding_stride: u32,
    pub max_tessellation_patch_size: u32,
    pub max_compute_work_group_count: [u32; 3],
    pub max_compute_work_group_size: [u32; 3],
    pub max_compute_work_group_invocations: u32,
    pub max_draw_indirect_count: u32,
    pub max_sampler_lod_bias: f32,
    pub max_sampler_anisotropy: f32,
    pub max_viewports: u32,
    pub max_viewport_dimensions: [u32; 2],
    pub viewport_bounds_range: [f32; 2],
    pub min_texel_buffer_offset_alignment: u64,
    pub min_uniform_buffer_offset_alignment: u64,
    pub min_storage_buffer_offset_alignment: u64,
    pub max_framebuffer_width: u32,
    pub max_framebuffer_height: u32,
    pub max_framebuffer_layers: u32,
    pub framebuffer_color_sample_counts: vk::SampleCountFlags,
    pub framebuffer_depth_sample_counts: vk::SampleCountFlags,
    pub framebuffer_stencil_sample_counts: vk::SampleCountFlags,
    pub max_color_attachments: u32,
    pub max_sample_mask_words: u32,
    pub max_clip_distances: u32,
    pub max_cull_distances: u32,
    pub max_fragment_dual_src_attachments: u32,
    pub line_width_range: [f32; 2],
    pub non_coherent_atom_size: u64,

    // Memory properties
    pub memory_type_count: u32,
    pub memory_heap_count: u32,

    // VK_KHR_push_descriptor
    pub max_push_descriptors: Option<u32>,

    // Vulkan 1.3, VK_EXT_inline_uniform_block
    pub max_inline_uniform_block_size: Option<u32>,

    // VK_EXT_mesh_shader
    pub max_task_work_group_total_count: Option<u32>,
    pub max_task_work_group_count: Option<[u32; 3]>,
    pub max_mesh_work_group_total_count: Option<u32>,
    pub max_mesh_work_group_count: Option<[u32; 3]>,

    // VK_KHR_ray_tracing_pipeline
    pub shader_group_handle_size: Option<u32>,
    pub max_ray_recursion_depth: Option<u32>,
    pub max_shader_group_stride: Option<u32>,
    pub shader_group_base_alignment: Option<u32>,
    pub shader_group_handle_alignment: Option<u32>,
    pub max_ray_dispatch_invocation_count: Option<u32>,

    // VK_KHR_acceleration_structure
    pub max_geometry_count: Option<u64>,
    pub max_instance_count: Option<u64>,
    pub max_primitive_count: Option<u64>,
    pub min_acceleration_structure_scratch_offset_alignment: Option<u32>,

    // VK_EXT_blend_operation_advanced
    pub advanced_blend_max_color_attachments: Option<u32>,
    pub advanced_blend_independent_blend: Option<bool>,
    pub advanced_blend_non_premultiplied_src_color: Option<bool>,
    pub advanced_blend_non_premultiplied_dst_color: Option<bool>,
    pub advanced_blend_correlated_overlap: Option<bool>,
    pub advanced_blend_all_operations: Option<bool>,
}

impl DeviceProperties {
    /// Copies the core limits out of the structures that Vulkan 1.0 reports.
    pub fn from_vk(
        properties: &vk::PhysicalDeviceProperties,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
    ) -> Self {
        let limits = &properties.limits;

        DeviceProperties {
            max_image_dimension1_d: limits.max_image_dimension1_d,
            max_image_dimension2_d: limits.max_image_dimension2_d,
            max_image_dimension3_d: limits.max_image_dimension3_d,
            max_image_dimension_cube: limits.max_image_dimension_cube,
            max_image_array_layers: limits.max_image_array_layers,
            max_texel_buffer_elements: limits.max_texel_buffer_elements,
            max_uniform_buffer_range: limits.max_uniform_buffer_range,
            max_storage_buffer_range: limits.max_storage_buffer_range,
            max_push_constants_size: limits.max_push_constants_size,
            max_memory_allocation_count: limits.max_memory_allocation_count,
            max_sampler_allocation_count: limits.max_sampler_allocation_count,
            max_bound_descriptor_sets: limits.max_bound_descriptor_sets,
            max_vertex_input_attributes: limits.max_vertex_input_attributes,
            max_vertex_input_bindings: limits.max_vertex_input_bindings,
            max_vertex_input_attribute_offset: limits.max_vertex_input_attribute_offset,
            max_vertex_input_binding_stride: limits.max_vertex_input_binding_stride,
            max_tessellation_patch_size: limits.max_tessellation_patch_size,
            max_compute_work_group_count: limits.max_compute_work_group_count,
            max_compute_work_group_size: limits.max_compute_work_group_size,
            max_compute_work_group_invocations: limits.max_compute_work_group_invocations,
            max_draw_indirect_count: limits.max_draw_indirect_count,
            max_sampler_lod_bias: limits.max_sampler_lod_bias,
            max_sampler_anisotropy: limits.max_sampler_anisotropy,
            max_viewports: limits.max_viewports,
            max_viewport_dimensions: limits.max_viewport_dimensions,
            viewport_bounds_range: limits.viewport_bounds_range,
            min_texel_buffer_offset_alignment: limits.min_texel_buffer_offset_alignment,
            min_uniform_buffer_offset_alignment: limits.min_uniform_buffer_offset_alignment,
            min_storage_buffer_offset_alignment: limits.min_storage_buffer_offset_alignment,
            max_framebuffer_width: limits.max_framebuffer_width,
            max_framebuffer_height: limits.max_framebuffer_height,
            max_framebuffer_layers: limits.max_framebuffer_layers,
            framebuffer_color_sample_counts: limits.framebuffer_color_sample_counts,
            framebuffer_depth_sample_counts: limits.framebuffer_depth_sample_counts,
            framebuffer_stencil_sample_counts: limits.framebuffer_stencil_sample_counts,
            max_color_attachments: limits.max_color_attachments,
            max_sample_mask_words: limits.max_sample_mask_words,
            max_clip_distances: limits.max_clip_distances,
            max_cull_distances: limits.max_cull_distances,
            max_fragment_dual_src_attachments: limits.max_fragment_dual_src_attachments,
            line_width_range: limits.line_width_range,
            non_coherent_atom_size: limits.non_coherent_atom_size,

            memory_type_count: memory_properties.memory_type_count,
            memory_heap_count: memory_properties.memory_heap_count,

            ..Default::default()
        }
    }

    pub(crate) fn set_push_descriptor(
        &mut self,
        push_descriptor: &vk::PhysicalDevicePushDescriptorPropertiesKHR<'_>,
    ) {
        self.max_push_descriptors = Some(push_descriptor.max_push_descriptors);
    }

    pub(crate) fn set_inline_uniform_block(
        &mut self,
        inline_uniform_block: &vk::PhysicalDeviceInlineUniformBlockProperties<'_>,
    ) {
        self.max_inline_uniform_block_size =
            Some(inline_uniform_block.max_inline_uniform_block_size);
    }

    pub(crate) fn set_mesh_shader(&mut self, mesh: &vk::PhysicalDeviceMeshShaderPropertiesEXT<'_>) {
        self.max_task_work_group_total_count = Some(mesh.max_task_work_group_total_count);
        self.max_task_work_group_count = Some(mesh.max_task_work_group_count);
        self.max_mesh_work_group_total_count = Some(mesh.max_mesh_work_group_total_count);
        self.max_mesh_work_group_count = Some(mesh.max_mesh_work_group_count);
    }

    pub(crate) fn set_ray_tracing_pipeline(
        &mut self,
        ray_tracing: &vk::PhysicalDeviceRayTracingPipelinePropertiesKHR<'_>,
    ) {
        self.shader_group_handle_size = Some(ray_tracing.shader_group_handle_size);
        self.max_ray_recursion_depth = Some(ray_tracing.max_ray_recursion_depth);
        self.max_shader_group_stride = Some(ray_tracing.max_shader_group_stride);
        self.shader_group_base_alignment = Some(ray_tracing.shader_group_base_alignment);
        self.shader_group_handle_alignment = Some(ray_tracing.shader_group_handle_alignment);
        self.max_ray_dispatch_invocation_count =
            Some(ray_tracing.max_ray_dispatch_invocation_count);
    }

    pub(crate) fn set_acceleration_structure(
        &mut self,
        acceleration_structure: &vk::PhysicalDeviceAccelerationStructurePropertiesKHR<'_>,
    ) {
        self.max_geometry_count = Some(acceleration_structure.max_geometry_count);
        self.max_instance_count = Some(acceleration_structure.max_instance_count);
        self.max_primitive_count = Some(acceleration_structure.max_primitive_count);
        self.min_acceleration_structure_scratch_offset_alignment =
            Some(acceleration_structure.min_acceleration_structure_scratch_offset_alignment);
    }

    pub(crate) fn set_blend_operation_advanced(
        &mut self,
        blend: &vk::PhysicalDeviceBlendOperationAdvancedPropertiesEXT<'_>,
    ) {
        self.advanced_blend_max_color_attachments =
            Some(blend.advanced_blend_max_color_attachments);
        self.advanced_blend_independent_blend = Some(is_true(blend.advanced_blend_independent_blend));
        self.advanced_blend_non_premultiplied_src_color =
            Some(is_true(blend.advanced_blend_non_premultiplied_src_color));
        self.advanced_blend_non_premultiplied_dst_color =
            Some(is_true(blend.advanced_blend_non_premultiplied_dst_color));
        self.advanced_blend_correlated_overlap =
            Some(is_true(blend.advanced_blend_correlated_overlap));
        self.advanced_blend_all_operations = Some(is_true(blend.advanced_blend_all_operations));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_limits_are_copied() {
        let mut properties = vk::PhysicalDeviceProperties::default();
        properties.limits.max_viewports = 16;
        properties.limits.viewport_bounds_range = [-8192.0, 8191.0];
        let mut memory_properties = vk::PhysicalDeviceMemoryProperties::default();
        memory_properties.memory_type_count = 3;

        let properties = DeviceProperties::from_vk(&properties, &memory_properties);
        assert_eq!(properties.max_viewports, 16);
        assert_eq!(properties.viewport_bounds_range, [-8192.0, 8191.0]);
        assert_eq!(properties.memory_type_count, 3);
        assert_eq!(properties.max_push_descriptors, None);
    }

    #[test]
    fn extension_properties_are_optional() {
        let mut properties = DeviceProperties::default();
        let mesh = vk::PhysicalDeviceMeshShaderPropertiesEXT::default()
            .max_mesh_work_group_total_count(1 << 22)
            .max_mesh_work_group_count([65535; 3]);
        properties.set_mesh_shader(&mesh);

        assert_eq!(properties.max_mesh_work_group_total_count, Some(1 << 22));
        assert_eq!(properties.max_shader_group_stride, None);
    }
}
