// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Helpers shared by the unit tests of every module.

use crate::{
    chain::ChainStruct,
    extensions::{DeviceExtensions, InstanceExtensions},
    features::DeviceFeatures,
    instance::{PhysicalDeviceInfo, PhysicalDeviceQueries},
    properties::DeviceProperties,
    sink::ViolationSink,
    DeviceCapabilities, StatelessValidator, StatelessValidatorCreateInfo, ValidationError,
    Version,
};
use ash::vk::{self, Handle};
use parking_lot::Mutex;
use std::{ffi::c_void, ptr, sync::Arc};

/// Asserts that a list of violations contains the given VUID.
macro_rules! assert_vuid {
    ($violations:expr, $vuid:expr $(,)?) => {{
        let violations = &$violations;
        assert!(
            violations.contains_vuid($vuid),
            "expected {} in:\n{}",
            $vuid,
            violations,
        );
    }};
}

/// Asserts that a list of violations does not contain the given VUID.
macro_rules! assert_no_vuid {
    ($violations:expr, $vuid:expr $(,)?) => {{
        let violations = &$violations;
        assert!(
            !violations.contains_vuid($vuid),
            "unexpected {} in:\n{}",
            $vuid,
            violations,
        );
    }};
}

/// The capabilities of a typical desktop device with Vulkan 1.3, every feature, and the commonly
/// used extensions enabled. `VK_EXT_depth_range_unrestricted` is left disabled.
pub(crate) fn test_capabilities() -> DeviceCapabilities {
    let mut properties = DeviceProperties {
        max_image_dimension1_d: 16384,
        max_image_dimension2_d: 16384,
        max_image_dimension3_d: 2048,
        max_image_dimension_cube: 16384,
        max_image_array_layers: 2048,
        max_texel_buffer_elements: 1 << 27,
        max_uniform_buffer_range: 65536,
        max_storage_buffer_range: u32::MAX,
        max_push_constants_size: 256,
        max_memory_allocation_count: 4096,
        max_sampler_allocation_count: 4000,
        max_bound_descriptor_sets: 32,
        max_vertex_input_attributes: 32,
        max_vertex_input_bindings: 32,
        max_vertex_input_attribute_offset: 2047,
        max_vertex_input_binding_stride: 2048,
        max_tessellation_patch_size: 32,
        max_compute_work_group_count: [65535; 3],
        max_compute_work_group_size: [1024, 1024, 64],
        max_compute_work_group_invocations: 1024,
        max_draw_indirect_count: u32::MAX,
        max_sampler_lod_bias: 15.0,
        max_sampler_anisotropy: 16.0,
        max_viewports: 16,
        max_viewport_dimensions: [16384, 16384],
        viewport_bounds_range: [-32768.0, 32767.0],
        min_texel_buffer_offset_alignment: 16,
        min_uniform_buffer_offset_alignment: 64,
        min_storage_buffer_offset_alignment: 16,
        max_framebuffer_width: 16384,
        max_framebuffer_height: 16384,
        max_framebuffer_layers: 2048,
        framebuffer_color_sample_counts: vk::SampleCountFlags::TYPE_1
            | vk::SampleCountFlags::TYPE_4
            | vk::SampleCountFlags::TYPE_8,
        framebuffer_depth_sample_counts: vk::SampleCountFlags::TYPE_1
            | vk::SampleCountFlags::TYPE_4,
        framebuffer_stencil_sample_counts: vk::SampleCountFlags::TYPE_1
            | vk::SampleCountFlags::TYPE_4,
        max_color_attachments: 8,
        max_sample_mask_words: 1,
        max_clip_distances: 8,
        max_cull_distances: 8,
        max_fragment_dual_src_attachments: 1,
        line_width_range: [1.0, 64.0],
        non_coherent_atom_size: 64,
        memory_type_count: 4,
        memory_heap_count: 2,
        max_push_descriptors: Some(32),
        max_inline_uniform_block_size: Some(256),
        ..Default::default()
    };

    properties.set_mesh_shader(
        &vk::PhysicalDeviceMeshShaderPropertiesEXT::default()
            .max_task_work_group_total_count(1 << 22)
            .max_task_work_group_count([65535; 3])
            .max_mesh_work_group_total_count(1 << 22)
            .max_mesh_work_group_count([65535; 3]),
    );
    properties.set_ray_tracing_pipeline(
        &vk::PhysicalDeviceRayTracingPipelinePropertiesKHR::default()
            .shader_group_handle_size(32)
            .max_ray_recursion_depth(31)
            .max_shader_group_stride(4096)
            .shader_group_base_alignment(64)
            .shader_group_handle_alignment(32)
            .max_ray_dispatch_invocation_count(1 << 30),
    );
    properties.set_acceleration_structure(
        &vk::PhysicalDeviceAccelerationStructurePropertiesKHR::default()
            .max_geometry_count(1 << 24)
            .max_instance_count(1 << 24)
            .max_primitive_count(1 << 29)
            .min_acceleration_structure_scratch_offset_alignment(128),
    );
    properties.set_blend_operation_advanced(
        &vk::PhysicalDeviceBlendOperationAdvancedPropertiesEXT::default()
            .advanced_blend_max_color_attachments(1)
            .advanced_blend_independent_blend(false)
            .advanced_blend_non_premultiplied_src_color(true)
            .advanced_blend_non_premultiplied_dst_color(true)
            .advanced_blend_correlated_overlap(true)
            .advanced_blend_all_operations(true),
    );

    let enabled_extensions = DeviceExtensions {
        khr_swapchain: true,
        khr_present_id: true,
        khr_push_descriptor: true,
        khr_deferred_host_operations: true,
        khr_acceleration_structure: true,
        khr_ray_tracing_pipeline: true,
        khr_ray_query: true,
        khr_pipeline_library: true,
        khr_external_semaphore_fd: true,
        khr_external_semaphore_win32: true,
        khr_external_fence_fd: true,
        khr_external_fence_win32: true,
        ext_descriptor_buffer: true,
        ext_mutable_descriptor_type: true,
        ext_mesh_shader: true,
        ext_graphics_pipeline_library: true,
        ext_extended_dynamic_state: true,
        ext_blend_operation_advanced: true,
        ext_depth_clip_enable: true,
        ext_custom_border_color: true,
        ext_robustness2: true,
        ..DeviceExtensions::empty()
    };

    DeviceCapabilities {
        api_version: Version::V1_3,
        instance_extensions: InstanceExtensions {
            khr_surface: true,
            khr_get_physical_device_properties2: true,
            ..InstanceExtensions::empty()
        },
        supported_extensions: Some(DeviceExtensions {
            ext_depth_range_unrestricted: true,
            ..enabled_extensions.clone()
        }),
        enabled_extensions,
        features: DeviceFeatures::all(),
        properties,
    }
}

/// A sink that remembers every report.
#[derive(Debug, Default)]
pub(crate) struct CollectingSink {
    pub(crate) reports: Mutex<Vec<(&'static str, &'static str)>>,
}

impl ViolationSink for CollectingSink {
    fn report(&self, api: &'static str, error: &ValidationError) {
        self.reports.lock().push((api, error.vuid()));
    }
}

/// A driver that reports the same device for every handle.
#[derive(Debug)]
pub(crate) struct FakeQueries {
    pub(crate) info: PhysicalDeviceInfo,
    pub(crate) vertex_buffer_formats: Vec<vk::Format>,
}

impl Default for FakeQueries {
    fn default() -> Self {
        let capabilities = test_capabilities();

        FakeQueries {
            info: PhysicalDeviceInfo {
                api_version: Version::V1_3,
                properties: capabilities.properties,
                supported_extensions: capabilities.supported_extensions.unwrap_or_default(),
            },
            vertex_buffer_formats: vec![
                vk::Format::R32_SFLOAT,
                vk::Format::R32G32_SFLOAT,
                vk::Format::R32G32B32_SFLOAT,
                vk::Format::R32G32B32A32_SFLOAT,
                vk::Format::R8G8B8A8_UNORM,
            ],
        }
    }
}

impl PhysicalDeviceQueries for FakeQueries {
    fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Result<PhysicalDeviceInfo, vk::Result> {
        if physical_device.is_null() {
            return Err(vk::Result::ERROR_INITIALIZATION_FAILED);
        }

        Ok(self.info.clone())
    }

    fn format_properties(
        &self,
        _physical_device: vk::PhysicalDevice,
        format: vk::Format,
    ) -> vk::FormatProperties {
        let mut properties = vk::FormatProperties::default();

        if self.vertex_buffer_formats.contains(&format) {
            properties.buffer_features = vk::FormatFeatureFlags::VERTEX_BUFFER;
        }

        properties
    }
}

/// A validator for `test_capabilities`, with format queries answered by `FakeQueries`.
pub(crate) fn test_validator() -> StatelessValidator {
    test_validator_with(test_capabilities())
}

pub(crate) fn test_validator_with(capabilities: DeviceCapabilities) -> StatelessValidator {
    StatelessValidator::new(
        vk::Device::from_raw(0x1000),
        vk::PhysicalDevice::from_raw(0x2000),
        capabilities,
        Some(Arc::new(FakeQueries::default())),
        StatelessValidatorCreateInfo::default(),
    )
}

/// A validator whose reports go to the returned sink.
pub(crate) fn collecting_validator() -> (StatelessValidator, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let validator = StatelessValidator::new(
        vk::Device::from_raw(0x1000),
        vk::PhysicalDevice::from_raw(0x2000),
        test_capabilities(),
        Some(Arc::new(FakeQueries::default())),
        StatelessValidatorCreateInfo {
            sink: sink.clone(),
            ..Default::default()
        },
    );

    (validator, sink)
}

/// Points the `p_next` of `value` at `next` and returns a pointer to `value`, for building
/// chains that the typed `push_next` builders refuse.
pub(crate) fn link<T: ChainStruct>(value: &mut T, next: *const c_void) -> *const c_void {
    // SAFETY: `ChainStruct` types start with a `BaseOutStructure` header.
    unsafe {
        (*ptr::from_mut(value).cast::<vk::BaseOutStructure<'_>>()).p_next =
            next.cast_mut().cast();
    }

    ptr::from_ref(value).cast()
}
