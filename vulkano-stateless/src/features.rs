// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::chain::find_in_chain;
use ash::vk;

macro_rules! features {
    {
        $({ $member:ident => $($ffi_struct:ident.$ffi_field:ident)|+ },)*
    } => {
        /// The features that were enabled on a logical device.
        ///
        /// A feature counts as enabled if any of the structures that can enable it does so.
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub struct DeviceFeatures {
            $(pub $member: bool,)*
        }

        impl DeviceFeatures {
            /// Builds a `DeviceFeatures` object with all values to false.
            pub const fn empty() -> DeviceFeatures {
                DeviceFeatures {
                    $($member: false,)*
                }
            }

            /// Builds a `DeviceFeatures` object with all values to true.
            ///
            /// > **Note**: This function is used for testing purposes.
            pub const fn all() -> DeviceFeatures {
                DeviceFeatures {
                    $($member: true,)*
                }
            }

            /// Returns the value of the feature with the given name, or `None` if there is no
            /// feature with that name.
            pub fn get(&self, name: &str) -> Option<bool> {
                match name {
                    $(stringify!($member) => Some(self.$member),)*
                    _ => None,
                }
            }

            fn from_ffi(ffi: &FeaturesFfi<'_>) -> DeviceFeatures {
                DeviceFeatures {
                    $($member: $(ffi.$ffi_struct.is_some_and(|s| s.$ffi_field != vk::FALSE))||+,)*
                }
            }
        }
    };
}

/// The structures of a `vk::DeviceCreateInfo` that can enable features.
#[derive(Default)]
struct FeaturesFfi<'a> {
    vulkan_1_0: Option<&'a vk::PhysicalDeviceFeatures>,
    vulkan_1_1: Option<&'a vk::PhysicalDeviceVulkan11Features<'a>>,
    vulkan_1_2: Option<&'a vk::PhysicalDeviceVulkan12Features<'a>>,
    vulkan_1_3: Option<&'a vk::PhysicalDeviceVulkan13Features<'a>>,
    multiview: Option<&'a vk::PhysicalDeviceMultiviewFeatures<'a>>,
    sampler_ycbcr_conversion: Option<&'a vk::PhysicalDeviceSamplerYcbcrConversionFeatures<'a>>,
    buffer_device_address: Option<&'a vk::PhysicalDeviceBufferDeviceAddressFeatures<'a>>,
    timeline_semaphore: Option<&'a vk::PhysicalDeviceTimelineSemaphoreFeatures<'a>>,
    descriptor_indexing: Option<&'a vk::PhysicalDeviceDescriptorIndexingFeatures<'a>>,
    synchronization2: Option<&'a vk::PhysicalDeviceSynchronization2Features<'a>>,
    dynamic_rendering: Option<&'a vk::PhysicalDeviceDynamicRenderingFeatures<'a>>,
    inline_uniform_block: Option<&'a vk::PhysicalDeviceInlineUniformBlockFeatures<'a>>,
    ext_mesh_shader: Option<&'a vk::PhysicalDeviceMeshShaderFeaturesEXT<'a>>,
    khr_acceleration_structure: Option<&'a vk::PhysicalDeviceAccelerationStructureFeaturesKHR<'a>>,
    khr_ray_tracing_pipeline: Option<&'a vk::PhysicalDeviceRayTracingPipelineFeaturesKHR<'a>>,
    khr_ray_query: Option<&'a vk::PhysicalDeviceRayQueryFeaturesKHR<'a>>,
    ext_descriptor_buffer: Option<&'a vk::PhysicalDeviceDescriptorBufferFeaturesEXT<'a>>,
    ext_mutable_descriptor_type:
        Option<&'a vk::PhysicalDeviceMutableDescriptorTypeFeaturesEXT<'a>>,
    ext_graphics_pipeline_library:
        Option<&'a vk::PhysicalDeviceGraphicsPipelineLibraryFeaturesEXT<'a>>,
    ext_extended_dynamic_state: Option<&'a vk::PhysicalDeviceExtendedDynamicStateFeaturesEXT<'a>>,
    ext_blend_operation_advanced:
        Option<&'a vk::PhysicalDeviceBlendOperationAdvancedFeaturesEXT<'a>>,
    ext_depth_clip_enable: Option<&'a vk::PhysicalDeviceDepthClipEnableFeaturesEXT<'a>>,
    ext_custom_border_color: Option<&'a vk::PhysicalDeviceCustomBorderColorFeaturesEXT<'a>>,
    ext_robustness2: Option<&'a vk::PhysicalDeviceRobustness2FeaturesEXT<'a>>,
    khr_present_id: Option<&'a vk::PhysicalDevicePresentIdFeaturesKHR<'a>>,
}

features! {
    // Vulkan 1.0
    {robust_buffer_access => vulkan_1_0.robust_buffer_access},
    {full_draw_index_uint32 => vulkan_1_0.full_draw_index_uint32},
    {image_cube_array => vulkan_1_0.image_cube_array},
    {independent_blend => vulkan_1_0.independent_blend},
    {geometry_shader => vulkan_1_0.geometry_shader},
    {tessellation_shader => vulkan_1_0.tessellation_shader},
    {sample_rate_shading => vulkan_1_0.sample_rate_shading},
    {dual_src_blend => vulkan_1_0.dual_src_blend},
    {logic_op => vulkan_1_0.logic_op},
    {multi_draw_indirect => vulkan_1_0.multi_draw_indirect},
    {draw_indirect_first_instance => vulkan_1_0.draw_indirect_first_instance},
    {depth_clamp => vulkan_1_0.depth_clamp},
    {depth_bias_clamp => vulkan_1_0.depth_bias_clamp},
    {fill_mode_non_solid => vulkan_1_0.fill_mode_non_solid},
    {depth_bounds => vulkan_1_0.depth_bounds},
    {wide_lines => vulkan_1_0.wide_lines},
    {large_points => vulkan_1_0.large_points},
    {alpha_to_one => vulkan_1_0.alpha_to_one},
    {multi_viewport => vulkan_1_0.multi_viewport},
    {sampler_anisotropy => vulkan_1_0.sampler_anisotropy},
    {texture_compression_etc2 => vulkan_1_0.texture_compression_etc2},
    {texture_compression_astc_ldr => vulkan_1_0.texture_compression_astc_ldr},
    {texture_compression_bc => vulkan_1_0.texture_compression_bc},
    {occlusion_query_precise => vulkan_1_0.occlusion_query_precise},
    {pipeline_statistics_query => vulkan_1_0.pipeline_statistics_query},
    {shader_storage_image_multisample => vulkan_1_0.shader_storage_image_multisample},
    {shader_clip_distance => vulkan_1_0.shader_clip_distance},
    {shader_cull_distance => vulkan_1_0.shader_cull_distance},
    {shader_float64 => vulkan_1_0.shader_float64},
    {shader_int64 => vulkan_1_0.shader_int64},
    {shader_int16 => vulkan_1_0.shader_int16},
    {sparse_binding => vulkan_1_0.sparse_binding},
    {sparse_residency_buffer => vulkan_1_0.sparse_residency_buffer},
    {sparse_residency_image2d => vulkan_1_0.sparse_residency_image2_d},
    {sparse_residency_image3d => vulkan_1_0.sparse_residency_image3_d},
    {sparse_residency_aliased => vulkan_1_0.sparse_residency_aliased},
    {variable_multisample_rate => vulkan_1_0.variable_multisample_rate},
    {inherited_queries => vulkan_1_0.inherited_queries},

    // Vulkan 1.1
    {multiview => vulkan_1_1.multiview | multiview.multiview},
    {multiview_geometry_shader => vulkan_1_1.multiview_geometry_shader | multiview.multiview_geometry_shader},
    {multiview_tessellation_shader => vulkan_1_1.multiview_tessellation_shader | multiview.multiview_tessellation_shader},
    {protected_memory => vulkan_1_1.protected_memory},
    {sampler_ycbcr_conversion => vulkan_1_1.sampler_ycbcr_conversion | sampler_ycbcr_conversion.sampler_ycbcr_conversion},
    {shader_draw_parameters => vulkan_1_1.shader_draw_parameters},

    // Vulkan 1.2
    {sampler_mirror_clamp_to_edge => vulkan_1_2.sampler_mirror_clamp_to_edge},
    {draw_indirect_count => vulkan_1_2.draw_indirect_count},
    {descriptor_indexing => vulkan_1_2.descriptor_indexing},
    {descriptor_binding_uniform_buffer_update_after_bind => vulkan_1_2.descriptor_binding_uniform_buffer_update_after_bind | descriptor_indexing.descriptor_binding_uniform_buffer_update_after_bind},
    {descriptor_binding_sampled_image_update_after_bind => vulkan_1_2.descriptor_binding_sampled_image_update_after_bind | descriptor_indexing.descriptor_binding_sampled_image_update_after_bind},
    {descriptor_binding_storage_image_update_after_bind => vulkan_1_2.descriptor_binding_storage_image_update_after_bind | descriptor_indexing.descriptor_binding_storage_image_update_after_bind},
    {descriptor_binding_storage_buffer_update_after_bind => vulkan_1_2.descriptor_binding_storage_buffer_update_after_bind | descriptor_indexing.descriptor_binding_storage_buffer_update_after_bind},
    {descriptor_binding_uniform_texel_buffer_update_after_bind => vulkan_1_2.descriptor_binding_uniform_texel_buffer_update_after_bind | descriptor_indexing.descriptor_binding_uniform_texel_buffer_update_after_bind},
    {descriptor_binding_storage_texel_buffer_update_after_bind => vulkan_1_2.descriptor_binding_storage_texel_buffer_update_after_bind | descriptor_indexing.descriptor_binding_storage_texel_buffer_update_after_bind},
    {descriptor_binding_update_unused_while_pending => vulkan_1_2.descriptor_binding_update_unused_while_pending | descriptor_indexing.descriptor_binding_update_unused_while_pending},
    {descriptor_binding_partially_bound => vulkan_1_2.descriptor_binding_partially_bound | descriptor_indexing.descriptor_binding_partially_bound},
    {descriptor_binding_variable_descriptor_count => vulkan_1_2.descriptor_binding_variable_descriptor_count | descriptor_indexing.descriptor_binding_variable_descriptor_count},
    {runtime_descriptor_array => vulkan_1_2.runtime_descriptor_array | descriptor_indexing.runtime_descriptor_array},
    {sampler_filter_minmax => vulkan_1_2.sampler_filter_minmax},
    {host_query_reset => vulkan_1_2.host_query_reset},
    {timeline_semaphore => vulkan_1_2.timeline_semaphore | timeline_semaphore.timeline_semaphore},
    {buffer_device_address => vulkan_1_2.buffer_device_address | buffer_device_address.buffer_device_address},
    {buffer_device_address_capture_replay => vulkan_1_2.buffer_device_address_capture_replay | buffer_device_address.buffer_device_address_capture_replay},
    {buffer_device_address_multi_device => vulkan_1_2.buffer_device_address_multi_device | buffer_device_address.buffer_device_address_multi_device},

    // Vulkan 1.3
    {robust_image_access => vulkan_1_3.robust_image_access},
    {inline_uniform_block => vulkan_1_3.inline_uniform_block | inline_uniform_block.inline_uniform_block},
    {descriptor_binding_inline_uniform_block_update_after_bind => vulkan_1_3.descriptor_binding_inline_uniform_block_update_after_bind | inline_uniform_block.descriptor_binding_inline_uniform_block_update_after_bind},
    {pipeline_creation_cache_control => vulkan_1_3.pipeline_creation_cache_control},
    {subgroup_size_control => vulkan_1_3.subgroup_size_control},
    {synchronization2 => vulkan_1_3.synchronization2 | synchronization2.synchronization2},
    {dynamic_rendering => vulkan_1_3.dynamic_rendering | dynamic_rendering.dynamic_rendering},
    {maintenance4 => vulkan_1_3.maintenance4},

    // Extensions
    {task_shader => ext_mesh_shader.task_shader},
    {mesh_shader => ext_mesh_shader.mesh_shader},
    {acceleration_structure => khr_acceleration_structure.acceleration_structure},
    {acceleration_structure_capture_replay => khr_acceleration_structure.acceleration_structure_capture_replay},
    {acceleration_structure_indirect_build => khr_acceleration_structure.acceleration_structure_indirect_build},
    {acceleration_structure_host_commands => khr_acceleration_structure.acceleration_structure_host_commands},
    {ray_tracing_pipeline => khr_ray_tracing_pipeline.ray_tracing_pipeline},
    {ray_tracing_pipeline_shader_group_handle_capture_replay => khr_ray_tracing_pipeline.ray_tracing_pipeline_shader_group_handle_capture_replay},
    {ray_tracing_pipeline_trace_rays_indirect => khr_ray_tracing_pipeline.ray_tracing_pipeline_trace_rays_indirect},
    {ray_traversal_primitive_culling => khr_ray_tracing_pipeline.ray_traversal_primitive_culling},
    {ray_query => khr_ray_query.ray_query},
    {descriptor_buffer => ext_descriptor_buffer.descriptor_buffer},
    {descriptor_buffer_capture_replay => ext_descriptor_buffer.descriptor_buffer_capture_replay},
    {descriptor_buffer_push_descriptors => ext_descriptor_buffer.descriptor_buffer_push_descriptors},
    {mutable_descriptor_type => ext_mutable_descriptor_type.mutable_descriptor_type},
    {graphics_pipeline_library => ext_graphics_pipeline_library.graphics_pipeline_library},
    {extended_dynamic_state => ext_extended_dynamic_state.extended_dynamic_state},
    {advanced_blend_coherent_operations => ext_blend_operation_advanced.advanced_blend_coherent_operations},
    {depth_clip_enable => ext_depth_clip_enable.depth_clip_enable},
    {custom_border_colors => ext_custom_border_color.custom_border_colors},
    {custom_border_color_without_format => ext_custom_border_color.custom_border_color_without_format},
    {robust_buffer_access2 => ext_robustness2.robust_buffer_access2},
    {robust_image_access2 => ext_robustness2.robust_image_access2},
    {null_descriptor => ext_robustness2.null_descriptor},
    {present_id => khr_present_id.present_id},
}

impl DeviceFeatures {
    /// Collects the features enabled by a device create info, from `p_enabled_features` and from
    /// every feature structure in its chain.
    ///
    /// # Safety
    ///
    /// `create_info` must be a valid `vk::DeviceCreateInfo`, including its chain.
    pub unsafe fn from_create_info(create_info: &vk::DeviceCreateInfo<'_>) -> DeviceFeatures {
        let p_next = create_info.p_next;
        let features2 = find_in_chain::<vk::PhysicalDeviceFeatures2<'_>>(p_next);

        let ffi = FeaturesFfi {
            vulkan_1_0: create_info
                .p_enabled_features
                .as_ref()
                .or(features2.map(|f| &f.features)),
            vulkan_1_1: find_in_chain(p_next),
            vulkan_1_2: find_in_chain(p_next),
            vulkan_1_3: find_in_chain(p_next),
            multiview: find_in_chain(p_next),
            sampler_ycbcr_conversion: find_in_chain(p_next),
            buffer_device_address: find_in_chain(p_next),
            timeline_semaphore: find_in_chain(p_next),
            descriptor_indexing: find_in_chain(p_next),
            synchronization2: find_in_chain(p_next),
            dynamic_rendering: find_in_chain(p_next),
            inline_uniform_block: find_in_chain(p_next),
            ext_mesh_shader: find_in_chain(p_next),
            khr_acceleration_structure: find_in_chain(p_next),
            khr_ray_tracing_pipeline: find_in_chain(p_next),
            khr_ray_query: find_in_chain(p_next),
            ext_descriptor_buffer: find_in_chain(p_next),
            ext_mutable_descriptor_type: find_in_chain(p_next),
            ext_graphics_pipeline_library: find_in_chain(p_next),
            ext_extended_dynamic_state: find_in_chain(p_next),
            ext_blend_operation_advanced: find_in_chain(p_next),
            ext_depth_clip_enable: find_in_chain(p_next),
            ext_custom_border_color: find_in_chain(p_next),
            ext_robustness2: find_in_chain(p_next),
            khr_present_id: find_in_chain(p_next),
        };

        DeviceFeatures::from_ffi(&ffi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn empty_create_info_enables_nothing() {
        let create_info = vk::DeviceCreateInfo::default();
        let features = unsafe { DeviceFeatures::from_create_info(&create_info) };
        assert_eq!(features, DeviceFeatures::empty());
    }

    #[test]
    fn features_from_all_sources() {
        let enabled = vk::PhysicalDeviceFeatures::default()
            .wide_lines(true)
            .multi_viewport(true);
        let mut vulkan_1_2 = vk::PhysicalDeviceVulkan12Features::default().timeline_semaphore(true);
        let mut mesh = vk::PhysicalDeviceMeshShaderFeaturesEXT::default().mesh_shader(true);
        let create_info = vk::DeviceCreateInfo::default()
            .enabled_features(&enabled)
            .push_next(&mut vulkan_1_2)
            .push_next(&mut mesh);

        let features = unsafe { DeviceFeatures::from_create_info(&create_info) };
        assert!(features.wide_lines);
        assert!(features.multi_viewport);
        assert!(features.timeline_semaphore);
        assert!(features.mesh_shader);
        assert!(!features.task_shader);
        assert!(!features.depth_bounds);
    }

    #[test]
    fn features2_replaces_enabled_features() {
        let mut features2 = vk::PhysicalDeviceFeatures2::default()
            .features(vk::PhysicalDeviceFeatures::default().depth_bounds(true));
        let mut create_info = vk::DeviceCreateInfo::default().push_next(&mut features2);
        create_info.p_enabled_features = ptr::null();

        let features = unsafe { DeviceFeatures::from_create_info(&create_info) };
        assert!(features.depth_bounds);
    }

    #[test]
    fn lookup_by_name() {
        let features = DeviceFeatures {
            sampler_anisotropy: true,
            ..DeviceFeatures::empty()
        };

        assert_eq!(features.get("sampler_anisotropy"), Some(true));
        assert_eq!(features.get("wide_lines"), Some(false));
        assert_eq!(features.get("not_a_feature"), None);
    }
}
