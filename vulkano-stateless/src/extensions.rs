// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The instance and device extension tables.
//!
//! Extensions are referred to by their member name (`khr_swapchain`) inside this crate, and by
//! their Vulkan name (`VK_KHR_swapchain`) when talking to the application or the driver.

use crate::{Requires, RequiresAllOf, RequiresOneOf, Version};

macro_rules! extensions {
    {
        $sname:ident, $doc:expr,
        $({ $member:ident => $raw:literal },)*
    } => {
        #[doc = $doc]
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub struct $sname {
            $(pub $member: bool,)*
        }

        impl $sname {
            /// Builds an object with all values to false.
            pub const fn empty() -> Self {
                Self {
                    $($member: false,)*
                }
            }

            /// Builds an object with all values to true.
            ///
            /// > **Note**: This function is used for testing purposes.
            pub const fn all() -> Self {
                Self {
                    $($member: true,)*
                }
            }

            /// Builds an object from a list of Vulkan extension names. Names that are not known
            /// to this crate are ignored.
            pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
                let mut extensions = Self::empty();

                for name in names {
                    extensions.enable_by_name(name);
                }

                extensions
            }

            /// Sets the extension with the given Vulkan name. Returns `false` if the name is not
            /// known to this crate.
            pub fn enable_by_name(&mut self, name: &str) -> bool {
                match name {
                    $($raw => {
                        self.$member = true;
                        true
                    })*
                    _ => false,
                }
            }

            /// Returns the value for the given member name, or `None` if there is no member with
            /// that name.
            pub fn get(&self, member: &str) -> Option<bool> {
                match member {
                    $(stringify!($member) => Some(self.$member),)*
                    _ => None,
                }
            }

            /// Returns the value for the given Vulkan extension name, or `None` if the name is
            /// not known to this crate.
            pub fn get_by_name(&self, name: &str) -> Option<bool> {
                match name {
                    $($raw => Some(self.$member),)*
                    _ => None,
                }
            }

            /// Returns the Vulkan name of the given member.
            pub fn name_of(member: &str) -> Option<&'static str> {
                match member {
                    $(stringify!($member) => Some($raw),)*
                    _ => None,
                }
            }

            /// Returns the member name and value of every extension.
            pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
                [$((stringify!($member), self.$member),)*].into_iter()
            }

            /// Returns the member names of the extensions that are set.
            pub fn enabled(&self) -> impl Iterator<Item = &'static str> {
                self.iter().filter_map(|(member, value)| value.then_some(member))
            }
        }
    };
}

extensions! {
    InstanceExtensions,
    "The instance extensions known to this crate.",
    {khr_surface => "VK_KHR_surface"},
    {khr_display => "VK_KHR_display"},
    {khr_xlib_surface => "VK_KHR_xlib_surface"},
    {khr_xcb_surface => "VK_KHR_xcb_surface"},
    {khr_wayland_surface => "VK_KHR_wayland_surface"},
    {khr_win32_surface => "VK_KHR_win32_surface"},
    {khr_android_surface => "VK_KHR_android_surface"},
    {ext_metal_surface => "VK_EXT_metal_surface"},
    {ext_headless_surface => "VK_EXT_headless_surface"},
    {khr_get_physical_device_properties2 => "VK_KHR_get_physical_device_properties2"},
    {khr_get_surface_capabilities2 => "VK_KHR_get_surface_capabilities2"},
    {khr_external_memory_capabilities => "VK_KHR_external_memory_capabilities"},
    {khr_external_semaphore_capabilities => "VK_KHR_external_semaphore_capabilities"},
    {khr_external_fence_capabilities => "VK_KHR_external_fence_capabilities"},
    {khr_device_group_creation => "VK_KHR_device_group_creation"},
    {khr_portability_enumeration => "VK_KHR_portability_enumeration"},
    {ext_swapchain_colorspace => "VK_EXT_swapchain_colorspace"},
    {google_surfaceless_query => "VK_GOOGLE_surfaceless_query"},
    {ext_debug_utils => "VK_EXT_debug_utils"},
    {ext_debug_report => "VK_EXT_debug_report"},
    {ext_validation_features => "VK_EXT_validation_features"},
    {ext_validation_flags => "VK_EXT_validation_flags"},
    {ext_layer_settings => "VK_EXT_layer_settings"},
    {lunarg_direct_driver_loading => "VK_LUNARG_direct_driver_loading"},
}

extensions! {
    DeviceExtensions,
    "The device extensions known to this crate.",
    {khr_swapchain => "VK_KHR_swapchain"},
    {khr_incremental_present => "VK_KHR_incremental_present"},
    {khr_present_id => "VK_KHR_present_id"},
    {khr_device_group => "VK_KHR_device_group"},
    {khr_maintenance1 => "VK_KHR_maintenance1"},
    {khr_maintenance2 => "VK_KHR_maintenance2"},
    {khr_maintenance3 => "VK_KHR_maintenance3"},
    {khr_bind_memory2 => "VK_KHR_bind_memory2"},
    {khr_get_memory_requirements2 => "VK_KHR_get_memory_requirements2"},
    {khr_dedicated_allocation => "VK_KHR_dedicated_allocation"},
    {khr_multiview => "VK_KHR_multiview"},
    {khr_create_renderpass2 => "VK_KHR_create_renderpass2"},
    {khr_dynamic_rendering => "VK_KHR_dynamic_rendering"},
    {khr_sampler_mirror_clamp_to_edge => "VK_KHR_sampler_mirror_clamp_to_edge"},
    {khr_sampler_ycbcr_conversion => "VK_KHR_sampler_ycbcr_conversion"},
    {khr_image_format_list => "VK_KHR_image_format_list"},
    {khr_draw_indirect_count => "VK_KHR_draw_indirect_count"},
    {khr_shader_draw_parameters => "VK_KHR_shader_draw_parameters"},
    {khr_spirv_1_4 => "VK_KHR_spirv_1_4"},
    {khr_external_memory => "VK_KHR_external_memory"},
    {khr_external_memory_fd => "VK_KHR_external_memory_fd"},
    {khr_external_semaphore => "VK_KHR_external_semaphore"},
    {khr_external_semaphore_fd => "VK_KHR_external_semaphore_fd"},
    {khr_external_semaphore_win32 => "VK_KHR_external_semaphore_win32"},
    {khr_external_fence => "VK_KHR_external_fence"},
    {khr_external_fence_fd => "VK_KHR_external_fence_fd"},
    {khr_external_fence_win32 => "VK_KHR_external_fence_win32"},
    {khr_buffer_device_address => "VK_KHR_buffer_device_address"},
    {khr_timeline_semaphore => "VK_KHR_timeline_semaphore"},
    {khr_synchronization2 => "VK_KHR_synchronization2"},
    {khr_push_descriptor => "VK_KHR_push_descriptor"},
    {khr_deferred_host_operations => "VK_KHR_deferred_host_operations"},
    {khr_acceleration_structure => "VK_KHR_acceleration_structure"},
    {khr_ray_tracing_pipeline => "VK_KHR_ray_tracing_pipeline"},
    {khr_ray_query => "VK_KHR_ray_query"},
    {khr_pipeline_library => "VK_KHR_pipeline_library"},
    {khr_portability_subset => "VK_KHR_portability_subset"},
    {ext_depth_range_unrestricted => "VK_EXT_depth_range_unrestricted"},
    {ext_sampler_filter_minmax => "VK_EXT_sampler_filter_minmax"},
    {ext_external_memory_dma_buf => "VK_EXT_external_memory_dma_buf"},
    {ext_buffer_device_address => "VK_EXT_buffer_device_address"},
    {ext_descriptor_indexing => "VK_EXT_descriptor_indexing"},
    {ext_descriptor_buffer => "VK_EXT_descriptor_buffer"},
    {ext_mutable_descriptor_type => "VK_EXT_mutable_descriptor_type"},
    {valve_mutable_descriptor_type => "VK_VALVE_mutable_descriptor_type"},
    {ext_inline_uniform_block => "VK_EXT_inline_uniform_block"},
    {ext_mesh_shader => "VK_EXT_mesh_shader"},
    {ext_graphics_pipeline_library => "VK_EXT_graphics_pipeline_library"},
    {ext_extended_dynamic_state => "VK_EXT_extended_dynamic_state"},
    {ext_vertex_input_dynamic_state => "VK_EXT_vertex_input_dynamic_state"},
    {ext_blend_operation_advanced => "VK_EXT_blend_operation_advanced"},
    {ext_depth_clip_enable => "VK_EXT_depth_clip_enable"},
    {ext_image_drm_format_modifier => "VK_EXT_image_drm_format_modifier"},
    {ext_separate_stencil_usage => "VK_EXT_separate_stencil_usage"},
    {ext_robustness2 => "VK_EXT_robustness2"},
    {ext_index_type_uint8 => "VK_EXT_index_type_uint8"},
    {ext_primitive_topology_list_restart => "VK_EXT_primitive_topology_list_restart"},
    {ext_custom_border_color => "VK_EXT_custom_border_color"},
    {ext_pipeline_creation_cache_control => "VK_EXT_pipeline_creation_cache_control"},
    {ext_fragment_density_map => "VK_EXT_fragment_density_map"},
    {amd_negative_viewport_height => "VK_AMD_negative_viewport_height"},
}

const V1_1: RequiresAllOf = RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]);
const V1_2: RequiresAllOf = RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]);
const V1_3: RequiresAllOf = RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]);
const GPDP2: Requires = Requires::InstanceExtension("khr_get_physical_device_properties2");
const SURFACE: RequiresOneOf =
    RequiresOneOf(&[RequiresAllOf(&[Requires::InstanceExtension("khr_surface")])]);
const V1_1_OR_GPDP2: RequiresOneOf = RequiresOneOf(&[V1_1, RequiresAllOf(&[GPDP2])]);

/// What each instance extension needs to be enabled alongside it.
pub(crate) const INSTANCE_EXTENSION_DEPENDENCIES: &[(&str, RequiresOneOf)] = &[
    ("khr_display", SURFACE),
    ("khr_xlib_surface", SURFACE),
    ("khr_xcb_surface", SURFACE),
    ("khr_wayland_surface", SURFACE),
    ("khr_win32_surface", SURFACE),
    ("khr_android_surface", SURFACE),
    ("ext_metal_surface", SURFACE),
    ("ext_headless_surface", SURFACE),
    ("khr_get_surface_capabilities2", SURFACE),
    ("ext_swapchain_colorspace", SURFACE),
    ("google_surfaceless_query", SURFACE),
    ("khr_external_memory_capabilities", V1_1_OR_GPDP2),
    ("khr_external_semaphore_capabilities", V1_1_OR_GPDP2),
    ("khr_external_fence_capabilities", V1_1_OR_GPDP2),
];

/// What each device extension needs to be enabled alongside it.
pub(crate) const DEVICE_EXTENSION_DEPENDENCIES: &[(&str, RequiresOneOf)] = &[
    ("khr_swapchain", SURFACE),
    (
        "khr_incremental_present",
        RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension("khr_swapchain")])]),
    ),
    (
        "khr_present_id",
        RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension("khr_swapchain")])]),
    ),
    (
        "khr_device_group",
        RequiresOneOf(&[RequiresAllOf(&[Requires::InstanceExtension(
            "khr_device_group_creation",
        )])]),
    ),
    (
        "khr_dedicated_allocation",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::DeviceExtension("khr_get_memory_requirements2")]),
        ]),
    ),
    ("khr_multiview", V1_1_OR_GPDP2),
    (
        "khr_create_renderpass2",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[
                Requires::DeviceExtension("khr_multiview"),
                Requires::DeviceExtension("khr_maintenance2"),
            ]),
        ]),
    ),
    ("khr_dynamic_rendering", V1_1_OR_GPDP2),
    (
        "khr_sampler_ycbcr_conversion",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[
                Requires::DeviceExtension("khr_maintenance1"),
                Requires::DeviceExtension("khr_bind_memory2"),
                Requires::DeviceExtension("khr_get_memory_requirements2"),
                GPDP2,
            ]),
        ]),
    ),
    (
        "khr_external_memory",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::InstanceExtension("khr_external_memory_capabilities")]),
        ]),
    ),
    (
        "khr_external_memory_fd",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_memory")]),
        ]),
    ),
    (
        "ext_external_memory_dma_buf",
        RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
            "khr_external_memory_fd",
        )])]),
    ),
    (
        "khr_external_semaphore",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::InstanceExtension(
                "khr_external_semaphore_capabilities",
            )]),
        ]),
    ),
    (
        "khr_external_semaphore_fd",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_semaphore")]),
        ]),
    ),
    (
        "khr_external_semaphore_win32",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_semaphore")]),
        ]),
    ),
    (
        "khr_external_fence",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::InstanceExtension("khr_external_fence_capabilities")]),
        ]),
    ),
    (
        "khr_external_fence_fd",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_fence")]),
        ]),
    ),
    (
        "khr_external_fence_win32",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_fence")]),
        ]),
    ),
    ("khr_buffer_device_address", V1_1_OR_GPDP2),
    ("khr_timeline_semaphore", V1_1_OR_GPDP2),
    ("khr_synchronization2", V1_1_OR_GPDP2),
    ("khr_push_descriptor", V1_1_OR_GPDP2),
    (
        "khr_acceleration_structure",
        RequiresOneOf(&[
            RequiresAllOf(&[
                Requires::APIVersion(Version::V1_2),
                Requires::DeviceExtension("khr_deferred_host_operations"),
            ]),
            RequiresAllOf(&[
                Requires::DeviceExtension("ext_descriptor_indexing"),
                Requires::DeviceExtension("khr_buffer_device_address"),
                Requires::DeviceExtension("khr_deferred_host_operations"),
            ]),
        ]),
    ),
    (
        "khr_ray_tracing_pipeline",
        RequiresOneOf(&[
            RequiresAllOf(&[
                Requires::APIVersion(Version::V1_2),
                Requires::DeviceExtension("khr_acceleration_structure"),
            ]),
            RequiresAllOf(&[
                Requires::DeviceExtension("khr_spirv_1_4"),
                Requires::DeviceExtension("khr_acceleration_structure"),
            ]),
        ]),
    ),
    (
        "khr_ray_query",
        RequiresOneOf(&[
            RequiresAllOf(&[
                Requires::APIVersion(Version::V1_2),
                Requires::DeviceExtension("khr_acceleration_structure"),
            ]),
            RequiresAllOf(&[
                Requires::DeviceExtension("khr_spirv_1_4"),
                Requires::DeviceExtension("khr_acceleration_structure"),
            ]),
        ]),
    ),
    ("khr_portability_subset", V1_1_OR_GPDP2),
    ("ext_sampler_filter_minmax", V1_1_OR_GPDP2),
    ("ext_buffer_device_address", V1_1_OR_GPDP2),
    (
        "ext_descriptor_indexing",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[GPDP2, Requires::DeviceExtension("khr_maintenance3")]),
        ]),
    ),
    (
        "ext_descriptor_buffer",
        RequiresOneOf(&[
            V1_3,
            RequiresAllOf(&[
                Requires::APIVersion(Version::V1_2),
                Requires::DeviceExtension("khr_synchronization2"),
            ]),
            RequiresAllOf(&[
                Requires::DeviceExtension("khr_buffer_device_address"),
                Requires::DeviceExtension("ext_descriptor_indexing"),
                Requires::DeviceExtension("khr_synchronization2"),
            ]),
        ]),
    ),
    (
        "ext_mutable_descriptor_type",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[Requires::DeviceExtension("khr_maintenance3")]),
        ]),
    ),
    (
        "ext_inline_uniform_block",
        RequiresOneOf(&[
            V1_1,
            RequiresAllOf(&[GPDP2, Requires::DeviceExtension("khr_maintenance1")]),
        ]),
    ),
    (
        "ext_mesh_shader",
        RequiresOneOf(&[
            V1_2,
            RequiresAllOf(&[Requires::DeviceExtension("khr_spirv_1_4")]),
        ]),
    ),
    (
        "ext_graphics_pipeline_library",
        RequiresOneOf(&[
            RequiresAllOf(&[
                Requires::APIVersion(Version::V1_1),
                Requires::DeviceExtension("khr_pipeline_library"),
            ]),
            RequiresAllOf(&[GPDP2, Requires::DeviceExtension("khr_pipeline_library")]),
        ]),
    ),
    ("ext_extended_dynamic_state", V1_1_OR_GPDP2),
    ("ext_vertex_input_dynamic_state", V1_1_OR_GPDP2),
    (
        "ext_image_drm_format_modifier",
        RequiresOneOf(&[
            V1_2,
            RequiresAllOf(&[
                Requires::DeviceExtension("khr_image_format_list"),
                Requires::DeviceExtension("khr_sampler_ycbcr_conversion"),
            ]),
        ]),
    ),
    ("ext_robustness2", V1_1_OR_GPDP2),
    ("ext_index_type_uint8", V1_1_OR_GPDP2),
    ("ext_primitive_topology_list_restart", V1_1_OR_GPDP2),
    ("ext_pipeline_creation_cache_control", V1_1_OR_GPDP2),
    ("ext_fragment_density_map", V1_1_OR_GPDP2),
    ("khr_spirv_1_4", RequiresOneOf(&[V1_1])),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_map_both_ways() {
        let extensions = DeviceExtensions::from_names(["VK_KHR_swapchain", "VK_FAKE_unknown"]);

        assert!(extensions.khr_swapchain);
        assert_eq!(extensions.get("khr_swapchain"), Some(true));
        assert_eq!(extensions.get_by_name("VK_EXT_mesh_shader"), Some(false));
        assert_eq!(extensions.get_by_name("VK_FAKE_unknown"), None);
        assert_eq!(
            DeviceExtensions::name_of("khr_swapchain"),
            Some("VK_KHR_swapchain"),
        );
        assert_eq!(extensions.enabled().collect::<Vec<_>>(), ["khr_swapchain"]);
    }

    #[test]
    fn dependency_tables_use_known_names() {
        for (member, requires_one_of) in DEVICE_EXTENSION_DEPENDENCIES {
            assert!(DeviceExtensions::name_of(member).is_some(), "{}", member);

            for all_of in requires_one_of.0 {
                for requires in all_of.0 {
                    match requires {
                        Requires::DeviceExtension(name) => {
                            assert!(DeviceExtensions::name_of(name).is_some(), "{}", name)
                        }
                        Requires::InstanceExtension(name) => {
                            assert!(InstanceExtensions::name_of(name).is_some(), "{}", name)
                        }
                        _ => (),
                    }
                }
            }
        }

        for (member, _) in INSTANCE_EXTENSION_DEPENDENCIES {
            assert!(InstanceExtensions::name_of(member).is_some(), "{}", member);
        }
    }
}
