// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Swapchain creation, presentation, and the surface queries of the physical device.

use crate::{
    buffer::validate_concurrent_sharing,
    chain::{find_in_chain, AllowedStruct, ChainRules},
    format::FORMAT_VALUES,
    image::IMAGE_USAGE_FLAGS,
    predicates::{
        slice_or_empty, validate_array, validate_flags, validate_ranged_enum,
        validate_required_handle, validate_required_pointer, validate_struct_type,
        validate_struct_type_array, ArrayRules, FlagPolicy,
    },
    InstanceValidator, Requires, RequiresAllOf, RequiresOneOf, StatelessValidator,
    SupportsRequirements, ValidationError, ViolationKind, Violations,
};
use ash::vk::{self, Handle};
use std::ops::RangeInclusive;

const SWAPCHAIN_CREATE_FLAGS: vk::SwapchainCreateFlagsKHR = flags_mask!(SwapchainCreateFlagsKHR {
    SPLIT_INSTANCE_BIND_REGIONS,
    PROTECTED,
    MUTABLE_FORMAT,
    DEFERRED_MEMORY_ALLOCATION_EXT,
});

const SURFACE_TRANSFORMS: vk::SurfaceTransformFlagsKHR = flags_mask!(SurfaceTransformFlagsKHR {
    IDENTITY,
    ROTATE_90,
    ROTATE_180,
    ROTATE_270,
    HORIZONTAL_MIRROR,
    HORIZONTAL_MIRROR_ROTATE_90,
    HORIZONTAL_MIRROR_ROTATE_180,
    HORIZONTAL_MIRROR_ROTATE_270,
    INHERIT,
});

const COMPOSITE_ALPHA: vk::CompositeAlphaFlagsKHR = flags_mask!(CompositeAlphaFlagsKHR {
    OPAQUE,
    PRE_MULTIPLIED,
    POST_MULTIPLIED,
    INHERIT,
});

const COLOR_SPACE_VALUES: &[RangeInclusive<i32>] = enum_values!(ColorSpaceKHR {
    SRGB_NONLINEAR,
    DISPLAY_P3_NONLINEAR_EXT..=EXTENDED_SRGB_NONLINEAR_EXT,
    DISPLAY_NATIVE_AMD,
});

const PRESENT_MODE_VALUES: &[RangeInclusive<i32>] = enum_values!(PresentModeKHR {
    IMMEDIATE..=FIFO_RELAXED,
    SHARED_DEMAND_REFRESH..=SHARED_CONTINUOUS_REFRESH,
});

const SWAPCHAIN_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DeviceGroupSwapchainCreateInfoKHR<'static>>(),
        AllowedStruct::of::<vk::ImageFormatListCreateInfo<'static>>(),
        AllowedStruct::tag(vk::StructureType::IMAGE_COMPRESSION_CONTROL_EXT),
        AllowedStruct::tag(vk::StructureType::SURFACE_FULL_SCREEN_EXCLUSIVE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::SURFACE_FULL_SCREEN_EXCLUSIVE_WIN32_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::SWAPCHAIN_COUNTER_CREATE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::SWAPCHAIN_DISPLAY_NATIVE_HDR_CREATE_INFO_AMD),
        AllowedStruct::tag(vk::StructureType::SWAPCHAIN_PRESENT_BARRIER_CREATE_INFO_NV),
        AllowedStruct::tag(vk::StructureType::SWAPCHAIN_PRESENT_MODES_CREATE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::SWAPCHAIN_PRESENT_SCALING_CREATE_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkSwapchainCreateInfoKHR-pNext-pNext"],
    vuids_unique: &["VUID-VkSwapchainCreateInfoKHR-sType-unique"],
};

const PRESENT_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DeviceGroupPresentInfoKHR<'static>>(),
        AllowedStruct::of::<vk::PresentIdKHR<'static>>(),
        AllowedStruct::of::<vk::PresentRegionsKHR<'static>>(),
        AllowedStruct::tag(vk::StructureType::DISPLAY_PRESENT_INFO_KHR),
        AllowedStruct::tag(vk::StructureType::FRAME_BOUNDARY_EXT),
        AllowedStruct::tag(vk::StructureType::PRESENT_FRAME_TOKEN_GGP),
        AllowedStruct::tag(vk::StructureType::PRESENT_TIMES_INFO_GOOGLE),
        AllowedStruct::tag(vk::StructureType::SWAPCHAIN_PRESENT_FENCE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::SWAPCHAIN_PRESENT_MODE_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkPresentInfoKHR-pNext-pNext"],
    vuids_unique: &["VUID-VkPresentInfoKHR-sType-unique"],
};

const SURFACE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::tag(vk::StructureType::SURFACE_FULL_SCREEN_EXCLUSIVE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::SURFACE_FULL_SCREEN_EXCLUSIVE_WIN32_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::SURFACE_PRESENT_MODE_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkPhysicalDeviceSurfaceInfo2KHR-pNext-pNext"],
    vuids_unique: &["VUID-VkPhysicalDeviceSurfaceInfo2KHR-sType-unique"],
};

const SURFACELESS_QUERY_REQUIREMENT: RequiresOneOf =
    RequiresOneOf(&[RequiresAllOf(&[Requires::InstanceExtension("google_surfaceless_query")])]);

impl StatelessValidator {
    /// Validates the arguments of `vkCreateSwapchainKHR`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_swapchain_khr(
        &self,
        create_info: &vk::SwapchainCreateInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::SwapchainCreateInfoKHR {
            p_next,
            flags,
            surface,
            min_image_count,
            image_format,
            image_color_space,
            image_extent,
            image_array_layers,
            image_usage,
            image_sharing_mode,
            queue_family_index_count,
            p_queue_family_indices,
            pre_transform,
            composite_alpha,
            present_mode,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkSwapchainCreateInfoKHR-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &SWAPCHAIN_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            SWAPCHAIN_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkSwapchainCreateInfoKHR-flags-parameter"],
            &[],
        ));
        violations.push_opt(validate_required_handle(
            "create_info.surface",
            surface,
            &["VUID-VkSwapchainCreateInfoKHR-surface-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.image_format",
            image_format.as_raw(),
            FORMAT_VALUES,
            &["VUID-VkSwapchainCreateInfoKHR-imageFormat-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.image_color_space",
            image_color_space.as_raw(),
            COLOR_SPACE_VALUES,
            &["VUID-VkSwapchainCreateInfoKHR-imageColorSpace-parameter"],
        ));
        violations.push_opt(validate_flags(
            "create_info.image_usage",
            image_usage.as_raw(),
            IMAGE_USAGE_FLAGS.as_raw(),
            FlagPolicy::Required,
            &["VUID-VkSwapchainCreateInfoKHR-imageUsage-parameter"],
            &["VUID-VkSwapchainCreateInfoKHR-imageUsage-requiredbitmask"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.image_sharing_mode",
            image_sharing_mode.as_raw(),
            enum_values!(SharingMode { EXCLUSIVE..=CONCURRENT }),
            &["VUID-VkSwapchainCreateInfoKHR-imageSharingMode-parameter"],
        ));
        violations.push_opt(validate_flags(
            "create_info.pre_transform",
            pre_transform.as_raw(),
            SURFACE_TRANSFORMS.as_raw(),
            FlagPolicy::RequiredSingleBit,
            &["VUID-VkSwapchainCreateInfoKHR-preTransform-parameter"],
            &["VUID-VkSwapchainCreateInfoKHR-preTransform-parameter"],
        ));
        violations.push_opt(validate_flags(
            "create_info.composite_alpha",
            composite_alpha.as_raw(),
            COMPOSITE_ALPHA.as_raw(),
            FlagPolicy::RequiredSingleBit,
            &["VUID-VkSwapchainCreateInfoKHR-compositeAlpha-parameter"],
            &["VUID-VkSwapchainCreateInfoKHR-compositeAlpha-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.present_mode",
            present_mode.as_raw(),
            PRESENT_MODE_VALUES,
            &["VUID-VkSwapchainCreateInfoKHR-presentMode-parameter"],
        ));

        if image_sharing_mode == vk::SharingMode::CONCURRENT {
            violations.append(validate_concurrent_sharing(
                "create_info",
                queue_family_index_count,
                p_queue_family_indices,
                &["VUID-VkSwapchainCreateInfoKHR-imageSharingMode-01277"],
                &["VUID-VkSwapchainCreateInfoKHR-imageSharingMode-01278"],
            ));
        }

        if image_array_layers == 0 {
            violations.push(ValidationError {
                context: "create_info.image_array_layers".into(),
                problem: "is 0".into(),
                vuids: &["VUID-VkSwapchainCreateInfoKHR-imageArrayLayers-01275"],
                ..Default::default()
            });
        }

        if image_extent.width == 0 || image_extent.height == 0 {
            violations.push(ValidationError {
                context: "create_info.image_extent".into(),
                problem: format!(
                    "is {}x{}, but both dimensions must be greater than 0",
                    image_extent.width, image_extent.height,
                )
                .into(),
                vuids: &["VUID-VkSwapchainCreateInfoKHR-imageExtent-01689"],
                ..Default::default()
            });
        }

        if matches!(
            present_mode,
            vk::PresentModeKHR::SHARED_DEMAND_REFRESH
                | vk::PresentModeKHR::SHARED_CONTINUOUS_REFRESH
        ) && min_image_count != 1
        {
            violations.push(ValidationError {
                context: "create_info.min_image_count".into(),
                problem: format!(
                    "is {}, but `present_mode` is a shared present mode",
                    min_image_count,
                )
                .into(),
                vuids: &["VUID-VkSwapchainCreateInfoKHR-minImageCount-01383"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        violations.append(validate_swapchain_view_formats(
            flags,
            image_format,
            find_in_chain::<vk::ImageFormatListCreateInfo<'_>>(p_next),
        ));

        violations
    }

    /// Validates the arguments of `vkQueuePresentKHR`.
    ///
    /// # Safety
    ///
    /// `present_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_queue_present_khr(
        &self,
        _queue: vk::Queue,
        present_info: &vk::PresentInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::PresentInfoKHR {
            p_next,
            wait_semaphore_count,
            p_wait_semaphores,
            swapchain_count,
            p_swapchains,
            p_image_indices,
            ..
        } = present_info;

        violations.push_opt(validate_struct_type(
            "present_info.s_type",
            present_info,
            &["VUID-VkPresentInfoKHR-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "present_info.p_next",
            p_next,
            &PRESENT_INFO_CHAIN,
        ));
        violations.append(validate_array(
            "present_info.wait_semaphore_count",
            "present_info.p_wait_semaphores",
            wait_semaphore_count,
            p_wait_semaphores,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkPresentInfoKHR-pWaitSemaphores-parameter"],
            },
        ));
        violations.append(validate_array(
            "present_info.swapchain_count",
            "present_info.p_swapchains",
            swapchain_count,
            p_swapchains,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-VkPresentInfoKHR-swapchainCount-arraylength"],
                array_vuids: &["VUID-VkPresentInfoKHR-pSwapchains-parameter"],
            },
        ));

        if swapchain_count != 0 {
            violations.push_opt(validate_required_pointer(
                "present_info.p_image_indices",
                p_image_indices,
                &["VUID-VkPresentInfoKHR-pImageIndices-parameter"],
            ));
        }

        for (index, &swapchain) in slice_or_empty(p_swapchains, swapchain_count)
            .iter()
            .enumerate()
        {
            if swapchain.is_null() {
                violations.push(ValidationError {
                    context: format!("present_info.p_swapchains[{}]", index).into(),
                    problem: "is `VK_NULL_HANDLE`".into(),
                    vuids: &["VUID-VkPresentInfoKHR-pSwapchains-parameter"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                });
            }
        }

        if let Some(present_regions) = find_in_chain::<vk::PresentRegionsKHR<'_>>(p_next) {
            if present_regions.swapchain_count != swapchain_count {
                violations.push(ValidationError {
                    context: "present_info.p_next.swapchain_count".into(),
                    problem: format!(
                        "is {} in the `VkPresentRegionsKHR` structure, but \
                        `present_info.swapchain_count` is {}",
                        present_regions.swapchain_count, swapchain_count,
                    )
                    .into(),
                    vuids: &["VUID-VkPresentRegionsKHR-swapchainCount-01260"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            for (index, region) in
                slice_or_empty(present_regions.p_regions, present_regions.swapchain_count)
                    .iter()
                    .enumerate()
            {
                if region.rectangle_count != 0 && region.p_rectangles.is_null() {
                    violations.push(ValidationError {
                        context: format!("present_info.p_next.p_regions[{}].p_rectangles", index)
                            .into(),
                        problem: format!(
                            "is null, but `rectangle_count` is {}",
                            region.rectangle_count,
                        )
                        .into(),
                        vuids: &["VUID-VkPresentRegionKHR-pRectangles-parameter"],
                        kind: ViolationKind::MissingCompanion,
                        ..Default::default()
                    });
                }
            }
        }

        if let Some(present_id) = find_in_chain::<vk::PresentIdKHR<'_>>(p_next) {
            if present_id.swapchain_count != swapchain_count {
                violations.push(ValidationError {
                    context: "present_info.p_next.swapchain_count".into(),
                    problem: format!(
                        "is {} in the `VkPresentIdKHR` structure, but \
                        `present_info.swapchain_count` is {}",
                        present_id.swapchain_count, swapchain_count,
                    )
                    .into(),
                    vuids: &["VUID-VkPresentIdKHR-swapchainCount-04998"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            let present_ids = slice_or_empty(present_id.p_present_ids, present_id.swapchain_count);

            if !self.capabilities().features.present_id && present_ids.iter().any(|&id| id != 0) {
                violations.push(ValidationError {
                    context: "present_info.p_next.p_present_ids".into(),
                    problem: "contains a non-zero present ID".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "present_id",
                    )])]),
                    vuids: &["VUID-VkPresentInfoKHR-pNext-06235"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        if let Some(device_group) = find_in_chain::<vk::DeviceGroupPresentInfoKHR<'_>>(p_next) {
            if device_group.swapchain_count != 0 && device_group.swapchain_count != swapchain_count
            {
                violations.push(ValidationError {
                    context: "present_info.p_next.swapchain_count".into(),
                    problem: format!(
                        "is {} in the `VkDeviceGroupPresentInfoKHR` structure, but \
                        `present_info.swapchain_count` is {}",
                        device_group.swapchain_count, swapchain_count,
                    )
                    .into(),
                    vuids: &["VUID-VkDeviceGroupPresentInfoKHR-swapchainCount-01297"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations
    }
}

impl InstanceValidator {
    /// Validates the arguments of `vkGetPhysicalDeviceSurfaceFormats2KHR`.
    ///
    /// # Safety
    ///
    /// `surface_info` must be valid as described in the crate documentation.
    /// `p_surface_format_count` must be null or valid, and if both it and `p_surface_formats`
    /// are not null, `p_surface_formats` must be valid for that many elements.
    pub unsafe fn validate_get_physical_device_surface_formats2_khr(
        &self,
        _physical_device: vk::PhysicalDevice,
        surface_info: &vk::PhysicalDeviceSurfaceInfo2KHR<'_>,
        p_surface_format_count: *const u32,
        p_surface_formats: *const vk::SurfaceFormat2KHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_struct_type(
            "surface_info.s_type",
            surface_info,
            &["VUID-VkPhysicalDeviceSurfaceInfo2KHR-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "surface_info.p_next",
            surface_info.p_next,
            &SURFACE_INFO_CHAIN,
        ));

        if surface_info.surface.is_null()
            && !self.capabilities().satisfies(SURFACELESS_QUERY_REQUIREMENT)
        {
            violations.push(ValidationError {
                context: "surface_info.surface".into(),
                problem: "is `VK_NULL_HANDLE`".into(),
                requires_one_of: SURFACELESS_QUERY_REQUIREMENT,
                vuids: &["VUID-vkGetPhysicalDeviceSurfaceFormats2KHR-pSurfaceInfo-06521"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations.push_opt(validate_required_pointer(
            "p_surface_format_count",
            p_surface_format_count,
            &["VUID-vkGetPhysicalDeviceSurfaceFormats2KHR-pSurfaceFormatCount-parameter"],
        ));

        if let Some(&count) = p_surface_format_count.as_ref() {
            violations.append(validate_struct_type_array(
                "p_surface_formats",
                slice_or_empty(p_surface_formats, count),
                &["VUID-VkSurfaceFormat2KHR-sType-sType"],
            ));
        }

        violations
    }

    /// # Safety
    ///
    /// Same as [`InstanceValidator::validate_get_physical_device_surface_formats2_khr`].
    pub unsafe fn pre_call_validate_get_physical_device_surface_formats2_khr(
        &self,
        physical_device: vk::PhysicalDevice,
        surface_info: &vk::PhysicalDeviceSurfaceInfo2KHR<'_>,
        p_surface_format_count: *const u32,
        p_surface_formats: *const vk::SurfaceFormat2KHR<'_>,
    ) -> bool {
        self.report(
            "vkGetPhysicalDeviceSurfaceFormats2KHR",
            &self.validate_get_physical_device_surface_formats2_khr(
                physical_device,
                surface_info,
                p_surface_format_count,
                p_surface_formats,
            ),
        )
    }

    /// Validates the arguments of `vkGetPhysicalDeviceSurfacePresentModesKHR`.
    pub fn validate_get_physical_device_surface_present_modes_khr(
        &self,
        _physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        p_present_mode_count: *const u32,
        _p_present_modes: *const vk::PresentModeKHR,
    ) -> Violations {
        let mut violations = Violations::new();

        if surface.is_null() && !self.capabilities().satisfies(SURFACELESS_QUERY_REQUIREMENT) {
            violations.push(ValidationError {
                context: "surface".into(),
                problem: "is `VK_NULL_HANDLE`".into(),
                requires_one_of: SURFACELESS_QUERY_REQUIREMENT,
                vuids: &["VUID-vkGetPhysicalDeviceSurfacePresentModesKHR-surface-06524"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations.push_opt(validate_required_pointer(
            "p_present_mode_count",
            p_present_mode_count,
            &["VUID-vkGetPhysicalDeviceSurfacePresentModesKHR-pPresentModeCount-parameter"],
        ));

        violations
    }

    pub fn pre_call_validate_get_physical_device_surface_present_modes_khr(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        p_present_mode_count: *const u32,
        p_present_modes: *const vk::PresentModeKHR,
    ) -> bool {
        self.report(
            "vkGetPhysicalDeviceSurfacePresentModesKHR",
            &self.validate_get_physical_device_surface_present_modes_khr(
                physical_device,
                surface,
                p_present_mode_count,
                p_present_modes,
            ),
        )
    }
}

/// Checks the view formats that a swapchain lists against its `MUTABLE_FORMAT` flag.
unsafe fn validate_swapchain_view_formats(
    flags: vk::SwapchainCreateFlagsKHR,
    image_format: vk::Format,
    format_list: Option<&vk::ImageFormatListCreateInfo<'_>>,
) -> Violations {
    let mut violations = Violations::new();
    let view_formats = format_list.map_or(&[][..], |list| {
        slice_or_empty(list.p_view_formats, list.view_format_count)
    });

    if flags.contains(vk::SwapchainCreateFlagsKHR::MUTABLE_FORMAT) {
        if !view_formats.contains(&image_format) {
            violations.push(ValidationError {
                context: "create_info.p_next".into(),
                problem: "`flags` contains `VK_SWAPCHAIN_CREATE_MUTABLE_FORMAT_BIT_KHR`, but the \
                    chain does not include a `VkImageFormatListCreateInfo` structure whose \
                    `p_view_formats` contains `image_format`"
                    .into(),
                vuids: &["VUID-VkSwapchainCreateInfoKHR-flags-03168"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }
    } else if view_formats.len() > 1 {
        violations.push(ValidationError {
            context: "create_info.p_next.view_format_count".into(),
            problem: format!(
                "is {}, but `flags` does not contain `VK_SWAPCHAIN_CREATE_MUTABLE_FORMAT_BIT_KHR`",
                view_formats.len(),
            )
            .into(),
            vuids: &["VUID-VkSwapchainCreateInfoKHR-pNext-04100"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::{
        instance::test_instance_validator,
        tests::{link, test_capabilities, test_validator, test_validator_with, FakeQueries},
    };
    use ash::vk::{self, Handle};
    use std::{ptr, sync::Arc};

    fn swapchain_info() -> vk::SwapchainCreateInfoKHR<'static> {
        vk::SwapchainCreateInfoKHR::default()
            .surface(vk::SurfaceKHR::from_raw(0x90))
            .min_image_count(3)
            .image_format(vk::Format::B8G8R8A8_SRGB)
            .image_color_space(vk::ColorSpaceKHR::SRGB_NONLINEAR)
            .image_extent(vk::Extent2D {
                width: 800,
                height: 600,
            })
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .pre_transform(vk::SurfaceTransformFlagsKHR::IDENTITY)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(vk::PresentModeKHR::FIFO)
    }

    #[test]
    fn create_swapchain() {
        let validator = test_validator();
        let violations = unsafe { validator.validate_create_swapchain_khr(&swapchain_info()) };
        assert!(violations.is_empty(), "{}", violations);

        let create_info = swapchain_info()
            .image_sharing_mode(vk::SharingMode::CONCURRENT)
            .image_array_layers(0)
            .composite_alpha(
                vk::CompositeAlphaFlagsKHR::OPAQUE | vk::CompositeAlphaFlagsKHR::INHERIT,
            )
            .present_mode(vk::PresentModeKHR::SHARED_DEMAND_REFRESH);
        let violations = unsafe { validator.validate_create_swapchain_khr(&create_info) };
        assert_vuid!(violations, "VUID-VkSwapchainCreateInfoKHR-imageSharingMode-01277");
        assert_vuid!(violations, "VUID-VkSwapchainCreateInfoKHR-imageSharingMode-01278");
        assert_vuid!(violations, "VUID-VkSwapchainCreateInfoKHR-imageArrayLayers-01275");
        assert_vuid!(violations, "VUID-VkSwapchainCreateInfoKHR-compositeAlpha-parameter");
        assert_vuid!(violations, "VUID-VkSwapchainCreateInfoKHR-minImageCount-01383");
        assert_eq!(violations.len(), 5, "{}", violations);
    }

    #[test]
    fn mutable_format_list() {
        let validator = test_validator();
        let view_formats = [vk::Format::B8G8R8A8_UNORM, vk::Format::B8G8R8A8_SRGB];
        let mut format_list = vk::ImageFormatListCreateInfo::default().view_formats(&view_formats);

        let mut create_info = swapchain_info().flags(vk::SwapchainCreateFlagsKHR::MUTABLE_FORMAT);
        let violations = unsafe { validator.validate_create_swapchain_khr(&create_info) };
        assert_vuid!(violations, "VUID-VkSwapchainCreateInfoKHR-flags-03168");

        create_info.p_next = link(&mut format_list, ptr::null());
        let violations = unsafe { validator.validate_create_swapchain_khr(&create_info) };
        assert!(violations.is_empty(), "{}", violations);

        create_info.flags = vk::SwapchainCreateFlagsKHR::empty();
        let violations = unsafe { validator.validate_create_swapchain_khr(&create_info) };
        assert_vuid!(violations, "VUID-VkSwapchainCreateInfoKHR-pNext-04100");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn queue_present() {
        let mut capabilities = test_capabilities();
        capabilities.features.present_id = false;
        let validator = test_validator_with(capabilities);
        let swapchains = [vk::SwapchainKHR::from_raw(0x91), vk::SwapchainKHR::from_raw(0x92)];
        let image_indices = [0, 1];
        let present_ids = [7];
        let mut present_id = vk::PresentIdKHR::default().present_ids(&present_ids);
        let mut present_info = vk::PresentInfoKHR::default()
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let violations = unsafe {
            validator.validate_queue_present_khr(vk::Queue::from_raw(0x93), &present_info)
        };
        assert!(violations.is_empty(), "{}", violations);

        present_info.p_next = link(&mut present_id, ptr::null());
        let violations = unsafe {
            validator.validate_queue_present_khr(vk::Queue::from_raw(0x93), &present_info)
        };
        assert_vuid!(violations, "VUID-VkPresentIdKHR-swapchainCount-04998");
        assert_vuid!(violations, "VUID-VkPresentInfoKHR-pNext-06235");
        assert_eq!(violations.len(), 2, "{}", violations);

        let present_info = vk::PresentInfoKHR {
            swapchain_count: 1,
            ..Default::default()
        };
        let violations = unsafe {
            validator.validate_queue_present_khr(vk::Queue::from_raw(0x93), &present_info)
        };
        assert_vuid!(violations, "VUID-VkPresentInfoKHR-pSwapchains-parameter");
        assert_vuid!(violations, "VUID-VkPresentInfoKHR-pImageIndices-parameter");
    }

    #[test]
    fn surface_queries() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let physical_device = vk::PhysicalDevice::from_raw(0x2000);
        let surface_info = vk::PhysicalDeviceSurfaceInfo2KHR::default();
        let count = 1u32;
        let formats = [vk::SurfaceFormat2KHR {
            s_type: vk::StructureType::SURFACE_CAPABILITIES_2_KHR,
            ..Default::default()
        }];

        let violations = unsafe {
            validator.validate_get_physical_device_surface_formats2_khr(
                physical_device,
                &surface_info,
                &count,
                formats.as_ptr(),
            )
        };
        assert_vuid!(
            violations,
            "VUID-vkGetPhysicalDeviceSurfaceFormats2KHR-pSurfaceInfo-06521",
        );
        assert_vuid!(violations, "VUID-VkSurfaceFormat2KHR-sType-sType");
        assert_eq!(violations.len(), 2, "{}", violations);

        let violations = validator.validate_get_physical_device_surface_present_modes_khr(
            physical_device,
            vk::SurfaceKHR::from_raw(0x90),
            ptr::null(),
            ptr::null(),
        );
        assert_vuid!(
            violations,
            "VUID-vkGetPhysicalDeviceSurfacePresentModesKHR-pPresentModeCount-parameter",
        );
        assert_eq!(violations.len(), 1, "{}", violations);
    }
}
