// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for creating images and image views.

use crate::{
    buffer::{validate_concurrent_sharing, EXTERNAL_MEMORY_HANDLE_TYPES},
    chain::{chain_contains, find_in_chain, AllowedStruct, ChainRules},
    format::{self, FORMAT_VALUES},
    predicates::{
        validate_array, validate_flags, validate_ranged_enum, validate_required_handle,
        validate_struct_type, ArrayRules, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, ViolationKind,
    Violations,
};
use ash::vk;
use std::ops::RangeInclusive;

const IMAGE_CREATE_FLAGS: vk::ImageCreateFlags = flags_mask!(ImageCreateFlags {
    SPARSE_BINDING,
    SPARSE_RESIDENCY,
    SPARSE_ALIASED,
    MUTABLE_FORMAT,
    CUBE_COMPATIBLE,
    ALIAS,
    SPLIT_INSTANCE_BIND_REGIONS,
    TYPE_2D_ARRAY_COMPATIBLE,
    BLOCK_TEXEL_VIEW_COMPATIBLE,
    EXTENDED_USAGE,
    PROTECTED,
    DISJOINT,
    SAMPLE_LOCATIONS_COMPATIBLE_DEPTH_EXT,
    SUBSAMPLED_EXT,
    MULTISAMPLED_RENDER_TO_SINGLE_SAMPLED_EXT,
    TYPE_2D_VIEW_COMPATIBLE_EXT,
    DESCRIPTOR_BUFFER_CAPTURE_REPLAY_EXT,
});

const SPARSE_FLAGS: vk::ImageCreateFlags =
    flags_mask!(ImageCreateFlags { SPARSE_BINDING, SPARSE_RESIDENCY, SPARSE_ALIASED });

pub(crate) const IMAGE_USAGE_FLAGS: vk::ImageUsageFlags = flags_mask!(ImageUsageFlags {
    TRANSFER_SRC,
    TRANSFER_DST,
    SAMPLED,
    STORAGE,
    COLOR_ATTACHMENT,
    DEPTH_STENCIL_ATTACHMENT,
    TRANSIENT_ATTACHMENT,
    INPUT_ATTACHMENT,
    FRAGMENT_SHADING_RATE_ATTACHMENT_KHR,
    FRAGMENT_DENSITY_MAP_EXT,
    ATTACHMENT_FEEDBACK_LOOP_EXT,
});

const ATTACHMENT_USAGE: vk::ImageUsageFlags = flags_mask!(ImageUsageFlags {
    COLOR_ATTACHMENT,
    DEPTH_STENCIL_ATTACHMENT,
    TRANSIENT_ATTACHMENT,
    INPUT_ATTACHMENT,
});

pub(crate) const SAMPLE_COUNTS: vk::SampleCountFlags = flags_mask!(SampleCountFlags {
    TYPE_1,
    TYPE_2,
    TYPE_4,
    TYPE_8,
    TYPE_16,
    TYPE_32,
    TYPE_64,
});

pub(crate) const IMAGE_ASPECTS: vk::ImageAspectFlags = flags_mask!(ImageAspectFlags {
    COLOR,
    DEPTH,
    STENCIL,
    METADATA,
    PLANE_0,
    PLANE_1,
    PLANE_2,
    MEMORY_PLANE_0_EXT,
    MEMORY_PLANE_1_EXT,
    MEMORY_PLANE_2_EXT,
    MEMORY_PLANE_3_EXT,
});

pub(crate) const IMAGE_LAYOUT_VALUES: &[RangeInclusive<i32>] = enum_values!(ImageLayout {
    UNDEFINED..=PREINITIALIZED,
    DEPTH_READ_ONLY_STENCIL_ATTACHMENT_OPTIMAL..=DEPTH_ATTACHMENT_STENCIL_READ_ONLY_OPTIMAL,
    DEPTH_ATTACHMENT_OPTIMAL..=STENCIL_READ_ONLY_OPTIMAL,
    READ_ONLY_OPTIMAL..=ATTACHMENT_OPTIMAL,
    PRESENT_SRC_KHR,
    SHARED_PRESENT_KHR,
    FRAGMENT_DENSITY_MAP_OPTIMAL_EXT,
    FRAGMENT_SHADING_RATE_ATTACHMENT_OPTIMAL_KHR,
    ATTACHMENT_FEEDBACK_LOOP_OPTIMAL_EXT,
});

const IMAGE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::ImageFormatListCreateInfo<'static>>(),
        AllowedStruct::of::<vk::ImageStencilUsageCreateInfo<'static>>(),
        AllowedStruct::of::<vk::ExternalMemoryImageCreateInfo<'static>>(),
        AllowedStruct::of::<vk::ImageDrmFormatModifierListCreateInfoEXT<'static>>().requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_image_drm_format_modifier",
            )])]),
        ),
        AllowedStruct::of::<vk::ImageDrmFormatModifierExplicitCreateInfoEXT<'static>>().requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_image_drm_format_modifier",
            )])]),
        ),
        AllowedStruct::of::<vk::ImageSwapchainCreateInfoKHR<'static>>().requires(RequiresOneOf(
            &[RequiresAllOf(&[Requires::DeviceExtension("khr_swapchain")])],
        )),
        AllowedStruct::tag(vk::StructureType::OPAQUE_CAPTURE_DESCRIPTOR_DATA_CREATE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::IMAGE_COMPRESSION_CONTROL_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkImageCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkImageCreateInfo-sType-unique"],
};

const IMAGE_VIEW_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::ImageViewUsageCreateInfo<'static>>(),
        AllowedStruct::of::<vk::SamplerYcbcrConversionInfo<'static>>(),
        AllowedStruct::tag(vk::StructureType::IMAGE_VIEW_ASTC_DECODE_MODE_EXT),
        AllowedStruct::tag(vk::StructureType::IMAGE_VIEW_MIN_LOD_CREATE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::IMAGE_VIEW_SLICED_CREATE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::OPAQUE_CAPTURE_DESCRIPTOR_DATA_CREATE_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkImageViewCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkImageViewCreateInfo-sType-unique"],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCreateImage`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_image(&self, create_info: &vk::ImageCreateInfo<'_>) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let properties = &self.capabilities().properties;
        let &vk::ImageCreateInfo {
            p_next,
            flags,
            image_type,
            format,
            extent,
            mip_levels,
            array_layers,
            samples,
            tiling,
            usage,
            sharing_mode,
            queue_family_index_count,
            p_queue_family_indices,
            initial_layout,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkImageCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &IMAGE_CREATE_INFO_CHAIN,
        ));

        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            IMAGE_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkImageCreateInfo-flags-parameter"],
            &[],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.image_type",
            image_type.as_raw(),
            enum_values!(ImageType { TYPE_1D..=TYPE_3D }),
            &["VUID-VkImageCreateInfo-imageType-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.format",
            format.as_raw(),
            FORMAT_VALUES,
            &["VUID-VkImageCreateInfo-format-parameter"],
        ));
        violations.push_opt(validate_flags(
            "create_info.samples",
            samples.as_raw(),
            SAMPLE_COUNTS.as_raw(),
            FlagPolicy::RequiredSingleBit,
            &["VUID-VkImageCreateInfo-samples-parameter"],
            &["VUID-VkImageCreateInfo-samples-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.tiling",
            tiling.as_raw(),
            enum_values!(ImageTiling { OPTIMAL..=LINEAR, DRM_FORMAT_MODIFIER_EXT }),
            &["VUID-VkImageCreateInfo-tiling-parameter"],
        ));
        violations.push_opt(validate_flags(
            "create_info.usage",
            usage.as_raw(),
            IMAGE_USAGE_FLAGS.as_raw(),
            FlagPolicy::Required,
            &["VUID-VkImageCreateInfo-usage-parameter"],
            &["VUID-VkImageCreateInfo-usage-requiredbitmask"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.sharing_mode",
            sharing_mode.as_raw(),
            enum_values!(SharingMode { EXCLUSIVE..=CONCURRENT }),
            &["VUID-VkImageCreateInfo-sharingMode-parameter"],
        ));

        if sharing_mode == vk::SharingMode::CONCURRENT {
            violations.append(validate_concurrent_sharing(
                "create_info",
                queue_family_index_count,
                p_queue_family_indices,
                &["VUID-VkImageCreateInfo-sharingMode-00941"],
                &["VUID-VkImageCreateInfo-sharingMode-00942"],
            ));
        }

        if !matches!(
            initial_layout,
            vk::ImageLayout::UNDEFINED | vk::ImageLayout::PREINITIALIZED
        ) {
            violations.push(ValidationError {
                context: "create_info.initial_layout".into(),
                problem: format!(
                    "is {:?}, but must be `VK_IMAGE_LAYOUT_UNDEFINED` or \
                    `VK_IMAGE_LAYOUT_PREINITIALIZED`",
                    initial_layout,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-initialLayout-00993"],
                ..Default::default()
            });
        }

        violations.append(validate_image_extent(create_info));

        let is_cube_compatible = flags.contains(vk::ImageCreateFlags::CUBE_COMPATIBLE);

        if is_cube_compatible {
            if image_type != vk::ImageType::TYPE_2D {
                violations.push(ValidationError {
                    context: "create_info.flags".into(),
                    problem: "contains `VK_IMAGE_CREATE_CUBE_COMPATIBLE_BIT`, but `image_type` \
                        is not `VK_IMAGE_TYPE_2D`"
                        .into(),
                    vuids: &["VUID-VkImageCreateInfo-flags-00949"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            } else {
                if extent.width != extent.height {
                    violations.push(ValidationError {
                        context: "create_info.extent".into(),
                        problem: format!(
                            "has a width of {} and a height of {}, but `flags` contains \
                            `VK_IMAGE_CREATE_CUBE_COMPATIBLE_BIT`, which needs them to be equal",
                            extent.width, extent.height,
                        )
                        .into(),
                        vuids: &["VUID-VkImageCreateInfo-imageType-00954"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if array_layers < 6 {
                    violations.push(ValidationError {
                        context: "create_info.array_layers".into(),
                        problem: format!(
                            "is {}, but `flags` contains `VK_IMAGE_CREATE_CUBE_COMPATIBLE_BIT`, \
                            which needs at least 6",
                            array_layers,
                        )
                        .into(),
                        vuids: &["VUID-VkImageCreateInfo-imageType-00954"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }
            }
        }

        if flags.contains(vk::ImageCreateFlags::TYPE_2D_ARRAY_COMPATIBLE)
            && image_type != vk::ImageType::TYPE_3D
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_IMAGE_CREATE_2D_ARRAY_COMPATIBLE_BIT`, but `image_type` \
                    is not `VK_IMAGE_TYPE_3D`"
                    .into(),
                vuids: &["VUID-VkImageCreateInfo-flags-00950"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if samples != vk::SampleCountFlags::TYPE_1
            && (image_type != vk::ImageType::TYPE_2D
                || is_cube_compatible
                || mip_levels != 1
                || tiling != vk::ImageTiling::OPTIMAL)
        {
            violations.push(ValidationError {
                context: "create_info.samples".into(),
                problem: "is not `VK_SAMPLE_COUNT_1_BIT`, but the image is not a 2D, \
                    non-cube-compatible, single mip level image with optimal tiling"
                    .into(),
                vuids: &["VUID-VkImageCreateInfo-samples-02257"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        violations.append(validate_image_sparse_flags(create_info, features));
        violations.append(validate_image_format_class(create_info));
        violations.append(validate_image_usage(create_info, properties));

        if let Some(format_list) = find_in_chain::<vk::ImageFormatListCreateInfo<'_>>(p_next) {
            violations.append(validate_array(
                "create_info.p_next.view_format_count",
                "create_info.p_next.p_view_formats",
                format_list.view_format_count,
                format_list.p_view_formats,
                ArrayRules {
                    count_required: false,
                    array_required: true,
                    count_vuids: &[],
                    array_vuids: &["VUID-VkImageFormatListCreateInfo-pViewFormats-parameter"],
                },
            ));

            if format_list.view_format_count > 1
                && !flags.contains(vk::ImageCreateFlags::MUTABLE_FORMAT)
            {
                violations.push(ValidationError {
                    context: "create_info.p_next.view_format_count".into(),
                    problem: format!(
                        "is {}, but `create_info.flags` does not contain \
                        `VK_IMAGE_CREATE_MUTABLE_FORMAT_BIT`",
                        format_list.view_format_count,
                    )
                    .into(),
                    vuids: &["VUID-VkImageCreateInfo-flags-04738"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        if let Some(external) = find_in_chain::<vk::ExternalMemoryImageCreateInfo<'_>>(p_next) {
            violations.push_opt(validate_flags(
                "create_info.p_next.handle_types",
                external.handle_types.as_raw(),
                EXTERNAL_MEMORY_HANDLE_TYPES.as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkExternalMemoryImageCreateInfo-handleTypes-parameter"],
                &[],
            ));

            if !external.handle_types.is_empty() && initial_layout != vk::ImageLayout::UNDEFINED
            {
                violations.push(ValidationError {
                    context: "create_info.initial_layout".into(),
                    problem: "is not `VK_IMAGE_LAYOUT_UNDEFINED`, but the image can be \
                        imported or exported as external memory"
                        .into(),
                    vuids: &["VUID-VkImageCreateInfo-pNext-01443"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations.append(validate_drm_format_modifier(create_info));

        violations
    }

    /// Validates the arguments of `vkCreateImageView`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_image_view(
        &self,
        create_info: &vk::ImageViewCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::ImageViewCreateInfo {
            p_next,
            flags,
            image,
            view_type,
            format,
            components,
            subresource_range,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkImageViewCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &IMAGE_VIEW_CREATE_INFO_CHAIN,
        ));

        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            flags_mask!(ImageViewCreateFlags {
                FRAGMENT_DENSITY_MAP_DYNAMIC_EXT,
                FRAGMENT_DENSITY_MAP_DEFERRED_EXT,
                DESCRIPTOR_BUFFER_CAPTURE_REPLAY_EXT,
            })
            .as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkImageViewCreateInfo-flags-parameter"],
            &[],
        ));
        violations.push_opt(validate_required_handle(
            "create_info.image",
            image,
            &["VUID-VkImageViewCreateInfo-image-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.view_type",
            view_type.as_raw(),
            enum_values!(ImageViewType { TYPE_1D..=CUBE_ARRAY }),
            &["VUID-VkImageViewCreateInfo-viewType-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.format",
            format.as_raw(),
            FORMAT_VALUES,
            &["VUID-VkImageViewCreateInfo-format-parameter"],
        ));

        let swizzles: [(&'static str, vk::ComponentSwizzle, &'static [&'static str]); 4] = [
            ("create_info.components.r", components.r, &["VUID-VkComponentMapping-r-parameter"]),
            ("create_info.components.g", components.g, &["VUID-VkComponentMapping-g-parameter"]),
            ("create_info.components.b", components.b, &["VUID-VkComponentMapping-b-parameter"]),
            ("create_info.components.a", components.a, &["VUID-VkComponentMapping-a-parameter"]),
        ];

        for (context, swizzle, vuids) in swizzles {
            violations.push_opt(validate_ranged_enum(
                context,
                swizzle.as_raw(),
                enum_values!(ComponentSwizzle { IDENTITY..=A }),
                vuids,
            ));
        }

        violations.append(
            validate_subresource_range(&subresource_range)
                .add_context("create_info.subresource_range"),
        );

        let layer_count = subresource_range.layer_count;
        let explicit_layers = layer_count != vk::REMAINING_ARRAY_LAYERS;

        match view_type {
            vk::ImageViewType::TYPE_1D | vk::ImageViewType::TYPE_2D | vk::ImageViewType::TYPE_3D
                if explicit_layers && layer_count != 1 =>
            {
                violations.push(ValidationError {
                    context: "create_info.subresource_range.layer_count".into(),
                    problem: format!(
                        "is {}, but `view_type` is {:?}, which has a single layer",
                        layer_count, view_type,
                    )
                    .into(),
                    vuids: &["VUID-VkImageViewCreateInfo-imageViewType-04973"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
            vk::ImageViewType::CUBE if explicit_layers && layer_count != 6 => {
                violations.push(ValidationError {
                    context: "create_info.subresource_range.layer_count".into(),
                    problem: format!(
                        "is {}, but `view_type` is `VK_IMAGE_VIEW_TYPE_CUBE`, which needs 6",
                        layer_count,
                    )
                    .into(),
                    vuids: &["VUID-VkImageViewCreateInfo-viewType-02960"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
            vk::ImageViewType::CUBE_ARRAY => {
                if !features.image_cube_array {
                    violations.push(ValidationError {
                        context: "create_info.view_type".into(),
                        problem: "is `VK_IMAGE_VIEW_TYPE_CUBE_ARRAY`".into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("image_cube_array"),
                        ])]),
                        vuids: &["VUID-VkImageViewCreateInfo-viewType-01004"],
                        kind: ViolationKind::RequirementNotMet,
                    });
                }

                if explicit_layers && layer_count % 6 != 0 {
                    violations.push(ValidationError {
                        context: "create_info.subresource_range.layer_count".into(),
                        problem: format!(
                            "is {}, but `view_type` is `VK_IMAGE_VIEW_TYPE_CUBE_ARRAY`, which \
                            needs a multiple of 6",
                            layer_count,
                        )
                        .into(),
                        vuids: &["VUID-VkImageViewCreateInfo-viewType-02961"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }
            }
            _ => (),
        }

        if let Some(usage) = find_in_chain::<vk::ImageViewUsageCreateInfo<'_>>(p_next) {
            violations.push_opt(validate_flags(
                "create_info.p_next.usage",
                usage.usage.as_raw(),
                IMAGE_USAGE_FLAGS.as_raw(),
                FlagPolicy::Required,
                &["VUID-VkImageViewUsageCreateInfo-usage-parameter"],
                &["VUID-VkImageViewUsageCreateInfo-usage-requiredbitmask"],
            ));
        }

        match find_in_chain::<vk::SamplerYcbcrConversionInfo<'_>>(p_next) {
            Some(conversion_info) => {
                violations.push_opt(validate_required_handle(
                    "create_info.p_next.conversion",
                    conversion_info.conversion,
                    &["VUID-VkSamplerYcbcrConversionInfo-conversion-parameter"],
                ));
            }
            None if format::requires_ycbcr_conversion(format) => {
                violations.push(ValidationError {
                    context: "create_info.p_next".into(),
                    problem: format!(
                        "does not include a `VkSamplerYcbcrConversionInfo` structure, but \
                        `format` is {:?}, which needs a sampler YCbCr conversion",
                        format,
                    )
                    .into(),
                    vuids: &["VUID-VkImageViewCreateInfo-format-06415"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                });
            }
            None => (),
        }

        violations
    }
}

/// Checks an image subresource range on its own.
pub(crate) fn validate_subresource_range(range: &vk::ImageSubresourceRange) -> Violations {
    let mut violations = Violations::new();

    violations.push_opt(validate_flags(
        "aspect_mask",
        range.aspect_mask.as_raw(),
        IMAGE_ASPECTS.as_raw(),
        FlagPolicy::Required,
        &["VUID-VkImageSubresourceRange-aspectMask-parameter"],
        &["VUID-VkImageSubresourceRange-aspectMask-requiredbitmask"],
    ));

    if range.aspect_mask.contains(vk::ImageAspectFlags::COLOR)
        && range.aspect_mask != vk::ImageAspectFlags::COLOR
    {
        violations.push(ValidationError {
            context: "aspect_mask".into(),
            problem: "contains `VK_IMAGE_ASPECT_COLOR_BIT` together with another aspect".into(),
            vuids: &["VUID-VkImageSubresourceRange-aspectMask-00167"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if range.aspect_mask.contains(vk::ImageAspectFlags::METADATA) {
        violations.push(ValidationError {
            context: "aspect_mask".into(),
            problem: "contains `VK_IMAGE_ASPECT_METADATA_BIT`".into(),
            vuids: &["VUID-VkImageSubresourceRange-aspectMask-00168"],
            ..Default::default()
        });
    }

    if range.level_count == 0 {
        violations.push(ValidationError {
            context: "level_count".into(),
            problem: "is zero".into(),
            vuids: &["VUID-VkImageSubresourceRange-levelCount-01720"],
            ..Default::default()
        });
    }

    if range.layer_count == 0 {
        violations.push(ValidationError {
            context: "layer_count".into(),
            problem: "is zero".into(),
            vuids: &["VUID-VkImageSubresourceRange-layerCount-01721"],
            ..Default::default()
        });
    }

    violations
}

fn validate_image_extent(create_info: &vk::ImageCreateInfo<'_>) -> Violations {
    let mut violations = Violations::new();
    let vk::Extent3D {
        width,
        height,
        depth,
    } = create_info.extent;

    let zero_checks: [(&'static str, u32, &'static [&'static str]); 5] = [
        ("create_info.extent.width", width, &["VUID-VkImageCreateInfo-extent-00944"]),
        ("create_info.extent.height", height, &["VUID-VkImageCreateInfo-extent-00945"]),
        ("create_info.extent.depth", depth, &["VUID-VkImageCreateInfo-extent-00946"]),
        (
            "create_info.mip_levels",
            create_info.mip_levels,
            &["VUID-VkImageCreateInfo-mipLevels-00947"],
        ),
        (
            "create_info.array_layers",
            create_info.array_layers,
            &["VUID-VkImageCreateInfo-arrayLayers-00948"],
        ),
    ];

    for (context, value, vuids) in zero_checks {
        if value == 0 {
            violations.push(ValidationError {
                context: context.into(),
                problem: "is zero".into(),
                vuids,
                ..Default::default()
            });
        }
    }

    match create_info.image_type {
        vk::ImageType::TYPE_1D if height != 1 || depth != 1 => {
            violations.push(ValidationError {
                context: "create_info.extent".into(),
                problem: format!(
                    "has a height of {} and a depth of {}, but `image_type` is \
                    `VK_IMAGE_TYPE_1D`, which needs both to be 1",
                    height, depth,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-imageType-00956"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }
        vk::ImageType::TYPE_2D if depth != 1 => {
            violations.push(ValidationError {
                context: "create_info.extent.depth".into(),
                problem: format!(
                    "is {}, but `image_type` is `VK_IMAGE_TYPE_2D`, which needs it to be 1",
                    depth,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-imageType-00957"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }
        vk::ImageType::TYPE_3D if create_info.array_layers != 1 => {
            violations.push(ValidationError {
                context: "create_info.array_layers".into(),
                problem: format!(
                    "is {}, but `image_type` is `VK_IMAGE_TYPE_3D`, which needs it to be 1",
                    create_info.array_layers,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-imageType-00961"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }
        _ => (),
    }

    let max_dimension = width.max(height).max(depth);

    if max_dimension != 0 {
        let max_mip_levels = max_dimension.ilog2() + 1;

        if create_info.mip_levels > max_mip_levels {
            violations.push(ValidationError {
                context: "create_info.mip_levels".into(),
                problem: format!(
                    "is {}, but an image with a largest dimension of {} has at most {} mip \
                    levels",
                    create_info.mip_levels, max_dimension, max_mip_levels,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-mipLevels-00958"],
                ..Default::default()
            });
        }
    }

    violations
}

fn validate_image_sparse_flags(
    create_info: &vk::ImageCreateInfo<'_>,
    features: &crate::features::DeviceFeatures,
) -> Violations {
    let mut violations = Violations::new();
    let flags = create_info.flags;

    if !flags.intersects(SPARSE_FLAGS) {
        return violations;
    }

    if flags.contains(vk::ImageCreateFlags::SPARSE_BINDING) && !features.sparse_binding {
        violations.push(ValidationError {
            context: "create_info.flags".into(),
            problem: "contains `VK_IMAGE_CREATE_SPARSE_BINDING_BIT`".into(),
            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                "sparse_binding",
            )])]),
            vuids: &["VUID-VkImageCreateInfo-flags-00969"],
            kind: ViolationKind::RequirementNotMet,
        });
    }

    if flags.intersects(vk::ImageCreateFlags::SPARSE_RESIDENCY | vk::ImageCreateFlags::SPARSE_ALIASED)
        && !flags.contains(vk::ImageCreateFlags::SPARSE_BINDING)
    {
        violations.push(ValidationError {
            context: "create_info.flags".into(),
            problem: "contains `VK_IMAGE_CREATE_SPARSE_RESIDENCY_BIT` or \
                `VK_IMAGE_CREATE_SPARSE_ALIASED_BIT`, but not \
                `VK_IMAGE_CREATE_SPARSE_BINDING_BIT`"
                .into(),
            vuids: &["VUID-VkImageCreateInfo-flags-00987"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if flags.contains(vk::ImageCreateFlags::SPARSE_RESIDENCY) {
        if create_info.tiling == vk::ImageTiling::LINEAR {
            violations.push(ValidationError {
                context: "create_info.tiling".into(),
                problem: "is `VK_IMAGE_TILING_LINEAR`, but `flags` contains \
                    `VK_IMAGE_CREATE_SPARSE_RESIDENCY_BIT`"
                    .into(),
                vuids: &["VUID-VkImageCreateInfo-tiling-04121"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        match create_info.image_type {
            vk::ImageType::TYPE_2D if !features.sparse_residency_image2d => {
                violations.push(ValidationError {
                    context: "create_info.flags".into(),
                    problem: "contains `VK_IMAGE_CREATE_SPARSE_RESIDENCY_BIT` for a 2D image"
                        .into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "sparse_residency_image2d",
                    )])]),
                    vuids: &["VUID-VkImageCreateInfo-imageType-00971"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
            vk::ImageType::TYPE_3D if !features.sparse_residency_image3d => {
                violations.push(ValidationError {
                    context: "create_info.flags".into(),
                    problem: "contains `VK_IMAGE_CREATE_SPARSE_RESIDENCY_BIT` for a 3D image"
                        .into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "sparse_residency_image3d",
                    )])]),
                    vuids: &["VUID-VkImageCreateInfo-imageType-00972"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
            _ => (),
        }
    }

    if flags.contains(vk::ImageCreateFlags::SPARSE_ALIASED) && !features.sparse_residency_aliased {
        violations.push(ValidationError {
            context: "create_info.flags".into(),
            problem: "contains `VK_IMAGE_CREATE_SPARSE_ALIASED_BIT`".into(),
            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                "sparse_residency_aliased",
            )])]),
            vuids: &["VUID-VkImageCreateInfo-flags-01924"],
            kind: ViolationKind::RequirementNotMet,
        });
    }

    if flags.contains(vk::ImageCreateFlags::PROTECTED) {
        violations.push(ValidationError {
            context: "create_info.flags".into(),
            problem: "contains `VK_IMAGE_CREATE_PROTECTED_BIT` together with a sparse flag"
                .into(),
            vuids: &["VUID-VkImageCreateInfo-None-01891"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

/// Checks the rules that depend on the class of the format.
fn validate_image_format_class(create_info: &vk::ImageCreateInfo<'_>) -> Violations {
    let mut violations = Violations::new();
    let format = create_info.format;

    if format == vk::Format::UNDEFINED {
        return violations;
    }

    if let Some(chroma_sampling) = format::chroma_sampling(format) {
        if chroma_sampling.subsampled_x() && create_info.extent.width % 2 != 0 {
            violations.push(ValidationError {
                context: "create_info.extent.width".into(),
                problem: format!(
                    "is {}, but `format` is {:?}, which has horizontally subsampled chroma \
                    and needs a multiple of 2",
                    create_info.extent.width, format,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-format-04712"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if chroma_sampling.subsampled_y() && create_info.extent.height % 2 != 0 {
            violations.push(ValidationError {
                context: "create_info.extent.height".into(),
                problem: format!(
                    "is {}, but `format` is {:?}, which has vertically subsampled chroma and \
                    needs a multiple of 2",
                    create_info.extent.height, format,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-format-04713"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if create_info.mip_levels != 1 {
            violations.push(ValidationError {
                context: "create_info.mip_levels".into(),
                problem: format!(
                    "is {}, but `format` is {:?}, which needs a sampler YCbCr conversion",
                    create_info.mip_levels, format,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-format-06410"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if create_info.samples != vk::SampleCountFlags::TYPE_1 {
            violations.push(ValidationError {
                context: "create_info.samples".into(),
                problem: format!(
                    "is not `VK_SAMPLE_COUNT_1_BIT`, but `format` is {:?}, which needs a \
                    sampler YCbCr conversion",
                    format,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-format-06411"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if create_info.image_type != vk::ImageType::TYPE_2D {
            violations.push(ValidationError {
                context: "create_info.image_type".into(),
                problem: format!(
                    "is not `VK_IMAGE_TYPE_2D`, but `format` is {:?}, which needs a sampler \
                    YCbCr conversion",
                    format,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-format-06412"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }
    }

    if create_info.flags.contains(vk::ImageCreateFlags::DISJOINT)
        && !create_info.flags.contains(vk::ImageCreateFlags::ALIAS)
        && format::plane_count(format) == 1
    {
        violations.push(ValidationError {
            context: "create_info.flags".into(),
            problem: format!(
                "contains `VK_IMAGE_CREATE_DISJOINT_BIT`, but `format` is {:?}, which is not \
                multi-planar",
                format,
            )
            .into(),
            vuids: &["VUID-VkImageCreateInfo-format-01577"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    let is_depth_stencil = format::is_depth_or_stencil(format);

    if is_depth_stencil && create_info.usage.contains(vk::ImageUsageFlags::COLOR_ATTACHMENT) {
        violations.push(ValidationError {
            context: "create_info.usage".into(),
            problem: format!(
                "contains `VK_IMAGE_USAGE_COLOR_ATTACHMENT_BIT`, but `format` is {:?}, which \
                is a depth/stencil format",
                format,
            )
            .into(),
            vuids: &["VUID-VkImageCreateInfo-imageCreateFormatFeatures-02260"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if !is_depth_stencil
        && create_info
            .usage
            .contains(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
    {
        violations.push(ValidationError {
            context: "create_info.usage".into(),
            problem: format!(
                "contains `VK_IMAGE_USAGE_DEPTH_STENCIL_ATTACHMENT_BIT`, but `format` is {:?}, \
                which is not a depth/stencil format",
                format,
            )
            .into(),
            vuids: &["VUID-VkImageCreateInfo-imageCreateFormatFeatures-02260"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

unsafe fn validate_image_usage(
    create_info: &vk::ImageCreateInfo<'_>,
    properties: &crate::properties::DeviceProperties,
) -> Violations {
    let mut violations = Violations::new();
    let usage = create_info.usage;

    if usage.contains(vk::ImageUsageFlags::TRANSIENT_ATTACHMENT) {
        let allowed = vk::ImageUsageFlags::TRANSIENT_ATTACHMENT
            | vk::ImageUsageFlags::COLOR_ATTACHMENT
            | vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
            | vk::ImageUsageFlags::INPUT_ATTACHMENT;

        if !allowed.contains(usage) {
            violations.push(ValidationError {
                context: "create_info.usage".into(),
                problem: "contains `VK_IMAGE_USAGE_TRANSIENT_ATTACHMENT_BIT` together with a \
                    usage that is not an attachment usage"
                    .into(),
                vuids: &["VUID-VkImageCreateInfo-usage-00963"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if !usage.intersects(allowed & !vk::ImageUsageFlags::TRANSIENT_ATTACHMENT) {
            violations.push(ValidationError {
                context: "create_info.usage".into(),
                problem: "contains `VK_IMAGE_USAGE_TRANSIENT_ATTACHMENT_BIT`, but no \
                    attachment usage"
                    .into(),
                vuids: &["VUID-VkImageCreateInfo-usage-00966"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }
    }

    if usage.intersects(ATTACHMENT_USAGE) {
        if create_info.extent.width > properties.max_framebuffer_width {
            violations.push(ValidationError {
                context: "create_info.extent.width".into(),
                problem: format!(
                    "is {}, which is greater than the `max_framebuffer_width` limit ({}), but \
                    `usage` contains an attachment usage",
                    create_info.extent.width, properties.max_framebuffer_width,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-usage-00964"],
                ..Default::default()
            });
        }

        if create_info.extent.height > properties.max_framebuffer_height {
            violations.push(ValidationError {
                context: "create_info.extent.height".into(),
                problem: format!(
                    "is {}, which is greater than the `max_framebuffer_height` limit ({}), but \
                    `usage` contains an attachment usage",
                    create_info.extent.height, properties.max_framebuffer_height,
                )
                .into(),
                vuids: &["VUID-VkImageCreateInfo-usage-00965"],
                ..Default::default()
            });
        }
    }

    let Some(stencil_usage) =
        find_in_chain::<vk::ImageStencilUsageCreateInfo<'_>>(create_info.p_next)
    else {
        return violations;
    };
    let stencil_usage = stencil_usage.stencil_usage;

    violations.push_opt(validate_flags(
        "create_info.p_next.stencil_usage",
        stencil_usage.as_raw(),
        IMAGE_USAGE_FLAGS.as_raw(),
        FlagPolicy::Required,
        &["VUID-VkImageStencilUsageCreateInfo-stencilUsage-parameter"],
        &["VUID-VkImageStencilUsageCreateInfo-stencilUsage-requiredbitmask"],
    ));

    if stencil_usage.contains(vk::ImageUsageFlags::TRANSIENT_ATTACHMENT)
        && !(vk::ImageUsageFlags::TRANSIENT_ATTACHMENT
            | vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
            | vk::ImageUsageFlags::INPUT_ATTACHMENT)
            .contains(stencil_usage)
    {
        violations.push(ValidationError {
            context: "create_info.p_next.stencil_usage".into(),
            problem: "contains `VK_IMAGE_USAGE_TRANSIENT_ATTACHMENT_BIT` together with a usage \
                other than `VK_IMAGE_USAGE_DEPTH_STENCIL_ATTACHMENT_BIT` or \
                `VK_IMAGE_USAGE_INPUT_ATTACHMENT_BIT`"
                .into(),
            vuids: &["VUID-VkImageStencilUsageCreateInfo-stencilUsage-02539"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if format::has_stencil(create_info.format) {
        let agreement: [(vk::ImageUsageFlags, &'static str, [&'static [&'static str]; 2]); 2] = [
            (
                vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
                "VK_IMAGE_USAGE_DEPTH_STENCIL_ATTACHMENT_BIT",
                [
                    &["VUID-VkImageCreateInfo-format-02795"],
                    &["VUID-VkImageCreateInfo-format-02796"],
                ],
            ),
            (
                vk::ImageUsageFlags::TRANSIENT_ATTACHMENT,
                "VK_IMAGE_USAGE_TRANSIENT_ATTACHMENT_BIT",
                [
                    &["VUID-VkImageCreateInfo-format-02797"],
                    &["VUID-VkImageCreateInfo-format-02798"],
                ],
            ),
        ];

        for (bit, name, [vuids_missing, vuids_extra]) in agreement {
            match (usage.contains(bit), stencil_usage.contains(bit)) {
                (true, false) => violations.push(ValidationError {
                    context: "create_info.p_next.stencil_usage".into(),
                    problem: format!(
                        "does not contain `{}`, but `create_info.usage` does",
                        name,
                    )
                    .into(),
                    vuids: vuids_missing,
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                }),
                (false, true) => violations.push(ValidationError {
                    context: "create_info.p_next.stencil_usage".into(),
                    problem: format!(
                        "contains `{}`, but `create_info.usage` does not",
                        name,
                    )
                    .into(),
                    vuids: vuids_extra,
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                }),
                _ => (),
            }
        }
    }

    violations
}

unsafe fn validate_drm_format_modifier(create_info: &vk::ImageCreateInfo<'_>) -> Violations {
    let mut violations = Violations::new();
    let p_next = create_info.p_next;
    let has_list = chain_contains::<vk::ImageDrmFormatModifierListCreateInfoEXT<'_>>(p_next);
    let has_explicit =
        chain_contains::<vk::ImageDrmFormatModifierExplicitCreateInfoEXT<'_>>(p_next);

    if create_info.tiling == vk::ImageTiling::DRM_FORMAT_MODIFIER_EXT {
        if has_list == has_explicit {
            violations.push(ValidationError {
                context: "create_info.p_next".into(),
                problem: "`tiling` is `VK_IMAGE_TILING_DRM_FORMAT_MODIFIER_EXT`, but the chain \
                    does not include exactly one of `VkImageDrmFormatModifierListCreateInfoEXT` \
                    and `VkImageDrmFormatModifierExplicitCreateInfoEXT`"
                    .into(),
                vuids: &["VUID-VkImageCreateInfo-tiling-02261"],
                kind: if has_list {
                    ViolationKind::IllegalCombination
                } else {
                    ViolationKind::MissingCompanion
                },
                ..Default::default()
            });
        }

        if create_info
            .flags
            .contains(vk::ImageCreateFlags::MUTABLE_FORMAT)
            && find_in_chain::<vk::ImageFormatListCreateInfo<'_>>(p_next)
                .map_or(true, |list| list.view_format_count == 0)
        {
            violations.push(ValidationError {
                context: "create_info.p_next".into(),
                problem: "`tiling` is `VK_IMAGE_TILING_DRM_FORMAT_MODIFIER_EXT` and `flags` \
                    contains `VK_IMAGE_CREATE_MUTABLE_FORMAT_BIT`, but the chain does not \
                    include a non-empty `VkImageFormatListCreateInfo`"
                    .into(),
                vuids: &["VUID-VkImageCreateInfo-tiling-02353"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }
    } else if has_list || has_explicit {
        violations.push(ValidationError {
            context: "create_info.p_next".into(),
            problem: "includes a DRM format modifier structure, but `tiling` is not \
                `VK_IMAGE_TILING_DRM_FORMAT_MODIFIER_EXT`"
                .into(),
            vuids: &["VUID-VkImageCreateInfo-pNext-02262"],
            kind: ViolationKind::ExtraneousCompanion,
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::{link, test_capabilities, test_validator, test_validator_with};
    use ash::vk::{self, Handle};
    use std::ptr;

    fn image_info() -> vk::ImageCreateInfo<'static> {
        vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(vk::Format::R8G8B8A8_UNORM)
            .extent(vk::Extent3D {
                width: 256,
                height: 256,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .usage(vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::COLOR_ATTACHMENT)
    }

    #[test]
    fn valid_image() {
        let validator = test_validator();
        let violations = unsafe { validator.validate_create_image(&image_info()) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn one_dimensional_image_with_height() {
        let validator = test_validator();
        let create_info = image_info().image_type(vk::ImageType::TYPE_1D).extent(vk::Extent3D {
            width: 64,
            height: 2,
            depth: 1,
        });

        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-imageType-00956");
    }

    #[test]
    fn cube_compatible_with_three_layers() {
        let validator = test_validator();
        let create_info = image_info()
            .flags(vk::ImageCreateFlags::CUBE_COMPATIBLE)
            .extent(vk::Extent3D {
                width: 4,
                height: 4,
                depth: 1,
            })
            .array_layers(3);

        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(violations[0].context, "create_info.array_layers");
        assert_vuid!(violations, "VUID-VkImageCreateInfo-imageType-00954");

        let create_info = create_info.array_layers(6).extent(vk::Extent3D {
            width: 4,
            height: 8,
            depth: 1,
        });
        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(violations[0].context, "create_info.extent");
    }

    #[test]
    fn zero_extent_and_too_many_mips() {
        let validator = test_validator();
        let create_info = image_info()
            .extent(vk::Extent3D {
                width: 0,
                height: 16,
                depth: 1,
            })
            .mip_levels(0);
        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-extent-00944");
        assert_vuid!(violations, "VUID-VkImageCreateInfo-mipLevels-00947");

        let create_info = image_info().mip_levels(10);
        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-mipLevels-00958");
    }

    #[test]
    fn subsampled_format_needs_even_extent() {
        let validator = test_validator();
        let create_info = image_info()
            .format(vk::Format::G8_B8R8_2PLANE_420_UNORM)
            .usage(vk::ImageUsageFlags::SAMPLED)
            .extent(vk::Extent3D {
                width: 63,
                height: 31,
                depth: 1,
            });

        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-format-04712");
        assert_vuid!(violations, "VUID-VkImageCreateInfo-format-04713");
    }

    #[test]
    fn stencil_usage_must_agree_on_attachment_bits() {
        let validator = test_validator();
        let mut stencil_usage = vk::ImageStencilUsageCreateInfo::default()
            .stencil_usage(vk::ImageUsageFlags::SAMPLED);
        let mut create_info = image_info()
            .format(vk::Format::D24_UNORM_S8_UINT)
            .usage(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT);
        create_info.p_next = link(&mut stencil_usage, ptr::null());

        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-format-02795");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn format_list_without_mutable_format() {
        let validator = test_validator();
        let formats = [vk::Format::R8G8B8A8_UNORM, vk::Format::R8G8B8A8_SRGB];
        let mut format_list = vk::ImageFormatListCreateInfo::default().view_formats(&formats);
        let mut create_info = image_info();
        create_info.p_next = link(&mut format_list, ptr::null());

        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-flags-04738");

        let create_info = create_info.flags(vk::ImageCreateFlags::MUTABLE_FORMAT);
        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn drm_modifier_tiling_needs_one_struct() {
        let mut capabilities = test_capabilities();
        capabilities.enabled_extensions.ext_image_drm_format_modifier = true;
        let validator = test_validator_with(capabilities);
        let create_info = image_info().tiling(vk::ImageTiling::DRM_FORMAT_MODIFIER_EXT);

        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-tiling-02261");
    }

    #[test]
    fn multisampled_image_rules() {
        let validator = test_validator();
        let create_info = image_info()
            .samples(vk::SampleCountFlags::TYPE_4)
            .mip_levels(2);
        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-samples-02257");

        let create_info = image_info()
            .samples(vk::SampleCountFlags::TYPE_4 | vk::SampleCountFlags::TYPE_2);
        let violations = unsafe { validator.validate_create_image(&create_info) };
        assert_vuid!(violations, "VUID-VkImageCreateInfo-samples-parameter");
    }

    fn view_info() -> vk::ImageViewCreateInfo<'static> {
        vk::ImageViewCreateInfo::default()
            .image(vk::Image::from_raw(1))
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(vk::Format::R8G8B8A8_UNORM)
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            })
    }

    #[test]
    fn valid_image_view() {
        let validator = test_validator();
        let violations = unsafe { validator.validate_create_image_view(&view_info()) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn cube_view_layers() {
        let validator = test_validator();
        let create_info = view_info()
            .view_type(vk::ImageViewType::CUBE)
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 4,
            });
        let violations = unsafe { validator.validate_create_image_view(&create_info) };
        assert_vuid!(violations, "VUID-VkImageViewCreateInfo-viewType-02960");

        let create_info = create_info.subresource_range(vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: vk::REMAINING_ARRAY_LAYERS,
        });
        let violations = unsafe { validator.validate_create_image_view(&create_info) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn view_subresource_range_and_handles() {
        let validator = test_validator();
        let create_info = view_info()
            .image(vk::Image::null())
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR | vk::ImageAspectFlags::DEPTH,
                base_mip_level: 0,
                level_count: 0,
                base_array_layer: 0,
                layer_count: 1,
            });

        let violations = unsafe { validator.validate_create_image_view(&create_info) };
        assert_vuid!(violations, "VUID-VkImageViewCreateInfo-image-parameter");
        assert_vuid!(violations, "VUID-VkImageSubresourceRange-aspectMask-00167");
        assert_vuid!(violations, "VUID-VkImageSubresourceRange-levelCount-01720");
        assert!(violations
            .iter()
            .any(|error| error.context == "create_info.subresource_range.level_count"));
    }

    #[test]
    fn ycbcr_view_needs_conversion() {
        let validator = test_validator();
        let create_info = view_info().format(vk::Format::G8_B8R8_2PLANE_420_UNORM);

        let violations = unsafe { validator.validate_create_image_view(&create_info) };
        assert_vuid!(violations, "VUID-VkImageViewCreateInfo-format-06415");
    }
}
