// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for creating samplers.

use crate::{
    chain::{find_in_chain, AllowedStruct, ChainRules},
    format::FORMAT_VALUES,
    predicates::{
        in_inclusive_range, is_true, validate_flags, validate_ranged_enum,
        validate_required_handle, validate_struct_type, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk;
use std::ops::RangeInclusive;

const FILTER_VALUES: &[RangeInclusive<i32>] = enum_values!(Filter { NEAREST..=LINEAR, CUBIC_EXT });

const ADDRESS_MODE_VALUES: &[RangeInclusive<i32>] = enum_values!(SamplerAddressMode {
    REPEAT..=CLAMP_TO_BORDER,
    MIRROR_CLAMP_TO_EDGE,
});

pub(crate) const COMPARE_OP_VALUES: &[RangeInclusive<i32>] =
    enum_values!(CompareOp { NEVER..=ALWAYS });

const SAMPLER_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::SamplerYcbcrConversionInfo<'static>>(),
        AllowedStruct::of::<vk::SamplerReductionModeCreateInfo<'static>>().requires(
            RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]),
                RequiresAllOf(&[Requires::DeviceExtension("ext_sampler_filter_minmax")]),
            ]),
        ),
        AllowedStruct::of::<vk::SamplerCustomBorderColorCreateInfoEXT<'static>>().requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_custom_border_color",
            )])]),
        ),
        AllowedStruct::tag(vk::StructureType::SAMPLER_BORDER_COLOR_COMPONENT_MAPPING_CREATE_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::OPAQUE_CAPTURE_DESCRIPTOR_DATA_CREATE_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkSamplerCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkSamplerCreateInfo-sType-unique"],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCreateSampler`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_sampler(
        &self,
        create_info: &vk::SamplerCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let features = &capabilities.features;
        let properties = &capabilities.properties;
        let &vk::SamplerCreateInfo {
            p_next,
            flags,
            mag_filter,
            min_filter,
            mipmap_mode,
            address_mode_u,
            address_mode_v,
            address_mode_w,
            mip_lod_bias,
            anisotropy_enable,
            max_anisotropy,
            compare_enable,
            compare_op,
            min_lod,
            max_lod,
            border_color,
            unnormalized_coordinates,
            ..
        } = create_info;
        let anisotropy_enable = is_true(anisotropy_enable);
        let compare_enable = is_true(compare_enable);
        let unnormalized_coordinates = is_true(unnormalized_coordinates);

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkSamplerCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &SAMPLER_CREATE_INFO_CHAIN,
        ));

        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            flags_mask!(SamplerCreateFlags {
                SUBSAMPLED_EXT,
                SUBSAMPLED_COARSE_RECONSTRUCTION_EXT,
                DESCRIPTOR_BUFFER_CAPTURE_REPLAY_EXT,
                NON_SEAMLESS_CUBE_MAP_EXT,
            })
            .as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkSamplerCreateInfo-flags-parameter"],
            &[],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.mag_filter",
            mag_filter.as_raw(),
            FILTER_VALUES,
            &["VUID-VkSamplerCreateInfo-magFilter-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.min_filter",
            min_filter.as_raw(),
            FILTER_VALUES,
            &["VUID-VkSamplerCreateInfo-minFilter-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.mipmap_mode",
            mipmap_mode.as_raw(),
            enum_values!(SamplerMipmapMode { NEAREST..=LINEAR }),
            &["VUID-VkSamplerCreateInfo-mipmapMode-parameter"],
        ));

        let address_modes: [(&'static str, vk::SamplerAddressMode, &'static [&'static str]); 3] = [
            (
                "create_info.address_mode_u",
                address_mode_u,
                &["VUID-VkSamplerCreateInfo-addressModeU-parameter"],
            ),
            (
                "create_info.address_mode_v",
                address_mode_v,
                &["VUID-VkSamplerCreateInfo-addressModeV-parameter"],
            ),
            (
                "create_info.address_mode_w",
                address_mode_w,
                &["VUID-VkSamplerCreateInfo-addressModeW-parameter"],
            ),
        ];

        let mirror_clamp_to_edge_supported = capabilities.api_version >= Version::V1_2
            && features.sampler_mirror_clamp_to_edge
            || capabilities
                .enabled_extensions
                .khr_sampler_mirror_clamp_to_edge;

        for (context, address_mode, vuids) in address_modes {
            violations.push_opt(validate_ranged_enum(
                context,
                address_mode.as_raw(),
                ADDRESS_MODE_VALUES,
                vuids,
            ));

            if address_mode == vk::SamplerAddressMode::MIRROR_CLAMP_TO_EDGE
                && !mirror_clamp_to_edge_supported
            {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: "is `VK_SAMPLER_ADDRESS_MODE_MIRROR_CLAMP_TO_EDGE`".into(),
                    requires_one_of: RequiresOneOf(&[
                        RequiresAllOf(&[
                            Requires::APIVersion(Version::V1_2),
                            Requires::DeviceFeature("sampler_mirror_clamp_to_edge"),
                        ]),
                        RequiresAllOf(&[Requires::DeviceExtension(
                            "khr_sampler_mirror_clamp_to_edge",
                        )]),
                    ]),
                    vuids: &["VUID-VkSamplerCreateInfo-addressModeU-01079"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        if !(mip_lod_bias.abs() <= properties.max_sampler_lod_bias) {
            violations.push(ValidationError {
                context: "create_info.mip_lod_bias".into(),
                problem: format!(
                    "is {}, which has a greater magnitude than the `max_sampler_lod_bias` limit \
                    ({})",
                    mip_lod_bias, properties.max_sampler_lod_bias,
                )
                .into(),
                vuids: &["VUID-VkSamplerCreateInfo-mipLodBias-01069"],
                ..Default::default()
            });
        }

        if anisotropy_enable {
            if !features.sampler_anisotropy {
                violations.push(ValidationError {
                    context: "create_info.anisotropy_enable".into(),
                    problem: "is `VK_TRUE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "sampler_anisotropy",
                    )])]),
                    vuids: &["VUID-VkSamplerCreateInfo-anisotropyEnable-01070"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if !in_inclusive_range(max_anisotropy, 1.0, properties.max_sampler_anisotropy) {
                violations.push(ValidationError {
                    context: "create_info.max_anisotropy".into(),
                    problem: format!(
                        "is {}, which is not between 1.0 and the `max_sampler_anisotropy` limit \
                        ({})",
                        max_anisotropy, properties.max_sampler_anisotropy,
                    )
                    .into(),
                    vuids: &["VUID-VkSamplerCreateInfo-anisotropyEnable-01071"],
                    ..Default::default()
                });
            }
        }

        if compare_enable {
            violations.push_opt(validate_ranged_enum(
                "create_info.compare_op",
                compare_op.as_raw(),
                COMPARE_OP_VALUES,
                &["VUID-VkSamplerCreateInfo-compareEnable-01080"],
            ));
        }

        if !(min_lod <= max_lod) {
            violations.push(ValidationError {
                context: "create_info".into(),
                problem: format!(
                    "`min_lod` ({}) is greater than `max_lod` ({})",
                    min_lod, max_lod,
                )
                .into(),
                vuids: &["VUID-VkSamplerCreateInfo-maxLod-01973"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        let uses_border = [address_mode_u, address_mode_v, address_mode_w]
            .contains(&vk::SamplerAddressMode::CLAMP_TO_BORDER);

        if uses_border {
            violations.push_opt(validate_ranged_enum(
                "create_info.border_color",
                border_color.as_raw(),
                enum_values!(BorderColor {
                    FLOAT_TRANSPARENT_BLACK..=INT_OPAQUE_WHITE,
                    FLOAT_CUSTOM_EXT,
                    INT_CUSTOM_EXT,
                }),
                &["VUID-VkSamplerCreateInfo-addressModeU-01078"],
            ));
        }

        violations.append(validate_custom_border_color(
            create_info,
            features.custom_border_colors,
            features.custom_border_color_without_format,
        ));

        if unnormalized_coordinates {
            violations.append(validate_unnormalized_coordinates(create_info));
        }

        if let Some(conversion_info) = find_in_chain::<vk::SamplerYcbcrConversionInfo<'_>>(p_next)
        {
            violations.push_opt(validate_required_handle(
                "create_info.p_next.conversion",
                conversion_info.conversion,
                &["VUID-VkSamplerYcbcrConversionInfo-conversion-parameter"],
            ));

            if address_modes
                .iter()
                .any(|&(_, mode, _)| mode != vk::SamplerAddressMode::CLAMP_TO_EDGE)
            {
                violations.push(ValidationError {
                    context: "create_info".into(),
                    problem: "the sampler uses a YCbCr conversion, but not every address mode is \
                        `VK_SAMPLER_ADDRESS_MODE_CLAMP_TO_EDGE`"
                        .into(),
                    vuids: &["VUID-VkSamplerCreateInfo-addressModeU-01646"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            if anisotropy_enable {
                violations.push(ValidationError {
                    context: "create_info.anisotropy_enable".into(),
                    problem: "is `VK_TRUE`, but the sampler uses a YCbCr conversion".into(),
                    vuids: &["VUID-VkSamplerCreateInfo-None-01647"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            if unnormalized_coordinates {
                violations.push(ValidationError {
                    context: "create_info.unnormalized_coordinates".into(),
                    problem: "is `VK_TRUE`, but the sampler uses a YCbCr conversion".into(),
                    vuids: &["VUID-VkSamplerCreateInfo-None-01650"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        if let Some(reduction) = find_in_chain::<vk::SamplerReductionModeCreateInfo<'_>>(p_next) {
            violations.push_opt(validate_ranged_enum(
                "create_info.p_next.reduction_mode",
                reduction.reduction_mode.as_raw(),
                enum_values!(SamplerReductionMode { WEIGHTED_AVERAGE..=MAX }),
                &["VUID-VkSamplerReductionModeCreateInfo-reductionMode-parameter"],
            ));
        }

        violations
    }
}

unsafe fn validate_custom_border_color(
    create_info: &vk::SamplerCreateInfo<'_>,
    custom_border_colors: bool,
    custom_border_color_without_format: bool,
) -> Violations {
    let mut violations = Violations::new();
    let custom_border_color =
        find_in_chain::<vk::SamplerCustomBorderColorCreateInfoEXT<'_>>(create_info.p_next);

    if matches!(
        create_info.border_color,
        vk::BorderColor::FLOAT_CUSTOM_EXT | vk::BorderColor::INT_CUSTOM_EXT
    ) {
        if !custom_border_colors {
            violations.push(ValidationError {
                context: "create_info.border_color".into(),
                problem: "is a custom border color".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "custom_border_colors",
                )])]),
                vuids: &["VUID-VkSamplerCreateInfo-customBorderColors-04085"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if custom_border_color.is_none() {
            violations.push(ValidationError {
                context: "create_info.p_next".into(),
                problem: "does not include a `VkSamplerCustomBorderColorCreateInfoEXT` \
                    structure, but `border_color` is a custom border color"
                    .into(),
                vuids: &["VUID-VkSamplerCreateInfo-borderColor-04011"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }
    }

    if let Some(custom_border_color) = custom_border_color {
        violations.push_opt(validate_ranged_enum(
            "create_info.p_next.format",
            custom_border_color.format.as_raw(),
            FORMAT_VALUES,
            &["VUID-VkSamplerCustomBorderColorCreateInfoEXT-format-parameter"],
        ));

        if custom_border_color.format == vk::Format::UNDEFINED
            && !custom_border_color_without_format
        {
            violations.push(ValidationError {
                context: "create_info.p_next.format".into(),
                problem: "is `VK_FORMAT_UNDEFINED`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "custom_border_color_without_format",
                )])]),
                vuids: &["VUID-VkSamplerCustomBorderColorCreateInfoEXT-format-04014"],
                kind: ViolationKind::RequirementNotMet,
            });
        }
    }

    violations
}

fn validate_unnormalized_coordinates(create_info: &vk::SamplerCreateInfo<'_>) -> Violations {
    let mut violations = Violations::new();
    let mut push = |problem: &'static str, vuids: &'static [&'static str]| {
        violations.push(ValidationError {
            context: "create_info.unnormalized_coordinates".into(),
            problem: problem.into(),
            vuids,
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    };

    if create_info.min_filter != create_info.mag_filter {
        push(
            "is `VK_TRUE`, but `min_filter` and `mag_filter` are not equal",
            &["VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01072"],
        );
    }

    if create_info.mipmap_mode != vk::SamplerMipmapMode::NEAREST {
        push(
            "is `VK_TRUE`, but `mipmap_mode` is not `VK_SAMPLER_MIPMAP_MODE_NEAREST`",
            &["VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01073"],
        );
    }

    if create_info.min_lod != 0.0 || create_info.max_lod != 0.0 {
        push(
            "is `VK_TRUE`, but `min_lod` and `max_lod` are not both zero",
            &["VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01074"],
        );
    }

    if [create_info.address_mode_u, create_info.address_mode_v]
        .iter()
        .any(|&mode| {
            !matches!(
                mode,
                vk::SamplerAddressMode::CLAMP_TO_EDGE | vk::SamplerAddressMode::CLAMP_TO_BORDER
            )
        })
    {
        push(
            "is `VK_TRUE`, but `address_mode_u` or `address_mode_v` is not a clamping mode",
            &["VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01075"],
        );
    }

    if is_true(create_info.anisotropy_enable) {
        push(
            "is `VK_TRUE`, but `anisotropy_enable` is also `VK_TRUE`",
            &["VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01076"],
        );
    }

    if is_true(create_info.compare_enable) {
        push(
            "is `VK_TRUE`, but `compare_enable` is also `VK_TRUE`",
            &["VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01077"],
        );
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::{
        features::DeviceFeatures,
        tests::{link, test_capabilities, test_validator, test_validator_with},
    };
    use ash::vk;
    use std::ptr;

    fn sampler_info() -> vk::SamplerCreateInfo<'static> {
        vk::SamplerCreateInfo::default()
            .mag_filter(vk::Filter::LINEAR)
            .min_filter(vk::Filter::LINEAR)
            .max_lod(vk::LOD_CLAMP_NONE)
    }

    #[test]
    fn valid_sampler() {
        let validator = test_validator();
        let violations = unsafe { validator.validate_create_sampler(&sampler_info()) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn anisotropy_needs_feature_and_range() {
        let mut capabilities = test_capabilities();
        capabilities.features = DeviceFeatures {
            sampler_anisotropy: false,
            ..DeviceFeatures::all()
        };
        let validator = test_validator_with(capabilities);
        let create_info = sampler_info().anisotropy_enable(true).max_anisotropy(32.0);

        let violations = unsafe { validator.validate_create_sampler(&create_info) };
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-anisotropyEnable-01070");
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-anisotropyEnable-01071");
    }

    #[test]
    fn lod_rules() {
        let validator = test_validator();
        let create_info = sampler_info().min_lod(4.0).max_lod(2.0).mip_lod_bias(-20.0);

        let violations = unsafe { validator.validate_create_sampler(&create_info) };
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-maxLod-01973");
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-mipLodBias-01069");
    }

    #[test]
    fn unnormalized_coordinates_restrictions() {
        let validator = test_validator();
        let create_info = sampler_info()
            .unnormalized_coordinates(true)
            .min_filter(vk::Filter::NEAREST)
            .mipmap_mode(vk::SamplerMipmapMode::LINEAR);

        let violations = unsafe { validator.validate_create_sampler(&create_info) };
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01072");
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01073");
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01074");
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01075");
        assert_no_vuid!(violations, "VUID-VkSamplerCreateInfo-unnormalizedCoordinates-01076");
    }

    #[test]
    fn custom_border_color_needs_struct() {
        let validator = test_validator();
        let create_info = sampler_info()
            .address_mode_u(vk::SamplerAddressMode::CLAMP_TO_BORDER)
            .border_color(vk::BorderColor::FLOAT_CUSTOM_EXT);

        let violations = unsafe { validator.validate_create_sampler(&create_info) };
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-borderColor-04011");

        let mut custom = vk::SamplerCustomBorderColorCreateInfoEXT::default()
            .format(vk::Format::R8G8B8A8_UNORM);
        let mut create_info = create_info;
        create_info.p_next = link(&mut custom, ptr::null());

        let violations = unsafe { validator.validate_create_sampler(&create_info) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn mirror_clamp_to_edge_needs_feature_or_extension() {
        let mut capabilities = test_capabilities();
        capabilities.features.sampler_mirror_clamp_to_edge = false;
        let validator = test_validator_with(capabilities);
        let create_info =
            sampler_info().address_mode_w(vk::SamplerAddressMode::MIRROR_CLAMP_TO_EDGE);

        let violations = unsafe { validator.validate_create_sampler(&create_info) };
        assert_vuid!(violations, "VUID-VkSamplerCreateInfo-addressModeU-01079");
    }
}
