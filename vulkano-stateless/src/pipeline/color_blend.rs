// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Color blend state, including advanced blend operations.

use crate::{
    chain::{find_in_chain, AllowedStruct, ChainRules},
    features::DeviceFeatures,
    predicates::{
        is_true, slice_or_empty, validate_flags, validate_ranged_enum, validate_struct_type,
        FlagPolicy,
    },
    properties::DeviceProperties,
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, ViolationKind,
    Violations,
};
use ash::vk;
use std::ops::RangeInclusive;

const BLEND_FACTOR_VALUES: &[RangeInclusive<i32>] =
    enum_values!(BlendFactor { ZERO..=ONE_MINUS_SRC1_ALPHA });

const BLEND_OP_VALUES: &[RangeInclusive<i32>] =
    enum_values!(BlendOp { ADD..=MAX, ZERO_EXT..=BLUE_EXT });

const LOGIC_OP_VALUES: &[RangeInclusive<i32>] = enum_values!(LogicOp { CLEAR..=SET });

const BLEND_OVERLAP_VALUES: &[RangeInclusive<i32>] =
    enum_values!(BlendOverlapEXT { UNCORRELATED..=CONJOINT });

const COLOR_COMPONENTS: vk::ColorComponentFlags = flags_mask!(ColorComponentFlags { R, G, B, A });

const PIPELINE_COLOR_BLEND_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::PipelineColorBlendAdvancedStateCreateInfoEXT<'static>>().requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_blend_operation_advanced",
            )])]),
        ),
    ],
    unique: true,
    vuids_next: &["VUID-VkPipelineColorBlendStateCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkPipelineColorBlendStateCreateInfo-sType-unique"],
};

/// Returns whether a blend operation is one of the advanced operations.
pub(crate) fn is_advanced_blend_op(op: vk::BlendOp) -> bool {
    (vk::BlendOp::ZERO_EXT.as_raw()..=vk::BlendOp::BLUE_EXT.as_raw()).contains(&op.as_raw())
}

/// Returns whether an advanced blend operation is only supported when
/// `advanced_blend_all_operations` is true.
fn needs_all_operations(op: vk::BlendOp) -> bool {
    matches!(
        op,
        vk::BlendOp::ZERO_EXT
            | vk::BlendOp::SRC_EXT
            | vk::BlendOp::DST_EXT
            | vk::BlendOp::SRC_OVER_EXT
            | vk::BlendOp::DST_OVER_EXT
            | vk::BlendOp::SRC_IN_EXT
            | vk::BlendOp::DST_IN_EXT
            | vk::BlendOp::SRC_OUT_EXT
            | vk::BlendOp::DST_OUT_EXT
            | vk::BlendOp::SRC_ATOP_EXT
            | vk::BlendOp::DST_ATOP_EXT
            | vk::BlendOp::XOR_EXT
            | vk::BlendOp::INVERT_EXT
            | vk::BlendOp::INVERT_RGB_EXT
            | vk::BlendOp::LINEARDODGE_EXT
            | vk::BlendOp::LINEARBURN_EXT
            | vk::BlendOp::VIVIDLIGHT_EXT
            | vk::BlendOp::LINEARLIGHT_EXT
            | vk::BlendOp::PINLIGHT_EXT
            | vk::BlendOp::HARDMIX_EXT
            | vk::BlendOp::PLUS_EXT
            | vk::BlendOp::PLUS_CLAMPED_EXT
            | vk::BlendOp::PLUS_CLAMPED_ALPHA_EXT
            | vk::BlendOp::PLUS_DARKER_EXT
            | vk::BlendOp::MINUS_EXT
            | vk::BlendOp::MINUS_CLAMPED_EXT
            | vk::BlendOp::CONTRAST_EXT
            | vk::BlendOp::INVERT_OVG_EXT
            | vk::BlendOp::RED_EXT
            | vk::BlendOp::GREEN_EXT
            | vk::BlendOp::BLUE_EXT
    )
}

fn is_dual_source_factor(factor: vk::BlendFactor) -> bool {
    matches!(
        factor,
        vk::BlendFactor::SRC1_COLOR
            | vk::BlendFactor::ONE_MINUS_SRC1_COLOR
            | vk::BlendFactor::SRC1_ALPHA
            | vk::BlendFactor::ONE_MINUS_SRC1_ALPHA
    )
}

impl StatelessValidator {
    /// Checks the color blend state of a graphics pipeline.
    ///
    /// `color_attachment_count` is the number of color attachments of the subpass or of the
    /// dynamic rendering info, if it is known.
    pub(crate) unsafe fn validate_color_blend_state(
        &self,
        color_blend_state: &vk::PipelineColorBlendStateCreateInfo<'_>,
        color_attachment_count: Option<u32>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let features = &capabilities.features;
        let properties = &capabilities.properties;
        let &vk::PipelineColorBlendStateCreateInfo {
            p_next,
            flags,
            logic_op_enable,
            logic_op,
            attachment_count,
            p_attachments,
            ..
        } = color_blend_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            color_blend_state,
            &["VUID-VkPipelineColorBlendStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_COLOR_BLEND_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineColorBlendStateCreateInfo-flags-parameter"],
            &[],
        ));

        if is_true(logic_op_enable) {
            if !features.logic_op {
                violations.push(ValidationError {
                    context: "logic_op_enable".into(),
                    problem: "is `VK_TRUE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "logic_op",
                    )])]),
                    vuids: &["VUID-VkPipelineColorBlendStateCreateInfo-logicOpEnable-00606"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            violations.push_opt(validate_ranged_enum(
                "logic_op",
                logic_op.as_raw(),
                LOGIC_OP_VALUES,
                &["VUID-VkPipelineColorBlendStateCreateInfo-logicOpEnable-00607"],
            ));
        }

        if let Some(expected) = color_attachment_count {
            if attachment_count != expected {
                violations.push(ValidationError {
                    context: "attachment_count".into(),
                    problem: format!(
                        "is {}, but the subpass has {} color attachments",
                        attachment_count, expected,
                    )
                    .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-07609"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        if attachment_count != 0 && p_attachments.is_null() {
            violations.push(ValidationError {
                context: "p_attachments".into(),
                problem: "is null, but `attachment_count` is not zero".into(),
                vuids: &["VUID-VkPipelineColorBlendStateCreateInfo-pAttachments-07353"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }

        let attachments = slice_or_empty(p_attachments, attachment_count);

        for (index, attachment) in attachments.iter().enumerate() {
            violations.append_with_context(
                validate_attachment_blend(attachment, index as u32, features, properties),
                || format!("p_attachments[{}]", index),
            );
        }

        if let Some(first) = attachments.first() {
            if !features.independent_blend {
                for (index, attachment) in attachments.iter().enumerate().skip(1) {
                    if !attachment_blend_eq(attachment, first) {
                        violations.push(ValidationError {
                            context: format!("p_attachments[{}]", index).into(),
                            problem: "is not equal to `p_attachments[0]`".into(),
                            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                                Requires::DeviceFeature("independent_blend"),
                            ])]),
                            vuids: &["VUID-VkPipelineColorBlendStateCreateInfo-pAttachments-00605"],
                            kind: ViolationKind::IllegalCombination,
                        });
                    }
                }
            }

            if properties.advanced_blend_independent_blend == Some(false) {
                violations.append(validate_advanced_blend_sameness(attachments));
            }
        }

        if let Some(advanced) =
            find_in_chain::<vk::PipelineColorBlendAdvancedStateCreateInfoEXT<'_>>(p_next)
        {
            violations.append(
                validate_advanced_state(advanced, properties).add_context("p_next"),
            );
        }

        violations
    }
}

fn attachment_blend_eq(
    a: &vk::PipelineColorBlendAttachmentState,
    b: &vk::PipelineColorBlendAttachmentState,
) -> bool {
    a.blend_enable == b.blend_enable
        && a.src_color_blend_factor == b.src_color_blend_factor
        && a.dst_color_blend_factor == b.dst_color_blend_factor
        && a.color_blend_op == b.color_blend_op
        && a.src_alpha_blend_factor == b.src_alpha_blend_factor
        && a.dst_alpha_blend_factor == b.dst_alpha_blend_factor
        && a.alpha_blend_op == b.alpha_blend_op
        && a.color_write_mask == b.color_write_mask
}

fn validate_attachment_blend(
    attachment: &vk::PipelineColorBlendAttachmentState,
    index: u32,
    features: &DeviceFeatures,
    properties: &DeviceProperties,
) -> Violations {
    let mut violations = Violations::new();
    let &vk::PipelineColorBlendAttachmentState {
        blend_enable,
        src_color_blend_factor,
        dst_color_blend_factor,
        color_blend_op,
        src_alpha_blend_factor,
        dst_alpha_blend_factor,
        alpha_blend_op,
        color_write_mask,
    } = attachment;

    violations.push_opt(validate_flags(
        "color_write_mask",
        color_write_mask.as_raw(),
        COLOR_COMPONENTS.as_raw(),
        FlagPolicy::Optional,
        &["VUID-VkPipelineColorBlendAttachmentState-colorWriteMask-parameter"],
        &[],
    ));

    if !is_true(blend_enable) {
        return violations;
    }

    let factors: [(&'static str, vk::BlendFactor, &'static [&'static str], &'static [&'static str]);
        4] = [
        (
            "src_color_blend_factor",
            src_color_blend_factor,
            &["VUID-VkPipelineColorBlendAttachmentState-srcColorBlendFactor-parameter"],
            &["VUID-VkPipelineColorBlendAttachmentState-srcColorBlendFactor-00608"],
        ),
        (
            "dst_color_blend_factor",
            dst_color_blend_factor,
            &["VUID-VkPipelineColorBlendAttachmentState-dstColorBlendFactor-parameter"],
            &["VUID-VkPipelineColorBlendAttachmentState-dstColorBlendFactor-00609"],
        ),
        (
            "src_alpha_blend_factor",
            src_alpha_blend_factor,
            &["VUID-VkPipelineColorBlendAttachmentState-srcAlphaBlendFactor-parameter"],
            &["VUID-VkPipelineColorBlendAttachmentState-srcAlphaBlendFactor-00610"],
        ),
        (
            "dst_alpha_blend_factor",
            dst_alpha_blend_factor,
            &["VUID-VkPipelineColorBlendAttachmentState-dstAlphaBlendFactor-parameter"],
            &["VUID-VkPipelineColorBlendAttachmentState-dstAlphaBlendFactor-00611"],
        ),
    ];

    for (context, factor, vuids_parameter, vuids_dual_source) in factors {
        if let Some(error) = validate_ranged_enum(
            context,
            factor.as_raw(),
            BLEND_FACTOR_VALUES,
            vuids_parameter,
        ) {
            violations.push(error);
        } else if is_dual_source_factor(factor) && !features.dual_src_blend {
            violations.push(ValidationError {
                context: context.into(),
                problem: format!("is {:?}", factor).into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "dual_src_blend",
                )])]),
                vuids: vuids_dual_source,
                kind: ViolationKind::RequirementNotMet,
            });
        }
    }

    violations.push_opt(validate_ranged_enum(
        "color_blend_op",
        color_blend_op.as_raw(),
        BLEND_OP_VALUES,
        &["VUID-VkPipelineColorBlendAttachmentState-colorBlendOp-parameter"],
    ));
    violations.push_opt(validate_ranged_enum(
        "alpha_blend_op",
        alpha_blend_op.as_raw(),
        BLEND_OP_VALUES,
        &["VUID-VkPipelineColorBlendAttachmentState-alphaBlendOp-parameter"],
    ));

    let advanced = is_advanced_blend_op(color_blend_op) || is_advanced_blend_op(alpha_blend_op);

    if !advanced {
        return violations;
    }

    if color_blend_op != alpha_blend_op {
        violations.push(ValidationError {
            context: "alpha_blend_op".into(),
            problem: format!(
                "is {:?}, but `color_blend_op` is {:?}, and one of them is an advanced blend \
                operation",
                alpha_blend_op, color_blend_op,
            )
            .into(),
            vuids: &["VUID-VkPipelineColorBlendAttachmentState-colorBlendOp-01406"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if properties.advanced_blend_all_operations == Some(false)
        && needs_all_operations(color_blend_op)
    {
        violations.push(ValidationError {
            context: "color_blend_op".into(),
            problem: format!(
                "is {:?}, but the `advanced_blend_all_operations` property is false",
                color_blend_op,
            )
            .into(),
            vuids: &["VUID-VkPipelineColorBlendAttachmentState-advancedBlendAllOperations-01409"],
            ..Default::default()
        });
    }

    let max_attachments = properties.advanced_blend_max_color_attachments.unwrap_or(0);

    if index >= max_attachments {
        violations.push(ValidationError {
            context: "color_blend_op".into(),
            problem: format!(
                "is an advanced blend operation, but the attachment index {} is not less than \
                the `advanced_blend_max_color_attachments` limit ({})",
                index, max_attachments,
            )
            .into(),
            vuids: &["VUID-VkPipelineColorBlendAttachmentState-colorBlendOp-01410"],
            ..Default::default()
        });
    }

    violations
}

/// Without `advanced_blend_independent_blend`, every blended attachment that uses an advanced
/// operation must use the same one.
fn validate_advanced_blend_sameness(
    attachments: &[vk::PipelineColorBlendAttachmentState],
) -> Violations {
    let mut violations = Violations::new();
    let mut first: Option<(usize, vk::BlendOp, vk::BlendOp)> = None;

    for (index, attachment) in attachments.iter().enumerate() {
        if !is_true(attachment.blend_enable)
            || !(is_advanced_blend_op(attachment.color_blend_op)
                || is_advanced_blend_op(attachment.alpha_blend_op))
        {
            continue;
        }

        match first {
            None => first = Some((index, attachment.color_blend_op, attachment.alpha_blend_op)),
            Some((first_index, color_op, alpha_op)) => {
                if attachment.color_blend_op != color_op {
                    violations.push(ValidationError {
                        context: format!("p_attachments[{}].color_blend_op", index).into(),
                        problem: format!(
                            "is {:?}, which differs from `p_attachments[{}].color_blend_op` \
                            ({:?}), but the `advanced_blend_independent_blend` property is false",
                            attachment.color_blend_op, first_index, color_op,
                        )
                        .into(),
                        vuids: &["VUID-VkPipelineColorBlendAttachmentState-advancedBlendIndependentBlend-01407"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if attachment.alpha_blend_op != alpha_op {
                    violations.push(ValidationError {
                        context: format!("p_attachments[{}].alpha_blend_op", index).into(),
                        problem: format!(
                            "is {:?}, which differs from `p_attachments[{}].alpha_blend_op` \
                            ({:?}), but the `advanced_blend_independent_blend` property is false",
                            attachment.alpha_blend_op, first_index, alpha_op,
                        )
                        .into(),
                        vuids: &["VUID-VkPipelineColorBlendAttachmentState-advancedBlendIndependentBlend-01408"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }
            }
        }
    }

    violations
}

fn validate_advanced_state(
    advanced: &vk::PipelineColorBlendAdvancedStateCreateInfoEXT<'_>,
    properties: &DeviceProperties,
) -> Violations {
    let mut violations = Violations::new();

    if !is_true(advanced.src_premultiplied)
        && properties.advanced_blend_non_premultiplied_src_color == Some(false)
    {
        violations.push(ValidationError {
            context: "src_premultiplied".into(),
            problem: "is `VK_FALSE`, but the `advanced_blend_non_premultiplied_src_color` \
                property is false"
                .into(),
            vuids: &["VUID-VkPipelineColorBlendAdvancedStateCreateInfoEXT-srcPremultiplied-01424"],
            ..Default::default()
        });
    }

    if !is_true(advanced.dst_premultiplied)
        && properties.advanced_blend_non_premultiplied_dst_color == Some(false)
    {
        violations.push(ValidationError {
            context: "dst_premultiplied".into(),
            problem: "is `VK_FALSE`, but the `advanced_blend_non_premultiplied_dst_color` \
                property is false"
                .into(),
            vuids: &["VUID-VkPipelineColorBlendAdvancedStateCreateInfoEXT-dstPremultiplied-01425"],
            ..Default::default()
        });
    }

    match validate_ranged_enum(
        "blend_overlap",
        advanced.blend_overlap.as_raw(),
        BLEND_OVERLAP_VALUES,
        &["VUID-VkPipelineColorBlendAdvancedStateCreateInfoEXT-blendOverlap-parameter"],
    ) {
        Some(error) => violations.push(error),
        None => {
            if advanced.blend_overlap != vk::BlendOverlapEXT::UNCORRELATED
                && properties.advanced_blend_correlated_overlap == Some(false)
            {
                violations.push(ValidationError {
                    context: "blend_overlap".into(),
                    problem: format!(
                        "is {:?}, but the `advanced_blend_correlated_overlap` property is false",
                        advanced.blend_overlap,
                    )
                    .into(),
                    vuids: &["VUID-VkPipelineColorBlendAdvancedStateCreateInfoEXT-blendOverlap-01426"],
                    ..Default::default()
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::{link, test_capabilities, test_validator, test_validator_with};
    use ash::vk;
    use std::ptr;

    fn blended(op: vk::BlendOp) -> vk::PipelineColorBlendAttachmentState {
        vk::PipelineColorBlendAttachmentState {
            blend_enable: vk::TRUE,
            src_color_blend_factor: vk::BlendFactor::ONE,
            dst_color_blend_factor: vk::BlendFactor::ZERO,
            color_blend_op: op,
            src_alpha_blend_factor: vk::BlendFactor::ONE,
            dst_alpha_blend_factor: vk::BlendFactor::ZERO,
            alpha_blend_op: op,
            color_write_mask: vk::ColorComponentFlags::R
                | vk::ColorComponentFlags::G
                | vk::ColorComponentFlags::B
                | vk::ColorComponentFlags::A,
        }
    }

    #[test]
    fn attachment_count_must_match_subpass() {
        let validator = test_validator();
        let attachments = [blended(vk::BlendOp::ADD)];
        let color_blend_state =
            vk::PipelineColorBlendStateCreateInfo::default().attachments(&attachments);

        let violations =
            unsafe { validator.validate_color_blend_state(&color_blend_state, Some(2)) };
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-renderPass-07609");
        assert_eq!(violations.len(), 1, "{}", violations);

        let violations =
            unsafe { validator.validate_color_blend_state(&color_blend_state, Some(1)) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn independent_blend_needs_feature() {
        let mut capabilities = test_capabilities();
        capabilities.features.independent_blend = false;
        let validator = test_validator_with(capabilities);
        let attachments = [blended(vk::BlendOp::ADD), blended(vk::BlendOp::SUBTRACT)];
        let color_blend_state =
            vk::PipelineColorBlendStateCreateInfo::default().attachments(&attachments);

        let violations =
            unsafe { validator.validate_color_blend_state(&color_blend_state, None) };
        assert_vuid!(violations, "VUID-VkPipelineColorBlendStateCreateInfo-pAttachments-00605");
        assert_eq!(violations[0].context, "p_attachments[1]");

        let attachments = [blended(vk::BlendOp::ADD), blended(vk::BlendOp::ADD)];
        let color_blend_state =
            vk::PipelineColorBlendStateCreateInfo::default().attachments(&attachments);
        let violations =
            unsafe { validator.validate_color_blend_state(&color_blend_state, None) };
        assert_no_vuid!(violations, "VUID-VkPipelineColorBlendStateCreateInfo-pAttachments-00605");
    }

    #[test]
    fn advanced_blend_rules() {
        let validator = test_validator();
        let mut mixed = blended(vk::BlendOp::MULTIPLY_EXT);
        mixed.alpha_blend_op = vk::BlendOp::ADD;
        let attachments = [
            blended(vk::BlendOp::MULTIPLY_EXT),
            mixed,
            blended(vk::BlendOp::SCREEN_EXT),
        ];
        let mut advanced = vk::PipelineColorBlendAdvancedStateCreateInfoEXT::default()
            .src_premultiplied(true)
            .dst_premultiplied(true)
            .blend_overlap(vk::BlendOverlapEXT::CONJOINT);
        let mut color_blend_state =
            vk::PipelineColorBlendStateCreateInfo::default().attachments(&attachments);
        color_blend_state.p_next = link(&mut advanced, ptr::null());

        let violations =
            unsafe { validator.validate_color_blend_state(&color_blend_state, None) };
        assert_vuid!(violations, "VUID-VkPipelineColorBlendAttachmentState-colorBlendOp-01406");
        assert_vuid!(violations, "VUID-VkPipelineColorBlendAttachmentState-colorBlendOp-01410");
        assert_vuid!(
            violations,
            "VUID-VkPipelineColorBlendAttachmentState-advancedBlendIndependentBlend-01407",
        );
        assert_no_vuid!(
            violations,
            "VUID-VkPipelineColorBlendAdvancedStateCreateInfoEXT-blendOverlap-01426",
        );
    }
}
