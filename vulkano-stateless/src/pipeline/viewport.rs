// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Viewports and scissors.
//!
//! The rules for a single viewport or scissor are shared by the pipeline viewport state and by
//! the commands that set viewports and scissors dynamically.

use crate::{
    chain::ChainRules,
    pipeline::dynamic_state::DynamicStates,
    predicates::{
        f32_le_u32, in_inclusive_range, slice_or_empty, sum_exceeds_i32, validate_flags,
        validate_struct_type, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk;

const PIPELINE_VIEWPORT_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkPipelineViewportStateCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkPipelineViewportStateCreateInfo-sType-unique"],
};

/// The VUIDs that a scissor rectangle is checked with. They differ between the places where a
/// scissor can be given.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScissorVuids {
    pub(crate) negative_offset: &'static [&'static str],
    pub(crate) overflow_x: &'static [&'static str],
    pub(crate) overflow_y: &'static [&'static str],
}

pub(crate) const PIPELINE_SCISSOR_VUIDS: ScissorVuids = ScissorVuids {
    negative_offset: &["VUID-VkPipelineViewportStateCreateInfo-x-02821"],
    overflow_x: &["VUID-VkPipelineViewportStateCreateInfo-offset-02822"],
    overflow_y: &["VUID-VkPipelineViewportStateCreateInfo-offset-02823"],
};

/// Checks a scissor rectangle. The sum of offset and extent is computed in 64 bits, so that
/// values that are each valid but overflow together are caught.
pub(crate) fn validate_scissor(scissor: &vk::Rect2D, vuids: ScissorVuids) -> Violations {
    let mut violations = Violations::new();
    let vk::Rect2D { offset, extent } = *scissor;

    if offset.x < 0 || offset.y < 0 {
        violations.push(ValidationError {
            context: "offset".into(),
            problem: format!("is ({}, {}), which is negative", offset.x, offset.y).into(),
            vuids: vuids.negative_offset,
            ..Default::default()
        });
    }

    if sum_exceeds_i32(offset.x, extent.width) {
        violations.push(ValidationError {
            context: "offset.x".into(),
            problem: format!(
                "plus `extent.width` is {} + {}, which overflows a signed 32-bit integer",
                offset.x, extent.width,
            )
            .into(),
            vuids: vuids.overflow_x,
            kind: ViolationKind::ArithmeticOverflow,
            ..Default::default()
        });
    }

    if sum_exceeds_i32(offset.y, extent.height) {
        violations.push(ValidationError {
            context: "offset.y".into(),
            problem: format!(
                "plus `extent.height` is {} + {}, which overflows a signed 32-bit integer",
                offset.y, extent.height,
            )
            .into(),
            vuids: vuids.overflow_y,
            kind: ViolationKind::ArithmeticOverflow,
            ..Default::default()
        });
    }

    violations
}

impl StatelessValidator {
    /// Checks a single viewport against the device limits.
    pub(crate) fn validate_viewport(&self, viewport: &vk::Viewport) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let properties = &capabilities.properties;
        let [max_width, max_height] = properties.max_viewport_dimensions;
        let [bounds_min, bounds_max] = properties.viewport_bounds_range.map(f64::from);
        let &vk::Viewport {
            x,
            y,
            width,
            height,
            min_depth,
            max_depth,
        } = viewport;

        if !(width > 0.0) {
            violations.push(ValidationError {
                context: "width".into(),
                problem: format!("is {}, which is not greater than zero", width).into(),
                vuids: &["VUID-VkViewport-width-01770"],
                ..Default::default()
            });
        } else if !f32_le_u32(width, max_width) {
            violations.push(ValidationError {
                context: "width".into(),
                problem: format!(
                    "is {}, which is greater than the `max_viewport_dimensions[0]` limit ({})",
                    width, max_width,
                )
                .into(),
                vuids: &["VUID-VkViewport-width-01771"],
                ..Default::default()
            });
        }

        let negative_height_allowed = capabilities.api_version >= Version::V1_1
            || capabilities.enabled_extensions.khr_maintenance1
            || capabilities.enabled_extensions.amd_negative_viewport_height;

        if !negative_height_allowed && !(height > 0.0) {
            violations.push(ValidationError {
                context: "height".into(),
                problem: format!("is {}, which is not greater than zero", height).into(),
                requires_one_of: RequiresOneOf(&[
                    RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
                    RequiresAllOf(&[Requires::DeviceExtension("khr_maintenance1")]),
                    RequiresAllOf(&[Requires::DeviceExtension("amd_negative_viewport_height")]),
                ]),
                vuids: &["VUID-VkViewport-apiVersion-07917"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if !f32_le_u32(height.abs(), max_height) {
            violations.push(ValidationError {
                context: "height".into(),
                problem: format!(
                    "is {}, whose absolute value is greater than the \
                    `max_viewport_dimensions[1]` limit ({})",
                    height, max_height,
                )
                .into(),
                vuids: &["VUID-VkViewport-height-01773"],
                ..Default::default()
            });
        }

        // A sum may round in `f64`, but rounding is monotonic and the bounds are `f32` values, so
        // each comparison gives the same result as with exact arithmetic.
        let (x, y, width, height) = (
            f64::from(x),
            f64::from(y),
            f64::from(width),
            f64::from(height),
        );
        let bounds: [(&'static str, f64, bool, &'static [&'static str]); 6] = [
            ("x", x, x >= bounds_min, &["VUID-VkViewport-x-01774"]),
            (
                "x",
                x + width,
                x + width <= bounds_max,
                &["VUID-VkViewport-x-01232"],
            ),
            ("y", y, y >= bounds_min, &["VUID-VkViewport-y-01775"]),
            ("y", y, y <= bounds_max, &["VUID-VkViewport-y-01776"]),
            (
                "y",
                y + height,
                y + height >= bounds_min,
                &["VUID-VkViewport-y-01777"],
            ),
            (
                "y",
                y + height,
                y + height <= bounds_max,
                &["VUID-VkViewport-y-01233"],
            ),
        ];

        for (context, value, in_bounds, vuids) in bounds {
            if !in_bounds {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: format!(
                        "reaches {}, which is outside the `viewport_bounds_range` limit \
                        ([{}, {}])",
                        value, bounds_min, bounds_max,
                    )
                    .into(),
                    vuids,
                    ..Default::default()
                });
            }
        }

        if !capabilities.enabled_extensions.ext_depth_range_unrestricted {
            for (context, depth, vuids) in [
                ("min_depth", min_depth, &["VUID-VkViewport-minDepth-01234"]),
                ("max_depth", max_depth, &["VUID-VkViewport-maxDepth-01235"]),
            ] {
                if !in_inclusive_range(depth, 0.0, 1.0) {
                    violations.push(ValidationError {
                        context: context.into(),
                        problem: format!("is {}, which is not between 0.0 and 1.0", depth)
                            .into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceExtension("ext_depth_range_unrestricted"),
                        ])]),
                        vuids,
                        kind: ViolationKind::RequirementNotMet,
                    });
                }
            }
        }

        violations
    }

    /// Checks the viewport state of a graphics pipeline. Viewports and scissors that are set
    /// dynamically are not read.
    pub(crate) unsafe fn validate_viewport_state(
        &self,
        viewport_state: &vk::PipelineViewportStateCreateInfo<'_>,
        dynamic_states: &DynamicStates,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let properties = &capabilities.properties;
        let &vk::PipelineViewportStateCreateInfo {
            p_next,
            flags,
            viewport_count,
            p_viewports,
            scissor_count,
            p_scissors,
            ..
        } = viewport_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            viewport_state,
            &["VUID-VkPipelineViewportStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_VIEWPORT_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineViewportStateCreateInfo-flags-zerobitmask"],
            &[],
        ));

        let viewport_with_count = dynamic_states.contains(vk::DynamicState::VIEWPORT_WITH_COUNT);
        let scissor_with_count = dynamic_states.contains(vk::DynamicState::SCISSOR_WITH_COUNT);

        let counts: [(
            &'static str,
            u32,
            bool,
            u32,
            &'static [&'static str],
            &'static [&'static str],
            &'static [&'static str],
            &'static [&'static str],
        ); 2] = [
            (
                "viewport_count",
                viewport_count,
                viewport_with_count,
                properties.max_viewports,
                &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-01216"],
                &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-01218"],
                &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-04135"],
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03379"],
            ),
            (
                "scissor_count",
                scissor_count,
                scissor_with_count,
                properties.max_viewports,
                &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-01217"],
                &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-01219"],
                &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-04136"],
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03380"],
            ),
        ];

        for (context, count, with_count, max, vuids_multi, vuids_max, vuids_zero, vuids_dyn) in
            counts
        {
            if count > 1 && !capabilities.features.multi_viewport {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: format!("is {}, which is greater than 1", count).into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "multi_viewport",
                    )])]),
                    vuids: vuids_multi,
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if count > max {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: format!(
                        "is {}, which is greater than the `max_viewports` limit ({})",
                        count, max,
                    )
                    .into(),
                    vuids: vuids_max,
                    ..Default::default()
                });
            }

            if with_count && count != 0 {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: format!(
                        "is {}, but the count is set dynamically, so it must be zero",
                        count,
                    )
                    .into(),
                    vuids: vuids_dyn,
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            } else if !with_count && count == 0 {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: "is zero".into(),
                    vuids: vuids_zero,
                    ..Default::default()
                });
            }
        }

        if !viewport_with_count && !scissor_with_count && viewport_count != scissor_count {
            violations.push(ValidationError {
                context: "scissor_count".into(),
                problem: format!(
                    "is {}, which is not equal to `viewport_count` ({})",
                    scissor_count, viewport_count,
                )
                .into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-04134"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        let viewports_static = !viewport_with_count
            && !dynamic_states.contains(vk::DynamicState::VIEWPORT)
            && viewport_count != 0;

        if viewports_static {
            if p_viewports.is_null() {
                violations.push(ValidationError {
                    context: "p_viewports".into(),
                    problem: "is null, but viewports are not set dynamically".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04130"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                });
            }

            for (index, viewport) in slice_or_empty(p_viewports, viewport_count)
                .iter()
                .enumerate()
            {
                violations.append_with_context(self.validate_viewport(viewport), || {
                    format!("p_viewports[{}]", index)
                });
            }
        }

        let scissors_static = !scissor_with_count
            && !dynamic_states.contains(vk::DynamicState::SCISSOR)
            && scissor_count != 0;

        if scissors_static {
            if p_scissors.is_null() {
                violations.push(ValidationError {
                    context: "p_scissors".into(),
                    problem: "is null, but scissors are not set dynamically".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04131"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                });
            }

            for (index, scissor) in slice_or_empty(p_scissors, scissor_count)
                .iter()
                .enumerate()
            {
                violations.append_with_context(
                    validate_scissor(scissor, PIPELINE_SCISSOR_VUIDS),
                    || format!("p_scissors[{}]", index),
                );
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pipeline::dynamic_state::DynamicStates,
        tests::{test_capabilities, test_validator, test_validator_with},
    };

    fn viewport() -> vk::Viewport {
        vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    #[test]
    fn viewport_width_and_depth() {
        let validator = test_validator();
        assert!(validator.validate_viewport(&viewport()).is_empty());

        let violations = validator.validate_viewport(&vk::Viewport {
            width: 0.0,
            ..viewport()
        });
        assert_vuid!(violations, "VUID-VkViewport-width-01770");

        let violations = validator.validate_viewport(&vk::Viewport {
            min_depth: 1.5,
            ..viewport()
        });
        assert_vuid!(violations, "VUID-VkViewport-minDepth-01234");
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(violations[0].kind, ViolationKind::RequirementNotMet);
    }

    #[test]
    fn unrestricted_depth_range() {
        let mut capabilities = test_capabilities();
        capabilities.enabled_extensions.ext_depth_range_unrestricted = true;
        let validator = test_validator_with(capabilities);

        let violations = validator.validate_viewport(&vk::Viewport {
            min_depth: 1.5,
            max_depth: -3.0,
            ..viewport()
        });
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn viewport_bounds() {
        let validator = test_validator();
        let violations = validator.validate_viewport(&vk::Viewport {
            x: 32000.0,
            width: 1000.0,
            height: f32::NAN,
            ..viewport()
        });
        assert_vuid!(violations, "VUID-VkViewport-x-01232");
        assert_vuid!(violations, "VUID-VkViewport-height-01773");
    }

    #[test]
    fn scissor_overflow() {
        let scissor = vk::Rect2D {
            offset: vk::Offset2D {
                x: i32::MAX - 9,
                y: 0,
            },
            extent: vk::Extent2D {
                width: 100,
                height: 100,
            },
        };

        let violations = validate_scissor(&scissor, PIPELINE_SCISSOR_VUIDS);
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_vuid!(violations, "VUID-VkPipelineViewportStateCreateInfo-offset-02822");
        assert_eq!(violations[0].kind, ViolationKind::ArithmeticOverflow);

        let violations = validate_scissor(
            &vk::Rect2D {
                offset: vk::Offset2D {
                    x: i32::MAX - 100,
                    y: 0,
                },
                ..scissor
            },
            PIPELINE_SCISSOR_VUIDS,
        );
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn viewport_state_counts() {
        let validator = test_validator();
        let viewports = [viewport(); 2];
        let scissors = [vk::Rect2D::default()];
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewports(&viewports)
            .scissors(&scissors);

        let violations =
            unsafe { validator.validate_viewport_state(&viewport_state, &DynamicStates::default()) };
        assert_vuid!(violations, "VUID-VkPipelineViewportStateCreateInfo-scissorCount-04134");
        assert_eq!(violations.len(), 1, "{}", violations);

        let viewport_state = vk::PipelineViewportStateCreateInfo {
            viewport_count: 1,
            scissor_count: 1,
            ..Default::default()
        };
        let dynamic_states = DynamicStates::from_states(&[vk::DynamicState::SCISSOR]);

        let violations =
            unsafe { validator.validate_viewport_state(&viewport_state, &dynamic_states) };
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04130");
        assert_no_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04131");
    }
}
