// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Commands that set dynamic state.

use crate::{
    pipeline::viewport::{validate_scissor, ScissorVuids},
    predicates::{in_inclusive_range, slice_or_empty, validate_array, ArrayRules},
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk;

const SET_SCISSOR_VUIDS: ScissorVuids = ScissorVuids {
    negative_offset: &["VUID-vkCmdSetScissor-x-00595"],
    overflow_x: &["VUID-vkCmdSetScissor-offset-00596"],
    overflow_y: &["VUID-vkCmdSetScissor-offset-00597"],
};

const SET_SCISSOR_WITH_COUNT_VUIDS: ScissorVuids = ScissorVuids {
    negative_offset: &["VUID-vkCmdSetScissorWithCount-x-03399"],
    overflow_x: &["VUID-vkCmdSetScissorWithCount-offset-03400"],
    overflow_y: &["VUID-vkCmdSetScissorWithCount-offset-03401"],
};

const EXTENDED_DYNAMIC_STATE_REQUIREMENT: RequiresOneOf = RequiresOneOf(&[
    RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
    RequiresAllOf(&[Requires::DeviceFeature("extended_dynamic_state")]),
]);

/// The VUIDs of the range checks of the commands that set viewports or scissors.
struct RangeVuids {
    count: &'static [&'static str],
    array: &'static [&'static str],
    sum: &'static [&'static str],
    first_without_multi_viewport: &'static [&'static str],
    count_without_multi_viewport: &'static [&'static str],
}

impl StatelessValidator {
    /// Checks `first + count` against `max_viewports`, and that only one viewport or scissor is
    /// set when `multi_viewport` is not enabled.
    fn validate_viewport_range(
        &self,
        first_context: &'static str,
        count_context: &'static str,
        first: u32,
        count: u32,
        vuids: &RangeVuids,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let max_viewports = capabilities.properties.max_viewports;

        if u64::from(first) + u64::from(count) > u64::from(max_viewports) {
            violations.push(ValidationError {
                context: first_context.into(),
                problem: format!(
                    "plus `{}` is {} + {}, which is greater than the `max_viewports` limit ({})",
                    count_context, first, count, max_viewports,
                )
                .into(),
                vuids: vuids.sum,
                ..Default::default()
            });
        }

        if !capabilities.features.multi_viewport {
            if first != 0 {
                violations.push(ValidationError {
                    context: first_context.into(),
                    problem: format!("is {}, which is not 0", first).into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceFeature("multi_viewport"),
                    ])]),
                    vuids: vuids.first_without_multi_viewport,
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if count > 1 {
                violations.push(ValidationError {
                    context: count_context.into(),
                    problem: format!("is {}, which is greater than 1", count).into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceFeature("multi_viewport"),
                    ])]),
                    vuids: vuids.count_without_multi_viewport,
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdSetViewport`.
    ///
    /// # Safety
    ///
    /// `p_viewports` must be null or valid for `viewport_count` elements.
    pub unsafe fn validate_cmd_set_viewport(
        &self,
        _command_buffer: vk::CommandBuffer,
        first_viewport: u32,
        viewport_count: u32,
        p_viewports: *const vk::Viewport,
    ) -> Violations {
        let vuids = RangeVuids {
            count: &["VUID-vkCmdSetViewport-viewportCount-arraylength"],
            array: &["VUID-vkCmdSetViewport-pViewports-parameter"],
            sum: &["VUID-vkCmdSetViewport-firstViewport-01223"],
            first_without_multi_viewport: &["VUID-vkCmdSetViewport-firstViewport-01224"],
            count_without_multi_viewport: &["VUID-vkCmdSetViewport-viewportCount-01225"],
        };

        self.validate_viewports(
            "first_viewport",
            first_viewport,
            viewport_count,
            p_viewports,
            &vuids,
        )
    }

    /// Validates the arguments of `vkCmdSetViewportWithCount`.
    ///
    /// # Safety
    ///
    /// `p_viewports` must be null or valid for `viewport_count` elements.
    pub unsafe fn validate_cmd_set_viewport_with_count(
        &self,
        _command_buffer: vk::CommandBuffer,
        viewport_count: u32,
        p_viewports: *const vk::Viewport,
    ) -> Violations {
        let vuids = RangeVuids {
            count: &["VUID-vkCmdSetViewportWithCount-viewportCount-arraylength"],
            array: &["VUID-vkCmdSetViewportWithCount-pViewports-parameter"],
            sum: &["VUID-vkCmdSetViewportWithCount-viewportCount-03394"],
            first_without_multi_viewport: &[],
            count_without_multi_viewport: &["VUID-vkCmdSetViewportWithCount-viewportCount-03395"],
        };

        let mut violations = self.validate_extended_dynamic_state(&[
            "VUID-vkCmdSetViewportWithCount-None-08971",
        ]);
        violations.append(self.validate_viewports(
            "viewport_count",
            0,
            viewport_count,
            p_viewports,
            &vuids,
        ));

        violations
    }

    unsafe fn validate_viewports(
        &self,
        first_context: &'static str,
        first: u32,
        count: u32,
        p_viewports: *const vk::Viewport,
        vuids: &RangeVuids,
    ) -> Violations {
        let mut violations = validate_array(
            "viewport_count",
            "p_viewports",
            count,
            p_viewports,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: vuids.count,
                array_vuids: vuids.array,
            },
        );
        violations.append(self.validate_viewport_range(
            first_context,
            "viewport_count",
            first,
            count,
            vuids,
        ));

        for (index, viewport) in slice_or_empty(p_viewports, count).iter().enumerate() {
            violations.append_with_context(self.validate_viewport(viewport), || {
                format!("p_viewports[{}]", index)
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdSetScissor`.
    ///
    /// # Safety
    ///
    /// `p_scissors` must be null or valid for `scissor_count` elements.
    pub unsafe fn validate_cmd_set_scissor(
        &self,
        _command_buffer: vk::CommandBuffer,
        first_scissor: u32,
        scissor_count: u32,
        p_scissors: *const vk::Rect2D,
    ) -> Violations {
        let vuids = RangeVuids {
            count: &["VUID-vkCmdSetScissor-scissorCount-arraylength"],
            array: &["VUID-vkCmdSetScissor-pScissors-parameter"],
            sum: &["VUID-vkCmdSetScissor-firstScissor-00592"],
            first_without_multi_viewport: &["VUID-vkCmdSetScissor-firstScissor-00593"],
            count_without_multi_viewport: &["VUID-vkCmdSetScissor-scissorCount-00594"],
        };

        self.validate_scissors(
            "first_scissor",
            first_scissor,
            scissor_count,
            p_scissors,
            &vuids,
            SET_SCISSOR_VUIDS,
        )
    }

    /// Validates the arguments of `vkCmdSetScissorWithCount`.
    ///
    /// # Safety
    ///
    /// `p_scissors` must be null or valid for `scissor_count` elements.
    pub unsafe fn validate_cmd_set_scissor_with_count(
        &self,
        _command_buffer: vk::CommandBuffer,
        scissor_count: u32,
        p_scissors: *const vk::Rect2D,
    ) -> Violations {
        let vuids = RangeVuids {
            count: &["VUID-vkCmdSetScissorWithCount-scissorCount-arraylength"],
            array: &["VUID-vkCmdSetScissorWithCount-pScissors-parameter"],
            sum: &["VUID-vkCmdSetScissorWithCount-scissorCount-03397"],
            first_without_multi_viewport: &[],
            count_without_multi_viewport: &["VUID-vkCmdSetScissorWithCount-scissorCount-03398"],
        };

        let mut violations =
            self.validate_extended_dynamic_state(&["VUID-vkCmdSetScissorWithCount-None-08971"]);
        violations.append(self.validate_scissors(
            "scissor_count",
            0,
            scissor_count,
            p_scissors,
            &vuids,
            SET_SCISSOR_WITH_COUNT_VUIDS,
        ));

        violations
    }

    unsafe fn validate_scissors(
        &self,
        first_context: &'static str,
        first: u32,
        count: u32,
        p_scissors: *const vk::Rect2D,
        vuids: &RangeVuids,
        scissor_vuids: ScissorVuids,
    ) -> Violations {
        let mut violations = validate_array(
            "scissor_count",
            "p_scissors",
            count,
            p_scissors,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: vuids.count,
                array_vuids: vuids.array,
            },
        );
        violations.append(self.validate_viewport_range(
            first_context,
            "scissor_count",
            first,
            count,
            vuids,
        ));

        for (index, scissor) in slice_or_empty(p_scissors, count).iter().enumerate() {
            violations.append_with_context(validate_scissor(scissor, scissor_vuids), || {
                format!("p_scissors[{}]", index)
            });
        }

        violations
    }

    fn validate_extended_dynamic_state(&self, vuids: &'static [&'static str]) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();

        if capabilities.api_version < Version::V1_3
            && !capabilities.features.extended_dynamic_state
        {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: EXTENDED_DYNAMIC_STATE_REQUIREMENT,
                vuids,
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdSetLineWidth`.
    pub fn validate_cmd_set_line_width(
        &self,
        _command_buffer: vk::CommandBuffer,
        line_width: f32,
    ) -> Violations {
        let mut violations = Violations::new();

        if !self.capabilities().features.wide_lines && line_width != 1.0 {
            violations.push(ValidationError {
                context: "line_width".into(),
                problem: format!("is {}, which is not 1.0", line_width).into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "wide_lines",
                )])]),
                vuids: &["VUID-vkCmdSetLineWidth-lineWidth-00788"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdSetDepthBounds`.
    pub fn validate_cmd_set_depth_bounds(
        &self,
        _command_buffer: vk::CommandBuffer,
        min_depth_bounds: f32,
        max_depth_bounds: f32,
    ) -> Violations {
        let mut violations = Violations::new();

        if self
            .capabilities()
            .enabled_extensions
            .ext_depth_range_unrestricted
        {
            return violations;
        }

        for (context, value, vuids) in [
            (
                "min_depth_bounds",
                min_depth_bounds,
                &["VUID-vkCmdSetDepthBounds-minDepthBounds-00600"] as &'static [&'static str],
            ),
            (
                "max_depth_bounds",
                max_depth_bounds,
                &["VUID-vkCmdSetDepthBounds-maxDepthBounds-00601"],
            ),
        ] {
            if !in_inclusive_range(value, 0.0, 1.0) {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: format!("is {}, which is not between 0.0 and 1.0 inclusive", value)
                        .into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids,
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdSetDepthBias`.
    pub fn validate_cmd_set_depth_bias(
        &self,
        _command_buffer: vk::CommandBuffer,
        _depth_bias_constant_factor: f32,
        depth_bias_clamp: f32,
        _depth_bias_slope_factor: f32,
    ) -> Violations {
        let mut violations = Violations::new();

        if !self.capabilities().features.depth_bias_clamp && depth_bias_clamp != 0.0 {
            violations.push(ValidationError {
                context: "depth_bias_clamp".into(),
                problem: format!("is {}, which is not 0.0", depth_bias_clamp).into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_bias_clamp",
                )])]),
                vuids: &["VUID-vkCmdSetDepthBias-depthBiasClamp-00790"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        tests::{test_capabilities, test_validator, test_validator_with},
        Version,
    };
    use ash::vk;

    fn viewport() -> vk::Viewport {
        vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: 256.0,
            height: 256.0,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    #[test]
    fn viewports_without_multi_viewport() {
        let mut capabilities = test_capabilities();
        capabilities.features.multi_viewport = false;
        let validator = test_validator_with(capabilities);
        let viewports = [
            viewport(),
            vk::Viewport {
                width: 0.0,
                ..viewport()
            },
        ];

        let violations = unsafe {
            validator.validate_cmd_set_viewport(
                vk::CommandBuffer::null(),
                1,
                2,
                viewports.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdSetViewport-firstViewport-01224");
        assert_vuid!(violations, "VUID-vkCmdSetViewport-viewportCount-01225");
        assert_vuid!(violations, "VUID-VkViewport-width-01770");
        assert_no_vuid!(violations, "VUID-vkCmdSetViewport-firstViewport-01223");
        assert_eq!(violations.len(), 3, "{}", violations);
    }

    #[test]
    fn scissor_overflow() {
        let validator = test_validator();
        let scissors = [vk::Rect2D {
            offset: vk::Offset2D {
                x: i32::MAX - 10,
                y: -1,
            },
            extent: vk::Extent2D {
                width: 100,
                height: 16,
            },
        }];

        let violations = unsafe {
            validator.validate_cmd_set_scissor(vk::CommandBuffer::null(), 16, 1, scissors.as_ptr())
        };
        assert_vuid!(violations, "VUID-vkCmdSetScissor-firstScissor-00592");

        let violations = unsafe {
            validator.validate_cmd_set_scissor_with_count(
                vk::CommandBuffer::null(),
                1,
                scissors.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdSetScissorWithCount-x-03399");
        assert_vuid!(violations, "VUID-vkCmdSetScissorWithCount-offset-03400");
        assert_eq!(violations.len(), 2, "{}", violations);
        assert_eq!(violations[1].context, "p_scissors[0].offset.x");
    }

    #[test]
    fn with_count_needs_extended_dynamic_state() {
        let mut capabilities = test_capabilities();
        capabilities.api_version = Version::V1_2;
        capabilities.features.extended_dynamic_state = false;
        let validator = test_validator_with(capabilities);
        let viewports = [viewport()];

        let violations = unsafe {
            validator.validate_cmd_set_viewport_with_count(
                vk::CommandBuffer::null(),
                1,
                viewports.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdSetViewportWithCount-None-08971");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn fixed_function_state() {
        let mut capabilities = test_capabilities();
        capabilities.features.wide_lines = false;
        capabilities.features.depth_bias_clamp = false;
        let validator = test_validator_with(capabilities);

        assert_vuid!(
            validator.validate_cmd_set_line_width(vk::CommandBuffer::null(), 2.0),
            "VUID-vkCmdSetLineWidth-lineWidth-00788",
        );
        assert!(validator
            .validate_cmd_set_line_width(vk::CommandBuffer::null(), 1.0)
            .is_empty());
        assert_vuid!(
            validator.validate_cmd_set_depth_bias(vk::CommandBuffer::null(), 1.0, 0.5, 1.0),
            "VUID-vkCmdSetDepthBias-depthBiasClamp-00790",
        );

        let violations =
            validator.validate_cmd_set_depth_bounds(vk::CommandBuffer::null(), -0.5, f32::NAN);
        assert_vuid!(violations, "VUID-vkCmdSetDepthBounds-minDepthBounds-00600");
        assert_vuid!(violations, "VUID-vkCmdSetDepthBounds-maxDepthBounds-00601");
    }
}
