// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Dynamic state of graphics and ray tracing pipelines.

use crate::{
    chain::ChainRules,
    pipeline::PipelineKind,
    predicates::{
        slice_or_empty, validate_array, validate_flags, validate_ranged_enum,
        validate_struct_type, ArrayRules, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, SupportsRequirements,
    ValidationError, Version, ViolationKind, Violations,
};
use ash::vk;
use foldhash::HashMap;
use std::ops::RangeInclusive;

const DYNAMIC_STATE_VALUES: &[RangeInclusive<i32>] = enum_values!(DynamicState {
    VIEWPORT..=STENCIL_REFERENCE,
    CULL_MODE..=STENCIL_OP,
    PATCH_CONTROL_POINTS_EXT..=PRIMITIVE_RESTART_ENABLE,
    VERTEX_INPUT_EXT,
    RAY_TRACING_PIPELINE_STACK_SIZE_KHR,
    COLOR_WRITE_ENABLE_EXT,
});

const PIPELINE_DYNAMIC_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkPipelineDynamicStateCreateInfo-pNext-pNext"],
    vuids_unique: &[],
};

/// Pairs of dynamic states that may not both be requested.
const EXCLUSIVE_DYNAMIC_STATES: [(vk::DynamicState, vk::DynamicState, &[&str]); 2] = [
    (
        vk::DynamicState::VIEWPORT,
        vk::DynamicState::VIEWPORT_WITH_COUNT,
        &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04132"],
    ),
    (
        vk::DynamicState::SCISSOR,
        vk::DynamicState::SCISSOR_WITH_COUNT,
        &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04133"],
    ),
];

/// The dynamic states requested by a pipeline, each with its index in the caller's array.
///
/// Only lives for the duration of one pipeline creation call.
#[derive(Clone, Debug, Default)]
pub(crate) struct DynamicStates {
    indices: HashMap<vk::DynamicState, usize>,
}

impl DynamicStates {
    /// Builds the map from a list of states, keeping the first index of each state.
    pub(crate) fn from_states(states: &[vk::DynamicState]) -> Self {
        let mut indices = HashMap::default();

        for (index, &state) in states.iter().enumerate() {
            indices.entry(state).or_insert(index);
        }

        DynamicStates { indices }
    }

    #[inline]
    pub(crate) fn contains(&self, state: vk::DynamicState) -> bool {
        self.indices.contains_key(&state)
    }

    #[inline]
    pub(crate) fn index_of(&self, state: vk::DynamicState) -> Option<usize> {
        self.indices.get(&state).copied()
    }
}

/// What must be supported for a dynamic state to be requested by a graphics pipeline.
fn graphics_state_requirement(
    state: vk::DynamicState,
) -> Option<(RequiresOneOf, &'static [&'static str])> {
    match state.as_raw() {
        raw if (vk::DynamicState::CULL_MODE.as_raw()..=vk::DynamicState::STENCIL_OP.as_raw())
            .contains(&raw) =>
        {
            Some((
                RequiresOneOf(&[
                    RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
                    RequiresAllOf(&[Requires::DeviceFeature("extended_dynamic_state")]),
                ]),
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03378"],
            ))
        }
        raw if raw == vk::DynamicState::RASTERIZER_DISCARD_ENABLE.as_raw()
            || raw == vk::DynamicState::DEPTH_BIAS_ENABLE.as_raw()
            || raw == vk::DynamicState::PRIMITIVE_RESTART_ENABLE.as_raw() =>
        {
            Some((
                RequiresOneOf(&[RequiresAllOf(&[Requires::APIVersion(Version::V1_3)])]),
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04868"],
            ))
        }
        raw if raw == vk::DynamicState::VERTEX_INPUT_EXT.as_raw() => Some((
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_vertex_input_dynamic_state",
            )])]),
            &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04807"],
        )),
        _ => None,
    }
}

impl StatelessValidator {
    /// Checks the dynamic state of a pipeline, and returns the map of requested states along
    /// with the violations found.
    pub(crate) unsafe fn validate_dynamic_state(
        &self,
        dynamic_state: &vk::PipelineDynamicStateCreateInfo<'_>,
        kind: PipelineKind,
    ) -> (DynamicStates, Violations) {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let &vk::PipelineDynamicStateCreateInfo {
            p_next,
            flags,
            dynamic_state_count,
            p_dynamic_states,
            ..
        } = dynamic_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            dynamic_state,
            &["VUID-VkPipelineDynamicStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_DYNAMIC_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineDynamicStateCreateInfo-flags-zerobitmask"],
            &[],
        ));
        violations.append(validate_array(
            "dynamic_state_count",
            "p_dynamic_states",
            dynamic_state_count,
            p_dynamic_states,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkPipelineDynamicStateCreateInfo-pDynamicStates-parameter"],
            },
        ));

        let states = slice_or_empty(p_dynamic_states, dynamic_state_count);
        let mut indices: HashMap<vk::DynamicState, usize> = HashMap::default();

        for (index, &state) in states.iter().enumerate() {
            if let Some(error) = validate_ranged_enum(
                format!("p_dynamic_states[{}]", index),
                state.as_raw(),
                DYNAMIC_STATE_VALUES,
                &["VUID-VkPipelineDynamicStateCreateInfo-pDynamicStates-parameter"],
            ) {
                violations.push(error);
                continue;
            }

            if let Some(&previous) = indices.get(&state) {
                violations.push(ValidationError {
                    context: format!("p_dynamic_states[{}]", index).into(),
                    problem: format!(
                        "is {:?}, which is also `p_dynamic_states[{}]`",
                        state, previous,
                    )
                    .into(),
                    vuids: &["VUID-VkPipelineDynamicStateCreateInfo-pDynamicStates-01442"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });

                continue;
            }

            indices.insert(state, index);

            match kind {
                PipelineKind::RayTracing => {
                    if state != vk::DynamicState::RAY_TRACING_PIPELINE_STACK_SIZE_KHR {
                        violations.push(ValidationError {
                            context: format!("p_dynamic_states[{}]", index).into(),
                            problem: format!(
                                "is {:?}, which is not valid for a ray tracing pipeline",
                                state,
                            )
                            .into(),
                            vuids: &[
                                "VUID-VkRayTracingPipelineCreateInfoKHR-pDynamicStates-03602",
                            ],
                            ..Default::default()
                        });
                    }
                }
                _ => {
                    if state == vk::DynamicState::RAY_TRACING_PIPELINE_STACK_SIZE_KHR {
                        violations.push(ValidationError {
                            context: format!("p_dynamic_states[{}]", index).into(),
                            problem: "is `VK_DYNAMIC_STATE_RAY_TRACING_PIPELINE_STACK_SIZE_KHR`, \
                                which is only valid for a ray tracing pipeline"
                                .into(),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03578"],
                            ..Default::default()
                        });
                    } else if let Some((requires_one_of, vuids)) =
                        graphics_state_requirement(state)
                    {
                        if !capabilities.satisfies(requires_one_of) {
                            violations.push(ValidationError {
                                context: format!("p_dynamic_states[{}]", index).into(),
                                problem: format!("is {:?}", state).into(),
                                requires_one_of,
                                vuids,
                                kind: ViolationKind::RequirementNotMet,
                            });
                        }
                    }
                }
            }
        }

        for (first, second, vuids) in EXCLUSIVE_DYNAMIC_STATES {
            if let (Some(first_index), Some(second_index)) =
                (indices.get(&first), indices.get(&second))
            {
                violations.push(ValidationError {
                    context: "p_dynamic_states".into(),
                    problem: format!(
                        "contains both {:?} (`p_dynamic_states[{}]`) and {:?} \
                        (`p_dynamic_states[{}]`)",
                        first, first_index, second, second_index,
                    )
                    .into(),
                    vuids,
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        (DynamicStates { indices }, violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{test_capabilities, test_validator, test_validator_with};

    fn check(
        validator: &StatelessValidator,
        states: &[vk::DynamicState],
    ) -> (DynamicStates, Violations) {
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::default().dynamic_states(states);

        unsafe { validator.validate_dynamic_state(&dynamic_state, PipelineKind::Graphics) }
    }

    #[test]
    fn viewport_and_viewport_with_count() {
        let validator = test_validator();
        let (_, violations) = check(
            &validator,
            &[
                vk::DynamicState::LINE_WIDTH,
                vk::DynamicState::VIEWPORT,
                vk::DynamicState::VIEWPORT_WITH_COUNT,
            ],
        );
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04132");
        assert!(violations[0].problem.contains("p_dynamic_states[1]"));
        assert!(violations[0].problem.contains("p_dynamic_states[2]"));

        let (dynamic_states, violations) = check(
            &validator,
            &[vk::DynamicState::VIEWPORT_WITH_COUNT, vk::DynamicState::SCISSOR],
        );
        assert!(violations.is_empty(), "{}", violations);
        assert_eq!(
            dynamic_states.index_of(vk::DynamicState::SCISSOR),
            Some(1),
        );
    }

    #[test]
    fn duplicates_and_requirements() {
        let mut capabilities = test_capabilities();
        capabilities.api_version = Version::V1_2;
        capabilities.features.extended_dynamic_state = false;
        let validator = test_validator_with(capabilities);

        let (_, violations) = check(
            &validator,
            &[
                vk::DynamicState::CULL_MODE,
                vk::DynamicState::LINE_WIDTH,
                vk::DynamicState::LINE_WIDTH,
                vk::DynamicState::RAY_TRACING_PIPELINE_STACK_SIZE_KHR,
            ],
        );
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03378");
        assert_vuid!(violations, "VUID-VkPipelineDynamicStateCreateInfo-pDynamicStates-01442");
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03578");
        assert_eq!(violations.len(), 3, "{}", violations);
    }
}
