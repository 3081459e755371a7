// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Ray tracing pipelines and their shader groups.

use crate::{
    chain::{AllowedStruct, ChainRules},
    features::DeviceFeatures,
    pipeline::{
        validate_pipeline_derivative, PipelineKind, PIPELINE_CREATE_FLAGS, RAY_TRACING_STAGES,
    },
    predicates::{
        slice_or_empty, validate_array, validate_flags, validate_ranged_enum,
        validate_required_handle, validate_struct_type, validate_struct_type_array, ArrayRules,
        FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, ViolationKind,
    Violations,
};
use ash::vk;
use smallvec::SmallVec;
use std::ops::RangeInclusive;

const SHADER_GROUP_TYPE_VALUES: &[RangeInclusive<i32>] =
    enum_values!(RayTracingShaderGroupTypeKHR { GENERAL..=PROCEDURAL_HIT_GROUP });

const RAY_TRACING_PIPELINE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::of::<vk::PipelineCreationFeedbackCreateInfo<'static>>()],
    unique: true,
    vuids_next: &["VUID-VkRayTracingPipelineCreateInfoKHR-pNext-pNext"],
    vuids_unique: &["VUID-VkRayTracingPipelineCreateInfoKHR-sType-unique"],
};

const RAY_TRACING_SHADER_GROUP_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-pNext-pNext"],
    vuids_unique: &[],
};

/// Which shader stages a group slot may refer to.
#[derive(Clone, Copy)]
struct ShaderSlot {
    context: &'static str,
    stages: vk::ShaderStageFlags,
    vuids: &'static [&'static str],
}

const GENERAL_SLOT: ShaderSlot = ShaderSlot {
    context: "general_shader",
    stages: flags_mask!(ShaderStageFlags { RAYGEN_KHR, MISS_KHR, CALLABLE_KHR }),
    vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-type-03474"],
};

const CLOSEST_HIT_SLOT: ShaderSlot = ShaderSlot {
    context: "closest_hit_shader",
    stages: vk::ShaderStageFlags::CLOSEST_HIT_KHR,
    vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-closestHitShader-03478"],
};

const ANY_HIT_SLOT: ShaderSlot = ShaderSlot {
    context: "any_hit_shader",
    stages: vk::ShaderStageFlags::ANY_HIT_KHR,
    vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-anyHitShader-03479"],
};

const INTERSECTION_SLOT: ShaderSlot = ShaderSlot {
    context: "intersection_shader",
    stages: vk::ShaderStageFlags::INTERSECTION_KHR,
    vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-type-03477"],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCreateRayTracingPipelinesKHR`.
    ///
    /// # Safety
    ///
    /// `p_create_infos` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_ray_tracing_pipelines_khr(
        &self,
        _deferred_operation: vk::DeferredOperationKHR,
        _pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::RayTracingPipelineCreateInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();

        if !self.capabilities().features.ray_tracing_pipeline {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "ray_tracing_pipeline",
                )])]),
                vuids: &["VUID-vkCreateRayTracingPipelinesKHR-rayTracingPipeline-03586"],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "create_info_count",
            "p_create_infos",
            create_info_count,
            p_create_infos,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCreateRayTracingPipelinesKHR-createInfoCount-arraylength"],
                array_vuids: &["VUID-vkCreateRayTracingPipelinesKHR-pCreateInfos-parameter"],
            },
        ));

        let create_infos = slice_or_empty(p_create_infos, create_info_count);
        violations.append(validate_struct_type_array(
            "p_create_infos",
            create_infos,
            &["VUID-VkRayTracingPipelineCreateInfoKHR-sType-sType"],
        ));

        let all_flags: SmallVec<[vk::PipelineCreateFlags; 4]> =
            create_infos.iter().map(|info| info.flags).collect();

        for (index, create_info) in create_infos.iter().enumerate() {
            violations.append_with_context(
                self.validate_ray_tracing_pipeline_create_info(create_info, index, &all_flags),
                || format!("p_create_infos[{}]", index),
            );
        }

        violations
    }

    unsafe fn validate_ray_tracing_pipeline_create_info(
        &self,
        create_info: &vk::RayTracingPipelineCreateInfoKHR<'_>,
        index: usize,
        all_flags: &[vk::PipelineCreateFlags],
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let features = &capabilities.features;
        let &vk::RayTracingPipelineCreateInfoKHR {
            p_next,
            flags,
            stage_count,
            p_stages,
            group_count,
            p_groups,
            max_pipeline_ray_recursion_depth,
            p_library_info,
            p_library_interface,
            p_dynamic_state,
            layout,
            base_pipeline_handle,
            base_pipeline_index,
            ..
        } = create_info;

        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &RAY_TRACING_PIPELINE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            PIPELINE_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkRayTracingPipelineCreateInfoKHR-flags-parameter"],
            &[],
        ));
        violations.append(validate_ray_tracing_flags(flags, features));

        let max_recursion_depth = capabilities
            .properties
            .max_ray_recursion_depth
            .unwrap_or(0);

        if max_pipeline_ray_recursion_depth > max_recursion_depth {
            violations.push(ValidationError {
                context: "max_pipeline_ray_recursion_depth".into(),
                problem: format!(
                    "is {}, which is greater than the `max_ray_recursion_depth` limit ({})",
                    max_pipeline_ray_recursion_depth, max_recursion_depth,
                )
                .into(),
                vuids: &[
                    "VUID-VkRayTracingPipelineCreateInfoKHR-maxPipelineRayRecursionDepth-03589",
                ],
                ..Default::default()
            });
        }

        let is_library = flags.contains(vk::PipelineCreateFlags::LIBRARY_KHR);
        let library_count = p_library_info.as_ref().map_or(0, |info| info.library_count);

        if is_library && p_library_interface.is_null() {
            violations.push(ValidationError {
                context: "p_library_interface".into(),
                problem: "is null, but `flags` contains `VK_PIPELINE_CREATE_LIBRARY_BIT_KHR`"
                    .into(),
                vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-flags-03465"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }

        if library_count != 0 && p_library_interface.is_null() {
            violations.push(ValidationError {
                context: "p_library_interface".into(),
                problem: "is null, but `p_library_info.library_count` is not zero".into(),
                vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-pLibraryInfo-03590"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "stage_count",
            "p_stages",
            stage_count,
            p_stages,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-pStages-parameter"],
            },
        ));

        let stages = slice_or_empty(p_stages, stage_count);
        violations.append(self.validate_shader_stages(
            stages,
            PipelineKind::RayTracing,
            RAY_TRACING_STAGES,
            &["VUID-VkRayTracingPipelineCreateInfoKHR-stage-06899"],
            &[],
        ));

        if !is_library
            && library_count == 0
            && !stages
                .iter()
                .any(|stage| stage.stage == vk::ShaderStageFlags::RAYGEN_KHR)
        {
            violations.push(ValidationError {
                context: "p_stages".into(),
                problem: "does not contain a ray generation shader".into(),
                vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-stage-03425"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "group_count",
            "p_groups",
            group_count,
            p_groups,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-pGroups-parameter"],
            },
        ));

        // Groups may refer to the stages of linked libraries, whose stages are not known here.
        let known_stages = (library_count == 0).then_some(stages);

        for (group_index, group) in slice_or_empty(p_groups, group_count).iter().enumerate() {
            violations.append_with_context(
                self.validate_shader_group(group, known_stages),
                || format!("p_groups[{}]", group_index),
            );
        }

        if let Some(dynamic_state) = p_dynamic_state.as_ref() {
            let (_, dynamic_violations) =
                self.validate_dynamic_state(dynamic_state, PipelineKind::RayTracing);
            violations.append(dynamic_violations.add_context("p_dynamic_state"));
        }

        violations.push_opt(validate_required_handle(
            "layout",
            layout,
            &["VUID-VkRayTracingPipelineCreateInfoKHR-layout-parameter"],
        ));
        violations.append(validate_pipeline_derivative(
            PipelineKind::RayTracing,
            index,
            flags,
            base_pipeline_handle,
            base_pipeline_index,
            all_flags,
        ));

        violations
    }

    unsafe fn validate_shader_group(
        &self,
        group: &vk::RayTracingShaderGroupCreateInfoKHR<'_>,
        stages: Option<&[vk::PipelineShaderStageCreateInfo<'_>]>,
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::RayTracingShaderGroupCreateInfoKHR {
            p_next,
            ty,
            general_shader,
            closest_hit_shader,
            any_hit_shader,
            intersection_shader,
            p_shader_group_capture_replay_handle,
            ..
        } = group;

        violations.push_opt(validate_struct_type(
            "s_type",
            group,
            &["VUID-VkRayTracingShaderGroupCreateInfoKHR-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &RAY_TRACING_SHADER_GROUP_CREATE_INFO_CHAIN,
        ));

        if let Some(error) = validate_ranged_enum(
            "ty",
            ty.as_raw(),
            SHADER_GROUP_TYPE_VALUES,
            &["VUID-VkRayTracingShaderGroupCreateInfoKHR-type-parameter"],
        ) {
            violations.push(error);
            return violations;
        }

        if !p_shader_group_capture_replay_handle.is_null()
            && !features.ray_tracing_pipeline_shader_group_handle_capture_replay
        {
            violations.push(ValidationError {
                context: "p_shader_group_capture_replay_handle".into(),
                problem: "is not null".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "ray_tracing_pipeline_shader_group_handle_capture_replay",
                )])]),
                vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-rayTracingPipelineShaderGroupHandleCaptureReplay-03603"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        match ty {
            vk::RayTracingShaderGroupTypeKHR::GENERAL => {
                violations.push_opt(validate_slot(general_shader, GENERAL_SLOT, stages, true));

                for (context, index) in [
                    ("closest_hit_shader", closest_hit_shader),
                    ("any_hit_shader", any_hit_shader),
                    ("intersection_shader", intersection_shader),
                ] {
                    if index != vk::SHADER_UNUSED_KHR {
                        violations.push(ValidationError {
                            context: context.into(),
                            problem: "is not `VK_SHADER_UNUSED_KHR`, but `ty` is \
                                `VK_RAY_TRACING_SHADER_GROUP_TYPE_GENERAL_KHR`"
                                .into(),
                            vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-type-03475"],
                            kind: ViolationKind::ExtraneousCompanion,
                            ..Default::default()
                        });
                    }
                }
            }
            _ => {
                if general_shader != vk::SHADER_UNUSED_KHR {
                    violations.push(ValidationError {
                        context: "general_shader".into(),
                        problem: format!(
                            "is not `VK_SHADER_UNUSED_KHR`, but `ty` is {:?}",
                            ty,
                        )
                        .into(),
                        vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-type-03476"],
                        kind: ViolationKind::ExtraneousCompanion,
                        ..Default::default()
                    });
                }

                if ty == vk::RayTracingShaderGroupTypeKHR::TRIANGLES_HIT_GROUP {
                    if intersection_shader != vk::SHADER_UNUSED_KHR {
                        violations.push(ValidationError {
                            context: "intersection_shader".into(),
                            problem: "is not `VK_SHADER_UNUSED_KHR`, but `ty` is \
                                `VK_RAY_TRACING_SHADER_GROUP_TYPE_TRIANGLES_HIT_GROUP_KHR`"
                                .into(),
                            vuids: &["VUID-VkRayTracingShaderGroupCreateInfoKHR-type-03476"],
                            kind: ViolationKind::ExtraneousCompanion,
                            ..Default::default()
                        });
                    }
                } else {
                    violations.push_opt(validate_slot(
                        intersection_shader,
                        INTERSECTION_SLOT,
                        stages,
                        true,
                    ));
                }

                violations.push_opt(validate_slot(
                    closest_hit_shader,
                    CLOSEST_HIT_SLOT,
                    stages,
                    false,
                ));
                violations.push_opt(validate_slot(any_hit_shader, ANY_HIT_SLOT, stages, false));
            }
        }

        violations
    }
}

/// Checks a shader index of a group. `stages` is `None` when the indices can't be resolved.
fn validate_slot(
    index: u32,
    slot: ShaderSlot,
    stages: Option<&[vk::PipelineShaderStageCreateInfo<'_>]>,
    required: bool,
) -> Option<ValidationError> {
    if index == vk::SHADER_UNUSED_KHR {
        return required.then(|| ValidationError {
            context: slot.context.into(),
            problem: "is `VK_SHADER_UNUSED_KHR`".into(),
            vuids: slot.vuids,
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    let stages = stages?;

    match stages.get(index as usize) {
        None => Some(ValidationError {
            context: slot.context.into(),
            problem: format!(
                "is {}, which is not less than `stage_count` ({})",
                index,
                stages.len(),
            )
            .into(),
            vuids: slot.vuids,
            ..Default::default()
        }),
        Some(stage) if !slot.stages.contains(stage.stage) || stage.stage.is_empty() => {
            Some(ValidationError {
                context: slot.context.into(),
                problem: format!(
                    "refers to `p_stages[{}]`, whose stage is {:?}",
                    index, stage.stage,
                )
                .into(),
                vuids: slot.vuids,
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            })
        }
        Some(_) => None,
    }
}

fn validate_ray_tracing_flags(
    flags: vk::PipelineCreateFlags,
    features: &DeviceFeatures,
) -> Violations {
    let mut violations = Violations::new();
    let skip_triangles = flags.contains(vk::PipelineCreateFlags::RAY_TRACING_SKIP_TRIANGLES_KHR);
    let skip_aabbs = flags.contains(vk::PipelineCreateFlags::RAY_TRACING_SKIP_AABBS_KHR);

    if skip_triangles && skip_aabbs {
        violations.push(ValidationError {
            context: "flags".into(),
            problem: "contains both `VK_PIPELINE_CREATE_RAY_TRACING_SKIP_TRIANGLES_BIT_KHR` and \
                `VK_PIPELINE_CREATE_RAY_TRACING_SKIP_AABBS_BIT_KHR`"
                .into(),
            vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-flags-06546"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if !features.ray_traversal_primitive_culling {
        for (set, flag, vuids) in [
            (
                skip_triangles,
                "VK_PIPELINE_CREATE_RAY_TRACING_SKIP_TRIANGLES_BIT_KHR",
                &["VUID-VkRayTracingPipelineCreateInfoKHR-rayTraversalPrimitiveCulling-03596"]
                    as &'static [&'static str],
            ),
            (
                skip_aabbs,
                "VK_PIPELINE_CREATE_RAY_TRACING_SKIP_AABBS_BIT_KHR",
                &["VUID-VkRayTracingPipelineCreateInfoKHR-rayTraversalPrimitiveCulling-03597"],
            ),
        ] {
            if set {
                violations.push(ValidationError {
                    context: "flags".into(),
                    problem: format!("contains `{}`", flag).into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "ray_traversal_primitive_culling",
                    )])]),
                    vuids,
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }
    }

    if flags.contains(vk::PipelineCreateFlags::RAY_TRACING_SHADER_GROUP_HANDLE_CAPTURE_REPLAY_KHR)
        && !features.ray_tracing_pipeline_shader_group_handle_capture_replay
    {
        violations.push(ValidationError {
            context: "flags".into(),
            problem: "contains \
                `VK_PIPELINE_CREATE_RAY_TRACING_SHADER_GROUP_HANDLE_CAPTURE_REPLAY_BIT_KHR`"
                .into(),
            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                "ray_tracing_pipeline_shader_group_handle_capture_replay",
            )])]),
            vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-rayTracingPipelineShaderGroupHandleCaptureReplay-03598"],
            kind: ViolationKind::RequirementNotMet,
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::{test_capabilities, test_validator, test_validator_with};
    use ash::vk::{self, Handle};

    fn stage(stage: vk::ShaderStageFlags) -> vk::PipelineShaderStageCreateInfo<'static> {
        vk::PipelineShaderStageCreateInfo::default()
            .stage(stage)
            .module(vk::ShaderModule::from_raw(0x10))
            .name(c"main")
    }

    fn general(index: u32) -> vk::RayTracingShaderGroupCreateInfoKHR<'static> {
        vk::RayTracingShaderGroupCreateInfoKHR::default()
            .ty(vk::RayTracingShaderGroupTypeKHR::GENERAL)
            .general_shader(index)
            .closest_hit_shader(vk::SHADER_UNUSED_KHR)
            .any_hit_shader(vk::SHADER_UNUSED_KHR)
            .intersection_shader(vk::SHADER_UNUSED_KHR)
    }

    fn hit_group(
        ty: vk::RayTracingShaderGroupTypeKHR,
        closest_hit: u32,
        intersection: u32,
    ) -> vk::RayTracingShaderGroupCreateInfoKHR<'static> {
        vk::RayTracingShaderGroupCreateInfoKHR::default()
            .ty(ty)
            .general_shader(vk::SHADER_UNUSED_KHR)
            .closest_hit_shader(closest_hit)
            .any_hit_shader(vk::SHADER_UNUSED_KHR)
            .intersection_shader(intersection)
    }

    #[test]
    fn valid_pipeline() {
        let validator = test_validator();
        let stages = [
            stage(vk::ShaderStageFlags::RAYGEN_KHR),
            stage(vk::ShaderStageFlags::MISS_KHR),
            stage(vk::ShaderStageFlags::CLOSEST_HIT_KHR),
        ];
        let groups = [
            general(0),
            general(1),
            hit_group(
                vk::RayTracingShaderGroupTypeKHR::TRIANGLES_HIT_GROUP,
                2,
                vk::SHADER_UNUSED_KHR,
            ),
        ];
        let create_info = vk::RayTracingPipelineCreateInfoKHR::default()
            .stages(&stages)
            .groups(&groups)
            .max_pipeline_ray_recursion_depth(1)
            .layout(vk::PipelineLayout::from_raw(0x20))
            .base_pipeline_index(-1);

        let violations = unsafe {
            validator.validate_create_ray_tracing_pipelines_khr(
                vk::DeferredOperationKHR::null(),
                vk::PipelineCache::null(),
                1,
                &create_info,
            )
        };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn group_indices_must_match_stages() {
        let validator = test_validator();
        let stages = [
            stage(vk::ShaderStageFlags::MISS_KHR),
            stage(vk::ShaderStageFlags::CLOSEST_HIT_KHR),
            stage(vk::ShaderStageFlags::VERTEX),
        ];
        let groups = [
            general(1),
            hit_group(vk::RayTracingShaderGroupTypeKHR::PROCEDURAL_HIT_GROUP, 0, 7),
        ];
        let create_info = vk::RayTracingPipelineCreateInfoKHR::default()
            .stages(&stages)
            .groups(&groups)
            .max_pipeline_ray_recursion_depth(32)
            .layout(vk::PipelineLayout::from_raw(0x20))
            .base_pipeline_index(-1);

        let violations = unsafe {
            validator.validate_create_ray_tracing_pipelines_khr(
                vk::DeferredOperationKHR::null(),
                vk::PipelineCache::null(),
                1,
                &create_info,
            )
        };
        assert_vuid!(violations, "VUID-VkRayTracingPipelineCreateInfoKHR-stage-06899");
        assert_vuid!(violations, "VUID-VkRayTracingPipelineCreateInfoKHR-stage-03425");
        assert_vuid!(
            violations,
            "VUID-VkRayTracingPipelineCreateInfoKHR-maxPipelineRayRecursionDepth-03589",
        );
        assert_vuid!(violations, "VUID-VkRayTracingShaderGroupCreateInfoKHR-type-03474");
        assert_vuid!(violations, "VUID-VkRayTracingShaderGroupCreateInfoKHR-type-03477");
        assert_vuid!(
            violations,
            "VUID-VkRayTracingShaderGroupCreateInfoKHR-closestHitShader-03478",
        );
        assert_eq!(violations.len(), 6, "{}", violations);
    }

    #[test]
    fn feature_gated_flags() {
        let mut capabilities = test_capabilities();
        capabilities.features.ray_tracing_pipeline = false;
        capabilities.features.ray_traversal_primitive_culling = false;
        let validator = test_validator_with(capabilities);
        let stages = [stage(vk::ShaderStageFlags::RAYGEN_KHR)];
        let groups = [general(0)];
        let create_info = vk::RayTracingPipelineCreateInfoKHR::default()
            .flags(
                vk::PipelineCreateFlags::RAY_TRACING_SKIP_TRIANGLES_KHR
                    | vk::PipelineCreateFlags::RAY_TRACING_SKIP_AABBS_KHR,
            )
            .stages(&stages)
            .groups(&groups)
            .layout(vk::PipelineLayout::from_raw(0x20))
            .base_pipeline_index(-1);

        let violations = unsafe {
            validator.validate_create_ray_tracing_pipelines_khr(
                vk::DeferredOperationKHR::null(),
                vk::PipelineCache::null(),
                1,
                &create_info,
            )
        };
        assert_vuid!(violations, "VUID-vkCreateRayTracingPipelinesKHR-rayTracingPipeline-03586");
        assert_vuid!(violations, "VUID-VkRayTracingPipelineCreateInfoKHR-flags-06546");
        assert_vuid!(
            violations,
            "VUID-VkRayTracingPipelineCreateInfoKHR-rayTraversalPrimitiveCulling-03596",
        );
        assert_vuid!(
            violations,
            "VUID-VkRayTracingPipelineCreateInfoKHR-rayTraversalPrimitiveCulling-03597",
        );
        assert_eq!(violations.len(), 4, "{}", violations);
    }
}
