// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for pipeline layouts and for graphics, compute and ray tracing pipelines.
//!
//! Graphics pipeline state is split over several submodules, one per state block. The rules
//! that are shared by every kind of pipeline, shader stages and pipeline derivatives, live here.

use crate::{
    chain::{AllowedStruct, ChainRules},
    predicates::{
        slice_or_empty, validate_array, validate_flags, validate_required_handle,
        validate_string, validate_struct_type, ArrayRules, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk::{self, Handle};

pub mod color_blend;
pub mod compute;
pub mod dynamic_state;
pub mod graphics;
pub mod layout;
pub mod ray_tracing;
pub mod vertex_input;
pub mod viewport;

pub(crate) const SHADER_STAGES: vk::ShaderStageFlags = flags_mask!(ShaderStageFlags {
    VERTEX,
    TESSELLATION_CONTROL,
    TESSELLATION_EVALUATION,
    GEOMETRY,
    FRAGMENT,
    COMPUTE,
    RAYGEN_KHR,
    ANY_HIT_KHR,
    CLOSEST_HIT_KHR,
    MISS_KHR,
    INTERSECTION_KHR,
    CALLABLE_KHR,
    TASK_EXT,
    MESH_EXT,
});

pub(crate) const GRAPHICS_STAGES: vk::ShaderStageFlags = flags_mask!(ShaderStageFlags {
    VERTEX,
    TESSELLATION_CONTROL,
    TESSELLATION_EVALUATION,
    GEOMETRY,
    FRAGMENT,
    TASK_EXT,
    MESH_EXT,
});

pub(crate) const RAY_TRACING_STAGES: vk::ShaderStageFlags = flags_mask!(ShaderStageFlags {
    RAYGEN_KHR,
    ANY_HIT_KHR,
    CLOSEST_HIT_KHR,
    MISS_KHR,
    INTERSECTION_KHR,
    CALLABLE_KHR,
});

pub(crate) const PIPELINE_CREATE_FLAGS: vk::PipelineCreateFlags =
    flags_mask!(PipelineCreateFlags {
        DISABLE_OPTIMIZATION,
        ALLOW_DERIVATIVES,
        DERIVATIVE,
        VIEW_INDEX_FROM_DEVICE_INDEX,
        DISPATCH_BASE,
        FAIL_ON_PIPELINE_COMPILE_REQUIRED,
        EARLY_RETURN_ON_FAILURE,
        LIBRARY_KHR,
        RAY_TRACING_NO_NULL_ANY_HIT_SHADERS_KHR,
        RAY_TRACING_NO_NULL_CLOSEST_HIT_SHADERS_KHR,
        RAY_TRACING_NO_NULL_MISS_SHADERS_KHR,
        RAY_TRACING_NO_NULL_INTERSECTION_SHADERS_KHR,
        RAY_TRACING_SKIP_TRIANGLES_KHR,
        RAY_TRACING_SKIP_AABBS_KHR,
        RAY_TRACING_SHADER_GROUP_HANDLE_CAPTURE_REPLAY_KHR,
        RETAIN_LINK_TIME_OPTIMIZATION_INFO_EXT,
        LINK_TIME_OPTIMIZATION_EXT,
        DESCRIPTOR_BUFFER_EXT,
    });

const PIPELINE_SHADER_STAGE_CREATE_FLAGS: vk::PipelineShaderStageCreateFlags =
    flags_mask!(PipelineShaderStageCreateFlags {
        ALLOW_VARYING_SUBGROUP_SIZE,
        REQUIRE_FULL_SUBGROUPS,
    });

const PIPELINE_SHADER_STAGE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::PipelineShaderStageRequiredSubgroupSizeCreateInfo<'static>>()
            .requires(RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
                RequiresAllOf(&[Requires::DeviceFeature("subgroup_size_control")]),
            ])),
    ],
    unique: true,
    vuids_next: &["VUID-VkPipelineShaderStageCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkPipelineShaderStageCreateInfo-sType-unique"],
};

/// Flags that only have a meaning for ray tracing pipelines, with the VUIDs that forbid them on
/// graphics and compute pipelines.
pub(crate) const RAY_TRACING_ONLY_FLAGS: [(
    vk::PipelineCreateFlags,
    &[&str],
    &[&str],
); 7] = [
    (
        vk::PipelineCreateFlags::RAY_TRACING_NO_NULL_ANY_HIT_SHADERS_KHR,
        &["VUID-VkGraphicsPipelineCreateInfo-flags-03372"],
        &["VUID-VkComputePipelineCreateInfo-flags-03365"],
    ),
    (
        vk::PipelineCreateFlags::RAY_TRACING_NO_NULL_CLOSEST_HIT_SHADERS_KHR,
        &["VUID-VkGraphicsPipelineCreateInfo-flags-03373"],
        &["VUID-VkComputePipelineCreateInfo-flags-03366"],
    ),
    (
        vk::PipelineCreateFlags::RAY_TRACING_NO_NULL_MISS_SHADERS_KHR,
        &["VUID-VkGraphicsPipelineCreateInfo-flags-03374"],
        &["VUID-VkComputePipelineCreateInfo-flags-03367"],
    ),
    (
        vk::PipelineCreateFlags::RAY_TRACING_NO_NULL_INTERSECTION_SHADERS_KHR,
        &["VUID-VkGraphicsPipelineCreateInfo-flags-03375"],
        &["VUID-VkComputePipelineCreateInfo-flags-03368"],
    ),
    (
        vk::PipelineCreateFlags::RAY_TRACING_SKIP_TRIANGLES_KHR,
        &["VUID-VkGraphicsPipelineCreateInfo-flags-03376"],
        &["VUID-VkComputePipelineCreateInfo-flags-03369"],
    ),
    (
        vk::PipelineCreateFlags::RAY_TRACING_SKIP_AABBS_KHR,
        &["VUID-VkGraphicsPipelineCreateInfo-flags-03377"],
        &["VUID-VkComputePipelineCreateInfo-flags-03370"],
    ),
    (
        vk::PipelineCreateFlags::RAY_TRACING_SHADER_GROUP_HANDLE_CAPTURE_REPLAY_KHR,
        &["VUID-VkGraphicsPipelineCreateInfo-flags-03577"],
        &["VUID-VkComputePipelineCreateInfo-flags-03576"],
    ),
];

/// Which kind of pipeline a rule is being applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PipelineKind {
    Graphics,
    Compute,
    RayTracing,
}

impl PipelineKind {
    fn struct_name(self) -> &'static str {
        match self {
            PipelineKind::Graphics => "VkGraphicsPipelineCreateInfo",
            PipelineKind::Compute => "VkComputePipelineCreateInfo",
            PipelineKind::RayTracing => "VkRayTracingPipelineCreateInfoKHR",
        }
    }
}

/// Reports each ray tracing only flag in `flags`, for a graphics or compute pipeline.
pub(crate) fn validate_ray_tracing_only_flags(
    flags: vk::PipelineCreateFlags,
    kind: PipelineKind,
) -> Violations {
    RAY_TRACING_ONLY_FLAGS
        .iter()
        .filter(|&&(flag, _, _)| flags.contains(flag))
        .map(|&(flag, graphics_vuids, compute_vuids)| ValidationError {
            context: "flags".into(),
            problem: format!(
                "contains {:?}, which is only valid for ray tracing pipelines",
                flag,
            )
            .into(),
            vuids: match kind {
                PipelineKind::Compute => compute_vuids,
                _ => graphics_vuids,
            },
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        })
        .collect()
}

/// Checks the derivative fields of the create info at `index` of a pipeline creation array.
///
/// `all_flags` holds the flags of every element of the array, so that a base pipeline given by
/// index can be checked.
pub(crate) fn validate_pipeline_derivative(
    kind: PipelineKind,
    index: usize,
    flags: vk::PipelineCreateFlags,
    base_pipeline_handle: vk::Pipeline,
    base_pipeline_index: i32,
    all_flags: &[vk::PipelineCreateFlags],
) -> Violations {
    let mut violations = Violations::new();

    if !flags.contains(vk::PipelineCreateFlags::DERIVATIVE) {
        return violations;
    }

    let (vuids_both, vuids_neither, vuids_index, vuids_allow): (
        &'static [&'static str],
        &'static [&'static str],
        &'static [&'static str],
        &'static [&'static str],
    ) = match kind {
        PipelineKind::Graphics => (
            &["VUID-VkGraphicsPipelineCreateInfo-flags-07986"],
            &["VUID-VkGraphicsPipelineCreateInfo-flags-07985"],
            &["VUID-vkCreateGraphicsPipelines-flags-00720"],
            &["VUID-vkCreateGraphicsPipelines-flags-00721"],
        ),
        PipelineKind::Compute => (
            &["VUID-VkComputePipelineCreateInfo-flags-07986"],
            &["VUID-VkComputePipelineCreateInfo-flags-07985"],
            &["VUID-vkCreateComputePipelines-flags-00695"],
            &["VUID-vkCreateComputePipelines-flags-00696"],
        ),
        PipelineKind::RayTracing => (
            &["VUID-VkRayTracingPipelineCreateInfoKHR-flags-07986"],
            &["VUID-VkRayTracingPipelineCreateInfoKHR-flags-07985"],
            &["VUID-vkCreateRayTracingPipelinesKHR-flags-03415"],
            &["VUID-vkCreateRayTracingPipelinesKHR-flags-03416"],
        ),
    };

    let has_handle = !base_pipeline_handle.is_null();
    let has_index = base_pipeline_index != -1;

    match (has_handle, has_index) {
        (true, true) => violations.push(ValidationError {
            context: "base_pipeline_handle".into(),
            problem: "is not `VK_NULL_HANDLE`, but `base_pipeline_index` is also not -1".into(),
            vuids: vuids_both,
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        }),
        (false, false) => violations.push(ValidationError {
            context: "flags".into(),
            problem: "contains `VK_PIPELINE_CREATE_DERIVATIVE_BIT`, but neither \
                `base_pipeline_handle` nor `base_pipeline_index` is set"
                .into(),
            vuids: vuids_neither,
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        }),
        (false, true) => {
            let base_index = usize::try_from(base_pipeline_index)
                .ok()
                .filter(|&base_index| base_index < index);

            match base_index {
                None => violations.push(ValidationError {
                    context: "base_pipeline_index".into(),
                    problem: format!(
                        "is {}, which does not refer to an earlier element of the array",
                        base_pipeline_index,
                    )
                    .into(),
                    vuids: vuids_index,
                    ..Default::default()
                }),
                Some(base_index)
                    if !all_flags[base_index]
                        .contains(vk::PipelineCreateFlags::ALLOW_DERIVATIVES) =>
                {
                    violations.push(ValidationError {
                        context: "base_pipeline_index".into(),
                        problem: format!(
                            "refers to element {}, whose flags do not contain \
                            `VK_PIPELINE_CREATE_ALLOW_DERIVATIVES_BIT`",
                            base_index,
                        )
                        .into(),
                        vuids: vuids_allow,
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    })
                }
                Some(_) => (),
            }
        }
        (true, false) => (),
    }

    violations
}

impl StatelessValidator {
    /// Checks one `VkPipelineShaderStageCreateInfo`. `allowed_stages` are the stages that the
    /// kind of pipeline accepts.
    pub(crate) unsafe fn validate_shader_stage(
        &self,
        stage_info: &vk::PipelineShaderStageCreateInfo<'_>,
        kind: PipelineKind,
        allowed_stages: vk::ShaderStageFlags,
        vuids_stage: &'static [&'static str],
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::PipelineShaderStageCreateInfo {
            p_next,
            flags,
            stage,
            module,
            p_name,
            p_specialization_info,
            ..
        } = stage_info;

        violations.push_opt(validate_struct_type(
            "s_type",
            stage_info,
            &["VUID-VkPipelineShaderStageCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_SHADER_STAGE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            PIPELINE_SHADER_STAGE_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkPipelineShaderStageCreateInfo-flags-parameter"],
            &[],
        ));
        violations.push_opt(validate_flags(
            "stage",
            stage.as_raw(),
            SHADER_STAGES.as_raw(),
            FlagPolicy::RequiredSingleBit,
            &["VUID-VkPipelineShaderStageCreateInfo-stage-parameter"],
            &["VUID-VkPipelineShaderStageCreateInfo-stage-parameter"],
        ));

        if stage.as_raw().count_ones() == 1 && !allowed_stages.contains(stage) {
            violations.push(ValidationError {
                context: "stage".into(),
                problem: format!(
                    "is {:?}, which cannot be used in a {}",
                    stage,
                    kind.struct_name(),
                )
                .into(),
                vuids: vuids_stage,
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        let stage_features: [(vk::ShaderStageFlags, bool, RequiresOneOf, &'static [&'static str]);
            5] = [
            (
                vk::ShaderStageFlags::GEOMETRY,
                features.geometry_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("geometry_shader")])]),
                &["VUID-VkPipelineShaderStageCreateInfo-stage-00704"],
            ),
            (
                vk::ShaderStageFlags::TESSELLATION_CONTROL,
                features.tessellation_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("tessellation_shader")])]),
                &["VUID-VkPipelineShaderStageCreateInfo-stage-00705"],
            ),
            (
                vk::ShaderStageFlags::TESSELLATION_EVALUATION,
                features.tessellation_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("tessellation_shader")])]),
                &["VUID-VkPipelineShaderStageCreateInfo-stage-00705"],
            ),
            (
                vk::ShaderStageFlags::MESH_EXT,
                features.mesh_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("mesh_shader")])]),
                &["VUID-VkPipelineShaderStageCreateInfo-stage-02091"],
            ),
            (
                vk::ShaderStageFlags::TASK_EXT,
                features.task_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("task_shader")])]),
                &["VUID-VkPipelineShaderStageCreateInfo-stage-02092"],
            ),
        ];

        for (stage_bit, enabled, requires_one_of, vuids) in stage_features {
            if stage == stage_bit && !enabled {
                violations.push(ValidationError {
                    context: "stage".into(),
                    problem: format!("is {:?}", stage).into(),
                    requires_one_of,
                    vuids,
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        violations.push_opt(validate_required_handle(
            "module",
            module,
            &["VUID-VkPipelineShaderStageCreateInfo-module-parameter"],
        ));

        if p_name.is_null() {
            violations.push(ValidationError {
                context: "p_name".into(),
                problem: "is null".into(),
                vuids: &["VUID-VkPipelineShaderStageCreateInfo-pName-parameter"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        } else {
            violations.push_opt(validate_string(
                "p_name",
                p_name,
                usize::MAX,
                &["VUID-VkPipelineShaderStageCreateInfo-pName-parameter"],
            ));
        }

        if let Some(specialization_info) = p_specialization_info.as_ref() {
            violations.append(
                validate_specialization_info(specialization_info)
                    .add_context("p_specialization_info"),
            );
        }

        violations
    }

    /// Checks every stage of a pipeline, and that no stage appears twice.
    pub(crate) unsafe fn validate_shader_stages(
        &self,
        stages: &[vk::PipelineShaderStageCreateInfo<'_>],
        kind: PipelineKind,
        allowed_stages: vk::ShaderStageFlags,
        vuids_stage: &'static [&'static str],
        vuids_unique: &'static [&'static str],
    ) -> Violations {
        let mut violations = Violations::new();
        let mut seen = vk::ShaderStageFlags::empty();

        for (index, stage_info) in stages.iter().enumerate() {
            violations.append_with_context(
                self.validate_shader_stage(stage_info, kind, allowed_stages, vuids_stage),
                || format!("p_stages[{}]", index),
            );

            if !vuids_unique.is_empty() {
                if seen.intersects(stage_info.stage) {
                    violations.push(ValidationError {
                        context: format!("p_stages[{}].stage", index).into(),
                        problem: format!(
                            "is {:?}, which is also the stage of an earlier element",
                            stage_info.stage,
                        )
                        .into(),
                        vuids: vuids_unique,
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                seen |= stage_info.stage;
            }
        }

        violations
    }
}

unsafe fn validate_specialization_info(info: &vk::SpecializationInfo<'_>) -> Violations {
    let mut violations = validate_array(
        "map_entry_count",
        "p_map_entries",
        info.map_entry_count,
        info.p_map_entries,
        ArrayRules {
            count_required: false,
            array_required: true,
            count_vuids: &[],
            array_vuids: &["VUID-VkSpecializationInfo-pMapEntries-parameter"],
        },
    );

    if info.data_size != 0 && info.p_data.is_null() {
        violations.push(ValidationError {
            context: "p_data".into(),
            problem: "is null, but `data_size` is not zero".into(),
            vuids: &["VUID-VkSpecializationInfo-pData-parameter"],
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    let entries = slice_or_empty(info.p_map_entries, info.map_entry_count);

    for (index, entry) in entries.iter().enumerate() {
        if entry.offset as usize >= info.data_size {
            violations.push(ValidationError {
                context: format!("p_map_entries[{}].offset", index).into(),
                problem: format!(
                    "is {}, which is not less than `data_size` ({})",
                    entry.offset, info.data_size,
                )
                .into(),
                vuids: &["VUID-VkSpecializationInfo-offset-00773"],
                ..Default::default()
            });
        } else if entry.size > info.data_size - entry.offset as usize {
            violations.push(ValidationError {
                context: format!("p_map_entries[{}].size", index).into(),
                problem: format!(
                    "is {}, which goes past `data_size` ({}) from `offset` ({})",
                    entry.size, info.data_size, entry.offset,
                )
                .into(),
                vuids: &["VUID-VkSpecializationInfo-pMapEntries-00774"],
                ..Default::default()
            });
        }

        if let Some(previous) = entries[..index]
            .iter()
            .position(|other| other.constant_id == entry.constant_id)
        {
            violations.push(ValidationError {
                context: format!("p_map_entries[{}].constant_id", index).into(),
                problem: format!(
                    "is {}, which is also the constant ID of `p_map_entries[{}]`",
                    entry.constant_id, previous,
                )
                .into(),
                vuids: &["VUID-VkSpecializationInfo-constantID-04911"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{test_capabilities, test_validator, test_validator_with};

    #[test]
    fn derivative_rules() {
        let all_flags = [
            vk::PipelineCreateFlags::empty(),
            vk::PipelineCreateFlags::DERIVATIVE,
        ];

        let violations = validate_pipeline_derivative(
            PipelineKind::Graphics,
            1,
            vk::PipelineCreateFlags::DERIVATIVE,
            vk::Pipeline::null(),
            0,
            &all_flags,
        );
        assert_vuid!(violations, "VUID-vkCreateGraphicsPipelines-flags-00721");

        let violations = validate_pipeline_derivative(
            PipelineKind::Compute,
            1,
            vk::PipelineCreateFlags::DERIVATIVE,
            vk::Pipeline::null(),
            1,
            &all_flags,
        );
        assert_vuid!(violations, "VUID-vkCreateComputePipelines-flags-00695");

        let violations = validate_pipeline_derivative(
            PipelineKind::Graphics,
            0,
            vk::PipelineCreateFlags::DERIVATIVE,
            vk::Pipeline::from_raw(9),
            -1,
            &all_flags,
        );
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn shader_stage_rules() {
        let validator = test_validator();
        let map_entries = [
            vk::SpecializationMapEntry {
                constant_id: 0,
                offset: 0,
                size: 4,
            },
            vk::SpecializationMapEntry {
                constant_id: 0,
                offset: 4,
                size: 8,
            },
        ];
        let data = [0u8; 8];
        let specialization_info = vk::SpecializationInfo::default()
            .map_entries(&map_entries)
            .data(&data);
        let stage_info = vk::PipelineShaderStageCreateInfo::default()
            .stage(vk::ShaderStageFlags::COMPUTE)
            .specialization_info(&specialization_info);

        let violations = unsafe {
            validator.validate_shader_stage(
                &stage_info,
                PipelineKind::Graphics,
                GRAPHICS_STAGES,
                &["VUID-VkGraphicsPipelineCreateInfo-pStages-06896"],
            )
        };
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pStages-06896");
        assert_vuid!(violations, "VUID-VkPipelineShaderStageCreateInfo-module-parameter");
        assert_vuid!(violations, "VUID-VkPipelineShaderStageCreateInfo-pName-parameter");
        assert_vuid!(violations, "VUID-VkSpecializationInfo-pMapEntries-00774");
        assert_vuid!(violations, "VUID-VkSpecializationInfo-constantID-04911");
    }

    #[test]
    fn stage_needs_feature() {
        let mut capabilities = test_capabilities();
        capabilities.features.geometry_shader = false;
        let validator = test_validator_with(capabilities);
        let stage_info = vk::PipelineShaderStageCreateInfo::default()
            .stage(vk::ShaderStageFlags::GEOMETRY)
            .module(vk::ShaderModule::from_raw(1))
            .name(c"main");

        let violations = unsafe {
            validator.validate_shader_stage(
                &stage_info,
                PipelineKind::Graphics,
                GRAPHICS_STAGES,
                &["VUID-VkGraphicsPipelineCreateInfo-pStages-06896"],
            )
        };
        assert_vuid!(violations, "VUID-VkPipelineShaderStageCreateInfo-stage-00704");
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(violations[0].kind, ViolationKind::RequirementNotMet);
        assert_eq!(
            violations[0].requires_one_of,
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("geometry_shader")])]),
        );
    }

    #[test]
    fn ray_tracing_flags_on_other_pipelines() {
        let flags = vk::PipelineCreateFlags::RAY_TRACING_SKIP_AABBS_KHR
            | vk::PipelineCreateFlags::RAY_TRACING_NO_NULL_MISS_SHADERS_KHR;

        let violations = validate_ray_tracing_only_flags(flags, PipelineKind::Compute);
        assert_eq!(violations.len(), 2);
        assert_vuid!(violations, "VUID-VkComputePipelineCreateInfo-flags-03370");
        assert_vuid!(violations, "VUID-VkComputePipelineCreateInfo-flags-03367");
    }
}
