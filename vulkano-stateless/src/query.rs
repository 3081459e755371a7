// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for query pools.

use crate::{
    chain::{chain_contains_tag, AllowedStruct, ChainRules},
    predicates::{
        is_aligned, validate_flags, validate_ranged_enum, validate_required_handle,
        validate_required_pointer, validate_struct_type, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, SupportsRequirements,
    ValidationError, ViolationKind, Violations,
};
use ash::vk;
use std::ffi::c_void;

const QUERY_POOL_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::tag(vk::StructureType::QUERY_POOL_PERFORMANCE_CREATE_INFO_KHR),
        AllowedStruct::tag(vk::StructureType::QUERY_POOL_PERFORMANCE_QUERY_CREATE_INFO_INTEL),
    ],
    unique: true,
    vuids_next: &["VUID-VkQueryPoolCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkQueryPoolCreateInfo-sType-unique"],
};

pub(crate) const PIPELINE_STATISTICS: vk::QueryPipelineStatisticFlags =
    flags_mask!(QueryPipelineStatisticFlags {
        INPUT_ASSEMBLY_VERTICES,
        INPUT_ASSEMBLY_PRIMITIVES,
        VERTEX_SHADER_INVOCATIONS,
        GEOMETRY_SHADER_INVOCATIONS,
        GEOMETRY_SHADER_PRIMITIVES,
        CLIPPING_INVOCATIONS,
        CLIPPING_PRIMITIVES,
        FRAGMENT_SHADER_INVOCATIONS,
        TESSELLATION_CONTROL_SHADER_PATCHES,
        TESSELLATION_EVALUATION_SHADER_INVOCATIONS,
        COMPUTE_SHADER_INVOCATIONS,
        TASK_SHADER_INVOCATIONS_EXT,
        MESH_SHADER_INVOCATIONS_EXT,
    });

/// The query types that come from a device extension, and the extension.
const EXTENSION_QUERY_TYPES: &[(vk::QueryType, RequiresOneOf)] = &[
    (
        vk::QueryType::ACCELERATION_STRUCTURE_COMPACTED_SIZE_KHR,
        RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
            "khr_acceleration_structure",
        )])]),
    ),
    (
        vk::QueryType::ACCELERATION_STRUCTURE_SERIALIZATION_SIZE_KHR,
        RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
            "khr_acceleration_structure",
        )])]),
    ),
    (
        vk::QueryType::MESH_PRIMITIVES_GENERATED_EXT,
        RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension("ext_mesh_shader")])]),
    ),
];

impl StatelessValidator {
    /// Validates the arguments of `vkCreateQueryPool`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_query_pool(
        &self,
        create_info: &vk::QueryPoolCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let &vk::QueryPoolCreateInfo {
            p_next,
            flags,
            query_type,
            query_count,
            pipeline_statistics,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkQueryPoolCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &QUERY_POOL_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkQueryPoolCreateInfo-flags-zerobitmask"],
            &[],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.query_type",
            query_type.as_raw(),
            enum_values!(QueryType {
                OCCLUSION..=TIMESTAMP,
                ACCELERATION_STRUCTURE_COMPACTED_SIZE_KHR,
                ACCELERATION_STRUCTURE_SERIALIZATION_SIZE_KHR,
                ACCELERATION_STRUCTURE_SERIALIZATION_BOTTOM_LEVEL_POINTERS_KHR,
                ACCELERATION_STRUCTURE_SIZE_KHR,
                PERFORMANCE_QUERY_KHR,
                TRANSFORM_FEEDBACK_STREAM_EXT,
                PRIMITIVES_GENERATED_EXT,
                MESH_PRIMITIVES_GENERATED_EXT,
            }),
            &["VUID-VkQueryPoolCreateInfo-queryType-parameter"],
        ));

        if let Some(&(_, requires_one_of)) = EXTENSION_QUERY_TYPES
            .iter()
            .find(|&&(extension_type, _)| extension_type == query_type)
        {
            if !capabilities.satisfies(requires_one_of) {
                violations.push(ValidationError {
                    context: "create_info.query_type".into(),
                    problem: format!("is {:?}", query_type).into(),
                    requires_one_of,
                    vuids: &["VUID-VkQueryPoolCreateInfo-queryType-parameter"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        if query_count == 0 {
            violations.push(ValidationError {
                context: "create_info.query_count".into(),
                problem: "is zero".into(),
                vuids: &["VUID-VkQueryPoolCreateInfo-queryCount-02763"],
                ..Default::default()
            });
        }

        match query_type {
            vk::QueryType::PIPELINE_STATISTICS => {
                if !capabilities.features.pipeline_statistics_query {
                    violations.push(ValidationError {
                        context: "create_info.query_type".into(),
                        problem: "is `VK_QUERY_TYPE_PIPELINE_STATISTICS`".into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("pipeline_statistics_query"),
                        ])]),
                        vuids: &["VUID-VkQueryPoolCreateInfo-queryType-00791"],
                        kind: ViolationKind::RequirementNotMet,
                    });
                }

                violations.push_opt(validate_flags(
                    "create_info.pipeline_statistics",
                    pipeline_statistics.as_raw(),
                    PIPELINE_STATISTICS.as_raw(),
                    FlagPolicy::Required,
                    &["VUID-VkQueryPoolCreateInfo-queryType-00792"],
                    &["VUID-VkQueryPoolCreateInfo-queryType-00792"],
                ));
            }
            vk::QueryType::PERFORMANCE_QUERY_KHR => {
                if !chain_contains_tag(
                    p_next,
                    vk::StructureType::QUERY_POOL_PERFORMANCE_CREATE_INFO_KHR,
                ) {
                    violations.push(ValidationError {
                        context: "create_info.p_next".into(),
                        problem: "does not include a `VkQueryPoolPerformanceCreateInfoKHR` \
                            structure, but `query_type` is `VK_QUERY_TYPE_PERFORMANCE_QUERY_KHR`"
                            .into(),
                        vuids: &["VUID-VkQueryPoolCreateInfo-queryType-03222"],
                        kind: ViolationKind::MissingCompanion,
                        ..Default::default()
                    });
                }
            }
            _ => (),
        }

        violations
    }

    /// Validates the arguments of `vkGetQueryPoolResults`.
    pub fn validate_get_query_pool_results(
        &self,
        query_pool: vk::QueryPool,
        _first_query: u32,
        query_count: u32,
        data_size: usize,
        p_data: *const c_void,
        stride: vk::DeviceSize,
        flags: vk::QueryResultFlags,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_required_handle(
            "query_pool",
            query_pool,
            &["VUID-vkGetQueryPoolResults-queryPool-parameter"],
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            flags_mask!(QueryResultFlags {
                TYPE_64,
                WAIT,
                WITH_AVAILABILITY,
                PARTIAL,
                WITH_STATUS_KHR,
            })
            .as_raw(),
            FlagPolicy::Optional,
            &["VUID-vkGetQueryPoolResults-flags-parameter"],
            &[],
        ));

        if data_size == 0 {
            violations.push(ValidationError {
                context: "data_size".into(),
                problem: "is zero".into(),
                vuids: &["VUID-vkGetQueryPoolResults-dataSize-arraylength"],
                ..Default::default()
            });
        } else {
            violations.push_opt(validate_required_pointer(
                "p_data",
                p_data,
                &["VUID-vkGetQueryPoolResults-pData-parameter"],
            ));
        }

        let (alignment, vuids): (u64, &'static [&'static str]) =
            if flags.contains(vk::QueryResultFlags::TYPE_64) {
                (8, &["VUID-vkGetQueryPoolResults-flags-02828"])
            } else {
                (4, &["VUID-vkGetQueryPoolResults-flags-02827"])
            };

        if !is_aligned(stride, alignment) {
            violations.push(ValidationError {
                context: "stride".into(),
                problem: format!("is {}, which is not a multiple of {}", stride, alignment).into(),
                vuids,
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        if !p_data.is_null() && !is_aligned(p_data as u64, alignment) {
            violations.push(ValidationError {
                context: "p_data".into(),
                problem: format!("is not aligned to {} bytes", alignment).into(),
                vuids,
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        if query_count > 1 && stride == 0 {
            violations.push(ValidationError {
                context: "stride".into(),
                problem: format!(
                    "is zero, but `query_count` is {}, so the results would overlap",
                    query_count,
                )
                .into(),
                vuids: &["VUID-vkGetQueryPoolResults-queryCount-09438"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if flags.contains(
            vk::QueryResultFlags::WITH_STATUS_KHR | vk::QueryResultFlags::WITH_AVAILABILITY,
        ) {
            violations.push(ValidationError {
                context: "flags".into(),
                problem: "contains both `VK_QUERY_RESULT_WITH_STATUS_BIT_KHR` and \
                    `VK_QUERY_RESULT_WITH_AVAILABILITY_BIT`"
                    .into(),
                vuids: &["VUID-vkGetQueryPoolResults-flags-09443"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        features::DeviceFeatures,
        tests::{test_capabilities, test_validator, test_validator_with},
    };
    use ash::vk::{self, Handle};
    use std::{ffi::c_void, ptr};

    #[test]
    fn create_query_pool_rules() {
        let validator = test_validator();
        let create_info = vk::QueryPoolCreateInfo::default()
            .query_type(vk::QueryType::OCCLUSION)
            .query_count(16);
        let violations = unsafe { validator.validate_create_query_pool(&create_info) };
        assert!(violations.is_empty(), "{}", violations);

        let create_info = create_info.query_count(0);
        let violations = unsafe { validator.validate_create_query_pool(&create_info) };
        assert_vuid!(violations, "VUID-VkQueryPoolCreateInfo-queryCount-02763");

        let create_info = vk::QueryPoolCreateInfo::default()
            .query_type(vk::QueryType::PERFORMANCE_QUERY_KHR)
            .query_count(1);
        let violations = unsafe { validator.validate_create_query_pool(&create_info) };
        assert_vuid!(violations, "VUID-VkQueryPoolCreateInfo-queryType-03222");
    }

    #[test]
    fn pipeline_statistics_needs_feature_and_flags() {
        let mut capabilities = test_capabilities();
        capabilities.features = DeviceFeatures {
            pipeline_statistics_query: false,
            ..DeviceFeatures::all()
        };
        let validator = test_validator_with(capabilities);
        let create_info = vk::QueryPoolCreateInfo::default()
            .query_type(vk::QueryType::PIPELINE_STATISTICS)
            .query_count(1);

        let violations = unsafe { validator.validate_create_query_pool(&create_info) };
        assert_vuid!(violations, "VUID-VkQueryPoolCreateInfo-queryType-00791");
        assert_eq!(
            violations.count_vuid("VUID-VkQueryPoolCreateInfo-queryType-00792"),
            1,
        );
    }

    #[test]
    fn query_results_alignment() {
        let validator = test_validator();
        let mut data = [0u64; 4];
        let p_data = data.as_mut_ptr() as *const c_void;
        let pool = vk::QueryPool::from_raw(9);

        let violations = validator.validate_get_query_pool_results(
            pool,
            0,
            4,
            32,
            p_data,
            8,
            vk::QueryResultFlags::TYPE_64,
        );
        assert!(violations.is_empty(), "{}", violations);

        let violations = validator.validate_get_query_pool_results(
            pool,
            0,
            4,
            32,
            p_data,
            12,
            vk::QueryResultFlags::TYPE_64,
        );
        assert_vuid!(violations, "VUID-vkGetQueryPoolResults-flags-02828");

        let violations = validator.validate_get_query_pool_results(
            pool,
            0,
            2,
            32,
            ptr::null(),
            0,
            vk::QueryResultFlags::WITH_STATUS_KHR | vk::QueryResultFlags::WITH_AVAILABILITY,
        );
        assert_vuid!(violations, "VUID-vkGetQueryPoolResults-pData-parameter");
        assert_vuid!(violations, "VUID-vkGetQueryPoolResults-queryCount-09438");
        assert_vuid!(violations, "VUID-vkGetQueryPoolResults-flags-09443");
    }
}
