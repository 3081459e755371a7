// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Compute pipelines.

use crate::{
    chain::{AllowedStruct, ChainRules},
    pipeline::{
        validate_pipeline_derivative, validate_ray_tracing_only_flags, PipelineKind,
        PIPELINE_CREATE_FLAGS,
    },
    predicates::{
        slice_or_empty, validate_array, validate_flags, validate_required_handle,
        validate_struct_type_array, ArrayRules, FlagPolicy,
    },
    StatelessValidator, ValidationError, ViolationKind, Violations,
};
use ash::vk;
use smallvec::SmallVec;

const COMPUTE_PIPELINE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::of::<vk::PipelineCreationFeedbackCreateInfo<'static>>()],
    unique: true,
    vuids_next: &["VUID-VkComputePipelineCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkComputePipelineCreateInfo-sType-unique"],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCreateComputePipelines`.
    ///
    /// # Safety
    ///
    /// `p_create_infos` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_compute_pipelines(
        &self,
        _pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::ComputePipelineCreateInfo<'_>,
    ) -> Violations {
        let mut violations = validate_array(
            "create_info_count",
            "p_create_infos",
            create_info_count,
            p_create_infos,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCreateComputePipelines-createInfoCount-arraylength"],
                array_vuids: &["VUID-vkCreateComputePipelines-pCreateInfos-parameter"],
            },
        );

        let create_infos = slice_or_empty(p_create_infos, create_info_count);
        violations.append(validate_struct_type_array(
            "p_create_infos",
            create_infos,
            &["VUID-VkComputePipelineCreateInfo-sType-sType"],
        ));

        let all_flags: SmallVec<[vk::PipelineCreateFlags; 4]> =
            create_infos.iter().map(|info| info.flags).collect();

        for (index, create_info) in create_infos.iter().enumerate() {
            violations.append_with_context(
                self.validate_compute_pipeline_create_info(create_info, index, &all_flags),
                || format!("p_create_infos[{}]", index),
            );
        }

        violations
    }

    unsafe fn validate_compute_pipeline_create_info(
        &self,
        create_info: &vk::ComputePipelineCreateInfo<'_>,
        index: usize,
        all_flags: &[vk::PipelineCreateFlags],
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::ComputePipelineCreateInfo {
            p_next,
            flags,
            ref stage,
            layout,
            base_pipeline_handle,
            base_pipeline_index,
            ..
        } = create_info;

        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &COMPUTE_PIPELINE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            PIPELINE_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkComputePipelineCreateInfo-flags-parameter"],
            &[],
        ));
        violations.append(validate_ray_tracing_only_flags(flags, PipelineKind::Compute));

        if flags.contains(vk::PipelineCreateFlags::LIBRARY_KHR) {
            violations.push(ValidationError {
                context: "flags".into(),
                problem: "contains `VK_PIPELINE_CREATE_LIBRARY_BIT_KHR`".into(),
                vuids: &["VUID-VkComputePipelineCreateInfo-flags-03364"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        violations.append(
            self.validate_shader_stage(
                stage,
                PipelineKind::Compute,
                vk::ShaderStageFlags::COMPUTE,
                &["VUID-VkComputePipelineCreateInfo-stage-00701"],
            )
            .add_context("stage"),
        );
        violations.push_opt(validate_required_handle(
            "layout",
            layout,
            &["VUID-VkComputePipelineCreateInfo-layout-parameter"],
        ));
        violations.append(validate_pipeline_derivative(
            PipelineKind::Compute,
            index,
            flags,
            base_pipeline_handle,
            base_pipeline_index,
            all_flags,
        ));

        violations
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::test_validator;
    use ash::vk::{self, Handle};

    fn create_info(stage: vk::ShaderStageFlags) -> vk::ComputePipelineCreateInfo<'static> {
        vk::ComputePipelineCreateInfo::default()
            .stage(
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(stage)
                    .module(vk::ShaderModule::from_raw(0x10))
                    .name(c"main"),
            )
            .layout(vk::PipelineLayout::from_raw(0x20))
            .base_pipeline_index(-1)
    }

    #[test]
    fn compute_stage_and_flags() {
        let validator = test_validator();
        let create_infos = [
            create_info(vk::ShaderStageFlags::COMPUTE),
            create_info(vk::ShaderStageFlags::VERTEX).flags(
                vk::PipelineCreateFlags::LIBRARY_KHR
                    | vk::PipelineCreateFlags::RAY_TRACING_SKIP_AABBS_KHR,
            ),
        ];

        let violations = unsafe {
            validator.validate_create_compute_pipelines(
                vk::PipelineCache::null(),
                2,
                create_infos.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-VkComputePipelineCreateInfo-stage-00701");
        assert_vuid!(violations, "VUID-VkComputePipelineCreateInfo-flags-03364");
        assert_vuid!(violations, "VUID-VkComputePipelineCreateInfo-flags-03370");
        assert_eq!(violations.len(), 3, "{}", violations);
        assert!(violations
            .iter()
            .all(|error| error.context.starts_with("p_create_infos[1]")));
    }

    #[test]
    fn derivative_of_earlier_element() {
        let validator = test_validator();
        let create_infos = [
            create_info(vk::ShaderStageFlags::COMPUTE)
                .flags(vk::PipelineCreateFlags::ALLOW_DERIVATIVES),
            create_info(vk::ShaderStageFlags::COMPUTE)
                .flags(vk::PipelineCreateFlags::DERIVATIVE)
                .base_pipeline_index(0),
            create_info(vk::ShaderStageFlags::COMPUTE)
                .flags(vk::PipelineCreateFlags::DERIVATIVE)
                .base_pipeline_index(1),
        ];

        let violations = unsafe {
            validator.validate_create_compute_pipelines(
                vk::PipelineCache::null(),
                3,
                create_infos.as_ptr(),
            )
        };
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_vuid!(violations, "VUID-vkCreateComputePipelines-flags-00696");
    }
}
