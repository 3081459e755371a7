// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Pipeline layouts and push constant ranges.

use crate::{
    chain::ChainRules,
    pipeline::SHADER_STAGES,
    predicates::{
        slice_or_empty, validate_array, validate_flags, validate_struct_type, ArrayRules,
        FlagPolicy,
    },
    properties::DeviceProperties,
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, ViolationKind,
    Violations,
};
use ash::vk::{self, Handle};

const PIPELINE_LAYOUT_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkPipelineLayoutCreateInfo-pNext-pNext"],
    vuids_unique: &[],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCreatePipelineLayout`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_pipeline_layout(
        &self,
        create_info: &vk::PipelineLayoutCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let properties = &capabilities.properties;
        let &vk::PipelineLayoutCreateInfo {
            p_next,
            flags,
            set_layout_count,
            p_set_layouts,
            push_constant_range_count,
            p_push_constant_ranges,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkPipelineLayoutCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &PIPELINE_LAYOUT_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            vk::PipelineLayoutCreateFlags::INDEPENDENT_SETS_EXT.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkPipelineLayoutCreateInfo-flags-parameter"],
            &[],
        ));

        let independent_sets =
            flags.contains(vk::PipelineLayoutCreateFlags::INDEPENDENT_SETS_EXT);

        if independent_sets && !capabilities.features.graphics_pipeline_library {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_PIPELINE_LAYOUT_CREATE_INDEPENDENT_SETS_BIT_EXT`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "graphics_pipeline_library",
                )])]),
                vuids: &["VUID-VkPipelineLayoutCreateInfo-graphicsPipelineLibrary-06753"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if set_layout_count > properties.max_bound_descriptor_sets {
            violations.push(ValidationError {
                context: "create_info.set_layout_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_bound_descriptor_sets` limit ({})",
                    set_layout_count, properties.max_bound_descriptor_sets,
                )
                .into(),
                vuids: &["VUID-VkPipelineLayoutCreateInfo-setLayoutCount-00286"],
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "create_info.set_layout_count",
            "create_info.p_set_layouts",
            set_layout_count,
            p_set_layouts,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkPipelineLayoutCreateInfo-pSetLayouts-parameter"],
            },
        ));

        // Null set layouts are only allowed with independent sets.
        if !independent_sets {
            for (index, set_layout) in slice_or_empty(p_set_layouts, set_layout_count)
                .iter()
                .enumerate()
            {
                if set_layout.is_null() {
                    violations.push(ValidationError {
                        context: format!("create_info.p_set_layouts[{}]", index).into(),
                        problem: "is `VK_NULL_HANDLE`, but `create_info.flags` does not \
                            contain `VK_PIPELINE_LAYOUT_CREATE_INDEPENDENT_SETS_BIT_EXT`"
                            .into(),
                        vuids: &["VUID-VkPipelineLayoutCreateInfo-graphicsPipelineLibrary-06753"],
                        kind: ViolationKind::MissingCompanion,
                        ..Default::default()
                    });
                }
            }
        }

        violations.append(validate_array(
            "create_info.push_constant_range_count",
            "create_info.p_push_constant_ranges",
            push_constant_range_count,
            p_push_constant_ranges,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkPipelineLayoutCreateInfo-pPushConstantRanges-parameter"],
            },
        ));

        let ranges = slice_or_empty(p_push_constant_ranges, push_constant_range_count);
        let mut seen_stages = vk::ShaderStageFlags::empty();

        for (index, range) in ranges.iter().enumerate() {
            violations.append_with_context(validate_push_constant_range(range, properties), || {
                format!("create_info.p_push_constant_ranges[{}]", index)
            });

            if seen_stages.intersects(range.stage_flags) {
                violations.push(ValidationError {
                    context: format!("create_info.p_push_constant_ranges[{}].stage_flags", index)
                        .into(),
                    problem: "shares a stage with an earlier push constant range".into(),
                    vuids: &["VUID-VkPipelineLayoutCreateInfo-pPushConstantRanges-00292"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            seen_stages |= range.stage_flags;
        }

        violations
    }
}

fn validate_push_constant_range(
    range: &vk::PushConstantRange,
    properties: &DeviceProperties,
) -> Violations {
    let mut violations = Violations::new();
    let max_size = properties.max_push_constants_size;
    let &vk::PushConstantRange {
        stage_flags,
        offset,
        size,
    } = range;

    violations.push_opt(validate_flags(
        "stage_flags",
        stage_flags.as_raw(),
        SHADER_STAGES.as_raw(),
        FlagPolicy::Required,
        &["VUID-VkPushConstantRange-stageFlags-parameter"],
        &["VUID-VkPushConstantRange-stageFlags-requiredbitmask"],
    ));

    if offset >= max_size {
        violations.push(ValidationError {
            context: "offset".into(),
            problem: format!(
                "is {}, which is not less than the `max_push_constants_size` limit ({})",
                offset, max_size,
            )
            .into(),
            vuids: &["VUID-VkPushConstantRange-offset-00294"],
            ..Default::default()
        });
    }

    if offset % 4 != 0 {
        violations.push(ValidationError {
            context: "offset".into(),
            problem: format!("is {}, which is not a multiple of 4", offset).into(),
            vuids: &["VUID-VkPushConstantRange-offset-00295"],
            kind: ViolationKind::Misaligned,
            ..Default::default()
        });
    }

    if size == 0 {
        violations.push(ValidationError {
            context: "size".into(),
            problem: "is zero".into(),
            vuids: &["VUID-VkPushConstantRange-size-00296"],
            ..Default::default()
        });
    } else if size % 4 != 0 {
        violations.push(ValidationError {
            context: "size".into(),
            problem: format!("is {}, which is not a multiple of 4", size).into(),
            vuids: &["VUID-VkPushConstantRange-size-00297"],
            kind: ViolationKind::Misaligned,
            ..Default::default()
        });
    }

    if offset < max_size && size > max_size - offset {
        violations.push(ValidationError {
            context: "size".into(),
            problem: format!(
                "is {}, which goes past the `max_push_constants_size` limit ({}) from `offset` \
                ({})",
                size, max_size, offset,
            )
            .into(),
            vuids: &["VUID-VkPushConstantRange-size-00298"],
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::test_validator;
    use ash::vk::{self, Handle};

    #[test]
    fn pipeline_layout_limits() {
        let validator = test_validator();
        let set_layouts = [vk::DescriptorSetLayout::from_raw(1); 33];
        let create_info = vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts);

        let violations = unsafe { validator.validate_create_pipeline_layout(&create_info) };
        assert_vuid!(violations, "VUID-VkPipelineLayoutCreateInfo-setLayoutCount-00286");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn push_constant_ranges() {
        let validator = test_validator();
        let ranges = [
            vk::PushConstantRange {
                stage_flags: vk::ShaderStageFlags::VERTEX,
                offset: 0,
                size: 64,
            },
            vk::PushConstantRange {
                stage_flags: vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
                offset: 250,
                size: 16,
            },
        ];
        let create_info = vk::PipelineLayoutCreateInfo::default().push_constant_ranges(&ranges);

        let violations = unsafe { validator.validate_create_pipeline_layout(&create_info) };
        assert_vuid!(violations, "VUID-VkPipelineLayoutCreateInfo-pPushConstantRanges-00292");
        assert_vuid!(violations, "VUID-VkPushConstantRange-offset-00295");
        assert_vuid!(violations, "VUID-VkPushConstantRange-size-00298");
        assert_no_vuid!(violations, "VUID-VkPushConstantRange-offset-00294");
    }
}
