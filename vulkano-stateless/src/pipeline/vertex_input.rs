// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Vertex input and input assembly state.

use crate::{
    chain::ChainRules,
    format::FORMAT_VALUES,
    predicates::{
        is_true, slice_or_empty, validate_array, validate_flags, validate_ranged_enum,
        validate_struct_type, ArrayRules, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, ViolationKind,
    Violations,
};
use ash::vk;
use smallvec::SmallVec;
use std::ops::RangeInclusive;

const PRIMITIVE_TOPOLOGY_VALUES: &[RangeInclusive<i32>] =
    enum_values!(PrimitiveTopology { POINT_LIST..=PATCH_LIST });

const VERTEX_INPUT_RATE_VALUES: &[RangeInclusive<i32>] =
    enum_values!(VertexInputRate { VERTEX..=INSTANCE });

const PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkPipelineVertexInputStateCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkPipelineVertexInputStateCreateInfo-sType-unique"],
};

const PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkPipelineInputAssemblyStateCreateInfo-pNext-pNext"],
    vuids_unique: &[],
};

impl StatelessValidator {
    /// Checks the vertex input state of a graphics pipeline.
    ///
    /// The format of each attribute is looked up in the driver, when a query object is
    /// available.
    pub(crate) unsafe fn validate_vertex_input_state(
        &self,
        vertex_input_state: &vk::PipelineVertexInputStateCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let properties = &self.capabilities().properties;
        let &vk::PipelineVertexInputStateCreateInfo {
            p_next,
            flags,
            vertex_binding_description_count,
            p_vertex_binding_descriptions,
            vertex_attribute_description_count,
            p_vertex_attribute_descriptions,
            ..
        } = vertex_input_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            vertex_input_state,
            &["VUID-VkPipelineVertexInputStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineVertexInputStateCreateInfo-flags-zerobitmask"],
            &[],
        ));

        if vertex_binding_description_count > properties.max_vertex_input_bindings {
            violations.push(ValidationError {
                context: "vertex_binding_description_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_vertex_input_bindings` limit ({})",
                    vertex_binding_description_count, properties.max_vertex_input_bindings,
                )
                .into(),
                vuids: &[
                    "VUID-VkPipelineVertexInputStateCreateInfo-vertexBindingDescriptionCount-00613",
                ],
                ..Default::default()
            });
        }

        if vertex_attribute_description_count > properties.max_vertex_input_attributes {
            violations.push(ValidationError {
                context: "vertex_attribute_description_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_vertex_input_attributes` limit ({})",
                    vertex_attribute_description_count, properties.max_vertex_input_attributes,
                )
                .into(),
                vuids: &[
                    "VUID-VkPipelineVertexInputStateCreateInfo-vertexAttributeDescriptionCount-00614",
                ],
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "vertex_binding_description_count",
            "p_vertex_binding_descriptions",
            vertex_binding_description_count,
            p_vertex_binding_descriptions,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &[
                    "VUID-VkPipelineVertexInputStateCreateInfo-pVertexBindingDescriptions-parameter",
                ],
            },
        ));
        violations.append(validate_array(
            "vertex_attribute_description_count",
            "p_vertex_attribute_descriptions",
            vertex_attribute_description_count,
            p_vertex_attribute_descriptions,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &[
                    "VUID-VkPipelineVertexInputStateCreateInfo-pVertexAttributeDescriptions-parameter",
                ],
            },
        ));

        let bindings = slice_or_empty(
            p_vertex_binding_descriptions,
            vertex_binding_description_count,
        );
        let mut seen_bindings: SmallVec<[(u32, usize); 8]> = SmallVec::new();

        for (index, description) in bindings.iter().enumerate() {
            let mut description_violations = Violations::new();

            if description.binding >= properties.max_vertex_input_bindings {
                description_violations.push(ValidationError {
                    context: "binding".into(),
                    problem: format!(
                        "is {}, which is not less than the `max_vertex_input_bindings` limit \
                        ({})",
                        description.binding, properties.max_vertex_input_bindings,
                    )
                    .into(),
                    vuids: &["VUID-VkVertexInputBindingDescription-binding-00618"],
                    ..Default::default()
                });
            }

            if description.stride > properties.max_vertex_input_binding_stride {
                description_violations.push(ValidationError {
                    context: "stride".into(),
                    problem: format!(
                        "is {}, which is greater than the `max_vertex_input_binding_stride` \
                        limit ({})",
                        description.stride, properties.max_vertex_input_binding_stride,
                    )
                    .into(),
                    vuids: &["VUID-VkVertexInputBindingDescription-stride-00619"],
                    ..Default::default()
                });
            }

            description_violations.push_opt(validate_ranged_enum(
                "input_rate",
                description.input_rate.as_raw(),
                VERTEX_INPUT_RATE_VALUES,
                &["VUID-VkVertexInputBindingDescription-inputRate-parameter"],
            ));

            if let Some(&(_, previous)) = seen_bindings
                .iter()
                .find(|&&(binding, _)| binding == description.binding)
            {
                description_violations.push(ValidationError {
                    context: "binding".into(),
                    problem: format!(
                        "is {}, which is also the binding of \
                        `p_vertex_binding_descriptions[{}]`",
                        description.binding, previous,
                    )
                    .into(),
                    vuids: &["VUID-VkPipelineVertexInputStateCreateInfo-pVertexBindingDescriptions-00616"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            } else {
                seen_bindings.push((description.binding, index));
            }

            violations.append_with_context(description_violations, || {
                format!("p_vertex_binding_descriptions[{}]", index)
            });
        }

        let attributes = slice_or_empty(
            p_vertex_attribute_descriptions,
            vertex_attribute_description_count,
        );
        let mut seen_locations: SmallVec<[(u32, usize); 16]> = SmallVec::new();

        for (index, description) in attributes.iter().enumerate() {
            let mut description_violations = Violations::new();

            if description.location >= properties.max_vertex_input_attributes {
                description_violations.push(ValidationError {
                    context: "location".into(),
                    problem: format!(
                        "is {}, which is not less than the `max_vertex_input_attributes` limit \
                        ({})",
                        description.location, properties.max_vertex_input_attributes,
                    )
                    .into(),
                    vuids: &["VUID-VkVertexInputAttributeDescription-location-00620"],
                    ..Default::default()
                });
            }

            if description.binding >= properties.max_vertex_input_bindings {
                description_violations.push(ValidationError {
                    context: "binding".into(),
                    problem: format!(
                        "is {}, which is not less than the `max_vertex_input_bindings` limit \
                        ({})",
                        description.binding, properties.max_vertex_input_bindings,
                    )
                    .into(),
                    vuids: &["VUID-VkVertexInputAttributeDescription-binding-00621"],
                    ..Default::default()
                });
            }

            if description.offset > properties.max_vertex_input_attribute_offset {
                description_violations.push(ValidationError {
                    context: "offset".into(),
                    problem: format!(
                        "is {}, which is greater than the `max_vertex_input_attribute_offset` \
                        limit ({})",
                        description.offset, properties.max_vertex_input_attribute_offset,
                    )
                    .into(),
                    vuids: &["VUID-VkVertexInputAttributeDescription-offset-00622"],
                    ..Default::default()
                });
            }

            match validate_ranged_enum(
                "format",
                description.format.as_raw(),
                FORMAT_VALUES,
                &["VUID-VkVertexInputAttributeDescription-format-parameter"],
            ) {
                Some(error) => description_violations.push(error),
                None => {
                    let supported = self.format_properties(description.format).map(|props| {
                        props
                            .buffer_features
                            .contains(vk::FormatFeatureFlags::VERTEX_BUFFER)
                    });

                    if supported == Some(false) {
                        description_violations.push(ValidationError {
                            context: "format".into(),
                            problem: format!(
                                "is {:?}, whose buffer features do not contain \
                                `VK_FORMAT_FEATURE_VERTEX_BUFFER_BIT`",
                                description.format,
                            )
                            .into(),
                            vuids: &["VUID-VkVertexInputAttributeDescription-format-00623"],
                            ..Default::default()
                        });
                    }
                }
            }

            if let Some(&(_, previous)) = seen_locations
                .iter()
                .find(|&&(location, _)| location == description.location)
            {
                description_violations.push(ValidationError {
                    context: "location".into(),
                    problem: format!(
                        "is {}, which is also the location of \
                        `p_vertex_attribute_descriptions[{}]`",
                        description.location, previous,
                    )
                    .into(),
                    vuids: &["VUID-VkPipelineVertexInputStateCreateInfo-pVertexAttributeDescriptions-00617"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            } else {
                seen_locations.push((description.location, index));
            }

            violations.append_with_context(description_violations, || {
                format!("p_vertex_attribute_descriptions[{}]", index)
            });
        }

        violations
    }

    /// Checks the input assembly state of a graphics pipeline.
    pub(crate) unsafe fn validate_input_assembly_state(
        &self,
        input_assembly_state: &vk::PipelineInputAssemblyStateCreateInfo<'_>,
        primitive_restart_dynamic: bool,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let &vk::PipelineInputAssemblyStateCreateInfo {
            p_next,
            flags,
            topology,
            primitive_restart_enable,
            ..
        } = input_assembly_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            input_assembly_state,
            &["VUID-VkPipelineInputAssemblyStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineInputAssemblyStateCreateInfo-flags-zerobitmask"],
            &[],
        ));

        if let Some(error) = validate_ranged_enum(
            "topology",
            topology.as_raw(),
            PRIMITIVE_TOPOLOGY_VALUES,
            &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-parameter"],
        ) {
            violations.push(error);
            return violations;
        }

        let is_list = matches!(
            topology,
            vk::PrimitiveTopology::POINT_LIST
                | vk::PrimitiveTopology::LINE_LIST
                | vk::PrimitiveTopology::TRIANGLE_LIST
                | vk::PrimitiveTopology::LINE_LIST_WITH_ADJACENCY
                | vk::PrimitiveTopology::TRIANGLE_LIST_WITH_ADJACENCY
                | vk::PrimitiveTopology::PATCH_LIST
        );

        if !primitive_restart_dynamic
            && is_true(primitive_restart_enable)
            && is_list
            && !capabilities
                .enabled_extensions
                .ext_primitive_topology_list_restart
        {
            violations.push(ValidationError {
                context: "primitive_restart_enable".into(),
                problem: format!("is `VK_TRUE`, but `topology` is the list topology {:?}", topology)
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "ext_primitive_topology_list_restart",
                )])]),
                vuids: &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-06252"],
                kind: ViolationKind::IllegalCombination,
            });
        }

        let is_adjacency = matches!(
            topology,
            vk::PrimitiveTopology::LINE_LIST_WITH_ADJACENCY
                | vk::PrimitiveTopology::LINE_STRIP_WITH_ADJACENCY
                | vk::PrimitiveTopology::TRIANGLE_LIST_WITH_ADJACENCY
                | vk::PrimitiveTopology::TRIANGLE_STRIP_WITH_ADJACENCY
        );

        if is_adjacency && !capabilities.features.geometry_shader {
            violations.push(ValidationError {
                context: "topology".into(),
                problem: format!("is {:?}", topology).into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "geometry_shader",
                )])]),
                vuids: &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-00429"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if topology == vk::PrimitiveTopology::PATCH_LIST
            && !capabilities.features.tessellation_shader
        {
            violations.push(ValidationError {
                context: "topology".into(),
                problem: "is `VK_PRIMITIVE_TOPOLOGY_PATCH_LIST`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "tessellation_shader",
                )])]),
                vuids: &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-00430"],
                kind: ViolationKind::RequirementNotMet,
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
    use ash::vk;

    #[test]
    fn vertex_input_duplicates_and_formats() {
        let validator = test_validator();
        let bindings = [
            vk::VertexInputBindingDescription {
                binding: 0,
                stride: 16,
                input_rate: vk::VertexInputRate::VERTEX,
            },
            vk::VertexInputBindingDescription {
                binding: 0,
                stride: 4096,
                input_rate: vk::VertexInputRate::INSTANCE,
            },
        ];
        let attributes = [
            vk::VertexInputAttributeDescription {
                location: 0,
                binding: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: 0,
            },
            vk::VertexInputAttributeDescription {
                location: 0,
                binding: 0,
                format: vk::Format::D32_SFLOAT,
                offset: 12,
            },
        ];
        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&bindings)
            .vertex_attribute_descriptions(&attributes);

        let violations = unsafe { validator.validate_vertex_input_state(&vertex_input_state) };
        assert_vuid!(
            violations,
            "VUID-VkPipelineVertexInputStateCreateInfo-pVertexBindingDescriptions-00616",
        );
        assert_vuid!(
            violations,
            "VUID-VkPipelineVertexInputStateCreateInfo-pVertexAttributeDescriptions-00617",
        );
        assert_vuid!(violations, "VUID-VkVertexInputBindingDescription-stride-00619");
        assert_vuid!(violations, "VUID-VkVertexInputAttributeDescription-format-00623");
        assert_eq!(violations.len(), 4, "{}", violations);
    }

    #[test]
    fn input_assembly_rules() {
        let validator = test_validator_with(crate::DeviceCapabilities {
            features: DeviceFeatures {
                geometry_shader: false,
                ..DeviceFeatures::all()
            },
            ..test_capabilities()
        });
        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(vk::PrimitiveTopology::TRIANGLE_LIST_WITH_ADJACENCY)
            .primitive_restart_enable(true);

        let violations = unsafe {
            validator.validate_input_assembly_state(&input_assembly_state, false)
        };
        assert_vuid!(violations, "VUID-VkPipelineInputAssemblyStateCreateInfo-topology-06252");
        assert_vuid!(violations, "VUID-VkPipelineInputAssemblyStateCreateInfo-topology-00429");

        let violations = unsafe {
            test_validator().validate_input_assembly_state(&input_assembly_state, true)
        };
        assert!(violations.is_empty(), "{}", violations);
    }
}
