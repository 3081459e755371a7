// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for descriptor set layouts, descriptor pools, and allocating and updating descriptor
//! sets.

use crate::{
    chain::{find_in_chain, AllowedStruct, ChainRules},
    features::DeviceFeatures,
    image::IMAGE_LAYOUT_VALUES,
    pipeline::SHADER_STAGES,
    predicates::{
        is_aligned, slice_or_empty, validate_array, validate_flags, validate_ranged_enum,
        validate_required_handle, validate_struct_type, validate_struct_type_array, ArrayRules,
        FlagPolicy,
    },
    properties::DeviceProperties,
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk::{self, Handle};
use foldhash::HashMap;
use smallvec::SmallVec;
use std::ops::RangeInclusive;

pub(crate) const DESCRIPTOR_TYPE_VALUES: &[RangeInclusive<i32>] = enum_values!(DescriptorType {
    SAMPLER..=INPUT_ATTACHMENT,
    INLINE_UNIFORM_BLOCK,
    ACCELERATION_STRUCTURE_KHR,
    MUTABLE_EXT,
});

const DESCRIPTOR_SET_LAYOUT_CREATE_FLAGS: vk::DescriptorSetLayoutCreateFlags =
    flags_mask!(DescriptorSetLayoutCreateFlags {
        UPDATE_AFTER_BIND_POOL,
        PUSH_DESCRIPTOR_KHR,
        DESCRIPTOR_BUFFER_EXT,
        EMBEDDED_IMMUTABLE_SAMPLERS_EXT,
        HOST_ONLY_POOL_EXT,
    });

const DESCRIPTOR_BINDING_FLAGS: vk::DescriptorBindingFlags =
    flags_mask!(DescriptorBindingFlags {
        UPDATE_AFTER_BIND,
        UPDATE_UNUSED_WHILE_PENDING,
        PARTIALLY_BOUND,
        VARIABLE_DESCRIPTOR_COUNT,
    });

const MUTABLE_DESCRIPTOR_TYPE: RequiresOneOf = RequiresOneOf(&[
    RequiresAllOf(&[Requires::DeviceExtension("ext_mutable_descriptor_type")]),
    RequiresAllOf(&[Requires::DeviceExtension("valve_mutable_descriptor_type")]),
]);

const INLINE_UNIFORM_BLOCK: RequiresOneOf = RequiresOneOf(&[
    RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
    RequiresAllOf(&[Requires::DeviceExtension("ext_inline_uniform_block")]),
]);

const DESCRIPTOR_SET_LAYOUT_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DescriptorSetLayoutBindingFlagsCreateInfo<'static>>().requires(
            RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]),
                RequiresAllOf(&[Requires::DeviceExtension("ext_descriptor_indexing")]),
            ]),
        ),
        AllowedStruct::of::<vk::MutableDescriptorTypeCreateInfoEXT<'static>>()
            .requires(MUTABLE_DESCRIPTOR_TYPE),
    ],
    unique: true,
    vuids_next: &["VUID-VkDescriptorSetLayoutCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkDescriptorSetLayoutCreateInfo-sType-unique"],
};

const DESCRIPTOR_POOL_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DescriptorPoolInlineUniformBlockCreateInfo<'static>>()
            .requires(INLINE_UNIFORM_BLOCK),
        AllowedStruct::of::<vk::MutableDescriptorTypeCreateInfoEXT<'static>>()
            .requires(MUTABLE_DESCRIPTOR_TYPE),
    ],
    unique: true,
    vuids_next: &["VUID-VkDescriptorPoolCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkDescriptorPoolCreateInfo-sType-unique"],
};

const DESCRIPTOR_SET_ALLOCATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DescriptorSetVariableDescriptorCountAllocateInfo<'static>>()
            .requires(RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]),
                RequiresAllOf(&[Requires::DeviceExtension("ext_descriptor_indexing")]),
            ])),
    ],
    unique: true,
    vuids_next: &["VUID-VkDescriptorSetAllocateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkDescriptorSetAllocateInfo-sType-unique"],
};

const WRITE_DESCRIPTOR_SET_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::WriteDescriptorSetAccelerationStructureKHR<'static>>().requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "khr_acceleration_structure",
            )])]),
        ),
        AllowedStruct::of::<vk::WriteDescriptorSetInlineUniformBlock<'static>>()
            .requires(INLINE_UNIFORM_BLOCK),
    ],
    unique: true,
    vuids_next: &["VUID-VkWriteDescriptorSet-pNext-pNext"],
    vuids_unique: &["VUID-VkWriteDescriptorSet-sType-unique"],
};

const COPY_DESCRIPTOR_SET_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkCopyDescriptorSet-pNext-pNext"],
    vuids_unique: &[],
};

/// Where the data of a descriptor write comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DescriptorSource {
    Image,
    TexelBufferView,
    Buffer,
    InlineUniformBlock,
    AccelerationStructure,
    Other,
}

fn descriptor_source(descriptor_type: vk::DescriptorType) -> DescriptorSource {
    match descriptor_type {
        vk::DescriptorType::SAMPLER
        | vk::DescriptorType::COMBINED_IMAGE_SAMPLER
        | vk::DescriptorType::SAMPLED_IMAGE
        | vk::DescriptorType::STORAGE_IMAGE
        | vk::DescriptorType::INPUT_ATTACHMENT => DescriptorSource::Image,
        vk::DescriptorType::UNIFORM_TEXEL_BUFFER | vk::DescriptorType::STORAGE_TEXEL_BUFFER => {
            DescriptorSource::TexelBufferView
        }
        vk::DescriptorType::UNIFORM_BUFFER
        | vk::DescriptorType::STORAGE_BUFFER
        | vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC
        | vk::DescriptorType::STORAGE_BUFFER_DYNAMIC => DescriptorSource::Buffer,
        vk::DescriptorType::INLINE_UNIFORM_BLOCK => DescriptorSource::InlineUniformBlock,
        vk::DescriptorType::ACCELERATION_STRUCTURE_KHR => DescriptorSource::AccelerationStructure,
        _ => DescriptorSource::Other,
    }
}

fn is_dynamic_buffer(descriptor_type: vk::DescriptorType) -> bool {
    matches!(
        descriptor_type,
        vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC | vk::DescriptorType::STORAGE_BUFFER_DYNAMIC
    )
}

impl StatelessValidator {
    /// Validates the arguments of `vkCreateDescriptorSetLayout`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_descriptor_set_layout(
        &self,
        create_info: &vk::DescriptorSetLayoutCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let &vk::DescriptorSetLayoutCreateInfo {
            p_next,
            flags,
            binding_count,
            p_bindings,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkDescriptorSetLayoutCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &DESCRIPTOR_SET_LAYOUT_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            DESCRIPTOR_SET_LAYOUT_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkDescriptorSetLayoutCreateInfo-flags-parameter"],
            &[],
        ));
        violations.append(validate_layout_flag_combinations(flags));

        let is_push = flags.contains(vk::DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR_KHR);

        if is_push && !capabilities.enabled_extensions.khr_push_descriptor {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_DESCRIPTOR_SET_LAYOUT_CREATE_PUSH_DESCRIPTOR_BIT_KHR`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "khr_push_descriptor",
                )])]),
                vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-flags-parameter"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations.append(validate_array(
            "create_info.binding_count",
            "create_info.p_bindings",
            binding_count,
            p_bindings,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-pBindings-parameter"],
            },
        ));

        let bindings = slice_or_empty(p_bindings, binding_count);
        let mut binding_numbers: HashMap<u32, usize> = HashMap::default();
        let mut push_descriptor_count: u64 = 0;

        for (index, binding) in bindings.iter().enumerate() {
            if let Some(&previous) = binding_numbers.get(&binding.binding) {
                violations.push(ValidationError {
                    context: format!("create_info.p_bindings[{}].binding", index).into(),
                    problem: format!(
                        "is {}, which is also the binding number of `p_bindings[{}]`",
                        binding.binding, previous,
                    )
                    .into(),
                    vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-binding-00279"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            } else {
                binding_numbers.insert(binding.binding, index);
            }

            violations.append_with_context(
                validate_layout_binding(binding, &capabilities.properties),
                || format!("create_info.p_bindings[{}]", index),
            );

            if is_push {
                push_descriptor_count += u64::from(binding.descriptor_count);

                if is_dynamic_buffer(binding.descriptor_type) {
                    violations.push(ValidationError {
                        context: format!("create_info.p_bindings[{}].descriptor_type", index)
                            .into(),
                        problem: "is a dynamic buffer type, but `create_info.flags` contains \
                            `VK_DESCRIPTOR_SET_LAYOUT_CREATE_PUSH_DESCRIPTOR_BIT_KHR`"
                            .into(),
                        vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-flags-00280"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if binding.descriptor_type == vk::DescriptorType::INLINE_UNIFORM_BLOCK {
                    violations.push(ValidationError {
                        context: format!("create_info.p_bindings[{}].descriptor_type", index)
                            .into(),
                        problem: "is `VK_DESCRIPTOR_TYPE_INLINE_UNIFORM_BLOCK`, but \
                            `create_info.flags` contains \
                            `VK_DESCRIPTOR_SET_LAYOUT_CREATE_PUSH_DESCRIPTOR_BIT_KHR`"
                            .into(),
                        vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-flags-02208"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if binding.descriptor_type == vk::DescriptorType::MUTABLE_EXT {
                    violations.push(ValidationError {
                        context: format!("create_info.p_bindings[{}].descriptor_type", index)
                            .into(),
                        problem: "is `VK_DESCRIPTOR_TYPE_MUTABLE_EXT`, but `create_info.flags` \
                            contains `VK_DESCRIPTOR_SET_LAYOUT_CREATE_PUSH_DESCRIPTOR_BIT_KHR`"
                            .into(),
                        vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-flags-04591"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }
            }
        }

        if let Some(max_push_descriptors) = capabilities.properties.max_push_descriptors {
            if is_push && push_descriptor_count > u64::from(max_push_descriptors) {
                violations.push(ValidationError {
                    context: "create_info.p_bindings".into(),
                    problem: format!(
                        "hold {} descriptors in total, which is more than the \
                        `max_push_descriptors` limit ({})",
                        push_descriptor_count, max_push_descriptors,
                    )
                    .into(),
                    vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-flags-00281"],
                    ..Default::default()
                });
            }
        }

        let mutable_info = find_in_chain::<vk::MutableDescriptorTypeCreateInfoEXT<'_>>(p_next);

        match mutable_info {
            Some(mutable_info) => {
                violations.append(
                    validate_mutable_type_lists(mutable_info, Some(bindings))
                        .add_context("create_info.p_next"),
                );
            }
            None => {
                for (index, binding) in bindings.iter().enumerate() {
                    if binding.descriptor_type == vk::DescriptorType::MUTABLE_EXT
                        && binding.descriptor_count > 0
                    {
                        violations.push(ValidationError {
                            context: "create_info.p_next".into(),
                            problem: format!(
                                "does not include a `VkMutableDescriptorTypeCreateInfoEXT` \
                                structure, but `p_bindings[{}].descriptor_type` is \
                                `VK_DESCRIPTOR_TYPE_MUTABLE_EXT`",
                                index,
                            )
                            .into(),
                            vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-pBindings-07303"],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                }
            }
        }

        if let Some(binding_flags) =
            find_in_chain::<vk::DescriptorSetLayoutBindingFlagsCreateInfo<'_>>(p_next)
        {
            violations.append(validate_binding_flags(
                binding_flags,
                flags,
                bindings,
                &capabilities.features,
            ));
        }

        violations
    }

    /// Validates the arguments of `vkCreateDescriptorPool`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_descriptor_pool(
        &self,
        create_info: &vk::DescriptorPoolCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::DescriptorPoolCreateInfo {
            p_next,
            flags,
            max_sets,
            pool_size_count,
            p_pool_sizes,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkDescriptorPoolCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &DESCRIPTOR_POOL_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            flags_mask!(DescriptorPoolCreateFlags {
                FREE_DESCRIPTOR_SET,
                UPDATE_AFTER_BIND,
                HOST_ONLY_EXT,
            })
            .as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkDescriptorPoolCreateInfo-flags-parameter"],
            &[],
        ));

        if flags.contains(
            vk::DescriptorPoolCreateFlags::UPDATE_AFTER_BIND
                | vk::DescriptorPoolCreateFlags::HOST_ONLY_EXT,
        ) {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains both `VK_DESCRIPTOR_POOL_CREATE_UPDATE_AFTER_BIND_BIT` and \
                    `VK_DESCRIPTOR_POOL_CREATE_HOST_ONLY_BIT_EXT`"
                    .into(),
                vuids: &["VUID-VkDescriptorPoolCreateInfo-flags-04607"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if max_sets == 0 {
            violations.push(ValidationError {
                context: "create_info.max_sets".into(),
                problem: "is zero".into(),
                vuids: &["VUID-VkDescriptorPoolCreateInfo-maxSets-00301"],
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "create_info.pool_size_count",
            "create_info.p_pool_sizes",
            pool_size_count,
            p_pool_sizes,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkDescriptorPoolCreateInfo-pPoolSizes-parameter"],
            },
        ));

        for (index, pool_size) in slice_or_empty(p_pool_sizes, pool_size_count)
            .iter()
            .enumerate()
        {
            let mut pool_size_violations = Violations::new();

            pool_size_violations.push_opt(validate_ranged_enum(
                "ty",
                pool_size.ty.as_raw(),
                DESCRIPTOR_TYPE_VALUES,
                &["VUID-VkDescriptorPoolSize-type-parameter"],
            ));

            if pool_size.descriptor_count == 0 {
                pool_size_violations.push(ValidationError {
                    context: "descriptor_count".into(),
                    problem: "is zero".into(),
                    vuids: &["VUID-VkDescriptorPoolSize-descriptorCount-00302"],
                    ..Default::default()
                });
            }

            if pool_size.ty == vk::DescriptorType::INLINE_UNIFORM_BLOCK
                && pool_size.descriptor_count % 4 != 0
            {
                pool_size_violations.push(ValidationError {
                    context: "descriptor_count".into(),
                    problem: format!(
                        "is {}, but `ty` is `VK_DESCRIPTOR_TYPE_INLINE_UNIFORM_BLOCK`, which \
                        needs a multiple of 4",
                        pool_size.descriptor_count,
                    )
                    .into(),
                    vuids: &["VUID-VkDescriptorPoolSize-type-02218"],
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }

            violations.append_with_context(pool_size_violations, || {
                format!("create_info.p_pool_sizes[{}]", index)
            });
        }

        if let Some(mutable_info) =
            find_in_chain::<vk::MutableDescriptorTypeCreateInfoEXT<'_>>(p_next)
        {
            violations.append(
                validate_mutable_type_lists(mutable_info, None).add_context("create_info.p_next"),
            );
        }

        violations
    }

    /// Validates the arguments of `vkAllocateDescriptorSets`.
    ///
    /// # Safety
    ///
    /// `allocate_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_allocate_descriptor_sets(
        &self,
        allocate_info: &vk::DescriptorSetAllocateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::DescriptorSetAllocateInfo {
            p_next,
            descriptor_pool,
            descriptor_set_count,
            p_set_layouts,
            ..
        } = allocate_info;

        violations.push_opt(validate_struct_type(
            "allocate_info.s_type",
            allocate_info,
            &["VUID-VkDescriptorSetAllocateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "allocate_info.p_next",
            p_next,
            &DESCRIPTOR_SET_ALLOCATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_required_handle(
            "allocate_info.descriptor_pool",
            descriptor_pool,
            &["VUID-VkDescriptorSetAllocateInfo-descriptorPool-parameter"],
        ));
        violations.append(validate_array(
            "allocate_info.descriptor_set_count",
            "allocate_info.p_set_layouts",
            descriptor_set_count,
            p_set_layouts,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-VkDescriptorSetAllocateInfo-descriptorSetCount-arraylength"],
                array_vuids: &["VUID-VkDescriptorSetAllocateInfo-pSetLayouts-parameter"],
            },
        ));

        for (index, &set_layout) in slice_or_empty(p_set_layouts, descriptor_set_count)
            .iter()
            .enumerate()
        {
            violations.push_opt(validate_required_handle(
                format!("allocate_info.p_set_layouts[{}]", index),
                set_layout,
                &["VUID-VkDescriptorSetAllocateInfo-pSetLayouts-parameter"],
            ));
        }

        if let Some(variable_counts) =
            find_in_chain::<vk::DescriptorSetVariableDescriptorCountAllocateInfo<'_>>(p_next)
        {
            if variable_counts.descriptor_set_count != 0
                && variable_counts.descriptor_set_count != descriptor_set_count
            {
                violations.push(ValidationError {
                    context: "allocate_info.p_next.descriptor_set_count".into(),
                    problem: format!(
                        "is {}, but must be zero or equal to `allocate_info.descriptor_set_count` \
                        ({})",
                        variable_counts.descriptor_set_count, descriptor_set_count,
                    )
                    .into(),
                    vuids: &[
                        "VUID-VkDescriptorSetVariableDescriptorCountAllocateInfo-descriptorSetCount-03045",
                    ],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkUpdateDescriptorSets`.
    ///
    /// # Safety
    ///
    /// The pointers must be valid as described in the crate documentation.
    pub unsafe fn validate_update_descriptor_sets(
        &self,
        descriptor_write_count: u32,
        p_descriptor_writes: *const vk::WriteDescriptorSet<'_>,
        descriptor_copy_count: u32,
        p_descriptor_copies: *const vk::CopyDescriptorSet<'_>,
    ) -> Violations {
        let mut violations = validate_array(
            "descriptor_write_count",
            "p_descriptor_writes",
            descriptor_write_count,
            p_descriptor_writes,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-vkUpdateDescriptorSets-pDescriptorWrites-parameter"],
            },
        );
        violations.append(validate_array(
            "descriptor_copy_count",
            "p_descriptor_copies",
            descriptor_copy_count,
            p_descriptor_copies,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-vkUpdateDescriptorSets-pDescriptorCopies-parameter"],
            },
        ));

        let writes = slice_or_empty(p_descriptor_writes, descriptor_write_count);
        let copies = slice_or_empty(p_descriptor_copies, descriptor_copy_count);

        violations.append(validate_struct_type_array(
            "p_descriptor_writes",
            writes,
            &["VUID-VkWriteDescriptorSet-sType-sType"],
        ));
        violations.append(validate_struct_type_array(
            "p_descriptor_copies",
            copies,
            &["VUID-VkCopyDescriptorSet-sType-sType"],
        ));

        for (index, write) in writes.iter().enumerate() {
            let mut write_violations =
                self.validate_chain("p_next", write.p_next, &WRITE_DESCRIPTOR_SET_CHAIN);
            write_violations.append(self.validate_write_descriptor_set(write, true));
            violations.append_with_context(write_violations, || {
                format!("p_descriptor_writes[{}]", index)
            });
        }

        for (index, copy) in copies.iter().enumerate() {
            let mut copy_violations =
                self.validate_chain("p_next", copy.p_next, &COPY_DESCRIPTOR_SET_CHAIN);
            copy_violations.push_opt(validate_required_handle(
                "src_set",
                copy.src_set,
                &["VUID-VkCopyDescriptorSet-srcSet-parameter"],
            ));
            copy_violations.push_opt(validate_required_handle(
                "dst_set",
                copy.dst_set,
                &["VUID-VkCopyDescriptorSet-dstSet-parameter"],
            ));
            violations.append_with_context(copy_violations, || {
                format!("p_descriptor_copies[{}]", index)
            });
        }

        violations
    }

    /// Checks one descriptor write. `needs_dst_set` is false for push descriptors, which ignore
    /// `dst_set`.
    pub(crate) unsafe fn validate_write_descriptor_set(
        &self,
        write: &vk::WriteDescriptorSet<'_>,
        needs_dst_set: bool,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let null_descriptor = capabilities.features.null_descriptor;
        let properties = &capabilities.properties;
        let count = write.descriptor_count;
        let descriptor_type = write.descriptor_type;

        if needs_dst_set {
            violations.push_opt(validate_required_handle(
                "dst_set",
                write.dst_set,
                &["VUID-VkWriteDescriptorSet-dstSet-00320"],
            ));
        }

        violations.push_opt(validate_ranged_enum(
            "descriptor_type",
            descriptor_type.as_raw(),
            DESCRIPTOR_TYPE_VALUES,
            &["VUID-VkWriteDescriptorSet-descriptorType-parameter"],
        ));

        if count == 0 {
            violations.push(ValidationError {
                context: "descriptor_count".into(),
                problem: "is zero".into(),
                vuids: &["VUID-VkWriteDescriptorSet-descriptorCount-arraylength"],
                ..Default::default()
            });
        }

        match descriptor_source(descriptor_type) {
            DescriptorSource::Image => {
                violations.append(validate_array(
                    "descriptor_count",
                    "p_image_info",
                    count,
                    write.p_image_info,
                    ArrayRules {
                        count_required: false,
                        array_required: true,
                        count_vuids: &[],
                        array_vuids: &["VUID-VkWriteDescriptorSet-descriptorType-00322"],
                    },
                ));

                for (index, image_info) in slice_or_empty(write.p_image_info, count)
                    .iter()
                    .enumerate()
                {
                    if descriptor_type != vk::DescriptorType::SAMPLER {
                        let view_may_be_null = null_descriptor
                            && descriptor_type != vk::DescriptorType::INPUT_ATTACHMENT;

                        if image_info.image_view.is_null() && !view_may_be_null {
                            violations.push(ValidationError {
                                context: format!("p_image_info[{}].image_view", index).into(),
                                problem: "is `VK_NULL_HANDLE`".into(),
                                requires_one_of: if descriptor_type
                                    == vk::DescriptorType::INPUT_ATTACHMENT
                                {
                                    RequiresOneOf(&[])
                                } else {
                                    RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                                        "null_descriptor",
                                    )])])
                                },
                                vuids: &["VUID-VkWriteDescriptorSet-descriptorType-02997"],
                                kind: ViolationKind::MissingCompanion,
                            });
                        }

                        violations.push_opt(validate_ranged_enum(
                            format!("p_image_info[{}].image_layout", index),
                            image_info.image_layout.as_raw(),
                            IMAGE_LAYOUT_VALUES,
                            &["VUID-VkDescriptorImageInfo-imageLayout-parameter"],
                        ));
                    }
                }
            }
            DescriptorSource::TexelBufferView => {
                violations.append(validate_array(
                    "descriptor_count",
                    "p_texel_buffer_view",
                    count,
                    write.p_texel_buffer_view,
                    ArrayRules {
                        count_required: false,
                        array_required: true,
                        count_vuids: &[],
                        array_vuids: &["VUID-VkWriteDescriptorSet-descriptorType-00323"],
                    },
                ));

                if !null_descriptor {
                    for (index, view) in slice_or_empty(write.p_texel_buffer_view, count)
                        .iter()
                        .enumerate()
                    {
                        if view.is_null() {
                            violations.push(ValidationError {
                                context: format!("p_texel_buffer_view[{}]", index).into(),
                                problem: "is `VK_NULL_HANDLE`".into(),
                                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                                    Requires::DeviceFeature("null_descriptor"),
                                ])]),
                                vuids: &["VUID-VkWriteDescriptorSet-descriptorType-02995"],
                                kind: ViolationKind::MissingCompanion,
                            });
                        }
                    }
                }
            }
            DescriptorSource::Buffer => {
                violations.append(validate_array(
                    "descriptor_count",
                    "p_buffer_info",
                    count,
                    write.p_buffer_info,
                    ArrayRules {
                        count_required: false,
                        array_required: true,
                        count_vuids: &[],
                        array_vuids: &["VUID-VkWriteDescriptorSet-descriptorType-00324"],
                    },
                ));

                for (index, buffer_info) in slice_or_empty(write.p_buffer_info, count)
                    .iter()
                    .enumerate()
                {
                    violations.append_with_context(
                        validate_descriptor_buffer_info(
                            buffer_info,
                            descriptor_type,
                            properties,
                            null_descriptor,
                        ),
                        || format!("p_buffer_info[{}]", index),
                    );
                }
            }
            DescriptorSource::InlineUniformBlock => {
                if write.dst_array_element % 4 != 0 {
                    violations.push(ValidationError {
                        context: "dst_array_element".into(),
                        problem: format!(
                            "is {}, but `descriptor_type` is \
                            `VK_DESCRIPTOR_TYPE_INLINE_UNIFORM_BLOCK`, which needs a multiple \
                            of 4",
                            write.dst_array_element,
                        )
                        .into(),
                        vuids: &["VUID-VkWriteDescriptorSet-descriptorType-02219"],
                        kind: ViolationKind::Misaligned,
                        ..Default::default()
                    });
                }

                if count % 4 != 0 {
                    violations.push(ValidationError {
                        context: "descriptor_count".into(),
                        problem: format!(
                            "is {}, but `descriptor_type` is \
                            `VK_DESCRIPTOR_TYPE_INLINE_UNIFORM_BLOCK`, which needs a multiple \
                            of 4",
                            count,
                        )
                        .into(),
                        vuids: &["VUID-VkWriteDescriptorSet-descriptorType-02220"],
                        kind: ViolationKind::Misaligned,
                        ..Default::default()
                    });
                }

                match find_in_chain::<vk::WriteDescriptorSetInlineUniformBlock<'_>>(write.p_next) {
                    Some(inline) if inline.data_size != count => {
                        violations.push(ValidationError {
                            context: "p_next.data_size".into(),
                            problem: format!(
                                "is {}, but `descriptor_count` is {}",
                                inline.data_size, count,
                            )
                            .into(),
                            vuids: &["VUID-VkWriteDescriptorSet-descriptorType-02221"],
                            kind: ViolationKind::IllegalCombination,
                            ..Default::default()
                        });
                    }
                    Some(_) => (),
                    None => {
                        violations.push(ValidationError {
                            context: "p_next".into(),
                            problem: "does not include a `VkWriteDescriptorSetInlineUniformBlock` \
                                structure, but `descriptor_type` is \
                                `VK_DESCRIPTOR_TYPE_INLINE_UNIFORM_BLOCK`"
                                .into(),
                            vuids: &["VUID-VkWriteDescriptorSet-descriptorType-02221"],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                }
            }
            DescriptorSource::AccelerationStructure => {
                match find_in_chain::<vk::WriteDescriptorSetAccelerationStructureKHR<'_>>(
                    write.p_next,
                ) {
                    Some(info) => {
                        if info.acceleration_structure_count != count {
                            violations.push(ValidationError {
                                context: "p_next.acceleration_structure_count".into(),
                                problem: format!(
                                    "is {}, but `descriptor_count` is {}",
                                    info.acceleration_structure_count, count,
                                )
                                .into(),
                                vuids: &[
                                    "VUID-VkWriteDescriptorSetAccelerationStructureKHR-accelerationStructureCount-02236",
                                ],
                                kind: ViolationKind::IllegalCombination,
                                ..Default::default()
                            });
                        }

                        violations.append(validate_array(
                            "p_next.acceleration_structure_count",
                            "p_next.p_acceleration_structures",
                            info.acceleration_structure_count,
                            info.p_acceleration_structures,
                            ArrayRules {
                                count_required: true,
                                array_required: true,
                                count_vuids: &[
                                    "VUID-VkWriteDescriptorSetAccelerationStructureKHR-accelerationStructureCount-arraylength",
                                ],
                                array_vuids: &[
                                    "VUID-VkWriteDescriptorSetAccelerationStructureKHR-pAccelerationStructures-parameter",
                                ],
                            },
                        ));

                        if !null_descriptor {
                            for (index, handle) in slice_or_empty(
                                info.p_acceleration_structures,
                                info.acceleration_structure_count,
                            )
                            .iter()
                            .enumerate()
                            {
                                if handle.is_null() {
                                    violations.push(ValidationError {
                                        context: format!(
                                            "p_next.p_acceleration_structures[{}]",
                                            index,
                                        )
                                        .into(),
                                        problem: "is `VK_NULL_HANDLE`".into(),
                                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                                            Requires::DeviceFeature("null_descriptor"),
                                        ])]),
                                        vuids: &[
                                            "VUID-VkWriteDescriptorSetAccelerationStructureKHR-pAccelerationStructures-03580",
                                        ],
                                        kind: ViolationKind::MissingCompanion,
                                    });
                                }
                            }
                        }
                    }
                    None => {
                        violations.push(ValidationError {
                            context: "p_next".into(),
                            problem: "does not include a \
                                `VkWriteDescriptorSetAccelerationStructureKHR` structure, but \
                                `descriptor_type` is \
                                `VK_DESCRIPTOR_TYPE_ACCELERATION_STRUCTURE_KHR`"
                                .into(),
                            vuids: &["VUID-VkWriteDescriptorSet-descriptorType-02382"],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                }
            }
            DescriptorSource::Other => (),
        }

        violations
    }
}

fn validate_layout_flag_combinations(flags: vk::DescriptorSetLayoutCreateFlags) -> Violations {
    type F = vk::DescriptorSetLayoutCreateFlags;

    let exclusive: [(F, F, &'static [&'static str]); 3] = [
        (
            F::PUSH_DESCRIPTOR_KHR,
            F::HOST_ONLY_POOL_EXT,
            &["VUID-VkDescriptorSetLayoutCreateInfo-flags-04590"],
        ),
        (
            F::UPDATE_AFTER_BIND_POOL,
            F::HOST_ONLY_POOL_EXT,
            &["VUID-VkDescriptorSetLayoutCreateInfo-flags-04592"],
        ),
        (
            F::DESCRIPTOR_BUFFER_EXT,
            F::HOST_ONLY_POOL_EXT,
            &["VUID-VkDescriptorSetLayoutCreateInfo-flags-08002"],
        ),
    ];

    let mut violations: Violations = exclusive
        .into_iter()
        .filter(|&(a, b, _)| flags.contains(a | b))
        .map(|(a, b, vuids)| ValidationError {
            context: "create_info.flags".into(),
            problem: format!("contains both {:?} and {:?}", a, b).into(),
            vuids,
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        })
        .collect();

    if flags.contains(F::EMBEDDED_IMMUTABLE_SAMPLERS_EXT) && !flags.contains(F::DESCRIPTOR_BUFFER_EXT)
    {
        violations.push(ValidationError {
            context: "create_info.flags".into(),
            problem: "contains \
                `VK_DESCRIPTOR_SET_LAYOUT_CREATE_EMBEDDED_IMMUTABLE_SAMPLERS_BIT_EXT`, but not \
                `VK_DESCRIPTOR_SET_LAYOUT_CREATE_DESCRIPTOR_BUFFER_BIT_EXT`"
                .into(),
            vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-flags-08001"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

unsafe fn validate_layout_binding(
    binding: &vk::DescriptorSetLayoutBinding<'_>,
    properties: &DeviceProperties,
) -> Violations {
    let mut violations = Violations::new();
    let descriptor_type = binding.descriptor_type;

    violations.push_opt(validate_ranged_enum(
        "descriptor_type",
        descriptor_type.as_raw(),
        DESCRIPTOR_TYPE_VALUES,
        &["VUID-VkDescriptorSetLayoutBinding-descriptorType-parameter"],
    ));

    if binding.descriptor_count != 0 {
        violations.push_opt(validate_flags(
            "stage_flags",
            binding.stage_flags.as_raw(),
            SHADER_STAGES.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkDescriptorSetLayoutBinding-descriptorCount-00283"],
            &[],
        ));
    }

    match descriptor_type {
        vk::DescriptorType::SAMPLER | vk::DescriptorType::COMBINED_IMAGE_SAMPLER => {
            for (index, sampler) in slice_or_empty(
                binding.p_immutable_samplers,
                binding.descriptor_count,
            )
            .iter()
            .enumerate()
            {
                violations.push_opt(validate_required_handle(
                    format!("p_immutable_samplers[{}]", index),
                    *sampler,
                    &["VUID-VkDescriptorSetLayoutBinding-descriptorType-00282"],
                ));
            }
        }
        vk::DescriptorType::INLINE_UNIFORM_BLOCK => {
            if binding.descriptor_count % 4 != 0 {
                violations.push(ValidationError {
                    context: "descriptor_count".into(),
                    problem: format!(
                        "is {}, but `descriptor_type` is \
                        `VK_DESCRIPTOR_TYPE_INLINE_UNIFORM_BLOCK`, which needs a multiple of 4",
                        binding.descriptor_count,
                    )
                    .into(),
                    vuids: &["VUID-VkDescriptorSetLayoutBinding-descriptorType-02209"],
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }

            if let Some(max_size) = properties.max_inline_uniform_block_size {
                if binding.descriptor_count > max_size {
                    violations.push(ValidationError {
                        context: "descriptor_count".into(),
                        problem: format!(
                            "is {}, which is greater than the `max_inline_uniform_block_size` \
                            limit ({})",
                            binding.descriptor_count, max_size,
                        )
                        .into(),
                        vuids: &["VUID-VkDescriptorSetLayoutBinding-descriptorType-08004"],
                        ..Default::default()
                    });
                }
            }
        }
        vk::DescriptorType::MUTABLE_EXT if !binding.p_immutable_samplers.is_null() => {
            violations.push(ValidationError {
                context: "p_immutable_samplers".into(),
                problem: "is not null, but `descriptor_type` is \
                    `VK_DESCRIPTOR_TYPE_MUTABLE_EXT`"
                    .into(),
                vuids: &["VUID-VkDescriptorSetLayoutBinding-descriptorType-04605"],
                kind: ViolationKind::ExtraneousCompanion,
                ..Default::default()
            });
        }
        _ => (),
    }

    violations
}

/// Checks the lists of a `VkMutableDescriptorTypeCreateInfoEXT`. If the lists belong to a set
/// layout, `bindings` must be the bindings of that layout.
pub(crate) unsafe fn validate_mutable_type_lists(
    mutable_info: &vk::MutableDescriptorTypeCreateInfoEXT<'_>,
    bindings: Option<&[vk::DescriptorSetLayoutBinding<'_>]>,
) -> Violations {
    let mut violations = validate_array(
        "mutable_descriptor_type_list_count",
        "p_mutable_descriptor_type_lists",
        mutable_info.mutable_descriptor_type_list_count,
        mutable_info.p_mutable_descriptor_type_lists,
        ArrayRules {
            count_required: false,
            array_required: true,
            count_vuids: &[],
            array_vuids: &[
                "VUID-VkMutableDescriptorTypeCreateInfoEXT-pMutableDescriptorTypeLists-parameter",
            ],
        },
    );
    let lists = slice_or_empty(
        mutable_info.p_mutable_descriptor_type_lists,
        mutable_info.mutable_descriptor_type_list_count,
    );

    for (list_index, list) in lists.iter().enumerate() {
        let mut list_violations = validate_array(
            "descriptor_type_count",
            "p_descriptor_types",
            list.descriptor_type_count,
            list.p_descriptor_types,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkMutableDescriptorTypeListEXT-pDescriptorTypes-parameter"],
            },
        );
        let types = slice_or_empty(list.p_descriptor_types, list.descriptor_type_count);
        let mut seen: SmallVec<[(vk::DescriptorType, usize); 8]> = SmallVec::new();

        for (type_index, &descriptor_type) in types.iter().enumerate() {
            if descriptor_type == vk::DescriptorType::MUTABLE_EXT {
                list_violations.push(ValidationError {
                    context: format!("p_descriptor_types[{}]", type_index).into(),
                    problem: "is `VK_DESCRIPTOR_TYPE_MUTABLE_EXT`".into(),
                    vuids: &["VUID-VkMutableDescriptorTypeListEXT-pDescriptorTypes-04599"],
                    ..Default::default()
                });
            } else if is_dynamic_buffer(descriptor_type)
                || descriptor_type == vk::DescriptorType::INLINE_UNIFORM_BLOCK
            {
                list_violations.push(ValidationError {
                    context: format!("p_descriptor_types[{}]", type_index).into(),
                    problem: format!(
                        "is {:?}, which cannot be a mutable descriptor type",
                        descriptor_type,
                    )
                    .into(),
                    vuids: &["VUID-VkMutableDescriptorTypeListEXT-pDescriptorTypes-04601"],
                    ..Default::default()
                });
            }

            if let Some(&(_, previous)) = seen.iter().find(|&&(ty, _)| ty == descriptor_type) {
                list_violations.push(ValidationError {
                    context: format!("p_descriptor_types[{}]", type_index).into(),
                    problem: format!(
                        "is {:?}, which also appears in `p_descriptor_types[{}]`",
                        descriptor_type, previous,
                    )
                    .into(),
                    vuids: &["VUID-VkMutableDescriptorTypeListEXT-pDescriptorTypes-04600"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            } else {
                seen.push((descriptor_type, type_index));
            }
        }

        if let Some(binding) = bindings.and_then(|bindings| bindings.get(list_index)) {
            let is_mutable = binding.descriptor_type == vk::DescriptorType::MUTABLE_EXT;

            if !is_mutable && list.descriptor_type_count != 0 {
                list_violations.push(ValidationError {
                    context: "descriptor_type_count".into(),
                    problem: format!(
                        "is {}, but the binding at the same index is not of type \
                        `VK_DESCRIPTOR_TYPE_MUTABLE_EXT`",
                        list.descriptor_type_count,
                    )
                    .into(),
                    vuids: &["VUID-VkMutableDescriptorTypeListEXT-descriptorTypeCount-04598"],
                    kind: ViolationKind::ExtraneousCompanion,
                    ..Default::default()
                });
            }
        }

        violations.append_with_context(list_violations, || {
            format!("p_mutable_descriptor_type_lists[{}]", list_index)
        });
    }

    for (index, binding) in bindings.unwrap_or_default().iter().enumerate() {
        if binding.descriptor_type != vk::DescriptorType::MUTABLE_EXT
            || binding.descriptor_count == 0
        {
            continue;
        }

        if lists.get(index).map_or(true, |list| list.descriptor_type_count == 0) {
            violations.push(ValidationError {
                context: "p_mutable_descriptor_type_lists".into(),
                problem: format!(
                    "has no non-empty list for binding {}, whose type is \
                    `VK_DESCRIPTOR_TYPE_MUTABLE_EXT`",
                    index,
                )
                .into(),
                vuids: &["VUID-VkMutableDescriptorTypeListEXT-descriptorTypeCount-04597"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }
    }

    violations
}

unsafe fn validate_binding_flags(
    binding_flags: &vk::DescriptorSetLayoutBindingFlagsCreateInfo<'_>,
    layout_flags: vk::DescriptorSetLayoutCreateFlags,
    bindings: &[vk::DescriptorSetLayoutBinding<'_>],
    features: &DeviceFeatures,
) -> Violations {
    let mut violations = Violations::new();

    if binding_flags.binding_count != 0 && binding_flags.binding_count as usize != bindings.len()
    {
        violations.push(ValidationError {
            context: "create_info.p_next.binding_count".into(),
            problem: format!(
                "is {}, but must be zero or equal to `create_info.binding_count` ({})",
                binding_flags.binding_count,
                bindings.len(),
            )
            .into(),
            vuids: &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-bindingCount-03002"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });

        return violations;
    }

    let all_flags = slice_or_empty(binding_flags.p_binding_flags, binding_flags.binding_count);
    let highest_binding = bindings.iter().map(|binding| binding.binding).max();
    let is_push = layout_flags.contains(vk::DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR_KHR);
    let is_update_after_bind_pool =
        layout_flags.contains(vk::DescriptorSetLayoutCreateFlags::UPDATE_AFTER_BIND_POOL);

    for (index, (&flags, binding)) in all_flags.iter().zip(bindings).enumerate() {
        let mut flag_violations = Violations::new();

        flag_violations.push_opt(validate_flags(
            "",
            flags.as_raw(),
            DESCRIPTOR_BINDING_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-pBindingFlags-parameter"],
            &[],
        ));

        if is_push
            && flags.intersects(
                vk::DescriptorBindingFlags::UPDATE_AFTER_BIND
                    | vk::DescriptorBindingFlags::UPDATE_UNUSED_WHILE_PENDING
                    | vk::DescriptorBindingFlags::VARIABLE_DESCRIPTOR_COUNT,
            )
        {
            flag_violations.push(ValidationError {
                problem: "contains an update-after-bind or variable-count flag, but the layout \
                    is a push descriptor layout"
                    .into(),
                vuids: &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-flags-03003"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if flags.contains(vk::DescriptorBindingFlags::UPDATE_AFTER_BIND) {
            if !is_update_after_bind_pool {
                flag_violations.push(ValidationError {
                    problem: "contains `VK_DESCRIPTOR_BINDING_UPDATE_AFTER_BIND_BIT`, but \
                        `create_info.flags` does not contain \
                        `VK_DESCRIPTOR_SET_LAYOUT_CREATE_UPDATE_AFTER_BIND_POOL_BIT`"
                        .into(),
                    vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-flags-03000"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            flag_violations.push_opt(validate_update_after_bind_type(
                binding.descriptor_type,
                features,
            ));
        }

        let feature_checks: [(
            vk::DescriptorBindingFlags,
            bool,
            &'static str,
            &'static [&'static str],
        ); 3] = [
            (
                vk::DescriptorBindingFlags::UPDATE_UNUSED_WHILE_PENDING,
                features.descriptor_binding_update_unused_while_pending,
                "descriptor_binding_update_unused_while_pending",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingUpdateUnusedWhilePending-03012"],
            ),
            (
                vk::DescriptorBindingFlags::PARTIALLY_BOUND,
                features.descriptor_binding_partially_bound,
                "descriptor_binding_partially_bound",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingPartiallyBound-03013"],
            ),
            (
                vk::DescriptorBindingFlags::VARIABLE_DESCRIPTOR_COUNT,
                features.descriptor_binding_variable_descriptor_count,
                "descriptor_binding_variable_descriptor_count",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingVariableDescriptorCount-03014"],
            ),
        ];

        for (flag, enabled, feature, vuids) in feature_checks {
            if flags.contains(flag) && !enabled {
                flag_violations.push(ValidationError {
                    problem: format!("contains {:?}, but the `{}` feature is not enabled", flag, feature)
                        .into(),
                    vuids,
                    kind: ViolationKind::RequirementNotMet,
                    ..Default::default()
                });
            }
        }

        if flags.contains(vk::DescriptorBindingFlags::VARIABLE_DESCRIPTOR_COUNT) {
            if Some(binding.binding) != highest_binding {
                flag_violations.push(ValidationError {
                    problem: format!(
                        "contains `VK_DESCRIPTOR_BINDING_VARIABLE_DESCRIPTOR_COUNT_BIT`, but \
                        binding {} is not the highest binding number of the layout",
                        binding.binding,
                    )
                    .into(),
                    vuids: &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-pBindingFlags-03004"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            if is_dynamic_buffer(binding.descriptor_type) {
                flag_violations.push(ValidationError {
                    problem: "contains `VK_DESCRIPTOR_BINDING_VARIABLE_DESCRIPTOR_COUNT_BIT`, but \
                        the binding is a dynamic buffer"
                        .into(),
                    vuids: &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-pBindingFlags-03015"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations.append_with_context(flag_violations, || {
            format!("create_info.p_next.p_binding_flags[{}]", index)
        });
    }

    violations
}

fn validate_update_after_bind_type(
    descriptor_type: vk::DescriptorType,
    features: &DeviceFeatures,
) -> Option<ValidationError> {
    let (enabled, feature, vuids): (bool, &'static str, &'static [&'static str]) =
        match descriptor_type {
            vk::DescriptorType::UNIFORM_BUFFER => (
                features.descriptor_binding_uniform_buffer_update_after_bind,
                "descriptor_binding_uniform_buffer_update_after_bind",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingUniformBufferUpdateAfterBind-03005"],
            ),
            vk::DescriptorType::SAMPLER
            | vk::DescriptorType::COMBINED_IMAGE_SAMPLER
            | vk::DescriptorType::SAMPLED_IMAGE => (
                features.descriptor_binding_sampled_image_update_after_bind,
                "descriptor_binding_sampled_image_update_after_bind",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingSampledImageUpdateAfterBind-03006"],
            ),
            vk::DescriptorType::STORAGE_IMAGE => (
                features.descriptor_binding_storage_image_update_after_bind,
                "descriptor_binding_storage_image_update_after_bind",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingStorageImageUpdateAfterBind-03007"],
            ),
            vk::DescriptorType::STORAGE_BUFFER => (
                features.descriptor_binding_storage_buffer_update_after_bind,
                "descriptor_binding_storage_buffer_update_after_bind",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingStorageBufferUpdateAfterBind-03008"],
            ),
            vk::DescriptorType::UNIFORM_TEXEL_BUFFER => (
                features.descriptor_binding_uniform_texel_buffer_update_after_bind,
                "descriptor_binding_uniform_texel_buffer_update_after_bind",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingUniformTexelBufferUpdateAfterBind-03009"],
            ),
            vk::DescriptorType::STORAGE_TEXEL_BUFFER => (
                features.descriptor_binding_storage_texel_buffer_update_after_bind,
                "descriptor_binding_storage_texel_buffer_update_after_bind",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingStorageTexelBufferUpdateAfterBind-03010"],
            ),
            vk::DescriptorType::INLINE_UNIFORM_BLOCK => (
                features.descriptor_binding_inline_uniform_block_update_after_bind,
                "descriptor_binding_inline_uniform_block_update_after_bind",
                &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-descriptorBindingInlineUniformBlockUpdateAfterBind-02211"],
            ),
            vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC
            | vk::DescriptorType::STORAGE_BUFFER_DYNAMIC => {
                return Some(ValidationError {
                    problem: "contains `VK_DESCRIPTOR_BINDING_UPDATE_AFTER_BIND_BIT`, but the \
                        binding is a dynamic buffer"
                        .into(),
                    vuids: &["VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-None-03011"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
            _ => return None,
        };

    (!enabled).then(|| ValidationError {
        problem: format!(
            "contains `VK_DESCRIPTOR_BINDING_UPDATE_AFTER_BIND_BIT` for a binding of type {:?}, \
            but the `{}` feature is not enabled",
            descriptor_type, feature,
        )
        .into(),
        vuids,
        kind: ViolationKind::RequirementNotMet,
        ..Default::default()
    })
}

fn validate_descriptor_buffer_info(
    buffer_info: &vk::DescriptorBufferInfo,
    descriptor_type: vk::DescriptorType,
    properties: &DeviceProperties,
    null_descriptor: bool,
) -> Violations {
    let mut violations = Violations::new();

    if buffer_info.buffer.is_null() {
        if !null_descriptor {
            violations.push(ValidationError {
                context: "buffer".into(),
                problem: "is `VK_NULL_HANDLE`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "null_descriptor",
                )])]),
                vuids: &["VUID-VkDescriptorBufferInfo-buffer-02998"],
                kind: ViolationKind::MissingCompanion,
            });
        } else if buffer_info.offset != 0 || buffer_info.range != vk::WHOLE_SIZE {
            violations.push(ValidationError {
                context: "buffer".into(),
                problem: "is `VK_NULL_HANDLE`, but `offset` is not zero or `range` is not \
                    `VK_WHOLE_SIZE`"
                    .into(),
                vuids: &["VUID-VkDescriptorBufferInfo-buffer-02999"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        return violations;
    }

    if buffer_info.range == 0 {
        violations.push(ValidationError {
            context: "range".into(),
            problem: "is zero".into(),
            vuids: &["VUID-VkDescriptorBufferInfo-range-00341"],
            ..Default::default()
        });
    }

    let is_uniform = matches!(
        descriptor_type,
        vk::DescriptorType::UNIFORM_BUFFER | vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC
    );
    let (alignment, alignment_name, alignment_vuids, max_range, max_range_name, range_vuids): (
        u64,
        &'static str,
        &'static [&'static str],
        u32,
        &'static str,
        &'static [&'static str],
    ) = if is_uniform {
        (
            properties.min_uniform_buffer_offset_alignment,
            "min_uniform_buffer_offset_alignment",
            &["VUID-VkWriteDescriptorSet-descriptorType-00327"],
            properties.max_uniform_buffer_range,
            "max_uniform_buffer_range",
            &["VUID-VkWriteDescriptorSet-descriptorType-00332"],
        )
    } else {
        (
            properties.min_storage_buffer_offset_alignment,
            "min_storage_buffer_offset_alignment",
            &["VUID-VkWriteDescriptorSet-descriptorType-00328"],
            properties.max_storage_buffer_range,
            "max_storage_buffer_range",
            &["VUID-VkWriteDescriptorSet-descriptorType-00333"],
        )
    };

    if !is_aligned(buffer_info.offset, alignment) {
        violations.push(ValidationError {
            context: "offset".into(),
            problem: format!(
                "is {}, which is not a multiple of the `{}` limit ({})",
                buffer_info.offset, alignment_name, alignment,
            )
            .into(),
            vuids: alignment_vuids,
            kind: ViolationKind::Misaligned,
            ..Default::default()
        });
    }

    if buffer_info.range != vk::WHOLE_SIZE && buffer_info.range > u64::from(max_range) {
        violations.push(ValidationError {
            context: "range".into(),
            problem: format!(
                "is {}, which is greater than the `{}` limit ({})",
                buffer_info.range, max_range_name, max_range,
            )
            .into(),
            vuids: range_vuids,
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::{link, test_validator};
    use ash::vk::{self, Handle};
    use std::ptr;

    fn binding(
        binding: u32,
        descriptor_type: vk::DescriptorType,
        count: u32,
    ) -> vk::DescriptorSetLayoutBinding<'static> {
        vk::DescriptorSetLayoutBinding::default()
            .binding(binding)
            .descriptor_type(descriptor_type)
            .descriptor_count(count)
            .stage_flags(vk::ShaderStageFlags::FRAGMENT)
    }

    #[test]
    fn mutable_binding_needs_type_list() {
        let validator = test_validator();
        let bindings = [binding(0, vk::DescriptorType::MUTABLE_EXT, 4)];
        let create_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);

        let violations = unsafe { validator.validate_create_descriptor_set_layout(&create_info) };
        assert_vuid!(violations, "VUID-VkDescriptorSetLayoutCreateInfo-pBindings-07303");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn mutable_type_lists_are_checked() {
        let validator = test_validator();
        let bindings = [
            binding(0, vk::DescriptorType::MUTABLE_EXT, 4),
            binding(1, vk::DescriptorType::UNIFORM_BUFFER, 1),
        ];
        let nested = [
            vk::DescriptorType::SAMPLED_IMAGE,
            vk::DescriptorType::MUTABLE_EXT,
            vk::DescriptorType::SAMPLED_IMAGE,
        ];
        let extra = [vk::DescriptorType::STORAGE_IMAGE];
        let lists = [
            vk::MutableDescriptorTypeListEXT::default().descriptor_types(&nested),
            vk::MutableDescriptorTypeListEXT::default().descriptor_types(&extra),
        ];
        let mut mutable_info =
            vk::MutableDescriptorTypeCreateInfoEXT::default().mutable_descriptor_type_lists(&lists);
        let mut create_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);
        create_info.p_next = link(&mut mutable_info, ptr::null());

        let violations = unsafe { validator.validate_create_descriptor_set_layout(&create_info) };
        assert_vuid!(violations, "VUID-VkMutableDescriptorTypeListEXT-pDescriptorTypes-04599");
        assert_vuid!(violations, "VUID-VkMutableDescriptorTypeListEXT-pDescriptorTypes-04600");
        assert_vuid!(violations, "VUID-VkMutableDescriptorTypeListEXT-descriptorTypeCount-04598");
        assert_no_vuid!(violations, "VUID-VkMutableDescriptorTypeListEXT-descriptorTypeCount-04597");
        assert_no_vuid!(violations, "VUID-VkDescriptorSetLayoutCreateInfo-pBindings-07303");
    }

    #[test]
    fn duplicate_bindings_and_push_flags() {
        let validator = test_validator();
        let bindings = [
            binding(3, vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC, 1),
            binding(3, vk::DescriptorType::SAMPLED_IMAGE, 1),
        ];
        let create_info = vk::DescriptorSetLayoutCreateInfo::default()
            .flags(
                vk::DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR_KHR
                    | vk::DescriptorSetLayoutCreateFlags::HOST_ONLY_POOL_EXT,
            )
            .bindings(&bindings);

        let violations = unsafe { validator.validate_create_descriptor_set_layout(&create_info) };
        assert_vuid!(violations, "VUID-VkDescriptorSetLayoutCreateInfo-binding-00279");
        assert_vuid!(violations, "VUID-VkDescriptorSetLayoutCreateInfo-flags-00280");
        assert_vuid!(violations, "VUID-VkDescriptorSetLayoutCreateInfo-flags-04590");
    }

    #[test]
    fn variable_count_must_be_last_binding() {
        let validator = test_validator();
        let bindings = [
            binding(0, vk::DescriptorType::SAMPLED_IMAGE, 16),
            binding(1, vk::DescriptorType::SAMPLER, 1),
        ];
        let flags = [
            vk::DescriptorBindingFlags::VARIABLE_DESCRIPTOR_COUNT,
            vk::DescriptorBindingFlags::empty(),
        ];
        let mut binding_flags =
            vk::DescriptorSetLayoutBindingFlagsCreateInfo::default().binding_flags(&flags);
        let mut create_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);
        create_info.p_next = link(&mut binding_flags, ptr::null());

        let violations = unsafe { validator.validate_create_descriptor_set_layout(&create_info) };
        assert_vuid!(
            violations,
            "VUID-VkDescriptorSetLayoutBindingFlagsCreateInfo-pBindingFlags-03004",
        );
    }

    #[test]
    fn descriptor_pool_rules() {
        let validator = test_validator();
        let pool_sizes = [
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::INLINE_UNIFORM_BLOCK,
                descriptor_count: 6,
            },
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::UNIFORM_BUFFER,
                descriptor_count: 0,
            },
        ];
        let create_info = vk::DescriptorPoolCreateInfo::default()
            .flags(
                vk::DescriptorPoolCreateFlags::UPDATE_AFTER_BIND
                    | vk::DescriptorPoolCreateFlags::HOST_ONLY_EXT,
            )
            .pool_sizes(&pool_sizes);

        let violations = unsafe { validator.validate_create_descriptor_pool(&create_info) };
        assert_vuid!(violations, "VUID-VkDescriptorPoolCreateInfo-flags-04607");
        assert_vuid!(violations, "VUID-VkDescriptorPoolCreateInfo-maxSets-00301");
        assert_vuid!(violations, "VUID-VkDescriptorPoolSize-type-02218");
        assert_vuid!(violations, "VUID-VkDescriptorPoolSize-descriptorCount-00302");
    }

    #[test]
    fn allocate_sets_rules() {
        let validator = test_validator();
        let layouts = [vk::DescriptorSetLayout::from_raw(1), vk::DescriptorSetLayout::null()];
        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(vk::DescriptorPool::from_raw(2))
            .set_layouts(&layouts);

        let violations = unsafe { validator.validate_allocate_descriptor_sets(&allocate_info) };
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(violations[0].context, "allocate_info.p_set_layouts[1]");
    }

    #[test]
    fn write_needs_matching_info_and_aligned_offsets() {
        let validator = test_validator();
        let buffer_infos = [vk::DescriptorBufferInfo {
            buffer: vk::Buffer::from_raw(1),
            offset: 32,
            range: 128,
        }];
        let writes = [
            vk::WriteDescriptorSet::default()
                .dst_set(vk::DescriptorSet::from_raw(1))
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(&buffer_infos),
            vk::WriteDescriptorSet {
                dst_set: vk::DescriptorSet::from_raw(1),
                descriptor_type: vk::DescriptorType::SAMPLED_IMAGE,
                descriptor_count: 1,
                ..Default::default()
            },
        ];

        let violations = unsafe {
            validator.validate_update_descriptor_sets(2, writes.as_ptr(), 0, ptr::null())
        };
        assert_vuid!(violations, "VUID-VkWriteDescriptorSet-descriptorType-00327");
        assert_vuid!(violations, "VUID-VkWriteDescriptorSet-descriptorType-00322");
        assert_eq!(violations.len(), 2, "{}", violations);
        assert_eq!(violations[0].context, "p_descriptor_writes[0].p_buffer_info[0].offset");
    }

    #[test]
    fn acceleration_structure_write_needs_struct() {
        let validator = test_validator();
        let write = vk::WriteDescriptorSet {
            dst_set: vk::DescriptorSet::from_raw(1),
            descriptor_type: vk::DescriptorType::ACCELERATION_STRUCTURE_KHR,
            descriptor_count: 1,
            ..Default::default()
        };

        let violations =
            unsafe { validator.validate_update_descriptor_sets(1, &write, 0, ptr::null()) };
        assert_vuid!(violations, "VUID-VkWriteDescriptorSet-descriptorType-02382");
    }
}
