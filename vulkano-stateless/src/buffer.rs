// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for creating buffers and buffer views.

use crate::{
    chain::{chain_contains_tag, find_in_chain, AllowedStruct, ChainRules},
    format::{texel_size, FORMAT_VALUES},
    predicates::{
        validate_flags, validate_ranged_enum, validate_required_handle, validate_struct_type,
        FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk;

pub(crate) const BUFFER_USAGE_FLAGS: vk::BufferUsageFlags = flags_mask!(BufferUsageFlags {
    TRANSFER_SRC,
    TRANSFER_DST,
    UNIFORM_TEXEL_BUFFER,
    STORAGE_TEXEL_BUFFER,
    UNIFORM_BUFFER,
    STORAGE_BUFFER,
    INDEX_BUFFER,
    VERTEX_BUFFER,
    INDIRECT_BUFFER,
    SHADER_DEVICE_ADDRESS,
    TRANSFORM_FEEDBACK_BUFFER_EXT,
    TRANSFORM_FEEDBACK_COUNTER_BUFFER_EXT,
    CONDITIONAL_RENDERING_EXT,
    ACCELERATION_STRUCTURE_BUILD_INPUT_READ_ONLY_KHR,
    ACCELERATION_STRUCTURE_STORAGE_KHR,
    SHADER_BINDING_TABLE_KHR,
    SAMPLER_DESCRIPTOR_BUFFER_EXT,
    RESOURCE_DESCRIPTOR_BUFFER_EXT,
    PUSH_DESCRIPTORS_DESCRIPTOR_BUFFER_EXT,
});

const BUFFER_CREATE_FLAGS: vk::BufferCreateFlags = flags_mask!(BufferCreateFlags {
    SPARSE_BINDING,
    SPARSE_RESIDENCY,
    SPARSE_ALIASED,
    PROTECTED,
    DEVICE_ADDRESS_CAPTURE_REPLAY,
    DESCRIPTOR_BUFFER_CAPTURE_REPLAY_EXT,
});

const SPARSE_FLAGS: vk::BufferCreateFlags =
    flags_mask!(BufferCreateFlags { SPARSE_BINDING, SPARSE_RESIDENCY, SPARSE_ALIASED });

pub(crate) const EXTERNAL_MEMORY_HANDLE_TYPES: vk::ExternalMemoryHandleTypeFlags =
    flags_mask!(ExternalMemoryHandleTypeFlags {
        OPAQUE_FD,
        OPAQUE_WIN32,
        OPAQUE_WIN32_KMT,
        D3D11_TEXTURE,
        D3D11_TEXTURE_KMT,
        D3D12_HEAP,
        D3D12_RESOURCE,
        DMA_BUF_EXT,
        ANDROID_HARDWARE_BUFFER_ANDROID,
        HOST_ALLOCATION_EXT,
        HOST_MAPPED_FOREIGN_MEMORY_EXT,
    });

const BUFFER_DEVICE_ADDRESS: RequiresOneOf = RequiresOneOf(&[
    RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]),
    RequiresAllOf(&[Requires::DeviceExtension("khr_buffer_device_address")]),
]);

const BUFFER_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::BufferOpaqueCaptureAddressCreateInfo<'static>>()
            .requires(BUFFER_DEVICE_ADDRESS),
        AllowedStruct::of::<vk::BufferDeviceAddressCreateInfoEXT<'static>>().requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_buffer_device_address",
            )])]),
        ),
        AllowedStruct::of::<vk::ExternalMemoryBufferCreateInfo<'static>>(),
        AllowedStruct::tag(vk::StructureType::BUFFER_USAGE_FLAGS_2_CREATE_INFO_KHR),
        AllowedStruct::tag(vk::StructureType::OPAQUE_CAPTURE_DESCRIPTOR_DATA_CREATE_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkBufferCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkBufferCreateInfo-sType-unique"],
};

const BUFFER_VIEW_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::tag(
        vk::StructureType::BUFFER_USAGE_FLAGS_2_CREATE_INFO_KHR,
    )],
    unique: true,
    vuids_next: &["VUID-VkBufferViewCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkBufferViewCreateInfo-sType-unique"],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCreateBuffer`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_buffer(
        &self,
        create_info: &vk::BufferCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::BufferCreateInfo {
            p_next,
            flags,
            size,
            usage,
            sharing_mode,
            queue_family_index_count,
            p_queue_family_indices,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkBufferCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &BUFFER_CREATE_INFO_CHAIN,
        ));

        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            BUFFER_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkBufferCreateInfo-flags-parameter"],
            &[],
        ));

        // A `VkBufferUsageFlags2CreateInfoKHR` structure replaces `usage`.
        if !chain_contains_tag(p_next, vk::StructureType::BUFFER_USAGE_FLAGS_2_CREATE_INFO_KHR) {
            violations.push_opt(validate_flags(
                "create_info.usage",
                usage.as_raw(),
                BUFFER_USAGE_FLAGS.as_raw(),
                FlagPolicy::Required,
                &["VUID-VkBufferCreateInfo-usage-parameter"],
                &["VUID-VkBufferCreateInfo-usage-requiredbitmask"],
            ));
        }

        if size == 0 {
            violations.push(ValidationError {
                context: "create_info.size".into(),
                problem: "is zero".into(),
                vuids: &["VUID-VkBufferCreateInfo-size-00912"],
                ..Default::default()
            });
        }

        violations.push_opt(validate_ranged_enum(
            "create_info.sharing_mode",
            sharing_mode.as_raw(),
            enum_values!(SharingMode { EXCLUSIVE..=CONCURRENT }),
            &["VUID-VkBufferCreateInfo-sharingMode-parameter"],
        ));

        if sharing_mode == vk::SharingMode::CONCURRENT {
            violations.append(validate_concurrent_sharing(
                "create_info",
                queue_family_index_count,
                p_queue_family_indices,
                &["VUID-VkBufferCreateInfo-sharingMode-00913"],
                &["VUID-VkBufferCreateInfo-sharingMode-00914"],
            ));
        }

        if flags.contains(vk::BufferCreateFlags::SPARSE_BINDING) && !features.sparse_binding {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_BUFFER_CREATE_SPARSE_BINDING_BIT`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "sparse_binding",
                )])]),
                vuids: &["VUID-VkBufferCreateInfo-flags-00915"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if flags.contains(vk::BufferCreateFlags::SPARSE_RESIDENCY)
            && !features.sparse_residency_buffer
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_BUFFER_CREATE_SPARSE_RESIDENCY_BIT`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "sparse_residency_buffer",
                )])]),
                vuids: &["VUID-VkBufferCreateInfo-flags-00916"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if flags.contains(vk::BufferCreateFlags::SPARSE_ALIASED) && !features.sparse_residency_aliased
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_BUFFER_CREATE_SPARSE_ALIASED_BIT`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "sparse_residency_aliased",
                )])]),
                vuids: &["VUID-VkBufferCreateInfo-flags-00917"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if flags.intersects(
            vk::BufferCreateFlags::SPARSE_RESIDENCY | vk::BufferCreateFlags::SPARSE_ALIASED,
        ) && !flags.contains(vk::BufferCreateFlags::SPARSE_BINDING)
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_BUFFER_CREATE_SPARSE_RESIDENCY_BIT` or \
                    `VK_BUFFER_CREATE_SPARSE_ALIASED_BIT`, but not \
                    `VK_BUFFER_CREATE_SPARSE_BINDING_BIT`"
                    .into(),
                vuids: &["VUID-VkBufferCreateInfo-flags-00918"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if flags.contains(vk::BufferCreateFlags::PROTECTED) {
            if !features.protected_memory {
                violations.push(ValidationError {
                    context: "create_info.flags".into(),
                    problem: "contains `VK_BUFFER_CREATE_PROTECTED_BIT`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "protected_memory",
                    )])]),
                    vuids: &["VUID-VkBufferCreateInfo-flags-01887"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if flags.intersects(SPARSE_FLAGS) {
                violations.push(ValidationError {
                    context: "create_info.flags".into(),
                    problem: "contains `VK_BUFFER_CREATE_PROTECTED_BIT` together with a sparse \
                        flag"
                        .into(),
                    vuids: &["VUID-VkBufferCreateInfo-None-01888"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        let capture_replay = flags.contains(vk::BufferCreateFlags::DEVICE_ADDRESS_CAPTURE_REPLAY);

        if capture_replay && !features.buffer_device_address_capture_replay {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_BUFFER_CREATE_DEVICE_ADDRESS_CAPTURE_REPLAY_BIT`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "buffer_device_address_capture_replay",
                )])]),
                vuids: &["VUID-VkBufferCreateInfo-flags-03338"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if let Some(capture_address) =
            find_in_chain::<vk::BufferOpaqueCaptureAddressCreateInfo<'_>>(p_next)
        {
            if capture_address.opaque_capture_address != 0 && !capture_replay {
                violations.push(ValidationError {
                    context: "create_info.p_next.opaque_capture_address".into(),
                    problem: "is not zero, but `create_info.flags` does not contain \
                        `VK_BUFFER_CREATE_DEVICE_ADDRESS_CAPTURE_REPLAY_BIT`"
                        .into(),
                    vuids: &["VUID-VkBufferCreateInfo-opaqueCaptureAddress-03337"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        if flags.contains(vk::BufferCreateFlags::DESCRIPTOR_BUFFER_CAPTURE_REPLAY_EXT)
            && !features.descriptor_buffer_capture_replay
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_BUFFER_CREATE_DESCRIPTOR_BUFFER_CAPTURE_REPLAY_BIT_EXT`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "descriptor_buffer_capture_replay",
                )])]),
                vuids: &["VUID-VkBufferCreateInfo-flags-08099"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if let Some(external) = find_in_chain::<vk::ExternalMemoryBufferCreateInfo<'_>>(p_next) {
            violations.push_opt(validate_flags(
                "create_info.p_next.handle_types",
                external.handle_types.as_raw(),
                EXTERNAL_MEMORY_HANDLE_TYPES.as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkExternalMemoryBufferCreateInfo-handleTypes-parameter"],
                &[],
            ));
        }

        violations
    }

    /// Validates the arguments of `vkCreateBufferView`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_buffer_view(
        &self,
        create_info: &vk::BufferViewCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let properties = &self.capabilities().properties;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkBufferViewCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            create_info.p_next,
            &BUFFER_VIEW_CREATE_INFO_CHAIN,
        ));

        if !create_info.flags.is_empty() {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "is not zero".into(),
                vuids: &["VUID-VkBufferViewCreateInfo-flags-zerobitmask"],
                ..Default::default()
            });
        }

        violations.push_opt(validate_required_handle(
            "create_info.buffer",
            create_info.buffer,
            &["VUID-VkBufferViewCreateInfo-buffer-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.format",
            create_info.format.as_raw(),
            FORMAT_VALUES,
            &["VUID-VkBufferViewCreateInfo-format-parameter"],
        ));

        if create_info.range != vk::WHOLE_SIZE {
            if create_info.range == 0 {
                violations.push(ValidationError {
                    context: "create_info.range".into(),
                    problem: "is zero".into(),
                    vuids: &["VUID-VkBufferViewCreateInfo-range-00928"],
                    ..Default::default()
                });
            } else if let Some(texel_size) = texel_size(create_info.format) {
                if create_info.range % texel_size != 0 {
                    violations.push(ValidationError {
                        context: "create_info.range".into(),
                        problem: format!(
                            "is {}, which is not a multiple of the texel size of {:?} ({})",
                            create_info.range, create_info.format, texel_size,
                        )
                        .into(),
                        vuids: &["VUID-VkBufferViewCreateInfo-range-00929"],
                        kind: ViolationKind::Misaligned,
                        ..Default::default()
                    });
                } else if create_info.range / texel_size
                    > u64::from(properties.max_texel_buffer_elements)
                {
                    violations.push(ValidationError {
                        context: "create_info.range".into(),
                        problem: format!(
                            "holds {} texels, which is greater than the \
                            `max_texel_buffer_elements` limit ({})",
                            create_info.range / texel_size,
                            properties.max_texel_buffer_elements,
                        )
                        .into(),
                        vuids: &["VUID-VkBufferViewCreateInfo-range-00930"],
                        ..Default::default()
                    });
                }
            }
        }

        violations
    }
}

/// Checks the queue family indices of a resource that uses `VK_SHARING_MODE_CONCURRENT`.
pub(crate) fn validate_concurrent_sharing(
    context: &'static str,
    queue_family_index_count: u32,
    p_queue_family_indices: *const u32,
    vuids_pointer: &'static [&'static str],
    vuids_count: &'static [&'static str],
) -> Violations {
    let mut violations = Violations::new();

    if p_queue_family_indices.is_null() {
        violations.push(ValidationError {
            context: format!("{}.p_queue_family_indices", context).into(),
            problem: "is null, but `sharing_mode` is `VK_SHARING_MODE_CONCURRENT`".into(),
            vuids: vuids_pointer,
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    if queue_family_index_count <= 1 {
        violations.push(ValidationError {
            context: format!("{}.queue_family_index_count", context).into(),
            problem: format!(
                "is {}, but `sharing_mode` is `VK_SHARING_MODE_CONCURRENT` and needs more than \
                one queue family",
                queue_family_index_count,
            )
            .into(),
            vuids: vuids_count,
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::{link, test_capabilities, test_validator, test_validator_with};
    use crate::features::DeviceFeatures;
    use ash::vk::{self, Handle};
    use std::ptr;

    fn buffer_info() -> vk::BufferCreateInfo<'static> {
        vk::BufferCreateInfo::default()
            .size(1024)
            .usage(vk::BufferUsageFlags::VERTEX_BUFFER)
    }

    #[test]
    fn valid_buffer() {
        let validator = test_validator();
        let violations = unsafe { validator.validate_create_buffer(&buffer_info()) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn concurrent_sharing_with_one_family_and_null_indices() {
        let validator = test_validator();
        let mut create_info = buffer_info().sharing_mode(vk::SharingMode::CONCURRENT);
        create_info.queue_family_index_count = 1;

        let violations = unsafe { validator.validate_create_buffer(&create_info) };
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-sharingMode-00914");
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-sharingMode-00913");
        assert_eq!(violations.len(), 2);

        let families = [0, 1];
        let create_info = buffer_info()
            .sharing_mode(vk::SharingMode::CONCURRENT)
            .queue_family_indices(&families);
        let violations = unsafe { validator.validate_create_buffer(&create_info) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn zero_size_and_usage() {
        let validator = test_validator();
        let create_info = vk::BufferCreateInfo::default();

        let violations = unsafe { validator.validate_create_buffer(&create_info) };
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-size-00912");
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-usage-requiredbitmask");
    }

    #[test]
    fn sparse_flags_need_features_and_binding() {
        let mut capabilities = test_capabilities();
        capabilities.features = DeviceFeatures {
            sparse_binding: true,
            ..DeviceFeatures::empty()
        };
        let validator = test_validator_with(capabilities);
        let create_info = buffer_info().flags(vk::BufferCreateFlags::SPARSE_RESIDENCY);

        let violations = unsafe { validator.validate_create_buffer(&create_info) };
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-flags-00916");
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-flags-00918");
        assert_no_vuid!(violations, "VUID-VkBufferCreateInfo-flags-00915");
    }

    #[test]
    fn capture_address_without_flag() {
        let validator = test_validator();
        let mut capture = vk::BufferOpaqueCaptureAddressCreateInfo::default()
            .opaque_capture_address(0x1000);
        let mut create_info = buffer_info();
        create_info.p_next = link(&mut capture, ptr::null());

        let violations = unsafe { validator.validate_create_buffer(&create_info) };
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-opaqueCaptureAddress-03337");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn disallowed_chain_struct() {
        let validator = test_validator();
        let mut foreign = vk::ImageFormatListCreateInfo::default();
        let mut create_info = buffer_info();
        create_info.p_next = link(&mut foreign, ptr::null());

        let violations = unsafe { validator.validate_create_buffer(&create_info) };
        assert_vuid!(violations, "VUID-VkBufferCreateInfo-pNext-pNext");
    }

    #[test]
    fn buffer_view_range() {
        let validator = test_validator();
        let create_info = vk::BufferViewCreateInfo::default()
            .buffer(vk::Buffer::from_raw(1))
            .format(vk::Format::R32G32B32A32_SFLOAT)
            .range(24);

        let violations = unsafe { validator.validate_create_buffer_view(&create_info) };
        assert_vuid!(violations, "VUID-VkBufferViewCreateInfo-range-00929");

        let create_info = create_info.range(0).buffer(vk::Buffer::null());
        let violations = unsafe { validator.validate_create_buffer_view(&create_info) };
        assert_vuid!(violations, "VUID-VkBufferViewCreateInfo-range-00928");
        assert_vuid!(violations, "VUID-VkBufferViewCreateInfo-buffer-parameter");

        let create_info = create_info.range(vk::WHOLE_SIZE).buffer(vk::Buffer::from_raw(1));
        let violations = unsafe { validator.validate_create_buffer_view(&create_info) };
        assert!(violations.is_empty(), "{}", violations);
    }
}
