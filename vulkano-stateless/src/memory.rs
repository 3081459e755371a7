// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for allocating, mapping and flushing device memory.

use crate::{
    buffer::EXTERNAL_MEMORY_HANDLE_TYPES,
    chain::{chain_contains, chain_contains_tag, find_in_chain, AllowedStruct, ChainRules},
    predicates::{
        is_aligned, slice_or_empty, validate_array, validate_flags, validate_required_handle,
        validate_struct_type, validate_struct_type_array, ArrayRules, FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk::{self, Handle};

const MEMORY_ALLOCATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::MemoryAllocateFlagsInfo<'static>>().requires(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
            RequiresAllOf(&[Requires::DeviceExtension("khr_device_group")]),
        ])),
        AllowedStruct::of::<vk::MemoryDedicatedAllocateInfo<'static>>().requires(RequiresOneOf(
            &[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_dedicated_allocation")]),
            ],
        )),
        AllowedStruct::of::<vk::ExportMemoryAllocateInfo<'static>>().requires(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_memory")]),
        ])),
        AllowedStruct::of::<vk::ImportMemoryFdInfoKHR<'static>>().requires(RequiresOneOf(&[
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_memory_fd")]),
        ])),
        AllowedStruct::of::<vk::MemoryOpaqueCaptureAddressAllocateInfo<'static>>().requires(
            RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_buffer_device_address")]),
            ]),
        ),
        AllowedStruct::tag(vk::StructureType::IMPORT_MEMORY_WIN32_HANDLE_INFO_KHR),
        AllowedStruct::tag(vk::StructureType::EXPORT_MEMORY_WIN32_HANDLE_INFO_KHR),
        AllowedStruct::tag(vk::StructureType::IMPORT_MEMORY_HOST_POINTER_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::IMPORT_ANDROID_HARDWARE_BUFFER_INFO_ANDROID),
        AllowedStruct::tag(vk::StructureType::MEMORY_PRIORITY_ALLOCATE_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkMemoryAllocateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkMemoryAllocateInfo-sType-unique"],
};

const MAPPED_MEMORY_RANGE_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkMappedMemoryRange-pNext-pNext"],
    vuids_unique: &[],
};

impl StatelessValidator {
    /// Validates the arguments of `vkAllocateMemory`.
    ///
    /// # Safety
    ///
    /// `allocate_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_allocate_memory(
        &self,
        allocate_info: &vk::MemoryAllocateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let &vk::MemoryAllocateInfo {
            p_next,
            allocation_size,
            memory_type_index,
            ..
        } = allocate_info;

        violations.push_opt(validate_struct_type(
            "allocate_info.s_type",
            allocate_info,
            &["VUID-VkMemoryAllocateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "allocate_info.p_next",
            p_next,
            &MEMORY_ALLOCATE_INFO_CHAIN,
        ));

        let is_import = chain_contains::<vk::ImportMemoryFdInfoKHR<'_>>(p_next)
            || chain_contains_tag(p_next, vk::StructureType::IMPORT_MEMORY_WIN32_HANDLE_INFO_KHR)
            || chain_contains_tag(p_next, vk::StructureType::IMPORT_MEMORY_HOST_POINTER_INFO_EXT)
            || chain_contains_tag(
                p_next,
                vk::StructureType::IMPORT_ANDROID_HARDWARE_BUFFER_INFO_ANDROID,
            );

        if allocation_size == 0 && !is_import {
            violations.push(ValidationError {
                context: "allocate_info.allocation_size".into(),
                problem: "is zero".into(),
                vuids: &["VUID-VkMemoryAllocateInfo-allocationSize-00638"],
                ..Default::default()
            });
        }

        if memory_type_index >= capabilities.properties.memory_type_count {
            violations.push(ValidationError {
                context: "allocate_info.memory_type_index".into(),
                problem: format!(
                    "is {}, but the device has only {} memory types",
                    memory_type_index, capabilities.properties.memory_type_count,
                )
                .into(),
                vuids: &["VUID-vkAllocateMemory-pAllocateInfo-01714"],
                ..Default::default()
            });
        }

        let flags_info = find_in_chain::<vk::MemoryAllocateFlagsInfo<'_>>(p_next);
        let flags = flags_info.map_or(vk::MemoryAllocateFlags::empty(), |info| info.flags);

        if let Some(flags_info) = flags_info {
            violations.push_opt(validate_flags(
                "allocate_info.p_next.flags",
                flags.as_raw(),
                flags_mask!(MemoryAllocateFlags {
                    DEVICE_MASK,
                    DEVICE_ADDRESS,
                    DEVICE_ADDRESS_CAPTURE_REPLAY,
                })
                .as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkMemoryAllocateFlagsInfo-flags-parameter"],
                &[],
            ));

            if flags.contains(vk::MemoryAllocateFlags::DEVICE_MASK) && flags_info.device_mask == 0
            {
                violations.push(ValidationError {
                    context: "allocate_info.p_next.device_mask".into(),
                    problem: "is zero, but `flags` contains `VK_MEMORY_ALLOCATE_DEVICE_MASK_BIT`"
                        .into(),
                    vuids: &["VUID-VkMemoryAllocateFlagsInfo-deviceMask-00675"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            if flags.contains(vk::MemoryAllocateFlags::DEVICE_ADDRESS)
                && !capabilities.features.buffer_device_address
            {
                violations.push(ValidationError {
                    context: "allocate_info.p_next.flags".into(),
                    problem: "contains `VK_MEMORY_ALLOCATE_DEVICE_ADDRESS_BIT`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "buffer_device_address",
                    )])]),
                    vuids: &["VUID-VkMemoryAllocateInfo-flags-03331"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if flags.contains(vk::MemoryAllocateFlags::DEVICE_ADDRESS_CAPTURE_REPLAY)
                && !capabilities.features.buffer_device_address_capture_replay
            {
                violations.push(ValidationError {
                    context: "allocate_info.p_next.flags".into(),
                    problem: "contains `VK_MEMORY_ALLOCATE_DEVICE_ADDRESS_CAPTURE_REPLAY_BIT`"
                        .into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "buffer_device_address_capture_replay",
                    )])]),
                    vuids: &["VUID-VkMemoryAllocateInfo-flags-03330"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        if let Some(capture) =
            find_in_chain::<vk::MemoryOpaqueCaptureAddressAllocateInfo<'_>>(p_next)
        {
            if capture.opaque_capture_address != 0
                && !flags.contains(vk::MemoryAllocateFlags::DEVICE_ADDRESS_CAPTURE_REPLAY)
            {
                violations.push(ValidationError {
                    context: "allocate_info.p_next.opaque_capture_address".into(),
                    problem: "is not zero, but the allocation flags do not contain \
                        `VK_MEMORY_ALLOCATE_DEVICE_ADDRESS_CAPTURE_REPLAY_BIT`"
                        .into(),
                    vuids: &["VUID-VkMemoryAllocateInfo-opaqueCaptureAddress-03329"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        if let Some(dedicated) = find_in_chain::<vk::MemoryDedicatedAllocateInfo<'_>>(p_next) {
            if !dedicated.image.is_null() && !dedicated.buffer.is_null() {
                violations.push(ValidationError {
                    context: "allocate_info.p_next".into(),
                    problem: "the `image` and `buffer` of the dedicated allocation are both not \
                        `VK_NULL_HANDLE`"
                        .into(),
                    vuids: &["VUID-VkMemoryDedicatedAllocateInfo-image-01432"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        if let Some(export) = find_in_chain::<vk::ExportMemoryAllocateInfo<'_>>(p_next) {
            violations.push_opt(validate_flags(
                "allocate_info.p_next.handle_types",
                export.handle_types.as_raw(),
                EXTERNAL_MEMORY_HANDLE_TYPES.as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkExportMemoryAllocateInfo-handleTypes-parameter"],
                &[],
            ));
        }

        if let Some(import) = find_in_chain::<vk::ImportMemoryFdInfoKHR<'_>>(p_next) {
            if !import.handle_type.is_empty()
                && !matches!(
                    import.handle_type,
                    vk::ExternalMemoryHandleTypeFlags::OPAQUE_FD
                        | vk::ExternalMemoryHandleTypeFlags::DMA_BUF_EXT
                )
            {
                violations.push(ValidationError {
                    context: "allocate_info.p_next.handle_type".into(),
                    problem: format!(
                        "is {:?}, which cannot be imported from a file descriptor",
                        import.handle_type,
                    )
                    .into(),
                    vuids: &["VUID-VkImportMemoryFdInfoKHR-handleType-00669"],
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkMapMemory`.
    pub fn validate_map_memory(
        &self,
        memory: vk::DeviceMemory,
        offset: vk::DeviceSize,
        size: vk::DeviceSize,
        flags: vk::MemoryMapFlags,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_required_handle(
            "memory",
            memory,
            &["VUID-vkMapMemory-memory-parameter"],
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-vkMapMemory-flags-zerobitmask"],
            &[],
        ));

        if size == 0 {
            violations.push(ValidationError {
                context: "size".into(),
                problem: "is zero".into(),
                vuids: &["VUID-vkMapMemory-size-00680"],
                ..Default::default()
            });
        } else if size != vk::WHOLE_SIZE && offset.checked_add(size).is_none() {
            violations.push(ValidationError {
                context: "size".into(),
                problem: format!(
                    "is {}, and `offset` is {}, so the end of the range does not fit in 64 bits",
                    size, offset,
                )
                .into(),
                vuids: &["VUID-vkMapMemory-size-00681"],
                kind: ViolationKind::ArithmeticOverflow,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkFlushMappedMemoryRanges`. The same rules apply to
    /// `vkInvalidateMappedMemoryRanges`.
    ///
    /// # Safety
    ///
    /// `p_memory_ranges` must be valid as described in the crate documentation.
    pub unsafe fn validate_flush_mapped_memory_ranges(
        &self,
        memory_range_count: u32,
        p_memory_ranges: *const vk::MappedMemoryRange<'_>,
    ) -> Violations {
        let mut violations = validate_array(
            "memory_range_count",
            "p_memory_ranges",
            memory_range_count,
            p_memory_ranges,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkFlushMappedMemoryRanges-memoryRangeCount-arraylength"],
                array_vuids: &["VUID-vkFlushMappedMemoryRanges-pMemoryRanges-parameter"],
            },
        );
        let memory_ranges = slice_or_empty(p_memory_ranges, memory_range_count);
        let atom_size = self.capabilities().properties.non_coherent_atom_size;

        violations.append(validate_struct_type_array(
            "p_memory_ranges",
            memory_ranges,
            &["VUID-VkMappedMemoryRange-sType-sType"],
        ));

        for (index, range) in memory_ranges.iter().enumerate() {
            let mut range_violations =
                self.validate_chain("p_next", range.p_next, &MAPPED_MEMORY_RANGE_CHAIN);

            range_violations.push_opt(validate_required_handle(
                "memory",
                range.memory,
                &["VUID-VkMappedMemoryRange-memory-parameter"],
            ));

            if !is_aligned(range.offset, atom_size) {
                range_violations.push(ValidationError {
                    context: "offset".into(),
                    problem: format!(
                        "is {}, which is not a multiple of the `non_coherent_atom_size` limit \
                        ({})",
                        range.offset, atom_size,
                    )
                    .into(),
                    vuids: &["VUID-VkMappedMemoryRange-offset-00687"],
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }

            if range.size != vk::WHOLE_SIZE && !is_aligned(range.size, atom_size) {
                range_violations.push(ValidationError {
                    context: "size".into(),
                    problem: format!(
                        "is {}, which is neither `VK_WHOLE_SIZE` nor a multiple of the \
                        `non_coherent_atom_size` limit ({})",
                        range.size, atom_size,
                    )
                    .into(),
                    vuids: &["VUID-VkMappedMemoryRange-size-01390"],
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }

            violations.append_with_context(range_violations, || {
                format!("p_memory_ranges[{}]", index)
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{link, test_validator};
    use ash::vk::{self, Handle};
    use std::ptr;

    #[test]
    fn allocate_memory_rules() {
        let validator = test_validator();
        let allocate_info = vk::MemoryAllocateInfo::default()
            .allocation_size(0)
            .memory_type_index(7);

        let violations = unsafe { validator.validate_allocate_memory(&allocate_info) };
        assert_vuid!(violations, "VUID-VkMemoryAllocateInfo-allocationSize-00638");
        assert_vuid!(violations, "VUID-vkAllocateMemory-pAllocateInfo-01714");

        let allocate_info = allocate_info.allocation_size(4096).memory_type_index(1);
        let violations = unsafe { validator.validate_allocate_memory(&allocate_info) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn import_allows_zero_size() {
        let validator = test_validator();
        let mut import = vk::ImportMemoryFdInfoKHR::default()
            .handle_type(vk::ExternalMemoryHandleTypeFlags::OPAQUE_WIN32)
            .fd(3);
        let mut allocate_info = vk::MemoryAllocateInfo::default();
        allocate_info.p_next = link(&mut import, ptr::null());

        let mut capabilities = crate::tests::test_capabilities();
        capabilities.enabled_extensions.khr_external_memory_fd = true;
        let validator_with_fd = crate::tests::test_validator_with(capabilities);

        let violations = unsafe { validator_with_fd.validate_allocate_memory(&allocate_info) };
        assert_no_vuid!(violations, "VUID-VkMemoryAllocateInfo-allocationSize-00638");
        assert_vuid!(violations, "VUID-VkImportMemoryFdInfoKHR-handleType-00669");

        let violations = unsafe { validator.validate_allocate_memory(&allocate_info) };
        assert_vuid!(violations, "VUID-VkMemoryAllocateInfo-pNext-pNext");
    }

    #[test]
    fn dedicated_allocation_with_both_resources() {
        let validator = test_validator();
        let mut dedicated = vk::MemoryDedicatedAllocateInfo::default()
            .image(vk::Image::from_raw(1))
            .buffer(vk::Buffer::from_raw(2));
        let mut allocate_info = vk::MemoryAllocateInfo::default().allocation_size(256);
        allocate_info.p_next = link(&mut dedicated, ptr::null());

        let violations = unsafe { validator.validate_allocate_memory(&allocate_info) };
        assert_vuid!(violations, "VUID-VkMemoryDedicatedAllocateInfo-image-01432");
    }

    #[test]
    fn map_memory_rules() {
        let validator = test_validator();
        let memory = vk::DeviceMemory::from_raw(5);

        let violations = validator.validate_map_memory(memory, 0, 0, vk::MemoryMapFlags::empty());
        assert_vuid!(violations, "VUID-vkMapMemory-size-00680");

        let violations =
            validator.validate_map_memory(memory, u64::MAX - 4, 16, vk::MemoryMapFlags::empty());
        assert_vuid!(violations, "VUID-vkMapMemory-size-00681");

        let violations = validator.validate_map_memory(
            memory,
            u64::MAX - 4,
            vk::WHOLE_SIZE,
            vk::MemoryMapFlags::empty(),
        );
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn flush_ranges_alignment() {
        let validator = test_validator();
        let ranges = [
            vk::MappedMemoryRange::default()
                .memory(vk::DeviceMemory::from_raw(1))
                .offset(64)
                .size(vk::WHOLE_SIZE),
            vk::MappedMemoryRange::default()
                .memory(vk::DeviceMemory::from_raw(1))
                .offset(10)
                .size(100),
        ];

        let violations =
            unsafe { validator.validate_flush_mapped_memory_ranges(2, ranges.as_ptr()) };
        assert_eq!(violations.len(), 2, "{}", violations);
        assert_eq!(violations[0].context, "p_memory_ranges[1].offset");
        assert_vuid!(violations, "VUID-VkMappedMemoryRange-size-01390");

        let violations =
            unsafe { validator.validate_flush_mapped_memory_ranges(3, ptr::null()) };
        assert_vuid!(violations, "VUID-vkFlushMappedMemoryRanges-pMemoryRanges-parameter");
    }
}
