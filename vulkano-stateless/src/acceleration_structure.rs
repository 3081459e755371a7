// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for acceleration structures: creation, builds on the device and on the host, size
//! queries, copies and property queries.

use crate::{
    chain::{AllowedStruct, ChainRules},
    format::FORMAT_VALUES,
    predicates::{
        is_aligned, slice_or_empty, validate_array, validate_flags, validate_ranged_enum,
        validate_required_handle, validate_required_pointer, validate_struct_type, ArrayRules,
        FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, ViolationKind,
    Violations,
};
use ash::vk::{self, Handle};
use smallvec::SmallVec;
use std::ffi::c_void;

const ACCELERATION_STRUCTURE_CREATE_FLAGS: vk::AccelerationStructureCreateFlagsKHR =
    flags_mask!(AccelerationStructureCreateFlagsKHR {
        DEVICE_ADDRESS_CAPTURE_REPLAY,
        DESCRIPTOR_BUFFER_CAPTURE_REPLAY_EXT,
    });

const BUILD_FLAGS: vk::BuildAccelerationStructureFlagsKHR =
    flags_mask!(BuildAccelerationStructureFlagsKHR {
        ALLOW_UPDATE,
        ALLOW_COMPACTION,
        PREFER_FAST_TRACE,
        PREFER_FAST_BUILD,
        LOW_MEMORY,
    });

const GEOMETRY_FLAGS: vk::GeometryFlagsKHR =
    flags_mask!(GeometryFlagsKHR { OPAQUE, NO_DUPLICATE_ANY_HIT_INVOCATION });

/// Serialized acceleration structures live at addresses aligned to this many bytes.
const SERIALIZATION_ALIGNMENT: u64 = 256;

const ACCELERATION_STRUCTURE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::tag(vk::StructureType::ACCELERATION_STRUCTURE_MOTION_INFO_NV),
        AllowedStruct::tag(vk::StructureType::OPAQUE_CAPTURE_DESCRIPTOR_DATA_CREATE_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkAccelerationStructureCreateInfoKHR-pNext-pNext"],
    vuids_unique: &["VUID-VkAccelerationStructureCreateInfoKHR-sType-unique"],
};

const BUILD_GEOMETRY_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-pNext-pNext"],
    vuids_unique: &[],
};

const TRIANGLES_DATA_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::tag(
            vk::StructureType::ACCELERATION_STRUCTURE_GEOMETRY_MOTION_TRIANGLES_DATA_NV,
        ),
        AllowedStruct::tag(
            vk::StructureType::ACCELERATION_STRUCTURE_TRIANGLES_OPACITY_MICROMAP_EXT,
        ),
    ],
    unique: true,
    vuids_next: &["VUID-VkAccelerationStructureGeometryTrianglesDataKHR-pNext-pNext"],
    vuids_unique: &["VUID-VkAccelerationStructureGeometryTrianglesDataKHR-sType-unique"],
};

/// The VUIDs that differ between the device and host build commands.
struct BuildCommandVuids {
    dst: &'static [&'static str],
    update_without_src: &'static [&'static str],
    duplicate_dst: &'static [&'static str],
}

const CMD_BUILD_VUIDS: BuildCommandVuids = BuildCommandVuids {
    dst: &["VUID-vkCmdBuildAccelerationStructuresKHR-dstAccelerationStructure-03800"],
    update_without_src: &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-04630"],
    duplicate_dst: &["VUID-vkCmdBuildAccelerationStructuresKHR-dstAccelerationStructure-03698"],
};

const HOST_BUILD_VUIDS: BuildCommandVuids = BuildCommandVuids {
    dst: &["VUID-vkBuildAccelerationStructuresKHR-dstAccelerationStructure-03800"],
    update_without_src: &["VUID-vkBuildAccelerationStructuresKHR-pInfos-04630"],
    duplicate_dst: &["VUID-vkBuildAccelerationStructuresKHR-dstAccelerationStructure-03698"],
};

/// What a build geometry info is being checked for.
#[derive(Clone, Copy)]
enum BuildTarget {
    /// A build recorded into a command buffer. Addresses are device addresses.
    Device,
    /// A build executed by the host. Addresses are host pointers.
    Host,
    /// A size query, which ignores the mode, the handles and the addresses.
    SizeQuery,
}

impl StatelessValidator {
    /// Validates the arguments of `vkCreateAccelerationStructureKHR`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_acceleration_structure_khr(
        &self,
        create_info: &vk::AccelerationStructureCreateInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::AccelerationStructureCreateInfoKHR {
            p_next,
            create_flags,
            buffer,
            offset,
            ty,
            device_address,
            ..
        } = create_info;

        if !features.acceleration_structure {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "acceleration_structure",
                )])]),
                vuids: &["VUID-vkCreateAccelerationStructureKHR-accelerationStructure-03611"],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkAccelerationStructureCreateInfoKHR-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &ACCELERATION_STRUCTURE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.create_flags",
            create_flags.as_raw(),
            ACCELERATION_STRUCTURE_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkAccelerationStructureCreateInfoKHR-createFlags-parameter"],
            &[],
        ));
        violations.push_opt(validate_required_handle(
            "create_info.buffer",
            buffer,
            &["VUID-VkAccelerationStructureCreateInfoKHR-buffer-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "create_info.ty",
            ty.as_raw(),
            enum_values!(AccelerationStructureTypeKHR { TOP_LEVEL..=GENERIC }),
            &["VUID-VkAccelerationStructureCreateInfoKHR-type-parameter"],
        ));

        if !is_aligned(offset, 256) {
            violations.push(ValidationError {
                context: "create_info.offset".into(),
                problem: format!("is {}, which is not a multiple of 256", offset).into(),
                vuids: &["VUID-VkAccelerationStructureCreateInfoKHR-offset-03734"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        let capture_replay = create_flags
            .contains(vk::AccelerationStructureCreateFlagsKHR::DEVICE_ADDRESS_CAPTURE_REPLAY);

        if capture_replay && !features.acceleration_structure_capture_replay {
            violations.push(ValidationError {
                context: "create_info.create_flags".into(),
                problem: "contains \
                    `VK_ACCELERATION_STRUCTURE_CREATE_DEVICE_ADDRESS_CAPTURE_REPLAY_BIT_KHR`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "acceleration_structure_capture_replay",
                )])]),
                vuids: &["VUID-VkAccelerationStructureCreateInfoKHR-createFlags-03613"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if device_address != 0 && !capture_replay {
            violations.push(ValidationError {
                context: "create_info.device_address".into(),
                problem: format!(
                    "is {:#x}, but `create_flags` does not contain \
                    `VK_ACCELERATION_STRUCTURE_CREATE_DEVICE_ADDRESS_CAPTURE_REPLAY_BIT_KHR`",
                    device_address,
                )
                .into(),
                vuids: &["VUID-VkAccelerationStructureCreateInfoKHR-deviceAddress-03612"],
                kind: ViolationKind::ExtraneousCompanion,
                ..Default::default()
            });
        }

        if create_flags
            .contains(vk::AccelerationStructureCreateFlagsKHR::DESCRIPTOR_BUFFER_CAPTURE_REPLAY_EXT)
            && !features.descriptor_buffer_capture_replay
        {
            violations.push(ValidationError {
                context: "create_info.create_flags".into(),
                problem: "contains \
                    `VK_ACCELERATION_STRUCTURE_CREATE_DESCRIPTOR_BUFFER_CAPTURE_REPLAY_BIT_EXT`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "descriptor_buffer_capture_replay",
                )])]),
                vuids: &["VUID-VkAccelerationStructureCreateInfoKHR-createFlags-08108"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdBuildAccelerationStructuresKHR`.
    ///
    /// # Safety
    ///
    /// `p_infos` must be null or valid for `info_count` elements, and `pp_build_range_infos`
    /// must be null or valid for `info_count` pointers to `geometry_count` range infos each.
    pub unsafe fn validate_cmd_build_acceleration_structures_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        info_count: u32,
        p_infos: *const vk::AccelerationStructureBuildGeometryInfoKHR<'_>,
        pp_build_range_infos: *const *const vk::AccelerationStructureBuildRangeInfoKHR,
    ) -> Violations {
        let mut violations = validate_array(
            "info_count",
            "p_infos",
            info_count,
            p_infos,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCmdBuildAccelerationStructuresKHR-infoCount-arraylength"],
                array_vuids: &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-parameter"],
            },
        );

        if info_count != 0 {
            violations.push_opt(validate_required_pointer(
                "pp_build_range_infos",
                pp_build_range_infos,
                &["VUID-vkCmdBuildAccelerationStructuresKHR-ppBuildRangeInfos-parameter"],
            ));
        }

        violations.append(self.validate_builds(
            BuildTarget::Device,
            &CMD_BUILD_VUIDS,
            slice_or_empty(p_infos, info_count),
            slice_or_empty(pp_build_range_infos, info_count),
        ));

        violations
    }

    /// Validates the arguments of `vkBuildAccelerationStructuresKHR`.
    ///
    /// # Safety
    ///
    /// Same as [`validate_cmd_build_acceleration_structures_khr`].
    ///
    /// [`validate_cmd_build_acceleration_structures_khr`]: Self::validate_cmd_build_acceleration_structures_khr
    pub unsafe fn validate_build_acceleration_structures_khr(
        &self,
        _deferred_operation: vk::DeferredOperationKHR,
        info_count: u32,
        p_infos: *const vk::AccelerationStructureBuildGeometryInfoKHR<'_>,
        pp_build_range_infos: *const *const vk::AccelerationStructureBuildRangeInfoKHR,
    ) -> Violations {
        let mut violations = Violations::new();

        if !self.capabilities().features.acceleration_structure_host_commands {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "acceleration_structure_host_commands",
                )])]),
                vuids: &[
                    "VUID-vkBuildAccelerationStructuresKHR-accelerationStructureHostCommands-03581",
                ],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "info_count",
            "p_infos",
            info_count,
            p_infos,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkBuildAccelerationStructuresKHR-infoCount-arraylength"],
                array_vuids: &["VUID-vkBuildAccelerationStructuresKHR-pInfos-parameter"],
            },
        ));

        if info_count != 0 {
            violations.push_opt(validate_required_pointer(
                "pp_build_range_infos",
                pp_build_range_infos,
                &["VUID-vkBuildAccelerationStructuresKHR-ppBuildRangeInfos-parameter"],
            ));
        }

        violations.append(self.validate_builds(
            BuildTarget::Host,
            &HOST_BUILD_VUIDS,
            slice_or_empty(p_infos, info_count),
            slice_or_empty(pp_build_range_infos, info_count),
        ));

        violations
    }

    unsafe fn validate_builds(
        &self,
        target: BuildTarget,
        vuids: &BuildCommandVuids,
        infos: &[vk::AccelerationStructureBuildGeometryInfoKHR<'_>],
        range_infos: &[*const vk::AccelerationStructureBuildRangeInfoKHR],
    ) -> Violations {
        let mut violations = Violations::new();
        let mut destinations: SmallVec<[vk::AccelerationStructureKHR; 8]> = SmallVec::new();

        for (index, info) in infos.iter().enumerate() {
            let ranges = range_infos
                .get(index)
                .map_or(&[][..], |&ranges| slice_or_empty(ranges, info.geometry_count));
            let primitive_counts: SmallVec<[u32; 8]> =
                ranges.iter().map(|range| range.primitive_count).collect();
            let mut info_violations =
                self.validate_build_geometry_info(info, target, &primitive_counts, ranges);

            let dst = info.dst_acceleration_structure;
            info_violations.push_opt(validate_required_handle(
                "dst_acceleration_structure",
                dst,
                vuids.dst,
            ));

            if info.mode == vk::BuildAccelerationStructureModeKHR::UPDATE
                && info.src_acceleration_structure.is_null()
            {
                info_violations.push(ValidationError {
                    context: "src_acceleration_structure".into(),
                    problem: "is `VK_NULL_HANDLE`, but `mode` is \
                        `VK_BUILD_ACCELERATION_STRUCTURE_MODE_UPDATE_KHR`"
                        .into(),
                    vuids: vuids.update_without_src,
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                });
            }

            if !dst.is_null() {
                if destinations.contains(&dst) {
                    info_violations.push(ValidationError {
                        context: "dst_acceleration_structure".into(),
                        problem: "is also the destination of an earlier element of `p_infos`"
                            .into(),
                        vuids: vuids.duplicate_dst,
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                } else {
                    destinations.push(dst);
                }
            }

            violations.append_with_context(info_violations, || format!("p_infos[{}]", index));
        }

        violations
    }

    /// Checks a build geometry info and its geometries. `primitive_counts` and `ranges` hold one
    /// element per geometry when they are known, and are empty otherwise.
    unsafe fn validate_build_geometry_info(
        &self,
        info: &vk::AccelerationStructureBuildGeometryInfoKHR<'_>,
        target: BuildTarget,
        primitive_counts: &[u32],
        ranges: &[vk::AccelerationStructureBuildRangeInfoKHR],
    ) -> Violations {
        let mut violations = Violations::new();
        let properties = &self.capabilities().properties;
        let &vk::AccelerationStructureBuildGeometryInfoKHR {
            p_next,
            ty,
            flags,
            mode,
            geometry_count,
            p_geometries,
            pp_geometries,
            scratch_data,
            ..
        } = info;

        violations.push_opt(validate_struct_type(
            "s_type",
            info,
            &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-sType-sType"],
        ));
        violations.append(self.validate_chain("p_next", p_next, &BUILD_GEOMETRY_INFO_CHAIN));
        violations.push_opt(validate_ranged_enum(
            "ty",
            ty.as_raw(),
            enum_values!(AccelerationStructureTypeKHR { TOP_LEVEL..=GENERIC }),
            &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-parameter"],
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            BUILD_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-flags-parameter"],
            &[],
        ));

        if ty == vk::AccelerationStructureTypeKHR::GENERIC {
            violations.push(ValidationError {
                context: "ty".into(),
                problem: "is `VK_ACCELERATION_STRUCTURE_TYPE_GENERIC_KHR`".into(),
                vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03654"],
                ..Default::default()
            });
        }

        if flags.contains(
            vk::BuildAccelerationStructureFlagsKHR::PREFER_FAST_TRACE
                | vk::BuildAccelerationStructureFlagsKHR::PREFER_FAST_BUILD,
        ) {
            violations.push(ValidationError {
                context: "flags".into(),
                problem: "contains both \
                    `VK_BUILD_ACCELERATION_STRUCTURE_PREFER_FAST_TRACE_BIT_KHR` and \
                    `VK_BUILD_ACCELERATION_STRUCTURE_PREFER_FAST_BUILD_BIT_KHR`"
                    .into(),
                vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-flags-03796"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        if !matches!(target, BuildTarget::SizeQuery) {
            violations.push_opt(validate_ranged_enum(
                "mode",
                mode.as_raw(),
                enum_values!(BuildAccelerationStructureModeKHR { BUILD..=UPDATE }),
                &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-mode-parameter"],
            ));
        }

        if !p_geometries.is_null() && !pp_geometries.is_null() {
            violations.push(ValidationError {
                context: "p_geometries".into(),
                problem: "is not null, but `pp_geometries` is also not null".into(),
                vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-pGeometries-03788"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        } else if geometry_count != 0 && p_geometries.is_null() && pp_geometries.is_null() {
            violations.push(ValidationError {
                context: "p_geometries".into(),
                problem: format!(
                    "is null, and `pp_geometries` is also null, but `geometry_count` is {}",
                    geometry_count,
                )
                .into(),
                vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-pGeometries-parameter"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }

        let geometries = geometries(info);

        for (index, geometry) in geometries.iter().enumerate() {
            let Some(geometry) = geometry else {
                violations.push(ValidationError {
                    context: format!("pp_geometries[{}]", index).into(),
                    problem: "is null".into(),
                    vuids: &[
                        "VUID-VkAccelerationStructureBuildGeometryInfoKHR-ppGeometries-parameter",
                    ],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                });
                continue;
            };

            violations.append_with_context(
                self.validate_geometry(geometry, target, ranges.get(index)),
                || format!("p_geometries[{}]", index),
            );
        }

        let geometry_types: SmallVec<[vk::GeometryTypeKHR; 8]> = geometries
            .iter()
            .flatten()
            .map(|geometry| geometry.geometry_type)
            .collect();

        match ty {
            vk::AccelerationStructureTypeKHR::TOP_LEVEL => {
                if geometry_count != 1 {
                    violations.push(ValidationError {
                        context: "geometry_count".into(),
                        problem: format!(
                            "is {}, but `ty` is `VK_ACCELERATION_STRUCTURE_TYPE_TOP_LEVEL_KHR`",
                            geometry_count,
                        )
                        .into(),
                        vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03790"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if let Some(index) = geometry_types
                    .iter()
                    .position(|&geometry_type| geometry_type != vk::GeometryTypeKHR::INSTANCES)
                {
                    violations.push(ValidationError {
                        context: format!("p_geometries[{}].geometry_type", index).into(),
                        problem: "is not `VK_GEOMETRY_TYPE_INSTANCES_KHR`, but `ty` is \
                            `VK_ACCELERATION_STRUCTURE_TYPE_TOP_LEVEL_KHR`"
                            .into(),
                        vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03789"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if let (Some(&instance_count), Some(max_instance_count)) =
                    (primitive_counts.first(), properties.max_instance_count)
                {
                    if u64::from(instance_count) > max_instance_count {
                        violations.push(ValidationError {
                            context: "geometry_count".into(),
                            problem: format!(
                                "describes {} instances, which is greater than the \
                                `max_instance_count` limit ({})",
                                instance_count, max_instance_count,
                            )
                            .into(),
                            vuids: &[
                                "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03801",
                            ],
                            ..Default::default()
                        });
                    }
                }
            }
            vk::AccelerationStructureTypeKHR::BOTTOM_LEVEL => {
                if let Some(index) = geometry_types
                    .iter()
                    .position(|&geometry_type| geometry_type == vk::GeometryTypeKHR::INSTANCES)
                {
                    violations.push(ValidationError {
                        context: format!("p_geometries[{}].geometry_type", index).into(),
                        problem: "is `VK_GEOMETRY_TYPE_INSTANCES_KHR`, but `ty` is \
                            `VK_ACCELERATION_STRUCTURE_TYPE_BOTTOM_LEVEL_KHR`"
                            .into(),
                        vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03791"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if let Some(index) = geometry_types
                    .iter()
                    .position(|&geometry_type| geometry_type != geometry_types[0])
                {
                    violations.push(ValidationError {
                        context: format!("p_geometries[{}].geometry_type", index).into(),
                        problem: format!(
                            "is {:?}, but `p_geometries[0].geometry_type` is {:?}",
                            geometry_types[index], geometry_types[0],
                        )
                        .into(),
                        vuids: &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03792"],
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }

                if let Some(max_geometry_count) = properties.max_geometry_count {
                    if u64::from(geometry_count) > max_geometry_count {
                        violations.push(ValidationError {
                            context: "geometry_count".into(),
                            problem: format!(
                                "is {}, which is greater than the `max_geometry_count` limit \
                                ({})",
                                geometry_count, max_geometry_count,
                            )
                            .into(),
                            vuids: &[
                                "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03793",
                            ],
                            ..Default::default()
                        });
                    }
                }

                if let Some(max_primitive_count) = properties.max_primitive_count {
                    violations.append(validate_primitive_total(
                        &geometry_types,
                        primitive_counts,
                        max_primitive_count,
                    ));
                }
            }
            _ => (),
        }

        if matches!(target, BuildTarget::Device) {
            if let Some(alignment) = properties.min_acceleration_structure_scratch_offset_alignment
            {
                let address = scratch_data.device_address;

                if !is_aligned(address, alignment.into()) {
                    violations.push(ValidationError {
                        context: "scratch_data.device_address".into(),
                        problem: format!(
                            "is {:#x}, which is not a multiple of the \
                            `min_acceleration_structure_scratch_offset_alignment` property ({})",
                            address, alignment,
                        )
                        .into(),
                        vuids: &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03710"],
                        kind: ViolationKind::Misaligned,
                        ..Default::default()
                    });
                }
            }
        }

        violations
    }

    /// Validates the arguments of `vkGetAccelerationStructureBuildSizesKHR`.
    ///
    /// # Safety
    ///
    /// `build_info` must be valid as described in the crate documentation, and
    /// `p_max_primitive_counts` must be null or valid for `build_info.geometry_count` elements.
    pub unsafe fn validate_get_acceleration_structure_build_sizes_khr(
        &self,
        build_type: vk::AccelerationStructureBuildTypeKHR,
        build_info: &vk::AccelerationStructureBuildGeometryInfoKHR<'_>,
        p_max_primitive_counts: *const u32,
        size_info: &vk::AccelerationStructureBuildSizesInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();

        if !self.capabilities().features.acceleration_structure {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "acceleration_structure",
                )])]),
                vuids: &[
                    "VUID-vkGetAccelerationStructureBuildSizesKHR-accelerationStructure-08933",
                ],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.push_opt(validate_ranged_enum(
            "build_type",
            build_type.as_raw(),
            enum_values!(AccelerationStructureBuildTypeKHR { HOST..=HOST_OR_DEVICE }),
            &["VUID-vkGetAccelerationStructureBuildSizesKHR-buildType-parameter"],
        ));
        violations.push_opt(validate_struct_type(
            "size_info.s_type",
            size_info,
            &["VUID-VkAccelerationStructureBuildSizesInfoKHR-sType-sType"],
        ));

        if build_info.geometry_count != 0 {
            violations.push_opt(validate_required_pointer(
                "p_max_primitive_counts",
                p_max_primitive_counts,
                &["VUID-vkGetAccelerationStructureBuildSizesKHR-pBuildInfo-03619"],
            ));
        }

        let primitive_counts = slice_or_empty(p_max_primitive_counts, build_info.geometry_count);
        violations.append(
            self.validate_build_geometry_info(
                build_info,
                BuildTarget::SizeQuery,
                primitive_counts,
                &[],
            )
            .add_context("build_info"),
        );

        violations
    }

    /// Validates the arguments of `vkCmdCopyAccelerationStructureKHR`.
    pub fn validate_cmd_copy_acceleration_structure_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        info: &vk::CopyAccelerationStructureInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::CopyAccelerationStructureInfoKHR {
            p_next,
            src,
            dst,
            mode,
            ..
        } = info;

        violations.push_opt(validate_struct_type(
            "info.s_type",
            info,
            &["VUID-VkCopyAccelerationStructureInfoKHR-sType-sType"],
        ));
        violations.append(validate_null_next(
            "info.p_next",
            p_next,
            &["VUID-VkCopyAccelerationStructureInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "info.src",
            src,
            &["VUID-VkCopyAccelerationStructureInfoKHR-src-parameter"],
        ));
        violations.push_opt(validate_required_handle(
            "info.dst",
            dst,
            &["VUID-VkCopyAccelerationStructureInfoKHR-dst-parameter"],
        ));
        violations.append(validate_copy_mode(
            "info.mode",
            mode,
            &[
                vk::CopyAccelerationStructureModeKHR::CLONE,
                vk::CopyAccelerationStructureModeKHR::COMPACT,
            ],
            &["VUID-VkCopyAccelerationStructureInfoKHR-mode-parameter"],
            &["VUID-VkCopyAccelerationStructureInfoKHR-mode-03410"],
        ));

        violations
    }

    /// Validates the arguments of `vkCmdCopyAccelerationStructureToMemoryKHR`.
    pub fn validate_cmd_copy_acceleration_structure_to_memory_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        info: &vk::CopyAccelerationStructureToMemoryInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::CopyAccelerationStructureToMemoryInfoKHR {
            p_next,
            src,
            dst,
            mode,
            ..
        } = info;

        violations.push_opt(validate_struct_type(
            "info.s_type",
            info,
            &["VUID-VkCopyAccelerationStructureToMemoryInfoKHR-sType-sType"],
        ));
        violations.append(validate_null_next(
            "info.p_next",
            p_next,
            &["VUID-VkCopyAccelerationStructureToMemoryInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "info.src",
            src,
            &["VUID-VkCopyAccelerationStructureToMemoryInfoKHR-src-parameter"],
        ));
        violations.append(validate_copy_mode(
            "info.mode",
            mode,
            &[vk::CopyAccelerationStructureModeKHR::SERIALIZE],
            &["VUID-VkCopyAccelerationStructureToMemoryInfoKHR-mode-parameter"],
            &["VUID-VkCopyAccelerationStructureToMemoryInfoKHR-mode-03412"],
        ));

        // SAFETY: every bit pattern is a valid device address.
        let address = unsafe { dst.device_address };

        if !is_aligned(address, SERIALIZATION_ALIGNMENT) {
            violations.push(ValidationError {
                context: "info.dst.device_address".into(),
                problem: format!("is {:#x}, which is not a multiple of 256", address).into(),
                vuids: &["VUID-vkCmdCopyAccelerationStructureToMemoryKHR-pInfo-03740"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdCopyMemoryToAccelerationStructureKHR`.
    pub fn validate_cmd_copy_memory_to_acceleration_structure_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        info: &vk::CopyMemoryToAccelerationStructureInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::CopyMemoryToAccelerationStructureInfoKHR {
            p_next,
            src,
            dst,
            mode,
            ..
        } = info;

        violations.push_opt(validate_struct_type(
            "info.s_type",
            info,
            &["VUID-VkCopyMemoryToAccelerationStructureInfoKHR-sType-sType"],
        ));
        violations.append(validate_null_next(
            "info.p_next",
            p_next,
            &["VUID-VkCopyMemoryToAccelerationStructureInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "info.dst",
            dst,
            &["VUID-VkCopyMemoryToAccelerationStructureInfoKHR-dst-parameter"],
        ));
        violations.append(validate_copy_mode(
            "info.mode",
            mode,
            &[vk::CopyAccelerationStructureModeKHR::DESERIALIZE],
            &["VUID-VkCopyMemoryToAccelerationStructureInfoKHR-mode-parameter"],
            &["VUID-VkCopyMemoryToAccelerationStructureInfoKHR-mode-03413"],
        ));

        // SAFETY: every bit pattern is a valid device address.
        let address = unsafe { src.device_address };

        if !is_aligned(address, SERIALIZATION_ALIGNMENT) {
            violations.push(ValidationError {
                context: "info.src.device_address".into(),
                problem: format!("is {:#x}, which is not a multiple of 256", address).into(),
                vuids: &["VUID-vkCmdCopyMemoryToAccelerationStructureKHR-pInfo-03743"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdWriteAccelerationStructuresPropertiesKHR`.
    pub fn validate_cmd_write_acceleration_structures_properties_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        acceleration_structure_count: u32,
        p_acceleration_structures: *const vk::AccelerationStructureKHR,
        query_type: vk::QueryType,
        query_pool: vk::QueryPool,
        _first_query: u32,
    ) -> Violations {
        let mut violations = validate_array(
            "acceleration_structure_count",
            "p_acceleration_structures",
            acceleration_structure_count,
            p_acceleration_structures,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &[
                    "VUID-vkCmdWriteAccelerationStructuresPropertiesKHR-accelerationStructureCount-arraylength",
                ],
                array_vuids: &[
                    "VUID-vkCmdWriteAccelerationStructuresPropertiesKHR-pAccelerationStructures-parameter",
                ],
            },
        );

        violations.push_opt(validate_required_handle(
            "query_pool",
            query_pool,
            &["VUID-vkCmdWriteAccelerationStructuresPropertiesKHR-queryPool-parameter"],
        ));

        if !matches!(
            query_type,
            vk::QueryType::ACCELERATION_STRUCTURE_COMPACTED_SIZE_KHR
                | vk::QueryType::ACCELERATION_STRUCTURE_SERIALIZATION_SIZE_KHR
                | vk::QueryType::ACCELERATION_STRUCTURE_SERIALIZATION_BOTTOM_LEVEL_POINTERS_KHR
                | vk::QueryType::ACCELERATION_STRUCTURE_SIZE_KHR
        ) {
            violations.push(ValidationError {
                context: "query_type".into(),
                problem: format!(
                    "is {:?}, which is not an acceleration structure query",
                    query_type,
                )
                .into(),
                vuids: &["VUID-vkCmdWriteAccelerationStructuresPropertiesKHR-queryType-06742"],
                ..Default::default()
            });
        }

        violations
    }
}

/// Returns the geometries of a build, from whichever of the two arrays is given. A null
/// element of `pp_geometries` is returned as `None`.
unsafe fn geometries<'a>(
    info: &vk::AccelerationStructureBuildGeometryInfoKHR<'a>,
) -> SmallVec<[Option<&'a vk::AccelerationStructureGeometryKHR<'a>>; 8]> {
    if !info.p_geometries.is_null() {
        slice_or_empty(info.p_geometries, info.geometry_count)
            .iter()
            .map(Some)
            .collect()
    } else {
        slice_or_empty(info.pp_geometries, info.geometry_count)
            .iter()
            .map(|&geometry| geometry.as_ref())
            .collect()
    }
}

impl StatelessValidator {
    /// Checks one geometry of a build, and its range info if it is known.
    unsafe fn validate_geometry(
        &self,
        geometry: &vk::AccelerationStructureGeometryKHR<'_>,
        target: BuildTarget,
        range: Option<&vk::AccelerationStructureBuildRangeInfoKHR>,
    ) -> Violations {
        let mut violations = Violations::new();
        let device_build = matches!(target, BuildTarget::Device);

        violations.push_opt(validate_struct_type(
            "s_type",
            geometry,
            &["VUID-VkAccelerationStructureGeometryKHR-sType-sType"],
        ));
        violations.append(validate_null_next(
            "p_next",
            geometry.p_next,
            &["VUID-VkAccelerationStructureGeometryKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_flags(
            "flags",
            geometry.flags.as_raw(),
            GEOMETRY_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkAccelerationStructureGeometryKHR-flags-parameter"],
            &[],
        ));

        let misaligned = |context: &'static str,
                          value: u64,
                          alignment: u64,
                          vuids: &'static [&'static str]| {
            (!is_aligned(value, alignment)).then(|| ValidationError {
                context: context.into(),
                problem: format!("is {:#x}, which is not a multiple of {}", value, alignment)
                    .into(),
                vuids,
                kind: ViolationKind::Misaligned,
                ..Default::default()
            })
        };

        match geometry.geometry_type {
            vk::GeometryTypeKHR::TRIANGLES => {
                let triangles = &geometry.geometry.triangles;

                violations.push_opt(validate_struct_type(
                    "geometry.triangles.s_type",
                    triangles,
                    &["VUID-VkAccelerationStructureGeometryTrianglesDataKHR-sType-sType"],
                ));
                violations.append(self.validate_chain(
                    "geometry.triangles.p_next",
                    triangles.p_next,
                    &TRIANGLES_DATA_CHAIN,
                ));
                violations.push_opt(validate_ranged_enum(
                    "geometry.triangles.vertex_format",
                    triangles.vertex_format.as_raw(),
                    FORMAT_VALUES,
                    &["VUID-VkAccelerationStructureGeometryTrianglesDataKHR-vertexFormat-parameter"],
                ));

                if triangles.vertex_stride > u64::from(u32::MAX) {
                    violations.push(ValidationError {
                        context: "geometry.triangles.vertex_stride".into(),
                        problem: format!(
                            "is {}, which is greater than 2^32 - 1",
                            triangles.vertex_stride,
                        )
                        .into(),
                        vuids: &[
                            "VUID-VkAccelerationStructureGeometryTrianglesDataKHR-vertexStride-03819",
                        ],
                        ..Default::default()
                    });
                }

                let index_size = match triangles.index_type {
                    vk::IndexType::UINT16 => Some(2),
                    vk::IndexType::UINT32 => Some(4),
                    vk::IndexType::NONE_KHR => None,
                    index_type => {
                        violations.push(ValidationError {
                            context: "geometry.triangles.index_type".into(),
                            problem: format!(
                                "is {:?}, which is not `VK_INDEX_TYPE_UINT16`, \
                                `VK_INDEX_TYPE_UINT32` or `VK_INDEX_TYPE_NONE_KHR`",
                                index_type,
                            )
                            .into(),
                            vuids: &[
                                "VUID-VkAccelerationStructureGeometryTrianglesDataKHR-indexType-03798",
                            ],
                            ..Default::default()
                        });
                        None
                    }
                };

                let transform_address = triangles.transform_data.device_address;

                if device_build {
                    if let Some(index_size) = index_size {
                        violations.push_opt(misaligned(
                            "geometry.triangles.index_data.device_address",
                            triangles.index_data.device_address,
                            index_size,
                            &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03712"],
                        ));
                    }

                    if transform_address != 0 {
                        violations.push_opt(misaligned(
                            "geometry.triangles.transform_data.device_address",
                            transform_address,
                            16,
                            &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03810"],
                        ));
                    }
                }

                if let Some(range) = range {
                    if let Some(index_size) = index_size {
                        violations.push_opt(misaligned(
                            "primitive_offset",
                            range.primitive_offset.into(),
                            index_size,
                            &["VUID-VkAccelerationStructureBuildRangeInfoKHR-primitiveOffset-03656"],
                        ));
                    }

                    if transform_address != 0 {
                        violations.push_opt(misaligned(
                            "transform_offset",
                            range.transform_offset.into(),
                            16,
                            &["VUID-VkAccelerationStructureBuildRangeInfoKHR-transformOffset-03658"],
                        ));
                    }
                }
            }
            vk::GeometryTypeKHR::AABBS => {
                let aabbs = &geometry.geometry.aabbs;

                violations.push_opt(validate_struct_type(
                    "geometry.aabbs.s_type",
                    aabbs,
                    &["VUID-VkAccelerationStructureGeometryAabbsDataKHR-sType-sType"],
                ));
                violations.push_opt(misaligned(
                    "geometry.aabbs.stride",
                    aabbs.stride,
                    8,
                    &["VUID-VkAccelerationStructureGeometryAabbsDataKHR-stride-03545"],
                ));

                if aabbs.stride > u64::from(u32::MAX) {
                    violations.push(ValidationError {
                        context: "geometry.aabbs.stride".into(),
                        problem: format!("is {}, which is greater than 2^32 - 1", aabbs.stride)
                            .into(),
                        vuids: &["VUID-VkAccelerationStructureGeometryAabbsDataKHR-stride-03820"],
                        ..Default::default()
                    });
                }

                if device_build {
                    violations.push_opt(misaligned(
                        "geometry.aabbs.data.device_address",
                        aabbs.data.device_address,
                        8,
                        &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03714"],
                    ));
                }

                if let Some(range) = range {
                    violations.push_opt(misaligned(
                        "primitive_offset",
                        range.primitive_offset.into(),
                        8,
                        &["VUID-VkAccelerationStructureBuildRangeInfoKHR-primitiveOffset-03659"],
                    ));
                }
            }
            vk::GeometryTypeKHR::INSTANCES => {
                let instances = &geometry.geometry.instances;

                violations.push_opt(validate_struct_type(
                    "geometry.instances.s_type",
                    instances,
                    &["VUID-VkAccelerationStructureGeometryInstancesDataKHR-sType-sType"],
                ));

                if device_build {
                    let (alignment, vuids): (u64, &'static [&'static str]) =
                        if instances.array_of_pointers != vk::FALSE {
                            (8, &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03716"])
                        } else {
                            (16, &["VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03715"])
                        };
                    violations.push_opt(misaligned(
                        "geometry.instances.data.device_address",
                        instances.data.device_address,
                        alignment,
                        vuids,
                    ));
                }

                if let Some(range) = range {
                    violations.push_opt(misaligned(
                        "primitive_offset",
                        range.primitive_offset.into(),
                        16,
                        &["VUID-VkAccelerationStructureBuildRangeInfoKHR-primitiveOffset-03660"],
                    ));
                }
            }
            geometry_type => violations.push(ValidationError {
                context: "geometry_type".into(),
                problem: format!("is not a valid enum value ({})", geometry_type.as_raw()).into(),
                vuids: &["VUID-VkAccelerationStructureGeometryKHR-geometryType-parameter"],
                ..Default::default()
            }),
        }

        violations
    }
}

/// Checks the total number of triangles and of AABBs of a bottom-level build.
fn validate_primitive_total(
    geometry_types: &[vk::GeometryTypeKHR],
    primitive_counts: &[u32],
    max_primitive_count: u64,
) -> Violations {
    let mut violations = Violations::new();

    for (geometry_type, name, vuids) in [
        (
            vk::GeometryTypeKHR::TRIANGLES,
            "triangles",
            &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03795"]
                as &'static [&'static str],
        ),
        (
            vk::GeometryTypeKHR::AABBS,
            "AABBs",
            &["VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03794"],
        ),
    ] {
        let total: u64 = geometry_types
            .iter()
            .zip(primitive_counts)
            .filter(|&(&ty, _)| ty == geometry_type)
            .map(|(_, &count)| u64::from(count))
            .sum();

        if total > max_primitive_count {
            violations.push(ValidationError {
                context: "geometry_count".into(),
                problem: format!(
                    "describes {} {} in total, which is greater than the \
                    `max_primitive_count` limit ({})",
                    total, name, max_primitive_count,
                )
                .into(),
                vuids,
                ..Default::default()
            });
        }
    }

    violations
}

fn validate_copy_mode(
    context: &'static str,
    mode: vk::CopyAccelerationStructureModeKHR,
    accepted: &[vk::CopyAccelerationStructureModeKHR],
    vuids_parameter: &'static [&'static str],
    vuids_accepted: &'static [&'static str],
) -> Violations {
    let mut violations = Violations::new();

    if let Some(error) = validate_ranged_enum(
        context,
        mode.as_raw(),
        enum_values!(CopyAccelerationStructureModeKHR { CLONE..=DESERIALIZE }),
        vuids_parameter,
    ) {
        violations.push(error);
    } else if !accepted.contains(&mode) {
        violations.push(ValidationError {
            context: context.into(),
            problem: format!("is {:?}, which this copy does not accept", mode).into(),
            vuids: vuids_accepted,
            ..Default::default()
        });
    }

    violations
}

fn validate_null_next(
    context: &'static str,
    p_next: *const c_void,
    vuids: &'static [&'static str],
) -> Violations {
    let mut violations = Violations::new();

    if !p_next.is_null() {
        violations.push(ValidationError {
            context: context.into(),
            problem: "is not null".into(),
            vuids,
            kind: ViolationKind::ChainStructure,
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::{test_capabilities, test_validator, test_validator_with};
    use ash::vk::{self, Handle};
    use std::ptr;

    fn triangles(index_address: u64) -> vk::AccelerationStructureGeometryKHR<'static> {
        vk::AccelerationStructureGeometryKHR::default()
            .geometry_type(vk::GeometryTypeKHR::TRIANGLES)
            .geometry(vk::AccelerationStructureGeometryDataKHR {
                triangles: vk::AccelerationStructureGeometryTrianglesDataKHR::default()
                    .vertex_format(vk::Format::R32G32B32_SFLOAT)
                    .vertex_data(vk::DeviceOrHostAddressConstKHR {
                        device_address: 0x10000,
                    })
                    .vertex_stride(12)
                    .max_vertex(3)
                    .index_type(vk::IndexType::UINT32)
                    .index_data(vk::DeviceOrHostAddressConstKHR {
                        device_address: index_address,
                    }),
            })
    }

    fn instances() -> vk::AccelerationStructureGeometryKHR<'static> {
        vk::AccelerationStructureGeometryKHR::default()
            .geometry_type(vk::GeometryTypeKHR::INSTANCES)
            .geometry(vk::AccelerationStructureGeometryDataKHR {
                instances: vk::AccelerationStructureGeometryInstancesDataKHR::default().data(
                    vk::DeviceOrHostAddressConstKHR {
                        device_address: 0x20000,
                    },
                ),
            })
    }

    fn build_info<'a>(
        ty: vk::AccelerationStructureTypeKHR,
        geometries: &'a [vk::AccelerationStructureGeometryKHR<'a>],
    ) -> vk::AccelerationStructureBuildGeometryInfoKHR<'a> {
        vk::AccelerationStructureBuildGeometryInfoKHR::default()
            .ty(ty)
            .mode(vk::BuildAccelerationStructureModeKHR::BUILD)
            .dst_acceleration_structure(vk::AccelerationStructureKHR::from_raw(0x80))
            .scratch_data(vk::DeviceOrHostAddressKHR {
                device_address: 0x40000,
            })
            .geometries(geometries)
    }

    fn range(primitive_count: u32) -> vk::AccelerationStructureBuildRangeInfoKHR {
        vk::AccelerationStructureBuildRangeInfoKHR {
            primitive_count,
            primitive_offset: 0,
            first_vertex: 0,
            transform_offset: 0,
        }
    }

    #[test]
    fn create_acceleration_structure() {
        let validator = test_validator();
        let create_info = vk::AccelerationStructureCreateInfoKHR::default()
            .buffer(vk::Buffer::from_raw(0x81))
            .offset(100)
            .size(4096)
            .ty(vk::AccelerationStructureTypeKHR::BOTTOM_LEVEL)
            .device_address(0x1000);

        let violations =
            unsafe { validator.validate_create_acceleration_structure_khr(&create_info) };
        assert_vuid!(violations, "VUID-VkAccelerationStructureCreateInfoKHR-offset-03734");
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureCreateInfoKHR-deviceAddress-03612",
        );
        assert_eq!(violations.len(), 2, "{}", violations);
    }

    #[test]
    fn both_geometry_arrays() {
        let validator = test_validator();
        let geometries = [triangles(0x30000)];
        let geometry_pointers = [ptr::from_ref(&geometries[0])];
        let mut info = build_info(vk::AccelerationStructureTypeKHR::BOTTOM_LEVEL, &geometries);
        info.pp_geometries = geometry_pointers.as_ptr();
        let ranges = [range(1)];
        let range_pointers = [ranges.as_ptr()];

        let violations = unsafe {
            validator.validate_cmd_build_acceleration_structures_khr(
                vk::CommandBuffer::null(),
                1,
                &info,
                range_pointers.as_ptr(),
            )
        };
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-pGeometries-03788",
        );
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(violations[0].context, "p_infos[0].p_geometries");

        info.p_geometries = ptr::null();
        let violations = unsafe {
            validator.validate_cmd_build_acceleration_structures_khr(
                vk::CommandBuffer::null(),
                1,
                &info,
                range_pointers.as_ptr(),
            )
        };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn level_geometry_types() {
        let validator = test_validator();
        let geometries = [instances(), triangles(0x30000)];
        let info = build_info(vk::AccelerationStructureTypeKHR::TOP_LEVEL, &geometries);
        let ranges = [range(4), range(1)];
        let range_pointers = [ranges.as_ptr()];

        let violations = unsafe {
            validator.validate_cmd_build_acceleration_structures_khr(
                vk::CommandBuffer::null(),
                1,
                &info,
                range_pointers.as_ptr(),
            )
        };
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03790",
        );
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03789",
        );
        assert_eq!(violations.len(), 2, "{}", violations);

        let geometries = [triangles(0x30000), instances()];
        let info = build_info(vk::AccelerationStructureTypeKHR::BOTTOM_LEVEL, &geometries);
        let violations = unsafe {
            validator.validate_cmd_build_acceleration_structures_khr(
                vk::CommandBuffer::null(),
                1,
                &info,
                range_pointers.as_ptr(),
            )
        };
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03791",
        );
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03792",
        );
    }

    #[test]
    fn alignments_and_limits() {
        let mut capabilities = test_capabilities();
        capabilities.properties.max_primitive_count = Some(10);
        let validator = test_validator_with(capabilities);
        let geometries = [triangles(0x30002), triangles(0x30000)];
        let mut info = build_info(vk::AccelerationStructureTypeKHR::BOTTOM_LEVEL, &geometries);
        info.scratch_data.device_address = 0x40040;
        info.flags = vk::BuildAccelerationStructureFlagsKHR::PREFER_FAST_TRACE
            | vk::BuildAccelerationStructureFlagsKHR::PREFER_FAST_BUILD;
        let ranges = [range(6), range(6)];
        let range_pointers = [ranges.as_ptr()];

        let violations = unsafe {
            validator.validate_cmd_build_acceleration_structures_khr(
                vk::CommandBuffer::null(),
                1,
                &info,
                range_pointers.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03712");
        assert_vuid!(violations, "VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03710");
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03795",
        );
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-flags-03796",
        );
        assert_eq!(violations.len(), 4, "{}", violations);

        // Host builds take host pointers, which have no alignment rules.
        let violations = unsafe {
            validator.validate_build_acceleration_structures_khr(
                vk::DeferredOperationKHR::null(),
                1,
                &info,
                range_pointers.as_ptr(),
            )
        };
        assert_no_vuid!(violations, "VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-03712");
        assert_eq!(violations.len(), 2, "{}", violations);
    }

    #[test]
    fn duplicate_destinations_and_updates() {
        let validator = test_validator();
        let geometries = [triangles(0x30000)];
        let mut infos = [
            build_info(vk::AccelerationStructureTypeKHR::BOTTOM_LEVEL, &geometries),
            build_info(vk::AccelerationStructureTypeKHR::BOTTOM_LEVEL, &geometries),
        ];
        infos[1].mode = vk::BuildAccelerationStructureModeKHR::UPDATE;
        let ranges = [range(1)];
        let range_pointers = [ranges.as_ptr(), ranges.as_ptr()];

        let violations = unsafe {
            validator.validate_cmd_build_acceleration_structures_khr(
                vk::CommandBuffer::null(),
                2,
                infos.as_ptr(),
                range_pointers.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdBuildAccelerationStructuresKHR-pInfos-04630");
        assert_vuid!(
            violations,
            "VUID-vkCmdBuildAccelerationStructuresKHR-dstAccelerationStructure-03698",
        );
        assert_eq!(violations.len(), 2, "{}", violations);
        assert_eq!(violations[0].context, "p_infos[1].src_acceleration_structure");
    }

    #[test]
    fn build_sizes() {
        let validator = test_validator();
        let geometries = [instances()];
        let info = build_info(vk::AccelerationStructureTypeKHR::TOP_LEVEL, &geometries);
        let size_info = vk::AccelerationStructureBuildSizesInfoKHR::default();

        let violations = unsafe {
            validator.validate_get_acceleration_structure_build_sizes_khr(
                vk::AccelerationStructureBuildTypeKHR::DEVICE,
                &info,
                ptr::null(),
                &size_info,
            )
        };
        assert_vuid!(
            violations,
            "VUID-vkGetAccelerationStructureBuildSizesKHR-pBuildInfo-03619",
        );
        assert_eq!(violations.len(), 1, "{}", violations);

        let max_primitive_counts = [u32::MAX];
        let violations = unsafe {
            validator.validate_get_acceleration_structure_build_sizes_khr(
                vk::AccelerationStructureBuildTypeKHR::DEVICE,
                &info,
                max_primitive_counts.as_ptr(),
                &size_info,
            )
        };
        assert_vuid!(
            violations,
            "VUID-VkAccelerationStructureBuildGeometryInfoKHR-type-03801",
        );
        assert_eq!(violations[0].context, "build_info.geometry_count");
    }

    #[test]
    fn copies() {
        let validator = test_validator();

        let info = vk::CopyAccelerationStructureInfoKHR::default()
            .src(vk::AccelerationStructureKHR::from_raw(0x82))
            .dst(vk::AccelerationStructureKHR::from_raw(0x83))
            .mode(vk::CopyAccelerationStructureModeKHR::SERIALIZE);
        let violations = validator
            .validate_cmd_copy_acceleration_structure_khr(vk::CommandBuffer::null(), &info);
        assert_vuid!(violations, "VUID-VkCopyAccelerationStructureInfoKHR-mode-03410");
        assert_eq!(violations.len(), 1, "{}", violations);

        let info = vk::CopyAccelerationStructureToMemoryInfoKHR::default()
            .src(vk::AccelerationStructureKHR::from_raw(0x82))
            .dst(vk::DeviceOrHostAddressKHR {
                device_address: 0x10080,
            })
            .mode(vk::CopyAccelerationStructureModeKHR::SERIALIZE);
        let violations = validator.validate_cmd_copy_acceleration_structure_to_memory_khr(
            vk::CommandBuffer::null(),
            &info,
        );
        assert_vuid!(
            violations,
            "VUID-vkCmdCopyAccelerationStructureToMemoryKHR-pInfo-03740",
        );
        assert_eq!(violations.len(), 1, "{}", violations);

        let structures = [vk::AccelerationStructureKHR::from_raw(0x82)];
        let violations = validator.validate_cmd_write_acceleration_structures_properties_khr(
            vk::CommandBuffer::null(),
            1,
            structures.as_ptr(),
            vk::QueryType::OCCLUSION,
            vk::QueryPool::from_raw(0x84),
            0,
        );
        assert_vuid!(
            violations,
            "VUID-vkCmdWriteAccelerationStructuresPropertiesKHR-queryType-06742",
        );
        assert_eq!(violations.len(), 1, "{}", violations);
    }
}
