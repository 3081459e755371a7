// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Rules for semaphores, fences, events, external synchronization handles, and pipeline
//! barriers.

use crate::{
    chain::{find_in_chain, AllowedStruct, ChainRules},
    image::{validate_subresource_range, IMAGE_LAYOUT_VALUES},
    predicates::{
        slice_or_empty, validate_array, validate_flags, validate_ranged_enum,
        validate_required_handle, validate_struct_type, validate_struct_type_array, ArrayRules,
        FlagPolicy,
    },
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, SupportsRequirements,
    ValidationError, Version, ViolationKind, Violations,
};
use ash::vk;

/// Every stage that a `VkPipelineStageFlags` value may contain.
pub(crate) const PIPELINE_STAGES: vk::PipelineStageFlags = flags_mask!(PipelineStageFlags {
    TOP_OF_PIPE,
    DRAW_INDIRECT,
    VERTEX_INPUT,
    VERTEX_SHADER,
    TESSELLATION_CONTROL_SHADER,
    TESSELLATION_EVALUATION_SHADER,
    GEOMETRY_SHADER,
    FRAGMENT_SHADER,
    EARLY_FRAGMENT_TESTS,
    LATE_FRAGMENT_TESTS,
    COLOR_ATTACHMENT_OUTPUT,
    COMPUTE_SHADER,
    TRANSFER,
    BOTTOM_OF_PIPE,
    HOST,
    ALL_GRAPHICS,
    ALL_COMMANDS,
    TRANSFORM_FEEDBACK_EXT,
    CONDITIONAL_RENDERING_EXT,
    ACCELERATION_STRUCTURE_BUILD_KHR,
    RAY_TRACING_SHADER_KHR,
    FRAGMENT_DENSITY_PROCESS_EXT,
    FRAGMENT_SHADING_RATE_ATTACHMENT_KHR,
    TASK_SHADER_EXT,
    MESH_SHADER_EXT,
});

/// Every access type that a `VkAccessFlags` value may contain.
pub(crate) const ACCESS_FLAGS: vk::AccessFlags = flags_mask!(AccessFlags {
    INDIRECT_COMMAND_READ,
    INDEX_READ,
    VERTEX_ATTRIBUTE_READ,
    UNIFORM_READ,
    INPUT_ATTACHMENT_READ,
    SHADER_READ,
    SHADER_WRITE,
    COLOR_ATTACHMENT_READ,
    COLOR_ATTACHMENT_WRITE,
    DEPTH_STENCIL_ATTACHMENT_READ,
    DEPTH_STENCIL_ATTACHMENT_WRITE,
    TRANSFER_READ,
    TRANSFER_WRITE,
    HOST_READ,
    HOST_WRITE,
    MEMORY_READ,
    MEMORY_WRITE,
    TRANSFORM_FEEDBACK_WRITE_EXT,
    TRANSFORM_FEEDBACK_COUNTER_READ_EXT,
    TRANSFORM_FEEDBACK_COUNTER_WRITE_EXT,
    CONDITIONAL_RENDERING_READ_EXT,
    COLOR_ATTACHMENT_READ_NONCOHERENT_EXT,
    ACCELERATION_STRUCTURE_READ_KHR,
    ACCELERATION_STRUCTURE_WRITE_KHR,
    FRAGMENT_DENSITY_MAP_READ_EXT,
    FRAGMENT_SHADING_RATE_ATTACHMENT_READ_KHR,
});

pub(crate) const DEPENDENCY_FLAGS: vk::DependencyFlags =
    flags_mask!(DependencyFlags { BY_REGION, DEVICE_GROUP, VIEW_LOCAL });

const PIPELINE_STAGES_2: vk::PipelineStageFlags2 = flags_mask!(PipelineStageFlags2 {
    TOP_OF_PIPE,
    DRAW_INDIRECT,
    VERTEX_INPUT,
    VERTEX_SHADER,
    TESSELLATION_CONTROL_SHADER,
    TESSELLATION_EVALUATION_SHADER,
    GEOMETRY_SHADER,
    FRAGMENT_SHADER,
    EARLY_FRAGMENT_TESTS,
    LATE_FRAGMENT_TESTS,
    COLOR_ATTACHMENT_OUTPUT,
    COMPUTE_SHADER,
    ALL_TRANSFER,
    BOTTOM_OF_PIPE,
    HOST,
    ALL_GRAPHICS,
    ALL_COMMANDS,
    COPY,
    RESOLVE,
    BLIT,
    CLEAR,
    INDEX_INPUT,
    VERTEX_ATTRIBUTE_INPUT,
    PRE_RASTERIZATION_SHADERS,
    ACCELERATION_STRUCTURE_BUILD_KHR,
    ACCELERATION_STRUCTURE_COPY_KHR,
    RAY_TRACING_SHADER_KHR,
    TASK_SHADER_EXT,
    MESH_SHADER_EXT,
});

const ACCESS_FLAGS_2: vk::AccessFlags2 = flags_mask!(AccessFlags2 {
    INDIRECT_COMMAND_READ,
    INDEX_READ,
    VERTEX_ATTRIBUTE_READ,
    UNIFORM_READ,
    INPUT_ATTACHMENT_READ,
    SHADER_READ,
    SHADER_WRITE,
    COLOR_ATTACHMENT_READ,
    COLOR_ATTACHMENT_WRITE,
    DEPTH_STENCIL_ATTACHMENT_READ,
    DEPTH_STENCIL_ATTACHMENT_WRITE,
    TRANSFER_READ,
    TRANSFER_WRITE,
    HOST_READ,
    HOST_WRITE,
    MEMORY_READ,
    MEMORY_WRITE,
    SHADER_SAMPLED_READ,
    SHADER_STORAGE_READ,
    SHADER_STORAGE_WRITE,
    ACCELERATION_STRUCTURE_READ_KHR,
    ACCELERATION_STRUCTURE_WRITE_KHR,
    SHADER_BINDING_TABLE_READ_KHR,
});

const EXTERNAL_SEMAPHORE_HANDLE_TYPES: vk::ExternalSemaphoreHandleTypeFlags =
    flags_mask!(ExternalSemaphoreHandleTypeFlags {
        OPAQUE_FD,
        OPAQUE_WIN32,
        OPAQUE_WIN32_KMT,
        D3D12_FENCE,
        SYNC_FD,
        ZIRCON_EVENT_FUCHSIA,
    });

const EXTERNAL_FENCE_HANDLE_TYPES: vk::ExternalFenceHandleTypeFlags =
    flags_mask!(ExternalFenceHandleTypeFlags {
        OPAQUE_FD,
        OPAQUE_WIN32,
        OPAQUE_WIN32_KMT,
        SYNC_FD,
    });

const SEMAPHORE_FD_HANDLE_TYPES: vk::ExternalSemaphoreHandleTypeFlags =
    flags_mask!(ExternalSemaphoreHandleTypeFlags { OPAQUE_FD, SYNC_FD });

const SEMAPHORE_WIN32_HANDLE_TYPES: vk::ExternalSemaphoreHandleTypeFlags =
    flags_mask!(ExternalSemaphoreHandleTypeFlags {
        OPAQUE_WIN32,
        OPAQUE_WIN32_KMT,
        D3D12_FENCE,
    });

/// The Win32 semaphore handle types that can be imported by name.
const SEMAPHORE_NAMED_HANDLE_TYPES: vk::ExternalSemaphoreHandleTypeFlags =
    flags_mask!(ExternalSemaphoreHandleTypeFlags { OPAQUE_WIN32, D3D12_FENCE });

const FENCE_FD_HANDLE_TYPES: vk::ExternalFenceHandleTypeFlags =
    flags_mask!(ExternalFenceHandleTypeFlags { OPAQUE_FD, SYNC_FD });

const FENCE_WIN32_HANDLE_TYPES: vk::ExternalFenceHandleTypeFlags =
    flags_mask!(ExternalFenceHandleTypeFlags {
        OPAQUE_WIN32,
        OPAQUE_WIN32_KMT,
    });

const SEMAPHORE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::SemaphoreTypeCreateInfo<'static>>().requires(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]),
            RequiresAllOf(&[Requires::DeviceExtension("khr_timeline_semaphore")]),
        ])),
        AllowedStruct::of::<vk::ExportSemaphoreCreateInfo<'static>>().requires(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_semaphore")]),
        ])),
        AllowedStruct::tag(vk::StructureType::EXPORT_SEMAPHORE_WIN32_HANDLE_INFO_KHR).requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "khr_external_semaphore_win32",
            )])]),
        ),
        AllowedStruct::tag(vk::StructureType::EXPORT_METAL_OBJECT_CREATE_INFO_EXT).repeatable(),
        AllowedStruct::tag(vk::StructureType::IMPORT_METAL_SHARED_EVENT_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkSemaphoreCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkSemaphoreCreateInfo-sType-unique"],
};

const FENCE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::ExportFenceCreateInfo<'static>>().requires(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
            RequiresAllOf(&[Requires::DeviceExtension("khr_external_fence")]),
        ])),
        AllowedStruct::tag(vk::StructureType::EXPORT_FENCE_WIN32_HANDLE_INFO_KHR).requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "khr_external_fence_win32",
            )])]),
        ),
    ],
    unique: true,
    vuids_next: &["VUID-VkFenceCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkFenceCreateInfo-sType-unique"],
};

const EVENT_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::tag(vk::StructureType::EXPORT_METAL_OBJECT_CREATE_INFO_EXT).repeatable(),
        AllowedStruct::tag(vk::StructureType::IMPORT_METAL_SHARED_EVENT_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkEventCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkEventCreateInfo-sType-unique"],
};

const BARRIER_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::tag(
        vk::StructureType::EXTERNAL_MEMORY_ACQUIRE_UNMODIFIED_EXT,
    )],
    unique: true,
    vuids_next: &["VUID-VkBufferMemoryBarrier-pNext-pNext"],
    vuids_unique: &["VUID-VkBufferMemoryBarrier-sType-unique"],
};

const IMAGE_BARRIER_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::tag(vk::StructureType::SAMPLE_LOCATIONS_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::EXTERNAL_MEMORY_ACQUIRE_UNMODIFIED_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkImageMemoryBarrier-pNext-pNext"],
    vuids_unique: &["VUID-VkImageMemoryBarrier-sType-unique"],
};

const NO_CHAIN_MEMORY_BARRIER: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkMemoryBarrier-pNext-pNext"],
    vuids_unique: &[],
};

const BARRIER2_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::tag(
        vk::StructureType::EXTERNAL_MEMORY_ACQUIRE_UNMODIFIED_EXT,
    )],
    unique: true,
    vuids_next: &["VUID-VkBufferMemoryBarrier2-pNext-pNext"],
    vuids_unique: &["VUID-VkBufferMemoryBarrier2-sType-unique"],
};

const IMAGE_BARRIER2_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::tag(vk::StructureType::SAMPLE_LOCATIONS_INFO_EXT),
        AllowedStruct::tag(vk::StructureType::EXTERNAL_MEMORY_ACQUIRE_UNMODIFIED_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkImageMemoryBarrier2-pNext-pNext"],
    vuids_unique: &["VUID-VkImageMemoryBarrier2-sType-unique"],
};

const NO_CHAIN_MEMORY_BARRIER2: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkMemoryBarrier2-pNext-pNext"],
    vuids_unique: &[],
};

const NO_CHAIN_DEPENDENCY_INFO: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkDependencyInfo-pNext-pNext"],
    vuids_unique: &[],
};

/// A pipeline stage that is only legal when a device feature is enabled.
struct StageFeatureRule {
    stages: u64,
    requires_one_of: RequiresOneOf,
    src_vuids: &'static [&'static str],
    dst_vuids: &'static [&'static str],
}

/// An access type, and the stages that must accompany it in the same scope.
struct AccessStageRule {
    access: vk::AccessFlags2,
    stages: vk::PipelineStageFlags2,
    vuids_src: &'static [&'static str],
    vuids_dst: &'static [&'static str],
}

macro_rules! stage_feature_rules {
    (
        $structure:literal, $src:literal, $dst:literal,
        [$geometry:literal, $tessellation:literal, $task:literal, $mesh:literal]
    ) => {
        &[
            StageFeatureRule {
                stages: vk::PipelineStageFlags2::GEOMETRY_SHADER.as_raw(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "geometry_shader",
                )])]),
                src_vuids: &[concat!("VUID-", $structure, "-", $src, "-", $geometry)],
                dst_vuids: &[concat!("VUID-", $structure, "-", $dst, "-", $geometry)],
            },
            StageFeatureRule {
                stages: vk::PipelineStageFlags2::TESSELLATION_CONTROL_SHADER.as_raw()
                    | vk::PipelineStageFlags2::TESSELLATION_EVALUATION_SHADER.as_raw(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "tessellation_shader",
                )])]),
                src_vuids: &[concat!("VUID-", $structure, "-", $src, "-", $tessellation)],
                dst_vuids: &[concat!("VUID-", $structure, "-", $dst, "-", $tessellation)],
            },
            StageFeatureRule {
                stages: vk::PipelineStageFlags2::TASK_SHADER_EXT.as_raw(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "task_shader",
                )])]),
                src_vuids: &[concat!("VUID-", $structure, "-", $src, "-", $task)],
                dst_vuids: &[concat!("VUID-", $structure, "-", $dst, "-", $task)],
            },
            StageFeatureRule {
                stages: vk::PipelineStageFlags2::MESH_SHADER_EXT.as_raw(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "mesh_shader",
                )])]),
                src_vuids: &[concat!("VUID-", $structure, "-", $src, "-", $mesh)],
                dst_vuids: &[concat!("VUID-", $structure, "-", $dst, "-", $mesh)],
            },
        ]
    };
}

macro_rules! access_stage_rule {
    ($structure:literal, $access:ident, [$($stage:ident),+], $number:literal) => {
        AccessStageRule {
            access: vk::AccessFlags2::$access,
            stages: flags_mask!(PipelineStageFlags2 { ALL_COMMANDS, $($stage),+ }),
            vuids_src: &[concat!("VUID-", $structure, "-srcAccessMask-", $number)],
            vuids_dst: &[concat!("VUID-", $structure, "-dstAccessMask-", $number)],
        }
    };
}

/// The VUIDs of one of the three synchronization2 barrier structures.
struct Barrier2Vuids {
    s_type: &'static [&'static str],
    src_stage_mask: &'static [&'static str],
    dst_stage_mask: &'static [&'static str],
    src_access_mask: &'static [&'static str],
    dst_access_mask: &'static [&'static str],
    stage_features: &'static [StageFeatureRule],
    access_stages: &'static [AccessStageRule],
}

macro_rules! barrier2_vuids {
    ($structure:literal) => {
        Barrier2Vuids {
            s_type: &[concat!("VUID-", $structure, "-sType-sType")],
            src_stage_mask: &[concat!("VUID-", $structure, "-srcStageMask-parameter")],
            dst_stage_mask: &[concat!("VUID-", $structure, "-dstStageMask-parameter")],
            src_access_mask: &[concat!("VUID-", $structure, "-srcAccessMask-parameter")],
            dst_access_mask: &[concat!("VUID-", $structure, "-dstAccessMask-parameter")],
            stage_features: stage_feature_rules!(
                $structure,
                "srcStageMask",
                "dstStageMask",
                ["03929", "03930", "03935", "03934"]
            ),
            access_stages: &[
                access_stage_rule!(
                    $structure,
                    INDIRECT_COMMAND_READ,
                    [DRAW_INDIRECT, ALL_GRAPHICS, ACCELERATION_STRUCTURE_BUILD_KHR],
                    "03900"
                ),
                access_stage_rule!(
                    $structure,
                    INDEX_READ,
                    [VERTEX_INPUT, INDEX_INPUT, ALL_GRAPHICS],
                    "03901"
                ),
                access_stage_rule!(
                    $structure,
                    VERTEX_ATTRIBUTE_READ,
                    [VERTEX_INPUT, VERTEX_ATTRIBUTE_INPUT, ALL_GRAPHICS],
                    "03902"
                ),
                access_stage_rule!(
                    $structure,
                    TRANSFER_READ,
                    [
                        ALL_TRANSFER,
                        COPY,
                        BLIT,
                        RESOLVE,
                        ALL_GRAPHICS,
                        ACCELERATION_STRUCTURE_BUILD_KHR,
                        ACCELERATION_STRUCTURE_COPY_KHR
                    ],
                    "03914"
                ),
                access_stage_rule!(
                    $structure,
                    TRANSFER_WRITE,
                    [
                        ALL_TRANSFER,
                        COPY,
                        BLIT,
                        RESOLVE,
                        CLEAR,
                        ALL_GRAPHICS,
                        ACCELERATION_STRUCTURE_BUILD_KHR,
                        ACCELERATION_STRUCTURE_COPY_KHR
                    ],
                    "03915"
                ),
                access_stage_rule!($structure, HOST_READ, [HOST], "03916"),
                access_stage_rule!($structure, HOST_WRITE, [HOST], "03917"),
            ],
        }
    };
}

const MEMORY_BARRIER2_VUIDS: Barrier2Vuids = barrier2_vuids!("VkMemoryBarrier2");
const BUFFER_MEMORY_BARRIER2_VUIDS: Barrier2Vuids = barrier2_vuids!("VkBufferMemoryBarrier2");
const IMAGE_MEMORY_BARRIER2_VUIDS: Barrier2Vuids = barrier2_vuids!("VkImageMemoryBarrier2");

const PIPELINE_BARRIER_STAGE_FEATURES: &[StageFeatureRule] = stage_feature_rules!(
    "vkCmdPipelineBarrier",
    "srcStageMask",
    "dstStageMask",
    ["04090", "04091", "04096", "04095"]
);

impl StatelessValidator {
    /// Validates the arguments of `vkCreateSemaphore`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_semaphore(
        &self,
        create_info: &vk::SemaphoreCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::SemaphoreCreateInfo { p_next, flags, .. } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkSemaphoreCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &SEMAPHORE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkSemaphoreCreateInfo-flags-zerobitmask"],
            &[],
        ));

        if let Some(type_info) = find_in_chain::<vk::SemaphoreTypeCreateInfo<'_>>(p_next)
        {
            let &vk::SemaphoreTypeCreateInfo {
                semaphore_type,
                initial_value,
                ..
            } = type_info;

            violations.push_opt(validate_ranged_enum(
                "create_info.p_next.semaphore_type",
                semaphore_type.as_raw(),
                enum_values!(SemaphoreType { BINARY..=TIMELINE }),
                &["VUID-VkSemaphoreTypeCreateInfo-semaphoreType-parameter"],
            ));

            if semaphore_type == vk::SemaphoreType::TIMELINE
                && !self.capabilities().features.timeline_semaphore
            {
                violations.push(ValidationError {
                    context: "create_info.p_next.semaphore_type".into(),
                    problem: "is `VK_SEMAPHORE_TYPE_TIMELINE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceFeature("timeline_semaphore"),
                    ])]),
                    vuids: &["VUID-VkSemaphoreTypeCreateInfo-timelineSemaphore-03252"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if semaphore_type == vk::SemaphoreType::BINARY && initial_value != 0 {
                violations.push(ValidationError {
                    context: "create_info.p_next.initial_value".into(),
                    problem: format!(
                        "is {}, but `semaphore_type` is `VK_SEMAPHORE_TYPE_BINARY`",
                        initial_value,
                    )
                    .into(),
                    vuids: &["VUID-VkSemaphoreTypeCreateInfo-semaphoreType-03279"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        if let Some(export_info) =
            find_in_chain::<vk::ExportSemaphoreCreateInfo<'_>>(p_next)
        {
            violations.push_opt(validate_flags(
                "create_info.p_next.handle_types",
                export_info.handle_types.as_raw(),
                EXTERNAL_SEMAPHORE_HANDLE_TYPES.as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkExportSemaphoreCreateInfo-handleTypes-parameter"],
                &[],
            ));
        }

        violations
    }

    /// Validates the arguments of `vkCreateFence`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_fence(&self, create_info: &vk::FenceCreateInfo<'_>) -> Violations {
        let mut violations = Violations::new();
        let &vk::FenceCreateInfo { p_next, flags, .. } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkFenceCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &FENCE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            vk::FenceCreateFlags::SIGNALED.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkFenceCreateInfo-flags-parameter"],
            &[],
        ));

        if let Some(export_info) =
            find_in_chain::<vk::ExportFenceCreateInfo<'_>>(p_next)
        {
            violations.push_opt(validate_flags(
                "create_info.p_next.handle_types",
                export_info.handle_types.as_raw(),
                EXTERNAL_FENCE_HANDLE_TYPES.as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkExportFenceCreateInfo-handleTypes-parameter"],
                &[],
            ));
        }

        violations
    }

    /// Validates the arguments of `vkCreateEvent`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_event(&self, create_info: &vk::EventCreateInfo<'_>) -> Violations {
        let mut violations = Violations::new();
        let &vk::EventCreateInfo { p_next, flags, .. } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkEventCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &EVENT_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            vk::EventCreateFlags::DEVICE_ONLY.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkEventCreateInfo-flags-parameter"],
            &[],
        ));

        let synchronization2 = RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
            RequiresAllOf(&[Requires::DeviceExtension("khr_synchronization2")]),
        ]);

        if flags.contains(vk::EventCreateFlags::DEVICE_ONLY)
            && !self.capabilities().satisfies(synchronization2)
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_EVENT_CREATE_DEVICE_ONLY_BIT`".into(),
                requires_one_of: synchronization2,
                vuids: &["VUID-VkEventCreateInfo-flags-parameter"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations
    }

    /// Validates the arguments of `vkGetSemaphoreFdKHR`.
    pub fn validate_get_semaphore_fd_khr(
        &self,
        get_fd_info: &vk::SemaphoreGetFdInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::SemaphoreGetFdInfoKHR {
            p_next,
            semaphore,
            handle_type,
            ..
        } = get_fd_info;

        violations.push_opt(validate_struct_type(
            "get_fd_info.s_type",
            get_fd_info,
            &["VUID-VkSemaphoreGetFdInfoKHR-sType-sType"],
        ));
        violations.append(validate_no_chain(
            "get_fd_info.p_next",
            p_next,
            &["VUID-VkSemaphoreGetFdInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "get_fd_info.semaphore",
            semaphore,
            &["VUID-VkSemaphoreGetFdInfoKHR-semaphore-parameter"],
        ));
        violations.append(validate_handle_type(
            "get_fd_info.handle_type",
            handle_type.as_raw(),
            EXTERNAL_SEMAPHORE_HANDLE_TYPES.as_raw(),
            SEMAPHORE_FD_HANDLE_TYPES.as_raw(),
            &["VUID-VkSemaphoreGetFdInfoKHR-handleType-parameter"],
            &["VUID-VkSemaphoreGetFdInfoKHR-handleType-01136"],
        ));

        violations
    }

    /// Validates the arguments of `vkImportSemaphoreFdKHR`.
    pub fn validate_import_semaphore_fd_khr(
        &self,
        import_info: &vk::ImportSemaphoreFdInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::ImportSemaphoreFdInfoKHR {
            p_next,
            semaphore,
            flags,
            handle_type,
            ..
        } = import_info;

        violations.push_opt(validate_struct_type(
            "import_semaphore_fd_info.s_type",
            import_info,
            &["VUID-VkImportSemaphoreFdInfoKHR-sType-sType"],
        ));
        violations.append(validate_no_chain(
            "import_semaphore_fd_info.p_next",
            p_next,
            &["VUID-VkImportSemaphoreFdInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "import_semaphore_fd_info.semaphore",
            semaphore,
            &["VUID-VkImportSemaphoreFdInfoKHR-semaphore-parameter"],
        ));
        violations.push_opt(validate_flags(
            "import_semaphore_fd_info.flags",
            flags.as_raw(),
            vk::SemaphoreImportFlags::TEMPORARY.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkImportSemaphoreFdInfoKHR-flags-parameter"],
            &[],
        ));
        violations.append(validate_handle_type(
            "import_semaphore_fd_info.handle_type",
            handle_type.as_raw(),
            EXTERNAL_SEMAPHORE_HANDLE_TYPES.as_raw(),
            SEMAPHORE_FD_HANDLE_TYPES.as_raw(),
            &["VUID-VkImportSemaphoreFdInfoKHR-handleType-parameter"],
            &["VUID-VkImportSemaphoreFdInfoKHR-handleType-01143"],
        ));

        if handle_type == vk::ExternalSemaphoreHandleTypeFlags::SYNC_FD
            && !flags.contains(vk::SemaphoreImportFlags::TEMPORARY)
        {
            violations.push(ValidationError {
                context: "import_semaphore_fd_info.flags".into(),
                problem: "does not contain `VK_SEMAPHORE_IMPORT_TEMPORARY_BIT`, but \
                    `handle_type` is `VK_EXTERNAL_SEMAPHORE_HANDLE_TYPE_SYNC_FD_BIT`"
                    .into(),
                vuids: &["VUID-VkImportSemaphoreFdInfoKHR-handleType-07307"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkImportSemaphoreWin32HandleKHR`.
    pub fn validate_import_semaphore_win32_handle_khr(
        &self,
        import_info: &vk::ImportSemaphoreWin32HandleInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::ImportSemaphoreWin32HandleInfoKHR {
            p_next,
            semaphore,
            flags,
            handle_type,
            handle,
            name,
            ..
        } = import_info;

        violations.push_opt(validate_struct_type(
            "import_semaphore_win32_handle_info.s_type",
            import_info,
            &["VUID-VkImportSemaphoreWin32HandleInfoKHR-sType-sType"],
        ));
        violations.append(validate_no_chain(
            "import_semaphore_win32_handle_info.p_next",
            p_next,
            &["VUID-VkImportSemaphoreWin32HandleInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "import_semaphore_win32_handle_info.semaphore",
            semaphore,
            &["VUID-VkImportSemaphoreWin32HandleInfoKHR-semaphore-parameter"],
        ));
        violations.push_opt(validate_flags(
            "import_semaphore_win32_handle_info.flags",
            flags.as_raw(),
            vk::SemaphoreImportFlags::TEMPORARY.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkImportSemaphoreWin32HandleInfoKHR-flags-parameter"],
            &[],
        ));
        violations.append(validate_handle_type(
            "import_semaphore_win32_handle_info.handle_type",
            handle_type.as_raw(),
            EXTERNAL_SEMAPHORE_HANDLE_TYPES.as_raw(),
            SEMAPHORE_WIN32_HANDLE_TYPES.as_raw(),
            &["VUID-VkImportSemaphoreWin32HandleInfoKHR-handleType-parameter"],
            &["VUID-VkImportSemaphoreWin32HandleInfoKHR-handleType-01140"],
        ));
        violations.append(
            validate_name_and_handle(
                handle_type.as_raw(),
                SEMAPHORE_NAMED_HANDLE_TYPES.as_raw(),
                handle == 0,
                name.is_null(),
                NameAndHandleVuids {
                    name_not_allowed: &["VUID-VkImportSemaphoreWin32HandleInfoKHR-handleType-01466"],
                    neither: &["VUID-VkImportSemaphoreWin32HandleInfoKHR-handleType-01467"],
                    both: &["VUID-VkImportSemaphoreWin32HandleInfoKHR-name-01469"],
                },
            )
            .add_context("import_semaphore_win32_handle_info"),
        );

        violations
    }

    /// Validates the arguments of `vkGetFenceFdKHR`.
    pub fn validate_get_fence_fd_khr(&self, get_fd_info: &vk::FenceGetFdInfoKHR<'_>) -> Violations {
        let mut violations = Violations::new();
        let &vk::FenceGetFdInfoKHR {
            p_next,
            fence,
            handle_type,
            ..
        } = get_fd_info;

        violations.push_opt(validate_struct_type(
            "get_fd_info.s_type",
            get_fd_info,
            &["VUID-VkFenceGetFdInfoKHR-sType-sType"],
        ));
        violations.append(validate_no_chain(
            "get_fd_info.p_next",
            p_next,
            &["VUID-VkFenceGetFdInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "get_fd_info.fence",
            fence,
            &["VUID-VkFenceGetFdInfoKHR-fence-parameter"],
        ));
        violations.append(validate_handle_type(
            "get_fd_info.handle_type",
            handle_type.as_raw(),
            EXTERNAL_FENCE_HANDLE_TYPES.as_raw(),
            FENCE_FD_HANDLE_TYPES.as_raw(),
            &["VUID-VkFenceGetFdInfoKHR-handleType-parameter"],
            &["VUID-VkFenceGetFdInfoKHR-handleType-01456"],
        ));

        violations
    }

    /// Validates the arguments of `vkImportFenceFdKHR`.
    pub fn validate_import_fence_fd_khr(
        &self,
        import_info: &vk::ImportFenceFdInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::ImportFenceFdInfoKHR {
            p_next,
            fence,
            flags,
            handle_type,
            ..
        } = import_info;

        violations.push_opt(validate_struct_type(
            "import_fence_fd_info.s_type",
            import_info,
            &["VUID-VkImportFenceFdInfoKHR-sType-sType"],
        ));
        violations.append(validate_no_chain(
            "import_fence_fd_info.p_next",
            p_next,
            &["VUID-VkImportFenceFdInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "import_fence_fd_info.fence",
            fence,
            &["VUID-VkImportFenceFdInfoKHR-fence-parameter"],
        ));
        violations.push_opt(validate_flags(
            "import_fence_fd_info.flags",
            flags.as_raw(),
            vk::FenceImportFlags::TEMPORARY.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkImportFenceFdInfoKHR-flags-parameter"],
            &[],
        ));
        violations.append(validate_handle_type(
            "import_fence_fd_info.handle_type",
            handle_type.as_raw(),
            EXTERNAL_FENCE_HANDLE_TYPES.as_raw(),
            FENCE_FD_HANDLE_TYPES.as_raw(),
            &["VUID-VkImportFenceFdInfoKHR-handleType-parameter"],
            &["VUID-VkImportFenceFdInfoKHR-handleType-01464"],
        ));

        if handle_type == vk::ExternalFenceHandleTypeFlags::SYNC_FD
            && !flags.contains(vk::FenceImportFlags::TEMPORARY)
        {
            violations.push(ValidationError {
                context: "import_fence_fd_info.flags".into(),
                problem: "does not contain `VK_FENCE_IMPORT_TEMPORARY_BIT`, but `handle_type` \
                    is `VK_EXTERNAL_FENCE_HANDLE_TYPE_SYNC_FD_BIT`"
                    .into(),
                vuids: &["VUID-VkImportFenceFdInfoKHR-handleType-07306"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkImportFenceWin32HandleKHR`.
    pub fn validate_import_fence_win32_handle_khr(
        &self,
        import_info: &vk::ImportFenceWin32HandleInfoKHR<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::ImportFenceWin32HandleInfoKHR {
            p_next,
            fence,
            flags,
            handle_type,
            handle,
            name,
            ..
        } = import_info;

        violations.push_opt(validate_struct_type(
            "import_fence_win32_handle_info.s_type",
            import_info,
            &["VUID-VkImportFenceWin32HandleInfoKHR-sType-sType"],
        ));
        violations.append(validate_no_chain(
            "import_fence_win32_handle_info.p_next",
            p_next,
            &["VUID-VkImportFenceWin32HandleInfoKHR-pNext-pNext"],
        ));
        violations.push_opt(validate_required_handle(
            "import_fence_win32_handle_info.fence",
            fence,
            &["VUID-VkImportFenceWin32HandleInfoKHR-fence-parameter"],
        ));
        violations.push_opt(validate_flags(
            "import_fence_win32_handle_info.flags",
            flags.as_raw(),
            vk::FenceImportFlags::TEMPORARY.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkImportFenceWin32HandleInfoKHR-flags-parameter"],
            &[],
        ));
        violations.append(validate_handle_type(
            "import_fence_win32_handle_info.handle_type",
            handle_type.as_raw(),
            EXTERNAL_FENCE_HANDLE_TYPES.as_raw(),
            FENCE_WIN32_HANDLE_TYPES.as_raw(),
            &["VUID-VkImportFenceWin32HandleInfoKHR-handleType-parameter"],
            &["VUID-VkImportFenceWin32HandleInfoKHR-handleType-01457"],
        ));
        violations.append(
            validate_name_and_handle(
                handle_type.as_raw(),
                vk::ExternalFenceHandleTypeFlags::OPAQUE_WIN32.as_raw(),
                handle == 0,
                name.is_null(),
                NameAndHandleVuids {
                    name_not_allowed: &["VUID-VkImportFenceWin32HandleInfoKHR-handleType-01459"],
                    neither: &["VUID-VkImportFenceWin32HandleInfoKHR-handleType-01460"],
                    both: &["VUID-VkImportFenceWin32HandleInfoKHR-name-01461"],
                },
            )
            .add_context("import_fence_win32_handle_info"),
        );

        violations
    }

    /// Validates the arguments of `vkCmdPipelineBarrier`.
    ///
    /// # Safety
    ///
    /// Each barrier array must be null or valid for its count, and each element must be valid as
    /// described in the crate documentation.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn validate_cmd_pipeline_barrier(
        &self,
        _command_buffer: vk::CommandBuffer,
        src_stage_mask: vk::PipelineStageFlags,
        dst_stage_mask: vk::PipelineStageFlags,
        dependency_flags: vk::DependencyFlags,
        memory_barrier_count: u32,
        p_memory_barriers: *const vk::MemoryBarrier<'_>,
        buffer_memory_barrier_count: u32,
        p_buffer_memory_barriers: *const vk::BufferMemoryBarrier<'_>,
        image_memory_barrier_count: u32,
        p_image_memory_barriers: *const vk::ImageMemoryBarrier<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();

        for (context, mask, vuids_parameter, vuids_zero, src) in [
            (
                "src_stage_mask",
                src_stage_mask,
                &["VUID-vkCmdPipelineBarrier-srcStageMask-parameter"] as &'static [&'static str],
                &["VUID-vkCmdPipelineBarrier-srcStageMask-03937"] as &'static [&'static str],
                true,
            ),
            (
                "dst_stage_mask",
                dst_stage_mask,
                &["VUID-vkCmdPipelineBarrier-dstStageMask-parameter"],
                &["VUID-vkCmdPipelineBarrier-dstStageMask-03937"],
                false,
            ),
        ] {
            violations.push_opt(validate_flags(
                context,
                mask.as_raw(),
                PIPELINE_STAGES.as_raw(),
                FlagPolicy::Optional,
                vuids_parameter,
                &[],
            ));

            if mask.is_empty() && !capabilities.features.synchronization2 {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: "is empty".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceFeature("synchronization2"),
                    ])]),
                    vuids: vuids_zero,
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            violations.append(self.validate_stage_features(
                context,
                u64::from(mask.as_raw()),
                PIPELINE_BARRIER_STAGE_FEATURES,
                src,
            ));
        }

        violations.push_opt(validate_flags(
            "dependency_flags",
            dependency_flags.as_raw(),
            DEPENDENCY_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-vkCmdPipelineBarrier-dependencyFlags-parameter"],
            &[],
        ));

        violations.append(validate_array(
            "memory_barrier_count",
            "p_memory_barriers",
            memory_barrier_count,
            p_memory_barriers,
            optional_array(&["VUID-vkCmdPipelineBarrier-pMemoryBarriers-parameter"]),
        ));
        violations.append(validate_array(
            "buffer_memory_barrier_count",
            "p_buffer_memory_barriers",
            buffer_memory_barrier_count,
            p_buffer_memory_barriers,
            optional_array(&["VUID-vkCmdPipelineBarrier-pBufferMemoryBarriers-parameter"]),
        ));
        violations.append(validate_array(
            "image_memory_barrier_count",
            "p_image_memory_barriers",
            image_memory_barrier_count,
            p_image_memory_barriers,
            optional_array(&["VUID-vkCmdPipelineBarrier-pImageMemoryBarriers-parameter"]),
        ));

        let memory_barriers = slice_or_empty(p_memory_barriers, memory_barrier_count);
        violations.append(validate_struct_type_array(
            "p_memory_barriers",
            memory_barriers,
            &["VUID-VkMemoryBarrier-sType-sType"],
        ));

        for (index, barrier) in memory_barriers.iter().enumerate() {
            let mut barrier_violations =
                self.validate_chain("p_next", barrier.p_next, &NO_CHAIN_MEMORY_BARRIER);
            barrier_violations.append(validate_access_masks(
                barrier.src_access_mask,
                barrier.dst_access_mask,
                &["VUID-VkMemoryBarrier-srcAccessMask-parameter"],
                &["VUID-VkMemoryBarrier-dstAccessMask-parameter"],
            ));
            violations.append_with_context(barrier_violations, || {
                format!("p_memory_barriers[{}]", index)
            });
        }

        let buffer_barriers = slice_or_empty(p_buffer_memory_barriers, buffer_memory_barrier_count);
        violations.append(validate_struct_type_array(
            "p_buffer_memory_barriers",
            buffer_barriers,
            &["VUID-VkBufferMemoryBarrier-sType-sType"],
        ));

        for (index, barrier) in buffer_barriers.iter().enumerate() {
            let mut barrier_violations =
                self.validate_chain("p_next", barrier.p_next, &BARRIER_CHAIN);
            barrier_violations.append(validate_access_masks(
                barrier.src_access_mask,
                barrier.dst_access_mask,
                &["VUID-VkBufferMemoryBarrier-srcAccessMask-parameter"],
                &["VUID-VkBufferMemoryBarrier-dstAccessMask-parameter"],
            ));
            barrier_violations.append(validate_buffer_range(
                barrier.buffer,
                barrier.size,
                &["VUID-VkBufferMemoryBarrier-buffer-parameter"],
                &["VUID-VkBufferMemoryBarrier-size-01188"],
            ));
            violations.append_with_context(barrier_violations, || {
                format!("p_buffer_memory_barriers[{}]", index)
            });
        }

        let image_barriers = slice_or_empty(p_image_memory_barriers, image_memory_barrier_count);
        violations.append(validate_struct_type_array(
            "p_image_memory_barriers",
            image_barriers,
            &["VUID-VkImageMemoryBarrier-sType-sType"],
        ));

        for (index, barrier) in image_barriers.iter().enumerate() {
            let mut barrier_violations =
                self.validate_chain("p_next", barrier.p_next, &IMAGE_BARRIER_CHAIN);
            barrier_violations.append(validate_access_masks(
                barrier.src_access_mask,
                barrier.dst_access_mask,
                &["VUID-VkImageMemoryBarrier-srcAccessMask-parameter"],
                &["VUID-VkImageMemoryBarrier-dstAccessMask-parameter"],
            ));
            barrier_violations.append(validate_image_transition(
                barrier.image,
                barrier.old_layout,
                barrier.new_layout,
                &barrier.subresource_range,
                &ImageTransitionVuids {
                    image: &["VUID-VkImageMemoryBarrier-image-parameter"],
                    old_layout: &["VUID-VkImageMemoryBarrier-oldLayout-parameter"],
                    new_layout: &["VUID-VkImageMemoryBarrier-newLayout-parameter"],
                    new_layout_01198: &["VUID-VkImageMemoryBarrier-newLayout-01198"],
                },
            ));
            violations.append_with_context(barrier_violations, || {
                format!("p_image_memory_barriers[{}]", index)
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdPipelineBarrier2`.
    ///
    /// # Safety
    ///
    /// `dependency_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_cmd_pipeline_barrier2(
        &self,
        _command_buffer: vk::CommandBuffer,
        dependency_info: &vk::DependencyInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::DependencyInfo {
            p_next,
            dependency_flags,
            memory_barrier_count,
            p_memory_barriers,
            buffer_memory_barrier_count,
            p_buffer_memory_barriers,
            image_memory_barrier_count,
            p_image_memory_barriers,
            ..
        } = dependency_info;

        if !self.capabilities().features.synchronization2 {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "synchronization2",
                )])]),
                vuids: &["VUID-vkCmdPipelineBarrier2-synchronization2-03848"],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.push_opt(validate_struct_type(
            "dependency_info.s_type",
            dependency_info,
            &["VUID-VkDependencyInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "dependency_info.p_next",
            p_next,
            &NO_CHAIN_DEPENDENCY_INFO,
        ));
        violations.push_opt(validate_flags(
            "dependency_info.dependency_flags",
            dependency_flags.as_raw(),
            DEPENDENCY_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkDependencyInfo-dependencyFlags-parameter"],
            &[],
        ));

        violations.append(
            validate_array(
                "memory_barrier_count",
                "p_memory_barriers",
                memory_barrier_count,
                p_memory_barriers,
                optional_array(&["VUID-VkDependencyInfo-pMemoryBarriers-parameter"]),
            )
            .add_context("dependency_info"),
        );
        violations.append(
            validate_array(
                "buffer_memory_barrier_count",
                "p_buffer_memory_barriers",
                buffer_memory_barrier_count,
                p_buffer_memory_barriers,
                optional_array(&["VUID-VkDependencyInfo-pBufferMemoryBarriers-parameter"]),
            )
            .add_context("dependency_info"),
        );
        violations.append(
            validate_array(
                "image_memory_barrier_count",
                "p_image_memory_barriers",
                image_memory_barrier_count,
                p_image_memory_barriers,
                optional_array(&["VUID-VkDependencyInfo-pImageMemoryBarriers-parameter"]),
            )
            .add_context("dependency_info"),
        );

        for (index, barrier) in slice_or_empty(p_memory_barriers, memory_barrier_count)
            .iter()
            .enumerate()
        {
            let mut barrier_violations = Violations::new();
            barrier_violations.push_opt(validate_struct_type(
                "s_type",
                barrier,
                MEMORY_BARRIER2_VUIDS.s_type,
            ));
            barrier_violations.append(self.validate_chain(
                "p_next",
                barrier.p_next,
                &NO_CHAIN_MEMORY_BARRIER2,
            ));
            barrier_violations.append(self.validate_barrier2_scopes(
                barrier.src_stage_mask,
                barrier.src_access_mask,
                barrier.dst_stage_mask,
                barrier.dst_access_mask,
                &MEMORY_BARRIER2_VUIDS,
            ));
            violations.append_with_context(barrier_violations, || {
                format!("dependency_info.p_memory_barriers[{}]", index)
            });
        }

        for (index, barrier) in slice_or_empty(p_buffer_memory_barriers, buffer_memory_barrier_count)
            .iter()
            .enumerate()
        {
            let mut barrier_violations = Violations::new();
            barrier_violations.push_opt(validate_struct_type(
                "s_type",
                barrier,
                BUFFER_MEMORY_BARRIER2_VUIDS.s_type,
            ));
            barrier_violations.append(self.validate_chain(
                "p_next",
                barrier.p_next,
                &BARRIER2_CHAIN,
            ));
            barrier_violations.append(self.validate_barrier2_scopes(
                barrier.src_stage_mask,
                barrier.src_access_mask,
                barrier.dst_stage_mask,
                barrier.dst_access_mask,
                &BUFFER_MEMORY_BARRIER2_VUIDS,
            ));
            barrier_violations.append(validate_buffer_range(
                barrier.buffer,
                barrier.size,
                &["VUID-VkBufferMemoryBarrier2-buffer-parameter"],
                &["VUID-VkBufferMemoryBarrier2-size-01188"],
            ));
            violations.append_with_context(barrier_violations, || {
                format!("dependency_info.p_buffer_memory_barriers[{}]", index)
            });
        }

        for (index, barrier) in slice_or_empty(p_image_memory_barriers, image_memory_barrier_count)
            .iter()
            .enumerate()
        {
            let mut barrier_violations = Violations::new();
            barrier_violations.push_opt(validate_struct_type(
                "s_type",
                barrier,
                IMAGE_MEMORY_BARRIER2_VUIDS.s_type,
            ));
            barrier_violations.append(self.validate_chain(
                "p_next",
                barrier.p_next,
                &IMAGE_BARRIER2_CHAIN,
            ));
            barrier_violations.append(self.validate_barrier2_scopes(
                barrier.src_stage_mask,
                barrier.src_access_mask,
                barrier.dst_stage_mask,
                barrier.dst_access_mask,
                &IMAGE_MEMORY_BARRIER2_VUIDS,
            ));
            barrier_violations.append(validate_image_transition(
                barrier.image,
                barrier.old_layout,
                barrier.new_layout,
                &barrier.subresource_range,
                &ImageTransitionVuids {
                    image: &["VUID-VkImageMemoryBarrier2-image-parameter"],
                    old_layout: &["VUID-VkImageMemoryBarrier2-oldLayout-parameter"],
                    new_layout: &["VUID-VkImageMemoryBarrier2-newLayout-parameter"],
                    new_layout_01198: &["VUID-VkImageMemoryBarrier2-newLayout-01198"],
                },
            ));
            violations.append_with_context(barrier_violations, || {
                format!("dependency_info.p_image_memory_barriers[{}]", index)
            });
        }

        violations
    }

    fn validate_stage_features(
        &self,
        context: &'static str,
        mask: u64,
        rules: &'static [StageFeatureRule],
        src: bool,
    ) -> Violations {
        let capabilities = self.capabilities();

        rules
            .iter()
            .filter(|rule| mask & rule.stages != 0 && !capabilities.satisfies(rule.requires_one_of))
            .map(|rule| ValidationError {
                context: context.into(),
                problem: format!(
                    "contains {:#x}, a stage that is not enabled on the device",
                    mask & rule.stages,
                )
                .into(),
                requires_one_of: rule.requires_one_of,
                vuids: if src { rule.src_vuids } else { rule.dst_vuids },
                kind: ViolationKind::RequirementNotMet,
            })
            .collect()
    }

    fn validate_barrier2_scopes(
        &self,
        src_stage_mask: vk::PipelineStageFlags2,
        src_access_mask: vk::AccessFlags2,
        dst_stage_mask: vk::PipelineStageFlags2,
        dst_access_mask: vk::AccessFlags2,
        vuids: &Barrier2Vuids,
    ) -> Violations {
        let mut violations = Violations::new();

        for (stage_context, stage_mask, access_context, access_mask, src) in [
            (
                "src_stage_mask",
                src_stage_mask,
                "src_access_mask",
                src_access_mask,
                true,
            ),
            (
                "dst_stage_mask",
                dst_stage_mask,
                "dst_access_mask",
                dst_access_mask,
                false,
            ),
        ] {
            violations.push_opt(validate_flags(
                stage_context,
                stage_mask.as_raw(),
                PIPELINE_STAGES_2.as_raw(),
                FlagPolicy::Optional,
                if src {
                    vuids.src_stage_mask
                } else {
                    vuids.dst_stage_mask
                },
                &[],
            ));
            violations.push_opt(validate_flags(
                access_context,
                access_mask.as_raw(),
                ACCESS_FLAGS_2.as_raw(),
                FlagPolicy::Optional,
                if src {
                    vuids.src_access_mask
                } else {
                    vuids.dst_access_mask
                },
                &[],
            ));
            violations.append(self.validate_stage_features(
                stage_context,
                stage_mask.as_raw(),
                vuids.stage_features,
                src,
            ));

            for rule in vuids.access_stages {
                if access_mask.contains(rule.access) && !stage_mask.intersects(rule.stages) {
                    violations.push(ValidationError {
                        context: access_context.into(),
                        problem: format!(
                            "contains {:?}, but `{}` does not contain a stage that performs \
                            this access",
                            rule.access, stage_context,
                        )
                        .into(),
                        vuids: if src { rule.vuids_src } else { rule.vuids_dst },
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }
            }
        }

        violations
    }
}

/// Checks a `p_next` that must be null.
fn validate_no_chain(
    context: &'static str,
    p_next: *const std::ffi::c_void,
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

/// Checks that a handle type is a single known bit, and that it is one of the types that this
/// call accepts.
fn validate_handle_type(
    context: &'static str,
    handle_type: u32,
    known: u32,
    accepted: u32,
    vuids_parameter: &'static [&'static str],
    vuids_accepted: &'static [&'static str],
) -> Violations {
    let mut violations = Violations::new();

    if let Some(error) = validate_flags(
        context,
        handle_type,
        known,
        FlagPolicy::RequiredSingleBit,
        vuids_parameter,
        vuids_parameter,
    ) {
        violations.push(error);
        return violations;
    }

    if handle_type & accepted == 0 {
        violations.push(ValidationError {
            context: context.into(),
            problem: format!(
                "is {:#x}, which is not one of the handle types accepted here ({:#x})",
                handle_type, accepted,
            )
            .into(),
            vuids: vuids_accepted,
            ..Default::default()
        });
    }

    violations
}

struct NameAndHandleVuids {
    name_not_allowed: &'static [&'static str],
    neither: &'static [&'static str],
    both: &'static [&'static str],
}

/// Checks the `handle` and `name` of a Win32 handle import. At most one of them may be given,
/// and `name` only for the handle types in `named_types`.
fn validate_name_and_handle(
    handle_type: u32,
    named_types: u32,
    handle_is_null: bool,
    name_is_null: bool,
    vuids: NameAndHandleVuids,
) -> Violations {
    let mut violations = Violations::new();

    if !name_is_null && handle_type & named_types == 0 {
        violations.push(ValidationError {
            context: "name".into(),
            problem: format!(
                "is not null, but `handle_type` ({:#x}) cannot be imported by name",
                handle_type,
            )
            .into(),
            vuids: vuids.name_not_allowed,
            kind: ViolationKind::ExtraneousCompanion,
            ..Default::default()
        });
    }

    match (handle_is_null, name_is_null) {
        (true, true) => violations.push(ValidationError {
            context: "handle".into(),
            problem: "is null, and `name` is also null".into(),
            vuids: vuids.neither,
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        }),
        (false, false) => violations.push(ValidationError {
            context: "name".into(),
            problem: "is not null, but `handle` is also not null".into(),
            vuids: vuids.both,
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        }),
        _ => (),
    }

    violations
}

fn validate_access_masks(
    src_access_mask: vk::AccessFlags,
    dst_access_mask: vk::AccessFlags,
    vuids_src: &'static [&'static str],
    vuids_dst: &'static [&'static str],
) -> Violations {
    let mut violations = Violations::new();

    for (context, mask, vuids) in [
        ("src_access_mask", src_access_mask, vuids_src),
        ("dst_access_mask", dst_access_mask, vuids_dst),
    ] {
        violations.push_opt(validate_flags(
            context,
            mask.as_raw(),
            ACCESS_FLAGS.as_raw(),
            FlagPolicy::Optional,
            vuids,
            &[],
        ));
    }

    violations
}

fn validate_buffer_range(
    buffer: vk::Buffer,
    size: vk::DeviceSize,
    vuids_buffer: &'static [&'static str],
    vuids_size: &'static [&'static str],
) -> Violations {
    let mut violations = Violations::new();

    violations.push_opt(validate_required_handle("buffer", buffer, vuids_buffer));

    if size == 0 {
        violations.push(ValidationError {
            context: "size".into(),
            problem: "is zero".into(),
            vuids: vuids_size,
            ..Default::default()
        });
    }

    violations
}

fn optional_array(array_vuids: &'static [&'static str]) -> ArrayRules {
    ArrayRules {
        count_required: false,
        array_required: true,
        count_vuids: &[],
        array_vuids,
    }
}

struct ImageTransitionVuids {
    image: &'static [&'static str],
    old_layout: &'static [&'static str],
    new_layout: &'static [&'static str],
    new_layout_01198: &'static [&'static str],
}

fn validate_image_transition(
    image: vk::Image,
    old_layout: vk::ImageLayout,
    new_layout: vk::ImageLayout,
    subresource_range: &vk::ImageSubresourceRange,
    vuids: &ImageTransitionVuids,
) -> Violations {
    let mut violations = Violations::new();

    violations.push_opt(validate_required_handle("image", image, vuids.image));
    violations.push_opt(validate_ranged_enum(
        "old_layout",
        old_layout.as_raw(),
        IMAGE_LAYOUT_VALUES,
        vuids.old_layout,
    ));
    violations.push_opt(validate_ranged_enum(
        "new_layout",
        new_layout.as_raw(),
        IMAGE_LAYOUT_VALUES,
        vuids.new_layout,
    ));

    // No layout transition happens when the layouts are equal.
    if old_layout != new_layout
        && matches!(
            new_layout,
            vk::ImageLayout::UNDEFINED | vk::ImageLayout::PREINITIALIZED
        )
    {
        violations.push(ValidationError {
            context: "new_layout".into(),
            problem: format!("is {:?}", new_layout).into(),
            vuids: vuids.new_layout_01198,
            ..Default::default()
        });
    }

    violations.append(validate_subresource_range(subresource_range).add_context("subresource_range"));

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::{test_capabilities, test_validator, test_validator_with};
    use ash::vk::{self, Handle};
    use std::ptr;

    fn semaphore() -> vk::Semaphore {
        vk::Semaphore::from_raw(0x70)
    }

    fn fence() -> vk::Fence {
        vk::Fence::from_raw(0x71)
    }

    fn color_range() -> vk::ImageSubresourceRange {
        vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        }
    }

    #[test]
    fn semaphore_types() {
        let mut capabilities = test_capabilities();
        capabilities.features.timeline_semaphore = false;
        let validator = test_validator_with(capabilities);

        let mut type_info = vk::SemaphoreTypeCreateInfo::default()
            .semaphore_type(vk::SemaphoreType::TIMELINE)
            .initial_value(5);
        let create_info = vk::SemaphoreCreateInfo::default().push_next(&mut type_info);
        let violations = unsafe { validator.validate_create_semaphore(&create_info) };
        assert_vuid!(
            violations,
            "VUID-VkSemaphoreTypeCreateInfo-timelineSemaphore-03252",
        );
        assert_eq!(violations.len(), 1, "{}", violations);

        let validator = test_validator();
        let mut type_info = vk::SemaphoreTypeCreateInfo::default()
            .semaphore_type(vk::SemaphoreType::BINARY)
            .initial_value(5);
        let mut export_info = vk::ExportSemaphoreCreateInfo::default()
            .handle_types(vk::ExternalSemaphoreHandleTypeFlags::from_raw(0x8000_0000));
        let create_info = vk::SemaphoreCreateInfo::default()
            .push_next(&mut type_info)
            .push_next(&mut export_info);
        let violations = unsafe { validator.validate_create_semaphore(&create_info) };
        assert_vuid!(
            violations,
            "VUID-VkSemaphoreTypeCreateInfo-semaphoreType-03279",
        );
        assert_vuid!(
            violations,
            "VUID-VkExportSemaphoreCreateInfo-handleTypes-parameter",
        );
        assert_eq!(violations.len(), 2, "{}", violations);
    }

    #[test]
    fn fences_and_events() {
        let validator = test_validator();

        let create_info =
            vk::FenceCreateInfo::default().flags(vk::FenceCreateFlags::from_raw(0b10));
        let violations = unsafe { validator.validate_create_fence(&create_info) };
        assert_vuid!(violations, "VUID-VkFenceCreateInfo-flags-parameter");

        let create_info = vk::FenceCreateInfo::default().flags(vk::FenceCreateFlags::SIGNALED);
        assert!(unsafe { validator.validate_create_fence(&create_info) }.is_empty());

        let create_info = vk::EventCreateInfo::default().flags(vk::EventCreateFlags::DEVICE_ONLY);
        assert!(unsafe { validator.validate_create_event(&create_info) }.is_empty());

        let mut capabilities = test_capabilities();
        capabilities.api_version = crate::Version::V1_2;
        let validator = test_validator_with(capabilities);
        let violations = unsafe { validator.validate_create_event(&create_info) };
        assert_vuid!(violations, "VUID-VkEventCreateInfo-flags-parameter");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn fd_handle_types() {
        let validator = test_validator();

        let get_fd_info = vk::SemaphoreGetFdInfoKHR::default()
            .semaphore(semaphore())
            .handle_type(vk::ExternalSemaphoreHandleTypeFlags::OPAQUE_WIN32);
        let violations = validator.validate_get_semaphore_fd_khr(&get_fd_info);
        assert_vuid!(violations, "VUID-VkSemaphoreGetFdInfoKHR-handleType-01136");
        assert_eq!(violations.len(), 1, "{}", violations);

        let get_fd_info = vk::FenceGetFdInfoKHR::default()
            .fence(fence())
            .handle_type(
                vk::ExternalFenceHandleTypeFlags::OPAQUE_FD
                    | vk::ExternalFenceHandleTypeFlags::SYNC_FD,
            );
        let violations = validator.validate_get_fence_fd_khr(&get_fd_info);
        assert_vuid!(violations, "VUID-VkFenceGetFdInfoKHR-handleType-parameter");

        let import_info = vk::ImportSemaphoreFdInfoKHR::default()
            .semaphore(semaphore())
            .handle_type(vk::ExternalSemaphoreHandleTypeFlags::SYNC_FD)
            .fd(-1);
        let violations = validator.validate_import_semaphore_fd_khr(&import_info);
        assert_vuid!(violations, "VUID-VkImportSemaphoreFdInfoKHR-handleType-07307");
        assert_eq!(violations.len(), 1, "{}", violations);

        let import_info = vk::ImportFenceFdInfoKHR::default()
            .fence(fence())
            .flags(vk::FenceImportFlags::TEMPORARY)
            .handle_type(vk::ExternalFenceHandleTypeFlags::SYNC_FD)
            .fd(-1);
        assert!(validator.validate_import_fence_fd_khr(&import_info).is_empty());
    }

    #[test]
    fn win32_name_and_handle() {
        let validator = test_validator();
        let name = [b'a' as u16, 0];
        let handle = 0x1234usize as vk::HANDLE;

        let import_info = vk::ImportSemaphoreWin32HandleInfoKHR {
            semaphore: semaphore(),
            handle_type: vk::ExternalSemaphoreHandleTypeFlags::OPAQUE_WIN32,
            handle,
            name: name.as_ptr(),
            ..Default::default()
        };
        let violations = validator.validate_import_semaphore_win32_handle_khr(&import_info);
        assert_vuid!(violations, "VUID-VkImportSemaphoreWin32HandleInfoKHR-name-01469");
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(violations[0].context, "import_semaphore_win32_handle_info.name");

        let import_info = vk::ImportSemaphoreWin32HandleInfoKHR {
            handle_type: vk::ExternalSemaphoreHandleTypeFlags::OPAQUE_WIN32_KMT,
            handle: 0,
            ..import_info
        };
        let violations = validator.validate_import_semaphore_win32_handle_khr(&import_info);
        assert_vuid!(
            violations,
            "VUID-VkImportSemaphoreWin32HandleInfoKHR-handleType-01466",
        );
        assert_eq!(violations.len(), 1, "{}", violations);

        let import_info = vk::ImportFenceWin32HandleInfoKHR {
            fence: fence(),
            handle_type: vk::ExternalFenceHandleTypeFlags::OPAQUE_WIN32,
            ..Default::default()
        };
        let violations = validator.validate_import_fence_win32_handle_khr(&import_info);
        assert_vuid!(violations, "VUID-VkImportFenceWin32HandleInfoKHR-handleType-01460");
        assert_eq!(violations.len(), 1, "{}", violations);

        let import_info = vk::ImportFenceWin32HandleInfoKHR {
            handle_type: vk::ExternalFenceHandleTypeFlags::SYNC_FD,
            handle,
            ..import_info
        };
        let violations = validator.validate_import_fence_win32_handle_khr(&import_info);
        assert_vuid!(violations, "VUID-VkImportFenceWin32HandleInfoKHR-handleType-01457");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn pipeline_barrier() {
        let mut capabilities = test_capabilities();
        capabilities.features.geometry_shader = false;
        capabilities.features.synchronization2 = false;
        let validator = test_validator_with(capabilities);

        let buffer_barriers = [vk::BufferMemoryBarrier::default()
            .buffer(vk::Buffer::from_raw(0x72))
            .size(0)];
        let image_barriers = [vk::ImageMemoryBarrier::default()
            .image(vk::Image::from_raw(0x73))
            .old_layout(vk::ImageLayout::GENERAL)
            .new_layout(vk::ImageLayout::UNDEFINED)
            .subresource_range(color_range())];

        let violations = unsafe {
            validator.validate_cmd_pipeline_barrier(
                vk::CommandBuffer::null(),
                vk::PipelineStageFlags::GEOMETRY_SHADER,
                vk::PipelineStageFlags::empty(),
                vk::DependencyFlags::BY_REGION,
                0,
                ptr::null(),
                1,
                buffer_barriers.as_ptr(),
                1,
                image_barriers.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdPipelineBarrier-srcStageMask-04090");
        assert_vuid!(violations, "VUID-vkCmdPipelineBarrier-dstStageMask-03937");
        assert_vuid!(violations, "VUID-VkBufferMemoryBarrier-size-01188");
        assert_vuid!(violations, "VUID-VkImageMemoryBarrier-newLayout-01198");
        assert_eq!(violations.len(), 4, "{}", violations);
        assert_eq!(violations[2].context, "p_buffer_memory_barriers[0].size");

        let violations = unsafe {
            validator.validate_cmd_pipeline_barrier(
                vk::CommandBuffer::null(),
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::TRANSFER,
                vk::DependencyFlags::empty(),
                2,
                ptr::null(),
                0,
                ptr::null(),
                0,
                ptr::null(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdPipelineBarrier-pMemoryBarriers-parameter");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn pipeline_barrier2() {
        let validator = test_validator();

        let memory_barriers = [
            vk::MemoryBarrier2::default()
                .src_stage_mask(vk::PipelineStageFlags2::COMPUTE_SHADER)
                .src_access_mask(vk::AccessFlags2::HOST_READ)
                .dst_stage_mask(vk::PipelineStageFlags2::ALL_COMMANDS)
                .dst_access_mask(vk::AccessFlags2::HOST_WRITE),
            vk::MemoryBarrier2::default()
                .src_stage_mask(vk::PipelineStageFlags2::COPY)
                .src_access_mask(vk::AccessFlags2::TRANSFER_WRITE)
                .dst_stage_mask(vk::PipelineStageFlags2::DRAW_INDIRECT)
                .dst_access_mask(vk::AccessFlags2::INDIRECT_COMMAND_READ),
        ];
        let image_barriers = [vk::ImageMemoryBarrier2::default()
            .image(vk::Image::from_raw(0x73))
            .old_layout(vk::ImageLayout::GENERAL)
            .new_layout(vk::ImageLayout::GENERAL)
            .subresource_range(color_range())];
        let dependency_info = vk::DependencyInfo::default()
            .memory_barriers(&memory_barriers)
            .image_memory_barriers(&image_barriers);

        let violations = unsafe {
            validator.validate_cmd_pipeline_barrier2(vk::CommandBuffer::null(), &dependency_info)
        };
        assert_vuid!(violations, "VUID-VkMemoryBarrier2-srcAccessMask-03916");
        assert_eq!(violations.len(), 1, "{}", violations);
        assert_eq!(
            violations[0].context,
            "dependency_info.p_memory_barriers[0].src_access_mask",
        );

        let mut capabilities = test_capabilities();
        capabilities.features.synchronization2 = false;
        capabilities.features.mesh_shader = false;
        let validator = test_validator_with(capabilities);
        let memory_barriers = [vk::MemoryBarrier2::default()
            .src_stage_mask(vk::PipelineStageFlags2::MESH_SHADER_EXT)
            .dst_stage_mask(vk::PipelineStageFlags2::NONE)];
        let dependency_info = vk::DependencyInfo::default().memory_barriers(&memory_barriers);

        let violations = unsafe {
            validator.validate_cmd_pipeline_barrier2(vk::CommandBuffer::null(), &dependency_info)
        };
        assert_vuid!(violations, "VUID-vkCmdPipelineBarrier2-synchronization2-03848");
        assert_vuid!(violations, "VUID-VkMemoryBarrier2-srcStageMask-03934");
        assert_eq!(violations.len(), 2, "{}", violations);
    }
}
