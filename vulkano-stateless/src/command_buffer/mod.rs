// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Command pools, command buffers, and the commands that bind state for later commands.
//!
//! Secondary command buffers are remembered when they are allocated, because
//! `vkBeginCommandBuffer` has different requirements for them and receives nothing but the
//! handle.

use crate::{
    chain::{find_in_chain, AllowedStruct, ChainRules},
    format::FORMAT_VALUES,
    image::SAMPLE_COUNTS,
    pipeline::SHADER_STAGES,
    predicates::{
        is_aligned, is_true, slice_or_empty, validate_array, validate_flags,
        validate_ranged_enum, validate_required_handle, validate_required_pointer,
        validate_struct_type, ArrayRules, FlagPolicy,
    },
    query::PIPELINE_STATISTICS,
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk::{self, Handle};
use std::ops::RangeInclusive;
use tracing::{debug, trace};

mod draw;
mod dynamic_state;
mod transfer;

const COMMAND_POOL_CREATE_FLAGS: vk::CommandPoolCreateFlags =
    flags_mask!(CommandPoolCreateFlags { TRANSIENT, RESET_COMMAND_BUFFER, PROTECTED });

const COMMAND_BUFFER_USAGE_FLAGS: vk::CommandBufferUsageFlags = flags_mask!(CommandBufferUsageFlags {
    ONE_TIME_SUBMIT,
    RENDER_PASS_CONTINUE,
    SIMULTANEOUS_USE,
});

const QUERY_CONTROL_FLAGS: vk::QueryControlFlags = flags_mask!(QueryControlFlags { PRECISE });

const COMMAND_BUFFER_LEVEL_VALUES: &[RangeInclusive<i32>] =
    enum_values!(CommandBufferLevel { PRIMARY..=SECONDARY });

const INDEX_TYPE_VALUES: &[RangeInclusive<i32>] =
    enum_values!(IndexType { UINT16..=UINT32, NONE_KHR, UINT8_EXT });

pub(crate) const PIPELINE_BIND_POINT_VALUES: &[RangeInclusive<i32>] =
    enum_values!(PipelineBindPoint { GRAPHICS..=COMPUTE, RAY_TRACING_KHR });

const COMMAND_BUFFER_BEGIN_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DeviceGroupCommandBufferBeginInfo<'static>>().requires(
            RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_device_group")]),
            ]),
        ),
    ],
    unique: true,
    vuids_next: &["VUID-VkCommandBufferBeginInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkCommandBufferBeginInfo-sType-unique"],
};

const COMMAND_BUFFER_INHERITANCE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::CommandBufferInheritanceRenderingInfo<'static>>().requires(
            RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_dynamic_rendering")]),
            ]),
        ),
    ],
    unique: true,
    vuids_next: &["VUID-VkCommandBufferInheritanceInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkCommandBufferInheritanceInfo-sType-unique"],
};

const COMMAND_POOL_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkCommandPoolCreateInfo-pNext-pNext"],
    vuids_unique: &[],
};

const COMMAND_BUFFER_ALLOCATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkCommandBufferAllocateInfo-pNext-pNext"],
    vuids_unique: &[],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCreateCommandPool`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_command_pool(
        &self,
        create_info: &vk::CommandPoolCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::CommandPoolCreateInfo { p_next, flags, .. } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkCommandPoolCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &COMMAND_POOL_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            COMMAND_POOL_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkCommandPoolCreateInfo-flags-parameter"],
            &[],
        ));

        if flags.contains(vk::CommandPoolCreateFlags::PROTECTED)
            && !self.capabilities().features.protected_memory
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_COMMAND_POOL_CREATE_PROTECTED_BIT`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "protected_memory",
                )])]),
                vuids: &["VUID-VkCommandPoolCreateInfo-flags-02860"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations
    }

    /// Validates the arguments of `vkAllocateCommandBuffers`.
    ///
    /// # Safety
    ///
    /// `allocate_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_allocate_command_buffers(
        &self,
        allocate_info: &vk::CommandBufferAllocateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::CommandBufferAllocateInfo {
            p_next,
            command_pool,
            level,
            command_buffer_count,
            ..
        } = allocate_info;

        violations.push_opt(validate_struct_type(
            "allocate_info.s_type",
            allocate_info,
            &["VUID-VkCommandBufferAllocateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "allocate_info.p_next",
            p_next,
            &COMMAND_BUFFER_ALLOCATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_required_handle(
            "allocate_info.command_pool",
            command_pool,
            &["VUID-VkCommandBufferAllocateInfo-commandPool-parameter"],
        ));
        violations.push_opt(validate_ranged_enum(
            "allocate_info.level",
            level.as_raw(),
            COMMAND_BUFFER_LEVEL_VALUES,
            &["VUID-VkCommandBufferAllocateInfo-level-parameter"],
        ));

        if command_buffer_count == 0 {
            violations.push(ValidationError {
                context: "allocate_info.command_buffer_count".into(),
                problem: "is 0".into(),
                vuids: &["VUID-VkCommandBufferAllocateInfo-commandBufferCount-arraylength"],
                ..Default::default()
            });
        }

        violations
    }

    /// Remembers the secondary command buffers that were allocated.
    ///
    /// # Safety
    ///
    /// On success, `p_command_buffers` must point to `allocate_info.command_buffer_count`
    /// handles.
    pub unsafe fn post_call_record_allocate_command_buffers(
        &self,
        allocate_info: &vk::CommandBufferAllocateInfo<'_>,
        p_command_buffers: *const vk::CommandBuffer,
        result: vk::Result,
    ) {
        if result != vk::Result::SUCCESS || allocate_info.level != vk::CommandBufferLevel::SECONDARY
        {
            return;
        }

        let command_buffers =
            slice_or_empty(p_command_buffers, allocate_info.command_buffer_count);
        self.insert_secondary_command_buffers(allocate_info.command_pool, command_buffers);
        debug!(
            command_pool = ?allocate_info.command_pool,
            count = command_buffers.len(),
            "recorded secondary command buffers",
        );
    }

    /// Forgets the command buffers that were freed.
    ///
    /// # Safety
    ///
    /// `p_command_buffers` must be null or point to `command_buffer_count` handles.
    pub unsafe fn post_call_record_free_command_buffers(
        &self,
        command_pool: vk::CommandPool,
        command_buffer_count: u32,
        p_command_buffers: *const vk::CommandBuffer,
    ) {
        let removed = self.remove_secondary_command_buffers(slice_or_empty(
            p_command_buffers,
            command_buffer_count,
        ));
        trace!(?command_pool, removed, "released secondary command buffers");
    }

    /// Forgets every secondary command buffer of a pool that is being destroyed.
    pub fn post_call_record_destroy_command_pool(&self, command_pool: vk::CommandPool) {
        if command_pool.is_null() {
            return;
        }

        let removed = self.remove_secondary_command_buffers_of_pool(command_pool);
        debug!(?command_pool, removed, "released command pool");
    }

    /// Validates the arguments of `vkBeginCommandBuffer`.
    ///
    /// # Safety
    ///
    /// `begin_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        begin_info: &vk::CommandBufferBeginInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::CommandBufferBeginInfo {
            p_next,
            flags,
            p_inheritance_info,
            ..
        } = begin_info;

        violations.push_opt(validate_struct_type(
            "begin_info.s_type",
            begin_info,
            &["VUID-VkCommandBufferBeginInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "begin_info.p_next",
            p_next,
            &COMMAND_BUFFER_BEGIN_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "begin_info.flags",
            flags.as_raw(),
            COMMAND_BUFFER_USAGE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkCommandBufferBeginInfo-flags-parameter"],
            &[],
        ));

        // The inheritance info is ignored for primary command buffers.
        if self.secondary_command_buffer_pool(command_buffer).is_none() {
            return violations;
        }

        let Some(inheritance_info) = p_inheritance_info.as_ref() else {
            violations.push(ValidationError {
                context: "begin_info.p_inheritance_info".into(),
                problem: "is null, but `command_buffer` is a secondary command buffer".into(),
                vuids: &["VUID-vkBeginCommandBuffer-commandBuffer-00051"],
                kind: ViolationKind::MissingCompanion,
                ..Default::default()
            });
            return violations;
        };

        violations.append(
            self.validate_inheritance_info(inheritance_info, flags)
                .add_context("begin_info.p_inheritance_info"),
        );

        violations
    }

    unsafe fn validate_inheritance_info(
        &self,
        inheritance_info: &vk::CommandBufferInheritanceInfo<'_>,
        usage: vk::CommandBufferUsageFlags,
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::CommandBufferInheritanceInfo {
            p_next,
            render_pass,
            subpass,
            occlusion_query_enable,
            query_flags,
            pipeline_statistics,
            ..
        } = inheritance_info;

        violations.push_opt(validate_struct_type(
            "s_type",
            inheritance_info,
            &["VUID-VkCommandBufferInheritanceInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &COMMAND_BUFFER_INHERITANCE_INFO_CHAIN,
        ));

        if is_true(occlusion_query_enable) && !features.inherited_queries {
            violations.push(ValidationError {
                context: "occlusion_query_enable".into(),
                problem: "is `VK_TRUE`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "inherited_queries",
                )])]),
                vuids: &["VUID-VkCommandBufferInheritanceInfo-occlusionQueryEnable-00056"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if features.inherited_queries {
            violations.push_opt(validate_flags(
                "query_flags",
                query_flags.as_raw(),
                QUERY_CONTROL_FLAGS.as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkCommandBufferInheritanceInfo-queryFlags-00057"],
                &[],
            ));
        } else if !query_flags.is_empty() {
            violations.push(ValidationError {
                context: "query_flags".into(),
                problem: "is not 0".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "inherited_queries",
                )])]),
                vuids: &["VUID-VkCommandBufferInheritanceInfo-queryFlags-02788"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if features.pipeline_statistics_query {
            violations.push_opt(validate_flags(
                "pipeline_statistics",
                pipeline_statistics.as_raw(),
                PIPELINE_STATISTICS.as_raw(),
                FlagPolicy::Optional,
                &["VUID-VkCommandBufferInheritanceInfo-pipelineStatistics-02789"],
                &[],
            ));
        } else if !pipeline_statistics.is_empty() {
            violations.push(ValidationError {
                context: "pipeline_statistics".into(),
                problem: "is not 0".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "pipeline_statistics_query",
                )])]),
                vuids: &["VUID-VkCommandBufferInheritanceInfo-pipelineStatistics-00058"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if !usage.contains(vk::CommandBufferUsageFlags::RENDER_PASS_CONTINUE) {
            return violations;
        }

        let rendering_info = find_in_chain::<vk::CommandBufferInheritanceRenderingInfo<'_>>(p_next);

        if render_pass.is_null() {
            match rendering_info {
                Some(rendering_info) => {
                    violations.append(
                        self.validate_inheritance_rendering_info(rendering_info)
                            .add_context("p_next"),
                    );
                }
                None => {
                    violations.push(ValidationError {
                        context: "render_pass".into(),
                        problem: "is `VK_NULL_HANDLE`, `begin_info.flags` contains \
                            `VK_COMMAND_BUFFER_USAGE_RENDER_PASS_CONTINUE_BIT`, and there is no \
                            `VkCommandBufferInheritanceRenderingInfo` in the `p_next` chain"
                            .into(),
                        vuids: &["VUID-VkCommandBufferBeginInfo-flags-06000"],
                        kind: ViolationKind::MissingCompanion,
                        ..Default::default()
                    });
                }
            }
        } else if let Some(usage) = self.render_pass_usage(render_pass) {
            if subpass as usize >= usage.subpasses.len() {
                violations.push(ValidationError {
                    context: "subpass".into(),
                    problem: format!(
                        "is {}, but `render_pass` has only {} subpasses",
                        subpass,
                        usage.subpasses.len(),
                    )
                    .into(),
                    vuids: &["VUID-VkCommandBufferBeginInfo-flags-06001"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations
    }

    unsafe fn validate_inheritance_rendering_info(
        &self,
        rendering_info: &vk::CommandBufferInheritanceRenderingInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let &vk::CommandBufferInheritanceRenderingInfo {
            view_mask,
            color_attachment_count,
            p_color_attachment_formats,
            depth_attachment_format,
            stencil_attachment_format,
            rasterization_samples,
            ..
        } = rendering_info;

        if color_attachment_count > capabilities.properties.max_color_attachments {
            violations.push(ValidationError {
                context: "color_attachment_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_color_attachments` limit ({})",
                    color_attachment_count, capabilities.properties.max_color_attachments,
                )
                .into(),
                vuids: &["VUID-VkCommandBufferInheritanceRenderingInfo-colorAttachmentCount-06004"],
                ..Default::default()
            });
        }

        if view_mask != 0 && !capabilities.features.multiview {
            violations.push(ValidationError {
                context: "view_mask".into(),
                problem: "is not 0".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multiview",
                )])]),
                vuids: &["VUID-VkCommandBufferInheritanceRenderingInfo-multiview-06008"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations.append(validate_array(
            "color_attachment_count",
            "p_color_attachment_formats",
            color_attachment_count,
            p_color_attachment_formats,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &[
                    "VUID-VkCommandBufferInheritanceRenderingInfo-pColorAttachmentFormats-parameter",
                ],
            },
        ));

        for (index, format) in slice_or_empty(p_color_attachment_formats, color_attachment_count)
            .iter()
            .enumerate()
        {
            violations.push_opt(validate_ranged_enum(
                format!("p_color_attachment_formats[{}]", index),
                format.as_raw(),
                FORMAT_VALUES,
                &["VUID-VkCommandBufferInheritanceRenderingInfo-pColorAttachmentFormats-parameter"],
            ));
        }

        for (context, format, vuids) in [
            (
                "depth_attachment_format",
                depth_attachment_format,
                &["VUID-VkCommandBufferInheritanceRenderingInfo-depthAttachmentFormat-parameter"]
                    as &'static [&'static str],
            ),
            (
                "stencil_attachment_format",
                stencil_attachment_format,
                &["VUID-VkCommandBufferInheritanceRenderingInfo-stencilAttachmentFormat-parameter"],
            ),
        ] {
            violations.push_opt(validate_ranged_enum(context, format.as_raw(), FORMAT_VALUES, vuids));
        }

        if depth_attachment_format != vk::Format::UNDEFINED
            && stencil_attachment_format != vk::Format::UNDEFINED
            && depth_attachment_format != stencil_attachment_format
        {
            violations.push(ValidationError {
                context: "stencil_attachment_format".into(),
                problem: format!(
                    "is {:?}, which is not `VK_FORMAT_UNDEFINED` and not equal to \
                    `depth_attachment_format` ({:?})",
                    stencil_attachment_format, depth_attachment_format,
                )
                .into(),
                vuids: &["VUID-VkCommandBufferInheritanceRenderingInfo-depthAttachmentFormat-06200"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        violations.push_opt(validate_flags(
            "rasterization_samples",
            rasterization_samples.as_raw(),
            SAMPLE_COUNTS.as_raw(),
            FlagPolicy::OptionalSingleBit,
            &["VUID-VkCommandBufferInheritanceRenderingInfo-rasterizationSamples-parameter"],
            &[],
        ));

        violations
    }

    /// Validates the arguments of `vkCmdPushConstants`.
    ///
    /// # Safety
    ///
    /// `p_values` must be null or valid for `size` bytes.
    pub unsafe fn validate_cmd_push_constants(
        &self,
        _command_buffer: vk::CommandBuffer,
        layout: vk::PipelineLayout,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        size: u32,
        p_values: *const std::ffi::c_void,
    ) -> Violations {
        let mut violations = Violations::new();
        let max_size = self.capabilities().properties.max_push_constants_size;

        violations.push_opt(validate_required_handle(
            "layout",
            layout,
            &["VUID-vkCmdPushConstants-layout-parameter"],
        ));
        violations.push_opt(validate_flags(
            "stage_flags",
            stage_flags.as_raw(),
            SHADER_STAGES.as_raw(),
            FlagPolicy::Required,
            &["VUID-vkCmdPushConstants-stageFlags-parameter"],
            &["VUID-vkCmdPushConstants-stageFlags-requiredbitmask"],
        ));

        if size == 0 {
            violations.push(ValidationError {
                context: "size".into(),
                problem: "is 0".into(),
                vuids: &["VUID-vkCmdPushConstants-size-arraylength"],
                ..Default::default()
            });
        }

        violations.push_opt(validate_required_pointer(
            "p_values",
            p_values,
            &["VUID-vkCmdPushConstants-pValues-parameter"],
        ));

        if !is_aligned(offset.into(), 4) {
            violations.push(ValidationError {
                context: "offset".into(),
                problem: format!("is {}, which is not a multiple of 4", offset).into(),
                vuids: &["VUID-vkCmdPushConstants-offset-00368"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        if !is_aligned(size.into(), 4) {
            violations.push(ValidationError {
                context: "size".into(),
                problem: format!("is {}, which is not a multiple of 4", size).into(),
                vuids: &["VUID-vkCmdPushConstants-size-00369"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        if offset >= max_size {
            violations.push(ValidationError {
                context: "offset".into(),
                problem: format!(
                    "is {}, which is not less than the `max_push_constants_size` limit ({})",
                    offset, max_size,
                )
                .into(),
                vuids: &["VUID-vkCmdPushConstants-offset-00370"],
                ..Default::default()
            });
        } else if size > max_size - offset {
            violations.push(ValidationError {
                context: "size".into(),
                problem: format!(
                    "is {}, which is greater than the `max_push_constants_size` limit ({}) minus \
                    `offset` ({})",
                    size, max_size, offset,
                )
                .into(),
                vuids: &["VUID-vkCmdPushConstants-size-00371"],
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdBindVertexBuffers`.
    ///
    /// # Safety
    ///
    /// `p_buffers` and `p_offsets` must be null or valid for `binding_count` elements.
    pub unsafe fn validate_cmd_bind_vertex_buffers(
        &self,
        _command_buffer: vk::CommandBuffer,
        first_binding: u32,
        binding_count: u32,
        p_buffers: *const vk::Buffer,
        p_offsets: *const vk::DeviceSize,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let max_bindings = capabilities.properties.max_vertex_input_bindings;

        violations.append(validate_array(
            "binding_count",
            "p_buffers",
            binding_count,
            p_buffers,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCmdBindVertexBuffers-bindingCount-arraylength"],
                array_vuids: &["VUID-vkCmdBindVertexBuffers-pBuffers-parameter"],
            },
        ));
        violations.append(validate_array(
            "binding_count",
            "p_offsets",
            binding_count,
            p_offsets,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-vkCmdBindVertexBuffers-pOffsets-parameter"],
            },
        ));

        if first_binding >= max_bindings {
            violations.push(ValidationError {
                context: "first_binding".into(),
                problem: format!(
                    "is {}, which is not less than the `max_vertex_input_bindings` limit ({})",
                    first_binding, max_bindings,
                )
                .into(),
                vuids: &["VUID-vkCmdBindVertexBuffers-firstBinding-00624"],
                ..Default::default()
            });
        } else if u64::from(first_binding) + u64::from(binding_count) > u64::from(max_bindings) {
            violations.push(ValidationError {
                context: "first_binding".into(),
                problem: format!(
                    "plus `binding_count` is {} + {}, which is greater than the \
                    `max_vertex_input_bindings` limit ({})",
                    first_binding, binding_count, max_bindings,
                )
                .into(),
                vuids: &["VUID-vkCmdBindVertexBuffers-firstBinding-00625"],
                ..Default::default()
            });
        }

        let buffers = slice_or_empty(p_buffers, binding_count);
        let offsets = slice_or_empty(p_offsets, binding_count);

        for (index, buffer) in buffers.iter().enumerate() {
            if !buffer.is_null() {
                continue;
            }

            if !capabilities.features.null_descriptor {
                violations.push(ValidationError {
                    context: format!("p_buffers[{}]", index).into(),
                    problem: "is `VK_NULL_HANDLE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "null_descriptor",
                    )])]),
                    vuids: &["VUID-vkCmdBindVertexBuffers-pBuffers-04001"],
                    kind: ViolationKind::RequirementNotMet,
                });
            } else if offsets.get(index).is_some_and(|&offset| offset != 0) {
                violations.push(ValidationError {
                    context: format!("p_offsets[{}]", index).into(),
                    problem: "is not 0, but the corresponding buffer is `VK_NULL_HANDLE`".into(),
                    vuids: &["VUID-vkCmdBindVertexBuffers-pBuffers-04002"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdBindIndexBuffer`.
    pub fn validate_cmd_bind_index_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_required_handle(
            "buffer",
            buffer,
            &["VUID-vkCmdBindIndexBuffer-buffer-parameter"],
        ));

        if let Some(error) = validate_ranged_enum(
            "index_type",
            index_type.as_raw(),
            INDEX_TYPE_VALUES,
            &["VUID-vkCmdBindIndexBuffer-indexType-parameter"],
        ) {
            violations.push(error);
            return violations;
        }

        let index_size = match index_type {
            vk::IndexType::UINT8_EXT => 1,
            vk::IndexType::UINT16 => 2,
            vk::IndexType::UINT32 => 4,
            _ => {
                violations.push(ValidationError {
                    context: "index_type".into(),
                    problem: "is `VK_INDEX_TYPE_NONE_KHR`".into(),
                    vuids: &["VUID-vkCmdBindIndexBuffer-indexType-08786"],
                    ..Default::default()
                });
                return violations;
            }
        };

        if !is_aligned(offset, index_size) {
            violations.push(ValidationError {
                context: "offset".into(),
                problem: format!(
                    "is {}, which is not a multiple of the size of {:?} ({})",
                    offset, index_type, index_size,
                )
                .into(),
                vuids: &["VUID-vkCmdBindIndexBuffer-offset-08783"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdBindDescriptorSets`.
    ///
    /// # Safety
    ///
    /// `p_descriptor_sets` and `p_dynamic_offsets` must be null or valid for their counts.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn validate_cmd_bind_descriptor_sets(
        &self,
        _command_buffer: vk::CommandBuffer,
        pipeline_bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        descriptor_set_count: u32,
        p_descriptor_sets: *const vk::DescriptorSet,
        dynamic_offset_count: u32,
        p_dynamic_offsets: *const u32,
    ) -> Violations {
        let mut violations = Violations::new();
        let max_sets = self.capabilities().properties.max_bound_descriptor_sets;

        violations.push_opt(validate_ranged_enum(
            "pipeline_bind_point",
            pipeline_bind_point.as_raw(),
            PIPELINE_BIND_POINT_VALUES,
            &["VUID-vkCmdBindDescriptorSets-pipelineBindPoint-parameter"],
        ));
        violations.push_opt(validate_required_handle(
            "layout",
            layout,
            &["VUID-vkCmdBindDescriptorSets-layout-parameter"],
        ));
        violations.append(validate_array(
            "descriptor_set_count",
            "p_descriptor_sets",
            descriptor_set_count,
            p_descriptor_sets,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCmdBindDescriptorSets-descriptorSetCount-arraylength"],
                array_vuids: &["VUID-vkCmdBindDescriptorSets-pDescriptorSets-parameter"],
            },
        ));
        violations.append(validate_array(
            "dynamic_offset_count",
            "p_dynamic_offsets",
            dynamic_offset_count,
            p_dynamic_offsets,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-vkCmdBindDescriptorSets-pDynamicOffsets-parameter"],
            },
        ));

        if u64::from(first_set) + u64::from(descriptor_set_count) > u64::from(max_sets) {
            violations.push(ValidationError {
                context: "first_set".into(),
                problem: format!(
                    "plus `descriptor_set_count` is {} + {}, which is greater than the \
                    `max_bound_descriptor_sets` limit ({})",
                    first_set, descriptor_set_count, max_sets,
                )
                .into(),
                vuids: &["VUID-vkCmdBindDescriptorSets-firstSet-00360"],
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdPushDescriptorSetKHR`.
    ///
    /// # Safety
    ///
    /// `p_descriptor_writes` must be valid as described in the crate documentation.
    pub unsafe fn validate_cmd_push_descriptor_set_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        pipeline_bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        _set: u32,
        descriptor_write_count: u32,
        p_descriptor_writes: *const vk::WriteDescriptorSet<'_>,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_ranged_enum(
            "pipeline_bind_point",
            pipeline_bind_point.as_raw(),
            PIPELINE_BIND_POINT_VALUES,
            &["VUID-vkCmdPushDescriptorSetKHR-pipelineBindPoint-parameter"],
        ));
        violations.push_opt(validate_required_handle(
            "layout",
            layout,
            &["VUID-vkCmdPushDescriptorSetKHR-layout-parameter"],
        ));
        violations.append(validate_array(
            "descriptor_write_count",
            "p_descriptor_writes",
            descriptor_write_count,
            p_descriptor_writes,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCmdPushDescriptorSetKHR-descriptorWriteCount-arraylength"],
                array_vuids: &["VUID-vkCmdPushDescriptorSetKHR-pDescriptorWrites-parameter"],
            },
        ));

        // `dst_set` is ignored for push descriptors.
        for (index, write) in slice_or_empty(p_descriptor_writes, descriptor_write_count)
            .iter()
            .enumerate()
        {
            violations.append_with_context(self.validate_write_descriptor_set(write, false), || {
                format!("p_descriptor_writes[{}]", index)
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        tests::{collecting_validator, test_capabilities, test_validator, test_validator_with},
        StatelessValidator,
    };
    use ash::vk::{self, Handle};
    use std::ptr;

    fn pool() -> vk::CommandPool {
        vk::CommandPool::from_raw(0x30)
    }

    fn allocate(
        validator: &StatelessValidator,
        level: vk::CommandBufferLevel,
    ) -> [vk::CommandBuffer; 2] {
        let command_buffers = [
            vk::CommandBuffer::from_raw(0x31),
            vk::CommandBuffer::from_raw(0x32),
        ];
        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(pool())
            .level(level)
            .command_buffer_count(2);

        unsafe {
            assert!(validator.validate_allocate_command_buffers(&allocate_info).is_empty());
            validator.post_call_record_allocate_command_buffers(
                &allocate_info,
                command_buffers.as_ptr(),
                vk::Result::SUCCESS,
            );
        }

        command_buffers
    }

    #[test]
    fn secondary_command_buffer_lifecycle() {
        let (validator, _sink) = collecting_validator();
        let [first, second] = allocate(&validator, vk::CommandBufferLevel::SECONDARY);
        assert_eq!(validator.secondary_command_buffer_pool(first), Some(pool()));

        unsafe { validator.post_call_record_free_command_buffers(pool(), 1, &first) };
        assert_eq!(validator.secondary_command_buffer_pool(first), None);
        assert_eq!(validator.secondary_command_buffer_pool(second), Some(pool()));

        validator.post_call_record_destroy_command_pool(pool());
        assert_eq!(validator.secondary_command_buffer_pool(second), None);
    }

    #[test]
    fn primary_command_buffers_are_not_recorded() {
        let validator = test_validator();
        let [first, _] = allocate(&validator, vk::CommandBufferLevel::PRIMARY);
        assert_eq!(validator.secondary_command_buffer_pool(first), None);

        // A primary command buffer does not need inheritance info.
        let begin_info = vk::CommandBufferBeginInfo::default();
        let violations = unsafe { validator.validate_begin_command_buffer(first, &begin_info) };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn secondary_needs_inheritance_info() {
        let validator = test_validator();
        let [first, _] = allocate(&validator, vk::CommandBufferLevel::SECONDARY);

        let begin_info = vk::CommandBufferBeginInfo::default();
        let violations = unsafe { validator.validate_begin_command_buffer(first, &begin_info) };
        assert_vuid!(violations, "VUID-vkBeginCommandBuffer-commandBuffer-00051");
        assert_eq!(violations.len(), 1);

        let inheritance_info = vk::CommandBufferInheritanceInfo::default();
        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::RENDER_PASS_CONTINUE)
            .inheritance_info(&inheritance_info);
        let violations = unsafe { validator.validate_begin_command_buffer(first, &begin_info) };
        assert_vuid!(violations, "VUID-VkCommandBufferBeginInfo-flags-06000");

        let formats = [vk::Format::R8G8B8A8_UNORM];
        let mut rendering_info = vk::CommandBufferInheritanceRenderingInfo::default()
            .color_attachment_formats(&formats)
            .depth_attachment_format(vk::Format::D32_SFLOAT)
            .stencil_attachment_format(vk::Format::S8_UINT)
            .rasterization_samples(vk::SampleCountFlags::TYPE_1);
        let inheritance_info =
            vk::CommandBufferInheritanceInfo::default().push_next(&mut rendering_info);
        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::RENDER_PASS_CONTINUE)
            .inheritance_info(&inheritance_info);
        let violations = unsafe { validator.validate_begin_command_buffer(first, &begin_info) };
        assert_vuid!(
            violations,
            "VUID-VkCommandBufferInheritanceRenderingInfo-depthAttachmentFormat-06200",
        );
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn inherited_queries_need_features() {
        let mut capabilities = test_capabilities();
        capabilities.features.inherited_queries = false;
        capabilities.features.pipeline_statistics_query = false;
        let validator = test_validator_with(capabilities);
        let [first, _] = allocate(&validator, vk::CommandBufferLevel::SECONDARY);

        let inheritance_info = vk::CommandBufferInheritanceInfo::default()
            .occlusion_query_enable(true)
            .query_flags(vk::QueryControlFlags::PRECISE)
            .pipeline_statistics(vk::QueryPipelineStatisticFlags::CLIPPING_INVOCATIONS);
        let begin_info = vk::CommandBufferBeginInfo::default().inheritance_info(&inheritance_info);
        let violations = unsafe { validator.validate_begin_command_buffer(first, &begin_info) };
        assert_vuid!(violations, "VUID-VkCommandBufferInheritanceInfo-occlusionQueryEnable-00056");
        assert_vuid!(violations, "VUID-VkCommandBufferInheritanceInfo-queryFlags-02788");
        assert_vuid!(violations, "VUID-VkCommandBufferInheritanceInfo-pipelineStatistics-00058");
        assert_eq!(violations.len(), 3, "{}", violations);
    }

    #[test]
    fn push_constant_ranges() {
        let validator = test_validator();
        let data = [0u8; 8];
        let layout = vk::PipelineLayout::from_raw(0x20);

        let violations = unsafe {
            validator.validate_cmd_push_constants(
                vk::CommandBuffer::null(),
                layout,
                vk::ShaderStageFlags::VERTEX,
                252,
                8,
                data.as_ptr().cast(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdPushConstants-size-00371");
        assert_eq!(violations.len(), 1, "{}", violations);

        let violations = unsafe {
            validator.validate_cmd_push_constants(
                vk::CommandBuffer::null(),
                layout,
                vk::ShaderStageFlags::empty(),
                2,
                0,
                ptr::null(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdPushConstants-stageFlags-requiredbitmask");
        assert_vuid!(violations, "VUID-vkCmdPushConstants-size-arraylength");
        assert_vuid!(violations, "VUID-vkCmdPushConstants-pValues-parameter");
        assert_vuid!(violations, "VUID-vkCmdPushConstants-offset-00368");
        assert_no_vuid!(violations, "VUID-vkCmdPushConstants-size-00369");
    }

    #[test]
    fn bind_buffers() {
        let mut capabilities = test_capabilities();
        capabilities.features.null_descriptor = false;
        let validator = test_validator_with(capabilities);
        let buffers = [vk::Buffer::from_raw(0x40), vk::Buffer::null()];
        let offsets = [0, 0];

        let violations = unsafe {
            validator.validate_cmd_bind_vertex_buffers(
                vk::CommandBuffer::null(),
                31,
                2,
                buffers.as_ptr(),
                offsets.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdBindVertexBuffers-firstBinding-00625");
        assert_vuid!(violations, "VUID-vkCmdBindVertexBuffers-pBuffers-04001");
        assert_eq!(violations.len(), 2, "{}", violations);

        let violations = validator.validate_cmd_bind_index_buffer(
            vk::CommandBuffer::null(),
            buffers[0],
            6,
            vk::IndexType::UINT32,
        );
        assert_vuid!(violations, "VUID-vkCmdBindIndexBuffer-offset-08783");

        let violations = validator.validate_cmd_bind_index_buffer(
            vk::CommandBuffer::null(),
            buffers[0],
            6,
            vk::IndexType::UINT16,
        );
        assert!(violations.is_empty(), "{}", violations);
    }
}
