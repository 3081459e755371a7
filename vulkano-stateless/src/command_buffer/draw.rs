// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Indirect draws, dispatches, mesh tasks, and ray tracing dispatches.

use crate::{
    predicates::{is_aligned, validate_required_handle},
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, ViolationKind,
    Violations,
};
use ash::vk;
use std::mem::size_of;

/// The VUIDs that differ between the indirect draw commands.
struct IndirectDrawVuids {
    buffer: &'static [&'static str],
    offset: &'static [&'static str],
    multi_draw: &'static [&'static str],
    max_draw_count: &'static [&'static str],
    stride: &'static [&'static str],
}

const DRAW_INDIRECT_VUIDS: IndirectDrawVuids = IndirectDrawVuids {
    buffer: &["VUID-vkCmdDrawIndirect-buffer-parameter"],
    offset: &["VUID-vkCmdDrawIndirect-offset-02710"],
    multi_draw: &["VUID-vkCmdDrawIndirect-drawCount-02718"],
    max_draw_count: &["VUID-vkCmdDrawIndirect-drawCount-02719"],
    stride: &["VUID-vkCmdDrawIndirect-drawCount-00476"],
};

const DRAW_INDEXED_INDIRECT_VUIDS: IndirectDrawVuids = IndirectDrawVuids {
    buffer: &["VUID-vkCmdDrawIndexedIndirect-buffer-parameter"],
    offset: &["VUID-vkCmdDrawIndexedIndirect-offset-02710"],
    multi_draw: &["VUID-vkCmdDrawIndexedIndirect-drawCount-02718"],
    max_draw_count: &["VUID-vkCmdDrawIndexedIndirect-drawCount-02719"],
    stride: &["VUID-vkCmdDrawIndexedIndirect-drawCount-00528"],
};

/// The VUIDs that differ between the two trace rays commands.
struct TraceRaysVuids {
    raygen_size: &'static [&'static str],
    raygen_address: &'static [&'static str],
    miss_address: &'static [&'static str],
    miss_stride: &'static [&'static str],
    miss_max_stride: &'static [&'static str],
    hit_address: &'static [&'static str],
    hit_stride: &'static [&'static str],
    hit_max_stride: &'static [&'static str],
    callable_address: &'static [&'static str],
    callable_stride: &'static [&'static str],
    callable_max_stride: &'static [&'static str],
}

const TRACE_RAYS_VUIDS: TraceRaysVuids = TraceRaysVuids {
    raygen_size: &["VUID-vkCmdTraceRaysKHR-size-04023"],
    raygen_address: &["VUID-vkCmdTraceRaysKHR-pRayGenShaderBindingTable-03682"],
    miss_address: &["VUID-vkCmdTraceRaysKHR-pMissShaderBindingTable-03685"],
    miss_stride: &["VUID-vkCmdTraceRaysKHR-stride-03686"],
    miss_max_stride: &["VUID-vkCmdTraceRaysKHR-stride-04029"],
    hit_address: &["VUID-vkCmdTraceRaysKHR-pHitShaderBindingTable-03689"],
    hit_stride: &["VUID-vkCmdTraceRaysKHR-stride-03690"],
    hit_max_stride: &["VUID-vkCmdTraceRaysKHR-stride-04035"],
    callable_address: &["VUID-vkCmdTraceRaysKHR-pCallableShaderBindingTable-03693"],
    callable_stride: &["VUID-vkCmdTraceRaysKHR-stride-03694"],
    callable_max_stride: &["VUID-vkCmdTraceRaysKHR-stride-04041"],
};

const TRACE_RAYS_INDIRECT_VUIDS: TraceRaysVuids = TraceRaysVuids {
    raygen_size: &["VUID-vkCmdTraceRaysIndirectKHR-size-04023"],
    raygen_address: &["VUID-vkCmdTraceRaysIndirectKHR-pRayGenShaderBindingTable-03682"],
    miss_address: &["VUID-vkCmdTraceRaysIndirectKHR-pMissShaderBindingTable-03685"],
    miss_stride: &["VUID-vkCmdTraceRaysIndirectKHR-stride-03686"],
    miss_max_stride: &["VUID-vkCmdTraceRaysIndirectKHR-stride-04029"],
    hit_address: &["VUID-vkCmdTraceRaysIndirectKHR-pHitShaderBindingTable-03689"],
    hit_stride: &["VUID-vkCmdTraceRaysIndirectKHR-stride-03690"],
    hit_max_stride: &["VUID-vkCmdTraceRaysIndirectKHR-stride-04035"],
    callable_address: &["VUID-vkCmdTraceRaysIndirectKHR-pCallableShaderBindingTable-03693"],
    callable_stride: &["VUID-vkCmdTraceRaysIndirectKHR-stride-03694"],
    callable_max_stride: &["VUID-vkCmdTraceRaysIndirectKHR-stride-04041"],
};

impl StatelessValidator {
    /// Validates the arguments of `vkCmdDrawIndirect`.
    pub fn validate_cmd_draw_indirect(
        &self,
        _command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        draw_count: u32,
        stride: u32,
    ) -> Violations {
        self.validate_indirect_draw(
            buffer,
            offset,
            draw_count,
            stride,
            size_of::<vk::DrawIndirectCommand>() as u32,
            &DRAW_INDIRECT_VUIDS,
        )
    }

    /// Validates the arguments of `vkCmdDrawIndexedIndirect`.
    pub fn validate_cmd_draw_indexed_indirect(
        &self,
        _command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        draw_count: u32,
        stride: u32,
    ) -> Violations {
        self.validate_indirect_draw(
            buffer,
            offset,
            draw_count,
            stride,
            size_of::<vk::DrawIndexedIndirectCommand>() as u32,
            &DRAW_INDEXED_INDIRECT_VUIDS,
        )
    }

    fn validate_indirect_draw(
        &self,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        draw_count: u32,
        stride: u32,
        command_size: u32,
        vuids: &IndirectDrawVuids,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let max_draw_count = capabilities.properties.max_draw_indirect_count;

        violations.push_opt(validate_required_handle("buffer", buffer, vuids.buffer));

        if !is_aligned(offset, 4) {
            violations.push(ValidationError {
                context: "offset".into(),
                problem: format!("is {}, which is not a multiple of 4", offset).into(),
                vuids: vuids.offset,
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        if draw_count > 1 && !capabilities.features.multi_draw_indirect {
            violations.push(ValidationError {
                context: "draw_count".into(),
                problem: format!("is {}, which is greater than 1", draw_count).into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_draw_indirect",
                )])]),
                vuids: vuids.multi_draw,
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if draw_count > max_draw_count {
            violations.push(ValidationError {
                context: "draw_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_draw_indirect_count` limit ({})",
                    draw_count, max_draw_count,
                )
                .into(),
                vuids: vuids.max_draw_count,
                ..Default::default()
            });
        }

        if draw_count > 1 && (!is_aligned(stride.into(), 4) || stride < command_size) {
            violations.push(ValidationError {
                context: "stride".into(),
                problem: format!(
                    "is {}, but `draw_count` is greater than 1 and `stride` is not a multiple of \
                    4 that is at least the size of the indirect command ({})",
                    stride, command_size,
                )
                .into(),
                vuids: vuids.stride,
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdDrawIndirectCount`.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_cmd_draw_indirect_count(
        &self,
        _command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        count_buffer: vk::Buffer,
        count_buffer_offset: vk::DeviceSize,
        _max_draw_count: u32,
        stride: u32,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();

        if !capabilities.features.draw_indirect_count {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[
                    RequiresAllOf(&[Requires::DeviceFeature("draw_indirect_count")]),
                    RequiresAllOf(&[Requires::DeviceExtension("khr_draw_indirect_count")]),
                ]),
                vuids: &["VUID-vkCmdDrawIndirectCount-None-04445"],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.push_opt(validate_required_handle(
            "buffer",
            buffer,
            &["VUID-vkCmdDrawIndirectCount-buffer-parameter"],
        ));
        violations.push_opt(validate_required_handle(
            "count_buffer",
            count_buffer,
            &["VUID-vkCmdDrawIndirectCount-countBuffer-parameter"],
        ));

        for (context, value, vuids) in [
            (
                "offset",
                offset,
                &["VUID-vkCmdDrawIndirectCount-offset-02710"] as &'static [&'static str],
            ),
            (
                "count_buffer_offset",
                count_buffer_offset,
                &["VUID-vkCmdDrawIndirectCount-countBufferOffset-02716"],
            ),
        ] {
            if !is_aligned(value, 4) {
                violations.push(ValidationError {
                    context: context.into(),
                    problem: format!("is {}, which is not a multiple of 4", value).into(),
                    vuids,
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }
        }

        let command_size = size_of::<vk::DrawIndirectCommand>() as u32;

        if !is_aligned(stride.into(), 4) || stride < command_size {
            violations.push(ValidationError {
                context: "stride".into(),
                problem: format!(
                    "is {}, which is not a multiple of 4 that is at least the size of \
                    `VkDrawIndirectCommand` ({})",
                    stride, command_size,
                )
                .into(),
                vuids: &["VUID-vkCmdDrawIndirectCount-stride-03110"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdDispatch`.
    pub fn validate_cmd_dispatch(
        &self,
        _command_buffer: vk::CommandBuffer,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) -> Violations {
        let max = self.capabilities().properties.max_compute_work_group_count;
        let mut violations = Violations::new();

        for (dimension, (count, vuids)) in [
            (
                group_count_x,
                &["VUID-vkCmdDispatch-groupCountX-00386"] as &'static [&'static str],
            ),
            (group_count_y, &["VUID-vkCmdDispatch-groupCountY-00387"]),
            (group_count_z, &["VUID-vkCmdDispatch-groupCountZ-00388"]),
        ]
        .into_iter()
        .enumerate()
        {
            if count > max[dimension] {
                violations.push(ValidationError {
                    context: ["group_count_x", "group_count_y", "group_count_z"][dimension].into(),
                    problem: format!(
                        "is {}, which is greater than the `max_compute_work_group_count[{}]` \
                        limit ({})",
                        count, dimension, max[dimension],
                    )
                    .into(),
                    vuids,
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdDispatchBase`.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_cmd_dispatch_base(
        &self,
        _command_buffer: vk::CommandBuffer,
        base_group_x: u32,
        base_group_y: u32,
        base_group_z: u32,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) -> Violations {
        let max = self.capabilities().properties.max_compute_work_group_count;
        let mut violations = Violations::new();

        let dimensions: [(u32, u32, &'static [&'static str], &'static [&'static str]); 3] = [
            (
                base_group_x,
                group_count_x,
                &["VUID-vkCmdDispatchBase-baseGroupX-00421"],
                &["VUID-vkCmdDispatchBase-groupCountX-00424"],
            ),
            (
                base_group_y,
                group_count_y,
                &["VUID-vkCmdDispatchBase-baseGroupX-00422"],
                &["VUID-vkCmdDispatchBase-groupCountY-00425"],
            ),
            (
                base_group_z,
                group_count_z,
                &["VUID-vkCmdDispatchBase-baseGroupZ-00423"],
                &["VUID-vkCmdDispatchBase-groupCountZ-00426"],
            ),
        ];

        for (dimension, (base, count, vuids_base, vuids_count)) in
            dimensions.into_iter().enumerate()
        {
            let axis = ["x", "y", "z"][dimension];

            if base >= max[dimension] {
                violations.push(ValidationError {
                    context: format!("base_group_{}", axis).into(),
                    problem: format!(
                        "is {}, which is not less than the `max_compute_work_group_count[{}]` \
                        limit ({})",
                        base, dimension, max[dimension],
                    )
                    .into(),
                    vuids: vuids_base,
                    ..Default::default()
                });
            } else if count > max[dimension] - base {
                violations.push(ValidationError {
                    context: format!("group_count_{}", axis).into(),
                    problem: format!(
                        "is {}, which is greater than the `max_compute_work_group_count[{}]` \
                        limit ({}) minus `base_group_{}` ({})",
                        count, dimension, max[dimension], axis, base,
                    )
                    .into(),
                    vuids: vuids_count,
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdDispatchIndirect`.
    pub fn validate_cmd_dispatch_indirect(
        &self,
        _command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_required_handle(
            "buffer",
            buffer,
            &["VUID-vkCmdDispatchIndirect-buffer-parameter"],
        ));

        if !is_aligned(offset, 4) {
            violations.push(ValidationError {
                context: "offset".into(),
                problem: format!("is {}, which is not a multiple of 4", offset).into(),
                vuids: &["VUID-vkCmdDispatchIndirect-offset-02710"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdDrawMeshTasksEXT`.
    ///
    /// Whether the bound pipeline has a task shader is not known here, so the group counts are
    /// only rejected when they exceed both the task and the mesh limits.
    pub fn validate_cmd_draw_mesh_tasks_ext(
        &self,
        _command_buffer: vk::CommandBuffer,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) -> Violations {
        let properties = &self.capabilities().properties;
        let mut violations = Violations::new();

        let (Some(task_count), Some(mesh_count), Some(task_total), Some(mesh_total)) = (
            properties.max_task_work_group_count,
            properties.max_mesh_work_group_count,
            properties.max_task_work_group_total_count,
            properties.max_mesh_work_group_total_count,
        ) else {
            return violations;
        };

        let counts = [group_count_x, group_count_y, group_count_z];
        let vuids: [&'static [&'static str]; 3] = [
            &[
                "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07322",
                "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07326",
            ],
            &[
                "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07323",
                "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07327",
            ],
            &[
                "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07324",
                "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07328",
            ],
        ];

        for (dimension, &count) in counts.iter().enumerate() {
            let limit = task_count[dimension].max(mesh_count[dimension]);

            if count > limit {
                violations.push(ValidationError {
                    context: ["group_count_x", "group_count_y", "group_count_z"][dimension].into(),
                    problem: format!(
                        "is {}, which is greater than both the task and the mesh work group \
                        count limits ({})",
                        count, limit,
                    )
                    .into(),
                    vuids: vuids[dimension],
                    ..Default::default()
                });
            }
        }

        // Three `u32` factors can exceed `u64`.
        let total = counts.iter().map(|&count| u128::from(count)).product::<u128>();
        let total_limit = task_total.max(mesh_total);

        if total > u128::from(total_limit) {
            violations.push(ValidationError {
                context: "group_count_x".into(),
                problem: format!(
                    "times `group_count_y` times `group_count_z` is {}, which is greater than \
                    both the task and the mesh total work group count limits ({})",
                    total, total_limit,
                )
                .into(),
                vuids: &[
                    "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07325",
                    "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07329",
                ],
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdTraceRaysKHR`.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_cmd_trace_rays_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        raygen_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        miss_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        hit_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        callable_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Violations {
        let properties = &self.capabilities().properties;
        let mut violations = self.validate_shader_binding_tables(
            [
                raygen_shader_binding_table,
                miss_shader_binding_table,
                hit_shader_binding_table,
                callable_shader_binding_table,
            ],
            &TRACE_RAYS_VUIDS,
        );

        let extent = [width, height, depth];
        let vuids: [&'static [&'static str]; 3] = [
            &["VUID-vkCmdTraceRaysKHR-width-03638"],
            &["VUID-vkCmdTraceRaysKHR-height-03639"],
            &["VUID-vkCmdTraceRaysKHR-depth-03640"],
        ];

        for (dimension, &value) in extent.iter().enumerate() {
            let limit = u64::from(properties.max_compute_work_group_count[dimension])
                * u64::from(properties.max_compute_work_group_size[dimension]);

            if u64::from(value) > limit {
                violations.push(ValidationError {
                    context: ["width", "height", "depth"][dimension].into(),
                    problem: format!(
                        "is {}, which is greater than `max_compute_work_group_count[{d}]` times \
                        `max_compute_work_group_size[{d}]` ({})",
                        value,
                        limit,
                        d = dimension,
                    )
                    .into(),
                    vuids: vuids[dimension],
                    ..Default::default()
                });
            }
        }

        if let Some(max_invocations) = properties.max_ray_dispatch_invocation_count {
            let invocations = extent.iter().map(|&value| u128::from(value)).product::<u128>();

            if invocations > u128::from(max_invocations) {
                violations.push(ValidationError {
                    context: "width".into(),
                    problem: format!(
                        "times `height` times `depth` is {}, which is greater than the \
                        `max_ray_dispatch_invocation_count` limit ({})",
                        invocations, max_invocations,
                    )
                    .into(),
                    vuids: &["VUID-vkCmdTraceRaysKHR-width-03641"],
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdTraceRaysIndirectKHR`.
    pub fn validate_cmd_trace_rays_indirect_khr(
        &self,
        _command_buffer: vk::CommandBuffer,
        raygen_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        miss_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        hit_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        callable_shader_binding_table: &vk::StridedDeviceAddressRegionKHR,
        indirect_device_address: vk::DeviceAddress,
    ) -> Violations {
        let mut violations = Violations::new();

        if !self
            .capabilities()
            .features
            .ray_tracing_pipeline_trace_rays_indirect
        {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "ray_tracing_pipeline_trace_rays_indirect",
                )])]),
                vuids: &[
                    "VUID-vkCmdTraceRaysIndirectKHR-rayTracingPipelineTraceRaysIndirect-03637",
                ],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.append(self.validate_shader_binding_tables(
            [
                raygen_shader_binding_table,
                miss_shader_binding_table,
                hit_shader_binding_table,
                callable_shader_binding_table,
            ],
            &TRACE_RAYS_INDIRECT_VUIDS,
        ));

        if !is_aligned(indirect_device_address, 4) {
            violations.push(ValidationError {
                context: "indirect_device_address".into(),
                problem: format!("is {:#x}, which is not a multiple of 4", indirect_device_address)
                    .into(),
                vuids: &["VUID-vkCmdTraceRaysIndirectKHR-indirectDeviceAddress-03634"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Checks the raygen, miss, hit and callable shader binding table regions, in that order.
    fn validate_shader_binding_tables(
        &self,
        [raygen, miss, hit, callable]: [&vk::StridedDeviceAddressRegionKHR; 4],
        vuids: &TraceRaysVuids,
    ) -> Violations {
        let properties = &self.capabilities().properties;
        let mut violations = Violations::new();

        // Without the extension properties there is nothing to compare against.
        let (Some(base_alignment), Some(handle_alignment), Some(max_stride)) = (
            properties.shader_group_base_alignment,
            properties.shader_group_handle_alignment,
            properties.max_shader_group_stride,
        ) else {
            return violations;
        };

        if raygen.size != raygen.stride {
            violations.push(ValidationError {
                context: "raygen_shader_binding_table.size".into(),
                problem: format!(
                    "is {}, which is not equal to `raygen_shader_binding_table.stride` ({})",
                    raygen.size, raygen.stride,
                )
                .into(),
                vuids: vuids.raygen_size,
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }

        let regions = [
            ("raygen_shader_binding_table", raygen, vuids.raygen_address, None),
            (
                "miss_shader_binding_table",
                miss,
                vuids.miss_address,
                Some((vuids.miss_stride, vuids.miss_max_stride)),
            ),
            (
                "hit_shader_binding_table",
                hit,
                vuids.hit_address,
                Some((vuids.hit_stride, vuids.hit_max_stride)),
            ),
            (
                "callable_shader_binding_table",
                callable,
                vuids.callable_address,
                Some((vuids.callable_stride, vuids.callable_max_stride)),
            ),
        ];

        for (context, region, vuids_address, vuids_stride) in regions {
            if !is_aligned(region.device_address, base_alignment.into()) {
                violations.push(ValidationError {
                    context: format!("{}.device_address", context).into(),
                    problem: format!(
                        "is {:#x}, which is not a multiple of the `shader_group_base_alignment` \
                        property ({})",
                        region.device_address, base_alignment,
                    )
                    .into(),
                    vuids: vuids_address,
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }

            let Some((vuids_alignment, vuids_max)) = vuids_stride else {
                continue;
            };

            if !is_aligned(region.stride, handle_alignment.into()) {
                violations.push(ValidationError {
                    context: format!("{}.stride", context).into(),
                    problem: format!(
                        "is {}, which is not a multiple of the `shader_group_handle_alignment` \
                        property ({})",
                        region.stride, handle_alignment,
                    )
                    .into(),
                    vuids: vuids_alignment,
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }

            if region.stride > u64::from(max_stride) {
                violations.push(ValidationError {
                    context: format!("{}.stride", context).into(),
                    problem: format!(
                        "is {}, which is greater than the `max_shader_group_stride` limit ({})",
                        region.stride, max_stride,
                    )
                    .into(),
                    vuids: vuids_max,
                    ..Default::default()
                });
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{test_capabilities, test_validator, test_validator_with};
    use ash::vk::{self, Handle};

    #[test]
    fn indirect_draws() {
        let mut capabilities = test_capabilities();
        capabilities.features.multi_draw_indirect = false;
        capabilities.properties.max_draw_indirect_count = 1;
        let validator = test_validator_with(capabilities);
        let buffer = vk::Buffer::from_raw(0x40);

        let violations =
            validator.validate_cmd_draw_indirect(vk::CommandBuffer::null(), buffer, 2, 3, 12);
        assert_vuid!(violations, "VUID-vkCmdDrawIndirect-offset-02710");
        assert_vuid!(violations, "VUID-vkCmdDrawIndirect-drawCount-02718");
        assert_vuid!(violations, "VUID-vkCmdDrawIndirect-drawCount-02719");
        assert_vuid!(violations, "VUID-vkCmdDrawIndirect-drawCount-00476");
        assert_eq!(violations.len(), 4, "{}", violations);

        // A single draw ignores the stride.
        let violations =
            validator.validate_cmd_draw_indexed_indirect(vk::CommandBuffer::null(), buffer, 0, 1, 0);
        assert!(violations.is_empty(), "{}", violations);

        let validator = test_validator();
        let violations = validator.validate_cmd_draw_indexed_indirect(
            vk::CommandBuffer::null(),
            buffer,
            0,
            2,
            16,
        );
        assert_vuid!(violations, "VUID-vkCmdDrawIndexedIndirect-drawCount-00528");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn indirect_count() {
        let mut capabilities = test_capabilities();
        capabilities.features.draw_indirect_count = false;
        let validator = test_validator_with(capabilities);
        let buffer = vk::Buffer::from_raw(0x40);

        let violations = validator.validate_cmd_draw_indirect_count(
            vk::CommandBuffer::null(),
            buffer,
            0,
            buffer,
            6,
            4,
            8,
        );
        assert_vuid!(violations, "VUID-vkCmdDrawIndirectCount-None-04445");
        assert_vuid!(violations, "VUID-vkCmdDrawIndirectCount-countBufferOffset-02716");
        assert_vuid!(violations, "VUID-vkCmdDrawIndirectCount-stride-03110");
        assert_eq!(violations.len(), 3, "{}", violations);
    }

    #[test]
    fn dispatch_limits() {
        let validator = test_validator();

        let violations = validator.validate_cmd_dispatch(vk::CommandBuffer::null(), 65536, 1, 1);
        assert_vuid!(violations, "VUID-vkCmdDispatch-groupCountX-00386");
        assert_eq!(violations.len(), 1);

        let violations = validator.validate_cmd_dispatch_base(
            vk::CommandBuffer::null(),
            65535,
            100,
            0,
            1,
            65436,
            65535,
        );
        assert_vuid!(violations, "VUID-vkCmdDispatchBase-baseGroupX-00421");
        assert_vuid!(violations, "VUID-vkCmdDispatchBase-groupCountY-00425");
        assert_eq!(violations.len(), 2, "{}", violations);

        let violations =
            validator.validate_cmd_dispatch_indirect(vk::CommandBuffer::null(), vk::Buffer::null(), 8);
        assert_vuid!(violations, "VUID-vkCmdDispatchIndirect-buffer-parameter");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn mesh_task_limits() {
        let validator = test_validator();

        assert!(validator
            .validate_cmd_draw_mesh_tasks_ext(vk::CommandBuffer::null(), 1024, 1024, 4)
            .is_empty());

        let violations =
            validator.validate_cmd_draw_mesh_tasks_ext(vk::CommandBuffer::null(), 65536, 64, 2);
        assert_vuid!(violations, "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07322");
        assert_vuid!(violations, "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07325");
        assert_eq!(violations.len(), 2, "{}", violations);

        let violations = validator.validate_cmd_draw_mesh_tasks_ext(
            vk::CommandBuffer::null(),
            u32::MAX,
            u32::MAX,
            u32::MAX,
        );
        assert_vuid!(violations, "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07322");
        assert_vuid!(violations, "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07323");
        assert_vuid!(violations, "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07324");
        assert_vuid!(violations, "VUID-vkCmdDrawMeshTasksEXT-TaskEXT-07325");
        assert_eq!(violations.len(), 4, "{}", violations);
    }

    #[test]
    fn trace_rays() {
        let validator = test_validator();
        let raygen = vk::StridedDeviceAddressRegionKHR {
            device_address: 0x1000,
            stride: 32,
            size: 64,
        };
        let miss = vk::StridedDeviceAddressRegionKHR {
            device_address: 0x1020,
            stride: 48,
            size: 96,
        };
        let empty = vk::StridedDeviceAddressRegionKHR::default();

        let violations = validator.validate_cmd_trace_rays_khr(
            vk::CommandBuffer::null(),
            &raygen,
            &miss,
            &empty,
            &empty,
            1 << 26,
            1,
            1,
        );
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-size-04023");
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-pMissShaderBindingTable-03685");
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-stride-03686");
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-width-03638");
        assert_eq!(violations.len(), 4, "{}", violations);

        let raygen = vk::StridedDeviceAddressRegionKHR {
            size: 32,
            ..raygen
        };
        let violations = validator.validate_cmd_trace_rays_indirect_khr(
            vk::CommandBuffer::null(),
            &raygen,
            &empty,
            &empty,
            &empty,
            0x2002,
        );
        assert_vuid!(violations, "VUID-vkCmdTraceRaysIndirectKHR-indirectDeviceAddress-03634");
        assert_eq!(violations.len(), 1, "{}", violations);

        let violations = validator.validate_cmd_trace_rays_khr(
            vk::CommandBuffer::null(),
            &raygen,
            &empty,
            &empty,
            &empty,
            u32::MAX,
            u32::MAX,
            u32::MAX,
        );
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-width-03638");
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-height-03639");
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-depth-03640");
        assert_vuid!(violations, "VUID-vkCmdTraceRaysKHR-width-03641");
        assert_eq!(violations.len(), 4, "{}", violations);
    }
}
