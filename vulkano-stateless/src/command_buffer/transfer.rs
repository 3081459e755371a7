// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Buffer copies, updates and fills, and clearing attachments inside a render pass.

use crate::{
    image::IMAGE_ASPECTS,
    predicates::{
        is_aligned, slice_or_empty, validate_array, validate_flags, validate_required_handle,
        validate_required_pointer, ArrayRules, FlagPolicy,
    },
    StatelessValidator, ValidationError, ViolationKind, Violations,
};
use ash::vk;
use std::ffi::c_void;

/// The largest `data_size` that `vkCmdUpdateBuffer` accepts.
const MAX_UPDATE_BUFFER_SIZE: vk::DeviceSize = 65536;

impl StatelessValidator {
    /// Validates the arguments of `vkCmdCopyBuffer`.
    ///
    /// # Safety
    ///
    /// `p_regions` must be null or valid for `region_count` elements.
    pub unsafe fn validate_cmd_copy_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
        src_buffer: vk::Buffer,
        dst_buffer: vk::Buffer,
        region_count: u32,
        p_regions: *const vk::BufferCopy,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_required_handle(
            "src_buffer",
            src_buffer,
            &["VUID-vkCmdCopyBuffer-srcBuffer-parameter"],
        ));
        violations.push_opt(validate_required_handle(
            "dst_buffer",
            dst_buffer,
            &["VUID-vkCmdCopyBuffer-dstBuffer-parameter"],
        ));
        violations.append(validate_array(
            "region_count",
            "p_regions",
            region_count,
            p_regions,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCmdCopyBuffer-regionCount-arraylength"],
                array_vuids: &["VUID-vkCmdCopyBuffer-pRegions-parameter"],
            },
        ));

        for (index, region) in slice_or_empty(p_regions, region_count).iter().enumerate() {
            if region.size == 0 {
                violations.push(ValidationError {
                    context: format!("p_regions[{}].size", index).into(),
                    problem: "is 0".into(),
                    vuids: &["VUID-VkBufferCopy-size-01988"],
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdUpdateBuffer`.
    ///
    /// # Safety
    ///
    /// `p_data` must be null or valid for `data_size` bytes.
    pub unsafe fn validate_cmd_update_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
        dst_buffer: vk::Buffer,
        dst_offset: vk::DeviceSize,
        data_size: vk::DeviceSize,
        p_data: *const c_void,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_required_handle(
            "dst_buffer",
            dst_buffer,
            &["VUID-vkCmdUpdateBuffer-dstBuffer-parameter"],
        ));
        violations.push_opt(validate_required_pointer(
            "p_data",
            p_data,
            &["VUID-vkCmdUpdateBuffer-pData-parameter"],
        ));

        if !is_aligned(dst_offset, 4) {
            violations.push(ValidationError {
                context: "dst_offset".into(),
                problem: format!("is {}, which is not a multiple of 4", dst_offset).into(),
                vuids: &["VUID-vkCmdUpdateBuffer-dstOffset-00036"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        if data_size == 0 {
            violations.push(ValidationError {
                context: "data_size".into(),
                problem: "is 0".into(),
                vuids: &["VUID-vkCmdUpdateBuffer-dataSize-arraylength"],
                ..Default::default()
            });
        } else if data_size > MAX_UPDATE_BUFFER_SIZE {
            violations.push(ValidationError {
                context: "data_size".into(),
                problem: format!(
                    "is {}, which is greater than {}",
                    data_size, MAX_UPDATE_BUFFER_SIZE,
                )
                .into(),
                vuids: &["VUID-vkCmdUpdateBuffer-dataSize-00037"],
                ..Default::default()
            });
        }

        if !is_aligned(data_size, 4) {
            violations.push(ValidationError {
                context: "data_size".into(),
                problem: format!("is {}, which is not a multiple of 4", data_size).into(),
                vuids: &["VUID-vkCmdUpdateBuffer-dataSize-00038"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        violations
    }

    /// Validates the arguments of `vkCmdFillBuffer`.
    pub fn validate_cmd_fill_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
        dst_buffer: vk::Buffer,
        dst_offset: vk::DeviceSize,
        size: vk::DeviceSize,
        _data: u32,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_required_handle(
            "dst_buffer",
            dst_buffer,
            &["VUID-vkCmdFillBuffer-dstBuffer-parameter"],
        ));

        if !is_aligned(dst_offset, 4) {
            violations.push(ValidationError {
                context: "dst_offset".into(),
                problem: format!("is {}, which is not a multiple of 4", dst_offset).into(),
                vuids: &["VUID-vkCmdFillBuffer-dstOffset-00025"],
                kind: ViolationKind::Misaligned,
                ..Default::default()
            });
        }

        if size != vk::WHOLE_SIZE {
            if size == 0 {
                violations.push(ValidationError {
                    context: "size".into(),
                    problem: "is 0".into(),
                    vuids: &["VUID-vkCmdFillBuffer-size-00026"],
                    ..Default::default()
                });
            } else if !is_aligned(size, 4) {
                violations.push(ValidationError {
                    context: "size".into(),
                    problem: format!("is {}, which is not a multiple of 4", size).into(),
                    vuids: &["VUID-vkCmdFillBuffer-size-00028"],
                    kind: ViolationKind::Misaligned,
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCmdClearAttachments`.
    ///
    /// # Safety
    ///
    /// `p_attachments` and `p_rects` must be null or valid for their counts.
    pub unsafe fn validate_cmd_clear_attachments(
        &self,
        _command_buffer: vk::CommandBuffer,
        attachment_count: u32,
        p_attachments: *const vk::ClearAttachment,
        rect_count: u32,
        p_rects: *const vk::ClearRect,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.append(validate_array(
            "attachment_count",
            "p_attachments",
            attachment_count,
            p_attachments,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCmdClearAttachments-attachmentCount-arraylength"],
                array_vuids: &["VUID-vkCmdClearAttachments-pAttachments-parameter"],
            },
        ));
        violations.append(validate_array(
            "rect_count",
            "p_rects",
            rect_count,
            p_rects,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCmdClearAttachments-rectCount-arraylength"],
                array_vuids: &["VUID-vkCmdClearAttachments-pRects-parameter"],
            },
        ));

        for (index, attachment) in slice_or_empty(p_attachments, attachment_count)
            .iter()
            .enumerate()
        {
            violations.append_with_context(validate_clear_attachment(attachment), || {
                format!("p_attachments[{}]", index)
            });
        }

        for (index, rect) in slice_or_empty(p_rects, rect_count).iter().enumerate() {
            let extent = rect.rect.extent;

            for (context, value, vuids) in [
                (
                    "rect.extent.width",
                    extent.width,
                    &["VUID-vkCmdClearAttachments-rect-02682"] as &'static [&'static str],
                ),
                (
                    "rect.extent.height",
                    extent.height,
                    &["VUID-vkCmdClearAttachments-rect-02683"],
                ),
                (
                    "layer_count",
                    rect.layer_count,
                    &["VUID-vkCmdClearAttachments-layerCount-01934"],
                ),
            ] {
                if value == 0 {
                    violations.push(ValidationError {
                        context: format!("p_rects[{}].{}", index, context).into(),
                        problem: "is 0".into(),
                        vuids,
                        ..Default::default()
                    });
                }
            }
        }

        violations
    }
}

fn validate_clear_attachment(attachment: &vk::ClearAttachment) -> Violations {
    let mut violations = Violations::new();
    let aspect_mask = attachment.aspect_mask;

    violations.push_opt(validate_flags(
        "aspect_mask",
        aspect_mask.as_raw(),
        IMAGE_ASPECTS.as_raw(),
        FlagPolicy::Required,
        &["VUID-VkClearAttachment-aspectMask-parameter"],
        &["VUID-VkClearAttachment-aspectMask-requiredbitmask"],
    ));

    if aspect_mask.contains(vk::ImageAspectFlags::COLOR)
        && aspect_mask.intersects(vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL)
    {
        violations.push(ValidationError {
            context: "aspect_mask".into(),
            problem: "contains both `VK_IMAGE_ASPECT_COLOR_BIT` and a depth or stencil aspect"
                .into(),
            vuids: &["VUID-VkClearAttachment-aspectMask-00019"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if aspect_mask.contains(vk::ImageAspectFlags::METADATA) {
        violations.push(ValidationError {
            context: "aspect_mask".into(),
            problem: "contains `VK_IMAGE_ASPECT_METADATA_BIT`".into(),
            vuids: &["VUID-VkClearAttachment-aspectMask-00020"],
            ..Default::default()
        });
    }

    if aspect_mask.intersects(
        vk::ImageAspectFlags::MEMORY_PLANE_0_EXT
            | vk::ImageAspectFlags::MEMORY_PLANE_1_EXT
            | vk::ImageAspectFlags::MEMORY_PLANE_2_EXT
            | vk::ImageAspectFlags::MEMORY_PLANE_3_EXT,
    ) {
        violations.push(ValidationError {
            context: "aspect_mask".into(),
            problem: "contains a `VK_IMAGE_ASPECT_MEMORY_PLANE_*_BIT_EXT` aspect".into(),
            vuids: &["VUID-VkClearAttachment-aspectMask-02246"],
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::tests::test_validator;
    use ash::vk::{self, Handle};
    use std::ptr;

    #[test]
    fn copy_and_update() {
        let validator = test_validator();
        let buffer = vk::Buffer::from_raw(0x40);
        let regions = [
            vk::BufferCopy {
                src_offset: 0,
                dst_offset: 0,
                size: 16,
            },
            vk::BufferCopy {
                src_offset: 16,
                dst_offset: 16,
                size: 0,
            },
        ];

        let violations = unsafe {
            validator.validate_cmd_copy_buffer(
                vk::CommandBuffer::null(),
                buffer,
                buffer,
                2,
                regions.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-VkBufferCopy-size-01988");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].context, "p_regions[1].size");

        let violations = unsafe {
            validator.validate_cmd_update_buffer(
                vk::CommandBuffer::null(),
                buffer,
                2,
                65538,
                ptr::null(),
            )
        };
        assert_vuid!(violations, "VUID-vkCmdUpdateBuffer-pData-parameter");
        assert_vuid!(violations, "VUID-vkCmdUpdateBuffer-dstOffset-00036");
        assert_vuid!(violations, "VUID-vkCmdUpdateBuffer-dataSize-00037");
        assert_vuid!(violations, "VUID-vkCmdUpdateBuffer-dataSize-00038");
        assert_eq!(violations.len(), 4, "{}", violations);
    }

    #[test]
    fn fill_whole_size() {
        let validator = test_validator();
        let buffer = vk::Buffer::from_raw(0x40);

        assert!(validator
            .validate_cmd_fill_buffer(vk::CommandBuffer::null(), buffer, 0, vk::WHOLE_SIZE, 0)
            .is_empty());

        let violations =
            validator.validate_cmd_fill_buffer(vk::CommandBuffer::null(), buffer, 4, 6, 0);
        assert_vuid!(violations, "VUID-vkCmdFillBuffer-size-00028");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn clear_attachments() {
        let validator = test_validator();
        let attachments = [vk::ClearAttachment {
            aspect_mask: vk::ImageAspectFlags::COLOR | vk::ImageAspectFlags::DEPTH,
            color_attachment: 0,
            clear_value: vk::ClearValue::default(),
        }];
        let rects = [vk::ClearRect {
            rect: vk::Rect2D {
                offset: vk::Offset2D::default(),
                extent: vk::Extent2D {
                    width: 0,
                    height: 16,
                },
            },
            base_array_layer: 0,
            layer_count: 0,
        }];

        let violations = unsafe {
            validator.validate_cmd_clear_attachments(
                vk::CommandBuffer::null(),
                1,
                attachments.as_ptr(),
                1,
                rects.as_ptr(),
            )
        };
        assert_vuid!(violations, "VUID-VkClearAttachment-aspectMask-00019");
        assert_vuid!(violations, "VUID-vkCmdClearAttachments-rect-02682");
        assert_vuid!(violations, "VUID-vkCmdClearAttachments-layerCount-01934");
        assert_eq!(violations.len(), 3, "{}", violations);
    }
}
