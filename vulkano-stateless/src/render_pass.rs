// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Render passes and dynamic rendering.
//!
//! `vkCreateRenderPass` and `vkCreateRenderPass2` describe the same things with different
//! structures. Both are read into the same views of attachments and subpasses, and checked by
//! the same rules with the VUIDs of the entry point that was called.
//!
//! When a render pass is created successfully, the attachment usage of each of its subpasses is
//! recorded, so that graphics pipeline creation can tell which fragment states it needs.

use crate::{
    chain::{find_in_chain, AllowedStruct, ChainRules},
    device::{RenderPassUsage, SubpassUsage},
    format::{is_depth_or_stencil, FORMAT_VALUES},
    image::{IMAGE_LAYOUT_VALUES, SAMPLE_COUNTS},
    predicates::{
        slice_or_empty, sum_exceeds_i32, validate_array, validate_flags, validate_ranged_enum,
        validate_struct_type, validate_struct_type_array, ArrayRules, FlagPolicy,
    },
    sync::{ACCESS_FLAGS, DEPENDENCY_FLAGS, PIPELINE_STAGES},
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk::{self, Handle};
use smallvec::SmallVec;
use std::ops::RangeInclusive;
use tracing::debug;

const ATTACHMENT_LOAD_OP_VALUES: &[RangeInclusive<i32>] =
    enum_values!(AttachmentLoadOp { LOAD..=DONT_CARE, NONE_KHR });

const ATTACHMENT_STORE_OP_VALUES: &[RangeInclusive<i32>] =
    enum_values!(AttachmentStoreOp { STORE..=DONT_CARE, NONE });

const RESOLVE_MODES: vk::ResolveModeFlags =
    flags_mask!(ResolveModeFlags { SAMPLE_ZERO, AVERAGE, MIN, MAX });

const RENDERING_FLAGS: vk::RenderingFlags = flags_mask!(RenderingFlags {
    CONTENTS_SECONDARY_COMMAND_BUFFERS,
    SUSPENDING,
    RESUMING,
});

const MULTIVIEW_REQUIREMENT: RequiresOneOf = RequiresOneOf(&[
    RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
    RequiresAllOf(&[Requires::DeviceExtension("khr_multiview")]),
]);

const RENDER_PASS_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::RenderPassMultiviewCreateInfo<'static>>()
            .requires(MULTIVIEW_REQUIREMENT),
        AllowedStruct::of::<vk::RenderPassInputAttachmentAspectCreateInfo<'static>>().requires(
            RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_maintenance2")]),
            ]),
        ),
    ],
    unique: true,
    vuids_next: &["VUID-VkRenderPassCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkRenderPassCreateInfo-sType-unique"],
};

const RENDER_PASS_CREATE_INFO2_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkRenderPassCreateInfo2-pNext-pNext"],
    vuids_unique: &["VUID-VkRenderPassCreateInfo2-sType-unique"],
};

const SUBPASS_DESCRIPTION2_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::of::<vk::SubpassDescriptionDepthStencilResolve<'static>>()
        .requires(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_2)]),
            RequiresAllOf(&[Requires::DeviceExtension("khr_depth_stencil_resolve")]),
        ]))],
    unique: true,
    vuids_next: &["VUID-VkSubpassDescription2-pNext-pNext"],
    vuids_unique: &["VUID-VkSubpassDescription2-sType-unique"],
};

const RENDERING_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DeviceGroupRenderPassBeginInfo<'static>>().requires(
            RequiresOneOf(&[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_device_group")]),
            ]),
        ),
    ],
    unique: true,
    vuids_next: &["VUID-VkRenderingInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkRenderingInfo-sType-unique"],
};

/// The VUIDs that differ between the two render pass creation entry points.
struct RenderPassVuids {
    attachment_format: &'static [&'static str],
    attachment_final_layout: &'static [&'static str],
    attachment_samples: &'static [&'static str],
    attachment_load_op: &'static [&'static str],
    attachment_store_op: &'static [&'static str],
    subpass_count: &'static [&'static str],
    subpass_bind_point: &'static [&'static str],
    subpass_color_count: &'static [&'static str],
    subpass_attachment_index: &'static [&'static str],
    subpass_preserve_unused: &'static [&'static str],
    subpass_preserve_used: &'static [&'static str],
    subpass_color_format: &'static [&'static str],
    subpass_depth_format: &'static [&'static str],
    reference_layout: &'static [&'static str],
    dependency_both_external: &'static [&'static str],
    dependency_order: &'static [&'static str],
    dependency_src_index: &'static [&'static str],
    dependency_dst_index: &'static [&'static str],
    dependency_stage_mask: &'static [&'static str],
    dependency_access_mask: &'static [&'static str],
    dependency_flags: &'static [&'static str],
}

const RENDER_PASS_VUIDS: RenderPassVuids = RenderPassVuids {
    attachment_format: &["VUID-VkAttachmentDescription-format-06698"],
    attachment_final_layout: &["VUID-VkAttachmentDescription-finalLayout-00843"],
    attachment_samples: &["VUID-VkAttachmentDescription-samples-parameter"],
    attachment_load_op: &["VUID-VkAttachmentDescription-loadOp-parameter"],
    attachment_store_op: &["VUID-VkAttachmentDescription-storeOp-parameter"],
    subpass_count: &["VUID-VkRenderPassCreateInfo-subpassCount-arraylength"],
    subpass_bind_point: &["VUID-VkSubpassDescription-pipelineBindPoint-04952"],
    subpass_color_count: &["VUID-VkSubpassDescription-colorAttachmentCount-00845"],
    subpass_attachment_index: &["VUID-VkRenderPassCreateInfo-attachment-00834"],
    subpass_preserve_unused: &["VUID-VkSubpassDescription-attachment-00853"],
    subpass_preserve_used: &["VUID-VkSubpassDescription-pPreserveAttachments-00854"],
    subpass_color_format: &["VUID-VkSubpassDescription-pColorAttachments-02648"],
    subpass_depth_format: &["VUID-VkSubpassDescription-pDepthStencilAttachment-02650"],
    reference_layout: &["VUID-VkAttachmentReference-layout-03077"],
    dependency_both_external: &["VUID-VkSubpassDependency-srcSubpass-00865"],
    dependency_order: &["VUID-VkSubpassDependency-srcSubpass-00864"],
    dependency_src_index: &["VUID-VkRenderPassCreateInfo-srcSubpass-02517"],
    dependency_dst_index: &["VUID-VkRenderPassCreateInfo-dstSubpass-02518"],
    dependency_stage_mask: &["VUID-VkSubpassDependency-srcStageMask-parameter"],
    dependency_access_mask: &["VUID-VkSubpassDependency-srcAccessMask-parameter"],
    dependency_flags: &["VUID-VkSubpassDependency-dependencyFlags-parameter"],
};

const RENDER_PASS2_VUIDS: RenderPassVuids = RenderPassVuids {
    attachment_format: &["VUID-VkAttachmentDescription2-format-06698"],
    attachment_final_layout: &["VUID-VkAttachmentDescription2-finalLayout-00843"],
    attachment_samples: &["VUID-VkAttachmentDescription2-samples-parameter"],
    attachment_load_op: &["VUID-VkAttachmentDescription2-loadOp-parameter"],
    attachment_store_op: &["VUID-VkAttachmentDescription2-storeOp-parameter"],
    subpass_count: &["VUID-VkRenderPassCreateInfo2-subpassCount-arraylength"],
    subpass_bind_point: &["VUID-VkSubpassDescription2-pipelineBindPoint-04953"],
    subpass_color_count: &["VUID-VkSubpassDescription2-colorAttachmentCount-03063"],
    subpass_attachment_index: &["VUID-VkRenderPassCreateInfo2-attachment-03051"],
    subpass_preserve_unused: &["VUID-VkSubpassDescription2-attachment-03073"],
    subpass_preserve_used: &["VUID-VkSubpassDescription2-pPreserveAttachments-03074"],
    subpass_color_format: &["VUID-VkSubpassDescription2-pColorAttachments-02898"],
    subpass_depth_format: &["VUID-VkSubpassDescription2-pDepthStencilAttachment-02900"],
    reference_layout: &["VUID-VkAttachmentReference2-layout-03077"],
    dependency_both_external: &["VUID-VkSubpassDependency2-srcSubpass-03085"],
    dependency_order: &["VUID-VkSubpassDependency2-srcSubpass-03084"],
    dependency_src_index: &["VUID-VkRenderPassCreateInfo2-srcSubpass-02526"],
    dependency_dst_index: &["VUID-VkRenderPassCreateInfo2-dstSubpass-02527"],
    dependency_stage_mask: &["VUID-VkSubpassDependency2-srcStageMask-parameter"],
    dependency_access_mask: &["VUID-VkSubpassDependency2-srcAccessMask-parameter"],
    dependency_flags: &["VUID-VkSubpassDependency2-dependencyFlags-parameter"],
};

#[derive(Clone, Copy, Debug)]
struct AttachmentView {
    format: vk::Format,
    samples: vk::SampleCountFlags,
    load_op: vk::AttachmentLoadOp,
    store_op: vk::AttachmentStoreOp,
    stencil_load_op: vk::AttachmentLoadOp,
    stencil_store_op: vk::AttachmentStoreOp,
    initial_layout: vk::ImageLayout,
    final_layout: vk::ImageLayout,
}

impl From<&vk::AttachmentDescription> for AttachmentView {
    fn from(description: &vk::AttachmentDescription) -> Self {
        AttachmentView {
            format: description.format,
            samples: description.samples,
            load_op: description.load_op,
            store_op: description.store_op,
            stencil_load_op: description.stencil_load_op,
            stencil_store_op: description.stencil_store_op,
            initial_layout: description.initial_layout,
            final_layout: description.final_layout,
        }
    }
}

impl From<&vk::AttachmentDescription2<'_>> for AttachmentView {
    fn from(description: &vk::AttachmentDescription2<'_>) -> Self {
        AttachmentView {
            format: description.format,
            samples: description.samples,
            load_op: description.load_op,
            store_op: description.store_op,
            stencil_load_op: description.stencil_load_op,
            stencil_store_op: description.stencil_store_op,
            initial_layout: description.initial_layout,
            final_layout: description.final_layout,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ReferenceView {
    attachment: u32,
    layout: vk::ImageLayout,
}

impl ReferenceView {
    fn is_used(self) -> bool {
        self.attachment != vk::ATTACHMENT_UNUSED
    }
}

impl From<&vk::AttachmentReference> for ReferenceView {
    fn from(reference: &vk::AttachmentReference) -> Self {
        ReferenceView {
            attachment: reference.attachment,
            layout: reference.layout,
        }
    }
}

impl From<&vk::AttachmentReference2<'_>> for ReferenceView {
    fn from(reference: &vk::AttachmentReference2<'_>) -> Self {
        ReferenceView {
            attachment: reference.attachment,
            layout: reference.layout,
        }
    }
}

#[derive(Clone, Debug)]
struct SubpassView<'a> {
    flags: vk::SubpassDescriptionFlags,
    pipeline_bind_point: vk::PipelineBindPoint,
    input_attachments: SmallVec<[ReferenceView; 4]>,
    color_attachments: SmallVec<[ReferenceView; 4]>,
    resolve_attachments: SmallVec<[ReferenceView; 4]>,
    depth_stencil_attachment: Option<ReferenceView>,
    preserve_attachments: &'a [u32],
    color_attachment_count: u32,
}

impl SubpassView<'_> {
    unsafe fn from_v1(description: &vk::SubpassDescription<'_>) -> Self {
        SubpassView {
            flags: description.flags,
            pipeline_bind_point: description.pipeline_bind_point,
            input_attachments: slice_or_empty(
                description.p_input_attachments,
                description.input_attachment_count,
            )
            .iter()
            .map(ReferenceView::from)
            .collect(),
            color_attachments: slice_or_empty(
                description.p_color_attachments,
                description.color_attachment_count,
            )
            .iter()
            .map(ReferenceView::from)
            .collect(),
            resolve_attachments: slice_or_empty(
                description.p_resolve_attachments,
                description.color_attachment_count,
            )
            .iter()
            .map(ReferenceView::from)
            .collect(),
            depth_stencil_attachment: description
                .p_depth_stencil_attachment
                .as_ref()
                .map(ReferenceView::from),
            preserve_attachments: slice_or_empty(
                description.p_preserve_attachments,
                description.preserve_attachment_count,
            ),
            color_attachment_count: description.color_attachment_count,
        }
    }

    unsafe fn from_v2(description: &vk::SubpassDescription2<'_>) -> Self {
        SubpassView {
            flags: description.flags,
            pipeline_bind_point: description.pipeline_bind_point,
            input_attachments: slice_or_empty(
                description.p_input_attachments,
                description.input_attachment_count,
            )
            .iter()
            .map(ReferenceView::from)
            .collect(),
            color_attachments: slice_or_empty(
                description.p_color_attachments,
                description.color_attachment_count,
            )
            .iter()
            .map(ReferenceView::from)
            .collect(),
            resolve_attachments: slice_or_empty(
                description.p_resolve_attachments,
                description.color_attachment_count,
            )
            .iter()
            .map(ReferenceView::from)
            .collect(),
            depth_stencil_attachment: description
                .p_depth_stencil_attachment
                .as_ref()
                .map(ReferenceView::from),
            preserve_attachments: slice_or_empty(
                description.p_preserve_attachments,
                description.preserve_attachment_count,
            ),
            color_attachment_count: description.color_attachment_count,
        }
    }

    fn usage(&self) -> SubpassUsage {
        SubpassUsage {
            uses_color_attachment: self.color_attachments.iter().any(|r| r.is_used()),
            uses_depth_stencil_attachment: self
                .depth_stencil_attachment
                .is_some_and(ReferenceView::is_used),
            color_attachment_count: self.color_attachment_count,
            flags: self.flags,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DependencyView {
    src_subpass: u32,
    dst_subpass: u32,
    src_stage_mask: vk::PipelineStageFlags,
    dst_stage_mask: vk::PipelineStageFlags,
    src_access_mask: vk::AccessFlags,
    dst_access_mask: vk::AccessFlags,
    dependency_flags: vk::DependencyFlags,
}

impl From<&vk::SubpassDependency> for DependencyView {
    fn from(dependency: &vk::SubpassDependency) -> Self {
        DependencyView {
            src_subpass: dependency.src_subpass,
            dst_subpass: dependency.dst_subpass,
            src_stage_mask: dependency.src_stage_mask,
            dst_stage_mask: dependency.dst_stage_mask,
            src_access_mask: dependency.src_access_mask,
            dst_access_mask: dependency.dst_access_mask,
            dependency_flags: dependency.dependency_flags,
        }
    }
}

impl From<&vk::SubpassDependency2<'_>> for DependencyView {
    fn from(dependency: &vk::SubpassDependency2<'_>) -> Self {
        DependencyView {
            src_subpass: dependency.src_subpass,
            dst_subpass: dependency.dst_subpass,
            src_stage_mask: dependency.src_stage_mask,
            dst_stage_mask: dependency.dst_stage_mask,
            src_access_mask: dependency.src_access_mask,
            dst_access_mask: dependency.dst_access_mask,
            dependency_flags: dependency.dependency_flags,
        }
    }
}

impl StatelessValidator {
    /// Validates the arguments of `vkCreateRenderPass`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_render_pass(
        &self,
        create_info: &vk::RenderPassCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::RenderPassCreateInfo {
            p_next,
            flags,
            attachment_count,
            p_attachments,
            subpass_count,
            p_subpasses,
            dependency_count,
            p_dependencies,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkRenderPassCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &RENDER_PASS_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkRenderPassCreateInfo-flags-parameter"],
            &[],
        ));
        violations.append(validate_array(
            "create_info.attachment_count",
            "create_info.p_attachments",
            attachment_count,
            p_attachments,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRenderPassCreateInfo-pAttachments-parameter"],
            },
        ));
        violations.append(validate_array(
            "create_info.subpass_count",
            "create_info.p_subpasses",
            subpass_count,
            p_subpasses,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: RENDER_PASS_VUIDS.subpass_count,
                array_vuids: &["VUID-VkRenderPassCreateInfo-pSubpasses-parameter"],
            },
        ));
        violations.append(validate_array(
            "create_info.dependency_count",
            "create_info.p_dependencies",
            dependency_count,
            p_dependencies,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRenderPassCreateInfo-pDependencies-parameter"],
            },
        ));

        let attachments: SmallVec<[AttachmentView; 8]> = slice_or_empty(p_attachments, attachment_count)
            .iter()
            .map(AttachmentView::from)
            .collect();
        let subpasses: SmallVec<[SubpassView<'_>; 4]> = slice_or_empty(p_subpasses, subpass_count)
            .iter()
            .map(|description| SubpassView::from_v1(description))
            .collect();
        let dependencies: SmallVec<[DependencyView; 4]> =
            slice_or_empty(p_dependencies, dependency_count)
                .iter()
                .map(DependencyView::from)
                .collect();

        violations.append(
            self.validate_render_pass_views(
                &attachments,
                &subpasses,
                &dependencies,
                &RENDER_PASS_VUIDS,
            )
            .add_context("create_info"),
        );

        if let Some(multiview) = find_in_chain::<vk::RenderPassMultiviewCreateInfo<'_>>(p_next) {
            if multiview.subpass_count != 0 && multiview.subpass_count != subpass_count {
                violations.push(ValidationError {
                    context: "create_info.p_next.subpass_count".into(),
                    problem: format!(
                        "is {}, which is neither 0 nor `create_info.subpass_count` ({})",
                        multiview.subpass_count, subpass_count,
                    )
                    .into(),
                    vuids: &["VUID-VkRenderPassCreateInfo-pNext-01928"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            if multiview.dependency_count != 0 && multiview.dependency_count != dependency_count {
                violations.push(ValidationError {
                    context: "create_info.p_next.dependency_count".into(),
                    problem: format!(
                        "is {}, which is neither 0 nor `create_info.dependency_count` ({})",
                        multiview.dependency_count, dependency_count,
                    )
                    .into(),
                    vuids: &["VUID-VkRenderPassCreateInfo-pNext-01929"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            let view_masks = slice_or_empty(multiview.p_view_masks, multiview.subpass_count);

            if view_masks.iter().any(|&mask| mask != 0) && !self.capabilities().features.multiview
            {
                violations.push(ValidationError {
                    context: "create_info.p_next.p_view_masks".into(),
                    problem: "contains a non-zero view mask".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "multiview",
                    )])]),
                    vuids: &["VUID-VkRenderPassMultiviewCreateInfo-multiview-06555"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        violations
    }

    /// Validates the arguments of `vkCreateRenderPass2`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_render_pass2(
        &self,
        create_info: &vk::RenderPassCreateInfo2<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let &vk::RenderPassCreateInfo2 {
            p_next,
            flags,
            attachment_count,
            p_attachments,
            subpass_count,
            p_subpasses,
            dependency_count,
            p_dependencies,
            correlated_view_mask_count,
            p_correlated_view_masks,
            ..
        } = create_info;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkRenderPassCreateInfo2-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "create_info.p_next",
            p_next,
            &RENDER_PASS_CREATE_INFO2_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "create_info.flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkRenderPassCreateInfo2-flags-parameter"],
            &[],
        ));
        violations.append(validate_array(
            "create_info.attachment_count",
            "create_info.p_attachments",
            attachment_count,
            p_attachments,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRenderPassCreateInfo2-pAttachments-parameter"],
            },
        ));
        violations.append(validate_array(
            "create_info.subpass_count",
            "create_info.p_subpasses",
            subpass_count,
            p_subpasses,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: RENDER_PASS2_VUIDS.subpass_count,
                array_vuids: &["VUID-VkRenderPassCreateInfo2-pSubpasses-parameter"],
            },
        ));
        violations.append(validate_array(
            "create_info.dependency_count",
            "create_info.p_dependencies",
            dependency_count,
            p_dependencies,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRenderPassCreateInfo2-pDependencies-parameter"],
            },
        ));
        violations.append(validate_array(
            "create_info.correlated_view_mask_count",
            "create_info.p_correlated_view_masks",
            correlated_view_mask_count,
            p_correlated_view_masks,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRenderPassCreateInfo2-pCorrelatedViewMasks-parameter"],
            },
        ));

        let attachment_descriptions = slice_or_empty(p_attachments, attachment_count);
        let subpass_descriptions = slice_or_empty(p_subpasses, subpass_count);
        let dependency_descriptions = slice_or_empty(p_dependencies, dependency_count);

        violations.append(validate_struct_type_array(
            "create_info.p_attachments",
            attachment_descriptions,
            &["VUID-VkAttachmentDescription2-sType-sType"],
        ));
        violations.append(validate_struct_type_array(
            "create_info.p_subpasses",
            subpass_descriptions,
            &["VUID-VkSubpassDescription2-sType-sType"],
        ));
        violations.append(validate_struct_type_array(
            "create_info.p_dependencies",
            dependency_descriptions,
            &["VUID-VkSubpassDependency2-sType-sType"],
        ));

        for (index, description) in subpass_descriptions.iter().enumerate() {
            violations.append_with_context(
                self.validate_chain("p_next", description.p_next, &SUBPASS_DESCRIPTION2_CHAIN),
                || format!("create_info.p_subpasses[{}]", index),
            );
        }

        let attachments: SmallVec<[AttachmentView; 8]> = attachment_descriptions
            .iter()
            .map(AttachmentView::from)
            .collect();
        let subpasses: SmallVec<[SubpassView<'_>; 4]> = subpass_descriptions
            .iter()
            .map(|description| SubpassView::from_v2(description))
            .collect();
        let dependencies: SmallVec<[DependencyView; 4]> = dependency_descriptions
            .iter()
            .map(DependencyView::from)
            .collect();

        violations.append(
            self.validate_render_pass_views(
                &attachments,
                &subpasses,
                &dependencies,
                &RENDER_PASS2_VUIDS,
            )
            .add_context("create_info"),
        );

        // Either every subpass uses multiview or none does.
        let multiview_subpasses = subpass_descriptions
            .iter()
            .filter(|description| description.view_mask != 0)
            .count();

        if multiview_subpasses != 0 {
            if multiview_subpasses != subpass_descriptions.len() {
                violations.push(ValidationError {
                    context: "create_info.p_subpasses".into(),
                    problem: "contains both subpasses with a zero `view_mask` and subpasses with \
                        a non-zero `view_mask`"
                        .into(),
                    vuids: &["VUID-VkRenderPassCreateInfo2-viewMask-03058"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            if !self.capabilities().features.multiview {
                violations.push(ValidationError {
                    context: "create_info.p_subpasses".into(),
                    problem: "contains a subpass with a non-zero `view_mask`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "multiview",
                    )])]),
                    vuids: &["VUID-VkSubpassDescription2-multiview-06558"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        } else if correlated_view_mask_count != 0 {
            violations.push(ValidationError {
                context: "create_info.correlated_view_mask_count".into(),
                problem: "is not zero, but no subpass has a non-zero `view_mask`".into(),
                vuids: &["VUID-VkRenderPassCreateInfo2-viewMask-03057"],
                kind: ViolationKind::ExtraneousCompanion,
                ..Default::default()
            });
        }

        let correlated_masks =
            slice_or_empty(p_correlated_view_masks, correlated_view_mask_count);
        let mut seen_views = 0u32;

        for (index, &mask) in correlated_masks.iter().enumerate() {
            if seen_views & mask != 0 {
                violations.push(ValidationError {
                    context: format!("create_info.p_correlated_view_masks[{}]", index).into(),
                    problem: "shares a view with an earlier correlated view mask".into(),
                    vuids: &["VUID-VkRenderPassCreateInfo2-pCorrelatedViewMasks-03056"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            seen_views |= mask;
        }

        violations
    }

    /// The checks shared by both render pass creation entry points.
    fn validate_render_pass_views(
        &self,
        attachments: &[AttachmentView],
        subpasses: &[SubpassView<'_>],
        dependencies: &[DependencyView],
        vuids: &RenderPassVuids,
    ) -> Violations {
        let mut violations = Violations::new();

        for (index, attachment) in attachments.iter().enumerate() {
            violations.append_with_context(validate_attachment(attachment, vuids), || {
                format!("p_attachments[{}]", index)
            });
        }

        for (index, subpass) in subpasses.iter().enumerate() {
            violations.append_with_context(
                self.validate_subpass(subpass, attachments, vuids),
                || format!("p_subpasses[{}]", index),
            );
        }

        let subpass_count = subpasses.len() as u32;

        for (index, dependency) in dependencies.iter().enumerate() {
            violations.append_with_context(
                validate_dependency(dependency, subpass_count, vuids),
                || format!("p_dependencies[{}]", index),
            );
        }

        violations
    }

    fn validate_subpass(
        &self,
        subpass: &SubpassView<'_>,
        attachments: &[AttachmentView],
        vuids: &RenderPassVuids,
    ) -> Violations {
        let mut violations = Violations::new();
        let properties = &self.capabilities().properties;
        let attachment_count = attachments.len() as u32;

        if subpass.pipeline_bind_point != vk::PipelineBindPoint::GRAPHICS {
            violations.push(ValidationError {
                context: "pipeline_bind_point".into(),
                problem: format!(
                    "is {:?}, but must be `VK_PIPELINE_BIND_POINT_GRAPHICS`",
                    subpass.pipeline_bind_point,
                )
                .into(),
                vuids: vuids.subpass_bind_point,
                ..Default::default()
            });
        }

        if subpass.color_attachment_count > properties.max_color_attachments {
            violations.push(ValidationError {
                context: "color_attachment_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_color_attachments` limit ({})",
                    subpass.color_attachment_count, properties.max_color_attachments,
                )
                .into(),
                vuids: vuids.subpass_color_count,
                ..Default::default()
            });
        }

        let references = [
            ("p_input_attachments", &subpass.input_attachments),
            ("p_color_attachments", &subpass.color_attachments),
            ("p_resolve_attachments", &subpass.resolve_attachments),
        ];

        for (array, references) in references {
            for (index, reference) in references.iter().enumerate() {
                violations.append_with_context(
                    validate_reference(*reference, attachment_count, vuids),
                    || format!("{}[{}]", array, index),
                );
            }
        }

        if let Some(reference) = subpass.depth_stencil_attachment {
            violations.append(
                validate_reference(reference, attachment_count, vuids)
                    .add_context("p_depth_stencil_attachment"),
            );

            if let Some(attachment) = attachments.get(reference.attachment as usize) {
                if !is_depth_or_stencil(attachment.format) {
                    violations.push(ValidationError {
                        context: "p_depth_stencil_attachment.attachment".into(),
                        problem: format!(
                            "refers to an attachment with format {:?}, which has no depth or \
                            stencil component",
                            attachment.format,
                        )
                        .into(),
                        vuids: vuids.subpass_depth_format,
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }
            }
        }

        for (index, reference) in subpass.color_attachments.iter().enumerate() {
            if let Some(attachment) = attachments.get(reference.attachment as usize) {
                if is_depth_or_stencil(attachment.format) {
                    violations.push(ValidationError {
                        context: format!("p_color_attachments[{}].attachment", index).into(),
                        problem: format!(
                            "refers to an attachment with format {:?}, which is a depth/stencil \
                            format",
                            attachment.format,
                        )
                        .into(),
                        vuids: vuids.subpass_color_format,
                        kind: ViolationKind::IllegalCombination,
                        ..Default::default()
                    });
                }
            }
        }

        for (index, &preserved) in subpass.preserve_attachments.iter().enumerate() {
            if preserved == vk::ATTACHMENT_UNUSED {
                violations.push(ValidationError {
                    context: format!("p_preserve_attachments[{}]", index).into(),
                    problem: "is `VK_ATTACHMENT_UNUSED`".into(),
                    vuids: vuids.subpass_preserve_unused,
                    ..Default::default()
                });
                continue;
            }

            if preserved >= attachment_count {
                violations.push(ValidationError {
                    context: format!("p_preserve_attachments[{}]", index).into(),
                    problem: format!(
                        "is {}, which is not less than `attachment_count` ({})",
                        preserved, attachment_count,
                    )
                    .into(),
                    vuids: vuids.subpass_attachment_index,
                    ..Default::default()
                });
            }

            let used_elsewhere = subpass
                .input_attachments
                .iter()
                .chain(&subpass.color_attachments)
                .chain(&subpass.resolve_attachments)
                .chain(&subpass.depth_stencil_attachment)
                .any(|reference| reference.attachment == preserved);

            if used_elsewhere {
                violations.push(ValidationError {
                    context: format!("p_preserve_attachments[{}]", index).into(),
                    problem: format!(
                        "is {}, which is also used by another reference of the subpass",
                        preserved,
                    )
                    .into(),
                    vuids: vuids.subpass_preserve_used,
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations
    }

    /// Records the attachment usage of a render pass created with `vkCreateRenderPass`.
    ///
    /// # Safety
    ///
    /// `create_info` must be the create info that was passed to `vkCreateRenderPass`.
    pub unsafe fn post_call_record_create_render_pass(
        &self,
        create_info: &vk::RenderPassCreateInfo<'_>,
        render_pass: vk::RenderPass,
        result: vk::Result,
    ) {
        if result != vk::Result::SUCCESS {
            return;
        }

        let subpasses = slice_or_empty(create_info.p_subpasses, create_info.subpass_count)
            .iter()
            .map(|description| SubpassView::from_v1(description).usage())
            .collect();

        self.record_render_pass(render_pass, RenderPassUsage { subpasses });
    }

    /// Records the attachment usage of a render pass created with `vkCreateRenderPass2`.
    ///
    /// # Safety
    ///
    /// `create_info` must be the create info that was passed to `vkCreateRenderPass2`.
    pub unsafe fn post_call_record_create_render_pass2(
        &self,
        create_info: &vk::RenderPassCreateInfo2<'_>,
        render_pass: vk::RenderPass,
        result: vk::Result,
    ) {
        if result != vk::Result::SUCCESS {
            return;
        }

        let subpasses = slice_or_empty(create_info.p_subpasses, create_info.subpass_count)
            .iter()
            .map(|description| SubpassView::from_v2(description).usage())
            .collect();

        self.record_render_pass(render_pass, RenderPassUsage { subpasses });
    }

    fn record_render_pass(&self, render_pass: vk::RenderPass, usage: RenderPassUsage) {
        debug!(
            ?render_pass,
            subpasses = usage.subpasses.len(),
            "recorded render pass attachment usage",
        );
        self.insert_render_pass(render_pass, usage);
    }

    /// Forgets the attachment usage of a render pass that is being destroyed.
    pub fn post_call_record_destroy_render_pass(&self, render_pass: vk::RenderPass) {
        if render_pass.is_null() {
            return;
        }

        let removed = self.remove_render_pass(render_pass);
        debug!(?render_pass, removed, "released render pass attachment usage");
    }

    /// Validates the arguments of `vkCmdBeginRendering`.
    ///
    /// # Safety
    ///
    /// `rendering_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_cmd_begin_rendering(
        &self,
        _command_buffer: vk::CommandBuffer,
        rendering_info: &vk::RenderingInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let features = &capabilities.features;
        let properties = &capabilities.properties;
        let &vk::RenderingInfo {
            p_next,
            flags,
            render_area,
            layer_count,
            view_mask,
            color_attachment_count,
            p_color_attachments,
            p_depth_attachment,
            p_stencil_attachment,
            ..
        } = rendering_info;

        if !features.dynamic_rendering {
            violations.push(ValidationError {
                problem: "is called".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "dynamic_rendering",
                )])]),
                vuids: &["VUID-vkCmdBeginRendering-dynamicRendering-06446"],
                kind: ViolationKind::RequirementNotMet,
                ..Default::default()
            });
        }

        violations.push_opt(validate_struct_type(
            "rendering_info.s_type",
            rendering_info,
            &["VUID-VkRenderingInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "rendering_info.p_next",
            p_next,
            &RENDERING_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "rendering_info.flags",
            flags.as_raw(),
            RENDERING_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkRenderingInfo-flags-parameter"],
            &[],
        ));

        if view_mask == 0 && layer_count == 0 {
            violations.push(ValidationError {
                context: "rendering_info.layer_count".into(),
                problem: "is 0, but `rendering_info.view_mask` is also 0".into(),
                vuids: &["VUID-VkRenderingInfo-viewMask-06069"],
                ..Default::default()
            });
        }

        if view_mask != 0 && !features.multiview {
            violations.push(ValidationError {
                context: "rendering_info.view_mask".into(),
                problem: "is not 0".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multiview",
                )])]),
                vuids: &["VUID-VkRenderingInfo-multiview-06127"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        // The render area is only checked when no device group struct replaces it.
        if find_in_chain::<vk::DeviceGroupRenderPassBeginInfo<'_>>(p_next)
            .map_or(true, |info| info.device_render_area_count == 0)
        {
            violations.append(validate_render_area(&render_area).add_context("rendering_info"));
        }

        if color_attachment_count > properties.max_color_attachments {
            violations.push(ValidationError {
                context: "rendering_info.color_attachment_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_color_attachments` limit ({})",
                    color_attachment_count, properties.max_color_attachments,
                )
                .into(),
                vuids: &["VUID-VkRenderingInfo-colorAttachmentCount-06106"],
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "rendering_info.color_attachment_count",
            "rendering_info.p_color_attachments",
            color_attachment_count,
            p_color_attachments,
            ArrayRules {
                count_required: false,
                array_required: true,
                count_vuids: &[],
                array_vuids: &["VUID-VkRenderingInfo-pColorAttachments-parameter"],
            },
        ));

        for (index, attachment) in slice_or_empty(p_color_attachments, color_attachment_count)
            .iter()
            .enumerate()
        {
            let mut attachment_violations = validate_rendering_attachment(attachment);

            if !attachment.image_view.is_null()
                && matches!(
                    attachment.image_layout,
                    vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL
                        | vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL
                        | vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL
                        | vk::ImageLayout::DEPTH_READ_ONLY_OPTIMAL
                        | vk::ImageLayout::STENCIL_ATTACHMENT_OPTIMAL
                        | vk::ImageLayout::STENCIL_READ_ONLY_OPTIMAL
                )
            {
                attachment_violations.push(ValidationError {
                    context: "image_layout".into(),
                    problem: format!(
                        "is {:?}, which is a depth/stencil layout",
                        attachment.image_layout,
                    )
                    .into(),
                    vuids: &["VUID-VkRenderingInfo-colorAttachmentCount-06090"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            violations.append_with_context(attachment_violations, || {
                format!("rendering_info.p_color_attachments[{}]", index)
            });
        }

        let depth_attachment = p_depth_attachment.as_ref();
        let stencil_attachment = p_stencil_attachment.as_ref();

        for (context, attachment, vuids) in [
            (
                "rendering_info.p_depth_attachment",
                depth_attachment,
                &["VUID-VkRenderingInfo-pDepthAttachment-06092"] as &'static [&'static str],
            ),
            (
                "rendering_info.p_stencil_attachment",
                stencil_attachment,
                &["VUID-VkRenderingInfo-pStencilAttachment-06094"],
            ),
        ] {
            let Some(attachment) = attachment else {
                continue;
            };

            let mut attachment_violations = validate_rendering_attachment(attachment);

            if !attachment.image_view.is_null()
                && attachment.image_layout == vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL
            {
                attachment_violations.push(ValidationError {
                    context: "image_layout".into(),
                    problem: "is `VK_IMAGE_LAYOUT_COLOR_ATTACHMENT_OPTIMAL`".into(),
                    vuids,
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }

            violations.append(attachment_violations.add_context(context));
        }

        if let (Some(depth), Some(stencil)) = (depth_attachment, stencil_attachment) {
            if !depth.image_view.is_null()
                && !stencil.image_view.is_null()
                && depth.image_view != stencil.image_view
            {
                violations.push(ValidationError {
                    context: "rendering_info.p_stencil_attachment.image_view".into(),
                    problem: "is not the same image view as \
                        `rendering_info.p_depth_attachment.image_view`"
                        .into(),
                    vuids: &["VUID-VkRenderingInfo-pDepthAttachment-06085"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            }
        }

        violations
    }
}

fn validate_attachment(attachment: &AttachmentView, vuids: &RenderPassVuids) -> Violations {
    let mut violations = Violations::new();

    match validate_ranged_enum(
        "format",
        attachment.format.as_raw(),
        FORMAT_VALUES,
        &["VUID-VkAttachmentDescription-format-parameter"],
    ) {
        Some(error) => violations.push(error),
        None => {
            if attachment.format == vk::Format::UNDEFINED {
                violations.push(ValidationError {
                    context: "format".into(),
                    problem: "is `VK_FORMAT_UNDEFINED`".into(),
                    vuids: vuids.attachment_format,
                    ..Default::default()
                });
            }
        }
    }

    violations.push_opt(validate_flags(
        "samples",
        attachment.samples.as_raw(),
        SAMPLE_COUNTS.as_raw(),
        FlagPolicy::RequiredSingleBit,
        vuids.attachment_samples,
        vuids.attachment_samples,
    ));

    for (context, op) in [
        ("load_op", attachment.load_op),
        ("stencil_load_op", attachment.stencil_load_op),
    ] {
        violations.push_opt(validate_ranged_enum(
            context,
            op.as_raw(),
            ATTACHMENT_LOAD_OP_VALUES,
            vuids.attachment_load_op,
        ));
    }

    for (context, op) in [
        ("store_op", attachment.store_op),
        ("stencil_store_op", attachment.stencil_store_op),
    ] {
        violations.push_opt(validate_ranged_enum(
            context,
            op.as_raw(),
            ATTACHMENT_STORE_OP_VALUES,
            vuids.attachment_store_op,
        ));
    }

    violations.push_opt(validate_ranged_enum(
        "initial_layout",
        attachment.initial_layout.as_raw(),
        IMAGE_LAYOUT_VALUES,
        &["VUID-VkAttachmentDescription-initialLayout-parameter"],
    ));

    match validate_ranged_enum(
        "final_layout",
        attachment.final_layout.as_raw(),
        IMAGE_LAYOUT_VALUES,
        &["VUID-VkAttachmentDescription-finalLayout-parameter"],
    ) {
        Some(error) => violations.push(error),
        None => {
            if matches!(
                attachment.final_layout,
                vk::ImageLayout::UNDEFINED | vk::ImageLayout::PREINITIALIZED
            ) {
                violations.push(ValidationError {
                    context: "final_layout".into(),
                    problem: format!("is {:?}", attachment.final_layout).into(),
                    vuids: vuids.attachment_final_layout,
                    ..Default::default()
                });
            }
        }
    }

    violations
}

fn validate_reference(
    reference: ReferenceView,
    attachment_count: u32,
    vuids: &RenderPassVuids,
) -> Violations {
    let mut violations = Violations::new();

    if !reference.is_used() {
        return violations;
    }

    if reference.attachment >= attachment_count {
        violations.push(ValidationError {
            context: "attachment".into(),
            problem: format!(
                "is {}, which is not less than `attachment_count` ({})",
                reference.attachment, attachment_count,
            )
            .into(),
            vuids: vuids.subpass_attachment_index,
            ..Default::default()
        });
    }

    match validate_ranged_enum(
        "layout",
        reference.layout.as_raw(),
        IMAGE_LAYOUT_VALUES,
        &["VUID-VkAttachmentReference-layout-parameter"],
    ) {
        Some(error) => violations.push(error),
        None => {
            if matches!(
                reference.layout,
                vk::ImageLayout::UNDEFINED
                    | vk::ImageLayout::PREINITIALIZED
                    | vk::ImageLayout::PRESENT_SRC_KHR
            ) {
                violations.push(ValidationError {
                    context: "layout".into(),
                    problem: format!("is {:?}", reference.layout).into(),
                    vuids: vuids.reference_layout,
                    ..Default::default()
                });
            }
        }
    }

    violations
}

fn validate_dependency(
    dependency: &DependencyView,
    subpass_count: u32,
    vuids: &RenderPassVuids,
) -> Violations {
    let mut violations = Violations::new();
    let &DependencyView {
        src_subpass,
        dst_subpass,
        src_stage_mask,
        dst_stage_mask,
        src_access_mask,
        dst_access_mask,
        dependency_flags,
    } = dependency;

    let src_external = src_subpass == vk::SUBPASS_EXTERNAL;
    let dst_external = dst_subpass == vk::SUBPASS_EXTERNAL;

    if src_external && dst_external {
        violations.push(ValidationError {
            context: "src_subpass".into(),
            problem: "and `dst_subpass` are both `VK_SUBPASS_EXTERNAL`".into(),
            vuids: vuids.dependency_both_external,
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    } else if !src_external && !dst_external && src_subpass > dst_subpass {
        violations.push(ValidationError {
            context: "src_subpass".into(),
            problem: format!(
                "is {}, which is greater than `dst_subpass` ({})",
                src_subpass, dst_subpass,
            )
            .into(),
            vuids: vuids.dependency_order,
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if !src_external && src_subpass >= subpass_count {
        violations.push(ValidationError {
            context: "src_subpass".into(),
            problem: format!(
                "is {}, which is not less than `subpass_count` ({})",
                src_subpass, subpass_count,
            )
            .into(),
            vuids: vuids.dependency_src_index,
            ..Default::default()
        });
    }

    if !dst_external && dst_subpass >= subpass_count {
        violations.push(ValidationError {
            context: "dst_subpass".into(),
            problem: format!(
                "is {}, which is not less than `subpass_count` ({})",
                dst_subpass, subpass_count,
            )
            .into(),
            vuids: vuids.dependency_dst_index,
            ..Default::default()
        });
    }

    for (context, mask) in [("src_stage_mask", src_stage_mask), ("dst_stage_mask", dst_stage_mask)]
    {
        violations.push_opt(validate_flags(
            context,
            mask.as_raw(),
            PIPELINE_STAGES.as_raw(),
            FlagPolicy::Optional,
            vuids.dependency_stage_mask,
            &[],
        ));
    }

    for (context, mask) in [
        ("src_access_mask", src_access_mask),
        ("dst_access_mask", dst_access_mask),
    ] {
        violations.push_opt(validate_flags(
            context,
            mask.as_raw(),
            ACCESS_FLAGS.as_raw(),
            FlagPolicy::Optional,
            vuids.dependency_access_mask,
            &[],
        ));
    }

    violations.push_opt(validate_flags(
        "dependency_flags",
        dependency_flags.as_raw(),
        DEPENDENCY_FLAGS.as_raw(),
        FlagPolicy::Optional,
        vuids.dependency_flags,
        &[],
    ));

    violations
}

/// Checks that a render area has a non-negative offset, a non-zero extent, and does not
/// overflow.
fn validate_render_area(render_area: &vk::Rect2D) -> Violations {
    let mut violations = Violations::new();
    let vk::Rect2D { offset, extent } = *render_area;

    for (context, value, vuids) in [
        (
            "render_area.offset.x",
            offset.x,
            &["VUID-VkRenderingInfo-pNext-06077"] as &'static [&'static str],
        ),
        (
            "render_area.offset.y",
            offset.y,
            &["VUID-VkRenderingInfo-pNext-06078"],
        ),
    ] {
        if value < 0 {
            violations.push(ValidationError {
                context: context.into(),
                problem: format!("is {}, which is negative", value).into(),
                vuids,
                ..Default::default()
            });
        }
    }

    for (context, value, vuids) in [
        (
            "render_area.extent.width",
            extent.width,
            &["VUID-VkRenderingInfo-None-08994"] as &'static [&'static str],
        ),
        (
            "render_area.extent.height",
            extent.height,
            &["VUID-VkRenderingInfo-None-08995"],
        ),
    ] {
        if value == 0 {
            violations.push(ValidationError {
                context: context.into(),
                problem: "is 0".into(),
                vuids,
                ..Default::default()
            });
        }
    }

    if sum_exceeds_i32(offset.x, extent.width) {
        violations.push(ValidationError {
            context: "render_area".into(),
            problem: format!(
                "has `offset.x + extent.width` = {} + {}, which overflows a signed 32-bit integer",
                offset.x, extent.width,
            )
            .into(),
            vuids: &["VUID-VkRenderingInfo-pNext-07815"],
            kind: ViolationKind::ArithmeticOverflow,
            ..Default::default()
        });
    }

    if sum_exceeds_i32(offset.y, extent.height) {
        violations.push(ValidationError {
            context: "render_area".into(),
            problem: format!(
                "has `offset.y + extent.height` = {} + {}, which overflows a signed 32-bit \
                integer",
                offset.y, extent.height,
            )
            .into(),
            vuids: &["VUID-VkRenderingInfo-pNext-07816"],
            kind: ViolationKind::ArithmeticOverflow,
            ..Default::default()
        });
    }

    violations
}

fn validate_rendering_attachment(attachment: &vk::RenderingAttachmentInfo<'_>) -> Violations {
    let mut violations = Violations::new();
    let &vk::RenderingAttachmentInfo {
        image_view,
        image_layout,
        resolve_mode,
        resolve_image_view,
        resolve_image_layout,
        load_op,
        store_op,
        ..
    } = attachment;

    violations.push_opt(validate_struct_type(
        "s_type",
        attachment,
        &["VUID-VkRenderingAttachmentInfo-sType-sType"],
    ));

    if image_view.is_null() {
        return violations;
    }

    violations.push_opt(validate_ranged_enum(
        "load_op",
        load_op.as_raw(),
        ATTACHMENT_LOAD_OP_VALUES,
        &["VUID-VkRenderingAttachmentInfo-loadOp-parameter"],
    ));
    violations.push_opt(validate_ranged_enum(
        "store_op",
        store_op.as_raw(),
        ATTACHMENT_STORE_OP_VALUES,
        &["VUID-VkRenderingAttachmentInfo-storeOp-parameter"],
    ));
    violations.push_opt(validate_flags(
        "resolve_mode",
        resolve_mode.as_raw(),
        RESOLVE_MODES.as_raw(),
        FlagPolicy::OptionalSingleBit,
        &["VUID-VkRenderingAttachmentInfo-resolveMode-parameter"],
        &[],
    ));

    for (context, layout, vuids) in [
        (
            "image_layout",
            image_layout,
            &["VUID-VkRenderingAttachmentInfo-imageView-06135"] as &'static [&'static str],
        ),
        (
            "resolve_image_layout",
            resolve_image_layout,
            &["VUID-VkRenderingAttachmentInfo-imageView-06136"],
        ),
    ] {
        if context == "resolve_image_layout"
            && (resolve_mode == vk::ResolveModeFlags::NONE || resolve_image_view.is_null())
        {
            continue;
        }

        if matches!(
            layout,
            vk::ImageLayout::UNDEFINED
                | vk::ImageLayout::PREINITIALIZED
                | vk::ImageLayout::PRESENT_SRC_KHR
        ) {
            violations.push(ValidationError {
                context: context.into(),
                problem: format!("is {:?}", layout).into(),
                vuids,
                ..Default::default()
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::{
        device::SubpassUsage,
        tests::{collecting_validator, test_capabilities, test_validator, test_validator_with},
    };
    use ash::vk::{self, Handle};

    fn attachment(format: vk::Format) -> vk::AttachmentDescription {
        vk::AttachmentDescription {
            format,
            samples: vk::SampleCountFlags::TYPE_1,
            load_op: vk::AttachmentLoadOp::CLEAR,
            store_op: vk::AttachmentStoreOp::STORE,
            stencil_load_op: vk::AttachmentLoadOp::DONT_CARE,
            stencil_store_op: vk::AttachmentStoreOp::DONT_CARE,
            initial_layout: vk::ImageLayout::UNDEFINED,
            final_layout: vk::ImageLayout::PRESENT_SRC_KHR,
            ..Default::default()
        }
    }

    #[test]
    fn valid_render_pass_is_recorded() {
        let (validator, _sink) = collecting_validator();
        let attachments = [
            attachment(vk::Format::B8G8R8A8_UNORM),
            vk::AttachmentDescription {
                final_layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
                ..attachment(vk::Format::D24_UNORM_S8_UINT)
            },
        ];
        let color = [vk::AttachmentReference {
            attachment: 0,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        }];
        let depth = vk::AttachmentReference {
            attachment: 1,
            layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        };
        let subpasses = [
            vk::SubpassDescription::default()
                .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
                .color_attachments(&color)
                .depth_stencil_attachment(&depth),
            vk::SubpassDescription::default()
                .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
                .color_attachments(&color),
        ];
        let dependencies = [vk::SubpassDependency {
            src_subpass: 0,
            dst_subpass: 1,
            src_stage_mask: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            dst_stage_mask: vk::PipelineStageFlags::FRAGMENT_SHADER,
            src_access_mask: vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            dst_access_mask: vk::AccessFlags::SHADER_READ,
            dependency_flags: vk::DependencyFlags::BY_REGION,
        }];
        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(&subpasses)
            .dependencies(&dependencies);

        let violations = unsafe { validator.validate_create_render_pass(&create_info) };
        assert!(violations.is_empty(), "{}", violations);

        let render_pass = vk::RenderPass::from_raw(0x40);
        unsafe {
            validator.post_call_record_create_render_pass(
                &create_info,
                render_pass,
                vk::Result::SUCCESS,
            );
        }
        assert_eq!(
            validator.subpass_usage(render_pass, 0),
            Some(SubpassUsage {
                uses_color_attachment: true,
                uses_depth_stencil_attachment: true,
                color_attachment_count: 1,
                flags: vk::SubpassDescriptionFlags::empty(),
            }),
        );
        assert_eq!(
            validator
                .subpass_usage(render_pass, 1)
                .map(|usage| usage.uses_depth_stencil_attachment),
            Some(false),
        );

        validator.post_call_record_destroy_render_pass(render_pass);
        assert_eq!(validator.render_pass_usage(render_pass), None);
    }

    #[test]
    fn failed_creation_is_not_recorded() {
        let validator = test_validator();
        let subpasses = [vk::SubpassDescription::default()];
        let create_info = vk::RenderPassCreateInfo::default().subpasses(&subpasses);
        let render_pass = vk::RenderPass::from_raw(0x41);

        unsafe {
            validator.post_call_record_create_render_pass(
                &create_info,
                render_pass,
                vk::Result::ERROR_OUT_OF_HOST_MEMORY,
            );
        }
        assert_eq!(validator.render_pass_usage(render_pass), None);
    }

    #[test]
    fn references_and_dependencies() {
        let validator = test_validator();
        let attachments = [attachment(vk::Format::D32_SFLOAT)];
        let color = [vk::AttachmentReference {
            attachment: 0,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        }];
        let input = [vk::AttachmentReference {
            attachment: 3,
            layout: vk::ImageLayout::UNDEFINED,
        }];
        let preserve = [vk::ATTACHMENT_UNUSED];
        let subpasses = [vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::COMPUTE)
            .color_attachments(&color)
            .input_attachments(&input)
            .preserve_attachments(&preserve)];
        let dependencies = [
            vk::SubpassDependency {
                src_subpass: vk::SUBPASS_EXTERNAL,
                dst_subpass: vk::SUBPASS_EXTERNAL,
                ..Default::default()
            },
            vk::SubpassDependency {
                src_subpass: 0,
                dst_subpass: 2,
                ..Default::default()
            },
        ];
        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(&subpasses)
            .dependencies(&dependencies);

        let violations = unsafe { validator.validate_create_render_pass(&create_info) };
        assert_vuid!(violations, "VUID-VkSubpassDescription-pipelineBindPoint-04952");
        assert_vuid!(violations, "VUID-VkSubpassDescription-pColorAttachments-02648");
        assert_vuid!(violations, "VUID-VkRenderPassCreateInfo-attachment-00834");
        assert_vuid!(violations, "VUID-VkAttachmentReference-layout-03077");
        assert_vuid!(violations, "VUID-VkSubpassDescription-attachment-00853");
        assert_vuid!(violations, "VUID-VkSubpassDependency-srcSubpass-00865");
        assert_vuid!(violations, "VUID-VkRenderPassCreateInfo-dstSubpass-02518");
        assert_eq!(
            violations[0].context,
            "create_info.p_subpasses[0].pipeline_bind_point",
        );
    }

    #[test]
    fn render_pass2_view_masks() {
        let mut capabilities = test_capabilities();
        capabilities.features.multiview = false;
        let validator = test_validator_with(capabilities);
        let subpasses = [
            vk::SubpassDescription2::default()
                .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
                .view_mask(0b11),
            vk::SubpassDescription2::default().pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS),
        ];
        let correlated = [0b01, 0b11];
        let create_info = vk::RenderPassCreateInfo2::default()
            .subpasses(&subpasses)
            .correlated_view_masks(&correlated);

        let violations = unsafe { validator.validate_create_render_pass2(&create_info) };
        assert_vuid!(violations, "VUID-VkRenderPassCreateInfo2-viewMask-03058");
        assert_vuid!(violations, "VUID-VkSubpassDescription2-multiview-06558");
        assert_vuid!(violations, "VUID-VkRenderPassCreateInfo2-pCorrelatedViewMasks-03056");
        assert_eq!(violations.len(), 3, "{}", violations);
    }

    #[test]
    fn begin_rendering_render_area() {
        let validator = test_validator();
        let color = [vk::RenderingAttachmentInfo::default()
            .image_view(vk::ImageView::from_raw(0x50))
            .image_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)];
        let rendering_info = vk::RenderingInfo::default()
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: i32::MAX - 10, y: -1 },
                extent: vk::Extent2D { width: 100, height: 0 },
            })
            .layer_count(1)
            .color_attachments(&color);

        let violations = unsafe {
            validator.validate_cmd_begin_rendering(vk::CommandBuffer::null(), &rendering_info)
        };
        assert_vuid!(violations, "VUID-VkRenderingInfo-pNext-06078");
        assert_vuid!(violations, "VUID-VkRenderingInfo-None-08995");
        assert_vuid!(violations, "VUID-VkRenderingInfo-pNext-07815");
        assert_vuid!(violations, "VUID-VkRenderingInfo-colorAttachmentCount-06090");
        assert_eq!(violations.len(), 4, "{}", violations);
    }
}
