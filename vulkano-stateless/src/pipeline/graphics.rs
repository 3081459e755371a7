// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Graphics pipelines.
//!
//! A graphics pipeline can be created whole, or as a library holding only some of the four
//! state subsets. Before the state blocks are checked, the create info is reduced to the blocks
//! that actually take part in the pipeline being created: blocks of subsets that are not being
//! built, and blocks that the pipeline ignores (vertex input for mesh pipelines, everything past
//! rasterization when rasterizer discard is on) are dropped. The color blend and depth/stencil
//! states are only required and checked when the targeted subpass has the matching attachments.

use crate::{
    chain::{find_in_chain, AllowedStruct, ChainRules},
    device::SubpassUsage,
    image::SAMPLE_COUNTS,
    pipeline::{
        dynamic_state::DynamicStates, validate_pipeline_derivative,
        validate_ray_tracing_only_flags, PipelineKind, GRAPHICS_STAGES, PIPELINE_CREATE_FLAGS,
    },
    predicates::{
        in_inclusive_range, is_true, slice_or_empty, validate_array, validate_flags,
        validate_ranged_enum, validate_required_handle, validate_struct_type,
        validate_struct_type_array, ArrayRules, FlagPolicy,
    },
    sampler::COMPARE_OP_VALUES,
    Requires, RequiresAllOf, RequiresOneOf, StatelessValidator, ValidationError, Version,
    ViolationKind, Violations,
};
use ash::vk::{self, Handle};
use smallvec::SmallVec;
use std::{ops::RangeInclusive, ptr};

const POLYGON_MODE_VALUES: &[RangeInclusive<i32>] = enum_values!(PolygonMode { FILL..=POINT });

const FRONT_FACE_VALUES: &[RangeInclusive<i32>] =
    enum_values!(FrontFace { COUNTER_CLOCKWISE..=CLOCKWISE });

const STENCIL_OP_VALUES: &[RangeInclusive<i32>] =
    enum_values!(StencilOp { KEEP..=DECREMENT_AND_WRAP });

const CULL_MODES: vk::CullModeFlags = flags_mask!(CullModeFlags { FRONT, BACK });

const ALL_LIBRARY_SUBSETS: vk::GraphicsPipelineLibraryFlagsEXT =
    flags_mask!(GraphicsPipelineLibraryFlagsEXT {
        VERTEX_INPUT_INTERFACE,
        PRE_RASTERIZATION_SHADERS,
        FRAGMENT_SHADER,
        FRAGMENT_OUTPUT_INTERFACE,
    });

const PRE_RASTERIZATION_STAGES: vk::ShaderStageFlags = flags_mask!(ShaderStageFlags {
    VERTEX,
    TESSELLATION_CONTROL,
    TESSELLATION_EVALUATION,
    GEOMETRY,
    TASK_EXT,
    MESH_EXT,
});

const GRAPHICS_PIPELINE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::PipelineRenderingCreateInfo<'static>>().requires(RequiresOneOf(
            &[
                RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_dynamic_rendering")]),
            ],
        )),
        AllowedStruct::of::<vk::GraphicsPipelineLibraryCreateInfoEXT<'static>>().requires(
            RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_graphics_pipeline_library",
            )])]),
        ),
        AllowedStruct::of::<vk::PipelineLibraryCreateInfoKHR<'static>>().requires(RequiresOneOf(
            &[RequiresAllOf(&[Requires::DeviceExtension(
                "khr_pipeline_library",
            )])],
        )),
        AllowedStruct::of::<vk::PipelineCreationFeedbackCreateInfo<'static>>(),
    ],
    unique: true,
    vuids_next: &["VUID-VkGraphicsPipelineCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkGraphicsPipelineCreateInfo-sType-unique"],
};

const PIPELINE_TESSELLATION_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::of::<
        vk::PipelineTessellationDomainOriginStateCreateInfo<'static>,
    >()
    .requires(RequiresOneOf(&[
        RequiresAllOf(&[Requires::APIVersion(Version::V1_1)]),
        RequiresAllOf(&[Requires::DeviceExtension("khr_maintenance2")]),
    ]))],
    unique: true,
    vuids_next: &["VUID-VkPipelineTessellationStateCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkPipelineTessellationStateCreateInfo-sType-unique"],
};

const PIPELINE_RASTERIZATION_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::PipelineRasterizationDepthClipStateCreateInfoEXT<'static>>()
            .requires(RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                "ext_depth_clip_enable",
            )])])),
    ],
    unique: true,
    vuids_next: &["VUID-VkPipelineRasterizationStateCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkPipelineRasterizationStateCreateInfo-sType-unique"],
};

const PIPELINE_MULTISAMPLE_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkPipelineMultisampleStateCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkPipelineMultisampleStateCreateInfo-sType-unique"],
};

const PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[],
    unique: true,
    vuids_next: &["VUID-VkPipelineDepthStencilStateCreateInfo-pNext-pNext"],
    vuids_unique: &[],
};

/// The parts of a graphics pipeline create info that take part in the pipeline being created.
///
/// Pointers to state blocks that are ignored are null.
struct EffectiveState<'a> {
    create_info: vk::GraphicsPipelineCreateInfo<'a>,
    subsets: vk::GraphicsPipelineLibraryFlagsEXT,
    /// Whether the subsets that are not being built come from linked libraries, so that missing
    /// state blocks can't be reported.
    links_libraries: bool,
    stages: SmallVec<[vk::ShaderStageFlags; 5]>,
    rasterizer_discard: bool,
}

impl EffectiveState<'_> {
    fn has(&self, subset: vk::GraphicsPipelineLibraryFlagsEXT) -> bool {
        self.subsets.contains(subset)
    }

    fn has_stage(&self, stage: vk::ShaderStageFlags) -> bool {
        self.stages.contains(&stage)
    }

    /// Whether a state block that the pipeline needs may be absent, because this is a library
    /// or because other libraries will be linked in.
    fn is_partial(&self) -> bool {
        self.links_libraries
            || self
                .create_info
                .flags
                .contains(vk::PipelineCreateFlags::LIBRARY_KHR)
    }
}

/// Reduces `create_info` to the state blocks that take part in the pipeline.
///
/// # Safety
///
/// The pointers of `create_info` must be valid as described in the crate documentation.
unsafe fn effective_state<'a>(
    create_info: &vk::GraphicsPipelineCreateInfo<'a>,
    dynamic_states: &DynamicStates,
) -> EffectiveState<'a> {
    let mut effective = *create_info;

    let library_info = find_in_chain::<vk::GraphicsPipelineLibraryCreateInfoEXT<'_>>(
        create_info.p_next,
    );
    let links_libraries = find_in_chain::<vk::PipelineLibraryCreateInfoKHR<'_>>(create_info.p_next)
        .is_some_and(|info| info.library_count != 0);

    let subsets = match library_info {
        Some(library_info) => library_info.flags & ALL_LIBRARY_SUBSETS,
        None if links_libraries
            || create_info
                .flags
                .contains(vk::PipelineCreateFlags::LIBRARY_KHR) =>
        {
            vk::GraphicsPipelineLibraryFlagsEXT::empty()
        }
        None => ALL_LIBRARY_SUBSETS,
    };

    if !subsets.contains(vk::GraphicsPipelineLibraryFlagsEXT::VERTEX_INPUT_INTERFACE) {
        effective.p_vertex_input_state = ptr::null();
        effective.p_input_assembly_state = ptr::null();
    }

    if !subsets.contains(vk::GraphicsPipelineLibraryFlagsEXT::PRE_RASTERIZATION_SHADERS) {
        effective.p_viewport_state = ptr::null();
        effective.p_rasterization_state = ptr::null();
        effective.p_tessellation_state = ptr::null();
    }

    if !subsets.contains(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER) {
        effective.p_depth_stencil_state = ptr::null();
    }

    if !subsets.contains(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_OUTPUT_INTERFACE) {
        effective.p_color_blend_state = ptr::null();
    }

    if !subsets.intersects(
        vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER
            | vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_OUTPUT_INTERFACE,
    ) {
        effective.p_multisample_state = ptr::null();
    }

    // Only the stages of the subsets being built are part of this pipeline.
    let mut stages = SmallVec::new();

    for stage_info in slice_or_empty(create_info.p_stages, create_info.stage_count) {
        let belongs = if stage_info.stage == vk::ShaderStageFlags::FRAGMENT {
            subsets.contains(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER)
        } else {
            subsets.contains(vk::GraphicsPipelineLibraryFlagsEXT::PRE_RASTERIZATION_SHADERS)
        };

        if belongs {
            stages.push(stage_info.stage);
        }
    }

    if stages.contains(&vk::ShaderStageFlags::MESH_EXT) {
        effective.p_vertex_input_state = ptr::null();
        effective.p_input_assembly_state = ptr::null();
    }

    let rasterizer_discard = effective
        .p_rasterization_state
        .as_ref()
        .is_some_and(|state| is_true(state.rasterizer_discard_enable))
        && !dynamic_states.contains(vk::DynamicState::RASTERIZER_DISCARD_ENABLE);

    if rasterizer_discard {
        effective.p_viewport_state = ptr::null();
        effective.p_multisample_state = ptr::null();
        effective.p_depth_stencil_state = ptr::null();
        effective.p_color_blend_state = ptr::null();
    }

    EffectiveState {
        create_info: effective,
        subsets,
        links_libraries,
        stages,
        rasterizer_discard,
    }
}

impl StatelessValidator {
    /// Validates the arguments of `vkCreateGraphicsPipelines`.
    ///
    /// # Safety
    ///
    /// `p_create_infos` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_graphics_pipelines(
        &self,
        _pipeline_cache: vk::PipelineCache,
        create_info_count: u32,
        p_create_infos: *const vk::GraphicsPipelineCreateInfo<'_>,
    ) -> Violations {
        let mut violations = validate_array(
            "create_info_count",
            "p_create_infos",
            create_info_count,
            p_create_infos,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-vkCreateGraphicsPipelines-createInfoCount-arraylength"],
                array_vuids: &["VUID-vkCreateGraphicsPipelines-pCreateInfos-parameter"],
            },
        );

        let create_infos = slice_or_empty(p_create_infos, create_info_count);
        violations.append(validate_struct_type_array(
            "p_create_infos",
            create_infos,
            &["VUID-VkGraphicsPipelineCreateInfo-sType-sType"],
        ));

        let all_flags: SmallVec<[vk::PipelineCreateFlags; 4]> =
            create_infos.iter().map(|info| info.flags).collect();

        for (index, create_info) in create_infos.iter().enumerate() {
            violations.append_with_context(
                self.validate_graphics_pipeline_create_info(create_info, index, &all_flags),
                || format!("p_create_infos[{}]", index),
            );
        }

        violations
    }

    unsafe fn validate_graphics_pipeline_create_info(
        &self,
        create_info: &vk::GraphicsPipelineCreateInfo<'_>,
        index: usize,
        all_flags: &[vk::PipelineCreateFlags],
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let features = &capabilities.features;
        let &vk::GraphicsPipelineCreateInfo {
            p_next,
            flags,
            stage_count,
            p_stages,
            p_dynamic_state,
            layout,
            render_pass,
            subpass,
            base_pipeline_handle,
            base_pipeline_index,
            ..
        } = create_info;

        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &GRAPHICS_PIPELINE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            PIPELINE_CREATE_FLAGS.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkGraphicsPipelineCreateInfo-flags-parameter"],
            &[],
        ));
        violations.append(validate_ray_tracing_only_flags(flags, PipelineKind::Graphics));

        if flags.contains(vk::PipelineCreateFlags::LIBRARY_KHR)
            && !features.graphics_pipeline_library
        {
            violations.push(ValidationError {
                context: "flags".into(),
                problem: "contains `VK_PIPELINE_CREATE_LIBRARY_BIT_KHR`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "graphics_pipeline_library",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-graphicsPipelineLibrary-06606"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        let dynamic_states = match p_dynamic_state.as_ref() {
            Some(dynamic_state) => {
                let (dynamic_states, dynamic_violations) =
                    self.validate_dynamic_state(dynamic_state, PipelineKind::Graphics);
                violations.append(dynamic_violations.add_context("p_dynamic_state"));

                dynamic_states
            }
            None => DynamicStates::default(),
        };

        let state = effective_state(create_info, &dynamic_states);
        let effective = &state.create_info;

        // Shader stages.
        if state.has(vk::GraphicsPipelineLibraryFlagsEXT::PRE_RASTERIZATION_SHADERS)
            || state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER)
        {
            violations.append(validate_array(
                "stage_count",
                "p_stages",
                stage_count,
                p_stages,
                ArrayRules {
                    count_required: false,
                    array_required: true,
                    count_vuids: &[],
                    array_vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-06600"],
                },
            ));
            violations.append(self.validate_shader_stages(
                slice_or_empty(p_stages, stage_count),
                PipelineKind::Graphics,
                GRAPHICS_STAGES,
                &["VUID-VkGraphicsPipelineCreateInfo-pStages-06896"],
                &["VUID-VkGraphicsPipelineCreateInfo-stage-06897"],
            ));
        }

        if state.has(vk::GraphicsPipelineLibraryFlagsEXT::PRE_RASTERIZATION_SHADERS) {
            violations.append(validate_stage_combination(&state));
        }

        // Vertex input interface.
        if state.has(vk::GraphicsPipelineLibraryFlagsEXT::VERTEX_INPUT_INTERFACE)
            && !state.has_stage(vk::ShaderStageFlags::MESH_EXT)
        {
            match effective.p_vertex_input_state.as_ref() {
                Some(vertex_input_state) => {
                    if !dynamic_states.contains(vk::DynamicState::VERTEX_INPUT_EXT) {
                        violations.append(
                            self.validate_vertex_input_state(vertex_input_state)
                                .add_context("p_vertex_input_state"),
                        );
                    }
                }
                None => {
                    if !dynamic_states.contains(vk::DynamicState::VERTEX_INPUT_EXT) {
                        violations.push(ValidationError {
                            context: "p_vertex_input_state".into(),
                            problem: "is null, but the pipeline has a vertex input interface, and \
                                the vertex input state is not dynamic"
                                .into(),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-02097"],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                }
            }

            match effective.p_input_assembly_state.as_ref() {
                Some(input_assembly_state) => {
                    violations.append(
                        self.validate_input_assembly_state(
                            input_assembly_state,
                            dynamic_states.contains(vk::DynamicState::PRIMITIVE_RESTART_ENABLE),
                        )
                        .add_context("p_input_assembly_state"),
                    );
                }
                None => violations.push(ValidationError {
                    context: "p_input_assembly_state".into(),
                    problem: "is null, but the pipeline has a vertex input interface".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-02098"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                }),
            }
        }

        // Pre-rasterization shaders.
        if state.has(vk::GraphicsPipelineLibraryFlagsEXT::PRE_RASTERIZATION_SHADERS) {
            let has_tessellation = state.has_stage(vk::ShaderStageFlags::TESSELLATION_CONTROL)
                && state.has_stage(vk::ShaderStageFlags::TESSELLATION_EVALUATION);

            if has_tessellation {
                match effective.p_tessellation_state.as_ref() {
                    Some(tessellation_state) => violations.append(
                        self.validate_tessellation_state(tessellation_state, &dynamic_states)
                            .add_context("p_tessellation_state"),
                    ),
                    None if !dynamic_states
                        .contains(vk::DynamicState::PATCH_CONTROL_POINTS_EXT) =>
                    {
                        violations.push(ValidationError {
                            context: "p_tessellation_state".into(),
                            problem: "is null, but `p_stages` contains tessellation shaders"
                                .into(),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-00731"],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                    None => (),
                }
            }

            if let Some(input_assembly_state) = effective.p_input_assembly_state.as_ref() {
                violations.append(validate_patch_topology(
                    input_assembly_state.topology,
                    has_tessellation,
                    &dynamic_states,
                ));
            }

            match effective.p_rasterization_state.as_ref() {
                Some(rasterization_state) => violations.append(
                    self.validate_rasterization_state(rasterization_state, &dynamic_states)
                        .add_context("p_rasterization_state"),
                ),
                None => violations.push(ValidationError {
                    context: "p_rasterization_state".into(),
                    problem: "is null, but the pipeline has pre-rasterization shaders".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pRasterizationState-06601"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                }),
            }

            if !state.rasterizer_discard {
                let viewports_dynamic = dynamic_states
                    .contains(vk::DynamicState::VIEWPORT_WITH_COUNT)
                    && dynamic_states.contains(vk::DynamicState::SCISSOR_WITH_COUNT);

                match effective.p_viewport_state.as_ref() {
                    Some(viewport_state) => violations.append(
                        self.validate_viewport_state(viewport_state, &dynamic_states)
                            .add_context("p_viewport_state"),
                    ),
                    None if !viewports_dynamic => violations.push(ValidationError {
                        context: "p_viewport_state".into(),
                        problem: "is null, but rasterization is not discarded".into(),
                        vuids: &["VUID-VkGraphicsPipelineCreateInfo-rasterizerDiscardEnable-00750"],
                        kind: ViolationKind::MissingCompanion,
                        ..Default::default()
                    }),
                    None => (),
                }
            }
        }

        // The attachments of the subpass decide whether the fragment states are used.
        let subpass_usage = if render_pass.is_null() {
            if (state.has(vk::GraphicsPipelineLibraryFlagsEXT::PRE_RASTERIZATION_SHADERS)
                || state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER)
                || state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_OUTPUT_INTERFACE))
                && !features.dynamic_rendering
            {
                violations.push(ValidationError {
                    context: "render_pass".into(),
                    problem: "is `VK_NULL_HANDLE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "dynamic_rendering",
                    )])]),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-dynamicRendering-06576"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            match find_in_chain::<vk::PipelineRenderingCreateInfo<'_>>(p_next) {
                Some(rendering_info) => {
                    let (usage, rendering_violations) = self.rendering_usage(rendering_info);
                    violations.append(rendering_violations.add_context("p_next"));

                    Some(usage)
                }
                None => Some(SubpassUsage::default()),
            }
        } else {
            self.subpass_usage(render_pass, subpass)
        };

        // Fragment shader.
        if state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER)
            && !state.rasterizer_discard
        {
            match effective.p_depth_stencil_state.as_ref() {
                Some(depth_stencil_state) => {
                    if subpass_usage.is_some_and(|usage| usage.uses_depth_stencil_attachment) {
                        violations.append(
                            self.validate_depth_stencil_state(depth_stencil_state, &dynamic_states)
                                .add_context("p_depth_stencil_state"),
                        );
                    }
                }
                None => {
                    if subpass_usage.is_some_and(|usage| usage.uses_depth_stencil_attachment) {
                        violations.push(ValidationError {
                            context: "p_depth_stencil_state".into(),
                            problem: "is null, but the subpass uses a depth/stencil attachment"
                                .into(),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06043"],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                }
            }
        }

        // Fragment output interface.
        if state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_OUTPUT_INTERFACE)
            && !state.rasterizer_discard
        {
            match effective.p_color_blend_state.as_ref() {
                Some(color_blend_state) => {
                    if let Some(usage) =
                        subpass_usage.filter(|usage| usage.uses_color_attachment)
                    {
                        violations.append(
                            self.validate_color_blend_state(
                                color_blend_state,
                                Some(usage.color_attachment_count),
                            )
                            .add_context("p_color_blend_state"),
                        );
                    }
                }
                None => {
                    if subpass_usage.is_some_and(|usage| usage.uses_color_attachment) {
                        violations.push(ValidationError {
                            context: "p_color_blend_state".into(),
                            problem: "is null, but the subpass uses color attachments".into(),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06044"],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                }
            }
        }

        if !state.rasterizer_discard
            && (state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER)
                || state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_OUTPUT_INTERFACE))
        {
            match effective.p_multisample_state.as_ref() {
                Some(multisample_state) => violations.append(
                    self.validate_multisample_state(multisample_state)
                        .add_context("p_multisample_state"),
                ),
                None => violations.push(ValidationError {
                    context: "p_multisample_state".into(),
                    problem: "is null, but rasterization is not discarded".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-rasterizerDiscardEnable-00751"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                }),
            }
        }

        if (state.has(vk::GraphicsPipelineLibraryFlagsEXT::PRE_RASTERIZATION_SHADERS)
            || state.has(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_SHADER))
            && !state.is_partial()
        {
            violations.push_opt(validate_required_handle(
                "layout",
                layout,
                &["VUID-VkGraphicsPipelineCreateInfo-layout-06602"],
            ));
        }

        violations.append(validate_pipeline_derivative(
            PipelineKind::Graphics,
            index,
            flags,
            base_pipeline_handle,
            base_pipeline_index,
            all_flags,
        ));

        violations
    }

    /// Summarizes the attachments that a `VkPipelineRenderingCreateInfo` describes.
    unsafe fn rendering_usage(
        &self,
        rendering_info: &vk::PipelineRenderingCreateInfo<'_>,
    ) -> (SubpassUsage, Violations) {
        let mut violations = Violations::new();
        let properties = &self.capabilities().properties;
        let &vk::PipelineRenderingCreateInfo {
            color_attachment_count,
            p_color_attachment_formats,
            depth_attachment_format,
            stencil_attachment_format,
            ..
        } = rendering_info;

        if color_attachment_count > properties.max_color_attachments {
            violations.push(ValidationError {
                context: "color_attachment_count".into(),
                problem: format!(
                    "is {}, which is greater than the `max_color_attachments` limit ({})",
                    color_attachment_count, properties.max_color_attachments,
                )
                .into(),
                vuids: &["VUID-VkPipelineRenderingCreateInfo-colorAttachmentCount-09533"],
                ..Default::default()
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
                array_vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06579"],
            },
        ));

        let formats = slice_or_empty(p_color_attachment_formats, color_attachment_count);

        let usage = SubpassUsage {
            uses_color_attachment: formats
                .iter()
                .any(|&format| format != vk::Format::UNDEFINED),
            uses_depth_stencil_attachment: depth_attachment_format != vk::Format::UNDEFINED
                || stencil_attachment_format != vk::Format::UNDEFINED,
            color_attachment_count,
            flags: vk::SubpassDescriptionFlags::empty(),
        };

        (usage, violations)
    }

    unsafe fn validate_tessellation_state(
        &self,
        tessellation_state: &vk::PipelineTessellationStateCreateInfo<'_>,
        dynamic_states: &DynamicStates,
    ) -> Violations {
        let mut violations = Violations::new();
        let properties = &self.capabilities().properties;
        let &vk::PipelineTessellationStateCreateInfo {
            p_next,
            flags,
            patch_control_points,
            ..
        } = tessellation_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            tessellation_state,
            &["VUID-VkPipelineTessellationStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_TESSELLATION_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineTessellationStateCreateInfo-flags-zerobitmask"],
            &[],
        ));

        if !dynamic_states.contains(vk::DynamicState::PATCH_CONTROL_POINTS_EXT)
            && !in_inclusive_range(
                patch_control_points,
                1,
                properties.max_tessellation_patch_size,
            )
        {
            violations.push(ValidationError {
                context: "patch_control_points".into(),
                problem: format!(
                    "is {}, which is not between 1 and the `max_tessellation_patch_size` limit \
                    ({})",
                    patch_control_points, properties.max_tessellation_patch_size,
                )
                .into(),
                vuids: &["VUID-VkPipelineTessellationStateCreateInfo-patchControlPoints-01214"],
                ..Default::default()
            });
        }

        violations
    }

    unsafe fn validate_rasterization_state(
        &self,
        rasterization_state: &vk::PipelineRasterizationStateCreateInfo<'_>,
        dynamic_states: &DynamicStates,
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::PipelineRasterizationStateCreateInfo {
            p_next,
            flags,
            depth_clamp_enable,
            polygon_mode,
            cull_mode,
            front_face,
            depth_bias_enable,
            depth_bias_clamp,
            line_width,
            ..
        } = rasterization_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            rasterization_state,
            &["VUID-VkPipelineRasterizationStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_RASTERIZATION_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineRasterizationStateCreateInfo-flags-zerobitmask"],
            &[],
        ));
        violations.push_opt(validate_flags(
            "cull_mode",
            cull_mode.as_raw(),
            CULL_MODES.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkPipelineRasterizationStateCreateInfo-cullMode-parameter"],
            &[],
        ));
        violations.push_opt(validate_ranged_enum(
            "front_face",
            front_face.as_raw(),
            FRONT_FACE_VALUES,
            &["VUID-VkPipelineRasterizationStateCreateInfo-frontFace-parameter"],
        ));

        if is_true(depth_clamp_enable) && !features.depth_clamp {
            violations.push(ValidationError {
                context: "depth_clamp_enable".into(),
                problem: "is `VK_TRUE`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_clamp",
                )])]),
                vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-depthClampEnable-00782"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        match validate_ranged_enum(
            "polygon_mode",
            polygon_mode.as_raw(),
            POLYGON_MODE_VALUES,
            &["VUID-VkPipelineRasterizationStateCreateInfo-polygonMode-parameter"],
        ) {
            Some(error) => violations.push(error),
            None => {
                if polygon_mode != vk::PolygonMode::FILL && !features.fill_mode_non_solid {
                    violations.push(ValidationError {
                        context: "polygon_mode".into(),
                        problem: format!("is {:?}", polygon_mode).into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("fill_mode_non_solid"),
                        ])]),
                        vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-polygonMode-01507"],
                        kind: ViolationKind::RequirementNotMet,
                    });
                }
            }
        }

        if !dynamic_states.contains(vk::DynamicState::LINE_WIDTH)
            && !features.wide_lines
            && line_width != 1.0
        {
            violations.push(ValidationError {
                context: "line_width".into(),
                problem: format!("is {}, which is not 1.0", line_width).into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "wide_lines",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00749"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if is_true(depth_bias_enable)
            && !dynamic_states.contains(vk::DynamicState::DEPTH_BIAS)
            && !features.depth_bias_clamp
            && depth_bias_clamp != 0.0
        {
            violations.push(ValidationError {
                context: "depth_bias_clamp".into(),
                problem: format!("is {}, which is not 0.0", depth_bias_clamp).into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_bias_clamp",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00754"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if let Some(depth_clip_state) =
            find_in_chain::<vk::PipelineRasterizationDepthClipStateCreateInfoEXT<'_>>(p_next)
        {
            violations.push_opt(validate_flags(
                "p_next.flags",
                depth_clip_state.flags.as_raw(),
                0u32,
                FlagPolicy::Optional,
                &["VUID-VkPipelineRasterizationDepthClipStateCreateInfoEXT-flags-zerobitmask"],
                &[],
            ));

            if is_true(depth_clip_state.depth_clip_enable) && !features.depth_clip_enable {
                violations.push(ValidationError {
                    context: "p_next.depth_clip_enable".into(),
                    problem: "is `VK_TRUE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "depth_clip_enable",
                    )])]),
                    vuids: &["VUID-VkPipelineRasterizationDepthClipStateCreateInfoEXT-depthClipEnable-03304"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        violations
    }

    unsafe fn validate_multisample_state(
        &self,
        multisample_state: &vk::PipelineMultisampleStateCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let features = &self.capabilities().features;
        let &vk::PipelineMultisampleStateCreateInfo {
            p_next,
            flags,
            rasterization_samples,
            sample_shading_enable,
            min_sample_shading,
            alpha_to_one_enable,
            ..
        } = multisample_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            multisample_state,
            &["VUID-VkPipelineMultisampleStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_MULTISAMPLE_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_flags(
            "flags",
            flags.as_raw(),
            0u32,
            FlagPolicy::Optional,
            &["VUID-VkPipelineMultisampleStateCreateInfo-flags-zerobitmask"],
            &[],
        ));
        violations.push_opt(validate_flags(
            "rasterization_samples",
            rasterization_samples.as_raw(),
            SAMPLE_COUNTS.as_raw(),
            FlagPolicy::RequiredSingleBit,
            &["VUID-VkPipelineMultisampleStateCreateInfo-rasterizationSamples-parameter"],
            &["VUID-VkPipelineMultisampleStateCreateInfo-rasterizationSamples-parameter"],
        ));

        if is_true(sample_shading_enable) {
            if !features.sample_rate_shading {
                violations.push(ValidationError {
                    context: "sample_shading_enable".into(),
                    problem: "is `VK_TRUE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "sample_rate_shading",
                    )])]),
                    vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-sampleShadingEnable-00784"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if !in_inclusive_range(min_sample_shading, 0.0, 1.0) {
                violations.push(ValidationError {
                    context: "min_sample_shading".into(),
                    problem: format!("is {}, which is not between 0.0 and 1.0", min_sample_shading)
                        .into(),
                    vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-minSampleShading-00786"],
                    ..Default::default()
                });
            }
        }

        if is_true(alpha_to_one_enable) && !features.alpha_to_one {
            violations.push(ValidationError {
                context: "alpha_to_one_enable".into(),
                problem: "is `VK_TRUE`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "alpha_to_one",
                )])]),
                vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-alphaToOneEnable-00785"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        violations
    }

    unsafe fn validate_depth_stencil_state(
        &self,
        depth_stencil_state: &vk::PipelineDepthStencilStateCreateInfo<'_>,
        dynamic_states: &DynamicStates,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.capabilities();
        let &vk::PipelineDepthStencilStateCreateInfo {
            p_next,
            depth_compare_op,
            depth_bounds_test_enable,
            front,
            back,
            min_depth_bounds,
            max_depth_bounds,
            ..
        } = depth_stencil_state;

        violations.push_opt(validate_struct_type(
            "s_type",
            depth_stencil_state,
            &["VUID-VkPipelineDepthStencilStateCreateInfo-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "p_next",
            p_next,
            &PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO_CHAIN,
        ));
        violations.push_opt(validate_ranged_enum(
            "depth_compare_op",
            depth_compare_op.as_raw(),
            COMPARE_OP_VALUES,
            &["VUID-VkPipelineDepthStencilStateCreateInfo-depthCompareOp-parameter"],
        ));

        for (context, stencil) in [("front", front), ("back", back)] {
            violations.append_with_context(validate_stencil_op_state(&stencil), || {
                context.to_owned()
            });
        }

        if is_true(depth_bounds_test_enable) {
            if !capabilities.features.depth_bounds {
                violations.push(ValidationError {
                    context: "depth_bounds_test_enable".into(),
                    problem: "is `VK_TRUE`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "depth_bounds",
                    )])]),
                    vuids: &["VUID-VkPipelineDepthStencilStateCreateInfo-depthBoundsTestEnable-00598"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }

            if !dynamic_states.contains(vk::DynamicState::DEPTH_BOUNDS)
                && !capabilities.enabled_extensions.ext_depth_range_unrestricted
            {
                for (context, value) in [
                    ("min_depth_bounds", min_depth_bounds),
                    ("max_depth_bounds", max_depth_bounds),
                ] {
                    if !in_inclusive_range(value, 0.0, 1.0) {
                        violations.push(ValidationError {
                            context: context.into(),
                            problem: format!("is {}, which is not between 0.0 and 1.0", value)
                                .into(),
                            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                                Requires::DeviceExtension("ext_depth_range_unrestricted"),
                            ])]),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-02510"],
                            ..Default::default()
                        });
                    }
                }
            }
        }

        violations
    }
}

fn validate_stencil_op_state(stencil: &vk::StencilOpState) -> Violations {
    let mut violations = Violations::new();

    for (context, op, vuids) in [
        (
            "fail_op",
            stencil.fail_op,
            &["VUID-VkStencilOpState-failOp-parameter"] as &'static [&'static str],
        ),
        (
            "pass_op",
            stencil.pass_op,
            &["VUID-VkStencilOpState-passOp-parameter"],
        ),
        (
            "depth_fail_op",
            stencil.depth_fail_op,
            &["VUID-VkStencilOpState-depthFailOp-parameter"],
        ),
    ] {
        violations.push_opt(validate_ranged_enum(
            context,
            op.as_raw(),
            STENCIL_OP_VALUES,
            vuids,
        ));
    }

    violations.push_opt(validate_ranged_enum(
        "compare_op",
        stencil.compare_op.as_raw(),
        COMPARE_OP_VALUES,
        &["VUID-VkStencilOpState-compareOp-parameter"],
    ));

    violations
}

/// Checks which combinations of pre-rasterization stages a pipeline has.
fn validate_stage_combination(state: &EffectiveState<'_>) -> Violations {
    let mut violations = Violations::new();
    let has_vertex = state.has_stage(vk::ShaderStageFlags::VERTEX);
    let has_mesh = state.has_stage(vk::ShaderStageFlags::MESH_EXT);
    let has_control = state.has_stage(vk::ShaderStageFlags::TESSELLATION_CONTROL);
    let has_evaluation = state.has_stage(vk::ShaderStageFlags::TESSELLATION_EVALUATION);

    if !state.is_partial() && !has_vertex && !has_mesh {
        violations.push(ValidationError {
            context: "p_stages".into(),
            problem: "contains neither a vertex nor a mesh shader".into(),
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-stage-02096"],
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    if has_control && !has_evaluation {
        violations.push(ValidationError {
            context: "p_stages".into(),
            problem: "contains a tessellation control shader, but no tessellation evaluation \
                shader"
                .into(),
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-00729"],
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    if has_evaluation && !has_control {
        violations.push(ValidationError {
            context: "p_stages".into(),
            problem: "contains a tessellation evaluation shader, but no tessellation control \
                shader"
                .into(),
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-00730"],
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    if has_mesh
        && state
            .stages
            .iter()
            .any(|&stage| !(stage & PRE_RASTERIZATION_STAGES).is_empty()
                && !matches!(
                    stage,
                    vk::ShaderStageFlags::MESH_EXT | vk::ShaderStageFlags::TASK_EXT
                ))
    {
        violations.push(ValidationError {
            context: "p_stages".into(),
            problem: "contains a mesh shader together with vertex, tessellation or geometry \
                shaders"
                .into(),
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-02095"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

/// A patch list topology is needed with tessellation shaders, and only with them.
fn validate_patch_topology(
    topology: vk::PrimitiveTopology,
    has_tessellation: bool,
    dynamic_states: &DynamicStates,
) -> Violations {
    let mut violations = Violations::new();

    if dynamic_states.contains(vk::DynamicState::PRIMITIVE_TOPOLOGY) {
        return violations;
    }

    let is_patch_list = topology == vk::PrimitiveTopology::PATCH_LIST;

    if has_tessellation && !is_patch_list {
        violations.push(ValidationError {
            context: "p_input_assembly_state.topology".into(),
            problem: format!(
                "is {:?}, but `p_stages` contains tessellation shaders",
                topology,
            )
            .into(),
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-00736"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if !has_tessellation && is_patch_list {
        violations.push(ValidationError {
            context: "p_input_assembly_state.topology".into(),
            problem: "is `VK_PRIMITIVE_TOPOLOGY_PATCH_LIST`, but `p_stages` does not contain \
                tessellation shaders"
                .into(),
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-topology-08889"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use crate::{
        device::{RenderPassUsage, SubpassUsage},
        tests::{link, test_capabilities, test_validator, test_validator_with},
    };
    use ash::vk::{self, Handle};
    use smallvec::smallvec;
    use std::ptr;

    const MAIN: &std::ffi::CStr = c"main";

    fn stage(stage: vk::ShaderStageFlags) -> vk::PipelineShaderStageCreateInfo<'static> {
        vk::PipelineShaderStageCreateInfo::default()
            .stage(stage)
            .module(vk::ShaderModule::from_raw(0x10))
            .name(MAIN)
    }

    /// The state blocks of a simple triangle pipeline.
    struct States {
        stages: [vk::PipelineShaderStageCreateInfo<'static>; 2],
        vertex_input: vk::PipelineVertexInputStateCreateInfo<'static>,
        input_assembly: vk::PipelineInputAssemblyStateCreateInfo<'static>,
        viewport: vk::PipelineViewportStateCreateInfo<'static>,
        rasterization: vk::PipelineRasterizationStateCreateInfo<'static>,
        multisample: vk::PipelineMultisampleStateCreateInfo<'static>,
        color_blend: vk::PipelineColorBlendStateCreateInfo<'static>,
        dynamic: vk::PipelineDynamicStateCreateInfo<'static>,
    }

    const DYNAMIC: [vk::DynamicState; 2] = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
    const BLEND: [vk::PipelineColorBlendAttachmentState; 1] =
        [vk::PipelineColorBlendAttachmentState {
            blend_enable: vk::FALSE,
            src_color_blend_factor: vk::BlendFactor::ONE,
            dst_color_blend_factor: vk::BlendFactor::ZERO,
            color_blend_op: vk::BlendOp::ADD,
            src_alpha_blend_factor: vk::BlendFactor::ONE,
            dst_alpha_blend_factor: vk::BlendFactor::ZERO,
            alpha_blend_op: vk::BlendOp::ADD,
            color_write_mask: vk::ColorComponentFlags::from_raw(0b1111),
        }];

    impl States {
        fn new() -> Self {
            States {
                stages: [
                    stage(vk::ShaderStageFlags::VERTEX),
                    stage(vk::ShaderStageFlags::FRAGMENT),
                ],
                vertex_input: vk::PipelineVertexInputStateCreateInfo::default(),
                input_assembly: vk::PipelineInputAssemblyStateCreateInfo::default()
                    .topology(vk::PrimitiveTopology::TRIANGLE_LIST),
                viewport: vk::PipelineViewportStateCreateInfo::default()
                    .viewport_count(1)
                    .scissor_count(1),
                rasterization: vk::PipelineRasterizationStateCreateInfo::default()
                    .polygon_mode(vk::PolygonMode::FILL)
                    .line_width(1.0),
                multisample: vk::PipelineMultisampleStateCreateInfo::default()
                    .rasterization_samples(vk::SampleCountFlags::TYPE_1),
                color_blend: vk::PipelineColorBlendStateCreateInfo::default()
                    .attachments(&BLEND),
                dynamic: vk::PipelineDynamicStateCreateInfo::default().dynamic_states(&DYNAMIC),
            }
        }

        fn create_info(&self, render_pass: vk::RenderPass) -> vk::GraphicsPipelineCreateInfo<'_> {
            vk::GraphicsPipelineCreateInfo::default()
                .stages(&self.stages)
                .vertex_input_state(&self.vertex_input)
                .input_assembly_state(&self.input_assembly)
                .viewport_state(&self.viewport)
                .rasterization_state(&self.rasterization)
                .multisample_state(&self.multisample)
                .color_blend_state(&self.color_blend)
                .dynamic_state(&self.dynamic)
                .layout(vk::PipelineLayout::from_raw(0x20))
                .render_pass(render_pass)
                .base_pipeline_index(-1)
        }
    }

    fn recorded_render_pass(validator: &crate::StatelessValidator) -> vk::RenderPass {
        let render_pass = vk::RenderPass::from_raw(0x30);
        validator.insert_render_pass(
            render_pass,
            RenderPassUsage {
                subpasses: smallvec![SubpassUsage {
                    uses_color_attachment: true,
                    uses_depth_stencil_attachment: true,
                    color_attachment_count: 1,
                    flags: vk::SubpassDescriptionFlags::empty(),
                }],
            },
        );

        render_pass
    }

    #[test]
    fn complete_pipeline_is_valid() {
        let validator = test_validator();
        let render_pass = recorded_render_pass(&validator);
        let states = States::new();
        let depth_stencil = vk::PipelineDepthStencilStateCreateInfo::default()
            .depth_compare_op(vk::CompareOp::LESS);
        let create_info = states
            .create_info(render_pass)
            .depth_stencil_state(&depth_stencil);

        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 1, &create_info)
        };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn subpass_attachments_decide_required_states() {
        let validator = test_validator();
        let render_pass = recorded_render_pass(&validator);
        let states = States::new();
        let mut create_info = states.create_info(render_pass);
        create_info.p_color_blend_state = ptr::null();

        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 1, &create_info)
        };
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-renderPass-06044");
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-renderPass-06043");
        assert_eq!(violations.len(), 2, "{}", violations);
        assert_eq!(violations[0].context, "p_create_infos[0].p_depth_stencil_state");

        // A render pass that was never recorded: nothing is known about the subpass.
        let mut create_info = states.create_info(vk::RenderPass::from_raw(0x99));
        create_info.p_color_blend_state = ptr::null();
        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 1, &create_info)
        };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn rasterizer_discard_skips_fragment_states() {
        let validator = test_validator();
        let render_pass = recorded_render_pass(&validator);
        let mut states = States::new();
        states.rasterization.rasterizer_discard_enable = vk::TRUE;
        let mut create_info = states.create_info(render_pass);
        create_info.p_viewport_state = ptr::null();
        create_info.p_multisample_state = ptr::null();
        create_info.p_color_blend_state = ptr::null();

        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 1, &create_info)
        };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn dynamic_rendering_formats_give_subpass_usage() {
        let mut capabilities = test_capabilities();
        capabilities.features.dynamic_rendering = false;
        let validator = test_validator_with(capabilities);
        let states = States::new();
        let formats = [vk::Format::R8G8B8A8_UNORM, vk::Format::R8G8B8A8_UNORM];
        let mut rendering = vk::PipelineRenderingCreateInfo::default()
            .color_attachment_formats(&formats);
        let mut create_info = states.create_info(vk::RenderPass::null());
        create_info.p_next = link(&mut rendering, ptr::null());
        create_info.p_depth_stencil_state = ptr::null();

        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 1, &create_info)
        };
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-dynamicRendering-06576");
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-renderPass-07609");
        assert_no_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-renderPass-06043");
    }

    #[test]
    fn library_subsets_limit_checked_state() {
        let validator = test_validator();
        let states = States::new();
        let mut library_info = vk::GraphicsPipelineLibraryCreateInfoEXT::default()
            .flags(vk::GraphicsPipelineLibraryFlagsEXT::VERTEX_INPUT_INTERFACE);
        let mut create_info = vk::GraphicsPipelineCreateInfo::default()
            .flags(vk::PipelineCreateFlags::LIBRARY_KHR)
            .input_assembly_state(&states.input_assembly)
            .base_pipeline_index(-1);
        create_info.p_next = link(&mut library_info, ptr::null());

        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 1, &create_info)
        };
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pStages-02097");
        assert_eq!(violations.len(), 1, "{}", violations);
    }

    #[test]
    fn stage_combinations_and_states() {
        let mut capabilities = test_capabilities();
        capabilities.features.wide_lines = false;
        capabilities.features.depth_clamp = false;
        let validator = test_validator_with(capabilities);
        let render_pass = recorded_render_pass(&validator);
        let mut states = States::new();
        states.stages[0] = stage(vk::ShaderStageFlags::TESSELLATION_CONTROL);
        states.rasterization.line_width = 2.0;
        states.rasterization.depth_clamp_enable = vk::TRUE;
        let depth_stencil = vk::PipelineDepthStencilStateCreateInfo::default();
        let create_info = states
            .create_info(render_pass)
            .depth_stencil_state(&depth_stencil);

        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 1, &create_info)
        };
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-stage-02096");
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pStages-00729");
        assert_vuid!(violations, "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00749");
        assert_vuid!(
            violations,
            "VUID-VkPipelineRasterizationStateCreateInfo-depthClampEnable-00782",
        );
    }

    #[test]
    fn create_info_array() {
        let validator = test_validator();
        let violations = unsafe {
            validator.validate_create_graphics_pipelines(vk::PipelineCache::null(), 0, ptr::null())
        };
        assert_vuid!(violations, "VUID-vkCreateGraphicsPipelines-createInfoCount-arraylength");
        assert_eq!(violations.len(), 1);
    }
}
