// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Walking and validating `p_next` extension chains.
//!
//! Vulkan structures are extended by linking further structures through their `p_next` field.
//! Each link starts with a structure type tag, so a chain can be walked without knowing the
//! concrete types in it. Rule functions use [`find_in_chain`] to fetch an optional extension
//! structure by type, and [`validate_chain`] to check that a chain only contains structures that
//! are allowed to extend its parent.

use crate::{RequiresOneOf, SupportsRequirements, ValidationError, ViolationKind, Violations};
use ash::vk;
use foldhash::HashSet;
use smallvec::SmallVec;
use std::{ffi::c_void, marker::PhantomData, ptr};

/// The default upper bound on the number of links that are walked in one chain.
pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 256;

/// A Vulkan structure that starts with a structure type tag and can be found in a `p_next`
/// chain.
///
/// # Safety
///
/// The type must be `#[repr(C)]`, start with a `vk::StructureType` followed by a `p_next`
/// pointer, and `STRUCTURE_TYPE` must be the tag that Vulkan assigns to it.
pub unsafe trait ChainStruct {
    const STRUCTURE_TYPE: vk::StructureType;
}

/// Returns the structure type tag stored in `value`.
#[inline]
pub fn structure_type_of<T: ChainStruct>(value: &T) -> vk::StructureType {
    // SAFETY: `ChainStruct` guarantees that the tag is the first field.
    unsafe { *ptr::from_ref(value).cast::<vk::StructureType>() }
}

/// Iterates over the links of a `p_next` chain, stopping after `max_len` links.
///
/// This iterator does not detect cycles; [`validate_chain`] does.
#[derive(Clone)]
pub struct ChainIter<'a> {
    next: *const vk::BaseInStructure<'a>,
    remaining: usize,
    marker: PhantomData<&'a vk::BaseInStructure<'a>>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a vk::BaseInStructure<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: guaranteed by the caller of `chain_iter`.
        let current = unsafe { self.next.as_ref() }?;
        self.next = current.p_next;
        self.remaining -= 1;

        Some(current)
    }
}

/// Returns an iterator over the links of the chain starting at `p_next`.
///
/// # Safety
///
/// Every link of the chain, up to `max_len` links, must be a valid Vulkan structure for `'a`.
#[inline]
pub unsafe fn chain_iter<'a>(p_next: *const c_void, max_len: usize) -> ChainIter<'a> {
    ChainIter {
        next: p_next.cast(),
        remaining: max_len,
        marker: PhantomData,
    }
}

/// Returns the first structure of type `T` in the chain starting at `p_next`.
///
/// # Safety
///
/// Same as [`chain_iter`].
pub unsafe fn find_in_chain<'a, T: ChainStruct + 'a>(p_next: *const c_void) -> Option<&'a T> {
    chain_iter(p_next, DEFAULT_MAX_CHAIN_LENGTH)
        .find(|link| link.s_type == T::STRUCTURE_TYPE)
        // SAFETY: the tag identifies the structure as a `T`.
        .map(|link| &*ptr::from_ref(link).cast::<T>())
}

/// Returns whether a structure of type `T` is present in the chain starting at `p_next`.
///
/// # Safety
///
/// Same as [`chain_iter`].
#[inline]
pub unsafe fn chain_contains<T: ChainStruct>(p_next: *const c_void) -> bool {
    chain_iter(p_next, DEFAULT_MAX_CHAIN_LENGTH).any(|link| link.s_type == T::STRUCTURE_TYPE)
}

/// Returns whether a structure with the tag `s_type` is present in the chain starting at
/// `p_next`. This is for structures that have no `ChainStruct` implementation.
///
/// # Safety
///
/// Same as [`chain_iter`].
#[inline]
pub unsafe fn chain_contains_tag(p_next: *const c_void, s_type: vk::StructureType) -> bool {
    chain_iter(p_next, DEFAULT_MAX_CHAIN_LENGTH).any(|link| link.s_type == s_type)
}

/// A structure type that may appear in a particular chain.
#[derive(Clone, Copy, Debug)]
pub struct AllowedStruct {
    pub s_type: vk::StructureType,

    /// What must be enabled for the structure to be used. Empty if it is always allowed.
    pub requires_one_of: RequiresOneOf,

    /// The structure may appear more than once even when the chain requires unique types.
    pub repeatable: bool,
}

impl AllowedStruct {
    /// Allows the structure type of `T` without requirements.
    #[inline]
    pub const fn of<T: ChainStruct>() -> Self {
        Self {
            s_type: T::STRUCTURE_TYPE,
            requires_one_of: RequiresOneOf(&[]),
            repeatable: false,
        }
    }

    /// Allows a structure type by its tag alone, for structures that no rule reads.
    #[inline]
    pub const fn tag(s_type: vk::StructureType) -> Self {
        Self {
            s_type,
            requires_one_of: RequiresOneOf(&[]),
            repeatable: false,
        }
    }

    /// Adds requirements for using the structure.
    #[inline]
    pub const fn requires(mut self, requires_one_of: RequiresOneOf) -> Self {
        self.requires_one_of = requires_one_of;
        self
    }

    /// Allows the structure to appear more than once.
    #[inline]
    pub const fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }
}

/// The rules for the chain of one parent structure.
#[derive(Clone, Copy, Debug)]
pub struct ChainRules {
    pub allowed: &'static [AllowedStruct],

    /// Each structure type may appear at most once.
    pub unique: bool,

    /// Reported for a structure that is not in `allowed`.
    pub vuids_next: &'static [&'static str],

    /// Reported for a structure type that appears more than once.
    pub vuids_unique: &'static [&'static str],
}

/// Validates every link of the chain starting at `p_next`.
///
/// Each disallowed link is reported separately. A link that revisits an earlier address, or a
/// chain longer than `max_len`, is reported once and ends the walk.
///
/// # Safety
///
/// Every link of the chain, up to `max_len` links, must be a valid Vulkan structure.
pub unsafe fn validate_chain(
    capabilities: &impl SupportsRequirements,
    context: &'static str,
    p_next: *const c_void,
    rules: &ChainRules,
    max_len: usize,
) -> Violations {
    let mut violations = Violations::new();
    let mut visited: HashSet<usize> = HashSet::default();
    let mut seen: SmallVec<[vk::StructureType; 8]> = SmallVec::new();
    let mut next: *const vk::BaseInStructure<'_> = p_next.cast();
    let mut index = 0;

    while let Some(link) = next.as_ref() {
        if index == max_len {
            violations.push(ValidationError {
                context: context.into(),
                problem: format!("has more than {} structures", max_len).into(),
                vuids: &["UNASSIGNED-GeneralParameterError-ChainTooLong"],
                kind: ViolationKind::ChainStructure,
                ..Default::default()
            });
            break;
        }

        if !visited.insert(next as usize) {
            violations.push(ValidationError {
                context: format!("{}[{}]", context, index).into(),
                problem: "links back to an earlier structure in the same chain".into(),
                vuids: &["UNASSIGNED-GeneralParameterError-CyclicChain"],
                kind: ViolationKind::ChainStructure,
                ..Default::default()
            });
            break;
        }

        match rules.allowed.iter().find(|allowed| allowed.s_type == link.s_type) {
            None => {
                violations.push(ValidationError {
                    context: format!("{}[{}]", context, index).into(),
                    problem: format!(
                        "is a structure of type {:?}, which may not extend this structure",
                        link.s_type,
                    )
                    .into(),
                    vuids: rules.vuids_next,
                    kind: ViolationKind::ChainStructure,
                    ..Default::default()
                });
            }
            Some(allowed) => {
                if !capabilities.satisfies(allowed.requires_one_of) {
                    violations.push(ValidationError {
                        context: format!("{}[{}]", context, index).into(),
                        problem: format!("is a structure of type {:?}", link.s_type).into(),
                        requires_one_of: allowed.requires_one_of,
                        vuids: rules.vuids_next,
                        kind: ViolationKind::RequirementNotMet,
                    });
                }

                if rules.unique && !allowed.repeatable && seen.contains(&link.s_type) {
                    violations.push(ValidationError {
                        context: format!("{}[{}]", context, index).into(),
                        problem: format!(
                            "is a structure of type {:?}, which already appears earlier in the \
                            chain",
                            link.s_type,
                        )
                        .into(),
                        vuids: rules.vuids_unique,
                        kind: ViolationKind::ChainStructure,
                        ..Default::default()
                    });
                }

                seen.push(link.s_type);
            }
        }

        next = link.p_next;
        index += 1;
    }

    violations
}

chain_structs! {
    ApplicationInfo = APPLICATION_INFO,
    InstanceCreateInfo = INSTANCE_CREATE_INFO,
    DebugUtilsMessengerCreateInfoEXT = DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT,
    DebugReportCallbackCreateInfoEXT = DEBUG_REPORT_CALLBACK_CREATE_INFO_EXT,
    ValidationFeaturesEXT = VALIDATION_FEATURES_EXT,
    ValidationFlagsEXT = VALIDATION_FLAGS_EXT,
    LayerSettingsCreateInfoEXT = LAYER_SETTINGS_CREATE_INFO_EXT,
    DirectDriverLoadingListLUNARG = DIRECT_DRIVER_LOADING_LIST_LUNARG,

    DeviceCreateInfo = DEVICE_CREATE_INFO,
    DeviceQueueCreateInfo = DEVICE_QUEUE_CREATE_INFO,
    DeviceGroupDeviceCreateInfo = DEVICE_GROUP_DEVICE_CREATE_INFO,
    PhysicalDeviceFeatures2 = PHYSICAL_DEVICE_FEATURES_2,
    PhysicalDeviceVulkan11Features = PHYSICAL_DEVICE_VULKAN_1_1_FEATURES,
    PhysicalDeviceVulkan12Features = PHYSICAL_DEVICE_VULKAN_1_2_FEATURES,
    PhysicalDeviceVulkan13Features = PHYSICAL_DEVICE_VULKAN_1_3_FEATURES,
    PhysicalDeviceMultiviewFeatures = PHYSICAL_DEVICE_MULTIVIEW_FEATURES,
    PhysicalDeviceSamplerYcbcrConversionFeatures = PHYSICAL_DEVICE_SAMPLER_YCBCR_CONVERSION_FEATURES,
    PhysicalDeviceBufferDeviceAddressFeatures = PHYSICAL_DEVICE_BUFFER_DEVICE_ADDRESS_FEATURES,
    PhysicalDeviceTimelineSemaphoreFeatures = PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_FEATURES,
    PhysicalDeviceDescriptorIndexingFeatures = PHYSICAL_DEVICE_DESCRIPTOR_INDEXING_FEATURES,
    PhysicalDeviceSynchronization2Features = PHYSICAL_DEVICE_SYNCHRONIZATION_2_FEATURES,
    PhysicalDeviceDynamicRenderingFeatures = PHYSICAL_DEVICE_DYNAMIC_RENDERING_FEATURES,
    PhysicalDeviceInlineUniformBlockFeatures = PHYSICAL_DEVICE_INLINE_UNIFORM_BLOCK_FEATURES,
    PhysicalDeviceMeshShaderFeaturesEXT = PHYSICAL_DEVICE_MESH_SHADER_FEATURES_EXT,
    PhysicalDeviceAccelerationStructureFeaturesKHR = PHYSICAL_DEVICE_ACCELERATION_STRUCTURE_FEATURES_KHR,
    PhysicalDeviceRayTracingPipelineFeaturesKHR = PHYSICAL_DEVICE_RAY_TRACING_PIPELINE_FEATURES_KHR,
    PhysicalDeviceRayQueryFeaturesKHR = PHYSICAL_DEVICE_RAY_QUERY_FEATURES_KHR,
    PhysicalDeviceDescriptorBufferFeaturesEXT = PHYSICAL_DEVICE_DESCRIPTOR_BUFFER_FEATURES_EXT,
    PhysicalDeviceMutableDescriptorTypeFeaturesEXT = PHYSICAL_DEVICE_MUTABLE_DESCRIPTOR_TYPE_FEATURES_EXT,
    PhysicalDeviceGraphicsPipelineLibraryFeaturesEXT = PHYSICAL_DEVICE_GRAPHICS_PIPELINE_LIBRARY_FEATURES_EXT,
    PhysicalDeviceExtendedDynamicStateFeaturesEXT = PHYSICAL_DEVICE_EXTENDED_DYNAMIC_STATE_FEATURES_EXT,
    PhysicalDeviceBlendOperationAdvancedFeaturesEXT = PHYSICAL_DEVICE_BLEND_OPERATION_ADVANCED_FEATURES_EXT,
    PhysicalDeviceDepthClipEnableFeaturesEXT = PHYSICAL_DEVICE_DEPTH_CLIP_ENABLE_FEATURES_EXT,
    PhysicalDeviceCustomBorderColorFeaturesEXT = PHYSICAL_DEVICE_CUSTOM_BORDER_COLOR_FEATURES_EXT,
    PhysicalDeviceRobustness2FeaturesEXT = PHYSICAL_DEVICE_ROBUSTNESS_2_FEATURES_EXT,
    PhysicalDevicePresentIdFeaturesKHR = PHYSICAL_DEVICE_PRESENT_ID_FEATURES_KHR,

    BufferCreateInfo = BUFFER_CREATE_INFO,
    BufferOpaqueCaptureAddressCreateInfo = BUFFER_OPAQUE_CAPTURE_ADDRESS_CREATE_INFO,
    BufferDeviceAddressCreateInfoEXT = BUFFER_DEVICE_ADDRESS_CREATE_INFO_EXT,
    ExternalMemoryBufferCreateInfo = EXTERNAL_MEMORY_BUFFER_CREATE_INFO,
    BufferViewCreateInfo = BUFFER_VIEW_CREATE_INFO,

    ImageCreateInfo = IMAGE_CREATE_INFO,
    ImageFormatListCreateInfo = IMAGE_FORMAT_LIST_CREATE_INFO,
    ImageStencilUsageCreateInfo = IMAGE_STENCIL_USAGE_CREATE_INFO,
    ExternalMemoryImageCreateInfo = EXTERNAL_MEMORY_IMAGE_CREATE_INFO,
    ImageDrmFormatModifierListCreateInfoEXT = IMAGE_DRM_FORMAT_MODIFIER_LIST_CREATE_INFO_EXT,
    ImageDrmFormatModifierExplicitCreateInfoEXT = IMAGE_DRM_FORMAT_MODIFIER_EXPLICIT_CREATE_INFO_EXT,
    ImageSwapchainCreateInfoKHR = IMAGE_SWAPCHAIN_CREATE_INFO_KHR,
    ImageViewCreateInfo = IMAGE_VIEW_CREATE_INFO,
    ImageViewUsageCreateInfo = IMAGE_VIEW_USAGE_CREATE_INFO,
    SamplerYcbcrConversionInfo = SAMPLER_YCBCR_CONVERSION_INFO,
    PhysicalDeviceImageFormatInfo2 = PHYSICAL_DEVICE_IMAGE_FORMAT_INFO_2,
    PhysicalDeviceExternalImageFormatInfo = PHYSICAL_DEVICE_EXTERNAL_IMAGE_FORMAT_INFO,
    PhysicalDeviceImageDrmFormatModifierInfoEXT = PHYSICAL_DEVICE_IMAGE_DRM_FORMAT_MODIFIER_INFO_EXT,

    SamplerCreateInfo = SAMPLER_CREATE_INFO,
    SamplerReductionModeCreateInfo = SAMPLER_REDUCTION_MODE_CREATE_INFO,
    SamplerCustomBorderColorCreateInfoEXT = SAMPLER_CUSTOM_BORDER_COLOR_CREATE_INFO_EXT,

    MemoryAllocateInfo = MEMORY_ALLOCATE_INFO,
    MemoryAllocateFlagsInfo = MEMORY_ALLOCATE_FLAGS_INFO,
    MemoryDedicatedAllocateInfo = MEMORY_DEDICATED_ALLOCATE_INFO,
    ExportMemoryAllocateInfo = EXPORT_MEMORY_ALLOCATE_INFO,
    ImportMemoryFdInfoKHR = IMPORT_MEMORY_FD_INFO_KHR,
    MemoryOpaqueCaptureAddressAllocateInfo = MEMORY_OPAQUE_CAPTURE_ADDRESS_ALLOCATE_INFO,
    MappedMemoryRange = MAPPED_MEMORY_RANGE,

    QueryPoolCreateInfo = QUERY_POOL_CREATE_INFO,

    DescriptorSetLayoutCreateInfo = DESCRIPTOR_SET_LAYOUT_CREATE_INFO,
    DescriptorSetLayoutBindingFlagsCreateInfo = DESCRIPTOR_SET_LAYOUT_BINDING_FLAGS_CREATE_INFO,
    MutableDescriptorTypeCreateInfoEXT = MUTABLE_DESCRIPTOR_TYPE_CREATE_INFO_EXT,
    DescriptorPoolCreateInfo = DESCRIPTOR_POOL_CREATE_INFO,
    DescriptorPoolInlineUniformBlockCreateInfo = DESCRIPTOR_POOL_INLINE_UNIFORM_BLOCK_CREATE_INFO,
    DescriptorSetAllocateInfo = DESCRIPTOR_SET_ALLOCATE_INFO,
    DescriptorSetVariableDescriptorCountAllocateInfo = DESCRIPTOR_SET_VARIABLE_DESCRIPTOR_COUNT_ALLOCATE_INFO,
    WriteDescriptorSet = WRITE_DESCRIPTOR_SET,
    WriteDescriptorSetAccelerationStructureKHR = WRITE_DESCRIPTOR_SET_ACCELERATION_STRUCTURE_KHR,
    WriteDescriptorSetInlineUniformBlock = WRITE_DESCRIPTOR_SET_INLINE_UNIFORM_BLOCK,
    CopyDescriptorSet = COPY_DESCRIPTOR_SET,

    PipelineLayoutCreateInfo = PIPELINE_LAYOUT_CREATE_INFO,
    GraphicsPipelineCreateInfo = GRAPHICS_PIPELINE_CREATE_INFO,
    ComputePipelineCreateInfo = COMPUTE_PIPELINE_CREATE_INFO,
    PipelineShaderStageCreateInfo = PIPELINE_SHADER_STAGE_CREATE_INFO,
    PipelineShaderStageRequiredSubgroupSizeCreateInfo = PIPELINE_SHADER_STAGE_REQUIRED_SUBGROUP_SIZE_CREATE_INFO,
    PipelineVertexInputStateCreateInfo = PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO,
    PipelineInputAssemblyStateCreateInfo = PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO,
    PipelineTessellationStateCreateInfo = PIPELINE_TESSELLATION_STATE_CREATE_INFO,
    PipelineTessellationDomainOriginStateCreateInfo = PIPELINE_TESSELLATION_DOMAIN_ORIGIN_STATE_CREATE_INFO,
    PipelineViewportStateCreateInfo = PIPELINE_VIEWPORT_STATE_CREATE_INFO,
    PipelineRasterizationStateCreateInfo = PIPELINE_RASTERIZATION_STATE_CREATE_INFO,
    PipelineRasterizationDepthClipStateCreateInfoEXT = PIPELINE_RASTERIZATION_DEPTH_CLIP_STATE_CREATE_INFO_EXT,
    PipelineMultisampleStateCreateInfo = PIPELINE_MULTISAMPLE_STATE_CREATE_INFO,
    PipelineDepthStencilStateCreateInfo = PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO,
    PipelineColorBlendStateCreateInfo = PIPELINE_COLOR_BLEND_STATE_CREATE_INFO,
    PipelineColorBlendAdvancedStateCreateInfoEXT = PIPELINE_COLOR_BLEND_ADVANCED_STATE_CREATE_INFO_EXT,
    PipelineDynamicStateCreateInfo = PIPELINE_DYNAMIC_STATE_CREATE_INFO,
    PipelineRenderingCreateInfo = PIPELINE_RENDERING_CREATE_INFO,
    GraphicsPipelineLibraryCreateInfoEXT = GRAPHICS_PIPELINE_LIBRARY_CREATE_INFO_EXT,
    PipelineLibraryCreateInfoKHR = PIPELINE_LIBRARY_CREATE_INFO_KHR,
    PipelineCreationFeedbackCreateInfo = PIPELINE_CREATION_FEEDBACK_CREATE_INFO,
    RayTracingPipelineCreateInfoKHR = RAY_TRACING_PIPELINE_CREATE_INFO_KHR,
    RayTracingShaderGroupCreateInfoKHR = RAY_TRACING_SHADER_GROUP_CREATE_INFO_KHR,
    RayTracingPipelineInterfaceCreateInfoKHR = RAY_TRACING_PIPELINE_INTERFACE_CREATE_INFO_KHR,

    RenderPassCreateInfo = RENDER_PASS_CREATE_INFO,
    RenderPassMultiviewCreateInfo = RENDER_PASS_MULTIVIEW_CREATE_INFO,
    RenderPassInputAttachmentAspectCreateInfo = RENDER_PASS_INPUT_ATTACHMENT_ASPECT_CREATE_INFO,
    RenderPassCreateInfo2 = RENDER_PASS_CREATE_INFO_2,
    AttachmentDescription2 = ATTACHMENT_DESCRIPTION_2,
    SubpassDescription2 = SUBPASS_DESCRIPTION_2,
    SubpassDependency2 = SUBPASS_DEPENDENCY_2,
    AttachmentReference2 = ATTACHMENT_REFERENCE_2,
    SubpassDescriptionDepthStencilResolve = SUBPASS_DESCRIPTION_DEPTH_STENCIL_RESOLVE,
    RenderingInfo = RENDERING_INFO,
    RenderingAttachmentInfo = RENDERING_ATTACHMENT_INFO,
    DeviceGroupRenderPassBeginInfo = DEVICE_GROUP_RENDER_PASS_BEGIN_INFO,

    CommandPoolCreateInfo = COMMAND_POOL_CREATE_INFO,
    CommandBufferAllocateInfo = COMMAND_BUFFER_ALLOCATE_INFO,
    CommandBufferBeginInfo = COMMAND_BUFFER_BEGIN_INFO,
    CommandBufferInheritanceInfo = COMMAND_BUFFER_INHERITANCE_INFO,
    CommandBufferInheritanceRenderingInfo = COMMAND_BUFFER_INHERITANCE_RENDERING_INFO,
    DeviceGroupCommandBufferBeginInfo = DEVICE_GROUP_COMMAND_BUFFER_BEGIN_INFO,

    SemaphoreCreateInfo = SEMAPHORE_CREATE_INFO,
    SemaphoreTypeCreateInfo = SEMAPHORE_TYPE_CREATE_INFO,
    ExportSemaphoreCreateInfo = EXPORT_SEMAPHORE_CREATE_INFO,
    FenceCreateInfo = FENCE_CREATE_INFO,
    ExportFenceCreateInfo = EXPORT_FENCE_CREATE_INFO,
    EventCreateInfo = EVENT_CREATE_INFO,
    SemaphoreGetFdInfoKHR = SEMAPHORE_GET_FD_INFO_KHR,
    ImportSemaphoreFdInfoKHR = IMPORT_SEMAPHORE_FD_INFO_KHR,
    ImportSemaphoreWin32HandleInfoKHR = IMPORT_SEMAPHORE_WIN32_HANDLE_INFO_KHR,
    FenceGetFdInfoKHR = FENCE_GET_FD_INFO_KHR,
    ImportFenceFdInfoKHR = IMPORT_FENCE_FD_INFO_KHR,
    ImportFenceWin32HandleInfoKHR = IMPORT_FENCE_WIN32_HANDLE_INFO_KHR,
    MemoryBarrier = MEMORY_BARRIER,
    BufferMemoryBarrier = BUFFER_MEMORY_BARRIER,
    ImageMemoryBarrier = IMAGE_MEMORY_BARRIER,
    DependencyInfo = DEPENDENCY_INFO,
    MemoryBarrier2 = MEMORY_BARRIER_2,
    BufferMemoryBarrier2 = BUFFER_MEMORY_BARRIER_2,
    ImageMemoryBarrier2 = IMAGE_MEMORY_BARRIER_2,

    AccelerationStructureCreateInfoKHR = ACCELERATION_STRUCTURE_CREATE_INFO_KHR,
    AccelerationStructureBuildGeometryInfoKHR = ACCELERATION_STRUCTURE_BUILD_GEOMETRY_INFO_KHR,
    AccelerationStructureGeometryKHR = ACCELERATION_STRUCTURE_GEOMETRY_KHR,
    AccelerationStructureGeometryTrianglesDataKHR = ACCELERATION_STRUCTURE_GEOMETRY_TRIANGLES_DATA_KHR,
    AccelerationStructureGeometryAabbsDataKHR = ACCELERATION_STRUCTURE_GEOMETRY_AABBS_DATA_KHR,
    AccelerationStructureGeometryInstancesDataKHR = ACCELERATION_STRUCTURE_GEOMETRY_INSTANCES_DATA_KHR,
    AccelerationStructureBuildSizesInfoKHR = ACCELERATION_STRUCTURE_BUILD_SIZES_INFO_KHR,
    CopyAccelerationStructureInfoKHR = COPY_ACCELERATION_STRUCTURE_INFO_KHR,
    CopyAccelerationStructureToMemoryInfoKHR = COPY_ACCELERATION_STRUCTURE_TO_MEMORY_INFO_KHR,
    CopyMemoryToAccelerationStructureInfoKHR = COPY_MEMORY_TO_ACCELERATION_STRUCTURE_INFO_KHR,

    SwapchainCreateInfoKHR = SWAPCHAIN_CREATE_INFO_KHR,
    DeviceGroupSwapchainCreateInfoKHR = DEVICE_GROUP_SWAPCHAIN_CREATE_INFO_KHR,
    PresentInfoKHR = PRESENT_INFO_KHR,
    PresentRegionsKHR = PRESENT_REGIONS_KHR,
    PresentIdKHR = PRESENT_ID_KHR,
    DeviceGroupPresentInfoKHR = DEVICE_GROUP_PRESENT_INFO_KHR,
    PhysicalDeviceSurfaceInfo2KHR = PHYSICAL_DEVICE_SURFACE_INFO_2_KHR,
    SurfaceFormat2KHR = SURFACE_FORMAT_2_KHR,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tests::{link, test_capabilities},
        Requires, RequiresAllOf,
    };

    const ALLOWED: &[AllowedStruct] = &[
        AllowedStruct::of::<vk::ImageFormatListCreateInfo<'static>>(),
        AllowedStruct::of::<vk::ImageStencilUsageCreateInfo<'static>>(),
        AllowedStruct::of::<vk::ExternalMemoryImageCreateInfo<'static>>().requires(RequiresOneOf(
            &[
                RequiresAllOf(&[Requires::APIVersion(crate::Version::V1_1)]),
                RequiresAllOf(&[Requires::DeviceExtension("khr_external_memory")]),
            ],
        )),
    ];

    const RULES: ChainRules = ChainRules {
        allowed: ALLOWED,
        unique: true,
        vuids_next: &["VUID-VkImageCreateInfo-pNext-pNext"],
        vuids_unique: &["VUID-VkImageCreateInfo-sType-unique"],
    };

    #[test]
    fn allowed_chain_has_no_violations() {
        let caps = test_capabilities();
        let mut format_list = vk::ImageFormatListCreateInfo::default();
        let mut stencil_usage = vk::ImageStencilUsageCreateInfo::default();

        let head = link(&mut stencil_usage, ptr::null());
        let head = link(&mut format_list, head);

        let violations =
            unsafe { validate_chain(&caps, "p_next", head, &RULES, DEFAULT_MAX_CHAIN_LENGTH) };
        assert!(violations.is_empty());
    }

    #[test]
    fn each_disallowed_link_is_reported() {
        let caps = test_capabilities();
        let mut format_list = vk::ImageFormatListCreateInfo::default();
        let mut bad_first = vk::BufferCreateInfo::default();
        let mut bad_second = vk::SamplerCreateInfo::default();

        let head = link(&mut bad_second, ptr::null());
        let head = link(&mut format_list, head);
        let head = link(&mut bad_first, head);

        let violations =
            unsafe { validate_chain(&caps, "p_next", head, &RULES, DEFAULT_MAX_CHAIN_LENGTH) };
        assert_eq!(violations.count_vuid("VUID-VkImageCreateInfo-pNext-pNext"), 2);
        assert_eq!(violations[0].context, "p_next[0]");
        assert_eq!(violations[1].context, "p_next[2]");
    }

    #[test]
    fn duplicates_are_reported() {
        let caps = test_capabilities();
        let mut first = vk::ImageFormatListCreateInfo::default();
        let mut second = vk::ImageFormatListCreateInfo::default();

        let head = link(&mut second, ptr::null());
        let head = link(&mut first, head);

        let violations =
            unsafe { validate_chain(&caps, "p_next", head, &RULES, DEFAULT_MAX_CHAIN_LENGTH) };
        assert_eq!(violations.len(), 1);
        assert!(violations.contains_vuid("VUID-VkImageCreateInfo-sType-unique"));
    }

    #[test]
    fn gated_struct_needs_requirement() {
        let mut caps = test_capabilities();
        caps.api_version = crate::Version::V1_0;
        let mut external = vk::ExternalMemoryImageCreateInfo::default();
        let head = link(&mut external, ptr::null());

        let violations =
            unsafe { validate_chain(&caps, "p_next", head, &RULES, DEFAULT_MAX_CHAIN_LENGTH) };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::RequirementNotMet);

        caps.api_version = crate::Version::V1_1;
        let violations =
            unsafe { validate_chain(&caps, "p_next", head, &RULES, DEFAULT_MAX_CHAIN_LENGTH) };
        assert!(violations.is_empty());
    }

    #[test]
    fn cycles_and_length_are_bounded() {
        let caps = test_capabilities();
        let mut first = vk::ImageFormatListCreateInfo::default();
        let mut second = vk::ImageStencilUsageCreateInfo::default();

        let second_ptr = link(&mut second, ptr::null());
        let head = link(&mut first, second_ptr);
        link(&mut second, head);

        let violations =
            unsafe { validate_chain(&caps, "p_next", head, &RULES, DEFAULT_MAX_CHAIN_LENGTH) };
        assert!(violations.contains_vuid("UNASSIGNED-GeneralParameterError-CyclicChain"));

        link(&mut second, ptr::null());
        let violations = unsafe { validate_chain(&caps, "p_next", head, &RULES, 1) };
        assert!(violations.contains_vuid("UNASSIGNED-GeneralParameterError-ChainTooLong"));
    }

    #[test]
    fn typed_lookup() {
        let mut format_list = vk::ImageFormatListCreateInfo::default();
        let mut stencil_usage =
            vk::ImageStencilUsageCreateInfo::default().stencil_usage(vk::ImageUsageFlags::SAMPLED);

        let head = link(&mut stencil_usage, ptr::null());
        let head = link(&mut format_list, head);

        let found = unsafe { find_in_chain::<vk::ImageStencilUsageCreateInfo<'_>>(head) };
        assert_eq!(
            found.map(|s| s.stencil_usage),
            Some(vk::ImageUsageFlags::SAMPLED),
        );
        assert!(unsafe { find_in_chain::<vk::BufferCreateInfo<'_>>(head) }.is_none());
        assert!(unsafe { chain_contains::<vk::ImageFormatListCreateInfo<'_>>(head) });
    }
}
