// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Validation of instance-level entry points, and the per-physical-device cache.
//!
//! An [`InstanceValidator`] exists for the lifetime of one `VkInstance`. It knows which
//! extensions the instance was created with, and caches the properties and supported
//! extensions of every physical device the application enumerates, so that device creation can
//! check its arguments against them.

use crate::{
    cache::OnceCache,
    capabilities::{enabled_names, ExtensionState},
    chain::{self, chain_iter, find_in_chain, AllowedStruct, ChainRules},
    extensions::{
        DeviceExtensions, InstanceExtensions, DEVICE_EXTENSION_DEPENDENCIES,
        INSTANCE_EXTENSION_DEPENDENCIES,
    },
    features::DeviceFeatures,
    predicates::{
        fixed_c_str, in_inclusive_range, slice_or_empty, validate_array, validate_flags,
        validate_string, validate_struct_type, validate_struct_type_array, ArrayRules, FlagPolicy,
    },
    properties::DeviceProperties,
    sink::ViolationSink,
    DeviceCapabilities, InstanceCapabilities, Requires, RequiresAllOf, RequiresOneOf,
    StatelessValidator, StatelessValidatorCreateInfo, SupportsRequirements, ValidationError,
    Version, ViolationKind, Violations,
};
use ash::vk;
use smallvec::SmallVec;
use std::{
    ffi::{c_char, c_void},
    fmt,
    sync::Arc,
};
use tracing::{debug, trace};

/// The longest string argument that is accepted, including the terminator.
pub const MAX_STRING_LENGTH: usize = vk::MAX_EXTENSION_NAME_SIZE;

/// What the driver reports about a physical device.
#[derive(Clone, Debug, Default)]
pub struct PhysicalDeviceInfo {
    /// The highest API version that the physical device supports.
    pub api_version: Version,
    pub properties: DeviceProperties,
    pub supported_extensions: DeviceExtensions,
}

/// The driver queries that the validators need.
///
/// This is implemented for [`ash::Instance`]. The methods are only called with physical device
/// handles that were enumerated from the same instance.
pub trait PhysicalDeviceQueries: Send + Sync {
    /// Queries the API version, limits and supported extensions of a physical device.
    fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Result<PhysicalDeviceInfo, vk::Result>;

    /// Queries the format properties of a physical device.
    fn format_properties(
        &self,
        physical_device: vk::PhysicalDevice,
        format: vk::Format,
    ) -> vk::FormatProperties;
}

impl PhysicalDeviceQueries for ash::Instance {
    fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Result<PhysicalDeviceInfo, vk::Result> {
        // SAFETY: the handle was enumerated from this instance.
        let (properties, memory_properties, extension_properties) = unsafe {
            (
                self.get_physical_device_properties(physical_device),
                self.get_physical_device_memory_properties(physical_device),
                self.enumerate_device_extension_properties(physical_device)?,
            )
        };

        let api_version = Version::from_vulkan_version(properties.api_version);
        let supported_extensions = DeviceExtensions::from_names(
            extension_properties
                .iter()
                .filter_map(|extension| fixed_c_str(&extension.extension_name)),
        );
        let mut device_properties = DeviceProperties::from_vk(&properties, &memory_properties);

        if api_version >= Version::V1_1 {
            let mut push_descriptor = vk::PhysicalDevicePushDescriptorPropertiesKHR::default();
            let mut inline_uniform_block =
                vk::PhysicalDeviceInlineUniformBlockProperties::default();
            let mut mesh_shader = vk::PhysicalDeviceMeshShaderPropertiesEXT::default();
            let mut ray_tracing_pipeline =
                vk::PhysicalDeviceRayTracingPipelinePropertiesKHR::default();
            let mut acceleration_structure =
                vk::PhysicalDeviceAccelerationStructurePropertiesKHR::default();
            let mut blend_operation_advanced =
                vk::PhysicalDeviceBlendOperationAdvancedPropertiesEXT::default();

            let mut properties2 = vk::PhysicalDeviceProperties2::default();

            if supported_extensions.khr_push_descriptor {
                properties2 = properties2.push_next(&mut push_descriptor);
            }

            let has_inline_uniform_block =
                api_version >= Version::V1_3 || supported_extensions.ext_inline_uniform_block;

            if has_inline_uniform_block {
                properties2 = properties2.push_next(&mut inline_uniform_block);
            }

            if supported_extensions.ext_mesh_shader {
                properties2 = properties2.push_next(&mut mesh_shader);
            }

            if supported_extensions.khr_ray_tracing_pipeline {
                properties2 = properties2.push_next(&mut ray_tracing_pipeline);
            }

            if supported_extensions.khr_acceleration_structure {
                properties2 = properties2.push_next(&mut acceleration_structure);
            }

            if supported_extensions.ext_blend_operation_advanced {
                properties2 = properties2.push_next(&mut blend_operation_advanced);
            }

            // SAFETY: the handle was enumerated from this instance, and the chain only contains
            // structures of extensions that the physical device supports.
            unsafe { self.get_physical_device_properties2(physical_device, &mut properties2) };

            if supported_extensions.khr_push_descriptor {
                device_properties.set_push_descriptor(&push_descriptor);
            }

            if has_inline_uniform_block {
                device_properties.set_inline_uniform_block(&inline_uniform_block);
            }

            if supported_extensions.ext_mesh_shader {
                device_properties.set_mesh_shader(&mesh_shader);
            }

            if supported_extensions.khr_ray_tracing_pipeline {
                device_properties.set_ray_tracing_pipeline(&ray_tracing_pipeline);
            }

            if supported_extensions.khr_acceleration_structure {
                device_properties.set_acceleration_structure(&acceleration_structure);
            }

            if supported_extensions.ext_blend_operation_advanced {
                device_properties.set_blend_operation_advanced(&blend_operation_advanced);
            }
        }

        Ok(PhysicalDeviceInfo {
            api_version,
            properties: device_properties,
            supported_extensions,
        })
    }

    fn format_properties(
        &self,
        physical_device: vk::PhysicalDevice,
        format: vk::Format,
    ) -> vk::FormatProperties {
        // SAFETY: the handle was enumerated from this instance.
        unsafe { self.get_physical_device_format_properties(physical_device, format) }
    }
}

/// Validates the arguments of instance-level entry points.
pub struct InstanceValidator {
    instance: vk::Instance,
    capabilities: InstanceCapabilities,
    queries: Arc<dyn PhysicalDeviceQueries>,
    create_info: StatelessValidatorCreateInfo,
    physical_devices: OnceCache<vk::PhysicalDevice, Arc<PhysicalDeviceInfo>>,
}

impl InstanceValidator {
    /// Creates a validator for an instance that was created with `capabilities`.
    pub fn new(
        instance: vk::Instance,
        capabilities: InstanceCapabilities,
        queries: Arc<dyn PhysicalDeviceQueries>,
        create_info: StatelessValidatorCreateInfo,
    ) -> Self {
        InstanceValidator {
            instance,
            capabilities,
            queries,
            create_info,
            physical_devices: OnceCache::new(),
        }
    }

    /// Returns the instance that this validator belongs to.
    #[inline]
    pub fn instance(&self) -> vk::Instance {
        self.instance
    }

    /// Returns what the instance was created with.
    #[inline]
    pub fn capabilities(&self) -> &InstanceCapabilities {
        &self.capabilities
    }

    /// Returns the cached information about a physical device, if it was enumerated.
    pub fn physical_device_info(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Option<Arc<PhysicalDeviceInfo>> {
        self.physical_devices.get(&physical_device)
    }

    /// Validates the arguments of `vkCreateInstance`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_instance(
        create_info: &vk::InstanceCreateInfo<'_>,
        max_chain_length: usize,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = InstanceCapabilities::from_create_info(create_info);

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkInstanceCreateInfo-sType-sType"],
        ));

        violations.push_opt(validate_flags(
            "create_info.flags",
            create_info.flags.as_raw(),
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR.as_raw(),
            FlagPolicy::Optional,
            &["VUID-VkInstanceCreateInfo-flags-parameter"],
            &[],
        ));

        if create_info
            .flags
            .contains(vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR)
            && !capabilities.enabled_extensions.khr_portability_enumeration
        {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "contains `VK_INSTANCE_CREATE_ENUMERATE_PORTABILITY_BIT_KHR`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::InstanceExtension(
                    "khr_portability_enumeration",
                )])]),
                vuids: &["VUID-VkInstanceCreateInfo-flags-06559"],
                kind: ViolationKind::RequirementNotMet,
            });
        }

        if let Some(application_info) = create_info.p_application_info.as_ref() {
            violations.append(
                validate_application_info(application_info)
                    .add_context("create_info.p_application_info"),
            );
        }

        violations.append(validate_names(
            "create_info.enabled_layer_count",
            "create_info.pp_enabled_layer_names",
            create_info.enabled_layer_count,
            create_info.pp_enabled_layer_names,
            &["VUID-VkInstanceCreateInfo-ppEnabledLayerNames-parameter"],
        ));
        violations.append(validate_names(
            "create_info.enabled_extension_count",
            "create_info.pp_enabled_extension_names",
            create_info.enabled_extension_count,
            create_info.pp_enabled_extension_names,
            &["VUID-VkInstanceCreateInfo-ppEnabledExtensionNames-parameter"],
        ));

        for &(member, requires_one_of) in INSTANCE_EXTENSION_DEPENDENCIES {
            if capabilities.enabled_extensions.get(member) == Some(true)
                && !capabilities.satisfies(requires_one_of)
            {
                violations.push(ValidationError {
                    context: "create_info.pp_enabled_extension_names".into(),
                    problem: format!(
                        "contains `{}`",
                        InstanceExtensions::name_of(member).unwrap_or(member),
                    )
                    .into(),
                    requires_one_of,
                    vuids: &["VUID-vkCreateInstance-ppEnabledExtensionNames-01388"],
                    kind: ViolationKind::RequirementNotMet,
                });
            }
        }

        violations.append(chain::validate_chain(
            &capabilities,
            "create_info.p_next",
            create_info.p_next,
            &INSTANCE_CREATE_INFO_CHAIN,
            max_chain_length,
        ));
        violations.append(validate_instance_chain_contents(
            &capabilities,
            create_info.p_next,
            max_chain_length,
        ));

        violations
    }

    /// Reports the violations of `vkCreateInstance` to `sink`, and returns whether there were
    /// any.
    ///
    /// # Safety
    ///
    /// Same as [`InstanceValidator::validate_create_instance`].
    pub unsafe fn pre_call_validate_create_instance(
        create_info: &vk::InstanceCreateInfo<'_>,
        settings: &StatelessValidatorCreateInfo,
    ) -> bool {
        let violations = Self::validate_create_instance(create_info, settings.max_chain_length);

        report(&*settings.sink, "vkCreateInstance", &violations)
    }

    /// Creates the validator for a newly created instance. Returns `None` if the instance was
    /// not created.
    ///
    /// # Safety
    ///
    /// `create_info` must be the create info that was passed to `vkCreateInstance`.
    pub unsafe fn post_call_record_create_instance(
        create_info: &vk::InstanceCreateInfo<'_>,
        instance: vk::Instance,
        queries: Arc<dyn PhysicalDeviceQueries>,
        settings: StatelessValidatorCreateInfo,
        result: vk::Result,
    ) -> Option<Self> {
        if result != vk::Result::SUCCESS {
            return None;
        }

        let capabilities = InstanceCapabilities::from_create_info(create_info);
        debug!(
            ?instance,
            api_version = %capabilities.api_version,
            "recorded instance capabilities",
        );

        Some(InstanceValidator::new(
            instance,
            capabilities,
            queries,
            settings,
        ))
    }

    /// Caches the properties and supported extensions of every enumerated physical device that
    /// is not cached yet.
    pub fn post_call_record_enumerate_physical_devices(
        &self,
        physical_devices: &[vk::PhysicalDevice],
        result: vk::Result,
    ) {
        if !matches!(result, vk::Result::SUCCESS | vk::Result::INCOMPLETE) {
            return;
        }

        for &physical_device in physical_devices {
            self.cache_physical_device(physical_device);
        }
    }

    fn cache_physical_device(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> Option<Arc<PhysicalDeviceInfo>> {
        let result = self
            .physical_devices
            .get_or_try_insert(&physical_device, || {
                let info = self.queries.physical_device_info(physical_device)?;
                trace!(
                    ?physical_device,
                    api_version = %info.api_version,
                    "cached physical device",
                );

                Ok::<_, vk::Result>((physical_device, Arc::new(info)))
            });

        match result {
            Ok(info) => Some(info),
            Err(err) => {
                debug!(?physical_device, ?err, "could not query physical device");
                None
            }
        }
    }

    /// Releases every cached physical device.
    pub fn pre_call_record_destroy_instance(&self) {
        let released = self.physical_devices.clear();
        debug!(
            instance = ?self.instance,
            released,
            "released cached physical devices",
        );
    }

    /// Returns the capabilities that a device would have if it were created from
    /// `physical_device` with `create_info`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn device_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        create_info: &vk::DeviceCreateInfo<'_>,
    ) -> DeviceCapabilities {
        let info = self.cache_physical_device(physical_device);
        let api_version = info.as_ref().map_or(self.capabilities.api_version, |info| {
            info.api_version
                .without_patch()
                .min(self.capabilities.api_version)
        });

        DeviceCapabilities {
            api_version,
            instance_extensions: self.capabilities.enabled_extensions.clone(),
            enabled_extensions: DeviceExtensions::from_names(enabled_names(
                create_info.pp_enabled_extension_names,
                create_info.enabled_extension_count,
            )),
            supported_extensions: info.as_ref().map(|info| info.supported_extensions.clone()),
            features: DeviceFeatures::from_create_info(create_info),
            properties: info
                .as_ref()
                .map(|info| info.properties.clone())
                .unwrap_or_default(),
        }
    }

    /// Validates the arguments of `vkCreateDevice`.
    ///
    /// # Safety
    ///
    /// `create_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        create_info: &vk::DeviceCreateInfo<'_>,
    ) -> Violations {
        let mut violations = Violations::new();
        let capabilities = self.device_capabilities(physical_device, create_info);
        let max_chain_length = self.create_info.max_chain_length;

        violations.push_opt(validate_struct_type(
            "create_info.s_type",
            create_info,
            &["VUID-VkDeviceCreateInfo-sType-sType"],
        ));

        if create_info.flags != vk::DeviceCreateFlags::empty() {
            violations.push(ValidationError {
                context: "create_info.flags".into(),
                problem: "is not zero".into(),
                vuids: &["VUID-VkDeviceCreateInfo-flags-zerobitmask"],
                ..Default::default()
            });
        }

        violations.append(validate_array(
            "create_info.queue_create_info_count",
            "create_info.p_queue_create_infos",
            create_info.queue_create_info_count,
            create_info.p_queue_create_infos,
            ArrayRules {
                count_required: true,
                array_required: true,
                count_vuids: &["VUID-VkDeviceCreateInfo-queueCreateInfoCount-arraylength"],
                array_vuids: &["VUID-VkDeviceCreateInfo-pQueueCreateInfos-parameter"],
            },
        ));

        let queue_create_infos = slice_or_empty(
            create_info.p_queue_create_infos,
            create_info.queue_create_info_count,
        );
        violations.append(validate_struct_type_array(
            "create_info.p_queue_create_infos",
            queue_create_infos,
            &["VUID-VkDeviceQueueCreateInfo-sType-sType"],
        ));

        let mut seen_families: SmallVec<[(u32, vk::DeviceQueueCreateFlags); 8]> =
            SmallVec::new();

        for (index, queue_create_info) in queue_create_infos.iter().enumerate() {
            violations.append_with_context(
                validate_queue_create_info(&capabilities, queue_create_info, max_chain_length),
                || format!("create_info.p_queue_create_infos[{}]", index),
            );

            let key = (queue_create_info.queue_family_index, queue_create_info.flags);

            if seen_families.contains(&key) {
                violations.push(ValidationError {
                    context: format!(
                        "create_info.p_queue_create_infos[{}].queue_family_index",
                        index,
                    )
                    .into(),
                    problem: format!(
                        "is {}, which an earlier element with the same flags also uses",
                        queue_create_info.queue_family_index,
                    )
                    .into(),
                    vuids: &["VUID-VkDeviceCreateInfo-queueFamilyIndex-02802"],
                    kind: ViolationKind::IllegalCombination,
                    ..Default::default()
                });
            } else {
                seen_families.push(key);
            }
        }

        violations.append(validate_names(
            "create_info.enabled_layer_count",
            "create_info.pp_enabled_layer_names",
            create_info.enabled_layer_count,
            create_info.pp_enabled_layer_names,
            &["VUID-VkDeviceCreateInfo-ppEnabledLayerNames-parameter"],
        ));
        violations.append(validate_names(
            "create_info.enabled_extension_count",
            "create_info.pp_enabled_extension_names",
            create_info.enabled_extension_count,
            create_info.pp_enabled_extension_names,
            &["VUID-VkDeviceCreateInfo-ppEnabledExtensionNames-parameter"],
        ));

        violations.append(validate_device_extensions(&capabilities));

        violations.append(chain::validate_chain(
            &capabilities,
            "create_info.p_next",
            create_info.p_next,
            &DEVICE_CREATE_INFO_CHAIN,
            max_chain_length,
        ));
        violations.append(validate_device_feature_structs(
            &capabilities.features,
            create_info,
        ));

        violations
    }

    /// Reports the violations of `vkCreateDevice`, and returns whether there were any.
    ///
    /// # Safety
    ///
    /// Same as [`InstanceValidator::validate_create_device`].
    pub unsafe fn pre_call_validate_create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        create_info: &vk::DeviceCreateInfo<'_>,
    ) -> bool {
        self.report(
            "vkCreateDevice",
            &self.validate_create_device(physical_device, create_info),
        )
    }

    /// Creates the validator for a newly created device. Returns `None` if the device was not
    /// created.
    ///
    /// # Safety
    ///
    /// `create_info` must be the create info that was passed to `vkCreateDevice`.
    pub unsafe fn post_call_record_create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        create_info: &vk::DeviceCreateInfo<'_>,
        device: vk::Device,
        result: vk::Result,
    ) -> Option<StatelessValidator> {
        if result != vk::Result::SUCCESS {
            return None;
        }

        let capabilities = self.device_capabilities(physical_device, create_info);
        debug!(
            ?device,
            ?physical_device,
            api_version = %capabilities.api_version,
            "recorded device capabilities",
        );

        Some(StatelessValidator::new(
            device,
            physical_device,
            capabilities,
            Some(self.queries.clone()),
            self.create_info.clone(),
        ))
    }

    /// Validates the arguments of `vkEnumerateDeviceExtensionProperties`.
    ///
    /// # Safety
    ///
    /// `layer_name` must be null or a valid string.
    pub unsafe fn validate_enumerate_device_extension_properties(
        &self,
        layer_name: *const c_char,
    ) -> Violations {
        let mut violations = Violations::new();

        if !layer_name.is_null() {
            violations.push_opt(validate_string(
                "layer_name",
                layer_name,
                MAX_STRING_LENGTH,
                &["VUID-vkEnumerateDeviceExtensionProperties-pLayerName-parameter"],
            ));
        }

        violations
    }

    /// # Safety
    ///
    /// Same as [`InstanceValidator::validate_enumerate_device_extension_properties`].
    pub unsafe fn pre_call_validate_enumerate_device_extension_properties(
        &self,
        layer_name: *const c_char,
    ) -> bool {
        self.report(
            "vkEnumerateDeviceExtensionProperties",
            &self.validate_enumerate_device_extension_properties(layer_name),
        )
    }

    /// Validates the arguments of `vkGetPhysicalDeviceImageFormatProperties2`.
    ///
    /// # Safety
    ///
    /// `image_format_info` must be valid as described in the crate documentation.
    pub unsafe fn validate_get_physical_device_image_format_properties2(
        &self,
        image_format_info: &vk::PhysicalDeviceImageFormatInfo2<'_>,
    ) -> Violations {
        let mut violations = Violations::new();

        violations.push_opt(validate_struct_type(
            "image_format_info.s_type",
            image_format_info,
            &["VUID-VkPhysicalDeviceImageFormatInfo2-sType-sType"],
        ));
        violations.append(self.validate_chain(
            "image_format_info.p_next",
            image_format_info.p_next,
            &IMAGE_FORMAT_INFO_CHAIN,
        ));

        if image_format_info.usage.is_empty() {
            violations.push(ValidationError {
                context: "image_format_info.usage".into(),
                problem: "is empty".into(),
                vuids: &["VUID-VkPhysicalDeviceImageFormatInfo2-usage-requiredbitmask"],
                ..Default::default()
            });
        }

        let drm_info = find_in_chain::<vk::PhysicalDeviceImageDrmFormatModifierInfoEXT<'_>>(
            image_format_info.p_next,
        );

        match (image_format_info.tiling, drm_info) {
            (vk::ImageTiling::DRM_FORMAT_MODIFIER_EXT, None) => {
                violations.push(ValidationError {
                    context: "image_format_info.p_next".into(),
                    problem: "`tiling` is `VK_IMAGE_TILING_DRM_FORMAT_MODIFIER_EXT`, but the \
                        chain does not include a \
                        `VkPhysicalDeviceImageDrmFormatModifierInfoEXT` structure"
                        .into(),
                    vuids: &["VUID-VkPhysicalDeviceImageFormatInfo2-tiling-02249"],
                    kind: ViolationKind::MissingCompanion,
                    ..Default::default()
                });
            }
            (vk::ImageTiling::DRM_FORMAT_MODIFIER_EXT, Some(drm_info)) => {
                if drm_info.sharing_mode == vk::SharingMode::CONCURRENT {
                    if drm_info.queue_family_index_count <= 1 {
                        violations.push(ValidationError {
                            context: "image_format_info.p_next.queue_family_index_count".into(),
                            problem: "is not greater than 1, but `sharing_mode` is \
                                `VK_SHARING_MODE_CONCURRENT`"
                                .into(),
                            vuids: &[
                                "VUID-VkPhysicalDeviceImageDrmFormatModifierInfoEXT-sharingMode-02315",
                            ],
                            kind: ViolationKind::IllegalCombination,
                            ..Default::default()
                        });
                    } else if drm_info.p_queue_family_indices.is_null() {
                        violations.push(ValidationError {
                            context: "image_format_info.p_next.p_queue_family_indices".into(),
                            problem: "is null, but `sharing_mode` is \
                                `VK_SHARING_MODE_CONCURRENT`"
                                .into(),
                            vuids: &[
                                "VUID-VkPhysicalDeviceImageDrmFormatModifierInfoEXT-sharingMode-02314",
                            ],
                            kind: ViolationKind::MissingCompanion,
                            ..Default::default()
                        });
                    }
                }
            }
            (_, Some(_)) => {
                violations.push(ValidationError {
                    context: "image_format_info.p_next".into(),
                    problem: "includes a `VkPhysicalDeviceImageDrmFormatModifierInfoEXT` \
                        structure, but `tiling` is not \
                        `VK_IMAGE_TILING_DRM_FORMAT_MODIFIER_EXT`"
                        .into(),
                    vuids: &["VUID-VkPhysicalDeviceImageFormatInfo2-tiling-02313"],
                    kind: ViolationKind::ExtraneousCompanion,
                    ..Default::default()
                });
            }
            (_, None) => (),
        }

        violations
    }

    /// # Safety
    ///
    /// Same as [`InstanceValidator::validate_get_physical_device_image_format_properties2`].
    pub unsafe fn pre_call_validate_get_physical_device_image_format_properties2(
        &self,
        image_format_info: &vk::PhysicalDeviceImageFormatInfo2<'_>,
    ) -> bool {
        self.report(
            "vkGetPhysicalDeviceImageFormatProperties2",
            &self.validate_get_physical_device_image_format_properties2(image_format_info),
        )
    }

    pub(crate) unsafe fn validate_chain(
        &self,
        context: &'static str,
        p_next: *const c_void,
        rules: &ChainRules,
    ) -> Violations {
        chain::validate_chain(
            &self.capabilities,
            context,
            p_next,
            rules,
            self.create_info.max_chain_length,
        )
    }

    pub(crate) fn report(&self, api: &'static str, violations: &Violations) -> bool {
        report(&*self.create_info.sink, api, violations)
    }
}

impl fmt::Debug for InstanceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceValidator")
            .field("instance", &self.instance)
            .field("capabilities", &self.capabilities)
            .field("cached_physical_devices", &self.physical_devices.len())
            .finish_non_exhaustive()
    }
}

fn report(sink: &dyn ViolationSink, api: &'static str, violations: &Violations) -> bool {
    for error in violations.iter() {
        sink.report(api, error);
    }

    !violations.is_empty()
}

/// Checks the API version that an application requests.
pub(crate) fn validate_api_version(api_version: u32) -> Violations {
    let mut violations = Violations::new();

    if api_version == 0 {
        return violations;
    }

    if Version::variant_of(api_version) != 0 {
        violations.push(ValidationError {
            context: "api_version".into(),
            problem: format!(
                "has a variant of {}, but only variant 0 is Vulkan",
                Version::variant_of(api_version),
            )
            .into(),
            vuids: &["UNASSIGNED-API-Version-Violation"],
            ..Default::default()
        });
    }

    if Version::from_vulkan_version(api_version) < Version::V1_0 {
        violations.push(ValidationError {
            context: "api_version".into(),
            problem: format!(
                "is {}, which is lower than Vulkan 1.0",
                Version::from_vulkan_version(api_version),
            )
            .into(),
            vuids: &["VUID-VkApplicationInfo-apiVersion-04010"],
            ..Default::default()
        });
    }

    violations
}

unsafe fn validate_application_info(application_info: &vk::ApplicationInfo<'_>) -> Violations {
    let mut violations = Violations::new();

    violations.push_opt(validate_struct_type(
        "s_type",
        application_info,
        &["VUID-VkApplicationInfo-sType-sType"],
    ));

    if !application_info.p_application_name.is_null() {
        violations.push_opt(validate_string(
            "p_application_name",
            application_info.p_application_name,
            MAX_STRING_LENGTH,
            &["VUID-VkApplicationInfo-pApplicationName-parameter"],
        ));
    }

    if !application_info.p_engine_name.is_null() {
        violations.push_opt(validate_string(
            "p_engine_name",
            application_info.p_engine_name,
            MAX_STRING_LENGTH,
            &["VUID-VkApplicationInfo-pEngineName-parameter"],
        ));
    }

    violations.append(validate_api_version(application_info.api_version));

    violations
}

/// Checks an array of layer or extension names.
unsafe fn validate_names(
    count_context: &'static str,
    array_context: &'static str,
    count: u32,
    names: *const *const c_char,
    vuids: &'static [&'static str],
) -> Violations {
    let mut violations = validate_array(
        count_context,
        array_context,
        count,
        names,
        ArrayRules {
            count_required: false,
            array_required: true,
            count_vuids: &[],
            array_vuids: vuids,
        },
    );

    for (index, &name) in slice_or_empty(names, count).iter().enumerate() {
        violations.push_opt(validate_string(
            format!("{}[{}]", array_context, index),
            name,
            MAX_STRING_LENGTH,
            vuids,
        ));
    }

    violations
}

/// Checks the contents of the structures in the instance create info chain.
unsafe fn validate_instance_chain_contents(
    capabilities: &InstanceCapabilities,
    p_next: *const c_void,
    max_chain_length: usize,
) -> Violations {
    let mut violations = Violations::new();

    for (index, link) in chain_iter(p_next, max_chain_length).enumerate() {
        let context = || format!("create_info.p_next[{}]", index);

        match link.s_type {
            vk::StructureType::DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT => {
                let messenger_info =
                    &*std::ptr::from_ref(link).cast::<vk::DebugUtilsMessengerCreateInfoEXT<'_>>();

                if !capabilities.enabled_extensions.ext_debug_utils {
                    violations.push(ValidationError {
                        context: context().into(),
                        problem: "is a `VkDebugUtilsMessengerCreateInfoEXT` structure".into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::InstanceExtension("ext_debug_utils"),
                        ])]),
                        vuids: &["VUID-VkInstanceCreateInfo-pNext-04925"],
                        kind: ViolationKind::RequirementNotMet,
                    });
                }

                violations.append_with_context(
                    validate_debug_utils_messenger_create_info(messenger_info),
                    context,
                );
            }
            vk::StructureType::DEBUG_REPORT_CALLBACK_CREATE_INFO_EXT => {
                if !capabilities.enabled_extensions.ext_debug_report {
                    violations.push(ValidationError {
                        context: context().into(),
                        problem: "is a `VkDebugReportCallbackCreateInfoEXT` structure".into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::InstanceExtension("ext_debug_report"),
                        ])]),
                        vuids: &["VUID-VkInstanceCreateInfo-pNext-04926"],
                        kind: ViolationKind::RequirementNotMet,
                    });
                }
            }
            vk::StructureType::VALIDATION_FEATURES_EXT => {
                let features = &*std::ptr::from_ref(link).cast::<vk::ValidationFeaturesEXT<'_>>();
                violations.append_with_context(validate_validation_features(features), context);
            }
            _ => (),
        }
    }

    violations
}

fn validate_debug_utils_messenger_create_info(
    create_info: &vk::DebugUtilsMessengerCreateInfoEXT<'_>,
) -> Violations {
    let mut violations = Violations::new();

    if !create_info.flags.is_empty() {
        violations.push(ValidationError {
            context: "flags".into(),
            problem: "is not zero".into(),
            vuids: &["VUID-VkDebugUtilsMessengerCreateInfoEXT-flags-zerobitmask"],
            ..Default::default()
        });
    }

    violations.push_opt(validate_flags(
        "message_severity",
        create_info.message_severity.as_raw(),
        flags_mask!(DebugUtilsMessageSeverityFlagsEXT { VERBOSE, INFO, WARNING, ERROR }).as_raw(),
        FlagPolicy::Required,
        &["VUID-VkDebugUtilsMessengerCreateInfoEXT-messageSeverity-parameter"],
        &["VUID-VkDebugUtilsMessengerCreateInfoEXT-messageSeverity-requiredbitmask"],
    ));
    violations.push_opt(validate_flags(
        "message_type",
        create_info.message_type.as_raw(),
        flags_mask!(DebugUtilsMessageTypeFlagsEXT {
            GENERAL,
            VALIDATION,
            PERFORMANCE,
            DEVICE_ADDRESS_BINDING,
        })
        .as_raw(),
        FlagPolicy::Required,
        &["VUID-VkDebugUtilsMessengerCreateInfoEXT-messageType-parameter"],
        &["VUID-VkDebugUtilsMessengerCreateInfoEXT-messageType-requiredbitmask"],
    ));

    if create_info.pfn_user_callback.is_none() {
        violations.push(ValidationError {
            context: "pfn_user_callback".into(),
            problem: "is null".into(),
            vuids: &["VUID-VkDebugUtilsMessengerCreateInfoEXT-pfnUserCallback-01914"],
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    violations
}

unsafe fn validate_validation_features(features: &vk::ValidationFeaturesEXT<'_>) -> Violations {
    let mut violations = validate_array(
        "enabled_validation_feature_count",
        "p_enabled_validation_features",
        features.enabled_validation_feature_count,
        features.p_enabled_validation_features,
        ArrayRules {
            count_required: false,
            array_required: true,
            count_vuids: &[],
            array_vuids: &["VUID-VkValidationFeaturesEXT-pEnabledValidationFeatures-parameter"],
        },
    );

    let enabled = slice_or_empty(
        features.p_enabled_validation_features,
        features.enabled_validation_feature_count,
    );
    let gpu_assisted = enabled.contains(&vk::ValidationFeatureEnableEXT::GPU_ASSISTED);

    if enabled.contains(&vk::ValidationFeatureEnableEXT::GPU_ASSISTED_RESERVE_BINDING_SLOT)
        && !gpu_assisted
    {
        violations.push(ValidationError {
            context: "p_enabled_validation_features".into(),
            problem: "contains `VK_VALIDATION_FEATURE_ENABLE_GPU_ASSISTED_RESERVE_BINDING_SLOT_EXT` \
                but not `VK_VALIDATION_FEATURE_ENABLE_GPU_ASSISTED_EXT`"
                .into(),
            vuids: &["VUID-VkValidationFeaturesEXT-pEnabledValidationFeatures-02967"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if gpu_assisted && enabled.contains(&vk::ValidationFeatureEnableEXT::DEBUG_PRINTF) {
        violations.push(ValidationError {
            context: "p_enabled_validation_features".into(),
            problem: "contains both `VK_VALIDATION_FEATURE_ENABLE_GPU_ASSISTED_EXT` and \
                `VK_VALIDATION_FEATURE_ENABLE_DEBUG_PRINTF_EXT`"
                .into(),
            vuids: &["VUID-VkValidationFeaturesEXT-pEnabledValidationFeatures-02968"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    violations
}

unsafe fn validate_queue_create_info(
    capabilities: &DeviceCapabilities,
    queue_create_info: &vk::DeviceQueueCreateInfo<'_>,
    max_chain_length: usize,
) -> Violations {
    let mut violations = chain::validate_chain(
        capabilities,
        "p_next",
        queue_create_info.p_next,
        &QUEUE_CREATE_INFO_CHAIN,
        max_chain_length,
    );

    violations.push_opt(validate_flags(
        "flags",
        queue_create_info.flags.as_raw(),
        vk::DeviceQueueCreateFlags::PROTECTED.as_raw(),
        FlagPolicy::Optional,
        &["VUID-VkDeviceQueueCreateInfo-flags-parameter"],
        &[],
    ));

    if queue_create_info
        .flags
        .contains(vk::DeviceQueueCreateFlags::PROTECTED)
        && !capabilities.features.protected_memory
    {
        violations.push(ValidationError {
            context: "flags".into(),
            problem: "contains `VK_DEVICE_QUEUE_CREATE_PROTECTED_BIT`".into(),
            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                "protected_memory",
            )])]),
            vuids: &["VUID-VkDeviceQueueCreateInfo-flags-02861"],
            kind: ViolationKind::RequirementNotMet,
        });
    }

    if queue_create_info.queue_family_index == vk::QUEUE_FAMILY_IGNORED {
        violations.push(ValidationError {
            context: "queue_family_index".into(),
            problem: "is `VK_QUEUE_FAMILY_IGNORED`".into(),
            vuids: &["VUID-VkDeviceQueueCreateInfo-queueFamilyIndex-00381"],
            ..Default::default()
        });
    }

    violations.append(validate_array(
        "queue_count",
        "p_queue_priorities",
        queue_create_info.queue_count,
        queue_create_info.p_queue_priorities,
        ArrayRules {
            count_required: true,
            array_required: true,
            count_vuids: &["VUID-VkDeviceQueueCreateInfo-queueCount-arraylength"],
            array_vuids: &["VUID-VkDeviceQueueCreateInfo-pQueuePriorities-parameter"],
        },
    ));

    let priorities = slice_or_empty(
        queue_create_info.p_queue_priorities,
        queue_create_info.queue_count,
    );

    for (index, &priority) in priorities.iter().enumerate() {
        if !in_inclusive_range(priority, 0.0, 1.0) {
            violations.push(ValidationError {
                context: format!("p_queue_priorities[{}]", index).into(),
                problem: format!("is {}, which is not between 0.0 and 1.0 inclusive", priority)
                    .into(),
                vuids: &["VUID-VkDeviceQueueCreateInfo-pQueuePriorities-00383"],
                ..Default::default()
            });
        }
    }

    violations
}

/// Checks that every enabled device extension has what it depends on.
fn validate_device_extensions(capabilities: &DeviceCapabilities) -> Violations {
    let mut violations = Violations::new();
    let enabled = &capabilities.enabled_extensions;

    for &(member, requires_one_of) in DEVICE_EXTENSION_DEPENDENCIES {
        if enabled.get(member) == Some(true) && !capabilities.satisfies(requires_one_of) {
            violations.push(ValidationError {
                context: "create_info.pp_enabled_extension_names".into(),
                problem: format!(
                    "contains `{}`",
                    DeviceExtensions::name_of(member).unwrap_or(member),
                )
                .into(),
                requires_one_of,
                vuids: &["VUID-vkCreateDevice-ppEnabledExtensionNames-01387"],
                kind: ViolationKind::RequirementNotMet,
            });
        }
    }

    if enabled.khr_buffer_device_address && enabled.ext_buffer_device_address {
        violations.push(ValidationError {
            context: "create_info.pp_enabled_extension_names".into(),
            problem: "contains both `VK_KHR_buffer_device_address` and \
                `VK_EXT_buffer_device_address`"
                .into(),
            vuids: &["VUID-VkDeviceCreateInfo-ppEnabledExtensionNames-03328"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if capabilities.extension_state("khr_portability_subset") == ExtensionState::SupportedNotEnabled
    {
        violations.push(ValidationError {
            context: "create_info.pp_enabled_extension_names".into(),
            problem: "does not contain `VK_KHR_portability_subset`, but the physical device \
                supports it"
                .into(),
            vuids: &["VUID-VkDeviceCreateInfo-pProperties-04451"],
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    violations
}

/// Checks the feature structures of a device create info against each other.
unsafe fn validate_device_feature_structs(
    features: &DeviceFeatures,
    create_info: &vk::DeviceCreateInfo<'_>,
) -> Violations {
    let mut violations = Violations::new();
    let p_next = create_info.p_next;

    if !create_info.p_enabled_features.is_null()
        && chain::chain_contains::<vk::PhysicalDeviceFeatures2<'_>>(p_next)
    {
        violations.push(ValidationError {
            context: "create_info".into(),
            problem: "`p_enabled_features` is not null, but the chain includes a \
                `VkPhysicalDeviceFeatures2` structure"
                .into(),
            vuids: &["VUID-VkDeviceCreateInfo-pNext-00373"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if chain::chain_contains::<vk::PhysicalDeviceVulkan11Features<'_>>(p_next)
        && (chain::chain_contains::<vk::PhysicalDeviceMultiviewFeatures<'_>>(p_next)
            || chain::chain_contains::<vk::PhysicalDeviceSamplerYcbcrConversionFeatures<'_>>(
                p_next,
            ))
    {
        violations.push(ValidationError {
            context: "create_info.p_next".into(),
            problem: "includes a `VkPhysicalDeviceVulkan11Features` structure together with a \
                structure for an individual Vulkan 1.1 feature"
                .into(),
            vuids: &["VUID-VkDeviceCreateInfo-pNext-02829"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if chain::chain_contains::<vk::PhysicalDeviceVulkan12Features<'_>>(p_next)
        && (chain::chain_contains::<vk::PhysicalDeviceBufferDeviceAddressFeatures<'_>>(p_next)
            || chain::chain_contains::<vk::PhysicalDeviceTimelineSemaphoreFeatures<'_>>(p_next)
            || chain::chain_contains::<vk::PhysicalDeviceDescriptorIndexingFeatures<'_>>(p_next))
    {
        violations.push(ValidationError {
            context: "create_info.p_next".into(),
            problem: "includes a `VkPhysicalDeviceVulkan12Features` structure together with a \
                structure for an individual Vulkan 1.2 feature"
                .into(),
            vuids: &["VUID-VkDeviceCreateInfo-pNext-02830"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if chain::chain_contains::<vk::PhysicalDeviceVulkan13Features<'_>>(p_next)
        && (chain::chain_contains::<vk::PhysicalDeviceSynchronization2Features<'_>>(p_next)
            || chain::chain_contains::<vk::PhysicalDeviceDynamicRenderingFeatures<'_>>(p_next)
            || chain::chain_contains::<vk::PhysicalDeviceInlineUniformBlockFeatures<'_>>(p_next))
    {
        violations.push(ValidationError {
            context: "create_info.p_next".into(),
            problem: "includes a `VkPhysicalDeviceVulkan13Features` structure together with a \
                structure for an individual Vulkan 1.3 feature"
                .into(),
            vuids: &["VUID-VkDeviceCreateInfo-pNext-06532"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if features.multiview_geometry_shader && !features.multiview {
        violations.push(ValidationError {
            context: "create_info.p_next".into(),
            problem: "enables `multiview_geometry_shader` without `multiview`".into(),
            vuids: &["VUID-VkPhysicalDeviceMultiviewFeatures-multiviewGeometryShader-00580"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if features.multiview_tessellation_shader && !features.multiview {
        violations.push(ValidationError {
            context: "create_info.p_next".into(),
            problem: "enables `multiview_tessellation_shader` without `multiview`".into(),
            vuids: &["VUID-VkPhysicalDeviceMultiviewFeatures-multiviewTessellationShader-00581"],
            kind: ViolationKind::IllegalCombination,
            ..Default::default()
        });
    }

    if let Some(ray_tracing) =
        find_in_chain::<vk::PhysicalDeviceRayTracingPipelineFeaturesKHR<'_>>(p_next)
    {
        if ray_tracing.ray_tracing_pipeline_shader_group_handle_capture_replay_mixed != vk::FALSE
            && ray_tracing.ray_tracing_pipeline_shader_group_handle_capture_replay == vk::FALSE
        {
            violations.push(ValidationError {
                context: "create_info.p_next".into(),
                problem: "enables `ray_tracing_pipeline_shader_group_handle_capture_replay_mixed` \
                    without `ray_tracing_pipeline_shader_group_handle_capture_replay`"
                    .into(),
                vuids: &["VUID-VkPhysicalDeviceRayTracingPipelineFeaturesKHR-rayTracingPipelineShaderGroupHandleCaptureReplayMixed-03575"],
                kind: ViolationKind::IllegalCombination,
                ..Default::default()
            });
        }
    }

    violations
}

const V1_2: RequiresOneOf =
    RequiresOneOf(&[RequiresAllOf(&[Requires::APIVersion(Version::V1_2)])]);
const V1_3: RequiresOneOf =
    RequiresOneOf(&[RequiresAllOf(&[Requires::APIVersion(Version::V1_3)])]);

const INSTANCE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DebugUtilsMessengerCreateInfoEXT<'static>>().repeatable(),
        AllowedStruct::of::<vk::DebugReportCallbackCreateInfoEXT<'static>>(),
        AllowedStruct::of::<vk::ValidationFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::ValidationFlagsEXT<'static>>(),
        AllowedStruct::of::<vk::LayerSettingsCreateInfoEXT<'static>>().repeatable(),
        AllowedStruct::of::<vk::DirectDriverLoadingListLUNARG<'static>>(),
    ],
    unique: true,
    vuids_next: &["VUID-VkInstanceCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkInstanceCreateInfo-sType-unique"],
};

const QUEUE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[AllowedStruct::tag(
        vk::StructureType::DEVICE_QUEUE_GLOBAL_PRIORITY_CREATE_INFO_KHR,
    )],
    unique: true,
    vuids_next: &["VUID-VkDeviceQueueCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkDeviceQueueCreateInfo-sType-unique"],
};

const DEVICE_CREATE_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::DeviceGroupDeviceCreateInfo<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceFeatures2<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceVulkan11Features<'static>>().requires(V1_2),
        AllowedStruct::of::<vk::PhysicalDeviceVulkan12Features<'static>>().requires(V1_2),
        AllowedStruct::of::<vk::PhysicalDeviceVulkan13Features<'static>>().requires(V1_3),
        AllowedStruct::of::<vk::PhysicalDeviceMultiviewFeatures<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceSamplerYcbcrConversionFeatures<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceBufferDeviceAddressFeatures<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceTimelineSemaphoreFeatures<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceDescriptorIndexingFeatures<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceSynchronization2Features<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceDynamicRenderingFeatures<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceInlineUniformBlockFeatures<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceMeshShaderFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceAccelerationStructureFeaturesKHR<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceRayTracingPipelineFeaturesKHR<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceRayQueryFeaturesKHR<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceDescriptorBufferFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceMutableDescriptorTypeFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceGraphicsPipelineLibraryFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceExtendedDynamicStateFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceBlendOperationAdvancedFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceDepthClipEnableFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceCustomBorderColorFeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceRobustness2FeaturesEXT<'static>>(),
        AllowedStruct::of::<vk::PhysicalDevicePresentIdFeaturesKHR<'static>>(),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_16BIT_STORAGE_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_8BIT_STORAGE_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_SHADER_FLOAT16_INT8_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_SCALAR_BLOCK_LAYOUT_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_VARIABLE_POINTERS_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_PROTECTED_MEMORY_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_SHADER_DRAW_PARAMETERS_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_HOST_QUERY_RESET_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_IMAGELESS_FRAMEBUFFER_FEATURES),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_UNIFORM_BUFFER_STANDARD_LAYOUT_FEATURES,
        ),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_SEPARATE_DEPTH_STENCIL_LAYOUTS_FEATURES,
        ),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_SHADER_SUBGROUP_EXTENDED_TYPES_FEATURES,
        ),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_VULKAN_MEMORY_MODEL_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_SHADER_ATOMIC_INT64_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_MAINTENANCE_4_FEATURES),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_SUBGROUP_SIZE_CONTROL_FEATURES),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_PIPELINE_CREATION_CACHE_CONTROL_FEATURES,
        ),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_IMAGE_ROBUSTNESS_FEATURES),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_SHADER_INTEGER_DOT_PRODUCT_FEATURES,
        ),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_SHADER_DEMOTE_TO_HELPER_INVOCATION_FEATURES,
        ),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_TEXTURE_COMPRESSION_ASTC_HDR_FEATURES,
        ),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_SHADER_TERMINATE_INVOCATION_FEATURES,
        ),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_ZERO_INITIALIZE_WORKGROUP_MEMORY_FEATURES,
        ),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_PRIVATE_DATA_FEATURES),
        AllowedStruct::tag(vk::StructureType::DEVICE_PRIVATE_DATA_CREATE_INFO).repeatable(),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_INDEX_TYPE_UINT8_FEATURES_EXT),
        AllowedStruct::tag(
            vk::StructureType::PHYSICAL_DEVICE_PRIMITIVE_TOPOLOGY_LIST_RESTART_FEATURES_EXT,
        ),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_PORTABILITY_SUBSET_FEATURES_KHR),
    ],
    unique: true,
    vuids_next: &["VUID-VkDeviceCreateInfo-pNext-pNext"],
    vuids_unique: &["VUID-VkDeviceCreateInfo-sType-unique"],
};

const IMAGE_FORMAT_INFO_CHAIN: ChainRules = ChainRules {
    allowed: &[
        AllowedStruct::of::<vk::PhysicalDeviceExternalImageFormatInfo<'static>>(),
        AllowedStruct::of::<vk::ImageFormatListCreateInfo<'static>>(),
        AllowedStruct::of::<vk::ImageStencilUsageCreateInfo<'static>>(),
        AllowedStruct::of::<vk::PhysicalDeviceImageDrmFormatModifierInfoEXT<'static>>(),
        AllowedStruct::tag(vk::StructureType::PHYSICAL_DEVICE_IMAGE_VIEW_IMAGE_FORMAT_INFO_EXT),
    ],
    unique: true,
    vuids_next: &["VUID-VkPhysicalDeviceImageFormatInfo2-pNext-pNext"],
    vuids_unique: &["VUID-VkPhysicalDeviceImageFormatInfo2-sType-unique"],
};

/// Returns a validator for an instance without extensions, for tests.
#[cfg(test)]
pub(crate) fn test_instance_validator(
    queries: Arc<dyn PhysicalDeviceQueries>,
) -> InstanceValidator {
    use ash::vk::Handle;

    InstanceValidator::new(
        vk::Instance::from_raw(0x100),
        InstanceCapabilities {
            api_version: Version::V1_3,
            enabled_extensions: InstanceExtensions {
                khr_surface: true,
                ..InstanceExtensions::empty()
            },
        },
        queries,
        StatelessValidatorCreateInfo::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::DEFAULT_MAX_CHAIN_LENGTH,
        tests::{link, FakeQueries},
    };
    use ash::vk::Handle;
    use std::ptr;

    #[test]
    fn api_version_checks() {
        assert!(validate_api_version(0).is_empty());
        assert!(validate_api_version(vk::API_VERSION_1_3).is_empty());
        assert_vuid!(
            validate_api_version(vk::make_api_version(0, 0, 9, 0)),
            "VUID-VkApplicationInfo-apiVersion-04010",
        );
        assert_vuid!(
            validate_api_version(vk::make_api_version(1, 1, 0, 0)),
            "UNASSIGNED-API-Version-Violation",
        );
    }

    #[test]
    fn create_instance_extension_dependencies() {
        let names = [c"VK_KHR_display".as_ptr()];
        let create_info = vk::InstanceCreateInfo::default().enabled_extension_names(&names);
        let violations = unsafe {
            InstanceValidator::validate_create_instance(&create_info, DEFAULT_MAX_CHAIN_LENGTH)
        };
        assert_vuid!(violations, "VUID-vkCreateInstance-ppEnabledExtensionNames-01388");

        let names = [c"VK_KHR_surface".as_ptr(), c"VK_KHR_display".as_ptr()];
        let create_info = vk::InstanceCreateInfo::default().enabled_extension_names(&names);
        let violations = unsafe {
            InstanceValidator::validate_create_instance(&create_info, DEFAULT_MAX_CHAIN_LENGTH)
        };
        assert!(violations.is_empty(), "{}", violations);
    }

    #[test]
    fn create_instance_bad_strings() {
        let bad = b"\xc3\x28\0";
        let names = [bad.as_ptr().cast::<c_char>()];
        let mut create_info = vk::InstanceCreateInfo::default();
        create_info.enabled_layer_count = 1;
        create_info.pp_enabled_layer_names = names.as_ptr();

        let violations = unsafe {
            InstanceValidator::validate_create_instance(&create_info, DEFAULT_MAX_CHAIN_LENGTH)
        };
        assert_vuid!(violations, "VUID-VkInstanceCreateInfo-ppEnabledLayerNames-parameter");
        assert_eq!(violations[0].context, "create_info.pp_enabled_layer_names[0]");
    }

    #[test]
    fn debug_messenger_needs_extension_and_callback() {
        let mut messenger = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR)
            .message_type(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION);
        let mut create_info = vk::InstanceCreateInfo::default();
        create_info.p_next = link(&mut messenger, ptr::null());

        let violations = unsafe {
            InstanceValidator::validate_create_instance(&create_info, DEFAULT_MAX_CHAIN_LENGTH)
        };
        assert_vuid!(violations, "VUID-VkInstanceCreateInfo-pNext-04925");
        assert_vuid!(
            violations,
            "VUID-VkDebugUtilsMessengerCreateInfoEXT-pfnUserCallback-01914",
        );
    }

    #[test]
    fn portability_flag_needs_extension() {
        let create_info = vk::InstanceCreateInfo::default()
            .flags(vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR);
        let violations = unsafe {
            InstanceValidator::validate_create_instance(&create_info, DEFAULT_MAX_CHAIN_LENGTH)
        };
        assert_vuid!(violations, "VUID-VkInstanceCreateInfo-flags-06559");
    }

    #[test]
    fn enumerate_caches_once_and_destroy_releases() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let devices = [
            vk::PhysicalDevice::from_raw(1),
            vk::PhysicalDevice::from_raw(2),
            vk::PhysicalDevice::null(),
        ];

        validator.post_call_record_enumerate_physical_devices(&devices, vk::Result::SUCCESS);
        assert!(validator.physical_device_info(devices[0]).is_some());
        assert!(validator.physical_device_info(devices[1]).is_some());
        // The fake driver fails for the null handle, which is then left out of the cache.
        assert!(validator.physical_device_info(devices[2]).is_none());

        let first = validator.physical_device_info(devices[0]);
        validator.post_call_record_enumerate_physical_devices(&devices, vk::Result::INCOMPLETE);
        assert!(Arc::ptr_eq(
            &first.unwrap(),
            &validator.physical_device_info(devices[0]).unwrap(),
        ));

        validator.pre_call_record_destroy_instance();
        assert!(validator.physical_device_info(devices[0]).is_none());
    }

    #[test]
    fn failed_enumeration_caches_nothing() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let devices = [vk::PhysicalDevice::from_raw(1)];

        validator.post_call_record_enumerate_physical_devices(
            &devices,
            vk::Result::ERROR_INITIALIZATION_FAILED,
        );
        assert!(validator.physical_device_info(devices[0]).is_none());
    }

    #[test]
    fn create_device_queue_rules() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let physical_device = vk::PhysicalDevice::from_raw(1);
        let priorities = [1.0, 1.5];
        let queue_create_infos = [
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(0)
                .queue_priorities(&priorities),
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(0)
                .queue_priorities(&priorities[..1]),
        ];
        let create_info =
            vk::DeviceCreateInfo::default().queue_create_infos(&queue_create_infos);

        let violations = unsafe { validator.validate_create_device(physical_device, &create_info) };
        assert_vuid!(violations, "VUID-VkDeviceQueueCreateInfo-pQueuePriorities-00383");
        assert_vuid!(violations, "VUID-VkDeviceCreateInfo-queueFamilyIndex-02802");
        assert_eq!(
            violations[0].context,
            "create_info.p_queue_create_infos[0].p_queue_priorities[1]",
        );
    }

    #[test]
    fn create_device_extension_and_feature_rules() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let physical_device = vk::PhysicalDevice::from_raw(1);
        let priorities = [1.0];
        let queue_create_infos = [vk::DeviceQueueCreateInfo::default().queue_priorities(&priorities)];
        let names = [
            c"VK_KHR_buffer_device_address".as_ptr(),
            c"VK_EXT_buffer_device_address".as_ptr(),
            c"VK_KHR_present_id".as_ptr(),
        ];
        let enabled_features = vk::PhysicalDeviceFeatures::default();
        let mut features2 = vk::PhysicalDeviceFeatures2::default();
        let mut vulkan_1_2 = vk::PhysicalDeviceVulkan12Features::default();
        let mut timeline = vk::PhysicalDeviceTimelineSemaphoreFeatures::default();
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&names)
            .enabled_features(&enabled_features)
            .push_next(&mut features2)
            .push_next(&mut vulkan_1_2)
            .push_next(&mut timeline);

        let violations = unsafe { validator.validate_create_device(physical_device, &create_info) };
        assert_vuid!(violations, "VUID-VkDeviceCreateInfo-ppEnabledExtensionNames-03328");
        // VK_KHR_present_id needs VK_KHR_swapchain.
        assert_vuid!(violations, "VUID-vkCreateDevice-ppEnabledExtensionNames-01387");
        assert_vuid!(violations, "VUID-VkDeviceCreateInfo-pNext-00373");
        assert_vuid!(violations, "VUID-VkDeviceCreateInfo-pNext-02830");
        assert_no_vuid!(violations, "VUID-VkDeviceCreateInfo-pNext-pNext");
    }

    #[test]
    fn create_device_records_capabilities() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let physical_device = vk::PhysicalDevice::from_raw(1);
        let names = [c"VK_KHR_swapchain".as_ptr()];
        let enabled_features = vk::PhysicalDeviceFeatures::default().wide_lines(true);
        let create_info = vk::DeviceCreateInfo::default()
            .enabled_extension_names(&names)
            .enabled_features(&enabled_features);

        let device = unsafe {
            validator.post_call_record_create_device(
                physical_device,
                &create_info,
                vk::Device::from_raw(7),
                vk::Result::SUCCESS,
            )
        }
        .unwrap();

        let capabilities = device.capabilities();
        assert!(capabilities.enabled_extensions.khr_swapchain);
        assert!(capabilities.features.wide_lines);
        assert!(!capabilities.features.depth_bounds);
        assert_eq!(capabilities.api_version, Version::V1_3);
        assert_eq!(capabilities.properties.max_viewports, 16);

        let failed = unsafe {
            validator.post_call_record_create_device(
                physical_device,
                &create_info,
                vk::Device::from_raw(8),
                vk::Result::ERROR_DEVICE_LOST,
            )
        };
        assert!(failed.is_none());
    }

    #[test]
    fn drm_modifier_tiling_needs_struct() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let info = vk::PhysicalDeviceImageFormatInfo2::default()
            .format(vk::Format::R8G8B8A8_UNORM)
            .tiling(vk::ImageTiling::DRM_FORMAT_MODIFIER_EXT)
            .usage(vk::ImageUsageFlags::SAMPLED);

        let violations =
            unsafe { validator.validate_get_physical_device_image_format_properties2(&info) };
        assert_vuid!(violations, "VUID-VkPhysicalDeviceImageFormatInfo2-tiling-02249");

        let mut drm_info = vk::PhysicalDeviceImageDrmFormatModifierInfoEXT::default()
            .sharing_mode(vk::SharingMode::CONCURRENT);
        let mut info = info.tiling(vk::ImageTiling::OPTIMAL);
        info.p_next = link(&mut drm_info, ptr::null());

        let violations =
            unsafe { validator.validate_get_physical_device_image_format_properties2(&info) };
        assert_vuid!(violations, "VUID-VkPhysicalDeviceImageFormatInfo2-tiling-02313");
        assert_no_vuid!(
            violations,
            "VUID-VkPhysicalDeviceImageDrmFormatModifierInfoEXT-sharingMode-02315",
        );
    }

    #[test]
    fn layer_name_string() {
        let validator = test_instance_validator(Arc::new(FakeQueries::default()));
        let long = [b'a' as c_char; 300];
        let mut terminated = long.to_vec();
        terminated.push(0);

        assert!(unsafe {
            validator
                .validate_enumerate_device_extension_properties(ptr::null())
                .is_empty()
        });
        assert_vuid!(
            unsafe { validator.validate_enumerate_device_extension_properties(terminated.as_ptr()) },
            "VUID-vkEnumerateDeviceExtensionProperties-pLayerName-parameter",
        );
    }
}
