// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The capability snapshots that every rule reads.
//!
//! A snapshot is built once when the instance or device is created and is never modified
//! afterwards. Rule functions receive it by shared reference.

use crate::{
    extensions::{DeviceExtensions, InstanceExtensions},
    features::DeviceFeatures,
    predicates::slice_or_empty,
    properties::DeviceProperties,
    Requires, SupportsRequirements, Version,
};
use ash::vk;
use std::ffi::CStr;

/// Whether an extension can be relied on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionState {
    /// The application enabled the extension.
    Enabled,
    /// The physical device supports the extension, but the application did not enable it.
    SupportedNotEnabled,
    /// The extension is neither enabled nor known to be supported.
    Unknown,
}

/// What an instance was created with.
#[derive(Clone, Debug, Default)]
pub struct InstanceCapabilities {
    /// The API version that the application requested, or 1.0 if it did not request one.
    pub api_version: Version,
    pub enabled_extensions: InstanceExtensions,
}

impl InstanceCapabilities {
    /// Reads the API version and enabled extensions of an instance create info.
    ///
    /// # Safety
    ///
    /// `create_info` must be a valid `vk::InstanceCreateInfo`.
    pub unsafe fn from_create_info(create_info: &vk::InstanceCreateInfo<'_>) -> Self {
        let api_version = create_info
            .p_application_info
            .as_ref()
            .map(|application_info| application_info.api_version)
            .filter(|&api_version| api_version != 0)
            .map_or(Version::V1_0, Version::from_vulkan_version);

        InstanceCapabilities {
            api_version,
            enabled_extensions: InstanceExtensions::from_names(enabled_names(
                create_info.pp_enabled_extension_names,
                create_info.enabled_extension_count,
            )),
        }
    }
}

impl SupportsRequirements for InstanceCapabilities {
    fn meets(&self, requires: Requires) -> bool {
        match requires {
            Requires::APIVersion(version) => self.api_version >= version,
            Requires::InstanceExtension(name) => self.enabled_extensions.get(name) == Some(true),
            Requires::DeviceFeature(_) | Requires::DeviceExtension(_) => false,
        }
    }
}

/// What a device was created with, and what its physical device reports.
#[derive(Clone, Debug, Default)]
pub struct DeviceCapabilities {
    /// The API version that can be relied on: the lower of the instance's requested version and
    /// the physical device's version.
    pub api_version: Version,
    pub instance_extensions: InstanceExtensions,
    pub enabled_extensions: DeviceExtensions,
    /// The extensions that the physical device reported, if it was enumerated.
    pub supported_extensions: Option<DeviceExtensions>,
    pub features: DeviceFeatures,
    pub properties: DeviceProperties,
}

impl DeviceCapabilities {
    /// Returns whether a device extension is enabled, supported, or unknown.
    pub fn extension_state(&self, member: &str) -> ExtensionState {
        if self.enabled_extensions.get(member) == Some(true) {
            ExtensionState::Enabled
        } else if self
            .supported_extensions
            .as_ref()
            .and_then(|supported| supported.get(member))
            == Some(true)
        {
            ExtensionState::SupportedNotEnabled
        } else {
            ExtensionState::Unknown
        }
    }

    /// Returns whether the API version is at least `version`, or `extension` is enabled.
    #[inline]
    pub fn version_or(&self, version: Version, extension: bool) -> bool {
        self.api_version >= version || extension
    }
}

impl SupportsRequirements for DeviceCapabilities {
    fn meets(&self, requires: Requires) -> bool {
        match requires {
            Requires::APIVersion(version) => self.api_version >= version,
            Requires::DeviceFeature(name) => self.features.get(name) == Some(true),
            Requires::DeviceExtension(name) => self.enabled_extensions.get(name) == Some(true),
            Requires::InstanceExtension(name) => {
                self.instance_extensions.get(name) == Some(true)
            }
        }
    }
}

/// Returns the valid UTF-8 names in an array of extension or layer names.
///
/// # Safety
///
/// `names` must be null or valid for `count` NUL-terminated strings.
pub(crate) unsafe fn enabled_names<'a>(
    names: *const *const std::ffi::c_char,
    count: u32,
) -> impl Iterator<Item = &'a str> {
    slice_or_empty(names, count)
        .iter()
        .filter(|name| !name.is_null())
        .filter_map(|&name| CStr::from_ptr(name).to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RequiresAllOf, RequiresOneOf};

    #[test]
    fn instance_capabilities_from_create_info() {
        let application_info =
            vk::ApplicationInfo::default().api_version(vk::make_api_version(0, 1, 2, 0));
        let names = [c"VK_KHR_surface".as_ptr(), c"VK_EXT_debug_utils".as_ptr()];
        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&application_info)
            .enabled_extension_names(&names);

        let capabilities = unsafe { InstanceCapabilities::from_create_info(&create_info) };
        assert_eq!(capabilities.api_version, Version::V1_2);
        assert!(capabilities.enabled_extensions.khr_surface);
        assert!(capabilities.enabled_extensions.ext_debug_utils);
        assert!(!capabilities.enabled_extensions.khr_display);
    }

    #[test]
    fn missing_application_info_means_1_0() {
        let create_info = vk::InstanceCreateInfo::default();
        let capabilities = unsafe { InstanceCapabilities::from_create_info(&create_info) };
        assert_eq!(capabilities.api_version, Version::V1_0);
    }

    #[test]
    fn extension_states() {
        let capabilities = DeviceCapabilities {
            enabled_extensions: DeviceExtensions {
                khr_swapchain: true,
                ..DeviceExtensions::empty()
            },
            supported_extensions: Some(DeviceExtensions {
                khr_swapchain: true,
                ext_mesh_shader: true,
                ..DeviceExtensions::empty()
            }),
            ..Default::default()
        };

        assert_eq!(
            capabilities.extension_state("khr_swapchain"),
            ExtensionState::Enabled,
        );
        assert_eq!(
            capabilities.extension_state("ext_mesh_shader"),
            ExtensionState::SupportedNotEnabled,
        );
        assert_eq!(
            capabilities.extension_state("khr_ray_query"),
            ExtensionState::Unknown,
        );
    }

    #[test]
    fn requirements() {
        let capabilities = DeviceCapabilities {
            api_version: Version::V1_1,
            features: DeviceFeatures {
                wide_lines: true,
                ..DeviceFeatures::empty()
            },
            ..Default::default()
        };

        assert!(capabilities.satisfies(RequiresOneOf(&[])));
        assert!(capabilities.satisfies(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
            RequiresAllOf(&[Requires::DeviceFeature("wide_lines")]),
        ])));
        assert!(!capabilities.satisfies(RequiresOneOf(&[RequiresAllOf(&[
            Requires::APIVersion(Version::V1_1),
            Requires::DeviceExtension("khr_swapchain"),
        ])])));
    }
}
