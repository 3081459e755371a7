// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use std::{cmp::Ordering, fmt};

/// Represents an API version of Vulkan.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    /// Major version number.
    pub major: u32,
    /// Minor version number.
    pub minor: u32,
    /// Patch version number.
    pub patch: u32,
}

impl Version {
    pub const V1_0: Version = Version::major_minor(1, 0);
    pub const V1_1: Version = Version::major_minor(1, 1);
    pub const V1_2: Version = Version::major_minor(1, 2);
    pub const V1_3: Version = Version::major_minor(1, 3);
    pub const V1_4: Version = Version::major_minor(1, 4);

    /// Constructs a `Version` from the given major and minor version numbers.
    #[inline]
    pub const fn major_minor(major: u32, minor: u32) -> Version {
        Version {
            major,
            minor,
            patch: 0,
        }
    }

    /// Turns a version number given by Vulkan into a `Version` struct. The variant bits are
    /// ignored; see [`variant_of`](Self::variant_of).
    #[inline]
    pub const fn from_vulkan_version(value: u32) -> Version {
        Version {
            major: (value >> 22) & 0x7f,
            minor: (value >> 12) & 0x3ff,
            patch: value & 0xfff,
        }
    }

    /// Returns the variant bits of a packed Vulkan version number. Vulkan itself uses variant 0.
    #[inline]
    pub const fn variant_of(value: u32) -> u32 {
        value >> 29
    }

    /// Turns a `Version` into a version number accepted by Vulkan, saturating fields that are
    /// out of range.
    #[inline]
    pub const fn to_vulkan_version(self) -> u32 {
        let major = if self.major > 0x7f { 0x7f } else { self.major };
        let minor = if self.minor > 0x3ff { 0x3ff } else { self.minor };
        let patch = if self.patch > 0xfff { 0xfff } else { self.patch };

        (major << 22) | (minor << 12) | patch
    }

    /// Returns the version with the patch number cleared.
    #[inline]
    pub const fn without_patch(self) -> Version {
        Version::major_minor(self.major, self.minor)
    }
}

impl Default for Version {
    #[inline]
    fn default() -> Self {
        Self::V1_0
    }
}

impl From<u32> for Version {
    #[inline]
    fn from(val: u32) -> Self {
        Version::from_vulkan_version(val)
    }
}

impl From<Version> for u32 {
    #[inline]
    fn from(val: Version) -> Self {
        val.to_vulkan_version()
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, formatter)
    }
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

#[cfg(test)]
mod tests {
    use super::Version;

    #[test]
    fn into_vk_version() {
        assert_eq!(Version::V1_0.to_vulkan_version(), 0x400000);
        assert_eq!(
            Version::from_vulkan_version(ash::vk::make_api_version(0, 1, 3, 250)),
            Version {
                major: 1,
                minor: 3,
                patch: 250,
            },
        );
    }

    #[test]
    fn variant_bits_are_separate() {
        let packed = ash::vk::make_api_version(7, 1, 2, 0);
        assert_eq!(Version::variant_of(packed), 7);
        assert_eq!(Version::from_vulkan_version(packed), Version::V1_2);
    }

    #[test]
    fn ordering() {
        assert!(Version::V1_1 > Version::V1_0);
        assert!(Version::V1_3 > Version::V1_1);
        assert!(
            Version {
                major: 1,
                minor: 0,
                patch: 5,
            } > Version {
                major: 1,
                minor: 0,
                patch: 4,
            }
        );
    }
}
