// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

#![doc(html_logo_url = "https://raw.githubusercontent.com/vulkano-rs/vulkano/master/logo.png")]
//! Stateless parameter validation for Vulkan interception layers.
//!
//! This crate implements the part of a validation layer that checks the arguments of each Vulkan
//! entry point against the Vulkan valid-usage rules, without looking at the
//! runtime state of objects that were created earlier. The only state consulted is a snapshot of
//! the capabilities of the instance and device: the API version, the enabled features and
//! extensions, and the device limits.
//!
//! # Brief summary
//!
//! - An [`InstanceValidator`] is created when an instance is created. It checks
//!   `vkCreateInstance` and `vkCreateDevice` arguments and caches, once per physical device, the
//!   properties and extensions reported by the driver.
//!
//! - A [`StatelessValidator`] is created when a device is created. It owns the
//!   [`DeviceCapabilities`] snapshot and the two small maps that some rules need (subpass
//!   attachment usage of each render pass, and the pool of each secondary command buffer).
//!
//! - Every entry point has a `validate_*` method that returns the list of [`Violations`] it
//!   found, and a `pre_call_validate_*` wrapper that reports each violation through a
//!   [`ViolationSink`] and returns whether the call should be skipped.
//!
//! - Entry points whose successful completion changes what later calls may legally do have a
//!   `post_call_record_*` method that updates the cached state.
//!
//! All checks keep going after the first violation, so a single call reports every problem with
//! its arguments.
//!
//! # Safety
//!
//! The validation functions take raw [`ash::vk`] structures exactly as a layer receives them.
//! Every non-null pointer in them must be valid for the number of elements the API associates
//! with it. Null pointers that are paired with a non-zero count are detected and reported.

pub use crate::{
    capabilities::{DeviceCapabilities, ExtensionState, InstanceCapabilities},
    device::{StatelessValidator, StatelessValidatorCreateInfo},
    instance::{InstanceValidator, PhysicalDeviceInfo, PhysicalDeviceQueries},
    sink::{TracingSink, ViolationSink},
    version::Version,
};
pub use ash;
use std::{
    borrow::Cow,
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
    ops::Deref,
};

#[macro_use]
mod macros;
#[cfg(test)]
#[macro_use]
mod tests;
pub mod acceleration_structure;
pub mod buffer;
mod cache;
pub mod capabilities;
pub mod chain;
pub mod command_buffer;
pub mod descriptor_set;
pub mod device;
mod entry_points;
pub mod extensions;
pub mod features;
pub mod format;
pub mod image;
pub mod instance;
pub mod memory;
pub mod pipeline;
pub mod predicates;
pub mod properties;
pub mod query;
pub mod render_pass;
pub mod sampler;
pub mod sink;
pub mod swapchain;
pub mod sync;
mod version;

/// A helper type for non-exhaustive structs.
///
/// This type cannot be constructed outside this crate. Structures with a field of this type can
/// only be constructed by calling a constructor function or `Default::default()`. The effect is
/// similar to the standard Rust `#[non_exhaustive]` attribute, except that it does not prevent
/// update syntax from being used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NonExhaustive(pub(crate) ());

/// The category of problem that a [`ValidationError`] describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A value is outside its legal range, or not a member of its legal set.
    #[default]
    IllegalValue,

    /// Two or more values are individually legal but not in this combination.
    IllegalCombination,

    /// A pointer, handle or structure is required because of another value, but is missing.
    MissingCompanion,

    /// A pointer, handle or structure is present, but is only allowed under a condition that does
    /// not hold.
    ExtraneousCompanion,

    /// A value needs an API version, feature or extension that is not enabled.
    RequirementNotMet,

    /// Values that would overflow a fixed-width integer if they were combined.
    ArithmeticOverflow,

    /// An offset, stride, size or address is not a multiple of its required alignment.
    Misaligned,

    /// A structure in an extension chain is not allowed there, or appears more than once.
    ChainStructure,
}

/// A single violation of a valid-usage rule.
#[derive(Clone, Debug, Default)]
pub struct ValidationError {
    /// The path to the value that caused the error, such as `create_info.p_viewports[2]`.
    pub context: Cow<'static, str>,

    /// A description of what is wrong.
    pub problem: Cow<'static, str>,

    /// If applicable, settings that the user could enable to make the value legal.
    pub requires_one_of: RequiresOneOf,

    /// The Vulkan valid-usage IDs that were violated. The first one is the token used to report
    /// the violation.
    pub vuids: &'static [&'static str],

    /// The category of the problem.
    pub kind: ViolationKind,
}

impl ValidationError {
    /// Prepends `context` to the existing context, separated by a dot.
    pub fn add_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        if self.context.is_empty() {
            self.context = context.into();
        } else {
            self.context = format!("{}.{}", context.into(), self.context).into();
        }

        self
    }

    /// Replaces the VUIDs of the error.
    pub fn set_vuids(mut self, vuids: &'static [&'static str]) -> Self {
        self.vuids = vuids;
        self
    }

    /// Returns the token that identifies the violated rule.
    #[inline]
    pub fn vuid(&self) -> &'static str {
        self.vuids.first().copied().unwrap_or("UNASSIGNED-stateless")
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if self.context.is_empty() {
            write!(f, "{}", self.problem)?;
        } else {
            write!(f, "{}: {}", self.context, self.problem)?;
        }

        if !self.requires_one_of.is_empty() {
            if self.context.is_empty() && self.problem.is_empty() {
                write!(f, "{}", self.requires_one_of)?;
            } else {
                write!(f, " -- {}", self.requires_one_of)?;
            }
        }

        if !self.vuids.is_empty() {
            write!(f, "\n\nVulkan VUIDs:")?;

            for vuid in self.vuids {
                write!(f, "\n    {}", vuid)?;
            }
        }

        Ok(())
    }
}

impl Error for ValidationError {}

/// Every violation found while validating one call.
///
/// Validation functions never stop at the first violation; independent checks keep running and
/// append to the same list.
#[derive(Clone, Debug, Default)]
pub struct Violations {
    errors: Vec<ValidationError>,
}

impl Violations {
    /// Returns an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds a violation.
    #[inline]
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds `error` if it is `Some`.
    #[inline]
    pub fn push_opt(&mut self, error: Option<ValidationError>) {
        self.errors.extend(error);
    }

    /// Moves every violation of `other` into `self`.
    #[inline]
    pub fn append(&mut self, mut other: Violations) {
        self.errors.append(&mut other.errors);
    }

    /// Moves every violation of `other` into `self`, prepending `context` to each.
    pub fn append_with_context(&mut self, other: Violations, context: impl Fn() -> String) {
        if other.is_empty() {
            return;
        }

        self.errors
            .extend(other.errors.into_iter().map(|err| err.add_context(context())));
    }

    /// Prepends `context` to every violation.
    pub fn add_context(self, context: &'static str) -> Self {
        Self {
            errors: self
                .errors
                .into_iter()
                .map(|err| err.add_context(context))
                .collect(),
        }
    }

    /// Returns `true` if no violation was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of violations.
    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns whether a violation with the given VUID was found.
    pub fn contains_vuid(&self, vuid: &str) -> bool {
        self.errors.iter().any(|err| err.vuids.contains(&vuid))
    }

    /// Returns the number of violations with the given VUID.
    pub fn count_vuid(&self, vuid: &str) -> usize {
        self.errors
            .iter()
            .filter(|err| err.vuids.contains(&vuid))
            .count()
    }

    /// Returns the violations as a `Vec`.
    #[inline]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl Deref for Violations {
    type Target = [ValidationError];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.errors
    }
}

impl From<ValidationError> for Violations {
    #[inline]
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl Extend<ValidationError> for Violations {
    #[inline]
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl FromIterator<ValidationError> for Violations {
    #[inline]
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Violations {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        for (index, error) in self.errors.iter().enumerate() {
            if index != 0 {
                writeln!(f)?;
            }

            write!(f, "{}", error)?;
        }

        Ok(())
    }
}

impl Error for Violations {}

/// Used in errors to indicate a set of alternatives that needs to be available/enabled to allow
/// a given operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequiresOneOf(pub &'static [RequiresAllOf]);

impl RequiresOneOf {
    /// Returns the number of alternatives.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are any alternatives.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for RequiresOneOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "requires one of: ")?;

        if let Some((first, rest)) = self.0.split_first() {
            if first.0.len() > 1 {
                write!(f, "({})", first)?;
            } else {
                write!(f, "{}", first)?;
            }

            for rest in rest {
                if rest.0.len() > 1 {
                    write!(f, " or ({})", rest)?;
                } else {
                    write!(f, " or {}", rest)?;
                }
            }
        }

        Ok(())
    }
}

/// Used in errors to indicate a set of requirements that all need to be available/enabled to
/// allow a given operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequiresAllOf(pub &'static [Requires]);

impl Display for RequiresAllOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if let Some((first, rest)) = self.0.split_first() {
            write!(f, "{}", first)?;

            for rest in rest {
                write!(f, " + {}", rest)?;
            }
        }

        Ok(())
    }
}

/// Something that needs to be supported or enabled to allow a particular operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requires {
    APIVersion(Version),
    DeviceFeature(&'static str),
    DeviceExtension(&'static str),
    InstanceExtension(&'static str),
}

impl Display for Requires {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Requires::APIVersion(Version { major, minor, .. }) => {
                write!(f, "Vulkan API version {}.{}", major, minor)
            }
            Requires::DeviceFeature(device_feature) => {
                write!(f, "device feature `{}`", device_feature)
            }
            Requires::DeviceExtension(device_extension) => {
                write!(f, "device extension `{}`", device_extension)
            }
            Requires::InstanceExtension(instance_extension) => {
                write!(f, "instance extension `{}`", instance_extension)
            }
        }
    }
}

/// Something that can tell whether a set of requirements is met.
pub trait SupportsRequirements {
    /// Returns whether a single requirement is met.
    fn meets(&self, requires: Requires) -> bool;

    /// Returns whether at least one of the alternatives is fully met. An empty set of
    /// alternatives is always met.
    fn satisfies(&self, requires_one_of: RequiresOneOf) -> bool {
        requires_one_of.is_empty()
            || requires_one_of
                .0
                .iter()
                .any(|all_of| all_of.0.iter().all(|&requires| self.meets(requires)))
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_includes_context_requirements_and_vuids() {
        let error = ValidationError {
            context: "line_width".into(),
            problem: "is not 1.0".into(),
            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                "wide_lines",
            )])]),
            vuids: &["VUID-vkCmdSetLineWidth-lineWidth-00788"],
            ..Default::default()
        }
        .add_context("cmd_set_line_width");

        let text = error.to_string();
        assert!(text.starts_with("cmd_set_line_width.line_width: is not 1.0"));
        assert!(text.contains("requires one of: device feature `wide_lines`"));
        assert!(text.contains("VUID-vkCmdSetLineWidth-lineWidth-00788"));
    }

    #[test]
    fn violations_accumulate_and_count() {
        let mut violations = Violations::new();
        assert!(violations.is_empty());

        violations.push(ValidationError {
            vuids: &["VUID-a"],
            ..Default::default()
        });
        violations.push_opt(None);
        violations.append(Violations::from(ValidationError {
            vuids: &["VUID-a"],
            ..Default::default()
        }));

        assert_eq!(violations.len(), 2);
        assert_eq!(violations.count_vuid("VUID-a"), 2);
        assert!(!violations.contains_vuid("VUID-b"));
    }

    #[test]
    fn context_is_prepended() {
        let violations = Violations::from(ValidationError {
            context: "size".into(),
            ..Default::default()
        })
        .add_context("create_info");

        assert_eq!(violations[0].context, "create_info.size");
    }
}
