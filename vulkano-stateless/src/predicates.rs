// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Small, side-effect-free checks that the rule functions are built from.
//!
//! The plain predicates return a `bool` or a status value. The `validate_*` functions wrap a
//! predicate and produce the [`ValidationError`] to report when it fails, so that every rule that
//! has the same shape also words its problem the same way.

use crate::{chain::ChainStruct, ValidationError, ViolationKind, Violations};
use ash::vk::{self, Handle};
use std::{
    borrow::Cow,
    cmp::Ordering,
    ffi::{c_char, CStr},
    ops::{RangeInclusive, Rem},
    slice,
};

/// Returns whether `min <= value <= max`.
///
/// Values that are unordered with respect to either bound, such as a floating point NaN, are
/// rejected whatever the bounds are.
#[inline]
pub fn in_inclusive_range<T: PartialOrd>(value: T, min: T, max: T) -> bool {
    matches!(
        value.partial_cmp(&min),
        Some(Ordering::Greater | Ordering::Equal)
    ) && matches!(
        value.partial_cmp(&max),
        Some(Ordering::Less | Ordering::Equal)
    )
}

/// Returns `a % b`, or zero if `b` is zero.
///
/// A zero divisor is reported by a more specific rule elsewhere, so this only needs to avoid the
/// panic.
#[inline]
pub fn safe_modulo<T>(a: T, b: T) -> T
where
    T: Copy + Default + PartialEq + Rem<Output = T>,
{
    if b == T::default() {
        T::default()
    } else {
        a % b
    }
}

/// Returns whether `value` has exactly one bit set.
#[inline]
pub fn is_power_of_two(value: u64) -> bool {
    value.is_power_of_two()
}

/// Returns whether `value` is a multiple of `alignment`. A zero alignment accepts any value.
#[inline]
pub fn is_aligned(value: u64, alignment: u64) -> bool {
    safe_modulo(value, alignment) == 0
}

/// Returns whether `value <= limit`, comparing exactly.
///
/// Both values are widened to `f64`, which represents every `f32` and every `u32` exactly. NaN is
/// never in range, `-inf` is below every limit and `+inf` is above every limit. A value such as
/// `4294967295.0f32`, which is really 2<sup>32</sup> after rounding, is greater than `u32::MAX`.
#[inline]
pub fn f32_le_u32(value: f32, limit: u32) -> bool {
    f64::from(value) <= f64::from(limit)
}

/// Returns whether `value >= limit`, comparing exactly. NaN is never in range.
#[inline]
pub fn f32_ge_u32(value: f32, limit: u32) -> bool {
    f64::from(value) >= f64::from(limit)
}

/// Returns whether `offset + extent` is greater than `i32::MAX`, without overflowing.
#[inline]
pub fn sum_exceeds_i32(offset: i32, extent: u32) -> bool {
    i64::from(offset) + i64::from(extent) > i64::from(i32::MAX)
}

/// How strictly a flags value is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagPolicy {
    /// Zero is allowed.
    Optional,
    /// At least one bit must be set.
    Required,
    /// Exactly one bit must be set.
    RequiredSingleBit,
    /// Zero or exactly one bit may be set.
    OptionalSingleBit,
}

/// The outcome of [`check_flags`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagCheck {
    Ok,
    /// Bits outside the legal set are set.
    UnknownBits(u64),
    /// No bits are set, but the policy requires at least one.
    Empty,
    /// More than one bit is set, but the policy requires at most one.
    MultipleBits,
}

/// Checks `value` against the bits in `legal` and the given policy.
pub fn check_flags(value: impl Into<u64>, legal: impl Into<u64>, policy: FlagPolicy) -> FlagCheck {
    let value = value.into();
    let unknown = value & !legal.into();

    if unknown != 0 {
        return FlagCheck::UnknownBits(unknown);
    }

    match policy {
        FlagPolicy::Required | FlagPolicy::RequiredSingleBit if value == 0 => FlagCheck::Empty,
        FlagPolicy::RequiredSingleBit | FlagPolicy::OptionalSingleBit
            if value.count_ones() > 1 =>
        {
            FlagCheck::MultipleBits
        }
        _ => FlagCheck::Ok,
    }
}

/// Checks a flags value and returns the error to report if it fails.
///
/// `vuids_bits` is used for unknown bits and for multiple bits under a single-bit policy,
/// `vuids_required` for a value of zero when one is required.
pub fn validate_flags(
    context: impl Into<Cow<'static, str>>,
    value: impl Into<u64>,
    legal: impl Into<u64>,
    policy: FlagPolicy,
    vuids_bits: &'static [&'static str],
    vuids_required: &'static [&'static str],
) -> Option<ValidationError> {
    match check_flags(value, legal, policy) {
        FlagCheck::Ok => None,
        FlagCheck::UnknownBits(bits) => Some(ValidationError {
            context: context.into(),
            problem: format!("contains bits that are not valid flags ({:#x})", bits).into(),
            vuids: vuids_bits,
            ..Default::default()
        }),
        FlagCheck::Empty => Some(ValidationError {
            context: context.into(),
            problem: "is empty".into(),
            vuids: vuids_required,
            ..Default::default()
        }),
        FlagCheck::MultipleBits => Some(ValidationError {
            context: context.into(),
            problem: "has more than one bit set".into(),
            vuids: vuids_bits,
            ..Default::default()
        }),
    }
}

/// Checks that a raw enum value is in one of the legal ranges.
pub fn validate_ranged_enum(
    context: impl Into<Cow<'static, str>>,
    value: i32,
    legal: &[RangeInclusive<i32>],
    vuids: &'static [&'static str],
) -> Option<ValidationError> {
    if legal.iter().any(|range| range.contains(&value)) {
        return None;
    }

    Some(ValidationError {
        context: context.into(),
        problem: format!("is not a valid enum value ({})", value).into(),
        vuids,
        ..Default::default()
    })
}

/// Checks that a pointer that may not be null is not null.
pub fn validate_required_pointer<T>(
    context: impl Into<Cow<'static, str>>,
    ptr: *const T,
    vuids: &'static [&'static str],
) -> Option<ValidationError> {
    ptr.is_null().then(|| ValidationError {
        context: context.into(),
        problem: "is null".into(),
        vuids,
        kind: ViolationKind::MissingCompanion,
        ..Default::default()
    })
}

/// Checks that a handle that may not be `VK_NULL_HANDLE` is not.
pub fn validate_required_handle<H: Handle>(
    context: impl Into<Cow<'static, str>>,
    handle: H,
    vuids: &'static [&'static str],
) -> Option<ValidationError> {
    (handle.as_raw() == 0).then(|| ValidationError {
        context: context.into(),
        problem: "is `VK_NULL_HANDLE`".into(),
        vuids,
        kind: ViolationKind::MissingCompanion,
        ..Default::default()
    })
}

/// The rules for a count and the array pointer that goes with it.
#[derive(Clone, Copy, Debug)]
pub struct ArrayRules {
    /// The count must not be zero.
    pub count_required: bool,
    /// The pointer must not be null if the count is not zero.
    pub array_required: bool,
    pub count_vuids: &'static [&'static str],
    pub array_vuids: &'static [&'static str],
}

/// Checks a count and its array pointer.
pub fn validate_array<T>(
    count_context: &'static str,
    array_context: &'static str,
    count: u32,
    array: *const T,
    rules: ArrayRules,
) -> Violations {
    let mut violations = Violations::new();

    if count == 0 {
        if rules.count_required {
            violations.push(ValidationError {
                context: count_context.into(),
                problem: "is 0".into(),
                vuids: rules.count_vuids,
                ..Default::default()
            });
        }
    } else if array.is_null() && rules.array_required {
        violations.push(ValidationError {
            context: array_context.into(),
            problem: format!("is null, but `{}` is {}", count_context, count).into(),
            vuids: rules.array_vuids,
            kind: ViolationKind::MissingCompanion,
            ..Default::default()
        });
    }

    violations
}

/// Checks that a structure carries the type tag that belongs to its type.
pub fn validate_struct_type<T: ChainStruct>(
    context: impl Into<Cow<'static, str>>,
    value: &T,
    vuids: &'static [&'static str],
) -> Option<ValidationError> {
    let s_type = crate::chain::structure_type_of(value);

    (s_type != T::STRUCTURE_TYPE).then(|| ValidationError {
        context: context.into(),
        problem: format!("is {:?}, but must be {:?}", s_type, T::STRUCTURE_TYPE).into(),
        vuids,
        ..Default::default()
    })
}

/// Checks the type tag of every element of an array of structures.
pub fn validate_struct_type_array<T: ChainStruct>(
    context: &'static str,
    values: &[T],
    vuids: &'static [&'static str],
) -> Violations {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            validate_struct_type(format!("{}[{}].s_type", context, index), value, vuids)
        })
        .collect()
}

/// The outcome of [`check_string`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringStatus {
    Ok,
    /// No NUL terminator was found within the maximum length.
    TooLong,
    /// The string is null or is not valid UTF-8.
    BadData,
}

/// Scans a NUL-terminated string of at most `max_len` bytes, including the terminator.
///
/// # Safety
///
/// If `ptr` is not null, it must be readable up to its terminator or `max_len` bytes, whichever
/// comes first.
pub unsafe fn check_string(ptr: *const c_char, max_len: usize) -> StringStatus {
    if ptr.is_null() {
        return StringStatus::BadData;
    }

    let mut len = 0;

    loop {
        if len == max_len {
            return StringStatus::TooLong;
        }

        if *ptr.add(len) == 0 {
            break;
        }

        len += 1;
    }

    let bytes = slice::from_raw_parts(ptr.cast::<u8>(), len);

    match std::str::from_utf8(bytes) {
        Ok(_) => StringStatus::Ok,
        Err(_) => StringStatus::BadData,
    }
}

/// Checks a string argument and returns the error to report if it is not well formed.
///
/// # Safety
///
/// Same as [`check_string`].
pub unsafe fn validate_string(
    context: impl Into<Cow<'static, str>>,
    ptr: *const c_char,
    max_len: usize,
    vuids: &'static [&'static str],
) -> Option<ValidationError> {
    let problem = match check_string(ptr, max_len) {
        StringStatus::Ok => return None,
        StringStatus::TooLong => format!("is longer than the maximum of {} bytes", max_len),
        StringStatus::BadData => "is not a valid UTF-8 string".to_owned(),
    };

    Some(ValidationError {
        context: context.into(),
        problem: problem.into(),
        vuids,
        ..Default::default()
    })
}

/// Returns the string stored in a fixed-size character array, such as an extension name.
pub fn fixed_c_str(array: &[c_char]) -> Option<&str> {
    // SAFETY: `c_char` and `u8` have the same layout.
    let bytes = unsafe { slice::from_raw_parts(array.as_ptr().cast::<u8>(), array.len()) };

    CStr::from_bytes_until_nul(bytes).ok()?.to_str().ok()
}

/// Returns the slice described by a pointer and count, or an empty slice if the pointer is null.
///
/// # Safety
///
/// If `ptr` is not null, it must be valid for `count` elements for the lifetime `'a`.
#[inline]
pub unsafe fn slice_or_empty<'a, T>(ptr: *const T, count: u32) -> &'a [T] {
    if ptr.is_null() || count == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, count as usize)
    }
}

/// Returns whether a Vulkan boolean is true.
#[inline]
pub(crate) fn is_true(value: vk::Bool32) -> bool {
    value != vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_range_matches_total_order() {
        assert!(in_inclusive_range(5u32, 5, 5));
        assert!(in_inclusive_range(0.0f32, 0.0, 1.0));
        assert!(in_inclusive_range(1.0f32, 0.0, 1.0));
        assert!(!in_inclusive_range(1.5f32, 0.0, 1.0));
        assert!(!in_inclusive_range(-0.5f32, 0.0, 1.0));
        assert!(!in_inclusive_range(3i32, 4, 2));
    }

    #[test]
    fn inclusive_range_rejects_nan() {
        assert!(!in_inclusive_range(f32::NAN, 0.0, 1.0));
        assert!(!in_inclusive_range(f32::NAN, f32::NEG_INFINITY, f32::INFINITY));
        assert!(!in_inclusive_range(0.5f32, f32::NAN, 1.0));
        assert!(!in_inclusive_range(f64::NAN, f64::MIN, f64::MAX));
    }

    #[test]
    fn modulo_by_zero() {
        assert_eq!(safe_modulo(10u64, 0), 0);
        assert_eq!(safe_modulo(10u64, 4), 2);
        assert!(is_aligned(12, 4));
        assert!(!is_aligned(13, 4));
        assert!(is_aligned(13, 0));
    }

    #[test]
    fn single_bit_policy() {
        let legal = 0b0111u32;

        assert_eq!(
            check_flags(0b0010u32, legal, FlagPolicy::RequiredSingleBit),
            FlagCheck::Ok,
        );
        assert_eq!(
            check_flags(0u32, legal, FlagPolicy::RequiredSingleBit),
            FlagCheck::Empty,
        );
        assert_eq!(
            check_flags(0b0011u32, legal, FlagPolicy::RequiredSingleBit),
            FlagCheck::MultipleBits,
        );
        assert_eq!(
            check_flags(0b1000u32, legal, FlagPolicy::RequiredSingleBit),
            FlagCheck::UnknownBits(0b1000),
        );
        assert_eq!(
            check_flags(0u32, legal, FlagPolicy::OptionalSingleBit),
            FlagCheck::Ok,
        );
        assert_eq!(check_flags(0u32, legal, FlagPolicy::Required), FlagCheck::Empty);
        assert_eq!(check_flags(0b0110u32, legal, FlagPolicy::Required), FlagCheck::Ok);
    }

    #[test]
    fn flags_error_uses_vuids() {
        let error = validate_flags(
            "usage",
            0u32,
            1u32,
            FlagPolicy::Required,
            &["bits"],
            &["required"],
        )
        .unwrap();
        assert_eq!(error.vuid(), "required");

        let error =
            validate_flags("usage", 4u32, 1u32, FlagPolicy::Optional, &["bits"], &[]).unwrap();
        assert_eq!(error.vuid(), "bits");
    }

    #[test]
    fn float_against_u32_limits() {
        assert!(f32_le_u32(4096.0, 4096));
        assert!(!f32_le_u32(4096.5, 4096));
        assert!(f32_le_u32(-1.0, 0));
        assert!(f32_le_u32(f32::NEG_INFINITY, 0));
        assert!(!f32_le_u32(f32::INFINITY, u32::MAX));
        assert!(!f32_le_u32(f32::NAN, u32::MAX));
        // Rounds to 2^32.
        assert!(!f32_le_u32(4294967295.0, u32::MAX));
        assert!(f32_ge_u32(4294967295.0, u32::MAX));
        assert!(!f32_ge_u32(f32::NAN, 0));
    }

    #[test]
    fn signed_sum_overflow() {
        assert!(sum_exceeds_i32(i32::MAX - 10, 100));
        assert!(!sum_exceeds_i32(i32::MAX - 100, 100));
        assert!(!sum_exceeds_i32(i32::MIN, u32::MAX));
    }

    #[test]
    fn ranged_enum() {
        let legal: &[RangeInclusive<i32>] = enum_values!(SharingMode { EXCLUSIVE..=CONCURRENT });

        assert!(validate_ranged_enum("sharing_mode", 1, legal, &[]).is_none());
        assert!(validate_ranged_enum("sharing_mode", 2, legal, &[]).is_some());
    }

    #[test]
    fn array_pointer_contract() {
        let rules = ArrayRules {
            count_required: true,
            array_required: true,
            count_vuids: &["count"],
            array_vuids: &["array"],
        };

        let violations = validate_array::<u32>("count", "array", 0, std::ptr::null(), rules);
        assert!(violations.contains_vuid("count"));

        let violations = validate_array::<u32>("count", "array", 2, std::ptr::null(), rules);
        assert!(violations.contains_vuid("array"));

        let values = [1u32, 2];
        let violations = validate_array("count", "array", 2, values.as_ptr(), rules);
        assert!(violations.is_empty());
    }

    #[test]
    fn required_handles() {
        assert!(validate_required_handle("buffer", vk::Buffer::null(), &[]).is_some());
        assert!(validate_required_handle("buffer", vk::Buffer::from_raw(1), &[]).is_none());
        assert!(validate_required_pointer::<u8>("p", std::ptr::null(), &[]).is_some());
    }

    #[test]
    fn struct_type_tags() {
        let good = vk::BufferCreateInfo::default();
        assert!(validate_struct_type("create_info", &good, &[]).is_none());

        let mut bad = vk::BufferCreateInfo::default();
        bad.s_type = vk::StructureType::IMAGE_CREATE_INFO;
        let violations = validate_struct_type_array("p_create_infos", &[good, bad], &["s_type"]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].context, "p_create_infos[1].s_type");
    }

    #[test]
    fn strings() {
        let good = c"VK_KHR_swapchain";
        let bad = b"\xff\xfe\0";

        unsafe {
            assert_eq!(check_string(good.as_ptr(), 256), StringStatus::Ok);
            assert_eq!(check_string(good.as_ptr(), 4), StringStatus::TooLong);
            assert_eq!(
                check_string(bad.as_ptr().cast::<c_char>(), 256),
                StringStatus::BadData,
            );
            assert_eq!(check_string(std::ptr::null(), 256), StringStatus::BadData);
        }

        let mut array = [0 as c_char; 8];
        for (dst, src) in array.iter_mut().zip(b"VK_ok") {
            *dst = *src as c_char;
        }
        assert_eq!(fixed_c_str(&array), Some("VK_ok"));
    }
}
