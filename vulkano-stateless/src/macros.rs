// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

/// Builds a Vulkan flags value out of named bits. Usable in constant expressions.
macro_rules! flags_mask {
    ($ty:ident { $($flag:ident),+ $(,)? }) => {
        ::ash::vk::$ty::from_raw(0 $(| ::ash::vk::$ty::$flag.as_raw())+)
    };
}

/// Builds a list of raw enum values for [`crate::predicates::validate_ranged_enum`], from
/// contiguous core ranges (`A..=B`) and single extension values.
macro_rules! enum_values {
    ($ty:ident { $($first:ident $(..= $last:ident)?),+ $(,)? }) => {
        &[$(enum_values!(@range $ty $first $(..= $last)?)),+]
    };
    (@range $ty:ident $first:ident ..= $last:ident) => {
        ::ash::vk::$ty::$first.as_raw()..=::ash::vk::$ty::$last.as_raw()
    };
    (@range $ty:ident $only:ident) => {
        ::ash::vk::$ty::$only.as_raw()..=::ash::vk::$ty::$only.as_raw()
    };
}

/// Implements `ChainStruct` for Vulkan structures that carry a structure type tag.
macro_rules! chain_structs {
    ($($ty:ident = $stype:ident),+ $(,)?) => {
        $(
            unsafe impl $crate::chain::ChainStruct for ::ash::vk::$ty<'_> {
                const STRUCTURE_TYPE: ::ash::vk::StructureType = ::ash::vk::StructureType::$stype;
            }
        )+
    };
}
