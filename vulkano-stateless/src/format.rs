// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Classification of formats.
//!
//! Only the properties that the rules need are provided: which aspects a format has, whether it is
//! block-compressed, and how its chroma is subsampled.

use ash::vk::{self, Format};
use std::ops::RangeInclusive;

/// The block compression scheme used in a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum CompressionType {
    /// Adaptive Scalable Texture Compression, low dynamic range.
    ASTC_LDR,
    /// Adaptive Scalable Texture Compression, high dynamic range.
    ASTC_HDR,
    /// S3TC Block Compression.
    BC,
    /// Ericsson Texture Compression 2 and ETC2 Alpha Compression.
    ETC2,
    /// PowerVR Texture Compression.
    PVRTC,
}

/// For YCbCr formats, the type of chroma sampling used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChromaSampling {
    /// The chroma components are represented at the same resolution as the luma component.
    Mode444,
    /// The chroma components have half the horizontal resolution as the luma component.
    Mode422,
    /// The chroma components have half the horizontal and vertical resolution as the luma
    /// component.
    Mode420,
}

impl ChromaSampling {
    /// Returns whether the width of an image must be a multiple of 2.
    #[inline]
    pub fn subsampled_x(self) -> bool {
        matches!(self, ChromaSampling::Mode422 | ChromaSampling::Mode420)
    }

    /// Returns whether the height of an image must be a multiple of 2.
    #[inline]
    pub fn subsampled_y(self) -> bool {
        matches!(self, ChromaSampling::Mode420)
    }
}

/// Returns whether the format has a depth component.
pub fn has_depth(format: Format) -> bool {
    matches!(
        format,
        Format::D16_UNORM
            | Format::X8_D24_UNORM_PACK32
            | Format::D32_SFLOAT
            | Format::D16_UNORM_S8_UINT
            | Format::D24_UNORM_S8_UINT
            | Format::D32_SFLOAT_S8_UINT
    )
}

/// Returns whether the format has a stencil component.
pub fn has_stencil(format: Format) -> bool {
    matches!(
        format,
        Format::S8_UINT
            | Format::D16_UNORM_S8_UINT
            | Format::D24_UNORM_S8_UINT
            | Format::D32_SFLOAT_S8_UINT
    )
}

/// Returns whether the format has a depth or a stencil component.
#[inline]
pub fn is_depth_or_stencil(format: Format) -> bool {
    has_depth(format) || has_stencil(format)
}

/// Returns the compression scheme of a block-compressed format.
pub fn compression(format: Format) -> Option<CompressionType> {
    let raw = format.as_raw();

    if (Format::BC1_RGB_UNORM_BLOCK.as_raw()..=Format::BC7_SRGB_BLOCK.as_raw()).contains(&raw) {
        Some(CompressionType::BC)
    } else if (Format::ETC2_R8G8B8_UNORM_BLOCK.as_raw()..=Format::EAC_R11G11_SNORM_BLOCK.as_raw())
        .contains(&raw)
    {
        Some(CompressionType::ETC2)
    } else if (Format::ASTC_4X4_UNORM_BLOCK.as_raw()..=Format::ASTC_12X12_SRGB_BLOCK.as_raw())
        .contains(&raw)
    {
        Some(CompressionType::ASTC_LDR)
    } else if (Format::ASTC_4X4_SFLOAT_BLOCK.as_raw()..=Format::ASTC_12X12_SFLOAT_BLOCK.as_raw())
        .contains(&raw)
    {
        Some(CompressionType::ASTC_HDR)
    } else if (Format::PVRTC1_2BPP_UNORM_BLOCK_IMG.as_raw()
        ..=Format::PVRTC2_4BPP_SRGB_BLOCK_IMG.as_raw())
        .contains(&raw)
    {
        Some(CompressionType::PVRTC)
    } else {
        None
    }
}

/// Returns whether the format is block-compressed.
#[inline]
pub fn is_compressed(format: Format) -> bool {
    compression(format).is_some()
}

/// Returns the chroma subsampling of a YCbCr format.
pub fn chroma_sampling(format: Format) -> Option<ChromaSampling> {
    match format {
        Format::G8B8G8R8_422_UNORM
        | Format::B8G8R8G8_422_UNORM
        | Format::G8_B8_R8_3PLANE_422_UNORM
        | Format::G8_B8R8_2PLANE_422_UNORM
        | Format::G10X6B10X6G10X6R10X6_422_UNORM_4PACK16
        | Format::B10X6G10X6R10X6G10X6_422_UNORM_4PACK16
        | Format::G10X6_B10X6_R10X6_3PLANE_422_UNORM_3PACK16
        | Format::G10X6_B10X6R10X6_2PLANE_422_UNORM_3PACK16
        | Format::G12X4B12X4G12X4R12X4_422_UNORM_4PACK16
        | Format::B12X4G12X4R12X4G12X4_422_UNORM_4PACK16
        | Format::G12X4_B12X4_R12X4_3PLANE_422_UNORM_3PACK16
        | Format::G12X4_B12X4R12X4_2PLANE_422_UNORM_3PACK16
        | Format::G16B16G16R16_422_UNORM
        | Format::B16G16R16G16_422_UNORM
        | Format::G16_B16_R16_3PLANE_422_UNORM
        | Format::G16_B16R16_2PLANE_422_UNORM => Some(ChromaSampling::Mode422),
        Format::G8_B8_R8_3PLANE_420_UNORM
        | Format::G8_B8R8_2PLANE_420_UNORM
        | Format::G10X6_B10X6_R10X6_3PLANE_420_UNORM_3PACK16
        | Format::G10X6_B10X6R10X6_2PLANE_420_UNORM_3PACK16
        | Format::G12X4_B12X4_R12X4_3PLANE_420_UNORM_3PACK16
        | Format::G12X4_B12X4R12X4_2PLANE_420_UNORM_3PACK16
        | Format::G16_B16_R16_3PLANE_420_UNORM
        | Format::G16_B16R16_2PLANE_420_UNORM => Some(ChromaSampling::Mode420),
        Format::G8_B8_R8_3PLANE_444_UNORM
        | Format::G10X6_B10X6_R10X6_3PLANE_444_UNORM_3PACK16
        | Format::G12X4_B12X4_R12X4_3PLANE_444_UNORM_3PACK16
        | Format::G16_B16_R16_3PLANE_444_UNORM
        | Format::G8_B8R8_2PLANE_444_UNORM
        | Format::G10X6_B10X6R10X6_2PLANE_444_UNORM_3PACK16
        | Format::G12X4_B12X4R12X4_2PLANE_444_UNORM_3PACK16
        | Format::G16_B16R16_2PLANE_444_UNORM => Some(ChromaSampling::Mode444),
        _ => None,
    }
}

/// Returns the number of memory planes of the format.
pub fn plane_count(format: Format) -> u32 {
    match format {
        Format::G8_B8_R8_3PLANE_420_UNORM
        | Format::G8_B8_R8_3PLANE_422_UNORM
        | Format::G8_B8_R8_3PLANE_444_UNORM
        | Format::G10X6_B10X6_R10X6_3PLANE_420_UNORM_3PACK16
        | Format::G10X6_B10X6_R10X6_3PLANE_422_UNORM_3PACK16
        | Format::G10X6_B10X6_R10X6_3PLANE_444_UNORM_3PACK16
        | Format::G12X4_B12X4_R12X4_3PLANE_420_UNORM_3PACK16
        | Format::G12X4_B12X4_R12X4_3PLANE_422_UNORM_3PACK16
        | Format::G12X4_B12X4_R12X4_3PLANE_444_UNORM_3PACK16
        | Format::G16_B16_R16_3PLANE_420_UNORM
        | Format::G16_B16_R16_3PLANE_422_UNORM
        | Format::G16_B16_R16_3PLANE_444_UNORM => 3,
        Format::G8_B8R8_2PLANE_420_UNORM
        | Format::G8_B8R8_2PLANE_422_UNORM
        | Format::G8_B8R8_2PLANE_444_UNORM
        | Format::G10X6_B10X6R10X6_2PLANE_420_UNORM_3PACK16
        | Format::G10X6_B10X6R10X6_2PLANE_422_UNORM_3PACK16
        | Format::G10X6_B10X6R10X6_2PLANE_444_UNORM_3PACK16
        | Format::G12X4_B12X4R12X4_2PLANE_420_UNORM_3PACK16
        | Format::G12X4_B12X4R12X4_2PLANE_422_UNORM_3PACK16
        | Format::G12X4_B12X4R12X4_2PLANE_444_UNORM_3PACK16
        | Format::G16_B16R16_2PLANE_420_UNORM
        | Format::G16_B16R16_2PLANE_422_UNORM
        | Format::G16_B16R16_2PLANE_444_UNORM => 2,
        _ => 1,
    }
}

/// Returns whether an image view of the format needs a sampler YCbCr conversion.
#[inline]
pub fn requires_ycbcr_conversion(format: Format) -> bool {
    chroma_sampling(format).is_some()
}

/// Returns the aspects of the format.
pub fn aspects(format: Format) -> vk::ImageAspectFlags {
    if format == Format::UNDEFINED {
        return vk::ImageAspectFlags::empty();
    }

    let mut aspects = vk::ImageAspectFlags::empty();

    if has_depth(format) {
        aspects |= vk::ImageAspectFlags::DEPTH;
    }

    if has_stencil(format) {
        aspects |= vk::ImageAspectFlags::STENCIL;
    }

    if aspects.is_empty() {
        aspects = vk::ImageAspectFlags::COLOR;

        match plane_count(format) {
            3 => {
                aspects |= vk::ImageAspectFlags::PLANE_0
                    | vk::ImageAspectFlags::PLANE_1
                    | vk::ImageAspectFlags::PLANE_2
            }
            2 => aspects |= vk::ImageAspectFlags::PLANE_0 | vk::ImageAspectFlags::PLANE_1,
            _ => (),
        }
    }

    aspects
}

/// The raw values of every format this crate knows about.
pub(crate) const FORMAT_VALUES: &[RangeInclusive<i32>] = enum_values!(Format {
    UNDEFINED..=ASTC_12X12_SRGB_BLOCK,
    G8B8G8R8_422_UNORM..=G16_B16_R16_3PLANE_444_UNORM,
    PVRTC1_2BPP_UNORM_BLOCK_IMG..=PVRTC2_4BPP_SRGB_BLOCK_IMG,
    ASTC_4X4_SFLOAT_BLOCK..=ASTC_12X12_SFLOAT_BLOCK,
    G8_B8R8_2PLANE_444_UNORM..=G16_B16R16_2PLANE_444_UNORM,
    A4R4G4B4_UNORM_PACK16..=A4B4G4R4_UNORM_PACK16,
    A1B5G5R5_UNORM_PACK16_KHR,
    A8_UNORM_KHR,
});

/// Returns the size in bytes of one texel of an uncompressed, single-plane color format.
///
/// Returns `None` for formats whose texel size the rules do not need.
pub fn texel_size(format: Format) -> Option<u64> {
    let size = match format {
        Format::R8_UNORM
        | Format::R8_SNORM
        | Format::R8_USCALED
        | Format::R8_SSCALED
        | Format::R8_UINT
        | Format::R8_SINT
        | Format::R8_SRGB
        | Format::R4G4_UNORM_PACK8 => 1,
        Format::R8G8_UNORM
        | Format::R8G8_SNORM
        | Format::R8G8_UINT
        | Format::R8G8_SINT
        | Format::R8G8_SRGB
        | Format::R16_UNORM
        | Format::R16_SNORM
        | Format::R16_UINT
        | Format::R16_SINT
        | Format::R16_SFLOAT
        | Format::R5G6B5_UNORM_PACK16
        | Format::B5G6R5_UNORM_PACK16
        | Format::R4G4B4A4_UNORM_PACK16
        | Format::B4G4R4A4_UNORM_PACK16
        | Format::R5G5B5A1_UNORM_PACK16
        | Format::B5G5R5A1_UNORM_PACK16
        | Format::A1R5G5B5_UNORM_PACK16 => 2,
        Format::R8G8B8_UNORM
        | Format::R8G8B8_SNORM
        | Format::R8G8B8_UINT
        | Format::R8G8B8_SINT
        | Format::R8G8B8_SRGB
        | Format::B8G8R8_UNORM
        | Format::B8G8R8_SRGB => 3,
        Format::R8G8B8A8_UNORM
        | Format::R8G8B8A8_SNORM
        | Format::R8G8B8A8_USCALED
        | Format::R8G8B8A8_SSCALED
        | Format::R8G8B8A8_UINT
        | Format::R8G8B8A8_SINT
        | Format::R8G8B8A8_SRGB
        | Format::B8G8R8A8_UNORM
        | Format::B8G8R8A8_SRGB
        | Format::A8B8G8R8_UNORM_PACK32
        | Format::A8B8G8R8_UINT_PACK32
        | Format::A8B8G8R8_SINT_PACK32
        | Format::A2R10G10B10_UNORM_PACK32
        | Format::A2B10G10R10_UNORM_PACK32
        | Format::A2B10G10R10_UINT_PACK32
        | Format::B10G11R11_UFLOAT_PACK32
        | Format::E5B9G9R9_UFLOAT_PACK32
        | Format::R16G16_UNORM
        | Format::R16G16_SNORM
        | Format::R16G16_UINT
        | Format::R16G16_SINT
        | Format::R16G16_SFLOAT
        | Format::R32_UINT
        | Format::R32_SINT
        | Format::R32_SFLOAT => 4,
        Format::R16G16B16_UNORM
        | Format::R16G16B16_SNORM
        | Format::R16G16B16_UINT
        | Format::R16G16B16_SINT
        | Format::R16G16B16_SFLOAT => 6,
        Format::R16G16B16A16_UNORM
        | Format::R16G16B16A16_SNORM
        | Format::R16G16B16A16_UINT
        | Format::R16G16B16A16_SINT
        | Format::R16G16B16A16_SFLOAT
        | Format::R32G32_UINT
        | Format::R32G32_SINT
        | Format::R32G32_SFLOAT
        | Format::R64_UINT
        | Format::R64_SINT
        | Format::R64_SFLOAT => 8,
        Format::R32G32B32_UINT | Format::R32G32B32_SINT | Format::R32G32B32_SFLOAT => 12,
        Format::R32G32B32A32_UINT
        | Format::R32G32B32A32_SINT
        | Format::R32G32B32A32_SFLOAT
        | Format::R64G64_UINT
        | Format::R64G64_SINT
        | Format::R64G64_SFLOAT => 16,
        Format::R64G64B64_UINT | Format::R64G64B64_SINT | Format::R64G64B64_SFLOAT => 24,
        Format::R64G64B64A64_UINT | Format::R64G64B64A64_SINT | Format::R64G64B64A64_SFLOAT => 32,
        _ => return None,
    };

    Some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_stencil_aspects() {
        assert_eq!(aspects(Format::D32_SFLOAT), vk::ImageAspectFlags::DEPTH);
        assert_eq!(aspects(Format::S8_UINT), vk::ImageAspectFlags::STENCIL);
        assert_eq!(
            aspects(Format::D24_UNORM_S8_UINT),
            vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL,
        );
        assert_eq!(aspects(Format::R8G8B8A8_UNORM), vk::ImageAspectFlags::COLOR);
        assert!(aspects(Format::UNDEFINED).is_empty());
    }

    #[test]
    fn compression_classes() {
        assert_eq!(compression(Format::BC7_UNORM_BLOCK), Some(CompressionType::BC));
        assert_eq!(compression(Format::EAC_R11_UNORM_BLOCK), Some(CompressionType::ETC2));
        assert_eq!(
            compression(Format::ASTC_8X8_SRGB_BLOCK),
            Some(CompressionType::ASTC_LDR),
        );
        assert_eq!(compression(Format::R8_UNORM), None);
    }

    #[test]
    fn ycbcr_sampling() {
        let sampling = chroma_sampling(Format::G8_B8R8_2PLANE_420_UNORM).unwrap();
        assert!(sampling.subsampled_x() && sampling.subsampled_y());
        assert_eq!(plane_count(Format::G8_B8R8_2PLANE_420_UNORM), 2);
        assert!(aspects(Format::G8_B8R8_2PLANE_420_UNORM).contains(vk::ImageAspectFlags::PLANE_1));

        let sampling = chroma_sampling(Format::G8B8G8R8_422_UNORM).unwrap();
        assert!(sampling.subsampled_x() && !sampling.subsampled_y());
        assert!(!requires_ycbcr_conversion(Format::R10X6_UNORM_PACK16));
    }

    #[test]
    fn texel_sizes_and_known_values() {
        assert_eq!(texel_size(Format::R32G32B32_SFLOAT), Some(12));
        assert_eq!(texel_size(Format::B8G8R8A8_SRGB), Some(4));
        assert_eq!(texel_size(Format::BC1_RGB_UNORM_BLOCK), None);

        let known = |format: Format| {
            FORMAT_VALUES
                .iter()
                .any(|range| range.contains(&format.as_raw()))
        };
        assert!(known(Format::ASTC_12X12_SRGB_BLOCK));
        assert!(known(Format::G16_B16R16_2PLANE_444_UNORM));
        assert!(!known(Format::from_raw(185)));
    }
}
