// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pixel and vertex-element formats, with the classification helpers every
//! backend uses to pick upload paths and attachment points.

/// Coarse family a [`GraphicsFormat`] belongs to.
///
/// sRGB formats count as [`FormatKind::Normalized`] and scaled formats as
/// [`FormatKind::Integer`], since that is how they are stored natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// [`GraphicsFormat::Undefined`].
    Undefined,
    /// Fixed-point data read back as floats in `[0, 1]` or `[-1, 1]`.
    Normalized,
    /// Raw signed or unsigned integers.
    Integer,
    /// Half, single or double precision floats, including packed float formats.
    Float,
    /// Depth only.
    Depth,
    /// Stencil only.
    Stencil,
    /// Combined depth and stencil.
    DepthStencil,
    /// Block-compressed (BC, ETC2, EAC, ASTC).
    Compressed,
}

/// Abstract pixel and vertex-element formats.
///
/// Channel order is spelled out in the name (`B8G8R8A8` is BGRA in memory).
/// Depth, stencil and block-compressed families are recognised by
/// [`GraphicsFormat::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsFormat {
    /// No format.
    #[default]
    Undefined,
    /// `R4G4` unsigned normalized, packed into 8 bits.
    R4G4UNormPack8,
    /// `R4G4B4A4` unsigned normalized, packed into 16 bits.
    R4G4B4A4UNormPack16,
    /// `B4G4R4A4` unsigned normalized, packed into 16 bits.
    B4G4R4A4UNormPack16,
    /// `R5G6B5` unsigned normalized, packed into 16 bits.
    R5G6B5UNormPack16,
    /// `B5G6R5` unsigned normalized, packed into 16 bits.
    B5G6R5UNormPack16,
    /// `R5G5B5A1` unsigned normalized, packed into 16 bits.
    R5G5B5A1UNormPack16,
    /// `B5G5R5A1` unsigned normalized, packed into 16 bits.
    B5G5R5A1UNormPack16,
    /// `A1R5G5B5` unsigned normalized, packed into 16 bits.
    A1R5G5B5UNormPack16,
    /// `R8` unsigned normalized.
    R8UNorm,
    /// `R8` signed normalized.
    R8SNorm,
    /// `R8` unsigned scaled.
    R8UScaled,
    /// `R8` signed scaled.
    R8SScaled,
    /// `R8` unsigned integer.
    R8UInt,
    /// `R8` signed integer.
    R8SInt,
    /// `R8` sRGB-encoded.
    R8SRGB,
    /// `R8G8` unsigned normalized.
    R8G8UNorm,
    /// `R8G8` signed normalized.
    R8G8SNorm,
    /// `R8G8` unsigned scaled.
    R8G8UScaled,
    /// `R8G8` signed scaled.
    R8G8SScaled,
    /// `R8G8` unsigned integer.
    R8G8UInt,
    /// `R8G8` signed integer.
    R8G8SInt,
    /// `R8G8` sRGB-encoded.
    R8G8SRGB,
    /// `R8G8B8` unsigned normalized.
    R8G8B8UNorm,
    /// `R8G8B8` signed normalized.
    R8G8B8SNorm,
    /// `R8G8B8` unsigned scaled.
    R8G8B8UScaled,
    /// `R8G8B8` signed scaled.
    R8G8B8SScaled,
    /// `R8G8B8` unsigned integer.
    R8G8B8UInt,
    /// `R8G8B8` signed integer.
    R8G8B8SInt,
    /// `R8G8B8` sRGB-encoded.
    R8G8B8SRGB,
    /// `B8G8R8` unsigned normalized.
    B8G8R8UNorm,
    /// `B8G8R8` signed normalized.
    B8G8R8SNorm,
    /// `B8G8R8` unsigned scaled.
    B8G8R8UScaled,
    /// `B8G8R8` signed scaled.
    B8G8R8SScaled,
    /// `B8G8R8` unsigned integer.
    B8G8R8UInt,
    /// `B8G8R8` signed integer.
    B8G8R8SInt,
    /// `B8G8R8` sRGB-encoded.
    B8G8R8SRGB,
    /// `R8G8B8A8` unsigned normalized.
    R8G8B8A8UNorm,
    /// `R8G8B8A8` signed normalized.
    R8G8B8A8SNorm,
    /// `R8G8B8A8` unsigned scaled.
    R8G8B8A8UScaled,
    /// `R8G8B8A8` signed scaled.
    R8G8B8A8SScaled,
    /// `R8G8B8A8` unsigned integer.
    R8G8B8A8UInt,
    /// `R8G8B8A8` signed integer.
    R8G8B8A8SInt,
    /// `R8G8B8A8` sRGB-encoded.
    R8G8B8A8SRGB,
    /// `B8G8R8A8` unsigned normalized.
    B8G8R8A8UNorm,
    /// `B8G8R8A8` signed normalized.
    B8G8R8A8SNorm,
    /// `B8G8R8A8` unsigned scaled.
    B8G8R8A8UScaled,
    /// `B8G8R8A8` signed scaled.
    B8G8R8A8SScaled,
    /// `B8G8R8A8` unsigned integer.
    B8G8R8A8UInt,
    /// `B8G8R8A8` signed integer.
    B8G8R8A8SInt,
    /// `B8G8R8A8` sRGB-encoded.
    B8G8R8A8SRGB,
    /// `A8B8G8R8` unsigned normalized, packed into 32 bits.
    A8B8G8R8UNormPack32,
    /// `A8B8G8R8` signed normalized, packed into 32 bits.
    A8B8G8R8SNormPack32,
    /// `A8B8G8R8` unsigned scaled, packed into 32 bits.
    A8B8G8R8UScaledPack32,
    /// `A8B8G8R8` signed scaled, packed into 32 bits.
    A8B8G8R8SScaledPack32,
    /// `A8B8G8R8` unsigned integer, packed into 32 bits.
    A8B8G8R8UIntPack32,
    /// `A8B8G8R8` signed integer, packed into 32 bits.
    A8B8G8R8SIntPack32,
    /// `A8B8G8R8` sRGB-encoded, packed into 32 bits.
    A8B8G8R8SRGBPack32,
    /// `A2R10G10B10` unsigned normalized, packed into 32 bits.
    A2R10G10B10UNormPack32,
    /// `A2R10G10B10` signed normalized, packed into 32 bits.
    A2R10G10B10SNormPack32,
    /// `A2R10G10B10` unsigned scaled, packed into 32 bits.
    A2R10G10B10UScaledPack32,
    /// `A2R10G10B10` signed scaled, packed into 32 bits.
    A2R10G10B10SScaledPack32,
    /// `A2R10G10B10` unsigned integer, packed into 32 bits.
    A2R10G10B10UIntPack32,
    /// `A2R10G10B10` signed integer, packed into 32 bits.
    A2R10G10B10SIntPack32,
    /// `A2B10G10R10` unsigned normalized, packed into 32 bits.
    A2B10G10R10UNormPack32,
    /// `A2B10G10R10` signed normalized, packed into 32 bits.
    A2B10G10R10SNormPack32,
    /// `A2B10G10R10` unsigned scaled, packed into 32 bits.
    A2B10G10R10UScaledPack32,
    /// `A2B10G10R10` signed scaled, packed into 32 bits.
    A2B10G10R10SScaledPack32,
    /// `A2B10G10R10` unsigned integer, packed into 32 bits.
    A2B10G10R10UIntPack32,
    /// `A2B10G10R10` signed integer, packed into 32 bits.
    A2B10G10R10SIntPack32,
    /// `R16` unsigned normalized.
    R16UNorm,
    /// `R16` signed normalized.
    R16SNorm,
    /// `R16` unsigned scaled.
    R16UScaled,
    /// `R16` signed scaled.
    R16SScaled,
    /// `R16` unsigned integer.
    R16UInt,
    /// `R16` signed integer.
    R16SInt,
    /// `R16` signed float.
    R16SFloat,
    /// `R16G16` unsigned normalized.
    R16G16UNorm,
    /// `R16G16` signed normalized.
    R16G16SNorm,
    /// `R16G16` unsigned scaled.
    R16G16UScaled,
    /// `R16G16` signed scaled.
    R16G16SScaled,
    /// `R16G16` unsigned integer.
    R16G16UInt,
    /// `R16G16` signed integer.
    R16G16SInt,
    /// `R16G16` signed float.
    R16G16SFloat,
    /// `R16G16B16` unsigned normalized.
    R16G16B16UNorm,
    /// `R16G16B16` signed normalized.
    R16G16B16SNorm,
    /// `R16G16B16` unsigned scaled.
    R16G16B16UScaled,
    /// `R16G16B16` signed scaled.
    R16G16B16SScaled,
    /// `R16G16B16` unsigned integer.
    R16G16B16UInt,
    /// `R16G16B16` signed integer.
    R16G16B16SInt,
    /// `R16G16B16` signed float.
    R16G16B16SFloat,
    /// `R16G16B16A16` unsigned normalized.
    R16G16B16A16UNorm,
    /// `R16G16B16A16` signed normalized.
    R16G16B16A16SNorm,
    /// `R16G16B16A16` unsigned scaled.
    R16G16B16A16UScaled,
    /// `R16G16B16A16` signed scaled.
    R16G16B16A16SScaled,
    /// `R16G16B16A16` unsigned integer.
    R16G16B16A16UInt,
    /// `R16G16B16A16` signed integer.
    R16G16B16A16SInt,
    /// `R16G16B16A16` signed float.
    R16G16B16A16SFloat,
    /// `R32` unsigned integer.
    R32UInt,
    /// `R32` signed integer.
    R32SInt,
    /// `R32` signed float.
    R32SFloat,
    /// `R32G32` unsigned integer.
    R32G32UInt,
    /// `R32G32` signed integer.
    R32G32SInt,
    /// `R32G32` signed float.
    R32G32SFloat,
    /// `R32G32B32` unsigned integer.
    R32G32B32UInt,
    /// `R32G32B32` signed integer.
    R32G32B32SInt,
    /// `R32G32B32` signed float.
    R32G32B32SFloat,
    /// `R32G32B32A32` unsigned integer.
    R32G32B32A32UInt,
    /// `R32G32B32A32` signed integer.
    R32G32B32A32SInt,
    /// `R32G32B32A32` signed float.
    R32G32B32A32SFloat,
    /// `R64` unsigned integer.
    R64UInt,
    /// `R64` signed integer.
    R64SInt,
    /// `R64` signed float.
    R64SFloat,
    /// `R64G64` unsigned integer.
    R64G64UInt,
    /// `R64G64` signed integer.
    R64G64SInt,
    /// `R64G64` signed float.
    R64G64SFloat,
    /// `R64G64B64` unsigned integer.
    R64G64B64UInt,
    /// `R64G64B64` signed integer.
    R64G64B64SInt,
    /// `R64G64B64` signed float.
    R64G64B64SFloat,
    /// `R64G64B64A64` unsigned integer.
    R64G64B64A64UInt,
    /// `R64G64B64A64` signed integer.
    R64G64B64A64SInt,
    /// `R64G64B64A64` signed float.
    R64G64B64A64SFloat,
    /// `B10G11R11` unsigned float, packed into 32 bits.
    B10G11R11UFloatPack32,
    /// `E5B9G9R9` unsigned float, packed into 32 bits.
    E5B9G9R9UFloatPack32,
    /// `D16` unsigned normalized.
    D16UNorm,
    /// `X8D24` unsigned normalized, packed into 32 bits.
    X8D24UNormPack32,
    /// `D32` signed float.
    D32SFloat,
    /// `S8` unsigned integer.
    S8UInt,
    /// `D16` unsigned normalized depth with an 8-bit stencil.
    D16UNormS8UInt,
    /// `D24` unsigned normalized depth with an 8-bit stencil.
    D24UNormS8UInt,
    /// `D32` signed float depth with an 8-bit stencil.
    D32SFloatS8UInt,
    /// BC1 `RGB` block-compressed, unsigned normalized.
    BC1RGBUNormBlock,
    /// BC1 `RGB` block-compressed, sRGB.
    BC1RGBSRGBBlock,
    /// BC1 `RGBA` block-compressed, unsigned normalized.
    BC1RGBAUNormBlock,
    /// BC1 `RGBA` block-compressed, sRGB.
    BC1RGBASRGBBlock,
    /// BC2 block-compressed, unsigned normalized.
    BC2UNormBlock,
    /// BC2 block-compressed, sRGB.
    BC2SRGBBlock,
    /// BC3 block-compressed, unsigned normalized.
    BC3UNormBlock,
    /// BC3 block-compressed, sRGB.
    BC3SRGBBlock,
    /// BC4 block-compressed, unsigned normalized.
    BC4UNormBlock,
    /// BC4 block-compressed, signed normalized.
    BC4SNormBlock,
    /// BC5 block-compressed, unsigned normalized.
    BC5UNormBlock,
    /// BC5 block-compressed, signed normalized.
    BC5SNormBlock,
    /// BC6H block-compressed, unsigned float.
    BC6HUFloatBlock,
    /// BC6H block-compressed, signed float.
    BC6HSFloatBlock,
    /// BC7 block-compressed, unsigned normalized.
    BC7UNormBlock,
    /// BC7 block-compressed, sRGB.
    BC7SRGBBlock,
    /// ETC2 `R8G8B8` block-compressed, unsigned normalized.
    ETC2R8G8B8UNormBlock,
    /// ETC2 `R8G8B8` block-compressed, sRGB.
    ETC2R8G8B8SRGBBlock,
    /// ETC2 `R8G8B8A1` block-compressed, unsigned normalized.
    ETC2R8G8B8A1UNormBlock,
    /// ETC2 `R8G8B8A1` block-compressed, sRGB.
    ETC2R8G8B8A1SRGBBlock,
    /// ETC2 `R8G8B8A8` block-compressed, unsigned normalized.
    ETC2R8G8B8A8UNormBlock,
    /// ETC2 `R8G8B8A8` block-compressed, sRGB.
    ETC2R8G8B8A8SRGBBlock,
    /// EAC `R11` block-compressed, unsigned normalized.
    EACR11UNormBlock,
    /// EAC `R11` block-compressed, signed normalized.
    EACR11SNormBlock,
    /// EAC `R11G11` block-compressed, unsigned normalized.
    EACR11G11UNormBlock,
    /// EAC `R11G11` block-compressed, signed normalized.
    EACR11G11SNormBlock,
    /// ASTC `4x4` block-compressed, unsigned normalized.
    ASTC4x4UNormBlock,
    /// ASTC `4x4` block-compressed, sRGB.
    ASTC4x4SRGBBlock,
    /// ASTC `5x4` block-compressed, unsigned normalized.
    ASTC5x4UNormBlock,
    /// ASTC `5x4` block-compressed, sRGB.
    ASTC5x4SRGBBlock,
    /// ASTC `5x5` block-compressed, unsigned normalized.
    ASTC5x5UNormBlock,
    /// ASTC `5x5` block-compressed, sRGB.
    ASTC5x5SRGBBlock,
    /// ASTC `6x5` block-compressed, unsigned normalized.
    ASTC6x5UNormBlock,
    /// ASTC `6x5` block-compressed, sRGB.
    ASTC6x5SRGBBlock,
    /// ASTC `6x6` block-compressed, unsigned normalized.
    ASTC6x6UNormBlock,
    /// ASTC `6x6` block-compressed, sRGB.
    ASTC6x6SRGBBlock,
    /// ASTC `8x5` block-compressed, unsigned normalized.
    ASTC8x5UNormBlock,
    /// ASTC `8x5` block-compressed, sRGB.
    ASTC8x5SRGBBlock,
    /// ASTC `8x6` block-compressed, unsigned normalized.
    ASTC8x6UNormBlock,
    /// ASTC `8x6` block-compressed, sRGB.
    ASTC8x6SRGBBlock,
    /// ASTC `8x8` block-compressed, unsigned normalized.
    ASTC8x8UNormBlock,
    /// ASTC `8x8` block-compressed, sRGB.
    ASTC8x8SRGBBlock,
    /// ASTC `10x5` block-compressed, unsigned normalized.
    ASTC10x5UNormBlock,
    /// ASTC `10x5` block-compressed, sRGB.
    ASTC10x5SRGBBlock,
    /// ASTC `10x6` block-compressed, unsigned normalized.
    ASTC10x6UNormBlock,
    /// ASTC `10x6` block-compressed, sRGB.
    ASTC10x6SRGBBlock,
    /// ASTC `10x8` block-compressed, unsigned normalized.
    ASTC10x8UNormBlock,
    /// ASTC `10x8` block-compressed, sRGB.
    ASTC10x8SRGBBlock,
    /// ASTC `10x10` block-compressed, unsigned normalized.
    ASTC10x10UNormBlock,
    /// ASTC `10x10` block-compressed, sRGB.
    ASTC10x10SRGBBlock,
    /// ASTC `12x10` block-compressed, unsigned normalized.
    ASTC12x10UNormBlock,
    /// ASTC `12x10` block-compressed, sRGB.
    ASTC12x10SRGBBlock,
    /// ASTC `12x12` block-compressed, unsigned normalized.
    ASTC12x12UNormBlock,
    /// ASTC `12x12` block-compressed, sRGB.
    ASTC12x12SRGBBlock,
}

impl GraphicsFormat {
    /// Every declared format, in declaration order.
    pub const ALL: [GraphicsFormat; 185] = [
        GraphicsFormat::Undefined,
        GraphicsFormat::R4G4UNormPack8,
        GraphicsFormat::R4G4B4A4UNormPack16,
        GraphicsFormat::B4G4R4A4UNormPack16,
        GraphicsFormat::R5G6B5UNormPack16,
        GraphicsFormat::B5G6R5UNormPack16,
        GraphicsFormat::R5G5B5A1UNormPack16,
        GraphicsFormat::B5G5R5A1UNormPack16,
        GraphicsFormat::A1R5G5B5UNormPack16,
        GraphicsFormat::R8UNorm,
        GraphicsFormat::R8SNorm,
        GraphicsFormat::R8UScaled,
        GraphicsFormat::R8SScaled,
        GraphicsFormat::R8UInt,
        GraphicsFormat::R8SInt,
        GraphicsFormat::R8SRGB,
        GraphicsFormat::R8G8UNorm,
        GraphicsFormat::R8G8SNorm,
        GraphicsFormat::R8G8UScaled,
        GraphicsFormat::R8G8SScaled,
        GraphicsFormat::R8G8UInt,
        GraphicsFormat::R8G8SInt,
        GraphicsFormat::R8G8SRGB,
        GraphicsFormat::R8G8B8UNorm,
        GraphicsFormat::R8G8B8SNorm,
        GraphicsFormat::R8G8B8UScaled,
        GraphicsFormat::R8G8B8SScaled,
        GraphicsFormat::R8G8B8UInt,
        GraphicsFormat::R8G8B8SInt,
        GraphicsFormat::R8G8B8SRGB,
        GraphicsFormat::B8G8R8UNorm,
        GraphicsFormat::B8G8R8SNorm,
        GraphicsFormat::B8G8R8UScaled,
        GraphicsFormat::B8G8R8SScaled,
        GraphicsFormat::B8G8R8UInt,
        GraphicsFormat::B8G8R8SInt,
        GraphicsFormat::B8G8R8SRGB,
        GraphicsFormat::R8G8B8A8UNorm,
        GraphicsFormat::R8G8B8A8SNorm,
        GraphicsFormat::R8G8B8A8UScaled,
        GraphicsFormat::R8G8B8A8SScaled,
        GraphicsFormat::R8G8B8A8UInt,
        GraphicsFormat::R8G8B8A8SInt,
        GraphicsFormat::R8G8B8A8SRGB,
        GraphicsFormat::B8G8R8A8UNorm,
        GraphicsFormat::B8G8R8A8SNorm,
        GraphicsFormat::B8G8R8A8UScaled,
        GraphicsFormat::B8G8R8A8SScaled,
        GraphicsFormat::B8G8R8A8UInt,
        GraphicsFormat::B8G8R8A8SInt,
        GraphicsFormat::B8G8R8A8SRGB,
        GraphicsFormat::A8B8G8R8UNormPack32,
        GraphicsFormat::A8B8G8R8SNormPack32,
        GraphicsFormat::A8B8G8R8UScaledPack32,
        GraphicsFormat::A8B8G8R8SScaledPack32,
        GraphicsFormat::A8B8G8R8UIntPack32,
        GraphicsFormat::A8B8G8R8SIntPack32,
        GraphicsFormat::A8B8G8R8SRGBPack32,
        GraphicsFormat::A2R10G10B10UNormPack32,
        GraphicsFormat::A2R10G10B10SNormPack32,
        GraphicsFormat::A2R10G10B10UScaledPack32,
        GraphicsFormat::A2R10G10B10SScaledPack32,
        GraphicsFormat::A2R10G10B10UIntPack32,
        GraphicsFormat::A2R10G10B10SIntPack32,
        GraphicsFormat::A2B10G10R10UNormPack32,
        GraphicsFormat::A2B10G10R10SNormPack32,
        GraphicsFormat::A2B10G10R10UScaledPack32,
        GraphicsFormat::A2B10G10R10SScaledPack32,
        GraphicsFormat::A2B10G10R10UIntPack32,
        GraphicsFormat::A2B10G10R10SIntPack32,
        GraphicsFormat::R16UNorm,
        GraphicsFormat::R16SNorm,
        GraphicsFormat::R16UScaled,
        GraphicsFormat::R16SScaled,
        GraphicsFormat::R16UInt,
        GraphicsFormat::R16SInt,
        GraphicsFormat::R16SFloat,
        GraphicsFormat::R16G16UNorm,
        GraphicsFormat::R16G16SNorm,
        GraphicsFormat::R16G16UScaled,
        GraphicsFormat::R16G16SScaled,
        GraphicsFormat::R16G16UInt,
        GraphicsFormat::R16G16SInt,
        GraphicsFormat::R16G16SFloat,
        GraphicsFormat::R16G16B16UNorm,
        GraphicsFormat::R16G16B16SNorm,
        GraphicsFormat::R16G16B16UScaled,
        GraphicsFormat::R16G16B16SScaled,
        GraphicsFormat::R16G16B16UInt,
        GraphicsFormat::R16G16B16SInt,
        GraphicsFormat::R16G16B16SFloat,
        GraphicsFormat::R16G16B16A16UNorm,
        GraphicsFormat::R16G16B16A16SNorm,
        GraphicsFormat::R16G16B16A16UScaled,
        GraphicsFormat::R16G16B16A16SScaled,
        GraphicsFormat::R16G16B16A16UInt,
        GraphicsFormat::R16G16B16A16SInt,
        GraphicsFormat::R16G16B16A16SFloat,
        GraphicsFormat::R32UInt,
        GraphicsFormat::R32SInt,
        GraphicsFormat::R32SFloat,
        GraphicsFormat::R32G32UInt,
        GraphicsFormat::R32G32SInt,
        GraphicsFormat::R32G32SFloat,
        GraphicsFormat::R32G32B32UInt,
        GraphicsFormat::R32G32B32SInt,
        GraphicsFormat::R32G32B32SFloat,
        GraphicsFormat::R32G32B32A32UInt,
        GraphicsFormat::R32G32B32A32SInt,
        GraphicsFormat::R32G32B32A32SFloat,
        GraphicsFormat::R64UInt,
        GraphicsFormat::R64SInt,
        GraphicsFormat::R64SFloat,
        GraphicsFormat::R64G64UInt,
        GraphicsFormat::R64G64SInt,
        GraphicsFormat::R64G64SFloat,
        GraphicsFormat::R64G64B64UInt,
        GraphicsFormat::R64G64B64SInt,
        GraphicsFormat::R64G64B64SFloat,
        GraphicsFormat::R64G64B64A64UInt,
        GraphicsFormat::R64G64B64A64SInt,
        GraphicsFormat::R64G64B64A64SFloat,
        GraphicsFormat::B10G11R11UFloatPack32,
        GraphicsFormat::E5B9G9R9UFloatPack32,
        GraphicsFormat::D16UNorm,
        GraphicsFormat::X8D24UNormPack32,
        GraphicsFormat::D32SFloat,
        GraphicsFormat::S8UInt,
        GraphicsFormat::D16UNormS8UInt,
        GraphicsFormat::D24UNormS8UInt,
        GraphicsFormat::D32SFloatS8UInt,
        GraphicsFormat::BC1RGBUNormBlock,
        GraphicsFormat::BC1RGBSRGBBlock,
        GraphicsFormat::BC1RGBAUNormBlock,
        GraphicsFormat::BC1RGBASRGBBlock,
        GraphicsFormat::BC2UNormBlock,
        GraphicsFormat::BC2SRGBBlock,
        GraphicsFormat::BC3UNormBlock,
        GraphicsFormat::BC3SRGBBlock,
        GraphicsFormat::BC4UNormBlock,
        GraphicsFormat::BC4SNormBlock,
        GraphicsFormat::BC5UNormBlock,
        GraphicsFormat::BC5SNormBlock,
        GraphicsFormat::BC6HUFloatBlock,
        GraphicsFormat::BC6HSFloatBlock,
        GraphicsFormat::BC7UNormBlock,
        GraphicsFormat::BC7SRGBBlock,
        GraphicsFormat::ETC2R8G8B8UNormBlock,
        GraphicsFormat::ETC2R8G8B8SRGBBlock,
        GraphicsFormat::ETC2R8G8B8A1UNormBlock,
        GraphicsFormat::ETC2R8G8B8A1SRGBBlock,
        GraphicsFormat::ETC2R8G8B8A8UNormBlock,
        GraphicsFormat::ETC2R8G8B8A8SRGBBlock,
        GraphicsFormat::EACR11UNormBlock,
        GraphicsFormat::EACR11SNormBlock,
        GraphicsFormat::EACR11G11UNormBlock,
        GraphicsFormat::EACR11G11SNormBlock,
        GraphicsFormat::ASTC4x4UNormBlock,
        GraphicsFormat::ASTC4x4SRGBBlock,
        GraphicsFormat::ASTC5x4UNormBlock,
        GraphicsFormat::ASTC5x4SRGBBlock,
        GraphicsFormat::ASTC5x5UNormBlock,
        GraphicsFormat::ASTC5x5SRGBBlock,
        GraphicsFormat::ASTC6x5UNormBlock,
        GraphicsFormat::ASTC6x5SRGBBlock,
        GraphicsFormat::ASTC6x6UNormBlock,
        GraphicsFormat::ASTC6x6SRGBBlock,
        GraphicsFormat::ASTC8x5UNormBlock,
        GraphicsFormat::ASTC8x5SRGBBlock,
        GraphicsFormat::ASTC8x6UNormBlock,
        GraphicsFormat::ASTC8x6SRGBBlock,
        GraphicsFormat::ASTC8x8UNormBlock,
        GraphicsFormat::ASTC8x8SRGBBlock,
        GraphicsFormat::ASTC10x5UNormBlock,
        GraphicsFormat::ASTC10x5SRGBBlock,
        GraphicsFormat::ASTC10x6UNormBlock,
        GraphicsFormat::ASTC10x6SRGBBlock,
        GraphicsFormat::ASTC10x8UNormBlock,
        GraphicsFormat::ASTC10x8SRGBBlock,
        GraphicsFormat::ASTC10x10UNormBlock,
        GraphicsFormat::ASTC10x10SRGBBlock,
        GraphicsFormat::ASTC12x10UNormBlock,
        GraphicsFormat::ASTC12x10SRGBBlock,
        GraphicsFormat::ASTC12x12UNormBlock,
        GraphicsFormat::ASTC12x12SRGBBlock,
    ];

    /// Coarse classification of the format.
    pub const fn kind(self) -> FormatKind {
        use GraphicsFormat::*;
        match self {
            Undefined => FormatKind::Undefined,
            R4G4UNormPack8 | R4G4B4A4UNormPack16 | B4G4R4A4UNormPack16 | R5G6B5UNormPack16 |
            B5G6R5UNormPack16 | R5G5B5A1UNormPack16 | B5G5R5A1UNormPack16 |
            A1R5G5B5UNormPack16 | R8UNorm | R8SNorm | R8SRGB | R8G8UNorm | R8G8SNorm |
            R8G8SRGB | R8G8B8UNorm | R8G8B8SNorm | R8G8B8SRGB | B8G8R8UNorm | B8G8R8SNorm |
            B8G8R8SRGB | R8G8B8A8UNorm | R8G8B8A8SNorm | R8G8B8A8SRGB | B8G8R8A8UNorm |
            B8G8R8A8SNorm | B8G8R8A8SRGB | A8B8G8R8UNormPack32 | A8B8G8R8SNormPack32 |
            A8B8G8R8SRGBPack32 | A2R10G10B10UNormPack32 | A2R10G10B10SNormPack32 |
            A2B10G10R10UNormPack32 | A2B10G10R10SNormPack32 | R16UNorm | R16SNorm |
            R16G16UNorm | R16G16SNorm | R16G16B16UNorm | R16G16B16SNorm | R16G16B16A16UNorm |
            R16G16B16A16SNorm => FormatKind::Normalized,
            R8UScaled | R8SScaled | R8UInt | R8SInt | R8G8UScaled | R8G8SScaled | R8G8UInt |
            R8G8SInt | R8G8B8UScaled | R8G8B8SScaled | R8G8B8UInt | R8G8B8SInt |
            B8G8R8UScaled | B8G8R8SScaled | B8G8R8UInt | B8G8R8SInt | R8G8B8A8UScaled |
            R8G8B8A8SScaled | R8G8B8A8UInt | R8G8B8A8SInt | B8G8R8A8UScaled | B8G8R8A8SScaled |
            B8G8R8A8UInt | B8G8R8A8SInt | A8B8G8R8UScaledPack32 | A8B8G8R8SScaledPack32 |
            A8B8G8R8UIntPack32 | A8B8G8R8SIntPack32 | A2R10G10B10UScaledPack32 |
            A2R10G10B10SScaledPack32 | A2R10G10B10UIntPack32 | A2R10G10B10SIntPack32 |
            A2B10G10R10UScaledPack32 | A2B10G10R10SScaledPack32 | A2B10G10R10UIntPack32 |
            A2B10G10R10SIntPack32 | R16UScaled | R16SScaled | R16UInt | R16SInt |
            R16G16UScaled | R16G16SScaled | R16G16UInt | R16G16SInt | R16G16B16UScaled |
            R16G16B16SScaled | R16G16B16UInt | R16G16B16SInt | R16G16B16A16UScaled |
            R16G16B16A16SScaled | R16G16B16A16UInt | R16G16B16A16SInt | R32UInt | R32SInt |
            R32G32UInt | R32G32SInt | R32G32B32UInt | R32G32B32SInt | R32G32B32A32UInt |
            R32G32B32A32SInt | R64UInt | R64SInt | R64G64UInt | R64G64SInt | R64G64B64UInt |
            R64G64B64SInt | R64G64B64A64UInt | R64G64B64A64SInt => FormatKind::Integer,
            R16SFloat | R16G16SFloat | R16G16B16SFloat | R16G16B16A16SFloat | R32SFloat |
            R32G32SFloat | R32G32B32SFloat | R32G32B32A32SFloat | R64SFloat | R64G64SFloat |
            R64G64B64SFloat | R64G64B64A64SFloat | B10G11R11UFloatPack32
            | E5B9G9R9UFloatPack32 => FormatKind::Float,
            D16UNorm | X8D24UNormPack32 | D32SFloat => FormatKind::Depth,
            S8UInt => FormatKind::Stencil,
            D16UNormS8UInt | D24UNormS8UInt | D32SFloatS8UInt => FormatKind::DepthStencil,
            BC1RGBUNormBlock | BC1RGBSRGBBlock | BC1RGBAUNormBlock | BC1RGBASRGBBlock |
            BC2UNormBlock | BC2SRGBBlock | BC3UNormBlock | BC3SRGBBlock | BC4UNormBlock |
            BC4SNormBlock | BC5UNormBlock | BC5SNormBlock | BC6HUFloatBlock | BC6HSFloatBlock |
            BC7UNormBlock | BC7SRGBBlock | ETC2R8G8B8UNormBlock | ETC2R8G8B8SRGBBlock |
            ETC2R8G8B8A1UNormBlock | ETC2R8G8B8A1SRGBBlock | ETC2R8G8B8A8UNormBlock |
            ETC2R8G8B8A8SRGBBlock | EACR11UNormBlock | EACR11SNormBlock | EACR11G11UNormBlock |
            EACR11G11SNormBlock | ASTC4x4UNormBlock | ASTC4x4SRGBBlock | ASTC5x4UNormBlock |
            ASTC5x4SRGBBlock | ASTC5x5UNormBlock | ASTC5x5SRGBBlock | ASTC6x5UNormBlock |
            ASTC6x5SRGBBlock | ASTC6x6UNormBlock | ASTC6x6SRGBBlock | ASTC8x5UNormBlock |
            ASTC8x5SRGBBlock | ASTC8x6UNormBlock | ASTC8x6SRGBBlock | ASTC8x8UNormBlock |
            ASTC8x8SRGBBlock | ASTC10x5UNormBlock | ASTC10x5SRGBBlock | ASTC10x6UNormBlock |
            ASTC10x6SRGBBlock | ASTC10x8UNormBlock | ASTC10x8SRGBBlock | ASTC10x10UNormBlock |
            ASTC10x10SRGBBlock | ASTC12x10UNormBlock | ASTC12x10SRGBBlock |
            ASTC12x12UNormBlock | ASTC12x12SRGBBlock => FormatKind::Compressed,
        }
    }

    /// Number of channels a texel or vertex element carries; 0 for block-compressed formats.
    pub const fn channels(self) -> u32 {
        use GraphicsFormat::*;
        match self {
            R8UNorm | R8SNorm | R8UScaled | R8SScaled | R8UInt | R8SInt | R8SRGB | R16UNorm |
            R16SNorm | R16UScaled | R16SScaled | R16UInt | R16SInt | R16SFloat | R32UInt |
            R32SInt | R32SFloat | R64UInt | R64SInt | R64SFloat | D16UNorm | X8D24UNormPack32 |
            D32SFloat | S8UInt => 1,
            R4G4UNormPack8 | R8G8UNorm | R8G8SNorm | R8G8UScaled | R8G8SScaled | R8G8UInt |
            R8G8SInt | R8G8SRGB | R16G16UNorm | R16G16SNorm | R16G16UScaled | R16G16SScaled |
            R16G16UInt | R16G16SInt | R16G16SFloat | R32G32UInt | R32G32SInt | R32G32SFloat |
            R64G64UInt | R64G64SInt | R64G64SFloat | D16UNormS8UInt | D24UNormS8UInt |
            D32SFloatS8UInt => 2,
            R5G6B5UNormPack16 | B5G6R5UNormPack16 | R8G8B8UNorm | R8G8B8SNorm | R8G8B8UScaled |
            R8G8B8SScaled | R8G8B8UInt | R8G8B8SInt | R8G8B8SRGB | B8G8R8UNorm | B8G8R8SNorm |
            B8G8R8UScaled | B8G8R8SScaled | B8G8R8UInt | B8G8R8SInt | B8G8R8SRGB |
            R16G16B16UNorm | R16G16B16SNorm | R16G16B16UScaled | R16G16B16SScaled |
            R16G16B16UInt | R16G16B16SInt | R16G16B16SFloat | R32G32B32UInt | R32G32B32SInt |
            R32G32B32SFloat | R64G64B64UInt | R64G64B64SInt | R64G64B64SFloat |
            B10G11R11UFloatPack32 | E5B9G9R9UFloatPack32 => 3,
            R4G4B4A4UNormPack16 | B4G4R4A4UNormPack16 | R5G5B5A1UNormPack16 |
            B5G5R5A1UNormPack16 | A1R5G5B5UNormPack16 | R8G8B8A8UNorm | R8G8B8A8SNorm |
            R8G8B8A8UScaled | R8G8B8A8SScaled | R8G8B8A8UInt | R8G8B8A8SInt | R8G8B8A8SRGB |
            B8G8R8A8UNorm | B8G8R8A8SNorm | B8G8R8A8UScaled | B8G8R8A8SScaled | B8G8R8A8UInt |
            B8G8R8A8SInt | B8G8R8A8SRGB | A8B8G8R8UNormPack32 | A8B8G8R8SNormPack32 |
            A8B8G8R8UScaledPack32 | A8B8G8R8SScaledPack32 | A8B8G8R8UIntPack32 |
            A8B8G8R8SIntPack32 | A8B8G8R8SRGBPack32 | A2R10G10B10UNormPack32 |
            A2R10G10B10SNormPack32 | A2R10G10B10UScaledPack32 | A2R10G10B10SScaledPack32 |
            A2R10G10B10UIntPack32 | A2R10G10B10SIntPack32 | A2B10G10R10UNormPack32 |
            A2B10G10R10SNormPack32 | A2B10G10R10UScaledPack32 | A2B10G10R10SScaledPack32 |
            A2B10G10R10UIntPack32 | A2B10G10R10SIntPack32 | R16G16B16A16UNorm |
            R16G16B16A16SNorm | R16G16B16A16UScaled | R16G16B16A16SScaled | R16G16B16A16UInt |
            R16G16B16A16SInt | R16G16B16A16SFloat | R32G32B32A32UInt | R32G32B32A32SInt |
            R32G32B32A32SFloat | R64G64B64A64UInt | R64G64B64A64SInt | R64G64B64A64SFloat => 4,
            _ => 0,
        }
    }

    /// Bytes per texel or vertex element; 0 for block-compressed formats.
    pub const fn byte_size(self) -> u32 {
        use GraphicsFormat::*;
        match self {
            R4G4UNormPack8 | R8UNorm | R8SNorm | R8UScaled | R8SScaled | R8UInt | R8SInt |
            R8SRGB | S8UInt => 1,
            R4G4B4A4UNormPack16 | B4G4R4A4UNormPack16 | R5G6B5UNormPack16 | B5G6R5UNormPack16 |
            R5G5B5A1UNormPack16 | B5G5R5A1UNormPack16 | A1R5G5B5UNormPack16 | R8G8UNorm |
            R8G8SNorm | R8G8UScaled | R8G8SScaled | R8G8UInt | R8G8SInt | R8G8SRGB | R16UNorm |
            R16SNorm | R16UScaled | R16SScaled | R16UInt | R16SInt | R16SFloat | D16UNorm => 2,
            R8G8B8UNorm | R8G8B8SNorm | R8G8B8UScaled | R8G8B8SScaled | R8G8B8UInt |
            R8G8B8SInt | R8G8B8SRGB | B8G8R8UNorm | B8G8R8SNorm | B8G8R8UScaled |
            B8G8R8SScaled | B8G8R8UInt | B8G8R8SInt | B8G8R8SRGB | D16UNormS8UInt => 3,
            R8G8B8A8UNorm | R8G8B8A8SNorm | R8G8B8A8UScaled | R8G8B8A8SScaled | R8G8B8A8UInt |
            R8G8B8A8SInt | R8G8B8A8SRGB | B8G8R8A8UNorm | B8G8R8A8SNorm | B8G8R8A8UScaled |
            B8G8R8A8SScaled | B8G8R8A8UInt | B8G8R8A8SInt | B8G8R8A8SRGB |
            A8B8G8R8UNormPack32 | A8B8G8R8SNormPack32 | A8B8G8R8UScaledPack32 |
            A8B8G8R8SScaledPack32 | A8B8G8R8UIntPack32 | A8B8G8R8SIntPack32 |
            A8B8G8R8SRGBPack32 | A2R10G10B10UNormPack32 | A2R10G10B10SNormPack32 |
            A2R10G10B10UScaledPack32 | A2R10G10B10SScaledPack32 | A2R10G10B10UIntPack32 |
            A2R10G10B10SIntPack32 | A2B10G10R10UNormPack32 | A2B10G10R10SNormPack32 |
            A2B10G10R10UScaledPack32 | A2B10G10R10SScaledPack32 | A2B10G10R10UIntPack32 |
            A2B10G10R10SIntPack32 | R16G16UNorm | R16G16SNorm | R16G16UScaled | R16G16SScaled |
            R16G16UInt | R16G16SInt | R16G16SFloat | R32UInt | R32SInt | R32SFloat |
            B10G11R11UFloatPack32 | E5B9G9R9UFloatPack32 | X8D24UNormPack32 | D32SFloat |
            D24UNormS8UInt => 4,
            D32SFloatS8UInt => 5,
            R16G16B16UNorm | R16G16B16SNorm | R16G16B16UScaled | R16G16B16SScaled |
            R16G16B16UInt | R16G16B16SInt | R16G16B16SFloat => 6,
            R16G16B16A16UNorm | R16G16B16A16SNorm | R16G16B16A16UScaled | R16G16B16A16SScaled |
            R16G16B16A16UInt | R16G16B16A16SInt | R16G16B16A16SFloat | R32G32UInt |
            R32G32SInt | R32G32SFloat | R64UInt | R64SInt | R64SFloat => 8,
            R32G32B32UInt | R32G32B32SInt | R32G32B32SFloat => 12,
            R32G32B32A32UInt | R32G32B32A32SInt | R32G32B32A32SFloat | R64G64UInt |
            R64G64SInt | R64G64SFloat => 16,
            R64G64B64UInt | R64G64B64SInt | R64G64B64SFloat => 24,
            R64G64B64A64UInt | R64G64B64A64SInt | R64G64B64A64SFloat => 32,
            _ => 0,
        }
    }

    /// `true` for UNorm and SNorm color formats.
    pub fn is_normalized(self) -> bool {
        self.kind() == FormatKind::Normalized && !self.is_srgb()
    }

    /// `true` for integer and scaled formats.
    pub fn is_integer(self) -> bool {
        self.kind() == FormatKind::Integer
    }

    /// `true` for float formats.
    pub fn is_float(self) -> bool {
        self.kind() == FormatKind::Float
    }

    /// `true` for sRGB-encoded formats, compressed ones included.
    pub fn is_srgb(self) -> bool {
        matches!(
            self,
            GraphicsFormat::R8SRGB | GraphicsFormat::R8G8SRGB | GraphicsFormat::R8G8B8SRGB |
            GraphicsFormat::B8G8R8SRGB | GraphicsFormat::R8G8B8A8SRGB |
            GraphicsFormat::B8G8R8A8SRGB | GraphicsFormat::A8B8G8R8SRGBPack32 |
            GraphicsFormat::BC1RGBSRGBBlock | GraphicsFormat::BC1RGBASRGBBlock |
            GraphicsFormat::BC2SRGBBlock | GraphicsFormat::BC3SRGBBlock |
            GraphicsFormat::BC7SRGBBlock | GraphicsFormat::ETC2R8G8B8SRGBBlock |
            GraphicsFormat::ETC2R8G8B8A1SRGBBlock | GraphicsFormat::ETC2R8G8B8A8SRGBBlock |
            GraphicsFormat::ASTC4x4SRGBBlock | GraphicsFormat::ASTC5x4SRGBBlock |
            GraphicsFormat::ASTC5x5SRGBBlock | GraphicsFormat::ASTC6x5SRGBBlock |
            GraphicsFormat::ASTC6x6SRGBBlock | GraphicsFormat::ASTC8x5SRGBBlock |
            GraphicsFormat::ASTC8x6SRGBBlock | GraphicsFormat::ASTC8x8SRGBBlock |
            GraphicsFormat::ASTC10x5SRGBBlock | GraphicsFormat::ASTC10x6SRGBBlock |
            GraphicsFormat::ASTC10x8SRGBBlock | GraphicsFormat::ASTC10x10SRGBBlock |
            GraphicsFormat::ASTC12x10SRGBBlock | GraphicsFormat::ASTC12x12SRGBBlock
        )
    }

    /// `true` for [`GraphicsFormat::S8UInt`].
    pub fn is_stencil(self) -> bool {
        self.kind() == FormatKind::Stencil
    }

    /// `true` for depth-only formats.
    pub fn is_depth(self) -> bool {
        self.kind() == FormatKind::Depth
    }

    /// `true` for combined depth-stencil formats.
    pub fn is_depth_stencil(self) -> bool {
        self.kind() == FormatKind::DepthStencil
    }

    /// `true` for any format that can back a depth or stencil attachment.
    pub fn has_depth_or_stencil(self) -> bool {
        matches!(
            self.kind(),
            FormatKind::Depth | FormatKind::Stencil | FormatKind::DepthStencil
        )
    }

    /// `true` for block-compressed formats.
    pub fn is_compressed(self) -> bool {
        self.kind() == FormatKind::Compressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_common_formats() {
        assert_eq!(GraphicsFormat::R8G8B8A8UNorm.kind(), FormatKind::Normalized);
        assert_eq!(GraphicsFormat::R8G8B8A8SRGB.kind(), FormatKind::Normalized);
        assert_eq!(GraphicsFormat::R32G32B32A32SFloat.kind(), FormatKind::Float);
        assert_eq!(GraphicsFormat::R16UScaled.kind(), FormatKind::Integer);
        assert_eq!(GraphicsFormat::X8D24UNormPack32.kind(), FormatKind::Depth);
        assert_eq!(GraphicsFormat::D24UNormS8UInt.kind(), FormatKind::DepthStencil);
        assert_eq!(GraphicsFormat::BC7SRGBBlock.kind(), FormatKind::Compressed);
        assert_eq!(GraphicsFormat::default().kind(), FormatKind::Undefined);
    }

    #[test]
    fn test_depth_stencil_predicates_are_disjoint() {
        for format in GraphicsFormat::ALL {
            let hits = [
                format.is_depth(),
                format.is_stencil(),
                format.is_depth_stencil(),
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert!(hits <= 1, "{format:?} matched {hits} depth/stencil predicates");
            assert_eq!(hits == 1, format.has_depth_or_stencil());
        }
    }

    #[test]
    fn test_srgb_is_not_normalized() {
        assert!(GraphicsFormat::R8G8B8A8SRGB.is_srgb());
        assert!(!GraphicsFormat::R8G8B8A8SRGB.is_normalized());
        assert!(GraphicsFormat::R8G8B8A8UNorm.is_normalized());
        assert!(GraphicsFormat::ASTC4x4SRGBBlock.is_srgb());
    }

    #[test]
    fn test_channels_and_byte_size() {
        assert_eq!(GraphicsFormat::R32G32B32SFloat.channels(), 3);
        assert_eq!(GraphicsFormat::R32G32B32SFloat.byte_size(), 12);
        assert_eq!(GraphicsFormat::R8G8B8A8UNorm.byte_size(), 4);
        assert_eq!(GraphicsFormat::A2B10G10R10UNormPack32.byte_size(), 4);
        assert_eq!(GraphicsFormat::A2B10G10R10UNormPack32.channels(), 4);
        assert_eq!(GraphicsFormat::R16G16SFloat.byte_size(), 4);
        assert_eq!(GraphicsFormat::R64G64B64A64SFloat.byte_size(), 32);
        assert_eq!(GraphicsFormat::BC1RGBUNormBlock.byte_size(), 0);
    }

    #[test]
    fn test_all_lists_every_format_once() {
        let mut seen = std::collections::HashSet::new();
        for format in GraphicsFormat::ALL {
            assert!(seen.insert(format), "{format:?} listed twice");
        }
        assert_eq!(seen.len(), GraphicsFormat::ALL.len());
    }
}
