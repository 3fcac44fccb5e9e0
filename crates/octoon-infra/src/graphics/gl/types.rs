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

//! Translation between the backend-neutral vocabulary and GL enums.
//!
//! Conversions that cannot fail go through [`IntoGl`]. Everything else is a
//! free function returning `None` for an input with no native equivalent;
//! callers turn that into a [`TranslateError`] with [`require`] and abort the
//! operation at hand.

use std::fmt;

use octoon_core::graphics::api::{
    BlendFactor, BlendOp, ClearFlags, CompareFunc, CullMode, DataType, FrontFace, GraphicsFormat,
    IndexType, PolygonMode, SamplerAnis, SamplerFilter, SamplerWrap, ShaderStage,
    StencilFaceFlags, StencilOp, TextureDim, UniformType, VertexType,
};
use octoon_core::graphics::error::TranslateError;

use super::ext;

/// A local extension trait to convert octoon types into GL enums.
/// Only implemented where every input has a native counterpart.
pub trait IntoGl<T> {
    /// Consumes self and returns the GL value.
    fn into_gl(self) -> T;
}

/// Turns an unmapped translation into a [`TranslateError`] naming `kind`.
pub fn require<T>(
    value: Option<T>,
    kind: &'static str,
    source: impl fmt::Debug,
) -> Result<T, TranslateError> {
    value.ok_or_else(|| TranslateError::new(kind, source))
}

// --- Infallible conversions ---

impl IntoGl<u32> for IndexType {
    fn into_gl(self) -> u32 {
        match self {
            IndexType::UInt16 => glow::UNSIGNED_SHORT,
            IndexType::UInt32 => glow::UNSIGNED_INT,
        }
    }
}

impl IntoGl<u32> for ShaderStage {
    fn into_gl(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Compute => glow::COMPUTE_SHADER,
            ShaderStage::TessEvaluation => glow::TESS_EVALUATION_SHADER,
            ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
        }
    }
}

impl IntoGl<u32> for BlendOp {
    fn into_gl(self) -> u32 {
        match self {
            BlendOp::Add => glow::FUNC_ADD,
            BlendOp::Subtract => glow::FUNC_SUBTRACT,
            BlendOp::RevSubtract => glow::FUNC_REVERSE_SUBTRACT,
        }
    }
}

/// `CullMode::None` yields `NONE`; callers disable `CULL_FACE` instead of
/// passing it on.
impl IntoGl<u32> for CullMode {
    fn into_gl(self) -> u32 {
        match self {
            CullMode::None => glow::NONE,
            CullMode::Front => glow::FRONT,
            CullMode::Back => glow::BACK,
            CullMode::FrontBack => glow::FRONT_AND_BACK,
        }
    }
}

impl IntoGl<u32> for FrontFace {
    fn into_gl(self) -> u32 {
        match self {
            FrontFace::CW => glow::CW,
            FrontFace::CCW => glow::CCW,
        }
    }
}

impl IntoGl<u32> for PolygonMode {
    fn into_gl(self) -> u32 {
        match self {
            PolygonMode::Point => glow::POINT,
            PolygonMode::Wireframe => glow::LINE,
            PolygonMode::Solid => glow::FILL,
        }
    }
}

impl IntoGl<u32> for StencilOp {
    fn into_gl(self) -> u32 {
        match self {
            StencilOp::Keep => glow::KEEP,
            StencilOp::Replace => glow::REPLACE,
            StencilOp::Incr => glow::INCR,
            StencilOp::Decr => glow::DECR,
            StencilOp::Zero => glow::ZERO,
            StencilOp::IncrWrap => glow::INCR_WRAP,
            StencilOp::DecrWrap => glow::DECR_WRAP,
        }
    }
}

impl IntoGl<u32> for StencilFaceFlags {
    fn into_gl(self) -> u32 {
        if self == StencilFaceFlags::FRONT {
            glow::FRONT
        } else if self == StencilFaceFlags::BACK {
            glow::BACK
        } else {
            glow::FRONT_AND_BACK
        }
    }
}

impl IntoGl<u32> for ClearFlags {
    fn into_gl(self) -> u32 {
        let mut mask = 0;
        if self.contains(ClearFlags::COLOR) {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if self.contains(ClearFlags::DEPTH) {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        if self.contains(ClearFlags::STENCIL) {
            mask |= glow::STENCIL_BUFFER_BIT;
        }
        mask
    }
}

// --- Fallible conversions ---

/// Native target for a texture dimension, optionally multisampled.
pub fn as_texture_target(dim: TextureDim, multisample: bool) -> Option<u32> {
    match (dim, multisample) {
        (TextureDim::Texture2D, false) => Some(glow::TEXTURE_2D),
        (TextureDim::Texture2D, true) => Some(glow::TEXTURE_2D_MULTISAMPLE),
        (TextureDim::Texture3D, false) => Some(glow::TEXTURE_3D),
        (TextureDim::Texture2DArray, false) => Some(glow::TEXTURE_2D_ARRAY),
        (TextureDim::Texture2DArray, true) => Some(glow::TEXTURE_2D_MULTISAMPLE_ARRAY),
        (TextureDim::Cube, false) => Some(glow::TEXTURE_CUBE_MAP),
        (TextureDim::CubeArray, false) => Some(glow::TEXTURE_CUBE_MAP_ARRAY),
        _ => None,
    }
}

/// Native buffer target a buffer of this data type is bound to.
pub fn as_buffer_target(data_type: DataType) -> Option<u32> {
    match data_type {
        DataType::None => None,
        DataType::TransferSrc => Some(glow::COPY_READ_BUFFER),
        DataType::TransferDst => Some(glow::COPY_WRITE_BUFFER),
        DataType::UniformTexelBuffer | DataType::StorageTexelBuffer => Some(glow::TEXTURE_BUFFER),
        DataType::UniformBuffer => Some(glow::UNIFORM_BUFFER),
        DataType::StorageBuffer => Some(glow::SHADER_STORAGE_BUFFER),
        DataType::StorageVertexBuffer => Some(glow::ARRAY_BUFFER),
        DataType::StorageIndexBuffer => Some(glow::ELEMENT_ARRAY_BUFFER),
        DataType::IndirectBuffer => Some(glow::DRAW_INDIRECT_BUFFER),
    }
}

/// Primitive topology of a draw.
pub fn as_vertex_type(primitive: VertexType) -> Option<u32> {
    match primitive {
        VertexType::PointList => Some(glow::POINTS),
        VertexType::LineList => Some(glow::LINES),
        VertexType::LineStrip => Some(glow::LINE_STRIP),
        VertexType::TriangleList => Some(glow::TRIANGLES),
        VertexType::TriangleStrip => Some(glow::TRIANGLE_STRIP),
        VertexType::TriangleFan => Some(glow::TRIANGLE_FAN),
        VertexType::LineListWithAdjacency
        | VertexType::LineStripWithAdjacency
        | VertexType::TriangleListWithAdjacency
        | VertexType::TriangleStripWithAdjacency
        | VertexType::PatchList => None,
    }
}

/// Depth and stencil comparison.
pub fn as_compare_function(func: CompareFunc) -> Option<u32> {
    match func {
        CompareFunc::None => None,
        CompareFunc::Lequal => Some(glow::LEQUAL),
        CompareFunc::Equal => Some(glow::EQUAL),
        CompareFunc::Greater => Some(glow::GREATER),
        CompareFunc::Less => Some(glow::LESS),
        CompareFunc::Gequal => Some(glow::GEQUAL),
        CompareFunc::NotEqual => Some(glow::NOTEQUAL),
        CompareFunc::Always => Some(glow::ALWAYS),
        CompareFunc::Never => Some(glow::NEVER),
    }
}

/// Source and destination blend factor.
pub fn as_blend_factor(factor: BlendFactor) -> Option<u32> {
    let value = match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::DstCol => glow::DST_COLOR,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusSrcCol => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::OneMinusDstCol => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
        BlendFactor::SrcAlphaSaturate => glow::SRC_ALPHA_SATURATE,
    };
    Some(value)
}

/// Wrap mode applied to S, T and R.
pub fn as_sampler_wrap(wrap: SamplerWrap) -> Option<u32> {
    match wrap {
        SamplerWrap::None => None,
        SamplerWrap::Repeat => Some(glow::REPEAT),
        SamplerWrap::Mirror => Some(glow::MIRRORED_REPEAT),
        SamplerWrap::ClampToEdge => Some(glow::CLAMP_TO_EDGE),
    }
}

/// Minification filter, including the mip selection mode.
pub fn as_sampler_min_filter(filter: SamplerFilter) -> Option<u32> {
    let value = match filter {
        SamplerFilter::Nearest => glow::NEAREST,
        SamplerFilter::Linear => glow::LINEAR,
        SamplerFilter::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
        SamplerFilter::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
        SamplerFilter::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
        SamplerFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    };
    Some(value)
}

/// Magnification has no mip selection, so mipmap variants collapse to their
/// texel filter.
pub fn as_sampler_mag_filter(filter: SamplerFilter) -> Option<u32> {
    let value = match filter {
        SamplerFilter::Nearest
        | SamplerFilter::NearestMipmapLinear
        | SamplerFilter::NearestMipmapNearest => glow::NEAREST,
        SamplerFilter::Linear
        | SamplerFilter::LinearMipmapNearest
        | SamplerFilter::LinearMipmapLinear => glow::LINEAR,
    };
    Some(value)
}

/// Maximum anisotropy level.
pub fn as_sampler_anis(anis: SamplerAnis) -> Option<f32> {
    match anis {
        SamplerAnis::Anis0 => None,
        SamplerAnis::Anis1 => Some(1.0),
        SamplerAnis::Anis2 => Some(2.0),
        SamplerAnis::Anis4 => Some(4.0),
        SamplerAnis::Anis8 => Some(8.0),
        SamplerAnis::Anis16 => Some(16.0),
        SamplerAnis::Anis32 => Some(32.0),
        SamplerAnis::Anis64 => Some(64.0),
    }
}

// --- Pixel and vertex formats ---

/// Client pixel format used for uploads and readback.
pub fn as_texture_format(format: GraphicsFormat) -> Option<u32> {
    use GraphicsFormat::*;
    let value = match format {
        R4G4UNormPack8 | R8G8UNorm | R8G8SNorm | R8G8SRGB | R16G16UNorm | R16G16SNorm |
        R16G16SFloat | R32G32SFloat | R64G64SFloat => glow::RG,
        R4G4B4A4UNormPack16 | R5G5B5A1UNormPack16 | A1R5G5B5UNormPack16 | R8G8B8A8UNorm |
        R8G8B8A8SNorm | R8G8B8A8SRGB | A8B8G8R8UNormPack32 | A8B8G8R8SNormPack32 |
        A8B8G8R8SRGBPack32 | A2R10G10B10UNormPack32 | A2R10G10B10SNormPack32 |
        R16G16B16A16UNorm | R16G16B16A16SNorm | R16G16B16A16SFloat | R32G32B32A32SFloat |
        R64G64B64A64SFloat => glow::RGBA,
        B4G4R4A4UNormPack16 | B5G5R5A1UNormPack16 | B8G8R8A8UNorm | B8G8R8A8SNorm |
        B8G8R8A8SRGB | A2B10G10R10UNormPack32 | A2B10G10R10SNormPack32 => glow::BGRA,
        R5G6B5UNormPack16 | R8G8B8UNorm | R8G8B8SNorm | R8G8B8SRGB | R16G16B16UNorm |
        R16G16B16SNorm | R16G16B16SFloat | R32G32B32SFloat | R64G64B64SFloat |
        B10G11R11UFloatPack32 | E5B9G9R9UFloatPack32 => glow::RGB,
        B5G6R5UNormPack16 | B8G8R8UNorm | B8G8R8SNorm | B8G8R8SRGB => glow::BGR,
        R8UNorm | R8SNorm | R8SRGB | R16UNorm | R16SNorm | R16SFloat | R32SFloat |
        R64SFloat => glow::RED,
        R8UScaled | R8SScaled | R8UInt | R8SInt | R16UScaled | R16SScaled | R16UInt | R16SInt |
        R32UInt | R32SInt | R64UInt | R64SInt => glow::RED_INTEGER,
        R8G8UScaled | R8G8SScaled | R8G8UInt | R8G8SInt | R16G16UScaled | R16G16SScaled |
        R16G16UInt | R16G16SInt | R32G32UInt | R32G32SInt | R64G64UInt |
        R64G64SInt => glow::RG_INTEGER,
        R8G8B8UScaled | R8G8B8SScaled | R8G8B8UInt | R8G8B8SInt | R16G16B16UScaled |
        R16G16B16SScaled | R16G16B16UInt | R16G16B16SInt | R32G32B32UInt | R32G32B32SInt |
        R64G64B64UInt | R64G64B64SInt => glow::RGB_INTEGER,
        B8G8R8UScaled | B8G8R8SScaled | B8G8R8UInt | B8G8R8SInt => glow::BGR_INTEGER,
        R8G8B8A8UScaled | R8G8B8A8SScaled | R8G8B8A8UInt | R8G8B8A8SInt |
        A8B8G8R8UScaledPack32 | A8B8G8R8SScaledPack32 | A8B8G8R8UIntPack32 |
        A8B8G8R8SIntPack32 | A2R10G10B10UScaledPack32 | A2R10G10B10SScaledPack32 |
        A2R10G10B10UIntPack32 | A2R10G10B10SIntPack32 | R16G16B16A16UScaled |
        R16G16B16A16SScaled | R16G16B16A16UInt | R16G16B16A16SInt | R32G32B32A32UInt |
        R32G32B32A32SInt | R64G64B64A64UInt | R64G64B64A64SInt => glow::RGBA_INTEGER,
        B8G8R8A8UScaled | B8G8R8A8SScaled | B8G8R8A8UInt | B8G8R8A8SInt |
        A2B10G10R10UScaledPack32 | A2B10G10R10SScaledPack32 | A2B10G10R10UIntPack32 |
        A2B10G10R10SIntPack32 => glow::BGRA_INTEGER,
        D16UNorm | X8D24UNormPack32 | D32SFloat => glow::DEPTH_COMPONENT,
        S8UInt => glow::STENCIL_INDEX,
        D16UNormS8UInt | D24UNormS8UInt | D32SFloatS8UInt => glow::DEPTH_STENCIL,
        _ => return None,
    };
    Some(value)
}

/// Client component type used for uploads and readback.
pub fn as_texture_type(format: GraphicsFormat) -> Option<u32> {
    use GraphicsFormat::*;
    let value = match format {
        R4G4UNormPack8 | R8UNorm | R8UScaled | R8UInt | R8SRGB | R8G8UNorm | R8G8UScaled |
        R8G8UInt | R8G8SRGB | R8G8B8UNorm | R8G8B8UScaled | R8G8B8UInt | R8G8B8SRGB |
        B8G8R8UNorm | B8G8R8UScaled | B8G8R8UInt | B8G8R8SRGB | R8G8B8A8UNorm |
        R8G8B8A8UScaled | R8G8B8A8UInt | R8G8B8A8SRGB | B8G8R8A8UNorm | B8G8R8A8UScaled |
        B8G8R8A8UInt | B8G8R8A8SRGB | A8B8G8R8UNormPack32 | A8B8G8R8UScaledPack32 |
        A8B8G8R8UIntPack32 | A8B8G8R8SRGBPack32 | S8UInt => glow::UNSIGNED_BYTE,
        R4G4B4A4UNormPack16 | B4G4R4A4UNormPack16 => glow::UNSIGNED_SHORT_4_4_4_4,
        R5G6B5UNormPack16 | B5G6R5UNormPack16 => glow::UNSIGNED_SHORT_5_6_5,
        R5G5B5A1UNormPack16 | B5G5R5A1UNormPack16 => glow::UNSIGNED_SHORT_5_5_5_1,
        A1R5G5B5UNormPack16 => glow::UNSIGNED_SHORT_1_5_5_5_REV,
        R8SNorm | R8SScaled | R8SInt | R8G8SNorm | R8G8SScaled | R8G8SInt | R8G8B8SNorm |
        R8G8B8SScaled | R8G8B8SInt | B8G8R8SNorm | B8G8R8SScaled | B8G8R8SInt | R8G8B8A8SNorm |
        R8G8B8A8SScaled | R8G8B8A8SInt | B8G8R8A8SNorm | B8G8R8A8SScaled | B8G8R8A8SInt |
        A8B8G8R8SNormPack32 | A8B8G8R8SScaledPack32 | A8B8G8R8SIntPack32 => glow::BYTE,
        A2R10G10B10UNormPack32 | A2R10G10B10UScaledPack32 | A2R10G10B10UIntPack32 |
        A2B10G10R10UNormPack32 | A2B10G10R10UScaledPack32 |
        A2B10G10R10UIntPack32 => glow::UNSIGNED_INT_2_10_10_10_REV,
        A2R10G10B10SNormPack32 | A2R10G10B10SScaledPack32 | A2R10G10B10SIntPack32 |
        A2B10G10R10SNormPack32 | A2B10G10R10SScaledPack32 |
        A2B10G10R10SIntPack32 => glow::INT_2_10_10_10_REV,
        R16UNorm | R16UScaled | R16UInt | R16G16UNorm | R16G16UScaled | R16G16UInt |
        R16G16B16UNorm | R16G16B16UScaled | R16G16B16UInt | R16G16B16A16UNorm |
        R16G16B16A16UScaled | R16G16B16A16UInt | D16UNorm => glow::UNSIGNED_SHORT,
        R16SNorm | R16SScaled | R16SInt | R16G16SNorm | R16G16SScaled | R16G16SInt |
        R16G16B16SNorm | R16G16B16SScaled | R16G16B16SInt | R16G16B16A16SNorm |
        R16G16B16A16SScaled | R16G16B16A16SInt => glow::SHORT,
        R16SFloat | R16G16SFloat | R16G16B16SFloat | R16G16B16A16SFloat => glow::HALF_FLOAT,
        R32UInt | R32G32UInt | R32G32B32UInt | R32G32B32A32UInt | X8D24UNormPack32 |
        D16UNormS8UInt => glow::UNSIGNED_INT,
        R32SInt | R32G32SInt | R32G32B32SInt | R32G32B32A32SInt => glow::INT,
        R32SFloat | R32G32SFloat | R32G32B32SFloat | R32G32B32A32SFloat | D32SFloat => glow::FLOAT,
        R64UInt | R64G64UInt | R64G64B64UInt | R64G64B64A64UInt => ext::UNSIGNED_INT64_ARB,
        R64SInt | R64G64SInt | R64G64B64SInt | R64G64B64A64SInt => ext::INT64_ARB,
        R64SFloat | R64G64SFloat | R64G64B64SFloat | R64G64B64A64SFloat => glow::DOUBLE,
        B10G11R11UFloatPack32 => glow::UNSIGNED_INT_10F_11F_11F_REV,
        E5B9G9R9UFloatPack32 => glow::UNSIGNED_INT_5_9_9_9_REV,
        D24UNormS8UInt => glow::UNSIGNED_INT_24_8,
        D32SFloatS8UInt => glow::FLOAT_32_UNSIGNED_INT_24_8_REV,
        _ => return None,
    };
    Some(value)
}

/// Sized internal (storage) format.
pub fn as_texture_internal_format(format: GraphicsFormat) -> Option<u32> {
    use GraphicsFormat::*;
    let value = match format {
        R4G4B4A4UNormPack16 | B4G4R4A4UNormPack16 => glow::RGBA4,
        R5G6B5UNormPack16 | B5G6R5UNormPack16 => glow::RGB565,
        R5G5B5A1UNormPack16 | B5G5R5A1UNormPack16 | A1R5G5B5UNormPack16 => glow::RGB5_A1,
        R8UNorm | R8SRGB => glow::R8,
        R8SNorm => glow::R8_SNORM,
        R8UScaled | R8UInt => glow::R8UI,
        R8SScaled | R8SInt => glow::R8I,
        R8G8UNorm | R8G8SRGB => glow::RG8,
        R8G8SNorm => glow::RG8_SNORM,
        R8G8UScaled | R8G8UInt => glow::RG8UI,
        R8G8SScaled | R8G8SInt => glow::RG8I,
        R8G8B8UNorm | B8G8R8UNorm => glow::RGB8,
        R8G8B8SNorm | B8G8R8SNorm => glow::RGB8_SNORM,
        R8G8B8UScaled | R8G8B8UInt | B8G8R8UScaled | B8G8R8UInt => glow::RGB8UI,
        R8G8B8SScaled | R8G8B8SInt | B8G8R8SScaled | B8G8R8SInt => glow::RGB8I,
        R8G8B8SRGB | B8G8R8SRGB => glow::SRGB8,
        R8G8B8A8UNorm | B8G8R8A8UNorm | A8B8G8R8UNormPack32 => glow::RGBA8,
        R8G8B8A8SNorm | B8G8R8A8SNorm | A8B8G8R8SNormPack32 => glow::RGBA8_SNORM,
        R8G8B8A8UScaled | R8G8B8A8UInt | B8G8R8A8UScaled | B8G8R8A8UInt |
        A8B8G8R8UScaledPack32 | A8B8G8R8UIntPack32 => glow::RGBA8UI,
        R8G8B8A8SScaled | R8G8B8A8SInt | B8G8R8A8SScaled | B8G8R8A8SInt |
        A8B8G8R8SScaledPack32 | A8B8G8R8SIntPack32 => glow::RGBA8I,
        R8G8B8A8SRGB | B8G8R8A8SRGB | A8B8G8R8SRGBPack32 => glow::SRGB8_ALPHA8,
        A2R10G10B10UNormPack32 | A2B10G10R10UNormPack32 => glow::RGB10_A2,
        A2R10G10B10UScaledPack32 | A2R10G10B10UIntPack32 | A2B10G10R10UScaledPack32 |
        A2B10G10R10UIntPack32 => glow::RGB10_A2UI,
        R16UNorm => glow::R16,
        R16SNorm => glow::R16_SNORM,
        R16UScaled | R16UInt => glow::R16UI,
        R16SScaled | R16SInt => glow::R16I,
        R16SFloat => glow::R16F,
        R16G16UNorm => glow::RG16,
        R16G16SNorm => glow::RG16_SNORM,
        R16G16UScaled | R16G16UInt => glow::RG16UI,
        R16G16SScaled | R16G16SInt => glow::RG16I,
        R16G16SFloat => glow::RG16F,
        R16G16B16UNorm => glow::RGB16,
        R16G16B16SNorm => glow::RGB16_SNORM,
        R16G16B16UScaled | R16G16B16UInt => glow::RGB16UI,
        R16G16B16SScaled | R16G16B16SInt => glow::RGB16I,
        R16G16B16SFloat => glow::RGB16F,
        R16G16B16A16UNorm => glow::RGBA16,
        R16G16B16A16SNorm => glow::RGBA16_SNORM,
        R16G16B16A16UScaled | R16G16B16A16UInt => glow::RGBA16UI,
        R16G16B16A16SScaled | R16G16B16A16SInt => glow::RGBA16I,
        R16G16B16A16SFloat => glow::RGBA16F,
        R32UInt => glow::R32UI,
        R32SInt => glow::R32I,
        R32SFloat => glow::R32F,
        R32G32UInt => glow::RG32UI,
        R32G32SInt => glow::RG32I,
        R32G32SFloat => glow::RG32F,
        R32G32B32UInt => glow::RGB32UI,
        R32G32B32SInt => glow::RGB32I,
        R32G32B32SFloat => glow::RGB32F,
        R32G32B32A32UInt => glow::RGBA32UI,
        R32G32B32A32SInt => glow::RGBA32I,
        R32G32B32A32SFloat => glow::RGBA32F,
        B10G11R11UFloatPack32 => glow::R11F_G11F_B10F,
        E5B9G9R9UFloatPack32 => glow::RGB9_E5,
        D16UNorm => glow::DEPTH_COMPONENT16,
        X8D24UNormPack32 => glow::DEPTH_COMPONENT24,
        D32SFloat => glow::DEPTH_COMPONENT32F,
        S8UInt => glow::STENCIL_INDEX8,
        D24UNormS8UInt => glow::DEPTH24_STENCIL8,
        D32SFloatS8UInt => glow::DEPTH32F_STENCIL8,
        BC1RGBUNormBlock => ext::COMPRESSED_RGB_S3TC_DXT1_EXT,
        BC1RGBSRGBBlock => ext::COMPRESSED_SRGB_S3TC_DXT1_EXT,
        BC1RGBAUNormBlock => ext::COMPRESSED_RGBA_S3TC_DXT1_EXT,
        BC1RGBASRGBBlock => ext::COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT,
        BC2UNormBlock => ext::COMPRESSED_RGBA_S3TC_DXT3_EXT,
        BC2SRGBBlock => ext::COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT,
        BC3UNormBlock => ext::COMPRESSED_RGBA_S3TC_DXT5_EXT,
        BC3SRGBBlock => ext::COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT,
        BC4UNormBlock => glow::COMPRESSED_RED_RGTC1,
        BC4SNormBlock => glow::COMPRESSED_SIGNED_RED_RGTC1,
        BC5UNormBlock => glow::COMPRESSED_RG_RGTC2,
        BC5SNormBlock => glow::COMPRESSED_SIGNED_RG_RGTC2,
        BC6HUFloatBlock => glow::COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT,
        BC6HSFloatBlock => glow::COMPRESSED_RGB_BPTC_SIGNED_FLOAT,
        BC7UNormBlock => glow::COMPRESSED_RGBA_BPTC_UNORM,
        BC7SRGBBlock => glow::COMPRESSED_SRGB_ALPHA_BPTC_UNORM,
        ETC2R8G8B8UNormBlock => glow::COMPRESSED_RGB8_ETC2,
        ETC2R8G8B8SRGBBlock => glow::COMPRESSED_SRGB8_ETC2,
        ETC2R8G8B8A1UNormBlock => glow::COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2,
        ETC2R8G8B8A1SRGBBlock => glow::COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2,
        ETC2R8G8B8A8UNormBlock => glow::COMPRESSED_RGBA8_ETC2_EAC,
        ETC2R8G8B8A8SRGBBlock => glow::COMPRESSED_SRGB8_ALPHA8_ETC2_EAC,
        EACR11UNormBlock => glow::COMPRESSED_R11_EAC,
        EACR11SNormBlock => glow::COMPRESSED_SIGNED_R11_EAC,
        EACR11G11UNormBlock => glow::COMPRESSED_RG11_EAC,
        EACR11G11SNormBlock => glow::COMPRESSED_SIGNED_RG11_EAC,
        ASTC4x4UNormBlock => ext::COMPRESSED_RGBA_ASTC_4x4_KHR,
        ASTC4x4SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR,
        ASTC5x4UNormBlock => ext::COMPRESSED_RGBA_ASTC_5x4_KHR,
        ASTC5x4SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_5x4_KHR,
        ASTC5x5UNormBlock => ext::COMPRESSED_RGBA_ASTC_5x5_KHR,
        ASTC5x5SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_5x5_KHR,
        ASTC6x5UNormBlock => ext::COMPRESSED_RGBA_ASTC_6x5_KHR,
        ASTC6x5SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_6x5_KHR,
        ASTC6x6UNormBlock => ext::COMPRESSED_RGBA_ASTC_6x6_KHR,
        ASTC6x6SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_6x6_KHR,
        ASTC8x5UNormBlock => ext::COMPRESSED_RGBA_ASTC_8x5_KHR,
        ASTC8x5SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_8x5_KHR,
        ASTC8x6UNormBlock => ext::COMPRESSED_RGBA_ASTC_8x6_KHR,
        ASTC8x6SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_8x6_KHR,
        ASTC8x8UNormBlock => ext::COMPRESSED_RGBA_ASTC_8x8_KHR,
        ASTC8x8SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_8x8_KHR,
        ASTC10x5UNormBlock => ext::COMPRESSED_RGBA_ASTC_10x5_KHR,
        ASTC10x5SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_10x5_KHR,
        ASTC10x6UNormBlock => ext::COMPRESSED_RGBA_ASTC_10x6_KHR,
        ASTC10x6SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_10x6_KHR,
        ASTC10x8UNormBlock => ext::COMPRESSED_RGBA_ASTC_10x8_KHR,
        ASTC10x8SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_10x8_KHR,
        ASTC10x10UNormBlock => ext::COMPRESSED_RGBA_ASTC_10x10_KHR,
        ASTC10x10SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_10x10_KHR,
        ASTC12x10UNormBlock => ext::COMPRESSED_RGBA_ASTC_12x10_KHR,
        ASTC12x10SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_12x10_KHR,
        ASTC12x12UNormBlock => ext::COMPRESSED_RGBA_ASTC_12x12_KHR,
        ASTC12x12SRGBBlock => ext::COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR,
        _ => return None,
    };
    Some(value)
}

/// Component type of a vertex attribute.
pub fn as_vertex_format(format: GraphicsFormat) -> Option<u32> {
    use GraphicsFormat::*;
    let value = match format {
        R8UNorm | R8UScaled | R8UInt | R8SRGB | R8G8UNorm | R8G8UScaled | R8G8UInt | R8G8SRGB |
        R8G8B8UNorm | R8G8B8UScaled | R8G8B8UInt | R8G8B8SRGB | B8G8R8UNorm | B8G8R8UScaled |
        B8G8R8UInt | B8G8R8SRGB | R8G8B8A8UNorm | R8G8B8A8UScaled | R8G8B8A8UInt |
        R8G8B8A8SRGB | B8G8R8A8UNorm | B8G8R8A8UScaled | B8G8R8A8UInt | B8G8R8A8SRGB |
        A8B8G8R8UNormPack32 | A8B8G8R8UScaledPack32 | A8B8G8R8UIntPack32 |
        A8B8G8R8SRGBPack32 => glow::UNSIGNED_BYTE,
        R8SNorm | R8SScaled | R8SInt | R8G8SNorm | R8G8SScaled | R8G8SInt | R8G8B8SNorm |
        R8G8B8SScaled | R8G8B8SInt | B8G8R8SNorm | B8G8R8SScaled | B8G8R8SInt | R8G8B8A8SNorm |
        R8G8B8A8SScaled | R8G8B8A8SInt | B8G8R8A8SNorm | B8G8R8A8SScaled | B8G8R8A8SInt |
        A8B8G8R8SNormPack32 | A8B8G8R8SScaledPack32 | A8B8G8R8SIntPack32 => glow::BYTE,
        R16UNorm | R16UScaled | R16UInt | R16G16UNorm | R16G16UScaled | R16G16UInt |
        R16G16B16UNorm | R16G16B16UScaled | R16G16B16UInt | R16G16B16A16UNorm |
        R16G16B16A16UScaled | R16G16B16A16UInt => glow::UNSIGNED_SHORT,
        R16SNorm | R16SScaled | R16SInt | R16G16SNorm | R16G16SScaled | R16G16SInt |
        R16G16B16SNorm | R16G16B16SScaled | R16G16B16SInt | R16G16B16A16SNorm |
        R16G16B16A16SScaled | R16G16B16A16SInt => glow::SHORT,
        R16SFloat | R16G16SFloat | R16G16B16SFloat | R16G16B16A16SFloat => glow::HALF_FLOAT,
        R32UInt | R32G32UInt | R32G32B32UInt | R32G32B32A32UInt => glow::UNSIGNED_INT,
        R32SInt | R32G32SInt | R32G32B32SInt | R32G32B32A32SInt => glow::INT,
        R32SFloat | R32G32SFloat | R32G32B32SFloat | R32G32B32A32SFloat => glow::FLOAT,
        R64UInt | R64G64UInt | R64G64B64UInt | R64G64B64A64UInt => ext::UNSIGNED_INT64_ARB,
        R64SInt | R64G64SInt | R64G64B64SInt | R64G64B64A64SInt => ext::INT64_ARB,
        R64SFloat | R64G64SFloat | R64G64B64SFloat | R64G64B64A64SFloat => glow::DOUBLE,
        _ => return None,
    };
    Some(value)
}

/// `true` for the scaled formats, which [`GraphicsFormat::kind`] folds into
/// integers but which feed float attributes without normalization.
pub fn is_scaled(format: GraphicsFormat) -> bool {
    use GraphicsFormat::*;
    matches!(
        format,
        R8UScaled | R8SScaled | R8G8UScaled | R8G8SScaled | R8G8B8UScaled | R8G8B8SScaled |
        B8G8R8UScaled | B8G8R8SScaled | R8G8B8A8UScaled | R8G8B8A8SScaled | B8G8R8A8UScaled |
        B8G8R8A8SScaled | A8B8G8R8UScaledPack32 | A8B8G8R8SScaledPack32 |
        A2R10G10B10UScaledPack32 | A2R10G10B10SScaledPack32 | A2B10G10R10UScaledPack32 |
        A2B10G10R10SScaledPack32 | R16UScaled | R16SScaled | R16G16UScaled | R16G16SScaled |
        R16G16B16UScaled | R16G16B16SScaled | R16G16B16A16UScaled | R16G16B16A16SScaled
    )
}

/// Bytes per pixel for a client `format` / `ty` pair, 0 when either is unknown.
///
/// Packed types already describe a whole pixel and count once.
pub fn format_num(format: u32, ty: u32) -> u32 {
    match ty {
        glow::UNSIGNED_SHORT_4_4_4_4
        | glow::UNSIGNED_SHORT_5_6_5
        | glow::UNSIGNED_SHORT_5_5_5_1
        | glow::UNSIGNED_SHORT_1_5_5_5_REV => return 2,
        glow::UNSIGNED_INT_2_10_10_10_REV
        | glow::INT_2_10_10_10_REV
        | glow::UNSIGNED_INT_10F_11F_11F_REV
        | glow::UNSIGNED_INT_5_9_9_9_REV
        | glow::UNSIGNED_INT_24_8 => return 4,
        glow::FLOAT_32_UNSIGNED_INT_24_8_REV => return 8,
        _ => {}
    }

    let channels = match format {
        glow::RED | glow::RED_INTEGER | glow::DEPTH_COMPONENT | glow::STENCIL_INDEX => 1,
        glow::RG | glow::RG_INTEGER | glow::DEPTH_STENCIL => 2,
        glow::RGB | glow::BGR | glow::SRGB | glow::RGB_INTEGER | glow::BGR_INTEGER => 3,
        glow::RGBA | glow::BGRA | glow::SRGB_ALPHA | glow::RGBA_INTEGER | glow::BGRA_INTEGER => 4,
        _ => return 0,
    };

    let size = match ty {
        glow::BYTE | glow::UNSIGNED_BYTE => 1,
        glow::SHORT | glow::UNSIGNED_SHORT | glow::HALF_FLOAT => 2,
        glow::INT | glow::UNSIGNED_INT | glow::FLOAT => 4,
        glow::DOUBLE | ext::INT64_ARB | ext::UNSIGNED_INT64_ARB => 8,
        _ => return 0,
    };

    channels * size
}

/// Block footprint and byte size of a compressed internal format.
fn compressed_block(internal: u32) -> Option<(u32, u32, u32)> {
    const ASTC_FOOTPRINTS: [(u32, u32); 14] = [
        (4, 4),
        (5, 4),
        (5, 5),
        (6, 5),
        (6, 6),
        (8, 5),
        (8, 6),
        (8, 8),
        (10, 5),
        (10, 6),
        (10, 8),
        (10, 10),
        (12, 10),
        (12, 12),
    ];

    match internal {
        ext::COMPRESSED_RGB_S3TC_DXT1_EXT
        | ext::COMPRESSED_RGBA_S3TC_DXT1_EXT
        | ext::COMPRESSED_SRGB_S3TC_DXT1_EXT
        | ext::COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT
        | glow::COMPRESSED_RED_RGTC1
        | glow::COMPRESSED_SIGNED_RED_RGTC1
        | glow::COMPRESSED_RGB8_ETC2
        | glow::COMPRESSED_SRGB8_ETC2
        | glow::COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2
        | glow::COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2
        | glow::COMPRESSED_R11_EAC
        | glow::COMPRESSED_SIGNED_R11_EAC => Some((4, 4, 8)),
        ext::COMPRESSED_RGBA_S3TC_DXT3_EXT
        | ext::COMPRESSED_RGBA_S3TC_DXT5_EXT
        | ext::COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT
        | ext::COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT
        | glow::COMPRESSED_RG_RGTC2
        | glow::COMPRESSED_SIGNED_RG_RGTC2
        | glow::COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT
        | glow::COMPRESSED_RGB_BPTC_SIGNED_FLOAT
        | glow::COMPRESSED_RGBA_BPTC_UNORM
        | glow::COMPRESSED_SRGB_ALPHA_BPTC_UNORM
        | glow::COMPRESSED_RGBA8_ETC2_EAC
        | glow::COMPRESSED_SRGB8_ALPHA8_ETC2_EAC
        | glow::COMPRESSED_RG11_EAC
        | glow::COMPRESSED_SIGNED_RG11_EAC => Some((4, 4, 16)),
        ext::COMPRESSED_RGBA_ASTC_4x4_KHR..=ext::COMPRESSED_RGBA_ASTC_12x12_KHR => {
            let (w, h) = ASTC_FOOTPRINTS[(internal - ext::COMPRESSED_RGBA_ASTC_4x4_KHR) as usize];
            Some((w, h, 16))
        }
        ext::COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR..=ext::COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR => {
            let index = internal - ext::COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR;
            let (w, h) = ASTC_FOOTPRINTS[index as usize];
            Some((w, h, 16))
        }
        _ => None,
    }
}

/// Byte size of one compressed image, 0 for an unknown internal format.
pub fn compressed_texture_size(width: u32, height: u32, depth: u32, internal: u32) -> usize {
    match compressed_block(internal) {
        Some((block_w, block_h, block_bytes)) => {
            let blocks_x = width.div_ceil(block_w) as usize;
            let blocks_y = height.div_ceil(block_h) as usize;
            blocks_x * blocks_y * block_bytes as usize * depth.max(1) as usize
        }
        None => 0,
    }
}

// --- Reverse mappings ---

/// First declared format whose storage maps to `internal`.
pub fn format_from_native(internal: u32) -> Option<GraphicsFormat> {
    GraphicsFormat::ALL
        .iter()
        .copied()
        .find(|format| as_texture_internal_format(*format) == Some(internal))
}

/// Abstract format of a reflected vertex input.
pub fn format_from_attrib_type(gl_type: u32) -> GraphicsFormat {
    match gl_type {
        glow::BOOL | glow::UNSIGNED_INT => GraphicsFormat::R8UInt,
        glow::BOOL_VEC2 | glow::UNSIGNED_INT_VEC2 => GraphicsFormat::R8G8UInt,
        glow::BOOL_VEC3 | glow::UNSIGNED_INT_VEC3 => GraphicsFormat::R8G8B8UInt,
        glow::BOOL_VEC4 | glow::UNSIGNED_INT_VEC4 => GraphicsFormat::R8G8B8A8UInt,
        glow::INT => GraphicsFormat::R8SInt,
        glow::INT_VEC2 => GraphicsFormat::R8G8SInt,
        glow::INT_VEC3 => GraphicsFormat::R8G8B8SInt,
        glow::INT_VEC4 => GraphicsFormat::R8G8B8A8SInt,
        glow::FLOAT => GraphicsFormat::R32SFloat,
        glow::FLOAT_VEC2 => GraphicsFormat::R32G32SFloat,
        glow::FLOAT_VEC3 => GraphicsFormat::R32G32B32SFloat,
        glow::FLOAT_VEC4 => GraphicsFormat::R32G32B32A32SFloat,
        glow::FLOAT_MAT2 | glow::FLOAT_MAT3 | glow::FLOAT_MAT4 => {
            GraphicsFormat::R32G32B32A32SFloat
        }
        _ => GraphicsFormat::Undefined,
    }
}

/// `true` for GL sampler types that occupy a texture unit.
pub fn is_sampler_type(gl_type: u32) -> bool {
    matches!(
        gl_type,
        glow::SAMPLER_2D
            | glow::SAMPLER_3D
            | glow::SAMPLER_CUBE
            | glow::SAMPLER_2D_SHADOW
            | glow::SAMPLER_2D_ARRAY
            | glow::SAMPLER_2D_ARRAY_SHADOW
            | glow::SAMPLER_CUBE_SHADOW
            | glow::SAMPLER_CUBE_MAP_ARRAY
            | glow::SAMPLER_CUBE_MAP_ARRAY_SHADOW
            | glow::SAMPLER_2D_MULTISAMPLE
            | glow::SAMPLER_2D_MULTISAMPLE_ARRAY
            | glow::SAMPLER_BUFFER
            | glow::INT_SAMPLER_2D
            | glow::INT_SAMPLER_3D
            | glow::INT_SAMPLER_CUBE
            | glow::INT_SAMPLER_2D_ARRAY
            | glow::UNSIGNED_INT_SAMPLER_2D
            | glow::UNSIGNED_INT_SAMPLER_3D
            | glow::UNSIGNED_INT_SAMPLER_CUBE
            | glow::UNSIGNED_INT_SAMPLER_2D_ARRAY
    )
}

/// `true` for GL image types bound through image units.
pub fn is_image_type(gl_type: u32) -> bool {
    matches!(
        gl_type,
        glow::IMAGE_2D
            | glow::IMAGE_3D
            | glow::IMAGE_CUBE
            | glow::IMAGE_2D_ARRAY
            | glow::INT_IMAGE_2D
            | glow::UNSIGNED_INT_IMAGE_2D
    )
}

/// Uniform tag of a reflected uniform. Arrays are recognised by a `[` in the
/// reported name.
pub fn uniform_type_from_native(gl_type: u32, name: &str) -> UniformType {
    let base = match gl_type {
        glow::BOOL => return UniformType::Bool,
        glow::INT => UniformType::Int,
        glow::INT_VEC2 => UniformType::Int2,
        glow::INT_VEC3 => UniformType::Int3,
        glow::INT_VEC4 => UniformType::Int4,
        glow::UNSIGNED_INT => UniformType::UInt,
        glow::UNSIGNED_INT_VEC2 => UniformType::UInt2,
        glow::UNSIGNED_INT_VEC3 => UniformType::UInt3,
        glow::UNSIGNED_INT_VEC4 => UniformType::UInt4,
        glow::FLOAT => UniformType::Float,
        glow::FLOAT_VEC2 => UniformType::Float2,
        glow::FLOAT_VEC3 => UniformType::Float3,
        glow::FLOAT_VEC4 => UniformType::Float4,
        glow::FLOAT_MAT2 => UniformType::Float2x2,
        glow::FLOAT_MAT3 => UniformType::Float3x3,
        glow::FLOAT_MAT4 => UniformType::Float4x4,
        ty if is_sampler_type(ty) => return UniformType::SamplerImage,
        ty if is_image_type(ty) => return UniformType::StorageImage,
        _ => return UniformType::None,
    };

    if name.contains('[') {
        base.to_array()
    } else {
        base
    }
}
