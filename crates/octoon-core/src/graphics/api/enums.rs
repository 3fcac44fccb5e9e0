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

//! Pipeline, sampler and resource enums shared by every backend.

use serde::{Deserialize, Serialize};

/// The native API family a device targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceType {
    /// Direct3D 11.
    D3D11,
    /// Direct3D 12.
    D3D12,
    /// Desktop OpenGL through global bind points.
    OpenGL,
    /// Desktop OpenGL 4.5 through direct state access.
    #[default]
    OpenGLCore,
    /// OpenGL ES 2.0.
    OpenGLES2,
    /// OpenGL ES 3.0.
    OpenGLES3,
    /// OpenGL ES 3.1.
    OpenGLES31,
    /// OpenGL ES 3.2.
    OpenGLES32,
    /// Vulkan.
    Vulkan,
}

/// How presentation is synchronised with the display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SwapInterval {
    /// Present immediately.
    Free,
    /// Wait for every vertical blank.
    #[default]
    Vsync,
    /// Wait for every second vertical blank.
    Fps30,
    /// Wait for every fourth vertical blank.
    Fps15,
}

impl SwapInterval {
    /// Number of vertical blanks to wait per present.
    pub const fn frames(self) -> i32 {
        match self {
            SwapInterval::Free => 0,
            SwapInterval::Vsync => 1,
            SwapInterval::Fps30 => 2,
            SwapInterval::Fps15 => 4,
        }
    }
}

/// Comparison used by depth and stencil tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    /// No comparison. Has no native equivalent.
    None,
    /// Passes if incoming <= stored.
    Lequal,
    /// Passes if equal.
    Equal,
    /// Passes if incoming > stored.
    Greater,
    /// Passes if incoming < stored.
    Less,
    /// Passes if incoming >= stored.
    Gequal,
    /// Passes if not equal.
    NotEqual,
    /// Always passes.
    Always,
    /// Never passes.
    Never,
}

/// Source or destination weight in the blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// Destination color.
    DstCol,
    /// Source color.
    SrcColor,
    /// Source alpha.
    SrcAlpha,
    /// Destination alpha.
    DstAlpha,
    /// `1 - source color`.
    OneMinusSrcCol,
    /// `1 - destination color`.
    OneMinusDstCol,
    /// `1 - source alpha`.
    OneMinusSrcAlpha,
    /// `1 - destination alpha`.
    OneMinusDstAlpha,
    /// Constant blend color.
    ConstantColor,
    /// Constant blend alpha.
    ConstantAlpha,
    /// `1 - constant blend color`.
    OneMinusConstantColor,
    /// `1 - constant blend alpha`.
    OneMinusConstantAlpha,
    /// `min(source alpha, 1 - destination alpha)`.
    SrcAlphaSaturate,
}

/// Operator combining the weighted source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    /// `src + dst`.
    Add,
    /// `src - dst`.
    Subtract,
    /// `dst - src`.
    RevSubtract,
}

/// Which faces are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// Culling disabled.
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    Back,
    /// Cull both faces.
    FrontBack,
}

/// Winding that marks a triangle as front-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    /// Clockwise.
    CW,
    /// Counter-clockwise.
    CCW,
}

/// Rasterization fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    /// Vertices only.
    Point,
    /// Edges only.
    Wireframe,
    /// Filled.
    Solid,
}

/// Action applied to the stencil buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOp {
    /// Keep the stored value.
    Keep,
    /// Replace with the reference.
    Replace,
    /// Increment and clamp.
    Incr,
    /// Decrement and clamp.
    Decr,
    /// Set to zero.
    Zero,
    /// Increment and wrap.
    IncrWrap,
    /// Decrement and wrap.
    DecrWrap,
}

/// Shape of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureDim {
    /// Two-dimensional.
    #[default]
    Texture2D,
    /// Three-dimensional.
    Texture3D,
    /// Six-faced cube map.
    Cube,
    /// Array of 2D layers.
    Texture2DArray,
    /// Array of cube maps.
    CubeArray,
}

/// Anisotropic filtering level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerAnis {
    /// Anisotropic filtering disabled.
    #[default]
    Anis0,
    /// 1x.
    Anis1,
    /// 2x.
    Anis2,
    /// 4x.
    Anis4,
    /// 8x.
    Anis8,
    /// 16x.
    Anis16,
    /// 32x.
    Anis32,
    /// 64x.
    Anis64,
}

/// Texture coordinate addressing outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerWrap {
    /// Unspecified. Has no native equivalent.
    None,
    /// Tile.
    #[default]
    Repeat,
    /// Tile with mirroring.
    Mirror,
    /// Clamp to the border texel.
    ClampToEdge,
}

/// Texel filtering, optionally across mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear.
    #[default]
    Linear,
    /// Nearest texel, linear between mips.
    NearestMipmapLinear,
    /// Nearest texel, nearest mip.
    NearestMipmapNearest,
    /// Bilinear, nearest mip.
    LinearMipmapNearest,
    /// Trilinear.
    LinearMipmapLinear,
}

/// What a buffer holds, which decides its native target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Unspecified.
    #[default]
    None,
    /// Source of copy operations.
    TransferSrc,
    /// Destination of copy operations.
    TransferDst,
    /// Read-only texel buffer.
    UniformTexelBuffer,
    /// Uniform block storage.
    UniformBuffer,
    /// Read-write texel buffer.
    StorageTexelBuffer,
    /// Shader storage block.
    StorageBuffer,
    /// Vertex attributes.
    StorageVertexBuffer,
    /// Indices.
    StorageIndexBuffer,
    /// Indirect draw arguments.
    IndirectBuffer,
}

/// Primitive topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexType {
    /// Points.
    PointList,
    /// Independent lines.
    LineList,
    /// Connected lines.
    LineStrip,
    /// Independent triangles.
    #[default]
    TriangleList,
    /// Connected triangles.
    TriangleStrip,
    /// Triangles sharing the first vertex.
    TriangleFan,
    /// Lines with adjacency.
    LineListWithAdjacency,
    /// Line strip with adjacency.
    LineStripWithAdjacency,
    /// Triangles with adjacency.
    TriangleListWithAdjacency,
    /// Triangle strip with adjacency.
    TriangleStripWithAdjacency,
    /// Tessellation patches.
    PatchList,
}

/// Rate at which a vertex binding advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexDivisor {
    /// Once per vertex.
    #[default]
    Vertex,
    /// Once per instance.
    Instance,
}

/// Width of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexType {
    /// 16-bit indices.
    UInt16,
    /// 32-bit indices.
    #[default]
    UInt32,
}

impl IndexType {
    /// Size of one index in bytes.
    pub const fn byte_size(self) -> u32 {
        match self {
            IndexType::UInt16 => 2,
            IndexType::UInt32 => 4,
        }
    }
}

/// A single programmable stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
    /// Geometry stage.
    Geometry,
    /// Compute stage.
    Compute,
    /// Tessellation evaluation stage.
    TessEvaluation,
    /// Tessellation control stage.
    TessControl,
}

/// Language the shader bytes are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderLang {
    /// Unspecified.
    None,
    /// HLSL source.
    Hlsl,
    /// Compiled HLSL byte code.
    HlslBytecodes,
    /// GLSL source, consumed as-is.
    #[default]
    Glsl,
}

/// Target shader model, used by the cross-compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderModel {
    /// SM 2.x.
    Model2X,
    /// SM 3.x.
    Model3X,
    /// SM 4.x.
    Model4X,
    /// SM 5.x.
    #[default]
    Model5X,
    /// SM 6.x.
    Model6X,
}

/// Layout an image is in when used by a framebuffer attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageLayout {
    /// Unknown contents.
    #[default]
    Undefined,
    /// Any usage.
    General,
    /// Written as a color attachment.
    ColorAttachmentOptimal,
    /// Written as a depth-stencil attachment.
    DepthStencilAttachmentOptimal,
    /// Read-only depth-stencil attachment.
    DepthStencilReadOnlyOptimal,
    /// Sampled by shaders.
    ShaderReadOnlyOptimal,
    /// Copy source.
    TransferSrcOptimal,
    /// Copy destination.
    TransferDstOptimal,
    /// Host-initialised.
    Preinitialized,
    /// Ready for presentation.
    PresentSrcKhr,
}
