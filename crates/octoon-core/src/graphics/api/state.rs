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

//! Fixed-function state: blending, rasterization, depth and stencil.

use super::enums::{
    BlendFactor, BlendOp, CompareFunc, CullMode, FrontFace, PolygonMode, StencilOp, VertexType,
};
use super::flags::ColorMask;

/// Blend configuration of one color attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBlend {
    /// Whether blending is enabled.
    pub enable: bool,
    /// Color source factor.
    pub src: BlendFactor,
    /// Color destination factor.
    pub dst: BlendFactor,
    /// Alpha source factor.
    pub src_alpha: BlendFactor,
    /// Alpha destination factor.
    pub dst_alpha: BlendFactor,
    /// Color operator.
    pub blend_op: BlendOp,
    /// Alpha operator.
    pub blend_alpha_op: BlendOp,
    /// Channels written.
    pub color_write_mask: ColorMask,
}

impl Default for ColorBlend {
    fn default() -> Self {
        Self {
            enable: false,
            src: BlendFactor::SrcAlpha,
            dst: BlendFactor::OneMinusSrcAlpha,
            src_alpha: BlendFactor::SrcAlpha,
            dst_alpha: BlendFactor::OneMinusSrcAlpha,
            blend_op: BlendOp::Add,
            blend_alpha_op: BlendOp::Add,
            color_write_mask: ColorMask::RGBA,
        }
    }
}

impl ColorBlend {
    /// Standard alpha blending, enabled.
    pub fn alpha_blending() -> Self {
        Self {
            enable: true,
            ..Self::default()
        }
    }

    /// `true` if any of the four factors differs from `other`.
    pub fn factors_differ(&self, other: &ColorBlend) -> bool {
        self.src != other.src
            || self.dst != other.dst
            || self.src_alpha != other.src_alpha
            || self.dst_alpha != other.dst_alpha
    }

    /// `true` if either operator differs from `other`.
    pub fn ops_differ(&self, other: &ColorBlend) -> bool {
        self.blend_op != other.blend_op || self.blend_alpha_op != other.blend_alpha_op
    }
}

/// Stencil configuration of one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFaceState {
    /// Comparison against the reference.
    pub func: CompareFunc,
    /// Reference value.
    pub reference: u32,
    /// Mask applied to both operands before comparing.
    pub read_mask: u32,
    /// Mask applied when writing.
    pub write_mask: u32,
    /// Action when the stencil test fails.
    pub fail: StencilOp,
    /// Action when stencil passes and depth fails.
    pub depth_fail: StencilOp,
    /// Action when both tests pass.
    pub pass: StencilOp,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        Self {
            func: CompareFunc::Always,
            reference: 0,
            read_mask: 0xFFFF_FFFF,
            write_mask: 0xFFFF_FFFF,
            fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            pass: StencilOp::Keep,
        }
    }
}

/// Complete fixed-function state of a pipeline.
///
/// Also serves as the "currently applied" snapshot a context diffs against.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDesc {
    /// Per-attachment blending, indexed by color attachment slot.
    pub color_blends: Vec<ColorBlend>,
    /// Scissor test.
    pub scissor_test_enable: bool,
    /// Linear-to-sRGB conversion on write.
    pub srgb_enable: bool,
    /// Rasterized line width.
    pub line_width: f32,
    /// Face culling.
    pub cull_mode: CullMode,
    /// Fill mode.
    pub polygon_mode: PolygonMode,
    /// Primitive topology used by draws.
    pub primitive_type: VertexType,
    /// Front-facing winding.
    pub front_face: FrontFace,
    /// Depth test.
    pub depth_enable: bool,
    /// Depth writes.
    pub depth_write_enable: bool,
    /// Depth comparison.
    pub depth_func: CompareFunc,
    /// Polygon offset.
    pub depth_bias_enable: bool,
    /// Constant polygon offset.
    pub depth_bias: f32,
    /// Slope-scaled polygon offset.
    pub depth_slope_scale_bias: f32,
    /// Stencil test.
    pub stencil_enable: bool,
    /// Front face stencil.
    pub stencil_front: StencilFaceState,
    /// Back face stencil.
    pub stencil_back: StencilFaceState,
}

impl Default for StateDesc {
    fn default() -> Self {
        Self {
            color_blends: Vec::new(),
            scissor_test_enable: false,
            srgb_enable: false,
            line_width: 1.0,
            cull_mode: CullMode::Back,
            polygon_mode: PolygonMode::Solid,
            primitive_type: VertexType::TriangleList,
            front_face: FrontFace::CW,
            depth_enable: true,
            depth_write_enable: true,
            depth_func: CompareFunc::Lequal,
            depth_bias_enable: false,
            depth_bias: 0.0,
            depth_slope_scale_bias: 0.0,
            stencil_enable: false,
            stencil_front: StencilFaceState::default(),
            stencil_back: StencilFaceState::default(),
        }
    }
}

impl StateDesc {
    /// Default state with `attachments` default color blends, as a freshly
    /// initialised context reports it.
    pub fn with_attachments(attachments: usize) -> Self {
        Self {
            color_blends: vec![ColorBlend::default(); attachments],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults() {
        let state = StateDesc::default();
        assert!(state.depth_enable);
        assert!(state.depth_write_enable);
        assert_eq!(state.depth_func, CompareFunc::Lequal);
        assert_eq!(state.cull_mode, CullMode::Back);
        assert_eq!(state.front_face, FrontFace::CW);
        assert!(!state.stencil_enable);
        assert_eq!(state.stencil_front.write_mask, 0xFFFF_FFFF);
        assert_eq!(state.stencil_back.func, CompareFunc::Always);
        assert!(state.color_blends.is_empty());
    }

    #[test]
    fn test_color_blend_diff_helpers() {
        let base = ColorBlend::default();
        let mut other = base;
        assert!(!base.factors_differ(&other));
        other.dst_alpha = BlendFactor::One;
        assert!(base.factors_differ(&other));
        assert!(!base.ops_differ(&other));
        other.blend_alpha_op = BlendOp::Subtract;
        assert!(base.ops_differ(&other));
    }

    #[test]
    fn test_with_attachments() {
        let state = StateDesc::with_attachments(4);
        assert_eq!(state.color_blends.len(), 4);
        assert!(state.color_blends.iter().all(|b| !b.enable));
    }
}
