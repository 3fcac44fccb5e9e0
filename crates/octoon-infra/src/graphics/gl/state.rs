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

//! Fixed-function state objects and the diff that applies them.
//!
//! The context keeps a snapshot of what the native side currently holds.
//! [`GlState::apply`] compares each field with that snapshot, issues native
//! calls only for the fields that differ and writes the new values back.
//! Applying the same state twice therefore costs nothing.
//!
//! When a translation fails halfway through, the fields processed so far
//! stay updated in the snapshot and the error is returned.

use octoon_core::graphics::api::{ColorBlend, ColorMask, CullMode, StateDesc, StencilFaceState};
use octoon_core::graphics::error::{ResourceError, TranslateError};

use super::driver::GlDriver;
use super::shared::GlShared;
use super::types::{self, IntoGl};

/// An immutable state object.
#[derive(Debug)]
pub struct GlState {
    shared: GlShared,
    desc: StateDesc,
}

impl GlState {
    /// Checks that every enum in `desc` has a native counterpart.
    pub fn setup(shared: &GlShared, desc: StateDesc) -> Result<Self, ResourceError> {
        validate(&desc).map_err(|err| shared.fail(ResourceError::from(err)))?;
        Ok(Self {
            shared: shared.clone(),
            desc,
        })
    }

    /// The descriptor this state was built from.
    pub fn desc(&self) -> &StateDesc {
        &self.desc
    }

    /// Brings the native state from `snapshot` to this state, issuing only
    /// the calls for fields that differ, and updates `snapshot`.
    pub fn apply(&self, snapshot: &mut StateDesc) -> Result<(), TranslateError> {
        self.apply_with(snapshot, false)
    }

    /// Like [`GlState::apply`] but issues every call regardless of the
    /// snapshot. Used when the native state is unknown.
    pub(crate) fn apply_with(
        &self,
        snapshot: &mut StateDesc,
        force: bool,
    ) -> Result<(), TranslateError> {
        let gl = self.shared.gl();
        let new = &self.desc;
        let changed = |differs: bool| force || differs;

        for (index, blend) in new.color_blends.iter().enumerate() {
            let index_u32 = index as u32;
            match snapshot.color_blends.get_mut(index) {
                Some(current) => apply_blend(gl, index_u32, blend, current, force)?,
                None => {
                    let mut current = *blend;
                    apply_blend(gl, index_u32, blend, &mut current, true)?;
                    snapshot.color_blends.push(current);
                }
            }
        }
        for (index, current) in snapshot
            .color_blends
            .iter_mut()
            .enumerate()
            .skip(new.color_blends.len())
        {
            reset_blend(gl, index as u32, current, force);
        }

        if changed(new.cull_mode != snapshot.cull_mode) {
            if new.cull_mode == CullMode::None {
                gl.disable(glow::CULL_FACE);
            } else {
                if force || snapshot.cull_mode == CullMode::None {
                    gl.enable(glow::CULL_FACE);
                }
                gl.cull_face(new.cull_mode.into_gl());
            }
            snapshot.cull_mode = new.cull_mode;
        }

        if changed(new.front_face != snapshot.front_face) {
            gl.front_face(new.front_face.into_gl());
            snapshot.front_face = new.front_face;
        }

        if changed(new.polygon_mode != snapshot.polygon_mode) {
            gl.polygon_mode(glow::FRONT_AND_BACK, new.polygon_mode.into_gl());
            snapshot.polygon_mode = new.polygon_mode;
        }

        if changed(new.scissor_test_enable != snapshot.scissor_test_enable) {
            toggle(gl, glow::SCISSOR_TEST, new.scissor_test_enable);
            snapshot.scissor_test_enable = new.scissor_test_enable;
        }

        if changed(new.srgb_enable != snapshot.srgb_enable) {
            toggle(gl, glow::FRAMEBUFFER_SRGB, new.srgb_enable);
            snapshot.srgb_enable = new.srgb_enable;
        }

        if changed(new.depth_enable != snapshot.depth_enable) {
            toggle(gl, glow::DEPTH_TEST, new.depth_enable);
            snapshot.depth_enable = new.depth_enable;
        }
        if new.depth_enable && changed(new.depth_func != snapshot.depth_func) {
            let func = types::require(
                types::as_compare_function(new.depth_func),
                "compare function",
                new.depth_func,
            )?;
            gl.depth_func(func);
            snapshot.depth_func = new.depth_func;
        }

        if changed(new.depth_write_enable != snapshot.depth_write_enable) {
            gl.depth_mask(new.depth_write_enable);
            snapshot.depth_write_enable = new.depth_write_enable;
        }

        if changed(new.depth_bias_enable != snapshot.depth_bias_enable) {
            toggle(gl, glow::POLYGON_OFFSET_FILL, new.depth_bias_enable);
            snapshot.depth_bias_enable = new.depth_bias_enable;
        }
        if new.depth_bias_enable
            && changed(
                new.depth_bias != snapshot.depth_bias
                    || new.depth_slope_scale_bias != snapshot.depth_slope_scale_bias,
            )
        {
            gl.polygon_offset(new.depth_slope_scale_bias, new.depth_bias);
            snapshot.depth_bias = new.depth_bias;
            snapshot.depth_slope_scale_bias = new.depth_slope_scale_bias;
        }

        if changed(new.stencil_enable != snapshot.stencil_enable) {
            toggle(gl, glow::STENCIL_TEST, new.stencil_enable);
            snapshot.stencil_enable = new.stencil_enable;
        }
        if new.stencil_enable {
            apply_stencil(gl, glow::FRONT, &new.stencil_front, &mut snapshot.stencil_front, force)?;
            apply_stencil(gl, glow::BACK, &new.stencil_back, &mut snapshot.stencil_back, force)?;
        }

        if changed(new.line_width != snapshot.line_width) {
            let properties = self.shared.properties();
            gl.line_width(clamp_line_width(
                new.line_width,
                properties.min_line_width_range,
                properties.max_line_width_range,
            ));
            snapshot.line_width = new.line_width;
        }

        snapshot.primitive_type = new.primitive_type;
        Ok(())
    }
}

/// Clamps into the queried range. A range that is empty or not a number is
/// ignored rather than trusted.
fn clamp_line_width(width: f32, min: f32, max: f32) -> f32 {
    let max = max.max(1.0);
    if min.is_nan() || min > max {
        return width;
    }
    width.clamp(min, max)
}

fn toggle(gl: &dyn GlDriver, cap: u32, enable: bool) {
    if enable {
        gl.enable(cap);
    } else {
        gl.disable(cap);
    }
}

fn color_mask_i(gl: &dyn GlDriver, index: u32, mask: ColorMask) {
    gl.color_mask_i(
        index,
        mask.contains(ColorMask::R),
        mask.contains(ColorMask::G),
        mask.contains(ColorMask::B),
        mask.contains(ColorMask::A),
    );
}

fn apply_blend(
    gl: &dyn GlDriver,
    index: u32,
    new: &ColorBlend,
    current: &mut ColorBlend,
    force: bool,
) -> Result<(), TranslateError> {
    if force || new.enable != current.enable {
        if new.enable {
            gl.enable_i(glow::BLEND, index);
        } else {
            gl.disable_i(glow::BLEND, index);
        }
        current.enable = new.enable;
    }

    // Factors and ops are tracked even while blending is off, so a forced
    // apply has to put them on the native side too.
    if force || new.enable {
        if force || new.factors_differ(current) {
            let factor =
                |value| types::require(types::as_blend_factor(value), "blend factor", value);
            gl.blend_func_separate_i(
                index,
                factor(new.src)?,
                factor(new.dst)?,
                factor(new.src_alpha)?,
                factor(new.dst_alpha)?,
            );
            current.src = new.src;
            current.dst = new.dst;
            current.src_alpha = new.src_alpha;
            current.dst_alpha = new.dst_alpha;
        }
        if force || new.ops_differ(current) {
            gl.blend_equation_separate_i(
                index,
                new.blend_op.into_gl(),
                new.blend_alpha_op.into_gl(),
            );
            current.blend_op = new.blend_op;
            current.blend_alpha_op = new.blend_alpha_op;
        }
    }

    if force || new.color_write_mask != current.color_write_mask {
        color_mask_i(gl, index, new.color_write_mask);
        current.color_write_mask = new.color_write_mask;
    }
    Ok(())
}

/// An attachment the new state no longer uses goes back to blending off
/// with every channel writable.
fn reset_blend(gl: &dyn GlDriver, index: u32, current: &mut ColorBlend, force: bool) {
    if force || current.enable {
        gl.disable_i(glow::BLEND, index);
        current.enable = false;
    }
    if force || current.color_write_mask != ColorMask::RGBA {
        color_mask_i(gl, index, ColorMask::RGBA);
        current.color_write_mask = ColorMask::RGBA;
    }
}

fn apply_stencil(
    gl: &dyn GlDriver,
    face: u32,
    new: &StencilFaceState,
    current: &mut StencilFaceState,
    force: bool,
) -> Result<(), TranslateError> {
    if force
        || new.func != current.func
        || new.reference != current.reference
        || new.read_mask != current.read_mask
    {
        let func = types::require(
            types::as_compare_function(new.func),
            "stencil compare function",
            new.func,
        )?;
        gl.stencil_func_separate(face, func, new.reference as i32, new.read_mask);
        current.func = new.func;
        current.reference = new.reference;
        current.read_mask = new.read_mask;
    }
    if force
        || new.fail != current.fail
        || new.depth_fail != current.depth_fail
        || new.pass != current.pass
    {
        gl.stencil_op_separate(
            face,
            new.fail.into_gl(),
            new.depth_fail.into_gl(),
            new.pass.into_gl(),
        );
        current.fail = new.fail;
        current.depth_fail = new.depth_fail;
        current.pass = new.pass;
    }
    if force || new.write_mask != current.write_mask {
        gl.stencil_mask_separate(face, new.write_mask);
        current.write_mask = new.write_mask;
    }
    Ok(())
}

fn validate(desc: &StateDesc) -> Result<(), TranslateError> {
    for blend in &desc.color_blends {
        for factor in [blend.src, blend.dst, blend.src_alpha, blend.dst_alpha] {
            types::require(types::as_blend_factor(factor), "blend factor", factor)?;
        }
    }
    if desc.depth_enable {
        types::require(
            types::as_compare_function(desc.depth_func),
            "compare function",
            desc.depth_func,
        )?;
    }
    if desc.stencil_enable {
        for face in [&desc.stencil_front, &desc.stencil_back] {
            types::require(
                types::as_compare_function(face.func),
                "stencil compare function",
                face.func,
            )?;
        }
    }
    types::require(
        types::as_vertex_type(desc.primitive_type),
        "primitive type",
        desc.primitive_type,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::headless::HeadlessDriver;
    use crate::graphics::gl::property::query_properties;
    use crate::graphics::gl::shared::testing::headless;
    use crate::graphics::gl::shared::GlVariant;
    use octoon_core::graphics::api::{BlendFactor, CompareFunc, FrontFace, StencilOp, VertexType};
    use octoon_core::graphics::traits::MemorySink;
    use std::rc::Rc;

    fn state(shared: &GlShared, desc: StateDesc) -> GlState {
        GlState::setup(shared, desc).unwrap()
    }

    fn blend_calls(driver: &Rc<HeadlessDriver>, since: usize) -> usize {
        let blend = i64::from(glow::BLEND);
        driver
            .calls_since(since)
            .iter()
            .filter(|call| call.name.starts_with("blend_") || call.args.first() == Some(&blend))
            .count()
    }

    #[test]
    fn test_identical_apply_is_free() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let mut desc = StateDesc::with_attachments(1);
        desc.color_blends[0] = ColorBlend::alpha_blending();
        let state = state(&shared, desc);
        let mut snapshot = StateDesc::default();
        state.apply(&mut snapshot).unwrap();

        // ACT
        let mark = driver.mark();
        state.apply(&mut snapshot).unwrap();

        // ASSERT
        assert!(driver.calls_since(mark).is_empty());
        assert_eq!(snapshot.color_blends.len(), 1);
        assert!(snapshot.color_blends[0].enable);
    }

    #[test]
    fn test_only_changed_fields_issue_calls() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let mut snapshot = StateDesc::default();
        let mut desc = StateDesc::default();
        desc.depth_enable = false;
        desc.front_face = FrontFace::CCW;

        let mark = driver.mark();
        state(&shared, desc).apply(&mut snapshot).unwrap();

        let names: Vec<&str> = driver.calls_since(mark).iter().map(|call| call.name).collect();
        assert_eq!(names, vec!["front_face", "disable"]);
        assert_eq!(driver.calls_named("disable")[0].args, vec![i64::from(glow::DEPTH_TEST)]);
        assert_eq!(snapshot.front_face, FrontFace::CCW);
        assert!(!snapshot.depth_enable);
    }

    #[test]
    fn test_second_blend_apply_issues_no_blend_calls() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let mut desc = StateDesc::with_attachments(2);
        desc.color_blends[0] = ColorBlend::alpha_blending();
        let blended = state(&shared, desc);
        let mut snapshot = StateDesc::with_attachments(2);

        let first = driver.mark();
        blended.apply(&mut snapshot).unwrap();
        let first_calls = blend_calls(&driver, first);
        let second = driver.mark();
        blended.apply(&mut snapshot).unwrap();

        assert_eq!(first_calls, 1, "factors and ops already match the snapshot");
        assert_eq!(blend_calls(&driver, second), 0);
    }

    #[test]
    fn test_shrinking_attachments_resets_surplus() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let mut wide = StateDesc::with_attachments(4);
        for blend in &mut wide.color_blends {
            *blend = ColorBlend::alpha_blending();
            blend.color_write_mask = ColorMask::RGB;
        }
        let mut narrow = StateDesc::with_attachments(2);
        for blend in &mut narrow.color_blends {
            *blend = ColorBlend::alpha_blending();
            blend.color_write_mask = ColorMask::RGB;
        }
        let mut snapshot = StateDesc::default();
        state(&shared, wide).apply(&mut snapshot).unwrap();

        // ACT
        let mark = driver.mark();
        state(&shared, narrow).apply(&mut snapshot).unwrap();

        // ASSERT
        let calls = driver.calls_since(mark);
        let disabled: Vec<i64> = calls
            .iter()
            .filter(|call| call.name == "disable_i")
            .map(|call| call.args[1])
            .collect();
        assert_eq!(disabled, vec![2, 3]);
        let masks: Vec<Vec<i64>> = calls
            .iter()
            .filter(|call| call.name == "color_mask_i")
            .map(|call| call.args.clone())
            .collect();
        assert_eq!(masks, vec![vec![2, 1, 1, 1, 1], vec![3, 1, 1, 1, 1]]);
        assert!(driver.is_enabled_i(glow::BLEND, 1));
        assert!(!driver.is_enabled_i(glow::BLEND, 2));
        assert_eq!(snapshot.color_blends[3].color_write_mask, ColorMask::RGBA);
    }

    #[test]
    fn test_cull_mode_transitions() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let mut snapshot = StateDesc::default();
        let mut none = StateDesc::default();
        none.cull_mode = CullMode::None;
        let mut front = StateDesc::default();
        front.cull_mode = CullMode::Front;

        state(&shared, none).apply(&mut snapshot).unwrap();
        let mark = driver.mark();
        state(&shared, front).apply(&mut snapshot).unwrap();

        let names: Vec<&str> = driver.calls_since(mark).iter().map(|call| call.name).collect();
        assert_eq!(names, vec!["enable", "cull_face"]);
        assert!(driver.is_enabled(glow::CULL_FACE));
    }

    #[test]
    fn test_stencil_faces_are_independent() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let mut snapshot = StateDesc::default();
        let mut desc = StateDesc::default();
        desc.stencil_enable = true;
        desc.stencil_back.pass = StencilOp::Replace;
        desc.stencil_back.func = CompareFunc::Equal;
        desc.stencil_back.reference = 3;

        state(&shared, desc).apply(&mut snapshot).unwrap();

        let funcs = driver.calls_named("stencil_func_separate");
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].args[0], i64::from(glow::BACK));
        assert_eq!(funcs[0].args[2], 3);
        let ops = driver.calls_named("stencil_op_separate");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].args[0], i64::from(glow::BACK));
        assert_eq!(ops[0].args[3], i64::from(glow::REPLACE));
        assert_eq!(snapshot.stencil_front, StencilFaceState::default());
    }

    #[test]
    fn test_forced_apply_issues_everything() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let mut snapshot = StateDesc::default();

        state(&shared, StateDesc::default())
            .apply_with(&mut snapshot, true)
            .unwrap();

        let expected = [
            "cull_face",
            "front_face",
            "polygon_mode",
            "depth_func",
            "depth_mask",
            "line_width",
        ];
        for name in expected {
            assert_eq!(driver.count(name), 1, "{name}");
        }
        assert!(driver.is_enabled(glow::DEPTH_TEST));
        assert!(driver.is_enabled(glow::CULL_FACE));
    }

    #[test]
    fn test_line_width_is_clamped() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let mut snapshot = StateDesc::default();
        let mut desc = StateDesc::default();
        desc.line_width = 32.0;

        state(&shared, desc).apply(&mut snapshot).unwrap();

        let width = driver.calls_named("line_width")[0].args[0];
        approx::assert_relative_eq!(f32::from_bits(width as u32), 8.0);
        approx::assert_relative_eq!(snapshot.line_width, 32.0);
    }

    #[test]
    fn test_setup_rejects_unmapped_compare() {
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let mut desc = StateDesc::default();
        desc.depth_func = CompareFunc::None;

        let result = GlState::setup(&shared, desc);

        assert!(matches!(result, Err(ResourceError::Translate(_))));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_translation_failure_keeps_processed_fields() {
        // ARRANGE
        let (_driver, _sink, shared) = headless(GlVariant::Core);
        let mut desc = StateDesc::default();
        desc.front_face = FrontFace::CCW;
        desc.depth_func = CompareFunc::None;
        desc.primitive_type = VertexType::LineList;
        let unchecked = GlState { shared, desc };
        let mut snapshot = StateDesc::default();
        snapshot.depth_func = CompareFunc::Always;

        // ACT
        let result = unchecked.apply(&mut snapshot);

        // ASSERT
        assert!(result.is_err());
        assert_eq!(snapshot.front_face, FrontFace::CCW);
        assert_eq!(snapshot.depth_func, CompareFunc::Always);
        assert_eq!(snapshot.primitive_type, VertexType::TriangleList);
    }

    #[test]
    fn test_line_width_survives_an_inverted_range() {
        // ARRANGE
        let driver = Rc::new(HeadlessDriver::new());
        let mut properties = query_properties(driver.as_ref());
        properties.min_line_width_range = 16.0;
        properties.max_line_width_range = 2.0;
        let sink = Rc::new(MemorySink::new());
        let properties = Rc::new(properties);
        let shared = GlShared::new(driver.clone(), sink, properties, GlVariant::Core, false);
        let mut desc = StateDesc::default();
        desc.line_width = 3.0;
        let mut snapshot = StateDesc::default();

        // ACT
        state(&shared, desc).apply(&mut snapshot).unwrap();

        // ASSERT
        let width = driver.calls_named("line_width")[0].args[0];
        approx::assert_relative_eq!(f32::from_bits(width as u32), 3.0);
        approx::assert_relative_eq!(clamp_line_width(3.0, f32::NAN, 2.0), 3.0);
    }

    #[test]
    fn test_blend_factor_changes_only_touch_that_attachment() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let mut desc = StateDesc::with_attachments(2);
        desc.color_blends[0] = ColorBlend::alpha_blending();
        desc.color_blends[1] = ColorBlend::alpha_blending();
        let mut snapshot = StateDesc::default();
        state(&shared, desc.clone()).apply(&mut snapshot).unwrap();
        desc.color_blends[1].dst = BlendFactor::One;

        let mark = driver.mark();
        state(&shared, desc).apply(&mut snapshot).unwrap();

        let calls = driver.calls_since(mark);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "blend_func_separate_i");
        assert_eq!(calls[0].args[0], 1);
        assert_eq!(calls[0].args[2], i64::from(glow::ONE));
    }
}
