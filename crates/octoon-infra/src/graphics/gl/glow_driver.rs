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

//! [`GlDriver`] over a live `glow` context.
//!
//! Every method is a thin wrapper around one or two `glow` calls. Direct
//! state access entry points are emulated by binding the object to a scratch
//! bind point, issuing the classic call, and restoring the previous binding.
//! NV unified-memory entry points have no `glow` binding; they log and do
//! nothing, and the extension is hidden from [`GlDriver::extensions`] so the
//! device never selects that path.
//!
//! All calls require the context to be current on the calling thread. The
//! swapchain that owns the context is responsible for that.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use glow::{CompressedPixelUnpackData, HasContext, PixelPackData, PixelUnpackData};

use super::driver::{
    ActiveBlock, ActiveBlockMember, ActiveVariable, DebugMessage, GlDriver, UniformData,
};
use super::ext;

fn buffer(name: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn texture(name: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn sampler(name: u32) -> Option<glow::NativeSampler> {
    NonZeroU32::new(name).map(glow::NativeSampler)
}

fn framebuffer(name: u32) -> Option<glow::NativeFramebuffer> {
    NonZeroU32::new(name).map(glow::NativeFramebuffer)
}

fn shader(name: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn program(name: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

fn vertex_array(name: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn created<T>(what: &str, result: Result<T, String>, name: impl FnOnce(T) -> u32) -> u32 {
    match result {
        Ok(handle) => name(handle),
        Err(err) => {
            log::error!("GlowDriver: {what} failed: {err}");
            0
        }
    }
}

fn texture_binding_query(target: u32) -> u32 {
    match target {
        glow::TEXTURE_2D_ARRAY => glow::TEXTURE_BINDING_2D_ARRAY,
        glow::TEXTURE_3D => glow::TEXTURE_BINDING_3D,
        glow::TEXTURE_CUBE_MAP => glow::TEXTURE_BINDING_CUBE_MAP,
        glow::TEXTURE_CUBE_MAP_ARRAY => glow::TEXTURE_BINDING_CUBE_MAP_ARRAY,
        glow::TEXTURE_2D_MULTISAMPLE => glow::TEXTURE_BINDING_2D_MULTISAMPLE,
        glow::TEXTURE_2D_MULTISAMPLE_ARRAY => glow::TEXTURE_BINDING_2D_MULTISAMPLE_ARRAY,
        _ => glow::TEXTURE_BINDING_2D,
    }
}

/// Messages kept between two drains. Older ones are dropped first.
const DEBUG_LOG_CAPACITY: usize = 1024;

/// Byte size of one `DrawArraysIndirectCommand`.
const DRAW_ARRAYS_COMMAND_SIZE: i32 = 16;

/// Byte size of one `DrawElementsIndirectCommand`.
const DRAW_ELEMENTS_COMMAND_SIZE: i32 = 20;

type DebugLog = Arc<Mutex<Vec<DebugMessage>>>;

fn push_debug_message(log: &DebugLog, message: DebugMessage) {
    if let Ok(mut queue) = log.lock() {
        if queue.len() == DEBUG_LOG_CAPACITY {
            queue.remove(0);
        }
        queue.push(message);
    }
}

fn take_debug_messages(log: &DebugLog) -> Vec<DebugMessage> {
    log.lock()
        .map(|mut queue| std::mem::take(&mut *queue))
        .unwrap_or_default()
}

/// Byte offsets of `draw_count` indirect commands. A zero stride means
/// tightly packed commands of `command_size` bytes.
fn indirect_offsets(
    offset: usize,
    draw_count: i32,
    stride: i32,
    command_size: i32,
) -> impl Iterator<Item = i32> {
    let stride = if stride == 0 { command_size } else { stride };
    (0..draw_count.max(0)).map(move |draw| offset as i32 + draw * stride)
}

/// The production driver.
pub struct GlowDriver {
    gl: glow::Context,
    texture_targets: RefCell<HashMap<u32, u32>>,
    scratch_framebuffer: Cell<u32>,
    debug_log: DebugLog,
}

impl fmt::Debug for GlowDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowDriver")
            .field("textures", &self.texture_targets.borrow().len())
            .finish_non_exhaustive()
    }
}

impl GlowDriver {
    /// Wraps an existing `glow` context. When the context supports debug
    /// output, a callback is installed that queues messages for
    /// [`GlDriver::drain_debug_messages`].
    pub fn new(mut gl: glow::Context) -> Self {
        let debug_log = DebugLog::default();
        if gl.supports_debug() {
            let queue = Arc::clone(&debug_log);
            let callback = move |_source: u32, _ty: u32, id: u32, severity: u32, text: &str| {
                let text = text.to_owned();
                push_debug_message(&queue, DebugMessage { id, severity, text });
            };
            unsafe { gl.debug_message_callback(callback) };
        } else {
            log::debug!("GlowDriver: Context has no debug output, messages will not be drained");
        }

        Self {
            gl,
            texture_targets: RefCell::new(HashMap::new()),
            scratch_framebuffer: Cell::new(0),
            debug_log,
        }
    }

    /// Loads GL entry points through `loader`.
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread and `loader` must
    /// return valid function pointers for it.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::ffi::c_void,
    {
        Self::new(glow::Context::from_loader_function(loader))
    }

    /// The wrapped context, for interop with other `glow` code.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn target_of(&self, name: u32) -> u32 {
        self.texture_targets
            .borrow()
            .get(&name)
            .copied()
            .unwrap_or(glow::TEXTURE_2D)
    }

    /// Binds `name` to its own target on the active unit for the duration of `f`.
    fn with_texture<R>(&self, name: u32, f: impl FnOnce(&glow::Context, u32) -> R) -> R {
        let target = self.target_of(name);
        unsafe {
            let previous = self.gl.get_parameter_i32(texture_binding_query(target)) as u32;
            self.gl.bind_texture(target, texture(name));
            let out = f(&self.gl, target);
            self.gl.bind_texture(target, texture(previous));
            out
        }
    }

    /// Binds `name` to `COPY_WRITE_BUFFER` for the duration of `f`.
    fn with_buffer<R>(&self, name: u32, f: impl FnOnce(&glow::Context, u32) -> R) -> R {
        unsafe {
            let previous = self.gl.get_parameter_i32(glow::COPY_WRITE_BUFFER_BINDING) as u32;
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, buffer(name));
            let out = f(&self.gl, glow::COPY_WRITE_BUFFER);
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, buffer(previous));
            out
        }
    }

    /// Binds `name` as the draw framebuffer for the duration of `f`.
    fn with_framebuffer<R>(&self, name: u32, f: impl FnOnce(&glow::Context) -> R) -> R {
        unsafe {
            let previous = self.gl.get_parameter_i32(glow::DRAW_FRAMEBUFFER_BINDING) as u32;
            self.gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, framebuffer(name));
            let out = f(&self.gl);
            self.gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, framebuffer(previous));
            out
        }
    }

    fn map_range(&self, target: u32, offset: usize, length: usize, access: u32) -> Option<Vec<u8>> {
        unsafe {
            let ptr = self
                .gl
                .map_buffer_range(target, offset as i32, length as i32, access);
            if ptr.is_null() {
                return None;
            }
            Some(std::slice::from_raw_parts(ptr, length).to_vec())
        }
    }

    fn unavailable(&self, call: &str) {
        log::warn!("GlowDriver: {call} is not available through glow; call ignored.");
    }
}

#[allow(clippy::too_many_arguments)]
impl GlDriver for GlowDriver {
    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn get_integer(&self, pname: u32) -> i32 {
        unsafe { self.gl.get_parameter_i32(pname) }
    }

    fn get_float(&self, pname: u32) -> f32 {
        unsafe { self.gl.get_parameter_f32(pname) }
    }

    fn get_float_range(&self, pname: u32) -> [f32; 2] {
        let mut range = [0.0; 2];
        unsafe { self.gl.get_parameter_f32_slice(pname, &mut range) };
        range
    }

    fn get_string(&self, pname: u32) -> String {
        unsafe { self.gl.get_parameter_string(pname) }
    }

    fn extensions(&self) -> Vec<String> {
        self.gl
            .supported_extensions()
            .iter()
            .filter(|name| name.as_str() != ext::NV_VERTEX_BUFFER_UNIFIED_MEMORY)
            .cloned()
            .collect()
    }

    fn enable(&self, cap: u32) {
        unsafe { self.gl.enable(cap) }
    }

    fn disable(&self, cap: u32) {
        unsafe { self.gl.disable(cap) }
    }

    fn enable_i(&self, cap: u32, index: u32) {
        unsafe { self.gl.enable_draw_buffer(cap, index) }
    }

    fn disable_i(&self, cap: u32, index: u32) {
        unsafe { self.gl.disable_draw_buffer(cap, index) }
    }

    fn cull_face(&self, mode: u32) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn front_face(&self, mode: u32) {
        unsafe { self.gl.front_face(mode) }
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        unsafe { self.gl.polygon_mode(face, mode) }
    }

    fn line_width(&self, width: f32) {
        unsafe { self.gl.line_width(width) }
    }

    fn depth_func(&self, func: u32) {
        unsafe { self.gl.depth_func(func) }
    }

    fn depth_mask(&self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) }
    }

    fn polygon_offset(&self, factor: f32, units: f32) {
        unsafe { self.gl.polygon_offset(factor, units) }
    }

    fn blend_func_separate_i(&self, buf: u32, src_rgb: u32, dst_rgb: u32, src_a: u32, dst_a: u32) {
        unsafe {
            self.gl
                .blend_func_separate_draw_buffer(buf, src_rgb, dst_rgb, src_a, dst_a)
        }
    }

    fn blend_equation_separate_i(&self, buf: u32, mode_rgb: u32, mode_a: u32) {
        unsafe { self.gl.blend_equation_separate_draw_buffer(buf, mode_rgb, mode_a) }
    }

    fn color_mask_i(&self, buf: u32, r: bool, g: bool, b: bool, a: bool) {
        unsafe { self.gl.color_mask_draw_buffer(buf, r, g, b, a) }
    }

    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool) {
        unsafe { self.gl.color_mask(r, g, b, a) }
    }

    fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32) {
        unsafe { self.gl.stencil_func_separate(face, func, reference, mask) }
    }

    fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, pass: u32) {
        unsafe { self.gl.stencil_op_separate(face, fail, depth_fail, pass) }
    }

    fn stencil_mask_separate(&self, face: u32, mask: u32) {
        unsafe { self.gl.stencil_mask_separate(face, mask) }
    }

    fn viewport_indexed(&self, index: u32, rect: [f32; 4]) {
        unsafe { self.gl.viewport_f32_slice(index, 1, &[rect]) }
    }

    fn depth_range_indexed(&self, index: u32, near: f64, far: f64) {
        unsafe { self.gl.depth_range_f64_slice(index, 1, &[[near, far]]) }
    }

    fn scissor_indexed(&self, index: u32, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor_slice(index, 1, &[[x, y, width, height]]) }
    }

    fn pixel_store_i(&self, pname: u32, value: i32) {
        unsafe { self.gl.pixel_store_i32(pname, value) }
    }

    // --- Buffers ---

    fn gen_buffer(&self) -> u32 {
        created("create_buffer", unsafe { self.gl.create_buffer() }, |b| b.0.get())
    }

    fn delete_buffer(&self, name: u32) {
        if let Some(handle) = buffer(name) {
            unsafe { self.gl.delete_buffer(handle) }
        }
    }

    fn bind_buffer(&self, target: u32, name: u32) {
        unsafe { self.gl.bind_buffer(target, buffer(name)) }
    }

    fn bind_buffer_base(&self, target: u32, index: u32, name: u32) {
        unsafe { self.gl.bind_buffer_base(target, index, buffer(name)) }
    }

    fn buffer_data(&self, target: u32, size: usize, data: Option<&[u8]>, usage: u32) {
        unsafe {
            match data {
                Some(bytes) if bytes.len() == size => {
                    self.gl.buffer_data_u8_slice(target, bytes, usage)
                }
                Some(bytes) => {
                    self.gl.buffer_data_size(target, size as i32, usage);
                    let len = bytes.len().min(size);
                    self.gl.buffer_sub_data_u8_slice(target, 0, &bytes[..len]);
                }
                None => self.gl.buffer_data_size(target, size as i32, usage),
            }
        }
    }

    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset as i32, data) }
    }

    fn map_buffer_range(
        &self,
        target: u32,
        offset: usize,
        length: usize,
        access: u32,
    ) -> Option<Vec<u8>> {
        self.map_range(target, offset, length, access)
    }

    fn unmap_buffer(&self, target: u32) -> bool {
        unsafe { self.gl.unmap_buffer(target) };
        true
    }

    fn create_buffer(&self) -> u32 {
        self.gen_buffer()
    }

    fn named_buffer_storage(&self, name: u32, size: usize, data: Option<&[u8]>, flags: u32) {
        let padded = data.filter(|bytes| bytes.len() < size).map(|bytes| {
            let mut padded = bytes.to_vec();
            padded.resize(size, 0);
            padded
        });
        let contents = padded.as_deref().or(data);
        self.with_buffer(name, |gl, target| unsafe {
            gl.buffer_storage(target, size as i32, contents, flags)
        })
    }

    fn named_buffer_sub_data(&self, name: u32, offset: usize, data: &[u8]) {
        self.with_buffer(name, |gl, target| unsafe {
            gl.buffer_sub_data_u8_slice(target, offset as i32, data)
        })
    }

    fn map_named_buffer_range(
        &self,
        name: u32,
        offset: usize,
        length: usize,
        access: u32,
    ) -> Option<Vec<u8>> {
        self.with_buffer(name, |_, target| self.map_range(target, offset, length, access))
    }

    fn unmap_named_buffer(&self, name: u32) -> bool {
        self.with_buffer(name, |gl, target| unsafe { gl.unmap_buffer(target) });
        true
    }

    // --- Textures ---

    fn gen_texture(&self) -> u32 {
        created("create_texture", unsafe { self.gl.create_texture() }, |t| t.0.get())
    }

    fn delete_texture(&self, name: u32) {
        self.texture_targets.borrow_mut().remove(&name);
        if let Some(handle) = texture(name) {
            unsafe { self.gl.delete_texture(handle) }
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, target: u32, name: u32) {
        if name != 0 {
            self.texture_targets.borrow_mut().insert(name, target);
        }
        unsafe { self.gl.bind_texture(target, texture(name)) }
    }

    fn tex_parameter_i(&self, target: u32, pname: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, pname, value) }
    }

    fn tex_parameter_f(&self, target: u32, pname: u32, value: f32) {
        unsafe { self.gl.tex_parameter_f32(target, pname, value) }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal: u32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) {
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal as i32,
                width,
                height,
                0,
                format,
                ty,
                PixelUnpackData::Slice(data),
            )
        }
    }

    fn tex_image_3d(
        &self,
        target: u32,
        level: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) {
        unsafe {
            self.gl.tex_image_3d(
                target,
                level,
                internal as i32,
                width,
                height,
                depth,
                0,
                format,
                ty,
                PixelUnpackData::Slice(data),
            )
        }
    }

    fn tex_image_2d_multisample(
        &self,
        target: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        fixed: bool,
    ) {
        unsafe {
            self.gl.tex_image_2d_multisample(
                target,
                samples,
                internal as i32,
                width,
                height,
                fixed,
            )
        }
    }

    fn tex_image_3d_multisample(
        &self,
        _target: u32,
        _samples: i32,
        _internal: u32,
        _width: i32,
        _height: i32,
        _depth: i32,
        _fixed: bool,
    ) {
        self.unavailable("glTexImage3DMultisample");
    }

    fn tex_sub_image_2d(
        &self,
        target: u32,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        unsafe {
            self.gl.tex_sub_image_2d(
                target,
                level,
                x,
                y,
                width,
                height,
                format,
                ty,
                PixelUnpackData::Slice(Some(data)),
            )
        }
    }

    fn tex_sub_image_3d(
        &self,
        target: u32,
        level: i32,
        x: i32,
        y: i32,
        z: i32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        unsafe {
            self.gl.tex_sub_image_3d(
                target,
                level,
                x,
                y,
                z,
                width,
                height,
                depth,
                format,
                ty,
                PixelUnpackData::Slice(Some(data)),
            )
        }
    }

    fn compressed_tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal: u32,
        width: i32,
        height: i32,
        data: &[u8],
    ) {
        unsafe {
            self.gl.compressed_tex_image_2d(
                target,
                level,
                internal as i32,
                width,
                height,
                0,
                data.len() as i32,
                data,
            )
        }
    }

    fn compressed_tex_image_3d(
        &self,
        target: u32,
        level: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
        data: &[u8],
    ) {
        unsafe {
            self.gl.compressed_tex_image_3d(
                target,
                level,
                internal as i32,
                width,
                height,
                depth,
                0,
                data.len() as i32,
                data,
            )
        }
    }

    fn get_tex_image(&self, target: u32, level: i32, format: u32, ty: u32, offset: usize) {
        unsafe {
            self.gl.get_tex_image(
                target,
                level,
                format,
                ty,
                PixelPackData::BufferOffset(offset as u32),
            )
        }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { self.gl.generate_mipmap(target) }
    }

    fn create_texture(&self, target: u32) -> u32 {
        let name = self.gen_texture();
        if name != 0 {
            self.texture_targets.borrow_mut().insert(name, target);
        }
        name
    }

    fn texture_parameter_i(&self, name: u32, pname: u32, value: i32) {
        self.with_texture(name, |gl, target| unsafe {
            gl.tex_parameter_i32(target, pname, value)
        })
    }

    fn texture_parameter_f(&self, name: u32, pname: u32, value: f32) {
        self.with_texture(name, |gl, target| unsafe {
            gl.tex_parameter_f32(target, pname, value)
        })
    }

    fn texture_storage_2d(&self, name: u32, levels: i32, internal: u32, width: i32, height: i32) {
        self.with_texture(name, |gl, target| unsafe {
            gl.tex_storage_2d(target, levels, internal, width, height)
        })
    }

    fn texture_storage_3d(
        &self,
        name: u32,
        levels: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        self.with_texture(name, |gl, target| unsafe {
            gl.tex_storage_3d(target, levels, internal, width, height, depth)
        })
    }

    fn texture_storage_2d_multisample(
        &self,
        name: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        fixed: bool,
    ) {
        self.with_texture(name, |gl, target| unsafe {
            gl.tex_storage_2d_multisample(target, samples, internal, width, height, fixed)
        })
    }

    fn texture_storage_3d_multisample(
        &self,
        _name: u32,
        _samples: i32,
        _internal: u32,
        _width: i32,
        _height: i32,
        _depth: i32,
        _fixed: bool,
    ) {
        self.unavailable("glTextureStorage3DMultisample");
    }

    fn texture_sub_image_2d(
        &self,
        name: u32,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        self.with_texture(name, |gl, target| unsafe {
            gl.tex_sub_image_2d(
                target,
                level,
                x,
                y,
                width,
                height,
                format,
                ty,
                PixelUnpackData::Slice(Some(data)),
            )
        })
    }

    fn texture_sub_image_3d(
        &self,
        name: u32,
        level: i32,
        x: i32,
        y: i32,
        z: i32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        self.with_texture(name, |gl, target| unsafe {
            if target == glow::TEXTURE_CUBE_MAP {
                // Named access treats the six faces as layers.
                let slice = data.len() / depth.max(1) as usize;
                for (layer, face) in data.chunks(slice.max(1)).enumerate() {
                    let face_target = glow::TEXTURE_CUBE_MAP_POSITIVE_X + (z as u32) + layer as u32;
                    gl.tex_sub_image_2d(
                        face_target,
                        level,
                        x,
                        y,
                        width,
                        height,
                        format,
                        ty,
                        PixelUnpackData::Slice(Some(face)),
                    );
                }
            } else {
                gl.tex_sub_image_3d(
                    target,
                    level,
                    x,
                    y,
                    z,
                    width,
                    height,
                    depth,
                    format,
                    ty,
                    PixelUnpackData::Slice(Some(data)),
                )
            }
        })
    }

    fn compressed_texture_sub_image_2d(
        &self,
        name: u32,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        internal: u32,
        data: &[u8],
    ) {
        self.with_texture(name, |gl, target| unsafe {
            gl.compressed_tex_sub_image_2d(
                target,
                level,
                x,
                y,
                width,
                height,
                internal,
                CompressedPixelUnpackData::Slice(data),
            )
        })
    }

    fn compressed_texture_sub_image_3d(
        &self,
        name: u32,
        level: i32,
        x: i32,
        y: i32,
        z: i32,
        width: i32,
        height: i32,
        depth: i32,
        internal: u32,
        data: &[u8],
    ) {
        self.with_texture(name, |gl, target| unsafe {
            if target == glow::TEXTURE_CUBE_MAP {
                let slice = data.len() / depth.max(1) as usize;
                for (layer, face) in data.chunks(slice.max(1)).enumerate() {
                    let face_target = glow::TEXTURE_CUBE_MAP_POSITIVE_X + (z as u32) + layer as u32;
                    gl.compressed_tex_sub_image_2d(
                        face_target,
                        level,
                        x,
                        y,
                        width,
                        height,
                        internal,
                        CompressedPixelUnpackData::Slice(face),
                    );
                }
            } else {
                gl.compressed_tex_sub_image_3d(
                    target,
                    level,
                    x,
                    y,
                    z,
                    width,
                    height,
                    depth,
                    internal,
                    CompressedPixelUnpackData::Slice(data),
                )
            }
        })
    }

    fn get_texture_sub_image(
        &self,
        name: u32,
        level: i32,
        x: i32,
        y: i32,
        z: i32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        ty: u32,
        offset: usize,
    ) {
        // Read through a scratch framebuffer, one layer at a time.
        let target = self.target_of(name);
        let attachment = match format {
            glow::DEPTH_COMPONENT => glow::DEPTH_ATTACHMENT,
            glow::DEPTH_STENCIL => glow::DEPTH_STENCIL_ATTACHMENT,
            glow::STENCIL_INDEX => glow::STENCIL_ATTACHMENT,
            _ => glow::COLOR_ATTACHMENT0,
        };
        let mut scratch = self.scratch_framebuffer.get();
        if scratch == 0 {
            scratch = created("create_framebuffer", unsafe { self.gl.create_framebuffer() }, |f| {
                f.0.get()
            });
            self.scratch_framebuffer.set(scratch);
        }

        unsafe {
            let previous = self.gl.get_parameter_i32(glow::READ_FRAMEBUFFER_BINDING) as u32;
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, framebuffer(scratch));
            let layer_size = super::types::format_num(format, ty) as usize
                * width.max(0) as usize
                * height.max(0) as usize;
            for layer in 0..depth.max(1) {
                let layer_index = z + layer;
                match target {
                    glow::TEXTURE_2D | glow::TEXTURE_2D_MULTISAMPLE => {
                        self.gl.framebuffer_texture_2d(
                            glow::READ_FRAMEBUFFER,
                            attachment,
                            target,
                            texture(name),
                            level,
                        )
                    }
                    glow::TEXTURE_CUBE_MAP => self.gl.framebuffer_texture_2d(
                        glow::READ_FRAMEBUFFER,
                        attachment,
                        glow::TEXTURE_CUBE_MAP_POSITIVE_X + layer_index as u32,
                        texture(name),
                        level,
                    ),
                    _ => self.gl.framebuffer_texture_layer(
                        glow::READ_FRAMEBUFFER,
                        attachment,
                        texture(name),
                        level,
                        layer_index,
                    ),
                }
                if attachment == glow::COLOR_ATTACHMENT0 {
                    self.gl.read_buffer(glow::COLOR_ATTACHMENT0);
                }
                let at = offset + layer as usize * layer_size;
                self.gl.read_pixels(
                    x,
                    y,
                    width,
                    height,
                    format,
                    ty,
                    PixelPackData::BufferOffset(at as u32),
                );
            }
            self.gl.framebuffer_texture_2d(
                glow::READ_FRAMEBUFFER,
                attachment,
                glow::TEXTURE_2D,
                None,
                0,
            );
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, framebuffer(previous));
        }
    }

    fn generate_texture_mipmap(&self, name: u32) {
        self.with_texture(name, |gl, target| unsafe { gl.generate_mipmap(target) })
    }

    fn bind_texture_unit(&self, unit: u32, name: u32) {
        let target = self.target_of(name);
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(target, texture(name));
        }
    }

    // --- Samplers ---

    fn gen_sampler(&self) -> u32 {
        created("create_sampler", unsafe { self.gl.create_sampler() }, |s| s.0.get())
    }

    fn delete_sampler(&self, name: u32) {
        if let Some(handle) = sampler(name) {
            unsafe { self.gl.delete_sampler(handle) }
        }
    }

    fn sampler_parameter_i(&self, name: u32, pname: u32, value: i32) {
        if let Some(handle) = sampler(name) {
            unsafe { self.gl.sampler_parameter_i32(handle, pname, value) }
        }
    }

    fn sampler_parameter_f(&self, name: u32, pname: u32, value: f32) {
        if let Some(handle) = sampler(name) {
            unsafe { self.gl.sampler_parameter_f32(handle, pname, value) }
        }
    }

    fn bind_sampler(&self, unit: u32, name: u32) {
        unsafe { self.gl.bind_sampler(unit, sampler(name)) }
    }

    // --- Framebuffers ---

    fn gen_framebuffer(&self) -> u32 {
        created("create_framebuffer", unsafe { self.gl.create_framebuffer() }, |f| f.0.get())
    }

    fn delete_framebuffer(&self, name: u32) {
        if let Some(handle) = framebuffer(name) {
            unsafe { self.gl.delete_framebuffer(handle) }
        }
    }

    fn bind_framebuffer(&self, target: u32, name: u32) {
        unsafe { self.gl.bind_framebuffer(target, framebuffer(name)) }
    }

    fn framebuffer_texture(&self, target: u32, attachment: u32, name: u32, level: i32) {
        unsafe {
            self.gl
                .framebuffer_texture(target, attachment, texture(name), level)
        }
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        name: u32,
        level: i32,
    ) {
        unsafe {
            self.gl.framebuffer_texture_2d(target, attachment, tex_target, texture(name), level)
        }
    }

    fn framebuffer_texture_3d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        name: u32,
        level: i32,
        layer: i32,
    ) {
        unsafe {
            self.gl.framebuffer_texture_3d(
                target,
                attachment,
                tex_target,
                texture(name),
                level,
                layer,
            )
        }
    }

    fn framebuffer_texture_layer(
        &self,
        target: u32,
        attachment: u32,
        name: u32,
        level: i32,
        layer: i32,
    ) {
        unsafe {
            self.gl.framebuffer_texture_layer(target, attachment, texture(name), level, layer)
        }
    }

    fn draw_buffers(&self, buffers: &[u32]) {
        unsafe { self.gl.draw_buffers(buffers) }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn create_framebuffer(&self) -> u32 {
        self.gen_framebuffer()
    }

    fn named_framebuffer_texture(
        &self,
        name: u32,
        attachment: u32,
        tex: u32,
        level: i32,
    ) {
        self.with_framebuffer(name, |gl| unsafe {
            gl.framebuffer_texture(glow::DRAW_FRAMEBUFFER, attachment, texture(tex), level)
        })
    }

    fn named_framebuffer_texture_layer(
        &self,
        name: u32,
        attachment: u32,
        tex: u32,
        level: i32,
        layer: i32,
    ) {
        self.with_framebuffer(name, |gl| unsafe {
            gl.framebuffer_texture_layer(
                glow::DRAW_FRAMEBUFFER,
                attachment,
                texture(tex),
                level,
                layer,
            )
        })
    }

    fn named_framebuffer_draw_buffers(&self, name: u32, buffers: &[u32]) {
        self.with_framebuffer(name, |gl| unsafe { gl.draw_buffers(buffers) })
    }

    fn check_named_framebuffer_status(&self, name: u32, _target: u32) -> u32 {
        self.with_framebuffer(name, |gl| unsafe {
            gl.check_framebuffer_status(glow::DRAW_FRAMEBUFFER)
        })
    }

    fn clear_buffer_fv(&self, target: u32, draw_buffer: i32, values: &[f32]) {
        unsafe { self.gl.clear_buffer_f32_slice(target, draw_buffer as u32, values) }
    }

    fn clear_buffer_iv(&self, target: u32, draw_buffer: i32, values: &[i32]) {
        unsafe { self.gl.clear_buffer_i32_slice(target, draw_buffer as u32, values) }
    }

    fn clear_buffer_fi(&self, target: u32, draw_buffer: i32, depth: f32, stencil: i32) {
        unsafe { self.gl.clear_buffer_depth_stencil(target, draw_buffer as u32, depth, stencil) }
    }

    fn invalidate_framebuffer(&self, target: u32, attachments: &[u32]) {
        unsafe { self.gl.invalidate_framebuffer(target, attachments) }
    }

    fn blit_framebuffer(&self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        unsafe {
            self.gl.blit_framebuffer(
                src[0], src[1], src[2], src[3], dst[0], dst[1], dst[2], dst[3], mask, filter,
            )
        }
    }

    fn read_buffer(&self, src: u32) {
        unsafe { self.gl.read_buffer(src) }
    }

    fn copy_tex_sub_image_2d(
        &self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        unsafe {
            self.gl.copy_tex_sub_image_2d(
                target, level, x_offset, y_offset, x, y, width, height,
            )
        }
    }

    fn copy_texture_sub_image_2d(
        &self,
        name: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        self.with_texture(name, |gl, target| unsafe {
            gl.copy_tex_sub_image_2d(target, level, x_offset, y_offset, x, y, width, height)
        })
    }

    fn copy_texture_sub_image_3d(
        &self,
        name: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        z_offset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        self.with_texture(name, |gl, target| unsafe {
            if target == glow::TEXTURE_CUBE_MAP {
                let face = glow::TEXTURE_CUBE_MAP_POSITIVE_X + z_offset as u32;
                gl.copy_tex_sub_image_2d(face, level, x_offset, y_offset, x, y, width, height)
            } else {
                gl.copy_tex_sub_image_3d(
                    target, level, x_offset, y_offset, z_offset, x, y, width, height,
                )
            }
        })
    }

    // --- Shaders and programs ---

    fn create_shader(&self, ty: u32) -> u32 {
        created("create_shader", unsafe { self.gl.create_shader(ty) }, |s| s.0.get())
    }

    fn shader_source(&self, name: u32, source: &str) {
        if let Some(handle) = shader(name) {
            unsafe { self.gl.shader_source(handle, source) }
        }
    }

    fn compile_shader(&self, name: u32) {
        if let Some(handle) = shader(name) {
            unsafe { self.gl.compile_shader(handle) }
        }
    }

    fn shader_compile_status(&self, name: u32) -> bool {
        shader(name).is_some_and(|handle| unsafe { self.gl.get_shader_compile_status(handle) })
    }

    fn shader_info_log(&self, name: u32) -> String {
        shader(name)
            .map(|handle| unsafe { self.gl.get_shader_info_log(handle) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, name: u32) {
        if let Some(handle) = shader(name) {
            unsafe { self.gl.delete_shader(handle) }
        }
    }

    fn create_program(&self) -> u32 {
        created("create_program", unsafe { self.gl.create_program() }, |p| p.0.get())
    }

    fn attach_shader(&self, prog: u32, name: u32) {
        if let (Some(p), Some(s)) = (program(prog), shader(name)) {
            unsafe { self.gl.attach_shader(p, s) }
        }
    }

    fn link_program(&self, prog: u32) {
        if let Some(p) = program(prog) {
            unsafe { self.gl.link_program(p) }
        }
    }

    fn program_link_status(&self, prog: u32) -> bool {
        program(prog).is_some_and(|p| unsafe { self.gl.get_program_link_status(p) })
    }

    fn program_info_log(&self, prog: u32) -> String {
        program(prog)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn delete_program(&self, prog: u32) {
        if let Some(p) = program(prog) {
            unsafe { self.gl.delete_program(p) }
        }
    }

    fn use_program(&self, prog: u32) {
        unsafe { self.gl.use_program(program(prog)) }
    }

    fn active_attributes(&self, prog: u32) -> Vec<ActiveVariable> {
        let Some(p) = program(prog) else {
            return Vec::new();
        };
        unsafe {
            (0..self.gl.get_active_attributes(p))
                .filter_map(|index| self.gl.get_active_attribute(p, index))
                .map(|attribute| ActiveVariable {
                    name: attribute.name,
                    gl_type: attribute.atype,
                    size: attribute.size,
                })
                .collect()
        }
    }

    fn attrib_location(&self, prog: u32, name: &str) -> Option<u32> {
        let p = program(prog)?;
        unsafe { self.gl.get_attrib_location(p, name) }
    }

    fn active_uniforms(&self, prog: u32) -> Vec<ActiveVariable> {
        let Some(p) = program(prog) else {
            return Vec::new();
        };
        unsafe {
            let indices: Vec<u32> = (0..self.gl.get_active_uniforms(p)).collect();
            let blocks =
                self.gl.get_active_uniforms_parameter(p, &indices, glow::UNIFORM_BLOCK_INDEX);
            indices
                .into_iter()
                .zip(blocks)
                .filter(|(_, block)| *block < 0)
                .filter_map(|(index, _)| self.gl.get_active_uniform(p, index))
                .map(|uniform| ActiveVariable {
                    name: uniform.name,
                    gl_type: uniform.utype,
                    size: uniform.size,
                })
                .collect()
        }
    }

    fn uniform_location(&self, prog: u32, name: &str) -> Option<i32> {
        let p = program(prog)?;
        unsafe { self.gl.get_uniform_location(p, name) }.map(|location| location.0 as i32)
    }

    fn active_uniform_blocks(&self, prog: u32) -> Vec<ActiveBlock> {
        let Some(p) = program(prog) else {
            return Vec::new();
        };
        unsafe {
            let count = self.gl.get_program_parameter_i32(p, glow::ACTIVE_UNIFORM_BLOCKS) as u32;
            (0..count)
                .map(|index| {
                    let name = self.gl.get_active_uniform_block_name(p, index);
                    let data_size = self.gl.get_active_uniform_block_parameter_i32(
                        p,
                        index,
                        glow::UNIFORM_BLOCK_DATA_SIZE,
                    );
                    let member_count = self.gl.get_active_uniform_block_parameter_i32(
                        p,
                        index,
                        glow::UNIFORM_BLOCK_ACTIVE_UNIFORMS,
                    );
                    let mut raw = vec![0i32; member_count.max(0) as usize];
                    self.gl.get_active_uniform_block_parameter_i32_slice(
                        p,
                        index,
                        glow::UNIFORM_BLOCK_ACTIVE_UNIFORM_INDICES,
                        &mut raw,
                    );
                    let ids: Vec<u32> = raw.iter().map(|id| *id as u32).collect();
                    let offsets =
                        self.gl.get_active_uniforms_parameter(p, &ids, glow::UNIFORM_OFFSET);
                    let mut members: Vec<ActiveBlockMember> = ids
                        .into_iter()
                        .zip(offsets)
                        .filter_map(|(id, offset)| {
                            self.gl.get_active_uniform(p, id).map(|u| ActiveBlockMember {
                                name: u.name,
                                gl_type: u.utype,
                                offset,
                            })
                        })
                        .collect();
                    members.sort_by_key(|member| member.offset);
                    ActiveBlock {
                        name,
                        index,
                        data_size,
                        members,
                    }
                })
                .collect()
        }
    }

    fn uniform_block_binding(&self, prog: u32, index: u32, binding: u32) {
        if let Some(p) = program(prog) {
            unsafe { self.gl.uniform_block_binding(p, index, binding) }
        }
    }

    fn program_uniform(&self, prog: u32, location: i32, data: UniformData<'_>) {
        let at = glow::NativeUniformLocation(location as u32);
        let at = Some(&at);
        unsafe {
            let previous = self.gl.get_parameter_i32(glow::CURRENT_PROGRAM) as u32;
            if previous != prog {
                self.gl.use_program(program(prog));
            }
            match data {
                UniformData::I32 { components, values } => match components {
                    1 => self.gl.uniform_1_i32_slice(at, values),
                    2 => self.gl.uniform_2_i32_slice(at, values),
                    3 => self.gl.uniform_3_i32_slice(at, values),
                    _ => self.gl.uniform_4_i32_slice(at, values),
                },
                UniformData::U32 { components, values } => match components {
                    1 => self.gl.uniform_1_u32_slice(at, values),
                    2 => self.gl.uniform_2_u32_slice(at, values),
                    3 => self.gl.uniform_3_u32_slice(at, values),
                    _ => self.gl.uniform_4_u32_slice(at, values),
                },
                UniformData::F32 { components, values } => match components {
                    1 => self.gl.uniform_1_f32_slice(at, values),
                    2 => self.gl.uniform_2_f32_slice(at, values),
                    3 => self.gl.uniform_3_f32_slice(at, values),
                    _ => self.gl.uniform_4_f32_slice(at, values),
                },
                UniformData::Mat { dim, values } => match dim {
                    2 => self.gl.uniform_matrix_2_f32_slice(at, false, values),
                    3 => self.gl.uniform_matrix_3_f32_slice(at, false, values),
                    _ => self.gl.uniform_matrix_4_f32_slice(at, false, values),
                },
            }
            if previous != prog {
                self.gl.use_program(program(previous));
            }
        }
    }

    // --- Vertex arrays ---

    fn create_vertex_array(&self) -> u32 {
        created("create_vertex_array", unsafe { self.gl.create_vertex_array() }, |v| {
            v.0.get()
        })
    }

    fn bind_vertex_array(&self, vao: u32) {
        unsafe { self.gl.bind_vertex_array(vertex_array(vao)) }
    }

    fn delete_vertex_array(&self, vao: u32) {
        if let Some(handle) = vertex_array(vao) {
            unsafe { self.gl.delete_vertex_array(handle) }
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, ty, normalized, stride, offset as i32)
        }
    }

    fn vertex_attrib_i_pointer(&self, index: u32, size: i32, ty: u32, stride: i32, offset: usize) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_i32(index, size, ty, stride, offset as i32)
        }
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(index, divisor) }
    }

    fn vertex_attrib_format(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        relative_offset: u32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_format_f32(index, size, ty, normalized, relative_offset)
        }
    }

    fn vertex_attrib_i_format(&self, index: u32, size: i32, ty: u32, relative_offset: u32) {
        unsafe {
            self.gl
                .vertex_attrib_format_i32(index, size, ty, relative_offset)
        }
    }

    fn vertex_attrib_binding(&self, index: u32, binding: u32) {
        unsafe { self.gl.vertex_attrib_binding(index, binding) }
    }

    fn bind_vertex_buffer(&self, binding: u32, name: u32, offset: usize, stride: i32) {
        unsafe {
            self.gl
                .bind_vertex_buffer(binding, buffer(name), offset as i32, stride)
        }
    }

    fn vertex_binding_divisor(&self, binding: u32, divisor: u32) {
        unsafe { self.gl.vertex_binding_divisor(binding, divisor) }
    }

    // --- GL_NV_vertex_buffer_unified_memory ---

    fn enable_client_state(&self, _cap: u32) {
        self.unavailable("glEnableClientState");
    }

    fn disable_client_state(&self, _cap: u32) {
        self.unavailable("glDisableClientState");
    }

    fn buffer_address_range_nv(&self, _pname: u32, _index: u32, _address: u64, _length: usize) {
        self.unavailable("glBufferAddressRangeNV");
    }

    fn vertex_attrib_format_nv(
        &self,
        _index: u32,
        _size: i32,
        _ty: u32,
        _normalized: bool,
        _stride: i32,
    ) {
        self.unavailable("glVertexAttribFormatNV");
    }

    fn make_named_buffer_resident_nv(&self, _buffer: u32, _access: u32) {
        self.unavailable("glMakeNamedBufferResidentNV");
    }

    fn buffer_gpu_address_nv(&self, _buffer: u32) -> u64 {
        self.unavailable("glGetNamedBufferParameterui64vNV");
        0
    }

    // --- Draws ---

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instances: i32) {
        unsafe { self.gl.draw_arrays_instanced(mode, first, count, instances) }
    }

    fn draw_elements_instanced_base_vertex(
        &self,
        mode: u32,
        count: i32,
        ty: u32,
        offset: usize,
        instances: i32,
        base_vertex: i32,
    ) {
        unsafe {
            self.gl.draw_elements_instanced_base_vertex(
                mode,
                count,
                ty,
                offset as i32,
                instances,
                base_vertex,
            )
        }
    }

    fn multi_draw_arrays_indirect(&self, mode: u32, offset: usize, draw_count: i32, stride: i32) {
        for at in indirect_offsets(offset, draw_count, stride, DRAW_ARRAYS_COMMAND_SIZE) {
            unsafe { self.gl.draw_arrays_indirect_offset(mode, at) }
        }
    }

    fn multi_draw_elements_indirect(
        &self,
        mode: u32,
        ty: u32,
        offset: usize,
        draw_count: i32,
        stride: i32,
    ) {
        for at in indirect_offsets(offset, draw_count, stride, DRAW_ELEMENTS_COMMAND_SIZE) {
            unsafe { self.gl.draw_elements_indirect_offset(mode, ty, at) }
        }
    }

    // --- Debug output ---

    fn debug_message_control(
        &self,
        source: u32,
        ty: u32,
        severity: u32,
        ids: &[u32],
        enabled: bool,
    ) {
        unsafe { self.gl.debug_message_control(source, ty, severity, ids, enabled) }
    }

    fn drain_debug_messages(&self) -> Vec<DebugMessage> {
        take_debug_messages(&self.debug_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: u32) -> DebugMessage {
        DebugMessage {
            id,
            severity: glow::DEBUG_SEVERITY_HIGH,
            text: format!("message {id}"),
        }
    }

    #[test]
    fn test_packed_indirect_commands_use_command_size() {
        let arrays: Vec<i32> = indirect_offsets(8, 3, 0, DRAW_ARRAYS_COMMAND_SIZE).collect();
        let elements: Vec<i32> = indirect_offsets(0, 2, 0, DRAW_ELEMENTS_COMMAND_SIZE).collect();

        assert_eq!(arrays, vec![8, 24, 40]);
        assert_eq!(elements, vec![0, 20]);
    }

    #[test]
    fn test_indirect_commands_follow_explicit_stride() {
        let offsets: Vec<i32> = indirect_offsets(4, 3, 32, DRAW_ELEMENTS_COMMAND_SIZE).collect();

        assert_eq!(offsets, vec![4, 36, 68]);
        assert_eq!(indirect_offsets(0, 0, 0, DRAW_ARRAYS_COMMAND_SIZE).count(), 0);
    }

    #[test]
    fn test_debug_messages_drain_once_in_order() {
        // ARRANGE
        let log = DebugLog::default();
        push_debug_message(&log, message(1));
        push_debug_message(&log, message(2));

        // ACT
        let first = take_debug_messages(&log);
        let second = take_debug_messages(&log);

        // ASSERT
        assert_eq!(first, vec![message(1), message(2)]);
        assert!(second.is_empty());
    }

    #[test]
    fn test_debug_log_drops_oldest_when_full() {
        let log = DebugLog::default();
        for id in 0..=DEBUG_LOG_CAPACITY as u32 {
            push_debug_message(&log, message(id));
        }

        let drained = take_debug_messages(&log);

        assert_eq!(drained.len(), DEBUG_LOG_CAPACITY);
        assert_eq!(drained[0].id, 1);
        assert_eq!(drained.last().map(|m| m.id), Some(DEBUG_LOG_CAPACITY as u32));
    }
}
