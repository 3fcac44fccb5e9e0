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

//! A software [`GlDriver`] that records every call and keeps object
//! contents in memory.
//!
//! Clears, uploads, copies and readbacks operate on real bytes so tests can
//! observe what the backend produced. Rasterization is not simulated: draws
//! are recorded and nothing more.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::pixels::{self, Extent, Region, TexelLayout};
use super::reflect;
use crate::graphics::gl::driver::{
    ActiveBlock, ActiveBlockMember, ActiveVariable, DebugMessage, GlDriver, UniformData,
};
use crate::graphics::gl::{ext, types};

/// One recorded driver call. Float arguments are stored as their bit
/// patterns, booleans as 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlCall {
    /// Trait method name, e.g. `"clear_buffer_fv"`.
    pub name: &'static str,
    /// Scalar arguments in declaration order.
    pub args: Vec<i64>,
}

/// The last values pushed to a uniform location.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedUniform {
    /// Signed integer components.
    I32(Vec<i32>),
    /// Unsigned integer components.
    U32(Vec<u32>),
    /// Float components, matrices included.
    F32(Vec<f32>),
}

fn float_arg(value: f32) -> i64 {
    i64::from(value.to_bits())
}

fn bool_arg(value: bool) -> i64 {
    i64::from(value)
}

#[derive(Debug, Default)]
struct Buffer {
    data: Vec<u8>,
    mapped: bool,
    resident: bool,
}

#[derive(Debug, Clone)]
struct Level {
    extent: Extent,
    data: Vec<u8>,
}

#[derive(Debug, Default)]
struct Texture {
    target: u32,
    internal: u32,
    levels: BTreeMap<i32, Level>,
}

impl Texture {
    fn layout(&self) -> Option<TexelLayout> {
        pixels::texel_layout(self.internal)
    }

    fn is_layered(&self) -> bool {
        self.target != glow::TEXTURE_3D
    }

    /// Allocates (or reallocates on a size change) one level.
    fn level_mut(&mut self, level: i32, extent: Extent) -> &mut Level {
        let len = match self.layout() {
            Some(layout) => extent.byte_len(layout.bytes),
            None => types::compressed_texture_size(
                extent.width,
                extent.height,
                extent.depth,
                self.internal,
            ),
        };
        let entry = self.levels.entry(level).or_insert_with(|| Level {
            extent,
            data: vec![0; len],
        });
        if entry.extent != extent {
            *entry = Level {
                extent,
                data: vec![0; len],
            };
        }
        entry
    }

    fn write(&mut self, level: i32, region: Region, data: &[u8]) {
        let internal = self.internal;
        let layout = self.layout();
        let Some(stored) = self.levels.get_mut(&level) else {
            return;
        };
        match layout {
            Some(layout) => pixels::write_region(
                &mut stored.data,
                stored.extent,
                layout.bytes,
                region,
                data,
            ),
            None => {
                let slice = types::compressed_texture_size(
                    stored.extent.width,
                    stored.extent.height,
                    1,
                    internal,
                );
                let start = region.z as usize * slice;
                let end = (start + data.len()).min(stored.data.len());
                if start < end {
                    stored.data[start..end].copy_from_slice(&data[..end - start]);
                }
            }
        }
    }

    fn read(&self, level: i32, region: Region) -> Option<Vec<u8>> {
        let stored = self.levels.get(&level)?;
        match self.layout() {
            Some(layout) => Some(pixels::read_region(
                &stored.data,
                stored.extent,
                layout.bytes,
                region,
            )),
            None => {
                let slice = types::compressed_texture_size(
                    stored.extent.width,
                    stored.extent.height,
                    1,
                    self.internal,
                );
                let start = region.z as usize * slice;
                let end = (start + region.depth as usize * slice).min(stored.data.len());
                stored.data.get(start..end).map(<[u8]>::to_vec)
            }
        }
    }

    /// Box-free downsampling: each texel of level `n + 1` copies the
    /// top-left texel of its 2x2 footprint in level `n`.
    fn generate_mipmaps(&mut self) {
        let Some(bpp) = self.layout().map(|layout| layout.bytes) else {
            return;
        };
        let Some(mut prev) = self.levels.get(&0).cloned() else {
            return;
        };
        let layered = self.is_layered();
        let mut level = 0;
        loop {
            let Extent {
                width,
                height,
                depth,
            } = prev.extent;
            if width <= 1 && height <= 1 && (layered || depth <= 1) {
                break;
            }
            let next_extent = Extent {
                width: (width / 2).max(1),
                height: (height / 2).max(1),
                depth: if layered { depth } else { (depth / 2).max(1) },
            };
            let (w, h, d) = (width as usize, height as usize, depth as usize);
            let (nw, nh) = (next_extent.width as usize, next_extent.height as usize);
            let mut data = vec![0; next_extent.byte_len(bpp)];
            for z in 0..next_extent.depth as usize {
                let sz = if layered { z } else { (z * 2).min(d - 1) };
                for y in 0..nh {
                    for x in 0..nw {
                        let src = ((sz * h + (y * 2).min(h - 1)) * w + (x * 2).min(w - 1)) * bpp;
                        let dst = ((z * nh + y) * nw + x) * bpp;
                        data[dst..dst + bpp].copy_from_slice(&prev.data[src..src + bpp]);
                    }
                }
            }
            level += 1;
            prev = Level {
                extent: next_extent,
                data,
            };
            self.levels.insert(level, prev.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attachment {
    texture: u32,
    level: i32,
    layer: Option<u32>,
}

#[derive(Debug)]
struct Framebuffer {
    attachments: BTreeMap<u32, Attachment>,
    draw_buffers: Option<Vec<u32>>,
    read_buffer: u32,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            attachments: BTreeMap::new(),
            draw_buffers: None,
            read_buffer: glow::COLOR_ATTACHMENT0,
        }
    }
}

#[derive(Debug)]
struct Shader {
    ty: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct Program {
    shaders: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<(ActiveVariable, u32)>,
    uniforms: Vec<(ActiveVariable, i32)>,
    blocks: Vec<ActiveBlock>,
}

#[derive(Debug, Default)]
struct State {
    next_name: u32,
    calls: Vec<GlCall>,
    errors: VecDeque<u32>,
    limits: HashMap<u32, i32>,
    float_limits: HashMap<u32, [f32; 2]>,
    extensions: Vec<String>,
    debug_messages: Vec<DebugMessage>,

    buffers: HashMap<u32, Buffer>,
    textures: HashMap<u32, Texture>,
    samplers: HashSet<u32>,
    framebuffers: HashMap<u32, Framebuffer>,
    shaders: HashMap<u32, Shader>,
    programs: HashMap<u32, Program>,
    vertex_arrays: HashSet<u32>,

    buffer_bindings: HashMap<u32, u32>,
    texture_bindings: HashMap<(u32, u32), u32>,
    active_unit: u32,
    draw_framebuffer: u32,
    read_framebuffer: u32,
    current_program: u32,
    enabled: HashSet<(u32, Option<u32>)>,
    uniforms: HashMap<(u32, i32), RecordedUniform>,
    map_limit: Option<usize>,
}

fn cube_face(target: u32) -> Option<u32> {
    (glow::TEXTURE_CUBE_MAP_POSITIVE_X..=glow::TEXTURE_CUBE_MAP_NEGATIVE_Z)
        .contains(&target)
        .then(|| target - glow::TEXTURE_CUBE_MAP_POSITIVE_X)
}

fn dims(width: i32, height: i32, depth: i32) -> Extent {
    Extent {
        width: width.max(1) as u32,
        height: height.max(1) as u32,
        depth: depth.max(1) as u32,
    }
}

impl State {
    fn record(&mut self, name: &'static str, args: Vec<i64>) {
        self.calls.push(GlCall { name, args });
    }

    fn gen(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    fn error(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    /// Resolves a texture target (cube faces included) against the active
    /// unit, returning the texture name and the face slice.
    fn bound_texture(&self, target: u32) -> Option<(u32, Option<u32>)> {
        let (bind_target, face) = match cube_face(target) {
            Some(face) => (glow::TEXTURE_CUBE_MAP, Some(face)),
            None => (target, None),
        };
        self.texture_bindings
            .get(&(self.active_unit, bind_target))
            .copied()
            .filter(|name| *name != 0)
            .map(|name| (name, face))
    }

    fn bound_buffer(&self, target: u32) -> Option<u32> {
        self.buffer_bindings
            .get(&target)
            .copied()
            .filter(|name| *name != 0)
    }

    fn map(&mut self, buffer: u32, offset: usize, length: usize) -> Option<Vec<u8>> {
        let mapped = match self.buffers.get_mut(&buffer) {
            Some(stored) if !stored.mapped && offset + length <= stored.data.len() => {
                stored.mapped = true;
                let end = offset + self.map_limit.map_or(length, |limit| length.min(limit));
                Some(stored.data[offset..end].to_vec())
            }
            _ => None,
        };
        if mapped.is_none() {
            self.error(glow::INVALID_OPERATION);
        }
        mapped
    }

    fn unmap(&mut self, buffer: u32) -> bool {
        match self.buffers.get_mut(&buffer) {
            Some(stored) if stored.mapped => {
                stored.mapped = false;
                true
            }
            _ => {
                self.error(glow::INVALID_OPERATION);
                false
            }
        }
    }

    fn framebuffer_for(&self, target: u32) -> u32 {
        if target == glow::READ_FRAMEBUFFER {
            self.read_framebuffer
        } else {
            self.draw_framebuffer
        }
    }

    fn define_level(
        &mut self,
        texture: u32,
        target: u32,
        level: i32,
        internal: u32,
        extent: Extent,
    ) {
        match self.textures.get_mut(&texture) {
            Some(tex) => {
                tex.target = target;
                tex.internal = internal;
                tex.level_mut(level, extent);
            }
            None => self.error(glow::INVALID_OPERATION),
        }
    }

    fn write_texture(&mut self, texture: u32, level: i32, region: Region, data: &[u8]) {
        match self.textures.get_mut(&texture) {
            Some(tex) => tex.write(level, region, data),
            None => self.error(glow::INVALID_OPERATION),
        }
    }

    fn allocate_storage(&mut self, texture: u32, levels: i32, internal: u32, extent: Extent) {
        let Some(tex) = self.textures.get_mut(&texture) else {
            self.error(glow::INVALID_OPERATION);
            return;
        };
        tex.internal = internal;
        let layered = tex.is_layered();
        for level in 0..levels.max(1) {
            let shift = level as u32;
            tex.level_mut(
                level,
                Extent {
                    width: (extent.width >> shift).max(1),
                    height: (extent.height >> shift).max(1),
                    depth: if layered {
                        extent.depth
                    } else {
                        (extent.depth >> shift).max(1)
                    },
                },
            );
        }
    }

    /// Converts texels read from `texture` and writes them into the bound
    /// pixel-pack buffer.
    fn read_into_pack(&mut self, texture: u32, level: i32, region: Region, ty: u32, offset: usize) {
        let Some(tex) = self.textures.get(&texture) else {
            self.error(glow::INVALID_OPERATION);
            return;
        };
        let layout = tex.layout();
        let Some(bytes) = tex.read(level, region) else {
            self.error(glow::INVALID_VALUE);
            return;
        };
        let converted = pixels::convert_for_read(layout.as_ref(), &bytes, ty);
        let Some(pack) = self.bound_buffer(glow::PIXEL_PACK_BUFFER) else {
            self.error(glow::INVALID_OPERATION);
            return;
        };
        if let Some(buffer) = self.buffers.get_mut(&pack) {
            let end = (offset + converted.len()).min(buffer.data.len());
            if offset < end {
                buffer.data[offset..end].copy_from_slice(&converted[..end - offset]);
            }
        }
    }

    fn attach(&mut self, framebuffer: u32, point: u32, attachment: Attachment) {
        let Some(fb) = self.framebuffers.get_mut(&framebuffer) else {
            self.error(glow::INVALID_OPERATION);
            return;
        };
        if attachment.texture == 0 {
            fb.attachments.remove(&point);
        } else {
            fb.attachments.insert(point, attachment);
        }
    }

    fn framebuffer_status(&self, framebuffer: u32) -> u32 {
        if framebuffer == 0 {
            return glow::FRAMEBUFFER_COMPLETE;
        }
        let Some(fb) = self.framebuffers.get(&framebuffer) else {
            return glow::FRAMEBUFFER_UNDEFINED;
        };
        if fb.attachments.is_empty() {
            return glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT;
        }
        let complete = fb.attachments.values().all(|attachment| {
            self.textures
                .get(&attachment.texture)
                .is_some_and(|tex| tex.levels.contains_key(&attachment.level))
        });
        if complete {
            glow::FRAMEBUFFER_COMPLETE
        } else {
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT
        }
    }

    fn color_target(&self, draw_buffer: i32) -> Option<Attachment> {
        let fb = self.framebuffers.get(&self.draw_framebuffer)?;
        let index = usize::try_from(draw_buffer).ok()?;
        let point = match &fb.draw_buffers {
            Some(list) => *list.get(index)?,
            None if index == 0 => glow::COLOR_ATTACHMENT0,
            None => return None,
        };
        fb.attachments.get(&point).copied()
    }

    fn depth_stencil_target(&self, point: u32) -> Option<Attachment> {
        let fb = self.framebuffers.get(&self.draw_framebuffer)?;
        fb.attachments
            .get(&point)
            .or_else(|| fb.attachments.get(&glow::DEPTH_STENCIL_ATTACHMENT))
            .copied()
    }

    /// Applies `f` to every texel of the attached image.
    fn fill(&mut self, attachment: Attachment, mut f: impl FnMut(&mut [u8], u32)) {
        let Some(tex) = self.textures.get_mut(&attachment.texture) else {
            return;
        };
        let internal = tex.internal;
        let Some(bpp) = tex.layout().map(|layout| layout.bytes) else {
            return;
        };
        let Some(level) = tex.levels.get_mut(&attachment.level) else {
            return;
        };
        let slice = level.extent.width as usize * level.extent.height as usize * bpp;
        let range = match attachment.layer {
            Some(layer) => layer as usize * slice..(layer as usize + 1) * slice,
            None => 0..level.data.len(),
        };
        if let Some(bytes) = level.data.get_mut(range) {
            bytes.chunks_exact_mut(bpp).for_each(|texel| f(texel, internal));
        }
    }

    fn read_source(&self, x: i32, y: i32, width: i32, height: i32) -> Option<Vec<u8>> {
        let fb = self.framebuffers.get(&self.read_framebuffer)?;
        let attachment = fb.attachments.get(&fb.read_buffer)?;
        let tex = self.textures.get(&attachment.texture)?;
        let z = attachment.layer.unwrap_or(0) as i32;
        tex.read(attachment.level, Region::new(x, y, z, width, height, 1))
    }

    fn link(&mut self, program: u32) {
        let Some(shader_names) = self.programs.get(&program).map(|p| p.shaders.clone()) else {
            self.error(glow::INVALID_VALUE);
            return;
        };

        let mut log = String::new();
        if shader_names.is_empty() {
            log.push_str("ERROR: no shaders attached\n");
        }

        let mut inputs = Vec::new();
        let mut uniforms: Vec<reflect::Declaration> = Vec::new();
        let mut blocks: Vec<reflect::BlockDeclaration> = Vec::new();
        for name in shader_names {
            match self.shaders.get(&name) {
                Some(shader) if shader.compiled => {
                    let interface =
                        reflect::reflect(&shader.source, shader.ty == glow::VERTEX_SHADER);
                    inputs.extend(interface.inputs);
                    for uniform in interface.uniforms {
                        if !uniforms.iter().any(|u| u.name == uniform.name) {
                            uniforms.push(uniform);
                        }
                    }
                    for block in interface.blocks {
                        if !blocks.iter().any(|b| b.name == block.name) {
                            blocks.push(block);
                        }
                    }
                }
                Some(_) => log.push_str("ERROR: attached shader is not compiled\n"),
                None => log.push_str("ERROR: attached shader does not exist\n"),
            }
        }

        let attributes = assign_attribute_locations(&inputs);
        let mut next_location = 0;
        let uniforms = uniforms
            .into_iter()
            .map(|uniform| {
                let size = uniform.array_len.unwrap_or(1);
                let name = match uniform.array_len {
                    Some(_) => format!("{}[0]", uniform.name),
                    None => uniform.name,
                };
                let location = next_location;
                next_location += size as i32;
                let variable = ActiveVariable {
                    name,
                    gl_type: uniform.gl_type,
                    size: size as i32,
                };
                (variable, location)
            })
            .collect();
        let blocks = blocks
            .into_iter()
            .enumerate()
            .map(|(index, block)| ActiveBlock {
                name: block.name,
                index: index as u32,
                data_size: block.data_size,
                members: block.members,
            })
            .collect();

        if let Some(prog) = self.programs.get_mut(&program) {
            prog.linked = log.is_empty();
            prog.log = log;
            prog.attributes = attributes;
            prog.uniforms = uniforms;
            prog.blocks = blocks;
        }
    }
}

/// Explicit `layout(location)` inputs keep their slot, the rest take the
/// first free run of slots wide enough for their type.
fn assign_attribute_locations(inputs: &[reflect::Declaration]) -> Vec<(ActiveVariable, u32)> {
    let span = |input: &reflect::Declaration| {
        reflect::location_span(input.gl_type) * input.array_len.unwrap_or(1)
    };
    let mut used = HashSet::new();
    for input in inputs {
        if let Some(location) = input.location {
            used.extend(location..location + span(input));
        }
    }

    inputs
        .iter()
        .map(|input| {
            let width = span(input);
            let location = input.location.unwrap_or_else(|| {
                let mut candidate = 0;
                while (candidate..candidate + width).any(|slot| used.contains(&slot)) {
                    candidate += 1;
                }
                used.extend(candidate..candidate + width);
                candidate
            });
            let variable = ActiveVariable {
                name: input.name.clone(),
                gl_type: input.gl_type,
                size: input.array_len.unwrap_or(1) as i32,
            };
            (variable, location)
        })
        .collect()
}

/// Software GL driver for tests and headless use.
#[derive(Debug)]
pub struct HeadlessDriver {
    state: RefCell<State>,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    /// A GL 4.5 driver exposing direct state access, debug output,
    /// anisotropic filtering and the desktop compressed formats.
    pub fn new() -> Self {
        let limits = [
            (glow::MAJOR_VERSION, 4),
            (glow::MINOR_VERSION, 5),
            (glow::MAX_TEXTURE_SIZE, 16384),
            (glow::MAX_3D_TEXTURE_SIZE, 2048),
            (glow::MAX_CUBE_MAP_TEXTURE_SIZE, 16384),
            (glow::MAX_ARRAY_TEXTURE_LAYERS, 2048),
            (glow::MAX_TEXTURE_BUFFER_SIZE, 134_217_728),
            (glow::MAX_UNIFORM_BLOCK_SIZE, 65536),
            (glow::MAX_SHADER_STORAGE_BLOCK_SIZE, 134_217_728),
            (glow::MAX_UNIFORM_BUFFER_BINDINGS, 36),
            (glow::MAX_TEXTURE_IMAGE_UNITS, 32),
            (glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS, 192),
            (glow::MAX_VERTEX_ATTRIBS, 16),
            (glow::MAX_VERTEX_ATTRIB_BINDINGS, 16),
            (glow::MAX_VERTEX_ATTRIB_RELATIVE_OFFSET, 2047),
            (glow::MAX_VERTEX_ATTRIB_STRIDE, 2048),
            (glow::MAX_FRAMEBUFFER_WIDTH, 16384),
            (glow::MAX_FRAMEBUFFER_HEIGHT, 16384),
            (glow::MAX_FRAMEBUFFER_LAYERS, 2048),
            (glow::MAX_COLOR_ATTACHMENTS, 8),
            (glow::MAX_DRAW_BUFFERS, 8),
            (glow::MAX_COLOR_TEXTURE_SAMPLES, 8),
            (glow::MAX_DEPTH_TEXTURE_SAMPLES, 8),
            (glow::MAX_INTEGER_SAMPLES, 8),
            (glow::MAX_VIEWPORTS, 16),
        ];
        let extensions = [
            ext::ARB_DIRECT_STATE_ACCESS,
            ext::KHR_DEBUG,
            ext::EXT_TEXTURE_FILTER_ANISOTROPIC,
            ext::EXT_TEXTURE_COMPRESSION_S3TC,
            ext::ARB_TEXTURE_COMPRESSION_RGTC,
            ext::ARB_TEXTURE_COMPRESSION_BPTC,
        ];

        let mut state = State {
            limits: limits.into_iter().collect(),
            extensions: extensions.iter().map(|name| name.to_string()).collect(),
            ..State::default()
        };
        state.float_limits.insert(ext::MAX_TEXTURE_MAX_ANISOTROPY_EXT, [16.0, 16.0]);
        state.float_limits.insert(glow::ALIASED_LINE_WIDTH_RANGE, [1.0, 8.0]);
        state.framebuffers.insert(0, Framebuffer::default());

        Self {
            state: RefCell::new(state),
        }
    }

    /// Reports a different context version.
    pub fn with_version(self, major: i32, minor: i32) -> Self {
        self.with_limit(glow::MAJOR_VERSION, major)
            .with_limit(glow::MINOR_VERSION, minor)
    }

    /// Overrides an integer limit.
    pub fn with_limit(self, pname: u32, value: i32) -> Self {
        self.state.borrow_mut().limits.insert(pname, value);
        self
    }

    /// Overrides a float limit or range.
    pub fn with_float_limit(self, pname: u32, range: [f32; 2]) -> Self {
        self.state.borrow_mut().float_limits.insert(pname, range);
        self
    }

    /// Hands back at most `limit` bytes from every buffer mapping.
    pub fn with_map_limit(self, limit: usize) -> Self {
        self.state.borrow_mut().map_limit = Some(limit);
        self
    }

    /// Advertises an extension.
    pub fn with_extension(self, name: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            if !state.extensions.iter().any(|e| e == name) {
                state.extensions.push(name.to_owned());
            }
        }
        self
    }

    /// Stops advertising an extension.
    pub fn without_extension(self, name: &str) -> Self {
        self.state.borrow_mut().extensions.retain(|e| e != name);
        self
    }

    // --- Inspection ---

    /// Every call recorded so far.
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Number of recorded calls named `name`.
    pub fn count(&self, name: &str) -> usize {
        self.state.borrow().calls.iter().filter(|c| c.name == name).count()
    }

    /// Recorded calls named `name`, in order.
    pub fn calls_named(&self, name: &str) -> Vec<GlCall> {
        let state = self.state.borrow();
        state.calls.iter().filter(|c| c.name == name).cloned().collect()
    }

    /// Position in the call log, for use with [`Self::calls_since`].
    pub fn mark(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Calls recorded after `mark`.
    pub fn calls_since(&self, mark: usize) -> Vec<GlCall> {
        let state = self.state.borrow();
        state.calls.get(mark..).map(<[GlCall]>::to_vec).unwrap_or_default()
    }

    /// Forgets the call log, keeping object state.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Contents of a buffer object.
    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).map(|b| b.data.clone())
    }

    /// Whether a buffer is currently mapped.
    pub fn is_buffer_mapped(&self, buffer: u32) -> bool {
        self.state.borrow().buffers.get(&buffer).is_some_and(|b| b.mapped)
    }

    /// Whether a buffer was made resident for bindless access.
    pub fn is_buffer_resident(&self, buffer: u32) -> bool {
        self.state.borrow().buffers.get(&buffer).is_some_and(|b| b.resident)
    }

    /// Raw bytes of one texture level, every slice included.
    pub fn texture_contents(&self, texture: u32, level: i32) -> Option<Vec<u8>> {
        let state = self.state.borrow();
        let tex = state.textures.get(&texture)?;
        tex.levels.get(&level).map(|l| l.data.clone())
    }

    /// Allocated `(width, height, depth)` of a texture level.
    pub fn texture_extent(&self, texture: u32, level: i32) -> Option<(u32, u32, u32)> {
        let state = self.state.borrow();
        let extent = state.textures.get(&texture)?.levels.get(&level)?.extent;
        Some((extent.width, extent.height, extent.depth))
    }

    /// Whether a capability is enabled globally.
    pub fn is_enabled(&self, cap: u32) -> bool {
        self.state.borrow().enabled.contains(&(cap, None))
    }

    /// Whether a capability is enabled for one indexed target.
    pub fn is_enabled_i(&self, cap: u32, index: u32) -> bool {
        self.state.borrow().enabled.contains(&(cap, Some(index)))
    }

    /// Framebuffer currently bound for drawing.
    pub fn bound_draw_framebuffer(&self) -> u32 {
        self.state.borrow().draw_framebuffer
    }

    /// Program currently in use.
    pub fn current_program(&self) -> u32 {
        self.state.borrow().current_program
    }

    /// Last values pushed to `location` of `program`.
    pub fn uniform_value(&self, program: u32, location: i32) -> Option<RecordedUniform> {
        self.state.borrow().uniforms.get(&(program, location)).cloned()
    }

    /// Number of live native objects of every kind.
    pub fn live_objects(&self) -> usize {
        let state = self.state.borrow();
        state.buffers.len()
            + state.textures.len()
            + state.samplers.len()
            + state.framebuffers.len().saturating_sub(1)
            + state.shaders.len()
            + state.programs.len()
            + state.vertex_arrays.len()
    }

    /// Queues a message for [`GlDriver::drain_debug_messages`].
    pub fn push_debug_message(&self, id: u32, severity: u32, text: &str) {
        self.state.borrow_mut().debug_messages.push(DebugMessage {
            id,
            severity,
            text: text.to_owned(),
        });
    }

    /// Queues an error code for [`GlDriver::get_error`].
    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().error(code);
    }

    fn record(&self, name: &'static str, args: Vec<i64>) {
        self.state.borrow_mut().record(name, args);
    }
}

impl GlDriver for HeadlessDriver {
    // --- Queries ---

    fn get_error(&self) -> u32 {
        self.state
            .borrow_mut()
            .errors
            .pop_front()
            .unwrap_or(glow::NO_ERROR)
    }

    fn get_integer(&self, pname: u32) -> i32 {
        let state = self.state.borrow();
        match pname {
            glow::CURRENT_PROGRAM => state.current_program as i32,
            glow::DRAW_FRAMEBUFFER_BINDING => state.draw_framebuffer as i32,
            glow::READ_FRAMEBUFFER_BINDING => state.read_framebuffer as i32,
            glow::ACTIVE_TEXTURE => (glow::TEXTURE0 + state.active_unit) as i32,
            glow::NUM_EXTENSIONS => state.extensions.len() as i32,
            _ => state.limits.get(&pname).copied().unwrap_or(0),
        }
    }

    fn get_float(&self, pname: u32) -> f32 {
        self.get_float_range(pname)[0]
    }

    fn get_float_range(&self, pname: u32) -> [f32; 2] {
        let state = self.state.borrow();
        state.float_limits.get(&pname).copied().unwrap_or([0.0, 0.0])
    }

    fn get_string(&self, pname: u32) -> String {
        let state = self.state.borrow();
        let major = state.limits.get(&glow::MAJOR_VERSION).copied().unwrap_or(0);
        let minor = state.limits.get(&glow::MINOR_VERSION).copied().unwrap_or(0);
        match pname {
            glow::VENDOR => "octoon".to_owned(),
            glow::RENDERER => "headless".to_owned(),
            glow::VERSION => format!("{major}.{minor}.0 headless"),
            glow::SHADING_LANGUAGE_VERSION => format!("{major}.{minor}0"),
            _ => String::new(),
        }
    }

    fn extensions(&self) -> Vec<String> {
        self.state.borrow().extensions.clone()
    }

    // --- Fixed-function state ---

    fn enable(&self, cap: u32) {
        let mut state = self.state.borrow_mut();
        state.enabled.insert((cap, None));
        state.record("enable", vec![i64::from(cap)]);
    }

    fn disable(&self, cap: u32) {
        let mut state = self.state.borrow_mut();
        state.enabled.remove(&(cap, None));
        state.record("disable", vec![i64::from(cap)]);
    }

    fn enable_i(&self, cap: u32, index: u32) {
        let mut state = self.state.borrow_mut();
        state.enabled.insert((cap, Some(index)));
        state.record("enable_i", vec![i64::from(cap), i64::from(index)]);
    }

    fn disable_i(&self, cap: u32, index: u32) {
        let mut state = self.state.borrow_mut();
        state.enabled.remove(&(cap, Some(index)));
        state.record("disable_i", vec![i64::from(cap), i64::from(index)]);
    }

    fn cull_face(&self, mode: u32) {
        self.record("cull_face", vec![i64::from(mode)]);
    }

    fn front_face(&self, mode: u32) {
        self.record("front_face", vec![i64::from(mode)]);
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        self.record("polygon_mode", vec![i64::from(face), i64::from(mode)]);
    }

    fn line_width(&self, width: f32) {
        self.record("line_width", vec![float_arg(width)]);
    }

    fn depth_func(&self, func: u32) {
        self.record("depth_func", vec![i64::from(func)]);
    }

    fn depth_mask(&self, enabled: bool) {
        self.record("depth_mask", vec![bool_arg(enabled)]);
    }

    fn polygon_offset(&self, factor: f32, units: f32) {
        self.record("polygon_offset", vec![float_arg(factor), float_arg(units)]);
    }

    fn blend_func_separate_i(&self, buf: u32, src_rgb: u32, dst_rgb: u32, src_a: u32, dst_a: u32) {
        let args = [buf, src_rgb, dst_rgb, src_a, dst_a].map(i64::from).to_vec();
        self.record("blend_func_separate_i", args);
    }

    fn blend_equation_separate_i(&self, buf: u32, mode_rgb: u32, mode_a: u32) {
        let args = [buf, mode_rgb, mode_a].map(i64::from).to_vec();
        self.record("blend_equation_separate_i", args);
    }

    fn color_mask_i(&self, buf: u32, r: bool, g: bool, b: bool, a: bool) {
        let mut args = vec![i64::from(buf)];
        args.extend([r, g, b, a].map(bool_arg));
        self.record("color_mask_i", args);
    }

    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool) {
        self.record("color_mask", [r, g, b, a].map(bool_arg).to_vec());
    }

    fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32) {
        let args = vec![
            i64::from(face),
            i64::from(func),
            i64::from(reference),
            i64::from(mask),
        ];
        self.record("stencil_func_separate", args);
    }

    fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, pass: u32) {
        let args = [face, fail, depth_fail, pass].map(i64::from).to_vec();
        self.record("stencil_op_separate", args);
    }

    fn stencil_mask_separate(&self, face: u32, mask: u32) {
        self.record("stencil_mask_separate", vec![i64::from(face), i64::from(mask)]);
    }

    fn viewport_indexed(&self, index: u32, rect: [f32; 4]) {
        let mut args = vec![i64::from(index)];
        args.extend(rect.map(float_arg));
        self.record("viewport_indexed", args);
    }

    fn depth_range_indexed(&self, index: u32, near: f64, far: f64) {
        let args = vec![i64::from(index), float_arg(near as f32), float_arg(far as f32)];
        self.record("depth_range_indexed", args);
    }

    fn scissor_indexed(&self, index: u32, x: i32, y: i32, width: i32, height: i32) {
        let mut args = vec![i64::from(index)];
        args.extend([x, y, width, height].map(i64::from));
        self.record("scissor_indexed", args);
    }

    fn pixel_store_i(&self, pname: u32, value: i32) {
        self.record("pixel_store_i", vec![i64::from(pname), i64::from(value)]);
    }

    // --- Buffers, bind-point model ---

    fn gen_buffer(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.buffers.insert(name, Buffer::default());
        state.record("gen_buffer", vec![i64::from(name)]);
        name
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        state.buffer_bindings.retain(|_, bound| *bound != buffer);
        state.record("delete_buffer", vec![i64::from(buffer)]);
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffer_bindings.insert(target, buffer);
        state.record("bind_buffer", vec![i64::from(target), i64::from(buffer)]);
    }

    fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffer_bindings.insert(target, buffer);
        let args = [target, index, buffer].map(i64::from).to_vec();
        state.record("bind_buffer_base", args);
    }

    fn buffer_data(&self, target: u32, size: usize, data: Option<&[u8]>, usage: u32) {
        let mut state = self.state.borrow_mut();
        state.record("buffer_data", vec![i64::from(target), size as i64, i64::from(usage)]);
        let Some(name) = state.bound_buffer(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        if let Some(buffer) = state.buffers.get_mut(&name) {
            buffer.data = vec![0; size];
            if let Some(data) = data {
                let len = data.len().min(size);
                buffer.data[..len].copy_from_slice(&data[..len]);
            }
        }
    }

    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let args = vec![i64::from(target), offset as i64, data.len() as i64];
        state.record("buffer_sub_data", args);
        let Some(name) = state.bound_buffer(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        match state.buffers.get_mut(&name) {
            Some(buffer) if offset + data.len() <= buffer.data.len() => {
                buffer.data[offset..offset + data.len()].copy_from_slice(data);
            }
            _ => state.error(glow::INVALID_VALUE),
        }
    }

    fn map_buffer_range(
        &self,
        target: u32,
        offset: usize,
        length: usize,
        access: u32,
    ) -> Option<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        let args = vec![i64::from(target), offset as i64, length as i64, i64::from(access)];
        state.record("map_buffer_range", args);
        let buffer = state.bound_buffer(target).unwrap_or(0);
        state.map(buffer, offset, length)
    }

    fn unmap_buffer(&self, target: u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.record("unmap_buffer", vec![i64::from(target)]);
        let buffer = state.bound_buffer(target).unwrap_or(0);
        state.unmap(buffer)
    }

    // --- Buffers, direct state access ---

    fn create_buffer(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.buffers.insert(name, Buffer::default());
        state.record("create_buffer", vec![i64::from(name)]);
        name
    }

    fn named_buffer_storage(&self, buffer: u32, size: usize, data: Option<&[u8]>, flags: u32) {
        let mut state = self.state.borrow_mut();
        let args = vec![i64::from(buffer), size as i64, i64::from(flags)];
        state.record("named_buffer_storage", args);
        match state.buffers.get_mut(&buffer) {
            Some(stored) => {
                stored.data = vec![0; size];
                if let Some(data) = data {
                    let len = data.len().min(size);
                    stored.data[..len].copy_from_slice(&data[..len]);
                }
            }
            None => state.error(glow::INVALID_OPERATION),
        }
    }

    fn named_buffer_sub_data(&self, buffer: u32, offset: usize, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let args = vec![i64::from(buffer), offset as i64, data.len() as i64];
        state.record("named_buffer_sub_data", args);
        match state.buffers.get_mut(&buffer) {
            Some(stored) if offset + data.len() <= stored.data.len() => {
                stored.data[offset..offset + data.len()].copy_from_slice(data);
            }
            _ => state.error(glow::INVALID_VALUE),
        }
    }

    fn map_named_buffer_range(
        &self,
        buffer: u32,
        offset: usize,
        length: usize,
        access: u32,
    ) -> Option<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        let args = vec![i64::from(buffer), offset as i64, length as i64, i64::from(access)];
        state.record("map_named_buffer_range", args);
        state.map(buffer, offset, length)
    }

    fn unmap_named_buffer(&self, buffer: u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.record("unmap_named_buffer", vec![i64::from(buffer)]);
        state.unmap(buffer)
    }

    // --- Textures, bind-point model ---

    fn gen_texture(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.textures.insert(name, Texture::default());
        state.record("gen_texture", vec![i64::from(name)]);
        name
    }

    fn delete_texture(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.textures.remove(&texture);
        state.texture_bindings.retain(|_, bound| *bound != texture);
        state.record("delete_texture", vec![i64::from(texture)]);
    }

    fn active_texture(&self, unit: u32) {
        let mut state = self.state.borrow_mut();
        state.active_unit = unit;
        state.record("active_texture", vec![i64::from(unit)]);
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        state.texture_bindings.insert((unit, target), texture);
        if let Some(tex) = state.textures.get_mut(&texture) {
            tex.target = target;
        }
        state.record("bind_texture", vec![i64::from(target), i64::from(texture)]);
    }

    fn tex_parameter_i(&self, target: u32, pname: u32, value: i32) {
        let args = vec![i64::from(target), i64::from(pname), i64::from(value)];
        self.record("tex_parameter_i", args);
    }

    fn tex_parameter_f(&self, target: u32, pname: u32, value: f32) {
        let args = vec![i64::from(target), i64::from(pname), float_arg(value)];
        self.record("tex_parameter_f", args);
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            i64::from(format),
            i64::from(ty),
        ];
        state.record("tex_image_2d", args);
        let Some((texture, face)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let (bind_target, depth) = match face {
            Some(_) => (glow::TEXTURE_CUBE_MAP, 6),
            None => (target, 1),
        };
        state.define_level(texture, bind_target, level, internal, dims(width, height, depth));
        if let Some(data) = data {
            let z = face.unwrap_or(0) as i32;
            state.write_texture(texture, level, Region::new(0, 0, z, width, height, 1), data);
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            i64::from(format),
            i64::from(ty),
        ];
        state.record("tex_image_3d", args);
        let Some((texture, _)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        state.define_level(texture, target, level, internal, dims(width, height, depth));
        if let Some(data) = data {
            state.write_texture(texture, level, Region::new(0, 0, 0, width, height, depth), data);
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(samples),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            bool_arg(fixed),
        ];
        state.record("tex_image_2d_multisample", args);
        match state.bound_texture(target) {
            Some((texture, _)) => {
                state.define_level(texture, target, 0, internal, dims(width, height, 1));
            }
            None => state.error(glow::INVALID_OPERATION),
        }
    }

    fn tex_image_3d_multisample(
        &self,
        target: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
        fixed: bool,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(samples),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            bool_arg(fixed),
        ];
        state.record("tex_image_3d_multisample", args);
        match state.bound_texture(target) {
            Some((texture, _)) => {
                state.define_level(texture, target, 0, internal, dims(width, height, depth));
            }
            None => state.error(glow::INVALID_OPERATION),
        }
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(x),
            i64::from(y),
            i64::from(width),
            i64::from(height),
            i64::from(format),
            i64::from(ty),
        ];
        state.record("tex_sub_image_2d", args);
        let Some((texture, face)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let z = face.unwrap_or(0) as i32;
        state.write_texture(texture, level, Region::new(x, y, z, width, height, 1), data);
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(x),
            i64::from(y),
            i64::from(z),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            i64::from(format),
            i64::from(ty),
        ];
        state.record("tex_sub_image_3d", args);
        let Some((texture, _)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        state.write_texture(texture, level, Region::new(x, y, z, width, height, depth), data);
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            data.len() as i64,
        ];
        state.record("compressed_tex_image_2d", args);
        let Some((texture, face)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let (bind_target, depth) = match face {
            Some(_) => (glow::TEXTURE_CUBE_MAP, 6),
            None => (target, 1),
        };
        state.define_level(texture, bind_target, level, internal, dims(width, height, depth));
        let z = face.unwrap_or(0) as i32;
        state.write_texture(texture, level, Region::new(0, 0, z, width, height, 1), data);
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            data.len() as i64,
        ];
        state.record("compressed_tex_image_3d", args);
        let Some((texture, _)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        state.define_level(texture, target, level, internal, dims(width, height, depth));
        state.write_texture(texture, level, Region::new(0, 0, 0, width, height, depth), data);
    }

    fn get_tex_image(&self, target: u32, level: i32, format: u32, ty: u32, offset: usize) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(format),
            i64::from(ty),
            offset as i64,
        ];
        state.record("get_tex_image", args);
        let Some((texture, face)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let Some(extent) = state
            .textures
            .get(&texture)
            .and_then(|tex| tex.levels.get(&level))
            .map(|stored| stored.extent)
        else {
            state.error(glow::INVALID_VALUE);
            return;
        };
        let (z, depth) = match face {
            Some(face) => (face, 1),
            None => (0, extent.depth),
        };
        let region = Region {
            x: 0,
            y: 0,
            z,
            width: extent.width,
            height: extent.height,
            depth,
        };
        state.read_into_pack(texture, level, region, ty, offset);
    }

    fn generate_mipmap(&self, target: u32) {
        let mut state = self.state.borrow_mut();
        state.record("generate_mipmap", vec![i64::from(target)]);
        let Some((texture, _)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        if let Some(tex) = state.textures.get_mut(&texture) {
            tex.generate_mipmaps();
        }
    }

    // --- Textures, direct state access ---

    fn create_texture(&self, target: u32) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.textures.insert(
            name,
            Texture {
                target,
                ..Texture::default()
            },
        );
        state.record("create_texture", vec![i64::from(target), i64::from(name)]);
        name
    }

    fn texture_parameter_i(&self, texture: u32, pname: u32, value: i32) {
        let args = vec![i64::from(texture), i64::from(pname), i64::from(value)];
        self.record("texture_parameter_i", args);
    }

    fn texture_parameter_f(&self, texture: u32, pname: u32, value: f32) {
        let args = vec![i64::from(texture), i64::from(pname), float_arg(value)];
        self.record("texture_parameter_f", args);
    }

    fn texture_storage_2d(
        &self,
        texture: u32,
        levels: i32,
        internal: u32,
        width: i32,
        height: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(levels),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
        ];
        state.record("texture_storage_2d", args);
        let is_cube = state
            .textures
            .get(&texture)
            .is_some_and(|tex| tex.target == glow::TEXTURE_CUBE_MAP);
        let depth = if is_cube { 6 } else { 1 };
        state.allocate_storage(texture, levels, internal, dims(width, height, depth));
    }

    fn texture_storage_3d(
        &self,
        texture: u32,
        levels: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(levels),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
        ];
        state.record("texture_storage_3d", args);
        state.allocate_storage(texture, levels, internal, dims(width, height, depth));
    }

    fn texture_storage_2d_multisample(
        &self,
        texture: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        fixed: bool,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(samples),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            bool_arg(fixed),
        ];
        state.record("texture_storage_2d_multisample", args);
        state.allocate_storage(texture, 1, internal, dims(width, height, 1));
    }

    fn texture_storage_3d_multisample(
        &self,
        texture: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
        fixed: bool,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(samples),
            i64::from(internal),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            bool_arg(fixed),
        ];
        state.record("texture_storage_3d_multisample", args);
        state.allocate_storage(texture, 1, internal, dims(width, height, depth));
    }

    fn texture_sub_image_2d(
        &self,
        texture: u32,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(level),
            i64::from(x),
            i64::from(y),
            i64::from(width),
            i64::from(height),
            i64::from(format),
            i64::from(ty),
        ];
        state.record("texture_sub_image_2d", args);
        state.write_texture(texture, level, Region::new(x, y, 0, width, height, 1), data);
    }

    fn texture_sub_image_3d(
        &self,
        texture: u32,
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(level),
            i64::from(x),
            i64::from(y),
            i64::from(z),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            i64::from(format),
            i64::from(ty),
        ];
        state.record("texture_sub_image_3d", args);
        state.write_texture(texture, level, Region::new(x, y, z, width, height, depth), data);
    }

    fn compressed_texture_sub_image_2d(
        &self,
        texture: u32,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        internal: u32,
        data: &[u8],
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(level),
            i64::from(x),
            i64::from(y),
            i64::from(width),
            i64::from(height),
            i64::from(internal),
            data.len() as i64,
        ];
        state.record("compressed_texture_sub_image_2d", args);
        state.write_texture(texture, level, Region::new(x, y, 0, width, height, 1), data);
    }

    fn compressed_texture_sub_image_3d(
        &self,
        texture: u32,
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(level),
            i64::from(x),
            i64::from(y),
            i64::from(z),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            i64::from(internal),
            data.len() as i64,
        ];
        state.record("compressed_texture_sub_image_3d", args);
        state.write_texture(texture, level, Region::new(x, y, z, width, height, depth), data);
    }

    fn get_texture_sub_image(
        &self,
        texture: u32,
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(level),
            i64::from(x),
            i64::from(y),
            i64::from(z),
            i64::from(width),
            i64::from(height),
            i64::from(depth),
            i64::from(format),
            i64::from(ty),
            offset as i64,
        ];
        state.record("get_texture_sub_image", args);
        let region = Region::new(x, y, z, width, height, depth);
        state.read_into_pack(texture, level, region, ty, offset);
    }

    fn generate_texture_mipmap(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.record("generate_texture_mipmap", vec![i64::from(texture)]);
        match state.textures.get_mut(&texture) {
            Some(tex) => tex.generate_mipmaps(),
            None => state.error(glow::INVALID_OPERATION),
        }
    }

    fn bind_texture_unit(&self, unit: u32, texture: u32) {
        let mut state = self.state.borrow_mut();
        let target = state.textures.get(&texture).map_or(0, |tex| tex.target);
        state.texture_bindings.insert((unit, target), texture);
        state.record("bind_texture_unit", vec![i64::from(unit), i64::from(texture)]);
    }

    // --- Samplers ---

    fn gen_sampler(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.samplers.insert(name);
        state.record("gen_sampler", vec![i64::from(name)]);
        name
    }

    fn delete_sampler(&self, sampler: u32) {
        let mut state = self.state.borrow_mut();
        state.samplers.remove(&sampler);
        state.record("delete_sampler", vec![i64::from(sampler)]);
    }

    fn sampler_parameter_i(&self, sampler: u32, pname: u32, value: i32) {
        let args = vec![i64::from(sampler), i64::from(pname), i64::from(value)];
        self.record("sampler_parameter_i", args);
    }

    fn sampler_parameter_f(&self, sampler: u32, pname: u32, value: f32) {
        let args = vec![i64::from(sampler), i64::from(pname), float_arg(value)];
        self.record("sampler_parameter_f", args);
    }

    fn bind_sampler(&self, unit: u32, sampler: u32) {
        self.record("bind_sampler", vec![i64::from(unit), i64::from(sampler)]);
    }

    // --- Framebuffers, bind-point model ---

    fn gen_framebuffer(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.framebuffers.insert(name, Framebuffer::default());
        state.record("gen_framebuffer", vec![i64::from(name)]);
        name
    }

    fn delete_framebuffer(&self, framebuffer: u32) {
        let mut state = self.state.borrow_mut();
        if framebuffer != 0 {
            state.framebuffers.remove(&framebuffer);
        }
        if state.draw_framebuffer == framebuffer {
            state.draw_framebuffer = 0;
        }
        if state.read_framebuffer == framebuffer {
            state.read_framebuffer = 0;
        }
        state.record("delete_framebuffer", vec![i64::from(framebuffer)]);
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: u32) {
        let mut state = self.state.borrow_mut();
        match target {
            glow::READ_FRAMEBUFFER => state.read_framebuffer = framebuffer,
            glow::DRAW_FRAMEBUFFER => state.draw_framebuffer = framebuffer,
            _ => {
                state.read_framebuffer = framebuffer;
                state.draw_framebuffer = framebuffer;
            }
        }
        state.record("bind_framebuffer", vec![i64::from(target), i64::from(framebuffer)]);
    }

    fn framebuffer_texture(&self, target: u32, attachment: u32, texture: u32, level: i32) {
        let mut state = self.state.borrow_mut();
        let args = [target, attachment, texture].map(i64::from).to_vec();
        state.record("framebuffer_texture", args);
        let framebuffer = state.framebuffer_for(target);
        let bound = Attachment {
            texture,
            level,
            layer: None,
        };
        state.attach(framebuffer, attachment, bound);
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(attachment),
            i64::from(tex_target),
            i64::from(texture),
            i64::from(level),
        ];
        state.record("framebuffer_texture_2d", args);
        let framebuffer = state.framebuffer_for(target);
        let bound = Attachment {
            texture,
            level,
            layer: cube_face(tex_target),
        };
        state.attach(framebuffer, attachment, bound);
    }

    fn framebuffer_texture_3d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
        layer: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(attachment),
            i64::from(tex_target),
            i64::from(texture),
            i64::from(level),
            i64::from(layer),
        ];
        state.record("framebuffer_texture_3d", args);
        let framebuffer = state.framebuffer_for(target);
        let bound = Attachment {
            texture,
            level,
            layer: Some(layer.max(0) as u32),
        };
        state.attach(framebuffer, attachment, bound);
    }

    fn framebuffer_texture_layer(
        &self,
        target: u32,
        attachment: u32,
        texture: u32,
        level: i32,
        layer: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(attachment),
            i64::from(texture),
            i64::from(level),
            i64::from(layer),
        ];
        state.record("framebuffer_texture_layer", args);
        let framebuffer = state.framebuffer_for(target);
        let bound = Attachment {
            texture,
            level,
            layer: Some(layer.max(0) as u32),
        };
        state.attach(framebuffer, attachment, bound);
    }

    fn draw_buffers(&self, buffers: &[u32]) {
        let mut state = self.state.borrow_mut();
        state.record("draw_buffers", buffers.iter().map(|b| i64::from(*b)).collect());
        let framebuffer = state.draw_framebuffer;
        if let Some(fb) = state.framebuffers.get_mut(&framebuffer) {
            fb.draw_buffers = Some(buffers.to_vec());
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        let mut state = self.state.borrow_mut();
        state.record("check_framebuffer_status", vec![i64::from(target)]);
        let framebuffer = state.framebuffer_for(target);
        state.framebuffer_status(framebuffer)
    }

    // --- Framebuffers, direct state access ---

    fn create_framebuffer(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.framebuffers.insert(name, Framebuffer::default());
        state.record("create_framebuffer", vec![i64::from(name)]);
        name
    }

    fn named_framebuffer_texture(
        &self,
        framebuffer: u32,
        attachment: u32,
        texture: u32,
        level: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(framebuffer),
            i64::from(attachment),
            i64::from(texture),
            i64::from(level),
        ];
        state.record("named_framebuffer_texture", args);
        let bound = Attachment {
            texture,
            level,
            layer: None,
        };
        state.attach(framebuffer, attachment, bound);
    }

    fn named_framebuffer_texture_layer(
        &self,
        framebuffer: u32,
        attachment: u32,
        texture: u32,
        level: i32,
        layer: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(framebuffer),
            i64::from(attachment),
            i64::from(texture),
            i64::from(level),
            i64::from(layer),
        ];
        state.record("named_framebuffer_texture_layer", args);
        let bound = Attachment {
            texture,
            level,
            layer: Some(layer.max(0) as u32),
        };
        state.attach(framebuffer, attachment, bound);
    }

    fn named_framebuffer_draw_buffers(&self, framebuffer: u32, buffers: &[u32]) {
        let mut state = self.state.borrow_mut();
        let mut args = vec![i64::from(framebuffer)];
        args.extend(buffers.iter().map(|b| i64::from(*b)));
        state.record("named_framebuffer_draw_buffers", args);
        match state.framebuffers.get_mut(&framebuffer) {
            Some(fb) => fb.draw_buffers = Some(buffers.to_vec()),
            None => state.error(glow::INVALID_OPERATION),
        }
    }

    fn check_named_framebuffer_status(&self, framebuffer: u32, target: u32) -> u32 {
        let mut state = self.state.borrow_mut();
        let args = vec![i64::from(framebuffer), i64::from(target)];
        state.record("check_named_framebuffer_status", args);
        state.framebuffer_status(framebuffer)
    }

    // --- Framebuffer operations ---

    fn clear_buffer_fv(&self, buffer: u32, draw_buffer: i32, values: &[f32]) {
        let mut state = self.state.borrow_mut();
        let mut args = vec![i64::from(buffer), i64::from(draw_buffer)];
        args.extend(values.iter().map(|v| float_arg(*v)));
        state.record("clear_buffer_fv", args);
        match buffer {
            glow::COLOR => {
                let Some(target) = state.color_target(draw_buffer) else {
                    return;
                };
                let layout = state.textures.get(&target.texture).and_then(Texture::layout);
                let texel = layout.and_then(|layout| pixels::encode_color(&layout, values));
                match texel {
                    Some(texel) => state.fill(target, |dst, _| dst.copy_from_slice(&texel)),
                    None => state.error(glow::INVALID_OPERATION),
                }
            }
            glow::DEPTH => {
                let depth = values.first().copied();
                if let Some(target) = state.depth_stencil_target(glow::DEPTH_ATTACHMENT) {
                    state.fill(target, |dst, internal| {
                        pixels::write_depth_stencil(internal, dst, depth, None)
                    });
                }
            }
            _ => state.error(glow::INVALID_ENUM),
        }
    }

    fn clear_buffer_iv(&self, buffer: u32, draw_buffer: i32, values: &[i32]) {
        let mut state = self.state.borrow_mut();
        let mut args = vec![i64::from(buffer), i64::from(draw_buffer)];
        args.extend(values.iter().map(|v| i64::from(*v)));
        state.record("clear_buffer_iv", args);
        match buffer {
            glow::COLOR => {
                let Some(target) = state.color_target(draw_buffer) else {
                    return;
                };
                let layout = state.textures.get(&target.texture).and_then(Texture::layout);
                let texel = layout.and_then(|layout| pixels::encode_int(&layout, values));
                match texel {
                    Some(texel) => state.fill(target, |dst, _| dst.copy_from_slice(&texel)),
                    None => state.error(glow::INVALID_OPERATION),
                }
            }
            glow::STENCIL => {
                let stencil = values.first().copied();
                if let Some(target) = state.depth_stencil_target(glow::STENCIL_ATTACHMENT) {
                    state.fill(target, |dst, internal| {
                        pixels::write_depth_stencil(internal, dst, None, stencil)
                    });
                }
            }
            _ => state.error(glow::INVALID_ENUM),
        }
    }

    fn clear_buffer_fi(&self, buffer: u32, draw_buffer: i32, depth: f32, stencil: i32) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(buffer),
            i64::from(draw_buffer),
            float_arg(depth),
            i64::from(stencil),
        ];
        state.record("clear_buffer_fi", args);
        if buffer != glow::DEPTH_STENCIL {
            state.error(glow::INVALID_ENUM);
            return;
        }
        if let Some(target) = state.depth_stencil_target(glow::DEPTH_STENCIL_ATTACHMENT) {
            state.fill(target, |dst, internal| {
                pixels::write_depth_stencil(internal, dst, Some(depth), Some(stencil))
            });
        }
    }

    fn invalidate_framebuffer(&self, target: u32, attachments: &[u32]) {
        let mut args = vec![i64::from(target)];
        args.extend(attachments.iter().map(|a| i64::from(*a)));
        self.record("invalidate_framebuffer", args);
    }

    fn blit_framebuffer(&self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        let mut args: Vec<i64> = src.iter().chain(dst.iter()).map(|v| i64::from(*v)).collect();
        args.extend([i64::from(mask), i64::from(filter)]);
        self.record("blit_framebuffer", args);
    }

    fn read_buffer(&self, src: u32) {
        let mut state = self.state.borrow_mut();
        state.record("read_buffer", vec![i64::from(src)]);
        let framebuffer = state.read_framebuffer;
        if let Some(fb) = state.framebuffers.get_mut(&framebuffer) {
            fb.read_buffer = src;
        }
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
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(target),
            i64::from(level),
            i64::from(x_offset),
            i64::from(y_offset),
            i64::from(x),
            i64::from(y),
            i64::from(width),
            i64::from(height),
        ];
        state.record("copy_tex_sub_image_2d", args);
        let Some((texture, face)) = state.bound_texture(target) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let Some(texels) = state.read_source(x, y, width, height) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let z = face.unwrap_or(0) as i32;
        let region = Region::new(x_offset, y_offset, z, width, height, 1);
        state.write_texture(texture, level, region, &texels);
    }

    fn copy_texture_sub_image_2d(
        &self,
        texture: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(level),
            i64::from(x_offset),
            i64::from(y_offset),
            i64::from(x),
            i64::from(y),
            i64::from(width),
            i64::from(height),
        ];
        state.record("copy_texture_sub_image_2d", args);
        let Some(texels) = state.read_source(x, y, width, height) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let region = Region::new(x_offset, y_offset, 0, width, height, 1);
        state.write_texture(texture, level, region, &texels);
    }

    fn copy_texture_sub_image_3d(
        &self,
        texture: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        z_offset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let args = vec![
            i64::from(texture),
            i64::from(level),
            i64::from(x_offset),
            i64::from(y_offset),
            i64::from(z_offset),
            i64::from(x),
            i64::from(y),
            i64::from(width),
            i64::from(height),
        ];
        state.record("copy_texture_sub_image_3d", args);
        let Some(texels) = state.read_source(x, y, width, height) else {
            state.error(glow::INVALID_OPERATION);
            return;
        };
        let region = Region::new(x_offset, y_offset, z_offset, width, height, 1);
        state.write_texture(texture, level, region, &texels);
    }

    // --- Shaders and programs ---

    fn create_shader(&self, ty: u32) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        let shader = Shader {
            ty,
            source: String::new(),
            compiled: false,
            log: String::new(),
        };
        state.shaders.insert(name, shader);
        state.record("create_shader", vec![i64::from(ty), i64::from(name)]);
        name
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        state.record("shader_source", vec![i64::from(shader), source.len() as i64]);
        match state.shaders.get_mut(&shader) {
            Some(stored) => stored.source = source.to_owned(),
            None => state.error(glow::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.record("compile_shader", vec![i64::from(shader)]);
        match state.shaders.get_mut(&shader) {
            Some(stored) => match reflect::validate(&stored.source) {
                Ok(()) => {
                    stored.compiled = true;
                    stored.log.clear();
                }
                Err(log) => {
                    stored.compiled = false;
                    stored.log = log;
                }
            },
            None => state.error(glow::INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state.borrow().shaders.get(&shader).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let state = self.state.borrow();
        state.shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.record("delete_shader", vec![i64::from(shader)]);
    }

    fn create_program(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.programs.insert(name, Program::default());
        state.record("create_program", vec![i64::from(name)]);
        name
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.record("attach_shader", vec![i64::from(program), i64::from(shader)]);
        match state.programs.get_mut(&program) {
            Some(prog) => prog.shaders.push(shader),
            None => state.error(glow::INVALID_VALUE),
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.record("link_program", vec![i64::from(program)]);
        state.link(program);
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().programs.get(&program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        let state = self.state.borrow();
        state.programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.uniforms.retain(|(owner, _), _| *owner != program);
        if state.current_program == program {
            state.current_program = 0;
        }
        state.record("delete_program", vec![i64::from(program)]);
    }

    fn use_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.current_program = program;
        state.record("use_program", vec![i64::from(program)]);
    }

    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable> {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|p| p.attributes.iter().map(|(v, _)| v.clone()).collect())
            .unwrap_or_default()
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let prog = state.programs.get(&program)?;
        prog.attributes
            .iter()
            .find(|(v, _)| v.name == name)
            .map(|(_, location)| *location)
    }

    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable> {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|p| p.uniforms.iter().map(|(v, _)| v.clone()).collect())
            .unwrap_or_default()
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        let state = self.state.borrow();
        let prog = state.programs.get(&program)?;
        let (base, element) = match name.strip_suffix(']').and_then(|n| n.rsplit_once('[')) {
            Some((base, index)) => (base, index.parse::<i32>().ok()?),
            None => (name, 0),
        };
        prog.uniforms.iter().find_map(|(variable, location)| {
            let stem = variable.name.strip_suffix("[0]").unwrap_or(&variable.name);
            (stem == base && element < variable.size).then_some(location + element)
        })
    }

    fn active_uniform_blocks(&self, program: u32) -> Vec<ActiveBlock> {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|p| p.blocks.clone())
            .unwrap_or_default()
    }

    fn uniform_block_binding(&self, program: u32, index: u32, binding: u32) {
        let args = [program, index, binding].map(i64::from).to_vec();
        self.record("uniform_block_binding", args);
    }

    fn program_uniform(&self, program: u32, location: i32, data: UniformData<'_>) {
        let mut state = self.state.borrow_mut();
        let (recorded, width) = match data {
            UniformData::I32 { components, values } => {
                (RecordedUniform::I32(values.to_vec()), components)
            }
            UniformData::U32 { components, values } => {
                (RecordedUniform::U32(values.to_vec()), components)
            }
            UniformData::F32 { components, values } => {
                (RecordedUniform::F32(values.to_vec()), components)
            }
            UniformData::Mat { dim, values } => (RecordedUniform::F32(values.to_vec()), dim * dim),
        };
        let args = vec![i64::from(program), i64::from(location), i64::from(width)];
        state.record("program_uniform", args);
        state.uniforms.insert((program, location), recorded);
    }

    // --- Vertex arrays ---

    fn create_vertex_array(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.gen();
        state.vertex_arrays.insert(name);
        state.record("create_vertex_array", vec![i64::from(name)]);
        name
    }

    fn bind_vertex_array(&self, vao: u32) {
        self.record("bind_vertex_array", vec![i64::from(vao)]);
    }

    fn delete_vertex_array(&self, vao: u32) {
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vao);
        state.record("delete_vertex_array", vec![i64::from(vao)]);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record("enable_vertex_attrib_array", vec![i64::from(index)]);
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record("disable_vertex_attrib_array", vec![i64::from(index)]);
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
        let args = vec![
            i64::from(index),
            i64::from(size),
            i64::from(ty),
            bool_arg(normalized),
            i64::from(stride),
            offset as i64,
        ];
        self.record("vertex_attrib_pointer", args);
    }

    fn vertex_attrib_i_pointer(&self, index: u32, size: i32, ty: u32, stride: i32, offset: usize) {
        let args = vec![
            i64::from(index),
            i64::from(size),
            i64::from(ty),
            i64::from(stride),
            offset as i64,
        ];
        self.record("vertex_attrib_i_pointer", args);
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        self.record("vertex_attrib_divisor", vec![i64::from(index), i64::from(divisor)]);
    }

    fn vertex_attrib_format(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        relative_offset: u32,
    ) {
        let args = vec![
            i64::from(index),
            i64::from(size),
            i64::from(ty),
            bool_arg(normalized),
            i64::from(relative_offset),
        ];
        self.record("vertex_attrib_format", args);
    }

    fn vertex_attrib_i_format(&self, index: u32, size: i32, ty: u32, relative_offset: u32) {
        let args = vec![
            i64::from(index),
            i64::from(size),
            i64::from(ty),
            i64::from(relative_offset),
        ];
        self.record("vertex_attrib_i_format", args);
    }

    fn vertex_attrib_binding(&self, index: u32, binding: u32) {
        self.record("vertex_attrib_binding", vec![i64::from(index), i64::from(binding)]);
    }

    fn bind_vertex_buffer(&self, binding: u32, buffer: u32, offset: usize, stride: i32) {
        let args = vec![
            i64::from(binding),
            i64::from(buffer),
            offset as i64,
            i64::from(stride),
        ];
        self.record("bind_vertex_buffer", args);
    }

    fn vertex_binding_divisor(&self, binding: u32, divisor: u32) {
        self.record("vertex_binding_divisor", vec![i64::from(binding), i64::from(divisor)]);
    }

    // --- GL_NV_vertex_buffer_unified_memory ---

    fn enable_client_state(&self, cap: u32) {
        self.record("enable_client_state", vec![i64::from(cap)]);
    }

    fn disable_client_state(&self, cap: u32) {
        self.record("disable_client_state", vec![i64::from(cap)]);
    }

    fn buffer_address_range_nv(&self, pname: u32, index: u32, address: u64, length: usize) {
        let args = vec![
            i64::from(pname),
            i64::from(index),
            address as i64,
            length as i64,
        ];
        self.record("buffer_address_range_nv", args);
    }

    fn vertex_attrib_format_nv(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
    ) {
        let args = vec![
            i64::from(index),
            i64::from(size),
            i64::from(ty),
            bool_arg(normalized),
            i64::from(stride),
        ];
        self.record("vertex_attrib_format_nv", args);
    }

    fn make_named_buffer_resident_nv(&self, buffer: u32, access: u32) {
        let mut state = self.state.borrow_mut();
        let args = vec![i64::from(buffer), i64::from(access)];
        state.record("make_named_buffer_resident_nv", args);
        match state.buffers.get_mut(&buffer) {
            Some(stored) => stored.resident = true,
            None => state.error(glow::INVALID_OPERATION),
        }
    }

    fn buffer_gpu_address_nv(&self, buffer: u32) -> u64 {
        let state = self.state.borrow();
        match state.buffers.get(&buffer) {
            Some(stored) if stored.resident => 0x1_0000_0000 + (u64::from(buffer) << 24),
            _ => 0,
        }
    }

    // --- Draws ---

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instances: i32) {
        let args = vec![
            i64::from(mode),
            i64::from(first),
            i64::from(count),
            i64::from(instances),
        ];
        self.record("draw_arrays_instanced", args);
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
        let args = vec![
            i64::from(mode),
            i64::from(count),
            i64::from(ty),
            offset as i64,
            i64::from(instances),
            i64::from(base_vertex),
        ];
        self.record("draw_elements_instanced_base_vertex", args);
    }

    fn multi_draw_arrays_indirect(&self, mode: u32, offset: usize, draw_count: i32, stride: i32) {
        let args = vec![
            i64::from(mode),
            offset as i64,
            i64::from(draw_count),
            i64::from(stride),
        ];
        self.record("multi_draw_arrays_indirect", args);
    }

    fn multi_draw_elements_indirect(
        &self,
        mode: u32,
        ty: u32,
        offset: usize,
        draw_count: i32,
        stride: i32,
    ) {
        let args = vec![
            i64::from(mode),
            i64::from(ty),
            offset as i64,
            i64::from(draw_count),
            i64::from(stride),
        ];
        self.record("multi_draw_elements_indirect", args);
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
        let mut args = vec![
            i64::from(source),
            i64::from(ty),
            i64::from(severity),
            bool_arg(enabled),
        ];
        args.extend(ids.iter().map(|id| i64::from(*id)));
        self.record("debug_message_control", args);
    }

    fn drain_debug_messages(&self) -> Vec<DebugMessage> {
        std::mem::take(&mut self.state.borrow_mut().debug_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "#version 330\n\
        layout(location = 1) in vec2 glsl_TEXCOORD0;\n\
        in vec3 glsl_POSITION0;\n\
        uniform mat4 model;\n\
        uniform vec4 tint[2];\n\
        void main() { gl_Position = model * vec4(glsl_POSITION0, 1.0); }\n";

    const FRAGMENT: &str = "#version 330\n\
        uniform sampler2D albedo;\n\
        uniform vec4 tint[2];\n\
        out vec4 color;\n\
        void main() { color = texture(albedo, vec2(0.0)) * tint[0]; }\n";

    fn link(driver: &HeadlessDriver, sources: &[(u32, &str)]) -> u32 {
        let program = driver.create_program();
        for (ty, source) in sources {
            let shader = driver.create_shader(*ty);
            driver.shader_source(shader, source);
            driver.compile_shader(shader);
            driver.attach_shader(program, shader);
        }
        driver.link_program(program);
        program
    }

    #[test]
    fn test_calls_are_recorded_in_order() {
        let driver = HeadlessDriver::new();
        driver.enable(glow::DEPTH_TEST);
        let mark = driver.mark();
        driver.disable(glow::DEPTH_TEST);
        driver.cull_face(glow::BACK);

        let since: Vec<&str> = driver.calls_since(mark).iter().map(|c| c.name).collect();
        assert_eq!(since, vec!["disable", "cull_face"]);
        assert_eq!(driver.count("enable"), 1);
        assert!(!driver.is_enabled(glow::DEPTH_TEST));
    }

    #[test]
    fn test_buffer_upload_and_map() {
        // ARRANGE
        let driver = HeadlessDriver::new();
        let buffer = driver.gen_buffer();
        driver.bind_buffer(glow::ARRAY_BUFFER, buffer);

        // ACT
        driver.buffer_data(glow::ARRAY_BUFFER, 8, Some(&[1u8, 2, 3, 4][..]), glow::STATIC_DRAW);
        driver.buffer_sub_data(glow::ARRAY_BUFFER, 4, &[9, 9]);
        let mapped = driver.map_buffer_range(glow::ARRAY_BUFFER, 2, 4, glow::MAP_READ_BIT);

        // ASSERT
        assert_eq!(mapped, Some(vec![3, 4, 9, 9]));
        assert!(driver.is_buffer_mapped(buffer));
        assert!(driver.unmap_buffer(glow::ARRAY_BUFFER));
        assert!(!driver.unmap_buffer(glow::ARRAY_BUFFER));
        assert_eq!(driver.get_error(), glow::INVALID_OPERATION);
        assert_eq!(driver.get_error(), glow::NO_ERROR);
    }

    #[test]
    fn test_clear_color_attachment_and_read_back() {
        // ARRANGE
        let driver = HeadlessDriver::new();
        let texture = driver.create_texture(glow::TEXTURE_2D);
        driver.texture_storage_2d(texture, 1, glow::RGBA8, 2, 2);
        let framebuffer = driver.create_framebuffer();
        driver.named_framebuffer_texture(framebuffer, glow::COLOR_ATTACHMENT0, texture, 0);
        driver.bind_framebuffer(glow::FRAMEBUFFER, framebuffer);

        // ACT
        driver.clear_buffer_fv(glow::COLOR, 0, &[1.0, 0.0, 0.0, 1.0]);

        // ASSERT
        let texels = driver.texture_contents(texture, 0).unwrap();
        assert_eq!(texels, [255, 0, 0, 255].repeat(4));
        let status = driver.check_named_framebuffer_status(framebuffer, glow::FRAMEBUFFER);
        assert_eq!(status, glow::FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn test_clear_respects_draw_buffer_mapping() {
        let driver = HeadlessDriver::new();
        let first = driver.create_texture(glow::TEXTURE_2D);
        let second = driver.create_texture(glow::TEXTURE_2D);
        driver.texture_storage_2d(first, 1, glow::R8, 1, 1);
        driver.texture_storage_2d(second, 1, glow::R8, 1, 1);
        let framebuffer = driver.create_framebuffer();
        driver.named_framebuffer_texture(framebuffer, glow::COLOR_ATTACHMENT0, first, 0);
        driver.named_framebuffer_texture(framebuffer, glow::COLOR_ATTACHMENT1, second, 0);
        driver.named_framebuffer_draw_buffers(
            framebuffer,
            &[glow::COLOR_ATTACHMENT0, glow::COLOR_ATTACHMENT1],
        );
        driver.bind_framebuffer(glow::FRAMEBUFFER, framebuffer);

        driver.clear_buffer_fv(glow::COLOR, 1, &[1.0, 0.0, 0.0, 0.0]);

        assert_eq!(driver.texture_contents(first, 0), Some(vec![0]));
        assert_eq!(driver.texture_contents(second, 0), Some(vec![255]));
    }

    #[test]
    fn test_depth_stencil_clear() {
        let driver = HeadlessDriver::new();
        let texture = driver.create_texture(glow::TEXTURE_2D);
        driver.texture_storage_2d(texture, 1, glow::DEPTH24_STENCIL8, 1, 1);
        let framebuffer = driver.create_framebuffer();
        driver.named_framebuffer_texture(framebuffer, glow::DEPTH_STENCIL_ATTACHMENT, texture, 0);
        driver.bind_framebuffer(glow::FRAMEBUFFER, framebuffer);

        driver.clear_buffer_fi(glow::DEPTH_STENCIL, 0, 1.0, 3);

        let texel = driver.texture_contents(texture, 0).unwrap();
        let packed = u32::from_le_bytes([texel[0], texel[1], texel[2], texel[3]]);
        assert_eq!(packed, (0x00FF_FFFF << 8) | 3);
    }

    #[test]
    fn test_cube_face_upload_lands_in_its_slice() {
        // ARRANGE
        let driver = HeadlessDriver::new();
        let texture = driver.gen_texture();
        driver.bind_texture(glow::TEXTURE_CUBE_MAP, texture);

        // ACT
        for face in 0..6u8 {
            let target = glow::TEXTURE_CUBE_MAP_POSITIVE_X + u32::from(face);
            let texel = [face; 4];
            let format = (glow::RGBA, glow::UNSIGNED_BYTE);
            driver.tex_image_2d(target, 0, glow::RGBA8, 1, 1, format.0, format.1, Some(&texel[..]));
        }

        // ASSERT
        let contents = driver.texture_contents(texture, 0).unwrap();
        assert_eq!(contents.len(), 24);
        assert_eq!(contents[12..16], [3, 3, 3, 3]);
        assert_eq!(driver.texture_extent(texture, 0), Some((1, 1, 6)));
    }

    #[test]
    fn test_get_texture_sub_image_writes_pack_buffer() {
        // ARRANGE
        let driver = HeadlessDriver::new();
        let texture = driver.create_texture(glow::TEXTURE_2D);
        driver.texture_storage_2d(texture, 1, glow::RG8, 2, 1);
        let (format, ty) = (glow::RG, glow::UNSIGNED_BYTE);
        driver.texture_sub_image_2d(texture, 0, 0, 0, 2, 1, format, ty, &[1, 2, 3, 4]);
        let pack = driver.create_buffer();
        driver.named_buffer_storage(pack, 6, None, glow::MAP_READ_BIT);
        driver.bind_buffer(glow::PIXEL_PACK_BUFFER, pack);

        // ACT
        driver.get_texture_sub_image(texture, 0, 1, 0, 0, 1, 1, 1, format, ty, 2);

        // ASSERT
        assert_eq!(driver.buffer_contents(pack), Some(vec![0, 0, 3, 4, 0, 0]));
    }

    #[test]
    fn test_storage_allocates_mip_chain() {
        let driver = HeadlessDriver::new();
        let texture = driver.create_texture(glow::TEXTURE_2D_ARRAY);
        driver.texture_storage_3d(texture, 3, glow::RGBA8, 8, 4, 2);

        assert_eq!(driver.texture_extent(texture, 1), Some((4, 2, 2)));
        assert_eq!(driver.texture_extent(texture, 2), Some((2, 1, 2)));
        assert_eq!(driver.texture_extent(texture, 3), None);
    }

    #[test]
    fn test_generate_mipmap_downsamples() {
        let driver = HeadlessDriver::new();
        let texture = driver.create_texture(glow::TEXTURE_2D);
        driver.texture_storage_2d(texture, 1, glow::R8, 2, 2);
        let (format, ty) = (glow::RED, glow::UNSIGNED_BYTE);
        driver.texture_sub_image_2d(texture, 0, 0, 0, 2, 2, format, ty, &[7, 1, 1, 1]);

        driver.generate_texture_mipmap(texture);

        assert_eq!(driver.texture_contents(texture, 1), Some(vec![7]));
    }

    #[test]
    fn test_copy_from_read_framebuffer() {
        // ARRANGE
        let driver = HeadlessDriver::new();
        let source = driver.create_texture(glow::TEXTURE_2D);
        driver.texture_storage_2d(source, 1, glow::R8, 2, 1);
        let (format, ty) = (glow::RED, glow::UNSIGNED_BYTE);
        driver.texture_sub_image_2d(source, 0, 0, 0, 2, 1, format, ty, &[5, 6]);
        let framebuffer = driver.create_framebuffer();
        driver.named_framebuffer_texture(framebuffer, glow::COLOR_ATTACHMENT0, source, 0);
        driver.bind_framebuffer(glow::READ_FRAMEBUFFER, framebuffer);
        let target = driver.create_texture(glow::TEXTURE_2D);
        driver.texture_storage_2d(target, 1, glow::R8, 2, 1);

        // ACT
        driver.copy_texture_sub_image_2d(target, 0, 0, 0, 1, 0, 1, 1);

        // ASSERT
        assert_eq!(driver.texture_contents(target, 0), Some(vec![6, 0]));
    }

    #[test]
    fn test_missing_attachment_status() {
        let driver = HeadlessDriver::new();
        let framebuffer = driver.create_framebuffer();
        assert_eq!(
            driver.check_named_framebuffer_status(framebuffer, glow::FRAMEBUFFER),
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT
        );
        assert_eq!(driver.check_framebuffer_status(glow::FRAMEBUFFER), glow::FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn test_link_reflects_program_interface() {
        // ARRANGE
        let driver = HeadlessDriver::new();

        // ACT
        let program = link(
            &driver,
            &[(glow::VERTEX_SHADER, VERTEX), (glow::FRAGMENT_SHADER, FRAGMENT)],
        );

        // ASSERT
        assert!(driver.program_link_status(program));
        assert_eq!(driver.attrib_location(program, "glsl_TEXCOORD0"), Some(1));
        assert_eq!(driver.attrib_location(program, "glsl_POSITION0"), Some(0));
        let names: Vec<String> = driver
            .active_uniforms(program)
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["model", "tint[0]", "albedo"]);
        assert_eq!(driver.uniform_location(program, "tint"), Some(1));
        assert_eq!(driver.uniform_location(program, "tint[1]"), Some(2));
        assert_eq!(driver.uniform_location(program, "tint[2]"), None);
        assert_eq!(driver.uniform_location(program, "albedo"), Some(3));
    }

    #[test]
    fn test_compile_error_fails_link() {
        let driver = HeadlessDriver::new();
        let broken = "#version 330\n#error nope\nvoid main() {}\n";
        let program = link(&driver, &[(glow::VERTEX_SHADER, broken)]);

        assert!(!driver.program_link_status(program));
        assert!(!driver.program_info_log(program).is_empty());
    }

    #[test]
    fn test_program_uniform_is_kept() {
        let driver = HeadlessDriver::new();
        let program = driver.create_program();
        let values = [1.0, 2.0];
        driver.program_uniform(program, 4, UniformData::F32 { components: 2, values: &values });

        assert_eq!(
            driver.uniform_value(program, 4),
            Some(RecordedUniform::F32(vec![1.0, 2.0]))
        );
    }

    #[test]
    fn test_limits_and_extensions_are_configurable() {
        let driver = HeadlessDriver::new()
            .with_version(3, 3)
            .with_limit(glow::MAX_COLOR_ATTACHMENTS, 4)
            .without_extension(ext::ARB_DIRECT_STATE_ACCESS)
            .with_extension(ext::NV_VERTEX_BUFFER_UNIFIED_MEMORY);

        assert_eq!(driver.get_integer(glow::MAJOR_VERSION), 3);
        assert_eq!(driver.get_integer(glow::MAX_COLOR_ATTACHMENTS), 4);
        assert!(!driver.has_extension(ext::ARB_DIRECT_STATE_ACCESS));
        assert!(driver.has_extension(ext::NV_VERTEX_BUFFER_UNIFIED_MEMORY));
        assert_eq!(driver.get_float_range(glow::ALIASED_LINE_WIDTH_RANGE), [1.0, 8.0]);
    }

    #[test]
    fn test_resident_buffer_has_address() {
        let driver = HeadlessDriver::new();
        let buffer = driver.create_buffer();
        assert_eq!(driver.buffer_gpu_address_nv(buffer), 0);
        driver.make_named_buffer_resident_nv(buffer, glow::READ_ONLY);
        assert_ne!(driver.buffer_gpu_address_nv(buffer), 0);
    }

    #[test]
    fn test_debug_messages_drain_once() {
        let driver = HeadlessDriver::new();
        driver.push_debug_message(7, glow::DEBUG_SEVERITY_HIGH, "boom");
        assert_eq!(driver.drain_debug_messages().len(), 1);
        assert!(driver.drain_debug_messages().is_empty());
    }
}
