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

//! The native seam every GL call of the backend goes through.
//!
//! Object names are plain `u32` with `0` meaning "none", matching the GL
//! convention. Two implementations exist: [`super::GlowDriver`] over a live
//! `glow` context and [`super::HeadlessDriver`], a software stand-in that
//! records calls and keeps resource contents in memory.

/// An active vertex input or uniform reported by program introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    /// Name as reported by the driver, including any `[0]` suffix.
    pub name: String,
    /// GL type enum (`FLOAT_VEC4`, `SAMPLER_2D`, ...).
    pub gl_type: u32,
    /// Array length, 1 for non-arrays.
    pub size: i32,
}

/// A member of an active uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBlockMember {
    /// Member name.
    pub name: String,
    /// GL type enum.
    pub gl_type: u32,
    /// Byte offset inside the block.
    pub offset: i32,
}

/// An active uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBlock {
    /// Block name.
    pub name: String,
    /// Native block index.
    pub index: u32,
    /// Size of the block storage in bytes.
    pub data_size: i32,
    /// Members in declaration order.
    pub members: Vec<ActiveBlockMember>,
}

/// Values pushed to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformData<'a> {
    /// `int`/`bool` scalars or vectors, `components` wide.
    I32 {
        /// Vector width, 1 to 4.
        components: u8,
        /// Flattened values.
        values: &'a [i32],
    },
    /// `uint` scalars or vectors.
    U32 {
        /// Vector width, 1 to 4.
        components: u8,
        /// Flattened values.
        values: &'a [u32],
    },
    /// `float` scalars or vectors.
    F32 {
        /// Vector width, 1 to 4.
        components: u8,
        /// Flattened values.
        values: &'a [f32],
    },
    /// Square column-major matrices.
    Mat {
        /// 2, 3 or 4.
        dim: u8,
        /// Flattened values.
        values: &'a [f32],
    },
}

/// A native debug-output record drained from the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMessage {
    /// Driver-assigned message id.
    pub id: u32,
    /// Severity enum.
    pub severity: u32,
    /// Message text.
    pub text: String,
}

/// The subset of GL 3.3 and GL 4.5 the backend issues.
///
/// Methods take `&self`: a GL context is single-threaded and stateful, so
/// implementations use interior mutability where they keep state.
#[allow(missing_docs)]
#[allow(clippy::too_many_arguments)]
pub trait GlDriver {
    // --- Queries ---
    fn get_error(&self) -> u32;
    fn get_integer(&self, pname: u32) -> i32;
    fn get_float(&self, pname: u32) -> f32;
    fn get_float_range(&self, pname: u32) -> [f32; 2];
    fn get_string(&self, pname: u32) -> String;
    fn extensions(&self) -> Vec<String>;

    fn has_extension(&self, name: &str) -> bool {
        self.extensions().iter().any(|ext| ext == name)
    }

    // --- Capabilities and fixed-function state ---
    fn enable(&self, cap: u32);
    fn disable(&self, cap: u32);
    fn enable_i(&self, cap: u32, index: u32);
    fn disable_i(&self, cap: u32, index: u32);
    fn cull_face(&self, mode: u32);
    fn front_face(&self, mode: u32);
    fn polygon_mode(&self, face: u32, mode: u32);
    fn line_width(&self, width: f32);
    fn depth_func(&self, func: u32);
    fn depth_mask(&self, enabled: bool);
    fn polygon_offset(&self, factor: f32, units: f32);
    fn blend_func_separate_i(&self, buf: u32, src_rgb: u32, dst_rgb: u32, src_a: u32, dst_a: u32);
    fn blend_equation_separate_i(&self, buf: u32, mode_rgb: u32, mode_a: u32);
    fn color_mask_i(&self, buf: u32, r: bool, g: bool, b: bool, a: bool);
    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool);
    fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32);
    fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, pass: u32);
    fn stencil_mask_separate(&self, face: u32, mask: u32);
    fn viewport_indexed(&self, index: u32, rect: [f32; 4]);
    fn depth_range_indexed(&self, index: u32, near: f64, far: f64);
    fn scissor_indexed(&self, index: u32, x: i32, y: i32, width: i32, height: i32);
    fn pixel_store_i(&self, pname: u32, value: i32);

    // --- Buffers, bind-point model ---
    fn gen_buffer(&self) -> u32;
    fn delete_buffer(&self, buffer: u32);
    fn bind_buffer(&self, target: u32, buffer: u32);
    fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32);
    fn buffer_data(&self, target: u32, size: usize, data: Option<&[u8]>, usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]);
    /// Maps a range of the buffer bound to `target` and returns a CPU copy.
    fn map_buffer_range(
        &self,
        target: u32,
        offset: usize,
        length: usize,
        access: u32,
    ) -> Option<Vec<u8>>;
    fn unmap_buffer(&self, target: u32) -> bool;

    // --- Buffers, direct state access ---
    fn create_buffer(&self) -> u32;
    fn named_buffer_storage(&self, buffer: u32, size: usize, data: Option<&[u8]>, flags: u32);
    fn named_buffer_sub_data(&self, buffer: u32, offset: usize, data: &[u8]);
    fn map_named_buffer_range(
        &self,
        buffer: u32,
        offset: usize,
        length: usize,
        access: u32,
    ) -> Option<Vec<u8>>;
    fn unmap_named_buffer(&self, buffer: u32) -> bool;

    // --- Textures, bind-point model ---
    fn gen_texture(&self) -> u32;
    fn delete_texture(&self, texture: u32);
    /// Selects texture unit `unit` (zero-based, not `TEXTURE0 + unit`).
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: u32);
    fn tex_parameter_i(&self, target: u32, pname: u32, value: i32);
    fn tex_parameter_f(&self, target: u32, pname: u32, value: f32);
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
    );
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
    );
    fn tex_image_2d_multisample(
        &self,
        target: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        fixed: bool,
    );
    fn tex_image_3d_multisample(
        &self,
        target: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
        fixed: bool,
    );
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
    );
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
    );
    fn compressed_tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal: u32,
        width: i32,
        height: i32,
        data: &[u8],
    );
    fn compressed_tex_image_3d(
        &self,
        target: u32,
        level: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
        data: &[u8],
    );
    /// Reads a whole level of the texture bound to `target` into the bound
    /// pixel-pack buffer at `offset`.
    fn get_tex_image(&self, target: u32, level: i32, format: u32, ty: u32, offset: usize);
    fn generate_mipmap(&self, target: u32);

    // --- Textures, direct state access ---
    fn create_texture(&self, target: u32) -> u32;
    fn texture_parameter_i(&self, texture: u32, pname: u32, value: i32);
    fn texture_parameter_f(&self, texture: u32, pname: u32, value: f32);
    fn texture_storage_2d(&self, texture: u32, levels: i32, internal: u32, width: i32, height: i32);
    fn texture_storage_3d(
        &self,
        texture: u32,
        levels: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
    );
    fn texture_storage_2d_multisample(
        &self,
        texture: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        fixed: bool,
    );
    fn texture_storage_3d_multisample(
        &self,
        texture: u32,
        samples: i32,
        internal: u32,
        width: i32,
        height: i32,
        depth: i32,
        fixed: bool,
    );
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
    );
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
    );
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
    );
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
    );
    /// Reads a region into the bound pixel-pack buffer at `offset`.
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
    );
    fn generate_texture_mipmap(&self, texture: u32);
    fn bind_texture_unit(&self, unit: u32, texture: u32);

    // --- Samplers ---
    fn gen_sampler(&self) -> u32;
    fn delete_sampler(&self, sampler: u32);
    fn sampler_parameter_i(&self, sampler: u32, pname: u32, value: i32);
    fn sampler_parameter_f(&self, sampler: u32, pname: u32, value: f32);
    fn bind_sampler(&self, unit: u32, sampler: u32);

    // --- Framebuffers, bind-point model ---
    fn gen_framebuffer(&self) -> u32;
    fn delete_framebuffer(&self, framebuffer: u32);
    fn bind_framebuffer(&self, target: u32, framebuffer: u32);
    fn framebuffer_texture(&self, target: u32, attachment: u32, texture: u32, level: i32);
    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
    );
    fn framebuffer_texture_3d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
        layer: i32,
    );
    fn framebuffer_texture_layer(
        &self,
        target: u32,
        attachment: u32,
        texture: u32,
        level: i32,
        layer: i32,
    );
    fn draw_buffers(&self, buffers: &[u32]);
    fn check_framebuffer_status(&self, target: u32) -> u32;

    // --- Framebuffers, direct state access ---
    fn create_framebuffer(&self) -> u32;
    fn named_framebuffer_texture(
        &self,
        framebuffer: u32,
        attachment: u32,
        texture: u32,
        level: i32,
    );
    fn named_framebuffer_texture_layer(
        &self,
        framebuffer: u32,
        attachment: u32,
        texture: u32,
        level: i32,
        layer: i32,
    );
    fn named_framebuffer_draw_buffers(&self, framebuffer: u32, buffers: &[u32]);
    fn check_named_framebuffer_status(&self, framebuffer: u32, target: u32) -> u32;

    // --- Framebuffer operations on the bound draw/read targets ---
    fn clear_buffer_fv(&self, buffer: u32, draw_buffer: i32, values: &[f32]);
    fn clear_buffer_iv(&self, buffer: u32, draw_buffer: i32, values: &[i32]);
    fn clear_buffer_fi(&self, buffer: u32, draw_buffer: i32, depth: f32, stencil: i32);
    fn invalidate_framebuffer(&self, target: u32, attachments: &[u32]);
    fn blit_framebuffer(&self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32);
    fn read_buffer(&self, src: u32);
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
    );
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
    );
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
    );

    // --- Shaders and programs ---
    fn create_shader(&self, ty: u32) -> u32;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);
    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn delete_program(&self, program: u32);
    fn use_program(&self, program: u32);
    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable>;
    fn attrib_location(&self, program: u32, name: &str) -> Option<u32>;
    /// Active uniforms outside of uniform blocks.
    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable>;
    fn uniform_location(&self, program: u32, name: &str) -> Option<i32>;
    fn active_uniform_blocks(&self, program: u32) -> Vec<ActiveBlock>;
    fn uniform_block_binding(&self, program: u32, index: u32, binding: u32);
    fn program_uniform(&self, program: u32, location: i32, data: UniformData<'_>);

    // --- Vertex arrays ---
    fn create_vertex_array(&self) -> u32;
    fn bind_vertex_array(&self, vao: u32);
    fn delete_vertex_array(&self, vao: u32);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: usize,
    );
    fn vertex_attrib_i_pointer(&self, index: u32, size: i32, ty: u32, stride: i32, offset: usize);
    fn vertex_attrib_divisor(&self, index: u32, divisor: u32);
    fn vertex_attrib_format(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        relative_offset: u32,
    );
    fn vertex_attrib_i_format(&self, index: u32, size: i32, ty: u32, relative_offset: u32);
    fn vertex_attrib_binding(&self, index: u32, binding: u32);
    fn bind_vertex_buffer(&self, binding: u32, buffer: u32, offset: usize, stride: i32);
    fn vertex_binding_divisor(&self, binding: u32, divisor: u32);

    // --- GL_NV_vertex_buffer_unified_memory ---
    fn enable_client_state(&self, cap: u32);
    fn disable_client_state(&self, cap: u32);
    fn buffer_address_range_nv(&self, pname: u32, index: u32, address: u64, length: usize);
    fn vertex_attrib_format_nv(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
    );
    fn make_named_buffer_resident_nv(&self, buffer: u32, access: u32);
    fn buffer_gpu_address_nv(&self, buffer: u32) -> u64;

    // --- Draws ---
    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instances: i32);
    fn draw_elements_instanced_base_vertex(
        &self,
        mode: u32,
        count: i32,
        ty: u32,
        offset: usize,
        instances: i32,
        base_vertex: i32,
    );
    fn multi_draw_arrays_indirect(&self, mode: u32, offset: usize, draw_count: i32, stride: i32);
    fn multi_draw_elements_indirect(
        &self,
        mode: u32,
        ty: u32,
        offset: usize,
        draw_count: i32,
        stride: i32,
    );

    // --- Debug output ---
    fn debug_message_control(
        &self,
        source: u32,
        ty: u32,
        severity: u32,
        ids: &[u32],
        enabled: bool,
    );
    fn drain_debug_messages(&self) -> Vec<DebugMessage>;
}
