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

//! The device context: a register file of bound objects over one native
//! GL context.
//!
//! Binding is cheap and lazy. A pipeline switch diffs fixed-function state
//! against the captured snapshot, vertex streams are only pushed when a
//! slot is dirty or the pipeline changed, and descriptor values are pushed
//! once before the next draw. Any failure aborts the operation that hit
//! it and leaves everything bound as it was.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use octoon_core::graphics::api::{
    ClearFlags, ColorMask, CompareFunc, DataType, FormatKind, IndexType, Scissor, StateDesc,
    StencilFaceFlags, StencilFaceState, Viewport,
};
use octoon_core::graphics::error::{ContextError, ResourceError};
use octoon_core::graphics::settings::DEFAULT_MUTED_DEBUG_MESSAGE_IDS;

use super::buffer::GlBuffer;
use super::descriptor::GlDescriptorSet;
use super::framebuffer::GlFramebuffer;
use super::pipeline::{GlPipeline, VertexBufferSlot};
use super::program::GlProgram;
use super::shared::{GlShared, GlVariant};
use super::state::GlState;
use super::swapchain::GlSwapchain;
use super::texture::GlTexture;
use super::types::{self, IntoGl};

/// Everything a context is built from.
#[derive(Debug, Clone)]
pub struct DeviceContextDesc {
    /// Surface the context renders to and presents.
    pub swapchain: Rc<GlSwapchain>,
    /// Start with native debug output enabled.
    pub debug_control: bool,
    /// Debug message ids muted while debug output is on.
    pub muted_debug_message_ids: Vec<u32>,
}

impl DeviceContextDesc {
    /// A context over `swapchain` with debug output off.
    pub fn new(swapchain: Rc<GlSwapchain>) -> Self {
        Self {
            swapchain,
            debug_control: false,
            muted_debug_message_ids: DEFAULT_MUTED_DEBUG_MESSAGE_IDS.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexBinding {
    buffer: Rc<GlBuffer>,
    offset: usize,
    index_type: IndexType,
}

/// Records bindings and draws into one native context.
pub struct GlDeviceContext {
    shared: GlShared,
    global_vao: Cell<u32>,
    default_state: GlState,
    captured: RefCell<StateDesc>,
    state: RefCell<Option<Rc<GlState>>>,
    program: RefCell<Option<Rc<GlProgram>>>,
    pipeline: RefCell<Option<Rc<GlPipeline>>>,
    descriptor_set: RefCell<Option<Rc<GlDescriptorSet>>>,
    framebuffer: RefCell<Option<Rc<GlFramebuffer>>>,
    vertex_buffers: RefCell<Vec<VertexBufferSlot>>,
    index_buffer: RefCell<Option<IndexBinding>>,
    viewports: RefCell<Vec<Viewport>>,
    scissors: RefCell<Vec<Scissor>>,
    need_update_pipeline: Cell<bool>,
    need_update_vertex_buffers: Cell<bool>,
    need_update_descriptor: Cell<bool>,
    force_descriptor: Cell<bool>,
    debug_request: Cell<Option<bool>>,
    debug_enabled: Cell<bool>,
    desc: DeviceContextDesc,
}

impl GlDeviceContext {
    /// Makes the swapchain current and brings the native state to the
    /// defaults the captured snapshot starts from.
    pub fn setup(shared: &GlShared, desc: DeviceContextDesc) -> Result<Self, ResourceError> {
        desc.swapchain.set_active(true);
        if !desc.swapchain.active() {
            return Err(shared.fail(ResourceError::Unsupported(
                "the swapchain context can't be made current".to_owned(),
            )));
        }

        let properties = shared.properties();
        let attachments = properties.max_framebuffer_color_attachments.max(1) as usize;
        let viewports = properties.max_viewports.max(1) as usize;
        let bindings = properties.max_vertex_input_bindings.max(1) as usize;
        let default_state = GlState::setup(shared, StateDesc::with_attachments(attachments))?;

        let context = Self {
            shared: shared.clone(),
            global_vao: Cell::new(0),
            default_state,
            captured: RefCell::new(StateDesc::default()),
            state: RefCell::new(None),
            program: RefCell::new(None),
            pipeline: RefCell::new(None),
            descriptor_set: RefCell::new(None),
            framebuffer: RefCell::new(None),
            vertex_buffers: RefCell::new(vec![VertexBufferSlot::default(); bindings]),
            index_buffer: RefCell::new(None),
            viewports: RefCell::new(vec![Viewport::default(); viewports]),
            scissors: RefCell::new(vec![Scissor::default(); viewports]),
            need_update_pipeline: Cell::new(false),
            need_update_vertex_buffers: Cell::new(false),
            need_update_descriptor: Cell::new(false),
            force_descriptor: Cell::new(false),
            debug_request: Cell::new(None),
            debug_enabled: Cell::new(false),
            desc,
        };
        context.init_state_system()?;
        if context.desc.debug_control {
            context.start_debug_control();
        }

        log::info!(
            "GlDeviceContext: Created {:?} context with {} vertex slots and {} viewports",
            shared.variant(),
            bindings,
            viewports
        );
        Ok(context)
    }

    fn init_state_system(&self) -> Result<(), ResourceError> {
        let gl = self.shared.gl();
        if self.shared.variant() == GlVariant::Legacy {
            // Attribute pointers need a vertex array even on the bind-point path.
            let vao = gl.create_vertex_array();
            if vao == 0 {
                return Err(self.shared.fail(ResourceError::NativeAllocation("glGenVertexArrays")));
            }
            gl.bind_vertex_array(vao);
            self.global_vao.set(vao);
        }
        self.default_state
            .apply_with(&mut self.captured.borrow_mut(), true)
            .map_err(|err| self.shared.fail(ResourceError::from(err)))
    }

    /// The descriptor this context was built from.
    pub fn desc(&self) -> &DeviceContextDesc {
        &self.desc
    }

    /// The swapchain this context renders to.
    pub fn swapchain(&self) -> &Rc<GlSwapchain> {
        &self.desc.swapchain
    }

    /// Whether this context drives `variant`.
    pub fn is_matching_variant(&self, variant: GlVariant) -> bool {
        self.shared.variant() == variant
    }

    /// The fixed-function state the native side currently holds.
    pub fn captured_state(&self) -> StateDesc {
        self.captured.borrow().clone()
    }

    // --- Frame ---

    /// Makes the context current and applies a pending debug-output change.
    pub fn render_begin(&self) {
        self.desc.swapchain.set_active(true);
        match self.debug_request.take() {
            Some(true) => self.start_debug_control(),
            Some(false) => self.stop_debug_control(),
            None => {}
        }
    }

    /// Forwards the native debug messages of the frame to the diagnostics sink.
    pub fn render_end(&self) {
        for message in self.shared.gl().drain_debug_messages() {
            self.shared.sink().message(&format!(
                "GL debug message {} ({}): {}",
                message.id,
                severity_name(message.severity),
                message.text
            ));
        }
    }

    /// Requests native debug output on or off from the next `render_begin`.
    pub fn enable_debug_control(&self, enable: bool) {
        self.debug_request.set(Some(enable));
    }

    /// Whether native debug output is currently on.
    pub fn debug_control_enabled(&self) -> bool {
        self.debug_enabled.get()
    }

    fn start_debug_control(&self) {
        if !self.shared.properties().has_debug_output {
            self.shared.fail("Can't support GL_KHR_debug.");
            return;
        }
        let gl = self.shared.gl();
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_control(glow::DONT_CARE, glow::DONT_CARE, glow::DONT_CARE, &[], true);
        gl.debug_message_control(
            glow::DEBUG_SOURCE_API,
            glow::DEBUG_TYPE_OTHER,
            glow::DONT_CARE,
            &self.desc.muted_debug_message_ids,
            false,
        );
        self.debug_enabled.set(true);
    }

    fn stop_debug_control(&self) {
        if self.shared.properties().has_debug_output {
            let gl = self.shared.gl();
            gl.disable(glow::DEBUG_OUTPUT);
            gl.disable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        }
        self.debug_enabled.set(false);
    }

    // --- Viewports and scissors ---

    /// Sets viewport `index`. Unchanged values issue no native call.
    pub fn set_viewport(&self, index: u32, viewport: Viewport) -> Result<(), ContextError> {
        let mut viewports = self.viewports.borrow_mut();
        let count = viewports.len();
        let Some(current) = viewports.get_mut(index as usize) else {
            return Err(self.out_of_range("viewport", index, count));
        };
        let gl = self.shared.gl();
        let rect = [viewport.left, viewport.top, viewport.width, viewport.height];
        if rect != [current.left, current.top, current.width, current.height] {
            gl.viewport_indexed(index, rect);
        }
        if viewport.min_depth != current.min_depth || viewport.max_depth != current.max_depth {
            gl.depth_range_indexed(
                index,
                f64::from(viewport.min_depth),
                f64::from(viewport.max_depth),
            );
        }
        *current = viewport;
        Ok(())
    }

    /// Viewport `index`, if the device has that many.
    pub fn viewport(&self, index: u32) -> Option<Viewport> {
        self.viewports.borrow().get(index as usize).copied()
    }

    /// Sets scissor `index`, given with a top-left origin.
    pub fn set_scissor(&self, index: u32, scissor: Scissor) -> Result<(), ContextError> {
        let mut scissors = self.scissors.borrow_mut();
        let count = scissors.len();
        let Some(current) = scissors.get_mut(index as usize) else {
            return Err(self.out_of_range("scissor", index, count));
        };
        if *current != scissor {
            self.issue_scissor(index, &scissor);
            *current = scissor;
        }
        Ok(())
    }

    /// Scissor `index`, if the device has that many.
    pub fn scissor(&self, index: u32) -> Option<Scissor> {
        self.scissors.borrow().get(index as usize).copied()
    }

    /// GL counts rows from the bottom of the target.
    fn issue_scissor(&self, index: u32, scissor: &Scissor) {
        let (_, height) = self.target_size();
        let y = height as i32 - scissor.height as i32 - scissor.top;
        self.shared.gl().scissor_indexed(
            index,
            scissor.left,
            y,
            scissor.width as i32,
            scissor.height as i32,
        );
    }

    fn target_size(&self) -> (u32, u32) {
        match self.framebuffer.borrow().as_ref() {
            Some(framebuffer) => (framebuffer.desc().width, framebuffer.desc().height),
            None => {
                let desc = self.desc.swapchain.desc();
                (desc.width, desc.height)
            }
        }
    }

    // --- Stencil ---

    /// Sets the stencil read mask of the given faces.
    pub fn set_stencil_compare_mask(
        &self,
        face: StencilFaceFlags,
        mask: u32,
    ) -> Result<(), ContextError> {
        let mut captured = self.captured.borrow_mut();
        for face in faces(face) {
            let state = face_state(&mut captured, face);
            if state.read_mask != mask {
                let func = self.compare_function(state.func)?;
                let reference = state.reference as i32;
                self.shared.gl().stencil_func_separate(face.into_gl(), func, reference, mask);
                state.read_mask = mask;
            }
        }
        Ok(())
    }

    /// Stencil read mask of `face`.
    pub fn stencil_compare_mask(&self, face: StencilFaceFlags) -> u32 {
        self.stencil_face(face).read_mask
    }

    /// Sets the stencil reference of the given faces.
    pub fn set_stencil_reference(
        &self,
        face: StencilFaceFlags,
        reference: u32,
    ) -> Result<(), ContextError> {
        let mut captured = self.captured.borrow_mut();
        for face in faces(face) {
            let state = face_state(&mut captured, face);
            if state.reference != reference {
                let func = self.compare_function(state.func)?;
                let gl = self.shared.gl();
                gl.stencil_func_separate(face.into_gl(), func, reference as i32, state.read_mask);
                state.reference = reference;
            }
        }
        Ok(())
    }

    /// Stencil reference of `face`.
    pub fn stencil_reference(&self, face: StencilFaceFlags) -> u32 {
        self.stencil_face(face).reference
    }

    /// Sets the stencil write mask of the given faces.
    pub fn set_stencil_write_mask(&self, face: StencilFaceFlags, mask: u32) {
        let mut captured = self.captured.borrow_mut();
        for face in faces(face) {
            let state = face_state(&mut captured, face);
            if state.write_mask != mask {
                self.shared.gl().stencil_mask_separate(face.into_gl(), mask);
                state.write_mask = mask;
            }
        }
    }

    /// Stencil write mask of `face`.
    pub fn stencil_write_mask(&self, face: StencilFaceFlags) -> u32 {
        self.stencil_face(face).write_mask
    }

    fn stencil_face(&self, face: StencilFaceFlags) -> StencilFaceState {
        debug_assert!(
            face == StencilFaceFlags::FRONT || face == StencilFaceFlags::BACK,
            "query one stencil face at a time"
        );
        let captured = self.captured.borrow();
        if face.contains(StencilFaceFlags::FRONT) {
            captured.stencil_front
        } else {
            captured.stencil_back
        }
    }

    fn compare_function(&self, func: CompareFunc) -> Result<u32, ContextError> {
        types::require(types::as_compare_function(func), "compare function", func)
            .map_err(|err| self.shared.fail(ContextError::from(err)))
    }

    // --- Pipeline, descriptors and streams ---

    /// Binds `pipeline`. Switching diffs its state against the captured
    /// one and changes program only when it differs.
    pub fn set_render_pipeline(&self, pipeline: Rc<GlPipeline>) -> Result<(), ContextError> {
        let previous = self.pipeline.borrow().clone();
        let same_pipeline = previous.as_ref().is_some_and(|current| Rc::ptr_eq(current, &pipeline));
        let desc = pipeline.desc();
        let same_state = self
            .state
            .borrow()
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &desc.state));
        if !same_state {
            desc.state
                .apply(&mut self.captured.borrow_mut())
                .map_err(|err| self.shared.fail(ContextError::from(err)))?;
            *self.state.borrow_mut() = Some(desc.state.clone());
        }
        // Going back to the window drops the tracked state but keeps the pipeline.
        if same_pipeline {
            return Ok(());
        }

        let same_program = self
            .program
            .borrow()
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &desc.program));
        if !same_program {
            self.shared.gl().use_program(desc.program.instance_id());
            *self.program.borrow_mut() = Some(desc.program.clone());
            if self.descriptor_set.borrow().is_some() {
                self.need_update_descriptor.set(true);
                self.force_descriptor.set(true);
            }
        }

        pipeline.switch_from(previous.as_deref());
        if self.shared.variant() == GlVariant::Core {
            // The element array binding belongs to the vertex array object.
            if let Some(index) = self.index_buffer.borrow().as_ref() {
                let handle = index.buffer.instance_id();
                self.shared.gl().bind_buffer(glow::ELEMENT_ARRAY_BUFFER, handle);
            }
        }

        *self.pipeline.borrow_mut() = Some(pipeline);
        self.need_update_pipeline.set(true);
        Ok(())
    }

    /// The bound pipeline.
    pub fn render_pipeline(&self) -> Option<Rc<GlPipeline>> {
        self.pipeline.borrow().clone()
    }

    /// Binds `descriptor_set`. Its values reach the program before the next draw.
    pub fn set_descriptor_set(&self, descriptor_set: Rc<GlDescriptorSet>) {
        let mut current = self.descriptor_set.borrow_mut();
        if !current.as_ref().is_some_and(|set| Rc::ptr_eq(set, &descriptor_set)) {
            *current = Some(descriptor_set);
            self.force_descriptor.set(true);
        }
        self.need_update_descriptor.set(true);
    }

    /// The bound descriptor set.
    pub fn descriptor_set(&self) -> Option<Rc<GlDescriptorSet>> {
        self.descriptor_set.borrow().clone()
    }

    /// Points vertex stream `slot` at `buffer`. Nothing reaches the native
    /// side until the next draw.
    pub fn set_vertex_buffer_data(
        &self,
        slot: u32,
        buffer: Rc<GlBuffer>,
        offset: usize,
    ) -> Result<(), ContextError> {
        if buffer.desc().data_type != DataType::StorageVertexBuffer {
            return Err(self.shared.fail(ContextError::InvalidInput(format!(
                "{:?} bound as a vertex buffer",
                buffer.desc().data_type
            ))));
        }
        let mut slots = self.vertex_buffers.borrow_mut();
        let count = slots.len();
        let Some(current) = slots.get_mut(slot as usize) else {
            return Err(self.out_of_range("vertex buffer slot", slot, count));
        };
        let same = current.buffer.as_ref().is_some_and(|bound| Rc::ptr_eq(bound, &buffer));
        if !same || current.offset != offset {
            current.buffer = Some(buffer);
            current.offset = offset;
            current.dirty = true;
            self.need_update_vertex_buffers.set(true);
        }
        Ok(())
    }

    /// The buffer bound to vertex stream `slot`.
    pub fn vertex_buffer_data(&self, slot: u32) -> Option<Rc<GlBuffer>> {
        let slots = self.vertex_buffers.borrow();
        slots.get(slot as usize).and_then(|slot| slot.buffer.clone())
    }

    /// Binds the index buffer immediately.
    pub fn set_index_buffer_data(
        &self,
        buffer: Rc<GlBuffer>,
        offset: usize,
        index_type: IndexType,
    ) -> Result<(), ContextError> {
        if buffer.desc().data_type != DataType::StorageIndexBuffer {
            return Err(self.shared.fail(ContextError::InvalidInput(format!(
                "{:?} bound as an index buffer",
                buffer.desc().data_type
            ))));
        }
        let mut current = self.index_buffer.borrow_mut();
        let same = current.as_ref().is_some_and(|bound| Rc::ptr_eq(&bound.buffer, &buffer));
        if !same {
            self.shared.gl().bind_buffer(glow::ELEMENT_ARRAY_BUFFER, buffer.instance_id());
        }
        *current = Some(IndexBinding {
            buffer,
            offset,
            index_type,
        });
        Ok(())
    }

    /// The bound index buffer.
    pub fn index_buffer_data(&self) -> Option<Rc<GlBuffer>> {
        self.index_buffer.borrow().as_ref().map(|index| index.buffer.clone())
    }

    // --- Framebuffers ---

    /// Binds `framebuffer`, or the window's back buffer for `None`.
    ///
    /// Binding a framebuffer resets the viewports of its color attachments
    /// to cover it. Going back to the window restores the default state.
    pub fn set_framebuffer(
        &self,
        framebuffer: Option<Rc<GlFramebuffer>>,
    ) -> Result<(), ContextError> {
        let gl = self.shared.gl();
        match framebuffer {
            Some(framebuffer) => {
                let same = self
                    .framebuffer
                    .borrow()
                    .as_ref()
                    .is_some_and(|current| Rc::ptr_eq(current, &framebuffer));
                if same {
                    return Ok(());
                }
                gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer.instance_id());
                let desc = framebuffer.desc();
                let (width, height) = (desc.width as f32, desc.height as f32);
                let count = desc.color_attachments.len().max(1);
                *self.framebuffer.borrow_mut() = Some(framebuffer);

                let count = count.min(self.viewports.borrow().len());
                for index in 0..count as u32 {
                    self.set_viewport(index, Viewport::new(0.0, 0.0, width, height))?;
                    let scissor = self.scissors.borrow()[index as usize];
                    self.issue_scissor(index, &scissor);
                }
            }
            None => {
                gl.bind_framebuffer(glow::FRAMEBUFFER, 0);
                *self.framebuffer.borrow_mut() = None;
                if self.state.borrow_mut().take().is_some() {
                    self.default_state
                        .apply(&mut self.captured.borrow_mut())
                        .map_err(|err| self.shared.fail(ContextError::from(err)))?;
                }
            }
        }
        Ok(())
    }

    /// The bound framebuffer, `None` for the window.
    pub fn framebuffer(&self) -> Option<Rc<GlFramebuffer>> {
        self.framebuffer.borrow().clone()
    }

    /// Clears color attachment `attachment` and/or the depth-stencil
    /// attachment of the bound target, ignoring the write masks and the
    /// scissor of the captured state.
    pub fn clear_framebuffer(
        &self,
        attachment: u32,
        flags: ClearFlags,
        color: [f32; 4],
        depth: f32,
        stencil: i32,
    ) -> Result<(), ContextError> {
        let framebuffer = self.framebuffer.borrow().clone();
        let color_binding = framebuffer
            .as_ref()
            .and_then(|fb| fb.desc().color_attachments.get(attachment as usize));
        if flags.contains(ClearFlags::COLOR) && framebuffer.is_some() && color_binding.is_none() {
            return Err(self.shared.fail(ContextError::InvalidInput(format!(
                "color attachment {attachment} is not bound"
            ))));
        }

        let gl = self.shared.gl();
        let captured = self.captured.borrow();
        let (width, height) = self.target_size();
        if captured.scissor_test_enable {
            gl.scissor_indexed(0, 0, 0, width as i32, height as i32);
        }

        if flags.contains(ClearFlags::DEPTH) {
            let restore = !captured.depth_write_enable;
            if restore {
                gl.depth_mask(true);
            }
            if flags.contains(ClearFlags::STENCIL) {
                gl.clear_buffer_fi(glow::DEPTH_STENCIL, 0, depth, stencil);
            } else {
                gl.clear_buffer_fv(glow::DEPTH, 0, &[depth]);
            }
            if restore {
                gl.depth_mask(false);
            }
        } else if flags.contains(ClearFlags::STENCIL) {
            gl.clear_buffer_iv(glow::STENCIL, 0, &[stencil]);
        }

        if flags.contains(ClearFlags::COLOR) {
            let mask = captured
                .color_blends
                .get(attachment as usize)
                .map_or(ColorMask::RGBA, |blend| blend.color_write_mask);
            let forced = mask != ColorMask::RGBA;
            if forced {
                gl.color_mask_i(attachment, true, true, true, true);
            }
            let integer = color_binding
                .is_some_and(|binding| binding.texture.desc().format.kind() == FormatKind::Integer);
            if integer {
                gl.clear_buffer_iv(glow::COLOR, attachment as i32, &color.map(|c| c as i32));
            } else {
                gl.clear_buffer_fv(glow::COLOR, attachment as i32, &color);
            }
            if forced {
                gl.color_mask_i(
                    attachment,
                    mask.contains(ColorMask::R),
                    mask.contains(ColorMask::G),
                    mask.contains(ColorMask::B),
                    mask.contains(ColorMask::A),
                );
            }
        }

        if captured.scissor_test_enable {
            let scissor = self.scissors.borrow()[0];
            self.issue_scissor(0, &scissor);
        }
        Ok(())
    }

    /// Tells the driver the contents of the selected attachments of
    /// `framebuffer` are no longer needed.
    pub fn discard_framebuffer(&self, framebuffer: &GlFramebuffer, flags: ClearFlags) {
        let mut points = Vec::new();
        if flags.contains(ClearFlags::COLOR) {
            points.extend_from_slice(framebuffer.color_points());
        }
        if flags.intersects(ClearFlags::DEPTH_STENCIL) {
            points.extend(framebuffer.depth_stencil_point());
        }
        if points.is_empty() {
            return;
        }

        let gl = self.shared.gl();
        let current = self.bound_framebuffer_id();
        let handle = framebuffer.instance_id();
        if handle != current {
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, handle);
        }
        gl.invalidate_framebuffer(glow::DRAW_FRAMEBUFFER, &points);
        if handle != current {
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, current);
        }
    }

    /// Copies the color of `src` into `dst`, or into the window for `None`.
    /// Rectangles are `[x0, y0, x1, y1]` corners.
    pub fn blit_framebuffer(
        &self,
        src: &GlFramebuffer,
        src_rect: [i32; 4],
        dst: Option<&GlFramebuffer>,
        dst_rect: [i32; 4],
    ) {
        let gl = self.shared.gl();
        gl.bind_framebuffer(glow::READ_FRAMEBUFFER, src.instance_id());
        gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, dst.map_or(0, GlFramebuffer::instance_id));
        gl.blit_framebuffer(src_rect, dst_rect, glow::COLOR_BUFFER_BIT, glow::NEAREST);
        gl.bind_framebuffer(glow::FRAMEBUFFER, self.bound_framebuffer_id());
    }

    /// Copies `rect` of color attachment `attachment` of the bound target
    /// into mip `mip` of `texture`.
    pub fn read_framebuffer_to_texture(
        &self,
        attachment: u32,
        texture: &GlTexture,
        mip: u32,
        rect: Scissor,
    ) -> Result<(), ContextError> {
        self.check_copy_target(texture)?;
        let gl = self.shared.gl();
        self.select_read_buffer(attachment);
        let (x, y, width, height) = (rect.left, rect.top, rect.width as i32, rect.height as i32);
        match self.shared.variant() {
            GlVariant::Legacy => {
                let target = texture.target();
                gl.bind_texture(target, texture.instance_id());
                gl.copy_tex_sub_image_2d(target, mip as i32, 0, 0, x, y, width, height);
                gl.bind_texture(target, 0);
            }
            GlVariant::Core => {
                let handle = texture.instance_id();
                gl.copy_texture_sub_image_2d(handle, mip as i32, 0, 0, x, y, width, height);
            }
        }
        Ok(())
    }

    /// Like [`Self::read_framebuffer_to_texture`] for one face of a cube map.
    pub fn read_framebuffer_to_cube(
        &self,
        attachment: u32,
        texture: &GlTexture,
        face: u32,
        mip: u32,
        rect: Scissor,
    ) -> Result<(), ContextError> {
        if face >= 6 {
            return Err(self.out_of_range("cube face", face, 6));
        }
        self.check_copy_target(texture)?;
        let gl = self.shared.gl();
        self.select_read_buffer(attachment);
        let (x, y, width, height) = (rect.left, rect.top, rect.width as i32, rect.height as i32);
        let level = mip as i32;
        match self.shared.variant() {
            GlVariant::Legacy => {
                gl.bind_texture(glow::TEXTURE_CUBE_MAP, texture.instance_id());
                let target = glow::TEXTURE_CUBE_MAP_POSITIVE_X + face;
                gl.copy_tex_sub_image_2d(target, level, 0, 0, x, y, width, height);
                gl.bind_texture(glow::TEXTURE_CUBE_MAP, 0);
            }
            GlVariant::Core => {
                let handle = texture.instance_id();
                let z = face as i32;
                gl.copy_texture_sub_image_3d(handle, level, 0, 0, z, x, y, width, height);
            }
        }
        Ok(())
    }

    /// Rebuilds the mip chain of `texture`.
    pub fn generate_mipmap(&self, texture: &GlTexture) {
        texture.generate_mipmap();
    }

    fn check_copy_target(&self, texture: &GlTexture) -> Result<(), ContextError> {
        let format = texture.desc().format;
        types::require(types::as_texture_internal_format(format), "texture format", format)
            .map(|_| ())
            .map_err(|err| self.shared.fail(ContextError::from(err)))
    }

    fn select_read_buffer(&self, attachment: u32) {
        let source = if self.framebuffer.borrow().is_some() {
            glow::COLOR_ATTACHMENT0 + attachment
        } else {
            glow::BACK
        };
        self.shared.gl().read_buffer(source);
    }

    fn bound_framebuffer_id(&self) -> u32 {
        self.framebuffer.borrow().as_ref().map_or(0, |fb| fb.instance_id())
    }

    // --- Draws ---

    /// Draws `vertices` vertices from the bound streams.
    pub fn draw(
        &self,
        vertices: u32,
        instances: u32,
        start_vertex: u32,
        start_instance: u32,
    ) -> Result<(), ContextError> {
        self.check_start_instance(start_instance)?;
        let mode = self.prepare_draw()?;
        if vertices > 0 {
            self.shared.gl().draw_arrays_instanced(
                mode,
                start_vertex as i32,
                vertices as i32,
                instances as i32,
            );
        }
        Ok(())
    }

    /// Draws `indices` indices from the bound index buffer.
    pub fn draw_indexed(
        &self,
        indices: u32,
        instances: u32,
        start_index: u32,
        start_vertex: u32,
        start_instance: u32,
    ) -> Result<(), ContextError> {
        self.check_start_instance(start_instance)?;
        let (index_type, offset) = self.index_binding()?;
        let mode = self.prepare_draw()?;
        if indices > 0 {
            let offset = offset + (index_type.byte_size() * start_index) as usize;
            self.shared.gl().draw_elements_instanced_base_vertex(
                mode,
                indices as i32,
                index_type.into_gl(),
                offset,
                instances as i32,
                start_vertex as i32,
            );
        }
        Ok(())
    }

    /// Draws with arguments read from `buffer`.
    pub fn draw_indirect(
        &self,
        buffer: &GlBuffer,
        offset: usize,
        draw_count: u32,
        stride: u32,
    ) -> Result<(), ContextError> {
        self.check_indirect(buffer)?;
        let mode = self.prepare_draw()?;
        let gl = self.shared.gl();
        gl.bind_buffer(glow::DRAW_INDIRECT_BUFFER, buffer.instance_id());
        if draw_count > 0 {
            gl.multi_draw_arrays_indirect(mode, offset, draw_count as i32, stride as i32);
        }
        Ok(())
    }

    /// Indexed draws with arguments read from `buffer`.
    pub fn draw_indexed_indirect(
        &self,
        buffer: &GlBuffer,
        offset: usize,
        draw_count: u32,
        stride: u32,
    ) -> Result<(), ContextError> {
        self.check_indirect(buffer)?;
        let (index_type, _) = self.index_binding()?;
        let mode = self.prepare_draw()?;
        let gl = self.shared.gl();
        gl.bind_buffer(glow::DRAW_INDIRECT_BUFFER, buffer.instance_id());
        if draw_count > 0 {
            let ty = index_type.into_gl();
            gl.multi_draw_elements_indirect(mode, ty, offset, draw_count as i32, stride as i32);
        }
        Ok(())
    }

    /// Presents the swapchain's back buffer.
    pub fn present(&self) -> Result<(), ContextError> {
        self.desc.swapchain.present()
    }

    fn check_start_instance(&self, start_instance: u32) -> Result<(), ContextError> {
        debug_assert!(start_instance == 0, "start instance {start_instance} is not supported");
        if start_instance != 0 {
            return Err(self.shared.fail(ContextError::Unsupported(format!(
                "start instance {start_instance}"
            ))));
        }
        Ok(())
    }

    fn check_indirect(&self, buffer: &GlBuffer) -> Result<(), ContextError> {
        if buffer.desc().data_type != DataType::IndirectBuffer {
            return Err(self.shared.fail(ContextError::InvalidInput(format!(
                "{:?} used for indirect arguments",
                buffer.desc().data_type
            ))));
        }
        Ok(())
    }

    fn index_binding(&self) -> Result<(IndexType, usize), ContextError> {
        self.index_buffer
            .borrow()
            .as_ref()
            .map(|index| (index.index_type, index.offset))
            .ok_or_else(|| self.shared.fail(ContextError::NoIndexBuffer))
    }

    /// Flushes pending vertex streams and descriptor values and returns the
    /// native primitive mode.
    fn prepare_draw(&self) -> Result<u32, ContextError> {
        let pipeline = self
            .pipeline
            .borrow()
            .clone()
            .ok_or_else(|| self.shared.fail(ContextError::NoPipeline))?;
        let primitive = self.captured.borrow().primitive_type;
        let mode = types::require(types::as_vertex_type(primitive), "primitive type", primitive)
            .map_err(|err| self.shared.fail(ContextError::from(err)))?;

        let force = self.need_update_pipeline.replace(false);
        if self.need_update_vertex_buffers.replace(false) || force {
            pipeline.bind_vertex_buffers(&mut self.vertex_buffers.borrow_mut(), force);
        }
        if self.need_update_descriptor.replace(false) {
            if let Some(set) = self.descriptor_set.borrow().as_ref() {
                set.apply_with(&pipeline.desc().program, self.force_descriptor.replace(false));
            }
        }
        Ok(mode)
    }

    fn out_of_range(&self, what: &str, index: u32, count: usize) -> ContextError {
        self.shared.fail(ContextError::InvalidInput(format!(
            "{what} {index} is out of range (0..{count})"
        )))
    }

    /// Releases every bound object and the context's own vertex array.
    pub fn close(&self) {
        self.pipeline.borrow_mut().take();
        self.program.borrow_mut().take();
        self.state.borrow_mut().take();
        self.descriptor_set.borrow_mut().take();
        self.framebuffer.borrow_mut().take();
        self.index_buffer.borrow_mut().take();
        for slot in self.vertex_buffers.borrow_mut().iter_mut() {
            *slot = VertexBufferSlot::default();
        }
        let vao = self.global_vao.replace(0);
        if vao != 0 {
            self.shared.gl().delete_vertex_array(vao);
        }
    }
}

impl Drop for GlDeviceContext {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GlDeviceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlDeviceContext")
            .field("variant", &self.shared.variant())
            .field("framebuffer", &self.bound_framebuffer_id())
            .field("debug_control", &self.debug_enabled.get())
            .finish_non_exhaustive()
    }
}

fn faces(face: StencilFaceFlags) -> impl Iterator<Item = StencilFaceFlags> {
    [StencilFaceFlags::FRONT, StencilFaceFlags::BACK]
        .into_iter()
        .filter(move |single| face.contains(*single))
}

fn face_state(state: &mut StateDesc, face: StencilFaceFlags) -> &mut StencilFaceState {
    if face == StencilFaceFlags::FRONT {
        &mut state.stencil_front
    } else {
        &mut state.stencil_back
    }
}

fn severity_name(severity: u32) -> &'static str {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => "high",
        glow::DEBUG_SEVERITY_MEDIUM => "medium",
        glow::DEBUG_SEVERITY_LOW => "low",
        glow::DEBUG_SEVERITY_NOTIFICATION => "notice",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::descriptor::{DescriptorSetDesc, GlDescriptorSetLayout};
    use crate::graphics::gl::ext;
    use crate::graphics::gl::framebuffer::{AttachmentBinding, FramebufferDesc, GlFramebufferLayout};
    use crate::graphics::gl::headless::{HeadlessDriver, HeadlessSurface};
    use crate::graphics::gl::input_layout::GlInputLayout;
    use crate::graphics::gl::pipeline::PipelineDesc;
    use crate::graphics::gl::program::ProgramDesc;
    use crate::graphics::gl::shader::GlShader;
    use crate::graphics::gl::shared::testing::{headless, headless_with};
    use octoon_core::graphics::api::{
        AttachmentLayout, BufferDesc, ColorBlend, DescriptorSetLayoutDesc, FramebufferLayoutDesc,
        GraphicsFormat, InputLayoutDesc, ShaderDesc, ShaderStage, SwapchainDesc, TextureDesc,
        VertexBinding, VertexLayout,
    };
    use octoon_core::graphics::traits::MemorySink;

    const VERTEX: &str = r#"
        #version 330 core
        layout(location = 0) in vec3 glsl_POSITION0;
        void main() { gl_Position = vec4(glsl_POSITION0, 1.0); }
    "#;

    const FRAGMENT: &str = r#"
        #version 330 core
        uniform vec4 tint;
        out vec4 color;
        void main() { color = tint; }
    "#;

    struct Fixture {
        driver: Rc<HeadlessDriver>,
        sink: Rc<MemorySink>,
        shared: GlShared,
        program: Rc<GlProgram>,
        input_layout: Rc<GlInputLayout>,
        context: GlDeviceContext,
    }

    fn fixture(variant: GlVariant) -> Fixture {
        let (driver, sink, shared) = headless(variant);
        fixture_over(driver, sink, shared)
    }

    fn fixture_over(driver: Rc<HeadlessDriver>, sink: Rc<MemorySink>, shared: GlShared) -> Fixture {
        let vertex = GlShader::setup(&shared, ShaderDesc::glsl(ShaderStage::Vertex, VERTEX), None);
        let fragment =
            GlShader::setup(&shared, ShaderDesc::glsl(ShaderStage::Fragment, FRAGMENT), None);
        let shaders = vec![Rc::new(vertex.unwrap()), Rc::new(fragment.unwrap())];
        let program = Rc::new(GlProgram::setup(&shared, ProgramDesc::new(shaders)).unwrap());
        let layout = InputLayoutDesc {
            layouts: vec![VertexLayout::new(0, "POSITION", 0, GraphicsFormat::R32G32B32SFloat, 0)],
            bindings: vec![VertexBinding::new(0, 12)],
        };
        let input_layout = Rc::new(GlInputLayout::setup(&shared, layout).unwrap());
        let surface = Rc::new(HeadlessSurface::new());
        let swapchain = GlSwapchain::setup(&shared, SwapchainDesc::headless(64, 64), surface);
        let desc = DeviceContextDesc::new(Rc::new(swapchain.unwrap()));
        let context = GlDeviceContext::setup(&shared, desc).unwrap();
        Fixture {
            driver,
            sink,
            shared,
            program,
            input_layout,
            context,
        }
    }

    impl Fixture {
        fn pipeline(&self, state: StateDesc) -> Rc<GlPipeline> {
            let desc = PipelineDesc::new(
                Rc::new(GlState::setup(&self.shared, state).unwrap()),
                self.program.clone(),
                self.input_layout.clone(),
            );
            Rc::new(GlPipeline::setup(&self.shared, desc).unwrap())
        }

        fn buffer(&self, data_type: DataType, size: usize) -> Rc<GlBuffer> {
            let desc = BufferDesc::with_size(data_type, size);
            Rc::new(GlBuffer::setup(&self.shared, desc).unwrap())
        }

        fn color_target(&self) -> (Rc<GlTexture>, Rc<GlFramebuffer>) {
            let format = GraphicsFormat::R8G8B8A8UNorm;
            let texture = GlTexture::setup(&self.shared, TextureDesc::new_2d(16, 16, format));
            let texture = Rc::new(texture.unwrap());
            let layout = FramebufferLayoutDesc {
                attachments: vec![AttachmentLayout::color(0, format)],
            };
            let layout = Rc::new(GlFramebufferLayout::setup(&self.shared, layout).unwrap());
            let mut desc = FramebufferDesc::new(layout, 16, 16);
            desc.color_attachments.push(AttachmentBinding::new(texture.clone()));
            let framebuffer = Rc::new(GlFramebuffer::setup(&self.shared, desc).unwrap());
            (texture, framebuffer)
        }
    }

    #[test]
    fn test_setup_forces_default_state() {
        // ARRANGE
        let (driver, sink, shared) = headless(GlVariant::Legacy);

        // ACT
        let fixture = fixture_over(driver, sink, shared);

        // ASSERT
        let captured = fixture.context.captured_state();
        assert_eq!(captured.color_blends.len(), 8);
        assert!(fixture.driver.is_enabled(glow::DEPTH_TEST));
        assert_eq!(fixture.driver.count("color_mask_i"), 8);
        assert_eq!(fixture.driver.count("create_vertex_array"), 1);
        assert!(fixture.context.swapchain().active());
        assert!(fixture.sink.is_empty());
    }

    #[test]
    fn test_alpha_blending_pipeline_reaches_native_factors() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);
        let mut state = StateDesc::with_attachments(1);
        state.color_blends[0] = ColorBlend::alpha_blending();
        let pipeline = fixture.pipeline(state);

        // ACT
        fixture.context.set_render_pipeline(pipeline).unwrap();

        // ASSERT
        let calls = fixture.driver.calls();
        let last_for_attachment_0 = |name: &str| {
            calls
                .iter()
                .rev()
                .find(|call| call.name == name && call.args[0] == 0)
                .map(|call| call.args.clone())
        };
        let src_alpha = i64::from(glow::SRC_ALPHA);
        let one_minus = i64::from(glow::ONE_MINUS_SRC_ALPHA);
        assert_eq!(
            last_for_attachment_0("blend_func_separate_i"),
            Some(vec![0, src_alpha, one_minus, src_alpha, one_minus])
        );
        let add = i64::from(glow::FUNC_ADD);
        assert_eq!(last_for_attachment_0("blend_equation_separate_i"), Some(vec![0, add, add]));
        assert!(fixture.driver.is_enabled_i(glow::BLEND, 0));
    }

    #[test]
    fn test_same_pipeline_twice_issues_nothing() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);
        let pipeline = fixture.pipeline(StateDesc::default());
        fixture.context.set_render_pipeline(pipeline.clone()).unwrap();

        // ACT
        let mark = fixture.driver.mark();
        fixture.context.set_render_pipeline(pipeline).unwrap();

        // ASSERT
        assert!(fixture.driver.calls_since(mark).is_empty());
    }

    #[test]
    fn test_pipeline_switch_issues_only_the_difference() {
        // ARRANGE
        let fixture = fixture(GlVariant::Legacy);
        let opaque = fixture.pipeline(StateDesc::default());
        let overlay = fixture.pipeline(StateDesc {
            depth_enable: false,
            ..StateDesc::default()
        });
        fixture.context.set_render_pipeline(opaque).unwrap();

        // ACT
        let mark = fixture.driver.mark();
        fixture.context.set_render_pipeline(overlay).unwrap();

        // ASSERT
        let calls = fixture.driver.calls_since(mark);
        assert_eq!(calls.len(), 1, "{calls:?}");
        assert_eq!(calls[0].name, "disable");
        assert_eq!(calls[0].args, vec![i64::from(glow::DEPTH_TEST)]);
        assert!(!fixture.context.captured_state().depth_enable);
    }

    #[test]
    fn test_vertex_buffers_are_pushed_at_draw() {
        // ARRANGE
        let fixture = fixture(GlVariant::Legacy);
        fixture.context.set_render_pipeline(fixture.pipeline(StateDesc::default())).unwrap();
        let buffer = fixture.buffer(DataType::StorageVertexBuffer, 36);

        // ACT
        let mark = fixture.driver.mark();
        fixture.context.set_vertex_buffer_data(0, buffer.clone(), 0).unwrap();
        let on_bind = fixture.driver.calls_since(mark);
        fixture.context.draw(3, 1, 0, 0).unwrap();
        let mark = fixture.driver.mark();
        fixture.context.draw(3, 1, 0, 0).unwrap();
        let second = fixture.driver.calls_since(mark);

        // ASSERT
        assert!(on_bind.is_empty());
        assert_eq!(fixture.driver.count("vertex_attrib_pointer"), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "draw_arrays_instanced");
        assert_eq!(second[0].args, vec![i64::from(glow::TRIANGLES), 0, 3, 1]);
        assert!(Rc::ptr_eq(&fixture.context.vertex_buffer_data(0).unwrap(), &buffer));
    }

    #[test]
    fn test_descriptor_values_reach_program_before_draw() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);
        fixture.context.set_render_pipeline(fixture.pipeline(StateDesc::default())).unwrap();
        let params = DescriptorSetLayoutDesc::new(fixture.program.params().to_vec());
        let layout = Rc::new(GlDescriptorSetLayout::setup(&fixture.shared, params).unwrap());
        let set = GlDescriptorSet::setup(&fixture.shared, DescriptorSetDesc::new(layout));
        let set = Rc::new(set.unwrap());
        set.slot("tint").unwrap().uniform_float4([1.0, 0.5, 0.25, 1.0]);

        // ACT
        let mark = fixture.driver.mark();
        fixture.context.set_descriptor_set(set);
        let on_bind = fixture.driver.calls_since(mark);
        fixture.context.draw(3, 1, 0, 0).unwrap();
        fixture.context.draw(3, 1, 0, 0).unwrap();

        // ASSERT
        assert!(on_bind.is_empty());
        assert_eq!(fixture.driver.calls_since(mark).len(), 3);
        assert_eq!(fixture.driver.count("program_uniform"), 1);
    }

    #[test]
    fn test_window_target_restores_default_state() {
        // ARRANGE
        let fixture = fixture(GlVariant::Legacy);
        let (_texture, framebuffer) = fixture.color_target();
        let pipeline = fixture.pipeline(StateDesc {
            depth_enable: false,
            ..StateDesc::default()
        });
        fixture.context.set_framebuffer(Some(framebuffer)).unwrap();
        fixture.context.set_render_pipeline(pipeline.clone()).unwrap();

        // ACT
        fixture.context.set_framebuffer(None).unwrap();
        let restored = fixture.context.captured_state();
        fixture.context.set_render_pipeline(pipeline).unwrap();

        // ASSERT
        assert!(restored.depth_enable);
        assert!(fixture.context.framebuffer().is_none());
        assert_eq!(fixture.driver.bound_draw_framebuffer(), 0);
        assert!(!fixture.driver.is_enabled(glow::DEPTH_TEST));
    }

    #[test]
    fn test_framebuffer_binding_resets_viewport() {
        let fixture = fixture(GlVariant::Core);
        let (_texture, framebuffer) = fixture.color_target();

        fixture.context.set_framebuffer(Some(framebuffer.clone())).unwrap();

        let viewport = fixture.context.viewport(0).unwrap();
        assert_eq!((viewport.width, viewport.height), (16.0, 16.0));
        assert_eq!(fixture.driver.bound_draw_framebuffer(), framebuffer.instance_id());
        let mark = fixture.driver.mark();
        fixture.context.set_framebuffer(Some(framebuffer)).unwrap();
        assert!(fixture.driver.calls_since(mark).is_empty());
    }

    #[test]
    fn test_scissor_is_flipped_to_bottom_origin() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);

        // ACT
        fixture.context.set_scissor(0, Scissor::new(2, 4, 10, 20)).unwrap();
        let mark = fixture.driver.mark();
        fixture.context.set_scissor(0, Scissor::new(2, 4, 10, 20)).unwrap();

        // ASSERT
        let scissors = fixture.driver.calls_named("scissor_indexed");
        assert_eq!(scissors.last().unwrap().args, vec![0, 2, 40, 10, 20]);
        assert!(fixture.driver.calls_since(mark).is_empty());
        assert_eq!(fixture.context.scissor(0), Some(Scissor::new(2, 4, 10, 20)));
    }

    #[test]
    fn test_out_of_range_viewport_is_rejected() {
        let fixture = fixture(GlVariant::Core);

        let result = fixture.context.set_viewport(16, Viewport::new(0.0, 0.0, 8.0, 8.0));

        assert!(matches!(result, Err(ContextError::InvalidInput(_))));
        assert_eq!(fixture.sink.len(), 1);
        assert!(fixture.context.viewport(16).is_none());
    }

    #[test]
    fn test_stencil_masks_change_only_on_difference() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);

        // ACT
        fixture.context.set_stencil_write_mask(StencilFaceFlags::FRONT_AND_BACK, 0xFF);
        fixture.context.set_stencil_write_mask(StencilFaceFlags::FRONT, 0xFF);
        fixture.context.set_stencil_reference(StencilFaceFlags::BACK, 3).unwrap();

        // ASSERT
        let writes = fixture.driver.calls_named("stencil_mask_separate");
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].args, vec![i64::from(glow::FRONT), 0xFF]);
        assert_eq!(writes[1].args, vec![i64::from(glow::BACK), 0xFF]);
        let funcs = fixture.driver.calls_named("stencil_func_separate");
        assert_eq!(funcs.last().unwrap().args[0], i64::from(glow::BACK));
        assert_eq!(funcs.last().unwrap().args[2], 3);
        assert_eq!(fixture.context.stencil_reference(StencilFaceFlags::BACK), 3);
        assert_eq!(fixture.context.stencil_reference(StencilFaceFlags::FRONT), 0);
        assert_eq!(fixture.context.stencil_write_mask(StencilFaceFlags::FRONT), 0xFF);
    }

    #[test]
    fn test_masked_clear_restores_write_mask() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);
        let (_texture, framebuffer) = fixture.color_target();
        let mut state = StateDesc::with_attachments(1);
        state.color_blends[0].color_write_mask = ColorMask::R;
        fixture.context.set_framebuffer(Some(framebuffer)).unwrap();
        fixture.context.set_render_pipeline(fixture.pipeline(state)).unwrap();

        // ACT
        let mark = fixture.driver.mark();
        fixture
            .context
            .clear_framebuffer(0, ClearFlags::COLOR, [0.0, 0.0, 0.0, 1.0], 1.0, 0)
            .unwrap();

        // ASSERT
        let names: Vec<&str> =
            fixture.driver.calls_since(mark).into_iter().map(|call| call.name).collect();
        assert_eq!(names, vec!["color_mask_i", "clear_buffer_fv", "color_mask_i"]);
        let masks = fixture.driver.calls_named("color_mask_i");
        assert_eq!(masks.last().unwrap().args, vec![0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_clear_of_missing_attachment_fails() {
        let fixture = fixture(GlVariant::Core);
        let (_texture, framebuffer) = fixture.color_target();
        fixture.context.set_framebuffer(Some(framebuffer)).unwrap();

        let result = fixture.context.clear_framebuffer(3, ClearFlags::COLOR, [0.0; 4], 1.0, 0);

        assert!(matches!(result, Err(ContextError::InvalidInput(_))));
        assert_eq!(fixture.driver.count("clear_buffer_fv"), 0);
    }

    #[test]
    fn test_legacy_clear_then_map_reads_color() {
        // ARRANGE
        let fixture = fixture(GlVariant::Legacy);
        let (texture, framebuffer) = fixture.color_target();
        fixture.context.set_framebuffer(Some(framebuffer)).unwrap();

        // ACT
        fixture
            .context
            .clear_framebuffer(0, ClearFlags::COLOR, [1.0, 0.0, 0.0, 1.0], 1.0, 0)
            .unwrap();
        let pixels = texture.map(0, 0, 16, 16, 0).unwrap();

        // ASSERT
        assert_eq!(pixels.len(), 16 * 16 * 4);
        assert_eq!(&pixels[..4], &[255, 0, 0, 255]);
        assert_eq!(&pixels[pixels.len() - 4..], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_discard_lists_selected_attachments() {
        let fixture = fixture(GlVariant::Core);
        let (_texture, framebuffer) = fixture.color_target();

        fixture.context.discard_framebuffer(&framebuffer, ClearFlags::COLOR_DEPTH_STENCIL);

        let invalidate = fixture.driver.calls_named("invalidate_framebuffer");
        assert_eq!(
            invalidate[0].args,
            vec![i64::from(glow::DRAW_FRAMEBUFFER), i64::from(glow::COLOR_ATTACHMENT0)]
        );
        assert_eq!(fixture.driver.bound_draw_framebuffer(), 0);
    }

    #[test]
    fn test_draw_without_pipeline_fails() {
        let fixture = fixture(GlVariant::Core);

        let result = fixture.context.draw(3, 1, 0, 0);

        assert!(matches!(result, Err(ContextError::NoPipeline)));
        assert_eq!(fixture.sink.len(), 1);
        assert_eq!(fixture.driver.count("draw_arrays_instanced"), 0);
    }

    #[test]
    fn test_indexed_draw_needs_index_buffer() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);
        fixture.context.set_render_pipeline(fixture.pipeline(StateDesc::default())).unwrap();
        let indices = fixture.buffer(DataType::StorageIndexBuffer, 64);

        // ACT
        let missing = fixture.context.draw_indexed(6, 1, 0, 0, 0);
        fixture.context.set_index_buffer_data(indices, 4, IndexType::UInt16).unwrap();
        fixture.context.draw_indexed(6, 2, 3, 5, 0).unwrap();

        // ASSERT
        assert!(matches!(missing, Err(ContextError::NoIndexBuffer)));
        let draws = fixture.driver.calls_named("draw_elements_instanced_base_vertex");
        assert_eq!(
            draws[0].args,
            vec![i64::from(glow::TRIANGLES), 6, i64::from(glow::UNSIGNED_SHORT), 10, 2, 5]
        );
    }

    #[test]
    fn test_wrong_buffer_kinds_are_rejected() {
        let fixture = fixture(GlVariant::Core);
        let uniforms = fixture.buffer(DataType::UniformBuffer, 64);

        let vertex = fixture.context.set_vertex_buffer_data(0, uniforms.clone(), 0);
        let index = fixture.context.set_index_buffer_data(uniforms.clone(), 0, IndexType::UInt32);
        let indirect = fixture.context.draw_indirect(&uniforms, 0, 1, 16);

        assert!(matches!(vertex, Err(ContextError::InvalidInput(_))));
        assert!(matches!(index, Err(ContextError::InvalidInput(_))));
        assert!(matches!(indirect, Err(ContextError::InvalidInput(_))));
        assert!(fixture.context.index_buffer_data().is_none());
    }

    #[test]
    fn test_indirect_draw_binds_argument_buffer() {
        let fixture = fixture(GlVariant::Core);
        fixture.context.set_render_pipeline(fixture.pipeline(StateDesc::default())).unwrap();
        let arguments = fixture.buffer(DataType::IndirectBuffer, 64);

        fixture.context.draw_indirect(&arguments, 16, 2, 16).unwrap();

        let binds = fixture.driver.calls_named("bind_buffer");
        assert_eq!(
            binds.last().unwrap().args,
            vec![i64::from(glow::DRAW_INDIRECT_BUFFER), i64::from(arguments.instance_id())]
        );
        let draws = fixture.driver.calls_named("multi_draw_arrays_indirect");
        assert_eq!(draws[0].args, vec![i64::from(glow::TRIANGLES), 16, 2, 16]);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "start instance"))]
    fn test_start_instance_is_unsupported() {
        let fixture = fixture(GlVariant::Core);
        fixture.context.set_render_pipeline(fixture.pipeline(StateDesc::default())).unwrap();

        let result = fixture.context.draw(3, 1, 0, 1);

        assert!(matches!(result, Err(ContextError::Unsupported(_))));
    }

    #[test]
    fn test_debug_control_applies_at_render_begin() {
        // ARRANGE
        let fixture = fixture(GlVariant::Core);
        fixture.context.enable_debug_control(true);
        assert!(!fixture.context.debug_control_enabled());

        // ACT
        fixture.context.render_begin();
        fixture.driver.push_debug_message(7, glow::DEBUG_SEVERITY_HIGH, "bad enum");
        fixture.context.render_end();

        // ASSERT
        assert!(fixture.context.debug_control_enabled());
        assert!(fixture.driver.is_enabled(glow::DEBUG_OUTPUT));
        assert!(fixture.driver.is_enabled(glow::DEBUG_OUTPUT_SYNCHRONOUS));
        assert_eq!(fixture.driver.count("debug_message_control"), 2);
        let messages = fixture.sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("bad enum"));
        assert!(messages[0].contains("high"));
    }

    #[test]
    fn test_debug_control_without_khr_debug_reports() {
        let driver = HeadlessDriver::new().with_version(4, 1).without_extension(ext::KHR_DEBUG);
        let (driver, sink, shared) = headless_with(driver, GlVariant::Legacy, false);
        let fixture = fixture_over(driver, sink, shared);

        fixture.context.enable_debug_control(true);
        fixture.context.render_begin();

        assert!(!fixture.context.debug_control_enabled());
        assert_eq!(fixture.sink.messages(), vec!["Can't support GL_KHR_debug.".to_owned()]);
    }

    #[test]
    fn test_present_without_window_fails() {
        let fixture = fixture(GlVariant::Core);

        let result = fixture.context.present();

        assert!(matches!(result, Err(ContextError::NoWindow)));
    }

    #[test]
    fn test_close_releases_legacy_vertex_array() {
        let fixture = fixture(GlVariant::Legacy);

        fixture.context.close();
        fixture.context.close();

        assert_eq!(fixture.driver.count("delete_vertex_array"), 1);
        assert!(fixture.context.is_matching_variant(GlVariant::Legacy));
    }
}
