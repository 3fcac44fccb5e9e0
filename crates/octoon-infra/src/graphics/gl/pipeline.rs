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

//! Render pipelines: state, program and vertex input baked together.
//!
//! Setup matches every element of the input layout against the program's
//! reflected attributes by semantic and index. Elements the program does
//! not read are dropped. On the core variant the resolved attributes are
//! recorded once into a vertex array object; the legacy variant replays
//! them through `glVertexAttribPointer` whenever a vertex buffer changes.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use octoon_core::graphics::api::GraphicsFormat;
use octoon_core::graphics::error::ResourceError;

use super::buffer::GlBuffer;
use super::descriptor::GlDescriptorSetLayout;
use super::ext;
use super::input_layout::{GlInputLayout, VertexElement};
use super::program::GlProgram;
use super::shared::{GlShared, GlVariant};
use super::state::GlState;

/// Everything a pipeline is built from.
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    /// Fixed-function state applied when the pipeline is bound.
    pub state: Rc<GlState>,
    /// Linked program.
    pub program: Rc<GlProgram>,
    /// Vertex elements and streams.
    pub input_layout: Rc<GlInputLayout>,
    /// Layout of the descriptor sets used with this pipeline.
    pub descriptor_set_layout: Option<Rc<GlDescriptorSetLayout>>,
}

impl PipelineDesc {
    /// A pipeline without a descriptor set layout.
    pub fn new(
        state: Rc<GlState>,
        program: Rc<GlProgram>,
        input_layout: Rc<GlInputLayout>,
    ) -> Self {
        Self {
            state,
            program,
            input_layout,
            descriptor_set_layout: None,
        }
    }
}

/// A vertex element the program actually reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineAttribute {
    /// Native attribute location in the program.
    pub location: u32,
    /// Vertex buffer slot it is fed from.
    pub slot: u32,
    /// Semantic name.
    pub semantic: String,
    /// Semantic index.
    pub semantic_index: u32,
    /// Element format declared by the input layout.
    pub format: GraphicsFormat,
    /// Byte offset inside the vertex.
    pub offset: u32,
    pub(crate) element: VertexElement,
}

/// One vertex stream of a context: the buffer, where it starts and
/// whether the native side still has to hear about it.
#[derive(Debug, Clone, Default)]
pub struct VertexBufferSlot {
    /// Bound buffer.
    pub buffer: Option<Rc<GlBuffer>>,
    /// Byte offset of the first vertex.
    pub offset: usize,
    /// Set when `buffer` or `offset` changed since the last bind.
    pub dirty: bool,
}

/// A render pipeline.
pub struct GlPipeline {
    shared: GlShared,
    vao: Cell<u32>,
    attributes: Vec<PipelineAttribute>,
    desc: PipelineDesc,
}

impl GlPipeline {
    /// Resolves the input layout against the program and, on the core
    /// variant, records the vertex format into a vertex array object.
    pub fn setup(shared: &GlShared, desc: PipelineDesc) -> Result<Self, ResourceError> {
        if desc.program.instance_id() == 0 {
            return Err(shared.fail(ResourceError::InvalidDescriptor(
                "pipeline program is closed".to_owned(),
            )));
        }

        let attributes = resolve_attributes(&desc.program, &desc.input_layout);

        let vao = match shared.variant() {
            GlVariant::Legacy => 0,
            GlVariant::Core => {
                let vao = shared.gl().create_vertex_array();
                if vao == 0 {
                    return Err(shared.fail(ResourceError::NativeAllocation(
                        "glCreateVertexArrays",
                    )));
                }
                record_vertex_format(shared, vao, &attributes, &desc.input_layout);
                vao
            }
        };

        log::debug!(
            "GlPipeline: Bound {} of {} vertex elements to program {}",
            attributes.len(),
            desc.input_layout.desc().layouts.len(),
            desc.program.instance_id()
        );

        Ok(Self {
            shared: shared.clone(),
            vao: Cell::new(vao),
            attributes,
            desc,
        })
    }

    /// The descriptor this pipeline was built from.
    pub fn desc(&self) -> &PipelineDesc {
        &self.desc
    }

    /// The matched vertex elements, in input layout order.
    pub fn attributes(&self) -> &[PipelineAttribute] {
        &self.attributes
    }

    /// Vertex array object on the core variant, 0 on legacy.
    pub fn vertex_array(&self) -> u32 {
        self.vao.get()
    }

    /// Makes this pipeline's vertex input current after `previous`.
    pub(crate) fn switch_from(&self, previous: Option<&GlPipeline>) {
        let gl = self.shared.gl();
        match self.shared.variant() {
            GlVariant::Legacy => {
                let Some(previous) = previous else {
                    return;
                };
                for stale in &previous.attributes {
                    let in_use = self.attributes.iter().any(|a| a.location == stale.location);
                    if !in_use {
                        gl.disable_vertex_attrib_array(stale.location);
                    }
                }
            }
            GlVariant::Core => {
                gl.bind_vertex_array(self.vao.get());
                if self.shared.bindless() && previous.is_none() {
                    gl.enable_client_state(ext::VERTEX_ATTRIB_ARRAY_UNIFIED_NV);
                }
            }
        }
    }

    /// Pushes the dirty vertex streams to the native side, or every
    /// stream when `force` is set, and clears their dirty flags.
    pub fn bind_vertex_buffers(&self, slots: &mut [VertexBufferSlot], force: bool) {
        let gl = self.shared.gl();
        let layout = &self.desc.input_layout;

        for (index, slot) in slots.iter_mut().enumerate() {
            if !slot.dirty && !force {
                continue;
            }
            slot.dirty = false;

            let Some(buffer) = slot.buffer.as_ref() else {
                continue;
            };
            let slot_index = index as u32;
            let stride = layout.stride(slot_index) as i32;
            let mut attributes = self.attributes.iter().filter(|a| a.slot == slot_index).peekable();
            if attributes.peek().is_none() {
                continue;
            }

            match self.shared.variant() {
                GlVariant::Legacy => {
                    let divisor = layout.divisor(slot_index);
                    gl.bind_buffer(glow::ARRAY_BUFFER, buffer.instance_id());
                    for attribute in attributes {
                        let element = &attribute.element;
                        let offset = slot.offset + element.offset as usize;
                        gl.enable_vertex_attrib_array(attribute.location);
                        if element.integer {
                            gl.vertex_attrib_i_pointer(
                                attribute.location,
                                element.components,
                                element.gl_type,
                                stride,
                                offset,
                            );
                        } else {
                            gl.vertex_attrib_pointer(
                                attribute.location,
                                element.components,
                                element.gl_type,
                                element.normalized,
                                stride,
                                offset,
                            );
                        }
                        gl.vertex_attrib_divisor(attribute.location, divisor);
                    }
                }
                GlVariant::Core => match buffer.gpu_address().filter(|_| self.shared.bindless()) {
                    Some(address) => {
                        for attribute in attributes {
                            let start = slot.offset + attribute.element.offset as usize;
                            gl.buffer_address_range_nv(
                                ext::VERTEX_ATTRIB_ARRAY_ADDRESS_NV,
                                attribute.location,
                                address + start as u64,
                                buffer.size().saturating_sub(start),
                            );
                        }
                    }
                    // Buffers that were never made resident use the binding point.
                    None => {
                        let handle = buffer.instance_id();
                        gl.bind_vertex_buffer(slot_index, handle, slot.offset, stride);
                    }
                },
            }
        }
    }

    /// Deletes the vertex array object. Later calls do nothing.
    pub fn close(&self) {
        let vao = self.vao.replace(0);
        if vao != 0 {
            self.shared.gl().delete_vertex_array(vao);
        }
    }
}

impl Drop for GlPipeline {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GlPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlPipeline")
            .field("vao", &self.vao.get())
            .field("program", &self.desc.program.instance_id())
            .field("attributes", &self.attributes.len())
            .finish()
    }
}

fn resolve_attributes(program: &GlProgram, input_layout: &GlInputLayout) -> Vec<PipelineAttribute> {
    let layouts = &input_layout.desc().layouts;
    let mut attributes = Vec::with_capacity(layouts.len());
    for (layout, element) in layouts.iter().zip(input_layout.elements()) {
        let reflected = program.attributes().iter().find(|attribute| {
            attribute.semantic == layout.semantic
                && attribute.semantic_index == layout.semantic_index
        });
        match reflected {
            Some(reflected) => attributes.push(PipelineAttribute {
                location: reflected.binding,
                slot: layout.slot,
                semantic: layout.semantic.clone(),
                semantic_index: layout.semantic_index,
                format: layout.format,
                offset: layout.offset,
                element: *element,
            }),
            None => log::debug!(
                "GlPipeline: Program {} does not read {}{}, element dropped",
                program.instance_id(),
                layout.semantic,
                layout.semantic_index
            ),
        }
    }
    attributes
}

/// Records the attribute formats and stream bindings into `vao`.
fn record_vertex_format(
    shared: &GlShared,
    vao: u32,
    attributes: &[PipelineAttribute],
    input_layout: &GlInputLayout,
) {
    let gl = shared.gl();
    gl.bind_vertex_array(vao);
    for attribute in attributes {
        let element = &attribute.element;
        gl.enable_vertex_attrib_array(attribute.location);
        if shared.bindless() {
            let stride = input_layout.stride(attribute.slot) as i32;
            gl.vertex_attrib_format_nv(
                attribute.location,
                element.components,
                element.gl_type,
                element.normalized,
                stride,
            );
            gl.vertex_attrib_divisor(attribute.location, input_layout.divisor(attribute.slot));
            continue;
        }
        if element.integer {
            gl.vertex_attrib_i_format(
                attribute.location,
                element.components,
                element.gl_type,
                element.offset,
            );
        } else {
            gl.vertex_attrib_format(
                attribute.location,
                element.components,
                element.gl_type,
                element.normalized,
                element.offset,
            );
        }
        gl.vertex_attrib_binding(attribute.location, attribute.slot);
    }
    if !shared.bindless() {
        let mut slots: Vec<u32> = attributes.iter().map(|attribute| attribute.slot).collect();
        slots.sort_unstable();
        slots.dedup();
        for slot in slots {
            gl.vertex_binding_divisor(slot, input_layout.divisor(slot));
        }
    }
    gl.bind_vertex_array(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::headless::HeadlessDriver;
    use crate::graphics::gl::program::ProgramDesc;
    use crate::graphics::gl::shader::GlShader;
    use crate::graphics::gl::shared::testing::{headless, headless_with};
    use octoon_core::graphics::api::{
        BufferDesc, DataType, InputLayoutDesc, ShaderDesc, ShaderStage, StateDesc, VertexBinding,
        VertexDivisor, VertexLayout,
    };

    const VERTEX: &str = r#"
        #version 330 core
        layout(location = 0) in vec3 glsl_POSITION0;
        layout(location = 3) in vec4 glsl_COLOR0;
        in uvec4 glsl_BLENDINDICES0;
        void main() {
            gl_Position = vec4(glsl_POSITION0, 1.0);
        }
    "#;

    const FRAGMENT: &str = r#"
        #version 330 core
        out vec4 color;
        void main() {
            color = vec4(1.0);
        }
    "#;

    fn input_layout() -> InputLayoutDesc {
        let mut instances = VertexBinding::new(1, 4);
        instances.divisor = VertexDivisor::Instance;
        InputLayoutDesc {
            layouts: vec![
                VertexLayout::new(0, "POSITION", 0, GraphicsFormat::R32G32B32SFloat, 0),
                VertexLayout::new(0, "COLOR", 0, GraphicsFormat::R8G8B8A8UNorm, 12),
                VertexLayout::new(0, "TEXCOORD", 0, GraphicsFormat::R32G32SFloat, 16),
                VertexLayout::new(1, "BLENDINDICES", 0, GraphicsFormat::R8G8B8A8UInt, 0),
            ],
            bindings: vec![VertexBinding::new(0, 24), instances],
        }
    }

    fn pipeline(shared: &GlShared) -> GlPipeline {
        let vertex = GlShader::setup(shared, ShaderDesc::glsl(ShaderStage::Vertex, VERTEX), None);
        let fragment =
            GlShader::setup(shared, ShaderDesc::glsl(ShaderStage::Fragment, FRAGMENT), None);
        let program = ProgramDesc::new(vec![Rc::new(vertex.unwrap()), Rc::new(fragment.unwrap())]);
        let desc = PipelineDesc::new(
            Rc::new(GlState::setup(shared, StateDesc::default()).unwrap()),
            Rc::new(GlProgram::setup(shared, program).unwrap()),
            Rc::new(GlInputLayout::setup(shared, input_layout()).unwrap()),
        );
        GlPipeline::setup(shared, desc).unwrap()
    }

    fn vertex_buffer(shared: &GlShared) -> Rc<GlBuffer> {
        let desc = BufferDesc::with_size(DataType::StorageVertexBuffer, 240);
        Rc::new(GlBuffer::setup(shared, desc).unwrap())
    }

    #[test]
    fn test_unmatched_semantics_are_dropped() {
        // ARRANGE
        let (_driver, sink, shared) = headless(GlVariant::Legacy);

        // ACT
        let pipeline = pipeline(&shared);

        // ASSERT
        let matched: Vec<(&str, u32)> = pipeline
            .attributes()
            .iter()
            .map(|attribute| (attribute.semantic.as_str(), attribute.location))
            .collect();
        assert_eq!(matched.len(), 3);
        assert_eq!(matched[0], ("POSITION", 0));
        assert_eq!(matched[1], ("COLOR", 3));
        assert_eq!(matched[2].0, "BLENDINDICES");
        assert!(sink.is_empty(), "a dropped element is not an error");
    }

    #[test]
    fn test_core_records_vertex_array() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Core);

        // ACT
        let pipeline = pipeline(&shared);

        // ASSERT
        assert_ne!(pipeline.vertex_array(), 0);
        assert_eq!(driver.count("vertex_attrib_format"), 2);
        assert_eq!(driver.count("vertex_attrib_i_format"), 1);
        let bindings: Vec<Vec<i64>> = driver
            .calls_named("vertex_attrib_binding")
            .into_iter()
            .map(|call| call.args)
            .collect();
        assert!(bindings.contains(&vec![3, 0]));
        let divisors: Vec<Vec<i64>> = driver
            .calls_named("vertex_binding_divisor")
            .into_iter()
            .map(|call| call.args)
            .collect();
        assert_eq!(divisors, vec![vec![0, 0], vec![1, 1]]);
    }

    #[test]
    fn test_legacy_binds_only_dirty_slots() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let pipeline = pipeline(&shared);
        let buffer = vertex_buffer(&shared);
        let mut slots = vec![
            VertexBufferSlot {
                buffer: Some(buffer.clone()),
                offset: 48,
                dirty: true,
            },
            VertexBufferSlot {
                buffer: Some(buffer.clone()),
                offset: 0,
                dirty: false,
            },
        ];

        // ACT
        let mark = driver.mark();
        pipeline.bind_vertex_buffers(&mut slots, false);
        let first = driver.calls_since(mark);
        let mark = driver.mark();
        pipeline.bind_vertex_buffers(&mut slots, false);
        let second = driver.calls_since(mark);

        // ASSERT
        let pointers: Vec<&Vec<i64>> = first
            .iter()
            .filter(|call| call.name == "vertex_attrib_pointer")
            .map(|call| &call.args)
            .collect();
        assert_eq!(pointers.len(), 2);
        assert_eq!(pointers[1], &vec![3, 4, i64::from(glow::UNSIGNED_BYTE), 1, 24, 60]);
        assert!(first.iter().all(|call| call.name != "vertex_attrib_i_pointer"));
        assert!(second.is_empty());
        assert!(!slots[0].dirty);
    }

    #[test]
    fn test_forced_bind_covers_every_slot() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let pipeline = pipeline(&shared);
        let buffer = vertex_buffer(&shared);
        let mut slots = vec![
            VertexBufferSlot {
                buffer: Some(buffer.clone()),
                offset: 0,
                dirty: false,
            },
            VertexBufferSlot {
                buffer: Some(buffer),
                offset: 8,
                dirty: false,
            },
        ];

        pipeline.bind_vertex_buffers(&mut slots, true);

        let integer = driver.calls_named("vertex_attrib_i_pointer");
        assert_eq!(integer.len(), 1);
        assert_eq!(integer[0].args[3..], [4, 8]);
        let divisors = driver.calls_named("vertex_attrib_divisor");
        assert_eq!(divisors.last().map(|call| call.args[1]), Some(1));
    }

    #[test]
    fn test_core_binds_vertex_buffer() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let pipeline = pipeline(&shared);
        let buffer = vertex_buffer(&shared);
        let mut slots = vec![VertexBufferSlot {
            buffer: Some(buffer.clone()),
            offset: 24,
            dirty: true,
        }];

        // ACT
        pipeline.switch_from(None);
        pipeline.bind_vertex_buffers(&mut slots, false);

        // ASSERT
        let calls = driver.calls_named("bind_vertex_buffer");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec![0, i64::from(buffer.instance_id()), 24, 24]);
        let vao = driver.calls_named("bind_vertex_array");
        assert_eq!(vao.last().map(|call| call.args[0]), Some(i64::from(pipeline.vertex_array())));
    }

    #[test]
    fn test_bindless_patches_addresses() {
        // ARRANGE
        let driver = HeadlessDriver::new().with_extension(ext::NV_VERTEX_BUFFER_UNIFIED_MEMORY);
        let (driver, _sink, shared) = headless_with(driver, GlVariant::Core, true);
        let pipeline = pipeline(&shared);
        let buffer = vertex_buffer(&shared);
        let address = buffer.gpu_address().unwrap();
        let mut slots = vec![VertexBufferSlot {
            buffer: Some(buffer),
            offset: 24,
            dirty: true,
        }];

        // ACT
        pipeline.switch_from(None);
        pipeline.bind_vertex_buffers(&mut slots, false);

        // ASSERT
        assert_eq!(driver.count("enable_client_state"), 1);
        assert_eq!(driver.count("bind_vertex_buffer"), 0);
        assert_eq!(driver.count("vertex_attrib_format_nv"), 3);
        let ranges = driver.calls_named("buffer_address_range_nv");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].args[1], 3);
        assert_eq!(ranges[1].args[2], (address + 36) as i64);
        assert_eq!(ranges[1].args[3], 240 - 36);
    }

    #[test]
    fn test_legacy_switch_disables_stale_locations() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let first = pipeline(&shared);
        let mut second_desc = first.desc().clone();
        let mut positions_only = input_layout();
        positions_only.layouts.truncate(1);
        second_desc.input_layout = Rc::new(GlInputLayout::setup(&shared, positions_only).unwrap());
        let second = GlPipeline::setup(&shared, second_desc).unwrap();

        second.switch_from(Some(&first));

        let disabled: Vec<i64> = driver
            .calls_named("disable_vertex_attrib_array")
            .into_iter()
            .map(|call| call.args[0])
            .collect();
        assert_eq!(disabled.len(), 2);
        assert!(disabled.contains(&3));
        assert!(!disabled.contains(&0));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let pipeline = pipeline(&shared);

        pipeline.close();
        pipeline.close();
        drop(pipeline);

        assert_eq!(driver.count("delete_vertex_array"), 1);
    }
}
