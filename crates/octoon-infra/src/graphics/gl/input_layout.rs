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

//! Validated vertex input layouts.

use octoon_core::graphics::api::{FormatKind, InputLayoutDesc, VertexDivisor, VertexLayout};
use octoon_core::graphics::error::ResourceError;

use super::shared::GlShared;
use super::types;

/// Native description of one vertex element, resolved once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VertexElement {
    pub slot: u32,
    pub components: i32,
    pub gl_type: u32,
    pub normalized: bool,
    /// Fed through the integer attribute path.
    pub integer: bool,
    pub offset: u32,
}

impl VertexElement {
    fn resolve(layout: &VertexLayout) -> Option<Self> {
        let gl_type = types::as_vertex_format(layout.format)?;
        let kind = layout.format.kind();
        let scaled = types::is_scaled(layout.format);
        Some(Self {
            slot: layout.slot,
            components: layout.count() as i32,
            gl_type,
            normalized: kind == FormatKind::Normalized,
            integer: kind == FormatKind::Integer && !scaled,
            offset: layout.offset,
        })
    }
}

/// `true` when `value` fits under a queried limit. Drivers that do not
/// report a limit return 0.
fn within(value: u32, limit: u32) -> bool {
    limit == 0 || value <= limit
}

/// Vertex elements and their streams. Holds no native state.
#[derive(Debug)]
pub struct GlInputLayout {
    elements: Vec<VertexElement>,
    desc: InputLayoutDesc,
}

impl GlInputLayout {
    /// Checks every element and binding against the device limits.
    pub fn setup(shared: &GlShared, desc: InputLayoutDesc) -> Result<Self, ResourceError> {
        let properties = shared.properties();
        let invalid = |msg: String| shared.fail(ResourceError::InvalidDescriptor(msg));

        if !within(desc.layouts.len() as u32, properties.max_vertex_input_attributes) {
            return Err(invalid(format!(
                "{} vertex elements exceed the device limit of {}",
                desc.layouts.len(),
                properties.max_vertex_input_attributes
            )));
        }

        let mut elements = Vec::with_capacity(desc.layouts.len());
        for layout in &desc.layouts {
            let element = types::require(
                VertexElement::resolve(layout),
                "vertex format",
                layout.format,
            )
            .map_err(|err| shared.fail(ResourceError::from(err)))?;
            if !properties.is_vertex_supported(layout.format) {
                return Err(shared.fail(ResourceError::Unsupported(format!(
                    "vertex format {:?}",
                    layout.format
                ))));
            }
            if !within(layout.offset, properties.max_vertex_input_attribute_offset) {
                return Err(invalid(format!(
                    "{}{} offset {} is out of range",
                    layout.semantic, layout.semantic_index, layout.offset
                )));
            }
            if layout.slot >= properties.max_vertex_input_bindings.max(1) {
                return Err(invalid(format!(
                    "{}{} uses slot {} beyond the device limit",
                    layout.semantic, layout.semantic_index, layout.slot
                )));
            }
            elements.push(element);
        }

        for binding in &desc.bindings {
            if !within(binding.stride, properties.max_vertex_input_binding_stride) {
                return Err(invalid(format!(
                    "slot {} stride {} is out of range",
                    binding.slot, binding.stride
                )));
            }
        }

        Ok(Self { elements, desc })
    }

    /// The descriptor this layout was built from.
    pub fn desc(&self) -> &InputLayoutDesc {
        &self.desc
    }

    /// Stride of a stream, falling back to its packed vertex size.
    pub fn stride(&self, slot: u32) -> u32 {
        self.desc.stride(slot)
    }

    /// Per-instance streams advance once per instance.
    pub fn divisor(&self, slot: u32) -> u32 {
        let divisor = self
            .desc
            .bindings
            .iter()
            .find(|binding| binding.slot == slot)
            .map_or(VertexDivisor::Vertex, |binding| binding.divisor);
        match divisor {
            VertexDivisor::Vertex => 0,
            VertexDivisor::Instance => 1,
        }
    }

    pub(crate) fn elements(&self) -> &[VertexElement] {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::shared::testing::headless;
    use crate::graphics::gl::shared::GlVariant;
    use octoon_core::graphics::api::{GraphicsFormat, VertexBinding};

    fn desc() -> InputLayoutDesc {
        let mut instances = VertexBinding::new(1, 0);
        instances.divisor = VertexDivisor::Instance;
        InputLayoutDesc {
            layouts: vec![
                VertexLayout::new(0, "POSITION", 0, GraphicsFormat::R32G32B32SFloat, 0),
                VertexLayout::new(0, "COLOR", 0, GraphicsFormat::R8G8B8A8UNorm, 12),
                VertexLayout::new(1, "BLENDINDICES", 0, GraphicsFormat::R8G8B8A8UInt, 0),
                VertexLayout::new(1, "TEXCOORD", 0, GraphicsFormat::R16G16SScaled, 4),
            ],
            bindings: vec![VertexBinding::new(0, 0), instances],
        }
    }

    #[test]
    fn test_elements_are_resolved() {
        // ARRANGE
        let (_driver, sink, shared) = headless(GlVariant::Core);

        // ACT
        let layout = GlInputLayout::setup(&shared, desc()).unwrap();

        // ASSERT
        let elements = layout.elements();
        assert_eq!(elements[0].gl_type, glow::FLOAT);
        assert_eq!(elements[0].components, 3);
        assert!(!elements[0].normalized);
        assert!(elements[1].normalized);
        assert_eq!(elements[1].gl_type, glow::UNSIGNED_BYTE);
        assert!(elements[2].integer);
        assert!(!elements[3].integer, "scaled formats feed float attributes");
        assert_eq!(elements[3].gl_type, glow::SHORT);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_stride_and_divisor() {
        let (_driver, _sink, shared) = headless(GlVariant::Legacy);

        let layout = GlInputLayout::setup(&shared, desc()).unwrap();

        assert_eq!(layout.stride(0), 16);
        assert_eq!(layout.stride(1), 8);
        assert_eq!(layout.divisor(0), 0);
        assert_eq!(layout.divisor(1), 1);
    }

    #[test]
    fn test_unmapped_format_is_rejected() {
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let mut desc = desc();
        desc.layouts[0].format = GraphicsFormat::BC1RGBAUNormBlock;

        let result = GlInputLayout::setup(&shared, desc);

        assert!(matches!(result, Err(ResourceError::Translate(_))));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_offset_limit() {
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let mut desc = desc();
        desc.layouts[1].offset = 4096;

        let result = GlInputLayout::setup(&shared, desc);

        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert!(sink.messages()[0].contains("COLOR0 offset 4096"));
    }
}
