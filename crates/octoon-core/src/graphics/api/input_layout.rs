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

//! Vertex input layout: which semantic lives where inside which vertex stream.

use super::enums::VertexDivisor;
use super::format::GraphicsFormat;

/// One vertex element, matched to a shader attribute by `(semantic, semantic_index)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    /// Semantic name, e.g. `POSITION`.
    pub semantic: String,
    /// Semantic index, e.g. `1` for `TEXCOORD1`.
    pub semantic_index: u32,
    /// Element format.
    pub format: GraphicsFormat,
    /// Byte offset inside the vertex.
    pub offset: u32,
    /// Vertex buffer slot the element is read from.
    pub slot: u32,
}

impl VertexLayout {
    /// Builds an element for `slot`.
    pub fn new(
        slot: u32,
        semantic: impl Into<String>,
        semantic_index: u32,
        format: GraphicsFormat,
        offset: u32,
    ) -> Self {
        Self {
            semantic: semantic.into(),
            semantic_index,
            format,
            offset,
            slot,
        }
    }

    /// Number of components.
    pub fn count(&self) -> u32 {
        self.format.channels()
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        self.format.byte_size()
    }
}

/// One vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBinding {
    /// Vertex buffer slot.
    pub slot: u32,
    /// Distance between consecutive vertices. 0 means tightly packed.
    pub stride: u32,
    /// Per-vertex or per-instance stepping.
    pub divisor: VertexDivisor,
}

impl VertexBinding {
    /// Binding for `slot` advancing per vertex.
    pub fn new(slot: u32, stride: u32) -> Self {
        Self {
            slot,
            stride,
            divisor: VertexDivisor::Vertex,
        }
    }
}

/// Complete input layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputLayoutDesc {
    /// Vertex elements.
    pub layouts: Vec<VertexLayout>,
    /// Vertex streams.
    pub bindings: Vec<VertexBinding>,
}

impl InputLayoutDesc {
    /// Sum of the element sizes read from `slot`.
    pub fn vertex_size(&self, slot: u32) -> u32 {
        self.layouts
            .iter()
            .filter(|layout| layout.slot == slot)
            .map(VertexLayout::size)
            .sum()
    }

    /// Stride of `slot`: the declared stride, or the packed vertex size if none was declared.
    pub fn stride(&self, slot: u32) -> u32 {
        self.bindings
            .iter()
            .find(|binding| binding.slot == slot)
            .map(|binding| binding.stride)
            .filter(|stride| *stride != 0)
            .unwrap_or_else(|| self.vertex_size(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> InputLayoutDesc {
        InputLayoutDesc {
            layouts: vec![
                VertexLayout::new(0, "POSITION", 0, GraphicsFormat::R32G32B32SFloat, 0),
                VertexLayout::new(0, "TEXCOORD", 0, GraphicsFormat::R32G32SFloat, 12),
                VertexLayout::new(1, "COLOR", 0, GraphicsFormat::R8G8B8A8UNorm, 0),
            ],
            bindings: vec![VertexBinding::new(0, 0), VertexBinding::new(1, 16)],
        }
    }

    #[test]
    fn test_vertex_size_sums_slot_elements() {
        let desc = layout();
        assert_eq!(desc.vertex_size(0), 20);
        assert_eq!(desc.vertex_size(1), 4);
        assert_eq!(desc.vertex_size(7), 0);
    }

    #[test]
    fn test_stride_falls_back_to_vertex_size() {
        let desc = layout();
        assert_eq!(desc.stride(0), 20, "stride 0 means tightly packed");
        assert_eq!(desc.stride(1), 16);
    }
}
