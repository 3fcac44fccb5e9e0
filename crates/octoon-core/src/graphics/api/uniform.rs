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

//! Reflected program interface: vertex attributes, uniforms and uniform blocks.
//!
//! These records are produced once when a program links. They are shared by
//! descriptor set layouts as `Rc<GraphicsParam>`, and descriptor copies match
//! parameters by the identity of that `Rc`, not by name.

use super::flags::ShaderStageFlags;
use super::format::GraphicsFormat;

/// Type tag of a uniform or descriptor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum UniformType {
    #[default]
    None = 0,
    Bool = 1,
    Int = 5,
    Int2 = 6,
    Int3 = 7,
    Int4 = 8,
    UInt = 9,
    UInt2 = 10,
    UInt3 = 11,
    UInt4 = 12,
    Float = 13,
    Float2 = 14,
    Float3 = 15,
    Float4 = 16,
    Float2x2 = 17,
    Float3x3 = 18,
    Float4x4 = 19,
    IntArray = 24,
    Int2Array = 25,
    Int3Array = 26,
    Int4Array = 27,
    UIntArray = 28,
    UInt2Array = 29,
    UInt3Array = 30,
    UInt4Array = 31,
    FloatArray = 32,
    Float2Array = 33,
    Float3Array = 34,
    Float4Array = 35,
    Float2x2Array = 36,
    Float3x3Array = 37,
    Float4x4Array = 38,
    Sampler = 39,
    SamplerImage = 40,
    CombinedImageSampler = 41,
    StorageImage = 42,
    StorageTexelBuffer = 43,
    StorageBuffer = 44,
    StorageBufferDynamic = 45,
    UniformTexelBuffer = 46,
    UniformBuffer = 47,
    UniformBufferDynamic = 48,
    InputAttachment = 49,
}

impl UniformType {
    /// The array form of a scalar, vector or matrix type. Other types are returned as-is.
    pub const fn to_array(self) -> Self {
        use UniformType::*;
        match self {
            Int => IntArray,
            Int2 => Int2Array,
            Int3 => Int3Array,
            Int4 => Int4Array,
            UInt => UIntArray,
            UInt2 => UInt2Array,
            UInt3 => UInt3Array,
            UInt4 => UInt4Array,
            Float => FloatArray,
            Float2 => Float2Array,
            Float3 => Float3Array,
            Float4 => Float4Array,
            Float2x2 => Float2x2Array,
            Float3x3 => Float3x3Array,
            Float4x4 => Float4x4Array,
            other => other,
        }
    }

    /// Whether this is one of the `...Array` variants.
    pub const fn is_array(self) -> bool {
        let v = self as u8;
        v >= UniformType::IntArray as u8 && v <= UniformType::Float4x4Array as u8
    }

    /// Whether the slot occupies a texture unit.
    pub const fn is_sampler(self) -> bool {
        matches!(
            self,
            UniformType::Sampler
                | UniformType::SamplerImage
                | UniformType::CombinedImageSampler
                | UniformType::StorageImage
        )
    }

    /// Whether the slot is backed by a buffer binding.
    pub const fn is_buffer(self) -> bool {
        matches!(
            self,
            UniformType::UniformBuffer
                | UniformType::UniformBufferDynamic
                | UniformType::StorageBuffer
                | UniformType::StorageBufferDynamic
        )
    }
}

/// A vertex input reflected from a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsAttribute {
    /// Semantic, e.g. `POSITION`.
    pub semantic: String,
    /// Trailing index of the semantic, e.g. `0` for `_POSITION0`.
    pub semantic_index: u32,
    /// Native attribute location.
    pub binding: u32,
    /// Component format inferred from the native type.
    pub format: GraphicsFormat,
}

/// A single uniform, either free-standing or a member of a block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphicsUniform {
    /// Name, truncated at the first `[`.
    pub name: String,
    /// Sampler half of a `texture_X_sampler` style name. Empty otherwise.
    pub sampler_name: String,
    /// Native location, or the texture unit for samplers.
    pub binding: u32,
    /// Byte offset inside the owning block. Zero for free-standing uniforms.
    pub offset: u32,
    /// Type tag.
    pub uniform_type: UniformType,
    /// Stages that read it.
    pub stages: ShaderStageFlags,
}

/// A uniform block with its members in native order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphicsUniformBlock {
    /// Block name.
    pub name: String,
    /// Binding point, equal to the block's enumeration index.
    pub binding: u32,
    /// Size of the block in bytes.
    pub block_size: u32,
    /// Always `UniformType::UniformBuffer` for reflected blocks.
    pub uniform_type: UniformType,
    /// Stages that read it.
    pub stages: ShaderStageFlags,
    /// Member uniforms.
    pub members: Vec<GraphicsUniform>,
}

/// One descriptor parameter exposed by a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsParam {
    /// A free-standing uniform or sampler.
    Uniform(GraphicsUniform),
    /// A uniform block.
    UniformBlock(GraphicsUniformBlock),
}

impl GraphicsParam {
    /// Parameter name.
    pub fn name(&self) -> &str {
        match self {
            GraphicsParam::Uniform(u) => &u.name,
            GraphicsParam::UniformBlock(b) => &b.name,
        }
    }

    /// Type tag.
    pub fn uniform_type(&self) -> UniformType {
        match self {
            GraphicsParam::Uniform(u) => u.uniform_type,
            GraphicsParam::UniformBlock(b) => b.uniform_type,
        }
    }

    /// Native location, texture unit or block binding.
    pub fn binding(&self) -> u32 {
        match self {
            GraphicsParam::Uniform(u) => u.binding,
            GraphicsParam::UniformBlock(b) => b.binding,
        }
    }

    /// The block, if this parameter is one.
    pub fn as_block(&self) -> Option<&GraphicsUniformBlock> {
        match self {
            GraphicsParam::UniformBlock(b) => Some(b),
            GraphicsParam::Uniform(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_variants() {
        assert_eq!(UniformType::Float4.to_array(), UniformType::Float4Array);
        assert_eq!(UniformType::Float4x4.to_array(), UniformType::Float4x4Array);
        assert_eq!(UniformType::Bool.to_array(), UniformType::Bool);
        assert_eq!(
            UniformType::SamplerImage.to_array(),
            UniformType::SamplerImage
        );

        assert!(UniformType::IntArray.is_array());
        assert!(UniformType::Float4x4Array.is_array());
        assert!(!UniformType::Float4x4.is_array());
        assert!(!UniformType::Sampler.is_array());
    }

    #[test]
    fn test_param_accessors() {
        let block = GraphicsParam::UniformBlock(GraphicsUniformBlock {
            name: "Globals".into(),
            binding: 2,
            block_size: 80,
            uniform_type: UniformType::UniformBuffer,
            stages: ShaderStageFlags::VERTEX,
            members: vec![GraphicsUniform {
                name: "view".into(),
                offset: 16,
                uniform_type: UniformType::Float4x4,
                ..Default::default()
            }],
        });

        assert_eq!(block.name(), "Globals");
        assert_eq!(block.binding(), 2);
        assert_eq!(block.uniform_type(), UniformType::UniformBuffer);
        assert_eq!(block.as_block().map(|b| b.members[0].offset), Some(16));
        assert!(UniformType::UniformBuffer.is_buffer());
        assert!(UniformType::SamplerImage.is_sampler());
    }
}
