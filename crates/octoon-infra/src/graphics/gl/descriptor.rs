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

//! Descriptor set layouts, pools and sets.
//!
//! A set holds one [`UniformSlot`] per parameter of its layout. Setting a
//! value only marks the slot dirty; the native pushes happen in
//! [`GlDescriptorSet::apply`], right before a draw.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::slice;

use octoon_core::graphics::api::{
    DescriptorPoolDesc, DescriptorSetLayoutDesc, GraphicsParam, UniformType,
};
use octoon_core::graphics::error::ResourceError;

use super::buffer::GlBuffer;
use super::driver::UniformData;
use super::program::GlProgram;
use super::sampler::GlSampler;
use super::shared::{GlShared, GlVariant};
use super::texture::GlTexture;

/// The parameters a descriptor set exposes.
#[derive(Debug)]
pub struct GlDescriptorSetLayout {
    desc: DescriptorSetLayoutDesc,
}

impl GlDescriptorSetLayout {
    /// Rejects layouts that declare the same parameter twice.
    pub fn setup(shared: &GlShared, desc: DescriptorSetLayoutDesc) -> Result<Self, ResourceError> {
        for (index, param) in desc.params.iter().enumerate() {
            if desc.params[..index].iter().any(|other| Rc::ptr_eq(other, param)) {
                return Err(shared.fail(ResourceError::InvalidDescriptor(format!(
                    "parameter {} is declared twice",
                    param.name()
                ))));
            }
        }
        Ok(Self { desc })
    }

    /// The declared parameters.
    pub fn desc(&self) -> &DescriptorSetLayoutDesc {
        &self.desc
    }
}

/// Bookkeeping for the sets allocated from it. Holds no native state.
#[derive(Debug)]
pub struct GlDescriptorPool {
    allocated: Cell<u32>,
    desc: DescriptorPoolDesc,
}

impl GlDescriptorPool {
    /// A pool allowing `desc.max_sets` live sets, or any number when 0.
    pub fn setup(_shared: &GlShared, desc: DescriptorPoolDesc) -> Result<Self, ResourceError> {
        Ok(Self {
            allocated: Cell::new(0),
            desc,
        })
    }

    /// The pool's sizing.
    pub fn desc(&self) -> &DescriptorPoolDesc {
        &self.desc
    }

    /// Sets currently allocated from this pool.
    pub fn allocated(&self) -> u32 {
        self.allocated.get()
    }

    fn reserve(&self) -> bool {
        let allocated = self.allocated.get();
        if self.desc.max_sets != 0 && allocated >= self.desc.max_sets {
            return false;
        }
        self.allocated.set(allocated + 1);
        true
    }

    fn release(&self) {
        self.allocated.set(self.allocated.get().saturating_sub(1));
    }
}

/// A value held by a uniform slot, one variant per shape.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub enum UniformValue {
    /// Nothing assigned yet.
    #[default]
    None,
    Bool(bool),
    Int(i32),
    Int2([i32; 2]),
    Int3([i32; 3]),
    Int4([i32; 4]),
    UInt(u32),
    UInt2([u32; 2]),
    UInt3([u32; 3]),
    UInt4([u32; 4]),
    Float(f32),
    Float2([f32; 2]),
    Float3([f32; 3]),
    Float4([f32; 4]),
    Float2x2([f32; 4]),
    Float3x3([f32; 9]),
    Float4x4([f32; 16]),
    IntArray(Vec<i32>),
    Int2Array(Vec<[i32; 2]>),
    Int3Array(Vec<[i32; 3]>),
    Int4Array(Vec<[i32; 4]>),
    UIntArray(Vec<u32>),
    UInt2Array(Vec<[u32; 2]>),
    UInt3Array(Vec<[u32; 3]>),
    UInt4Array(Vec<[u32; 4]>),
    FloatArray(Vec<f32>),
    Float2Array(Vec<[f32; 2]>),
    Float3Array(Vec<[f32; 3]>),
    Float4Array(Vec<[f32; 4]>),
    Float2x2Array(Vec<[f32; 4]>),
    Float3x3Array(Vec<[f32; 9]>),
    Float4x4Array(Vec<[f32; 16]>),
    /// A texture with an optional sampler object for its unit.
    Texture(Rc<GlTexture>, Option<Rc<GlSampler>>),
    /// A uniform or storage buffer.
    Buffer(Rc<GlBuffer>),
}

impl UniformValue {
    /// The native upload for plain data values. Textures, buffers and
    /// unset slots have none.
    fn data(&self) -> Option<UniformData<'_>> {
        use UniformData::{Mat, F32, I32, U32};
        let data = match self {
            UniformValue::None | UniformValue::Texture(..) | UniformValue::Buffer(_) => {
                return None;
            }
            UniformValue::Bool(value) => I32 {
                components: 1,
                values: if *value { &[1] } else { &[0] },
            },
            UniformValue::Int(value) => I32 {
                components: 1,
                values: slice::from_ref(value),
            },
            UniformValue::Int2(value) => I32 {
                components: 2,
                values: value,
            },
            UniformValue::Int3(value) => I32 {
                components: 3,
                values: value,
            },
            UniformValue::Int4(value) => I32 {
                components: 4,
                values: value,
            },
            UniformValue::UInt(value) => U32 {
                components: 1,
                values: slice::from_ref(value),
            },
            UniformValue::UInt2(value) => U32 {
                components: 2,
                values: value,
            },
            UniformValue::UInt3(value) => U32 {
                components: 3,
                values: value,
            },
            UniformValue::UInt4(value) => U32 {
                components: 4,
                values: value,
            },
            UniformValue::Float(value) => F32 {
                components: 1,
                values: slice::from_ref(value),
            },
            UniformValue::Float2(value) => F32 {
                components: 2,
                values: value,
            },
            UniformValue::Float3(value) => F32 {
                components: 3,
                values: value,
            },
            UniformValue::Float4(value) => F32 {
                components: 4,
                values: value,
            },
            UniformValue::Float2x2(value) => Mat {
                dim: 2,
                values: value,
            },
            UniformValue::Float3x3(value) => Mat {
                dim: 3,
                values: value,
            },
            UniformValue::Float4x4(value) => Mat {
                dim: 4,
                values: value,
            },
            UniformValue::IntArray(values) => I32 {
                components: 1,
                values,
            },
            UniformValue::Int2Array(values) => I32 {
                components: 2,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::Int3Array(values) => I32 {
                components: 3,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::Int4Array(values) => I32 {
                components: 4,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::UIntArray(values) => U32 {
                components: 1,
                values,
            },
            UniformValue::UInt2Array(values) => U32 {
                components: 2,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::UInt3Array(values) => U32 {
                components: 3,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::UInt4Array(values) => U32 {
                components: 4,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::FloatArray(values) => F32 {
                components: 1,
                values,
            },
            UniformValue::Float2Array(values) => F32 {
                components: 2,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::Float3Array(values) => F32 {
                components: 3,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::Float4Array(values) => F32 {
                components: 4,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::Float2x2Array(values) => Mat {
                dim: 2,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::Float3x3Array(values) => Mat {
                dim: 3,
                values: bytemuck::cast_slice(values),
            },
            UniformValue::Float4x4Array(values) => Mat {
                dim: 4,
                values: bytemuck::cast_slice(values),
            },
        };
        Some(data)
    }
}

macro_rules! uniform_setters {
    ($($setter:ident($ty:ty) => $variant:ident;)*) => {
        $(
            #[doc = concat!("Assigns a `", stringify!($variant), "` value.")]
            pub fn $setter(&self, value: $ty) {
                self.assign(UniformType::$variant, UniformValue::$variant(value));
            }
        )*
    };
}

/// The value assigned to one parameter of a descriptor set.
pub struct UniformSlot {
    param: Rc<GraphicsParam>,
    value: RefCell<UniformValue>,
    dirty: Cell<bool>,
}

impl UniformSlot {
    fn new(param: Rc<GraphicsParam>) -> Self {
        Self {
            param,
            value: RefCell::new(UniformValue::None),
            dirty: Cell::new(false),
        }
    }

    /// The parameter this slot feeds.
    pub fn param(&self) -> &Rc<GraphicsParam> {
        &self.param
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        self.param.name()
    }

    /// The current value.
    pub fn value(&self) -> Ref<'_, UniformValue> {
        self.value.borrow()
    }

    /// Whether the value changed since it was last pushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    fn assign(&self, expected: UniformType, value: UniformValue) {
        debug_assert_eq!(
            self.param.uniform_type(),
            expected,
            "uniform {} assigned a {expected:?} value",
            self.param.name()
        );
        *self.value.borrow_mut() = value;
        self.dirty.set(true);
    }

    /// Assigns a `bool` value.
    pub fn uniform_bool(&self, value: bool) {
        self.assign(UniformType::Bool, UniformValue::Bool(value));
    }

    uniform_setters! {
        uniform_int(i32) => Int;
        uniform_int2([i32; 2]) => Int2;
        uniform_int3([i32; 3]) => Int3;
        uniform_int4([i32; 4]) => Int4;
        uniform_uint(u32) => UInt;
        uniform_uint2([u32; 2]) => UInt2;
        uniform_uint3([u32; 3]) => UInt3;
        uniform_uint4([u32; 4]) => UInt4;
        uniform_float(f32) => Float;
        uniform_float2([f32; 2]) => Float2;
        uniform_float3([f32; 3]) => Float3;
        uniform_float4([f32; 4]) => Float4;
        uniform_float2x2([f32; 4]) => Float2x2;
        uniform_float3x3([f32; 9]) => Float3x3;
        uniform_float4x4([f32; 16]) => Float4x4;
        uniform_int_array(Vec<i32>) => IntArray;
        uniform_int2_array(Vec<[i32; 2]>) => Int2Array;
        uniform_int3_array(Vec<[i32; 3]>) => Int3Array;
        uniform_int4_array(Vec<[i32; 4]>) => Int4Array;
        uniform_uint_array(Vec<u32>) => UIntArray;
        uniform_uint2_array(Vec<[u32; 2]>) => UInt2Array;
        uniform_uint3_array(Vec<[u32; 3]>) => UInt3Array;
        uniform_uint4_array(Vec<[u32; 4]>) => UInt4Array;
        uniform_float_array(Vec<f32>) => FloatArray;
        uniform_float2_array(Vec<[f32; 2]>) => Float2Array;
        uniform_float3_array(Vec<[f32; 3]>) => Float3Array;
        uniform_float4_array(Vec<[f32; 4]>) => Float4Array;
        uniform_float2x2_array(Vec<[f32; 4]>) => Float2x2Array;
        uniform_float3x3_array(Vec<[f32; 9]>) => Float3x3Array;
        uniform_float4x4_array(Vec<[f32; 16]>) => Float4x4Array;
    }

    /// Binds `texture`, and optionally a sampler object, to the slot's unit.
    pub fn uniform_texture(&self, texture: Rc<GlTexture>, sampler: Option<Rc<GlSampler>>) {
        debug_assert!(
            self.param.uniform_type().is_sampler(),
            "uniform {} is not a sampler",
            self.param.name()
        );
        *self.value.borrow_mut() = UniformValue::Texture(texture, sampler);
        self.dirty.set(true);
    }

    /// Binds `buffer` to the block's binding point.
    pub fn uniform_buffer(&self, buffer: Rc<GlBuffer>) {
        debug_assert!(
            self.param.uniform_type().is_buffer(),
            "uniform {} is not a buffer block",
            self.param.name()
        );
        *self.value.borrow_mut() = UniformValue::Buffer(buffer);
        self.dirty.set(true);
    }
}

impl fmt::Debug for UniformSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformSlot")
            .field("name", &self.param.name())
            .field("value", &self.value.borrow())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

/// What a descriptor set is allocated against.
#[derive(Debug, Clone)]
pub struct DescriptorSetDesc {
    /// Declares the slots.
    pub layout: Rc<GlDescriptorSetLayout>,
    /// Pool the set counts against, if any.
    pub pool: Option<Rc<GlDescriptorPool>>,
}

impl DescriptorSetDesc {
    /// A set over `layout` with no pool.
    pub fn new(layout: Rc<GlDescriptorSetLayout>) -> Self {
        Self { layout, pool: None }
    }
}

/// Client-side uniform values for one program interface.
#[derive(Debug)]
pub struct GlDescriptorSet {
    shared: GlShared,
    slots: Vec<UniformSlot>,
    desc: DescriptorSetDesc,
}

impl GlDescriptorSet {
    /// Allocates one slot per layout parameter.
    pub fn setup(shared: &GlShared, desc: DescriptorSetDesc) -> Result<Self, ResourceError> {
        if let Some(pool) = &desc.pool {
            if !pool.reserve() {
                return Err(shared.fail(ResourceError::InvalidDescriptor(format!(
                    "descriptor pool is exhausted ({} sets)",
                    pool.desc().max_sets
                ))));
            }
        }
        let slots = desc
            .layout
            .desc()
            .params
            .iter()
            .cloned()
            .map(UniformSlot::new)
            .collect();
        Ok(Self {
            shared: shared.clone(),
            slots,
            desc,
        })
    }

    /// The layout and pool this set was allocated against.
    pub fn desc(&self) -> &DescriptorSetDesc {
        &self.desc
    }

    /// Every slot, in layout order.
    pub fn slots(&self) -> &[UniformSlot] {
        &self.slots
    }

    /// The slot for the parameter called `name`.
    pub fn slot(&self, name: &str) -> Option<&UniformSlot> {
        self.slots.iter().find(|slot| slot.name() == name)
    }

    /// Pushes every dirty slot to `program`.
    pub fn apply(&self, program: &GlProgram) {
        self.apply_with(program, false);
    }

    /// Pushes slots to `program`; with `force`, clean slots are pushed too.
    pub(crate) fn apply_with(&self, program: &GlProgram, force: bool) {
        let gl = self.shared.gl();
        let handle = program.instance_id();
        for slot in &self.slots {
            if !force && !slot.dirty.get() {
                continue;
            }
            let value = slot.value.borrow();
            let binding = slot.param.binding();
            match &*value {
                UniformValue::Texture(texture, sampler) => {
                    match self.shared.variant() {
                        GlVariant::Legacy => {
                            gl.active_texture(binding);
                            gl.bind_texture(texture.target(), texture.instance_id());
                        }
                        GlVariant::Core => gl.bind_texture_unit(binding, texture.instance_id()),
                    }
                    match sampler {
                        Some(sampler) => sampler.bind(binding),
                        None => gl.bind_sampler(binding, 0),
                    }
                }
                UniformValue::Buffer(buffer) => {
                    let target = match slot.param.uniform_type() {
                        UniformType::StorageBuffer | UniformType::StorageBufferDynamic => {
                            glow::SHADER_STORAGE_BUFFER
                        }
                        _ => glow::UNIFORM_BUFFER,
                    };
                    gl.bind_buffer_base(target, binding, buffer.instance_id());
                }
                other => {
                    if let Some(data) = other.data() {
                        gl.program_uniform(handle, binding as i32, data);
                    }
                }
            }
            slot.dirty.set(false);
        }
    }

    /// Copies values from `sources` into the slots that share a parameter
    /// with them. Parameters match by identity, not by name.
    pub fn copy_from(&self, sources: &[&GlDescriptorSet]) {
        for slot in &self.slots {
            let matched = sources
                .iter()
                .flat_map(|source| source.slots.iter())
                .find(|other| Rc::ptr_eq(&other.param, &slot.param));
            if let Some(other) = matched {
                if std::ptr::eq(other, slot) {
                    continue;
                }
                *slot.value.borrow_mut() = other.value.borrow().clone();
                slot.dirty.set(true);
            }
        }
    }
}

impl Drop for GlDescriptorSet {
    fn drop(&mut self) {
        if let Some(pool) = &self.desc.pool {
            pool.release();
        }
    }
}
