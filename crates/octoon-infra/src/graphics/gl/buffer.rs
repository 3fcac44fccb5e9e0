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

//! GPU buffers: vertex, index, uniform, storage, indirect and transfer.

use std::cell::Cell;
use std::fmt;
use std::ops::Deref;

use octoon_core::graphics::api::{BufferDesc, DataType, UsageFlags};
use octoon_core::graphics::error::ResourceError;

use super::shared::{GlShared, GlVariant};
use super::types;

/// A native buffer object.
pub struct GlBuffer {
    shared: GlShared,
    handle: Cell<u32>,
    target: u32,
    size: usize,
    gpu_address: Cell<u64>,
    desc: BufferDesc,
}

impl GlBuffer {
    /// Allocates the buffer and uploads `desc.data` when present.
    pub fn setup(shared: &GlShared, desc: BufferDesc) -> Result<Self, ResourceError> {
        let target = types::require(
            types::as_buffer_target(desc.data_type),
            "buffer data type",
            desc.data_type,
        )
        .map_err(|err| shared.fail(ResourceError::from(err)))?;

        let size = desc.byte_len();
        if size == 0 {
            return Err(shared.fail(ResourceError::InvalidDescriptor(
                "buffer size is zero".to_owned(),
            )));
        }

        let gl = shared.gl();
        let handle = match shared.variant() {
            GlVariant::Legacy => gl.gen_buffer(),
            GlVariant::Core => gl.create_buffer(),
        };
        if handle == 0 {
            return Err(shared.fail(ResourceError::NativeAllocation("glGenBuffers")));
        }

        match shared.variant() {
            GlVariant::Legacy => {
                let usage = if desc.usage.contains(UsageFlags::DYNAMIC_STORAGE) {
                    glow::DYNAMIC_DRAW
                } else {
                    glow::STATIC_DRAW
                };
                gl.bind_buffer(target, handle);
                gl.buffer_data(target, size, desc.data.as_deref(), usage);
                gl.bind_buffer(target, 0);
            }
            GlVariant::Core => {
                gl.named_buffer_storage(
                    handle,
                    size,
                    desc.data.as_deref(),
                    storage_flags(desc.usage),
                );
            }
        }

        let buffer = Self {
            shared: shared.clone(),
            handle: Cell::new(handle),
            target,
            size,
            gpu_address: Cell::new(0),
            desc,
        };

        if shared.bindless() && buffer.desc.data_type == DataType::StorageVertexBuffer {
            gl.make_named_buffer_resident_nv(handle, glow::READ_ONLY);
            buffer.gpu_address.set(gl.buffer_gpu_address_nv(handle));
        }

        Ok(buffer)
    }

    /// The native buffer name, 0 once closed.
    pub fn instance_id(&self) -> u32 {
        self.handle.get()
    }

    /// The descriptor this buffer was created from.
    pub fn desc(&self) -> &BufferDesc {
        &self.desc
    }

    /// Size of the native storage in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Native bind target derived from the data type.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// GPU address of a resident vertex buffer on the bindless path.
    pub fn gpu_address(&self) -> Option<u64> {
        Some(self.gpu_address.get()).filter(|address| *address != 0)
    }

    /// Overwrites `bytes.len()` bytes starting at `offset`.
    pub fn update(&self, offset: usize, bytes: &[u8]) -> Result<(), ResourceError> {
        self.check_range(offset, bytes.len())?;
        let gl = self.shared.gl();
        match self.shared.variant() {
            GlVariant::Legacy => {
                gl.bind_buffer(self.target, self.handle.get());
                gl.buffer_sub_data(self.target, offset, bytes);
                gl.bind_buffer(self.target, 0);
            }
            GlVariant::Core => gl.named_buffer_sub_data(self.handle.get(), offset, bytes),
        }
        Ok(())
    }

    /// Maps `len` bytes at `offset` for reading. The mapping is released
    /// when the returned guard drops.
    pub fn read(&self, offset: usize, len: usize) -> Result<MappedBuffer<'_>, ResourceError> {
        self.check_range(offset, len)?;
        let gl = self.shared.gl();
        let handle = self.handle.get();
        let data = match self.shared.variant() {
            GlVariant::Legacy => {
                gl.bind_buffer(self.target, handle);
                let data = gl.map_buffer_range(self.target, offset, len, glow::MAP_READ_BIT);
                gl.bind_buffer(self.target, 0);
                data
            }
            GlVariant::Core => gl.map_named_buffer_range(handle, offset, len, glow::MAP_READ_BIT),
        };
        match data {
            Some(data) => Ok(MappedBuffer { buffer: self, data }),
            None => Err(self.shared.fail(ResourceError::NativeAllocation("glMapBufferRange"))),
        }
    }

    /// Deletes the native buffer. Later calls do nothing.
    pub fn close(&self) {
        let handle = self.handle.replace(0);
        if handle != 0 {
            self.shared.gl().delete_buffer(handle);
            self.gpu_address.set(0);
        }
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<(), ResourceError> {
        if self.handle.get() == 0 {
            return Err(self.shared.fail(ResourceError::InvalidDescriptor(
                "buffer is closed".to_owned(),
            )));
        }
        match offset.checked_add(len) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(self.shared.fail(ResourceError::InvalidDescriptor(format!(
                "range {offset}+{len} exceeds buffer size {}",
                self.size
            )))),
        }
    }

    fn unmap(&self) {
        let gl = self.shared.gl();
        match self.shared.variant() {
            GlVariant::Legacy => {
                gl.bind_buffer(self.target, self.handle.get());
                gl.unmap_buffer(self.target);
                gl.bind_buffer(self.target, 0);
            }
            GlVariant::Core => {
                gl.unmap_named_buffer(self.handle.get());
            }
        }
    }
}

/// Immutable storage flags for the core variant.
fn storage_flags(usage: UsageFlags) -> u32 {
    let mut flags = glow::DYNAMIC_STORAGE_BIT | glow::MAP_READ_BIT | glow::MAP_WRITE_BIT;
    if usage.contains(UsageFlags::PERSISTENT) {
        flags |= glow::MAP_PERSISTENT_BIT;
    }
    if usage.contains(UsageFlags::COHERENT) {
        flags |= glow::MAP_COHERENT_BIT;
    }
    if usage.contains(UsageFlags::CLIENT_STORAGE) {
        flags |= glow::CLIENT_STORAGE_BIT;
    }
    flags
}

impl Drop for GlBuffer {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GlBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlBuffer")
            .field("handle", &self.handle.get())
            .field("data_type", &self.desc.data_type)
            .field("size", &self.size)
            .finish()
    }
}

/// CPU copy of a mapped buffer range; unmaps on drop.
pub struct MappedBuffer<'a> {
    buffer: &'a GlBuffer,
    data: Vec<u8>,
}

impl Deref for MappedBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for MappedBuffer<'_> {
    fn drop(&mut self) {
        self.buffer.unmap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::ext;
    use crate::graphics::gl::shared::testing::{headless, headless_with};
    use crate::graphics::gl::HeadlessDriver;

    #[test]
    fn test_legacy_setup_uploads_through_bind_point() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let desc = BufferDesc::with_data(DataType::StorageVertexBuffer, &[1, 2, 3, 4]);

        // ACT
        let buffer = GlBuffer::setup(&shared, desc).unwrap();

        // ASSERT
        assert_ne!(buffer.instance_id(), 0);
        assert_eq!(buffer.target(), glow::ARRAY_BUFFER);
        assert_eq!(driver.buffer_contents(buffer.instance_id()), Some(vec![1, 2, 3, 4]));
        assert_eq!(driver.count("buffer_data"), 1);
        assert_eq!(driver.count("named_buffer_storage"), 0);
    }

    #[test]
    fn test_core_setup_uses_immutable_storage() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let desc = BufferDesc::with_size(DataType::UniformBuffer, 64);

        let buffer = GlBuffer::setup(&shared, desc).unwrap();

        let storage = driver.calls_named("named_buffer_storage");
        assert_eq!(storage.len(), 1);
        assert_eq!(storage[0].args[1], 64);
        assert_eq!(buffer.target(), glow::UNIFORM_BUFFER);
        assert_eq!(driver.buffer_contents(buffer.instance_id()), Some(vec![0; 64]));
    }

    #[test]
    fn test_update_and_read_back() {
        for variant in [GlVariant::Legacy, GlVariant::Core] {
            // ARRANGE
            let (driver, _sink, shared) = headless(variant);
            let desc = BufferDesc::with_size(DataType::StorageBuffer, 8);
            let buffer = GlBuffer::setup(&shared, desc).unwrap();

            // ACT
            buffer.update(2, &[7, 8, 9]).unwrap();
            let mapped = buffer.read(1, 4).unwrap();

            // ASSERT
            assert_eq!(&mapped[..], &[0, 7, 8, 9]);
            assert!(driver.is_buffer_mapped(buffer.instance_id()));
            drop(mapped);
            assert!(!driver.is_buffer_mapped(buffer.instance_id()), "{variant:?}");
        }
    }

    #[test]
    fn test_out_of_range_update_is_reported() {
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let buffer =
            GlBuffer::setup(&shared, BufferDesc::with_size(DataType::StorageBuffer, 4)).unwrap();

        let result = buffer.update(2, &[0; 4]);

        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert_eq!(sink.len(), 1);
        assert!(sink.messages()[0].contains("exceeds buffer size 4"));
    }

    #[test]
    fn test_unmapped_data_type_fails_without_native_calls() {
        let (driver, sink, shared) = headless(GlVariant::Legacy);
        let desc = BufferDesc::with_size(DataType::None, 16);

        let result = GlBuffer::setup(&shared, desc);

        assert!(matches!(result, Err(ResourceError::Translate(_))));
        assert_eq!(driver.count("gen_buffer"), 0);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_zero_sized_buffer_is_rejected() {
        let (_driver, sink, shared) = headless(GlVariant::Legacy);
        let result = GlBuffer::setup(&shared, BufferDesc::with_size(DataType::UniformBuffer, 0));
        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert_eq!(sink.messages(), vec!["Invalid descriptor: buffer size is zero".to_owned()]);
    }

    #[test]
    fn test_close_is_idempotent() {
        // ARRANGE
        let (driver, sink, shared) = headless(GlVariant::Core);
        let buffer =
            GlBuffer::setup(&shared, BufferDesc::with_size(DataType::IndirectBuffer, 16)).unwrap();

        // ACT
        buffer.close();
        buffer.close();
        drop(buffer);

        // ASSERT
        assert_eq!(driver.count("delete_buffer"), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_bindless_vertex_buffers_are_resident() {
        let driver = HeadlessDriver::new().with_extension(ext::NV_VERTEX_BUFFER_UNIFIED_MEMORY);
        let (driver, _sink, shared) = headless_with(driver, GlVariant::Core, true);

        let vertices =
            GlBuffer::setup(&shared, BufferDesc::with_size(DataType::StorageVertexBuffer, 48))
                .unwrap();
        let uniforms =
            GlBuffer::setup(&shared, BufferDesc::with_size(DataType::UniformBuffer, 48)).unwrap();

        assert!(driver.is_buffer_resident(vertices.instance_id()));
        assert!(vertices.gpu_address().is_some());
        assert!(uniforms.gpu_address().is_none());
    }
}
