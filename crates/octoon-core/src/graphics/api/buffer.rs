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

//! Buffer descriptors.

use super::enums::DataType;
use super::flags::UsageFlags;

/// Everything needed to create a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferDesc {
    /// What the buffer holds.
    pub data_type: DataType,
    /// Storage hints.
    pub usage: UsageFlags,
    /// Size in bytes. When `data` is set and `size` is 0, the data length is used.
    pub size: usize,
    /// Initial contents.
    pub data: Option<Vec<u8>>,
}

impl BufferDesc {
    /// A buffer of `data_type` initialised with `bytes`.
    pub fn with_data(data_type: DataType, bytes: &[u8]) -> Self {
        Self {
            data_type,
            usage: UsageFlags::DYNAMIC_STORAGE,
            size: bytes.len(),
            data: Some(bytes.to_vec()),
        }
    }

    /// A buffer of `data_type` initialised from plain-old-data elements.
    pub fn with_pod<T: bytemuck::Pod>(data_type: DataType, elements: &[T]) -> Self {
        Self::with_data(data_type, bytemuck::cast_slice(elements))
    }

    /// An uninitialised buffer of `size` bytes.
    pub fn with_size(data_type: DataType, size: usize) -> Self {
        Self {
            data_type,
            usage: UsageFlags::DYNAMIC_STORAGE,
            size,
            data: None,
        }
    }

    /// Size actually allocated: the declared size, or the data length if larger.
    pub fn byte_len(&self) -> usize {
        let data_len = self.data.as_ref().map_or(0, Vec::len);
        self.size.max(data_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_len_prefers_larger_of_size_and_data() {
        let desc = BufferDesc::with_data(DataType::StorageVertexBuffer, &[0u8; 12]);
        assert_eq!(desc.byte_len(), 12);

        let mut padded = desc.clone();
        padded.size = 64;
        assert_eq!(padded.byte_len(), 64);

        let empty = BufferDesc::with_size(DataType::UniformBuffer, 0);
        assert_eq!(empty.byte_len(), 0);
    }

    #[test]
    fn test_with_pod_casts_elements() {
        let positions: [[f32; 3]; 2] = [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let desc = BufferDesc::with_pod(DataType::StorageVertexBuffer, &positions);
        assert_eq!(desc.byte_len(), 24);
        let bytes = desc.data.unwrap();
        assert_eq!(&bytes[4..8], &1.0f32.to_ne_bytes());
    }
}
