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

//! Texture and sampler descriptors.

use super::enums::{SamplerAnis, SamplerFilter, SamplerWrap, TextureDim};
use super::format::GraphicsFormat;

/// Everything needed to create a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Shape.
    pub dim: TextureDim,
    /// Texel format.
    pub format: GraphicsFormat,
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Depth of mip 0, for 3D textures.
    pub depth: u32,
    /// First mip level uploaded and sampled.
    pub mip_base: u32,
    /// Number of mip levels.
    pub mip_count: u32,
    /// First array layer uploaded.
    pub layer_base: u32,
    /// Number of array layers.
    pub layer_count: u32,
    /// Multisampled storage.
    pub multisample: bool,
    /// Sample count when `multisample` is set.
    pub samples: u32,
    /// Wrap mode on all three axes.
    pub wrap: SamplerWrap,
    /// Minification filter.
    pub min_filter: SamplerFilter,
    /// Magnification filter.
    pub mag_filter: SamplerFilter,
    /// Anisotropy level.
    pub anis: SamplerAnis,
    /// Initial contents, laid out mip by mip, then layer by layer, then face by face.
    pub data: Option<Vec<u8>>,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            dim: TextureDim::Texture2D,
            format: GraphicsFormat::Undefined,
            width: 1,
            height: 1,
            depth: 1,
            mip_base: 0,
            mip_count: 1,
            layer_base: 0,
            layer_count: 1,
            multisample: false,
            samples: 1,
            wrap: SamplerWrap::Repeat,
            min_filter: SamplerFilter::Linear,
            mag_filter: SamplerFilter::Linear,
            anis: SamplerAnis::Anis0,
            data: None,
        }
    }
}

impl TextureDesc {
    /// A single-level 2D texture without initial data.
    pub fn new_2d(width: u32, height: u32, format: GraphicsFormat) -> Self {
        Self {
            width,
            height,
            format,
            ..Self::default()
        }
    }

    /// Size of mip `level`, each axis clamped to 1.
    pub fn mip_extent(&self, level: u32) -> (u32, u32, u32) {
        let shrink = |v: u32| (v >> level.min(31)).max(1);
        let depth = match self.dim {
            TextureDim::Texture3D => shrink(self.depth),
            _ => self.depth.max(1),
        };
        (shrink(self.width), shrink(self.height), depth)
    }

    /// Number of faces per layer: 6 for cube maps, 1 otherwise.
    pub fn faces(&self) -> u32 {
        match self.dim {
            TextureDim::Cube | TextureDim::CubeArray => 6,
            _ => 1,
        }
    }

    /// Last mip level, inclusive.
    pub fn mip_max(&self) -> u32 {
        self.mip_base + self.mip_count.max(1) - 1
    }
}

/// Everything needed to create a standalone sampler object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerDesc {
    /// Wrap mode on all three axes.
    pub wrap: SamplerWrap,
    /// Minification filter.
    pub min_filter: SamplerFilter,
    /// Magnification filter.
    pub mag_filter: SamplerFilter,
    /// Anisotropy level.
    pub anis: SamplerAnis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_extent_clamps_to_one() {
        let desc = TextureDesc::new_2d(256, 64, GraphicsFormat::R8G8B8A8UNorm);
        assert_eq!(desc.mip_extent(0), (256, 64, 1));
        assert_eq!(desc.mip_extent(3), (32, 8, 1));
        assert_eq!(desc.mip_extent(8), (1, 1, 1));
    }

    #[test]
    fn test_mip_extent_shrinks_depth_for_3d_only() {
        let mut desc = TextureDesc::new_2d(16, 16, GraphicsFormat::R8UNorm);
        desc.depth = 8;
        assert_eq!(desc.mip_extent(1).2, 8);
        desc.dim = TextureDim::Texture3D;
        assert_eq!(desc.mip_extent(1).2, 4);
    }

    #[test]
    fn test_faces_and_mip_range() {
        let mut desc = TextureDesc::default();
        assert_eq!(desc.faces(), 1);
        desc.dim = TextureDim::CubeArray;
        assert_eq!(desc.faces(), 6);
        desc.mip_base = 2;
        desc.mip_count = 3;
        assert_eq!(desc.mip_max(), 4);
    }
}
