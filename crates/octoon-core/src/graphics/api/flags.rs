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

//! Bit masks used across descriptors and context calls.

use super::enums::ShaderStage;
use crate::octoon_bitflags;

octoon_bitflags! {
    /// Channels written by a color attachment.
    pub struct ColorMask: u8 {
        /// Red.
        const R = 0b0001;
        /// Green.
        const G = 0b0010;
        /// Blue.
        const B = 0b0100;
        /// Alpha.
        const A = 0b1000;
        /// Red, green and blue.
        const RGB = 0b0111;
        /// All four channels.
        const RGBA = 0b1111;
    }
}

octoon_bitflags! {
    /// Buffers touched by a clear or discard.
    pub struct ClearFlags: u8 {
        /// Color attachments.
        const COLOR = 0b001;
        /// Depth attachment.
        const DEPTH = 0b010;
        /// Stencil attachment.
        const STENCIL = 0b100;
        /// Depth and stencil.
        const DEPTH_STENCIL = 0b110;
        /// Color, depth and stencil.
        const COLOR_DEPTH_STENCIL = 0b111;
    }
}

octoon_bitflags! {
    /// Shader stages a resource or uniform is visible to.
    pub struct ShaderStageFlags: u32 {
        /// Vertex stage.
        const VERTEX = 0x01;
        /// Fragment stage.
        const FRAGMENT = 0x02;
        /// Geometry stage.
        const GEOMETRY = 0x04;
        /// Compute stage.
        const COMPUTE = 0x08;
        /// Tessellation evaluation stage.
        const TESS_EVALUATION = 0x10;
        /// Tessellation control stage.
        const TESS_CONTROL = 0x20;
    }
}

impl From<ShaderStage> for ShaderStageFlags {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => Self::VERTEX,
            ShaderStage::Fragment => Self::FRAGMENT,
            ShaderStage::Geometry => Self::GEOMETRY,
            ShaderStage::Compute => Self::COMPUTE,
            ShaderStage::TessEvaluation => Self::TESS_EVALUATION,
            ShaderStage::TessControl => Self::TESS_CONTROL,
        }
    }
}

octoon_bitflags! {
    /// Stencil faces addressed by a stencil setter.
    pub struct StencilFaceFlags: u8 {
        /// Front-facing primitives.
        const FRONT = 0b01;
        /// Back-facing primitives.
        const BACK = 0b10;
        /// Both faces.
        const FRONT_AND_BACK = 0b11;
    }
}

octoon_bitflags! {
    /// Storage hints for a buffer.
    pub struct UsageFlags: u32 {
        /// CPU reads back the contents.
        const READ = 0x01;
        /// CPU writes the contents after creation.
        const WRITE = 0x02;
        /// Mapping may persist across draws.
        const PERSISTENT = 0x04;
        /// Persistent mappings stay coherent without explicit flushes.
        const COHERENT = 0x08;
        /// Mapped ranges are flushed explicitly.
        const FLUSH_EXPLICIT = 0x10;
        /// Contents are updated through sub-data calls.
        const DYNAMIC_STORAGE = 0x20;
        /// Prefer client-side storage.
        const CLIENT_STORAGE = 0x40;
    }
}

octoon_bitflags! {
    /// Sample counts a format supports.
    pub struct SampleFlags: u32 {
        /// 1 sample.
        const X1 = 0x01;
        /// 2 samples.
        const X2 = 0x02;
        /// 4 samples.
        const X4 = 0x04;
        /// 8 samples.
        const X8 = 0x08;
        /// 16 samples.
        const X16 = 0x10;
        /// 32 samples.
        const X32 = 0x20;
        /// 64 samples.
        const X64 = 0x40;
    }
}

impl SampleFlags {
    /// Every sample count up to and including `max_samples`.
    pub fn up_to(max_samples: u32) -> Self {
        let mut flags = Self::EMPTY;
        let mut count = 1;
        let mut bit = Self::X1.bits();
        while count <= max_samples && bit <= Self::X64.bits() {
            flags.insert(Self::from_bits_truncate(bit));
            count <<= 1;
            bit <<= 1;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mask_composites() {
        assert_eq!(ColorMask::RGB | ColorMask::A, ColorMask::RGBA);
        assert!(ColorMask::RGBA.is_all());
        assert_eq!(format!("{:?}", ColorMask::R | ColorMask::B), "ColorMask(R | B)");
    }

    #[test]
    fn test_stage_to_flags() {
        let flags = ShaderStageFlags::from(ShaderStage::Vertex)
            | ShaderStageFlags::from(ShaderStage::Fragment);
        assert!(flags.contains(ShaderStageFlags::VERTEX));
        assert!(!flags.contains(ShaderStageFlags::COMPUTE));
        assert_eq!(flags.bits(), 0x03);
    }

    #[test]
    fn test_sample_flags_up_to() {
        assert_eq!(SampleFlags::up_to(0), SampleFlags::EMPTY);
        assert_eq!(SampleFlags::up_to(1), SampleFlags::X1);
        assert_eq!(
            SampleFlags::up_to(8),
            SampleFlags::X1 | SampleFlags::X2 | SampleFlags::X4 | SampleFlags::X8
        );
        assert_eq!(SampleFlags::up_to(1024), SampleFlags::ALL);
    }
}
