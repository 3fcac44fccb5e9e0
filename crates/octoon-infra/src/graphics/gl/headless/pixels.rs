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

//! Texel encoding and region copies for the software driver.

use half::f16;
use octoon_core::graphics::api::GraphicsFormat;

use crate::graphics::gl::types;

/// How one texel of an internal format is laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TexelLayout {
    pub format: GraphicsFormat,
    pub component_type: u32,
    pub bytes: usize,
}

/// `None` for compressed and unknown formats, which are stored raw.
pub(crate) fn texel_layout(internal: u32) -> Option<TexelLayout> {
    let format = types::format_from_native(internal)?;
    let pixel = types::as_texture_format(format)?;
    let component_type = types::as_texture_type(format)?;
    let bytes = types::format_num(pixel, component_type) as usize;
    (bytes > 0).then_some(TexelLayout {
        format,
        component_type,
        bytes,
    })
}

/// Encodes a float clear color, `None` when the layout has no float path.
pub(crate) fn encode_color(layout: &TexelLayout, values: &[f32]) -> Option<Vec<u8>> {
    let mut texel = Vec::with_capacity(layout.bytes);
    for channel in 0..layout.format.channels() as usize {
        let v = values.get(channel).copied().unwrap_or(0.0);
        match layout.component_type {
            glow::UNSIGNED_BYTE => texel.push((v.clamp(0.0, 1.0) * 255.0).round() as u8),
            glow::BYTE => texel.push((v.clamp(-1.0, 1.0) * 127.0).round() as i8 as u8),
            glow::UNSIGNED_SHORT => {
                let unorm = (v.clamp(0.0, 1.0) * 65535.0).round() as u16;
                texel.extend_from_slice(&unorm.to_le_bytes());
            }
            glow::HALF_FLOAT => texel.extend_from_slice(&f16::from_f32(v).to_le_bytes()),
            glow::FLOAT => texel.extend_from_slice(&v.to_le_bytes()),
            _ => return None,
        }
    }
    (texel.len() == layout.bytes).then_some(texel)
}

/// Encodes an integer clear color for `*_INTEGER` formats.
pub(crate) fn encode_int(layout: &TexelLayout, values: &[i32]) -> Option<Vec<u8>> {
    let width = match layout.component_type {
        glow::BYTE | glow::UNSIGNED_BYTE => 1,
        glow::SHORT | glow::UNSIGNED_SHORT => 2,
        glow::INT | glow::UNSIGNED_INT => 4,
        _ => return None,
    };
    let mut texel = Vec::with_capacity(layout.bytes);
    for channel in 0..layout.format.channels() as usize {
        let v = values.get(channel).copied().unwrap_or(0);
        texel.extend_from_slice(&v.to_le_bytes()[..width]);
    }
    (texel.len() == layout.bytes).then_some(texel)
}

/// Writes depth and/or stencil into one texel, keeping the other half.
pub(crate) fn write_depth_stencil(
    internal: u32,
    texel: &mut [u8],
    depth: Option<f32>,
    stencil: Option<i32>,
) {
    match internal {
        glow::DEPTH_COMPONENT16 => {
            if let Some(d) = depth {
                let value = (d.clamp(0.0, 1.0) * 65535.0).round() as u16;
                texel[..2].copy_from_slice(&value.to_le_bytes());
            }
        }
        glow::DEPTH_COMPONENT24 => {
            if let Some(d) = depth {
                let value = (d.clamp(0.0, 1.0) * 16_777_215.0).round() as u32;
                texel[..4].copy_from_slice(&value.to_le_bytes());
            }
        }
        glow::DEPTH_COMPONENT32F => {
            if let Some(d) = depth {
                texel[..4].copy_from_slice(&d.to_le_bytes());
            }
        }
        glow::STENCIL_INDEX8 => {
            if let Some(s) = stencil {
                texel[0] = s as u8;
            }
        }
        glow::DEPTH24_STENCIL8 => {
            let packed = u32::from_le_bytes([texel[0], texel[1], texel[2], texel[3]]);
            let d24 = depth.map_or(
                packed >> 8, |d| (d.clamp(0.0,
                1.0) * 16_777_215.0).round() as u32,
            );
            let s8 = stencil.map_or(packed & 0xFF, |s| (s as u32) & 0xFF);
            texel[..4].copy_from_slice(&((d24 << 8) | s8).to_le_bytes());
        }
        glow::DEPTH32F_STENCIL8 => {
            if let Some(d) = depth {
                texel[..4].copy_from_slice(&d.to_le_bytes());
            }
            if let Some(s) = stencil {
                texel[4] = s as u8;
            }
        }
        _ => {}
    }
}

/// Converts stored texels into the component type a readback asked for.
pub(crate) fn convert_for_read(
    layout: Option<&TexelLayout>,
    data: &[u8],
    requested: u32,
) -> Vec<u8> {
    let Some(layout) = layout else {
        return data.to_vec();
    };
    match (layout.component_type, requested) {
        (stored, wanted) if stored == wanted => data.to_vec(),
        (glow::HALF_FLOAT, glow::FLOAT) => {
            let floats: Vec<f32> = data
                .chunks_exact(2)
                .map(|c| f16::from_le_bytes([c[0], c[1]]).to_f32())
                .collect();
            bytemuck::cast_slice(&floats).to_vec()
        }
        (glow::UNSIGNED_BYTE, glow::FLOAT) => {
            let floats: Vec<f32> = data.iter().map(|b| f32::from(*b) / 255.0).collect();
            bytemuck::cast_slice(&floats).to_vec()
        }
        _ => data.to_vec(),
    }
}

/// A box inside a texture level, in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, z: i32, width: i32, height: i32, depth: i32) -> Self {
        Self {
            x: x.max(0) as u32,
            y: y.max(0) as u32,
            z: z.max(0) as u32,
            width: width.max(0) as u32,
            height: height.max(0) as u32,
            depth: depth.max(0) as u32,
        }
    }
}

/// Dimensions of a stored level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Extent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent {
    pub fn byte_len(&self, bpp: usize) -> usize {
        self.width as usize * self.height as usize * self.depth as usize * bpp
    }
}

fn row_offsets(extent: Extent, bpp: usize, region: Region) -> impl Iterator<Item = (usize, usize)> {
    let width = region.width.min(extent.width.saturating_sub(region.x)) as usize;
    let rows = region.height.min(extent.height.saturating_sub(region.y));
    let slices = region.depth.min(extent.depth.saturating_sub(region.z));
    (0..slices).flat_map(move |slice| {
        (0..rows).map(move |row| {
            let z = (region.z + slice) as usize;
            let y = (region.y + row) as usize;
            let row_start = (z * extent.height as usize + y) * extent.width as usize;
            let texel = row_start + region.x as usize;
            (texel * bpp, width * bpp)
        })
    })
}

/// Copies a region out of a level, row by row, clipped to the level.
pub(crate) fn read_region(data: &[u8], extent: Extent, bpp: usize, region: Region) -> Vec<u8> {
    let mut out = Vec::new();
    for (start, len) in row_offsets(extent, bpp, region) {
        if let Some(row) = data.get(start..start + len) {
            out.extend_from_slice(row);
        }
    }
    out
}

/// Writes tightly packed rows into a region of a level.
pub(crate) fn write_region(
    data: &mut [u8],
    extent: Extent,
    bpp: usize,
    region: Region,
    src: &[u8],
) {
    let src_row = region.width as usize * bpp;
    let mut cursor = 0;
    for (start, len) in row_offsets(extent, bpp, region) {
        let Some(row) = src.get(cursor..cursor + len) else {
            break;
        };
        if let Some(dst) = data.get_mut(start..start + len) {
            dst.copy_from_slice(row);
        }
        cursor += src_row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_texel_layout_of_common_formats() {
        let rgba8 = texel_layout(glow::RGBA8).unwrap();
        assert_eq!(rgba8.bytes, 4);
        assert_eq!(rgba8.component_type, glow::UNSIGNED_BYTE);
        assert_eq!(texel_layout(glow::RGBA16F).unwrap().bytes, 8);
        assert_eq!(texel_layout(glow::DEPTH32F_STENCIL8).unwrap().bytes, 8);
        assert!(texel_layout(glow::COMPRESSED_RGBA_BPTC_UNORM).is_none());
    }

    #[test]
    fn test_encode_color() {
        let rgba8 = texel_layout(glow::RGBA8).unwrap();
        assert_eq!(encode_color(&rgba8, &[1.0, 0.0, 0.5, 1.0]), Some(vec![255, 0, 128, 255]));

        let r32f = texel_layout(glow::R32F).unwrap();
        assert_eq!(
            encode_color(&r32f, &[0.25, 9.0, 9.0, 9.0]),
            Some(0.25f32.to_le_bytes().to_vec())
        );

        let rgba32ui = texel_layout(glow::RGBA32UI).unwrap();
        assert_eq!(encode_color(&rgba32ui, &[1.0; 4]), None);
        assert_eq!(encode_int(&rgba32ui, &[1, 2, 3, 4]).map(|t| t.len()), Some(16));
    }

    #[test]
    fn test_depth24_stencil8_keeps_other_half() {
        let mut texel = [0u8; 4];
        write_depth_stencil(glow::DEPTH24_STENCIL8, &mut texel, None, Some(7));
        write_depth_stencil(glow::DEPTH24_STENCIL8, &mut texel, Some(1.0), None);
        let packed = u32::from_le_bytes(texel);
        assert_eq!(packed & 0xFF, 7);
        assert_eq!(packed >> 8, 0x00FF_FFFF);
    }

    #[test]
    fn test_half_float_reads_back_as_float() {
        // ARRANGE
        let layout = texel_layout(glow::RGBA16F).unwrap();
        let texel = encode_color(&layout, &[1.0, 0.5, 0.25, 0.0]).unwrap();

        // ACT
        let out = convert_for_read(Some(&layout), &texel, glow::FLOAT);

        // ASSERT
        let floats: Vec<f32> = out
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats.len(), 4);
        assert_relative_eq!(floats[1], 0.5);
        assert_relative_eq!(floats[2], 0.25);
    }

    #[test]
    fn test_region_round_trip_is_clipped() {
        // ARRANGE
        let extent = Extent {
            width: 4,
            height: 4,
            depth: 1,
        };
        let mut level = vec![0u8; extent.byte_len(1)];

        // ACT
        write_region(&mut level, extent, 1, Region::new(1, 1, 0, 2, 2, 1), &[1, 2, 3, 4]);
        let clipped = read_region(&level, extent, 1, Region::new(2, 2, 0, 4, 4, 1));

        // ASSERT
        assert_eq!(level[5..7], [1, 2]);
        assert_eq!(level[9..11], [3, 4]);
        assert_eq!(clipped, vec![4, 0, 0, 0]);
    }
}
