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

//! One-time capability query run when a device is created.

use octoon_core::graphics::api::{
    DeviceProperties, GraphicsFormat, SampleFlags, ShaderStageFlags, TextureDim,
};

use super::driver::GlDriver;
use super::ext;
use super::types;

fn limit(gl: &dyn GlDriver, pname: u32) -> u32 {
    gl.get_integer(pname).max(0) as u32
}

/// Context version as `(major, minor)`.
pub fn context_version(gl: &dyn GlDriver) -> (u32, u32) {
    (limit(gl, glow::MAJOR_VERSION), limit(gl, glow::MINOR_VERSION))
}

/// Which compressed families the driver can sample from.
fn compressed_supported(format: GraphicsFormat, gl: &dyn GlDriver, version: (u32, u32)) -> bool {
    use GraphicsFormat::*;
    match format {
        BC1RGBUNormBlock | BC1RGBSRGBBlock | BC1RGBAUNormBlock | BC1RGBASRGBBlock |
        BC2UNormBlock | BC2SRGBBlock | BC3UNormBlock | BC3SRGBBlock => {
            gl.has_extension(ext::EXT_TEXTURE_COMPRESSION_S3TC)
        }
        BC4UNormBlock | BC4SNormBlock | BC5UNormBlock | BC5SNormBlock => {
            version >= (3, 0) || gl.has_extension(ext::ARB_TEXTURE_COMPRESSION_RGTC)
        }
        BC6HUFloatBlock | BC6HSFloatBlock | BC7UNormBlock | BC7SRGBBlock => {
            version >= (4, 2) || gl.has_extension(ext::ARB_TEXTURE_COMPRESSION_BPTC)
        }
        ETC2R8G8B8UNormBlock | ETC2R8G8B8SRGBBlock | ETC2R8G8B8A1UNormBlock |
        ETC2R8G8B8A1SRGBBlock | ETC2R8G8B8A8UNormBlock | ETC2R8G8B8A8SRGBBlock |
        EACR11UNormBlock | EACR11SNormBlock | EACR11G11UNormBlock | EACR11G11SNormBlock => {
            version >= (4, 3) || gl.has_extension(ext::ARB_ES3_COMPATIBILITY)
        }
        _ => gl.has_extension(ext::KHR_TEXTURE_COMPRESSION_ASTC_LDR),
    }
}

/// Reads limits, extensions and the supported format lists from `gl`.
pub fn query_properties(gl: &dyn GlDriver) -> DeviceProperties {
    let version = context_version(gl);
    let has_anisotropy = gl.has_extension(ext::EXT_TEXTURE_FILTER_ANISOTROPIC);
    let line_width = gl.get_float_range(glow::ALIASED_LINE_WIDTH_RANGE);

    let mut support_texture_dims = vec![
        TextureDim::Texture2D,
        TextureDim::Texture2DArray,
        TextureDim::Texture3D,
        TextureDim::Cube,
    ];
    if version >= (4, 0) {
        support_texture_dims.push(TextureDim::CubeArray);
    }

    let support_textures = GraphicsFormat::ALL
        .iter()
        .copied()
        .filter(|format| types::as_texture_internal_format(*format).is_some())
        .filter(|format| !format.is_compressed() || compressed_supported(*format, gl, version))
        .collect();
    let support_attributes = GraphicsFormat::ALL
        .iter()
        .copied()
        .filter(|format| types::as_vertex_format(*format).is_some())
        .collect();

    let mut support_shaders =
        ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT | ShaderStageFlags::GEOMETRY;
    if version >= (4, 0) {
        support_shaders |= ShaderStageFlags::TESS_CONTROL | ShaderStageFlags::TESS_EVALUATION;
    }
    if version >= (4, 3) {
        support_shaders |= ShaderStageFlags::COMPUTE;
    }

    let properties = DeviceProperties {
        max_image_dimension_1d: limit(gl, glow::MAX_TEXTURE_SIZE),
        max_image_dimension_2d: limit(gl, glow::MAX_TEXTURE_SIZE),
        max_image_dimension_3d: limit(gl, glow::MAX_3D_TEXTURE_SIZE),
        max_image_dimension_cube: limit(gl, glow::MAX_CUBE_MAP_TEXTURE_SIZE),
        max_image_array_layers: limit(gl, glow::MAX_ARRAY_TEXTURE_LAYERS),
        max_texel_buffer_elements: limit(gl, glow::MAX_TEXTURE_BUFFER_SIZE),
        max_uniform_buffer_range: limit(gl, glow::MAX_UNIFORM_BLOCK_SIZE),
        max_storage_buffer_range: limit(gl, glow::MAX_SHADER_STORAGE_BLOCK_SIZE),
        max_uniform_buffer_bindings: limit(gl, glow::MAX_UNIFORM_BUFFER_BINDINGS),
        max_per_stage_descriptor_samplers: limit(gl, glow::MAX_TEXTURE_IMAGE_UNITS),
        max_vertex_input_attributes: limit(gl, glow::MAX_VERTEX_ATTRIBS),
        max_vertex_input_bindings: limit(gl, glow::MAX_VERTEX_ATTRIB_BINDINGS),
        max_vertex_input_attribute_offset: limit(gl, glow::MAX_VERTEX_ATTRIB_RELATIVE_OFFSET),
        max_vertex_input_binding_stride: limit(gl, glow::MAX_VERTEX_ATTRIB_STRIDE),
        max_framebuffer_width: limit(gl, glow::MAX_FRAMEBUFFER_WIDTH),
        max_framebuffer_height: limit(gl, glow::MAX_FRAMEBUFFER_HEIGHT),
        max_framebuffer_layers: limit(gl, glow::MAX_FRAMEBUFFER_LAYERS),
        max_framebuffer_color_attachments: limit(gl, glow::MAX_COLOR_ATTACHMENTS),
        framebuffer_color_sample_counts: SampleFlags::up_to(limit(
            gl,
            glow::MAX_COLOR_TEXTURE_SAMPLES,
        )),
        framebuffer_depth_sample_counts: SampleFlags::up_to(limit(
            gl,
            glow::MAX_DEPTH_TEXTURE_SAMPLES,
        )),
        framebuffer_stencil_sample_counts: SampleFlags::up_to(limit(
            gl,
            glow::MAX_INTEGER_SAMPLES,
        )),
        max_viewports: limit(gl, glow::MAX_VIEWPORTS).max(1),
        max_sampler_anisotropy: if has_anisotropy {
            gl.get_float(ext::MAX_TEXTURE_MAX_ANISOTROPY_EXT).max(1.0)
        } else {
            1.0
        },
        min_line_width_range: line_width[0],
        max_line_width_range: line_width[1],
        has_nv_unified_memory: gl.has_extension(ext::NV_VERTEX_BUFFER_UNIFIED_MEMORY),
        has_anisotropy,
        has_debug_output: version >= (4, 3)
            || gl.has_extension(ext::KHR_DEBUG)
            || gl.has_extension(ext::ARB_DEBUG_OUTPUT),
        has_dsa: version >= (4, 5) || gl.has_extension(ext::ARB_DIRECT_STATE_ACCESS),
        support_texture_dims,
        support_textures,
        support_attributes,
        support_shaders,
    };

    log::debug!(
        "GlDevice: Probed GL {}.{}: {} texture formats, {} vertex formats, {} color attachments",
        version.0,
        version.1,
        properties.support_textures.len(),
        properties.support_attributes.len(),
        properties.max_framebuffer_color_attachments
    );
    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::HeadlessDriver;
    use approx::assert_relative_eq;

    #[test]
    fn test_query_reads_headless_limits() {
        // ARRANGE
        let driver = HeadlessDriver::new();

        // ACT
        let properties = query_properties(&driver);

        // ASSERT
        assert_eq!(properties.max_image_dimension_2d, 16384);
        assert_eq!(properties.max_framebuffer_color_attachments, 8);
        assert_eq!(properties.max_viewports, 16);
        assert!(properties.framebuffer_color_sample_counts.contains(SampleFlags::X8));
        assert!(!properties.framebuffer_color_sample_counts.contains(SampleFlags::X16));
        assert!(properties.has_dsa);
        assert!(properties.has_debug_output);
        assert!(!properties.has_nv_unified_memory);
        assert_relative_eq!(properties.max_sampler_anisotropy, 16.0);
        assert_relative_eq!(properties.max_line_width_range, 8.0);
        assert!(properties.is_shader_supported(ShaderStageFlags::COMPUTE));
        assert!(properties.is_texture_dim_supported(TextureDim::CubeArray));
    }

    #[test]
    fn test_compressed_formats_follow_extensions() {
        let driver = HeadlessDriver::new()
            .with_version(3, 3)
            .without_extension(ext::EXT_TEXTURE_COMPRESSION_S3TC)
            .without_extension(ext::ARB_DIRECT_STATE_ACCESS);

        let properties = query_properties(&driver);

        assert!(!properties.is_texture_supported(GraphicsFormat::BC1RGBAUNormBlock));
        assert!(properties.is_texture_supported(GraphicsFormat::BC5UNormBlock));
        assert!(properties.is_texture_supported(GraphicsFormat::BC7UNormBlock));
        assert!(properties.is_texture_supported(GraphicsFormat::R8G8B8A8UNorm));
        assert!(!properties.is_texture_dim_supported(TextureDim::CubeArray));
        assert!(!properties.has_dsa);
        assert!(!properties.is_shader_supported(ShaderStageFlags::COMPUTE));
    }

    #[test]
    fn test_anisotropy_requires_extension() {
        let driver = HeadlessDriver::new().without_extension(ext::EXT_TEXTURE_FILTER_ANISOTROPIC);

        let properties = query_properties(&driver);

        assert!(!properties.has_anisotropy);
        assert_relative_eq!(properties.max_sampler_anisotropy, 1.0);
    }

    #[test]
    fn test_vertex_formats_are_listed() {
        let properties = query_properties(&HeadlessDriver::new());
        assert!(properties.is_vertex_supported(GraphicsFormat::R32G32B32SFloat));
        assert!(properties.is_vertex_supported(GraphicsFormat::R8G8B8A8UNorm));
        assert!(!properties.is_vertex_supported(GraphicsFormat::D24UNormS8UInt));
    }
}
