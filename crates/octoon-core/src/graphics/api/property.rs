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

//! Hardware limits and supported features, queried once per device.

use super::enums::TextureDim;
use super::flags::{SampleFlags, ShaderStageFlags};
use super::format::GraphicsFormat;

/// Capability snapshot of a device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProperties {
    /// Largest 1D texture width.
    pub max_image_dimension_1d: u32,
    /// Largest 2D texture side.
    pub max_image_dimension_2d: u32,
    /// Largest 3D texture side.
    pub max_image_dimension_3d: u32,
    /// Largest cube face side.
    pub max_image_dimension_cube: u32,
    /// Largest array layer count.
    pub max_image_array_layers: u32,
    /// Largest texel buffer element count.
    pub max_texel_buffer_elements: u32,
    /// Largest uniform buffer range in bytes.
    pub max_uniform_buffer_range: u32,
    /// Largest storage buffer range in bytes.
    pub max_storage_buffer_range: u32,
    /// Uniform buffer binding points.
    pub max_uniform_buffer_bindings: u32,
    /// Texture units per stage.
    pub max_per_stage_descriptor_samplers: u32,
    /// Vertex attributes.
    pub max_vertex_input_attributes: u32,
    /// Vertex buffer bindings.
    pub max_vertex_input_bindings: u32,
    /// Relative offset limit for a vertex attribute.
    pub max_vertex_input_attribute_offset: u32,
    /// Stride limit for a vertex binding.
    pub max_vertex_input_binding_stride: u32,
    /// Largest framebuffer width.
    pub max_framebuffer_width: u32,
    /// Largest framebuffer height.
    pub max_framebuffer_height: u32,
    /// Largest framebuffer layer count.
    pub max_framebuffer_layers: u32,
    /// Color attachment limit.
    pub max_framebuffer_color_attachments: u32,
    /// Sample counts usable for color attachments.
    pub framebuffer_color_sample_counts: SampleFlags,
    /// Sample counts usable for depth attachments.
    pub framebuffer_depth_sample_counts: SampleFlags,
    /// Sample counts usable for stencil attachments.
    pub framebuffer_stencil_sample_counts: SampleFlags,
    /// Viewport limit.
    pub max_viewports: u32,
    /// Anisotropy limit, 1.0 without the extension.
    pub max_sampler_anisotropy: f32,
    /// Smallest line width.
    pub min_line_width_range: f32,
    /// Largest line width.
    pub max_line_width_range: f32,
    /// `GL_NV_vertex_buffer_unified_memory` is available.
    pub has_nv_unified_memory: bool,
    /// `GL_EXT_texture_filter_anisotropic` is available.
    pub has_anisotropy: bool,
    /// `GL_KHR_debug` or `GL_ARB_debug_output` is available.
    pub has_debug_output: bool,
    /// `GL_ARB_direct_state_access` is available.
    pub has_dsa: bool,
    /// Texture dimensions the device can create.
    pub support_texture_dims: Vec<TextureDim>,
    /// Texture formats the device can create.
    pub support_textures: Vec<GraphicsFormat>,
    /// Formats usable as vertex attributes.
    pub support_attributes: Vec<GraphicsFormat>,
    /// Stages the device can compile.
    pub support_shaders: ShaderStageFlags,
}

impl Default for DeviceProperties {
    fn default() -> Self {
        Self {
            max_image_dimension_1d: 0,
            max_image_dimension_2d: 0,
            max_image_dimension_3d: 0,
            max_image_dimension_cube: 0,
            max_image_array_layers: 0,
            max_texel_buffer_elements: 0,
            max_uniform_buffer_range: 0,
            max_storage_buffer_range: 0,
            max_uniform_buffer_bindings: 0,
            max_per_stage_descriptor_samplers: 0,
            max_vertex_input_attributes: 0,
            max_vertex_input_bindings: 0,
            max_vertex_input_attribute_offset: 0,
            max_vertex_input_binding_stride: 0,
            max_framebuffer_width: 0,
            max_framebuffer_height: 0,
            max_framebuffer_layers: 0,
            max_framebuffer_color_attachments: 0,
            framebuffer_color_sample_counts: SampleFlags::X1,
            framebuffer_depth_sample_counts: SampleFlags::X1,
            framebuffer_stencil_sample_counts: SampleFlags::X1,
            max_viewports: 1,
            max_sampler_anisotropy: 1.0,
            min_line_width_range: 1.0,
            max_line_width_range: 1.0,
            has_nv_unified_memory: false,
            has_anisotropy: false,
            has_debug_output: false,
            has_dsa: false,
            support_texture_dims: Vec::new(),
            support_textures: Vec::new(),
            support_attributes: Vec::new(),
            support_shaders: ShaderStageFlags::EMPTY,
        }
    }
}

impl DeviceProperties {
    /// Whether textures of `format` can be created.
    pub fn is_texture_supported(&self, format: GraphicsFormat) -> bool {
        self.support_textures.contains(&format)
    }

    /// Whether textures of `dim` can be created.
    pub fn is_texture_dim_supported(&self, dim: TextureDim) -> bool {
        self.support_texture_dims.contains(&dim)
    }

    /// Whether `format` can feed a vertex attribute.
    pub fn is_vertex_supported(&self, format: GraphicsFormat) -> bool {
        self.support_attributes.contains(&format)
    }

    /// Whether every stage in `stages` can be compiled.
    pub fn is_shader_supported(&self, stages: ShaderStageFlags) -> bool {
        self.support_shaders.contains(stages)
    }
}
