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

//! Extension enums the core `glow` constant set does not carry, plus the
//! extension names the capability query and the context look for.

#![allow(missing_docs)]

// GL_EXT_texture_compression_s3tc
pub const COMPRESSED_RGB_S3TC_DXT1_EXT: u32 = 0x83F0;
pub const COMPRESSED_RGBA_S3TC_DXT1_EXT: u32 = 0x83F1;
pub const COMPRESSED_RGBA_S3TC_DXT3_EXT: u32 = 0x83F2;
pub const COMPRESSED_RGBA_S3TC_DXT5_EXT: u32 = 0x83F3;

// GL_EXT_texture_sRGB
pub const COMPRESSED_SRGB_S3TC_DXT1_EXT: u32 = 0x8C4C;
pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT: u32 = 0x8C4D;
pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT: u32 = 0x8C4E;
pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT: u32 = 0x8C4F;

// GL_KHR_texture_compression_astc_ldr
pub const COMPRESSED_RGBA_ASTC_4x4_KHR: u32 = 0x93B0;
pub const COMPRESSED_RGBA_ASTC_5x4_KHR: u32 = 0x93B1;
pub const COMPRESSED_RGBA_ASTC_5x5_KHR: u32 = 0x93B2;
pub const COMPRESSED_RGBA_ASTC_6x5_KHR: u32 = 0x93B3;
pub const COMPRESSED_RGBA_ASTC_6x6_KHR: u32 = 0x93B4;
pub const COMPRESSED_RGBA_ASTC_8x5_KHR: u32 = 0x93B5;
pub const COMPRESSED_RGBA_ASTC_8x6_KHR: u32 = 0x93B6;
pub const COMPRESSED_RGBA_ASTC_8x8_KHR: u32 = 0x93B7;
pub const COMPRESSED_RGBA_ASTC_10x5_KHR: u32 = 0x93B8;
pub const COMPRESSED_RGBA_ASTC_10x6_KHR: u32 = 0x93B9;
pub const COMPRESSED_RGBA_ASTC_10x8_KHR: u32 = 0x93BA;
pub const COMPRESSED_RGBA_ASTC_10x10_KHR: u32 = 0x93BB;
pub const COMPRESSED_RGBA_ASTC_12x10_KHR: u32 = 0x93BC;
pub const COMPRESSED_RGBA_ASTC_12x12_KHR: u32 = 0x93BD;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR: u32 = 0x93D0;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_5x4_KHR: u32 = 0x93D1;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_5x5_KHR: u32 = 0x93D2;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_6x5_KHR: u32 = 0x93D3;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_6x6_KHR: u32 = 0x93D4;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_8x5_KHR: u32 = 0x93D5;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_8x6_KHR: u32 = 0x93D6;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_8x8_KHR: u32 = 0x93D7;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_10x5_KHR: u32 = 0x93D8;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_10x6_KHR: u32 = 0x93D9;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_10x8_KHR: u32 = 0x93DA;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_10x10_KHR: u32 = 0x93DB;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_12x10_KHR: u32 = 0x93DC;
pub const COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR: u32 = 0x93DD;

// GL_EXT_texture_filter_anisotropic
pub const TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FE;
pub const MAX_TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FF;

// GL_ARB_gpu_shader_int64
pub const INT64_ARB: u32 = 0x140E;
pub const UNSIGNED_INT64_ARB: u32 = 0x140F;

// GL_NV_vertex_buffer_unified_memory / GL_NV_shader_buffer_load
pub const BUFFER_GPU_ADDRESS_NV: u32 = 0x8F1D;
pub const VERTEX_ATTRIB_ARRAY_UNIFIED_NV: u32 = 0x8F1E;
pub const ELEMENT_ARRAY_UNIFIED_NV: u32 = 0x8F1F;
pub const VERTEX_ATTRIB_ARRAY_ADDRESS_NV: u32 = 0x8F20;
pub const ELEMENT_ARRAY_ADDRESS_NV: u32 = 0x8F29;

pub const EXT_TEXTURE_COMPRESSION_S3TC: &str = "GL_EXT_texture_compression_s3tc";
pub const ARB_TEXTURE_COMPRESSION_RGTC: &str = "GL_ARB_texture_compression_rgtc";
pub const ARB_TEXTURE_COMPRESSION_BPTC: &str = "GL_ARB_texture_compression_bptc";
pub const KHR_TEXTURE_COMPRESSION_ASTC_LDR: &str = "GL_KHR_texture_compression_astc_ldr";
pub const ARB_ES3_COMPATIBILITY: &str = "GL_ARB_ES3_compatibility";
pub const EXT_TEXTURE_FILTER_ANISOTROPIC: &str = "GL_EXT_texture_filter_anisotropic";
pub const ARB_DIRECT_STATE_ACCESS: &str = "GL_ARB_direct_state_access";
pub const KHR_DEBUG: &str = "GL_KHR_debug";
pub const ARB_DEBUG_OUTPUT: &str = "GL_ARB_debug_output";
pub const ARB_GPU_SHADER_INT64: &str = "GL_ARB_gpu_shader_int64";
pub const ARB_VERTEX_ATTRIB_64BIT: &str = "GL_ARB_vertex_attrib_64bit";
pub const NV_VERTEX_BUFFER_UNIFIED_MEMORY: &str = "GL_NV_vertex_buffer_unified_memory";
pub const NV_SHADER_BUFFER_LOAD: &str = "GL_NV_shader_buffer_load";
