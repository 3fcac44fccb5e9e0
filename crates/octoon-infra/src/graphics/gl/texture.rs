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

//! Textures: storage allocation, initial upload and CPU readback.
//!
//! Both variants produce the same native storage. The legacy variant binds the
//! texture and allocates each mip with `tex_image_*`; the core variant
//! allocates immutable storage for every level at once and addresses the
//! texture by name. Readback goes through a pixel-pack staging buffer that
//! grows with the largest request and is kept until the texture closes.

use std::cell::Cell;
use std::fmt;
use std::ops::Deref;

use octoon_core::graphics::api::{TextureDesc, TextureDim};
use octoon_core::graphics::error::ResourceError;

use super::sampler::SamplerParams;
use super::shared::{GlShared, GlVariant};
use super::types;

/// A native texture object.
pub struct GlTexture {
    shared: GlShared,
    handle: Cell<u32>,
    target: u32,
    internal: u32,
    pixel_format: u32,
    pixel_type: u32,
    staging: Cell<u32>,
    staging_capacity: Cell<usize>,
    desc: TextureDesc,
}

impl GlTexture {
    /// Allocates the texture and uploads `desc.data` when present.
    ///
    /// The retained descriptor drops its pixel data once uploaded.
    pub fn setup(shared: &GlShared, mut desc: TextureDesc) -> Result<Self, ResourceError> {
        let fail = |err: ResourceError| shared.fail(err);

        let target = types::require(
            types::as_texture_target(desc.dim, desc.multisample),
            "texture target",
            (desc.dim, desc.multisample),
        )
        .map_err(|err| fail(err.into()))?;
        let internal = types::require(
            types::as_texture_internal_format(desc.format),
            "texture internal format",
            desc.format,
        )
        .map_err(|err| fail(err.into()))?;
        let (pixel_format, pixel_type) = if desc.format.is_compressed() {
            (0, 0)
        } else {
            let format =
                types::require(types::as_texture_format(desc.format), "texture format", desc.format)
                    .map_err(|err| fail(err.into()))?;
            let ty =
                types::require(types::as_texture_type(desc.format), "texture type", desc.format)
                    .map_err(|err| fail(err.into()))?;
            (format, ty)
        };

        let properties = shared.properties();
        if !properties.is_texture_dim_supported(desc.dim) {
            return Err(fail(ResourceError::Unsupported(format!(
                "texture dimension {:?}",
                desc.dim
            ))));
        }
        if !properties.is_texture_supported(desc.format) {
            return Err(fail(ResourceError::Unsupported(format!(
                "texture format {:?}",
                desc.format
            ))));
        }
        if desc.width == 0 || desc.height == 0 {
            return Err(fail(ResourceError::InvalidDescriptor(format!(
                "texture extent {}x{} is empty",
                desc.width, desc.height
            ))));
        }
        if desc.multisample && desc.data.is_some() {
            return Err(fail(ResourceError::InvalidDescriptor(
                "multisample textures take no initial data".to_owned(),
            )));
        }

        let params = if desc.multisample {
            None
        } else {
            let params = SamplerParams::resolve(
                desc.wrap,
                desc.min_filter,
                desc.mag_filter,
                desc.anis,
                properties,
            )
            .map_err(|err| fail(err.into()))?;
            Some(params)
        };

        let gl = shared.gl();
        let handle = match shared.variant() {
            GlVariant::Legacy => gl.gen_texture(),
            GlVariant::Core => gl.create_texture(target),
        };
        if handle == 0 {
            return Err(fail(ResourceError::NativeAllocation("glGenTextures")));
        }

        let data = desc.data.take();
        let texture = Self {
            shared: shared.clone(),
            handle: Cell::new(handle),
            target,
            internal,
            pixel_format,
            pixel_type,
            staging: Cell::new(0),
            staging_capacity: Cell::new(0),
            desc,
        };

        // From here on a failure drops `texture`, which deletes the handle.
        match shared.variant() {
            GlVariant::Legacy => {
                gl.bind_texture(target, handle);
                let result = texture.allocate_legacy(data.as_deref());
                if result.is_ok() {
                    if let Some(params) = &params {
                        texture.apply_params(params);
                    }
                }
                gl.bind_texture(target, 0);
                result?;
            }
            GlVariant::Core => {
                texture.allocate_core();
                if let Some(params) = &params {
                    texture.apply_params(params);
                }
                if let Some(data) = data.as_deref() {
                    texture.upload_core(data)?;
                }
            }
        }

        Ok(texture)
    }

    /// The native texture name, 0 once closed.
    pub fn instance_id(&self) -> u32 {
        self.handle.get()
    }

    /// The descriptor this texture was built from.
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    /// Native target, e.g. `TEXTURE_2D_ARRAY`.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Sized internal format of the storage.
    pub fn internal_format(&self) -> u32 {
        self.internal
    }

    /// Current size of the readback staging buffer in bytes.
    pub fn staging_capacity(&self) -> usize {
        self.staging_capacity.get()
    }

    /// Reads a `width` x `height` region of `mip` back to the CPU. Cube maps
    /// read their first face, arrays their first layer.
    pub fn map(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        mip: u32,
    ) -> Result<MappedTexture<'_>, ResourceError> {
        if self.handle.get() == 0 {
            return Err(self.fail(ResourceError::InvalidDescriptor("texture is closed".to_owned())));
        }
        if self.desc.multisample || self.desc.format.is_compressed() {
            return Err(self.fail(ResourceError::Unsupported(format!(
                "readback of {:?} textures",
                self.desc.format
            ))));
        }
        if mip < self.desc.mip_base || mip > self.desc.mip_max() {
            return Err(self.fail(ResourceError::InvalidDescriptor(format!(
                "mip {mip} is outside {}..={}",
                self.desc.mip_base,
                self.desc.mip_max()
            ))));
        }
        let (level_width, level_height, _) = self.desc.mip_extent(mip);
        let fits = width > 0
            && height > 0
            && x.checked_add(width).is_some_and(|right| right <= level_width)
            && y.checked_add(height).is_some_and(|bottom| bottom <= level_height);
        if !fits {
            return Err(self.fail(ResourceError::InvalidDescriptor(format!(
                "region ({x}, {y}) {width}x{height} exceeds mip {mip} \
                 of {level_width}x{level_height}"
            ))));
        }

        let ty = self.readback_type();
        let bpp = types::format_num(self.pixel_format, ty) as usize;
        let data = match self.shared.variant() {
            GlVariant::Legacy => self.read_legacy(x, y, width, height, mip, ty, bpp)?,
            GlVariant::Core => self.read_core(x, y, width, height, mip, ty, bpp)?,
        };
        Ok(MappedTexture {
            texture: self,
            data,
        })
    }

    /// Rebuilds every mip below the base level from the base level.
    pub fn generate_mipmap(&self) {
        let gl = self.shared.gl();
        match self.shared.variant() {
            GlVariant::Legacy => {
                gl.bind_texture(self.target, self.handle.get());
                gl.generate_mipmap(self.target);
                gl.bind_texture(self.target, 0);
            }
            GlVariant::Core => gl.generate_texture_mipmap(self.handle.get()),
        }
    }

    /// Deletes the texture and its staging buffer. Later calls do nothing.
    pub fn close(&self) {
        let gl = self.shared.gl();
        let staging = self.staging.replace(0);
        if staging != 0 {
            gl.delete_buffer(staging);
            self.staging_capacity.set(0);
        }
        let handle = self.handle.replace(0);
        if handle != 0 {
            gl.delete_texture(handle);
        }
    }

    fn fail(&self, err: ResourceError) -> ResourceError {
        self.shared.fail(err)
    }

    /// Half floats come back widened to 32-bit floats.
    fn readback_type(&self) -> u32 {
        if self.pixel_type == glow::HALF_FLOAT {
            glow::FLOAT
        } else {
            self.pixel_type
        }
    }

    /// Number of array layers the storage holds, before cube faces.
    fn layer_total(&self) -> u32 {
        self.desc.layer_base + self.desc.layer_count.max(1)
    }

    /// Z extent of one mip: depth for 3D, layers times faces otherwise.
    fn slices(&self, mip: u32) -> u32 {
        match self.desc.dim {
            TextureDim::Texture2D => 1,
            TextureDim::Texture3D => self.desc.mip_extent(mip).2,
            TextureDim::Cube => 6,
            TextureDim::Texture2DArray => self.layer_total(),
            TextureDim::CubeArray => self.layer_total() * 6,
        }
    }

    fn apply_params(&self, params: &SamplerParams) {
        let gl = self.shared.gl();
        let base = self.desc.mip_base as i32;
        let max = self.desc.mip_max() as i32;
        match self.shared.variant() {
            GlVariant::Legacy => {
                let target = self.target;
                params.apply(
                    |pname, value| gl.tex_parameter_i(target, pname, value),
                    |pname, value| gl.tex_parameter_f(target, pname, value),
                );
                gl.tex_parameter_i(target, glow::TEXTURE_BASE_LEVEL, base);
                gl.tex_parameter_i(target, glow::TEXTURE_MAX_LEVEL, max);
            }
            GlVariant::Core => {
                let handle = self.handle.get();
                params.apply(
                    |pname, value| gl.texture_parameter_i(handle, pname, value),
                    |pname, value| gl.texture_parameter_f(handle, pname, value),
                );
                gl.texture_parameter_i(handle, glow::TEXTURE_BASE_LEVEL, base);
                gl.texture_parameter_i(handle, glow::TEXTURE_MAX_LEVEL, max);
            }
        }
    }

    /// Bind-point allocation with the texture bound to its target. Uploads
    /// happen in the same pass: compressed data per mip, raw data per
    /// (mip, layer, face).
    fn allocate_legacy(&self, data: Option<&[u8]>) -> Result<(), ResourceError> {
        let gl = self.shared.gl();
        let desc = &self.desc;
        let (target, internal) = (self.target, self.internal);

        if desc.multisample {
            let samples = desc.samples.max(1) as i32;
            let (width, height) = (desc.width as i32, desc.height as i32);
            if target == glow::TEXTURE_2D_MULTISAMPLE {
                gl.tex_image_2d_multisample(target, samples, internal, width, height, true);
            } else {
                let layers = self.layer_total() as i32;
                gl.tex_image_3d_multisample(target, samples, internal, width, height, layers, true);
            }
            return Ok(());
        }

        if desc.format.is_compressed() {
            gl.pixel_store_i(glow::UNPACK_ALIGNMENT, 8);
            let result = self.upload_compressed_legacy(data);
            gl.pixel_store_i(glow::UNPACK_ALIGNMENT, 4);
            return result;
        }

        let (format, ty) = (self.pixel_format, self.pixel_type);
        for mip in desc.mip_base..=desc.mip_max() {
            let (w, h, _) = desc.mip_extent(mip);
            let (level, w, h) = (mip as i32, w as i32, h as i32);
            match desc.dim {
                TextureDim::Texture2D => {
                    gl.tex_image_2d(target, level, internal, w, h, format, ty, None);
                }
                TextureDim::Cube => {
                    for face in 0..6 {
                        let face_target = glow::TEXTURE_CUBE_MAP_POSITIVE_X + face;
                        gl.tex_image_2d(face_target, level, internal, w, h, format, ty, None);
                    }
                }
                _ => {
                    let depth = self.slices(mip) as i32;
                    gl.tex_image_3d(target, level, internal, w, h, depth, format, ty, None);
                }
            }
        }

        if let Some(data) = data {
            let bpp = types::format_num(format, ty);
            gl.pixel_store_i(glow::UNPACK_ALIGNMENT, unpack_alignment(bpp));
            let result = self.for_each_image(data, bpp as usize, |image| match desc.dim {
                TextureDim::Texture2D => gl.tex_sub_image_2d(
                    target,
                    image.level,
                    0,
                    0,
                    image.width,
                    image.height,
                    format,
                    ty,
                    image.bytes,
                ),
                TextureDim::Cube => gl.tex_sub_image_2d(
                    glow::TEXTURE_CUBE_MAP_POSITIVE_X + image.z as u32,
                    image.level,
                    0,
                    0,
                    image.width,
                    image.height,
                    format,
                    ty,
                    image.bytes,
                ),
                _ => gl.tex_sub_image_3d(
                    target,
                    image.level,
                    0,
                    0,
                    image.z,
                    image.width,
                    image.height,
                    image.depth,
                    format,
                    ty,
                    image.bytes,
                ),
            });
            gl.pixel_store_i(glow::UNPACK_ALIGNMENT, 4);
            result?;
        }
        Ok(())
    }

    /// One compressed write per mip, zero-filled when no data was given.
    fn upload_compressed_legacy(&self, data: Option<&[u8]>) -> Result<(), ResourceError> {
        let gl = self.shared.gl();
        let desc = &self.desc;
        let mut cursor = Cursor::new(data);
        for mip in desc.mip_base..=desc.mip_max() {
            let (w, h, _) = desc.mip_extent(mip);
            let slices = self.slices(mip);
            let per_face = match desc.dim {
                TextureDim::Cube => self.compressed_size(w, h, 1)?,
                _ => self.compressed_size(w, h, slices)?,
            };
            let (level, wi, hi) = (mip as i32, w as i32, h as i32);
            match desc.dim {
                TextureDim::Texture2D => {
                    let bytes = cursor.take(per_face).map_err(|err| self.fail(err))?;
                    gl.compressed_tex_image_2d(self.target, level, self.internal, wi, hi, &bytes);
                }
                TextureDim::Cube => {
                    for face in 0..6 {
                        let bytes = cursor.take(per_face).map_err(|err| self.fail(err))?;
                        let face_target = glow::TEXTURE_CUBE_MAP_POSITIVE_X + face;
                        gl.compressed_tex_image_2d(
                            face_target,
                            level,
                            self.internal,
                            wi,
                            hi,
                            &bytes,
                        );
                    }
                }
                _ => {
                    let bytes = cursor.take(per_face).map_err(|err| self.fail(err))?;
                    let depth = slices as i32;
                    gl.compressed_tex_image_3d(
                        self.target,
                        level,
                        self.internal,
                        wi,
                        hi,
                        depth,
                        &bytes,
                    );
                }
            }
        }
        Ok(())
    }

    /// Immutable storage covering levels `0..=mip_max`.
    fn allocate_core(&self) {
        let gl = self.shared.gl();
        let desc = &self.desc;
        let handle = self.handle.get();
        let (width, height) = (desc.width as i32, desc.height as i32);

        if desc.multisample {
            let samples = desc.samples.max(1) as i32;
            if self.target == glow::TEXTURE_2D_MULTISAMPLE {
                gl.texture_storage_2d_multisample(
                    handle,
                    samples,
                    self.internal,
                    width,
                    height,
                    true,
                );
            } else {
                let layers = self.layer_total() as i32;
                gl.texture_storage_3d_multisample(
                    handle,
                    samples,
                    self.internal,
                    width,
                    height,
                    layers,
                    true,
                );
            }
            return;
        }

        let levels = desc.mip_max() as i32 + 1;
        match desc.dim {
            TextureDim::Texture2D | TextureDim::Cube => {
                gl.texture_storage_2d(handle, levels, self.internal, width, height);
            }
            TextureDim::Texture3D => {
                let depth = desc.depth.max(1) as i32;
                gl.texture_storage_3d(handle, levels, self.internal, width, height, depth);
            }
            TextureDim::Texture2DArray | TextureDim::CubeArray => {
                let depth = self.slices(0) as i32;
                gl.texture_storage_3d(handle, levels, self.internal, width, height, depth);
            }
        }
    }

    fn upload_core(&self, data: &[u8]) -> Result<(), ResourceError> {
        let gl = self.shared.gl();
        let desc = &self.desc;
        let handle = self.handle.get();

        if desc.format.is_compressed() {
            gl.pixel_store_i(glow::UNPACK_ALIGNMENT, 8);
            let result = self.upload_compressed_core(data);
            gl.pixel_store_i(glow::UNPACK_ALIGNMENT, 4);
            return result;
        }

        let (format, ty) = (self.pixel_format, self.pixel_type);
        let bpp = types::format_num(format, ty);
        gl.pixel_store_i(glow::UNPACK_ALIGNMENT, unpack_alignment(bpp));
        let result = self.for_each_image(data, bpp as usize, |image| match desc.dim {
            TextureDim::Texture2D => gl.texture_sub_image_2d(
                handle,
                image.level,
                0,
                0,
                image.width,
                image.height,
                format,
                ty,
                image.bytes,
            ),
            _ => gl.texture_sub_image_3d(
                handle,
                image.level,
                0,
                0,
                image.z,
                image.width,
                image.height,
                image.depth,
                format,
                ty,
                image.bytes,
            ),
        });
        gl.pixel_store_i(glow::UNPACK_ALIGNMENT, 4);
        result
    }

    fn upload_compressed_core(&self, data: &[u8]) -> Result<(), ResourceError> {
        let gl = self.shared.gl();
        let desc = &self.desc;
        let handle = self.handle.get();
        let mut cursor = Cursor::new(Some(data));
        for mip in desc.mip_base..=desc.mip_max() {
            let (w, h, _) = desc.mip_extent(mip);
            let slices = self.slices(mip);
            let size = self.compressed_size(w, h, slices)?;
            let bytes = cursor.take(size).map_err(|err| self.fail(err))?;
            let (level, wi, hi) = (mip as i32, w as i32, h as i32);
            if desc.dim == TextureDim::Texture2D {
                gl.compressed_texture_sub_image_2d(
                    handle,
                    level,
                    0,
                    0,
                    wi,
                    hi,
                    self.internal,
                    &bytes,
                );
            } else {
                let depth = slices as i32;
                gl.compressed_texture_sub_image_3d(
                    handle,
                    level,
                    0,
                    0,
                    0,
                    wi,
                    hi,
                    depth,
                    self.internal,
                    &bytes,
                );
            }
        }
        Ok(())
    }

    fn compressed_size(&self, width: u32, height: u32, depth: u32) -> Result<usize, ResourceError> {
        match types::compressed_texture_size(width, height, depth, self.internal) {
            0 => Err(self.fail(ResourceError::InvalidDescriptor(
                "bad texformat in compressed_texture_size".to_owned(),
            ))),
            size => Ok(size),
        }
    }

    /// Walks `data` mip by mip, then layer by layer, then face by face, and
    /// hands each image to `write`. 3D mips are written as one slab.
    fn for_each_image(
        &self,
        data: &[u8],
        bpp: usize,
        mut write: impl FnMut(Image<'_>),
    ) -> Result<(), ResourceError> {
        let desc = &self.desc;
        let mut cursor = Cursor::new(Some(data));
        for mip in desc.mip_base..=desc.mip_max() {
            let (w, h, d) = desc.mip_extent(mip);
            let level = mip as i32;
            let (width, height) = (w as i32, h as i32);
            let image_len = w as usize * h as usize * bpp;

            if desc.dim == TextureDim::Texture3D {
                let bytes = cursor.take(image_len * d as usize).map_err(|err| self.fail(err))?;
                write(Image {
                    level,
                    z: 0,
                    width,
                    height,
                    depth: d as i32,
                    bytes: &bytes,
                });
                continue;
            }

            let faces = desc.faces();
            for layer in desc.layer_base..self.layer_total() {
                for face in 0..faces {
                    let bytes = cursor.take(image_len).map_err(|err| self.fail(err))?;
                    write(Image {
                        level,
                        z: (layer * faces + face) as i32,
                        width,
                        height,
                        depth: 1,
                        bytes: &bytes,
                    });
                }
            }
        }
        Ok(())
    }

    /// Reads the whole level through the bound texture, then keeps the
    /// requested rows.
    #[allow(clippy::too_many_arguments)]
    fn read_legacy(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        mip: u32,
        ty: u32,
        bpp: usize,
    ) -> Result<Vec<u8>, ResourceError> {
        let gl = self.shared.gl();
        let (level_width, level_height, _) = self.desc.mip_extent(mip);
        let (read_target, slices) = match self.desc.dim {
            TextureDim::Cube => (glow::TEXTURE_CUBE_MAP_POSITIVE_X, 1),
            _ => (self.target, self.slices(mip)),
        };
        let level_len = level_width as usize * level_height as usize * slices as usize * bpp;
        let staging = self.reserve_staging(level_len)?;

        gl.pixel_store_i(glow::PACK_ALIGNMENT, 1);
        gl.bind_buffer(glow::PIXEL_PACK_BUFFER, staging);
        gl.bind_texture(self.target, self.handle.get());
        gl.get_tex_image(read_target, mip as i32, self.pixel_format, ty, 0);
        gl.bind_texture(self.target, 0);
        let level = gl.map_buffer_range(glow::PIXEL_PACK_BUFFER, 0, level_len, glow::MAP_READ_BIT);
        gl.bind_buffer(glow::PIXEL_PACK_BUFFER, 0);
        gl.pixel_store_i(glow::PACK_ALIGNMENT, 4);
        let level = level
            .ok_or_else(|| self.fail(ResourceError::NativeAllocation("glMapBufferRange")))?;

        let row_len = width as usize * bpp;
        let mut rows = Vec::with_capacity(row_len * height as usize);
        for row in y..y + height {
            let start = (row as usize * level_width as usize + x as usize) * bpp;
            match level.get(start..start + row_len) {
                Some(bytes) => rows.extend_from_slice(bytes),
                None => {
                    self.release_mapping();
                    return Err(self.fail(ResourceError::InvalidDescriptor(format!(
                        "readback of mip {mip} returned {} bytes",
                        level.len()
                    ))));
                }
            }
        }
        Ok(rows)
    }

    #[allow(clippy::too_many_arguments)]
    fn read_core(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        mip: u32,
        ty: u32,
        bpp: usize,
    ) -> Result<Vec<u8>, ResourceError> {
        let gl = self.shared.gl();
        let len = width as usize * height as usize * bpp;
        let staging = self.reserve_staging(len)?;

        gl.pixel_store_i(glow::PACK_ALIGNMENT, 1);
        gl.bind_buffer(glow::PIXEL_PACK_BUFFER, staging);
        gl.get_texture_sub_image(
            self.handle.get(),
            mip as i32,
            x as i32,
            y as i32,
            0,
            width as i32,
            height as i32,
            1,
            self.pixel_format,
            ty,
            0,
        );
        gl.bind_buffer(glow::PIXEL_PACK_BUFFER, 0);
        gl.pixel_store_i(glow::PACK_ALIGNMENT, 4);
        gl.map_named_buffer_range(staging, 0, len, glow::MAP_READ_BIT)
            .ok_or_else(|| self.fail(ResourceError::NativeAllocation("glMapNamedBufferRange")))
    }

    /// Returns a staging buffer of at least `len` bytes. It grows to the
    /// largest request seen and never shrinks.
    fn reserve_staging(&self, len: usize) -> Result<u32, ResourceError> {
        let current = self.staging.get();
        if current != 0 && len <= self.staging_capacity.get() {
            return Ok(current);
        }

        let gl = self.shared.gl();
        let staging = match self.shared.variant() {
            GlVariant::Legacy => {
                let staging = if current != 0 { current } else { gl.gen_buffer() };
                if staging == 0 {
                    return Err(self.fail(ResourceError::NativeAllocation("glGenBuffers")));
                }
                gl.bind_buffer(glow::PIXEL_PACK_BUFFER, staging);
                gl.buffer_data(glow::PIXEL_PACK_BUFFER, len, None, glow::STREAM_READ);
                gl.bind_buffer(glow::PIXEL_PACK_BUFFER, 0);
                staging
            }
            GlVariant::Core => {
                // Immutable storage cannot be resized.
                if current != 0 {
                    gl.delete_buffer(current);
                    self.staging.set(0);
                    self.staging_capacity.set(0);
                }
                let staging = gl.create_buffer();
                if staging == 0 {
                    return Err(self.fail(ResourceError::NativeAllocation("glCreateBuffers")));
                }
                gl.named_buffer_storage(staging, len, None, glow::MAP_READ_BIT);
                staging
            }
        };

        log::debug!(
            "GlTexture: Staging buffer for texture {} grown to {len} bytes",
            self.handle.get()
        );
        self.staging.set(staging);
        self.staging_capacity.set(len);
        Ok(staging)
    }

    fn release_mapping(&self) {
        let gl = self.shared.gl();
        let staging = self.staging.get();
        match self.shared.variant() {
            GlVariant::Legacy => {
                gl.bind_buffer(glow::PIXEL_PACK_BUFFER, staging);
                gl.unmap_buffer(glow::PIXEL_PACK_BUFFER);
                gl.bind_buffer(glow::PIXEL_PACK_BUFFER, 0);
            }
            GlVariant::Core => {
                gl.unmap_named_buffer(staging);
            }
        }
    }
}

impl Drop for GlTexture {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GlTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlTexture")
            .field("handle", &self.handle.get())
            .field("dim", &self.desc.dim)
            .field("format", &self.desc.format)
            .field("width", &self.desc.width)
            .field("height", &self.desc.height)
            .finish()
    }
}

/// Unpack alignment matching a texel size of 1, 2, 4 or 8 bytes.
fn unpack_alignment(bytes_per_pixel: u32) -> i32 {
    match bytes_per_pixel {
        b if b % 8 == 0 => 8,
        b if b % 4 == 0 => 4,
        b if b % 2 == 0 => 2,
        _ => 1,
    }
}

/// One upload target inside a texture.
struct Image<'a> {
    level: i32,
    z: i32,
    width: i32,
    height: i32,
    depth: i32,
    bytes: &'a [u8],
}

/// Sequential reader over the initial data. With no data every take
/// yields zeros, which is what compressed allocation needs.
struct Cursor<'a> {
    data: Option<&'a [u8]>,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: Option<&'a [u8]>) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<std::borrow::Cow<'a, [u8]>, ResourceError> {
        let Some(data) = self.data else {
            return Ok(std::borrow::Cow::Owned(vec![0; len]));
        };
        let end = self.offset + len;
        match data.get(self.offset..end) {
            Some(bytes) => {
                self.offset = end;
                Ok(std::borrow::Cow::Borrowed(bytes))
            }
            None => Err(ResourceError::InvalidDescriptor(format!(
                "texture data holds {} bytes, needed at least {end}",
                data.len()
            ))),
        }
    }
}

/// CPU copy of a texture region; releases the staging mapping on drop.
pub struct MappedTexture<'a> {
    texture: &'a GlTexture,
    data: Vec<u8>,
}

impl Deref for MappedTexture<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for MappedTexture<'_> {
    fn drop(&mut self) {
        self.texture.release_mapping();
    }
}
