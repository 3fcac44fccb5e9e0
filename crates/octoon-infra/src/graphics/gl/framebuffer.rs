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

//! Framebuffer layouts and framebuffers.
//!
//! A [`GlFramebufferLayout`] fixes which slots are color targets and which
//! is the depth-stencil target. A [`GlFramebuffer`] binds concrete texture
//! levels to those slots. All validation happens before the first native
//! call, so a rejected descriptor leaves no native object behind.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use octoon_core::graphics::api::{AttachmentRole, FramebufferLayoutDesc, GraphicsFormat, TextureDim};
use octoon_core::graphics::error::ResourceError;

use super::shared::{GlShared, GlVariant};
use super::texture::GlTexture;
use super::types;

/// Which native attachment point a depth or stencil format binds to.
fn depth_point_for(format: GraphicsFormat) -> Option<u32> {
    if format.is_depth_stencil() {
        Some(glow::DEPTH_STENCIL_ATTACHMENT)
    } else if format.is_depth() {
        Some(glow::DEPTH_ATTACHMENT)
    } else if format.is_stencil() {
        Some(glow::STENCIL_ATTACHMENT)
    } else {
        None
    }
}

/// Validated attachment layout. Holds no native state.
#[derive(Debug)]
pub struct GlFramebufferLayout {
    desc: FramebufferLayoutDesc,
}

impl GlFramebufferLayout {
    /// Checks every slot's format against its role.
    pub fn setup(shared: &GlShared, desc: FramebufferLayoutDesc) -> Result<Self, ResourceError> {
        let mut depth_slots = 0;
        for attachment in &desc.attachments {
            if attachment.role() == AttachmentRole::None {
                continue;
            }
            types::require(
                types::as_texture_internal_format(attachment.format),
                "attachment format",
                attachment.format,
            )
            .map_err(|err| shared.fail(ResourceError::from(err)))?;

            let is_depth = attachment.format.has_depth_or_stencil();
            match attachment.role() {
                AttachmentRole::Color if is_depth => {
                    return Err(shared.fail(ResourceError::InvalidDescriptor(format!(
                        "color slot {} declares depth format {:?}",
                        attachment.slot, attachment.format
                    ))));
                }
                AttachmentRole::DepthStencil if !is_depth => {
                    return Err(shared.fail(ResourceError::InvalidDescriptor(format!(
                        "depth-stencil slot {} declares color format {:?}",
                        attachment.slot, attachment.format
                    ))));
                }
                AttachmentRole::DepthStencil => depth_slots += 1,
                _ => {}
            }
        }
        if depth_slots > 1 {
            return Err(shared.fail(ResourceError::InvalidDescriptor(format!(
                "{depth_slots} depth-stencil slots declared"
            ))));
        }
        Ok(Self { desc })
    }

    /// The validated slots.
    pub fn desc(&self) -> &FramebufferLayoutDesc {
        &self.desc
    }
}

/// One texture level bound to a framebuffer slot.
#[derive(Debug, Clone)]
pub struct AttachmentBinding {
    /// The attached texture.
    pub texture: Rc<GlTexture>,
    /// Mip level rendered to.
    pub mip_level: u32,
    /// Array layer for layered textures.
    pub layer: u32,
}

impl AttachmentBinding {
    /// Level 0, layer 0 of `texture`.
    pub fn new(texture: Rc<GlTexture>) -> Self {
        Self {
            texture,
            mip_level: 0,
            layer: 0,
        }
    }
}

/// Everything needed to assemble a framebuffer.
#[derive(Debug, Clone)]
pub struct FramebufferDesc {
    /// Slot roles and formats.
    pub layout: Rc<GlFramebufferLayout>,
    /// Render area width.
    pub width: u32,
    /// Render area height.
    pub height: u32,
    /// Layer count for layered rendering.
    pub layers: u32,
    /// One binding per color slot of the layout, in order.
    pub color_attachments: Vec<AttachmentBinding>,
    /// Binding for the layout's depth-stencil slot.
    pub depth_stencil_attachment: Option<AttachmentBinding>,
}

impl FramebufferDesc {
    /// A single-layer framebuffer of the given size with no attachments yet.
    pub fn new(layout: Rc<GlFramebufferLayout>, width: u32, height: u32) -> Self {
        Self {
            layout,
            width,
            height,
            layers: 1,
            color_attachments: Vec::new(),
            depth_stencil_attachment: None,
        }
    }
}

/// A native framebuffer object.
pub struct GlFramebuffer {
    shared: GlShared,
    handle: Cell<u32>,
    draw_buffers: Vec<u32>,
    depth_stencil_point: Option<u32>,
    desc: FramebufferDesc,
}

impl GlFramebuffer {
    /// Validates the bindings against the layout, then assembles the
    /// native framebuffer.
    pub fn setup(shared: &GlShared, desc: FramebufferDesc) -> Result<Self, ResourceError> {
        let fail = |msg: String| shared.fail(ResourceError::Framebuffer(msg));
        let layout = desc.layout.desc();

        let limit = shared.properties().max_framebuffer_color_attachments as usize;
        let color_count = layout.color_count().max(desc.color_attachments.len());
        if color_count > limit {
            return Err(fail(format!(
                "{color_count} color attachments exceed the device limit of {limit}"
            )));
        }

        let mut draw_buffers = Vec::with_capacity(color_count);
        let color_slots = layout
            .attachments
            .iter()
            .filter(|attachment| attachment.role() == AttachmentRole::Color);
        for (index, slot) in color_slots.enumerate() {
            let Some(binding) = desc.color_attachments.get(index) else {
                return Err(fail(format!("color slot {} has no texture", slot.slot)));
            };
            let format = binding.texture.desc().format;
            if format.has_depth_or_stencil() {
                return Err(fail(format!(
                    "color slot {} bound to depth texture {format:?}",
                    slot.slot
                )));
            }
            if binding.texture.instance_id() == 0 {
                return Err(fail(format!("color slot {} texture is closed", slot.slot)));
            }
            draw_buffers.push(glow::COLOR_ATTACHMENT0 + index as u32);
        }

        let depth_stencil_point = match (layout.depth_stencil(), &desc.depth_stencil_attachment) {
            (Some(slot), Some(binding)) => {
                let format = binding.texture.desc().format;
                let Some(point) = depth_point_for(format) else {
                    return Err(fail(format!(
                        "depth-stencil slot {} bound to color texture {format:?}",
                        slot.slot
                    )));
                };
                if depth_point_for(slot.format) != Some(point) {
                    return Err(fail(format!(
                        "depth-stencil slot {} expects {:?} but texture is {format:?}",
                        slot.slot, slot.format
                    )));
                }
                Some(point)
            }
            (Some(slot), None) => {
                return Err(fail(format!("depth-stencil slot {} has no texture", slot.slot)));
            }
            (None, Some(_)) => {
                return Err(fail("layout declares no depth-stencil slot".to_owned()));
            }
            (None, None) => None,
        };

        let gl = shared.gl();
        let handle = match shared.variant() {
            GlVariant::Legacy => gl.gen_framebuffer(),
            GlVariant::Core => gl.create_framebuffer(),
        };
        if handle == 0 {
            return Err(shared.fail(ResourceError::NativeAllocation("glGenFramebuffers")));
        }

        let framebuffer = Self {
            shared: shared.clone(),
            handle: Cell::new(handle),
            draw_buffers,
            depth_stencil_point,
            desc,
        };
        framebuffer.assemble()?;
        Ok(framebuffer)
    }

    /// Attaches every binding, sets the draw buffers and checks completeness.
    fn assemble(&self) -> Result<(), ResourceError> {
        let gl = self.shared.gl();
        let handle = self.handle.get();

        let colors = self.desc.color_attachments.iter().zip(&self.draw_buffers);
        let depth = self
            .desc
            .depth_stencil_attachment
            .iter()
            .zip(self.depth_stencil_point.iter());

        let draw_buffers: &[u32] = if self.draw_buffers.is_empty() {
            &[glow::NONE]
        } else {
            &self.draw_buffers
        };

        let status = match self.shared.variant() {
            GlVariant::Legacy => {
                gl.bind_framebuffer(glow::FRAMEBUFFER, handle);
                for (binding, point) in colors.chain(depth) {
                    self.attach_legacy(*point, binding);
                }
                gl.draw_buffers(draw_buffers);
                let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
                gl.bind_framebuffer(glow::FRAMEBUFFER, 0);
                status
            }
            GlVariant::Core => {
                for (binding, point) in colors.chain(depth) {
                    self.attach_core(*point, binding);
                }
                gl.named_framebuffer_draw_buffers(handle, draw_buffers);
                gl.check_named_framebuffer_status(handle, glow::FRAMEBUFFER)
            }
        };

        if status != glow::FRAMEBUFFER_COMPLETE {
            return Err(self.shared.fail(ResourceError::Framebuffer(format!(
                "framebuffer {handle} is incomplete (status 0x{status:X})"
            ))));
        }
        Ok(())
    }

    fn attach_legacy(&self, point: u32, binding: &AttachmentBinding) {
        let gl = self.shared.gl();
        let texture = &binding.texture;
        let (name, level, layer) = (
            texture.instance_id(),
            binding.mip_level as i32,
            binding.layer as i32,
        );
        match texture.desc().dim {
            TextureDim::Texture2DArray => {
                gl.framebuffer_texture_layer(glow::FRAMEBUFFER, point, name, level, layer);
            }
            TextureDim::Cube => gl.framebuffer_texture(glow::FRAMEBUFFER, point, name, level),
            TextureDim::CubeArray => gl.framebuffer_texture_3d(
                glow::FRAMEBUFFER,
                point,
                texture.target(),
                name,
                level,
                layer,
            ),
            TextureDim::Texture2D | TextureDim::Texture3D => gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                point,
                texture.target(),
                name,
                level,
            ),
        }
    }

    fn attach_core(&self, point: u32, binding: &AttachmentBinding) {
        let gl = self.shared.gl();
        let handle = self.handle.get();
        let texture = &binding.texture;
        let (name, level, layer) = (
            texture.instance_id(),
            binding.mip_level as i32,
            binding.layer as i32,
        );
        match texture.desc().dim {
            TextureDim::Texture2DArray | TextureDim::CubeArray => {
                gl.named_framebuffer_texture_layer(handle, point, name, level, layer);
            }
            _ => gl.named_framebuffer_texture(handle, point, name, level),
        }
    }

    /// The native framebuffer name, 0 once closed.
    pub fn instance_id(&self) -> u32 {
        self.handle.get()
    }

    /// The descriptor this framebuffer was assembled from.
    pub fn desc(&self) -> &FramebufferDesc {
        &self.desc
    }

    /// Native color attachment points, in draw-buffer order.
    pub(crate) fn color_points(&self) -> &[u32] {
        &self.draw_buffers
    }

    /// Native point of the depth-stencil binding, if any.
    pub(crate) fn depth_stencil_point(&self) -> Option<u32> {
        self.depth_stencil_point
    }

    /// Deletes the native framebuffer. Later calls do nothing.
    pub fn close(&self) {
        let handle = self.handle.replace(0);
        if handle != 0 {
            self.shared.gl().delete_framebuffer(handle);
        }
    }
}

impl Drop for GlFramebuffer {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GlFramebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlFramebuffer")
            .field("handle", &self.handle.get())
            .field("width", &self.desc.width)
            .field("height", &self.desc.height)
            .field("draw_buffers", &self.draw_buffers)
            .field("depth_stencil_point", &self.depth_stencil_point)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::shared::testing::headless;
    use octoon_core::graphics::api::{AttachmentLayout, TextureDesc};

    fn texture(shared: &GlShared, format: GraphicsFormat) -> Rc<GlTexture> {
        Rc::new(GlTexture::setup(shared, TextureDesc::new_2d(16, 16, format)).unwrap())
    }

    fn layout(shared: &GlShared, attachments: Vec<AttachmentLayout>) -> Rc<GlFramebufferLayout> {
        let desc = FramebufferLayoutDesc { attachments };
        Rc::new(GlFramebufferLayout::setup(shared, desc).unwrap())
    }

    #[test]
    fn test_legacy_single_color_attachment() {
        // ARRANGE
        let (driver, sink, shared) = headless(GlVariant::Legacy);
        let color = texture(&shared, GraphicsFormat::R8G8B8A8UNorm);
        let layout = layout(
            &shared,
            vec![AttachmentLayout::color(0, GraphicsFormat::R8G8B8A8UNorm)],
        );
        let mut desc = FramebufferDesc::new(layout, 16, 16);
        desc.color_attachments.push(AttachmentBinding::new(color.clone()));

        // ACT
        let framebuffer = GlFramebuffer::setup(&shared, desc).unwrap();

        // ASSERT
        assert_ne!(framebuffer.instance_id(), 0);
        let attach = driver.calls_named("framebuffer_texture_2d");
        assert_eq!(attach.len(), 1);
        assert_eq!(attach[0].args[1], i64::from(glow::COLOR_ATTACHMENT0));
        assert_eq!(attach[0].args[3], i64::from(color.instance_id()));
        assert_eq!(
            driver.calls_named("draw_buffers")[0].args,
            vec![i64::from(glow::COLOR_ATTACHMENT0)]
        );
        assert_eq!(driver.bound_draw_framebuffer(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_core_depth_stencil_point_follows_format() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let color = texture(&shared, GraphicsFormat::R8G8B8A8UNorm);
        let depth = texture(&shared, GraphicsFormat::D24UNormS8UInt);
        let layout = layout(
            &shared,
            vec![
                AttachmentLayout::color(0, GraphicsFormat::R8G8B8A8UNorm),
                AttachmentLayout::depth_stencil(1, GraphicsFormat::D24UNormS8UInt),
            ],
        );
        let mut desc = FramebufferDesc::new(layout, 16, 16);
        desc.color_attachments.push(AttachmentBinding::new(color));
        desc.depth_stencil_attachment = Some(AttachmentBinding::new(depth));

        let framebuffer = GlFramebuffer::setup(&shared, desc).unwrap();

        let points: Vec<i64> = driver
            .calls_named("named_framebuffer_texture")
            .iter()
            .map(|call| call.args[1])
            .collect();
        assert_eq!(
            points,
            vec![
                i64::from(glow::COLOR_ATTACHMENT0),
                i64::from(glow::DEPTH_STENCIL_ATTACHMENT)
            ]
        );
        assert_eq!(framebuffer.depth_stencil_point(), Some(glow::DEPTH_STENCIL_ATTACHMENT));
    }

    #[test]
    fn test_depth_class_mismatch_fails_before_native_calls() {
        // ARRANGE
        let (driver, sink, shared) = headless(GlVariant::Legacy);
        let depth = texture(&shared, GraphicsFormat::D24UNormS8UInt);
        let layout = layout(
            &shared,
            vec![AttachmentLayout::depth_stencil(0, GraphicsFormat::D32SFloat)],
        );
        let mut desc = FramebufferDesc::new(layout, 16, 16);
        desc.depth_stencil_attachment = Some(AttachmentBinding::new(depth));

        // ACT
        let result = GlFramebuffer::setup(&shared, desc);

        // ASSERT
        assert!(matches!(result, Err(ResourceError::Framebuffer(_))));
        assert_eq!(driver.count("gen_framebuffer"), 0);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_color_limit_checked_before_native_calls() {
        let (driver, sink, shared) = headless(GlVariant::Core);
        let slots = (0..9)
            .map(|slot| AttachmentLayout::color(slot, GraphicsFormat::R8UNorm))
            .collect();
        let layout = layout(&shared, slots);

        let result = GlFramebuffer::setup(&shared, FramebufferDesc::new(layout, 16, 16));

        assert!(matches!(result, Err(ResourceError::Framebuffer(_))));
        assert_eq!(driver.count("create_framebuffer"), 0);
        assert!(sink.messages()[0].contains("exceed the device limit of 8"));
    }

    #[test]
    fn test_array_layer_uses_layer_attachment() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let mut array = TextureDesc::new_2d(8, 8, GraphicsFormat::R8G8B8A8UNorm);
        array.dim = TextureDim::Texture2DArray;
        array.layer_count = 4;
        let array = Rc::new(GlTexture::setup(&shared, array).unwrap());
        let layout = layout(
            &shared,
            vec![AttachmentLayout::color(0, GraphicsFormat::R8G8B8A8UNorm)],
        );
        let mut desc = FramebufferDesc::new(layout, 8, 8);
        desc.color_attachments.push(AttachmentBinding {
            texture: array,
            mip_level: 0,
            layer: 2,
        });

        GlFramebuffer::setup(&shared, desc).unwrap();

        let attach = driver.calls_named("framebuffer_texture_layer");
        assert_eq!(attach.len(), 1);
        assert_eq!(attach[0].args[4], 2);
    }

    #[test]
    fn test_depth_only_framebuffer_draws_to_none() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let depth = texture(&shared, GraphicsFormat::D32SFloat);
        let layout = layout(
            &shared,
            vec![AttachmentLayout::depth_stencil(0, GraphicsFormat::D32SFloat)],
        );
        let mut desc = FramebufferDesc::new(layout, 16, 16);
        desc.depth_stencil_attachment = Some(AttachmentBinding::new(depth));

        let framebuffer = GlFramebuffer::setup(&shared, desc).unwrap();

        let draw = driver.calls_named("named_framebuffer_draw_buffers");
        assert_eq!(draw[0].args, vec![i64::from(framebuffer.instance_id()), i64::from(glow::NONE)]);
        assert_eq!(framebuffer.depth_stencil_point(), Some(glow::DEPTH_ATTACHMENT));
    }

    #[test]
    fn test_layout_rejects_depth_format_in_color_slot() {
        let (_driver, sink, shared) = headless(GlVariant::Legacy);
        let desc = FramebufferLayoutDesc {
            attachments: vec![AttachmentLayout::color(0, GraphicsFormat::D16UNorm)],
        };

        let result = GlFramebufferLayout::setup(&shared, desc);

        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let color = texture(&shared, GraphicsFormat::R8G8B8A8UNorm);
        let layout = layout(
            &shared,
            vec![AttachmentLayout::color(0, GraphicsFormat::R8G8B8A8UNorm)],
        );
        let mut desc = FramebufferDesc::new(layout, 16, 16);
        desc.color_attachments.push(AttachmentBinding::new(color));
        let framebuffer = GlFramebuffer::setup(&shared, desc).unwrap();

        framebuffer.close();
        framebuffer.close();
        drop(framebuffer);

        assert_eq!(driver.count("delete_framebuffer"), 1);
    }
}
