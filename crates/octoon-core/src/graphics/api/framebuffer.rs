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

//! Framebuffer layouts and the rectangles used by viewport, scissor and blit.

use super::enums::ImageLayout;
use super::format::GraphicsFormat;

/// How an attachment slot participates in rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentRole {
    /// Written as a color target.
    Color,
    /// Written as the depth and/or stencil target.
    DepthStencil,
    /// Declared but not bound.
    None,
}

impl From<ImageLayout> for AttachmentRole {
    fn from(layout: ImageLayout) -> Self {
        match layout {
            ImageLayout::ColorAttachmentOptimal => AttachmentRole::Color,
            ImageLayout::DepthStencilAttachmentOptimal
            | ImageLayout::DepthStencilReadOnlyOptimal => AttachmentRole::DepthStencil,
            _ => AttachmentRole::None,
        }
    }
}

/// One slot of a framebuffer layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentLayout {
    /// Attachment slot.
    pub slot: u32,
    /// Layout the image is in while attached.
    pub image_layout: ImageLayout,
    /// Expected format.
    pub format: GraphicsFormat,
}

impl AttachmentLayout {
    /// A color slot.
    pub fn color(slot: u32, format: GraphicsFormat) -> Self {
        Self {
            slot,
            image_layout: ImageLayout::ColorAttachmentOptimal,
            format,
        }
    }

    /// A depth-stencil slot.
    pub fn depth_stencil(slot: u32, format: GraphicsFormat) -> Self {
        Self {
            slot,
            image_layout: ImageLayout::DepthStencilAttachmentOptimal,
            format,
        }
    }

    /// Role derived from the image layout.
    pub fn role(&self) -> AttachmentRole {
        AttachmentRole::from(self.image_layout)
    }
}

/// Immutable description of a framebuffer's attachment slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FramebufferLayoutDesc {
    /// Slots, in declaration order.
    pub attachments: Vec<AttachmentLayout>,
}

impl FramebufferLayoutDesc {
    /// Number of color slots.
    pub fn color_count(&self) -> usize {
        self.attachments
            .iter()
            .filter(|a| a.role() == AttachmentRole::Color)
            .count()
    }

    /// The depth-stencil slot, if declared.
    pub fn depth_stencil(&self) -> Option<&AttachmentLayout> {
        self.attachments
            .iter()
            .find(|a| a.role() == AttachmentRole::DepthStencil)
    }
}

/// A viewport rectangle with its depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Near depth.
    pub min_depth: f32,
    /// Far depth.
    pub max_depth: f32,
}

impl Viewport {
    /// A viewport covering `width` x `height` with the full depth range.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// An integer rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scissor {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Scissor {
    /// Builds a rectangle.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_viewport_defaults_to_full_depth_range() {
        let vp = Viewport::new(0.0, 0.0, 640.0, 480.0);
        assert_relative_eq!(vp.min_depth, 0.0);
        assert_relative_eq!(vp.max_depth, 1.0);
        assert_relative_eq!(vp.width / vp.height, 4.0 / 3.0);
    }

    #[test]
    fn test_role_follows_image_layout() {
        let layout = FramebufferLayoutDesc {
            attachments: vec![
                AttachmentLayout::color(0, GraphicsFormat::R8G8B8A8UNorm),
                AttachmentLayout::color(1, GraphicsFormat::R16G16B16A16SFloat),
                AttachmentLayout::depth_stencil(2, GraphicsFormat::D24UNormS8UInt),
                AttachmentLayout {
                    slot: 3,
                    image_layout: ImageLayout::ShaderReadOnlyOptimal,
                    format: GraphicsFormat::R8UNorm,
                },
            ],
        };
        assert_eq!(layout.color_count(), 2);
        assert_eq!(layout.depth_stencil().map(|a| a.slot), Some(2));
        assert_eq!(layout.attachments[3].role(), AttachmentRole::None);
        assert_eq!(
            AttachmentRole::from(ImageLayout::DepthStencilReadOnlyOptimal),
            AttachmentRole::DepthStencil
        );
    }
}
