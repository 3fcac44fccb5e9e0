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

//! Swapchain descriptor.

use raw_window_handle::RawWindowHandle;

use super::enums::SwapInterval;
use super::format::GraphicsFormat;

/// Presentation surface configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapchainDesc {
    /// Native window. `None` for an offscreen surface.
    pub window: Option<RawWindowHandle>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Presentation pacing.
    pub interval: SwapInterval,
    /// Back buffer color format.
    pub color_format: GraphicsFormat,
    /// Back buffer depth-stencil format.
    pub depth_stencil_format: GraphicsFormat,
}

impl Default for SwapchainDesc {
    fn default() -> Self {
        Self {
            window: None,
            width: 0,
            height: 0,
            interval: SwapInterval::Vsync,
            color_format: GraphicsFormat::B8G8R8A8UNorm,
            depth_stencil_format: GraphicsFormat::D24UNormS8UInt,
        }
    }
}

impl SwapchainDesc {
    /// An offscreen swapchain of the given size.
    pub fn headless(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}
