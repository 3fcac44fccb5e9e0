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

use crate::graphics::api::enums::SwapInterval;

/// The window-system side of a swapchain: a drawable surface plus the native
/// context bound to it.
pub trait SurfaceBackend {
    /// Makes the native context current on the calling thread.
    fn make_current(&self) -> bool;

    /// Releases the native context from the calling thread.
    fn clear_current(&self);

    /// Presents the back buffer. Returns `false` if there is nothing to present to.
    fn swap_buffers(&self) -> bool;

    /// Applies a presentation interval.
    fn set_swap_interval(&self, interval: SwapInterval) -> bool;

    /// Whether the surface is attached to a window.
    fn has_window(&self) -> bool;
}
