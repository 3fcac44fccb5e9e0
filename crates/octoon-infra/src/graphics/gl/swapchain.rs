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

//! Swapchains over an injected window-system surface.
//!
//! A native GL context is current on at most one thread at a time, and a
//! thread holds at most one current context. Each thread remembers which
//! swapchain it last made current, so activating another one implicitly
//! retires the previous holder.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use octoon_core::graphics::api::{SwapInterval, SwapchainDesc};
use octoon_core::graphics::error::{ContextError, ResourceError};
use octoon_core::graphics::traits::SurfaceBackend;
use raw_window_handle::RawWindowHandle;

use super::shared::GlShared;

static NEXT_SWAPCHAIN_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static ACTIVE_SWAPCHAIN: Cell<u64> = const { Cell::new(0) };
}

/// A presentable surface and the native context bound to it.
pub struct GlSwapchain {
    shared: GlShared,
    id: u64,
    surface: Rc<dyn SurfaceBackend>,
    interval: Cell<SwapInterval>,
    desc: SwapchainDesc,
}

impl GlSwapchain {
    /// Wraps `surface` and applies the requested swap interval.
    pub fn setup(
        shared: &GlShared,
        desc: SwapchainDesc,
        surface: Rc<dyn SurfaceBackend>,
    ) -> Result<Self, ResourceError> {
        if desc.window.is_some() && !surface.has_window() {
            return Err(shared.fail(ResourceError::InvalidDescriptor(
                "window handle given for a window-less surface".to_owned(),
            )));
        }
        if !surface.set_swap_interval(desc.interval) {
            return Err(shared.fail(ResourceError::Unsupported(format!(
                "swap interval {:?}",
                desc.interval
            ))));
        }

        let id = NEXT_SWAPCHAIN_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "GlSwapchain: Created swapchain {id} ({}x{}, {})",
            desc.width,
            desc.height,
            desc.window.as_ref().map_or("headless", window_system)
        );

        Ok(Self {
            shared: shared.clone(),
            id,
            surface,
            interval: Cell::new(desc.interval),
            desc,
        })
    }

    /// The descriptor this swapchain was built from.
    pub fn desc(&self) -> &SwapchainDesc {
        &self.desc
    }

    /// Whether presenting reaches a window.
    pub fn has_window(&self) -> bool {
        self.surface.has_window()
    }

    /// Makes the context current on this thread, or releases it.
    pub fn set_active(&self, active: bool) {
        if active {
            if self.active() {
                return;
            }
            if !self.surface.make_current() {
                self.shared.fail("GlSwapchain: Unable to make the context current");
                return;
            }
            ACTIVE_SWAPCHAIN.with(|current| current.set(self.id));
        } else if self.active() {
            self.surface.clear_current();
            ACTIVE_SWAPCHAIN.with(|current| current.set(0));
        }
    }

    /// Whether this swapchain's context is the one current on this thread.
    pub fn active(&self) -> bool {
        ACTIVE_SWAPCHAIN.with(|current| current.get() == self.id)
    }

    /// Changes the presentation pacing.
    pub fn set_swap_interval(&self, interval: SwapInterval) -> Result<(), ContextError> {
        if !self.surface.set_swap_interval(interval) {
            return Err(self.shared.fail(ContextError::Unsupported(format!(
                "swap interval {interval:?}"
            ))));
        }
        self.interval.set(interval);
        Ok(())
    }

    /// The interval last applied.
    pub fn swap_interval(&self) -> SwapInterval {
        self.interval.get()
    }

    /// Presents the back buffer.
    pub fn present(&self) -> Result<(), ContextError> {
        if !self.surface.has_window() || !self.surface.swap_buffers() {
            return Err(self.shared.fail(ContextError::NoWindow));
        }
        Ok(())
    }
}

fn window_system(handle: &RawWindowHandle) -> &'static str {
    match handle {
        RawWindowHandle::Win32(_) => "win32",
        RawWindowHandle::Xlib(_) => "xlib",
        RawWindowHandle::Xcb(_) => "xcb",
        RawWindowHandle::Wayland(_) => "wayland",
        RawWindowHandle::AppKit(_) => "appkit",
        RawWindowHandle::Web(_) => "web",
        RawWindowHandle::AndroidNdk(_) => "android",
        _ => "other",
    }
}

impl Drop for GlSwapchain {
    fn drop(&mut self) {
        self.set_active(false);
    }
}

impl fmt::Debug for GlSwapchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlSwapchain")
            .field("id", &self.id)
            .field("width", &self.desc.width)
            .field("height", &self.desc.height)
            .field("interval", &self.interval.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::headless::HeadlessSurface;
    use crate::graphics::gl::shared::testing::headless;
    use crate::graphics::gl::shared::GlVariant;

    fn swapchain(shared: &GlShared) -> (Rc<HeadlessSurface>, GlSwapchain) {
        let surface = Rc::new(HeadlessSurface::new());
        let desc = SwapchainDesc::headless(64, 64);
        let swapchain = GlSwapchain::setup(shared, desc, surface.clone()).unwrap();
        (surface, swapchain)
    }

    #[test]
    fn test_activation_moves_between_swapchains() {
        // ARRANGE
        let (_driver, _sink, shared) = headless(GlVariant::Core);
        let (first_surface, first) = swapchain(&shared);
        let (_second_surface, second) = swapchain(&shared);

        // ACT
        first.set_active(true);
        first.set_active(true);
        second.set_active(true);

        // ASSERT
        assert!(!first.active());
        assert!(second.active());
        assert_eq!(first_surface.make_current_calls(), 1);
    }

    #[test]
    fn test_deactivation_clears_current() {
        let (_driver, _sink, shared) = headless(GlVariant::Legacy);
        let (surface, swapchain) = swapchain(&shared);

        swapchain.set_active(true);
        swapchain.set_active(false);

        assert!(!swapchain.active());
        assert!(!surface.is_current());
    }

    #[test]
    fn test_swap_interval_is_forwarded() {
        let (_driver, _sink, shared) = headless(GlVariant::Core);
        let (surface, swapchain) = swapchain(&shared);
        assert_eq!(surface.interval(), Some(SwapInterval::Vsync));

        swapchain.set_swap_interval(SwapInterval::Fps30).unwrap();

        assert_eq!(surface.interval(), Some(SwapInterval::Fps30));
        assert_eq!(swapchain.swap_interval(), SwapInterval::Fps30);
    }

    #[test]
    fn test_window_handle_needs_a_windowed_surface() {
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let mut desc = SwapchainDesc::headless(64, 64);
        desc.window = Some(RawWindowHandle::Web(raw_window_handle::WebWindowHandle::new(1)));

        let result = GlSwapchain::setup(&shared, desc, Rc::new(HeadlessSurface::new()));

        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn test_present_without_window() {
        // ARRANGE
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let (_surface, swapchain) = swapchain(&shared);

        // ACT
        let result = swapchain.present();

        // ASSERT
        assert_eq!(result, Err(ContextError::NoWindow));
        assert_eq!(sink.messages(), vec![ContextError::NoWindow.to_string()]);
    }
}
