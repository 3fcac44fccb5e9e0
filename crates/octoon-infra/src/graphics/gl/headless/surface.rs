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

//! A window-less surface backend.

use std::cell::Cell;

use octoon_core::graphics::api::SwapInterval;
use octoon_core::graphics::traits::SurfaceBackend;

/// Surface with no window behind it. Presenting always reports `false`.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    current: Cell<bool>,
    interval: Cell<Option<SwapInterval>>,
    make_current_calls: Cell<u32>,
}

impl HeadlessSurface {
    /// A surface that is not current anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the context is current.
    pub fn is_current(&self) -> bool {
        self.current.get()
    }

    /// The last interval applied.
    pub fn interval(&self) -> Option<SwapInterval> {
        self.interval.get()
    }

    /// How many times the context was made current.
    pub fn make_current_calls(&self) -> u32 {
        self.make_current_calls.get()
    }
}

impl SurfaceBackend for HeadlessSurface {
    fn make_current(&self) -> bool {
        self.current.set(true);
        self.make_current_calls.set(self.make_current_calls.get() + 1);
        true
    }

    fn clear_current(&self) {
        self.current.set(false);
    }

    fn swap_buffers(&self) -> bool {
        false
    }

    fn set_swap_interval(&self, interval: SwapInterval) -> bool {
        self.interval.set(Some(interval));
        true
    }

    fn has_window(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_surface_tracks_current_state() {
        let surface = HeadlessSurface::new();
        assert!(surface.make_current());
        assert!(surface.is_current());
        surface.clear_current();
        assert!(!surface.is_current());
        assert_eq!(surface.make_current_calls(), 1);
    }

    #[test]
    fn test_headless_surface_cannot_present() {
        let surface = HeadlessSurface::new();
        assert!(!surface.has_window());
        assert!(!surface.swap_buffers());
        assert!(surface.set_swap_interval(SwapInterval::Free));
        assert_eq!(surface.interval(), Some(SwapInterval::Free));
    }
}
