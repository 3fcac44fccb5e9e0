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

//! # Octoon Infra
//!
//! The OpenGL implementation of the octoon graphics layer.
//!
//! Everything native goes through the [`graphics::gl::GlDriver`] seam. Two
//! drivers are provided: [`graphics::gl::GlowDriver`] over a live `glow`
//! context, and [`graphics::gl::HeadlessDriver`], a software stand-in that
//! records calls and emulates enough storage to run the layer without a GPU.

#![warn(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(feature = "graphics")]
pub use graphics::gl::{GlDevice, GlDeviceContext, GlDriver, GlowDriver, HeadlessDriver};
