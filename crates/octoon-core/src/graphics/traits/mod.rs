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

//! Seams the graphics backend is wired through.
//!
//! - [`DiagnosticsSink`]: where human-readable failure messages go.
//! - [`ShaderTranslator`]: the external HLSL-to-GLSL cross-compiler.
//! - [`SurfaceBackend`]: the window-system context behind a swapchain.

mod diagnostics;
mod shader_translator;
mod surface;

pub use self::diagnostics::{DiagnosticsSink, LogSink, MemorySink};
pub use self::shader_translator::ShaderTranslator;
pub use self::surface::SurfaceBackend;
