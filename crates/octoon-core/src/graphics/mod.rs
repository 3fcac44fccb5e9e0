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

//! Backend-neutral graphics contracts.
//!
//! This module is the vocabulary shared by every backend. It holds:
//!
//! - **[`api`]**: formats, enums, flags and the `*Desc` structs each
//!   resource is created from, plus reflected shader metadata.
//! - **[`traits`]**: the seams a backend is wired through (diagnostics,
//!   shader translation, window surfaces).
//! - **[`error`]**: the error hierarchy returned by fallible operations.
//! - **[`settings`]**: serialisable device configuration.
//!
//! Native calls live in `octoon-infra`; nothing here talks to a driver.

pub mod api;
pub mod error;
pub mod settings;
pub mod traits;

pub use self::api::*;
pub use self::error::{ContextError, DeviceError, GraphicsError, ResourceError, TranslateError};
pub use self::settings::GraphicsSettings;
pub use self::traits::{DiagnosticsSink, LogSink, MemorySink, ShaderTranslator, SurfaceBackend};
