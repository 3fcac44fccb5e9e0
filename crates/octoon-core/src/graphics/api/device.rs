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

//! Device descriptor.

use super::enums::DeviceType;

/// Parameters fixed at device construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceDesc {
    /// Backend variant.
    pub device_type: DeviceType,
    /// Start contexts with native debug output enabled.
    pub debug_control: bool,
    /// Debug message ids muted when debug output is enabled.
    pub muted_debug_message_ids: Vec<u32>,
    /// Use bindless vertex buffers when the hardware offers them.
    pub prefer_bindless_vertex_buffers: bool,
}
