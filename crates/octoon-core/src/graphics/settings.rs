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

//! Serialisable device configuration.

use serde::{Deserialize, Serialize};

use super::api::device::DeviceDesc;
use super::api::enums::{DeviceType, SwapInterval};
use super::error::GraphicsError;

/// Message ids the debug callback mutes by default: buffer usage hints,
/// memory placement notes and similar driver chatter.
pub const DEFAULT_MUTED_DEBUG_MESSAGE_IDS: [u32; 6] =
    [131076, 131169, 131184, 131185, 131218, 131204];

/// Settings used to build a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    /// Backend variant.
    pub device_type: DeviceType,
    /// Enable native debug output on every context.
    pub debug_control: bool,
    /// Presentation pacing for new swapchains.
    pub swap_interval: SwapInterval,
    /// Debug message ids muted when debug output is on.
    pub muted_debug_message_ids: Vec<u32>,
    /// Use the bindless vertex path when the hardware offers it.
    pub prefer_bindless_vertex_buffers: bool,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            device_type: DeviceType::OpenGLCore,
            debug_control: false,
            swap_interval: SwapInterval::Vsync,
            muted_debug_message_ids: DEFAULT_MUTED_DEBUG_MESSAGE_IDS.to_vec(),
            prefer_bindless_vertex_buffers: true,
        }
    }
}

impl GraphicsSettings {
    /// Parses settings from JSON. Missing fields take their default.
    pub fn from_json_str(json: &str) -> Result<Self, GraphicsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialises the settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, GraphicsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The device descriptor these settings describe.
    pub fn device_desc(&self) -> DeviceDesc {
        DeviceDesc {
            device_type: self.device_type,
            debug_control: self.debug_control,
            muted_debug_message_ids: self.muted_debug_message_ids.clone(),
            prefer_bindless_vertex_buffers: self.prefer_bindless_vertex_buffers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GraphicsSettings::default();
        assert_eq!(settings.device_type, DeviceType::OpenGLCore);
        assert!(!settings.debug_control);
        assert_eq!(settings.swap_interval, SwapInterval::Vsync);
        assert_eq!(settings.muted_debug_message_ids.len(), 6);
        assert!(settings.prefer_bindless_vertex_buffers);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        // ARRANGE
        let json = r#"{ "device_type": "OpenGL", "debug_control": true }"#;

        // ACT
        let settings = GraphicsSettings::from_json_str(json).unwrap();

        // ASSERT
        assert_eq!(settings.device_type, DeviceType::OpenGL);
        assert!(settings.debug_control);
        assert_eq!(
            settings.muted_debug_message_ids,
            DEFAULT_MUTED_DEBUG_MESSAGE_IDS.to_vec()
        );

        let desc = settings.device_desc();
        assert_eq!(desc.device_type, DeviceType::OpenGL);
        assert!(desc.debug_control);
    }

    #[test]
    fn test_json_round_trip_and_errors() {
        let mut settings = GraphicsSettings::default();
        settings.swap_interval = SwapInterval::Fps30;
        let json = settings.to_json_string().unwrap();
        assert_eq!(GraphicsSettings::from_json_str(&json).unwrap(), settings);

        let err = GraphicsSettings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, GraphicsError::Settings(_)));
    }
}
