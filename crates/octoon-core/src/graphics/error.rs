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

//! Defines the hierarchy of error types for the graphics layer.
//!
//! Every failure is returned as one of these values and, on the same path,
//! reported once to the device's diagnostics sink using the `Display` text.

use super::api::enums::DeviceType;
use std::fmt;

/// An abstract enum value with no native equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateError {
    /// The category being translated, e.g. `"compare func"`.
    pub kind: &'static str,
    /// A `Debug` rendering of the value.
    pub value: String,
}

impl TranslateError {
    /// Builds an error for `value` of the given category.
    pub fn new(kind: &'static str, value: impl fmt::Debug) -> Self {
        Self {
            kind,
            value: format!("{value:?}"),
        }
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Can't translate {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for TranslateError {}

/// An error raised while setting up a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A descriptor field had no native equivalent.
    Translate(TranslateError),
    /// The driver returned the "none" name for a new object.
    NativeAllocation(&'static str),
    /// The request is valid but the device or backend cannot serve it.
    Unsupported(String),
    /// The descriptor is inconsistent.
    InvalidDescriptor(String),
    /// A shader failed to compile or translate.
    Compile(String),
    /// A program failed to link.
    Link(String),
    /// A framebuffer could not be assembled.
    Framebuffer(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Translate(err) => write!(f, "{err}"),
            ResourceError::NativeAllocation(what) => write!(f, "{what} failed"),
            ResourceError::Unsupported(msg) => write!(f, "Unsupported: {msg}"),
            ResourceError::InvalidDescriptor(msg) => write!(f, "Invalid descriptor: {msg}"),
            ResourceError::Compile(msg) => write!(f, "Shader compile error: {msg}"),
            ResourceError::Link(msg) => write!(f, "Program link error: {msg}"),
            ResourceError::Framebuffer(msg) => write!(f, "Framebuffer error: {msg}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Translate(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TranslateError> for ResourceError {
    fn from(err: TranslateError) -> Self {
        ResourceError::Translate(err)
    }
}

/// An error raised by a context operation. The context stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A bound object carried a value with no native equivalent.
    Translate(TranslateError),
    /// A draw was issued without a render pipeline.
    NoPipeline,
    /// An indexed draw was issued without an index buffer.
    NoIndexBuffer,
    /// `present` was called on a context without a window.
    NoWindow,
    /// The caller passed a value outside the accepted range.
    InvalidInput(String),
    /// The requested operation is not implemented by this backend.
    Unsupported(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::Translate(err) => write!(f, "{err}"),
            ContextError::NoPipeline => write!(f, "No render pipeline is bound."),
            ContextError::NoIndexBuffer => write!(f, "No index buffer is bound."),
            ContextError::NoWindow => write!(f, "The swapchain has no window to present to."),
            ContextError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            ContextError::Unsupported(msg) => write!(f, "Unsupported: {msg}"),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContextError::Translate(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TranslateError> for ContextError {
    fn from(err: TranslateError) -> Self {
        ContextError::Translate(err)
    }
}

/// An error raised while creating a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The requested backend is not an OpenGL desktop variant.
    UnsupportedDeviceType(DeviceType),
    /// The native driver could not be initialised.
    DriverInit(String),
    /// A resource the device creates for itself failed.
    Resource(ResourceError),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::UnsupportedDeviceType(ty) => {
                write!(f, "Unsupported device type: {ty:?}")
            }
            DeviceError::DriverInit(msg) => write!(f, "Driver initialisation failed: {msg}"),
            DeviceError::Resource(err) => write!(f, "Device resource error: {err}"),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for DeviceError {
    fn from(err: ResourceError) -> Self {
        DeviceError::Resource(err)
    }
}

/// The top-level error for the graphics layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// See [`TranslateError`].
    Translate(TranslateError),
    /// See [`ResourceError`].
    Resource(ResourceError),
    /// See [`ContextError`].
    Context(ContextError),
    /// See [`DeviceError`].
    Device(DeviceError),
    /// The settings document could not be parsed.
    Settings(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::Translate(err) => write!(f, "Translate error: {err}"),
            GraphicsError::Resource(err) => write!(f, "Resource error: {err}"),
            GraphicsError::Context(err) => write!(f, "Context error: {err}"),
            GraphicsError::Device(err) => write!(f, "Device error: {err}"),
            GraphicsError::Settings(msg) => write!(f, "Settings error: {msg}"),
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::Translate(err) => Some(err),
            GraphicsError::Resource(err) => Some(err),
            GraphicsError::Context(err) => Some(err),
            GraphicsError::Device(err) => Some(err),
            GraphicsError::Settings(_) => None,
        }
    }
}

impl From<TranslateError> for GraphicsError {
    fn from(err: TranslateError) -> Self {
        GraphicsError::Translate(err)
    }
}

impl From<ResourceError> for GraphicsError {
    fn from(err: ResourceError) -> Self {
        GraphicsError::Resource(err)
    }
}

impl From<ContextError> for GraphicsError {
    fn from(err: ContextError) -> Self {
        GraphicsError::Context(err)
    }
}

impl From<DeviceError> for GraphicsError {
    fn from(err: DeviceError) -> Self {
        GraphicsError::Device(err)
    }
}

impl From<serde_json::Error> for GraphicsError {
    fn from(err: serde_json::Error) -> Self {
        GraphicsError::Settings(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::api::enums::CompareFunc;
    use std::error::Error;

    #[test]
    fn test_translate_error_display() {
        let err = TranslateError::new("compare func", CompareFunc::None);
        assert_eq!(err.to_string(), "Can't translate compare func: None");
    }

    #[test]
    fn test_resource_error_wraps_translate() {
        // ARRANGE
        let err: ResourceError = TranslateError::new("sampler wrap", "None").into();

        // ACT
        let text = err.to_string();

        // ASSERT
        assert_eq!(text, "Can't translate sampler wrap: \"None\"");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_graphics_error_chain() {
        let err = GraphicsError::from(DeviceError::from(ResourceError::NativeAllocation(
            "glGenTextures",
        )));
        assert_eq!(
            err.to_string(),
            "Device error: Device resource error: glGenTextures failed"
        );
        assert!(err.source().and_then(|e| e.source()).is_some());
    }

    #[test]
    fn test_context_error_messages() {
        assert_eq!(
            ContextError::NoWindow.to_string(),
            "The swapchain has no window to present to."
        );
        assert_eq!(
            DeviceError::UnsupportedDeviceType(DeviceType::Vulkan).to_string(),
            "Unsupported device type: Vulkan"
        );
    }
}
