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

//! Backend-neutral vocabulary of the graphics layer.
//!
//! - **[`format`]**: pixel and vertex formats and their classification.
//! - **[`enums`]** / **[`flags`]**: the small enums and bit sets every descriptor uses.
//! - Descriptors (`*Desc`) for every resource a device can create.
//! - **[`uniform`]**: what program reflection produces.
//! - **[`property`]**: the queried device capabilities.

pub mod buffer;
pub mod descriptor;
pub mod device;
pub mod enums;
pub mod flags;
pub mod format;
pub mod framebuffer;
pub mod input_layout;
pub mod property;
pub mod shader;
pub mod state;
pub mod swapchain;
pub mod texture;
pub mod uniform;

pub use self::buffer::BufferDesc;
pub use self::descriptor::{DescriptorPoolComponent, DescriptorPoolDesc, DescriptorSetLayoutDesc};
pub use self::device::DeviceDesc;
pub use self::enums::*;
pub use self::flags::*;
pub use self::format::{FormatKind, GraphicsFormat};
pub use self::framebuffer::{
    AttachmentLayout, AttachmentRole, FramebufferLayoutDesc, Scissor, Viewport,
};
pub use self::input_layout::{InputLayoutDesc, VertexBinding, VertexLayout};
pub use self::property::DeviceProperties;
pub use self::shader::ShaderDesc;
pub use self::state::{ColorBlend, StateDesc, StencilFaceState};
pub use self::swapchain::SwapchainDesc;
pub use self::texture::{SamplerDesc, TextureDesc};
pub use self::uniform::{
    GraphicsAttribute, GraphicsParam, GraphicsUniform, GraphicsUniformBlock, UniformType,
};
