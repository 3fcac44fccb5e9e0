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

//! The OpenGL backend.
//!
//! - [`GlDevice`]: the factory. It fixes the binding model ([`GlVariant`]) once.
//! - [`GlDeviceContext`]: binds pipelines, streams and targets, and draws.
//! - Resources: [`GlBuffer`], [`GlTexture`], [`GlSampler`], [`GlFramebuffer`],
//!   [`GlShader`], [`GlProgram`], [`GlState`], [`GlPipeline`] and the
//!   descriptor objects.
//! - [`GlDriver`]: the seam every native call goes through, implemented by
//!   [`GlowDriver`] and [`HeadlessDriver`].

pub mod ext;
pub mod types;

mod buffer;
mod context;
mod descriptor;
mod device;
mod driver;
mod framebuffer;
mod glow_driver;
mod headless;
mod input_layout;
mod pipeline;
mod program;
mod property;
mod sampler;
mod shader;
mod shared;
mod state;
mod swapchain;
mod texture;

pub use self::buffer::{GlBuffer, MappedBuffer};
pub use self::context::{DeviceContextDesc, GlDeviceContext};
pub use self::descriptor::{
    DescriptorSetDesc, GlDescriptorPool, GlDescriptorSet, GlDescriptorSetLayout, UniformSlot,
    UniformValue,
};
pub use self::device::GlDevice;
pub use self::driver::{
    ActiveBlock, ActiveBlockMember, ActiveVariable, DebugMessage, GlDriver, UniformData,
};
pub use self::framebuffer::{AttachmentBinding, FramebufferDesc, GlFramebuffer, GlFramebufferLayout};
pub use self::glow_driver::GlowDriver;
pub use self::headless::{GlCall, HeadlessDriver, HeadlessSurface, RecordedUniform};
pub use self::input_layout::GlInputLayout;
pub use self::pipeline::{GlPipeline, PipelineAttribute, PipelineDesc, VertexBufferSlot};
pub use self::program::{GlProgram, ProgramDesc};
pub use self::property::{context_version, query_properties};
pub use self::sampler::GlSampler;
pub use self::shader::GlShader;
pub use self::shared::{GlShared, GlVariant};
pub use self::state::GlState;
pub use self::swapchain::GlSwapchain;
pub use self::texture::{GlTexture, MappedTexture};
