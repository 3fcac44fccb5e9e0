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

//! The device: the factory every resource and context comes from.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use octoon_core::graphics::api::{
    BufferDesc, DescriptorPoolDesc, DescriptorSetLayoutDesc, DeviceDesc, DeviceProperties,
    DeviceType, FramebufferLayoutDesc, InputLayoutDesc, SamplerDesc, ShaderDesc, StateDesc,
    SwapchainDesc, TextureDesc,
};
use octoon_core::graphics::error::{DeviceError, ResourceError};
use octoon_core::graphics::traits::{DiagnosticsSink, ShaderTranslator, SurfaceBackend};

use super::buffer::GlBuffer;
use super::context::{DeviceContextDesc, GlDeviceContext};
use super::descriptor::{
    DescriptorSetDesc, GlDescriptorPool, GlDescriptorSet, GlDescriptorSetLayout,
};
use super::driver::GlDriver;
use super::framebuffer::{FramebufferDesc, GlFramebuffer, GlFramebufferLayout};
use super::input_layout::GlInputLayout;
use super::pipeline::{GlPipeline, PipelineDesc};
use super::program::{GlProgram, ProgramDesc};
use super::property::query_properties;
use super::sampler::GlSampler;
use super::shader::GlShader;
use super::shared::{GlShared, GlVariant};
use super::state::GlState;
use super::swapchain::GlSwapchain;
use super::texture::GlTexture;

/// Creates every GL object for one native driver.
///
/// The binding model is chosen once here: [`DeviceType::OpenGL`] selects the
/// bind-point variant and [`DeviceType::OpenGLCore`] the direct state access
/// one. Every object the device creates shares the driver, the diagnostics
/// sink and the queried properties.
pub struct GlDevice {
    shared: GlShared,
    desc: DeviceDesc,
    contexts: RefCell<Vec<Weak<GlDeviceContext>>>,
    translator: RefCell<Option<Box<dyn ShaderTranslator>>>,
}

impl GlDevice {
    /// Probes `driver` and builds a device of the requested type.
    pub fn new(
        desc: DeviceDesc,
        driver: Rc<dyn GlDriver>,
        sink: Rc<dyn DiagnosticsSink>,
    ) -> Result<Rc<Self>, DeviceError> {
        let properties = query_properties(driver.as_ref());
        let variant = match desc.device_type {
            DeviceType::OpenGL => GlVariant::Legacy,
            DeviceType::OpenGLCore if properties.has_dsa => GlVariant::Core,
            DeviceType::OpenGLCore => {
                let err = DeviceError::DriverInit(
                    "OpenGLCore needs GL 4.5 or GL_ARB_direct_state_access".to_owned(),
                );
                sink.message(&err.to_string());
                return Err(err);
            }
            other => {
                let err = DeviceError::UnsupportedDeviceType(other);
                sink.message(&err.to_string());
                return Err(err);
            }
        };
        let bindless = variant == GlVariant::Core
            && properties.has_nv_unified_memory
            && desc.prefer_bindless_vertex_buffers;

        log::info!(
            "GlDevice: Created {:?} device on \"{}\" ({}), bindless vertex buffers: {}",
            variant,
            driver.get_string(glow::RENDERER),
            driver.get_string(glow::VERSION),
            bindless
        );
        let shared = GlShared::new(driver, sink, Rc::new(properties), variant, bindless);
        Ok(Rc::new(Self {
            shared,
            desc,
            contexts: RefCell::new(Vec::new()),
            translator: RefCell::new(None),
        }))
    }

    /// The descriptor this device was built from.
    pub fn desc(&self) -> &DeviceDesc {
        &self.desc
    }

    /// Capabilities queried at construction.
    pub fn properties(&self) -> &DeviceProperties {
        self.shared.properties()
    }

    /// The binding model every object of this device uses.
    pub fn variant(&self) -> GlVariant {
        self.shared.variant()
    }

    /// The state shared with every created object.
    pub fn shared(&self) -> &GlShared {
        &self.shared
    }

    /// Installs the translator HLSL shaders go through.
    pub fn set_shader_translator(&self, translator: Box<dyn ShaderTranslator>) {
        *self.translator.borrow_mut() = Some(translator);
    }

    /// Turns native debug output on or off for every live context, from
    /// each context's next `render_begin`.
    pub fn enable_debug_control(&self, enable: bool) {
        for context in self.contexts.borrow().iter().filter_map(Weak::upgrade) {
            context.enable_debug_control(enable);
        }
    }

    /// Copies into `dst` the values of every slot the sources share with it.
    pub fn copy_descriptor_sets(&self, dst: &GlDescriptorSet, sources: &[&GlDescriptorSet]) {
        dst.copy_from(sources);
    }

    /// A context descriptor over `swapchain` carrying this device's debug settings.
    pub fn context_desc(&self, swapchain: Rc<GlSwapchain>) -> DeviceContextDesc {
        DeviceContextDesc {
            swapchain,
            debug_control: self.desc.debug_control,
            muted_debug_message_ids: self.desc.muted_debug_message_ids.clone(),
        }
    }

    // --- Factories ---

    /// Creates a swapchain presenting through `surface`.
    pub fn create_swapchain(
        &self,
        desc: SwapchainDesc,
        surface: Rc<dyn SurfaceBackend>,
    ) -> Result<Rc<GlSwapchain>, ResourceError> {
        GlSwapchain::setup(&self.shared, desc, surface).map(Rc::new)
    }

    /// Creates a context and tracks it for debug-control broadcasts.
    pub fn create_device_context(
        &self,
        desc: DeviceContextDesc,
    ) -> Result<Rc<GlDeviceContext>, ResourceError> {
        let context = Rc::new(GlDeviceContext::setup(&self.shared, desc)?);
        debug_assert!(context.is_matching_variant(self.variant()));

        let mut contexts = self.contexts.borrow_mut();
        contexts.retain(|entry| entry.strong_count() > 0);
        contexts.push(Rc::downgrade(&context));
        Ok(context)
    }

    /// Creates a buffer.
    pub fn create_buffer(&self, desc: BufferDesc) -> Result<Rc<GlBuffer>, ResourceError> {
        let buffer = GlBuffer::setup(&self.shared, desc)?;
        log::debug!(
            "GlDevice: Created {:?} buffer {} ({} bytes)",
            buffer.desc().data_type,
            buffer.instance_id(),
            buffer.size()
        );
        Ok(Rc::new(buffer))
    }

    /// Creates a texture.
    pub fn create_texture(&self, desc: TextureDesc) -> Result<Rc<GlTexture>, ResourceError> {
        let texture = GlTexture::setup(&self.shared, desc)?;
        let desc = texture.desc();
        log::debug!(
            "GlDevice: Created texture {} ({:?} {:?} {}x{})",
            texture.instance_id(),
            desc.dim,
            desc.format,
            desc.width,
            desc.height
        );
        Ok(Rc::new(texture))
    }

    /// Creates a sampler.
    pub fn create_sampler(&self, desc: SamplerDesc) -> Result<Rc<GlSampler>, ResourceError> {
        let sampler = GlSampler::setup(&self.shared, desc)?;
        log::debug!("GlDevice: Created sampler {}", sampler.instance_id());
        Ok(Rc::new(sampler))
    }

    /// Creates a framebuffer layout.
    pub fn create_framebuffer_layout(
        &self,
        desc: FramebufferLayoutDesc,
    ) -> Result<Rc<GlFramebufferLayout>, ResourceError> {
        let layout = GlFramebufferLayout::setup(&self.shared, desc)?;
        log::debug!(
            "GlDevice: Created framebuffer layout with {} attachments",
            layout.desc().attachments.len()
        );
        Ok(Rc::new(layout))
    }

    /// Creates a framebuffer.
    pub fn create_framebuffer(
        &self,
        desc: FramebufferDesc,
    ) -> Result<Rc<GlFramebuffer>, ResourceError> {
        let framebuffer = GlFramebuffer::setup(&self.shared, desc)?;
        log::debug!(
            "GlDevice: Created framebuffer {} ({}x{})",
            framebuffer.instance_id(),
            framebuffer.desc().width,
            framebuffer.desc().height
        );
        Ok(Rc::new(framebuffer))
    }

    /// Compiles a shader stage, translating HLSL through the installed translator.
    pub fn create_shader(&self, desc: ShaderDesc) -> Result<Rc<GlShader>, ResourceError> {
        let translator = self.translator.borrow();
        let shader = GlShader::setup(&self.shared, desc, translator.as_deref())?;
        log::debug!("GlDevice: Created {:?} shader {}", shader.desc().stage, shader.instance_id());
        Ok(Rc::new(shader))
    }

    /// Links and reflects a program.
    pub fn create_program(&self, desc: ProgramDesc) -> Result<Rc<GlProgram>, ResourceError> {
        let program = GlProgram::setup(&self.shared, desc)?;
        log::debug!(
            "GlDevice: Created program {} with {} attributes and {} params",
            program.instance_id(),
            program.attributes().len(),
            program.params().len()
        );
        Ok(Rc::new(program))
    }

    /// Creates a render state.
    pub fn create_state(&self, desc: StateDesc) -> Result<Rc<GlState>, ResourceError> {
        let state = GlState::setup(&self.shared, desc)?;
        log::debug!("GlDevice: Created render state");
        Ok(Rc::new(state))
    }

    /// Creates an input layout.
    pub fn create_input_layout(
        &self,
        desc: InputLayoutDesc,
    ) -> Result<Rc<GlInputLayout>, ResourceError> {
        let layout = GlInputLayout::setup(&self.shared, desc)?;
        log::debug!(
            "GlDevice: Created input layout with {} elements",
            layout.desc().layouts.len()
        );
        Ok(Rc::new(layout))
    }

    /// Creates a pipeline.
    pub fn create_pipeline(&self, desc: PipelineDesc) -> Result<Rc<GlPipeline>, ResourceError> {
        let pipeline = GlPipeline::setup(&self.shared, desc)?;
        log::debug!(
            "GlDevice: Created pipeline with {} bound attributes",
            pipeline.attributes().len()
        );
        Ok(Rc::new(pipeline))
    }

    /// Creates a descriptor set layout.
    pub fn create_descriptor_set_layout(
        &self,
        desc: DescriptorSetLayoutDesc,
    ) -> Result<Rc<GlDescriptorSetLayout>, ResourceError> {
        let layout = GlDescriptorSetLayout::setup(&self.shared, desc)?;
        log::debug!(
            "GlDevice: Created descriptor set layout with {} params",
            layout.desc().params.len()
        );
        Ok(Rc::new(layout))
    }

    /// Creates a descriptor pool.
    pub fn create_descriptor_pool(
        &self,
        desc: DescriptorPoolDesc,
    ) -> Result<Rc<GlDescriptorPool>, ResourceError> {
        let pool = GlDescriptorPool::setup(&self.shared, desc)?;
        log::debug!("GlDevice: Created descriptor pool for {} sets", pool.desc().max_sets);
        Ok(Rc::new(pool))
    }

    /// Creates a descriptor set.
    pub fn create_descriptor_set(
        &self,
        desc: DescriptorSetDesc,
    ) -> Result<Rc<GlDescriptorSet>, ResourceError> {
        let set = GlDescriptorSet::setup(&self.shared, desc)?;
        log::debug!("GlDevice: Created descriptor set with {} slots", set.slots().len());
        Ok(Rc::new(set))
    }
}

impl fmt::Debug for GlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlDevice")
            .field("variant", &self.shared.variant())
            .field("bindless", &self.shared.bindless())
            .field("contexts", &self.contexts.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::ext;
    use crate::graphics::gl::headless::{HeadlessDriver, HeadlessSurface};
    use octoon_core::graphics::api::{GraphicsFormat, ShaderStage};
    use octoon_core::graphics::traits::MemorySink;

    const FRAGMENT: &str = r#"
        #version 330 core
        out vec4 color;
        void main() { color = vec4(1.0); }
    "#;

    struct ToGlsl;

    impl ShaderTranslator for ToGlsl {
        fn translate(&self, _desc: &ShaderDesc) -> Result<String, String> {
            Ok(FRAGMENT.to_owned())
        }
    }

    fn device_with(
        driver: HeadlessDriver,
        desc: DeviceDesc,
    ) -> (Rc<MemorySink>, Result<Rc<GlDevice>, DeviceError>) {
        let sink = Rc::new(MemorySink::new());
        let device = GlDevice::new(desc, Rc::new(driver), sink.clone());
        (sink, device)
    }

    fn device(device_type: DeviceType) -> (Rc<MemorySink>, Rc<GlDevice>) {
        let desc = DeviceDesc {
            device_type,
            ..DeviceDesc::default()
        };
        let (sink, device) = device_with(HeadlessDriver::new(), desc);
        (sink, device.unwrap())
    }

    fn context(device: &GlDevice) -> Rc<GlDeviceContext> {
        let surface = Rc::new(HeadlessSurface::new());
        let swapchain = device.create_swapchain(SwapchainDesc::headless(32, 32), surface);
        device.create_device_context(device.context_desc(swapchain.unwrap())).unwrap()
    }

    #[test]
    fn test_device_type_selects_variant() {
        let (_sink, legacy) = device(DeviceType::OpenGL);
        let (_sink, core) = device(DeviceType::OpenGLCore);

        assert_eq!(legacy.variant(), GlVariant::Legacy);
        assert_eq!(core.variant(), GlVariant::Core);
        assert!(core.properties().has_dsa);
    }

    #[test]
    fn test_unsupported_device_type_is_rejected() {
        let desc = DeviceDesc {
            device_type: DeviceType::Vulkan,
            ..DeviceDesc::default()
        };

        let (sink, device) = device_with(HeadlessDriver::new(), desc);

        assert_eq!(device.unwrap_err(), DeviceError::UnsupportedDeviceType(DeviceType::Vulkan));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_core_needs_direct_state_access() {
        let driver = HeadlessDriver::new()
            .with_version(3, 3)
            .without_extension(ext::ARB_DIRECT_STATE_ACCESS);

        let (_sink, device) = device_with(driver, DeviceDesc::default());

        assert!(matches!(device, Err(DeviceError::DriverInit(_))));
    }

    #[test]
    fn test_bindless_needs_extension_and_preference() {
        // ARRANGE
        let preferred = DeviceDesc {
            prefer_bindless_vertex_buffers: true,
            ..DeviceDesc::default()
        };
        let nv = || HeadlessDriver::new().with_extension(ext::NV_VERTEX_BUFFER_UNIFIED_MEMORY);

        // ACT
        let (_sink, with_both) = device_with(nv(), preferred.clone());
        let (_sink, not_preferred) = device_with(nv(), DeviceDesc::default());
        let (_sink, no_extension) = device_with(HeadlessDriver::new(), preferred);

        // ASSERT
        assert!(with_both.unwrap().shared().bindless());
        assert!(!not_preferred.unwrap().shared().bindless());
        assert!(!no_extension.unwrap().shared().bindless());
    }

    #[test]
    fn test_failed_create_reports_once() {
        // ARRANGE
        let (sink, device) = device(DeviceType::OpenGLCore);

        // ACT
        let result = device.create_program(ProgramDesc::new(Vec::new()));

        // ASSERT
        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_dead_contexts_are_pruned() {
        // ARRANGE
        let (_sink, device) = device(DeviceType::OpenGLCore);
        let first = context(&device);
        let second = context(&device);

        // ACT
        drop(first);
        let third = context(&device);

        // ASSERT
        assert_eq!(device.contexts.borrow().len(), 2);
        assert!(device.contexts.borrow().iter().all(|entry| entry.strong_count() == 1));
        drop((second, third));
    }

    #[test]
    fn test_debug_control_reaches_every_context() {
        // ARRANGE
        let (_sink, device) = device(DeviceType::OpenGL);
        let first = context(&device);
        let second = context(&device);

        // ACT
        device.enable_debug_control(true);
        first.render_begin();
        second.render_begin();

        // ASSERT
        assert!(first.debug_control_enabled());
        assert!(second.debug_control_enabled());
    }

    #[test]
    fn test_translator_serves_hlsl_shaders() {
        // ARRANGE
        let (sink, device) = device(DeviceType::OpenGLCore);
        let desc = ShaderDesc::hlsl(ShaderStage::Fragment, "float4 main() : SV_Target", "main");
        let missing = device.create_shader(desc.clone());

        // ACT
        device.set_shader_translator(Box::new(ToGlsl));
        let shader = device.create_shader(desc);

        // ASSERT
        assert!(missing.is_err());
        assert_eq!(sink.messages(), vec!["Shader compile error: Can't conv hlsl to glsl."]);
        assert_ne!(shader.unwrap().instance_id(), 0);
    }

    #[test]
    fn test_created_texture_keeps_descriptor() {
        let (_sink, device) = device(DeviceType::OpenGL);

        let texture = device
            .create_texture(TextureDesc::new_2d(256, 256, GraphicsFormat::R8G8B8A8UNorm))
            .unwrap();

        assert_ne!(texture.instance_id(), 0);
        assert_eq!(texture.desc().format, GraphicsFormat::R8G8B8A8UNorm);
    }
}
