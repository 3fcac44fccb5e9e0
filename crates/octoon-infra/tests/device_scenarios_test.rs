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

use std::rc::Rc;

use anyhow::Result;
use octoon_core::graphics::api::{
    AttachmentLayout, ClearFlags, CullMode, DeviceDesc, DeviceType, FramebufferLayoutDesc,
    GraphicsFormat, InputLayoutDesc, ShaderDesc, ShaderStage, StateDesc, SwapchainDesc,
    TextureDesc, VertexBinding, VertexLayout,
};
use octoon_core::graphics::error::ContextError;
use octoon_core::graphics::traits::MemorySink;
use octoon_infra::graphics::gl::{
    AttachmentBinding, FramebufferDesc, GlDevice, GlDeviceContext, GlPipeline, GlProgram,
    HeadlessDriver, HeadlessSurface, PipelineDesc, ProgramDesc,
};

const VERTEX: &str = r#"
    #version 330 core
    layout(location = 0) in vec3 glsl_POSITION0;
    void main() { gl_Position = vec4(glsl_POSITION0, 1.0); }
"#;

const FRAGMENT: &str = r#"
    #version 330 core
    out vec4 color;
    void main() { color = vec4(1.0, 0.0, 0.0, 1.0); }
"#;

struct Scene {
    driver: Rc<HeadlessDriver>,
    sink: Rc<MemorySink>,
    device: Rc<GlDevice>,
    context: Rc<GlDeviceContext>,
}

fn scene(device_type: DeviceType) -> Result<Scene> {
    let _ = env_logger::builder().is_test(true).try_init();
    let driver = Rc::new(HeadlessDriver::new());
    let sink = Rc::new(MemorySink::new());
    let desc = DeviceDesc {
        device_type,
        ..DeviceDesc::default()
    };
    let device = GlDevice::new(desc, driver.clone(), sink.clone())?;
    let surface = Rc::new(HeadlessSurface::new());
    let swapchain = device.create_swapchain(SwapchainDesc::headless(256, 256), surface)?;
    let context = device.create_device_context(device.context_desc(swapchain))?;
    Ok(Scene {
        driver,
        sink,
        device,
        context,
    })
}

fn program(device: &GlDevice) -> Result<Rc<GlProgram>> {
    let vertex = device.create_shader(ShaderDesc::glsl(ShaderStage::Vertex, VERTEX))?;
    let fragment = device.create_shader(ShaderDesc::glsl(ShaderStage::Fragment, FRAGMENT))?;
    Ok(device.create_program(ProgramDesc::new(vec![vertex, fragment]))?)
}

fn pipeline(
    device: &GlDevice,
    program: &Rc<GlProgram>,
    state: StateDesc,
) -> Result<Rc<GlPipeline>> {
    let input_layout = device.create_input_layout(InputLayoutDesc {
        layouts: vec![VertexLayout::new(0, "POSITION", 0, GraphicsFormat::R32G32B32SFloat, 0)],
        bindings: vec![VertexBinding::new(0, 12)],
    })?;
    let desc = PipelineDesc::new(device.create_state(state)?, program.clone(), input_layout);
    Ok(device.create_pipeline(desc)?)
}

fn clear_and_read_back(device_type: DeviceType) -> Result<Vec<u8>> {
    let scene = scene(device_type)?;
    let format = GraphicsFormat::R8G8B8A8UNorm;
    let texture = scene.device.create_texture(TextureDesc::new_2d(256, 256, format))?;
    assert_ne!(texture.instance_id(), 0);
    let layout = scene.device.create_framebuffer_layout(FramebufferLayoutDesc {
        attachments: vec![AttachmentLayout::color(0, format)],
    })?;
    let mut desc = FramebufferDesc::new(layout, 256, 256);
    desc.color_attachments.push(AttachmentBinding::new(texture.clone()));
    let framebuffer = scene.device.create_framebuffer(desc)?;

    scene.context.set_framebuffer(Some(framebuffer))?;
    scene
        .context
        .clear_framebuffer(0, ClearFlags::COLOR, [1.0, 0.0, 0.0, 1.0], 1.0, 0)?;

    let pixel = texture.map(0, 0, 1, 1, 0)?.to_vec();
    assert!(scene.sink.is_empty(), "{:?}", scene.sink.messages());
    Ok(pixel)
}

#[test]
fn test_legacy_clear_reads_back_red() -> Result<()> {
    // ARRANGE / ACT
    let pixel = clear_and_read_back(DeviceType::OpenGL)?;

    // ASSERT
    assert_eq!(pixel, vec![255, 0, 0, 255]);
    Ok(())
}

#[test]
fn test_core_clear_reads_back_red() -> Result<()> {
    let pixel = clear_and_read_back(DeviceType::OpenGLCore)?;

    assert_eq!(pixel, vec![255, 0, 0, 255]);
    Ok(())
}

#[test]
fn test_pipeline_switch_changes_only_depth_test() -> Result<()> {
    // ARRANGE
    let scene = scene(DeviceType::OpenGL)?;
    let program = program(&scene.device)?;
    let opaque = StateDesc {
        cull_mode: CullMode::Back,
        depth_enable: true,
        ..StateDesc::default()
    };
    let overlay = StateDesc {
        depth_enable: false,
        ..opaque.clone()
    };
    let first = pipeline(&scene.device, &program, opaque)?;
    let second = pipeline(&scene.device, &program, overlay)?;

    // ACT
    scene.context.set_render_pipeline(first)?;
    scene.context.draw(3, 1, 0, 0)?;
    let mark = scene.driver.mark();
    scene.context.set_render_pipeline(second)?;
    scene.context.draw(3, 1, 0, 0)?;

    // ASSERT
    let between: Vec<_> = scene
        .driver
        .calls_since(mark)
        .into_iter()
        .filter(|call| call.name != "draw_arrays_instanced")
        .collect();
    assert_eq!(between.len(), 1, "{between:?}");
    assert_eq!(between[0].name, "disable");
    assert_eq!(between[0].args, vec![i64::from(glow::DEPTH_TEST)]);
    assert!(scene.driver.is_enabled(glow::CULL_FACE));
    Ok(())
}

#[test]
fn test_present_on_headless_swapchain_reports_no_window() -> Result<()> {
    let scene = scene(DeviceType::OpenGLCore)?;

    scene.context.render_begin();
    let result = scene.context.present();
    scene.context.render_end();

    assert_eq!(result, Err(ContextError::NoWindow));
    assert_eq!(scene.sink.len(), 1);
    Ok(())
}
