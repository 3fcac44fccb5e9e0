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

//! Runs the octoon GL layer over the headless driver.
//!
//! Pass a JSON settings file as the first argument to override the defaults.

use std::rc::Rc;

use anyhow::{Context, Result};
use octoon_core::graphics::{
    AttachmentLayout, ClearFlags, CullMode, DeviceType, FramebufferLayoutDesc, GraphicsFormat,
    InputLayoutDesc, LogSink, ShaderDesc, ShaderStage, StateDesc, SwapchainDesc, TextureDesc,
    VertexBinding, VertexLayout,
};
use octoon_core::GraphicsSettings;
use octoon_infra::graphics::gl::{
    AttachmentBinding, FramebufferDesc, GlDevice, GlDeviceContext, HeadlessDriver,
    HeadlessSurface, PipelineDesc, ProgramDesc,
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

fn load_settings() -> Result<GraphicsSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings from {path}"))?;
            Ok(GraphicsSettings::from_json_str(&json)?)
        }
        None => Ok(GraphicsSettings::default()),
    }
}

fn open(
    settings: &GraphicsSettings,
    device_type: DeviceType,
) -> Result<(Rc<HeadlessDriver>, Rc<GlDevice>, Rc<GlDeviceContext>)> {
    let driver = Rc::new(HeadlessDriver::new());
    let desc = octoon_core::graphics::DeviceDesc {
        device_type,
        ..settings.device_desc()
    };
    let device = GlDevice::new(desc, driver.clone(), Rc::new(LogSink))?;
    let mut swapchain = SwapchainDesc::headless(256, 256);
    swapchain.interval = settings.swap_interval;
    let swapchain = device.create_swapchain(swapchain, Rc::new(HeadlessSurface::new()))?;
    let context = device.create_device_context(device.context_desc(swapchain))?;
    Ok((driver, device, context))
}

/// Clears a 256x256 RGBA8 target to red and reads its corner pixel back.
fn clear_and_read_back(settings: &GraphicsSettings, device_type: DeviceType) -> Result<()> {
    let (_driver, device, context) = open(settings, device_type)?;
    let format = GraphicsFormat::R8G8B8A8UNorm;
    let texture = device.create_texture(TextureDesc::new_2d(256, 256, format))?;
    let layout = device.create_framebuffer_layout(FramebufferLayoutDesc {
        attachments: vec![AttachmentLayout::color(0, format)],
    })?;
    let mut desc = FramebufferDesc::new(layout, 256, 256);
    desc.color_attachments.push(AttachmentBinding::new(texture.clone()));
    let framebuffer = device.create_framebuffer(desc)?;

    context.render_begin();
    context.set_framebuffer(Some(framebuffer))?;
    context.clear_framebuffer(0, ClearFlags::COLOR, [1.0, 0.0, 0.0, 1.0], 1.0, 0)?;
    context.render_end();

    let pixel = texture.map(0, 0, 1, 1, 0)?.to_vec();
    log::info!("Sandbox: {:?} clear read back {:?}", device.variant(), pixel);
    anyhow::ensure!(pixel == [255, 0, 0, 255], "unexpected pixel {pixel:?}");
    Ok(())
}

/// Draws with two pipelines that differ only in depth testing and reports the
/// native calls issued by the switch.
fn pipeline_diffing(settings: &GraphicsSettings) -> Result<()> {
    let (driver, device, context) = open(settings, DeviceType::OpenGL)?;
    let vertex = device.create_shader(ShaderDesc::glsl(ShaderStage::Vertex, VERTEX))?;
    let fragment = device.create_shader(ShaderDesc::glsl(ShaderStage::Fragment, FRAGMENT))?;
    let program = device.create_program(ProgramDesc::new(vec![vertex, fragment]))?;
    let input_layout = device.create_input_layout(InputLayoutDesc {
        layouts: vec![VertexLayout::new(0, "POSITION", 0, GraphicsFormat::R32G32B32SFloat, 0)],
        bindings: vec![VertexBinding::new(0, 12)],
    })?;

    let opaque = StateDesc {
        cull_mode: CullMode::Back,
        depth_enable: true,
        ..StateDesc::default()
    };
    let overlay = StateDesc {
        depth_enable: false,
        ..opaque.clone()
    };
    let first = device.create_pipeline(PipelineDesc::new(
        device.create_state(opaque)?,
        program.clone(),
        input_layout.clone(),
    ))?;
    let second = device.create_pipeline(PipelineDesc::new(
        device.create_state(overlay)?,
        program,
        input_layout,
    ))?;

    context.render_begin();
    context.set_render_pipeline(first)?;
    context.draw(3, 1, 0, 0)?;
    let mark = driver.mark();
    context.set_render_pipeline(second)?;
    context.draw(3, 1, 0, 0)?;
    context.render_end();

    let switch: Vec<String> = driver
        .calls_since(mark)
        .into_iter()
        .filter(|call| !call.name.starts_with("draw"))
        .map(|call| format!("{}{:?}", call.name, call.args))
        .collect();
    log::info!("Sandbox: Pipeline switch issued {} native calls: {:?}", switch.len(), switch);
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    log::info!("Sandbox: Settings {}", settings.to_json_string()?);

    clear_and_read_back(&settings, DeviceType::OpenGL)?;
    clear_and_read_back(&settings, DeviceType::OpenGLCore)?;
    pipeline_diffing(&settings)?;
    Ok(())
}
