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
    BlendFactor, BufferDesc, ColorBlend, ColorMask, DataType, DeviceDesc, DeviceType,
    GraphicsFormat, InputLayoutDesc, SamplerDesc, ShaderDesc, ShaderStage, StateDesc,
    TextureDesc, VertexBinding, VertexLayout,
};
use octoon_core::graphics::traits::MemorySink;
use octoon_infra::graphics::gl::{
    GlDevice, GlDriver, GlProgram, HeadlessDriver, PipelineDesc, ProgramDesc, RecordedUniform,
};

const VERTEX: &str = r#"
    #version 330 core
    layout(location = 0) in vec3 glsl_POSITION0;
    in vec2 glsl_TEXCOORD0;
    void main() { gl_Position = vec4(glsl_POSITION0, glsl_TEXCOORD0.x); }
"#;

const FRAGMENT: &str = r#"
    #version 330 core
    uniform sampler2D albedo;
    uniform sampler2D normals;
    uniform sampler2D roughness;
    out vec4 color;
    void main() { color = texture(albedo, vec2(0.0)); }
"#;

fn device(device_type: DeviceType) -> Result<(Rc<HeadlessDriver>, Rc<MemorySink>, Rc<GlDevice>)> {
    let driver = Rc::new(HeadlessDriver::new());
    let sink = Rc::new(MemorySink::new());
    let desc = DeviceDesc {
        device_type,
        ..DeviceDesc::default()
    };
    let device = GlDevice::new(desc, driver.clone(), sink.clone())?;
    Ok((driver, sink, device))
}

fn program(device: &GlDevice) -> Result<Rc<GlProgram>> {
    let vertex = device.create_shader(ShaderDesc::glsl(ShaderStage::Vertex, VERTEX))?;
    let fragment = device.create_shader(ShaderDesc::glsl(ShaderStage::Fragment, FRAGMENT))?;
    Ok(device.create_program(ProgramDesc::new(vec![vertex, fragment]))?)
}

fn blending(attachments: usize, mask: ColorMask) -> StateDesc {
    let blend = ColorBlend {
        enable: true,
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
        color_write_mask: mask,
        ..ColorBlend::default()
    };
    StateDesc {
        color_blends: vec![blend; attachments],
        ..StateDesc::default()
    }
}

#[test]
fn test_close_twice_is_silent() -> Result<()> {
    // ARRANGE
    let (driver, sink, device) = device(DeviceType::OpenGLCore)?;
    let buffer = device.create_buffer(BufferDesc::with_size(DataType::StorageVertexBuffer, 64))?;
    let texture =
        device.create_texture(TextureDesc::new_2d(8, 8, GraphicsFormat::R8G8B8A8UNorm))?;
    let sampler = device.create_sampler(SamplerDesc::default())?;
    let program = program(&device)?;
    let before = driver.live_objects();

    // ACT
    for _ in 0..2 {
        buffer.close();
        texture.close();
        sampler.close();
        program.close();
    }

    // ASSERT
    assert_eq!(driver.live_objects(), before - 4);
    assert_eq!(buffer.instance_id(), 0);
    assert_eq!(texture.instance_id(), 0);
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn test_repeated_state_costs_nothing() -> Result<()> {
    // ARRANGE
    let (driver, _sink, device) = device(DeviceType::OpenGLCore)?;
    let state = device.create_state(blending(1, ColorMask::RGBA))?;
    let mut snapshot = StateDesc::default();

    // ACT
    state.apply(&mut snapshot)?;
    let mark = driver.mark();
    state.apply(&mut snapshot)?;

    // ASSERT
    assert!(driver.calls_since(mark).is_empty());
    assert_eq!(driver.count("blend_func_separate_i"), 1);
    assert_eq!(snapshot, *state.desc());
    Ok(())
}

#[test]
fn test_fewer_attachments_reset_the_surplus() -> Result<()> {
    // ARRANGE
    let (driver, _sink, device) = device(DeviceType::OpenGL)?;
    let four = device.create_state(blending(4, ColorMask::RGB))?;
    let two = device.create_state(blending(2, ColorMask::RGB))?;
    let mut snapshot = StateDesc::default();
    four.apply(&mut snapshot)?;

    // ACT
    let mark = driver.mark();
    two.apply(&mut snapshot)?;

    // ASSERT
    let calls = driver.calls_since(mark);
    let disabled: Vec<i64> = calls
        .iter()
        .filter(|call| call.name == "disable_i")
        .map(|call| call.args[1])
        .collect();
    assert_eq!(disabled, vec![2, 3]);
    let masks: Vec<&Vec<i64>> = calls
        .iter()
        .filter(|call| call.name == "color_mask_i")
        .map(|call| &call.args)
        .collect();
    assert_eq!(masks, vec![&vec![2, 1, 1, 1, 1], &vec![3, 1, 1, 1, 1]]);
    assert!(!snapshot.color_blends[3].enable);
    Ok(())
}

#[test]
fn test_unknown_semantics_are_dropped() -> Result<()> {
    // ARRANGE
    let (_driver, sink, device) = device(DeviceType::OpenGLCore)?;
    let program = program(&device)?;
    let input_layout = device.create_input_layout(InputLayoutDesc {
        layouts: vec![
            VertexLayout::new(0, "POSITION", 0, GraphicsFormat::R32G32B32SFloat, 0),
            VertexLayout::new(0, "NORMAL", 0, GraphicsFormat::R32G32B32SFloat, 12),
            VertexLayout::new(0, "TEXCOORD", 0, GraphicsFormat::R32G32SFloat, 24),
        ],
        bindings: vec![VertexBinding::new(0, 32)],
    })?;
    let state = device.create_state(StateDesc::default())?;

    // ACT
    let pipeline = device.create_pipeline(PipelineDesc::new(state, program, input_layout))?;

    // ASSERT
    let semantics: Vec<&str> =
        pipeline.attributes().iter().map(|attribute| attribute.semantic.as_str()).collect();
    assert_eq!(semantics, vec!["POSITION", "TEXCOORD"]);
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn test_sampler_units_follow_declaration_order() -> Result<()> {
    // ARRANGE
    let (driver, _sink, device) = device(DeviceType::OpenGL)?;

    // ACT
    let first = program(&device)?;
    let second = program(&device)?;

    // ASSERT
    for program in [&first, &second] {
        let handle = program.instance_id();
        for (name, unit) in [("albedo", 0), ("normals", 1), ("roughness", 2)] {
            let location = driver.uniform_location(handle, name).unwrap();
            assert_eq!(
                driver.uniform_value(handle, location),
                Some(RecordedUniform::I32(vec![unit]))
            );
        }
    }
    Ok(())
}

#[test]
fn test_staging_grows_but_never_shrinks() -> Result<()> {
    // ARRANGE
    let (_driver, _sink, device) = device(DeviceType::OpenGLCore)?;
    let texture =
        device.create_texture(TextureDesc::new_2d(64, 64, GraphicsFormat::R8G8B8A8UNorm))?;

    // ACT
    let first = texture.map(0, 0, 16, 16, 0)?.len();
    let after_first = texture.staging_capacity();
    let second = texture.map(0, 0, 8, 8, 0)?.len();
    let after_second = texture.staging_capacity();
    texture.map(0, 0, 64, 64, 0)?;
    let after_third = texture.staging_capacity();

    // ASSERT
    assert_eq!((first, second), (16 * 16 * 4, 8 * 8 * 4));
    assert!(after_first >= 16 * 16 * 4);
    assert_eq!(after_second, after_first);
    assert!(after_third >= 64 * 64 * 4);
    Ok(())
}
