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

//! Linked programs and their reflected interface.
//!
//! Reflection runs once, right after a successful link. Sampler uniforms get
//! sequential texture units which are pushed to the program immediately, and
//! uniform blocks are bound to their enumeration index. The resulting
//! [`GraphicsParam`]s are shared as `Rc` so descriptor sets can match them by
//! identity.

use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use octoon_core::graphics::api::{
    GraphicsAttribute, GraphicsParam, GraphicsUniform, GraphicsUniformBlock, ShaderStageFlags,
    UniformType,
};
use octoon_core::graphics::error::ResourceError;

use super::driver::UniformData;
use super::shader::GlShader;
use super::shared::GlShared;
use super::types;

/// Stages to link together.
#[derive(Debug, Clone, Default)]
pub struct ProgramDesc {
    /// Compiled stages. They stay owned by the caller.
    pub shaders: Vec<Rc<GlShader>>,
}

impl ProgramDesc {
    /// A program over the given stages.
    pub fn new(shaders: Vec<Rc<GlShader>>) -> Self {
        Self { shaders }
    }
}

/// A linked program with its attributes and parameters.
pub struct GlProgram {
    shared: GlShared,
    handle: Cell<u32>,
    attributes: Vec<GraphicsAttribute>,
    params: Vec<Rc<GraphicsParam>>,
    desc: ProgramDesc,
}

impl GlProgram {
    /// Links the stages in `desc` and reflects the result.
    pub fn setup(shared: &GlShared, desc: ProgramDesc) -> Result<Self, ResourceError> {
        if desc.shaders.is_empty() {
            return Err(shared.fail(ResourceError::InvalidDescriptor(
                "program has no shader stages".to_owned(),
            )));
        }
        if let Some(closed) = desc.shaders.iter().find(|shader| shader.instance_id() == 0) {
            return Err(shared.fail(ResourceError::InvalidDescriptor(format!(
                "{:?} stage is closed",
                closed.desc().stage
            ))));
        }

        let gl = shared.gl();
        let handle = gl.create_program();
        if handle == 0 {
            return Err(shared.fail(ResourceError::NativeAllocation("glCreateProgram")));
        }
        let mut program = Self {
            shared: shared.clone(),
            handle: Cell::new(handle),
            attributes: Vec::new(),
            params: Vec::new(),
            desc,
        };

        for shader in &program.desc.shaders {
            gl.attach_shader(handle, shader.instance_id());
        }
        gl.link_program(handle);
        if !gl.program_link_status(handle) {
            let log = gl.program_info_log(handle);
            return Err(shared.fail(ResourceError::Link(log)));
        }

        program.attributes = program.reflect_attributes();
        program.params = program.reflect_params();

        log::debug!(
            "GlProgram: Linked program {} with {} attributes and {} params",
            handle,
            program.attributes.len(),
            program.params.len()
        );
        Ok(program)
    }

    fn stages(&self) -> ShaderStageFlags {
        self.desc
            .shaders
            .iter()
            .fold(ShaderStageFlags::default(), |flags, shader| {
                flags | ShaderStageFlags::from(shader.desc().stage)
            })
    }

    fn reflect_attributes(&self) -> Vec<GraphicsAttribute> {
        let gl = self.shared.gl();
        let handle = self.handle.get();
        gl.active_attributes(handle)
            .into_iter()
            .filter(|attribute| !attribute.name.starts_with("gl_"))
            .filter_map(|attribute| {
                let location = gl.attrib_location(handle, &attribute.name)?;
                let (semantic, semantic_index) = split_semantic(&attribute.name);
                Some(GraphicsAttribute {
                    semantic: semantic.to_owned(),
                    semantic_index,
                    binding: location,
                    format: types::format_from_attrib_type(attribute.gl_type),
                })
            })
            .collect()
    }

    fn reflect_params(&self) -> Vec<Rc<GraphicsParam>> {
        let gl = self.shared.gl();
        let handle = self.handle.get();
        let stages = self.stages();
        let mut params = Vec::new();

        let blocks = gl.active_uniform_blocks(handle);
        let block_members: HashSet<&str> = blocks
            .iter()
            .flat_map(|block| block.members.iter().map(|member| base_name(&member.name)))
            .collect();

        let mut next_unit = 0;
        for uniform in gl.active_uniforms(handle) {
            let name = base_name(&uniform.name);
            if name.starts_with("gl_") || name.contains('.') || block_members.contains(name) {
                continue;
            }
            let Some(location) = gl.uniform_location(handle, &uniform.name) else {
                continue;
            };

            let uniform_type = types::uniform_type_from_native(uniform.gl_type, &uniform.name);
            let mut reflected = GraphicsUniform {
                name: name.to_owned(),
                binding: location as u32,
                uniform_type,
                stages,
                ..Default::default()
            };

            if uniform_type.is_sampler() {
                let unit = next_unit;
                next_unit += 1;
                let values = [unit];
                gl.program_uniform(
                    handle,
                    location,
                    UniformData::I32 {
                        components: 1,
                        values: &values,
                    },
                );
                reflected.binding = unit as u32;
                if uniform_type == UniformType::SamplerImage {
                    if let Some((texture, sampler)) = name.split_once("_X_") {
                        reflected.name = texture.to_owned();
                        reflected.sampler_name = sampler.to_owned();
                    }
                }
            }

            params.push(Rc::new(GraphicsParam::Uniform(reflected)));
        }

        for (binding, block) in blocks.iter().enumerate() {
            let binding = binding as u32;
            gl.uniform_block_binding(handle, block.index, binding);
            let members = block
                .members
                .iter()
                .map(|member| GraphicsUniform {
                    name: base_name(&member.name).to_owned(),
                    binding,
                    offset: member.offset.max(0) as u32,
                    uniform_type: types::uniform_type_from_native(member.gl_type, &member.name),
                    stages,
                    ..Default::default()
                })
                .collect();
            params.push(Rc::new(GraphicsParam::UniformBlock(GraphicsUniformBlock {
                name: block.name.clone(),
                binding,
                block_size: block.data_size.max(0) as u32,
                uniform_type: UniformType::UniformBuffer,
                stages,
                members,
            })));
        }

        params
    }

    /// The native program name, 0 once closed.
    pub fn instance_id(&self) -> u32 {
        self.handle.get()
    }

    /// The stages this program was linked from.
    pub fn desc(&self) -> &ProgramDesc {
        &self.desc
    }

    /// Reflected vertex inputs.
    pub fn attributes(&self) -> &[GraphicsAttribute] {
        &self.attributes
    }

    /// Reflected uniforms and uniform blocks, in enumeration order.
    pub fn params(&self) -> &[Rc<GraphicsParam>] {
        &self.params
    }

    /// Looks a parameter up by name.
    pub fn param(&self, name: &str) -> Option<&Rc<GraphicsParam>> {
        self.params.iter().find(|param| param.name() == name)
    }

    /// Deletes the native program. Later calls do nothing.
    pub fn close(&self) {
        let handle = self.handle.replace(0);
        if handle != 0 {
            self.shared.gl().delete_program(handle);
        }
    }
}

impl Drop for GlProgram {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GlProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlProgram")
            .field("handle", &self.handle.get())
            .field("attributes", &self.attributes)
            .field("params", &self.params.len())
            .finish()
    }
}

/// Name with any array suffix removed.
fn base_name(name: &str) -> &str {
    name.split('[').next().unwrap_or(name)
}

/// `vs_TEXCOORD1` -> (`TEXCOORD`, 1). The semantic is the text after the
/// last underscore, and its trailing digits form the index.
fn split_semantic(name: &str) -> (&str, u32) {
    let name = base_name(name);
    let tail = name.rsplit_once('_').map_or(name, |(_, tail)| tail);
    let semantic = tail.trim_end_matches(|c: char| c.is_ascii_digit());
    let index = tail[semantic.len()..].parse().unwrap_or(0);
    (semantic, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::driver::GlDriver;
    use crate::graphics::gl::headless::RecordedUniform;
    use crate::graphics::gl::shared::testing::headless;
    use crate::graphics::gl::shared::GlVariant;
    use octoon_core::graphics::api::{GraphicsFormat, ShaderDesc, ShaderStage};

    const VERTEX: &str = r#"
        #version 330 core
        layout(location = 0) in vec3 glsl_POSITION0;
        in vec2 glsl_TEXCOORD1;
        out vec2 uv;

        uniform mat4 model;
        uniform vec4 lights[4];

        layout(std140) uniform Camera {
            mat4 view;
            vec3 eye;
            float exposure;
        };

        void main() {
            uv = glsl_TEXCOORD1;
            gl_Position = model * vec4(glsl_POSITION0, 1.0);
        }
    "#;

    const FRAGMENT: &str = r#"
        #version 330 core
        in vec2 uv;
        out vec4 color;

        uniform sampler2D albedo;
        uniform sampler2D normals_X_linear;
        uniform samplerCube environment;

        void main() {
            color = texture(albedo, uv);
        }
    "#;

    fn program(shared: &GlShared) -> GlProgram {
        let vertex = GlShader::setup(shared, ShaderDesc::glsl(ShaderStage::Vertex, VERTEX), None);
        let fragment =
            GlShader::setup(shared, ShaderDesc::glsl(ShaderStage::Fragment, FRAGMENT), None);
        let desc = ProgramDesc::new(vec![Rc::new(vertex.unwrap()), Rc::new(fragment.unwrap())]);
        GlProgram::setup(shared, desc).unwrap()
    }

    #[test]
    fn test_split_semantic() {
        assert_eq!(split_semantic("glsl_POSITION0"), ("POSITION", 0));
        assert_eq!(split_semantic("in_TEXCOORD12"), ("TEXCOORD", 12));
        assert_eq!(split_semantic("a_b_NORMAL"), ("NORMAL", 0));
        assert_eq!(split_semantic("COLOR3"), ("COLOR", 3));
    }

    #[test]
    fn test_attributes_are_split_into_semantics() {
        // ARRANGE
        let (_driver, _sink, shared) = headless(GlVariant::Core);

        // ACT
        let program = program(&shared);

        // ASSERT
        let attributes = program.attributes();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].semantic, "POSITION");
        assert_eq!(attributes[0].semantic_index, 0);
        assert_eq!(attributes[0].binding, 0);
        assert_eq!(attributes[0].format, GraphicsFormat::R32G32B32SFloat);
        assert_eq!(attributes[1].semantic, "TEXCOORD");
        assert_eq!(attributes[1].semantic_index, 1);
        assert_eq!(attributes[1].binding, 1);
    }

    #[test]
    fn test_samplers_get_sequential_units() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Legacy);

        // ACT
        let program = program(&shared);

        // ASSERT
        let samplers: Vec<(String, u32)> = program
            .params()
            .iter()
            .filter(|param| param.uniform_type().is_sampler())
            .map(|param| (param.name().to_owned(), param.binding()))
            .collect();
        assert_eq!(
            samplers,
            vec![
                ("albedo".to_owned(), 0),
                ("normals".to_owned(), 1),
                ("environment".to_owned(), 2)
            ]
        );
        let handle = program.instance_id();
        let environment = driver.uniform_location(handle, "environment").unwrap();
        assert_eq!(
            driver.uniform_value(handle, environment),
            Some(RecordedUniform::I32(vec![2]))
        );
    }

    #[test]
    fn test_reflection_is_stable_across_programs() {
        let (_driver, _sink, shared) = headless(GlVariant::Core);

        let first = program(&shared);
        let second = program(&shared);

        let units = |program: &GlProgram| -> Vec<u32> {
            program
                .params()
                .iter()
                .filter(|param| param.uniform_type().is_sampler())
                .map(|param| param.binding())
                .collect()
        };
        assert_eq!(units(&first), vec![0, 1, 2]);
        assert_eq!(units(&first), units(&second));
    }

    #[test]
    fn test_sampler_name_split() {
        let (_driver, _sink, shared) = headless(GlVariant::Core);

        let program = program(&shared);

        match program.param("normals").map(|param| param.as_ref()) {
            Some(GraphicsParam::Uniform(uniform)) => {
                assert_eq!(uniform.sampler_name, "linear");
                assert_eq!(uniform.uniform_type, UniformType::SamplerImage);
            }
            other => panic!("unexpected param {other:?}"),
        }
    }

    #[test]
    fn test_arrays_and_blocks() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Core);

        // ACT
        let program = program(&shared);

        // ASSERT
        let lights = program.param("lights").unwrap();
        assert_eq!(lights.uniform_type(), UniformType::Float4Array);

        let camera = program.param("Camera").and_then(|param| param.as_block()).unwrap();
        assert_eq!(camera.binding, 0);
        assert_eq!(camera.block_size, 80);
        assert_eq!(camera.uniform_type, UniformType::UniformBuffer);
        let members: Vec<(&str, u32)> = camera
            .members
            .iter()
            .map(|member| (member.name.as_str(), member.offset))
            .collect();
        assert_eq!(members, vec![("view", 0), ("eye", 64), ("exposure", 76)]);
        assert_eq!(camera.members[0].uniform_type, UniformType::Float4x4);
        assert!(camera.stages.contains(ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT));
        assert_eq!(driver.count("uniform_block_binding"), 1);
    }

    #[test]
    fn test_empty_program_is_rejected() {
        let (driver, sink, shared) = headless(GlVariant::Core);

        let result = GlProgram::setup(&shared, ProgramDesc::default());

        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert_eq!(driver.count("create_program"), 0);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_closed_stage_is_rejected() {
        // ARRANGE
        let (driver, sink, shared) = headless(GlVariant::Legacy);
        let vertex = ShaderDesc::glsl(ShaderStage::Vertex, "void main() {}");
        let fragment = ShaderDesc::glsl(ShaderStage::Fragment, "void main() {}");
        let vertex = Rc::new(GlShader::setup(&shared, vertex, None).unwrap());
        let fragment = Rc::new(GlShader::setup(&shared, fragment, None).unwrap());
        fragment.close();

        // ACT
        let result = GlProgram::setup(&shared, ProgramDesc::new(vec![vertex, fragment]));

        // ASSERT
        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
        assert_eq!(sink.len(), 1);
        assert_eq!(driver.count("create_program"), 0);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let program = program(&shared);

        program.close();
        program.close();
        drop(program);

        assert_eq!(driver.count("delete_program"), 1);
    }
}
