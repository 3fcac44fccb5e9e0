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

//! Just enough GLSL understanding to stand in for a driver's program
//! introspection: global vertex inputs, default-block uniforms and std140
//! uniform blocks. Function bodies are skipped wholesale.

use crate::graphics::gl::driver::ActiveBlockMember;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
    pub name: String,
    pub gl_type: u32,
    pub array_len: Option<u32>,
    pub location: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockDeclaration {
    pub name: String,
    pub data_size: i32,
    pub members: Vec<ActiveBlockMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ShaderInterface {
    pub inputs: Vec<Declaration>,
    pub uniforms: Vec<Declaration>,
    pub blocks: Vec<BlockDeclaration>,
}

/// Mimics the compiler's verdict: `#error` fails, so does a missing `main`.
pub(crate) fn validate(source: &str) -> Result<(), String> {
    for (line_no, line) in source.lines().enumerate() {
        if let Some(rest) = line.trim_start().strip_prefix("#error") {
            return Err(format!("ERROR: 0:{}: '#error' : {}", line_no + 1, rest.trim()));
        }
    }

    let code = strip_comments(source);
    let has_main = code.match_indices("main").any(|(at, _)| {
        let before_ok = code[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
        let after = code[at + 4..].trim_start();
        before_ok && after.starts_with('(')
    });
    if !has_main {
        return Err("ERROR: 0:0: 'main' : function is not defined".to_owned());
    }
    Ok(())
}

/// Reflects the global interface of one shader stage.
pub(crate) fn reflect(source: &str, is_vertex: bool) -> ShaderInterface {
    let mut interface = ShaderInterface::default();
    for statement in top_level_statements(&strip_comments(source)) {
        parse_statement(&statement, is_vertex, &mut interface);
    }
    interface
}

/// GL type enum for a GLSL type name.
pub(crate) fn gl_type_of(name: &str) -> Option<u32> {
    let ty = match name {
        "float" => glow::FLOAT,
        "vec2" => glow::FLOAT_VEC2,
        "vec3" => glow::FLOAT_VEC3,
        "vec4" => glow::FLOAT_VEC4,
        "int" => glow::INT,
        "ivec2" => glow::INT_VEC2,
        "ivec3" => glow::INT_VEC3,
        "ivec4" => glow::INT_VEC4,
        "uint" => glow::UNSIGNED_INT,
        "uvec2" => glow::UNSIGNED_INT_VEC2,
        "uvec3" => glow::UNSIGNED_INT_VEC3,
        "uvec4" => glow::UNSIGNED_INT_VEC4,
        "bool" => glow::BOOL,
        "bvec2" => glow::BOOL_VEC2,
        "bvec3" => glow::BOOL_VEC3,
        "bvec4" => glow::BOOL_VEC4,
        "mat2" | "mat2x2" => glow::FLOAT_MAT2,
        "mat3" | "mat3x3" => glow::FLOAT_MAT3,
        "mat4" | "mat4x4" => glow::FLOAT_MAT4,
        "sampler2D" => glow::SAMPLER_2D,
        "sampler3D" => glow::SAMPLER_3D,
        "samplerCube" => glow::SAMPLER_CUBE,
        "sampler2DShadow" => glow::SAMPLER_2D_SHADOW,
        "sampler2DArray" => glow::SAMPLER_2D_ARRAY,
        "sampler2DArrayShadow" => glow::SAMPLER_2D_ARRAY_SHADOW,
        "samplerCubeShadow" => glow::SAMPLER_CUBE_SHADOW,
        "samplerCubeArray" => glow::SAMPLER_CUBE_MAP_ARRAY,
        "sampler2DMS" => glow::SAMPLER_2D_MULTISAMPLE,
        "sampler2DMSArray" => glow::SAMPLER_2D_MULTISAMPLE_ARRAY,
        "samplerBuffer" => glow::SAMPLER_BUFFER,
        "isampler2D" => glow::INT_SAMPLER_2D,
        "usampler2D" => glow::UNSIGNED_INT_SAMPLER_2D,
        "image2D" => glow::IMAGE_2D,
        "image3D" => glow::IMAGE_3D,
        _ => return None,
    };
    Some(ty)
}

/// Attribute locations a type consumes.
pub(crate) fn location_span(gl_type: u32) -> u32 {
    match gl_type {
        glow::FLOAT_MAT2 => 2,
        glow::FLOAT_MAT3 => 3,
        glow::FLOAT_MAT4 => 4,
        _ => 1,
    }
}

/// std140 base alignment and size of a non-array member.
fn std140(gl_type: u32) -> (u32, u32) {
    match gl_type {
        glow::FLOAT_VEC2 | glow::INT_VEC2 | glow::UNSIGNED_INT_VEC2 | glow::BOOL_VEC2 => (8, 8),
        glow::FLOAT_VEC3 | glow::INT_VEC3 | glow::UNSIGNED_INT_VEC3 | glow::BOOL_VEC3 => (16, 12),
        glow::FLOAT_VEC4 | glow::INT_VEC4 | glow::UNSIGNED_INT_VEC4 | glow::BOOL_VEC4 => (16, 16),
        glow::FLOAT_MAT2 => (16, 32),
        glow::FLOAT_MAT3 => (16, 48),
        glow::FLOAT_MAT4 => (16, 64),
        _ => (4, 4),
    }
}

fn round_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' {
            match chars.peek() {
                Some('/') => {
                    while chars.peek().is_some_and(|next| *next != '\n') {
                        chars.next();
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for next in chars.by_ref() {
                        if prev == '*' && next == '/' {
                            break;
                        }
                        prev = next;
                    }
                    out.push(' ');
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}

/// Splits a leading `layout(...)` qualifier off a statement.
fn split_layout(statement: &str) -> (Vec<(String, Option<u32>)>, &str) {
    let trimmed = statement.trim_start();
    let Some(rest) = trimmed.strip_prefix("layout") else {
        return (Vec::new(), trimmed);
    };
    let rest = rest.trim_start();
    let (Some(inner), Some(close)) = (rest.strip_prefix('('), rest.find(')')) else {
        return (Vec::new(), trimmed);
    };
    let qualifiers = inner[..close - 1]
        .split(',')
        .map(|item| {
            let mut kv = item.splitn(2, '=');
            let key = kv.next().unwrap_or_default().trim().to_owned();
            let value = kv.next().and_then(|v| v.trim().parse().ok());
            (key, value)
        })
        .collect();
    (qualifiers, &rest[close + 1..])
}

fn is_function(text: &str) -> bool {
    let (_, rest) = split_layout(text);
    match (rest.find('('), rest.find('{')) {
        (Some(paren), Some(brace)) => paren < brace,
        _ => false,
    }
}

fn top_level_statements(source: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for line in source.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        for c in line.chars() {
            match c {
                '{' => {
                    depth += 1;
                    current.push(c);
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                    if depth == 0 && is_function(&current) {
                        current.clear();
                    }
                }
                ';' if depth == 0 => {
                    statements.push(current.trim().to_owned());
                    current.clear();
                }
                _ => current.push(c),
            }
        }
        current.push(' ');
    }
    statements
}

/// `qualifiers type name[len]` -> (qualifiers, type, name, len).
fn parse_declarator(text: &str) -> Option<(Vec<&str>, &str, String, Option<u32>)> {
    let (head, array_len) = match text.find('[') {
        Some(open) => {
            let close = text[open..].find(']')? + open;
            (&text[..open], text[open + 1..close].trim().parse().ok())
        }
        None => (text, None),
    };
    let mut tokens: Vec<&str> = head.split_whitespace().collect();
    let name = tokens.pop()?.to_owned();
    let ty = tokens.pop()?;
    Some((tokens, ty, name, array_len))
}

fn parse_statement(statement: &str, is_vertex: bool, interface: &mut ShaderInterface) {
    let (layout, rest) = split_layout(statement);
    let location = layout
        .iter()
        .find(|(key, _)| key == "location")
        .and_then(|(_, value)| *value);

    if let (Some(open), Some(close)) = (rest.find('{'), rest.rfind('}')) {
        let head: Vec<&str> = rest[..open].split_whitespace().collect();
        if head.first() != Some(&"uniform") {
            return;
        }
        let Some(name) = head.get(1) else {
            return;
        };
        interface.blocks.push(parse_block(name, &rest[open + 1..close]));
        return;
    }

    let Some((qualifiers, ty, name, array_len)) = parse_declarator(rest) else {
        return;
    };
    let Some(gl_type) = gl_type_of(ty) else {
        return;
    };
    let declaration = Declaration {
        name,
        gl_type,
        array_len,
        location,
    };

    if qualifiers.contains(&"uniform") {
        interface.uniforms.push(declaration);
    } else if is_vertex && (qualifiers.contains(&"in") || qualifiers.contains(&"attribute")) {
        interface.inputs.push(declaration);
    }
}

fn parse_block(name: &str, body: &str) -> BlockDeclaration {
    let mut members = Vec::new();
    let mut cursor = 0u32;

    for member in body.split(';') {
        let Some((_, ty, member_name, array_len)) = parse_declarator(member) else {
            continue;
        };
        let Some(gl_type) = gl_type_of(ty) else {
            continue;
        };
        let (align, size) = std140(gl_type);
        let (align, size) = match array_len {
            Some(len) => (16, round_up(size, 16) * len),
            None => (align, size),
        };
        let offset = round_up(cursor, align);
        cursor = offset + size;
        members.push(ActiveBlockMember {
            name: member_name,
            gl_type,
            offset: offset as i32,
        });
    }

    BlockDeclaration {
        name: name.to_owned(),
        data_size: round_up(cursor, 16) as i32,
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
        #version 330 core
        // comment with in vec4 fake;
        layout(location = 0) in vec3 glsl_POSITION0;
        in vec2 glsl_TEXCOORD0;
        out vec2 uv;

        uniform mat4 model;
        uniform vec4 lights[4];

        layout(std140) uniform Camera {
            mat4 view;
            vec3 eye;
            float exposure;
        };

        void main() {
            uv = glsl_TEXCOORD0;
            gl_Position = model * vec4(glsl_POSITION0, 1.0);
        }
    "#;

    #[test]
    fn test_validate() {
        assert!(validate(VERTEX).is_ok());
        assert!(validate("void mainly() {}").is_err());
        let err = validate("#version 330\n#error unsupported\nvoid main() {}").unwrap_err();
        assert!(err.contains("0:2"));
        assert!(err.contains("unsupported"));
    }

    #[test]
    fn test_reflect_vertex_inputs() {
        // ACT
        let interface = reflect(VERTEX, true);

        // ASSERT
        let inputs: Vec<_> = interface.inputs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(inputs, vec!["glsl_POSITION0", "glsl_TEXCOORD0"]);
        assert_eq!(interface.inputs[0].location, Some(0));
        assert_eq!(interface.inputs[1].location, None);
        assert_eq!(interface.inputs[0].gl_type, glow::FLOAT_VEC3);
    }

    #[test]
    fn test_reflect_uniforms_and_arrays() {
        let interface = reflect(VERTEX, true);

        assert_eq!(interface.uniforms.len(), 2);
        assert_eq!(interface.uniforms[1].name, "lights");
        assert_eq!(interface.uniforms[1].array_len, Some(4));
    }

    #[test]
    fn test_fragment_inputs_are_not_attributes() {
        let interface = reflect("in vec2 uv; out vec4 color; void main() {}", false);
        assert!(interface.inputs.is_empty());
    }

    #[test]
    fn test_std140_block_offsets() {
        // ACT
        let interface = reflect(VERTEX, true);

        // ASSERT
        assert_eq!(interface.blocks.len(), 1);
        let block = &interface.blocks[0];
        assert_eq!(block.name, "Camera");
        let offsets: Vec<_> = block.members.iter().map(|m| m.offset).collect();
        assert_eq!(offsets, vec![0, 64, 76]);
        assert_eq!(block.data_size, 80);
    }

    #[test]
    fn test_array_members_use_16_byte_stride() {
        let interface = reflect(
            "uniform Block { float weights[3]; vec2 tail; }; void main() {}",
            false,
        );
        let block = &interface.blocks[0];
        assert_eq!(block.members[1].offset, 48);
        assert_eq!(block.data_size, 64);
    }
}
