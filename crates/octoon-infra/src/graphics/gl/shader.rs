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

//! Individual shader stages.

use std::cell::Cell;
use std::fmt;

use octoon_core::graphics::api::{ShaderDesc, ShaderLang};
use octoon_core::graphics::error::ResourceError;
use octoon_core::graphics::traits::ShaderTranslator;

use super::shared::GlShared;
use super::types::IntoGl;

/// A compiled shader stage. Programs attach it; they do not consume it.
pub struct GlShader {
    shared: GlShared,
    handle: Cell<u32>,
    desc: ShaderDesc,
}

impl GlShader {
    /// Compiles `desc`. HLSL input goes through `translator` first.
    pub fn setup(
        shared: &GlShared,
        desc: ShaderDesc,
        translator: Option<&dyn ShaderTranslator>,
    ) -> Result<Self, ResourceError> {
        let source = match desc.lang {
            ShaderLang::Glsl => String::from_utf8(desc.bytecodes.clone()).map_err(|_| {
                shared.fail(ResourceError::InvalidDescriptor(
                    "GLSL source is not valid UTF-8".to_owned(),
                ))
            })?,
            ShaderLang::Hlsl | ShaderLang::HlslBytecodes => match translator {
                Some(translator) => translator
                    .translate(&desc)
                    .map_err(|msg| shared.fail(ResourceError::Compile(msg)))?,
                None => {
                    return Err(shared.fail(ResourceError::Compile(
                        "Can't conv hlsl to glsl.".to_owned(),
                    )));
                }
            },
            ShaderLang::None => {
                return Err(shared.fail(ResourceError::Unsupported(
                    "shader language is not set".to_owned(),
                )));
            }
        };

        let gl = shared.gl();
        let handle = gl.create_shader(desc.stage.into_gl());
        if handle == 0 {
            return Err(shared.fail(ResourceError::NativeAllocation("glCreateShader")));
        }
        let shader = Self {
            shared: shared.clone(),
            handle: Cell::new(handle),
            desc,
        };

        gl.shader_source(handle, &source);
        gl.compile_shader(handle);
        if !gl.shader_compile_status(handle) {
            let log = gl.shader_info_log(handle);
            return Err(shared.fail(ResourceError::Compile(log)));
        }

        log::debug!("GlShader: Compiled {:?} stage as shader {}", shader.desc.stage, handle);
        Ok(shader)
    }

    /// The native shader name, 0 once closed.
    pub fn instance_id(&self) -> u32 {
        self.handle.get()
    }

    /// The descriptor this stage was compiled from.
    pub fn desc(&self) -> &ShaderDesc {
        &self.desc
    }

    /// Deletes the native shader. Later calls do nothing.
    pub fn close(&self) {
        let handle = self.handle.replace(0);
        if handle != 0 {
            self.shared.gl().delete_shader(handle);
        }
    }
}

impl Drop for GlShader {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GlShader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlShader")
            .field("handle", &self.handle.get())
            .field("stage", &self.desc.stage)
            .field("lang", &self.desc.lang)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::shared::testing::headless;
    use crate::graphics::gl::shared::GlVariant;
    use octoon_core::graphics::api::ShaderStage;

    struct Passthrough;

    impl ShaderTranslator for Passthrough {
        fn translate(&self, desc: &ShaderDesc) -> Result<String, String> {
            let text = String::from_utf8_lossy(&desc.bytecodes);
            Ok(format!("#version 330 core\n// from {}\n{text}", desc.entry_point))
        }
    }

    struct Refuses;

    impl ShaderTranslator for Refuses {
        fn translate(&self, _desc: &ShaderDesc) -> Result<String, String> {
            Err("unsupported intrinsic".to_owned())
        }
    }

    #[test]
    fn test_glsl_compiles() {
        // ARRANGE
        let (driver, sink, shared) = headless(GlVariant::Core);
        let desc = ShaderDesc::glsl(
            ShaderStage::Vertex,
            "void main() { gl_Position = vec4(0.0); }",
        );

        // ACT
        let shader = GlShader::setup(&shared, desc, None).unwrap();

        // ASSERT
        assert_ne!(shader.instance_id(), 0);
        let created = driver.calls_named("create_shader");
        assert_eq!(created[0].args[0], i64::from(glow::VERTEX_SHADER));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_compile_error_reports_info_log() {
        // ARRANGE
        let (driver, sink, shared) = headless(GlVariant::Legacy);
        let desc = ShaderDesc::glsl(ShaderStage::Fragment, "#error broken stage\nvoid main() {}");

        // ACT
        let result = GlShader::setup(&shared, desc, None);

        // ASSERT
        match result {
            Err(ResourceError::Compile(log)) => assert!(log.contains("broken stage")),
            other => panic!("expected a compile error, got {other:?}"),
        }
        assert_eq!(sink.len(), 1);
        assert_eq!(driver.count("delete_shader"), 1);
    }

    #[test]
    fn test_hlsl_without_translator_fails() {
        let (driver, sink, shared) = headless(GlVariant::Core);
        let desc = ShaderDesc::hlsl(ShaderStage::Vertex, "float4 main() : SV_POSITION", "main");

        let result = GlShader::setup(&shared, desc, None);

        assert!(matches!(result, Err(ResourceError::Compile(_))));
        assert_eq!(sink.messages(), vec!["Shader compile error: Can't conv hlsl to glsl."]);
        assert_eq!(driver.count("create_shader"), 0);
    }

    #[test]
    fn test_hlsl_goes_through_translator() {
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let desc = ShaderDesc::hlsl(ShaderStage::Fragment, "void main() {}", "ps_main");

        let shader = GlShader::setup(&shared, desc, Some(&Passthrough)).unwrap();

        assert_eq!(shader.desc().entry_point, "ps_main");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_translator_failure_is_a_compile_error() {
        let (_driver, sink, shared) = headless(GlVariant::Core);
        let desc = ShaderDesc::hlsl(ShaderStage::Fragment, "void main() {}", "main");

        let result = GlShader::setup(&shared, desc, Some(&Refuses));

        assert!(
            matches!(result, Err(ResourceError::Compile(msg)) if msg == "unsupported intrinsic")
        );
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (driver, sink, shared) = headless(GlVariant::Legacy);
        let shader =
            GlShader::setup(&shared, ShaderDesc::glsl(ShaderStage::Vertex, "void main() {}"), None)
                .unwrap();

        shader.close();
        shader.close();
        drop(shader);

        assert_eq!(driver.count("delete_shader"), 1);
        assert!(sink.is_empty());
    }
}
