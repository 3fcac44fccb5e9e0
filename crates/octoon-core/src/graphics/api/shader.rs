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

//! Shader stage descriptors.

use super::enums::{ShaderLang, ShaderModel, ShaderStage};

/// Everything needed to create one shader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDesc {
    /// Stage.
    pub stage: ShaderStage,
    /// Language of `bytecodes`.
    pub lang: ShaderLang,
    /// Target model for cross-compilation.
    pub model: ShaderModel,
    /// Source text or compiled byte code.
    pub bytecodes: Vec<u8>,
    /// Entry point, used by the cross-compiler.
    pub entry_point: String,
}

impl ShaderDesc {
    /// A GLSL stage from source text.
    pub fn glsl(stage: ShaderStage, source: &str) -> Self {
        Self {
            stage,
            lang: ShaderLang::Glsl,
            model: ShaderModel::default(),
            bytecodes: source.as_bytes().to_vec(),
            entry_point: "main".to_owned(),
        }
    }

    /// An HLSL stage from source text, translated through the device's shader translator.
    pub fn hlsl(stage: ShaderStage, source: &str, entry_point: &str) -> Self {
        Self {
            stage,
            lang: ShaderLang::Hlsl,
            model: ShaderModel::default(),
            bytecodes: source.as_bytes().to_vec(),
            entry_point: entry_point.to_owned(),
        }
    }
}
