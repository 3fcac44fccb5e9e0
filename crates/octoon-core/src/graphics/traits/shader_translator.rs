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

use crate::graphics::api::shader::ShaderDesc;

/// Converts non-GLSL shader input into GLSL source.
///
/// The graphics layer treats the translator as opaque: the returned text is
/// compiled as-is.
pub trait ShaderTranslator {
    /// Translates `desc.bytecodes` for `desc.stage`, or returns the reason it could not.
    fn translate(&self, desc: &ShaderDesc) -> Result<String, String>;
}
