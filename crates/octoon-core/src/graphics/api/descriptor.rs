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

//! Descriptor pool and layout descriptors.

use std::rc::Rc;

use super::uniform::{GraphicsParam, UniformType};

/// How many descriptors of one type a pool reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorPoolComponent {
    /// Descriptor type.
    pub uniform_type: UniformType,
    /// Count.
    pub count: u32,
}

/// A descriptor pool. OpenGL keeps no native state for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescriptorPoolDesc {
    /// Maximum number of sets allocated from this pool.
    pub max_sets: u32,
    /// Per-type reservations.
    pub pool_components: Vec<DescriptorPoolComponent>,
}

/// The parameters a descriptor set exposes, usually taken from a linked program.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSetLayoutDesc {
    /// Shared parameter records.
    pub params: Vec<Rc<GraphicsParam>>,
}

impl DescriptorSetLayoutDesc {
    /// A layout over the given parameters.
    pub fn new(params: Vec<Rc<GraphicsParam>>) -> Self {
        Self { params }
    }

    /// Finds a parameter by name.
    pub fn find(&self, name: &str) -> Option<&Rc<GraphicsParam>> {
        self.params.iter().find(|p| p.name() == name)
    }
}
