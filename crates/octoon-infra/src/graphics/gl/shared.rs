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

//! State every GL object created by one device shares.

use std::fmt;
use std::rc::Rc;

use octoon_core::graphics::api::DeviceProperties;
use octoon_core::graphics::traits::DiagnosticsSink;

use super::driver::GlDriver;

/// Which GL binding model the device drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlVariant {
    /// Global bind points (`glBindTexture` then `glTexImage2D`).
    Legacy,
    /// Direct state access on named objects (GL 4.5).
    Core,
}

/// Driver, diagnostics and capabilities handed to every resource at setup.
///
/// Resources keep a clone instead of a reference to the device, so the
/// only thing they can reach back into is the diagnostics sink.
#[derive(Clone)]
pub struct GlShared {
    driver: Rc<dyn GlDriver>,
    sink: Rc<dyn DiagnosticsSink>,
    properties: Rc<DeviceProperties>,
    variant: GlVariant,
    bindless: bool,
}

impl GlShared {
    /// Bundles the pieces a device hands out.
    pub fn new(
        driver: Rc<dyn GlDriver>,
        sink: Rc<dyn DiagnosticsSink>,
        properties: Rc<DeviceProperties>,
        variant: GlVariant,
        bindless: bool,
    ) -> Self {
        Self {
            driver,
            sink,
            properties,
            variant,
            bindless,
        }
    }

    /// The native driver.
    pub fn gl(&self) -> &dyn GlDriver {
        self.driver.as_ref()
    }

    /// The driver as a shared handle.
    pub fn driver(&self) -> &Rc<dyn GlDriver> {
        &self.driver
    }

    /// The diagnostics sink.
    pub fn sink(&self) -> &Rc<dyn DiagnosticsSink> {
        &self.sink
    }

    /// Probed device capabilities.
    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    /// The binding model in use.
    pub fn variant(&self) -> GlVariant {
        self.variant
    }

    /// `true` when vertex buffers are addressed through NV unified memory.
    pub fn bindless(&self) -> bool {
        self.bindless
    }

    /// Sends the error's text to the sink and hands the error back, so a
    /// failure path reads `return Err(shared.fail(err))`.
    pub fn fail<E: fmt::Display>(&self, err: E) -> E {
        self.sink.message(&err.to_string());
        err
    }
}

impl fmt::Debug for GlShared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlShared")
            .field("variant", &self.variant)
            .field("bindless", &self.bindless)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::rc::Rc;

    use octoon_core::graphics::traits::MemorySink;

    use super::{GlShared, GlVariant};
    use crate::graphics::gl::headless::HeadlessDriver;
    use crate::graphics::gl::property::query_properties;

    /// A headless driver, a capturing sink and the shared state built over them.
    pub(crate) fn headless_with(
        driver: HeadlessDriver,
        variant: GlVariant,
        bindless: bool,
    ) -> (Rc<HeadlessDriver>, Rc<MemorySink>, GlShared) {
        let driver = Rc::new(driver);
        let sink = Rc::new(MemorySink::new());
        let properties = Rc::new(query_properties(driver.as_ref()));
        let shared = GlShared::new(driver.clone(), sink.clone(), properties, variant, bindless);
        (driver, sink, shared)
    }

    pub(crate) fn headless(variant: GlVariant) -> (Rc<HeadlessDriver>, Rc<MemorySink>, GlShared) {
        headless_with(HeadlessDriver::new(), variant, false)
    }
}
