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

use std::cell::Cell;

use octoon_core::graphics::api::{
    DeviceProperties, SamplerAnis, SamplerDesc, SamplerFilter, SamplerWrap,
};
use octoon_core::graphics::error::{ResourceError, TranslateError};

use super::ext;
use super::shared::GlShared;
use super::types;

/// Wrap, filter and anisotropy values resolved to GL enums.
///
/// Shared by sampler objects and by the parameters a texture carries itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SamplerParams {
    wrap: u32,
    min_filter: u32,
    mag_filter: u32,
    anisotropy: Option<f32>,
}

impl SamplerParams {
    pub(crate) fn resolve(
        wrap: SamplerWrap,
        min_filter: SamplerFilter,
        mag_filter: SamplerFilter,
        anis: SamplerAnis,
        properties: &DeviceProperties,
    ) -> Result<Self, TranslateError> {
        let wrap = types::require(types::as_sampler_wrap(wrap), "sampler wrap", wrap)?;
        let min = types::require(
            types::as_sampler_min_filter(min_filter),
            "sampler min filter",
            min_filter,
        )?;
        let mag = types::require(
            types::as_sampler_mag_filter(mag_filter),
            "sampler mag filter",
            mag_filter,
        )?;

        let anisotropy = match types::as_sampler_anis(anis) {
            Some(level) if properties.has_anisotropy => {
                Some(level.min(properties.max_sampler_anisotropy))
            }
            Some(_) => {
                log::debug!("GlSampler: Anisotropy {anis:?} ignored, extension unavailable");
                None
            }
            None => None,
        };

        Ok(Self {
            wrap,
            min_filter: min,
            mag_filter: mag,
            anisotropy,
        })
    }

    /// Issues one integer call per wrap axis and filter, then the anisotropy.
    pub(crate) fn apply(&self, set_i: impl Fn(u32, i32), set_f: impl Fn(u32, f32)) {
        set_i(glow::TEXTURE_WRAP_S, self.wrap as i32);
        set_i(glow::TEXTURE_WRAP_T, self.wrap as i32);
        set_i(glow::TEXTURE_WRAP_R, self.wrap as i32);
        set_i(glow::TEXTURE_MIN_FILTER, self.min_filter as i32);
        set_i(glow::TEXTURE_MAG_FILTER, self.mag_filter as i32);
        if let Some(level) = self.anisotropy {
            set_f(ext::TEXTURE_MAX_ANISOTROPY_EXT, level);
        }
    }
}

/// A native sampler object, bound next to a texture by descriptor sets.
#[derive(Debug)]
pub struct GlSampler {
    shared: GlShared,
    handle: Cell<u32>,
    desc: SamplerDesc,
}

impl GlSampler {
    /// Validates `desc` and creates the sampler object.
    pub fn setup(shared: &GlShared, desc: SamplerDesc) -> Result<Self, ResourceError> {
        let params = SamplerParams::resolve(
            desc.wrap,
            desc.min_filter,
            desc.mag_filter,
            desc.anis,
            shared.properties(),
        )
        .map_err(|err| shared.fail(ResourceError::from(err)))?;

        let gl = shared.gl();
        let handle = gl.gen_sampler();
        if handle == 0 {
            return Err(shared.fail(ResourceError::NativeAllocation("glGenSamplers")));
        }
        params.apply(
            |pname, value| gl.sampler_parameter_i(handle, pname, value),
            |pname, value| gl.sampler_parameter_f(handle, pname, value),
        );

        Ok(Self {
            shared: shared.clone(),
            handle: Cell::new(handle),
            desc,
        })
    }

    /// The native sampler name, 0 once closed.
    pub fn instance_id(&self) -> u32 {
        self.handle.get()
    }

    /// The descriptor this sampler was built from.
    pub fn desc(&self) -> &SamplerDesc {
        &self.desc
    }

    /// Binds the sampler to texture unit `unit`.
    pub(crate) fn bind(&self, unit: u32) {
        self.shared.gl().bind_sampler(unit, self.handle.get());
    }

    /// Deletes the sampler. Later calls do nothing.
    pub fn close(&self) {
        let handle = self.handle.replace(0);
        if handle != 0 {
            self.shared.gl().delete_sampler(handle);
        }
    }
}

impl Drop for GlSampler {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::gl::shared::testing::{headless, headless_with};
    use crate::graphics::gl::shared::GlVariant;
    use crate::graphics::gl::HeadlessDriver;

    #[test]
    fn test_setup_sets_every_parameter() {
        // ARRANGE
        let (driver, _sink, shared) = headless(GlVariant::Core);
        let desc = SamplerDesc {
            wrap: SamplerWrap::ClampToEdge,
            min_filter: SamplerFilter::LinearMipmapLinear,
            mag_filter: SamplerFilter::LinearMipmapLinear,
            anis: SamplerAnis::Anis4,
        };

        // ACT
        let sampler = GlSampler::setup(&shared, desc).unwrap();

        // ASSERT
        let ints = driver.calls_named("sampler_parameter_i");
        assert_eq!(ints.len(), 5);
        assert!(ints.iter().all(|call| call.args[0] == i64::from(sampler.instance_id())));
        assert_eq!(ints[3].args[2], i64::from(glow::LINEAR_MIPMAP_LINEAR));
        assert_eq!(ints[4].args[2], i64::from(glow::LINEAR));
        let floats = driver.calls_named("sampler_parameter_f");
        assert_eq!(floats.len(), 1);
        assert_eq!(floats[0].args[2], i64::from(4.0f32.to_bits()));
    }

    #[test]
    fn test_anisotropy_is_clamped_to_device_limit() {
        let (_driver, _sink, shared) = headless(GlVariant::Legacy);
        let params = SamplerParams::resolve(
            SamplerWrap::Repeat,
            SamplerFilter::Linear,
            SamplerFilter::Linear,
            SamplerAnis::Anis64,
            shared.properties(),
        )
        .unwrap();
        assert_eq!(params.anisotropy, Some(16.0));
    }

    #[test]
    fn test_anisotropy_skipped_without_extension() {
        let driver = HeadlessDriver::new().without_extension(ext::EXT_TEXTURE_FILTER_ANISOTROPIC);
        let (driver, _sink, shared) = headless_with(driver, GlVariant::Legacy, false);
        let desc = SamplerDesc {
            anis: SamplerAnis::Anis8,
            ..SamplerDesc::default()
        };

        GlSampler::setup(&shared, desc).unwrap();

        assert_eq!(driver.count("sampler_parameter_f"), 0);
    }

    #[test]
    fn test_unmapped_wrap_fails_before_allocation() {
        let (driver, sink, shared) = headless(GlVariant::Legacy);
        let desc = SamplerDesc {
            wrap: SamplerWrap::None,
            ..SamplerDesc::default()
        };

        let result = GlSampler::setup(&shared, desc);

        assert!(matches!(result, Err(ResourceError::Translate(_))));
        assert_eq!(driver.count("gen_sampler"), 0);
        assert_eq!(sink.messages(), vec!["Can't translate sampler wrap: None".to_owned()]);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (driver, _sink, shared) = headless(GlVariant::Legacy);
        let sampler = GlSampler::setup(&shared, SamplerDesc::default()).unwrap();
        sampler.close();
        sampler.close();
        drop(sampler);
        assert_eq!(driver.count("delete_sampler"), 1);
    }
}
