use crate::context::Context;
use crate::driver::RawName;
use crate::error::Result;

use super::{Handle, ObjectKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl Filter {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Nearest => glow::NEAREST,
            Self::Linear => glow::LINEAR,
            Self::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
            Self::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
            Self::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
            Self::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Wrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

impl Wrap {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Repeat => glow::REPEAT,
            Self::MirroredRepeat => glow::MIRRORED_REPEAT,
            Self::ClampToEdge => glow::CLAMP_TO_EDGE,
            Self::ClampToBorder => glow::CLAMP_TO_BORDER,
        }
    }
}

/// Sampling state; `wrap` applies to S, T and R alike.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SamplerDesc {
    pub min_filter: Filter,
    /// Only `Nearest` and `Linear` are valid; the driver rejects the rest.
    pub mag_filter: Filter,
    pub wrap: Wrap,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            wrap: Wrap::Repeat,
        }
    }
}

/// Sampler object. Overrides the sampling state of whatever texture shares
/// its unit.
#[derive(Debug, Clone)]
pub struct Sampler {
    handle: Handle,
    desc: SamplerDesc,
}

impl Sampler {
    pub fn new(ctx: &Context, desc: SamplerDesc) -> Result<Self> {
        let handle = Handle::create(ctx.driver(), ObjectKind::Sampler)?;

        let parameters = [
            (glow::TEXTURE_MIN_FILTER, desc.min_filter.to_gl()),
            (glow::TEXTURE_MAG_FILTER, desc.mag_filter.to_gl()),
            (glow::TEXTURE_WRAP_S, desc.wrap.to_gl()),
            (glow::TEXTURE_WRAP_T, desc.wrap.to_gl()),
            (glow::TEXTURE_WRAP_R, desc.wrap.to_gl()),
        ];
        for (parameter, value) in parameters {
            ctx.gl()
                .sampler_parameter_i32(handle.name(), parameter, value as i32);
            ctx.check("glSamplerParameteri")?;
        }

        Ok(Self { handle, desc })
    }

    /// Binds the sampler to texture unit `unit` through the dispatcher.
    pub fn bind(&self, ctx: &mut Context, unit: u32) -> Result<()> {
        ctx.bind_sampler_unit(unit, Some(&self.handle))
    }

    pub fn desc(&self) -> SamplerDesc {
        self.desc
    }

    pub fn name(&self) -> RawName {
        self.handle.name()
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}
