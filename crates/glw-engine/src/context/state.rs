use bitflags::bitflags;

bitflags! {
    /// Framebuffer planes cleared by [`Context::clear`](super::Context::clear).
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR = glow::COLOR_BUFFER_BIT;
        const DEPTH = glow::DEPTH_BUFFER_BIT;
        const STENCIL = glow::STENCIL_BUFFER_BIT;
    }
}

/// Fixed-function switches routed through the context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Capability {
    Blend,
    CullFace,
    DepthTest,
    ScissorTest,
    StencilTest,
    ProgramPointSize,
    FramebufferSrgb,
}

impl Capability {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Blend => glow::BLEND,
            Self::CullFace => glow::CULL_FACE,
            Self::DepthTest => glow::DEPTH_TEST,
            Self::ScissorTest => glow::SCISSOR_TEST,
            Self::StencilTest => glow::STENCIL_TEST,
            Self::ProgramPointSize => glow::PROGRAM_POINT_SIZE,
            Self::FramebufferSrgb => glow::FRAMEBUFFER_SRGB,
        }
    }
}

/// Primitive assembly mode of a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Topology {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Points => glow::POINTS,
            Self::Lines => glow::LINES,
            Self::LineStrip => glow::LINE_STRIP,
            Self::LineLoop => glow::LINE_LOOP,
            Self::Triangles => glow::TRIANGLES,
            Self::TriangleStrip => glow::TRIANGLE_STRIP,
            Self::TriangleFan => glow::TRIANGLE_FAN,
        }
    }
}

/// Element type of an index buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::U8 => glow::UNSIGNED_BYTE,
            Self::U16 => glow::UNSIGNED_SHORT,
            Self::U32 => glow::UNSIGNED_INT,
        }
    }

    pub const fn size_of(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Counters kept by the dispatcher.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DispatchStats {
    /// `glUseProgram` calls issued.
    pub program_binds: u64,
    /// Activations skipped because the program was already current.
    pub program_binds_elided: u64,
    /// `glBindTexture`/`glBindSampler` calls issued.
    pub texture_binds: u64,
    /// Unit binds skipped because the unit already held the object.
    pub texture_binds_elided: u64,
    pub draw_calls: u64,
}
