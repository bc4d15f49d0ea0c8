use std::fmt;

/// One compilable shader unit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
    Compute,
}

impl ShaderStage {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
            Self::Geometry => glow::GEOMETRY_SHADER,
            Self::TessControl => glow::TESS_CONTROL_SHADER,
            Self::TessEvaluation => glow::TESS_EVALUATION_SHADER,
            Self::Compute => glow::COMPUTE_SHADER,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
            Self::TessControl => "tessellation control",
            Self::TessEvaluation => "tessellation evaluation",
            Self::Compute => "compute",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Texture binding point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureTarget {
    Texture1D,
    Texture2D,
    Texture3D,
    CubeMap,
}

impl TextureTarget {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Texture1D => glow::TEXTURE_1D,
            Self::Texture2D => glow::TEXTURE_2D,
            Self::Texture3D => glow::TEXTURE_3D,
            Self::CubeMap => glow::TEXTURE_CUBE_MAP,
        }
    }
}
