use super::{DataType, TextureTarget};

/// Shape of one element of a reflected type: `cols` columns of `rows`
/// components each. Scalars and vectors have a single column.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TypeLayout {
    pub scalar: DataType,
    pub rows: u32,
    pub cols: u32,
}

impl TypeLayout {
    const fn new(scalar: DataType, rows: u32, cols: u32) -> Self {
        Self { scalar, rows, cols }
    }

    pub const fn components(self) -> u32 {
        self.rows * self.cols
    }

    /// Bytes taken by one element in a tightly packed client-side store.
    pub const fn byte_size(self) -> usize {
        self.components() as usize * self.scalar.size_of()
    }
}

/// Native entry point used to upload a uniform of a given type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UploadKind {
    Float1,
    Float2,
    Float3,
    Float4,
    Int1,
    Int2,
    Int3,
    Int4,
    UnsignedInt1,
    UnsignedInt2,
    UnsignedInt3,
    UnsignedInt4,
    Matrix2,
    Matrix3,
    Matrix4,
}

impl UploadKind {
    /// Name of the GL entry point, used to attribute driver errors.
    pub const fn entry_point(self) -> &'static str {
        match self {
            Self::Float1 => "glUniform1fv",
            Self::Float2 => "glUniform2fv",
            Self::Float3 => "glUniform3fv",
            Self::Float4 => "glUniform4fv",
            Self::Int1 => "glUniform1iv",
            Self::Int2 => "glUniform2iv",
            Self::Int3 => "glUniform3iv",
            Self::Int4 => "glUniform4iv",
            Self::UnsignedInt1 => "glUniform1uiv",
            Self::UnsignedInt2 => "glUniform2uiv",
            Self::UnsignedInt3 => "glUniform3uiv",
            Self::UnsignedInt4 => "glUniform4uiv",
            Self::Matrix2 => "glUniformMatrix2fv",
            Self::Matrix3 => "glUniformMatrix3fv",
            Self::Matrix4 => "glUniformMatrix4fv",
        }
    }
}

/// How an attribute of a given type is described to `glVertexAttrib*Pointer`.
///
/// Matrices take one location per column; `columns` pointers are issued at
/// consecutive locations, each with `components` values.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexPointer {
    pub components: i32,
    pub data_type: DataType,
    pub columns: u32,
}

impl VertexPointer {
    /// Byte distance between consecutive columns of one element.
    pub const fn column_bytes(self) -> usize {
        self.components as usize * self.data_type.size_of()
    }

    pub const fn is_integer(self) -> bool {
        self.data_type.is_integer()
    }
}

/// Type of an active attribute or uniform as reported by reflection.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    UnsignedInt,
    UnsignedIntVec2,
    UnsignedIntVec3,
    UnsignedIntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
}

impl ShaderType {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Float => glow::FLOAT,
            Self::FloatVec2 => glow::FLOAT_VEC2,
            Self::FloatVec3 => glow::FLOAT_VEC3,
            Self::FloatVec4 => glow::FLOAT_VEC4,
            Self::FloatMat2 => glow::FLOAT_MAT2,
            Self::FloatMat3 => glow::FLOAT_MAT3,
            Self::FloatMat4 => glow::FLOAT_MAT4,
            Self::Int => glow::INT,
            Self::IntVec2 => glow::INT_VEC2,
            Self::IntVec3 => glow::INT_VEC3,
            Self::IntVec4 => glow::INT_VEC4,
            Self::UnsignedInt => glow::UNSIGNED_INT,
            Self::UnsignedIntVec2 => glow::UNSIGNED_INT_VEC2,
            Self::UnsignedIntVec3 => glow::UNSIGNED_INT_VEC3,
            Self::UnsignedIntVec4 => glow::UNSIGNED_INT_VEC4,
            Self::Bool => glow::BOOL,
            Self::BoolVec2 => glow::BOOL_VEC2,
            Self::BoolVec3 => glow::BOOL_VEC3,
            Self::BoolVec4 => glow::BOOL_VEC4,
            Self::Sampler1D => glow::SAMPLER_1D,
            Self::Sampler2D => glow::SAMPLER_2D,
            Self::Sampler3D => glow::SAMPLER_3D,
            Self::SamplerCube => glow::SAMPLER_CUBE,
        }
    }

    /// Underlying numeric type and dimensions of one element.
    ///
    /// Booleans and samplers are stored as 32-bit integers, which is what the
    /// `glUniform*iv` upload path expects.
    pub const fn layout(self) -> TypeLayout {
        use DataType::{Float, Int, UnsignedInt};

        match self {
            Self::Float => TypeLayout::new(Float, 1, 1),
            Self::FloatVec2 => TypeLayout::new(Float, 2, 1),
            Self::FloatVec3 => TypeLayout::new(Float, 3, 1),
            Self::FloatVec4 => TypeLayout::new(Float, 4, 1),
            Self::FloatMat2 => TypeLayout::new(Float, 2, 2),
            Self::FloatMat3 => TypeLayout::new(Float, 3, 3),
            Self::FloatMat4 => TypeLayout::new(Float, 4, 4),
            Self::Int | Self::Bool => TypeLayout::new(Int, 1, 1),
            Self::IntVec2 | Self::BoolVec2 => TypeLayout::new(Int, 2, 1),
            Self::IntVec3 | Self::BoolVec3 => TypeLayout::new(Int, 3, 1),
            Self::IntVec4 | Self::BoolVec4 => TypeLayout::new(Int, 4, 1),
            Self::UnsignedInt => TypeLayout::new(UnsignedInt, 1, 1),
            Self::UnsignedIntVec2 => TypeLayout::new(UnsignedInt, 2, 1),
            Self::UnsignedIntVec3 => TypeLayout::new(UnsignedInt, 3, 1),
            Self::UnsignedIntVec4 => TypeLayout::new(UnsignedInt, 4, 1),
            Self::Sampler1D | Self::Sampler2D | Self::Sampler3D | Self::SamplerCube => {
                TypeLayout::new(Int, 1, 1)
            }
        }
    }

    /// Bytes per element; uniform stores are `byte_size() * array size`.
    pub const fn byte_size(self) -> usize {
        self.layout().byte_size()
    }

    pub const fn upload(self) -> UploadKind {
        match self {
            Self::Float => UploadKind::Float1,
            Self::FloatVec2 => UploadKind::Float2,
            Self::FloatVec3 => UploadKind::Float3,
            Self::FloatVec4 => UploadKind::Float4,
            Self::FloatMat2 => UploadKind::Matrix2,
            Self::FloatMat3 => UploadKind::Matrix3,
            Self::FloatMat4 => UploadKind::Matrix4,
            Self::Int | Self::Bool => UploadKind::Int1,
            Self::IntVec2 | Self::BoolVec2 => UploadKind::Int2,
            Self::IntVec3 | Self::BoolVec3 => UploadKind::Int3,
            Self::IntVec4 | Self::BoolVec4 => UploadKind::Int4,
            Self::UnsignedInt => UploadKind::UnsignedInt1,
            Self::UnsignedIntVec2 => UploadKind::UnsignedInt2,
            Self::UnsignedIntVec3 => UploadKind::UnsignedInt3,
            Self::UnsignedIntVec4 => UploadKind::UnsignedInt4,
            Self::Sampler1D | Self::Sampler2D | Self::Sampler3D | Self::SamplerCube => {
                UploadKind::Int1
            }
        }
    }

    /// Texture target a sampler of this type reads from.
    pub const fn sampler_target(self) -> Option<TextureTarget> {
        match self {
            Self::Sampler1D => Some(TextureTarget::Texture1D),
            Self::Sampler2D => Some(TextureTarget::Texture2D),
            Self::Sampler3D => Some(TextureTarget::Texture3D),
            Self::SamplerCube => Some(TextureTarget::CubeMap),
            _ => None,
        }
    }

    pub const fn is_sampler(self) -> bool {
        self.sampler_target().is_some()
    }

    /// Attribute pointer description, or `None` for types that cannot be
    /// vertex inputs (booleans, samplers).
    pub const fn vertex_pointer(self) -> Option<VertexPointer> {
        match self {
            Self::Bool
            | Self::BoolVec2
            | Self::BoolVec3
            | Self::BoolVec4
            | Self::Sampler1D
            | Self::Sampler2D
            | Self::Sampler3D
            | Self::SamplerCube => None,
            _ => {
                let layout = self.layout();
                Some(VertexPointer {
                    components: layout.rows as i32,
                    data_type: layout.scalar,
                    columns: layout.cols,
                })
            }
        }
    }
}

impl TryFrom<u32> for ShaderType {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Ok(match code {
            glow::FLOAT => Self::Float,
            glow::FLOAT_VEC2 => Self::FloatVec2,
            glow::FLOAT_VEC3 => Self::FloatVec3,
            glow::FLOAT_VEC4 => Self::FloatVec4,
            glow::FLOAT_MAT2 => Self::FloatMat2,
            glow::FLOAT_MAT3 => Self::FloatMat3,
            glow::FLOAT_MAT4 => Self::FloatMat4,
            glow::INT => Self::Int,
            glow::INT_VEC2 => Self::IntVec2,
            glow::INT_VEC3 => Self::IntVec3,
            glow::INT_VEC4 => Self::IntVec4,
            glow::UNSIGNED_INT => Self::UnsignedInt,
            glow::UNSIGNED_INT_VEC2 => Self::UnsignedIntVec2,
            glow::UNSIGNED_INT_VEC3 => Self::UnsignedIntVec3,
            glow::UNSIGNED_INT_VEC4 => Self::UnsignedIntVec4,
            glow::BOOL => Self::Bool,
            glow::BOOL_VEC2 => Self::BoolVec2,
            glow::BOOL_VEC3 => Self::BoolVec3,
            glow::BOOL_VEC4 => Self::BoolVec4,
            glow::SAMPLER_1D => Self::Sampler1D,
            glow::SAMPLER_2D => Self::Sampler2D,
            glow::SAMPLER_3D => Self::Sampler3D,
            glow::SAMPLER_CUBE => Self::SamplerCube,
            other => return Err(other),
        })
    }
}
