/// Numeric component type as seen by the driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DataType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    HalfFloat,
    Float,
    Double,
}

impl DataType {
    /// Width of one component in bytes.
    pub const fn size_of(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort | Self::HalfFloat => 2,
            Self::Int | Self::UnsignedInt | Self::Float => 4,
            Self::Double => 8,
        }
    }

    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Byte => glow::BYTE,
            Self::UnsignedByte => glow::UNSIGNED_BYTE,
            Self::Short => glow::SHORT,
            Self::UnsignedShort => glow::UNSIGNED_SHORT,
            Self::Int => glow::INT,
            Self::UnsignedInt => glow::UNSIGNED_INT,
            Self::HalfFloat => glow::HALF_FLOAT,
            Self::Float => glow::FLOAT,
            Self::Double => glow::DOUBLE,
        }
    }

    /// Integer types go through the `I` attribute pointer path.
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::HalfFloat | Self::Float | Self::Double)
    }
}

impl TryFrom<u32> for DataType {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Ok(match code {
            glow::BYTE => Self::Byte,
            glow::UNSIGNED_BYTE => Self::UnsignedByte,
            glow::SHORT => Self::Short,
            glow::UNSIGNED_SHORT => Self::UnsignedShort,
            glow::INT => Self::Int,
            glow::UNSIGNED_INT => Self::UnsignedInt,
            glow::HALF_FLOAT => Self::HalfFloat,
            glow::FLOAT => Self::Float,
            glow::DOUBLE => Self::Double,
            other => return Err(other),
        })
    }
}
