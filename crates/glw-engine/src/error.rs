//! Error taxonomy.
//!
//! - [`ValidationError`]: rejected before any driver call; the offending call
//!   is a no-op.
//! - `Compile` / `Link`: shader build failures, also written to the program log.
//! - `Driver`: the error query reported a failure right after `call`.

use std::fmt;

use thiserror::Error;

use crate::driver::Driver;
use crate::resource::ObjectKind;
use crate::types::{ShaderStage, TextureTarget};

pub type Result<T, E = GlError> = std::result::Result<T, E>;

/// Error code returned by `glGetError`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DriverErrorCode {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    StackOverflow,
    StackUnderflow,
    OutOfMemory,
    InvalidFramebufferOperation,
    Unknown(u32),
}

impl DriverErrorCode {
    /// Maps a raw code; `NO_ERROR` maps to `None`.
    pub const fn from_raw(code: u32) -> Option<Self> {
        Some(match code {
            glow::NO_ERROR => return None,
            glow::INVALID_ENUM => Self::InvalidEnum,
            glow::INVALID_VALUE => Self::InvalidValue,
            glow::INVALID_OPERATION => Self::InvalidOperation,
            glow::STACK_OVERFLOW => Self::StackOverflow,
            glow::STACK_UNDERFLOW => Self::StackUnderflow,
            glow::OUT_OF_MEMORY => Self::OutOfMemory,
            glow::INVALID_FRAMEBUFFER_OPERATION => Self::InvalidFramebufferOperation,
            other => Self::Unknown(other),
        })
    }

    pub const fn raw(self) -> u32 {
        match self {
            Self::InvalidEnum => glow::INVALID_ENUM,
            Self::InvalidValue => glow::INVALID_VALUE,
            Self::InvalidOperation => glow::INVALID_OPERATION,
            Self::StackOverflow => glow::STACK_OVERFLOW,
            Self::StackUnderflow => glow::STACK_UNDERFLOW,
            Self::OutOfMemory => glow::OUT_OF_MEMORY,
            Self::InvalidFramebufferOperation => glow::INVALID_FRAMEBUFFER_OPERATION,
            Self::Unknown(code) => code,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidEnum => "invalid enum",
            Self::InvalidValue => "invalid value",
            Self::InvalidOperation => "invalid operation",
            Self::StackOverflow => "stack overflow",
            Self::StackUnderflow => "stack underflow",
            Self::OutOfMemory => "out of memory",
            Self::InvalidFramebufferOperation => "invalid framebuffer operation",
            Self::Unknown(_) => "unknown error",
        }
    }
}

impl fmt::Display for DriverErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.as_str(), self.raw())
    }
}

/// Caller mistakes caught before touching the driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a program needs at least one shader stage")]
    NoShaderStages,

    #[error("program is not linked")]
    NotLinked,

    #[error("no active attribute named `{0}`")]
    UnknownAttribute(String),

    #[error("no active uniform named `{0}`")]
    UnknownUniform(String),

    #[error("slot index {0} does not exist in this program")]
    UnknownSlot(usize),

    #[error("uniform `{name}` holds {capacity} bytes, {requested} requested")]
    UniformOverflow {
        name: String,
        capacity: usize,
        requested: usize,
    },

    #[error("uniform `{0}` is not a sampler")]
    NotASampler(String),

    #[error("sampler `{name}` reads {expected:?}, texture is {found:?}")]
    SamplerTargetMismatch {
        name: String,
        expected: TextureTarget,
        found: TextureTarget,
    },

    #[error("texture unit {unit} out of range (context has {available})")]
    TextureUnitOutOfRange { unit: u32, available: u32 },

    #[error("range {offset}..{end} exceeds {size} bytes", end = range_end(.offset, .len))]
    OutOfRange {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("expected {expected} bytes of data, got {found}")]
    DataLength { expected: usize, found: usize },

    #[error("operation needs a {expected:?} texture, this one is {found:?}")]
    WrongTextureTarget {
        expected: TextureTarget,
        found: TextureTarget,
    },

    #[error("vertex range {start}..{end} is inverted")]
    InvertedRange { start: u32, end: u32 },

    #[error("value {0} does not fit a GL integer")]
    ValueTooLarge(usize),
}

#[derive(Debug, Error)]
pub enum GlError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("compile error in {stage} stage: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("link error: {log}")]
    Link { log: String },

    #[error("{call} failed: {code}")]
    Driver {
        call: &'static str,
        code: DriverErrorCode,
    },

    #[error("`{name}` has unsupported type 0x{code:04X}")]
    UnsupportedType { name: String, code: u32 },

    #[error("failed to create {kind:?} object: {message}")]
    Create { kind: ObjectKind, message: String },

    #[error("failed to read shader source: {0}")]
    Io(#[from] std::io::Error),
}

impl GlError {
    /// Driver error code, if this is a driver failure.
    pub fn driver_code(&self) -> Option<DriverErrorCode> {
        match self {
            Self::Driver { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Consults the error query right after `call`.
pub(crate) fn check(gl: &dyn Driver, call: &'static str) -> Result<()> {
    match DriverErrorCode::from_raw(gl.get_error()) {
        None => Ok(()),
        Some(code) => {
            log::debug!("{call}: {code}");
            Err(GlError::Driver { call, code })
        }
    }
}

fn range_end(offset: &usize, len: &usize) -> usize {
    offset.saturating_add(*len)
}

/// Converts a size or offset to the `GLint`/`GLsizei` the driver expects.
pub(crate) fn gl_int(value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| ValidationError::ValueTooLarge(value).into())
}
