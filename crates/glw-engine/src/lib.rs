//! glw engine crate.
//!
//! Owned OpenGL objects, reflected shader programs with deferred uniform and
//! attribute binding, and a draw dispatcher that skips redundant state changes.
//! The crate expects a loaded, current GL 3.3+ context; window and context
//! creation are left to the caller.

pub mod context;
pub mod driver;
pub mod error;
pub mod logging;
pub mod program;
pub mod resource;
pub mod types;

pub use context::{Context, ContextInit};
pub use error::{GlError, Result};
pub use program::{Program, ProgramBinary, ShaderSource};
pub use resource::{Buffer, Handle, Sampler, Texture};
