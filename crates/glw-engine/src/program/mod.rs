//! Shader programs.
//!
//! A [`Program`] goes through three phases:
//! - build: compile every [`ShaderSource`], link, and reflect the active
//!   attributes and uniforms into slot tables. A linked program's
//!   [`ProgramBinary`] can be loaded later with [`Program::from_binary`]
//!   instead.
//! - bind: setters record buffers, values and textures per slot and mark
//!   them dirty, without touching the driver
//! - prepare/execute: activate the program, flush dirty slots through the
//!   type tables, then draw

mod build;
mod object;
mod prepare;
mod slots;
mod source;

pub use crate::driver::ProgramBinary;
pub use object::Program;
pub use slots::{AttributeId, AttributeSlot, UniformId, UniformSlot};
pub use source::{ProgramState, ShaderSource};
