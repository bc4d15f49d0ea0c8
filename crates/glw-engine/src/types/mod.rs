//! Closed type tables shared by every wrapper.
//!
//! OpenGL reports types as raw enums. They are converted once, at the driver
//! boundary, into the enums below; everything past that point matches over a
//! closed set instead of switching on integer codes.

mod data_type;
mod shader_type;
mod stage;

pub use data_type::DataType;
pub use shader_type::{ShaderType, TypeLayout, UploadKind, VertexPointer};
pub use stage::{ShaderStage, TextureTarget};
