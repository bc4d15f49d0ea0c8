//! Owned GPU objects.
//!
//! [`Handle`] is the shared-ownership primitive; [`Buffer`], [`Texture`] and
//! [`Sampler`] wrap one handle each and add the typed operations of their
//! object family. All of them are cheap to clone and release the native object
//! when the last clone goes away.

mod buffer;
mod handle;
mod sampler;
mod texture;

pub use buffer::{Buffer, BufferParameter, BufferTarget, BufferUsage};
pub use handle::{Handle, ObjectKind};
pub use sampler::{Filter, Sampler, SamplerDesc, Wrap};
pub use texture::{ImageFormat, InternalFormat, PixelOrder, Texture};
