use bytemuck::Pod;

use crate::context::Context;
use crate::driver::RawName;
use crate::error::{gl_int, Result, ValidationError};

use super::{Handle, ObjectKind};

/// Binding point a buffer is created for and rebound to on every access.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
    Uniform,
    CopyRead,
    CopyWrite,
    PixelPack,
    PixelUnpack,
    TransformFeedback,
    Texture,
}

impl BufferTarget {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Array => glow::ARRAY_BUFFER,
            Self::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
            Self::Uniform => glow::UNIFORM_BUFFER,
            Self::CopyRead => glow::COPY_READ_BUFFER,
            Self::CopyWrite => glow::COPY_WRITE_BUFFER,
            Self::PixelPack => glow::PIXEL_PACK_BUFFER,
            Self::PixelUnpack => glow::PIXEL_UNPACK_BUFFER,
            Self::TransformFeedback => glow::TRANSFORM_FEEDBACK_BUFFER,
            Self::Texture => glow::TEXTURE_BUFFER,
        }
    }
}

/// Access-frequency hint given at allocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
    StreamDraw,
    StaticRead,
    DynamicRead,
    StreamRead,
    StaticCopy,
    DynamicCopy,
    StreamCopy,
}

impl BufferUsage {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::StaticDraw => glow::STATIC_DRAW,
            Self::DynamicDraw => glow::DYNAMIC_DRAW,
            Self::StreamDraw => glow::STREAM_DRAW,
            Self::StaticRead => glow::STATIC_READ,
            Self::DynamicRead => glow::DYNAMIC_READ,
            Self::StreamRead => glow::STREAM_READ,
            Self::StaticCopy => glow::STATIC_COPY,
            Self::DynamicCopy => glow::DYNAMIC_COPY,
            Self::StreamCopy => glow::STREAM_COPY,
        }
    }
}

/// Queryable buffer state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferParameter {
    /// Allocated size in bytes.
    Size,
    /// Raw usage enum given at allocation.
    Usage,
}

impl BufferParameter {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Size => glow::BUFFER_SIZE,
            Self::Usage => glow::BUFFER_USAGE,
        }
    }
}

/// Fixed-size block of GPU memory.
///
/// Clones share the native buffer. Reads and writes are bounds-checked
/// against the size given at creation before any driver call.
#[derive(Debug, Clone)]
pub struct Buffer {
    handle: Handle,
    target: BufferTarget,
    usage: BufferUsage,
    size: usize,
}

impl Buffer {
    /// Allocates `size` bytes, optionally initialized from `data`.
    ///
    /// `data`, when given, must be exactly `size` bytes long.
    pub fn new(
        ctx: &Context,
        target: BufferTarget,
        usage: BufferUsage,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<Self> {
        if let Some(data) = data {
            if data.len() != size {
                return Err(ValidationError::DataLength {
                    expected: size,
                    found: data.len(),
                }
                .into());
            }
        }
        let gl_size = gl_int(size)?;

        let handle = Handle::create(ctx.driver(), ObjectKind::Buffer)?;
        ctx.bind_buffer(target.to_gl(), &handle)?;

        match data {
            Some(data) => ctx
                .gl()
                .buffer_data_u8_slice(target.to_gl(), data, usage.to_gl()),
            None => ctx
                .gl()
                .buffer_data_size(target.to_gl(), gl_size, usage.to_gl()),
        }
        ctx.check("glBufferData")?;

        log::trace!("buffer {} allocated: {size} bytes {target:?}", handle.name());

        Ok(Self {
            handle,
            target,
            usage,
            size,
        })
    }

    /// Allocates a buffer holding exactly `data`.
    pub fn from_slice<T: Pod>(
        ctx: &Context,
        target: BufferTarget,
        usage: BufferUsage,
        data: &[T],
    ) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        Self::new(ctx, target, usage, bytes.len(), Some(bytes))
    }

    /// Overwrites `data.len()` bytes starting at `offset`.
    pub fn write(&self, ctx: &Context, offset: usize, data: &[u8]) -> Result<()> {
        self.check_range(offset, data.len())?;
        if data.is_empty() {
            return Ok(());
        }

        self.bind(ctx)?;
        ctx.gl()
            .buffer_sub_data_u8_slice(self.target.to_gl(), gl_int(offset)?, data);
        ctx.check("glBufferSubData")
    }

    /// Typed convenience over [`Buffer::write`].
    pub fn write_slice<T: Pod>(&self, ctx: &Context, offset: usize, data: &[T]) -> Result<()> {
        self.write(ctx, offset, bytemuck::cast_slice(data))
    }

    /// Copies `dst.len()` bytes starting at `offset` into `dst`.
    pub fn read(&self, ctx: &Context, offset: usize, dst: &mut [u8]) -> Result<()> {
        self.check_range(offset, dst.len())?;
        if dst.is_empty() {
            return Ok(());
        }

        self.bind(ctx)?;
        ctx.gl()
            .get_buffer_sub_data(self.target.to_gl(), gl_int(offset)?, dst);
        ctx.check("glGetBufferSubData")
    }

    pub fn parameter(&self, ctx: &Context, parameter: BufferParameter) -> Result<i32> {
        self.bind(ctx)?;
        let value = ctx
            .gl()
            .get_buffer_parameter_i32(self.target.to_gl(), parameter.to_gl());
        ctx.check("glGetBufferParameteriv")?;
        Ok(value)
    }

    /// Binds the buffer to its own target.
    pub fn bind(&self, ctx: &Context) -> Result<()> {
        ctx.bind_buffer(self.target.to_gl(), &self.handle)
    }

    pub fn name(&self) -> RawName {
        self.handle.name()
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(ValidationError::OutOfRange {
                offset,
                len,
                size: self.size,
            }
            .into()),
        }
    }
}
