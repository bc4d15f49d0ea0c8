use crate::context::Context;
use crate::driver::RawName;
use crate::error::{gl_int, Result, ValidationError};
use crate::types::{DataType, TextureTarget};

use super::{Handle, ObjectKind};

/// Channel layout of client-side pixel data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelOrder {
    Red,
    Rg,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    Depth,
    RedInteger,
    RgInteger,
    RgbInteger,
    RgbaInteger,
}

impl PixelOrder {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::Red => glow::RED,
            Self::Rg => glow::RG,
            Self::Rgb => glow::RGB,
            Self::Bgr => glow::BGR,
            Self::Rgba => glow::RGBA,
            Self::Bgra => glow::BGRA,
            Self::Depth => glow::DEPTH_COMPONENT,
            Self::RedInteger => glow::RED_INTEGER,
            Self::RgInteger => glow::RG_INTEGER,
            Self::RgbInteger => glow::RGB_INTEGER,
            Self::RgbaInteger => glow::RGBA_INTEGER,
        }
    }

    pub const fn channels(self) -> usize {
        match self {
            Self::Red | Self::Depth | Self::RedInteger => 1,
            Self::Rg | Self::RgInteger => 2,
            Self::Rgb | Self::Bgr | Self::RgbInteger => 3,
            Self::Rgba | Self::Bgra | Self::RgbaInteger => 4,
        }
    }
}

/// Client-side pixel format: channel order plus component type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageFormat {
    pub order: PixelOrder,
    pub ty: DataType,
}

impl ImageFormat {
    pub const RGBA8: Self = Self::new(PixelOrder::Rgba, DataType::UnsignedByte);
    pub const RGB8: Self = Self::new(PixelOrder::Rgb, DataType::UnsignedByte);
    pub const R8: Self = Self::new(PixelOrder::Red, DataType::UnsignedByte);
    pub const RGBA32F: Self = Self::new(PixelOrder::Rgba, DataType::Float);
    pub const R32F: Self = Self::new(PixelOrder::Red, DataType::Float);

    pub const fn new(order: PixelOrder, ty: DataType) -> Self {
        Self { order, ty }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self.order.channels() * self.ty.size_of()
    }
}

/// Storage format of the texture on the GPU.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InternalFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
    Srgb8,
    Srgb8Alpha8,
    R16F,
    Rg16F,
    Rgba16F,
    R32F,
    Rg32F,
    Rgb32F,
    Rgba32F,
    R32I,
    R32UI,
    Rgba32I,
    Rgba32UI,
    DepthComponent24,
    DepthComponent32F,
}

impl InternalFormat {
    pub const fn to_gl(self) -> u32 {
        match self {
            Self::R8 => glow::R8,
            Self::Rg8 => glow::RG8,
            Self::Rgb8 => glow::RGB8,
            Self::Rgba8 => glow::RGBA8,
            Self::Srgb8 => glow::SRGB8,
            Self::Srgb8Alpha8 => glow::SRGB8_ALPHA8,
            Self::R16F => glow::R16F,
            Self::Rg16F => glow::RG16F,
            Self::Rgba16F => glow::RGBA16F,
            Self::R32F => glow::R32F,
            Self::Rg32F => glow::RG32F,
            Self::Rgb32F => glow::RGB32F,
            Self::Rgba32F => glow::RGBA32F,
            Self::R32I => glow::R32I,
            Self::R32UI => glow::R32UI,
            Self::Rgba32I => glow::RGBA32I,
            Self::Rgba32UI => glow::RGBA32UI,
            Self::DepthComponent24 => glow::DEPTH_COMPONENT24,
            Self::DepthComponent32F => glow::DEPTH_COMPONENT32F,
        }
    }
}

/// 1D, 2D or 3D image.
///
/// Created with nearest-neighbour filtering on both minification and
/// magnification; attach a [`Sampler`](super::Sampler) through the program
/// to sample it differently. Every operation binds the texture through the
/// context, so the dispatcher's unit cache stays accurate.
#[derive(Debug, Clone)]
pub struct Texture {
    handle: Handle,
    target: TextureTarget,
    internal_format: InternalFormat,
    size: [u32; 3],
}

impl Texture {
    pub fn new_1d(
        ctx: &mut Context,
        internal_format: InternalFormat,
        format: ImageFormat,
        width: u32,
        data: Option<&[u8]>,
    ) -> Result<Self> {
        Self::allocate(
            ctx,
            TextureTarget::Texture1D,
            internal_format,
            format,
            [width, 1, 1],
            data,
        )
    }

    pub fn new_2d(
        ctx: &mut Context,
        internal_format: InternalFormat,
        format: ImageFormat,
        width: u32,
        height: u32,
        data: Option<&[u8]>,
    ) -> Result<Self> {
        Self::allocate(
            ctx,
            TextureTarget::Texture2D,
            internal_format,
            format,
            [width, height, 1],
            data,
        )
    }

    pub fn new_3d(
        ctx: &mut Context,
        internal_format: InternalFormat,
        format: ImageFormat,
        size: [u32; 3],
        data: Option<&[u8]>,
    ) -> Result<Self> {
        Self::allocate(
            ctx,
            TextureTarget::Texture3D,
            internal_format,
            format,
            size,
            data,
        )
    }

    fn allocate(
        ctx: &mut Context,
        target: TextureTarget,
        internal_format: InternalFormat,
        format: ImageFormat,
        size: [u32; 3],
        data: Option<&[u8]>,
    ) -> Result<Self> {
        let expected = texel_count(size) * format.bytes_per_pixel();
        if let Some(data) = data {
            if data.len() != expected {
                return Err(ValidationError::DataLength {
                    expected,
                    found: data.len(),
                }
                .into());
            }
        }
        let gl_size = [
            gl_int(size[0] as usize)?,
            gl_int(size[1] as usize)?,
            gl_int(size[2] as usize)?,
        ];

        let handle = Handle::create(ctx.driver(), ObjectKind::Texture)?;
        ctx.bind_texture(target, &handle)?;

        for parameter in [glow::TEXTURE_MIN_FILTER, glow::TEXTURE_MAG_FILTER] {
            ctx.gl()
                .tex_parameter_i32(target.to_gl(), parameter, glow::NEAREST as i32);
            ctx.check("glTexParameteri")?;
        }

        ctx.gl().tex_image(
            target.to_gl(),
            0,
            internal_format.to_gl() as i32,
            gl_size,
            format.order.to_gl(),
            format.ty.to_gl(),
            data,
        );
        ctx.check("glTexImage")?;

        log::trace!(
            "texture {} allocated: {target:?} {internal_format:?} {size:?}",
            handle.name()
        );

        Ok(Self {
            handle,
            target,
            internal_format,
            size,
        })
    }

    /// Replaces a span of a 1D texture level.
    ///
    /// There is no 1D sub-image entry point on the driver seam, so the level
    /// is read back, patched and specified again at its current size.
    pub fn write_1d(
        &self,
        ctx: &mut Context,
        lod: u32,
        format: ImageFormat,
        origin: u32,
        extent: u32,
        data: &[u8],
    ) -> Result<()> {
        self.expect_target(TextureTarget::Texture1D)?;
        let level = self.level_size(lod);
        check_region(level, [origin, 0, 0], [extent, 1, 1], format, data.len())?;
        if extent == 0 {
            return Ok(());
        }

        let bpp = format.bytes_per_pixel();
        let mut texels = vec![0u8; texel_count(level) * bpp];
        self.read(ctx, lod, format, &mut texels)?;
        let start = origin as usize * bpp;
        texels[start..start + data.len()].copy_from_slice(data);

        ctx.gl().tex_image(
            self.target.to_gl(),
            gl_int(lod as usize)?,
            self.internal_format.to_gl() as i32,
            [gl_int(level[0] as usize)?, 1, 1],
            format.order.to_gl(),
            format.ty.to_gl(),
            Some(texels.as_slice()),
        );
        ctx.check("glTexImage1D")
    }

    /// Replaces a rectangle of a 2D texture level.
    ///
    /// `origin` and `extent` are in texels of level `lod`; `data` must hold
    /// exactly `extent` texels in `format`.
    pub fn write_2d(
        &self,
        ctx: &mut Context,
        lod: u32,
        format: ImageFormat,
        origin: [u32; 2],
        extent: [u32; 2],
        data: &[u8],
    ) -> Result<()> {
        self.expect_target(TextureTarget::Texture2D)?;
        self.write_region(
            ctx,
            lod,
            format,
            [origin[0], origin[1], 0],
            [extent[0], extent[1], 1],
            data,
        )
    }

    /// Replaces a box of a 3D texture level.
    pub fn write_3d(
        &self,
        ctx: &mut Context,
        lod: u32,
        format: ImageFormat,
        origin: [u32; 3],
        extent: [u32; 3],
        data: &[u8],
    ) -> Result<()> {
        self.expect_target(TextureTarget::Texture3D)?;
        self.write_region(ctx, lod, format, origin, extent, data)
    }

    fn write_region(
        &self,
        ctx: &mut Context,
        lod: u32,
        format: ImageFormat,
        origin: [u32; 3],
        extent: [u32; 3],
        data: &[u8],
    ) -> Result<()> {
        check_region(self.level_size(lod), origin, extent, format, data.len())?;

        let offset = [
            gl_int(origin[0] as usize)?,
            gl_int(origin[1] as usize)?,
            gl_int(origin[2] as usize)?,
        ];
        let size = [
            gl_int(extent[0] as usize)?,
            gl_int(extent[1] as usize)?,
            gl_int(extent[2] as usize)?,
        ];

        ctx.bind_texture(self.target, &self.handle)?;
        ctx.gl().tex_sub_image(
            self.target.to_gl(),
            gl_int(lod as usize)?,
            offset,
            size,
            format.order.to_gl(),
            format.ty.to_gl(),
            data,
        );
        ctx.check("glTexSubImage")
    }

    /// Reads back a whole level. `dst` must match the level size in `format`.
    pub fn read(
        &self,
        ctx: &mut Context,
        lod: u32,
        format: ImageFormat,
        dst: &mut [u8],
    ) -> Result<()> {
        let expected = texel_count(self.level_size(lod)) * format.bytes_per_pixel();
        if dst.len() != expected {
            return Err(ValidationError::DataLength {
                expected,
                found: dst.len(),
            }
            .into());
        }

        ctx.bind_texture(self.target, &self.handle)?;
        ctx.gl().get_tex_image(
            self.target.to_gl(),
            gl_int(lod as usize)?,
            format.order.to_gl(),
            format.ty.to_gl(),
            dst,
        );
        ctx.check("glGetTexImage")
    }

    pub fn generate_mipmaps(&self, ctx: &mut Context) -> Result<()> {
        ctx.bind_texture(self.target, &self.handle)?;
        ctx.gl().generate_mipmap(self.target.to_gl());
        ctx.check("glGenerateMipmap")
    }

    /// Dimensions of mip level `lod`; unused dimensions stay 1.
    pub fn level_size(&self, lod: u32) -> [u32; 3] {
        self.size
            .map(|d| d.checked_shr(lod).unwrap_or(0).max(1))
    }

    pub fn name(&self) -> RawName {
        self.handle.name()
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    pub fn internal_format(&self) -> InternalFormat {
        self.internal_format
    }

    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    pub fn depth(&self) -> u32 {
        self.size[2]
    }

    fn expect_target(&self, expected: TextureTarget) -> Result<()> {
        if self.target == expected {
            Ok(())
        } else {
            Err(ValidationError::WrongTextureTarget {
                expected,
                found: self.target,
            }
            .into())
        }
    }
}

fn texel_count(size: [u32; 3]) -> usize {
    size.iter().map(|d| *d as usize).product()
}

/// Checks that `origin + extent` lies inside `level` and that `len` bytes
/// hold exactly `extent` texels of `format`.
fn check_region(
    level: [u32; 3],
    origin: [u32; 3],
    extent: [u32; 3],
    format: ImageFormat,
    len: usize,
) -> Result<()> {
    let inside = (0..3).all(|i| {
        origin[i]
            .checked_add(extent[i])
            .is_some_and(|end| end <= level[i])
    });
    if !inside {
        let [w, h, _] = level.map(|d| d as usize);
        return Err(ValidationError::OutOfRange {
            offset: (origin[2] as usize * h + origin[1] as usize) * w + origin[0] as usize,
            len: texel_count(extent),
            size: texel_count(level),
        }
        .into());
    }

    let expected = texel_count(extent) * format.bytes_per_pixel();
    if len != expected {
        return Err(ValidationError::DataLength {
            expected,
            found: len,
        }
        .into());
    }
    Ok(())
}
