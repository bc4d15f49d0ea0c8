use bytemuck::cast_slice;

use crate::context::Context;
use crate::error::{gl_int, GlError, Result, ValidationError};
use crate::resource::Sampler;
use crate::types::UploadKind;

use super::Program;
use super::slots::{AttributeSlot, UniformSlot};

impl Program {
    /// Activates the program and flushes every dirty slot to the driver.
    ///
    /// Program and vertex-array activation go through the context and are
    /// skipped when already current. Sampler units are rebound on every call
    /// (the context elides the ones that did not change), since other
    /// programs may have used the same units in between. A slot stays dirty
    /// until its own upload succeeded; the first driver error aborts the
    /// flush.
    pub fn prepare(&mut self, ctx: &mut Context) -> Result<()> {
        self.ensure_linked()?;
        let vertex_array = self
            .vertex_array
            .as_ref()
            .ok_or(GlError::Validation(ValidationError::NotLinked))?;

        ctx.use_program(&self.handle)?;
        ctx.bind_vertex_array(vertex_array)?;

        for slot in self.attributes.slots.iter_mut().filter(|s| s.dirty) {
            describe_attribute(ctx, slot)?;
            slot.dirty = false;
        }

        for slot in &self.uniforms.slots {
            if let (Some(texture), Some(unit)) = (&slot.texture, slot.unit) {
                ctx.bind_texture_unit(unit, texture.target(), texture.handle())?;
                ctx.bind_sampler_unit(unit, slot.sampler.as_ref().map(Sampler::handle))?;
            }
        }

        for slot in self.uniforms.slots.iter_mut().filter(|s| s.dirty) {
            upload_uniform(ctx, slot)?;
            slot.dirty = false;
        }

        Ok(())
    }
}

/// Points the slot's locations at its buffer and enables them.
///
/// Matrices use one pointer per column and arrays one per element, at
/// consecutive locations. A zero stride means the whole attribute is tightly
/// packed per vertex.
fn describe_attribute(ctx: &Context, slot: &AttributeSlot) -> Result<()> {
    let Some(buffer) = slot.buffer() else {
        return Ok(());
    };
    let Some(pointer) = slot.shader_type().vertex_pointer() else {
        return Err(GlError::UnsupportedType {
            name: slot.name().to_owned(),
            code: slot.shader_type().to_gl(),
        });
    };

    let columns = pointer.columns as usize;
    let stride = match slot.stride() {
        0 => pointer.column_bytes() * columns * slot.count(),
        stride => stride,
    };
    let stride = gl_int(stride)?;

    ctx.bind_buffer(glow::ARRAY_BUFFER, buffer.handle())?;

    let gl = ctx.gl();
    for column in 0..slot.count() * columns {
        let index = slot.location() + column as u32;
        let offset = gl_int(slot.offset() + column * pointer.column_bytes())?;
        let data_type = pointer.data_type.to_gl();

        if pointer.is_integer() {
            gl.vertex_attrib_pointer_i32(index, pointer.components, data_type, stride, offset);
            ctx.check("glVertexAttribIPointer")?;
        } else {
            gl.vertex_attrib_pointer_f32(index, pointer.components, data_type, false, stride, offset);
            ctx.check("glVertexAttribPointer")?;
        }
        gl.enable_vertex_attrib_array(index);
        ctx.check("glEnableVertexAttribArray")?;
    }
    Ok(())
}

/// Uploads the whole store through the type's entry point.
fn upload_uniform(ctx: &Context, slot: &UniformSlot) -> Result<()> {
    let gl = ctx.gl();
    let location = slot.location();
    let words = &slot.store[..];
    let kind = slot.shader_type().upload();

    match kind {
        UploadKind::Float1 => gl.uniform_1_f32_slice(location, cast_slice(words)),
        UploadKind::Float2 => gl.uniform_2_f32_slice(location, cast_slice(words)),
        UploadKind::Float3 => gl.uniform_3_f32_slice(location, cast_slice(words)),
        UploadKind::Float4 => gl.uniform_4_f32_slice(location, cast_slice(words)),
        UploadKind::Int1 => gl.uniform_1_i32_slice(location, cast_slice(words)),
        UploadKind::Int2 => gl.uniform_2_i32_slice(location, cast_slice(words)),
        UploadKind::Int3 => gl.uniform_3_i32_slice(location, cast_slice(words)),
        UploadKind::Int4 => gl.uniform_4_i32_slice(location, cast_slice(words)),
        UploadKind::UnsignedInt1 => gl.uniform_1_u32_slice(location, words),
        UploadKind::UnsignedInt2 => gl.uniform_2_u32_slice(location, words),
        UploadKind::UnsignedInt3 => gl.uniform_3_u32_slice(location, words),
        UploadKind::UnsignedInt4 => gl.uniform_4_u32_slice(location, words),
        UploadKind::Matrix2 => gl.uniform_matrix_2_f32_slice(location, false, cast_slice(words)),
        UploadKind::Matrix3 => gl.uniform_matrix_3_f32_slice(location, false, cast_slice(words)),
        UploadKind::Matrix4 => gl.uniform_matrix_4_f32_slice(location, false, cast_slice(words)),
    }
    ctx.check(kind.entry_point())
}
