//! Native driver seam.
//!
//! Every OpenGL entry point the wrappers use goes through [`Driver`]. Method
//! names follow glow's `HasContext` so the production implementation,
//! [`GlowDriver`], is a direct forward. Object names are plain non-zero
//! integers and enums are raw GL codes; typing happens one layer up.
//!
//! Calls do not report errors themselves. Callers consult
//! [`Driver::get_error`] immediately after each state-changing call.

#[cfg(test)]
pub(crate) mod mock;
mod native;

pub use native::GlowDriver;

use std::num::NonZeroU32;

/// Native object name. Zero is never a valid object.
pub type RawName = NonZeroU32;

/// Reflection record for one active attribute or uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    pub name: String,
    /// Array size; 1 for non-arrays.
    pub size: i32,
    /// Raw reflected type (`GL_FLOAT_VEC3`, `GL_SAMPLER_2D`, ...).
    pub gl_type: u32,
}

/// Driver-specific image of a linked program.
///
/// Only valid on the driver (and usually the driver version) that produced
/// it; loading it elsewhere fails like a link error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramBinary {
    pub format: u32,
    pub data: Vec<u8>,
}

/// OpenGL entry points consumed by the wrappers.
pub trait Driver {
    // ── state queries ─────────────────────────────────────────────────────

    fn get_error(&self) -> u32;
    fn get_parameter_i32(&self, parameter: u32) -> i32;

    // ── object lifetime ───────────────────────────────────────────────────

    fn create_buffer(&self) -> Result<RawName, String>;
    fn delete_buffer(&self, buffer: RawName);
    fn create_texture(&self) -> Result<RawName, String>;
    fn delete_texture(&self, texture: RawName);
    fn create_sampler(&self) -> Result<RawName, String>;
    fn delete_sampler(&self, sampler: RawName);
    fn create_shader(&self, stage: u32) -> Result<RawName, String>;
    fn delete_shader(&self, shader: RawName);
    fn create_program(&self) -> Result<RawName, String>;
    fn delete_program(&self, program: RawName);
    fn create_vertex_array(&self) -> Result<RawName, String>;
    fn delete_vertex_array(&self, vertex_array: RawName);

    // ── buffers ───────────────────────────────────────────────────────────

    fn bind_buffer(&self, target: u32, buffer: Option<RawName>);
    fn buffer_data_size(&self, target: u32, size: i32, usage: u32);
    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data_u8_slice(&self, target: u32, offset: i32, data: &[u8]);
    fn get_buffer_sub_data(&self, target: u32, offset: i32, dst: &mut [u8]);
    fn get_buffer_parameter_i32(&self, target: u32, parameter: u32) -> i32;

    // ── textures ──────────────────────────────────────────────────────────

    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Option<RawName>);
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    /// Allocates level `level`; unused trailing dimensions are 1.
    #[allow(clippy::too_many_arguments)]
    fn tex_image(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        size: [i32; 3],
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    /// Replaces a region of level `level` of a 2D, 2D array or 3D texture;
    /// unused trailing dimensions have offset 0 and size 1.
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image(
        &self,
        target: u32,
        level: i32,
        offset: [i32; 3],
        size: [i32; 3],
        format: u32,
        ty: u32,
        pixels: &[u8],
    );
    fn get_tex_image(&self, target: u32, level: i32, format: u32, ty: u32, dst: &mut [u8]);
    fn generate_mipmap(&self, target: u32);

    // ── samplers ──────────────────────────────────────────────────────────

    fn bind_sampler(&self, unit: u32, sampler: Option<RawName>);
    fn sampler_parameter_i32(&self, sampler: RawName, parameter: u32, value: i32);

    // ── shaders and programs ──────────────────────────────────────────────

    fn shader_source(&self, shader: RawName, source: &str);
    fn compile_shader(&self, shader: RawName);
    fn get_shader_compile_status(&self, shader: RawName) -> bool;
    fn get_shader_info_log(&self, shader: RawName) -> String;
    fn attach_shader(&self, program: RawName, shader: RawName);
    fn detach_shader(&self, program: RawName, shader: RawName);
    fn link_program(&self, program: RawName);
    fn get_program_link_status(&self, program: RawName) -> bool;
    fn get_program_info_log(&self, program: RawName) -> String;
    fn program_binary_retrievable_hint(&self, program: RawName, value: bool);
    /// `None` when the driver offers no binary formats.
    fn get_program_binary(&self, program: RawName) -> Option<ProgramBinary>;
    fn program_binary(&self, program: RawName, binary: &ProgramBinary);
    fn get_active_attributes(&self, program: RawName) -> u32;
    fn get_active_attribute(&self, program: RawName, index: u32) -> Option<ActiveVariable>;
    fn get_attrib_location(&self, program: RawName, name: &str) -> Option<u32>;
    fn get_active_uniforms(&self, program: RawName) -> u32;
    fn get_active_uniform(&self, program: RawName, index: u32) -> Option<ActiveVariable>;
    fn get_uniform_location(&self, program: RawName, name: &str) -> Option<u32>;
    fn use_program(&self, program: Option<RawName>);

    // ── vertex input ──────────────────────────────────────────────────────

    fn bind_vertex_array(&self, vertex_array: Option<RawName>);
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn vertex_attrib_pointer_i32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);

    // ── uniform uploads ───────────────────────────────────────────────────

    fn uniform_1_f32_slice(&self, location: u32, values: &[f32]);
    fn uniform_2_f32_slice(&self, location: u32, values: &[f32]);
    fn uniform_3_f32_slice(&self, location: u32, values: &[f32]);
    fn uniform_4_f32_slice(&self, location: u32, values: &[f32]);
    fn uniform_1_i32_slice(&self, location: u32, values: &[i32]);
    fn uniform_2_i32_slice(&self, location: u32, values: &[i32]);
    fn uniform_3_i32_slice(&self, location: u32, values: &[i32]);
    fn uniform_4_i32_slice(&self, location: u32, values: &[i32]);
    fn uniform_1_u32_slice(&self, location: u32, values: &[u32]);
    fn uniform_2_u32_slice(&self, location: u32, values: &[u32]);
    fn uniform_3_u32_slice(&self, location: u32, values: &[u32]);
    fn uniform_4_u32_slice(&self, location: u32, values: &[u32]);
    fn uniform_matrix_2_f32_slice(&self, location: u32, transpose: bool, values: &[f32]);
    fn uniform_matrix_3_f32_slice(&self, location: u32, transpose: bool, values: &[f32]);
    fn uniform_matrix_4_f32_slice(&self, location: u32, transpose: bool, values: &[f32]);

    // ── framebuffer and draws ─────────────────────────────────────────────

    fn clear(&self, mask: u32);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn enable(&self, capability: u32);
    fn disable(&self, capability: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
    fn finish(&self);
}
