use glow::{HasContext, PixelPackData, PixelUnpackData};

use super::{ActiveVariable, Driver, ProgramBinary, RawName};

/// [`Driver`] over a current `glow::Context`.
pub struct GlowDriver {
    gl: glow::Context,
}

impl GlowDriver {
    /// Wraps a loaded context.
    ///
    /// # Safety
    ///
    /// The context must be current on the calling thread for as long as the
    /// driver (and every wrapper created through it) is alive, and all calls
    /// must come from that thread.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Returns the underlying context for calls this crate does not wrap.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

fn location(location: u32) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location)
}

// SAFETY (whole impl): `GlowDriver::new` requires the context to be current
// on this thread. Arguments are forwarded unchanged; slices carry their own
// lengths, and invalid names or enums surface through `glGetError`.
impl Driver for GlowDriver {
    // ── state queries ─────────────────────────────────────────────────────

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn get_parameter_i32(&self, parameter: u32) -> i32 {
        unsafe { self.gl.get_parameter_i32(parameter) }
    }

    // ── object lifetime ───────────────────────────────────────────────────

    fn create_buffer(&self) -> Result<RawName, String> {
        unsafe { self.gl.create_buffer() }.map(|b| b.0)
    }

    fn delete_buffer(&self, buffer: RawName) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer)) }
    }

    fn create_texture(&self) -> Result<RawName, String> {
        unsafe { self.gl.create_texture() }.map(|t| t.0)
    }

    fn delete_texture(&self, texture: RawName) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture)) }
    }

    fn create_sampler(&self) -> Result<RawName, String> {
        unsafe { self.gl.create_sampler() }.map(|s| s.0)
    }

    fn delete_sampler(&self, sampler: RawName) {
        unsafe { self.gl.delete_sampler(glow::NativeSampler(sampler)) }
    }

    fn create_shader(&self, stage: u32) -> Result<RawName, String> {
        unsafe { self.gl.create_shader(stage) }.map(|s| s.0)
    }

    fn delete_shader(&self, shader: RawName) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader)) }
    }

    fn create_program(&self) -> Result<RawName, String> {
        unsafe { self.gl.create_program() }.map(|p| p.0)
    }

    fn delete_program(&self, program: RawName) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program)) }
    }

    fn create_vertex_array(&self) -> Result<RawName, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| v.0)
    }

    fn delete_vertex_array(&self, vertex_array: RawName) {
        unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(vertex_array)) }
    }

    // ── buffers ───────────────────────────────────────────────────────────

    fn bind_buffer(&self, target: u32, buffer: Option<RawName>) {
        unsafe { self.gl.bind_buffer(target, buffer.map(glow::NativeBuffer)) }
    }

    fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        unsafe { self.gl.buffer_data_size(target, size, usage) }
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn buffer_sub_data_u8_slice(&self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset, data) }
    }

    fn get_buffer_sub_data(&self, target: u32, offset: i32, dst: &mut [u8]) {
        unsafe { self.gl.get_buffer_sub_data(target, offset, dst) }
    }

    fn get_buffer_parameter_i32(&self, target: u32, parameter: u32) -> i32 {
        unsafe { self.gl.get_buffer_parameter_i32(target, parameter) }
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn bind_texture(&self, target: u32, texture: Option<RawName>) {
        unsafe { self.gl.bind_texture(target, texture.map(glow::NativeTexture)) }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, parameter, value) }
    }

    fn tex_image(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        size: [i32; 3],
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        let [width, height, depth] = size;
        let pixels = PixelUnpackData::Slice(pixels);
        unsafe {
            match target {
                glow::TEXTURE_1D => self.gl.tex_image_1d(
                    target,
                    level,
                    internal_format,
                    width,
                    0,
                    format,
                    ty,
                    pixels,
                ),
                glow::TEXTURE_3D | glow::TEXTURE_2D_ARRAY => self.gl.tex_image_3d(
                    target,
                    level,
                    internal_format,
                    width,
                    height,
                    depth,
                    0,
                    format,
                    ty,
                    pixels,
                ),
                _ => self.gl.tex_image_2d(
                    target,
                    level,
                    internal_format,
                    width,
                    height,
                    0,
                    format,
                    ty,
                    pixels,
                ),
            }
        }
    }

    fn tex_sub_image(
        &self,
        target: u32,
        level: i32,
        offset: [i32; 3],
        size: [i32; 3],
        format: u32,
        ty: u32,
        pixels: &[u8],
    ) {
        let [x, y, z] = offset;
        let [width, height, depth] = size;
        let pixels = PixelUnpackData::Slice(Some(pixels));
        unsafe {
            match target {
                glow::TEXTURE_3D | glow::TEXTURE_2D_ARRAY => self.gl.tex_sub_image_3d(
                    target, level, x, y, z, width, height, depth, format, ty, pixels,
                ),
                _ => self
                    .gl
                    .tex_sub_image_2d(target, level, x, y, width, height, format, ty, pixels),
            }
        }
    }

    fn get_tex_image(&self, target: u32, level: i32, format: u32, ty: u32, dst: &mut [u8]) {
        unsafe {
            self.gl
                .get_tex_image(target, level, format, ty, PixelPackData::Slice(Some(dst)))
        }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { self.gl.generate_mipmap(target) }
    }

    // ── samplers ──────────────────────────────────────────────────────────

    fn bind_sampler(&self, unit: u32, sampler: Option<RawName>) {
        unsafe { self.gl.bind_sampler(unit, sampler.map(glow::NativeSampler)) }
    }

    fn sampler_parameter_i32(&self, sampler: RawName, parameter: u32, value: i32) {
        unsafe {
            self.gl
                .sampler_parameter_i32(glow::NativeSampler(sampler), parameter, value)
        }
    }

    // ── shaders and programs ──────────────────────────────────────────────

    fn shader_source(&self, shader: RawName, source: &str) {
        unsafe { self.gl.shader_source(glow::NativeShader(shader), source) }
    }

    fn compile_shader(&self, shader: RawName) {
        unsafe { self.gl.compile_shader(glow::NativeShader(shader)) }
    }

    fn get_shader_compile_status(&self, shader: RawName) -> bool {
        unsafe { self.gl.get_shader_compile_status(glow::NativeShader(shader)) }
    }

    fn get_shader_info_log(&self, shader: RawName) -> String {
        unsafe { self.gl.get_shader_info_log(glow::NativeShader(shader)) }
    }

    fn attach_shader(&self, program: RawName, shader: RawName) {
        unsafe {
            self.gl
                .attach_shader(glow::NativeProgram(program), glow::NativeShader(shader))
        }
    }

    fn detach_shader(&self, program: RawName, shader: RawName) {
        unsafe {
            self.gl
                .detach_shader(glow::NativeProgram(program), glow::NativeShader(shader))
        }
    }

    fn link_program(&self, program: RawName) {
        unsafe { self.gl.link_program(glow::NativeProgram(program)) }
    }

    fn get_program_link_status(&self, program: RawName) -> bool {
        unsafe { self.gl.get_program_link_status(glow::NativeProgram(program)) }
    }

    fn get_program_info_log(&self, program: RawName) -> String {
        unsafe { self.gl.get_program_info_log(glow::NativeProgram(program)) }
    }

    fn program_binary_retrievable_hint(&self, program: RawName, value: bool) {
        unsafe {
            self.gl
                .program_binary_retrievable_hint(glow::NativeProgram(program), value)
        }
    }

    fn get_program_binary(&self, program: RawName) -> Option<ProgramBinary> {
        unsafe { self.gl.get_program_binary(glow::NativeProgram(program)) }
            .filter(|b| !b.buffer.is_empty())
            .map(|b| ProgramBinary {
                format: b.format,
                data: b.buffer,
            })
    }

    fn program_binary(&self, program: RawName, binary: &ProgramBinary) {
        let binary = glow::ProgramBinary {
            buffer: binary.data.clone(),
            format: binary.format,
        };
        unsafe { self.gl.program_binary(glow::NativeProgram(program), &binary) }
    }

    fn get_active_attributes(&self, program: RawName) -> u32 {
        unsafe { self.gl.get_active_attributes(glow::NativeProgram(program)) }
    }

    fn get_active_attribute(&self, program: RawName, index: u32) -> Option<ActiveVariable> {
        unsafe { self.gl.get_active_attribute(glow::NativeProgram(program), index) }.map(|a| {
            ActiveVariable {
                name: a.name,
                size: a.size,
                gl_type: a.atype,
            }
        })
    }

    fn get_attrib_location(&self, program: RawName, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(glow::NativeProgram(program), name) }
    }

    fn get_active_uniforms(&self, program: RawName) -> u32 {
        unsafe { self.gl.get_active_uniforms(glow::NativeProgram(program)) }
    }

    fn get_active_uniform(&self, program: RawName, index: u32) -> Option<ActiveVariable> {
        unsafe { self.gl.get_active_uniform(glow::NativeProgram(program), index) }.map(|u| {
            ActiveVariable {
                name: u.name,
                size: u.size,
                gl_type: u.utype,
            }
        })
    }

    fn get_uniform_location(&self, program: RawName, name: &str) -> Option<u32> {
        unsafe { self.gl.get_uniform_location(glow::NativeProgram(program), name) }.map(|l| l.0)
    }

    fn use_program(&self, program: Option<RawName>) {
        unsafe { self.gl.use_program(program.map(glow::NativeProgram)) }
    }

    // ── vertex input ──────────────────────────────────────────────────────

    fn bind_vertex_array(&self, vertex_array: Option<RawName>) {
        unsafe {
            self.gl
                .bind_vertex_array(vertex_array.map(glow::NativeVertexArray))
        }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset)
        }
    }

    fn vertex_attrib_pointer_i32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_i32(index, size, data_type, stride, offset)
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    // ── uniform uploads ───────────────────────────────────────────────────

    fn uniform_1_f32_slice(&self, l: u32, values: &[f32]) {
        unsafe { self.gl.uniform_1_f32_slice(Some(&location(l)), values) }
    }

    fn uniform_2_f32_slice(&self, l: u32, values: &[f32]) {
        unsafe { self.gl.uniform_2_f32_slice(Some(&location(l)), values) }
    }

    fn uniform_3_f32_slice(&self, l: u32, values: &[f32]) {
        unsafe { self.gl.uniform_3_f32_slice(Some(&location(l)), values) }
    }

    fn uniform_4_f32_slice(&self, l: u32, values: &[f32]) {
        unsafe { self.gl.uniform_4_f32_slice(Some(&location(l)), values) }
    }

    fn uniform_1_i32_slice(&self, l: u32, values: &[i32]) {
        unsafe { self.gl.uniform_1_i32_slice(Some(&location(l)), values) }
    }

    fn uniform_2_i32_slice(&self, l: u32, values: &[i32]) {
        unsafe { self.gl.uniform_2_i32_slice(Some(&location(l)), values) }
    }

    fn uniform_3_i32_slice(&self, l: u32, values: &[i32]) {
        unsafe { self.gl.uniform_3_i32_slice(Some(&location(l)), values) }
    }

    fn uniform_4_i32_slice(&self, l: u32, values: &[i32]) {
        unsafe { self.gl.uniform_4_i32_slice(Some(&location(l)), values) }
    }

    fn uniform_1_u32_slice(&self, l: u32, values: &[u32]) {
        unsafe { self.gl.uniform_1_u32_slice(Some(&location(l)), values) }
    }

    fn uniform_2_u32_slice(&self, l: u32, values: &[u32]) {
        unsafe { self.gl.uniform_2_u32_slice(Some(&location(l)), values) }
    }

    fn uniform_3_u32_slice(&self, l: u32, values: &[u32]) {
        unsafe { self.gl.uniform_3_u32_slice(Some(&location(l)), values) }
    }

    fn uniform_4_u32_slice(&self, l: u32, values: &[u32]) {
        unsafe { self.gl.uniform_4_u32_slice(Some(&location(l)), values) }
    }

    fn uniform_matrix_2_f32_slice(&self, l: u32, transpose: bool, values: &[f32]) {
        unsafe {
            self.gl
                .uniform_matrix_2_f32_slice(Some(&location(l)), transpose, values)
        }
    }

    fn uniform_matrix_3_f32_slice(&self, l: u32, transpose: bool, values: &[f32]) {
        unsafe {
            self.gl
                .uniform_matrix_3_f32_slice(Some(&location(l)), transpose, values)
        }
    }

    fn uniform_matrix_4_f32_slice(&self, l: u32, transpose: bool, values: &[f32]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(&location(l)), transpose, values)
        }
    }

    // ── framebuffer and draws ─────────────────────────────────────────────

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn enable(&self, capability: u32) {
        unsafe { self.gl.enable(capability) }
    }

    fn disable(&self, capability: u32) {
        unsafe { self.gl.disable(capability) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { self.gl.draw_elements(mode, count, element_type, offset) }
    }

    fn finish(&self) {
        unsafe { self.gl.finish() }
    }
}
