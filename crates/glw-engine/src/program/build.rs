use crate::context::Context;
use crate::driver::{ActiveVariable, Driver, ProgramBinary, RawName};
use crate::error::{GlError, Result, ValidationError};
use crate::resource::{Handle, ObjectKind};
use crate::types::ShaderType;

use super::slots::{AttributeSlot, SlotTable, UniformSlot};
use super::{Program, ProgramState};

impl Program {
    /// Compiles every stage, links, and reflects the active interface.
    ///
    /// May be called again at any time; a successful rebuild replaces the
    /// tables (dropping bound resources and values) and invalidates
    /// previously issued slot ids. On failure the tables are empty, the
    /// diagnostics are in [`Program::log`] and the state is `BuildFailed`.
    pub fn build(&mut self, ctx: &Context) -> Result<()> {
        // Programs loaded from a binary have no sources to rebuild from.
        if self.sources.is_empty() {
            return Err(ValidationError::NoShaderStages.into());
        }

        self.state = ProgramState::Building;
        self.log.clear();
        self.binary = None;
        self.attributes.clear();
        self.uniforms.clear();
        self.vertex_array = None;
        self.build = self.build.wrapping_add(1);

        match self.compile_and_link(ctx) {
            Ok(()) => {
                self.state = ProgramState::Linked;
                log::debug!(
                    "program {} linked: {} attributes, {} uniforms",
                    self.name(),
                    self.attributes.slots.len(),
                    self.uniforms.slots.len()
                );
                Ok(())
            }
            Err(err) => {
                self.state = ProgramState::BuildFailed;
                self.binary = None;
                self.attributes.clear();
                self.uniforms.clear();
                self.vertex_array = None;
                Err(err)
            }
        }
    }

    /// Loads a binary captured by [`Program::binary`] and reflects its
    /// interface, skipping compilation.
    ///
    /// Drivers reject binaries from other drivers or driver versions; that
    /// surfaces as [`GlError::Link`], and the caller is expected to fall back
    /// to building from source.
    pub fn from_binary(ctx: &Context, binary: &ProgramBinary) -> Result<Self> {
        let handle = Handle::create(ctx.driver(), ObjectKind::Program)?;
        let mut program = Self::unbuilt(ctx, handle, Vec::new());
        program.state = ProgramState::Building;
        program.build = 1;

        let gl = ctx.gl();
        let name = program.handle.name();
        gl.program_binary(name, binary);
        ctx.check("glProgramBinary")?;
        if !gl.get_program_link_status(name) {
            let err = GlError::Link {
                log: gl.get_program_info_log(name).trim_end().to_owned(),
            };
            log::warn!("program {name}: {err}");
            return Err(err);
        }

        program.reflect(ctx)?;
        program.binary = Some(binary.clone());
        program.state = ProgramState::Linked;
        log::debug!(
            "program {name} loaded from binary: {} attributes, {} uniforms",
            program.attributes.slots.len(),
            program.uniforms.slots.len()
        );
        Ok(program)
    }

    fn compile_and_link(&mut self, ctx: &Context) -> Result<()> {
        let gl = ctx.gl();
        let program = self.handle.name();

        // Shader objects are released when `shaders` drops, on every path.
        let mut shaders = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let shader = Handle::create(ctx.driver(), ObjectKind::Shader(source.stage))?;
            gl.shader_source(shader.name(), &source.source);
            gl.compile_shader(shader.name());
            ctx.check("glCompileShader")?;

            if !gl.get_shader_compile_status(shader.name()) {
                let err = GlError::Compile {
                    stage: source.stage,
                    log: gl.get_shader_info_log(shader.name()).trim_end().to_owned(),
                };
                log::warn!("program {program}: {err}");
                append_line(&mut self.log, &err.to_string());
                return Err(err);
            }
            shaders.push(shader);
        }

        for shader in &shaders {
            gl.attach_shader(program, shader.name());
            ctx.check("glAttachShader")?;
        }
        gl.program_binary_retrievable_hint(program, true);
        ctx.check("glProgramParameteri")?;
        gl.link_program(program);
        ctx.check("glLinkProgram")?;
        let linked = gl.get_program_link_status(program);
        for shader in &shaders {
            gl.detach_shader(program, shader.name());
        }
        drop(shaders);

        if !linked {
            let err = GlError::Link {
                log: gl.get_program_info_log(program).trim_end().to_owned(),
            };
            log::warn!("program {program}: {err}");
            append_line(&mut self.log, &err.to_string());
            return Err(err);
        }

        self.binary = gl.get_program_binary(program);
        ctx.check("glGetProgramBinary")?;

        self.reflect(ctx)
    }

    /// Fills the slot tables from the linked program and creates its
    /// vertex array.
    fn reflect(&mut self, ctx: &Context) -> Result<()> {
        let gl = ctx.gl();
        let program = self.handle.name();

        self.attributes = reflect_attributes(gl, program)?;
        ctx.check("glGetActiveAttrib")?;
        self.uniforms = reflect_uniforms(gl, program)?;
        ctx.check("glGetActiveUniform")?;

        self.vertex_array = Some(Handle::create(ctx.driver(), ObjectKind::VertexArray)?);
        Ok(())
    }
}

fn append_line(log: &mut String, line: &str) {
    if !log.is_empty() {
        log.push('\n');
    }
    log.push_str(line);
}

/// Array uniforms are reported as `name[0]`; slots use the base name.
fn base_name(name: &str) -> &str {
    name.strip_suffix("[0]").unwrap_or(name)
}

fn shader_type(var: &ActiveVariable) -> Result<ShaderType> {
    ShaderType::try_from(var.gl_type).map_err(|code| GlError::UnsupportedType {
        name: var.name.clone(),
        code,
    })
}

fn reflect_attributes(gl: &dyn Driver, program: RawName) -> Result<SlotTable<AttributeSlot>> {
    let mut slots = Vec::new();
    for index in 0..gl.get_active_attributes(program) {
        let Some(var) = gl.get_active_attribute(program, index) else {
            continue;
        };
        let Some(location) = gl.get_attrib_location(program, &var.name) else {
            log::debug!("skipping built-in attribute `{}`", var.name);
            continue;
        };

        let ty = shader_type(&var)?;
        if ty.vertex_pointer().is_none() {
            return Err(GlError::UnsupportedType {
                name: var.name,
                code: var.gl_type,
            });
        }

        let count = usize::try_from(var.size).unwrap_or(1).max(1);
        slots.push(AttributeSlot::new(
            base_name(&var.name).to_owned(),
            location,
            count,
            ty,
        ));
    }

    Ok(SlotTable::build(
        slots,
        AttributeSlot::location,
        AttributeSlot::name,
    ))
}

fn reflect_uniforms(gl: &dyn Driver, program: RawName) -> Result<SlotTable<UniformSlot>> {
    let mut slots = Vec::new();
    for index in 0..gl.get_active_uniforms(program) {
        let Some(var) = gl.get_active_uniform(program, index) else {
            continue;
        };
        let Some(location) = gl.get_uniform_location(program, &var.name) else {
            log::debug!("skipping block member `{}`", var.name);
            continue;
        };

        let ty = shader_type(&var)?;
        let count = usize::try_from(var.size).unwrap_or(1).max(1);
        slots.push(UniformSlot::new(
            base_name(&var.name).to_owned(),
            location,
            count,
            ty,
        ));
    }

    Ok(SlotTable::build(
        slots,
        UniformSlot::location,
        UniformSlot::name,
    ))
}
