use std::collections::HashMap;
use std::rc::Rc;

use crate::driver::{Driver, GlowDriver, RawName};
use crate::error::{self, Result};
use crate::resource::Handle;
use crate::types::TextureTarget;

use super::{Capability, ClearMask, ContextInit, DispatchStats, IndexType, Topology};

/// Draw dispatcher and owner of the driver.
///
/// Every wrapper reaches the driver through a `Context`. It remembers what it
/// last bound (program, vertex array, active texture unit, per-unit textures
/// and sampler objects) so activations that would not change driver state are
/// skipped. Cached entries hold shared handles: a cached object stays alive
/// until the cache moves on, so its native name cannot be recycled under it.
///
/// The cache only sees calls made through this type. After foreign code has
/// touched GL state, call [`Context::reset_state_cache`].
pub struct Context {
    gl: Rc<dyn Driver>,
    check_errors: bool,
    trace_calls: bool,
    texture_units: u32,

    program: Option<Handle>,
    vertex_array: Option<Handle>,
    active_unit: Option<u32>,
    unit_textures: HashMap<(u32, TextureTarget), Handle>,
    unit_samplers: HashMap<u32, Handle>,

    stats: DispatchStats,
}

impl Context {
    pub fn new(gl: Rc<dyn Driver>, init: ContextInit) -> Self {
        let ContextInit {
            check_errors,
            trace_calls,
            texture_units,
        } = init;

        let texture_units = texture_units.unwrap_or_else(|| {
            let queried = gl.get_parameter_i32(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS);
            u32::try_from(queried).unwrap_or(0)
        });

        log::debug!(
            "context ready: {texture_units} texture units, error checks {}",
            if check_errors { "on" } else { "off" }
        );

        Self {
            gl,
            check_errors,
            trace_calls,
            texture_units,
            program: None,
            vertex_array: None,
            active_unit: None,
            unit_textures: HashMap::new(),
            unit_samplers: HashMap::new(),
            stats: DispatchStats::default(),
        }
    }

    /// Wraps a loaded `glow` context.
    ///
    /// # Safety
    ///
    /// Same contract as [`GlowDriver::new`]: `gl` must be current on the calling
    /// thread for the lifetime of the returned context and of every object
    /// created through it.
    pub unsafe fn from_glow(gl: glow::Context, init: ContextInit) -> Self {
        let driver = unsafe { GlowDriver::new(gl) };
        Self::new(Rc::new(driver), init)
    }

    pub fn driver(&self) -> &Rc<dyn Driver> {
        &self.gl
    }

    pub(crate) fn gl(&self) -> &dyn Driver {
        &*self.gl
    }

    pub fn texture_units(&self) -> u32 {
        self.texture_units
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = DispatchStats::default();
    }

    /// Native name of the program the dispatcher believes is current.
    pub fn current_program(&self) -> Option<RawName> {
        self.program.as_ref().map(Handle::name)
    }

    /// Reports the driver error raised by `call`, if any.
    pub fn check(&self, call: &'static str) -> Result<()> {
        if self.trace_calls {
            log::trace!("{call}");
        }
        if self.check_errors {
            error::check(self.gl(), call)
        } else {
            Ok(())
        }
    }

    /// Forgets every cached binding; the next activation of each kind is
    /// issued unconditionally.
    pub fn reset_state_cache(&mut self) {
        self.program = None;
        self.vertex_array = None;
        self.active_unit = None;
        self.unit_textures.clear();
        self.unit_samplers.clear();
    }

    // ── framebuffer state ─────────────────────────────────────────────────

    pub fn clear(&self, mask: ClearMask) -> Result<()> {
        self.gl.clear(mask.bits());
        self.check("glClear")
    }

    pub fn set_clear_color(&self, color: impl Into<[f32; 4]>) -> Result<()> {
        let [r, g, b, a] = color.into();
        self.gl.clear_color(r, g, b, a);
        self.check("glClearColor")
    }

    pub fn enable(&self, capability: Capability) -> Result<()> {
        self.gl.enable(capability.to_gl());
        self.check("glEnable")
    }

    pub fn disable(&self, capability: Capability) -> Result<()> {
        self.gl.disable(capability.to_gl());
        self.check("glDisable")
    }

    pub fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.gl.viewport(x, y, width, height);
        self.check("glViewport")
    }

    /// Blocks until every submitted command has completed.
    pub fn finish(&self) {
        self.gl.finish();
    }

    // ── bindings ──────────────────────────────────────────────────────────

    /// Makes `program` current unless it already is.
    pub(crate) fn use_program(&mut self, program: &Handle) -> Result<()> {
        if self.program.as_ref().is_some_and(|p| p.same_object(program)) {
            self.stats.program_binds_elided += 1;
            return Ok(());
        }

        self.gl.use_program(Some(program.name()));
        self.stats.program_binds += 1;
        self.check("glUseProgram")?;
        self.program = Some(program.clone());
        Ok(())
    }

    pub(crate) fn bind_vertex_array(&mut self, vertex_array: &Handle) -> Result<()> {
        if self
            .vertex_array
            .as_ref()
            .is_some_and(|v| v.same_object(vertex_array))
        {
            return Ok(());
        }

        self.gl.bind_vertex_array(Some(vertex_array.name()));
        self.check("glBindVertexArray")?;
        self.vertex_array = Some(vertex_array.clone());
        Ok(())
    }

    /// Binds a buffer object. Buffer bindings are not cached.
    pub(crate) fn bind_buffer(&self, target: u32, buffer: &Handle) -> Result<()> {
        self.gl.bind_buffer(target, Some(buffer.name()));
        self.check("glBindBuffer")
    }

    /// Binds `texture` on whichever unit is active, for editing.
    pub(crate) fn bind_texture(&mut self, target: TextureTarget, texture: &Handle) -> Result<()> {
        let unit = self.active_unit.unwrap_or(0);
        self.bind_texture_unit(unit, target, texture)
    }

    /// Binds `texture` to `unit`, skipping the call when the unit already
    /// holds it.
    pub(crate) fn bind_texture_unit(
        &mut self,
        unit: u32,
        target: TextureTarget,
        texture: &Handle,
    ) -> Result<()> {
        if self
            .unit_textures
            .get(&(unit, target))
            .is_some_and(|t| t.same_object(texture))
        {
            self.stats.texture_binds_elided += 1;
            return Ok(());
        }

        self.select_unit(unit)?;
        self.gl.bind_texture(target.to_gl(), Some(texture.name()));
        self.stats.texture_binds += 1;
        self.check("glBindTexture")?;
        self.unit_textures.insert((unit, target), texture.clone());
        Ok(())
    }

    /// Binds a sampler object to `unit`, or clears the unit's sampler.
    pub(crate) fn bind_sampler_unit(&mut self, unit: u32, sampler: Option<&Handle>) -> Result<()> {
        let unchanged = match (self.unit_samplers.get(&unit), sampler) {
            (None, None) => true,
            (Some(bound), Some(wanted)) => bound.same_object(wanted),
            _ => false,
        };
        if unchanged {
            self.stats.texture_binds_elided += 1;
            return Ok(());
        }

        self.gl.bind_sampler(unit, sampler.map(Handle::name));
        self.stats.texture_binds += 1;
        self.check("glBindSampler")?;
        match sampler {
            Some(s) => self.unit_samplers.insert(unit, s.clone()),
            None => self.unit_samplers.remove(&unit),
        };
        Ok(())
    }

    fn select_unit(&mut self, unit: u32) -> Result<()> {
        if self.active_unit == Some(unit) {
            return Ok(());
        }
        self.gl.active_texture(glow::TEXTURE0 + unit);
        self.check("glActiveTexture")?;
        self.active_unit = Some(unit);
        Ok(())
    }

    // ── draws ─────────────────────────────────────────────────────────────

    pub(crate) fn draw_arrays(&mut self, topology: Topology, first: i32, count: i32) -> Result<()> {
        self.gl.draw_arrays(topology.to_gl(), first, count);
        self.stats.draw_calls += 1;
        self.check("glDrawArrays")
    }

    pub(crate) fn draw_elements(
        &mut self,
        topology: Topology,
        count: i32,
        index_type: IndexType,
        offset: i32,
    ) -> Result<()> {
        self.gl
            .draw_elements(topology.to_gl(), count, index_type.to_gl(), offset);
        self.stats.draw_calls += 1;
        self.check("glDrawElements")
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("check_errors", &self.check_errors)
            .field("texture_units", &self.texture_units)
            .field("program", &self.current_program())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
