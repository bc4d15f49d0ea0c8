use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::Pod;

use crate::context::{Context, IndexType, Topology};
use crate::driver::{ProgramBinary, RawName};
use crate::error::{gl_int, Result, ValidationError};
use crate::resource::{Buffer, Handle, ObjectKind, Sampler, Texture};

use super::slots::{AttributeId, AttributeSlot, SlotKey, SlotTable, UniformId, UniformSlot};
use super::{ProgramState, ShaderSource};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Linked shader program with reflected attribute and uniform tables.
///
/// Setters only record values and mark slots dirty. Nothing reaches the
/// driver until [`Program::prepare`] (or a draw) flushes the dirty slots.
#[derive(Debug)]
pub struct Program {
    pub(super) handle: Handle,
    pub(super) serial: u64,
    pub(super) sources: Vec<ShaderSource>,
    pub(super) state: ProgramState,
    pub(super) log: String,
    pub(super) build: u32,
    pub(super) binary: Option<ProgramBinary>,
    pub(super) vertex_array: Option<Handle>,
    pub(super) attributes: SlotTable<AttributeSlot>,
    pub(super) uniforms: SlotTable<UniformSlot>,
    pub(super) texture_units: u32,
}

impl Program {
    /// Creates an unbuilt program from ordered stage sources.
    pub fn new(ctx: &Context, sources: impl IntoIterator<Item = ShaderSource>) -> Result<Self> {
        let sources: Vec<_> = sources.into_iter().collect();
        if sources.is_empty() {
            return Err(ValidationError::NoShaderStages.into());
        }

        let handle = Handle::create(ctx.driver(), ObjectKind::Program)?;
        Ok(Self::unbuilt(ctx, handle, sources))
    }

    pub(super) fn unbuilt(ctx: &Context, handle: Handle, sources: Vec<ShaderSource>) -> Self {
        Self {
            handle,
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
            sources,
            state: ProgramState::Unbuilt,
            log: String::new(),
            build: 0,
            binary: None,
            vertex_array: None,
            attributes: SlotTable::default(),
            uniforms: SlotTable::default(),
            texture_units: ctx.texture_units(),
        }
    }

    // ── attributes ────────────────────────────────────────────────────────

    pub fn attribute_index(&self, name: &str) -> Option<AttributeId> {
        let index = self.attributes.position(name)?;
        Some(AttributeId {
            key: self.key(index),
        })
    }

    /// Sources attribute `name` from `buffer`.
    ///
    /// `stride` is the byte distance between vertices (0 for tightly packed),
    /// `offset` the byte position of the first element.
    pub fn set_attribute(
        &mut self,
        name: &str,
        buffer: &Buffer,
        stride: usize,
        offset: usize,
    ) -> Result<()> {
        self.ensure_linked()?;
        let id = self
            .attribute_index(name)
            .ok_or_else(|| ValidationError::UnknownAttribute(name.to_owned()))?;
        self.set_attribute_at(id, buffer, stride, offset)
    }

    pub fn set_attribute_at(
        &mut self,
        id: AttributeId,
        buffer: &Buffer,
        stride: usize,
        offset: usize,
    ) -> Result<()> {
        self.ensure_linked()?;
        let index = self.resolve(id.key, self.attributes.slots.len())?;
        let slot = &mut self.attributes.slots[index];

        slot.buffer = Some(buffer.clone());
        slot.stride = stride;
        slot.offset = offset;
        slot.dirty = true;
        Ok(())
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    pub fn uniform_index(&self, name: &str) -> Option<UniformId> {
        let index = self.uniforms.position(name)?;
        Some(UniformId {
            key: self.key(index),
        })
    }

    /// Stores `values` as the new leading bytes of uniform `name`.
    ///
    /// Only the byte size is checked against the reflected type; a write
    /// larger than the slot fails and leaves the old value in place.
    pub fn set_uniform<T: Pod>(&mut self, name: &str, values: &[T]) -> Result<()> {
        let id = self.require_uniform(name)?;
        self.set_uniform_at(id, values)
    }

    pub fn set_uniform_at<T: Pod>(&mut self, id: UniformId, values: &[T]) -> Result<()> {
        self.ensure_linked()?;
        let index = self.resolve(id.key, self.uniforms.slots.len())?;
        self.uniforms.slots[index].write(bytemuck::cast_slice(values))?;
        Ok(())
    }

    /// Single-value form of [`Program::set_uniform`].
    pub fn set_uniform_value<T: Pod>(&mut self, name: &str, value: &T) -> Result<()> {
        self.set_uniform(name, std::slice::from_ref(value))
    }

    /// Points sampler `name` at texture unit `unit` and binds `texture` there
    /// on every prepare.
    pub fn set_sampler(&mut self, name: &str, unit: u32, texture: &Texture) -> Result<()> {
        let id = self.require_uniform(name)?;
        let index = self.resolve(id.key, self.uniforms.slots.len())?;
        let available = self.texture_units;
        let slot = &mut self.uniforms.slots[index];

        let Some(expected) = slot.shader_type().sampler_target() else {
            return Err(ValidationError::NotASampler(name.to_owned()).into());
        };
        if expected != texture.target() {
            return Err(ValidationError::SamplerTargetMismatch {
                name: name.to_owned(),
                expected,
                found: texture.target(),
            }
            .into());
        }
        if unit >= available {
            return Err(ValidationError::TextureUnitOutOfRange { unit, available }.into());
        }

        let unit_value = unit as i32;
        slot.write(bytemuck::bytes_of(&unit_value))?;
        slot.texture = Some(texture.clone());
        slot.unit = Some(unit);
        Ok(())
    }

    /// Attaches a sampler object to sampler `name`, or detaches it with `None`.
    pub fn set_sampler_state(&mut self, name: &str, sampler: Option<&Sampler>) -> Result<()> {
        let id = self.require_uniform(name)?;
        let index = self.resolve(id.key, self.uniforms.slots.len())?;
        let slot = &mut self.uniforms.slots[index];

        if !slot.shader_type().is_sampler() {
            return Err(ValidationError::NotASampler(name.to_owned()).into());
        }
        slot.sampler = sampler.cloned();
        Ok(())
    }

    // ── draws ─────────────────────────────────────────────────────────────

    /// Prepares, then draws the vertices in `vertices`.
    pub fn execute(
        &mut self,
        ctx: &mut Context,
        topology: Topology,
        vertices: Range<u32>,
    ) -> Result<()> {
        if vertices.start > vertices.end {
            return Err(ValidationError::InvertedRange {
                start: vertices.start,
                end: vertices.end,
            }
            .into());
        }
        let first = gl_int(vertices.start as usize)?;
        let count = gl_int(vertices.len())?;

        self.prepare(ctx)?;
        ctx.draw_arrays(topology, first, count)
    }

    /// Prepares, then draws `count` indices read from `indices`, starting
    /// `offset` bytes into the buffer.
    pub fn execute_indexed(
        &mut self,
        ctx: &mut Context,
        topology: Topology,
        count: usize,
        index_type: IndexType,
        indices: &Buffer,
        offset: usize,
    ) -> Result<()> {
        let len = count.saturating_mul(index_type.size_of());
        let in_bounds = len != usize::MAX
            && offset
                .checked_add(len)
                .is_some_and(|end| end <= indices.size());
        if !in_bounds {
            return Err(ValidationError::OutOfRange {
                offset,
                len,
                size: indices.size(),
            }
            .into());
        }
        let count = gl_int(count)?;
        let offset = gl_int(offset)?;

        self.prepare(ctx)?;
        ctx.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, indices.handle())?;
        ctx.draw_elements(topology, count, index_type, offset)
    }

    // ── introspection ─────────────────────────────────────────────────────

    pub fn state(&self) -> ProgramState {
        self.state
    }

    pub fn name(&self) -> RawName {
        self.handle.name()
    }

    pub fn sources(&self) -> &[ShaderSource] {
        &self.sources
    }

    /// Compile and link diagnostics of the last build.
    pub fn log(&self) -> &str {
        &self.log
    }

    /// Binary image captured by the last successful build, or the one the
    /// program was loaded from. `None` when the driver has no binary formats.
    pub fn binary(&self) -> Option<&ProgramBinary> {
        self.binary.as_ref()
    }

    pub fn attributes(&self) -> &[AttributeSlot] {
        &self.attributes.slots
    }

    pub fn uniforms(&self) -> &[UniformSlot] {
        &self.uniforms.slots
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSlot> {
        self.attributes.get(name)
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformSlot> {
        self.uniforms.get(name)
    }

    pub fn active_attribute_count(&self) -> usize {
        self.attributes.slots.len()
    }

    pub fn active_uniform_count(&self) -> usize {
        self.uniforms.slots.len()
    }

    pub fn uniform_bytes(&self, name: &str) -> Option<&[u8]> {
        self.uniform(name).map(UniformSlot::bytes)
    }

    // ── helpers ───────────────────────────────────────────────────────────

    pub(super) fn ensure_linked(&self) -> Result<()> {
        if self.state == ProgramState::Linked {
            Ok(())
        } else {
            Err(ValidationError::NotLinked.into())
        }
    }

    fn require_uniform(&self, name: &str) -> Result<UniformId> {
        self.ensure_linked()?;
        self.uniform_index(name)
            .ok_or_else(|| ValidationError::UnknownUniform(name.to_owned()).into())
    }

    fn key(&self, index: usize) -> SlotKey {
        SlotKey {
            program: self.serial,
            build: self.build,
            index,
        }
    }

    /// Rejects ids issued by another program or by an earlier build.
    fn resolve(&self, key: SlotKey, len: usize) -> Result<usize> {
        if key.program == self.serial && key.build == self.build && key.index < len {
            Ok(key.index)
        } else {
            Err(ValidationError::UnknownSlot(key.index).into())
        }
    }
}
