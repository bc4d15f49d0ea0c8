use std::collections::HashMap;

use crate::error::ValidationError;
use crate::resource::{Buffer, Sampler, Texture};
use crate::types::ShaderType;

/// Stable reference to an attribute slot, valid for the build that issued it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeId {
    pub(super) key: SlotKey,
}

/// Stable reference to a uniform slot, valid for the build that issued it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformId {
    pub(super) key: SlotKey,
}

/// Owning program serial, build generation and table index.
///
/// The serial is process-unique; GL names are recycled and cannot
/// identify a program once it has been deleted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) struct SlotKey {
    pub program: u64,
    pub build: u32,
    pub index: usize,
}

/// Per-attribute binding record.
#[derive(Debug, Clone)]
pub struct AttributeSlot {
    name: String,
    location: u32,
    count: usize,
    ty: ShaderType,
    pub(super) stride: usize,
    pub(super) offset: usize,
    pub(super) buffer: Option<Buffer>,
    pub(super) dirty: bool,
}

impl AttributeSlot {
    pub(super) fn new(name: String, location: u32, count: usize, ty: ShaderType) -> Self {
        Self {
            name,
            location,
            count,
            ty,
            stride: 0,
            offset: 0,
            buffer: None,
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First location; matrices and arrays occupy the following ones too.
    pub fn location(&self) -> u32 {
        self.location
    }

    /// Array size; 1 for non-arrays.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn shader_type(&self) -> ShaderType {
        self.ty
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn buffer(&self) -> Option<&Buffer> {
        self.buffer.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Per-uniform binding record.
///
/// The backing store holds `count × byte_size(type)` bytes as 32-bit words;
/// every reflected type is built from 4-byte scalars.
#[derive(Debug, Clone)]
pub struct UniformSlot {
    name: String,
    location: u32,
    count: usize,
    ty: ShaderType,
    pub(super) store: Vec<u32>,
    pub(super) dirty: bool,
    pub(super) texture: Option<Texture>,
    pub(super) sampler: Option<Sampler>,
    pub(super) unit: Option<u32>,
}

impl UniformSlot {
    pub(super) fn new(name: String, location: u32, count: usize, ty: ShaderType) -> Self {
        let words = count * ty.byte_size() / 4;
        Self {
            name,
            location,
            count,
            ty,
            store: vec![0; words],
            dirty: false,
            texture: None,
            sampler: None,
            unit: None,
        }
    }

    /// Copies `bytes` to the front of the store and marks the slot dirty.
    /// Oversized writes are rejected and leave the store untouched.
    pub(super) fn write(&mut self, bytes: &[u8]) -> Result<(), ValidationError> {
        let capacity = self.capacity();
        if bytes.len() > capacity {
            return Err(ValidationError::UniformOverflow {
                name: self.name.clone(),
                capacity,
                requested: bytes.len(),
            });
        }
        bytemuck::cast_slice_mut::<u32, u8>(&mut self.store)[..bytes.len()].copy_from_slice(bytes);
        self.dirty = true;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> u32 {
        self.location
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn shader_type(&self) -> ShaderType {
        self.ty
    }

    /// Size of the backing store in bytes.
    pub fn capacity(&self) -> usize {
        self.store.len() * 4
    }

    /// Current value bytes, uploaded or not.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.store)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn sampler(&self) -> Option<&Sampler> {
        self.sampler.as_ref()
    }

    /// Texture unit assigned by `set_sampler`.
    pub fn unit(&self) -> Option<u32> {
        self.unit
    }
}

/// Slots ordered by location plus a name index built once per link.
#[derive(Debug)]
pub(super) struct SlotTable<T> {
    pub slots: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> SlotTable<T> {
    /// Sorts by `location` and indexes by `name`.
    pub fn build(
        mut slots: Vec<T>,
        location: impl Fn(&T) -> u32,
        name: impl Fn(&T) -> &str,
    ) -> Self {
        slots.sort_by_key(|s| location(s));
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (name(s).to_owned(), i))
            .collect();
        Self { slots, index }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|i| &self.slots[i])
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}
