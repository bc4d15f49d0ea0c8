use std::fmt;
use std::rc::Rc;

use crate::driver::{Driver, RawName};
use crate::error::{GlError, Result};
use crate::types::ShaderStage;

/// Native object family; selects the create/delete entry points.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Buffer,
    Texture,
    Sampler,
    Shader(ShaderStage),
    Program,
    VertexArray,
}

/// Sole owner of one native name. Deletes it on drop.
struct Owned {
    gl: Rc<dyn Driver>,
    kind: ObjectKind,
    name: RawName,
}

impl Drop for Owned {
    fn drop(&mut self) {
        log::trace!("releasing {:?} {}", self.kind, self.name);
        match self.kind {
            ObjectKind::Buffer => self.gl.delete_buffer(self.name),
            ObjectKind::Texture => self.gl.delete_texture(self.name),
            ObjectKind::Sampler => self.gl.delete_sampler(self.name),
            ObjectKind::Shader(_) => self.gl.delete_shader(self.name),
            ObjectKind::Program => self.gl.delete_program(self.name),
            ObjectKind::VertexArray => self.gl.delete_vertex_array(self.name),
        }
    }
}

/// Shared ownership of a native object.
///
/// Cloning shares the object. The delete call is issued once, when the last
/// clone is dropped. Not `Send`: GL objects belong to the thread whose context
/// created them.
#[derive(Clone)]
pub struct Handle {
    owned: Rc<Owned>,
}

impl Handle {
    /// Creates a new native object of `kind`.
    pub(crate) fn create(gl: &Rc<dyn Driver>, kind: ObjectKind) -> Result<Self> {
        let created = match kind {
            ObjectKind::Buffer => gl.create_buffer(),
            ObjectKind::Texture => gl.create_texture(),
            ObjectKind::Sampler => gl.create_sampler(),
            ObjectKind::Shader(stage) => gl.create_shader(stage.to_gl()),
            ObjectKind::Program => gl.create_program(),
            ObjectKind::VertexArray => gl.create_vertex_array(),
        };

        let name = created.map_err(|message| GlError::Create { kind, message })?;
        log::trace!("created {kind:?} {name}");

        Ok(Self {
            owned: Rc::new(Owned {
                gl: Rc::clone(gl),
                kind,
                name,
            }),
        })
    }

    pub fn name(&self) -> RawName {
        self.owned.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.owned.kind
    }

    /// Number of live clones sharing the object.
    pub fn owners(&self) -> usize {
        Rc::strong_count(&self.owned)
    }

    /// Whether both handles refer to the same native object.
    pub fn same_object(&self, other: &Handle) -> bool {
        Rc::ptr_eq(&self.owned, &other.owned)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &self.owned.kind)
            .field("name", &self.owned.name)
            .field("owners", &self.owners())
            .finish()
    }
}
