use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::types::ShaderStage;

/// Source text for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub source: String,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, source: impl Into<String>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Reads the whole of `reader` as UTF-8 source text.
    pub fn from_reader(stage: ShaderStage, mut reader: impl Read) -> Result<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(Self { stage, source })
    }

    pub fn from_path(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading {stage} shader from {}", path.display());
        Self::from_reader(stage, std::fs::File::open(path)?)
    }

    pub fn vertex(source: impl Into<String>) -> Self {
        Self::new(ShaderStage::Vertex, source)
    }

    pub fn fragment(source: impl Into<String>) -> Self {
        Self::new(ShaderStage::Fragment, source)
    }

    pub fn geometry(source: impl Into<String>) -> Self {
        Self::new(ShaderStage::Geometry, source)
    }

    pub fn compute(source: impl Into<String>) -> Self {
        Self::new(ShaderStage::Compute, source)
    }
}

/// Build lifecycle of a [`Program`](super::Program).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramState {
    /// Created, never built.
    Unbuilt,
    /// Compiling or linking.
    Building,
    /// Tables are populated; binding and drawing are allowed.
    Linked,
    /// The last build failed; see [`Program::log`](super::Program::log).
    BuildFailed,
}
