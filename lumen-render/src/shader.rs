//! WGSL shader program: per-stage compilation and linking.
//!
//! Stages are parsed and validated with naga (the front end wgpu uses)
//! when they are added, so errors surface before any pipeline is built.
//! Linking checks that both stages are present and export the expected
//! entry points. A linked program is frozen; a failed link discards both
//! stages so the program must be rebuilt.

use std::fmt;
use std::path::{Path, PathBuf};

use naga::valid::{Capabilities, ValidationFlags, Validator};
use thiserror::Error;

/// A programmable pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Shader program is already linked")]
    NotEditable,
    #[error("A {0} shader is already attached")]
    StageExists(ShaderStage),
    #[error("Failed to compile {stage} shader:\n{message}")]
    Compile { stage: ShaderStage, message: String },
    #[error("No {0} shader attached")]
    MissingStage(ShaderStage),
    #[error("Link failed: {0}")]
    Link(String),
    #[error("Failed to read shader '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

struct CompiledStage {
    source: String,
    module: naga::Module,
}

/// A vertex + fragment WGSL pair.
pub struct ShaderProgram {
    vertex: Option<CompiledStage>,
    fragment: Option<CompiledStage>,
    vertex_entry: String,
    fragment_entry: String,
    linked: bool,
}

impl ShaderProgram {
    /// Program expecting `vs_main` and `fs_main` entry points.
    pub fn new() -> Self {
        Self::with_entry_points("vs_main", "fs_main")
    }

    pub fn with_entry_points(vertex_entry: &str, fragment_entry: &str) -> Self {
        Self {
            vertex: None,
            fragment: None,
            vertex_entry: vertex_entry.to_string(),
            fragment_entry: fragment_entry.to_string(),
            linked: false,
        }
    }

    /// Compile `source` and attach it as `stage`.
    pub fn add_shader(&mut self, stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
        if self.linked {
            return Err(ShaderError::NotEditable);
        }
        if self.stage(stage).is_some() {
            return Err(ShaderError::StageExists(stage));
        }

        let module = compile(stage, source)?;
        log::debug!("Compiled {} shader ({} entry points)", stage, module.entry_points.len());
        *self.stage_mut(stage) = Some(CompiledStage {
            source: source.to_string(),
            module,
        });
        Ok(())
    }

    /// Read `path` and attach it as `stage`.
    pub fn add_shader_file(
        &mut self,
        stage: ShaderStage,
        path: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_shader(stage, &source)
    }

    /// Attach a vertex and a fragment shader from files.
    pub fn add_shaders(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        self.add_shader_file(ShaderStage::Vertex, vertex_path)?;
        self.add_shader_file(ShaderStage::Fragment, fragment_path)
    }

    /// Check both stages and freeze the program.
    pub fn link(&mut self) -> Result<(), ShaderError> {
        if self.linked {
            return Err(ShaderError::NotEditable);
        }

        let result = self.check_link();
        match &result {
            Ok(()) => {
                self.linked = true;
                log::info!(
                    "Linked shader program ({} / {})",
                    self.vertex_entry,
                    self.fragment_entry
                );
            }
            // Missing stages can still be added; anything else needs a rebuild.
            Err(ShaderError::MissingStage(_)) => {}
            Err(e) => {
                log::warn!("{}", e);
                self.vertex = None;
                self.fragment = None;
            }
        }
        result
    }

    fn check_link(&self) -> Result<(), ShaderError> {
        let vertex = self
            .vertex
            .as_ref()
            .ok_or(ShaderError::MissingStage(ShaderStage::Vertex))?;
        let fragment = self
            .fragment
            .as_ref()
            .ok_or(ShaderError::MissingStage(ShaderStage::Fragment))?;

        require_entry_point(&vertex.module, ShaderStage::Vertex, &self.vertex_entry)?;
        require_entry_point(&fragment.module, ShaderStage::Fragment, &self.fragment_entry)
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn is_editable(&self) -> bool {
        !self.linked
    }

    /// WGSL source of `stage`, if attached.
    pub fn source(&self, stage: ShaderStage) -> Option<&str> {
        self.stage(stage).map(|s| s.source.as_str())
    }

    pub fn entry_point(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex_entry,
            ShaderStage::Fragment => &self.fragment_entry,
        }
    }

    /// Detach both stages and make the program editable again.
    pub fn dispose(&mut self) {
        self.vertex = None;
        self.fragment = None;
        self.linked = false;
    }

    fn stage(&self, stage: ShaderStage) -> Option<&CompiledStage> {
        match stage {
            ShaderStage::Vertex => self.vertex.as_ref(),
            ShaderStage::Fragment => self.fragment.as_ref(),
        }
    }

    fn stage_mut(&mut self, stage: ShaderStage) -> &mut Option<CompiledStage> {
        match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        }
    }
}

impl Default for ShaderProgram {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(stage: ShaderStage, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        message: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            message: e.emit_to_string(source),
        })?;

    Ok(module)
}

fn require_entry_point(
    module: &naga::Module,
    stage: ShaderStage,
    name: &str,
) -> Result<(), ShaderError> {
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == name && ep.stage == stage.naga_stage());
    if found {
        Ok(())
    } else {
        Err(ShaderError::Link(format!("{stage} entry point '{name}' not found")))
    }
}

// ===================================================================
// Tests
// ===================================================================
