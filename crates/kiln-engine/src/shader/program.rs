use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::buffer::{GlHandle, HandleKind};
use crate::error::ShaderError;
use crate::files::FileLoader;
use crate::gl::{GlRef, ShaderStage, UniformData, UniformKind, UniformLocation};

/// Linked vertex + fragment program.
///
/// A failed `initialize` or `reload` never touches the active program: the
/// new program replaces the old one only after it linked.
#[derive(Debug)]
pub struct Shader {
    program: GlHandle,
    vertex_path: PathBuf,
    fragment_path: PathBuf,
    binding: Rc<Binding>,
}

#[derive(Debug)]
struct Binding {
    gl: GlRef,
    depth: Cell<u32>,
}

/// Keeps a shader bound while alive.
///
/// Nested usages share one bind: the program is bound when the first usage
/// is taken and unbound when the last one drops.
#[must_use = "the shader is unbound when the usage is dropped"]
#[derive(Debug)]
pub struct ShaderUsage {
    binding: Rc<Binding>,
}

impl Drop for ShaderUsage {
    fn drop(&mut self) {
        let depth = self.binding.depth.get().saturating_sub(1);
        self.binding.depth.set(depth);
        if depth == 0 {
            self.binding.gl.use_program(0);
        }
    }
}

impl Shader {
    pub fn new(gl: &GlRef) -> Self {
        Self {
            program: GlHandle::empty(HandleKind::Program),
            vertex_path: PathBuf::new(),
            fragment_path: PathBuf::new(),
            binding: Rc::new(Binding {
                gl: gl.clone(),
                depth: Cell::new(0),
            }),
        }
    }

    pub fn from_files(
        gl: &GlRef,
        files: &dyn FileLoader,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Result<Self, ShaderError> {
        let mut shader = Self::new(gl);
        shader.initialize(files, vertex_path, fragment_path)?;
        Ok(shader)
    }

    /// Compiles and links both stages, then swaps the result in.
    pub fn initialize(
        &mut self,
        files: &dyn FileLoader,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Result<(), ShaderError> {
        let vertex_path = vertex_path.into();
        let fragment_path = fragment_path.into();
        let gl = self.binding.gl.clone();
        log::trace!(target: "kiln::shaders", "initializing shader program");

        let vertex = compile_stage(&gl, files, &vertex_path, ShaderStage::Vertex)?;
        let fragment = match compile_stage(&gl, files, &fragment_path, ShaderStage::Fragment) {
            Ok(id) => id,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let mut program = GlHandle::create(&gl, HandleKind::Program);
        let linked = gl.link_program(program.id(), &[vertex, fragment]);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if let Err(log) = linked {
            program.release();
            return Err(ShaderError::Linking { log });
        }

        self.destroy();
        self.program = program;
        self.vertex_path = vertex_path;
        self.fragment_path = fragment_path;

        if self.binding.depth.get() > 0 {
            self.use_program();
        }
        log::trace!(target: "kiln::shaders", "shader program {} initialized", self.id());
        Ok(())
    }

    /// `initialize` that logs the failure instead of returning it.
    pub fn try_initialize(
        &mut self,
        files: &dyn FileLoader,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> bool {
        report(self.initialize(files, vertex_path, fragment_path))
    }

    /// Rebuilds from the recorded source paths, or from new ones when given.
    pub fn reload(
        &mut self,
        files: &dyn FileLoader,
        vertex_path: Option<&Path>,
        fragment_path: Option<&Path>,
    ) -> Result<(), ShaderError> {
        let vertex_path = vertex_path.map_or_else(|| self.vertex_path.clone(), Path::to_path_buf);
        let fragment_path = fragment_path.map_or_else(|| self.fragment_path.clone(), Path::to_path_buf);

        self.initialize(files, vertex_path, fragment_path)?;
        log::info!(target: "kiln::shaders", "shaders reloaded");
        Ok(())
    }

    /// `reload` that logs the failure and keeps the previous program.
    pub fn try_reload(
        &mut self,
        files: &dyn FileLoader,
        vertex_path: Option<&Path>,
        fragment_path: Option<&Path>,
    ) -> bool {
        report(self.reload(files, vertex_path, fragment_path))
    }

    pub fn use_program(&self) {
        self.binding.gl.use_program(self.id());
    }

    pub fn forget(&self) {
        self.binding.gl.use_program(0);
    }

    pub fn scoped_usage(&self) -> ShaderUsage {
        let depth = self.binding.depth.get();
        if depth == 0 {
            self.use_program();
        }
        self.binding.depth.set(depth + 1);
        ShaderUsage {
            binding: self.binding.clone(),
        }
    }

    /// Number of outstanding scoped usages.
    pub fn usage_depth(&self) -> u32 {
        self.binding.depth.get()
    }

    /// Location of an active uniform. Uniforms optimized out by the driver
    /// resolve to `None`.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        if !self.is_initialized() {
            return None;
        }
        self.binding.gl.uniform_location(self.id(), name)
    }

    pub(crate) fn read_uniform(&self, location: UniformLocation, kind: UniformKind) -> Option<UniformData> {
        self.binding.gl.get_uniform(self.id(), location, kind)
    }

    pub fn gl(&self) -> &GlRef {
        &self.binding.gl
    }

    pub fn id(&self) -> u32 {
        self.program.id()
    }

    pub fn is_initialized(&self) -> bool {
        self.program.is_live()
    }

    pub fn vertex_path(&self) -> &Path {
        &self.vertex_path
    }

    pub fn fragment_path(&self) -> &Path {
        &self.fragment_path
    }

    pub fn destroy(&mut self) {
        if self.program.is_live() {
            self.program.release();
            log::trace!(target: "kiln::shaders", "shader program destroyed");
        }
    }
}

fn compile_stage(
    gl: &GlRef,
    files: &dyn FileLoader,
    path: &Path,
    stage: ShaderStage,
) -> Result<u32, ShaderError> {
    let source = files.load_text_file(path).map_err(|source| ShaderError::Source {
        path: path.to_path_buf(),
        source,
    })?;

    let id = gl.create_shader(stage);
    if let Err(log) = gl.compile_shader(id, &source) {
        gl.delete_shader(id);
        return Err(ShaderError::Compilation { stage, log });
    }

    log::trace!(target: "kiln::shaders", "{stage} compiled");
    Ok(id)
}

fn report(result: Result<(), ShaderError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::error!("{e}");
            if let Some(info) = e.info_log().filter(|l| !l.is_empty()) {
                log::error!("More info: {info}");
            } else if let ShaderError::Source { source, .. } = &e {
                log::error!("More info: {source}");
            }
            false
        }
    }
}
