//! OpenGL access.
//!
//! The engine talks to the driver only through the [`Gl`] trait. Handles are
//! plain `u32` names where `0` means "none", matching the GL convention.
//!
//! - `GlowGl`: the production implementation on top of `glow`
//! - `HeadlessGl`: a recording software implementation for tests and CI,
//!   built with the `headless` feature
//!
//! `GlRef` is an `Rc`, which keeps every GPU object on the thread that owns
//! the context.

mod glow_backend;
#[cfg(any(test, feature = "headless"))]
mod headless;

use std::fmt;
use std::rc::Rc;

use crate::config::Config;
use crate::error::EngineError;

pub use glow_backend::GlowGl;
#[cfg(any(test, feature = "headless"))]
pub use headless::{GlCall, HeadlessGl};

/// Shared handle to the current GL context.
pub type GlRef = Rc<dyn Gl>;

/// Oldest context version the engine accepts (separate attribute formats).
pub const MIN_GL_VERSION: (u32, u32) = (4, 3);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "Vertex Shader",
            ShaderStage::Fragment => "Fragment Shader",
        })
    }
}

/// Resolved uniform slot in a linked program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Shape of a uniform value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniformKind {
    Float(u8),
    Int(u8),
    Uint(u8),
    Mat2,
    Mat3,
    Mat4,
}

/// Uniform payload. Vector kinds carry their component count (1..=4);
/// matrices are column-major with a transpose-on-upload flag.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformData {
    Float(u8, [f32; 4]),
    Int(u8, [i32; 4]),
    Uint(u8, [u32; 4]),
    Mat2([f32; 4], bool),
    Mat3([f32; 9], bool),
    Mat4([f32; 16], bool),
}

impl UniformData {
    pub fn kind(&self) -> UniformKind {
        match *self {
            UniformData::Float(n, _) => UniformKind::Float(n),
            UniformData::Int(n, _) => UniformKind::Int(n),
            UniformData::Uint(n, _) => UniformKind::Uint(n),
            UniformData::Mat2(..) => UniformKind::Mat2,
            UniformData::Mat3(..) => UniformKind::Mat3,
            UniformData::Mat4(..) => UniformKind::Mat4,
        }
    }

    /// Zero value of the given shape.
    pub fn zeroed(kind: UniformKind) -> Self {
        match kind {
            UniformKind::Float(n) => UniformData::Float(n, [0.0; 4]),
            UniformKind::Int(n) => UniformData::Int(n, [0; 4]),
            UniformKind::Uint(n) => UniformData::Uint(n, [0; 4]),
            UniformKind::Mat2 => UniformData::Mat2([0.0; 4], false),
            UniformKind::Mat3 => UniformData::Mat3([0.0; 9], false),
            UniformKind::Mat4 => UniformData::Mat4([0.0; 16], false),
        }
    }
}

/// One float vertex attribute read from a vertex buffer binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub index: u32,
    pub components: u32,
    /// Byte offset inside one vertex.
    pub offset: u32,
    pub binding: u32,
}

/// Driver calls issued by the engine.
///
/// Creation calls return `0` when the driver refuses to allocate.
pub trait Gl: fmt::Debug {
    fn version(&self) -> (u32, u32);

    // ── buffers ───────────────────────────────────────────────────────────
    fn create_buffer(&self) -> u32;
    /// Uploads `data` with static-draw usage, replacing the previous store.
    fn buffer_data(&self, buffer: u32, data: &[u8]);
    fn delete_buffer(&self, buffer: u32);

    // ── vertex arrays ─────────────────────────────────────────────────────
    fn create_vertex_array(&self) -> u32;
    fn delete_vertex_array(&self, vertex_array: u32);
    fn bind_vertex_array(&self, vertex_array: u32);
    fn vertex_array_attribute(&self, vertex_array: u32, attribute: VertexAttribute);
    fn vertex_array_vertex_buffer(&self, vertex_array: u32, binding: u32, buffer: u32, stride: u32);
    fn vertex_array_element_buffer(&self, vertex_array: u32, buffer: u32);

    // ── shaders ───────────────────────────────────────────────────────────
    fn create_shader(&self, stage: ShaderStage) -> u32;
    /// Compiles `source`; the error carries the driver info log.
    fn compile_shader(&self, shader: u32, source: &str) -> Result<(), String>;
    fn delete_shader(&self, shader: u32);
    fn create_program(&self) -> u32;
    /// Links the given stages; the error carries the driver info log.
    fn link_program(&self, program: u32, shaders: &[u32]) -> Result<(), String>;
    fn delete_program(&self, program: u32);
    fn use_program(&self, program: u32);

    // ── uniforms ──────────────────────────────────────────────────────────
    fn uniform_location(&self, program: u32, name: &str) -> Option<UniformLocation>;
    /// Writes to the currently bound program.
    fn set_uniform(&self, location: UniformLocation, data: &UniformData);
    fn get_uniform(&self, program: u32, location: UniformLocation, kind: UniformKind) -> Option<UniformData>;

    // ── state and drawing ─────────────────────────────────────────────────
    fn set_face_culling(&self, enabled: bool);
    fn set_depth_test(&self, enabled: bool);
    fn viewport(&self, x: i32, y: i32, width: u32, height: u32);
    fn clear(&self, color: [f32; 4]);
    /// Draws `count` indices from the bound vertex array as triangles.
    fn draw_triangles_indexed(&self, count: u32);
}

/// One-time GL state setup for a freshly created context.
pub fn initialize_gl(gl: &GlRef, config: &Config) -> Result<(), EngineError> {
    let (major, minor) = gl.version();
    if (major, minor) < MIN_GL_VERSION {
        return Err(EngineError::GlInit(format!(
            "OpenGL {}.{} or newer is required, the driver provides {major}.{minor}",
            MIN_GL_VERSION.0, MIN_GL_VERSION.1
        )));
    }

    gl.viewport(0, 0, config.window_width, config.window_height);
    gl.set_depth_test(true);

    log::info!("OpenGL {major}.{minor} initialized");
    Ok(())
}

/// Maps a `GL_DEBUG_SEVERITY_*` value to a log level.
pub fn debug_severity_level(severity: u32) -> log::Level {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => log::Level::Error,
        glow::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        glow::DEBUG_SEVERITY_LOW => log::Level::Debug,
        _ => log::Level::Trace,
    }
}
