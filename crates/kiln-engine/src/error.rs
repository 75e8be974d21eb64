use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::gl::ShaderStage;

/// Fatal initialization errors.
///
/// These unwind to the entry point; nothing in the engine retries them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("windowing initialization failed: {0}")]
    WindowingInit(String),

    #[error("OpenGL initialization failed: {0}")]
    GlInit(String),

    #[error("windowing is not initialized")]
    WindowingNotInitialized,

    #[error("window is already initialized")]
    WindowAlreadyInitialized,

    #[error("invalid window dimensions: {width} x {height}")]
    InvalidWindowDimensions { width: u32, height: u32 },

    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("failed to spawn the frame loop thread")]
    Spawn(#[source] io::Error),

    #[error("frame loop thread panicked")]
    FrameLoopPanicked,
}

/// File loading failure.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileError::NotFound { path } | FileError::Io { path, .. } => path,
        }
    }
}

/// Config loading failure.
///
/// `NotFound` and `Parse` are handled differently by [`Context::load_config`](crate::Context::load_config).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error(transparent)]
    Read(FileError),

    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl From<FileError> for ConfigError {
    fn from(e: FileError) -> Self {
        match e {
            FileError::NotFound { path } => ConfigError::NotFound { path },
            other => ConfigError::Read(other),
        }
    }
}

/// Shader program build failure.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to load shader source {}", path.display())]
    Source { path: PathBuf, source: FileError },

    #[error("[{stage}] Compilation failed")]
    Compilation { stage: ShaderStage, log: String },

    #[error("Shader program linking failed")]
    Linking { log: String },
}

impl ShaderError {
    /// Driver diagnostic attached to the failure, if any.
    pub fn info_log(&self) -> Option<&str> {
        match self {
            ShaderError::Compilation { log, .. } | ShaderError::Linking { log } => Some(log),
            ShaderError::Source { .. } => None,
        }
    }
}

/// Model import failure.
#[derive(Debug, Error)]
#[error("failed to load model {}: {info}", path.display())]
pub struct ModelLoadError {
    pub path: PathBuf,
    pub info: String,
}
