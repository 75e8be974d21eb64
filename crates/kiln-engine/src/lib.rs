//! Kiln engine crate.
//!
//! A small real-time OpenGL engine: a window with a two-thread frame loop,
//! move-only GPU buffers, hot-reloadable shaders with typed uniforms, and a
//! scene of lit models drawn by a state-caching renderer.

pub mod buffer;
pub mod color;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod files;
pub mod gl;
pub mod input;
pub mod logging;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;

pub use color::Color;
pub use config::Config;
pub use context::Context;
pub use core::{App, AppControl, AppCtx, Application};
pub use error::EngineError;
