use std::fmt;
use std::sync::Arc;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::error::EngineError;

/// OS window as seen by the engine.
///
/// Implementations must be shareable with the render thread, which creates
/// the GL surface from the raw handles.
pub trait NativeWindow: HasWindowHandle + HasDisplayHandle + Send + Sync + fmt::Debug {
    /// Stable identifier used to route native events back to the window.
    fn id(&self) -> u64;

    fn inner_size(&self) -> (u32, u32);
    fn request_inner_size(&self, width: u32, height: u32);
    fn set_min_inner_size(&self, width: u32, height: u32);
    fn set_title(&self, title: &str);
    fn maximize(&self);

    /// Top-left corner in screen coordinates, if the platform exposes it.
    fn outer_position(&self) -> Option<(i32, i32)>;
    fn set_outer_position(&self, x: i32, y: i32);
}

/// Creation parameters for one native window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub maximized: bool,
}

/// Factory for native windows.
pub trait WindowSystem {
    fn create_window(&self, descriptor: &WindowDescriptor) -> Result<Arc<dyn NativeWindow>, EngineError>;
}
