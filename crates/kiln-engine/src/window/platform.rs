//! `winit` implementation of the native window seam.

use std::sync::Arc;

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle as RawWindowHandle,
};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;

use super::native::{NativeWindow, WindowDescriptor, WindowSystem};
use crate::error::EngineError;

/// Creates windows on a running `winit` event loop.
pub struct WinitWindowSystem<'a> {
    event_loop: &'a ActiveEventLoop,
}

impl<'a> WinitWindowSystem<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop) -> Self {
        Self { event_loop }
    }
}

impl WindowSystem for WinitWindowSystem<'_> {
    fn create_window(&self, descriptor: &WindowDescriptor) -> Result<Arc<dyn NativeWindow>, EngineError> {
        let attrs = winit::window::Window::default_attributes()
            .with_title(descriptor.title.clone())
            .with_inner_size(PhysicalSize::new(descriptor.width, descriptor.height))
            .with_min_inner_size(PhysicalSize::new(descriptor.min_width, descriptor.min_height))
            .with_maximized(descriptor.maximized);

        let window = self
            .event_loop
            .create_window(attrs)
            .map_err(|e| EngineError::WindowCreation(e.to_string()))?;

        Ok(Arc::new(WinitNativeWindow(window)))
    }
}

#[derive(Debug)]
pub struct WinitNativeWindow(winit::window::Window);

impl WinitNativeWindow {
    pub fn inner(&self) -> &winit::window::Window {
        &self.0
    }
}

impl HasWindowHandle for WinitNativeWindow {
    fn window_handle(&self) -> Result<RawWindowHandle<'_>, HandleError> {
        self.0.window_handle()
    }
}

impl HasDisplayHandle for WinitNativeWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.0.display_handle()
    }
}

impl NativeWindow for WinitNativeWindow {
    fn id(&self) -> u64 {
        u64::from(self.0.id())
    }

    fn inner_size(&self) -> (u32, u32) {
        let size = self.0.inner_size();
        (size.width, size.height)
    }

    fn request_inner_size(&self, width: u32, height: u32) {
        // The platform may apply the size asynchronously and report it
        // through a later `Resized` event.
        let _ = self.0.request_inner_size(PhysicalSize::new(width, height));
    }

    fn set_min_inner_size(&self, width: u32, height: u32) {
        self.0.set_min_inner_size(Some(PhysicalSize::new(width, height)));
    }

    fn set_title(&self, title: &str) {
        self.0.set_title(title);
    }

    fn maximize(&self) {
        self.0.set_maximized(true);
    }

    fn outer_position(&self) -> Option<(i32, i32)> {
        self.0.outer_position().ok().map(|p| (p.x, p.y))
    }

    fn set_outer_position(&self, x: i32, y: i32) {
        self.0.set_outer_position(PhysicalPosition::new(x, y));
    }
}
