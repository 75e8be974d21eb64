use std::sync::Arc;

use crate::config::Config;
use crate::files::FileLoader;
use crate::gl::GlRef;
use crate::input::InputRegistry;
use crate::render::Renderer;
use crate::scene::Scene;
use crate::window::{RenderSurface, WindowHandle};

/// Per-app context passed to every [`App`](super::App) callback.
pub struct AppCtx<'a> {
    pub(crate) gl: &'a GlRef,
    pub(crate) window: &'a WindowHandle,
    pub(crate) renderer: &'a mut Renderer,
    pub(crate) surface: &'a dyn RenderSurface,
    pub(crate) config: &'a Config,
    pub(crate) files: &'a Arc<dyn FileLoader>,
    pub(crate) input: &'a Arc<InputRegistry>,
}

impl AppCtx<'_> {
    pub fn gl(&self) -> &GlRef {
        self.gl
    }

    pub fn window(&self) -> &WindowHandle {
        self.window
    }

    pub fn renderer(&mut self) -> &mut Renderer {
        self.renderer
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn files(&self) -> &Arc<dyn FileLoader> {
        self.files
    }

    pub fn input(&self) -> &Arc<InputRegistry> {
        self.input
    }

    /// Clears to the window background, renders `scene` and presents.
    pub fn draw(&mut self, scene: &mut Scene) {
        self.renderer.clear(self.window.background_color());
        self.renderer.render(scene);
        self.surface.swap_buffers();
    }
}
