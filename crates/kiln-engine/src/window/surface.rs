use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow};
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, DisplayApiPreference, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use super::native::NativeWindow;
use crate::error::EngineError;
use crate::gl::{GlRef, GlowGl};

/// Presentation target of the frame loop.
pub trait RenderSurface {
    /// Creates the GL context, makes it current on the calling thread and
    /// returns the loaded function table.
    fn load_gl(&mut self) -> Result<GlRef, EngineError>;

    fn swap_buffers(&self);

    fn resize(&self, width: u32, height: u32);
}

struct GlutinState {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
}

/// Window surface with an OpenGL 4.5 core context.
pub struct GlutinSurface {
    window: Arc<dyn NativeWindow>,
    state: Option<GlutinState>,
}

impl GlutinSurface {
    /// Nothing is created until [`RenderSurface::load_gl`], which must run on
    /// the thread that will render.
    pub fn new(window: Arc<dyn NativeWindow>) -> Self {
        Self { window, state: None }
    }

    fn create(&self) -> Result<(GlutinState, glow::Context)> {
        let raw_window = self
            .window
            .window_handle()
            .context("failed to get window handle")?
            .as_raw();
        let raw_display = self
            .window
            .display_handle()
            .context("failed to get display handle")?
            .as_raw();

        #[cfg(target_os = "windows")]
        let preference = DisplayApiPreference::Wgl(Some(raw_window));
        #[cfg(target_os = "macos")]
        let preference = DisplayApiPreference::Cgl;
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let preference = DisplayApiPreference::Egl;

        let display = unsafe { Display::new(raw_display, preference) }.context("failed to create GL display")?;

        let template = ConfigTemplateBuilder::new().with_stencil_size(8).build();
        let config = unsafe { display.find_configs(template) }
            .context("failed to query GL configs")?
            .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
            .ok_or_else(|| anyhow!("no suitable GL config"))?;

        let (width, height) = self.window.inner_size();
        let (width, height) = NonZeroU32::new(width)
            .zip(NonZeroU32::new(height))
            .ok_or_else(|| anyhow!("window has zero size ({width}x{height})"))?;

        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_window, width, height);
        let surface = unsafe { display.create_window_surface(&config, &attrs) }
            .context("failed to create window surface")?;

        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 5))))
            .with_profile(GlProfile::Core)
            .with_debug(cfg!(debug_assertions))
            .build(Some(raw_window));
        let context = unsafe { display.create_context(&config, &context_attrs) }
            .context("failed to create GL context")?
            .make_current(&surface)
            .context("failed to make GL context current")?;

        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::DontWait) {
            log::warn!("failed to disable vsync: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol))
        };

        Ok((GlutinState { context, surface }, gl))
    }
}

impl RenderSurface for GlutinSurface {
    fn load_gl(&mut self) -> Result<GlRef, EngineError> {
        let (state, gl) = self
            .create()
            .map_err(|e| EngineError::GlInit(format!("{e:#}")))?;
        self.state = Some(state);
        Ok(Rc::new(GlowGl::new(gl)))
    }

    fn swap_buffers(&self) {
        if let Some(state) = &self.state {
            if let Err(e) = state.surface.swap_buffers(&state.context) {
                log::error!("failed to swap buffers: {e}");
            }
        }
    }

    fn resize(&self, width: u32, height: u32) {
        let (Some(state), Some(w), Some(h)) = (&self.state, NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        state.surface.resize(&state.context, w, h);
    }
}
