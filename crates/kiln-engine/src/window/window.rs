use std::fmt;
use std::sync::Arc;

use super::native::{NativeWindow, WindowDescriptor, WindowSystem};
use super::state::{Waker, WindowHandle, WindowState};
use crate::color::Color;
use crate::context::Context;
use crate::error::EngineError;

/// The application window, owned by the event thread.
///
/// Size changes and title updates requested from the render thread travel
/// through [`WindowHandle`] and are applied here.
pub struct Window {
    native: Option<Arc<dyn NativeWindow>>,
    state: Arc<WindowState>,
    waker: Option<Waker>,
    title: String,
    min_size: (u32, u32),
    start_maximized: bool,
    position: (i32, i32),
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("native", &self.native)
            .field("state", &self.state)
            .field("title", &self.title)
            .field("min_size", &self.min_size)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl Window {
    /// Captures the window settings of the context's config. No native
    /// window exists until [`initialize`](Self::initialize).
    pub fn new(ctx: &Context) -> Self {
        let config = ctx.config();
        Self {
            native: None,
            state: Arc::new(WindowState::new(
                config.window_width,
                config.window_height,
                config.background_color,
            )),
            waker: None,
            title: config.window_title.clone(),
            min_size: (config.min_window_width, config.min_window_height),
            start_maximized: config.start_window_maximized,
            position: (0, 0),
        }
    }

    /// Creates the native window and registers it as the context's current
    /// window.
    pub fn initialize(&mut self, ctx: &mut Context, system: &dyn WindowSystem) -> Result<(), EngineError> {
        if !ctx.is_windowing_ready() {
            return Err(EngineError::WindowingNotInitialized);
        }
        if self.native.is_some() {
            return Err(EngineError::WindowAlreadyInitialized);
        }
        let (width, height) = self.state.size();
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidWindowDimensions { width, height });
        }

        let native = system.create_window(&WindowDescriptor {
            title: self.title.clone(),
            width,
            height,
            min_width: self.min_size.0,
            min_height: self.min_size.1,
            maximized: self.start_maximized,
        })?;

        if self.start_maximized {
            native.maximize();
        }
        native.set_min_inner_size(self.min_size.0, self.min_size.1);
        self.position = native.outer_position().unwrap_or_default();

        ctx.set_current_window(Some(native.id()));
        self.waker = ctx.waker();
        self.state.set_active(true);
        self.native = Some(native);

        log::info!(target: "kiln::window", "window created ({width}x{height})");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.native.is_some()
    }

    pub fn native(&self) -> Option<&Arc<dyn NativeWindow>> {
        self.native.as_ref()
    }

    /// Resizes the window.
    ///
    /// Sizes below the configured minimum are ignored, as is the current
    /// size. The viewport follows on the renderer's next update.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (min_width, min_height) = self.min_size;
        if width < min_width || height < min_height {
            log::debug!(
                target: "kiln::window",
                "ignoring resize to {width}x{height}, minimum is {min_width}x{min_height}"
            );
            return;
        }
        if self.state.size() == (width, height) {
            return;
        }

        if let Some(native) = &self.native {
            native.request_inner_size(width, height);
        }
        self.state.set_size(width, height);
        log::trace!(target: "kiln::window", "resized to {width}x{height}");
    }

    /// Native refresh/resize notification.
    pub fn refresh(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if self.state.size() != (width, height) {
            self.resize(width, height);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.state.size()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title == self.title {
            return;
        }
        if let Some(native) = &self.native {
            native.set_title(&title);
        }
        log::trace!(target: "kiln::window", "title set to {title:?}");
        self.title = title;
    }

    /// Applies deferred changes recorded by the render thread.
    pub fn update(&mut self) {
        if let Some(title) = self.state.pending_title().take() {
            self.set_title(title);
        }
    }

    pub fn background_color(&self) -> Color {
        self.state.background()
    }

    pub fn set_background_color(&self, color: Color) {
        self.state.set_background(color);
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        if let Some(native) = &self.native {
            native.set_outer_position(x, y);
        }
        self.position = (x, y);
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn close(&self) {
        self.state.set_active(false);
    }

    /// Releases the native window. The window can be initialized again.
    pub fn destroy(&mut self) {
        let Some(native) = self.native.take() else {
            return;
        };
        self.state.set_active(false);
        log::debug!(target: "kiln::window", "window {} destroyed", native.id());
    }

    /// Destroys the window and, if it is the context's current window,
    /// unregisters it there.
    pub fn release(&mut self, ctx: &mut Context) {
        if let Some(native) = &self.native {
            if ctx.current_window() == Some(native.id()) {
                ctx.set_current_window(None);
            }
        }
        self.destroy();
    }

    /// Render-thread view of this window.
    pub fn handle(&self) -> WindowHandle {
        WindowHandle::new(self.state.clone(), self.waker.clone())
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::FakeWindowSystem;

    fn context(config: Config) -> Context {
        Context::headless().with_config(config)
    }

    fn open(config: Config) -> (Context, FakeWindowSystem, Window) {
        let mut ctx = context(config);
        let system = FakeWindowSystem::new();
        let mut window = Window::new(&ctx);
        window.initialize(&mut ctx, &system).unwrap();
        (ctx, system, window)
    }

    // ── initialize ──

    #[test]
    fn initialize_requires_windowing() {
        let mut ctx = Context::new();
        let mut window = Window::new(&ctx);
        let err = window.initialize(&mut ctx, &FakeWindowSystem::new()).unwrap_err();
        assert!(matches!(err, EngineError::WindowingNotInitialized));
        assert!(!window.is_initialized());
    }

    #[test]
    fn initialize_twice_fails() {
        let (mut ctx, system, mut window) = open(Config::default());
        let err = window.initialize(&mut ctx, &system).unwrap_err();
        assert!(matches!(err, EngineError::WindowAlreadyInitialized));
        assert_eq!(system.created(), 1);
    }

    #[test]
    fn initialize_rejects_zero_size() {
        let mut ctx = context(Config::default().with_window_width(0));
        let mut window = Window::new(&ctx);
        let err = window.initialize(&mut ctx, &FakeWindowSystem::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindowDimensions { width: 0, .. }));
    }

    #[test]
    fn initialize_applies_config() {
        let cfg = Config::default()
            .with_window_title("demo")
            .with_min_window_size(320, 200)
            .with_start_window_maximized(true);
        let (ctx, system, window) = open(cfg);

        let native = system.last().unwrap();
        assert!(window.is_active());
        assert!(native.is_maximized());
        assert_eq!(native.min_size(), (320, 200));
        assert_eq!(native.title(), "demo");
        assert_eq!(window.position(), native.outer_position().unwrap());
        assert_eq!(ctx.current_window(), Some(native.id()));
    }

    // ── resize ──

    #[test]
    fn resize_below_minimum_is_ignored() {
        let cfg = Config::default().with_min_window_size(640, 480);
        let (_ctx, system, mut window) = open(cfg);
        let before = window.size();

        window.resize(320, 600);
        window.resize(700, 100);

        assert_eq!(window.size(), before);
        assert_eq!(system.last().unwrap().resize_requests(), 0);
    }

    #[test]
    fn resize_to_current_size_is_noop() {
        let (_ctx, system, mut window) = open(Config::default());
        let (w, h) = window.size();
        window.resize(w, h);
        assert_eq!(system.last().unwrap().resize_requests(), 0);
    }

    #[test]
    fn resize_flags_attached_renderer() {
        let (_ctx, system, mut window) = open(Config::default());
        let handle = window.handle();

        window.resize(1024, 768);
        assert_eq!(handle.take_resize(), None);

        handle.state().set_renderer_attached(true);
        window.resize(1280, 720);
        assert_eq!(window.size(), (1280, 720));
        assert_eq!(system.last().unwrap().inner_size(), (1280, 720));
        assert_eq!(handle.take_resize(), Some((1280, 720)));
    }

    #[test]
    fn refresh_ignores_zero_size() {
        let (_ctx, _system, mut window) = open(Config::default());
        let before = window.size();
        window.refresh(0, 0);
        assert_eq!(window.size(), before);

        window.refresh(900, 700);
        assert_eq!(window.size(), (900, 700));
    }

    // ── title ──

    #[test]
    fn title_change_is_deferred_to_update() {
        let (_ctx, system, mut window) = open(Config::default().with_window_title("kiln"));
        let handle = window.handle();

        handle.set_needs_to_change_title("kiln - 60");
        handle.set_needs_to_change_title("kiln - 61");
        assert_eq!(window.title(), "kiln");

        window.update();
        assert_eq!(window.title(), "kiln - 61");
        assert_eq!(system.last().unwrap().title(), "kiln - 61");
    }

    #[test]
    fn same_title_is_not_reapplied() {
        let (_ctx, system, mut window) = open(Config::default().with_window_title("kiln"));
        window.set_title("kiln");
        assert_eq!(system.last().unwrap().title_changes(), 0);
    }

    // ── lifecycle ──

    #[test]
    fn close_and_destroy() {
        let (mut ctx, system, mut window) = open(Config::default());
        let handle = window.handle();

        window.close();
        assert!(!handle.is_active());

        window.destroy();
        window.destroy();
        assert!(!window.is_initialized());

        window.initialize(&mut ctx, &system).unwrap();
        assert!(window.is_active());
        assert_eq!(system.created(), 2);
    }

    #[test]
    fn release_clears_current_window() {
        let (mut ctx, system, mut window) = open(Config::default());
        let id = system.last().unwrap().id();
        assert_eq!(ctx.current_window(), Some(id));

        window.release(&mut ctx);
        assert!(!window.is_initialized());
        assert_eq!(ctx.current_window(), None);
        assert!(ctx.is_windowing_ready());
    }

    #[test]
    fn release_keeps_another_current_window() {
        let (mut ctx, _system, mut window) = open(Config::default());
        ctx.set_current_window(Some(u64::MAX));

        window.release(&mut ctx);
        assert_eq!(ctx.current_window(), Some(u64::MAX));
    }

    #[test]
    fn background_is_shared_with_handle() {
        let (_ctx, _system, window) = open(Config::default());
        let color = Color::new(1, 2, 3, 255);
        window.handle().set_background_color(color);
        assert_eq!(window.background_color(), color);
    }

    #[test]
    fn position_is_forwarded() {
        let (_ctx, system, mut window) = open(Config::default());
        window.set_position(40, 60);
        assert_eq!(window.position(), (40, 60));
        assert_eq!(system.last().unwrap().outer_position(), Some((40, 60)));
    }
}
