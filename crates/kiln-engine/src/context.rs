//! Process-level engine state.
//!
//! [`Context`] owns the windowing event loop, the active [`Config`], the file
//! loader and the input registry. It moves through
//! `Uninitialized -> WindowingReady -> GlReady`: [`Context::setup`] creates
//! the event loop, the render thread initializes GL once per context.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use winit::event_loop::{EventLoop, EventLoopProxy};

use crate::config::Config;
use crate::core::RuntimeEvent;
use crate::error::{ConfigError, EngineError};
use crate::files::{FileLoader, FsFileLoader};
use crate::gl::{self, GlRef};
use crate::input::InputRegistry;
use crate::logging;
use crate::window::Waker;

pub struct Context {
    event_loop: Option<EventLoop<RuntimeEvent>>,
    proxy: Option<Arc<Mutex<EventLoopProxy<RuntimeEvent>>>>,
    windowing_ready: bool,
    config: Config,
    files: Arc<dyn FileLoader>,
    input: Arc<InputRegistry>,
    gl_ready: Arc<AtomicBool>,
    current_window: Option<u64>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("windowing_ready", &self.windowing_ready)
            .field("config", &self.config)
            .field("files", &self.files)
            .field("gl_ready", &self.gl_ready.load(Ordering::Relaxed))
            .field("current_window", &self.current_window)
            .finish_non_exhaustive()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Context with the default config, reading files from disk.
    /// Windowing is not set up yet.
    pub fn new() -> Self {
        Self {
            event_loop: None,
            proxy: None,
            windowing_ready: false,
            config: Config::default(),
            files: Arc::new(FsFileLoader),
            input: Arc::new(InputRegistry::new()),
            gl_ready: Arc::new(AtomicBool::new(false)),
            current_window: None,
        }
    }

    /// Context whose windowing is provided by the caller instead of an event
    /// loop, as with in-memory window systems.
    pub fn headless() -> Self {
        let mut ctx = Self::new();
        ctx.windowing_ready = true;
        ctx
    }

    /// Replaces the config and applies its log verbosity.
    pub fn with_config(mut self, config: Config) -> Self {
        self.set_config(config);
        self
    }

    pub fn with_file_loader(mut self, files: Arc<dyn FileLoader>) -> Self {
        self.files = files;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        logging::set_verbosity(config.verbosity);
        self.config = config;
    }

    pub fn files(&self) -> &Arc<dyn FileLoader> {
        &self.files
    }

    pub fn input(&self) -> &Arc<InputRegistry> {
        &self.input
    }

    /// Loads the config at `path` through the file loader.
    ///
    /// A missing file falls back to the defaults. A file that cannot be read
    /// or parsed leaves the current config in place.
    pub fn load_config(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.files.load_config(path) {
            Ok(config) => {
                log::info!("config loaded from {}", path.display());
                self.set_config(config);
            }
            Err(e @ ConfigError::NotFound { .. }) => {
                log::warn!("{e}, using defaults");
                self.set_config(Config::default());
            }
            Err(e) => {
                log::error!("{e:#}, keeping the current config");
            }
        }
    }

    /// Creates the windowing event loop. Calling it again is a no-op.
    pub fn setup(&mut self) -> Result<(), EngineError> {
        if self.windowing_ready {
            return Ok(());
        }

        let event_loop = EventLoop::<RuntimeEvent>::with_user_event()
            .build()
            .map_err(|e| EngineError::WindowingInit(e.to_string()))?;

        self.proxy = Some(Arc::new(Mutex::new(event_loop.create_proxy())));
        self.event_loop = Some(event_loop);
        self.windowing_ready = true;

        log::debug!("windowing initialized");
        Ok(())
    }

    /// Drops the event loop. A no-op unless windowing is set up.
    pub fn terminate(&mut self) {
        if !self.windowing_ready {
            return;
        }
        self.event_loop = None;
        self.proxy = None;
        self.windowing_ready = false;
        self.current_window = None;
        log::debug!("windowing terminated");
    }

    pub fn is_windowing_ready(&self) -> bool {
        self.windowing_ready
    }

    pub fn current_window(&self) -> Option<u64> {
        self.current_window
    }

    pub(crate) fn set_current_window(&mut self, id: Option<u64>) {
        self.current_window = id;
    }

    /// Wakes the event loop with `event`. `None` without an event loop.
    pub(crate) fn event_sender(&self, event: RuntimeEvent) -> Option<Waker> {
        let proxy = self.proxy.clone()?;
        Some(Arc::new(move || {
            // Fails only once the loop has exited; nothing is left to wake.
            let _ = proxy
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .send_event(event);
        }))
    }

    pub(crate) fn waker(&self) -> Option<Waker> {
        self.event_sender(RuntimeEvent::Wake)
    }

    /// Hands the event loop to the runtime, which consumes it.
    pub(crate) fn take_event_loop(&mut self) -> Option<EventLoop<RuntimeEvent>> {
        self.event_loop.take()
    }

    pub fn is_gl_ready(&self) -> bool {
        self.gl_ready.load(Ordering::Acquire)
    }

    pub(crate) fn gl_guard(&self) -> GlGuard {
        GlGuard {
            ready: self.gl_ready.clone(),
            config: self.config.clone(),
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// One-time GL setup shared between a context and its render thread.
#[derive(Debug, Clone)]
pub(crate) struct GlGuard {
    ready: Arc<AtomicBool>,
    config: Config,
}

impl GlGuard {
    /// Runs [`gl::initialize_gl`] unless it already succeeded for this
    /// context.
    pub(crate) fn ensure(&self, gl: &GlRef) -> Result<(), EngineError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }
        gl::initialize_gl(gl, &self.config)?;
        self.ready.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::files::MemoryFileLoader;
    use crate::gl::GlCall;
    use crate::testing;

    fn with_files(files: MemoryFileLoader) -> Context {
        Context::headless().with_file_loader(Arc::new(files))
    }

    // ── config ──

    #[test]
    fn load_config_reads_file() {
        let mut ctx = with_files(MemoryFileLoader::new().with_file(
            "config.toml",
            "background_color = \"#ff0000\"\n[window]\ntitle = \"loaded\"\n",
        ));
        ctx.load_config("config.toml");
        assert_eq!(ctx.config().window_title, "loaded");
        assert_eq!(ctx.config().background_color, Color::new(255, 0, 0, 255));
    }

    #[test]
    fn missing_config_resets_to_defaults() {
        let mut ctx = with_files(MemoryFileLoader::new())
            .with_config(Config::default().with_window_title("custom"));
        ctx.load_config("missing.toml");
        assert_eq!(ctx.config(), &Config::default());
    }

    #[test]
    fn malformed_config_keeps_current() {
        let current = Config::default().with_window_title("custom").with_window_width(1024);
        let mut ctx = with_files(MemoryFileLoader::new().with_file("bad.toml", "[window\nwidth = "))
            .with_config(current.clone());
        ctx.load_config("bad.toml");
        assert_eq!(ctx.config(), &current);
    }

    // ── lifecycle ──

    #[test]
    fn new_context_is_not_ready() {
        let ctx = Context::new();
        assert!(!ctx.is_windowing_ready());
        assert!(!ctx.is_gl_ready());
        assert_eq!(ctx.current_window(), None);
    }

    #[test]
    fn headless_context_is_ready_without_event_loop() {
        let mut ctx = Context::headless();
        assert!(ctx.is_windowing_ready());
        assert!(!ctx.is_gl_ready());
        assert_eq!(ctx.config(), &Config::default());
        assert!(ctx.take_event_loop().is_none());
        assert!(ctx.waker().is_none());
    }

    #[test]
    fn terminate_is_idempotent() {
        let mut ctx = Context::headless();
        ctx.set_current_window(Some(3));
        ctx.terminate();
        ctx.terminate();
        assert!(!ctx.is_windowing_ready());
        assert_eq!(ctx.current_window(), None);
    }

    #[test]
    fn setup_on_ready_context_is_noop() {
        let mut ctx = Context::headless();
        ctx.setup().unwrap();
        assert!(ctx.take_event_loop().is_none());
    }

    // ── gl ──

    #[test]
    fn gl_is_initialized_once() {
        let (h, gl) = testing::headless();
        let ctx = Context::headless();
        let guard = ctx.gl_guard();

        guard.ensure(&gl).unwrap();
        ctx.gl_guard().ensure(&gl).unwrap();

        assert!(ctx.is_gl_ready());
        assert_eq!(h.count(|c| matches!(c, GlCall::DepthTest(true))), 1);
    }

    #[test]
    fn failed_gl_init_is_retried() {
        let ctx = Context::headless();
        let old: GlRef = std::rc::Rc::new(crate::gl::HeadlessGl::with_version(3, 3));
        assert!(ctx.gl_guard().ensure(&old).is_err());
        assert!(!ctx.is_gl_ready());

        let (_, gl) = testing::headless();
        ctx.gl_guard().ensure(&gl).unwrap();
        assert!(ctx.is_gl_ready());
    }
}
