use std::sync::Arc;

use super::app::{App, AppControl};
use super::ctx::AppCtx;
use crate::config::Config;
use crate::context::{Context, GlGuard};
use crate::error::EngineError;
use crate::files::FileLoader;
use crate::input::InputRegistry;
use crate::render::Renderer;
use crate::time::{FpsCounter, FrameClock};
use crate::window::{RenderSurface, WindowHandle};

/// Render-thread side of an application: owns the clock and drives the app
/// callbacks while the window is active.
#[derive(Debug)]
pub struct FrameLoop {
    window: WindowHandle,
    config: Config,
    files: Arc<dyn FileLoader>,
    input: Arc<InputRegistry>,
    gl: GlGuard,
    timer: FrameTimer,
}

#[derive(Debug, Default)]
struct FrameTimer {
    clock: FrameClock,
    fps: FpsCounter,
}

impl FrameLoop {
    pub fn new(ctx: &Context, window: WindowHandle) -> Self {
        Self {
            window,
            config: ctx.config().clone(),
            files: ctx.files().clone(),
            input: ctx.input().clone(),
            gl: ctx.gl_guard(),
            timer: FrameTimer::default(),
        }
    }

    /// Runs `app` until the window closes.
    ///
    /// Creates the GL context on the calling thread, builds the app with
    /// `make_app` and the renderer, then performs frames. Only GL setup
    /// failures are returned.
    pub fn main_loop<A, F>(&mut self, surface: &mut dyn RenderSurface, make_app: F) -> Result<(), EngineError>
    where
        A: App,
        F: FnOnce() -> A,
    {
        if !self.window.is_active() {
            log::warn!("frame loop started without an active window");
            return Ok(());
        }

        let gl = surface.load_gl()?;
        self.gl.ensure(&gl)?;

        let Self {
            window,
            config,
            files,
            input,
            timer,
            ..
        } = self;

        let mut renderer = Renderer::new(&gl, window.clone());
        let mut app = make_app();
        let mut ctx = AppCtx {
            gl: &gl,
            window,
            renderer: &mut renderer,
            surface: &*surface,
            config,
            files,
            input,
        };

        if app.on_startup(&mut ctx) == AppControl::Exit {
            log::info!("startup requested exit");
            window.close();
            return Ok(());
        }

        timer.clock.reset();
        timer.fps.reset(0.0);
        log::debug!("frame loop started");

        while window.is_active() {
            let now = timer.clock.now();
            timer.perform_frame(&mut app, &mut ctx, now);
        }

        app.on_destroy(&mut ctx);
        log::debug!("frame loop finished");
        Ok(())
    }
}

impl FrameTimer {
    fn perform_frame<A: App>(&mut self, app: &mut A, ctx: &mut AppCtx<'_>, now: f64) {
        let frame = self.clock.tick_at(now);

        if let Some(fps) = self.fps.tick(frame.time) {
            log::debug!(target: "kiln::fps", "{fps} fps");
            if ctx.config.show_fps {
                ctx.window
                    .set_needs_to_change_title(format!("{} - {fps}", ctx.config.window_title));
            }
        }

        if let Some((width, height)) = ctx.renderer.update() {
            ctx.surface.resize(width, height);
        }

        match app.update(ctx, frame.time, frame.dt) {
            AppControl::Continue => app.draw(ctx),
            AppControl::Exit => {
                log::info!("update requested exit");
                ctx.window.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::gl::GlCall;
    use crate::testing;
    use crate::window::HeadlessSurface;

    #[derive(Debug, Default)]
    struct Log {
        events: Vec<String>,
    }

    /// Records callbacks; exits from `update` after `frames` frames.
    struct Recorder {
        log: Rc<RefCell<Log>>,
        frames: usize,
        startup: AppControl,
    }

    impl Recorder {
        fn push(&self, event: impl Into<String>) {
            self.log.borrow_mut().events.push(event.into());
        }
    }

    impl App for Recorder {
        fn on_startup(&mut self, _ctx: &mut AppCtx<'_>) -> AppControl {
            self.push("startup");
            self.startup
        }

        fn update(&mut self, _ctx: &mut AppCtx<'_>, _time: f64, _dt: f64) -> AppControl {
            self.push("update");
            if self.frames == 0 {
                return AppControl::Exit;
            }
            self.frames -= 1;
            AppControl::Continue
        }

        fn draw(&mut self, ctx: &mut AppCtx<'_>) {
            self.push("draw");
            let mut scene = crate::scene::Scene::with_shader(testing::basic_shader(ctx.gl()));
            ctx.draw(&mut scene);
        }

        fn on_destroy(&mut self, _ctx: &mut AppCtx<'_>) {
            self.push("destroy");
        }
    }

    fn run(frames: usize, startup: AppControl, config: Config) -> (Vec<String>, WindowHandle, HeadlessSurface) {
        let log = Rc::new(RefCell::new(Log::default()));
        let ctx = Context::headless().with_config(config);
        let window = testing::window_handle(800, 600);
        let mut surface = HeadlessSurface::new(Rc::new(crate::gl::HeadlessGl::new()));

        let app_log = log.clone();
        FrameLoop::new(&ctx, window.clone())
            .main_loop(&mut surface, move || Recorder {
                log: app_log,
                frames,
                startup,
            })
            .unwrap();

        let events = log.borrow().events.clone();
        (events, window, surface)
    }

    // ── termination ──

    #[test]
    fn exit_from_first_update_never_draws() {
        let (events, window, surface) = run(0, AppControl::Continue, Config::default());
        assert_eq!(events, ["startup", "update", "destroy"]);
        assert!(!window.is_active());
        assert_eq!(surface.swaps(), 0);
    }

    #[test]
    fn frames_run_until_exit() {
        let (events, _, surface) = run(2, AppControl::Continue, Config::default());
        assert_eq!(
            events,
            ["startup", "update", "draw", "update", "draw", "update", "destroy"]
        );
        assert_eq!(surface.swaps(), 2);
    }

    #[test]
    fn exit_from_startup_skips_frames_and_destroy() {
        let (events, window, _) = run(5, AppControl::Exit, Config::default());
        assert_eq!(events, ["startup"]);
        assert!(!window.is_active());
    }

    #[test]
    fn inactive_window_does_not_start() {
        let ctx = Context::headless();
        let window = testing::window_handle(800, 600);
        window.close();
        let mut surface = HeadlessSurface::failing("unused");

        let started = Rc::new(RefCell::new(false));
        let flag = started.clone();
        FrameLoop::new(&ctx, window)
            .main_loop(&mut surface, move || {
                *flag.borrow_mut() = true;
                Recorder {
                    log: Rc::default(),
                    frames: 0,
                    startup: AppControl::Continue,
                }
            })
            .unwrap();

        assert!(!*started.borrow());
    }

    // ── gl ──

    #[test]
    fn gl_failure_is_returned() {
        let ctx = Context::headless();
        let mut surface = HeadlessSurface::failing("no driver");
        let err = FrameLoop::new(&ctx, testing::window_handle(800, 600))
            .main_loop(&mut surface, || Recorder {
                log: Rc::default(),
                frames: 0,
                startup: AppControl::Continue,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::GlInit(message) if message == "no driver"));
        assert!(!ctx.is_gl_ready());
    }

    #[test]
    fn draw_clears_to_background() {
        let (_, window, surface) = run(1, AppControl::Continue, Config::default());
        let expected = window.background_color().to_array();
        assert!(surface.gl().calls().contains(&GlCall::Clear(expected)));
    }

    // ── fps ──

    #[test]
    fn fps_title_is_deferred_to_window() {
        let (_, gl) = testing::headless();
        let window = testing::window_handle(800, 600);
        let config = Config::default().with_show_fps(true).with_window_title("demo");
        let surface = HeadlessSurface::new(Rc::new(crate::gl::HeadlessGl::new()));
        let input = Arc::new(InputRegistry::new());
        let files: Arc<dyn FileLoader> = Arc::new(crate::files::MemoryFileLoader::new());
        let mut renderer = Renderer::new(&gl, window.clone());
        let mut ctx = AppCtx {
            gl: &gl,
            window: &window,
            renderer: &mut renderer,
            surface: &surface,
            config: &config,
            files: &files,
            input: &input,
        };
        let mut app = Recorder {
            log: Rc::default(),
            frames: 10,
            startup: AppControl::Continue,
        };
        let mut timer = FrameTimer::default();
        timer.fps.reset(0.0);

        for now in [0.3, 0.6, 0.9] {
            timer.perform_frame(&mut app, &mut ctx, now);
        }
        assert!(!window.state().pending_title().is_pending());

        timer.perform_frame(&mut app, &mut ctx, 1.2);
        assert_eq!(window.state().pending_title().take().as_deref(), Some("demo - 4"));
    }

    #[test]
    fn resize_reaches_viewport_before_update() {
        let (h, gl) = testing::headless();
        let window = testing::window_handle(800, 600);
        let config = Config::default();
        let surface = HeadlessSurface::new(h.clone());
        let input = Arc::new(InputRegistry::new());
        let files: Arc<dyn FileLoader> = Arc::new(crate::files::MemoryFileLoader::new());
        let mut renderer = Renderer::new(&gl, window.clone());
        let mut ctx = AppCtx {
            gl: &gl,
            window: &window,
            renderer: &mut renderer,
            surface: &surface,
            config: &config,
            files: &files,
            input: &input,
        };
        let mut app = Recorder {
            log: Rc::default(),
            frames: 0,
            startup: AppControl::Continue,
        };

        window.state().set_size(1024, 768);
        FrameTimer::default().perform_frame(&mut app, &mut ctx, 0.016);

        assert!(h.calls().contains(&GlCall::Viewport(0, 0, 1024, 768)));
        assert!(!window.is_active());
    }
}
