use std::sync::Arc;
use std::thread::{self, JoinHandle};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

use super::app::App;
use super::frame_loop::FrameLoop;
use crate::context::Context;
use crate::error::EngineError;
use crate::input::platform::winit::dispatch_window_event;
use crate::window::{GlutinSurface, Waker, Window, WinitWindowSystem};

/// User events sent to the event loop by other threads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RuntimeEvent {
    /// Deferred window changes are pending.
    Wake,
    /// The render thread returned.
    FrameLoopExited,
}

/// Wakes the event loop when the render thread ends, panicking included.
struct ExitNotice(Option<Waker>);

impl Drop for ExitNotice {
    fn drop(&mut self) {
        if let Some(notify) = &self.0 {
            notify();
        }
    }
}

/// Event-thread side of a running application.
pub(crate) struct Runtime<'a, F> {
    ctx: &'a mut Context,
    window: &'a mut Window,
    make_app: Option<F>,
    render_thread: Option<JoinHandle<Result<(), EngineError>>>,
    result: Result<(), EngineError>,
}

impl<'a, A, F> Runtime<'a, F>
where
    A: App,
    F: FnOnce() -> A + Send + 'static,
{
    pub(crate) fn new(ctx: &'a mut Context, window: &'a mut Window, make_app: F) -> Self {
        Self {
            ctx,
            window,
            make_app: Some(make_app),
            render_thread: None,
            result: Ok(()),
        }
    }

    /// Joins the render thread if it is still around and returns the
    /// outcome of the run.
    pub(crate) fn finish(mut self) -> Result<(), EngineError> {
        self.window.close();
        self.join();
        self.result
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: EngineError) {
        log::error!("{e}");
        if self.result.is_ok() {
            self.result = Err(e);
        }
        event_loop.exit();
    }

    fn spawn_frame_loop(&mut self) -> Result<(), EngineError> {
        let Some(make_app) = self.make_app.take() else {
            return Ok(());
        };
        let Some(native) = self.window.native().map(Arc::clone) else {
            return Err(EngineError::WindowCreation("no native window".to_string()));
        };

        let mut frame_loop = FrameLoop::new(self.ctx, self.window.handle());
        let notice = ExitNotice(self.ctx.event_sender(RuntimeEvent::FrameLoopExited));

        let handle = thread::Builder::new()
            .name("kiln-render".to_string())
            .spawn(move || {
                let _notice = notice;
                let mut surface = GlutinSurface::new(native);
                frame_loop.main_loop(&mut surface, make_app)
            })
            .map_err(EngineError::Spawn)?;

        self.render_thread = Some(handle);
        Ok(())
    }

    fn join(&mut self) {
        let Some(handle) = self.render_thread.take() else {
            return;
        };
        let outcome = match handle.join() {
            Ok(result) => result,
            Err(_) => Err(EngineError::FrameLoopPanicked),
        };
        if let Err(e) = outcome {
            if self.result.is_ok() {
                self.result = Err(e);
            }
        }
    }

    fn is_current(&self, window_id: WindowId) -> bool {
        self.ctx.current_window() == Some(u64::from(window_id))
    }
}

impl<A, F> ApplicationHandler<RuntimeEvent> for Runtime<'_, F>
where
    A: App,
    F: FnOnce() -> A + Send + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_initialized() {
            return;
        }

        let system = WinitWindowSystem::new(event_loop);
        if let Err(e) = self.window.initialize(self.ctx, &system) {
            self.fail(event_loop, e);
            return;
        }
        if let Err(e) = self.spawn_frame_loop() {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if !self.is_current(window_id) {
            return;
        }
        if dispatch_window_event(self.ctx.input(), &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!(target: "kiln::window", "close requested");
                self.window.close();
                if self.render_thread.is_none() {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => self.window.refresh(size.width, size.height),
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Wake => self.window.update(),
            RuntimeEvent::FrameLoopExited => {
                self.join();
                self.window.release(self.ctx);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.window.update();
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}
