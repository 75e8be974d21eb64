use super::app::App;
use super::runtime::Runtime;
use crate::context::Context;
use crate::error::EngineError;
use crate::window::Window;

/// Runs one [`App`] in one window.
///
/// The calling thread services the OS event queue; the app runs on a
/// dedicated render thread. Borrowing the context mutably keeps a process to
/// one running application per context.
#[derive(Debug)]
pub struct Application<'c> {
    ctx: &'c mut Context,
    window: Window,
    initialized: bool,
}

impl<'c> Application<'c> {
    pub fn new(ctx: &'c mut Context) -> Self {
        let window = Window::new(ctx);
        Self {
            ctx,
            window,
            initialized: false,
        }
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Sets up windowing. The native window is created once the event loop
    /// starts, in [`run`](Self::run).
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Ok(());
        }
        self.ctx.setup()?;
        self.initialized = true;
        log::debug!("application initialized");
        Ok(())
    }

    /// Runs until the window closes.
    ///
    /// `make_app` is called on the render thread, so the app it builds may
    /// own GL objects.
    pub fn run<A, F>(mut self, make_app: F) -> Result<(), EngineError>
    where
        A: App,
        F: FnOnce() -> A + Send + 'static,
    {
        self.initialize()?;
        let event_loop = self
            .ctx
            .take_event_loop()
            .ok_or(EngineError::WindowingNotInitialized)?;

        let mut runtime = Runtime::new(self.ctx, &mut self.window, make_app);
        let run = event_loop
            .run_app(&mut runtime)
            .map_err(|e| EngineError::WindowingInit(e.to_string()));
        let result = runtime.finish();

        // The event loop is consumed; windowing cannot be reused.
        self.window.release(self.ctx);
        self.ctx.terminate();

        run.and(result)
    }
}
