use super::ctx::AppCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the frame loop.
///
/// Every callback runs on the render thread, which owns the GL context, so
/// an app may hold GPU objects directly.
pub trait App {
    /// Called once after the renderer exists. `Exit` closes the window
    /// before the first frame; `on_destroy` is not called in that case.
    fn on_startup(&mut self, ctx: &mut AppCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Called once per frame with the seconds since the loop started and
    /// since the previous frame. `Exit` closes the window and skips `draw`.
    fn update(&mut self, ctx: &mut AppCtx<'_>, time: f64, dt: f64) -> AppControl;

    /// Called after every `update` that returned `Continue`.
    fn draw(&mut self, ctx: &mut AppCtx<'_>);

    /// Called once when the loop ends.
    fn on_destroy(&mut self, ctx: &mut AppCtx<'_>) {
        let _ = ctx;
    }
}
