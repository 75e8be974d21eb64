//! Application frame loop.
//!
//! [`Application::run`] splits the work over two threads:
//!
//! - the calling thread owns the `winit` event loop, routes input to the
//!   listeners and applies deferred window changes (title, size);
//! - the `kiln-render` thread owns the GL context and runs the [`App`]
//!   callbacks through a [`FrameLoop`] until the window closes.
//!
//! The two sides share only the window's atomic state and the input
//! listeners.

mod app;
mod application;
mod ctx;
mod frame_loop;
mod runtime;

pub use app::{App, AppControl};
pub use application::Application;
pub use ctx::AppCtx;
pub use frame_loop::FrameLoop;
pub use runtime::RuntimeEvent;
