//! Application window.
//!
//! [`Window`] lives on the event thread and owns the native window.
//! The render thread sees it through a [`WindowHandle`]: size, active flag,
//! background color and a pending title, all behind atomics or a single-slot
//! cell. The event thread applies the pending title in `Window::update`.
//!
//! - `NativeWindow` / `WindowSystem`: the OS window seam (`winit` in
//!   production, an in-memory fake in tests)
//! - `RenderSurface`: GL context and presentation (`glutin` in production)

#[cfg(any(test, feature = "headless"))]
mod headless;
mod native;
mod platform;
mod state;
mod surface;
#[allow(clippy::module_inception)]
mod window;

pub use native::{NativeWindow, WindowDescriptor, WindowSystem};
pub use platform::{WinitNativeWindow, WinitWindowSystem};
pub use state::{PendingCell, WindowHandle};
#[cfg(any(test, feature = "headless"))]
pub use headless::HeadlessSurface;
pub use surface::{GlutinSurface, RenderSurface};
pub use window::Window;

pub(crate) use state::Waker;
#[cfg(test)]
pub(crate) use state::WindowState;
