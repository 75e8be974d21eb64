//! Keyboard and mouse input.
//!
//! Listeners ([`KeyInput`], [`MouseInput`]) watch a fixed set of keys or
//! buttons. The event thread feeds them through the [`InputRegistry`];
//! the render thread queries them from its update callback. Flags are
//! atomic, so either side may run on any thread.
//!
//! Public types are platform-agnostic. `platform::winit` translates `winit`
//! events.

mod listener;
pub mod platform;
mod registry;
mod types;

pub use listener::{KeyInput, ListenerState, MouseInput};
pub use registry::InputRegistry;
pub use types::{ButtonState, Key, MouseButton};
