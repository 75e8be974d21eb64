//! Scene rendering.
//!
//! The [`Renderer`] walks a [`Scene`](crate::scene::Scene) and issues one
//! indexed draw per mesh. Viewport updates follow window resizes lazily, on
//! the next [`Renderer::update`].

mod renderer;

pub use renderer::Renderer;
