//! Scene content: meshes, models, the light and the scene itself.
//!
//! Uniform-backed fields are written to whichever program is current, so
//! mutating helpers expect the scene's shader to be in use.

mod light;
mod loader;
mod mesh;
mod model;
mod vertex;
mod world;

pub use light::Light;
pub use loader::{MeshData, ModelData, ModelLoader, ObjLoader};
pub use mesh::Mesh;
pub use model::{Material, Model};
pub use vertex::Vertex;
pub use world::Scene;

pub use crate::error::ModelLoadError;
