//! GPU buffer wrappers.
//!
//! Each wrapper owns exactly one native name and releases it on drop. They are
//! not `Clone`; a GL name cannot be duplicated.

mod gpu_buffer;
mod handle;
mod vertex_array;

pub(crate) use handle::{GlHandle, HandleKind};

pub use gpu_buffer::{Buffer, BufferKind, IndexBuffer, Indices, VertexBuffer, Vertices};
pub use vertex_array::{layout_stride, AttributeLayout, DataLayout, VertexArray};
