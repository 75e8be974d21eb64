use crate::buffer::{IndexBuffer, VertexArray, VertexBuffer};
use crate::gl::GlRef;

use super::vertex::Vertex;

/// Indexed triangle list plus its GPU buffers.
///
/// Nothing is uploaded until [`initialize`](Mesh::initialize).
#[derive(Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub vao: VertexArray,
    pub vbo: VertexBuffer,
    pub ebo: IndexBuffer,
    pub face_culling: bool,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            vao: VertexArray::default(),
            vbo: VertexBuffer::default(),
            ebo: IndexBuffer::default(),
            face_culling: true,
        }
    }

    pub fn with_face_culling(mut self, enabled: bool) -> Self {
        self.face_culling = enabled;
        self
    }

    /// Uploads vertices and indices and links them into the vertex array.
    /// Calling it again replaces the previous buffers.
    pub fn initialize(&mut self, gl: &GlRef) {
        self.vbo.initialize(gl, &self.vertices);
        self.ebo.initialize(gl, &self.indices);
        self.vao.initialize(gl);
        self.vao.link_vertex_buffer(&self.vbo, Vertex::layout(), 0);
        self.vao.link_index_buffer(&self.ebo);
    }

    pub fn is_initialized(&self) -> bool {
        self.vao.is_initialized()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
