use std::fmt;
use std::marker::PhantomData;

use bytemuck::Pod;

use crate::gl::GlRef;

use super::handle::{GlHandle, HandleKind};

/// Marker for what a [`Buffer`] stores.
pub trait BufferKind {
    const NAME: &'static str;
}

/// Vertex attribute data.
#[derive(Debug)]
pub enum Vertices {}

/// `u32` element indices.
#[derive(Debug)]
pub enum Indices {}

impl BufferKind for Vertices {
    const NAME: &'static str = "VBO";
}

impl BufferKind for Indices {
    const NAME: &'static str = "EBO";
}

pub type VertexBuffer = Buffer<Vertices>;
pub type IndexBuffer = Buffer<Indices>;

/// Immutable GPU buffer owning one native name.
///
/// Data is uploaded once with static usage. Re-initializing releases the
/// previous name first. Rust moves transfer ownership; `take` moves out of a
/// place that must stay usable (for example a struct field).
pub struct Buffer<K: BufferKind> {
    handle: GlHandle,
    len: usize,
    _kind: PhantomData<K>,
}

impl<K: BufferKind> Default for Buffer<K> {
    fn default() -> Self {
        Self {
            handle: GlHandle::empty(HandleKind::Buffer),
            len: 0,
            _kind: PhantomData,
        }
    }
}

impl<K: BufferKind> fmt::Debug for Buffer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME)
            .field("id", &self.handle.id())
            .field("len", &self.len)
            .finish()
    }
}

impl<K: BufferKind> Buffer<K> {
    fn upload(&mut self, gl: &GlRef, bytes: &[u8]) {
        self.destroy();
        log::trace!(target: "kiln::buffers", "{} initialization ({} bytes)", K::NAME, bytes.len());

        self.handle = GlHandle::create(gl, HandleKind::Buffer);
        if self.handle.is_live() {
            gl.buffer_data(self.handle.id(), bytes);
            self.len = bytes.len();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_live()
    }

    pub fn id(&self) -> u32 {
        self.handle.id()
    }

    /// Size of the uploaded data in bytes.
    pub fn len_bytes(&self) -> usize {
        self.len
    }

    pub(crate) fn gl(&self) -> Option<&GlRef> {
        self.handle.gl()
    }

    /// Releases the native buffer. Does nothing when uninitialized.
    pub fn destroy(&mut self) {
        if self.handle.is_live() {
            self.handle.release();
            self.len = 0;
            log::trace!(target: "kiln::buffers", "{} destroyed", K::NAME);
        }
    }

    /// Moves the buffer out, leaving `self` uninitialized.
    pub fn take(&mut self) -> Self {
        Self {
            handle: self.handle.take(),
            len: std::mem::take(&mut self.len),
            _kind: PhantomData,
        }
    }
}

impl Buffer<Vertices> {
    pub fn with_data<T: Pod>(gl: &GlRef, data: &[T]) -> Self {
        let mut vbo = Self::default();
        vbo.initialize(gl, data);
        vbo
    }

    /// Allocates a new buffer holding `data`.
    pub fn initialize<T: Pod>(&mut self, gl: &GlRef, data: &[T]) {
        self.upload(gl, bytemuck::cast_slice(data));
    }
}

impl Buffer<Indices> {
    pub fn with_indices(gl: &GlRef, indices: &[u32]) -> Self {
        let mut ebo = Self::default();
        ebo.initialize(gl, indices);
        ebo
    }

    /// Allocates a new buffer holding `indices`.
    pub fn initialize(&mut self, gl: &GlRef, indices: &[u32]) {
        self.upload(gl, bytemuck::cast_slice(indices));
    }

    /// Number of indices stored.
    pub fn count(&self) -> u32 {
        (self.len / size_of::<u32>()) as u32
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::gl::{GlCall, HeadlessGl};

    fn headless() -> (Rc<HeadlessGl>, GlRef) {
        let h = Rc::new(HeadlessGl::new());
        let gl: GlRef = h.clone();
        (h, gl)
    }

    #[test]
    fn constructed_buffer_is_initialized() {
        let (h, gl) = headless();
        let vbo = VertexBuffer::with_data(&gl, &[0.0f32, 1.0, 2.0, 3.0]);

        assert!(vbo.is_initialized());
        assert_eq!(vbo.len_bytes(), 16);
        assert_eq!(h.buffer_len(vbo.id()), Some(16));
    }

    #[test]
    fn take_moves_ownership() {
        let (h, gl) = headless();
        let mut src = VertexBuffer::with_data(&gl, &[1.0f32; 6]);
        let id = src.id();

        let dst = src.take();
        assert!(!src.is_initialized());
        assert!(dst.is_initialized());
        assert_eq!(dst.id(), id);

        drop(src);
        assert_eq!(h.live_buffers(), 1);
        drop(dst);
        assert_eq!(h.live_buffers(), 0);
    }

    #[test]
    fn destroy_then_drop_frees_once() {
        let (h, gl) = headless();
        let mut ebo = IndexBuffer::with_indices(&gl, &[0, 1, 2]);
        ebo.destroy();
        ebo.destroy();
        drop(ebo);

        assert_eq!(h.live_buffers(), 0);
        assert!(h.errors().is_empty());
        assert_eq!(h.count(|c| matches!(c, GlCall::DeleteBuffer(_))), 1);
    }

    #[test]
    fn reinitialize_replaces_buffer() {
        let (h, gl) = headless();
        let mut ebo = IndexBuffer::with_indices(&gl, &[0, 1, 2]);
        let first = ebo.id();

        ebo.initialize(&gl, &[0, 1, 2, 2, 3, 0]);
        assert_ne!(ebo.id(), first);
        assert_eq!(ebo.count(), 6);
        assert_eq!(h.live_buffers(), 1);
    }

    #[test]
    fn default_is_empty() {
        let vbo = VertexBuffer::default();
        assert!(!vbo.is_initialized());
        assert_eq!(vbo.id(), 0);
    }
}
