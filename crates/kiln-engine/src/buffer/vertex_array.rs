use std::collections::BTreeMap;

use crate::gl::{GlRef, VertexAttribute};

use super::gpu_buffer::{IndexBuffer, VertexBuffer};
use super::handle::{GlHandle, HandleKind};

/// Float attribute inside one interleaved vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    pub components: u32,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

impl AttributeLayout {
    pub const fn new(components: u32, offset: u32) -> Self {
        Self { components, offset }
    }
}

/// Attribute slot to layout.
pub type DataLayout = BTreeMap<u32, AttributeLayout>;

/// Byte stride of one vertex described by `layout`.
pub fn layout_stride(layout: &DataLayout) -> u32 {
    layout.values().map(|a| a.components).sum::<u32>() * size_of::<f32>() as u32
}

/// Vertex array object.
///
/// Created lazily by the first link, on the context of the linked buffer.
#[derive(Debug)]
pub struct VertexArray {
    handle: GlHandle,
    layout: DataLayout,
}

impl Default for VertexArray {
    fn default() -> Self {
        Self {
            handle: GlHandle::empty(HandleKind::VertexArray),
            layout: DataLayout::new(),
        }
    }
}

impl VertexArray {
    pub fn new(gl: &GlRef) -> Self {
        let mut vao = Self::default();
        vao.initialize(gl);
        vao
    }

    pub fn initialize(&mut self, gl: &GlRef) {
        self.destroy();
        log::trace!(target: "kiln::buffers", "VAO initialization");
        self.handle = GlHandle::create(gl, HandleKind::VertexArray);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_live()
    }

    pub fn id(&self) -> u32 {
        self.handle.id()
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    fn ensure_initialized(&mut self, gl: Option<&GlRef>) -> Option<GlRef> {
        if let Some(gl) = self.handle.gl() {
            return Some(gl.clone());
        }
        let gl = gl?.clone();
        self.initialize(&gl);
        self.handle.is_live().then_some(gl)
    }

    /// Records `layout` and reads vertices from `vbo` at `binding`.
    pub fn link_vertex_buffer(&mut self, vbo: &VertexBuffer, layout: DataLayout, binding: u32) {
        let Some(gl) = self.ensure_initialized(vbo.gl()) else {
            log::warn!(target: "kiln::buffers", "cannot link an uninitialized VBO");
            return;
        };
        log::trace!(target: "kiln::buffers", "linking VBO {} to VAO {}", vbo.id(), self.id());

        for (&index, attribute) in &layout {
            gl.vertex_array_attribute(
                self.id(),
                VertexAttribute {
                    index,
                    components: attribute.components,
                    offset: attribute.offset,
                    binding,
                },
            );
        }
        gl.vertex_array_vertex_buffer(self.id(), binding, vbo.id(), layout_stride(&layout));
        self.layout = layout;
    }

    /// Attaches `ebo` for indexed draws.
    pub fn link_index_buffer(&mut self, ebo: &IndexBuffer) {
        let Some(gl) = self.ensure_initialized(ebo.gl()) else {
            log::warn!(target: "kiln::buffers", "cannot link an uninitialized EBO");
            return;
        };
        log::trace!(target: "kiln::buffers", "linking EBO {} to VAO {}", ebo.id(), self.id());
        gl.vertex_array_element_buffer(self.id(), ebo.id());
    }

    pub fn with_vertex_buffer(mut self, vbo: &VertexBuffer, layout: DataLayout, binding: u32) -> Self {
        self.link_vertex_buffer(vbo, layout, binding);
        self
    }

    pub fn with_index_buffer(mut self, ebo: &IndexBuffer) -> Self {
        self.link_index_buffer(ebo);
        self
    }

    pub fn bind(&self) {
        if let Some(gl) = self.handle.gl() {
            gl.bind_vertex_array(self.id());
        }
    }

    pub fn unbind(&self) {
        if let Some(gl) = self.handle.gl() {
            gl.bind_vertex_array(0);
        }
    }

    pub fn destroy(&mut self) {
        if self.handle.is_live() {
            self.handle.release();
            log::trace!(target: "kiln::buffers", "VAO destroyed");
        }
    }

    /// Moves the vertex array out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            handle: self.handle.take(),
            layout: std::mem::take(&mut self.layout),
        }
    }
}
