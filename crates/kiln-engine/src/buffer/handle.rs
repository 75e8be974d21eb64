use std::mem;

use crate::gl::GlRef;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum HandleKind {
    Buffer,
    VertexArray,
    Program,
}

/// One owned GL object name.
///
/// The name is released exactly once: by `release` or on drop, whichever
/// comes first. A released handle keeps no reference to the context.
#[derive(Debug)]
pub(crate) struct GlHandle {
    kind: HandleKind,
    id: u32,
    gl: Option<GlRef>,
}

impl GlHandle {
    pub(crate) const fn empty(kind: HandleKind) -> Self {
        Self { kind, id: 0, gl: None }
    }

    pub(crate) fn create(gl: &GlRef, kind: HandleKind) -> Self {
        let id = match kind {
            HandleKind::Buffer => gl.create_buffer(),
            HandleKind::VertexArray => gl.create_vertex_array(),
            HandleKind::Program => gl.create_program(),
        };
        Self {
            kind,
            id,
            gl: (id != 0).then(|| gl.clone()),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        self.id != 0
    }

    pub(crate) fn gl(&self) -> Option<&GlRef> {
        self.gl.as_ref()
    }

    pub(crate) fn release(&mut self) {
        let Some(gl) = self.gl.take() else {
            return;
        };
        match self.kind {
            HandleKind::Buffer => gl.delete_buffer(self.id),
            HandleKind::VertexArray => gl.delete_vertex_array(self.id),
            HandleKind::Program => gl.delete_program(self.id),
        }
        self.id = 0;
    }

    /// Moves the name out, leaving this handle empty.
    pub(crate) fn take(&mut self) -> Self {
        mem::replace(self, Self::empty(self.kind))
    }
}

impl Drop for GlHandle {
    fn drop(&mut self) {
        self.release();
    }
}
