use std::cell::Cell;
use std::rc::Rc;

use super::surface::RenderSurface;
use crate::error::EngineError;
use crate::gl::{GlRef, HeadlessGl};

/// Surface backed by [`HeadlessGl`]; counts presented frames.
#[derive(Debug)]
pub struct HeadlessSurface {
    gl: Rc<HeadlessGl>,
    swaps: Cell<u64>,
    fail: Option<String>,
}

impl HeadlessSurface {
    pub fn new(gl: Rc<HeadlessGl>) -> Self {
        Self {
            gl,
            swaps: Cell::new(0),
            fail: None,
        }
    }

    /// Surface whose `load_gl` fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        let mut surface = Self::new(Rc::new(HeadlessGl::new()));
        surface.fail = Some(message.into());
        surface
    }

    pub fn gl(&self) -> &Rc<HeadlessGl> {
        &self.gl
    }

    pub fn swaps(&self) -> u64 {
        self.swaps.get()
    }
}

impl RenderSurface for HeadlessSurface {
    fn load_gl(&mut self) -> Result<GlRef, EngineError> {
        match &self.fail {
            Some(message) => Err(EngineError::GlInit(message.clone())),
            None => Ok(self.gl.clone()),
        }
    }

    fn swap_buffers(&self) {
        self.swaps.set(self.swaps.get() + 1);
    }

    fn resize(&self, _width: u32, _height: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::Gl;

    #[test]
    fn swaps_are_counted() {
        let mut surface = HeadlessSurface::new(Rc::new(HeadlessGl::new()));
        let gl = surface.load_gl().unwrap();
        assert_eq!(gl.version(), surface.gl().version());

        surface.swap_buffers();
        surface.swap_buffers();
        assert_eq!(surface.swaps(), 2);
    }

    #[test]
    fn failing_surface_reports_gl_init() {
        let mut surface = HeadlessSurface::failing("no driver");
        assert!(matches!(surface.load_gl(), Err(EngineError::GlInit(m)) if m == "no driver"));
        assert_eq!(surface.swaps(), 0);
    }
}
