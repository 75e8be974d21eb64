use crate::color::Color;
use crate::gl::GlRef;
use crate::scene::Scene;
use crate::window::WindowHandle;

/// Draws scenes into the window's GL context.
///
/// Tracks the face-culling state so consecutive meshes with the same
/// setting issue no state change.
#[derive(Debug)]
pub struct Renderer {
    gl: GlRef,
    window: WindowHandle,
    face_culling: bool,
}

impl Renderer {
    /// Attaches a renderer to `window`. From now on window resizes are
    /// applied to the viewport by [`update`](Self::update).
    pub fn new(gl: &GlRef, window: WindowHandle) -> Self {
        gl.set_face_culling(true);
        window.state().set_renderer_attached(true);

        Self {
            gl: gl.clone(),
            window,
            face_culling: true,
        }
    }

    pub fn gl(&self) -> &GlRef {
        &self.gl
    }

    pub fn window(&self) -> &WindowHandle {
        &self.window
    }

    pub fn face_culling(&self) -> bool {
        self.face_culling
    }

    /// Applies a pending window resize to the viewport. Returns the new size
    /// so the caller can resize its surface too.
    pub fn update(&mut self) -> Option<(u32, u32)> {
        let (width, height) = self.window.take_resize()?;
        self.gl.viewport(0, 0, width, height);
        log::debug!(target: "kiln::window", "viewport set to {width}x{height}");
        Some((width, height))
    }

    pub fn clear(&self, color: Color) {
        self.gl.clear(color.to_array());
    }

    /// Draws every mesh of every model in `scene` with the scene's shader.
    pub fn render(&mut self, scene: &mut Scene) {
        let _usage = scene.shader.scoped_usage();

        scene.camera_position.apply();
        scene.light.apply();

        for index in 0..scene.models.len() {
            let model_matrix = scene.models[index].model_matrix.get();
            scene.models[index].apply_uniforms();
            scene.update_mvp(model_matrix);

            for mesh in &scene.models[index].meshes {
                if !mesh.is_initialized() {
                    log::trace!("skipping mesh without GPU buffers");
                    continue;
                }
                self.set_face_culling(mesh.face_culling);

                mesh.vao.bind();
                self.gl.draw_triangles_indexed(mesh.index_count());
                mesh.vao.unbind();
            }
        }
    }

    fn set_face_culling(&mut self, enabled: bool) {
        if self.face_culling != enabled {
            self.gl.set_face_culling(enabled);
            self.face_culling = enabled;
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.window.state().set_renderer_attached(false);
    }
}
