use glam::Mat4;

use crate::gl::GlRef;
use crate::shader::{Shader, Uniform3f, UniformMat4};

use super::light::Light;
use super::model::Model;

/// Everything one render pass draws: a shader, its models, a camera and a
/// light.
///
/// View and projection are plain matrices; only their product with each
/// model matrix is uploaded, as `mvp`.
#[derive(Debug)]
pub struct Scene {
    pub shader: Shader,
    pub models: Vec<Model>,
    pub camera_position: Uniform3f,
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    pub mvp: UniformMat4,
    pub light: Light,
}

impl Scene {
    pub fn new(gl: &GlRef) -> Self {
        Self::with_shader(Shader::new(gl))
    }

    pub fn with_shader(shader: Shader) -> Self {
        Self {
            shader,
            models: Vec::new(),
            camera_position: Uniform3f::default(),
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            mvp: UniformMat4::default(),
            light: Light::default(),
        }
    }

    pub fn initialize_uniforms(&mut self) {
        let _usage = self.shader.scoped_usage();
        self.camera_position.initialize(&self.shader, "camera_pos");
        self.mvp.initialize(&self.shader, "mvp");
        self.light.initialize_uniforms(&self.shader);
    }

    /// Re-resolves every uniform after a shader reload, keeping the values.
    pub fn reset_uniforms(&mut self) {
        let _usage = self.shader.scoped_usage();
        self.camera_position.reset(&self.shader);
        self.mvp.reset(&self.shader);
        self.light.reset_uniforms(&self.shader);

        for model in &mut self.models {
            model.reset_uniforms(&self.shader);
        }
    }

    /// Binds the model's uniforms to this scene's shader, then adds it.
    pub fn add_model(&mut self, mut model: Model) {
        let _usage = self.shader.scoped_usage();
        model.initialize_uniforms(&self.shader);
        self.models.push(model);
    }

    /// Writes projection * view * `model` to `mvp`.
    pub fn update_mvp(&mut self, model: Mat4) {
        self.mvp.set(self.projection_matrix * self.view_matrix * model);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::gl::UniformData;
    use crate::testing;

    #[test]
    fn uniforms_resolve_in_basic_shader() {
        let (_, gl) = testing::headless();
        let mut scene = Scene::with_shader(testing::basic_shader(&gl));
        scene.initialize_uniforms();

        assert!(scene.camera_position.is_initialized());
        assert!(scene.mvp.is_initialized());
        assert!(scene.light.ambient_color.is_initialized());
        assert!(scene.light.specular_coefficient.is_initialized());
    }

    #[test]
    fn mvp_is_projection_view_model() {
        let (h, gl) = testing::headless();
        let mut scene = Scene::with_shader(testing::basic_shader(&gl));
        scene.initialize_uniforms();
        scene.projection_matrix = Mat4::from_scale(Vec3::splat(2.0));
        scene.view_matrix = Mat4::from_translation(Vec3::X);

        let _usage = scene.shader.scoped_usage();
        let model = Mat4::from_translation(Vec3::Y);
        scene.update_mvp(model);

        let expected = scene.projection_matrix * scene.view_matrix * model;
        assert_eq!(scene.mvp.get(), expected);
        assert_eq!(
            h.uniform_value(scene.shader.id(), "mvp"),
            Some(UniformData::Mat4(expected.to_cols_array(), false))
        );
    }

    #[test]
    fn reset_survives_reload() {
        let (h, gl) = testing::headless();
        let files = testing::shader_files();
        let mut scene = Scene::with_shader(testing::basic_shader(&gl));
        scene.initialize_uniforms();
        scene.add_model(Model::default());
        {
            let _usage = scene.shader.scoped_usage();
            scene.light.strength.set(5.0);
            scene.models[0].material.shininess.set(64);
        }

        assert!(scene.shader.try_reload(&files, None, None));
        scene.reset_uniforms();

        let id = scene.shader.id();
        assert_eq!(h.uniform_value(id, "light.strength"), Some(UniformData::Float(1, [5.0, 0.0, 0.0, 0.0])));
        assert_eq!(h.uniform_value(id, "material.shininess"), Some(UniformData::Uint(1, [64, 0, 0, 0])));
        assert!(h.errors().is_empty());
    }
}
