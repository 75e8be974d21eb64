use glam::{Mat4, Vec3};

use crate::gl::GlRef;
use crate::shader::{Shader, Uniform1u, Uniform3f, UniformMat4};

use super::loader::ModelData;
use super::mesh::Mesh;

#[derive(Debug, Clone, Default)]
pub struct Material {
    pub color: Uniform3f,
    pub shininess: Uniform1u,
}

/// Meshes sharing one transform and material.
///
/// The model matrix is recomputed only by
/// [`update_model_matrix`](Model::update_model_matrix); changing the
/// transform fields alone has no effect on rendering.
#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation_angle: f32,
    pub rotation_axis: Vec3,
    pub model_matrix: UniformMat4,
    pub material: Material,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Model {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation_angle: 0.0,
            rotation_axis: Vec3::Y,
            model_matrix: UniformMat4::default(),
            material: Material::default(),
        }
    }

    pub fn from_data(data: ModelData) -> Self {
        Self::new(
            data.meshes
                .into_iter()
                .map(|m| Mesh::new(m.vertices, m.indices))
                .collect(),
        )
    }

    /// Uploads every mesh.
    pub fn initialize(&mut self, gl: &GlRef) {
        for mesh in &mut self.meshes {
            mesh.initialize(gl);
        }
    }

    /// Translation * rotation * scale. A zero rotation axis means no rotation.
    pub fn transform(&self) -> Mat4 {
        let rotation = self
            .rotation_axis
            .try_normalize()
            .map_or(Mat4::IDENTITY, |axis| Mat4::from_axis_angle(axis, self.rotation_angle));

        Mat4::from_translation(self.position) * rotation * Mat4::from_scale(self.scale)
    }

    /// Writes [`transform`](Model::transform) to the model matrix uniform.
    /// The model's shader must be current.
    pub fn update_model_matrix(&mut self) {
        let m = self.transform();
        self.model_matrix.set(m);
    }

    pub fn initialize_uniforms(&mut self, shader: &Shader) {
        self.model_matrix.initialize(shader, "model");
        self.material.color.initialize(shader, "material.color");
        self.material.shininess.initialize(shader, "material.shininess");
    }

    /// Re-resolves the uniforms in `shader`, keeping their values.
    pub fn reset_uniforms(&mut self, shader: &Shader) {
        self.model_matrix.reset(shader);
        self.material.color.reset(shader);
        self.material.shininess.reset(shader);
    }

    /// Pushes the model matrix and material to the current program.
    pub fn apply_uniforms(&self) {
        self.model_matrix.apply();
        self.material.color.apply();
        self.material.shininess.apply();
    }
}
