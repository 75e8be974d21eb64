use crate::shader::{Shader, Uniform1f, Uniform3f};

/// Point light parameters, one uniform each.
#[derive(Debug, Clone, Default)]
pub struct Light {
    pub position: Uniform3f,
    pub strength: Uniform1f,
    pub diffuse_coefficient: Uniform1f,
    pub diffuse_color: Uniform3f,
    pub specular_coefficient: Uniform1f,
    pub specular_color: Uniform3f,
    pub ambient_coefficient: Uniform1f,
    pub ambient_color: Uniform3f,
}

impl Light {
    pub fn initialize_uniforms(&mut self, shader: &Shader) {
        self.position.initialize(shader, "light.position");
        self.strength.initialize(shader, "light.strength");
        self.diffuse_coefficient.initialize(shader, "light.diffuse_coefficient");
        self.diffuse_color.initialize(shader, "light.diffuse_color");
        self.specular_coefficient.initialize(shader, "light.specular_coefficient");
        self.specular_color.initialize(shader, "light.specular_color");
        self.ambient_coefficient.initialize(shader, "light.ambient_coefficient");
        self.ambient_color.initialize(shader, "light.ambient_color");
    }

    pub fn reset_uniforms(&mut self, shader: &Shader) {
        self.position.reset(shader);
        self.strength.reset(shader);
        self.diffuse_coefficient.reset(shader);
        self.diffuse_color.reset(shader);
        self.specular_coefficient.reset(shader);
        self.specular_color.reset(shader);
        self.ambient_coefficient.reset(shader);
        self.ambient_color.reset(shader);
    }

    pub fn apply(&self) {
        self.position.apply();
        self.strength.apply();
        self.diffuse_coefficient.apply();
        self.diffuse_color.apply();
        self.specular_coefficient.apply();
        self.specular_color.apply();
        self.ambient_coefficient.apply();
        self.ambient_color.apply();
    }
}
