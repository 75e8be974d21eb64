use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use crate::gl::{GlRef, UniformLocation};

use super::program::Shader;
use super::value::UniformValue;

/// Cached uniform value bound to a program location.
///
/// An unresolved name (not declared, or optimized out) leaves the uniform
/// without a location; every write is then a silent no-op. Writes go to the
/// program that is current at the time of the call.
#[derive(Debug, Clone, Default)]
pub struct Uniform<T: UniformValue> {
    name: String,
    location: Option<UniformLocation>,
    value: T,
    transpose: bool,
    gl: Option<GlRef>,
}

pub type Uniform1f = Uniform<f32>;
pub type Uniform2f = Uniform<Vec2>;
pub type Uniform3f = Uniform<Vec3>;
pub type Uniform4f = Uniform<Vec4>;
pub type Uniform1i = Uniform<i32>;
pub type Uniform2i = Uniform<IVec2>;
pub type Uniform3i = Uniform<IVec3>;
pub type Uniform4i = Uniform<IVec4>;
pub type Uniform1u = Uniform<u32>;
pub type Uniform2u = Uniform<UVec2>;
pub type Uniform3u = Uniform<UVec3>;
pub type Uniform4u = Uniform<UVec4>;
pub type UniformMat2 = Uniform<Mat2>;
pub type UniformMat3 = Uniform<Mat3>;
pub type UniformMat4 = Uniform<Mat4>;

impl<T: UniformValue> Uniform<T> {
    pub fn new(shader: &Shader, name: &str) -> Self {
        Self::default().initialized(shader, name)
    }

    /// Resolves `name` in `shader`. The cached value is kept.
    pub fn initialize(&mut self, shader: &Shader, name: &str) {
        self.name = name.to_string();
        self.location = shader.uniform_location(name);
        self.gl = Some(shader.gl().clone());

        if self.location.is_none() {
            log::trace!(target: "kiln::uniforms", "uniform `{name}` is not active");
        }
    }

    pub fn initialized(mut self, shader: &Shader, name: &str) -> Self {
        self.initialize(shader, name);
        self
    }

    /// True when the name resolved to a location.
    pub fn is_initialized(&self) -> bool {
        self.location.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<UniformLocation> {
        self.location
    }

    /// Last value written through `set`; not read back from the GPU.
    pub fn get(&self) -> T {
        self.value
    }

    /// Caches `value` and writes it to the current program.
    pub fn set(&mut self, value: T) {
        if let (Some(location), Some(gl)) = (self.location, &self.gl) {
            self.value = value;
            gl.set_uniform(location, &value.to_data(self.transpose));
        }
    }

    pub fn with(mut self, value: T) -> Self {
        self.set(value);
        self
    }

    /// Re-writes the cached value, e.g. after the program was swapped.
    pub fn apply(&self) {
        if let (Some(location), Some(gl)) = (self.location, &self.gl) {
            gl.set_uniform(location, &self.value.to_data(self.transpose));
        }
    }

    /// Reads the value stored in `shader` into the cache.
    pub fn sync(&mut self, shader: &Shader) {
        let Some(location) = self.location else {
            return;
        };
        if let Some(value) = shader
            .read_uniform(location, T::KIND)
            .and_then(|data| T::from_data(&data))
        {
            self.value = value;
        }
    }

    pub fn synced(mut self, shader: &Shader) -> Self {
        self.sync(shader);
        self
    }

    /// Resolves the same name again in `shader` and re-writes the cached
    /// value. Used after a reload replaced the program.
    pub fn reset(&mut self, shader: &Shader) {
        if self.gl.is_none() {
            return;
        }
        let name = std::mem::take(&mut self.name);
        self.initialize(shader, &name);
        self.apply();
    }
}

macro_rules! transposable {
    ($($ty:ty),*) => {$(
        impl Uniform<$ty> {
            /// Writes a matrix, uploading it transposed when `transpose` is
            /// set. The flag sticks for later `apply` calls.
            pub fn set_transposed(&mut self, value: $ty, transpose: bool) {
                if self.location.is_some() {
                    self.transpose = transpose;
                }
                self.set(value);
            }

            pub fn with_transposed(mut self, value: $ty, transpose: bool) -> Self {
                self.set_transposed(value, transpose);
                self
            }
        }
    )*};
}

transposable!(Mat2, Mat3, Mat4);
