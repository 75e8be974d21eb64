//! Shader programs and typed uniforms.

mod program;
mod uniform;
mod value;

pub use program::{Shader, ShaderUsage};
pub use uniform::{
    Uniform, Uniform1f, Uniform1i, Uniform1u, Uniform2f, Uniform2i, Uniform2u, Uniform3f,
    Uniform3i, Uniform3u, Uniform4f, Uniform4i, Uniform4u, UniformMat2, UniformMat3, UniformMat4,
};
pub use value::UniformValue;

pub use crate::error::ShaderError;
