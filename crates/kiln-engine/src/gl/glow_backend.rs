use std::fmt;
use std::num::NonZeroU32;

use glow::HasContext;

#[cfg(debug_assertions)]
use super::debug_severity_level;
use super::{Gl, ShaderStage, UniformData, UniformKind, UniformLocation, VertexAttribute};

/// `Gl` on top of a loaded `glow` context.
///
/// Every call assumes the context is current on the calling thread, which
/// the `Rc`-based `GlRef` keeps true once construction happened there.
pub struct GlowGl {
    gl: glow::Context,
}

impl GlowGl {
    /// Wraps a loaded context. In debug builds the driver's debug output is
    /// routed into `log` when the context supports it.
    pub fn new(gl: glow::Context) -> Self {
        #[cfg(debug_assertions)]
        let gl = install_debug_output(gl);

        Self { gl }
    }
}

#[cfg(debug_assertions)]
fn install_debug_output(mut gl: glow::Context) -> glow::Context {
    unsafe {
        if gl.supports_debug() {
            gl.enable(glow::DEBUG_OUTPUT);
            gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
            gl.debug_message_callback(forward_debug_message);
            gl.debug_message_control(glow::DONT_CARE, glow::DONT_CARE, glow::DONT_CARE, &[], true);
            log::debug!("OpenGL debug output enabled");
        }
    }
    gl
}

#[cfg(debug_assertions)]
fn forward_debug_message(_source: u32, _kind: u32, id: u32, severity: u32, message: &str) {
    log::log!(target: "kiln::gl", debug_severity_level(severity), "[{id}] {message}");
}

impl fmt::Debug for GlowGl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.gl.version();
        f.debug_struct("GlowGl")
            .field("version", &(v.major, v.minor))
            .finish_non_exhaustive()
    }
}

#[inline]
fn buffer(id: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(id).map(glow::NativeBuffer)
}

#[inline]
fn vertex_array(id: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(id).map(glow::NativeVertexArray)
}

#[inline]
fn shader(id: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(id).map(glow::NativeShader)
}

#[inline]
fn program(id: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id).map(glow::NativeProgram)
}

fn created<T>(what: &str, result: Result<T, String>, id: impl FnOnce(T) -> u32) -> u32 {
    match result {
        Ok(handle) => id(handle),
        Err(e) => {
            log::error!("failed to create {what}: {e}");
            0
        }
    }
}

impl Gl for GlowGl {
    fn version(&self) -> (u32, u32) {
        let v = self.gl.version();
        (v.major, v.minor)
    }

    fn create_buffer(&self) -> u32 {
        created("buffer", unsafe { self.gl.create_buffer() }, |b| b.0.get())
    }

    fn buffer_data(&self, id: u32, data: &[u8]) {
        // The copy-write target leaves array and element bindings untouched.
        unsafe {
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, buffer(id));
            self.gl
                .buffer_data_u8_slice(glow::COPY_WRITE_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, None);
        }
    }

    fn delete_buffer(&self, id: u32) {
        if let Some(b) = buffer(id) {
            unsafe { self.gl.delete_buffer(b) };
        }
    }

    fn create_vertex_array(&self) -> u32 {
        created("vertex array", unsafe { self.gl.create_vertex_array() }, |v| {
            v.0.get()
        })
    }

    fn delete_vertex_array(&self, id: u32) {
        if let Some(v) = vertex_array(id) {
            unsafe { self.gl.delete_vertex_array(v) };
        }
    }

    fn bind_vertex_array(&self, id: u32) {
        unsafe { self.gl.bind_vertex_array(vertex_array(id)) };
    }

    fn vertex_array_attribute(&self, id: u32, attribute: VertexAttribute) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array(id));
            self.gl.enable_vertex_attrib_array(attribute.index);
            self.gl.vertex_attrib_format_f32(
                attribute.index,
                attribute.components as i32,
                glow::FLOAT,
                false,
                attribute.offset,
            );
            self.gl.vertex_attrib_binding(attribute.index, attribute.binding);
            self.gl.bind_vertex_array(None);
        }
    }

    fn vertex_array_vertex_buffer(&self, id: u32, binding: u32, vbo: u32, stride: u32) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array(id));
            self.gl.bind_vertex_buffer(binding, buffer(vbo), 0, stride as i32);
            self.gl.bind_vertex_array(None);
        }
    }

    fn vertex_array_element_buffer(&self, id: u32, ebo: u32) {
        // The element binding is vertex-array state; unbinding the array first
        // keeps it recorded.
        unsafe {
            self.gl.bind_vertex_array(vertex_array(id));
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, buffer(ebo));
            self.gl.bind_vertex_array(None);
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> u32 {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        created("shader", unsafe { self.gl.create_shader(kind) }, |s| s.0.get())
    }

    fn compile_shader(&self, id: u32, source: &str) -> Result<(), String> {
        let Some(s) = shader(id) else {
            return Err("invalid shader object".to_string());
        };
        unsafe {
            self.gl.shader_source(s, source);
            self.gl.compile_shader(s);
            if self.gl.get_shader_compile_status(s) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(s))
            }
        }
    }

    fn delete_shader(&self, id: u32) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.delete_shader(s) };
        }
    }

    fn create_program(&self) -> u32 {
        created("program", unsafe { self.gl.create_program() }, |p| p.0.get())
    }

    fn link_program(&self, id: u32, shaders: &[u32]) -> Result<(), String> {
        let Some(p) = program(id) else {
            return Err("invalid program object".to_string());
        };
        unsafe {
            for s in shaders.iter().filter_map(|&s| shader(s)) {
                self.gl.attach_shader(p, s);
            }
            self.gl.link_program(p);
            for s in shaders.iter().filter_map(|&s| shader(s)) {
                self.gl.detach_shader(p, s);
            }
            if self.gl.get_program_link_status(p) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(p))
            }
        }
    }

    fn delete_program(&self, id: u32) {
        if let Some(p) = program(id) {
            unsafe { self.gl.delete_program(p) };
        }
    }

    fn use_program(&self, id: u32) {
        unsafe { self.gl.use_program(program(id)) };
    }

    fn uniform_location(&self, id: u32, name: &str) -> Option<UniformLocation> {
        let p = program(id)?;
        unsafe { self.gl.get_uniform_location(p, name) }.map(|l| UniformLocation(l.0))
    }

    fn set_uniform(&self, location: UniformLocation, data: &UniformData) {
        let loc = glow::NativeUniformLocation(location.0);
        let loc = Some(&loc);
        unsafe {
            match *data {
                UniformData::Float(1, v) => self.gl.uniform_1_f32(loc, v[0]),
                UniformData::Float(2, v) => self.gl.uniform_2_f32(loc, v[0], v[1]),
                UniformData::Float(3, v) => self.gl.uniform_3_f32(loc, v[0], v[1], v[2]),
                UniformData::Float(_, v) => self.gl.uniform_4_f32(loc, v[0], v[1], v[2], v[3]),
                UniformData::Int(1, v) => self.gl.uniform_1_i32(loc, v[0]),
                UniformData::Int(2, v) => self.gl.uniform_2_i32(loc, v[0], v[1]),
                UniformData::Int(3, v) => self.gl.uniform_3_i32(loc, v[0], v[1], v[2]),
                UniformData::Int(_, v) => self.gl.uniform_4_i32(loc, v[0], v[1], v[2], v[3]),
                UniformData::Uint(1, v) => self.gl.uniform_1_u32(loc, v[0]),
                UniformData::Uint(2, v) => self.gl.uniform_2_u32(loc, v[0], v[1]),
                UniformData::Uint(3, v) => self.gl.uniform_3_u32(loc, v[0], v[1], v[2]),
                UniformData::Uint(_, v) => self.gl.uniform_4_u32(loc, v[0], v[1], v[2], v[3]),
                UniformData::Mat2(m, t) => self.gl.uniform_matrix_2_f32_slice(loc, t, &m),
                UniformData::Mat3(m, t) => self.gl.uniform_matrix_3_f32_slice(loc, t, &m),
                UniformData::Mat4(m, t) => self.gl.uniform_matrix_4_f32_slice(loc, t, &m),
            }
        }
    }

    fn get_uniform(&self, id: u32, location: UniformLocation, kind: UniformKind) -> Option<UniformData> {
        let p = program(id)?;
        let loc = glow::NativeUniformLocation(location.0);
        let mut data = UniformData::zeroed(kind);
        unsafe {
            match &mut data {
                UniformData::Float(n, v) => self.gl.get_uniform_f32(p, &loc, &mut v[..*n as usize]),
                UniformData::Int(n, v) => self.gl.get_uniform_i32(p, &loc, &mut v[..*n as usize]),
                UniformData::Uint(n, v) => {
                    let mut raw = [0i32; 4];
                    self.gl.get_uniform_i32(p, &loc, &mut raw[..*n as usize]);
                    for (dst, src) in v.iter_mut().zip(raw) {
                        *dst = src as u32;
                    }
                }
                UniformData::Mat2(m, _) => self.gl.get_uniform_f32(p, &loc, m),
                UniformData::Mat3(m, _) => self.gl.get_uniform_f32(p, &loc, m),
                UniformData::Mat4(m, _) => self.gl.get_uniform_f32(p, &loc, m),
            }
        }
        Some(data)
    }

    fn set_face_culling(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::CULL_FACE);
            } else {
                self.gl.disable(glow::CULL_FACE);
            }
        }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.viewport(x, y, width as i32, height as i32) };
    }

    fn clear(&self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_triangles_indexed(&self, count: u32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, count as i32, glow::UNSIGNED_INT, 0);
        }
    }
}
