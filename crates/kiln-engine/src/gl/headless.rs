use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{Gl, ShaderStage, UniformData, UniformKind, UniformLocation, VertexAttribute};

/// Call recorded by [`HeadlessGl`].
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateBuffer(u32),
    BufferData { buffer: u32, len: usize },
    DeleteBuffer(u32),
    CreateVertexArray(u32),
    DeleteVertexArray(u32),
    BindVertexArray(u32),
    VertexAttribute { vertex_array: u32, attribute: VertexAttribute },
    VertexBuffer { vertex_array: u32, binding: u32, buffer: u32, stride: u32 },
    ElementBuffer { vertex_array: u32, buffer: u32 },
    CreateShader(u32, ShaderStage),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(u32),
    SetUniform { program: u32, location: UniformLocation, data: UniformData },
    FaceCulling(bool),
    DepthTest(bool),
    Viewport(i32, i32, u32, u32),
    Clear([f32; 4]),
    DrawIndexed(u32),
}

/// Software `Gl` that records calls and tracks object lifetimes.
///
/// Compiling checks for a `#version` directive and balanced brackets;
/// linking checks that every stage defines `main`. Every declared uniform is
/// considered active, including the members of struct-typed uniforms.
///
/// Misuse that a driver would reject or silently ignore (deleting a dead
/// name, writing a uniform with no program bound, mismatched uniform types,
/// drawing with no vertex array) is recorded in [`errors`](Self::errors).
#[derive(Debug)]
pub struct HeadlessGl {
    version: (u32, u32),
    state: RefCell<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    buffers: HashMap<u32, usize>,
    vertex_arrays: HashSet<u32>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    current_program: u32,
    bound_vertex_array: u32,
    face_culling: bool,
    calls: Vec<GlCall>,
    errors: Vec<String>,
}

#[derive(Debug)]
struct ShaderObject {
    stage: ShaderStage,
    source: Option<String>,
}

#[derive(Debug, Default)]
struct ProgramObject {
    linked: bool,
    uniforms: Vec<DeclaredUniform>,
    values: HashMap<u32, UniformData>,
}

#[derive(Debug, Clone, PartialEq)]
struct DeclaredUniform {
    name: String,
    kind: Option<UniformKind>,
}

impl Default for HeadlessGl {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessGl {
    /// A 4.6 context.
    pub fn new() -> Self {
        Self::with_version(4, 6)
    }

    pub fn with_version(major: u32, minor: u32) -> Self {
        Self {
            version: (major, minor),
            state: RefCell::new(State::default()),
        }
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn buffer_len(&self, buffer: u32) -> Option<usize> {
        self.state.borrow().buffers.get(&buffer).copied()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn current_program(&self) -> u32 {
        self.state.borrow().current_program
    }

    pub fn face_culling(&self) -> bool {
        self.state.borrow().face_culling
    }

    /// Value stored in `program` for the uniform called `name`.
    pub fn uniform_value(&self, program: u32, name: &str) -> Option<UniformData> {
        let state = self.state.borrow();
        let p = state.programs.get(&program)?;
        let index = p.uniforms.iter().position(|u| u.name == name)?;
        p.values.get(&(index as u32)).copied()
    }
}

impl State {
    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, call: GlCall) {
        self.calls.push(call);
    }

    fn error(&mut self, message: String) {
        log::trace!(target: "kiln::gl", "headless error: {message}");
        self.errors.push(message);
    }
}

impl Gl for HeadlessGl {
    fn version(&self) -> (u32, u32) {
        self.version
    }

    fn create_buffer(&self) -> u32 {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.buffers.insert(id, 0);
        s.record(GlCall::CreateBuffer(id));
        id
    }

    fn buffer_data(&self, buffer: u32, data: &[u8]) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::BufferData { buffer, len: data.len() });
        match s.buffers.get_mut(&buffer) {
            Some(len) => *len = data.len(),
            None => s.error(format!("buffer_data on dead buffer {buffer}")),
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::DeleteBuffer(buffer));
        if buffer != 0 && s.buffers.remove(&buffer).is_none() {
            s.error(format!("buffer {buffer} deleted twice"));
        }
    }

    fn create_vertex_array(&self) -> u32 {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.vertex_arrays.insert(id);
        s.record(GlCall::CreateVertexArray(id));
        id
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::DeleteVertexArray(vertex_array));
        if vertex_array != 0 && !s.vertex_arrays.remove(&vertex_array) {
            s.error(format!("vertex array {vertex_array} deleted twice"));
        }
        if s.bound_vertex_array == vertex_array {
            s.bound_vertex_array = 0;
        }
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::BindVertexArray(vertex_array));
        if vertex_array != 0 && !s.vertex_arrays.contains(&vertex_array) {
            s.error(format!("bind of dead vertex array {vertex_array}"));
        }
        s.bound_vertex_array = vertex_array;
    }

    fn vertex_array_attribute(&self, vertex_array: u32, attribute: VertexAttribute) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::VertexAttribute { vertex_array, attribute });
        if !s.vertex_arrays.contains(&vertex_array) {
            s.error(format!("attribute format on dead vertex array {vertex_array}"));
        }
    }

    fn vertex_array_vertex_buffer(&self, vertex_array: u32, binding: u32, buffer: u32, stride: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::VertexBuffer { vertex_array, binding, buffer, stride });
        if !s.vertex_arrays.contains(&vertex_array) || !s.buffers.contains_key(&buffer) {
            s.error(format!("vertex buffer {buffer} linked to vertex array {vertex_array}"));
        }
    }

    fn vertex_array_element_buffer(&self, vertex_array: u32, buffer: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::ElementBuffer { vertex_array, buffer });
        if !s.vertex_arrays.contains(&vertex_array) || !s.buffers.contains_key(&buffer) {
            s.error(format!("element buffer {buffer} linked to vertex array {vertex_array}"));
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> u32 {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.shaders.insert(id, ShaderObject { stage, source: None });
        s.record(GlCall::CreateShader(id, stage));
        id
    }

    fn compile_shader(&self, shader: u32, source: &str) -> Result<(), String> {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::CompileShader(shader));
        let Some(object) = s.shaders.get_mut(&shader) else {
            return Err(format!("invalid shader object {shader}"));
        };
        validate_source(source)?;
        object.source = Some(source.to_string());
        Ok(())
    }

    fn delete_shader(&self, shader: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::DeleteShader(shader));
        if shader != 0 && s.shaders.remove(&shader).is_none() {
            s.error(format!("shader {shader} deleted twice"));
        }
    }

    fn create_program(&self) -> u32 {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.programs.insert(id, ProgramObject::default());
        s.record(GlCall::CreateProgram(id));
        id
    }

    fn link_program(&self, program: u32, shaders: &[u32]) -> Result<(), String> {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::LinkProgram(program));

        let mut sources = Vec::new();
        let mut stages = HashSet::new();
        for id in shaders {
            match s.shaders.get(id) {
                Some(ShaderObject { stage, source: Some(src) }) => {
                    if find_word(&strip_comments(src), "main").is_none() {
                        return Err(format!("error: {stage} lacks `main'"));
                    }
                    stages.insert(*stage);
                    sources.push(src.clone());
                }
                Some(ShaderObject { stage, source: None }) => {
                    return Err(format!("error: {stage} {id} is not compiled"));
                }
                None => return Err(format!("error: invalid shader object {id}")),
            }
        }
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            if !stages.contains(&stage) {
                return Err(format!("error: no {stage} attached"));
            }
        }

        let uniforms = declared_uniforms(sources.iter().map(String::as_str));
        let Some(p) = s.programs.get_mut(&program) else {
            return Err(format!("error: invalid program object {program}"));
        };
        p.linked = true;
        p.uniforms = uniforms;
        p.values.clear();
        Ok(())
    }

    fn delete_program(&self, program: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::DeleteProgram(program));
        if program != 0 && s.programs.remove(&program).is_none() {
            s.error(format!("program {program} deleted twice"));
        }
    }

    fn use_program(&self, program: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::UseProgram(program));
        if program != 0 && !s.programs.get(&program).is_some_and(|p| p.linked) {
            s.error(format!("use of unlinked program {program}"));
        }
        s.current_program = program;
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<UniformLocation> {
        let s = self.state.borrow();
        let p = s.programs.get(&program).filter(|p| p.linked)?;
        p.uniforms
            .iter()
            .position(|u| u.name == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn set_uniform(&self, location: UniformLocation, data: &UniformData) {
        let mut s = self.state.borrow_mut();
        let program = s.current_program;
        s.record(GlCall::SetUniform { program, location, data: *data });

        if program == 0 {
            s.error(format!("uniform {} written with no program bound", location.0));
            return;
        }
        let Some(p) = s.programs.get_mut(&program) else {
            s.error(format!("uniform written to deleted program {program}"));
            return;
        };
        let Some(declared) = p.uniforms.get(location.0 as usize) else {
            s.error(format!("invalid uniform location {} in program {program}", location.0));
            return;
        };
        if declared.kind.is_some_and(|k| k != data.kind()) {
            let name = declared.name.clone();
            s.error(format!("type mismatch writing uniform {name}"));
            return;
        }
        p.values.insert(location.0, *data);
    }

    fn get_uniform(&self, program: u32, location: UniformLocation, kind: UniformKind) -> Option<UniformData> {
        let s = self.state.borrow();
        let p = s.programs.get(&program)?;
        p.uniforms.get(location.0 as usize)?;
        Some(
            p.values
                .get(&location.0)
                .copied()
                .unwrap_or_else(|| UniformData::zeroed(kind)),
        )
    }

    fn set_face_culling(&self, enabled: bool) {
        let mut s = self.state.borrow_mut();
        s.face_culling = enabled;
        s.record(GlCall::FaceCulling(enabled));
    }

    fn set_depth_test(&self, enabled: bool) {
        self.state.borrow_mut().record(GlCall::DepthTest(enabled));
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        self.state
            .borrow_mut()
            .record(GlCall::Viewport(x, y, width, height));
    }

    fn clear(&self, color: [f32; 4]) {
        self.state.borrow_mut().record(GlCall::Clear(color));
    }

    fn draw_triangles_indexed(&self, count: u32) {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::DrawIndexed(count));
        if s.bound_vertex_array == 0 {
            s.error("draw with no vertex array bound".to_string());
        }
        if s.current_program == 0 {
            s.error("draw with no program bound".to_string());
        }
    }
}

// ── GLSL-lite ─────────────────────────────────────────────────────────────

fn strip_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_source(source: &str) -> Result<(), String> {
    let code = strip_comments(source);

    if !code.trim_start().starts_with("#version") {
        return Err("0:1(1): error: missing #version directive".to_string());
    }
    let mut stack = Vec::new();
    for (line_no, line) in code.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' | '(' | '[' => stack.push(c),
                '}' | ')' | ']' => {
                    let open = match c {
                        '}' => '{',
                        ')' => '(',
                        _ => '[',
                    };
                    if stack.pop() != Some(open) {
                        return Err(format!("0:{}(1): error: syntax error, unexpected '{c}'", line_no + 1));
                    }
                }
                _ => {}
            }
        }
    }
    if !stack.is_empty() {
        return Err("0:1(1): error: syntax error, unexpected end of file".to_string());
    }
    Ok(())
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn find_word(haystack: &str, word: &str) -> Option<usize> {
    haystack.match_indices(word).map(|(i, _)| i).find(|&i| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

fn strip_declarator(name: &str) -> &str {
    name.split(['[', '=']).next().unwrap_or(name).trim()
}

fn glsl_kind(ty: &str) -> Option<UniformKind> {
    Some(match ty {
        "float" => UniformKind::Float(1),
        "vec2" => UniformKind::Float(2),
        "vec3" => UniformKind::Float(3),
        "vec4" => UniformKind::Float(4),
        "int" | "bool" => UniformKind::Int(1),
        "ivec2" => UniformKind::Int(2),
        "ivec3" => UniformKind::Int(3),
        "ivec4" => UniformKind::Int(4),
        "uint" => UniformKind::Uint(1),
        "uvec2" => UniformKind::Uint(2),
        "uvec3" => UniformKind::Uint(3),
        "uvec4" => UniformKind::Uint(4),
        "mat2" => UniformKind::Mat2,
        "mat3" => UniformKind::Mat3,
        "mat4" => UniformKind::Mat4,
        _ => return None,
    })
}

/// `struct Name { type member; ... };` definitions.
fn struct_members(code: &str) -> HashMap<String, Vec<(String, String)>> {
    let mut out = HashMap::new();
    let mut rest = code;

    while let Some(pos) = find_word(rest, "struct") {
        let after = &rest[pos + "struct".len()..];
        let (Some(open), Some(close)) = (after.find('{'), after.find('}')) else {
            break;
        };
        if close < open {
            break;
        }

        let name = after[..open].trim().to_string();
        let members = after[open + 1..close]
            .split(';')
            .filter_map(|decl| {
                let mut tokens = decl.split_whitespace();
                let ty = tokens.next()?;
                let member = tokens.next()?;
                Some((ty.to_string(), strip_declarator(member).to_string()))
            })
            .collect();

        out.insert(name, members);
        rest = &after[close + 1..];
    }
    out
}

fn declared_uniforms<'a>(sources: impl Iterator<Item = &'a str>) -> Vec<DeclaredUniform> {
    let mut out: Vec<DeclaredUniform> = Vec::new();
    let mut push = |name: String, kind: Option<UniformKind>| {
        if !out.iter().any(|u| u.name == name) {
            out.push(DeclaredUniform { name, kind });
        }
    };

    for source in sources {
        let code = strip_comments(source);
        let structs = struct_members(&code);

        for statement in code.split(';') {
            let tokens: Vec<&str> = statement.split_whitespace().collect();
            let Some(at) = tokens.iter().position(|t| *t == "uniform") else {
                continue;
            };
            let mut decl = tokens[at + 1..]
                .iter()
                .copied()
                .filter(|t| !matches!(*t, "highp" | "mediump" | "lowp"));
            let (Some(ty), Some(name)) = (decl.next(), decl.next()) else {
                continue;
            };
            if name.starts_with('{') {
                continue;
            }
            let name = strip_declarator(name);

            match structs.get(ty) {
                Some(members) => {
                    for (member_ty, member) in members {
                        push(format!("{name}.{member}"), glsl_kind(member_ty));
                    }
                }
                None => push(name.to_string(), glsl_kind(ty)),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERT: &str = r#"
        #version 450 core
        layout(location = 0) in vec3 position;
        uniform mat4 mvp; // combined
        uniform highp float scale;
        void main() {
            gl_Position = mvp * vec4(position * scale, 1.0);
        }
    "#;

    const FRAG: &str = r#"
        #version 450 core
        struct Light {
            vec3 position;
            float strength;
        };
        uniform Light light;
        uniform uint shininess;
        out vec4 color;
        void main() {
            color = vec4(light.position * light.strength, float(shininess));
        }
    "#;

    fn linked(gl: &HeadlessGl) -> u32 {
        let vs = gl.create_shader(ShaderStage::Vertex);
        let fs = gl.create_shader(ShaderStage::Fragment);
        gl.compile_shader(vs, VERT).unwrap();
        gl.compile_shader(fs, FRAG).unwrap();
        let program = gl.create_program();
        gl.link_program(program, &[vs, fs]).unwrap();
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        program
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn validation_rejects_broken_sources() {
        assert!(validate_source(VERT).is_ok());
        assert!(validate_source("void main() {}").is_err());
        assert!(validate_source("#version 450\nvoid main() {").is_err());
        assert!(validate_source("#version 450\nvoid main() { ) }").is_err());
    }

    #[test]
    fn link_requires_both_stages() {
        let gl = HeadlessGl::new();
        let vs = gl.create_shader(ShaderStage::Vertex);
        gl.compile_shader(vs, VERT).unwrap();
        let program = gl.create_program();
        let err = gl.link_program(program, &[vs]).unwrap_err();
        assert!(err.contains("Fragment Shader"));
    }

    #[test]
    fn link_requires_main() {
        let gl = HeadlessGl::new();
        let vs = gl.create_shader(ShaderStage::Vertex);
        let fs = gl.create_shader(ShaderStage::Fragment);
        gl.compile_shader(vs, VERT).unwrap();
        gl.compile_shader(fs, "#version 450\nvoid shade() {}").unwrap();
        let program = gl.create_program();
        let err = gl.link_program(program, &[vs, fs]).unwrap_err();
        assert!(err.contains("main"));
    }

    // ── reflection ────────────────────────────────────────────────────────

    #[test]
    fn uniforms_are_reflected() {
        let gl = HeadlessGl::new();
        let program = linked(&gl);

        for name in ["mvp", "scale", "light.position", "light.strength", "shininess"] {
            assert!(gl.uniform_location(program, name).is_some(), "{name}");
        }
        assert_eq!(gl.uniform_location(program, "light"), None);
        assert_eq!(gl.uniform_location(program, "position"), None);
    }

    #[test]
    fn uniform_writes_go_to_bound_program() {
        let gl = HeadlessGl::new();
        let program = linked(&gl);
        let loc = gl.uniform_location(program, "scale").unwrap();

        gl.set_uniform(loc, &UniformData::Float(1, [2.0, 0.0, 0.0, 0.0]));
        assert_eq!(gl.errors().len(), 1);

        gl.use_program(program);
        gl.set_uniform(loc, &UniformData::Float(1, [2.0, 0.0, 0.0, 0.0]));
        assert_eq!(
            gl.uniform_value(program, "scale"),
            Some(UniformData::Float(1, [2.0, 0.0, 0.0, 0.0]))
        );
        assert_eq!(
            gl.get_uniform(program, loc, UniformKind::Float(1)),
            Some(UniformData::Float(1, [2.0, 0.0, 0.0, 0.0]))
        );
    }

    #[test]
    fn mismatched_uniform_type_is_an_error() {
        let gl = HeadlessGl::new();
        let program = linked(&gl);
        gl.use_program(program);

        let loc = gl.uniform_location(program, "shininess").unwrap();
        gl.set_uniform(loc, &UniformData::Float(1, [1.0; 4]));
        assert_eq!(gl.errors().len(), 1);
        assert_eq!(gl.uniform_value(program, "shininess"), None);
    }

    // ── lifetimes ─────────────────────────────────────────────────────────

    #[test]
    fn double_delete_is_reported() {
        let gl = HeadlessGl::new();
        let b = gl.create_buffer();
        gl.delete_buffer(b);
        assert!(gl.errors().is_empty());
        gl.delete_buffer(b);
        assert_eq!(gl.errors().len(), 1);
        gl.delete_buffer(0);
        assert_eq!(gl.errors().len(), 1);
    }

    #[test]
    fn handles_are_unique_and_tracked() {
        let gl = HeadlessGl::new();
        let a = gl.create_buffer();
        let b = gl.create_buffer();
        let v = gl.create_vertex_array();
        assert!(a != b && b != v && a != 0);
        assert_eq!(gl.live_buffers(), 2);
        assert_eq!(gl.live_vertex_arrays(), 1);

        gl.buffer_data(a, &[0u8; 12]);
        assert_eq!(gl.buffer_len(a), Some(12));
    }
}
