//! Shared test fixtures.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle as RawWindowHandle,
};

use crate::color::Color;
use crate::error::EngineError;
use crate::files::MemoryFileLoader;
use crate::gl::{GlRef, HeadlessGl};
use crate::shader::Shader;
use crate::window::{NativeWindow, WindowDescriptor, WindowHandle, WindowState, WindowSystem};

pub(crate) const VERT_PATH: &str = "shaders/basic/basic.vert";
pub(crate) const FRAG_PATH: &str = "shaders/basic/basic.frag";

pub(crate) const BASIC_VERT: &str = r#"#version 450 core
layout(location = 0) in vec3 position;
layout(location = 1) in vec3 normal;

uniform mat4 mvp;
uniform mat4 model;

out vec3 frag_position;
out vec3 frag_normal;

void main() {
    frag_position = vec3(model * vec4(position, 1.0));
    frag_normal = mat3(transpose(inverse(model))) * normal;
    gl_Position = mvp * vec4(position, 1.0);
}
"#;

pub(crate) const BASIC_FRAG: &str = r#"#version 450 core
struct Light {
    vec3 position;
    float strength;
    float diffuse_coefficient;
    vec3 diffuse_color;
    float specular_coefficient;
    vec3 specular_color;
    float ambient_coefficient;
    vec3 ambient_color;
};

struct Material {
    vec3 color;
    uint shininess;
};

uniform vec3 camera_pos;
uniform Light light;
uniform Material material;

in vec3 frag_position;
in vec3 frag_normal;
out vec4 color;

void main() {
    color = vec4(material.color * light.ambient_color, 1.0);
}
"#;

pub(crate) fn headless() -> (Rc<HeadlessGl>, GlRef) {
    let h = Rc::new(HeadlessGl::new());
    let gl: GlRef = h.clone();
    (h, gl)
}

pub(crate) fn shader_files() -> MemoryFileLoader {
    MemoryFileLoader::new()
        .with_file(VERT_PATH, BASIC_VERT)
        .with_file(FRAG_PATH, BASIC_FRAG)
}

pub(crate) fn basic_shader(gl: &GlRef) -> Shader {
    match Shader::from_files(gl, &shader_files(), VERT_PATH, FRAG_PATH) {
        Ok(shader) => shader,
        Err(e) => panic!("fixture shader failed to build: {e}"),
    }
}

// ── window fakes ──

/// In-memory native window.
#[derive(Debug)]
pub(crate) struct FakeWindow {
    id: u64,
    size: Mutex<(u32, u32)>,
    min_size: Mutex<(u32, u32)>,
    title: Mutex<String>,
    position: Mutex<(i32, i32)>,
    maximized: AtomicBool,
    resize_requests: AtomicUsize,
    title_changes: AtomicUsize,
}

impl FakeWindow {
    pub(crate) fn min_size(&self) -> (u32, u32) {
        *lock(&self.min_size)
    }

    pub(crate) fn title(&self) -> String {
        lock(&self.title).clone()
    }

    pub(crate) fn is_maximized(&self) -> bool {
        self.maximized.load(Ordering::SeqCst)
    }

    pub(crate) fn resize_requests(&self) -> usize {
        self.resize_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn title_changes(&self) -> usize {
        self.title_changes.load(Ordering::SeqCst)
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HasWindowHandle for FakeWindow {
    fn window_handle(&self) -> Result<RawWindowHandle<'_>, HandleError> {
        Err(HandleError::Unavailable)
    }
}

impl HasDisplayHandle for FakeWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        Err(HandleError::Unavailable)
    }
}

impl NativeWindow for FakeWindow {
    fn id(&self) -> u64 {
        self.id
    }

    fn inner_size(&self) -> (u32, u32) {
        *lock(&self.size)
    }

    fn request_inner_size(&self, width: u32, height: u32) {
        self.resize_requests.fetch_add(1, Ordering::SeqCst);
        *lock(&self.size) = (width, height);
    }

    fn set_min_inner_size(&self, width: u32, height: u32) {
        *lock(&self.min_size) = (width, height);
    }

    fn set_title(&self, title: &str) {
        self.title_changes.fetch_add(1, Ordering::SeqCst);
        *lock(&self.title) = title.to_string();
    }

    fn maximize(&self) {
        self.maximized.store(true, Ordering::SeqCst);
    }

    fn outer_position(&self) -> Option<(i32, i32)> {
        Some(*lock(&self.position))
    }

    fn set_outer_position(&self, x: i32, y: i32) {
        *lock(&self.position) = (x, y);
    }
}

/// Window system that hands out [`FakeWindow`]s and keeps them for
/// inspection.
#[derive(Debug, Default)]
pub(crate) struct FakeWindowSystem {
    windows: Mutex<Vec<Arc<FakeWindow>>>,
}

impl FakeWindowSystem {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn created(&self) -> usize {
        lock(&self.windows).len()
    }

    pub(crate) fn last(&self) -> Option<Arc<FakeWindow>> {
        lock(&self.windows).last().cloned()
    }
}

impl WindowSystem for FakeWindowSystem {
    fn create_window(&self, descriptor: &WindowDescriptor) -> Result<Arc<dyn NativeWindow>, EngineError> {
        let mut windows = lock(&self.windows);
        let window = Arc::new(FakeWindow {
            id: windows.len() as u64 + 1,
            size: Mutex::new((descriptor.width, descriptor.height)),
            min_size: Mutex::new((0, 0)),
            title: Mutex::new(descriptor.title.clone()),
            position: Mutex::new((100, 50)),
            maximized: AtomicBool::new(false),
            resize_requests: AtomicUsize::new(0),
            title_changes: AtomicUsize::new(0),
        });
        windows.push(window.clone());
        Ok(window)
    }
}

/// Render-thread handle to a window that only exists as shared state.
pub(crate) fn window_handle(width: u32, height: u32) -> WindowHandle {
    let state = WindowState::new(width, height, Color::default());
    state.set_active(true);
    WindowHandle::new(Arc::new(state), None)
}
