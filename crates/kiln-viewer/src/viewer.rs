use glam::{Mat4, Vec3};
use kiln_engine::core::{App, AppControl, AppCtx};
use kiln_engine::input::{Key, KeyInput, MouseButton, MouseInput};
use kiln_engine::scene::{Model, ModelLoader, ObjLoader, Scene};
use kiln_engine::shader::Shader;

use crate::geometry;

const VERTEX_SHADER: &str = "shaders/basic/basic.vert";
const FRAGMENT_SHADER: &str = "shaders/basic/basic.frag";
const MODEL: &str = "teapot.obj";

const ORBIT_SPEED: f32 = 1.5;
const DOLLY_SPEED: f32 = 2.0;
const MIN_DISTANCE: f32 = 0.5;
const LIGHT_SPEED: f32 = 4.0;

/// Orbiting camera around a single lit model.
#[derive(Default)]
pub struct Viewer {
    scene: Option<Scene>,
    keys: Option<KeyInput>,
    mouse: Option<MouseInput>,
    yaw: f32,
    distance: f32,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            distance: 2.0,
            ..Self::default()
        }
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(self.distance * self.yaw.sin(), 1.0, -self.distance * self.yaw.cos())
    }

    fn load_model(ctx: &AppCtx<'_>) -> Model {
        let path = ctx.config().resource(MODEL);
        match ObjLoader::new(ctx.files().clone()).load_model(&path) {
            Ok(data) => {
                let mut model = Model::from_data(data);
                model.scale = Vec3::splat(0.05);
                model
            }
            Err(e) => {
                log::warn!("{e}, showing a cube instead");
                let mut model = Model::new(vec![geometry::cube()]);
                model.scale = Vec3::splat(0.75);
                model
            }
        }
    }

    fn build_scene(&self, ctx: &AppCtx<'_>) -> Option<Scene> {
        let gl = ctx.gl();
        let mut shader = Shader::new(gl);
        if !shader.try_initialize(ctx.files().as_ref(), VERTEX_SHADER, FRAGMENT_SHADER) {
            return None;
        }

        let mut scene = Scene::with_shader(shader);
        scene.initialize_uniforms();
        scene.projection_matrix = Mat4::perspective_rh_gl(45f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);

        let mut model = Self::load_model(ctx);
        model.initialize(gl);
        scene.add_model(model);

        let _usage = scene.shader.scoped_usage();
        let light = &mut scene.light;
        light.position.set(Vec3::new(-2.0, 3.0, -1.0));
        light.strength.set(5.0);
        light.diffuse_coefficient.set(0.8);
        light.diffuse_color.set(Vec3::ONE);
        light.specular_coefficient.set(0.5);
        light.specular_color.set(Vec3::ONE);
        light.ambient_coefficient.set(1.0);
        light.ambient_color.set(Vec3::new(0.1, 0.1, 0.15));

        for model in &mut scene.models {
            model.material.color.set(Vec3::ONE);
            model.material.shininess.set(64);
            model.update_model_matrix();
        }
        Some(scene)
    }

    fn update_camera(&self, scene: &mut Scene) {
        let eye = self.camera_position();
        scene.view_matrix = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        scene.camera_position.set(eye);
    }
}

impl App for Viewer {
    fn on_startup(&mut self, ctx: &mut AppCtx<'_>) -> AppControl {
        let Some(mut scene) = self.build_scene(ctx) else {
            log::error!("basic shader failed to build");
            return AppControl::Exit;
        };
        {
            let _usage = scene.shader.scoped_usage();
            self.update_camera(&mut scene);
        }
        self.scene = Some(scene);

        let input = ctx.input();
        self.keys = Some(KeyInput::new(
            input,
            [
                Key::Escape,
                Key::Space,
                Key::W,
                Key::A,
                Key::S,
                Key::D,
                Key::ArrowUp,
                Key::ArrowDown,
            ],
        ));
        self.mouse = Some(MouseInput::new(input, [MouseButton::Left]));

        log::info!("viewer ready");
        AppControl::Continue
    }

    fn update(&mut self, ctx: &mut AppCtx<'_>, time: f64, dt: f64) -> AppControl {
        let (Some(keys), Some(mouse)) = (&self.keys, &self.mouse) else {
            return AppControl::Exit;
        };
        if keys.is_key_clicked(Key::Escape) {
            return AppControl::Exit;
        }
        if mouse.is_left_button_clicked() {
            log::info!("Click");
        }

        let dt = dt as f32;
        let axis = |neg: Key, pos: Key| f32::from(keys.is_key_down(pos)) - f32::from(keys.is_key_down(neg));
        let orbit = axis(Key::A, Key::D);
        let dolly = axis(Key::W, Key::S);
        let light = axis(Key::ArrowDown, Key::ArrowUp);
        let reload = keys.is_key_clicked(Key::Space);

        self.yaw += orbit * ORBIT_SPEED * dt;
        self.distance = (self.distance + dolly * DOLLY_SPEED * dt).max(MIN_DISTANCE);

        let Some(mut scene) = self.scene.take() else {
            return AppControl::Exit;
        };

        if reload && scene.shader.try_reload(ctx.files().as_ref(), None, None) {
            scene.reset_uniforms();
        }

        {
            let _usage = scene.shader.scoped_usage();
            self.update_camera(&mut scene);

            let strength = &mut scene.light.strength;
            strength.set((strength.get() + light * LIGHT_SPEED * dt).max(0.0));

            for model in &mut scene.models {
                model.rotation_angle = (time * 0.5) as f32;
                model.update_model_matrix();
            }
        }

        self.scene = Some(scene);
        AppControl::Continue
    }

    fn draw(&mut self, ctx: &mut AppCtx<'_>) {
        if let Some(scene) = &mut self.scene {
            ctx.draw(scene);
        }
    }

    fn on_destroy(&mut self, _ctx: &mut AppCtx<'_>) {
        self.scene = None;
        log::info!("viewer closed");
    }
}
