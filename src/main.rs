//! Rolling ball demo
//!
//! WASD/arrows roll the ball relative to the camera, Space jumps, the mouse
//! orbits the camera and the scroll wheel zooms. An optional RON or JSON
//! ball config path may be passed as the first argument.

use rollball::player;
use rollball::prelude::*;

/// Demo game with a single ball on a ground plane
struct BallDemo {
    config: BallConfig,
    physics: Physics,
    mapper: InputMapper,
    orbit: OrbitCamera,
    ball: Option<hecs::Entity>,
    camera: Option<hecs::Entity>,
    since_report: f32,
}

impl BallDemo {
    fn new(config: BallConfig) -> Self {
        Self {
            config,
            physics: Physics::new(),
            mapper: InputMapper::with_defaults(),
            orbit: OrbitCamera::default(),
            ball: None,
            camera: None,
            since_report: 0.0,
        }
    }

    fn ball_position(&self, world: &World) -> Option<Vec3> {
        let ball = self.ball?;
        world.get::<Transform>(ball).ok().map(|t| t.position)
    }
}

impl Game for BallDemo {
    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!("Initializing ball demo");

        let ground = self.physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
        self.physics.add_ground_plane(ground);

        let start = Vec3::new(0.0, 0.1 + self.config.radius, 0.0);
        self.ball = Some(player::spawn_ball(
            &mut ctx.world,
            &mut self.physics,
            start,
            &self.config,
        ));

        ctx.world
            .spawn((MainCamera, Name::new("Camera"), self.orbit.transform(start)));
        self.camera = player::find_main_camera(&ctx.world);

        log::info!("Ball demo initialized");
    }

    fn on_key(&mut self, ctx: &mut EngineContext, key: KeyCode, state: ElementState) {
        if key == KeyCode::Escape {
            ctx.quit();
            return;
        }

        if self.mapper.is_move_key(key) {
            let axis = self.mapper.move_axis(&ctx.input);
            player::apply_move_input(&mut ctx.world, axis);
        } else if state == ElementState::Pressed
            && self.mapper.is_action_just_pressed(&ctx.input, InputAction::Jump)
        {
            player::apply_jump_input(&mut ctx.world);
        }
    }

    fn fixed_update(&mut self, ctx: &mut EngineContext, dt: f32) {
        player::fixed_update(&mut ctx.world, &mut self.physics, self.camera);
        self.physics.step(dt);
        ctx.world.sync_from_physics(&self.physics);
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        let Some(target) = self.ball_position(&ctx.world) else {
            return;
        };

        self.orbit
            .handle_input(ctx.input.mouse_delta(), ctx.input.scroll_delta());
        if let Some(camera) = self.camera
            && let Ok(mut transform) = ctx.world.get_mut::<Transform>(camera)
        {
            *transform = self.orbit.transform(target);
        }

        self.since_report += ctx.time.delta_seconds();
        if self.since_report >= 1.0 {
            self.since_report = 0.0;
            log::info!("Ball at {target:.2}");
        }
    }

    fn shutdown(&mut self, _ctx: &mut EngineContext) {
        log::info!("Ball demo shutting down");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    rollball::core::init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = BallConfig::load(&path).inspect_err(|e| {
                log::error!("Failed to load config {path}: {e}");
            })?;
            log::info!("Loaded ball config from {path}");
            config
        }
        None => BallConfig::default(),
    };

    let engine_config = EngineConfig::default()
        .with_title("Rolling Ball")
        .with_size(1280, 720);

    let engine = Engine::new(engine_config, BallDemo::new(config));

    engine.run().inspect_err(|e| log::error!("Engine error: {e}"))
}
