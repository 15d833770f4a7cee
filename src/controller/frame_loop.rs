use std::time::Duration;

use glam::Vec3;
use tracing::debug;

use crate::config::Settings;
use crate::controller::input::{handle_special_key, SpecialKey};
use crate::model::scene::{BACKGROUND, GLOBAL_AMBIENT};
use crate::model::{Perspective, Scene, CLOUDS};
use crate::view::backend::{DepthFunc, LightSlot, RenderBackend};
use crate::view::hud::HudStats;
use crate::view::shapes::{draw_clouds, draw_house, DrawList, Scope};

/// Turns real elapsed time into a whole number of fixed simulation steps.
#[derive(Debug, Clone, PartialEq)]
pub struct TickClock {
    step: Duration,
    accumulator: Duration,
    max_ticks: u32,
}

impl TickClock {
    pub fn new(step: Duration, max_ticks: u32) -> Self {
        Self {
            step: step.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
            max_ticks: max_ticks.max(1),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add `elapsed` and return how many ticks are due. Backlog beyond
    /// `max_ticks` is dropped.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_ticks && self.accumulator >= self.step {
            debug!(dropped = ?self.accumulator, "tick clock fell behind");
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Time left until the next tick is due.
    pub fn until_next_tick(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }
}

/// Frames per second, sampled once per second.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameStats {
    pub fn record(&mut self, dt: f32) {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
            debug!(fps = self.fps, "frame rate");
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Owns the scene and drives it: idle ticks, key presses and the display
/// callback.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    pub scene: Scene,
    clock: TickClock,
    perspective: Perspective,
    stats: FrameStats,
}

impl FrameLoop {
    pub fn new(settings: &Settings) -> Self {
        Self::with_scene(
            Scene::new(),
            TickClock::new(settings.tick_interval, settings.max_catch_up_ticks),
        )
    }

    pub fn with_scene(scene: Scene, clock: TickClock) -> Self {
        Self {
            scene,
            clock,
            perspective: Perspective::default(),
            stats: FrameStats::default(),
        }
    }

    /// Idle callback. Returns true when at least one tick ran and the
    /// window should be redrawn.
    pub fn idle(&mut self, elapsed: Duration) -> bool {
        let ticks = self.clock.accumulate(elapsed);
        for _ in 0..ticks {
            self.tick();
        }
        ticks > 0
    }

    pub fn tick(&mut self) {
        self.scene.tick();
    }

    pub fn until_next_tick(&self) -> Duration {
        self.clock.until_next_tick()
    }

    /// Special-key callback. Returns true when a redraw is needed.
    pub fn handle_key(&mut self, key: SpecialKey) -> bool {
        handle_special_key(&mut self.scene.camera, Some(key))
    }

    pub fn record_frame(&mut self, dt: f32) {
        self.stats.record(dt);
    }

    pub fn hud_stats(&self) -> HudStats {
        HudStats {
            fps: self.stats.fps(),
            ticks: self.scene.ticks(),
            camera_angle: self.scene.camera.angle(),
            camera_distance: self.scene.camera.distance(),
            car_angle: self.scene.car.angle() as f32,
        }
    }

    /// Everything drawn in one frame, in painting order.
    pub fn draw_list(&self) -> DrawList {
        let root = Scope::root();
        let mut list = DrawList::new();
        draw_house(root, &mut list);
        self.scene.car.draw(root, &mut list);
        self.scene.parked_car.draw(root, &mut list);
        draw_clouds(root, &CLOUDS, &mut list);
        list
    }

    /// Display callback.
    pub fn display<B: RenderBackend>(&self, backend: &mut B) -> Result<(), B::Error> {
        backend.clear(BACKGROUND);

        let (width, height) = backend.viewport();
        backend.set_projection(self.perspective.matrix(width, height));
        backend.set_view(self.scene.camera.view(Vec3::ZERO));

        backend.set_light_model_ambient(GLOBAL_AMBIENT);
        backend.enable_lighting();
        backend.setup_light(LightSlot::LIGHT0, &self.scene.main_light);
        backend.setup_light(LightSlot::LIGHT1, &self.scene.secondary_light);

        backend.enable_depth_test(DepthFunc::Less);

        for command in self.draw_list() {
            backend.draw(command);
        }

        backend.swap_buffers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LightParams;
    use crate::view::shapes::DrawCommand;
    use glam::{Mat4, Vec4};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear(Vec4),
        Projection(Mat4),
        View(Mat4),
        Ambient(Vec4),
        Lighting,
        SetLight(LightSlot, LightParams),
        EnableLight(LightSlot),
        DepthTest(DepthFunc),
        Draw(DrawCommand),
        Swap,
    }

    struct Recorder {
        viewport: (u32, u32),
        calls: Vec<Call>,
        fail_swap: bool,
    }

    impl Recorder {
        fn new(width: u32, height: u32) -> Self {
            Self {
                viewport: (width, height),
                calls: Vec::new(),
                fail_swap: false,
            }
        }
    }

    impl RenderBackend for Recorder {
        type Error = &'static str;

        fn viewport(&self) -> (u32, u32) {
            self.viewport
        }
        fn clear(&mut self, color: Vec4) {
            self.calls.push(Call::Clear(color));
        }
        fn set_projection(&mut self, projection: Mat4) {
            self.calls.push(Call::Projection(projection));
        }
        fn set_view(&mut self, view: Mat4) {
            self.calls.push(Call::View(view));
        }
        fn set_light_model_ambient(&mut self, ambient: Vec4) {
            self.calls.push(Call::Ambient(ambient));
        }
        fn enable_lighting(&mut self) {
            self.calls.push(Call::Lighting);
        }
        fn set_light(&mut self, slot: LightSlot, params: LightParams) {
            self.calls.push(Call::SetLight(slot, params));
        }
        fn enable_light(&mut self, slot: LightSlot) {
            self.calls.push(Call::EnableLight(slot));
        }
        fn enable_depth_test(&mut self, func: DepthFunc) {
            self.calls.push(Call::DepthTest(func));
        }
        fn draw(&mut self, command: DrawCommand) {
            self.calls.push(Call::Draw(command));
        }
        fn swap_buffers(&mut self) -> Result<(), Self::Error> {
            self.calls.push(Call::Swap);
            if self.fail_swap {
                Err("surface lost")
            } else {
                Ok(())
            }
        }
    }

    fn frame_loop() -> FrameLoop {
        FrameLoop::with_scene(Scene::new(), TickClock::new(Duration::from_millis(16), 8))
    }

    #[test]
    fn test_tick_clock_whole_steps() {
        let mut clock = TickClock::new(Duration::from_millis(16), 8);
        assert_eq!(clock.accumulate(Duration::from_millis(10)), 0);
        assert_eq!(clock.until_next_tick(), Duration::from_millis(6));
        assert_eq!(clock.accumulate(Duration::from_millis(10)), 1);
        assert_eq!(clock.until_next_tick(), Duration::from_millis(12));
        assert_eq!(clock.accumulate(Duration::from_millis(44)), 3);
        assert_eq!(clock.until_next_tick(), Duration::from_millis(16));
    }

    #[test]
    fn test_tick_clock_caps_catch_up() {
        let mut clock = TickClock::new(Duration::from_millis(16), 8);
        assert_eq!(clock.accumulate(Duration::from_secs(5)), 8);
        // backlog is dropped, not replayed
        assert_eq!(clock.accumulate(Duration::ZERO), 0);
        assert_eq!(clock.until_next_tick(), Duration::from_millis(16));
    }

    #[test]
    fn test_idle_runs_due_ticks() {
        let mut fl = frame_loop();
        assert!(!fl.idle(Duration::from_millis(5)));
        assert_eq!(fl.scene.ticks(), 0);
        assert!(fl.idle(Duration::from_millis(40)));
        assert_eq!(fl.scene.ticks(), 2);
        assert!((fl.scene.car.angle() - 4.8).abs() < 1e-4);
        let light_angle = fl.scene.secondary_light.angle().unwrap_or_default();
        assert!((light_angle - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_keys_reach_camera() {
        let mut fl = frame_loop();
        let angle = fl.scene.camera.angle();
        assert!(fl.handle_key(SpecialKey::Right));
        assert!((fl.scene.camera.angle() - angle - 0.1).abs() < 1e-6);
        let distance = fl.scene.camera.distance();
        assert!(fl.handle_key(SpecialKey::Down));
        assert!((fl.scene.camera.distance() - distance - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_display_call_order() {
        let fl = frame_loop();
        let mut backend = Recorder::new(800, 600);
        assert!(fl.display(&mut backend).is_ok());

        let calls = &backend.calls;
        assert_eq!(calls[0], Call::Clear(Vec4::new(0.1, 0.1, 0.1, 0.0)));
        assert_eq!(calls[1], Call::Projection(Perspective::default().matrix(800, 600)));
        assert_eq!(calls[2], Call::View(fl.scene.camera.view(Vec3::ZERO)));
        assert_eq!(calls[3], Call::Ambient(Vec4::new(0.2, 0.2, 0.2, 1.0)));
        assert_eq!(calls[4], Call::Lighting);
        assert_eq!(
            calls[5],
            Call::SetLight(LightSlot::LIGHT0, fl.scene.main_light.params())
        );
        assert_eq!(calls[6], Call::EnableLight(LightSlot::LIGHT0));
        assert_eq!(
            calls[7],
            Call::SetLight(LightSlot::LIGHT1, fl.scene.secondary_light.params())
        );
        assert_eq!(calls[8], Call::EnableLight(LightSlot::LIGHT1));
        assert_eq!(calls[9], Call::DepthTest(DepthFunc::Less));

        let draws: Vec<DrawCommand> = calls[10..calls.len() - 1]
            .iter()
            .map(|c| match c {
                Call::Draw(cmd) => *cmd,
                other => panic!("unexpected call between draws: {other:?}"),
            })
            .collect();
        // house 9, two cars 8 each, clouds 3
        assert_eq!(draws.len(), 9 + 8 + 8 + 3);
        assert_eq!(draws, fl.draw_list().into_iter().collect::<Vec<_>>());
        assert_eq!(calls.last(), Some(&Call::Swap));
    }

    #[test]
    fn test_display_zero_height_viewport() {
        let fl = frame_loop();
        let mut backend = Recorder::new(800, 0);
        assert!(fl.display(&mut backend).is_ok());
        let expected = Mat4::perspective_rh(45f32.to_radians(), 1.0, 4.0, 40.0);
        assert_eq!(backend.calls[1], Call::Projection(expected));
    }

    #[test]
    fn test_display_reports_swap_failure() {
        let fl = frame_loop();
        let mut backend = Recorder::new(800, 600);
        backend.fail_swap = true;
        assert_eq!(fl.display(&mut backend), Err("surface lost"));
    }

    #[test]
    fn test_frame_stats_sample_once_per_second() {
        let mut stats = FrameStats::default();
        for _ in 0..59 {
            stats.record(1.0 / 60.0);
        }
        assert_eq!(stats.fps(), 0.0);
        stats.record(1.0 / 60.0 + 0.001);
        assert!((stats.fps() - 60.0).abs() < 0.5);
    }

    #[test]
    fn test_hud_stats_reflect_scene() {
        let mut fl = frame_loop();
        fl.tick();
        let stats = fl.hud_stats();
        assert_eq!(stats.ticks, 1);
        assert!((stats.car_angle - 2.4).abs() < 1e-5);
        assert_eq!(stats.camera_distance, fl.scene.camera.distance());
    }
}
