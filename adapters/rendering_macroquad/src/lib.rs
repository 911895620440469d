#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Space Shooter.
//!
//! The engine reports sounds as events rather than playing them, so macroquad
//! is pulled in without its default `audio` feature.
//!
//! Touch input reaches the adapter through macroquad's mouse emulation, so a
//! pressed finger and a held left button both steer the ship.

mod canvas;
mod sprites;

use std::{collections::VecDeque, ops::ControlFlow, path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, mouse_position, KeyCode, MouseButton,
};
use space_shooter_rendering::{Canvas, Color, FrameInput, Presentation, RenderingBackend};

use self::{canvas::MacroquadCanvas, sprites::SpriteAtlas};

const FPS_LABEL_SIZE: f32 = 20.0;
const FPS_LABEL_POSITION: Vec2 = Vec2::new(10.0, 20.0);

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    sprite_manifest: Option<PathBuf>,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            sprite_manifest: None,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Overrides the sprite manifest location; `assets/manifest.toml` is used otherwise.
    #[must_use]
    pub fn with_sprite_manifest(mut self, manifest: Option<PathBuf>) -> Self {
        self.sprite_manifest = manifest;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    fn manifest_path(&self) -> Option<PathBuf> {
        self.load_sprites.then(|| {
            self.sprite_manifest
                .clone()
                .unwrap_or_else(SpriteAtlas::default_manifest_path)
        })
    }
}

fn load_atlas(manifest: Option<PathBuf>) -> Option<SpriteAtlas> {
    let path = manifest?;
    match SpriteAtlas::from_manifest_path(&path) {
        Ok(atlas) => {
            tracing::info!(
                manifest = %path.display(),
                sprites = atlas.len(),
                "sprite atlas loaded"
            );
            Some(atlas)
        }
        Err(error) => {
            tracing::warn!(
                error = %format!("{error:#}"),
                "sprite atlas unavailable; drawing procedurally"
            );
            None
        }
    }
}

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);
const FPS_TRAILING_WINDOW: Duration = Duration::from_secs(10);

/// Frame-rate sampler behind the `--show-fps` overlay.
///
/// Produces one [`FpsReport`] per elapsed second and keeps the label drawn in
/// the corner of the window until the next report replaces it.
#[derive(Debug, Default)]
struct FpsCounter {
    since_report: Duration,
    frames_since_report: u32,
    slowest_since_report: Duration,
    recent: VecDeque<Duration>,
    recent_total: Duration,
    label: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsReport {
    fps: f32,
    trailing_fps: f32,
    slowest_frame: Duration,
}

impl FpsCounter {
    fn record_frame(&mut self, frame: Duration) -> Option<FpsReport> {
        self.since_report += frame;
        self.frames_since_report = self.frames_since_report.saturating_add(1);
        self.slowest_since_report = self.slowest_since_report.max(frame);

        self.recent.push_back(frame);
        self.recent_total += frame;
        while self.recent_total > FPS_TRAILING_WINDOW {
            let Some(oldest) = self.recent.pop_front() else {
                break;
            };
            self.recent_total = self.recent_total.saturating_sub(oldest);
        }

        if self.since_report < FPS_REPORT_INTERVAL {
            return None;
        }

        let fps = self.frames_since_report as f32 / self.since_report.as_secs_f32();
        let recent_seconds = self.recent_total.as_secs_f32();
        let trailing_fps = if recent_seconds <= f32::EPSILON {
            fps
        } else {
            self.recent.len() as f32 / recent_seconds
        };
        let report = FpsReport {
            fps,
            trailing_fps,
            slowest_frame: self.slowest_since_report,
        };

        self.since_report = Duration::ZERO;
        self.frames_since_report = 0;
        self.slowest_since_report = Duration::ZERO;
        self.label = Some(format!("FPS: {fps:.0}"));
        Some(report)
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Snapshot of keyboard state observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    move_left: bool,
    move_right: bool,
    start: bool,
    restart: bool,
    quit: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        Self {
            move_left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            move_right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            start: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::Space),
            restart: is_key_pressed(KeyCode::R),
            quit: is_key_pressed(KeyCode::Escape),
        }
    }
}

fn gather_frame_input(screen: Vec2) -> FrameInput {
    let pointer = is_mouse_button_down(MouseButton::Left).then(|| {
        let (x, y) = mouse_position();
        Vec2::new(x, y)
    });
    frame_input_from_observations(KeyboardState::poll(), pointer, screen)
}

fn frame_input_from_observations(
    keyboard: KeyboardState,
    pointer: Option<Vec2>,
    screen: Vec2,
) -> FrameInput {
    let pointer_x = pointer
        .filter(|_| screen.x > f32::EPSILON)
        .map(|position| (position.x / screen.x).clamp(0.0, 1.0));

    FrameInput {
        move_left: keyboard.move_left,
        move_right: keyboard.move_right,
        pointer_x,
        start: keyboard.start,
        restart: keyboard.restart,
        quit: keyboard.quit,
        canvas_size: screen,
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut frame: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn Canvas) -> ControlFlow<()> + 'static,
    {
        let manifest = self.manifest_path();
        let Self { swap_interval, .. } = self;

        let Presentation {
            window_title,
            canvas_size,
            clear_color,
            show_fps,
        } = presentation;

        if !(canvas_size.x >= 1.0 && canvas_size.y >= 1.0) {
            bail!(
                "window size must be at least one pixel in each dimension, got {}x{}",
                canvas_size.x,
                canvas_size.y
            );
        }

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: canvas_size.x.round() as i32,
            window_height: canvas_size.y.round() as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let sprite_atlas = load_atlas(manifest);
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                macroquad::window::clear_background(background);

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let input = gather_frame_input(screen);

                let mut canvas = MacroquadCanvas::new(sprite_atlas.as_ref());
                let flow = frame(frame_dt, input, &mut canvas);

                if show_fps {
                    if let Some(report) = fps_counter.record_frame(frame_dt) {
                        tracing::info!(
                            fps = report.fps,
                            trailing_fps = report.trailing_fps,
                            slowest_frame_ms = report.slowest_frame.as_secs_f32() * 1_000.0,
                            "frame rate"
                        );
                    }
                    if let Some(label) = fps_counter.label() {
                        canvas.text(label, FPS_LABEL_POSITION, FPS_LABEL_SIZE, Color::WHITE);
                    }
                }

                if flow.is_break() {
                    break;
                }
                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_maps_to_a_clamped_canvas_fraction() {
        let screen = Vec2::new(800.0, 600.0);
        let keyboard = KeyboardState::default();

        let centred = frame_input_from_observations(keyboard, Some(Vec2::new(200.0, 10.0)), screen);
        assert_eq!(centred.pointer_x, Some(0.25));

        let beyond = frame_input_from_observations(keyboard, Some(Vec2::new(900.0, 10.0)), screen);
        assert_eq!(beyond.pointer_x, Some(1.0));

        let released = frame_input_from_observations(keyboard, None, screen);
        assert_eq!(released.pointer_x, None);
    }

    #[test]
    fn zero_width_screen_ignores_the_pointer() {
        let input = frame_input_from_observations(
            KeyboardState::default(),
            Some(Vec2::new(10.0, 10.0)),
            Vec2::new(0.0, 600.0),
        );
        assert_eq!(input.pointer_x, None);
    }

    #[test]
    fn keyboard_state_is_forwarded() {
        let keyboard = KeyboardState {
            move_left: true,
            start: true,
            quit: true,
            ..KeyboardState::default()
        };

        let input = frame_input_from_observations(keyboard, None, Vec2::new(320.0, 240.0));

        assert!(input.move_left);
        assert!(!input.move_right);
        assert!(input.start);
        assert!(!input.restart);
        assert!(input.quit);
        assert_eq!(input.canvas_size, Vec2::new(320.0, 240.0));
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(20);

        for _ in 0..49 {
            assert!(counter.record_frame(frame).is_none());
        }
        assert_eq!(counter.label(), None);
        let report = counter.record_frame(frame).expect("one second elapsed");

        assert!((report.fps - 50.0).abs() < 0.01);
        assert!((report.trailing_fps - 50.0).abs() < 0.01);
        assert_eq!(counter.label(), Some("FPS: 50"));
        assert!(counter.record_frame(frame).is_none());
        assert_eq!(counter.label(), Some("FPS: 50"));
    }

    #[test]
    fn fps_report_flags_the_slowest_frame_of_the_second() {
        let mut counter = FpsCounter::default();
        let _ = counter.record_frame(Duration::from_millis(100));
        let _ = counter.record_frame(Duration::from_millis(400));
        let report = counter
            .record_frame(Duration::from_millis(500))
            .expect("one second elapsed");
        assert_eq!(report.slowest_frame, Duration::from_millis(500));

        for _ in 0..9 {
            let _ = counter.record_frame(Duration::from_millis(100));
        }
        let report = counter
            .record_frame(Duration::from_millis(100))
            .expect("another second elapsed");
        assert_eq!(report.slowest_frame, Duration::from_millis(100));
        assert!((report.fps - 10.0).abs() < 0.01);
    }

    #[test]
    fn sprite_manifest_defaults_and_can_be_disabled() {
        let backend = MacroquadBackend::new();
        assert_eq!(
            backend.manifest_path(),
            Some(PathBuf::from("assets/manifest.toml"))
        );

        let custom = MacroquadBackend::new().with_sprite_manifest(Some(PathBuf::from("x.toml")));
        assert_eq!(custom.manifest_path(), Some(PathBuf::from("x.toml")));

        let disabled = MacroquadBackend::new().with_sprite_loading(false);
        assert_eq!(disabled.manifest_path(), None);
    }

    #[test]
    fn vsync_selects_the_swap_interval() {
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }

    #[test]
    fn undersized_windows_are_rejected_before_opening() {
        let presentation = Presentation::new("test", Vec2::new(0.0, 600.0), Color::BLACK);
        let result = MacroquadBackend::new().run(presentation, |_, _, _| ControlFlow::Break(()));
        assert!(result.is_err());
    }
}
