use std::{cell::RefCell, ops::ControlFlow, rc::Rc};

use glam::Vec2;
use space_shooter_core::{Event, GameState};
use space_shooter_engine::GameEngine;
use space_shooter_rendering::{Canvas, Color, FrameInput, Rect};

const HUD_TEXT_SIZE: f32 = 20.0;
const HUD_MARGIN: f32 = 10.0;
const TITLE_SIZE: f32 = 48.0;
const PROMPT_SIZE: f32 = 22.0;
const BANNER_FRAMES: u32 = 120;
const PROGRESS_BAR_WIDTH: f32 = 120.0;
const PROGRESS_BAR_HEIGHT: f32 = 6.0;

const HUD_COLOR: Color = Color::WHITE;
const ACCENT_COLOR: Color = Color::from_hex(0x00ffff);
const WARNING_COLOR: Color = Color::from_hex(0xff4444);
const SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.6);

/// Lifecycle of an interactive session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Ready,
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
struct Banner {
    text: String,
    frames_left: u32,
}

/// Drives a [`GameEngine`] from window input and paints the HUD over its frames.
#[derive(Debug)]
pub(crate) struct Session {
    engine: GameEngine,
    phase: Phase,
    state: Option<GameState>,
    canvas_size: Vec2,
    banner: Rc<RefCell<Option<Banner>>>,
}

impl Session {
    pub(crate) fn new(mut engine: GameEngine, canvas_size: Vec2) -> Self {
        let banner = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&banner);
        let _ = engine.subscribe(move |event| {
            tracing::trace!(event = event.name(), "engine event");
            if let Some(text) = banner_text(event) {
                *sink.borrow_mut() = Some(Banner {
                    text,
                    frames_left: BANNER_FRAMES,
                });
            }
        });

        Self {
            engine,
            phase: Phase::Ready,
            state: None,
            canvas_size,
            banner,
        }
    }

    /// Applies one frame of input, advancing the engine while playing.
    pub(crate) fn step(&mut self, input: &FrameInput) -> ControlFlow<()> {
        if input.quit {
            tracing::info!("quit requested");
            return ControlFlow::Break(());
        }
        self.sync_canvas(input.canvas_size);

        match self.phase {
            Phase::Ready => {
                if input.start {
                    tracing::info!("session started");
                    self.phase = Phase::Playing;
                }
            }
            Phase::Playing => {
                self.engine.player.move_left = input.move_left;
                self.engine.player.move_right = input.move_right;
                if let Some(position) = input.pointer_x {
                    self.engine.handle_player_move(position);
                }

                let state = self.engine.update();
                if state.game_over {
                    self.phase = Phase::GameOver;
                }
                self.state = Some(state);
            }
            Phase::GameOver => {
                if input.restart {
                    tracing::info!("session restarted");
                    self.engine.reset();
                    *self.banner.borrow_mut() = None;
                    self.state = Some(self.engine.update());
                    self.phase = Phase::Playing;
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Paints the engine frame followed by the HUD and any phase overlay.
    pub(crate) fn render(&mut self, canvas: &mut dyn Canvas) {
        self.engine.render(canvas);

        if let Some(state) = &self.state {
            draw_hud(canvas, state, self.canvas_size);
        }
        self.draw_banner(canvas);

        match self.phase {
            Phase::Ready => draw_overlay(
                canvas,
                self.canvas_size,
                "SPACE SHOOTER",
                ACCENT_COLOR,
                &["Press Enter or Space to start", "Arrows or A/D to move"],
            ),
            Phase::Playing => {}
            Phase::GameOver => {
                let score = self.state.as_ref().map_or(0, |state| state.score);
                let summary = format!("Final score: {score}");
                draw_overlay(
                    canvas,
                    self.canvas_size,
                    "GAME OVER",
                    WARNING_COLOR,
                    &[summary.as_str(), "Press R to restart"],
                );
            }
        }
    }

    fn sync_canvas(&mut self, size: Vec2) {
        if size == self.canvas_size || size.x < 1.0 || size.y < 1.0 {
            return;
        }
        match self.engine.update_canvas_size(size.x, size.y) {
            Ok(()) => self.canvas_size = size,
            Err(error) => tracing::warn!(%error, "ignoring canvas resize"),
        }
    }

    fn draw_banner(&mut self, canvas: &mut dyn Canvas) {
        let mut banner = self.banner.borrow_mut();
        let Some(active) = banner.as_mut() else {
            return;
        };

        let alpha = (active.frames_left as f32 / BANNER_FRAMES as f32).min(1.0);
        let position = Vec2::new(
            centred_x(&active.text, self.canvas_size.x, PROMPT_SIZE),
            self.canvas_size.y * 0.3,
        );
        canvas.text(
            &active.text,
            position,
            PROMPT_SIZE,
            ACCENT_COLOR.with_alpha(alpha),
        );

        active.frames_left = active.frames_left.saturating_sub(1);
        if active.frames_left == 0 {
            *banner = None;
        }
    }
}

fn banner_text(event: &Event) -> Option<String> {
    match event {
        Event::LevelUp { level, .. } => Some(format!("LEVEL {level}")),
        Event::BossSpawn { kind, .. } => Some(format!(
            "WARNING: {} APPROACHING",
            kind.as_str().to_uppercase()
        )),
        Event::BossDefeated { .. } => Some("BOSS DEFEATED".to_owned()),
        _ => None,
    }
}

fn draw_hud(canvas: &mut dyn Canvas, state: &GameState, canvas_size: Vec2) {
    let line = HUD_TEXT_SIZE + 4.0;
    let mut y = HUD_MARGIN + HUD_TEXT_SIZE;
    for text in [
        format!("Score: {}", state.score),
        format!("Lives: {}", state.lives),
        format!("Level: {}", state.level),
    ] {
        canvas.text(&text, Vec2::new(HUD_MARGIN, y), HUD_TEXT_SIZE, HUD_COLOR);
        y += line;
    }

    let bar = Rect::new(
        HUD_MARGIN,
        y - HUD_TEXT_SIZE / 2.0,
        PROGRESS_BAR_WIDTH,
        PROGRESS_BAR_HEIGHT,
    );
    canvas.stroke_rect(bar, 1.0, HUD_COLOR);
    canvas.fill_rect(
        Rect::new(
            bar.x,
            bar.y,
            bar.width * state.level_progress.clamp(0.0, 1.0),
            bar.height,
        ),
        ACCENT_COLOR,
    );

    let mut y = HUD_MARGIN + HUD_TEXT_SIZE;
    for power_up in &state.active_power_ups {
        let text = power_up.as_str();
        let x = canvas_size.x - HUD_MARGIN - approximate_width(text, HUD_TEXT_SIZE);
        canvas.text(text, Vec2::new(x, y), HUD_TEXT_SIZE, ACCENT_COLOR);
        y += line;
    }
}

fn draw_overlay(
    canvas: &mut dyn Canvas,
    canvas_size: Vec2,
    title: &str,
    title_color: Color,
    prompts: &[&str],
) {
    canvas.fill_rect(Rect::new(0.0, 0.0, canvas_size.x, canvas_size.y), SHADE);

    let mut y = canvas_size.y * 0.4;
    canvas.text(
        title,
        Vec2::new(centred_x(title, canvas_size.x, TITLE_SIZE), y),
        TITLE_SIZE,
        title_color,
    );
    for prompt in prompts {
        y += PROMPT_SIZE * 1.6;
        canvas.text(
            prompt,
            Vec2::new(centred_x(prompt, canvas_size.x, PROMPT_SIZE), y),
            PROMPT_SIZE,
            HUD_COLOR,
        );
    }
}

/// Rough glyph-advance estimate; the canvas contract has no text metrics.
fn approximate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn centred_x(text: &str, width: f32, size: f32) -> f32 {
    ((width - approximate_width(text, size)) / 2.0).max(0.0)
}
