use std::collections::BTreeMap;

use space_shooter_core::{Aabb, Bounded, PowerUpKind};

/// Width of the player's ship.
pub const PLAYER_WIDTH: f32 = 60.0;
/// Height of the player's ship.
pub const PLAYER_HEIGHT: f32 = 40.0;
/// Distance between the ship's centre and the bottom of the canvas.
pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;

const KEYBOARD_SPEED: f32 = 5.0;
const TARGET_LERP: f32 = 0.3;
const TARGET_DEADZONE: f32 = 1.0;

/// Timed buff currently affecting the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePowerUp {
    /// Kind of buff.
    pub kind: PowerUpKind,
    /// Total duration of the buff in milliseconds.
    pub duration_ms: u64,
    /// Wall-clock timestamp at which the buff was applied.
    pub started_at_ms: u64,
}

impl ActivePowerUp {
    /// Milliseconds left before the buff expires at the provided time.
    #[must_use]
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        self.duration_ms.saturating_sub(elapsed)
    }

    fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_at_ms) >= self.duration_ms
    }
}

/// Ship controlled through keyboard flags or a touch target.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Horizontal centre in canvas pixels.
    pub x: f32,
    /// Vertical centre in canvas pixels.
    pub y: f32,
    /// Full width of the ship.
    pub width: f32,
    /// Full height of the ship.
    pub height: f32,
    /// Held while the left movement key is pressed.
    pub move_left: bool,
    /// Held while the right movement key is pressed.
    pub move_right: bool,
    target_x: Option<f32>,
    speed: f32,
    power_ups: BTreeMap<PowerUpKind, ActivePowerUp>,
    shielded: bool,
}

impl Player {
    /// Creates a ship at its starting position for the given canvas.
    #[must_use]
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            x: canvas_width / 2.0,
            y: canvas_height - PLAYER_BOTTOM_OFFSET,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            move_left: false,
            move_right: false,
            target_x: None,
            speed: KEYBOARD_SPEED,
            power_ups: BTreeMap::new(),
            shielded: false,
        }
    }

    /// Moves the ship back to its starting position and drops all input and buffs.
    pub fn reset(&mut self, canvas_width: f32, canvas_height: f32) {
        self.x = canvas_width / 2.0;
        self.y = canvas_height - PLAYER_BOTTOM_OFFSET;
        self.move_left = false;
        self.move_right = false;
        self.target_x = None;
        self.power_ups.clear();
        self.shielded = false;
    }

    /// Keeps the ship anchored to the bottom of a resized canvas.
    pub fn fit_canvas(&mut self, canvas_width: f32, canvas_height: f32) {
        self.y = canvas_height - PLAYER_BOTTOM_OFFSET;
        self.x = self.x.clamp(0.0, canvas_width.max(0.0));
    }

    /// Sets the canvas-space x the ship glides towards.
    pub fn set_target_position(&mut self, x: f32) {
        self.target_x = Some(x);
    }

    /// Current touch target, if any.
    #[must_use]
    pub const fn target_x(&self) -> Option<f32> {
        self.target_x
    }

    /// Advances movement and expires timed buffs.
    ///
    /// Keyboard movement takes precedence over a pending touch target: pressing
    /// a movement key releases the target so the two inputs never fight.
    pub fn update(&mut self, canvas_width: f32, now_ms: u64) {
        self.expire_power_ups(now_ms);

        if self.move_left || self.move_right {
            self.target_x = None;
        }
        if self.move_left {
            self.x -= self.speed;
        }
        if self.move_right {
            self.x += self.speed;
        }

        if let Some(target) = self.target_x {
            let diff = target - self.x;
            if diff.abs() > TARGET_DEADZONE {
                self.x += diff * TARGET_LERP;
            }
        }

        self.x = self.x.clamp(0.0, canvas_width.max(0.0));
    }

    /// Starts the timed effect for the provided buff, refreshing it when already active.
    ///
    /// Instant buffs such as [`PowerUpKind::ExtraLife`] carry no timed state and are ignored.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now_ms: u64) {
        let Some(duration_ms) = kind.duration_ms() else {
            return;
        };

        if kind == PowerUpKind::Shield {
            self.shielded = true;
        }

        let _ = self.power_ups.insert(
            kind,
            ActivePowerUp {
                kind,
                duration_ms,
                started_at_ms: now_ms,
            },
        );
    }

    /// Returns whether the provided buff is active.
    #[must_use]
    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_ups.contains_key(&kind)
    }

    /// Returns the state of an active buff.
    #[must_use]
    pub fn power_up(&self, kind: PowerUpKind) -> Option<&ActivePowerUp> {
        self.power_ups.get(&kind)
    }

    /// Kinds of all active buffs in canonical order.
    #[must_use]
    pub fn active_power_ups(&self) -> Vec<PowerUpKind> {
        self.power_ups.keys().copied().collect()
    }

    /// Returns whether enemy bullets are currently absorbed.
    #[must_use]
    pub const fn is_shielded(&self) -> bool {
        self.shielded
    }

    fn expire_power_ups(&mut self, now_ms: u64) {
        let mut shield_expired = false;
        self.power_ups.retain(|kind, effect| {
            let expired = effect.is_expired(now_ms);
            if expired && *kind == PowerUpKind::Shield {
                shield_expired = true;
            }
            !expired
        });
        if shield_expired {
            self.shielded = false;
        }
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_near_bottom_centre() {
        let player = Player::new(800.0, 600.0);
        assert_eq!(player.x, 400.0);
        assert_eq!(player.y, 520.0);
        assert_eq!(player.bounds(), Aabb::new(400.0, 520.0, 60.0, 40.0));
    }

    #[test]
    fn keyboard_movement_is_clamped_to_canvas() {
        let mut player = Player::new(20.0, 600.0);
        player.move_right = true;
        for _ in 0..10 {
            player.update(20.0, 0);
        }
        assert_eq!(player.x, 20.0);

        player.move_right = false;
        player.move_left = true;
        for _ in 0..10 {
            player.update(20.0, 0);
        }
        assert_eq!(player.x, 0.0);
    }

    #[test]
    fn touch_target_is_approached_by_interpolation() {
        let mut player = Player::new(800.0, 600.0);
        player.set_target_position(500.0);
        player.update(800.0, 0);
        assert!((player.x - 430.0).abs() < 1e-4);

        for _ in 0..40 {
            player.update(800.0, 0);
        }
        assert!((player.x - 500.0).abs() <= 1.0);
    }

    #[test]
    fn keyboard_input_releases_touch_target() {
        let mut player = Player::new(800.0, 600.0);
        player.set_target_position(100.0);
        player.move_right = true;
        player.update(800.0, 0);
        assert_eq!(player.target_x(), None);
        assert_eq!(player.x, 405.0);
    }

    #[test]
    fn shield_expires_after_its_duration() {
        let mut player = Player::new(800.0, 600.0);
        player.apply_power_up(PowerUpKind::Shield, 1_000);
        assert!(player.is_shielded());

        player.update(800.0, 8_999);
        assert!(player.has_power_up(PowerUpKind::Shield));

        player.update(800.0, 9_000);
        assert!(!player.has_power_up(PowerUpKind::Shield));
        assert!(!player.is_shielded());
    }

    #[test]
    fn extra_life_leaves_no_timed_state() {
        let mut player = Player::new(800.0, 600.0);
        player.apply_power_up(PowerUpKind::ExtraLife, 0);
        assert!(player.active_power_ups().is_empty());
    }

    #[test]
    fn active_power_ups_are_listed_in_canonical_order() {
        let mut player = Player::new(800.0, 600.0);
        player.apply_power_up(PowerUpKind::MultiShot, 0);
        player.apply_power_up(PowerUpKind::Shield, 0);
        player.apply_power_up(PowerUpKind::RapidFire, 0);

        assert_eq!(
            player.active_power_ups(),
            vec![
                PowerUpKind::Shield,
                PowerUpKind::RapidFire,
                PowerUpKind::MultiShot
            ]
        );
        let multi_shot = player
            .power_up(PowerUpKind::MultiShot)
            .expect("multi-shot active");
        assert_eq!(multi_shot.remaining_ms(5_000), 10_000);
    }
}
