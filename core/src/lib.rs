#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Space Shooter engine.
//!
//! This crate defines the vocabulary that connects the entity primitives, the
//! pure systems, the engine orchestrator, and the adapters. The engine owns all
//! mutable simulation state and communicates outward exclusively through two
//! channels: the [`GameState`] snapshot returned from every update and the
//! [`Event`] values it broadcasts through an [`EventDispatcher`]. Wall-clock
//! time reaches the simulation only through the [`Clock`] trait so timed
//! effects can be driven deterministically in tests.

use std::{cell::Cell, fmt, rc::Rc, time::Instant};

use serde::{Deserialize, Serialize};

/// Title used by windows presenting the game.
pub const WINDOW_TITLE: &str = "Space Shooter Game";

/// Number of enemy kills required per level before the next level unlocks.
pub const ENEMIES_PER_LEVEL: u32 = 10;

/// Axis-aligned bounding box expressed by its centre point and extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Horizontal centre in canvas pixels.
    pub x: f32,
    /// Vertical centre in canvas pixels.
    pub y: f32,
    /// Full width of the box.
    pub width: f32,
    /// Full height of the box.
    pub height: f32,
}

impl Aabb {
    /// Creates a new box centred on the provided point.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge of the box.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    /// Right edge of the box.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Top edge of the box.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    /// Bottom edge of the box.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Anything that occupies a rectangular region of the play field.
pub trait Bounded {
    /// Returns the centred bounding box of the entity.
    fn bounds(&self) -> Aabb;
}

impl Bounded for Aabb {
    fn bounds(&self) -> Aabb {
        *self
    }
}

/// Opaque RGB colour carried by simulation entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new colour from byte channels.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a colour from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_hex(packed: u32) -> Self {
        Self {
            red: ((packed >> 16) & 0xff) as u8,
            green: ((packed >> 8) & 0xff) as u8,
            blue: (packed & 0xff) as u8,
        }
    }

    /// Red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Unique identifier assigned to an enemy for the lifetime of an engine session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy variants spawned during regular waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnemyKind {
    /// Slow drifting fighter available from the first level.
    Basic,
    /// Small fast craft that periodically dashes.
    Scout,
    /// Armoured craft with a shield absorbed before health.
    Heavy,
    /// Craft that drops spreads of bombs instead of firing.
    Bomber,
    /// Craft that charges the player's horizontal position.
    Kamikaze,
}

impl EnemyKind {
    /// All variants in canonical order.
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Basic,
        EnemyKind::Scout,
        EnemyKind::Heavy,
        EnemyKind::Bomber,
        EnemyKind::Kamikaze,
    ];

    /// Multiplier applied to the level kill reward when this variant is destroyed.
    #[must_use]
    pub const fn score_multiplier(self) -> f32 {
        match self {
            EnemyKind::Heavy => 3.0,
            EnemyKind::Bomber | EnemyKind::Kamikaze => 2.0,
            EnemyKind::Scout => 1.5,
            EnemyKind::Basic => 1.0,
        }
    }

    /// Returns whether the variant fires the standard aimed-down enemy shot.
    #[must_use]
    pub const fn fires_standard_shots(self) -> bool {
        !matches!(self, EnemyKind::Bomber | EnemyKind::Kamikaze)
    }

    /// Stable lowercase name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Scout => "scout",
            EnemyKind::Heavy => "heavy",
            EnemyKind::Bomber => "bomber",
            EnemyKind::Kamikaze => "kamikaze",
        }
    }
}

/// Boss encounters that gate every fifth level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BossKind {
    /// Sweeping gunship that fires single shots in bursts.
    Destroyer,
    /// Carrier that fires three-way fans.
    Mothership,
    /// Battleship alternating spreads and columns.
    Dreadnought,
}

impl BossKind {
    /// Selects the boss encountered on the provided level.
    #[must_use]
    pub const fn for_level(level: u32) -> Self {
        match (level / 5) % 3 {
            0 => BossKind::Destroyer,
            1 => BossKind::Mothership,
            _ => BossKind::Dreadnought,
        }
    }

    /// Stable lowercase name of the boss.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BossKind::Destroyer => "destroyer",
            BossKind::Mothership => "mothership",
            BossKind::Dreadnought => "dreadnought",
        }
    }
}

/// Collectable power-up categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerUpKind {
    /// Absorbs enemy bullets while active.
    Shield,
    /// Slows enemy spawning and the starfield.
    SlowMotion,
    /// Shortens the player's fire delay.
    RapidFire,
    /// Switches the player's weapon to the spread pattern.
    MultiShot,
    /// Grants an additional life immediately.
    ExtraLife,
}

impl PowerUpKind {
    /// All power-up kinds in canonical order.
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Shield,
        PowerUpKind::SlowMotion,
        PowerUpKind::RapidFire,
        PowerUpKind::MultiShot,
        PowerUpKind::ExtraLife,
    ];

    /// Wall-clock duration of the effect, or `None` for instant power-ups.
    #[must_use]
    pub const fn duration_ms(self) -> Option<u64> {
        match self {
            PowerUpKind::Shield => Some(8_000),
            PowerUpKind::SlowMotion => Some(10_000),
            PowerUpKind::RapidFire => Some(12_000),
            PowerUpKind::MultiShot => Some(15_000),
            PowerUpKind::ExtraLife => None,
        }
    }

    /// Stable kebab-case name of the power-up.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::SlowMotion => "slow-motion",
            PowerUpKind::RapidFire => "rapid-fire",
            PowerUpKind::MultiShot => "multi-shot",
            PowerUpKind::ExtraLife => "extra-life",
        }
    }

    /// Human readable explanation of the effect.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "Protects from enemy bullets",
            PowerUpKind::SlowMotion => "Slows down enemies",
            PowerUpKind::RapidFire => "Increases fire rate",
            PowerUpKind::MultiShot => "Fires multiple bullets",
            PowerUpKind::ExtraLife => "Gain an extra life",
        }
    }
}

/// Rendering and simulation fidelity level chosen by the optimizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Reduced particles, sparse starfield, batched particle drawing.
    Low,
    /// Intermediate fidelity.
    Medium,
    /// Full fidelity.
    High,
}

impl QualityTier {
    /// Returns the tier one step below this one, saturating at [`QualityTier::Low`].
    #[must_use]
    pub const fn demoted(self) -> Self {
        match self {
            QualityTier::High => QualityTier::Medium,
            QualityTier::Medium | QualityTier::Low => QualityTier::Low,
        }
    }

    /// Stable lowercase name of the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

/// Notifications broadcast by the engine to audio, haptics, and UI collaborators.
///
/// Each variant serialises under the exact camelCase name that collaborators
/// subscribe to, with any payload carried in `detail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum Event {
    /// A projectile was launched by the player or an enemy.
    PlayShootSound,
    /// Something took damage.
    PlayHitSound,
    /// A positive milestone such as a pickup or level up.
    PlaySuccessSound,
    /// An enemy was destroyed by the player.
    EnemyKilled,
    /// An enemy was destroyed by the player; mirrors [`Event::EnemyKilled`] for legacy listeners.
    EnemyDestroyed,
    /// The player collected a power-up.
    PowerUpCollected,
    /// The player fired a volley.
    BulletFired,
    /// A player bullet struck an enemy.
    BulletHit,
    /// The player lost a life.
    PlayerHit,
    /// The level counter advanced.
    LevelUp {
        /// Level that became active.
        level: u32,
        /// Score at the time of the level up.
        score: u32,
    },
    /// A boss entered the play field.
    BossSpawn {
        /// Boss that spawned.
        #[serde(rename = "type")]
        kind: BossKind,
        /// Level hosting the encounter.
        level: u32,
    },
    /// The active boss was destroyed.
    BossDefeated {
        /// Level unlocked by the defeat.
        level: u32,
        /// Score after the defeat reward.
        score: u32,
    },
}

impl Event {
    /// Name under which collaborators subscribe to the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Event::PlayShootSound => "playShootSound",
            Event::PlayHitSound => "playHitSound",
            Event::PlaySuccessSound => "playSuccessSound",
            Event::EnemyKilled => "enemyKilled",
            Event::EnemyDestroyed => "enemyDestroyed",
            Event::PowerUpCollected => "powerUpCollected",
            Event::BulletFired => "bulletFired",
            Event::BulletHit => "bulletHit",
            Event::PlayerHit => "playerHit",
            Event::LevelUp { .. } => "levelUp",
            Event::BossSpawn { .. } => "bossSpawn",
            Event::BossDefeated { .. } => "bossDefeated",
        }
    }
}

/// Handle returned when registering an event listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

type Listener = Box<dyn FnMut(&Event)>;

/// Explicit observer registry that fans events out to subscribed listeners.
#[derive(Default)]
pub struct EventDispatcher {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventDispatcher {
    /// Creates a dispatcher without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener invoked for every dispatched event.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a previously registered listener, returning whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    /// Delivers the event to every listener in registration order.
    pub fn dispatch(&mut self, event: Event) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Snapshot produced by every engine update for consumption by the UI layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Accumulated score.
    pub score: u32,
    /// Remaining lives; never below zero.
    pub lives: u32,
    /// Current level, starting at one.
    pub level: u32,
    /// Total enemies destroyed this session.
    pub enemies_killed: u32,
    /// Fraction of progress toward the next level in the range `0.0..1.0`.
    pub level_progress: f32,
    /// Whether the session has ended.
    pub game_over: bool,
    /// Timed power-ups currently affecting the player.
    pub active_power_ups: Vec<PowerUpKind>,
    /// Whether a boss is on the field.
    pub boss_active: bool,
    /// Remaining boss health when a boss is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_health: Option<u32>,
    /// Starting boss health when a boss is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_max_health: Option<u32>,
    /// Active boss kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_type: Option<BossKind>,
}

/// Source of monotonic wall-clock time in milliseconds.
pub trait Clock: fmt::Debug {
    /// Milliseconds elapsed since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Clock backed by [`Instant`], measuring from its construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Manually advanced clock; clones share the same timeline.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Creates a clock starting at the provided timestamp.
    #[must_use]
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    /// Moves the shared timeline forward.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    /// Sets the shared timeline to an absolute timestamp.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{BossKind, Clock, Event, EventDispatcher, GameState, ManualClock, PowerUpKind, Rgb};
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn boss_kind_cycles_every_five_levels() {
        assert_eq!(BossKind::for_level(5), BossKind::Mothership);
        assert_eq!(BossKind::for_level(10), BossKind::Dreadnought);
        assert_eq!(BossKind::for_level(15), BossKind::Destroyer);
        assert_eq!(BossKind::for_level(20), BossKind::Mothership);
    }

    #[test]
    fn hex_colors_unpack_channels() {
        let color = Rgb::from_hex(0xff_aa_00);
        assert_eq!(color, Rgb::from_rgb(0xff, 0xaa, 0x00));
    }

    #[test]
    fn event_names_match_serialized_tags() {
        let events = [
            Event::PlayShootSound,
            Event::PlayHitSound,
            Event::PlaySuccessSound,
            Event::EnemyKilled,
            Event::EnemyDestroyed,
            Event::PowerUpCollected,
            Event::BulletFired,
            Event::BulletHit,
            Event::PlayerHit,
            Event::LevelUp { level: 2, score: 30 },
            Event::BossSpawn {
                kind: BossKind::Destroyer,
                level: 5,
            },
            Event::BossDefeated {
                level: 5,
                score: 200,
            },
        ];

        for event in events {
            let json = serde_json::to_value(event).expect("serialize event");
            assert_eq!(json["type"], event.name());
        }
    }

    #[test]
    fn boss_spawn_detail_uses_type_key() {
        let json = serde_json::to_value(Event::BossSpawn {
            kind: BossKind::Dreadnought,
            level: 10,
        })
        .expect("serialize event");
        assert_eq!(json["detail"]["type"], "dreadnought");
        assert_eq!(json["detail"]["level"], 10);
    }

    #[test]
    fn dispatcher_delivers_in_order_and_unsubscribes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let first = Rc::clone(&seen);
        let first_id = dispatcher.subscribe(move |event| first.borrow_mut().push((1, *event)));
        let second = Rc::clone(&seen);
        let _ = dispatcher.subscribe(move |event| second.borrow_mut().push((2, *event)));

        dispatcher.dispatch(Event::PlayerHit);
        assert!(dispatcher.unsubscribe(first_id));
        assert!(!dispatcher.unsubscribe(first_id));
        dispatcher.dispatch(Event::BulletHit);

        assert_eq!(
            seen.borrow().as_slice(),
            &[
                (1, Event::PlayerHit),
                (2, Event::PlayerHit),
                (2, Event::BulletHit)
            ]
        );
        assert_eq!(dispatcher.listener_count(), 1);
    }

    #[test]
    fn manual_clock_clones_share_timeline() {
        let clock = ManualClock::starting_at(100);
        let shared = clock.clone();
        shared.advance(250);
        assert_eq!(clock.now_ms(), 350);
    }

    #[test]
    fn game_state_serializes_with_camel_case_fields() {
        let state = GameState {
            score: 120,
            lives: 2,
            level: 5,
            enemies_killed: 43,
            level_progress: 0.3,
            game_over: false,
            active_power_ups: vec![PowerUpKind::Shield, PowerUpKind::MultiShot],
            boss_active: true,
            boss_health: Some(30),
            boss_max_health: Some(40),
            boss_type: Some(BossKind::Destroyer),
        };
        let json = serde_json::to_value(&state).expect("serialize");
        assert_eq!(json["enemiesKilled"], 43);
        assert_eq!(json["bossMaxHealth"], 40);
        assert_eq!(json["activePowerUps"][1], "multi-shot");

        let restored: GameState = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, state);
    }
}
