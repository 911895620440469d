use space_shooter_core::{GameState, ManualClock};
use space_shooter_engine::GameEngine;

/// Simulated frame length; roughly sixty frames per second.
pub(crate) const FRAME_MS: u64 = 16;

/// Advances the engine for up to `frames` frames on a simulated clock.
///
/// Stops early once the session ends and returns the last snapshot.
pub(crate) fn simulate(engine: &mut GameEngine, clock: &ManualClock, frames: u64) -> GameState {
    let mut state = engine.update();
    for frame in 1..frames {
        if state.game_over {
            tracing::info!(frame, "session ended before the frame budget");
            break;
        }
        clock.advance(FRAME_MS);
        state = engine.update();
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use space_shooter_core::{Clock, QualityTier};
    use space_shooter_engine::EngineConfig;
    use space_shooter_system_optimizer::GameOptimizer;

    fn engine(seed: u64, clock: &ManualClock) -> GameEngine {
        GameEngine::new(EngineConfig::default().with_seed(seed), 800.0, 600.0)
            .expect("valid canvas")
            .with_clock(clock.clone())
            .with_optimizer(GameOptimizer::fixed(QualityTier::Medium))
    }

    #[test]
    fn simulation_is_reproducible_for_a_seed() {
        let first_clock = ManualClock::starting_at(0);
        let second_clock = ManualClock::starting_at(0);
        let mut first = engine(12, &first_clock);
        let mut second = engine(12, &second_clock);

        let first_state = simulate(&mut first, &first_clock, 1_200);
        let second_state = simulate(&mut second, &second_clock, 1_200);

        assert_eq!(first_state, second_state);
        assert_eq!(first_clock.now_ms(), second_clock.now_ms());
    }

    #[test]
    fn clock_advances_once_per_additional_frame() {
        let clock = ManualClock::starting_at(0);
        let mut engine = engine(3, &clock);

        let state = simulate(&mut engine, &clock, 10);

        assert!(!state.game_over);
        assert_eq!(clock.now_ms(), 9 * FRAME_MS);
    }
}
