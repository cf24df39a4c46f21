//! Gameplay tuning constants and the per-session configuration.

use std::time::Duration;

// ── Timing ───────────────────────────────────────────────────────────────────

/// Fixed simulation step.
pub const TICK: Duration = Duration::from_millis(100);

/// Ticks the launcher must wait between shots.
pub const FIRE_COOLDOWN: u32 = 4;

/// Ticks a fired shot stays on screen.
pub const SHOT_LIFE: u32 = 3;

/// Ticks a burst stays on screen.
pub const BURST_LIFE: u32 = 3;

/// Extra ticks a spawner rests after emitting, on top of the text length.
pub const SPAWN_COOLOFF: usize = 3;

// ── Playfield ────────────────────────────────────────────────────────────────

/// Cells an issue may travel past the far edge before it is removed.
pub const OFFSCREEN_MARGIN: i32 = 5;

/// Horizontal offset of the barrel within the launcher sprite.
pub const BARREL_OFFSET: i32 = 3;

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Number of messages the score log keeps.
pub const SCORE_LOG_LEN: usize = 5;

/// A shot destroying exactly this many letters doubles its multiplier.
pub const PERFECT_ROUND: u32 = 10;

/// Per-session settings, mostly driven by command-line flags.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub tick: Duration,
    /// Number of issue lanes (one spawner per lane).
    pub lanes: usize,
    /// Probability that a spawner is asked to emit on a given tick.
    pub spawn_chance: f64,
    /// Seed for the issue shuffle and spawn scheduling.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick: TICK,
            lanes: 6,
            spawn_chance: 0.5,
            seed: None,
        }
    }
}
