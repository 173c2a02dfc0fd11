//! Game state snapshot: the single owned, serializable state the engine
//! mutates every tick and exposes to callers via `getGameState`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::blitz::PressureState;
use crate::catalog::CoverageType;
use crate::drive::Drive;
use crate::geometry::Vector2D;
use crate::outcome::Outcome;
use crate::player::Player;
use crate::qb::{QbMovementKind, QbMovementState};
use crate::timing::TimingSystem;

/// Which ruleset the session is running under: `free-play` has no sack
/// budget pressure beyond the user's own setting, `challenge` defaults to
/// a tighter sack budget.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    FreePlay,
    Challenge,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::FreePlay
    }
}

/// # `Phase` enum
///
/// The play's lifecycle phase, per spec.md §3: `pre-snap` while the
/// offense/defense can still be adjusted, `post-snap` once the ball has
/// been snapped but before a throw, `ball-thrown` while the ball is in
/// flight, and `play-over` once an outcome has been resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    PreSnap,
    PostSnap,
    BallThrown,
    PlayOver,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::PreSnap
    }
}

/// # `GameState` struct
///
/// A `GameState` is the complete, serializable snapshot of one play in
/// progress: every player on the field, the ball, the current coverage
/// and concept, the drive's down/distance bookkeeping, the defensive
/// timing system, and a running diagnostics log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub players: Vec<Player>,
    pub ball: Ball,

    pub concept_key: Option<String>,
    pub coverage_type: Option<CoverageType>,
    pub formation_key: Option<String>,

    pub drive: Drive,
    pub timing: TimingSystem,
    pub pressure: PressureState,
    /// The drop/rollout scheme chosen pre-snap (defaults to `FiveStep` at
    /// the snap if never set), distinct from `qb_movement`, which only
    /// exists once that scheme has actually started running.
    pub qb_movement_kind: Option<QbMovementKind>,
    pub qb_movement: Option<QbMovementState>,

    pub outcome: Option<Outcome>,
    pub is_showing_defense: bool,
    pub is_showing_routes: bool,
    pub audibles_used: u8,
    pub max_audibles: u8,
    pub game_mode: GameMode,
    pub personnel_package: Option<String>,
    /// Set when the most recent alignment rebuild had to adapt the chosen
    /// coverage to a personnel package it isn't built for, per spec.md
    /// §4.5's `compatibilityWarning`.
    pub compatibility_warning: Option<String>,

    /// Seconds elapsed since the play began (snap or pre-snap motion
    /// start), advanced once per `tick`.
    pub elapsed: f64,
    /// Monotonically increasing counter bumped on every successful tick or
    /// command, used by callers to detect a stale snapshot.
    pub last_update: u64,
    /// The seed the engine's RNG was constructed with, exposed for
    /// reproducing a play.
    pub rng_seed: u64,

    /// A running log of recoverable problems (missing catalog keys,
    /// invariant violations corrected by falling back to canonical
    /// alignment, rejected illegal commands), newest last.
    pub diagnostics: Vec<String>,
}

impl GameState {
    pub fn new(rng_seed: u64) -> GameState {
        GameState {
            phase: Phase::PreSnap,
            players: Vec::new(),
            ball: Ball::default(),
            concept_key: None,
            coverage_type: None,
            formation_key: None,
            drive: Drive::new(),
            timing: TimingSystem::new(),
            pressure: PressureState::default(),
            qb_movement_kind: None,
            qb_movement: None,
            outcome: None,
            is_showing_defense: true,
            is_showing_routes: true,
            audibles_used: 0,
            max_audibles: 2,
            game_mode: GameMode::FreePlay,
            personnel_package: None,
            compatibility_warning: None,
            elapsed: 0.0,
            last_update: 0,
            rng_seed,
            diagnostics: Vec::new(),
        }
    }

    /// Construct a state for `challenge` mode: tighter sack budget,
    /// otherwise identical to [`GameState::new`].
    pub fn new_challenge(rng_seed: u64) -> GameState {
        let mut state = GameState::new(rng_seed);
        state.game_mode = GameMode::Challenge;
        state.pressure = PressureState::new(crate::blitz::CHALLENGE_SACK_BUDGET);
        state
    }

    /// Push a diagnostic message and bump `last_update`.
    pub fn log(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
        self.touch();
    }

    /// Bump `last_update` without logging, called after any successful
    /// state-mutating command or tick.
    pub fn touch(&mut self) {
        self.last_update = self.last_update.wrapping_add(1);
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn offense(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.team == crate::player::Team::Offense)
    }

    pub fn defense(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.team == crate::player::Team::Defense)
    }

    /// A map of player id -> current position, handed to systems (like
    /// `TimingSystem::advance`) that need positions without borrowing
    /// `players` mutably.
    pub fn position_snapshot(&self) -> HashMap<String, Vector2D> {
        self.players.iter().map(|p| (p.id.clone(), p.position)).collect()
    }

    pub fn quarterback(&self) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.team == crate::player::Team::Offense && p.player_type == crate::player::PlayerType::QB)
    }

    /// Reset play-scoped state (phase, ball, timing, elapsed clock) ahead
    /// of a new snap, while keeping player roster/catalog selections
    /// intact. Used by `resetPlay`.
    pub fn reset_play(&mut self) {
        self.phase = Phase::PreSnap;
        self.ball = Ball::default();
        self.timing.cancel_all();
        self.qb_movement = None;
        self.outcome = None;
        self.audibles_used = 0;
        for player in self.players.iter_mut() {
            player.has_motion = false;
            player.motion = None;
            player.has_motion_boost = false;
            player.motion_boost_remaining = 0.0;
            player.speed_multiplier = 1.0;
        }
        self.elapsed = 0.0;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_state_starts_pre_snap() {
        let state = GameState::new(42);
        assert_eq!(state.phase, Phase::PreSnap);
        assert_eq!(state.rng_seed, 42);
        assert!(state.diagnostics.is_empty());
    }

    #[test]
    fn test_log_bumps_last_update() {
        let mut state = GameState::new(1);
        let before = state.last_update;
        state.log("missing catalog key 'bogus'");
        assert_eq!(state.last_update, before + 1);
        assert_eq!(state.diagnostics.len(), 1);
    }

    #[test]
    fn test_reset_play_clears_phase_and_ball() {
        let mut state = GameState::new(1);
        state.phase = Phase::BallThrown;
        state.reset_play();
        assert_eq!(state.phase, Phase::PreSnap);
    }
}
