//! Blitz & pressure: rusher assignment, rush lanes, protection, and the
//! pressure/sack timing table scaled to the user's sack budget.
//! Spec.md §4.14.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::CoverageType;

/// Which gap or edge a rusher attacks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RushLane {
    GapA,
    GapB,
    GapC,
    Edge,
}

/// What a rusher is attacking through the protection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RushTarget {
    Center,
    Guard,
    Tackle,
    Contain,
}

/// A single rusher's assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rusher {
    pub defender_id: String,
    pub lane: RushLane,
    pub target: RushTarget,
    pub timing: f64,
    pub priority: u8,
    pub blocked: bool,
    pub block_held_for: f64,
}

/// Protector priority order, RB-style: Mike, Sam, Will, SS.
pub const PROTECTOR_PRIORITY: [&str; 4] = ["Mike", "Sam", "Will", "SS"];

/// Base effectiveness (probability the protector wins the rep) by rusher
/// count, a coarse proxy for "effectiveness by rusher type" absent a
/// named per-position matchup table in spec.md.
fn protector_effectiveness(rusher_count: usize) -> f64 {
    match rusher_count {
        0..=3 => 0.75,
        4 => 0.6,
        5 => 0.45,
        _ => 0.30,
    }
}

/// Decide whether the defense blitzes this play, per the per-coverage
/// base blitz probability in spec.md §4.14.
pub fn should_blitz(coverage: CoverageType, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < coverage.base_blitz_probability()
}

/// Choose a rusher package (3-6 rushers) for a blitzing play. Defender ids
/// are drawn from the provided blitz-assigned defenders in order.
pub fn assign_rushers(blitz_defender_ids: &[String]) -> Vec<Rusher> {
    let lanes = [RushLane::GapA, RushLane::GapB, RushLane::GapC, RushLane::Edge];
    let targets = [RushTarget::Center, RushTarget::Guard, RushTarget::Tackle, RushTarget::Contain];
    blitz_defender_ids
        .iter()
        .enumerate()
        .map(|(i, id)| Rusher {
            defender_id: id.clone(),
            lane: lanes[i % lanes.len()],
            target: targets[i % targets.len()],
            timing: 2.0 + (i as f64) * 0.15,
            priority: i as u8,
            blocked: false,
            block_held_for: 0.0,
        })
        .collect()
}

/// Attempt a block: roll against the protector's effectiveness (scaled by
/// the number of rushers, more rushers overwhelming fewer protectors),
/// and hold the block for up to `max_block_time` on success.
pub fn attempt_block(rusher_count: usize, max_block_time: f64, rng: &mut impl Rng) -> (bool, f64) {
    let success = rng.gen::<f64>() < protector_effectiveness(rusher_count);
    if success {
        (true, max_block_time * rng.gen_range(0.6..=1.0))
    } else {
        (false, 0.0)
    }
}

/// Pressure phase the QB is experiencing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PressurePhase {
    Clean,
    Pressured,
    Collapsed,
}

/// Accuracy modifier and throw-time for a given pressure phase, per
/// spec.md §4.14.
pub fn pressure_effect(phase: PressurePhase) -> (f64, f64) {
    match phase {
        PressurePhase::Clean => (1.00, 0.8),
        PressurePhase::Pressured => (0.85, 0.6),
        PressurePhase::Collapsed => (0.70, 0.4),
    }
}

/// # `PressureState` struct
///
/// The engine's per-play pressure clock: the sack budget the user chose,
/// the derived pressure threshold, and the rushers assigned this snap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PressureState {
    pub sack_budget: f64,
    pub is_blitzing: bool,
    pub rushers: Vec<Rusher>,
    pub hot_routes_fired: bool,
}

pub const DEFAULT_SACK_BUDGET: f64 = 5.0;
pub const CHALLENGE_SACK_BUDGET: f64 = 2.7;

impl Default for PressureState {
    fn default() -> Self {
        PressureState {
            sack_budget: DEFAULT_SACK_BUDGET,
            is_blitzing: false,
            rushers: Vec::new(),
            hot_routes_fired: false,
        }
    }
}

impl PressureState {
    pub fn new(sack_budget: f64) -> PressureState {
        PressureState {
            sack_budget: sack_budget.clamp(2.0, 10.0),
            ..PressureState::default()
        }
    }

    /// The "clean" pressure threshold: a fixed offset below the sack
    /// budget, scaled along with it.
    pub fn pressure_time(&self) -> f64 {
        (self.sack_budget - 2.0).max(0.5)
    }

    pub fn sack_time(&self) -> f64 {
        self.sack_budget
    }

    pub fn timeout_time(&self) -> f64 {
        self.sack_budget + 2.0
    }

    pub fn phase_at(&self, elapsed: f64) -> PressurePhase {
        if elapsed <= self.pressure_time() {
            PressurePhase::Clean
        } else if elapsed <= self.sack_time() - 0.5 {
            PressurePhase::Pressured
        } else {
            PressurePhase::Collapsed
        }
    }

    /// Whether hot routes should auto-fire: elapsed >= 2.0s with 5+
    /// rushers, per spec.md §4.14.
    pub fn should_auto_fire_hot_routes(&self, elapsed: f64) -> bool {
        !self.hot_routes_fired && elapsed >= 2.0 && self.rushers.len() >= 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_cover0_always_blitzes() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(should_blitz(CoverageType::Cover0, &mut rng));
    }

    #[test]
    fn test_pressure_phases_scale_with_sack_budget() {
        let state = PressureState::new(5.0);
        assert_eq!(state.phase_at(1.0), PressurePhase::Clean);
        assert_eq!(state.phase_at(4.0), PressurePhase::Pressured);
        assert_eq!(state.phase_at(4.6), PressurePhase::Collapsed);
    }

    #[test]
    fn test_challenge_budget_is_tighter() {
        let state = PressureState::new(CHALLENGE_SACK_BUDGET);
        assert!(state.sack_time() < DEFAULT_SACK_BUDGET);
    }

    #[test]
    fn test_hot_routes_fire_with_five_rushers_after_two_seconds() {
        let mut state = PressureState::new(5.0);
        state.rushers = assign_rushers(&["d1".into(), "d2".into(), "d3".into(), "d4".into(), "d5".into()]);
        assert!(state.should_auto_fire_hot_routes(2.1));
        assert!(!state.should_auto_fire_hot_routes(1.0));
    }
}
