//! QB movement: drop/rollout/play-action configs, waypoint interpolation,
//! and the accuracy modifiers they produce each tick. Spec.md §4.9.

use serde::{Deserialize, Serialize};

use crate::geometry::Vector2D;

/// # `QbMovementKind` enum
///
/// The drop or movement scheme selected pre-snap, defaulted to
/// `FiveStep` at the snap if the caller never chose one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum QbMovementKind {
    ThreeStep,
    FiveStep,
    SevenStep,
    PlayActionBootRight,
    RolloutRight,
    RolloutLeft,
}

/// Static timing/geometry config for a [`QbMovementKind`].
#[derive(Clone, Copy, Debug)]
pub struct QbMovementConfig {
    pub total_time: f64,
    pub depth: f64,
    pub lateral: f64,
    pub accuracy_modifier: f64,
    pub fake_duration: Option<f64>,
    pub is_play_action: bool,
}

impl QbMovementKind {
    pub fn config(&self) -> QbMovementConfig {
        match self {
            QbMovementKind::ThreeStep => QbMovementConfig {
                total_time: 1.2,
                depth: 5.0,
                lateral: 0.0,
                accuracy_modifier: 1.00,
                fake_duration: None,
                is_play_action: false,
            },
            QbMovementKind::FiveStep => QbMovementConfig {
                total_time: 1.8,
                depth: 7.0,
                lateral: 0.0,
                accuracy_modifier: 1.00,
                fake_duration: None,
                is_play_action: false,
            },
            QbMovementKind::SevenStep => QbMovementConfig {
                total_time: 2.4,
                depth: 9.0,
                lateral: 0.0,
                accuracy_modifier: 1.00,
                fake_duration: None,
                is_play_action: false,
            },
            QbMovementKind::PlayActionBootRight => QbMovementConfig {
                total_time: 2.2,
                depth: 6.0,
                lateral: 6.0,
                accuracy_modifier: 0.92,
                fake_duration: Some(0.6),
                is_play_action: true,
            },
            QbMovementKind::RolloutRight => QbMovementConfig {
                total_time: 1.8,
                depth: 4.0,
                lateral: 8.0,
                accuracy_modifier: 0.88,
                fake_duration: None,
                is_play_action: false,
            },
            QbMovementKind::RolloutLeft => QbMovementConfig {
                total_time: 1.8,
                depth: 4.0,
                lateral: -8.0,
                // Right-handed bias: rolling away from the throwing shoulder
                // costs more accuracy than rolling toward it.
                accuracy_modifier: 0.85,
                fake_duration: None,
                is_play_action: false,
            },
        }
    }
}

/// # `QbMovementState` struct
///
/// The QB's active drop/rollout, tracked from the snap until a throw,
/// sack, or scramble ends the play.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QbMovementState {
    pub kind: QbMovementKind,
    pub origin: Vector2D,
    pub waypoints: Vec<Vector2D>,
    pub total_time: f64,
    pub accuracy_modifier: f64,
    pub fake_duration: Option<f64>,
    pub is_active: bool,
    pub elapsed: f64,
    pub is_play_action: bool,
    pub defensive_response_triggered: bool,
}

impl QbMovementState {
    /// Build the movement state at the snap: `origin` is the QB's pre-snap
    /// position, `facing_downfield` is +1 for offense moving toward
    /// increasing y (always true in this engine's coordinate system).
    pub fn new(kind: QbMovementKind, origin: Vector2D) -> QbMovementState {
        let config = kind.config();
        let end = Vector2D::new(origin.x + config.lateral, origin.y - config.depth);
        let waypoints = vec![origin, end];
        QbMovementState {
            kind,
            origin,
            waypoints,
            total_time: config.total_time,
            accuracy_modifier: config.accuracy_modifier,
            fake_duration: config.fake_duration,
            is_active: true,
            elapsed: 0.0,
            is_play_action: config.is_play_action,
            defensive_response_triggered: false,
        }
    }

    /// Advance the drop/rollout by `dt` seconds and return the QB's new
    /// position, piecewise-linearly interpolated across `waypoints`.
    pub fn advance(&mut self, dt: f64) -> Vector2D {
        if !self.is_active {
            return self.waypoints.last().copied().unwrap_or(self.origin);
        }
        self.elapsed = (self.elapsed + dt).min(self.total_time);
        let progress = if self.total_time > 0.0 { self.elapsed / self.total_time } else { 1.0 };
        if self.elapsed >= self.total_time {
            self.is_active = false;
        }
        crate::geometry::lerp(&self.waypoints[0], &self.waypoints[1], progress.clamp(0.0, 1.0))
    }

    /// The accuracy modifier for the phase the QB is currently in:
    /// stationary before the drop starts, mid-drop while moving, rolling
    /// during a rollout/boot, or in the PA-fake phase.
    pub fn current_accuracy_modifier(&self) -> f64 {
        if let Some(fake) = self.fake_duration {
            if self.elapsed < fake {
                return 0.82;
            }
        }
        if self.elapsed <= 0.0 {
            return 1.0;
        }
        match self.kind {
            QbMovementKind::RolloutRight | QbMovementKind::RolloutLeft | QbMovementKind::PlayActionBootRight => {
                self.accuracy_modifier
            }
            _ if self.is_active => 0.95,
            _ => self.accuracy_modifier,
        }
    }

    /// Whether the play-action fake has completed and defenders should be
    /// evaluated for the freeze response.
    pub fn should_trigger_play_action_response(&self) -> bool {
        self.is_play_action && self.fake_duration.map(|f| self.elapsed >= f).unwrap_or(false)
    }

    pub fn mark_defensive_response_triggered(&mut self) {
        self.defensive_response_triggered = true;
    }

    /// Whether the QB is currently in a valid throwing position: any time
    /// after the drop has started, scrambling excluded (the engine never
    /// models scrambles as a `QbMovementKind`, so this is always true once
    /// active movement has begun).
    pub fn in_throwing_position(&self) -> bool {
        self.elapsed > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_step_defaults_to_one_accuracy() {
        let config = QbMovementKind::FiveStep.config();
        assert_eq!(config.accuracy_modifier, 1.00);
        assert_eq!(config.total_time, 1.8);
    }

    #[test]
    fn test_advance_reaches_target_depth_at_end() {
        let mut state = QbMovementState::new(QbMovementKind::SevenStep, Vector2D::new(26.665, 30.0));
        let pos = state.advance(2.4);
        assert!((pos.y - 21.0).abs() < 1e-6);
        assert!(!state.is_active);
    }

    #[test]
    fn test_play_action_fake_phase_lowers_accuracy() {
        let mut state = QbMovementState::new(QbMovementKind::PlayActionBootRight, Vector2D::new(26.665, 30.0));
        state.advance(0.3);
        assert_eq!(state.current_accuracy_modifier(), 0.82);
        assert!(!state.should_trigger_play_action_response());
        state.advance(0.4);
        assert!(state.should_trigger_play_action_response());
    }
}
