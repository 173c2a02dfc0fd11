//! Pre-snap motion: path generation, per-coverage response dispatch, and
//! the post-snap speed boost. Spec.md §4.7.

use serde::{Deserialize, Serialize};

use crate::catalog::coverage::CoverageType;
use crate::geometry::{bezier_quadratic, CENTER_X};
use crate::geometry::Vector2D;
use crate::timing::{Adjustment, AdjustmentKind};

/// # `MotionType` enum
///
/// The kind of pre-snap motion a player can be sent in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MotionType {
    Jet,
    Fly,
    Orbit,
    Across,
    Glide,
    Return,
    Shift,
}

impl MotionType {
    /// Scripted duration of the motion path, in seconds, per spec.md
    /// §4.7's duration table (shift includes its 1s "set" phase).
    pub fn duration(&self) -> f64 {
        match self {
            MotionType::Jet => 1.3,
            MotionType::Fly => 1.4,
            MotionType::Orbit => 1.7,
            MotionType::Across => 2.0,
            MotionType::Glide => 1.2,
            MotionType::Return => 1.8,
            MotionType::Shift => 1.2 + 1.0,
        }
    }

    /// Whether the offense may still snap the ball while this motion is
    /// in flight. Jet motion snaps just before the motion man crosses the
    /// center, per spec.md §4.7 ("jet: ... snap-before-center").
    pub fn snaps_before_completion(&self) -> bool {
        matches!(self, MotionType::Jet)
    }
}

/// # `Motion` struct
///
/// An in-flight (or completed) pre-snap motion: the waypoints a player
/// follows, the elapsed time along them, and whether the path crosses the
/// formation's longitudinal center.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Motion {
    pub motion_type: MotionType,
    pub player_id: String,
    pub start: Vector2D,
    pub end: Vector2D,
    pub path: Vec<Vector2D>,
    pub duration: f64,
    pub elapsed: f64,
}

impl Motion {
    /// Build the type-specific waypoint path for a motion starting at
    /// `start`, toward the QB's position `qb_pos`, per spec.md §4.7:
    /// jet is a shallow lateral toward the QB; fly is straight across;
    /// orbit curves behind the QB; across goes sideline to sideline;
    /// glide/return/shift are shorter adjustments.
    pub fn new(motion_type: MotionType, player_id: &str, start: Vector2D, qb_pos: Vector2D) -> Motion {
        let duration = motion_type.duration();
        let (end, path) = match motion_type {
            MotionType::Jet => {
                let target_x = if start.x < CENTER_X {
                    CENTER_X + 10.0
                } else {
                    CENTER_X - 10.0
                };
                let end = Vector2D::new(target_x, qb_pos.y - 1.0);
                (end, vec![start, end])
            }
            MotionType::Fly => {
                let target_x = if start.x < CENTER_X {
                    crate::geometry::FIELD_WIDTH - start.x
                } else {
                    crate::geometry::FIELD_WIDTH - start.x
                };
                let end = Vector2D::new(target_x, start.y);
                (end, vec![start, end])
            }
            MotionType::Orbit => {
                let control = Vector2D::new(qb_pos.x, qb_pos.y - 2.0);
                let target_x = if start.x < CENTER_X {
                    CENTER_X + 6.0
                } else {
                    CENTER_X - 6.0
                };
                let end = Vector2D::new(target_x, start.y);
                let mut path = Vec::new();
                let steps = 6;
                for i in 0..=steps {
                    let t = i as f64 / steps as f64;
                    path.push(bezier_quadratic(&start, &control, &end, t));
                }
                (end, path)
            }
            MotionType::Across => {
                let end = Vector2D::new(crate::geometry::FIELD_WIDTH - start.x, start.y);
                (end, vec![start, end])
            }
            MotionType::Glide => {
                let dx = if start.x < CENTER_X { 3.0 } else { -3.0 };
                let end = Vector2D::new((start.x + dx).clamp(0.0, crate::geometry::FIELD_WIDTH), start.y);
                (end, vec![start, end])
            }
            MotionType::Return => {
                let end = start;
                let mid = Vector2D::new(start.x + 4.0, start.y);
                (end, vec![start, mid, end])
            }
            MotionType::Shift => {
                let dx = if start.x < CENTER_X { 2.0 } else { -2.0 };
                let end = Vector2D::new((start.x + dx).clamp(0.0, crate::geometry::FIELD_WIDTH), start.y);
                (end, vec![start, end])
            }
        };
        Motion {
            motion_type,
            player_id: player_id.to_string(),
            start,
            end,
            path,
            duration,
            elapsed: 0.0,
        }
    }

    /// Whether the start and end of this motion lie on opposite sides of
    /// the field's longitudinal center (spec.md §4.7).
    pub fn crosses_formation(&self) -> bool {
        (self.start.x < CENTER_X) != (self.end.x < CENTER_X)
    }

    /// Whether the motion's scripted duration has elapsed.
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance the motion by `dt` seconds and return the current position
    /// along its path.
    pub fn advance(&mut self, dt: f64) -> Vector2D {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.position_at(self.elapsed)
    }

    /// Position along the path at a given elapsed time, piecewise-linear
    /// across the waypoints.
    pub fn position_at(&self, elapsed: f64) -> Vector2D {
        if self.path.len() < 2 || self.duration <= 0.0 {
            return self.end;
        }
        let t = (elapsed / self.duration).clamp(0.0, 1.0);
        let segment_count = self.path.len() - 1;
        let scaled = t * segment_count as f64;
        let index = (scaled.floor() as usize).min(segment_count - 1);
        let local_t = scaled - index as f64;
        crate::geometry::lerp(&self.path[index], &self.path[index + 1], local_t)
    }
}

/// Try to begin a new motion. Returns `None` (and the caller should treat
/// the command as a no-op returning `false`) if a motion is already
/// active, per spec.md §4.7 and invariant 7 (at most one player may be in
/// motion at once).
pub fn send_in_motion(
    already_in_motion: bool,
    motion_type: MotionType,
    player_id: &str,
    start: Vector2D,
    qb_pos: Vector2D,
) -> Option<Motion> {
    if already_in_motion {
        return None;
    }
    Some(Motion::new(motion_type, player_id, start, qb_pos))
}

/// Coverage response kind dispatched by `coverage_motion_response`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotionResponse {
    /// Man defender locks and mirrors the motion man across the formation.
    Lock,
    /// Safeties rock-and-roll: rotate the deep shell toward the motion's
    /// new strength.
    RockAndRoll,
    /// A flat defender buzzes down toward the motion side.
    Buzz,
    /// A robber rotates toward the motion side's underneath hole.
    Robber,
    /// Underneath defenders re-pattern-match their keys post-motion.
    PatternMatch,
    /// Split-field coverage reassigns which half each safety is in.
    SplitField,
    /// The middle linebacker shifts over to stay in the new strength.
    MlbAdjust,
    /// No meaningful response; the defense holds its shell.
    None,
}

/// Table keyed on `(coverage, crosses_formation)` per spec.md §4.7.
pub fn coverage_motion_response(coverage: CoverageType, crosses_formation: bool) -> MotionResponse {
    use CoverageType::*;
    match (coverage, crosses_formation) {
        (Cover0, _) => MotionResponse::Lock,
        (Cover1, true) => MotionResponse::RockAndRoll,
        (Cover1, false) => MotionResponse::Lock,
        (Cover2, true) => MotionResponse::Buzz,
        (Cover2, false) => MotionResponse::None,
        (Cover3, true) => MotionResponse::Buzz,
        (Cover3, false) => MotionResponse::Robber,
        (Cover4 | Quarters, true) => MotionResponse::SplitField,
        (Cover4 | Quarters, false) => MotionResponse::PatternMatch,
        (Cover6, _) => MotionResponse::SplitField,
        (Tampa2, true) => MotionResponse::MlbAdjust,
        (Tampa2, false) => MotionResponse::None,
        (Cover2RollToOne | Cover2Invert, _) => MotionResponse::RockAndRoll,
        (QuartersPoach, _) => MotionResponse::SplitField,
    }
}

impl MotionResponse {
    /// Recognition/execution timing for the defensive adjustment this
    /// response produces, per spec.md §4.7 (recognition 0.2s; execution
    /// between 0.5s for a lock and 1.4s for a spin-type rotation).
    pub fn timing(&self) -> (f64, f64) {
        let execution = match self {
            MotionResponse::Lock => 0.5,
            MotionResponse::Buzz => 0.8,
            MotionResponse::Robber => 0.9,
            MotionResponse::PatternMatch => 0.7,
            MotionResponse::MlbAdjust => 0.8,
            MotionResponse::RockAndRoll | MotionResponse::SplitField => 1.4,
            MotionResponse::None => 0.0,
        };
        (0.2, execution)
    }
}

/// Build a `motion`-kind defensive adjustment for a single defender in
/// response to a completed/in-flight motion, forwarded to the timing
/// system per spec.md §4.7.
pub fn motion_adjustment(defender_id: &str, target_position: Vector2D, response: MotionResponse) -> Adjustment {
    let (recognition, execution) = response.timing();
    Adjustment::new(AdjustmentKind::Motion, defender_id, target_position, recognition, execution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_motion_crosses_if_starting_opposite_qb_side() {
        let start = Vector2D::new(5.0, 30.0);
        let qb = Vector2D::new(CENTER_X, 30.0);
        let motion = Motion::new(MotionType::Jet, "off-wr2", start, qb);
        assert!(motion.crosses_formation());
    }

    #[test]
    fn test_motion_advance_caps_at_duration() {
        let start = Vector2D::new(5.0, 30.0);
        let qb = Vector2D::new(CENTER_X, 30.0);
        let mut motion = Motion::new(MotionType::Jet, "off-wr2", start, qb);
        motion.advance(100.0);
        assert_eq!(motion.elapsed, motion.duration);
    }

    #[test]
    fn test_send_in_motion_rejects_when_already_active() {
        let start = Vector2D::new(5.0, 30.0);
        let qb = Vector2D::new(CENTER_X, 30.0);
        let result = send_in_motion(true, MotionType::Jet, "off-wr2", start, qb);
        assert!(result.is_none());
    }

    #[test]
    fn test_cover0_response_is_always_lock() {
        assert_eq!(coverage_motion_response(CoverageType::Cover0, true), MotionResponse::Lock);
        assert_eq!(coverage_motion_response(CoverageType::Cover0, false), MotionResponse::Lock);
    }
}
