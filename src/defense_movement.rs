//! Defensive movement: per-technique position updates, pursuit, and
//! pattern-match conversions. Spec.md §4.11.

use serde::{Deserialize, Serialize};

use crate::geometry::{bezier_quadratic, Vector2D};
use crate::player::{CoverageResponsibilityKind, Leverage, Player, PlayerType, Technique};

const PRESS_CUSHION: f64 = 1.0;
const OFF_BACKPEDAL_SPEED: f64 = 0.55;
const OFF_BROKEN_CUSHION: f64 = 2.0;
const OFF_THREATENED_CUSHION: f64 = 3.0;
const HIP_FLIP_DURATION: f64 = 0.25;
const HIP_FLIP_SPEED: f64 = 0.50;
const TRAIL_LEVERAGE_OFFSET: f64 = 0.5;
const TRAIL_DEPTH_OFFSET: f64 = 1.5;
const ZONE_DROP_SPEED: f64 = 0.85;
const ZONE_BEZIER_THRESHOLD: f64 = 5.0;
const RALLY_DISTANCE: f64 = 10.0;
const PATTERN_MATCH_VERTICAL_DEPTH: f64 = 12.0;
const PALMS_BREAK_OUT_DEPTH: f64 = 5.0;
const PA_FREEZE_LB_DRIVE: f64 = 2.0;
const PA_FREEZE_LB_DURATION: f64 = 0.4;
const PA_FREEZE_S_PAUSE: f64 = 0.3;

/// Base reaction time, in seconds, before a defender starts reacting to a
/// route break or ball event, per spec.md §4.11.
pub fn base_reaction_time(player_type: PlayerType) -> f64 {
    match player_type {
        PlayerType::CB => 0.28,
        PlayerType::S => 0.30,
        PlayerType::LB => 0.34,
        PlayerType::NB => 0.29,
        _ => 0.30,
    }
}

/// Reaction time after the hip-recognition and star bonuses: -50ms when
/// facing the receiver, -25 to -30ms if the defender is a star.
pub fn reaction_time(player_type: PlayerType, facing_receiver: bool, is_star: bool) -> f64 {
    let mut time = base_reaction_time(player_type);
    if facing_receiver {
        time -= 0.05;
    }
    if is_star {
        time -= 0.0275;
    }
    time.max(0.0)
}

/// Desired position this tick for a defender playing `Press` technique:
/// mirrors the receiver with a leverage offset and 1 yd cushion.
pub fn press_target(receiver_position: Vector2D, leverage: Leverage) -> Vector2D {
    let offset = match leverage {
        Leverage::Inside => -1.0,
        Leverage::Outside => 1.0,
        Leverage::HeadUp => 0.0,
    };
    Vector2D::new(receiver_position.x + offset, receiver_position.y - PRESS_CUSHION)
}

/// State a defender playing `Off` technique carries between ticks.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct OffTechniqueState {
    pub in_transition: bool,
    pub transition_elapsed: f64,
}

/// Compute the `Off` technique's target position and updated state:
/// backpedal at 55% max speed until the cushion is broken or threatened,
/// then a 0.25s hip-flip transition into `Trail`.
pub fn off_target(
    defender: &Player,
    receiver_position: Vector2D,
    state: &mut OffTechniqueState,
    dt: f64,
) -> (Vector2D, bool) {
    let separation = defender.position.distance(&receiver_position);

    if state.in_transition {
        state.transition_elapsed += dt;
        if state.transition_elapsed >= HIP_FLIP_DURATION {
            return (trail_target(defender, receiver_position), true);
        }
        let step = defender.effective_max_speed() * HIP_FLIP_SPEED * dt;
        return (defender.position.move_toward(&receiver_position, step), false);
    }

    if separation <= OFF_BROKEN_CUSHION {
        state.in_transition = true;
        state.transition_elapsed = 0.0;
        return (defender.position, false);
    }

    let speed_fraction = if separation <= OFF_THREATENED_CUSHION { 1.0 } else { OFF_BACKPEDAL_SPEED };
    let backpedal_target = Vector2D::new(receiver_position.x, defender.position.y - 1.0);
    let step = defender.effective_max_speed() * speed_fraction * dt;
    (defender.position.move_toward(&backpedal_target, step), false)
}

/// `Trail` technique target: shadow the receiver with a 0.5 yd leverage
/// offset and 1.5 yd depth behind.
pub fn trail_target(defender: &Player, receiver_position: Vector2D) -> Vector2D {
    let side = if defender.position.x < receiver_position.x { -1.0 } else { 1.0 };
    Vector2D::new(receiver_position.x + side * TRAIL_LEVERAGE_OFFSET, receiver_position.y - TRAIL_DEPTH_OFFSET)
}

/// `Zone` technique target: move to the landmark at 85% speed, using a
/// Bezier curve for moves of 5+ yards.
pub fn zone_drop_target(defender: &Player, landmark: Vector2D, dt: f64) -> Vector2D {
    let distance = defender.position.distance(&landmark);
    let step = defender.effective_max_speed() * ZONE_DROP_SPEED * dt;
    if distance >= ZONE_BEZIER_THRESHOLD {
        let control = Vector2D::new((defender.position.x + landmark.x) / 2.0, defender.position.y);
        let t = (step / distance.max(1e-6)).clamp(0.0, 1.0);
        bezier_quadratic(&defender.position, &control, &landmark, t)
    } else {
        defender.position.move_toward(&landmark, step)
    }
}

/// Rally-to-ball pursuit: once the ball carrier is within 10 yd, pursue
/// at a 45 degree rally angle rather than a direct line.
pub fn rally_target(defender: &Player, carrier_position: Vector2D) -> Option<Vector2D> {
    let distance = defender.position.distance(&carrier_position);
    if distance > RALLY_DISTANCE {
        return None;
    }
    let direct = carrier_position.subtract(&defender.position);
    let direct_angle = direct.x.atan2(direct.y);
    let rally_angle = direct_angle * 0.75 + 45f64.to_radians() * 0.25 * direct_angle.signum();
    let rotated = Vector2D::new(rally_angle.sin(), rally_angle.cos()).scale(distance);
    Some(defender.position.add(&rotated))
}

/// Whether a corner playing Cover 4 / quarters pattern-match should
/// convert from zone to man (MOD): the assigned receiver has gone
/// vertical past 12 yards.
pub fn should_convert_to_mod(receiver_depth_past_los: f64) -> bool {
    receiver_depth_past_los > PATTERN_MATCH_VERTICAL_DEPTH
}

/// Palms (2-Read) read: if the #2 receiver breaks outside past 5 yards
/// the corner takes #2 (safety rotates to #1 deep); if #2 releases
/// vertical, the safety matches #2 and the corner stays on #1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PalmsRead {
    CornerTakesTwo,
    SafetyMatchesTwo,
    Undecided,
}

pub fn palms_read(number_two_depth: f64, number_two_broke_outside: bool) -> PalmsRead {
    if number_two_broke_outside && number_two_depth > PALMS_BREAK_OUT_DEPTH {
        PalmsRead::CornerTakesTwo
    } else if number_two_depth > PATTERN_MATCH_VERTICAL_DEPTH {
        PalmsRead::SafetyMatchesTwo
    } else {
        PalmsRead::Undecided
    }
}

/// Play-action freeze: a linebacker drives 2 yd toward the LOS then
/// recovers backward over 0.4s; a safety simply pauses for 0.3s.
pub fn play_action_freeze_target(defender: &Player, player_type: PlayerType, elapsed_since_fake: f64) -> Vector2D {
    match player_type {
        PlayerType::LB => {
            let half = PA_FREEZE_LB_DURATION / 2.0;
            if elapsed_since_fake < half {
                Vector2D::new(defender.position.x, defender.position.y - PA_FREEZE_LB_DRIVE)
            } else {
                defender.position
            }
        }
        _ => {
            if elapsed_since_fake < PA_FREEZE_S_PAUSE {
                defender.position
            } else {
                defender.position
            }
        }
    }
}

/// Dispatch the per-tick desired position for a defender by its current
/// technique. Callers overlay the defensive-timing-system adjustment (if
/// any) on top of this before committing the position, per spec.md
/// §4.16 step 5.
pub fn desired_position(
    defender: &Player,
    technique: Technique,
    receiver_position: Option<Vector2D>,
    off_state: &mut OffTechniqueState,
    dt: f64,
) -> Vector2D {
    match technique {
        Technique::Press => receiver_position
            .map(|r| press_target(r, defender.leverage.unwrap_or(Leverage::HeadUp)))
            .unwrap_or(defender.position),
        Technique::Off => receiver_position.map(|r| off_target(defender, r, off_state, dt).0).unwrap_or(defender.position),
        Technique::Bail => receiver_position
            .map(|r| defender.position.move_toward(&Vector2D::new(r.x, defender.position.y - 10.0), defender.effective_max_speed() * dt))
            .unwrap_or(defender.position),
        Technique::Trail => receiver_position.map(|r| trail_target(defender, r)).unwrap_or(defender.position),
        Technique::Zone => match &defender.coverage_responsibility {
            Some(resp) => match &resp.kind {
                CoverageResponsibilityKind::Zone { center, .. } => zone_drop_target(defender, *center, dt),
                _ => defender.position,
            },
            None => defender.position,
        },
        Technique::Blitz => defender.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Team;

    #[test]
    fn test_reaction_time_applies_star_and_facing_bonus() {
        let base = base_reaction_time(PlayerType::CB);
        let adjusted = reaction_time(PlayerType::CB, true, true);
        assert!(adjusted < base);
    }

    #[test]
    fn test_press_offsets_inside_for_inside_leverage() {
        let target = press_target(Vector2D::new(10.0, 30.0), Leverage::Inside);
        assert!(target.x < 10.0);
    }

    #[test]
    fn test_off_transitions_to_hip_flip_when_cushion_broken() {
        let defender = Player::new("def-cb1", Team::Defense, PlayerType::CB, Vector2D::new(10.0, 28.0));
        let mut state = OffTechniqueState::default();
        let (_, transitioned) = off_target(&defender, Vector2D::new(10.0, 29.5), &mut state, 0.1);
        assert!(!transitioned);
        assert!(state.in_transition);
    }

    #[test]
    fn test_mod_conversion_triggers_past_twelve_yards() {
        assert!(should_convert_to_mod(13.0));
        assert!(!should_convert_to_mod(10.0));
    }

    #[test]
    fn test_palms_read_corner_takes_two_on_outside_break() {
        assert_eq!(palms_read(6.0, true), PalmsRead::CornerTakesTwo);
    }
}
