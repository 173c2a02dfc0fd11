//! Receiver movement: route execution against the route's own timing
//! array, with acceleration ramp, break-angle speed reduction, and
//! leverage-stem adjustment. Spec.md §4.10.

use crate::catalog::route::RoutePoint;
use crate::geometry::Vector2D;
use crate::player::{Leverage, Player};

const STEM_INSIDE_SHIFT: f64 = 1.5;
const STEM_DISTANCE: f64 = 6.0;

/// Break-angle speed reduction for a given break, proportional to the
/// angle between the pre- and post-break directions (45 deg = no
/// reduction, 90 deg = 30% reduction, 180 deg = maximal).
pub fn break_speed_reduction(break_angle_degrees: f64) -> f64 {
    let clamped = break_angle_degrees.clamp(45.0, 180.0);
    ((clamped - 45.0) / (180.0 - 45.0)) * 0.45
}

fn segment_for_elapsed(points: &[RoutePoint], elapsed: f64) -> Option<(usize, f64)> {
    for (i, point) in points.iter().enumerate() {
        if elapsed <= point.time {
            return Some((i, point.time));
        }
    }
    None
}

/// Advance a single receiver's route by `dt` seconds, returning the new
/// position. `lineup_position` anchors the route's waypoint offsets.
pub fn advance_route(player: &mut Player, lineup_position: Vector2D, dt: f64) -> Vector2D {
    let route = match &player.route {
        Some(route) => route.clone(),
        None => return player.position,
    };
    player.route_elapsed += dt;
    let elapsed = player.route_elapsed.min(route.duration());

    let points = route.points();
    let target = match segment_for_elapsed(points, elapsed) {
        Some((0, _)) => lineup_position.add(&points[0].offset),
        Some((i, _)) => {
            let prev = &points[i - 1];
            let curr = &points[i];
            let segment_duration = (curr.time - prev.time).max(1e-6);
            let t = ((elapsed - prev.time) / segment_duration).clamp(0.0, 1.0);
            let from = lineup_position.add(&prev.offset);
            let to = lineup_position.add(&curr.offset);
            crate::geometry::lerp(&from, &to, t)
        }
        None => {
            let last = points.last().unwrap();
            lineup_position.add(&last.offset)
        }
    };

    let stemmed = apply_leverage_stem(player, lineup_position, target);

    let max_step = player.effective_max_speed() * dt * speed_factor(player, &route, elapsed);
    let previous = player.position;
    player.position = player.position.move_toward(&stemmed, max_step);
    player.velocity = if dt > 1e-9 {
        player.position.subtract(&previous).scale(1.0 / dt)
    } else {
        Vector2D::zero()
    };
    player.position
}

/// If the assigned defender plays outside leverage, stem 1.5 yd inside
/// for the route's first 6 yards before resuming the natural path.
fn apply_leverage_stem(player: &Player, lineup_position: Vector2D, target: Vector2D) -> Vector2D {
    if player.position.distance(&lineup_position) >= STEM_DISTANCE {
        return target;
    }
    match player.leverage {
        Some(Leverage::Outside) => Vector2D::new(target.x - STEM_INSIDE_SHIFT, target.y),
        _ => target,
    }
}

/// Speed multiplier for the current instant: reduced during a break
/// window (the 0.3s surrounding a flagged waypoint), otherwise the normal
/// acceleration-ramped max speed.
fn speed_factor(player: &Player, route: &crate::catalog::route::RouteDef, elapsed: f64) -> f64 {
    const BREAK_WINDOW: f64 = 0.3;
    let break_point = route.points().iter().find(|p| p.is_break && (elapsed - p.time).abs() < BREAK_WINDOW);
    let ramp = if player.route_elapsed < 0.3 { player.route_elapsed / 0.3 } else { 1.0 };
    let break_factor = match break_point {
        Some(p) => 1.0 - break_speed_reduction(p.break_angle_degrees),
        None => 1.0,
    };
    ramp.max(0.2) * break_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::route::standard_routes;
    use crate::player::{PlayerType, Team};

    #[test]
    fn test_slant_break_has_no_speed_reduction() {
        assert_eq!(break_speed_reduction(45.0), 0.0);
    }

    #[test]
    fn test_out_route_break_has_thirty_percent_reduction() {
        assert!((break_speed_reduction(90.0) - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_advance_route_moves_receiver_toward_first_waypoint() {
        let mut player = Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::new(10.0, 30.0));
        let slant = standard_routes().into_iter().find(|r| r.key() == "slant").unwrap();
        player.route = Some(slant);
        player.lineup_position = Vector2D::new(10.0, 30.0);
        let before = player.position;
        advance_route(&mut player, Vector2D::new(10.0, 30.0), 0.1);
        assert!(player.position.y > before.y || player.position.x != before.x);
    }

    #[test]
    fn test_outside_leverage_stems_inside_early_in_route() {
        let mut player = Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::new(10.0, 30.0));
        player.leverage = Some(Leverage::Outside);
        let target = Vector2D::new(10.0, 33.0);
        let stemmed = apply_leverage_stem(&player, Vector2D::new(10.0, 30.0), target);
        assert!(stemmed.x < target.x);
    }
}
