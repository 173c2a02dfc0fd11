//! The football: position, flight state, and carrier/target bookkeeping.
//! Spec.md §3, §4.15.

use serde::{Deserialize, Serialize};

use crate::geometry::{Vector2D, BALL_SPEED};

/// # `BallState` enum
///
/// The ball's lifecycle within a single play.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallState {
    Held,
    Thrown,
    Caught,
    Incomplete,
    Intercepted,
}

impl Default for BallState {
    fn default() -> Self {
        BallState::Held
    }
}

/// # `Ball` struct
///
/// The single football in play. While `held` or `caught`, exactly one
/// player has `has_ball = true` and matches `carrier_id`; while `thrown`,
/// `incomplete`, or `intercepted`, there is no carrier.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub state: BallState,
    pub target_player: Option<String>,
    pub carrier: Option<String>,
    /// Seconds the ball has been in flight since `thrown`.
    pub time_in_air: f64,
}

impl Ball {
    /// Spot the ball with a carrier at the snap.
    pub fn held_by(carrier_id: &str, position: Vector2D) -> Ball {
        Ball {
            position,
            velocity: Vector2D::zero(),
            state: BallState::Held,
            target_player: None,
            carrier: Some(carrier_id.to_string()),
            time_in_air: 0.0,
        }
    }

    /// Throw the ball at a receiver's predicted catch point: the
    /// receiver's current position plus `velocity * leadTime`, where
    /// `leadTime = distance / BALL_SPEED`, per spec.md §4.15.
    pub fn throw_to(&mut self, target_id: &str, target_position: Vector2D, target_velocity: Vector2D) {
        let distance = self.position.distance(&target_position);
        let lead_time = if BALL_SPEED > 0.0 { distance / BALL_SPEED } else { 0.0 };
        let predicted = target_position.add(&target_velocity.scale(lead_time));
        let direction = predicted.subtract(&self.position);
        let magnitude = direction.magnitude();
        self.velocity = if magnitude > crate::geometry::EPSILON {
            direction.scale(BALL_SPEED / magnitude)
        } else {
            Vector2D::zero()
        };
        self.state = BallState::Thrown;
        self.target_player = Some(target_id.to_string());
        self.carrier = None;
        self.time_in_air = 0.0;
    }

    /// Advance the ball's flight by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if matches!(self.state, BallState::Thrown) {
            self.position = self.position.add(&self.velocity.scale(dt));
            self.time_in_air += dt;
        }
    }

    /// Distance remaining to the predicted arrival point; arrival is
    /// tested by the outcome resolver once the ball has traveled the
    /// straight-line distance to its aim point.
    pub fn arrived_at(&self, aim_point: Vector2D) -> bool {
        matches!(self.state, BallState::Thrown) && self.position.distance(&aim_point) < 0.5
    }

    pub fn mark_caught(&mut self, receiver_id: &str, position: Vector2D) {
        self.state = BallState::Caught;
        self.carrier = Some(receiver_id.to_string());
        self.position = position;
        self.velocity = Vector2D::zero();
    }

    pub fn mark_incomplete(&mut self) {
        self.state = BallState::Incomplete;
        self.carrier = None;
        self.velocity = Vector2D::zero();
    }

    pub fn mark_intercepted(&mut self, defender_id: &str, position: Vector2D) {
        self.state = BallState::Intercepted;
        self.carrier = Some(defender_id.to_string());
        self.position = position;
        self.velocity = Vector2D::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_to_leads_a_moving_receiver() {
        let mut ball = Ball::held_by("off-qb", Vector2D::new(26.665, 30.0));
        ball.throw_to("off-wr1", Vector2D::new(26.665, 50.0), Vector2D::new(0.0, 8.0));
        assert!(matches!(ball.state, BallState::Thrown));
        assert!(ball.velocity.magnitude() > 0.0);
    }

    #[test]
    fn test_advance_only_moves_while_thrown() {
        let mut ball = Ball::held_by("off-qb", Vector2D::new(10.0, 10.0));
        ball.advance(1.0);
        assert_eq!(ball.position, Vector2D::new(10.0, 10.0));
    }
}
