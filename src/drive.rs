//! Drive bookkeeping: down, distance, line of scrimmage, and the
//! first-down/touchdown/safety/turnover-on-downs rules that set up the
//! next play. Spec.md §4.17.

use serde::{Deserialize, Serialize};

use crate::geometry::Hash;
use crate::outcome::Outcome;

/// # `Drive` struct
///
/// Down/distance/field-position state that survives `resetPlay` and is
/// advanced by `nextPlay` from the prior play's [`Outcome`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Drive {
    pub down: u8,
    pub yards_to_go: f64,
    /// Line of scrimmage, a y-coordinate in `[10, 110]`.
    pub los: f64,
    /// Where the ball was spotted at the start of the current play.
    pub ball_on: f64,
    /// Where the current drive began, for yards-gained bookkeeping.
    pub drive_start: f64,
    pub is_first_down: bool,
    pub hash: Hash,
}

impl Default for Drive {
    fn default() -> Self {
        Drive::new()
    }
}

impl Drive {
    pub fn new() -> Drive {
        Drive {
            down: 1,
            yards_to_go: 10.0,
            los: 25.0,
            ball_on: 25.0,
            drive_start: 25.0,
            is_first_down: false,
            hash: Hash::Middle,
        }
    }

    /// Yards remaining to the opponent's goal line, used for the
    /// "1st & Goal" distance display inside the red zone (spec.md's
    /// LOS=95 edge case).
    pub fn yards_to_goal(&self) -> f64 {
        crate::geometry::FIELD_LENGTH - crate::geometry::END_ZONE_DEPTH - self.los
    }

    pub fn is_goal_to_go(&self) -> bool {
        self.yards_to_goal() < self.yards_to_go
    }

    /// The distance to set on a fresh first down at the current `los`:
    /// 10 yards, or less if the goal line is closer than that (spec.md
    /// §8's "1st & Goal" edge case).
    fn fresh_first_down_distance(&self) -> f64 {
        self.yards_to_goal().min(10.0)
    }

    /// Apply the prior play's outcome, advancing down/distance/LOS and
    /// recomputing the hash from the ball's final x position, per
    /// spec.md §4.16's `nextPlay`.
    pub fn advance(&mut self, outcome: &Outcome, ball_end_x: f64, ball_end_y: f64) {
        match outcome {
            Outcome::Touchdown => {
                self.los = 30.0;
                self.down = 1;
                self.yards_to_go = self.fresh_first_down_distance();
                self.is_first_down = false;
            }
            Outcome::Safety => {
                self.los = 30.0;
                self.down = 1;
                self.yards_to_go = self.fresh_first_down_distance();
                self.is_first_down = false;
            }
            Outcome::Interception { .. } => {
                self.los = ball_end_y.clamp(10.0, 110.0);
                self.down = 1;
                self.yards_to_go = self.fresh_first_down_distance();
                self.is_first_down = false;
            }
            Outcome::Catch { yards } => {
                let new_los = (self.los + yards).clamp(0.0, 120.0);
                let gained_first_down = new_los - self.ball_on >= self.yards_to_go;
                self.los = new_los;
                if gained_first_down {
                    self.down = 1;
                    self.yards_to_go = self.fresh_first_down_distance();
                    self.is_first_down = true;
                } else if self.down >= 4 {
                    self.down = 1;
                    self.yards_to_go = self.fresh_first_down_distance();
                    self.is_first_down = false;
                } else {
                    self.down += 1;
                    self.yards_to_go -= new_los - self.ball_on;
                    self.is_first_down = false;
                }
            }
            Outcome::Incomplete | Outcome::Timeout => {
                if self.down >= 4 {
                    self.down = 1;
                    self.yards_to_go = self.fresh_first_down_distance();
                    self.is_first_down = false;
                } else {
                    self.down += 1;
                }
            }
            Outcome::Sack { yards } => {
                let new_los = (self.los + yards).clamp(0.0, 120.0);
                self.los = new_los;
                if self.down >= 4 {
                    self.down = 1;
                    self.yards_to_go = self.fresh_first_down_distance();
                    self.is_first_down = false;
                } else {
                    self.down += 1;
                    self.yards_to_go -= new_los - self.ball_on;
                    self.is_first_down = false;
                }
            }
        }
        self.yards_to_go = self.yards_to_go.max(1.0).min(10.0);
        self.ball_on = self.los;
        self.hash = Hash::from_ball_x(ball_end_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_down_incomplete_is_turnover_on_downs() {
        let mut drive = Drive::new();
        drive.down = 4;
        drive.los = 50.0;
        drive.ball_on = 50.0;
        drive.advance(&Outcome::Incomplete, 26.665, 50.0);
        assert_eq!(drive.down, 1);
        assert_eq!(drive.yards_to_go, 10.0);
        assert_eq!(drive.los, 50.0);
    }

    #[test]
    fn test_touchdown_places_ball_at_thirty() {
        let mut drive = Drive::new();
        drive.advance(&Outcome::Touchdown, 26.665, 120.0);
        assert_eq!(drive.los, 30.0);
        assert_eq!(drive.down, 1);
    }

    #[test]
    fn test_safety_places_ball_at_thirty() {
        let mut drive = Drive::new();
        drive.los = 1.0;
        drive.advance(&Outcome::Safety, 26.665, 0.0);
        assert_eq!(drive.los, 30.0);
    }

    #[test]
    fn test_catch_gaining_first_down_resets_to_first_and_ten() {
        let mut drive = Drive::new();
        drive.los = 30.0;
        drive.ball_on = 30.0;
        drive.yards_to_go = 10.0;
        drive.advance(&Outcome::Catch { yards: 12.0 }, 26.665, 42.0);
        assert_eq!(drive.down, 1);
        assert_eq!(drive.yards_to_go, 10.0);
        assert!(drive.is_first_down);
    }

    #[test]
    fn test_goal_to_go_inside_red_zone() {
        let mut drive = Drive::new();
        drive.los = 95.0;
        drive.yards_to_go = 10.0;
        assert!(drive.is_goal_to_go());
    }

    #[test]
    fn test_first_down_inside_five_yard_line_sets_goal_to_go_distance() {
        let mut drive = Drive::new();
        drive.los = 30.0;
        drive.ball_on = 30.0;
        drive.yards_to_go = 10.0;
        drive.advance(&Outcome::Catch { yards: 75.0 }, 26.665, 105.0);
        assert_eq!(drive.los, 105.0);
        assert_eq!(drive.yards_to_go, 5.0);
    }
}
