#![doc = "Player entity shared by formation, alignment, movement and outcome components."]
use serde::{Deserialize, Serialize};

use crate::catalog::route::RouteDef;
use crate::defense_movement::OffTechniqueState;
use crate::geometry::Vector2D;
use crate::motion::{Motion, MotionType};

/// Which side of the ball a player lines up on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Team {
    Offense,
    Defense,
}

/// # `PlayerType` enum
///
/// The position a player lines up at. Offensive positions are
/// `QB, RB, WR, TE, FB`; defensive positions are `CB, S, LB, NB`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    QB,
    RB,
    WR,
    TE,
    FB,
    CB,
    S,
    LB,
    NB,
}

impl PlayerType {
    /// Whether this position lines up on offense.
    pub fn is_offense(&self) -> bool {
        matches!(self, PlayerType::QB | PlayerType::RB | PlayerType::WR | PlayerType::TE | PlayerType::FB)
    }

    /// Base max speed, in yards/sec, before star or motion-boost
    /// multipliers, per spec.md §4.5 step 3.
    pub fn base_max_speed(&self) -> f64 {
        match self {
            PlayerType::WR => 9.3,
            PlayerType::CB | PlayerType::NB => 9.1,
            PlayerType::RB => 9.0,
            PlayerType::FB | PlayerType::TE => 8.6,
            PlayerType::S => 8.8,
            PlayerType::LB => 8.3,
            PlayerType::QB => 8.2,
        }
    }
}

/// Horizontal positioning of a defender relative to the receiver they are
/// keying on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Leverage {
    Inside,
    Outside,
    HeadUp,
}

/// The kind of coverage duty a defender has been assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CoverageResponsibilityKind {
    /// Man coverage on a specific offensive player.
    Man { target_id: String },
    /// Zone coverage of a named landmark region.
    Zone {
        name: String,
        center: Vector2D,
        width: f64,
        height: f64,
        depth: f64,
    },
    /// Spying a mobile quarterback rather than covering a receiver.
    Spy,
    /// Rushing the passer.
    Blitz { lane: String },
}

/// # `CoverageResponsibility` struct
///
/// A defender's assigned coverage duty, plus the overlay rules (bracket,
/// robber/lurk, disguise, poach/invert) spec.md §3 extends it with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageResponsibility {
    pub defender_id: String,
    pub kind: CoverageResponsibilityKind,
    /// Bracket partner, if this defender shares a receiver with another.
    pub bracket_partner_id: Option<String>,
    /// Depth past the LOS at which a bracket partner should trigger.
    pub bracket_trigger_depth: Option<f64>,
    /// Whether this defender is playing a robber/lurk technique (reading
    /// QB eyes from an underneath hole rather than a fixed landmark).
    pub is_robber: bool,
    /// Pre-snap alignment position for a disguised coverage, rolled to the
    /// defender's actual post-snap position at the snap.
    pub disguise_presnap: Option<Vector2D>,
}

impl CoverageResponsibility {
    pub fn man(defender_id: &str, target_id: &str) -> CoverageResponsibility {
        CoverageResponsibility {
            defender_id: defender_id.to_string(),
            kind: CoverageResponsibilityKind::Man { target_id: target_id.to_string() },
            bracket_partner_id: None,
            bracket_trigger_depth: None,
            is_robber: false,
            disguise_presnap: None,
        }
    }

    pub fn zone(defender_id: &str, name: &str, center: Vector2D, width: f64, height: f64, depth: f64) -> CoverageResponsibility {
        CoverageResponsibility {
            defender_id: defender_id.to_string(),
            kind: CoverageResponsibilityKind::Zone {
                name: name.to_string(),
                center,
                width,
                height,
                depth,
            },
            bracket_partner_id: None,
            bracket_trigger_depth: None,
            is_robber: false,
            disguise_presnap: None,
        }
    }

    pub fn blitz(defender_id: &str, lane: &str) -> CoverageResponsibility {
        CoverageResponsibility {
            defender_id: defender_id.to_string(),
            kind: CoverageResponsibilityKind::Blitz { lane: lane.to_string() },
            bracket_partner_id: None,
            bracket_trigger_depth: None,
            is_robber: false,
            disguise_presnap: None,
        }
    }

    pub fn spy(defender_id: &str) -> CoverageResponsibility {
        CoverageResponsibility {
            defender_id: defender_id.to_string(),
            kind: CoverageResponsibilityKind::Spy,
            bracket_partner_id: None,
            bracket_trigger_depth: None,
            is_robber: false,
            disguise_presnap: None,
        }
    }

    pub fn is_man(&self) -> bool {
        matches!(self.kind, CoverageResponsibilityKind::Man { .. })
    }

    pub fn is_blitz(&self) -> bool {
        matches!(self.kind, CoverageResponsibilityKind::Blitz { .. })
    }

    pub fn man_target(&self) -> Option<&str> {
        match &self.kind {
            CoverageResponsibilityKind::Man { target_id } => Some(target_id.as_str()),
            _ => None,
        }
    }
}

/// Defensive man-coverage technique, spec.md §4.11 / glossary.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Technique {
    Press,
    Off,
    Bail,
    Trail,
    Zone,
    Blitz,
}

/// # `Player` struct
///
/// A `Player` is one of the eleven to fourteen participants on the field:
/// identity, kinematics, attributes, motion state and assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub team: Team,
    pub player_type: PlayerType,

    pub position: Vector2D,
    pub velocity: Vector2D,
    pub current_speed: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub is_accelerating: bool,
    pub is_decelerating: bool,
    pub is_backpedaling: bool,

    pub is_star: bool,
    pub is_eligible: bool,
    pub is_blocking: bool,
    pub is_blocked: bool,
    pub has_ball: bool,

    pub has_motion: bool,
    pub motion: Option<Motion>,
    pub has_motion_boost: bool,
    pub motion_boost_remaining: f64,
    /// Multiplier applied on top of `max_speed` while a motion or star
    /// boost is active, kept separate from `max_speed` itself so base
    /// speeds remain immutable (spec.md §9 open question).
    pub speed_multiplier: f64,

    pub route: Option<RouteDef>,
    pub route_elapsed: f64,
    pub coverage_responsibility: Option<CoverageResponsibility>,
    pub coverage_assignment: Option<String>,

    pub leverage: Option<Leverage>,
    pub technique: Option<Technique>,
    pub lineup_position: Vector2D,

    /// Backpedal/hip-flip transition state for a defender currently
    /// playing `Off` technique, carried between ticks.
    pub off_technique_state: OffTechniqueState,
}

impl Player {
    /// Construct a new player at a lineup position, with default
    /// kinematics and no assignment.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::player::{Player, Team, PlayerType};
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let qb = Player::new("off-qb", Team::Offense, PlayerType::QB, Vector2D::new(26.665, 30.0));
    /// assert_eq!(qb.max_speed, PlayerType::QB.base_max_speed());
    /// ```
    pub fn new(id: &str, team: Team, player_type: PlayerType, position: Vector2D) -> Player {
        let is_eligible = matches!(
            player_type,
            PlayerType::WR | PlayerType::TE | PlayerType::RB | PlayerType::FB
        );
        Player {
            id: id.to_string(),
            team,
            player_type,
            position,
            velocity: Vector2D::zero(),
            current_speed: 0.0,
            max_speed: player_type.base_max_speed(),
            acceleration: 10.0,
            is_accelerating: false,
            is_decelerating: false,
            is_backpedaling: false,
            is_star: false,
            is_eligible,
            is_blocking: false,
            is_blocked: false,
            has_ball: false,
            has_motion: false,
            motion: None,
            has_motion_boost: false,
            motion_boost_remaining: 0.0,
            speed_multiplier: 1.0,
            route: None,
            route_elapsed: 0.0,
            coverage_responsibility: None,
            coverage_assignment: None,
            leverage: None,
            technique: None,
            lineup_position: position,
            off_technique_state: OffTechniqueState::default(),
        }
    }

    /// Effective max speed: base max speed scaled by the star boost
    /// (+10%) and any active `speed_multiplier` (motion boost).
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::player::{Player, Team, PlayerType};
    /// use gridiron_core::geometry::Vector2D;
    ///
    /// let mut wr = Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::zero());
    /// wr.is_star = true;
    /// assert!((wr.effective_max_speed() - wr.max_speed * 1.10).abs() < 1e-9);
    /// ```
    pub fn effective_max_speed(&self) -> f64 {
        let star = if self.is_star { 1.10 } else { 1.0 };
        self.max_speed * star * self.speed_multiplier
    }

    /// Whether this player is in active pre-snap motion.
    pub fn in_motion(&self) -> bool {
        self.has_motion && self.motion.is_some()
    }

    /// Whether this player's motion path crosses the formation's
    /// longitudinal center (spec.md §4.7).
    pub fn motion_crosses_formation(&self) -> bool {
        self.motion
            .as_ref()
            .map(|m| m.crosses_formation())
            .unwrap_or(false)
    }

    /// Begin a motion at the given type and path.
    pub fn start_motion(&mut self, motion_type: MotionType, motion: Motion) {
        self.has_motion = true;
        self.motion = Some(motion);
        let _ = motion_type;
    }

    /// Complete an in-flight motion: clears `has_motion`, retains the
    /// motion record for `crosses_formation` lookups until the snap grants
    /// the boost, at which point the caller should call
    /// `grant_motion_boost`.
    pub fn finish_motion(&mut self) {
        self.has_motion = false;
    }

    /// Grant the post-snap motion speed boost: +9% for 0.35s with a 0.1s
    /// fade, per spec.md §3.
    pub fn grant_motion_boost(&mut self) {
        self.has_motion_boost = true;
        self.motion_boost_remaining = 0.35;
    }

    /// Advance the motion boost countdown by `dt` seconds, fading the
    /// multiplier out over the final 0.1s.
    pub fn tick_motion_boost(&mut self, dt: f64) {
        if !self.has_motion_boost {
            self.speed_multiplier = 1.0;
            return;
        }
        self.motion_boost_remaining -= dt;
        if self.motion_boost_remaining <= 0.0 {
            self.has_motion_boost = false;
            self.motion_boost_remaining = 0.0;
            self.speed_multiplier = 1.0;
            return;
        }
        const FADE_WINDOW: f64 = 0.1;
        self.speed_multiplier = if self.motion_boost_remaining < FADE_WINDOW {
            1.0 + 0.09 * (self.motion_boost_remaining / FADE_WINDOW)
        } else {
            1.09
        };
    }

    /// Clamp the player's position to the field rectangle and zero out any
    /// velocity component that would carry it back out of bounds, called
    /// at the end of every tick's movement update.
    pub fn clamp_to_field(&mut self) {
        self.position = self.position.clamp_to_field();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let p = Player::new("def-cb1", Team::Defense, PlayerType::CB, Vector2D::zero());
        assert!(!p.is_eligible);
        assert_eq!(p.max_speed, PlayerType::CB.base_max_speed());
    }

    #[test]
    fn test_motion_boost_fades_to_one() {
        let mut p = Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::zero());
        p.grant_motion_boost();
        p.tick_motion_boost(0.3);
        assert!(p.speed_multiplier > 1.0);
        p.tick_motion_boost(0.10);
        assert_eq!(p.speed_multiplier, 1.0);
        assert!(!p.has_motion_boost);
    }

    #[test]
    fn test_effective_max_speed_never_exceeds_bounds() {
        let mut p = Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::zero());
        p.is_star = true;
        p.grant_motion_boost();
        let eff = p.effective_max_speed();
        assert!(eff <= p.max_speed * 1.10 * 1.09 + 1e-9);
    }
}
