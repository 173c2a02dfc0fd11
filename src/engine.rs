//! The engine facade: owns one play's `GameState`, the static `Catalog`,
//! and the seeded RNG every probabilistic decision draws from, and drives
//! the tick loop. Spec.md §4.16.
//!
//! `Engine` holds nothing the caller doesn't also get back from
//! `get_game_state` except the RNG and the values captured at the moment
//! of a throw (`PendingThrow`): pressure and accuracy are instantaneous
//! quantities, and the ball's aim point has to be fixed the instant it
//! leaves the quarterback's hand rather than recomputed on arrival.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::blitz;
use crate::catalog::{Catalog, CoverageType, RouteType};
use crate::defense_movement;
use crate::geometry::Vector2D;
use crate::hotroute;
use crate::motion::{self, MotionResponse, MotionType};
use crate::outcome::{self, Outcome};
use crate::personnel;
use crate::player::{CoverageResponsibility, Player, PlayerType, Team, Technique};
use crate::presnap;
use crate::qb::{QbMovementKind, QbMovementState};
use crate::receiver;
use crate::state::{GameState, Phase};
use crate::timing::{Adjustment, AdjustmentKind, AdjustmentState};

/// Modifiers frozen at the instant a throw is made, carried forward to
/// the tick where the ball actually arrives. Not part of `GameState`:
/// these describe an in-flight engine computation, not the play's
/// persistent, serializable shape.
#[derive(Clone, Debug)]
struct PendingThrow {
    receiver_id: String,
    aim_point: Vector2D,
    route_depth: f64,
    qb_accuracy_modifier: f64,
    pressure_modifier: f64,
    route_type_modifier: f64,
}

/// A route's intrinsic difficulty to complete, independent of its depth
/// bucket: quick, horizontal routes are the easiest throws; deep
/// vertical routes the hardest. Multiplies alongside `base_catch_probability`
/// in `outcome::resolve_arrival`.
fn route_type_modifier(route_type: RouteType) -> f64 {
    match route_type {
        RouteType::Slant | RouteType::Drag | RouteType::Flat | RouteType::Hitch | RouteType::Curl => 1.05,
        RouteType::Out | RouteType::In | RouteType::Dig | RouteType::Comeback => 1.0,
        RouteType::Post | RouteType::Corner | RouteType::Seam => 0.92,
        RouteType::Wheel | RouteType::Fade | RouteType::Go => 0.85,
    }
}

/// # `Engine` struct
///
/// The single entry point driving one play at a time: plain `&mut self`
/// methods, no interior mutability and no background threads. The caller
/// owns the clock and drives `tick(dt)` at whatever rate it likes.
#[derive(Debug)]
pub struct Engine {
    state: GameState,
    catalog: Catalog,
    rng: SmallRng,
    pending_throw: Option<PendingThrow>,
}

impl Serialize for Engine {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.state.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Engine {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let state = GameState::deserialize(deserializer)?;
        let seed = state.rng_seed;
        Ok(Engine {
            state,
            catalog: Catalog::standard(),
            rng: SmallRng::seed_from_u64(seed),
            pending_throw: None,
        })
    }
}

impl Engine {
    /// Construct a new free-play engine with the standard catalog, seeded
    /// for reproducibility.
    pub fn new(rng_seed: u64) -> Engine {
        Engine {
            state: GameState::new(rng_seed),
            catalog: Catalog::standard(),
            rng: SmallRng::seed_from_u64(rng_seed),
            pending_throw: None,
        }
    }

    /// Construct a challenge-mode engine: a tighter sack budget, otherwise
    /// identical to [`Engine::new`].
    pub fn new_challenge(rng_seed: u64) -> Engine {
        Engine {
            state: GameState::new_challenge(rng_seed),
            catalog: Catalog::standard(),
            rng: SmallRng::seed_from_u64(rng_seed),
            pending_throw: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// `getGameState()`: a deep clone of the current snapshot.
    pub fn get_game_state(&self) -> GameState {
        self.state.clone()
    }

    pub fn set_play_concept(&mut self, concept_key: &str) -> bool {
        presnap::set_play_concept(&mut self.state, &self.catalog, &mut self.rng, concept_key)
    }

    pub fn set_coverage(&mut self, coverage: CoverageType) -> bool {
        presnap::set_coverage_type(&mut self.state, &self.catalog, &mut self.rng, coverage)
    }

    pub fn set_coverage_by_key(&mut self, coverage_key: &str) -> bool {
        presnap::set_coverage_key(&mut self.state, &self.catalog, &mut self.rng, coverage_key)
    }

    pub fn set_personnel(&mut self, package_key: &str) -> bool {
        presnap::set_personnel(&mut self.state, &self.catalog, &mut self.rng, package_key)
    }

    pub fn update_player_position(&mut self, player_id: &str, position: Vector2D) -> bool {
        presnap::update_player_position(&mut self.state, &self.catalog, &mut self.rng, player_id, position)
    }

    pub fn send_in_motion(&mut self, player_id: &str, motion_type: Option<MotionType>) -> bool {
        presnap::send_in_motion(&mut self.state, player_id, motion_type)
    }

    pub fn set_qb_movement(&mut self, kind: QbMovementKind) -> bool {
        presnap::set_qb_movement(&mut self.state, kind)
    }

    pub fn audible_route(&mut self, player_id: &str, route_key: &str) -> bool {
        presnap::audible_route(&mut self.state, &self.catalog, player_id, route_key)
    }

    /// `snap()`: locks in motion boosts, rolls the blitz decision, starts
    /// the QB's drop/rollout, and hands the ball to the quarterback.
    /// Rejected if a non-jet motion is still in flight, per spec.md §4.7.
    pub fn snap(&mut self) -> bool {
        if self.state.phase != Phase::PreSnap {
            self.state.log("snap rejected: not pre-snap");
            return false;
        }
        if let Some(mover) = self.state.players.iter().find(|p| p.in_motion()) {
            let blocks_snap = mover.motion.as_ref().map(|m| !m.motion_type.snaps_before_completion()).unwrap_or(false);
            if blocks_snap {
                self.state.log("snap rejected: motion still in progress");
                return false;
            }
        }
        let qb_id = match self.state.quarterback() {
            Some(qb) => qb.id.clone(),
            None => {
                self.state.log("snap rejected: no quarterback on the field");
                return false;
            }
        };
        let qb_position = self.state.player(&qb_id).map(|p| p.position).unwrap();

        let boosted_ids: Vec<String> = self
            .state
            .players
            .iter()
            .filter(|p| p.motion.is_some() && !p.has_motion_boost)
            .map(|p| p.id.clone())
            .collect();
        for id in boosted_ids {
            if let Some(player) = self.state.player_mut(&id) {
                player.finish_motion();
                player.grant_motion_boost();
            }
        }

        self.assign_blitz();

        let kind = self.state.qb_movement_kind.unwrap_or(QbMovementKind::FiveStep);
        self.state.qb_movement_kind = Some(kind);
        self.state.qb_movement = Some(QbMovementState::new(kind, qb_position));

        self.state.ball = Ball::held_by(&qb_id, qb_position);
        self.state.elapsed = 0.0;
        self.state.phase = Phase::PostSnap;
        self.state.touch();
        true
    }

    /// Roll whether the defense blitzes this snap and, if so, assign
    /// rushers (capped so at least 5 stay in coverage, spec.md §4.14),
    /// mark them with `Technique::Blitz`, and check for blitz detection.
    fn assign_blitz(&mut self) {
        let coverage = self.state.coverage_type.unwrap_or(CoverageType::Cover3);
        let blitzing = blitz::should_blitz(coverage, &mut self.rng);
        self.state.pressure.is_blitzing = blitzing;
        if !blitzing {
            return;
        }
        let defenders: Vec<(String, PlayerType)> = self.state.defense().map(|d| (d.id.clone(), d.player_type)).collect();
        let total = defenders.len();
        let order = personnel::blitz_suitability_order(&defenders);
        let count = personnel::max_blitzers(total).min(order.len()).min(4);
        if count == 0 {
            return;
        }
        let chosen: Vec<String> = order.into_iter().take(count).collect();
        let rushers = blitz::assign_rushers(&chosen);
        for rusher in &rushers {
            if let Some(defender) = self.state.player_mut(&rusher.defender_id) {
                defender.technique = Some(Technique::Blitz);
                defender.coverage_responsibility =
                    Some(CoverageResponsibility::blitz(&rusher.defender_id, &format!("{:?}", rusher.lane)));
            }
        }
        let detected = hotroute::blitz_detected(rushers.len(), total);
        self.state.pressure.rushers = rushers;
        if detected {
            self.state.pressure.sack_budget = (self.state.pressure.sack_budget - hotroute::BLITZ_DETECTION_SACK_REDUCTION).max(2.0);
            self.state.log("blitz detected pre-snap: hot routes converted");
            self.fire_hot_routes();
        }
    }

    /// Convert every eligible receiver's route to its hot variant (spec.md
    /// §4.13), a one-shot conversion guarded by `hot_routes_fired`.
    fn fire_hot_routes(&mut self) {
        if self.state.pressure.hot_routes_fired {
            return;
        }
        let ids: Vec<String> = self.state.offense().filter(|p| p.is_eligible).map(|p| p.id.clone()).collect();
        for id in ids {
            let current_type = self.state.player(&id).and_then(|p| p.route.as_ref()).map(|r| r.route_type());
            let hot_type = current_type.and_then(hotroute::hot_variant);
            if let Some(hot_type) = hot_type {
                if let Some(new_route) = self.catalog.route_by_type(hot_type) {
                    if let Some(player) = self.state.player_mut(&id) {
                        player.route = Some(new_route);
                        player.route_elapsed = 0.0;
                    }
                }
            }
        }
        self.state.pressure.hot_routes_fired = true;
        self.state.touch();
    }

    /// `tick(dt)`: advance one fixed step. No-op once the play is over.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.state.phase == Phase::PlayOver {
            return false;
        }
        self.state.elapsed += dt;
        match self.state.phase {
            Phase::PreSnap => self.tick_pre_snap(dt),
            Phase::PostSnap => self.tick_post_snap(dt),
            Phase::BallThrown => self.tick_ball_thrown(dt),
            Phase::PlayOver => {}
        }
        self.state.touch();
        true
    }

    /// Advance any in-flight pre-snap motion and the defensive timing
    /// system's overlay on top of defenders' base alignment.
    fn tick_pre_snap(&mut self, dt: f64) {
        let mover_id = self.state.players.iter().find(|p| p.in_motion()).map(|p| p.id.clone());
        if let Some(id) = mover_id {
            let mut completed_at = None;
            if let Some(player) = self.state.player_mut(&id) {
                if let Some(motion) = player.motion.as_mut() {
                    let position = motion.advance(dt);
                    player.position = position;
                    if motion.is_complete() {
                        completed_at = Some(position);
                    }
                }
            }
            if let Some(end_position) = completed_at {
                if let Some(player) = self.state.player_mut(&id) {
                    player.finish_motion();
                }
                self.apply_motion_completion(&id, end_position);
            }
        }
        self.apply_timing_overlay(dt);
    }

    /// Queue the per-coverage defensive response to a completed motion,
    /// per spec.md §4.7. Which defenders move and where depends on the
    /// response kind: the man defender mirrors a `Lock`, the two safeties
    /// swap sides on a rotation, the nearest flat defender buzzes down,
    /// and so on.
    fn apply_motion_completion(&mut self, player_id: &str, motion_end: Vector2D) {
        let crosses = self.state.player(player_id).map(|p| p.motion_crosses_formation()).unwrap_or(false);
        let coverage = self.state.coverage_type.unwrap_or(CoverageType::Cover3);
        let response = motion::coverage_motion_response(coverage, crosses);
        for (defender_id, target) in self.motion_response_targets(response, player_id, motion_end) {
            let adjustment = motion::motion_adjustment(&defender_id, target, response);
            self.state.timing.queue_adjustment(adjustment);
        }
    }

    fn motion_response_targets(&self, response: MotionResponse, motion_player_id: &str, motion_end: Vector2D) -> Vec<(String, Vector2D)> {
        match response {
            MotionResponse::None | MotionResponse::PatternMatch => Vec::new(),
            MotionResponse::Lock => self
                .state
                .defense()
                .filter(|d| d.coverage_responsibility.as_ref().and_then(|r| r.man_target()) == Some(motion_player_id))
                .map(|d| (d.id.clone(), Vector2D::new(motion_end.x, d.position.y)))
                .collect(),
            MotionResponse::RockAndRoll | MotionResponse::SplitField => self
                .state
                .defense()
                .filter(|d| d.player_type == PlayerType::S)
                .map(|d| (d.id.clone(), Vector2D::new(crate::geometry::FIELD_WIDTH - d.position.x, d.position.y)))
                .collect(),
            MotionResponse::Buzz => self
                .state
                .defense()
                .filter(|d| matches!(d.player_type, PlayerType::LB | PlayerType::S))
                .min_by(|a, b| a.position.distance(&motion_end).partial_cmp(&b.position.distance(&motion_end)).unwrap())
                .map(|d| vec![(d.id.clone(), Vector2D::new(motion_end.x, self.state.drive.los - 5.0))])
                .unwrap_or_default(),
            MotionResponse::Robber => self
                .state
                .defense()
                .filter(|d| d.coverage_responsibility.as_ref().map(|r| r.is_robber).unwrap_or(false))
                .map(|d| (d.id.clone(), Vector2D::new(motion_end.x, self.state.drive.los - 8.0)))
                .collect(),
            MotionResponse::MlbAdjust => self
                .state
                .defense()
                .filter(|d| d.player_type == PlayerType::LB)
                .min_by(|a, b| {
                    (a.position.x - crate::geometry::CENTER_X)
                        .abs()
                        .partial_cmp(&(b.position.x - crate::geometry::CENTER_X).abs())
                        .unwrap()
                })
                .map(|d| vec![(d.id.clone(), Vector2D::new(motion_end.x, d.position.y))])
                .unwrap_or_default(),
        }
    }

    /// Advance the defensive timing system and apply its overlay directly
    /// onto defenders currently executing an adjustment.
    fn apply_timing_overlay(&mut self, dt: f64) {
        let positions = self.state.position_snapshot();
        self.state.timing.advance(dt, &positions);
        let defender_ids: Vec<String> = self.state.defense().map(|p| p.id.clone()).collect();
        for id in defender_ids {
            if let Some(overlay) = self.state.timing.adjusted_position(&id) {
                if let Some(player) = self.state.player_mut(&id) {
                    player.position = overlay;
                    player.clamp_to_field();
                }
            }
        }
    }

    /// Advance the quarterback's drop/rollout, receivers' routes, and
    /// defenders' pursuit, then check whether the sack/timeout clock has
    /// expired.
    fn tick_post_snap(&mut self, dt: f64) {
        self.advance_qb_movement(dt);
        self.advance_receiver_routes(dt);
        self.advance_defenders(dt);

        let positions = self.state.position_snapshot();
        self.state.timing.advance(dt, &positions);

        if self.state.pressure.should_auto_fire_hot_routes(self.state.elapsed) {
            self.fire_hot_routes();
        }

        self.check_sack_or_timeout();
    }

    fn advance_qb_movement(&mut self, dt: f64) {
        let qb_id = match self.state.quarterback() {
            Some(qb) => qb.id.clone(),
            None => return,
        };
        let mut movement = match self.state.qb_movement.take() {
            Some(m) => m,
            None => return,
        };
        let position = movement.advance(dt);
        if let Some(qb) = self.state.player_mut(&qb_id) {
            qb.position = position;
        }
        if self.state.ball.carrier.as_deref() == Some(qb_id.as_str()) {
            self.state.ball.position = position;
        }
        if movement.should_trigger_play_action_response() && !movement.defensive_response_triggered {
            movement.mark_defensive_response_triggered();
            self.trigger_play_action_freeze();
        }
        self.state.qb_movement = Some(movement);
    }

    /// Freeze linebackers and safeties for the play-action fake's
    /// duration: queue a `PlayAction` adjustment per defender so
    /// `advance_defenders` knows to drive `defense_movement::play_action_freeze_target`
    /// instead of its normal technique for as long as it's executing.
    /// Linebackers hold for 0.4s (drive-then-recover), safeties for 0.3s
    /// (a flat pause), per spec.md §4.11.
    fn trigger_play_action_freeze(&mut self) {
        let ids: Vec<(String, Vector2D, PlayerType)> = self
            .state
            .defense()
            .filter(|d| matches!(d.player_type, PlayerType::LB | PlayerType::S))
            .map(|d| (d.id.clone(), d.position, d.player_type))
            .collect();
        for (id, position, player_type) in ids {
            let execution_time = if player_type == PlayerType::LB { 0.4 } else { 0.3 };
            let adjustment = Adjustment::new(AdjustmentKind::PlayAction, &id, position, AdjustmentKind::PlayAction.recognition_time(), execution_time);
            self.state.timing.queue_adjustment(adjustment);
        }
    }

    /// Seconds since a defender's `PlayAction` adjustment began executing,
    /// if one is currently in progress.
    fn play_action_elapsed(&self, defender_id: &str) -> Option<f64> {
        self.state.timing.active().find_map(|a| {
            if a.defender_id == defender_id && matches!(a.kind, AdjustmentKind::PlayAction) && matches!(a.state, AdjustmentState::Executing) {
                Some((a.elapsed - a.recognition_time).max(0.0))
            } else {
                None
            }
        })
    }

    fn advance_receiver_routes(&mut self, dt: f64) {
        let ids: Vec<String> = self.state.offense().filter(|p| p.route.is_some() && !p.has_ball).map(|p| p.id.clone()).collect();
        for id in ids {
            if let Some(player) = self.state.player_mut(&id) {
                let lineup = player.lineup_position;
                receiver::advance_route(player, lineup, dt);
                player.clamp_to_field();
            }
        }
    }

    /// Dispatch each defender's per-tick target by technique, unless the
    /// timing system's overlay (or a play-action freeze) takes precedence.
    fn advance_defenders(&mut self, dt: f64) {
        let positions = self.state.position_snapshot();
        let defender_ids: Vec<String> = self.state.defense().map(|p| p.id.clone()).collect();
        for id in defender_ids {
            if let Some(elapsed_since_fake) = self.play_action_elapsed(&id) {
                if let Some(player) = self.state.player_mut(&id) {
                    let player_type = player.player_type;
                    player.position = defense_movement::play_action_freeze_target(player, player_type, elapsed_since_fake);
                    player.clamp_to_field();
                }
                continue;
            }
            if let Some(overlay) = self.state.timing.adjusted_position(&id) {
                if let Some(player) = self.state.player_mut(&id) {
                    player.position = overlay;
                    player.clamp_to_field();
                }
                continue;
            }
            let receiver_position = self
                .state
                .player(&id)
                .and_then(|d| d.coverage_responsibility.as_ref())
                .and_then(|r| r.man_target())
                .and_then(|target_id| positions.get(target_id))
                .copied();
            if let Some(player) = self.state.player_mut(&id) {
                let technique = player.technique.unwrap_or(Technique::Zone);
                let mut off_state = player.off_technique_state;
                let desired = defense_movement::desired_position(player, technique, receiver_position, &mut off_state, dt);
                player.off_technique_state = off_state;
                player.position = desired;
                player.clamp_to_field();
            }
        }
    }

    /// Resolve a sack or timeout once the pressure clock has run out,
    /// scaling the sack's yardage loss with how long the pocket held.
    fn check_sack_or_timeout(&mut self) {
        if self.state.elapsed < self.state.pressure.sack_time() {
            return;
        }
        let loss = (self.state.elapsed - self.state.pressure.pressure_time()).clamp(2.0, 10.0);
        self.apply_outcome(Outcome::Sack { yards: -loss });
    }

    /// `throwTo(id)`: freezes the QB accuracy, pressure, and route-type
    /// modifiers in effect this instant, stores the ball's predicted
    /// catch point, and transitions to `ball-thrown`.
    pub fn throw_to(&mut self, target_id: &str) -> bool {
        if self.state.phase != Phase::PostSnap {
            self.state.log("throwTo rejected: not post-snap");
            return false;
        }
        if self.state.quarterback().is_none() {
            self.state.log("throwTo rejected: no quarterback on the field");
            return false;
        }
        let (receiver_position, receiver_velocity, route_depth, route_type) = match self.state.player(target_id) {
            Some(p) if p.team == Team::Offense && p.is_eligible && p.route.is_some() => {
                let route = p.route.as_ref().unwrap();
                (p.position, p.velocity, route.depth(), Some(route.route_type()))
            }
            _ => {
                self.state.log(format!("throwTo rejected: '{target_id}' is not a valid target"));
                return false;
            }
        };

        let qb_accuracy_modifier = self.state.qb_movement.as_ref().map(|m| m.current_accuracy_modifier()).unwrap_or(1.0);
        let pressure_phase = self.state.pressure.phase_at(self.state.elapsed);
        let (pressure_modifier, _) = blitz::pressure_effect(pressure_phase);
        let route_type_mod = route_type.map(route_type_modifier).unwrap_or(1.0);

        let distance = self.state.ball.position.distance(&receiver_position);
        let lead_time = if crate::geometry::BALL_SPEED > 0.0 { distance / crate::geometry::BALL_SPEED } else { 0.0 };
        let aim_point = receiver_position.add(&receiver_velocity.scale(lead_time));

        self.state.ball.throw_to(target_id, receiver_position, receiver_velocity);

        self.pending_throw = Some(PendingThrow {
            receiver_id: target_id.to_string(),
            aim_point,
            route_depth,
            qb_accuracy_modifier,
            pressure_modifier,
            route_type_modifier: route_type_mod,
        });

        self.state.phase = Phase::BallThrown;
        self.state.touch();
        true
    }

    /// Advance the ball in flight, receivers/defenders still moving, and
    /// resolve the throw once the ball reaches its frozen aim point.
    fn tick_ball_thrown(&mut self, dt: f64) {
        self.advance_receiver_routes(dt);
        self.advance_defenders(dt);
        self.state.ball.advance(dt);

        let positions = self.state.position_snapshot();
        self.state.timing.advance(dt, &positions);

        let pending = match self.pending_throw.clone() {
            Some(p) => p,
            None => return,
        };
        if !self.state.ball.arrived_at(pending.aim_point) {
            return;
        }

        let receiver = match self.state.player(&pending.receiver_id) {
            Some(p) => p.clone(),
            None => {
                self.state.ball.mark_incomplete();
                self.pending_throw = None;
                self.apply_outcome(Outcome::Incomplete);
                return;
            }
        };
        let defenders: Vec<Player> = self.state.defense().cloned().collect();
        let defender_refs: Vec<&Player> = defenders.iter().collect();

        let outcome = outcome::resolve_arrival(
            &receiver,
            pending.aim_point,
            &defender_refs,
            pending.route_depth,
            pending.qb_accuracy_modifier,
            pending.pressure_modifier,
            pending.route_type_modifier,
            self.state.drive.los,
            &mut self.rng,
        );

        match &outcome {
            Outcome::Catch { .. } => self.state.ball.mark_caught(&pending.receiver_id, pending.aim_point),
            Outcome::Interception { defender_id } => self.state.ball.mark_intercepted(defender_id, pending.aim_point),
            _ => self.state.ball.mark_incomplete(),
        }

        self.pending_throw = None;
        self.apply_outcome(outcome);
    }

    /// Reclassify a raw catch/sack as a touchdown/safety if it crosses the
    /// relevant goal line, set the play's outcome, and end the play.
    fn apply_outcome(&mut self, outcome: Outcome) {
        let final_outcome = match outcome {
            Outcome::Catch { yards } => {
                let new_los = self.state.drive.los + yards;
                if new_los >= crate::geometry::FIELD_LENGTH - crate::geometry::END_ZONE_DEPTH {
                    Outcome::Touchdown
                } else {
                    Outcome::Catch { yards }
                }
            }
            Outcome::Sack { yards } => {
                let new_los = self.state.drive.los + yards;
                if new_los <= crate::geometry::END_ZONE_DEPTH {
                    Outcome::Safety
                } else {
                    Outcome::Sack { yards }
                }
            }
            other => other,
        };
        self.state.outcome = Some(final_outcome);
        self.state.phase = Phase::PlayOver;
        self.state.touch();
    }

    /// `resetPlay()`: re-run the same down from scratch.
    pub fn reset_play(&mut self) {
        self.pending_throw = None;
        self.state.reset_play();
    }

    /// `nextPlay()`: advance the drive from the just-finished play's
    /// outcome, then reset for the next snap.
    pub fn next_play(&mut self) {
        let outcome = self.state.outcome.clone().unwrap_or(Outcome::Timeout);
        let ball_end = self.state.ball.position;
        self.state.drive.advance(&outcome, ball_end.x, ball_end.y);
        self.pending_throw = None;
        self.state.reset_play();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_engine() -> Engine {
        let mut engine = Engine::new(7);
        assert!(engine.set_play_concept("slant-flat"));
        assert!(engine.set_coverage(CoverageType::Cover3));
        engine
    }

    #[test]
    fn test_snap_transitions_to_post_snap_and_spots_the_ball() {
        let mut engine = ready_engine();
        assert!(engine.snap());
        let state = engine.get_game_state();
        assert_eq!(state.phase, Phase::PostSnap);
        assert!(matches!(state.ball.state, crate::ball::BallState::Held));
    }

    #[test]
    fn test_snap_rejected_while_non_jet_motion_active() {
        let mut engine = ready_engine();
        assert!(engine.send_in_motion("off-wr2", Some(MotionType::Orbit)));
        assert!(!engine.snap());
    }

    #[test]
    fn test_tick_before_snap_is_a_no_op_on_phase() {
        let mut engine = ready_engine();
        assert!(engine.tick(0.1));
        assert_eq!(engine.get_game_state().phase, Phase::PreSnap);
    }

    #[test]
    fn test_throw_to_transitions_to_ball_thrown_and_eventually_resolves() {
        let mut engine = ready_engine();
        assert!(engine.snap());
        for _ in 0..20 {
            engine.tick(1.0 / 60.0);
        }
        assert!(engine.throw_to("off-wr1"));
        assert_eq!(engine.get_game_state().phase, Phase::BallThrown);

        let mut resolved = false;
        for _ in 0..300 {
            engine.tick(1.0 / 60.0);
            if engine.get_game_state().phase == Phase::PlayOver {
                resolved = true;
                break;
            }
        }
        assert!(resolved);
        assert!(engine.get_game_state().outcome.is_some());
    }

    #[test]
    fn test_reset_play_returns_to_pre_snap_with_roster_intact() {
        let mut engine = ready_engine();
        assert!(engine.snap());
        engine.reset_play();
        let state = engine.get_game_state();
        assert_eq!(state.phase, Phase::PreSnap);
        assert_eq!(state.concept_key.as_deref(), Some("slant-flat"));
    }

    #[test]
    fn test_next_play_advances_the_drive_on_a_completed_catch() {
        let mut engine = ready_engine();
        let before_down = engine.get_game_state().drive.down;
        engine.state.outcome = Some(Outcome::Catch { yards: 12.0 });
        engine.state.ball.position = Vector2D::new(26.665, 37.0);
        engine.next_play();
        let state = engine.get_game_state();
        assert_eq!(state.phase, Phase::PreSnap);
        assert_eq!(state.drive.down, 1);
        assert!(state.drive.los > 25.0);
        let _ = before_down;
    }
}
