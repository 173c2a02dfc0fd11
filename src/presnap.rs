//! Pre-snap controller: every user-facing command that can still change
//! the offense, coverage, or personnel before the snap. Spec.md §4.8.
//!
//! Each command follows the same shape: validate against the current
//! phase and the requested change, mutate the relevant `GameState` field,
//! then re-invoke the alignment builder and enqueue a matching defensive
//! adjustment. Illegal commands are rejected with `false` and a
//! diagnostic, never a panic.

use std::collections::HashMap;

use rand::Rng;

use crate::alignment::{self, Situation};
use crate::catalog::formation::FormationDef;
use crate::catalog::{Catalog, CoverageType, RouteDef};
use crate::geometry::{Vector2D, CENTER_X};
use crate::motion::{self, MotionType};
use crate::personnel::DefensivePackage;
use crate::player::{Player, PlayerType, Team};
use crate::qb::QbMovementKind;
use crate::state::{GameState, Phase};
use crate::timing::{Adjustment, AdjustmentKind};

/// Execution time given to a pre-snap rebuild's bookkeeping adjustment.
/// Unlike a motion response, a rebuild commits the new position
/// synchronously (`alignment::build` already placed the defender there),
/// so this entry exists for recognition-timer diagnostics rather than to
/// drive a visible interpolation.
const PRESNAP_ADJUSTMENT_EXECUTION_TIME: f64 = 0.3;

fn situation(state: &GameState) -> Situation {
    let los = state.drive.los;
    Situation {
        is_red_zone: los >= 80.0,
        is_third_and_short: state.drive.down == 3 && state.drive.yards_to_go <= 2.0,
        is_long_yardage: state.drive.yards_to_go >= 8.0,
        is_fourth_and_long: state.drive.down == 4 && state.drive.yards_to_go >= 5.0,
    }
}

/// Build the offense's eleven-yard-line shell from a formation and
/// (optional) concept: each slot's relative offset becomes an absolute
/// field position anchored on the center and the line of scrimmage, and
/// the concept's per-player route assignment is looked up in the catalog.
fn build_offense(formation: &FormationDef, concept: Option<&crate::catalog::ConceptDef>, catalog: &Catalog, los: f64) -> Vec<Player> {
    formation
        .slots()
        .iter()
        .map(|slot| {
            let position = Vector2D::new(CENTER_X + slot.offset.x, los + slot.offset.y);
            let mut player = Player::new(&slot.player_id, Team::Offense, slot.player_type, position);
            if let Some(concept) = concept {
                if let Some(route_key) = concept.route_for(&slot.player_id) {
                    player.route = catalog.get_route(route_key);
                }
            }
            player
        })
        .collect()
}

/// Re-run the alignment/coverage builder from the current
/// `formation_key`/`concept_key`/`coverage_type`/`personnel_package`,
/// preserving any offensive players' manually dragged positions and
/// audibled routes, then queue a defensive adjustment of `kind` for every
/// resulting defender. Called after every pre-snap command that can
/// change what the defense is lined up against, per spec.md §4.8 steps
/// 2-4.
pub(crate) fn rebuild_alignment(state: &mut GameState, catalog: &Catalog, rng: &mut impl Rng, kind: AdjustmentKind) -> bool {
    let formation_key = match state.formation_key.clone() {
        Some(key) => key,
        None => {
            state.log("alignment rebuild skipped: no formation selected");
            return false;
        }
    };
    let formation = match catalog.get_formation(&formation_key) {
        Some(f) => f,
        None => {
            state.log(format!("alignment rebuild rejected: unknown formation '{formation_key}'"));
            return false;
        }
    };
    let concept = state.concept_key.as_ref().and_then(|key| catalog.get_concept(key));
    let los = state.drive.los;

    let previous_positions: HashMap<String, Vector2D> = state.offense().map(|p| (p.id.clone(), p.position)).collect();
    let previous_routes: HashMap<String, Option<RouteDef>> = state.offense().map(|p| (p.id.clone(), p.route.clone())).collect();

    let mut offense = build_offense(&formation, concept.as_ref(), catalog, los);
    for player in offense.iter_mut() {
        if let Some(position) = previous_positions.get(&player.id) {
            player.position = *position;
            player.lineup_position = *position;
        }
        if let Some(route) = previous_routes.get(&player.id) {
            player.route = route.clone();
        }
    }

    let coverage = state.coverage_type.unwrap_or(CoverageType::Cover3);
    let personnel_override = state.personnel_package.as_deref().and_then(DefensivePackage::from_key);
    let result = alignment::build(&offense, coverage, los, state.drive.hash, catalog, situation(state), personnel_override, rng);

    state.compatibility_warning = result.compatibility_warning;
    for diagnostic in result.diagnostics {
        state.diagnostics.push(diagnostic);
    }

    let mut defenders = result.defenders;
    alignment::apply_leverage(&mut offense, &mut defenders);
    let defender_targets: Vec<(String, Vector2D)> = defenders.iter().map(|d| (d.id.clone(), d.position)).collect();

    state.players.clear();
    state.players.extend(offense);
    state.players.extend(defenders);

    for (defender_id, target) in defender_targets {
        let adjustment = Adjustment::new(kind, &defender_id, target, kind.recognition_time(), PRESNAP_ADJUSTMENT_EXECUTION_TIME);
        state.timing.queue_adjustment(adjustment);
    }

    state.touch();
    true
}

/// `setPlayConcept(def)`: pre-snap only, selects both the concept and the
/// formation it is run from, then rebuilds the defense.
pub fn set_play_concept(state: &mut GameState, catalog: &Catalog, rng: &mut impl Rng, concept_key: &str) -> bool {
    if state.phase != Phase::PreSnap {
        state.log("setPlayConcept rejected: not pre-snap");
        return false;
    }
    let concept = match catalog.get_concept(concept_key) {
        Some(concept) => concept,
        None => {
            state.log(format!("setPlayConcept rejected: unknown concept '{concept_key}'"));
            return false;
        }
    };
    if catalog.get_formation(concept.formation_key()).is_none() {
        state.log(format!(
            "setPlayConcept rejected: concept '{concept_key}' references unknown formation '{}'",
            concept.formation_key()
        ));
        return false;
    }
    state.formation_key = Some(concept.formation_key().to_string());
    state.concept_key = Some(concept.key().to_string());
    rebuild_alignment(state, catalog, rng, AdjustmentKind::Formation)
}

/// `setCoverage(type)`: pre-snap only.
pub fn set_coverage_type(state: &mut GameState, catalog: &Catalog, rng: &mut impl Rng, coverage: CoverageType) -> bool {
    if state.phase != Phase::PreSnap {
        state.log("setCoverage rejected: not pre-snap");
        return false;
    }
    state.coverage_type = Some(coverage);
    rebuild_alignment(state, catalog, rng, AdjustmentKind::Coverage)
}

/// `setCoverage(def)`: looks the coverage up by catalog key first.
pub fn set_coverage_key(state: &mut GameState, catalog: &Catalog, rng: &mut impl Rng, coverage_key: &str) -> bool {
    let coverage_type = match catalog.get_coverage(coverage_key) {
        Some(def) => def.coverage_type(),
        None => {
            state.log(format!("setCoverage rejected: unknown coverage key '{coverage_key}'"));
            return false;
        }
    };
    set_coverage_type(state, catalog, rng, coverage_type)
}

/// `setPersonnel(pkg)`: pre-snap only, overrides the package the
/// alignment builder would otherwise infer from the offense's personnel.
pub fn set_personnel(state: &mut GameState, catalog: &Catalog, rng: &mut impl Rng, package_key: &str) -> bool {
    if state.phase != Phase::PreSnap {
        state.log("setPersonnel rejected: not pre-snap");
        return false;
    }
    if DefensivePackage::from_key(package_key).is_none() {
        state.log(format!("setPersonnel rejected: unknown package '{package_key}'"));
        return false;
    }
    state.personnel_package = Some(package_key.to_string());
    rebuild_alignment(state, catalog, rng, AdjustmentKind::Formation)
}

/// `updatePlayerPosition(id, pos)`: drag-drop an eligible offensive
/// player, clamped to the field. Rejects moving the quarterback ahead of
/// the line of scrimmage, moving the quarterback at all (the snapper's
/// depth is fixed by the formation), or moving a player currently in
/// motion.
pub fn update_player_position(
    state: &mut GameState,
    catalog: &Catalog,
    rng: &mut impl Rng,
    player_id: &str,
    position: Vector2D,
) -> bool {
    if state.phase != Phase::PreSnap {
        state.log("updatePlayerPosition rejected: not pre-snap");
        return false;
    }
    let los = state.drive.los;
    let clamped = position.clamp_to_field();
    let player = match state.player(player_id) {
        Some(p) => p,
        None => {
            state.log(format!("updatePlayerPosition rejected: unknown player '{player_id}'"));
            return false;
        }
    };
    if player.team != Team::Offense {
        state.log(format!("updatePlayerPosition rejected: '{player_id}' is not on offense"));
        return false;
    }
    if player.player_type == PlayerType::QB {
        state.log("updatePlayerPosition rejected: the quarterback's depth is fixed by the formation");
        return false;
    }
    if player.in_motion() {
        state.log(format!("updatePlayerPosition rejected: '{player_id}' is in motion"));
        return false;
    }
    if clamped.y > los {
        state.log(format!("updatePlayerPosition rejected: '{player_id}' cannot line up ahead of the line of scrimmage"));
        return false;
    }

    if let Some(player) = state.player_mut(player_id) {
        player.position = clamped;
        player.lineup_position = clamped;
    }
    rebuild_alignment(state, catalog, rng, AdjustmentKind::Formation)
}

/// `sendInMotion(id, type?)`: pre-snap only, at most one player in motion
/// at a time (spec.md invariant 7).
pub fn send_in_motion(state: &mut GameState, player_id: &str, motion_type: Option<MotionType>) -> bool {
    if state.phase != Phase::PreSnap {
        state.log("sendInMotion rejected: not pre-snap");
        return false;
    }
    let already_in_motion = state.offense().any(|p| p.in_motion());
    let qb_position = match state.quarterback() {
        Some(qb) => qb.position,
        None => {
            state.log("sendInMotion rejected: no quarterback on the field");
            return false;
        }
    };
    let start = match state.player(player_id) {
        Some(p) if p.team == Team::Offense && p.player_type != PlayerType::QB => p.position,
        _ => {
            state.log(format!("sendInMotion rejected: '{player_id}' cannot go in motion"));
            return false;
        }
    };
    let motion_type = motion_type.unwrap_or(MotionType::Jet);
    match motion::send_in_motion(already_in_motion, motion_type, player_id, start, qb_position) {
        Some(motion) => {
            if let Some(player) = state.player_mut(player_id) {
                player.start_motion(motion_type, motion);
            }
            state.touch();
            true
        }
        None => {
            state.log("sendInMotion rejected: a motion is already active");
            false
        }
    }
}

/// `setQBMovement(kind)`: pre-snap only, chooses the drop/rollout scheme
/// that `snap()` builds into a [`crate::qb::QbMovementState`].
pub fn set_qb_movement(state: &mut GameState, kind: QbMovementKind) -> bool {
    if state.phase != Phase::PreSnap {
        state.log("setQbMovement rejected: not pre-snap");
        return false;
    }
    state.qb_movement_kind = Some(kind);
    state.touch();
    true
}

/// `audibleRoute(playerId, routeType)`: allowed pre-snap or in the first
/// moments post-snap, honoring `maxAudibles`.
pub fn audible_route(state: &mut GameState, catalog: &Catalog, player_id: &str, route_key: &str) -> bool {
    if !matches!(state.phase, Phase::PreSnap | Phase::PostSnap) {
        state.log("audibleRoute rejected: play is no longer live");
        return false;
    }
    if state.audibles_used >= state.max_audibles {
        state.log("audibleRoute rejected: max audibles reached");
        return false;
    }
    let route = match catalog.get_route(route_key) {
        Some(route) => route,
        None => {
            state.log(format!("audibleRoute rejected: unknown route '{route_key}'"));
            return false;
        }
    };
    match state.player_mut(player_id) {
        Some(player) if player.team == Team::Offense && player.is_eligible => {
            player.route = Some(route);
            player.route_elapsed = 0.0;
        }
        _ => {
            state.log(format!("audibleRoute rejected: '{player_id}' is not an eligible receiver"));
            return false;
        }
    }
    state.audibles_used += 1;
    state.touch();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn ready_state() -> (GameState, Catalog, SmallRng) {
        (GameState::new(1), Catalog::standard(), SmallRng::seed_from_u64(1))
    }

    #[test]
    fn test_set_play_concept_populates_offense_and_defense() {
        let (mut state, catalog, mut rng) = ready_state();
        assert!(set_play_concept(&mut state, &catalog, &mut rng, "slant-flat"));
        assert_eq!(state.offense().count(), 6);
        assert_eq!(state.defense().count(), 7);
    }

    #[test]
    fn test_set_play_concept_rejects_unknown_concept() {
        let (mut state, catalog, mut rng) = ready_state();
        assert!(!set_play_concept(&mut state, &catalog, &mut rng, "does-not-exist"));
        assert!(!state.diagnostics.is_empty());
    }

    #[test]
    fn test_update_player_position_rejects_qb_past_los() {
        let (mut state, catalog, mut rng) = ready_state();
        set_play_concept(&mut state, &catalog, &mut rng, "slant-flat");
        let los = state.drive.los;
        assert!(!update_player_position(&mut state, &catalog, &mut rng, "off-qb", Vector2D::new(CENTER_X, los + 5.0)));
    }

    #[test]
    fn test_update_player_position_moves_eligible_receiver() {
        let (mut state, catalog, mut rng) = ready_state();
        set_play_concept(&mut state, &catalog, &mut rng, "slant-flat");
        let target = Vector2D::new(5.0, state.drive.los);
        assert!(update_player_position(&mut state, &catalog, &mut rng, "off-wr1", target));
        assert_eq!(state.player("off-wr1").unwrap().position, target);
    }

    #[test]
    fn test_send_in_motion_rejects_second_concurrent_motion() {
        let (mut state, catalog, mut rng) = ready_state();
        set_play_concept(&mut state, &catalog, &mut rng, "slant-flat");
        assert!(send_in_motion(&mut state, "off-wr1", None));
        assert!(!send_in_motion(&mut state, "off-wr2", None));
    }

    #[test]
    fn test_audible_route_honors_max_audibles() {
        let (mut state, catalog, mut rng) = ready_state();
        set_play_concept(&mut state, &catalog, &mut rng, "slant-flat");
        state.max_audibles = 1;
        assert!(audible_route(&mut state, &catalog, "off-wr1", "go"));
        assert!(!audible_route(&mut state, &catalog, "off-wr2", "go"));
    }

    #[test]
    fn test_commands_rejected_outside_pre_snap() {
        let (mut state, catalog, mut rng) = ready_state();
        set_play_concept(&mut state, &catalog, &mut rng, "slant-flat");
        state.phase = Phase::PostSnap;
        assert!(!set_coverage_type(&mut state, &catalog, &mut rng, CoverageType::Cover1));
        assert!(!send_in_motion(&mut state, "off-wr1", None));
    }
}
