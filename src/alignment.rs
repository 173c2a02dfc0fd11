//! Alignment & coverage builder: the defense rebuild pipeline run on every
//! pre-snap change and at the snap. Spec.md §4.5.

use std::collections::HashSet;

use rand::Rng;

use crate::catalog::{Catalog, CoverageType};
use crate::formation::{self, FormationAnalysis, FormationType};
use crate::geometry::{Hash, Vector2D};
use crate::personnel::{self, DefensivePackage};
use crate::player::{CoverageResponsibility, Player, PlayerType, Team};
use crate::zone;

/// Down/distance/field-position context the personnel matcher's
/// situational overrides (spec.md §4.4) need, supplied by the caller
/// (the drive/pre-snap controller) rather than derived here.
#[derive(Clone, Copy, Debug, Default)]
pub struct Situation {
    pub is_red_zone: bool,
    pub is_third_and_short: bool,
    pub is_long_yardage: bool,
    pub is_fourth_and_long: bool,
}

/// The outcome of a defense rebuild: the seven defenders, an optional
/// compatibility warning (spec.md §4.5's `compatibilityWarning`), and any
/// diagnostics logged along the way.
pub struct AlignmentResult {
    pub defenders: Vec<Player>,
    pub compatibility_warning: Option<String>,
    pub diagnostics: Vec<String>,
}

const COVER1_DEPTH: f64 = 14.0;
const COVER1_DEPTH_VS_SPREAD: f64 = 18.0;
const COVER1_ROBBER_DEPTH: f64 = 8.0;
const COVER2_SAFETY_DEPTH: f64 = 18.0;
const SIDELINE_MARGIN: f64 = 9.0;

/// Rebuild the defense from scratch: analyze the offense, pick a
/// compatible package, place the seven defenders, assign responsibilities
/// and overlays, and run zone coordination. This is the entry point for
/// every trigger named in spec.md §4.5 step 0 (`setPlayConcept`,
/// `setCoverage`, `setPersonnel`, drag-drop, motion completion, snap).
pub fn build(
    offense: &[Player],
    coverage: CoverageType,
    los: f64,
    hash: Hash,
    catalog: &Catalog,
    situation: Situation,
    personnel_override: Option<DefensivePackage>,
    rng: &mut impl Rng,
) -> AlignmentResult {
    let mut diagnostics = Vec::new();
    let analysis = formation::analyze(offense, los);

    let package = match personnel_override {
        Some(package) => package,
        None => {
            let base_package = personnel::preferred_package(&analysis.personnel);
            personnel::situational_override(
                base_package,
                situation.is_red_zone,
                situation.is_third_and_short,
                situation.is_long_yardage,
                situation.is_fourth_and_long,
            )
        }
    };

    let mut compatibility_warning = None;
    let coverage_def = catalog.get_coverage(coverage.key());
    let effective_coverage = match &coverage_def {
        Some(def) if !personnel::is_compatible(def, package) => {
            compatibility_warning = Some(format!(
                "coverage '{}' is not compatible with package {:?}; assignments adapted",
                def.key(),
                package
            ));
            coverage
        }
        Some(_) => coverage,
        None => {
            diagnostics.push(format!("unknown coverage key '{}', falling back to cover-3", coverage.key()));
            CoverageType::Cover3
        }
    };

    let mut defenders = spawn_defenders(package);
    place_base_alignment(&mut defenders, effective_coverage, los, hash, &analysis);
    assign_responsibilities(&mut defenders, offense, effective_coverage, &analysis, situation.is_red_zone, rng);
    apply_overlays(&mut defenders, effective_coverage, los);
    apply_formation_shifts(&mut defenders, &analysis);

    let eligible: Vec<&Player> = offense.iter().filter(|p| p.is_eligible).collect();
    zone::apply_deeper_than_deepest(&mut defenders, &eligible);

    if let Err(violation) = validate_invariants(&defenders) {
        diagnostics.push(format!("invariant violation: {violation}; falling back to canonical assignment"));
        defenders = canonical_assignment(package, effective_coverage, los, hash);
    }

    AlignmentResult { defenders, compatibility_warning, diagnostics }
}

/// Spawn seven defender shells at the origin, typed per
/// `generate_defensive_player_types`, with stable ids
/// (`def-cb1`, `def-cb2`, `def-fs`, `def-ss`, `def-lb1`, ...).
fn spawn_defenders(package: DefensivePackage) -> Vec<Player> {
    let types = personnel::generate_defensive_player_types(package);
    let mut cb = 0;
    let mut s = 0;
    let mut lb = 0;
    let mut nb = 0;
    types
        .into_iter()
        .map(|player_type| {
            let id = match player_type {
                PlayerType::CB => {
                    cb += 1;
                    format!("def-cb{cb}")
                }
                PlayerType::S => {
                    s += 1;
                    if s == 1 { "def-fs".to_string() } else { "def-ss".to_string() }
                }
                PlayerType::LB => {
                    lb += 1;
                    format!("def-lb{lb}")
                }
                PlayerType::NB => {
                    nb += 1;
                    "def-nb".to_string()
                }
                _ => unreachable!("generate_defensive_player_types only yields defensive positions"),
            };
            Player::new(&id, Team::Defense, player_type, Vector2D::zero())
        })
        .collect()
}

/// Place each defender's coverage-specific pre-snap base position,
/// per spec.md §4.5 step 4.
fn place_base_alignment(
    defenders: &mut [Player],
    coverage: CoverageType,
    los: f64,
    hash: Hash,
    analysis: &FormationAnalysis,
) {
    let center = crate::geometry::CENTER_X;
    let hash_x = hash.x();
    let is_spread_or_empty = matches!(analysis.formation_type, FormationType::Spread | FormationType::Empty);

    for defender in defenders.iter_mut() {
        defender.position = match (coverage, defender.player_type, defender.id.as_str()) {
            (_, PlayerType::S, "def-fs") if coverage == CoverageType::Cover1 || coverage == CoverageType::Cover2RollToOne => {
                let depth = if is_spread_or_empty { COVER1_DEPTH_VS_SPREAD } else { COVER1_DEPTH };
                Vector2D::new(center, los + depth)
            }
            (_, PlayerType::S, "def-ss") if coverage == CoverageType::Cover1 || coverage == CoverageType::Cover2RollToOne => {
                Vector2D::new(center, los + COVER1_ROBBER_DEPTH)
            }
            (CoverageType::Cover2 | CoverageType::Cover2Invert | CoverageType::Tampa2, PlayerType::S, "def-fs") => {
                let x = (center - crate::geometry::NUMBERS_OFFSET).max(SIDELINE_MARGIN);
                Vector2D::new(x, los + COVER2_SAFETY_DEPTH)
            }
            (CoverageType::Cover2 | CoverageType::Cover2Invert | CoverageType::Tampa2, PlayerType::S, "def-ss") => {
                let x = (center + crate::geometry::NUMBERS_OFFSET).min(crate::geometry::FIELD_WIDTH - SIDELINE_MARGIN);
                Vector2D::new(x, los + COVER2_SAFETY_DEPTH)
            }
            (CoverageType::Cover3, PlayerType::S, "def-fs") => Vector2D::new(center, los + 14.0),
            (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, PlayerType::S, "def-fs") => {
                Vector2D::new(center - crate::geometry::NUMBERS_OFFSET / 2.0, los + 12.0)
            }
            (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, PlayerType::S, "def-ss") => {
                Vector2D::new(center + crate::geometry::NUMBERS_OFFSET / 2.0, los + 12.0)
            }
            (CoverageType::Cover6, PlayerType::S, "def-fs") => Vector2D::new(center - crate::geometry::NUMBERS_OFFSET, los + 14.0),
            (CoverageType::Cover6, PlayerType::S, "def-ss") => Vector2D::new(center + crate::geometry::NUMBERS_OFFSET / 2.0, los + 12.0),
            (CoverageType::Cover0, PlayerType::S, _) => Vector2D::new(hash_x, los + 6.0),
            (_, PlayerType::S, "def-fs") => Vector2D::new(center, los + 12.0),
            (_, PlayerType::S, _) => Vector2D::new(center, los + 8.0),
            (_, PlayerType::CB, id) => {
                let side = if id.ends_with('1') { -1.0 } else { 1.0 };
                let press = matches!(coverage, CoverageType::Cover0 | CoverageType::Cover1);
                let depth = if press { 1.0 } else { 7.0 };
                Vector2D::new(center + side * crate::geometry::NUMBERS_OFFSET, los + depth)
            }
            (_, PlayerType::NB, _) => Vector2D::new(center + hash.x() * 0.0 + 10.0, los + 5.0),
            (_, PlayerType::LB, id) => {
                let idx: f64 = id.chars().last().and_then(|c| c.to_digit(10)).unwrap_or(1) as f64;
                Vector2D::new(center + (idx - 1.0) * 4.0 - 4.0, los + 5.0)
            }
            _ => Vector2D::new(center, los + 5.0),
        };
        defender.lineup_position = defender.position;
    }
}

/// Assign man/zone/blitz/spy responsibilities, per spec.md §4.5 step 5.
/// Man rules sort eligible receivers by x and pair corners to the
/// outermost receivers, the nickel to the slot, linebackers to TE/RB, and
/// safeties to robber/deep-middle duty; unassigned Cover-0 defenders
/// convert to blitz. Zone coverages instead hand every non-blitz defender
/// a landmark-centered zone.
fn assign_responsibilities(
    defenders: &mut [Player],
    offense: &[Player],
    coverage: CoverageType,
    analysis: &FormationAnalysis,
    is_red_zone: bool,
    rng: &mut impl Rng,
) {
    let mut eligible: Vec<&Player> = offense.iter().filter(|p| p.is_eligible).collect();
    eligible.sort_by(|a, b| a.position.x.partial_cmp(&b.position.x).unwrap());

    if is_man_coverage(coverage) {
        let mut used_targets: HashSet<String> = HashSet::new();
        let mut remaining_receivers: Vec<&Player> = eligible.clone();

        let cb_ids: Vec<String> = defenders
            .iter()
            .filter(|d| d.player_type == PlayerType::CB)
            .map(|d| d.id.clone())
            .collect();
        for cb_id in &cb_ids {
            let outer = if remaining_receivers
                .first()
                .map(|r| !used_targets.contains(&r.id))
                .unwrap_or(false)
            {
                remaining_receivers.first()
            } else {
                remaining_receivers.last()
            };
            if let Some(target) = outer.copied() {
                used_targets.insert(target.id.clone());
                if let Some(defender) = defenders.iter_mut().find(|d| &d.id == cb_id) {
                    defender.coverage_responsibility = Some(CoverageResponsibility::man(&defender.id, &target.id));
                }
                remaining_receivers.retain(|r| r.id != target.id);
            }
        }

        if let Some(nb) = defenders.iter().find(|d| d.player_type == PlayerType::NB).map(|d| d.id.clone()) {
            if let Some(slot) = remaining_receivers.first().copied() {
                used_targets.insert(slot.id.clone());
                if let Some(defender) = defenders.iter_mut().find(|d| d.id == nb) {
                    defender.coverage_responsibility = Some(CoverageResponsibility::man(&defender.id, &slot.id));
                }
                remaining_receivers.retain(|r| r.id != slot.id);
            }
        }

        let lb_ids: Vec<String> = defenders
            .iter()
            .filter(|d| d.player_type == PlayerType::LB)
            .map(|d| d.id.clone())
            .collect();
        let backs_and_tes: Vec<&Player> = remaining_receivers
            .iter()
            .filter(|r| matches!(r.player_type, PlayerType::TE | PlayerType::RB | PlayerType::FB))
            .copied()
            .collect();
        for (lb_id, target) in lb_ids.iter().zip(backs_and_tes.iter()) {
            used_targets.insert(target.id.clone());
            if let Some(defender) = defenders.iter_mut().find(|d| &d.id == lb_id) {
                defender.coverage_responsibility = Some(CoverageResponsibility::man(&defender.id, &target.id));
            }
        }
        remaining_receivers.retain(|r| !used_targets.contains(&r.id));

        if coverage == CoverageType::Cover0 {
            for safety_id in defenders
                .iter()
                .filter(|d| d.player_type == PlayerType::S)
                .map(|d| d.id.clone())
                .collect::<Vec<_>>()
            {
                if let Some(target) = remaining_receivers.first().copied() {
                    used_targets.insert(target.id.clone());
                    if let Some(defender) = defenders.iter_mut().find(|d| d.id == safety_id) {
                        defender.coverage_responsibility = Some(CoverageResponsibility::man(&defender.id, &target.id));
                    }
                    remaining_receivers.retain(|r| r.id != target.id);
                }
            }
        } else if let Some(fs) = defenders.iter_mut().find(|d| d.id == "def-fs") {
            fs.coverage_responsibility = Some(CoverageResponsibility::zone(
                "def-fs",
                "deep-middle",
                Vector2D::new(crate::geometry::CENTER_X, fs.position.y),
                30.0,
                20.0,
                zone::red_zone_depth(crate::geometry::DEEP_ZONE_DEPTH, is_red_zone),
            ));
            if let Some(ss) = defenders.iter_mut().find(|d| d.id == "def-ss") {
                ss.coverage_responsibility = Some(CoverageResponsibility {
                    is_robber: true,
                    ..CoverageResponsibility::zone(
                        "def-ss",
                        "robber",
                        Vector2D::new(crate::geometry::CENTER_X, ss.position.y),
                        20.0,
                        16.0,
                        zone::red_zone_depth(8.0, is_red_zone),
                    )
                });
            }
        }

        for defender in defenders.iter_mut() {
            if defender.coverage_responsibility.is_none() && coverage == CoverageType::Cover0 {
                let lane = if rng.gen_bool(0.5) { "edge" } else { "b-gap" };
                defender.coverage_responsibility = Some(CoverageResponsibility::blitz(&defender.id, lane));
            }
        }
    } else {
        assign_zone_responsibilities(defenders, coverage, analysis, is_red_zone);
    }
}

fn is_man_coverage(coverage: CoverageType) -> bool {
    matches!(coverage, CoverageType::Cover0 | CoverageType::Cover1 | CoverageType::Cover2RollToOne)
}

fn assign_zone_responsibilities(
    defenders: &mut [Player],
    coverage: CoverageType,
    analysis: &FormationAnalysis,
    is_red_zone: bool,
) {
    let marks = zone::landmarks();
    let is_bunch = matches!(analysis.formation_type, FormationType::Bunch);
    let is_spread = matches!(analysis.formation_type, FormationType::Spread | FormationType::Empty);

    for defender in defenders.iter_mut() {
        let (zone_name, width, height, depth, is_deep) = match (coverage, defender.player_type, defender.id.as_str()) {
            (CoverageType::Cover3, PlayerType::CB, id) if id.ends_with('1') => ("deep-left", 18.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover3, PlayerType::CB, _) => ("deep-right", 18.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover3, PlayerType::S, "def-fs") => ("deep-middle", 18.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover2 | CoverageType::Cover2Invert, PlayerType::S, "def-fs") => ("deep-left", 26.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover2 | CoverageType::Cover2Invert, PlayerType::S, "def-ss") => ("deep-right", 26.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, PlayerType::S, "def-fs") => ("deep-left-quarter", 13.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, PlayerType::S, "def-ss") => ("deep-right-quarter", 13.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, PlayerType::CB, id) if id.ends_with('1') => ("deep-left-quarter", 13.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, PlayerType::CB, _) => ("deep-right-quarter", 13.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Tampa2, PlayerType::LB, id) if id.ends_with('1') => ("deep-middle", 20.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Tampa2, PlayerType::CB, id) if id.ends_with('1') => ("deep-left", 18.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Tampa2, PlayerType::CB, _) => ("deep-right", 18.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover6, PlayerType::S, "def-fs") => ("deep-left", 26.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (CoverageType::Cover6, PlayerType::S, "def-ss") => ("deep-right-quarter", 13.0, 20.0, crate::geometry::DEEP_ZONE_DEPTH, true),
            (_, PlayerType::CB, id) if id.ends_with('1') => ("flat-left", 10.0, 8.0, 5.0, false),
            (_, PlayerType::CB, _) => ("flat-right", 10.0, 8.0, 5.0, false),
            (_, PlayerType::NB, _) => ("hook-curl", 12.0, 8.0, 10.0, false),
            (_, PlayerType::LB, _) => ("hook-curl", 12.0, 8.0, 8.0, false),
            _ => ("deep-middle", 18.0, 20.0, 14.0, true),
        };

        let base_x = fine_placement_or_default(coverage, zone_name, &marks, defender.position.x);
        let offset = base_x - crate::geometry::CENTER_X;
        let adjusted_x = crate::geometry::CENTER_X + zone::width_adjustment(offset, is_deep, is_bunch, is_spread);
        let center = Vector2D::new(adjusted_x, defender.position.y);
        let depth = zone::red_zone_depth(depth, is_red_zone);
        defender.coverage_responsibility = Some(CoverageResponsibility::zone(&defender.id, zone_name, center, width, height, depth));
    }
}

fn fine_placement_or_default(coverage: CoverageType, zone_name: &str, marks: &zone::Landmarks, default_x: f64) -> f64 {
    zone::fine_placement_x(coverage, zone_name, marks).unwrap_or(default_x)
}

/// Apply bracket/robber/lurk/poach/invert/disguise overlays onto the
/// already-assigned defenders, per spec.md §4.5 step 6.
fn apply_overlays(defenders: &mut [Player], coverage: CoverageType, los: f64) {
    match coverage {
        CoverageType::QuartersPoach => {
            if let Some(ss) = defenders.iter_mut().find(|d| d.id == "def-ss") {
                if let Some(resp) = ss.coverage_responsibility.as_mut() {
                    resp.is_robber = true;
                }
            }
        }
        CoverageType::Cover2Invert => {
            if let (Some(fs_pos), Some(ss_pos)) = (
                defenders.iter().find(|d| d.id == "def-fs").map(|d| d.position),
                defenders.iter().find(|d| d.id == "def-ss").map(|d| d.position),
            ) {
                if let Some(fs) = defenders.iter_mut().find(|d| d.id == "def-fs") {
                    fs.disguise_invert_from(ss_pos);
                }
                if let Some(ss) = defenders.iter_mut().find(|d| d.id == "def-ss") {
                    ss.disguise_invert_from(fs_pos);
                }
            }
        }
        CoverageType::Cover2RollToOne => {
            if let Some(ss) = defenders.iter_mut().find(|d| d.id == "def-ss") {
                let presnap = Vector2D::new(ss.position.x, los + COVER2_SAFETY_DEPTH);
                ss.disguise_presnap = Some(presnap);
            }
        }
        _ => {}
    }
}

/// Apply trips/bunch/spread-specific shifts: weak-corner expansion
/// (`cone`) and bunch underneath contraction are handled by
/// `width_adjustment` inside zone assignment; this pass covers the
/// remaining man-side adjustment, the backside-X solo technique
/// (`trix`) against trips.
fn apply_formation_shifts(defenders: &mut [Player], analysis: &FormationAnalysis) {
    if matches!(analysis.formation_type, FormationType::Trips) {
        if let Some(weak_cb) = defenders
            .iter_mut()
            .find(|d| d.player_type == PlayerType::CB && d.coverage_responsibility.as_ref().map(|r| r.is_man()).unwrap_or(false))
        {
            weak_cb.technique = Some(crate::player::Technique::Off);
        }
    }
}

/// Validate the invariants spec.md §3 requires of a completed alignment:
/// exactly 7 defenders, and no man target assigned to more than one
/// defender.
fn validate_invariants(defenders: &[Player]) -> Result<(), String> {
    if defenders.len() != 7 {
        return Err(format!("expected 7 defenders, found {}", defenders.len()));
    }
    let mut seen = HashSet::new();
    for defender in defenders {
        if let Some(target) = defender.coverage_responsibility.as_ref().and_then(|r| r.man_target()) {
            if !seen.insert(target.to_string()) {
                return Err(format!("duplicate man target '{target}'"));
            }
        }
    }
    Ok(())
}

/// A minimal, always-valid fallback alignment: every defender in a
/// landmark zone, no man assignments to conflict over. Used when
/// `validate_invariants` fails.
fn canonical_assignment(package: DefensivePackage, coverage: CoverageType, los: f64, hash: Hash) -> Vec<Player> {
    let mut defenders = spawn_defenders(package);
    let empty_analysis = FormationAnalysis {
        formation_type: FormationType::Balanced,
        strength: formation::Strength::Balanced,
        receiver_sets: vec![],
        personnel: "11".to_string(),
        widest_left: None,
        widest_right: None,
        slot_receivers: vec![],
        backfield: vec![],
        leverage: Default::default(),
        gaps: vec![],
    };
    place_base_alignment(&mut defenders, coverage, los, hash, &empty_analysis);
    let is_red_zone = los >= 80.0;
    assign_zone_responsibilities(&mut defenders, CoverageType::Cover3, &empty_analysis, is_red_zone);
    defenders
}

/// Compute each defender's leverage against the receiver they're keyed on
/// and mirror it onto the covered receiver's own `leverage`/
/// `coverage_assignment` fields, per spec.md §4.3's `leverageMap`. `build`
/// only sees the offense immutably, so the engine calls this once it has
/// merged a rebuild's defenders back into the full player roster.
pub fn apply_leverage(offense: &mut [Player], defenders: &mut [Player]) {
    let levs = {
        let eligible: Vec<&Player> = offense.iter().filter(|p| p.is_eligible).collect();
        formation::leverage_map(defenders, &eligible)
    };
    for defender in defenders.iter_mut() {
        if let Some(lev) = levs.get(&defender.id) {
            defender.leverage = Some(*lev);
        }
    }
    for receiver in offense.iter_mut() {
        if receiver.is_eligible {
            receiver.leverage = None;
            receiver.coverage_assignment = None;
        }
    }
    for defender in defenders.iter() {
        let target_id = match defender.coverage_responsibility.as_ref().and_then(|r| r.man_target()) {
            Some(id) => id.to_string(),
            None => continue,
        };
        if let Some(receiver) = offense.iter_mut().find(|p| p.id == target_id) {
            receiver.coverage_assignment = Some(defender.id.clone());
            receiver.leverage = defender.leverage;
        }
    }
}

/// Give a defender a disguised pre-snap position that rolls to their real
/// assignment at the snap (Cover 2 Invert swaps the two safeties).
trait DisguiseInvert {
    fn disguise_invert_from(&mut self, other_presnap: Vector2D);
}

impl DisguiseInvert for Player {
    fn disguise_invert_from(&mut self, other_presnap: Vector2D) {
        if let Some(resp) = self.coverage_responsibility.as_mut() {
            resp.disguise_presnap = Some(other_presnap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn offense_for_singleback_11() -> Vec<Player> {
        vec![
            Player::new("off-qb", Team::Offense, PlayerType::QB, Vector2D::new(26.665, 25.0)),
            Player::new("off-rb", Team::Offense, PlayerType::RB, Vector2D::new(26.665, 23.0)),
            Player::new("off-te", Team::Offense, PlayerType::TE, Vector2D::new(34.665, 30.0)),
            Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::new(8.665, 30.0)),
            Player::new("off-wr2", Team::Offense, PlayerType::WR, Vector2D::new(44.665, 30.0)),
            Player::new("off-wr3", Team::Offense, PlayerType::WR, Vector2D::new(14.665, 30.0)),
        ]
    }

    #[test]
    fn test_build_produces_exactly_seven_defenders() {
        let catalog = Catalog::standard();
        let offense = offense_for_singleback_11();
        let mut rng = SmallRng::seed_from_u64(1);
        let result = build(&offense, CoverageType::Cover1, 30.0, Hash::Middle, &catalog, Situation::default(), None, &mut rng);
        assert_eq!(result.defenders.len(), 7);
    }

    #[test]
    fn test_man_coverage_has_no_duplicate_targets() {
        let catalog = Catalog::standard();
        let offense = offense_for_singleback_11();
        let mut rng = SmallRng::seed_from_u64(2);
        let result = build(&offense, CoverageType::Cover1, 30.0, Hash::Middle, &catalog, Situation::default(), None, &mut rng);
        let targets: Vec<&str> = result
            .defenders
            .iter()
            .filter_map(|d| d.coverage_responsibility.as_ref().and_then(|r| r.man_target()))
            .collect();
        let unique: HashSet<&str> = targets.iter().copied().collect();
        assert_eq!(targets.len(), unique.len());
    }

    #[test]
    fn test_cover0_unassigned_defenders_blitz() {
        let catalog = Catalog::standard();
        let offense = offense_for_singleback_11();
        let mut rng = SmallRng::seed_from_u64(3);
        let result = build(&offense, CoverageType::Cover0, 30.0, Hash::Middle, &catalog, Situation::default(), None, &mut rng);
        assert!(result.defenders.iter().any(|d| d.coverage_responsibility.as_ref().map(|r| r.is_blitz()).unwrap_or(false)));
    }

    #[test]
    fn test_zone_coverage_keeps_defenders_in_bounds() {
        let catalog = Catalog::standard();
        let offense = offense_for_singleback_11();
        let mut rng = SmallRng::seed_from_u64(4);
        let result = build(&offense, CoverageType::Cover3, 30.0, Hash::Middle, &catalog, Situation::default(), None, &mut rng);
        for defender in &result.defenders {
            assert!(defender.position.x >= 0.0 && defender.position.x <= crate::geometry::FIELD_WIDTH);
        }
    }

    #[test]
    fn test_red_zone_compresses_assigned_zone_depth() {
        let catalog = Catalog::standard();
        let offense = offense_for_singleback_11();
        let open_field = Situation { is_red_zone: false, ..Situation::default() };
        let red_zone = Situation { is_red_zone: true, ..Situation::default() };

        let mut rng = SmallRng::seed_from_u64(5);
        let open = build(&offense, CoverageType::Cover3, 30.0, Hash::Middle, &catalog, open_field, None, &mut rng);
        let mut rng = SmallRng::seed_from_u64(5);
        let compressed = build(&offense, CoverageType::Cover3, 95.0, Hash::Middle, &catalog, red_zone, None, &mut rng);

        let depth_of = |defenders: &[Player], id: &str| {
            defenders
                .iter()
                .find(|d| d.id == id)
                .and_then(|d| d.coverage_responsibility.as_ref())
                .and_then(|r| match &r.kind {
                    crate::player::CoverageResponsibilityKind::Zone { depth, .. } => Some(*depth),
                    _ => None,
                })
                .unwrap()
        };
        let open_depth = depth_of(&open.defenders, "def-fs");
        let compressed_depth = depth_of(&compressed.defenders, "def-fs");
        assert!((compressed_depth - open_depth * 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_apply_leverage_mirrors_man_defenders_onto_their_receiver() {
        let catalog = Catalog::standard();
        let mut offense = offense_for_singleback_11();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut result =
            build(&offense, CoverageType::Cover1, 30.0, Hash::Middle, &catalog, Situation::default(), None, &mut rng);
        apply_leverage(&mut offense, &mut result.defenders);

        let man_defender = result
            .defenders
            .iter()
            .find(|d| d.coverage_responsibility.as_ref().map(|r| r.is_man()).unwrap_or(false))
            .unwrap();
        assert!(man_defender.leverage.is_some());
        let target_id = man_defender.coverage_responsibility.as_ref().unwrap().man_target().unwrap();
        let receiver = offense.iter().find(|p| p.id == target_id).unwrap();
        assert_eq!(receiver.coverage_assignment.as_deref(), Some(man_defender.id.as_str()));
        assert_eq!(receiver.leverage, man_defender.leverage);
    }
}
