//! Formation analyzer: classifies the offense's pre-snap alignment.
//! Spec.md §4.3.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::CENTER_X;
use crate::player::{Leverage, Player, PlayerType, Team};

/// # `FormationType` enum
///
/// The offensive alignment classification, decided by the ordered test in
/// spec.md §4.3: bunch set present, else trips set, else no backs (empty),
/// else 4+ WR (spread), else heavy personnel, else two aligned backs
/// (i-form), else TE/RB same side (strong), else balanced.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FormationType {
    Trips,
    Bunch,
    Spread,
    Empty,
    Heavy,
    IForm,
    Strong,
    Balanced,
}

/// # `Strength` enum
///
/// Which side of the formation carries more weight, per spec.md §4.3's
/// ordered test: 3+ receivers one side, else TE side, else more receivers
/// one side, else offset back, else balanced.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Strength {
    Left,
    Right,
    Balanced,
}

/// A receiver grouping detected within the formation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ReceiverSet {
    Trips,
    Bunch,
    Stack,
    Spread,
    Twins,
    Balanced,
}

/// Offensive line gaps a given side presents, always A/B/C, plus D when a
/// tight end is attached.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Gap {
    A,
    B,
    C,
    D,
}

/// # `FormationAnalysis` struct
///
/// The output of the formation analyzer: everything downstream components
/// (personnel matcher, alignment/coverage builder, zone coordination)
/// need to know about the current offensive alignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormationAnalysis {
    pub formation_type: FormationType,
    pub strength: Strength,
    pub receiver_sets: Vec<ReceiverSet>,
    pub personnel: String,
    pub widest_left: Option<String>,
    pub widest_right: Option<String>,
    pub slot_receivers: Vec<String>,
    pub backfield: Vec<String>,
    pub leverage: HashMap<String, Leverage>,
    pub gaps: Vec<Gap>,
}

const BUNCH_HORIZONTAL_MAX: f64 = 4.0;
const STACK_HORIZONTAL_MAX: f64 = 2.0;
const STACK_VERTICAL_MIN: f64 = 2.0;
const SLOT_MAX_FROM_CENTER: f64 = 10.0;

/// Analyze the offense's current alignment.
///
/// ### Example
/// ```
/// use gridiron_core::formation::analyze;
/// use gridiron_core::player::{Player, Team, PlayerType};
/// use gridiron_core::geometry::Vector2D;
///
/// let offense = vec![
///     Player::new("off-qb", Team::Offense, PlayerType::QB, Vector2D::new(26.665, 25.0)),
///     Player::new("off-rb", Team::Offense, PlayerType::RB, Vector2D::new(26.665, 23.0)),
///     Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::new(5.0, 30.0)),
///     Player::new("off-wr2", Team::Offense, PlayerType::WR, Vector2D::new(48.0, 30.0)),
/// ];
/// let analysis = analyze(&offense, 30.0);
/// assert!(!analysis.personnel.is_empty());
/// ```
pub fn analyze(offense: &[Player], los: f64) -> FormationAnalysis {
    let eligible: Vec<&Player> = offense
        .iter()
        .filter(|p| p.team == Team::Offense && p.player_type != PlayerType::QB)
        .collect();
    let receivers: Vec<&Player> = eligible
        .iter()
        .filter(|p| p.player_type == PlayerType::WR || p.player_type == PlayerType::TE)
        .copied()
        .collect();
    let backs: Vec<&Player> = eligible
        .iter()
        .filter(|p| p.player_type == PlayerType::RB || p.player_type == PlayerType::FB)
        .copied()
        .collect();

    let receiver_sets = detect_receiver_sets(&receivers);
    let formation_type = classify_formation_type(&receivers, &backs, &eligible, &receiver_sets);
    let strength = classify_strength(&receivers, &backs);
    let personnel = personnel_string(&eligible);

    let mut sorted_receivers = receivers.clone();
    sorted_receivers.sort_by(|a, b| a.position.x.partial_cmp(&b.position.x).unwrap());
    let widest_left = sorted_receivers.first().map(|p| p.id.clone());
    let widest_right = sorted_receivers.last().map(|p| p.id.clone());
    let slot_receivers: Vec<String> = sorted_receivers
        .iter()
        .filter(|p| (p.position.x - CENTER_X).abs() <= SLOT_MAX_FROM_CENTER)
        .map(|p| p.id.clone())
        .collect();

    let backfield: Vec<String> = backs.iter().map(|p| p.id.clone()).collect();

    // `analyze` only sees the offense; `leverage_map` needs the defense too,
    // so the engine calls it directly once the alignment rebuild has
    // produced defenders and mirrors the result onto each `Player`.
    let leverage = HashMap::new();

    let mut gaps = vec![Gap::A, Gap::B, Gap::C];
    if eligible.iter().any(|p| p.player_type == PlayerType::TE) {
        gaps.push(Gap::D);
    }

    let _ = los;

    FormationAnalysis {
        formation_type,
        strength,
        receiver_sets,
        personnel,
        widest_left,
        widest_right,
        slot_receivers,
        backfield,
        leverage,
        gaps,
    }
}

/// Compute the leverage a defender plays relative to the nearest eligible
/// receiver: inside, outside, or head-up, by comparing x-coordinates.
pub fn leverage_map(defenders: &[Player], receivers: &[&Player]) -> HashMap<String, Leverage> {
    let mut map = HashMap::new();
    for defender in defenders {
        let nearest = receivers
            .iter()
            .min_by(|a, b| {
                let da = (a.position.x - defender.position.x).abs();
                let db = (b.position.x - defender.position.x).abs();
                da.partial_cmp(&db).unwrap()
            })
            .copied();
        if let Some(receiver) = nearest {
            let dx = defender.position.x - receiver.position.x;
            let leverage = if dx.abs() < 0.5 {
                Leverage::HeadUp
            } else if dx < 0.0 {
                Leverage::Outside
            } else {
                Leverage::Inside
            };
            map.insert(defender.id.clone(), leverage);
        }
    }
    map
}

fn detect_receiver_sets(receivers: &[&Player]) -> Vec<ReceiverSet> {
    let mut sets = Vec::new();

    for side_receivers in [
        receivers.iter().filter(|p| p.position.x < CENTER_X).collect::<Vec<_>>(),
        receivers.iter().filter(|p| p.position.x >= CENTER_X).collect::<Vec<_>>(),
    ] {
        if side_receivers.len() >= 3 {
            let xs: Vec<f64> = side_receivers.iter().map(|p| p.position.x).collect();
            let spread = xs.iter().cloned().fold(f64::MIN, f64::max) - xs.iter().cloned().fold(f64::MAX, f64::min);
            if spread.abs() <= BUNCH_HORIZONTAL_MAX {
                sets.push(ReceiverSet::Bunch);
            } else {
                sets.push(ReceiverSet::Trips);
            }
        } else if side_receivers.len() == 2 {
            let a = side_receivers[0];
            let b = side_receivers[1];
            let dx = (a.position.x - b.position.x).abs();
            let dy = (a.position.y - b.position.y).abs();
            if dx <= STACK_HORIZONTAL_MAX && dy > STACK_VERTICAL_MIN {
                sets.push(ReceiverSet::Stack);
            } else {
                sets.push(ReceiverSet::Twins);
            }
        }
    }

    if sets.is_empty() {
        sets.push(ReceiverSet::Balanced);
    }
    if receivers.len() >= 4 {
        sets.push(ReceiverSet::Spread);
    }
    sets
}

fn classify_formation_type(
    receivers: &[&Player],
    backs: &[&Player],
    eligible: &[&Player],
    receiver_sets: &[ReceiverSet],
) -> FormationType {
    if receiver_sets.contains(&ReceiverSet::Bunch) {
        return FormationType::Bunch;
    }
    if receiver_sets.contains(&ReceiverSet::Trips) {
        return FormationType::Trips;
    }
    if backs.is_empty() {
        return FormationType::Empty;
    }
    if receivers.len() >= 4 {
        return FormationType::Spread;
    }
    let tes = eligible.iter().filter(|p| p.player_type == PlayerType::TE).count();
    let rbs_and_fbs = backs.len();
    let heavy_personnel = matches!((rbs_and_fbs, tes), (2, 1) | (1, 2) | (2, 2) | (1, 3));
    if heavy_personnel {
        return FormationType::Heavy;
    }
    if backs.len() >= 2 {
        let ys: Vec<f64> = backs.iter().map(|p| p.position.y).collect();
        let max = ys.iter().cloned().fold(f64::MIN, f64::max);
        let min = ys.iter().cloned().fold(f64::MAX, f64::min);
        if (max - min).abs() < 1.0 {
            return FormationType::IForm;
        }
    }
    if let (Some(te), Some(back)) = (
        eligible.iter().find(|p| p.player_type == PlayerType::TE),
        backs.first(),
    ) {
        let te_side = te.position.x >= CENTER_X;
        let back_side = back.position.x >= CENTER_X;
        if te_side == back_side {
            return FormationType::Strong;
        }
    }
    FormationType::Balanced
}

fn classify_strength(receivers: &[&Player], backs: &[&Player]) -> Strength {
    let left = receivers.iter().filter(|p| p.position.x < CENTER_X).count();
    let right = receivers.iter().filter(|p| p.position.x >= CENTER_X).count();

    if left >= 3 && left > right {
        return Strength::Left;
    }
    if right >= 3 && right > left {
        return Strength::Right;
    }

    if let Some(te) = receivers.iter().find(|p| p.player_type == PlayerType::TE) {
        return if te.position.x < CENTER_X { Strength::Left } else { Strength::Right };
    }

    if left != right {
        return if left > right { Strength::Left } else { Strength::Right };
    }

    if let Some(back) = backs.iter().find(|p| (p.position.x - CENTER_X).abs() > 1.0) {
        return if back.position.x < CENTER_X { Strength::Left } else { Strength::Right };
    }

    Strength::Balanced
}

fn personnel_string(eligible: &[&Player]) -> String {
    let backs = eligible
        .iter()
        .filter(|p| p.player_type == PlayerType::RB || p.player_type == PlayerType::FB)
        .count();
    let tes = eligible.iter().filter(|p| p.player_type == PlayerType::TE).count();
    format!("{}{}", backs, tes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector2D;

    fn wr(id: &str, x: f64, y: f64) -> Player {
        Player::new(id, Team::Offense, PlayerType::WR, Vector2D::new(x, y))
    }

    #[test]
    fn test_bunch_detection() {
        let offense = vec![
            Player::new("off-qb", Team::Offense, PlayerType::QB, Vector2D::new(26.665, 25.0)),
            Player::new("off-rb", Team::Offense, PlayerType::RB, Vector2D::new(26.665, 23.0)),
            wr("off-wr1", 40.0, 30.0),
            wr("off-wr2", 41.5, 30.0),
            wr("off-wr3", 43.0, 30.0),
        ];
        let analysis = analyze(&offense, 30.0);
        assert_eq!(analysis.formation_type, FormationType::Bunch);
    }

    #[test]
    fn test_empty_backfield() {
        let offense = vec![
            Player::new("off-qb", Team::Offense, PlayerType::QB, Vector2D::new(26.665, 25.0)),
            wr("off-wr1", 5.0, 30.0),
            wr("off-wr2", 48.0, 30.0),
            wr("off-wr3", 12.0, 30.0),
            wr("off-wr4", 40.0, 30.0),
        ];
        let analysis = analyze(&offense, 30.0);
        assert_eq!(analysis.formation_type, FormationType::Empty);
    }

    #[test]
    fn test_personnel_string_one_back_one_te() {
        let offense = vec![
            Player::new("off-qb", Team::Offense, PlayerType::QB, Vector2D::new(26.665, 25.0)),
            Player::new("off-rb", Team::Offense, PlayerType::RB, Vector2D::new(26.665, 23.0)),
            Player::new("off-te", Team::Offense, PlayerType::TE, Vector2D::new(35.0, 30.0)),
            wr("off-wr1", 5.0, 30.0),
            wr("off-wr2", 48.0, 30.0),
        ];
        let analysis = analyze(&offense, 30.0);
        assert_eq!(analysis.personnel, "11");
    }
}
