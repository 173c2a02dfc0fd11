//! Zone coordination: landmarks, deeper-than-deepest rule, overlap
//! handoffs, and bunch/spread width adjustment. Spec.md §4.6.

use crate::catalog::CoverageType;
use crate::geometry::{thirds, CENTER_X};
use crate::player::{CoverageResponsibilityKind, Player};

/// Field landmarks zone defenders reference, relative to `los`.
#[derive(Clone, Copy, Debug)]
pub struct Landmarks {
    pub left_hash: f64,
    pub right_hash: f64,
    pub left_numbers: f64,
    pub right_numbers: f64,
    pub left_third: f64,
    pub middle_third: f64,
    pub right_third: f64,
}

pub fn landmarks() -> Landmarks {
    let (left_third, middle_third, right_third) = thirds();
    Landmarks {
        left_hash: CENTER_X - crate::geometry::HASH_OFFSET,
        right_hash: CENTER_X + crate::geometry::HASH_OFFSET,
        left_numbers: CENTER_X - crate::geometry::NUMBERS_OFFSET,
        right_numbers: CENTER_X + crate::geometry::NUMBERS_OFFSET,
        left_third,
        middle_third,
        right_third,
    }
}

/// A recorded handoff point between two zone defenders whose landmarks
/// fall within 12 yards of each other.
#[derive(Clone, Debug)]
pub struct ZoneOverlap {
    pub defender_a: String,
    pub defender_b: String,
    pub midpoint_x: f64,
    pub midpoint_y: f64,
}

const OVERLAP_RADIUS: f64 = 12.0;
const DEEP_ZONE_CUSHION: f64 = 2.0;
const BUNCH_CONTRACTION: f64 = 0.3;
const SPREAD_EXPANSION: f64 = 0.15;
const RED_ZONE_DEPTH_COMPRESSION: f64 = 0.25;

/// Compress a zone's assigned depth by 25% once the line of scrimmage is
/// inside the red zone: the shrinking field behind a zone defender pulls
/// their landmark closer to the line, per spec.md §8.
pub fn red_zone_depth(depth: f64, is_red_zone: bool) -> f64 {
    if is_red_zone {
        depth * (1.0 - RED_ZONE_DEPTH_COMPRESSION)
    } else {
        depth
    }
}

/// Apply the deeper-than-deepest rule: each deep-zone defender's y must be
/// at least the deepest receiver currently in their zone's y, plus a 2 yd
/// cushion. Zone defenders whose responsibility is not `Zone`, or whose
/// declared depth is shallow (`< DEEP_ZONE_CUSHION_DEPTH`), are untouched.
pub fn apply_deeper_than_deepest(defenders: &mut [Player], receivers: &[&Player]) {
    for defender in defenders.iter_mut() {
        let (center, width, height, depth) = match &defender.coverage_responsibility {
            Some(resp) => match &resp.kind {
                CoverageResponsibilityKind::Zone { center, width, height, depth, .. } => {
                    (*center, *width, *height, *depth)
                }
                _ => continue,
            },
            None => continue,
        };
        if depth < crate::geometry::DEEP_ZONE_DEPTH {
            continue;
        }
        let deepest_in_zone = receivers
            .iter()
            .filter(|r| {
                (r.position.x - center.x).abs() <= width / 2.0 && (r.position.y - center.y).abs() <= height / 2.0
            })
            .map(|r| r.position.y)
            .fold(f64::MIN, f64::max);
        if deepest_in_zone > f64::MIN {
            let min_y = deepest_in_zone + DEEP_ZONE_CUSHION;
            if min_y > defender.position.y {
                defender.position.y = min_y;
            }
        }
    }
}

/// Record overlap/handoff midpoints for every pair of zone defenders
/// whose landmark centers fall within 12 yards of one another.
pub fn compute_overlaps(defenders: &[Player]) -> Vec<ZoneOverlap> {
    let zones: Vec<(&Player, crate::geometry::Vector2D)> = defenders
        .iter()
        .filter_map(|d| match &d.coverage_responsibility {
            Some(resp) => match &resp.kind {
                CoverageResponsibilityKind::Zone { center, .. } => Some((d, *center)),
                _ => None,
            },
            None => None,
        })
        .collect();

    let mut overlaps = Vec::new();
    for i in 0..zones.len() {
        for j in (i + 1)..zones.len() {
            let (defender_a, center_a) = zones[i];
            let (defender_b, center_b) = zones[j];
            if center_a.distance(&center_b) <= OVERLAP_RADIUS {
                overlaps.push(ZoneOverlap {
                    defender_a: defender_a.id.clone(),
                    defender_b: defender_b.id.clone(),
                    midpoint_x: (center_a.x + center_b.x) / 2.0,
                    midpoint_y: (center_a.y + center_b.y) / 2.0,
                });
            }
        }
    }
    overlaps
}

/// Width adjustment applied to a zone's lateral offset from center: bunch
/// sets contract underneath zones toward the middle, spread sets expand
/// deep zones outward, per spec.md §4.6.
pub fn width_adjustment(offset_from_center: f64, is_deep_zone: bool, is_bunch: bool, is_spread: bool) -> f64 {
    if is_bunch && !is_deep_zone {
        offset_from_center * (1.0 - BUNCH_CONTRACTION)
    } else if is_spread && is_deep_zone {
        offset_from_center * (1.0 + SPREAD_EXPANSION)
    } else {
        offset_from_center
    }
}

/// Per-coverage fine placement nudges applied after the generic width
/// adjustment: Cover 2 halves split the field at center, Cover 3 thirds
/// use the computed thirds, Cover 4 quarters split each half again,
/// Tampa 2 keeps the MLB on the deep middle landmark.
pub fn fine_placement_x(coverage: CoverageType, zone_name: &str, los_landmarks: &Landmarks) -> Option<f64> {
    match (coverage, zone_name) {
        (CoverageType::Cover2 | CoverageType::Cover2Invert, "deep-left") => {
            Some((los_landmarks.left_numbers + CENTER_X) / 2.0)
        }
        (CoverageType::Cover2 | CoverageType::Cover2Invert, "deep-right") => {
            Some((los_landmarks.right_numbers + CENTER_X) / 2.0)
        }
        (CoverageType::Cover3, "deep-left") => Some(los_landmarks.left_third),
        (CoverageType::Cover3, "deep-middle") => Some(los_landmarks.middle_third),
        (CoverageType::Cover3, "deep-right") => Some(los_landmarks.right_third),
        (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, "deep-left-quarter") => {
            Some((los_landmarks.left_third + los_landmarks.left_numbers) / 2.0)
        }
        (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, "deep-right-quarter") => {
            Some((los_landmarks.right_third + los_landmarks.right_numbers) / 2.0)
        }
        (CoverageType::Tampa2, "deep-middle") => Some(CENTER_X),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector2D;
    use crate::player::{PlayerType, Team};

    #[test]
    fn test_landmarks_match_spec_constants() {
        let marks = landmarks();
        assert!((marks.left_hash - (CENTER_X - 3.08)).abs() < 1e-6);
        assert!((marks.right_numbers - (CENTER_X + 13.33)).abs() < 1e-6);
    }

    #[test]
    fn test_deeper_than_deepest_pushes_zone_defender_back() {
        let mut defender = Player::new("def-fs", Team::Defense, PlayerType::S, Vector2D::new(26.665, 40.0));
        defender.coverage_responsibility = Some(crate::player::CoverageResponsibility::zone(
            "def-fs",
            "deep-middle",
            Vector2D::new(26.665, 40.0),
            20.0,
            20.0,
            20.0,
        ));
        let receiver = Player::new("off-wr1", Team::Offense, PlayerType::WR, Vector2D::new(26.665, 44.0));
        let receivers = vec![&receiver];
        apply_deeper_than_deepest(std::slice::from_mut(&mut defender), &receivers);
        assert!(defender.position.y >= 46.0);
    }

    #[test]
    fn test_bunch_contracts_underneath_zone() {
        let adjusted = width_adjustment(10.0, false, true, false);
        assert!(adjusted < 10.0);
    }

    #[test]
    fn test_spread_expands_deep_zone() {
        let adjusted = width_adjustment(10.0, true, false, true);
        assert!(adjusted > 10.0);
    }

    #[test]
    fn test_red_zone_compresses_depth_by_25_percent() {
        assert!((red_zone_depth(20.0, true) - 15.0).abs() < 1e-9);
        assert_eq!(red_zone_depth(20.0, false), 20.0);
    }
}
