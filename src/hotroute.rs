//! Hot routes & sight adjustments: blitz-triggered auto-conversion,
//! coverage audibles, and depth/route-type sight adjustments.
//! Spec.md §4.13.

use crate::catalog::{Catalog, CoverageType, RouteDef, RouteType};

/// The hot variant a route in the auto-convert set (go/post/corner/
/// comeback/curl) becomes when the defense shows 6+ blitz
/// responsibilities out of 7; all other routes are unaffected.
pub fn hot_variant(route_type: RouteType) -> Option<RouteType> {
    match route_type {
        RouteType::Go => Some(RouteType::Hitch),
        RouteType::Post => Some(RouteType::Slant),
        RouteType::Corner => Some(RouteType::Flat),
        RouteType::Comeback => Some(RouteType::Curl),
        RouteType::Curl => Some(RouteType::Hitch),
        _ => None,
    }
}

/// Whether blitz detection should convert hot routes this snap: 6+ of 7
/// defenders carry a blitz responsibility.
pub fn blitz_detected(blitz_responsibility_count: usize, total_defenders: usize) -> bool {
    total_defenders > 0 && blitz_responsibility_count * 7 >= total_defenders * 6
}

/// Seconds the sack clock is reduced by when blitz detection fires.
pub const BLITZ_DETECTION_SACK_REDUCTION: f64 = 1.5;

/// Per-coverage route conversion table for the coverage-audible mechanism
/// (e.g. Cover 3: go -> comeback, post -> seam, corner -> speed_out,
/// modeled here as `Out`).
pub fn coverage_audible(coverage: CoverageType, route_type: RouteType) -> Option<RouteType> {
    match (coverage, route_type) {
        (CoverageType::Cover3, RouteType::Go) => Some(RouteType::Comeback),
        (CoverageType::Cover3, RouteType::Post) => Some(RouteType::Seam),
        (CoverageType::Cover3, RouteType::Corner) => Some(RouteType::Out),
        (CoverageType::Cover1, RouteType::Go) => Some(RouteType::Fade),
        (CoverageType::Cover1, RouteType::Slant) => Some(RouteType::Hitch),
        (CoverageType::Cover2 | CoverageType::Cover2Invert, RouteType::Go) => Some(RouteType::Seam),
        (CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach, RouteType::Post) => {
            Some(RouteType::Dig)
        }
        _ => None,
    }
}

/// Where on the formation a receiver lines up, for the sight-adjustment
/// table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceiverAlignment {
    Outside,
    Slot,
    Tight,
}

/// A depth delta (yards, applied to every waypoint's y-offset) and
/// optional route-type substitution for a sight adjustment.
#[derive(Clone, Copy, Debug)]
pub struct SightAdjustment {
    pub depth_change: f64,
    pub substitute: Option<RouteType>,
}

/// Static sight-adjustment table keyed by (coverage, alignment), e.g.
/// Cover 3 outside receiver -> comeback at depth -2.
pub fn sight_adjustment(coverage: CoverageType, alignment: ReceiverAlignment) -> Option<SightAdjustment> {
    match (coverage, alignment) {
        (CoverageType::Cover3, ReceiverAlignment::Outside) => {
            Some(SightAdjustment { depth_change: -2.0, substitute: Some(RouteType::Comeback) })
        }
        (CoverageType::Cover1, ReceiverAlignment::Slot) => {
            Some(SightAdjustment { depth_change: -1.0, substitute: Some(RouteType::Slant) })
        }
        (CoverageType::Cover0, ReceiverAlignment::Tight) => {
            Some(SightAdjustment { depth_change: -3.0, substitute: Some(RouteType::Hitch) })
        }
        _ => None,
    }
}

/// Look up a hot/audible/sight-adjusted route definition in the catalog,
/// translating it by `depth_change` if requested. Returns `None` if the
/// substitute route type has no standard catalog entry.
pub fn resolve_adjusted_route(catalog: &Catalog, route_type: RouteType, depth_change: f64) -> Option<RouteDef> {
    catalog
        .route_by_type(route_type)
        .map(|route| if depth_change != 0.0 { route.translated(depth_change) } else { route })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blitz_detected_at_six_of_seven() {
        assert!(blitz_detected(6, 7));
        assert!(!blitz_detected(5, 7));
    }

    #[test]
    fn test_go_converts_to_hitch_when_hot() {
        assert_eq!(hot_variant(RouteType::Go), Some(RouteType::Hitch));
    }

    #[test]
    fn test_cover3_audible_table() {
        assert_eq!(coverage_audible(CoverageType::Cover3, RouteType::Go), Some(RouteType::Comeback));
        assert_eq!(coverage_audible(CoverageType::Cover3, RouteType::Post), Some(RouteType::Seam));
    }

    #[test]
    fn test_cover3_outside_sight_adjustment() {
        let adjustment = sight_adjustment(CoverageType::Cover3, ReceiverAlignment::Outside).unwrap();
        assert_eq!(adjustment.depth_change, -2.0);
        assert_eq!(adjustment.substitute, Some(RouteType::Comeback));
    }
}
