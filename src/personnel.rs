//! Personnel matcher: offensive personnel + situation -> defensive
//! package, plus the package's player-type breakdown and blitz
//! suitability ordering. Spec.md §4.4.

use crate::player::PlayerType;

/// # `DefensivePackage` enum
///
/// The defensive personnel grouping selected to counter the offense's
/// personnel and the down/distance/field-position situation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DefensivePackage {
    Base,
    Nickel,
    Dime,
    Quarter,
    GoalLine,
}

impl DefensivePackage {
    /// Minimum linebackers, defensive backs (CB+S+NB), and safeties this
    /// package is built around.
    pub fn personnel_minimums(&self) -> (u8, u8, u8) {
        match self {
            DefensivePackage::Base => (4, 3, 2),
            DefensivePackage::Nickel => (3, 4, 2),
            DefensivePackage::Dime => (2, 5, 2),
            DefensivePackage::Quarter => (1, 6, 2),
            DefensivePackage::GoalLine => (5, 2, 2),
        }
    }

    /// Parse a package from the key a caller names it by (`setPersonnel`),
    /// e.g. `"nickel"`, `"goal-line"`.
    pub fn from_key(key: &str) -> Option<DefensivePackage> {
        Some(match key {
            "base" => DefensivePackage::Base,
            "nickel" => DefensivePackage::Nickel,
            "dime" => DefensivePackage::Dime,
            "quarter" => DefensivePackage::Quarter,
            "goal-line" => DefensivePackage::GoalLine,
            _ => return None,
        })
    }
}

/// Preferred defensive package for a given offensive personnel string
/// (`"{RB+FB}{TE}"`), before situational overrides.
pub fn preferred_package(personnel: &str) -> DefensivePackage {
    match personnel {
        "21" | "22" | "13" => DefensivePackage::Base,
        "11" | "12" => DefensivePackage::Nickel,
        "10" => DefensivePackage::Dime,
        "00" => DefensivePackage::Quarter,
        _ => DefensivePackage::Base,
    }
}

/// Apply situational overrides: red zone / 3rd-and-short favor a heavier
/// package; long yardage / 4th-and-long favor Dime, per spec.md §4.4.
pub fn situational_override(
    base: DefensivePackage,
    is_red_zone: bool,
    is_third_and_short: bool,
    is_long_yardage: bool,
    is_fourth_and_long: bool,
) -> DefensivePackage {
    if is_red_zone || is_third_and_short {
        return match base {
            DefensivePackage::Dime | DefensivePackage::Quarter | DefensivePackage::Nickel => DefensivePackage::Base,
            other => other,
        };
    }
    if is_long_yardage || is_fourth_and_long {
        return DefensivePackage::Dime;
    }
    base
}

/// Whether `coverage` is compatible with `package`, per the minimum
/// personnel table in spec.md §4.4 (e.g. Tampa 2 needs >=3 LBs, Cover 4
/// needs >=4 DBs; Cover 0 and Cover 4 are incompatible with Goal Line).
pub fn is_compatible(coverage: &crate::catalog::CoverageDef, package: DefensivePackage) -> bool {
    use crate::catalog::CoverageType;

    if matches!(package, DefensivePackage::GoalLine)
        && matches!(coverage.coverage_type(), CoverageType::Cover0 | CoverageType::Cover4)
    {
        return false;
    }
    let (min_lb, min_db, min_s) = package.personnel_minimums();
    coverage.min_linebackers() <= min_lb
        && coverage.min_defensive_backs() <= min_db
        && coverage.min_safeties() <= min_s
}

/// Generate the seven defensive player types for a package: always 2 CB
/// and 2 S, remaining defensive backs as NB, the rest as LB, per spec.md
/// §4.4's `generateDefensivePlayerTypes`.
pub fn generate_defensive_player_types(package: DefensivePackage) -> [PlayerType; 7] {
    let (_, min_db, min_s) = package.personnel_minimums();
    let nickel_backs = min_db.saturating_sub(2 + min_s.saturating_sub(2)).max(min_db.saturating_sub(4));
    let nickel_backs = nickel_backs.min(3) as usize;
    let mut types = vec![PlayerType::CB, PlayerType::CB, PlayerType::S, PlayerType::S];
    for _ in 0..nickel_backs {
        types.push(PlayerType::NB);
    }
    while types.len() < 7 {
        types.push(PlayerType::LB);
    }
    types.truncate(7);
    let mut array = [PlayerType::LB; 7];
    array.copy_from_slice(&types[..7]);
    array
}

/// Rank defender ids by blitz suitability: never leave fewer than 5 in
/// coverage, and among blitz-eligible defenders prefer LBs, then SS
/// (modeled as `S`), then NB.
pub fn blitz_suitability_order(defenders: &[(String, PlayerType)]) -> Vec<String> {
    let mut ranked: Vec<&(String, PlayerType)> = defenders
        .iter()
        .filter(|(_, t)| matches!(t, PlayerType::LB | PlayerType::S | PlayerType::NB))
        .collect();
    ranked.sort_by_key(|(_, t)| match t {
        PlayerType::LB => 0,
        PlayerType::S => 1,
        PlayerType::NB => 2,
        _ => 3,
    });
    ranked.into_iter().map(|(id, _)| id.clone()).collect()
}

/// Cap a blitz package so no fewer than 5 defenders remain in coverage,
/// per spec.md §4.4.
pub fn max_blitzers(total_defenders: usize) -> usize {
    total_defenders.saturating_sub(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_package_for_eleven_personnel() {
        assert_eq!(preferred_package("11"), DefensivePackage::Nickel);
    }

    #[test]
    fn test_red_zone_overrides_to_base() {
        let package = situational_override(DefensivePackage::Dime, true, false, false, false);
        assert_eq!(package, DefensivePackage::Base);
    }

    #[test]
    fn test_generate_defensive_player_types_always_has_two_cb_two_s() {
        let types = generate_defensive_player_types(DefensivePackage::Nickel);
        assert_eq!(types.iter().filter(|t| **t == PlayerType::CB).count(), 2);
        assert_eq!(types.iter().filter(|t| **t == PlayerType::S).count(), 2);
        assert_eq!(types.len(), 7);
    }

    #[test]
    fn test_cover0_incompatible_with_goal_line() {
        let coverage = crate::catalog::coverage::standard_coverages()
            .into_iter()
            .find(|c| c.key() == "cover-0")
            .unwrap();
        assert!(!is_compatible(&coverage, DefensivePackage::GoalLine));
    }

    #[test]
    fn test_max_blitzers_leaves_five_in_coverage() {
        assert_eq!(max_blitzers(7), 2);
    }
}
