use serde::{Deserialize, Deserializer, Serialize};

/// # `CoverageType` enum
///
/// The defensive scheme family. `CoverageType::Cover2RollToOne`,
/// `QuartersPoach` and `Cover2Invert` are disguise/rotation coverages
/// that spec.md §9 flags as only partially wired in the source; this
/// re-implementation treats them as first-class coverages bound by the
/// same invariants as the base eight (see DESIGN.md).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum CoverageType {
    Cover0,
    Cover1,
    Cover2,
    Cover3,
    Cover4,
    Cover6,
    Quarters,
    Tampa2,
    Cover2RollToOne,
    QuartersPoach,
    Cover2Invert,
}

impl CoverageType {
    /// Number of deep safeties this coverage is built around pre-snap.
    pub fn safety_count(&self) -> u8 {
        match self {
            CoverageType::Cover0 => 0,
            CoverageType::Cover1 | CoverageType::Cover2RollToOne => 1,
            CoverageType::Cover2 | CoverageType::Tampa2 | CoverageType::Cover2Invert => 2,
            CoverageType::Cover3 => 1,
            CoverageType::Cover4 | CoverageType::Quarters | CoverageType::QuartersPoach | CoverageType::Cover6 => 2,
        }
    }

    /// Catalog key for this coverage type.
    pub fn key(&self) -> &'static str {
        match self {
            CoverageType::Cover0 => "cover-0",
            CoverageType::Cover1 => "cover-1",
            CoverageType::Cover2 => "cover-2",
            CoverageType::Cover3 => "cover-3",
            CoverageType::Cover4 => "cover-4",
            CoverageType::Cover6 => "cover-6",
            CoverageType::Quarters => "quarters",
            CoverageType::Tampa2 => "tampa-2",
            CoverageType::Cover2RollToOne => "cover-2-roll-to-1",
            CoverageType::QuartersPoach => "quarters-poach",
            CoverageType::Cover2Invert => "cover-2-invert",
        }
    }

    /// Parse a coverage type from its catalog key. spec.md §9 flags that
    /// the source allows partial-match strings for `setCoverage`; this
    /// re-implementation requires an exact match (a strict enum/string
    /// mapping), per that same open question's recommendation.
    pub fn from_key(key: &str) -> Option<CoverageType> {
        use CoverageType::*;
        Some(match key {
            "cover-0" => Cover0,
            "cover-1" => Cover1,
            "cover-2" => Cover2,
            "cover-3" => Cover3,
            "cover-4" => Cover4,
            "cover-6" => Cover6,
            "quarters" => Quarters,
            "tampa-2" => Tampa2,
            "cover-2-roll-to-1" => Cover2RollToOne,
            "quarters-poach" => QuartersPoach,
            "cover-2-invert" => Cover2Invert,
            _ => return None,
        })
    }

    pub fn all() -> [CoverageType; 11] {
        use CoverageType::*;
        [
            Cover0, Cover1, Cover2, Cover3, Cover4, Cover6, Quarters, Tampa2, Cover2RollToOne,
            QuartersPoach, Cover2Invert,
        ]
    }

    /// Whether this coverage blitzes by default/with some probability
    /// (spec.md §4.14): Cover 0 always, Cover 1 25%, Cover 6 30%, others
    /// lower.
    pub fn base_blitz_probability(&self) -> f64 {
        match self {
            CoverageType::Cover0 => 1.0,
            CoverageType::Cover1 | CoverageType::Cover2RollToOne => 0.25,
            CoverageType::Cover6 => 0.30,
            _ => 0.10,
        }
    }
}

/// # `CoverageDefRaw` struct
///
/// A `CoverageDefRaw` is a `CoverageDef` before its properties have been
/// validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoverageDefRaw {
    key: String,
    coverage_type: CoverageType,
    name: String,
    min_linebackers: u8,
    min_defensive_backs: u8,
    min_safeties: u8,
}

impl CoverageDefRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err(String::from("Coverage key must not be empty"));
        }
        if self.min_linebackers + self.min_defensive_backs + self.min_safeties > 7 {
            return Err(format!(
                "Coverage '{}' requires more than 7 defenders",
                self.key
            ));
        }
        Ok(())
    }
}

/// # `CoverageDef` struct
///
/// A `CoverageDef` is a validated, immutable coverage template consulted
/// by the personnel matcher's compatibility table (spec.md §4.4) and by
/// the alignment/coverage builder (spec.md §4.5).
#[derive(Clone, Debug, Serialize)]
pub struct CoverageDef {
    key: String,
    coverage_type: CoverageType,
    name: String,
    min_linebackers: u8,
    min_defensive_backs: u8,
    min_safeties: u8,
}

impl TryFrom<CoverageDefRaw> for CoverageDef {
    type Error = String;

    fn try_from(item: CoverageDefRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(CoverageDef {
            key: item.key,
            coverage_type: item.coverage_type,
            name: item.name,
            min_linebackers: item.min_linebackers,
            min_defensive_backs: item.min_defensive_backs,
            min_safeties: item.min_safeties,
        })
    }
}

impl<'de> Deserialize<'de> for CoverageDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = CoverageDefRaw::deserialize(deserializer)?;
        CoverageDef::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl CoverageDef {
    pub fn new(
        coverage_type: CoverageType,
        name: &str,
        min_linebackers: u8,
        min_defensive_backs: u8,
        min_safeties: u8,
    ) -> Result<CoverageDef, String> {
        let raw = CoverageDefRaw {
            key: coverage_type.key().to_string(),
            coverage_type,
            name: name.to_string(),
            min_linebackers,
            min_defensive_backs,
            min_safeties,
        };
        CoverageDef::try_from(raw)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn coverage_type(&self) -> CoverageType {
        self.coverage_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_linebackers(&self) -> u8 {
        self.min_linebackers
    }

    pub fn min_defensive_backs(&self) -> u8 {
        self.min_defensive_backs
    }

    pub fn min_safeties(&self) -> u8 {
        self.min_safeties
    }
}

/// Coverage definitions covering the base eight plus the disguise/rotation
/// trio from spec.md §9, with the minimum personnel compatibility table
/// spec.md §4.4 describes (e.g. Tampa 2 requires >=3 LBs, Cover 4 needs
/// >=4 DBs).
pub fn standard_coverages() -> Vec<CoverageDef> {
    use CoverageType::*;
    vec![
        CoverageDef::new(Cover0, "Cover 0", 2, 5, 0).unwrap(),
        CoverageDef::new(Cover1, "Cover 1", 2, 4, 1).unwrap(),
        CoverageDef::new(Cover2, "Cover 2", 2, 3, 2).unwrap(),
        CoverageDef::new(Cover3, "Cover 3", 2, 4, 1).unwrap(),
        CoverageDef::new(Cover4, "Cover 4", 1, 4, 2).unwrap(),
        CoverageDef::new(Cover6, "Cover 6", 2, 3, 2).unwrap(),
        CoverageDef::new(Quarters, "Quarters", 1, 4, 2).unwrap(),
        CoverageDef::new(Tampa2, "Tampa 2", 3, 2, 2).unwrap(),
        CoverageDef::new(Cover2RollToOne, "Cover 2 Roll to 1", 2, 4, 1).unwrap(),
        CoverageDef::new(QuartersPoach, "Quarters Poach", 1, 4, 2).unwrap(),
        CoverageDef::new(Cover2Invert, "Cover 2 Invert", 2, 3, 2).unwrap(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_round_trip() {
        for coverage in CoverageType::all() {
            assert_eq!(CoverageType::from_key(coverage.key()), Some(coverage));
        }
    }

    #[test]
    fn test_from_key_rejects_partial_match() {
        assert_eq!(CoverageType::from_key("cover"), None);
        assert_eq!(CoverageType::from_key("cover-33"), None);
    }

    #[test]
    fn test_cover0_always_blitzes() {
        assert_eq!(CoverageType::Cover0.base_blitz_probability(), 1.0);
    }
}
