use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// # `ConceptDefRaw` struct
///
/// A `ConceptDefRaw` is a `ConceptDef` before its assignments have been
/// validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConceptDefRaw {
    key: String,
    name: String,
    formation_key: String,
    /// Maps an offensive player id (as named in the formation) to the
    /// route key it should run.
    assignments: HashMap<String, String>,
}

impl ConceptDefRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err(String::from("Concept key must not be empty"));
        }
        if self.formation_key.is_empty() {
            return Err(format!("Concept '{}' has no formation key", self.key));
        }
        if self.assignments.is_empty() {
            return Err(format!("Concept '{}' assigns no routes", self.key));
        }
        Ok(())
    }
}

/// # `ConceptDef` struct
///
/// A `ConceptDef` is a validated, immutable play concept: the formation it
/// is run from, plus a route assignment per eligible receiver. Per
/// spec.md §6, every route referenced must match an eligible position in
/// the named formation — enforced at alignment-build time (where both the
/// concept and the formation are in hand), not here.
#[derive(Clone, Debug, Serialize)]
pub struct ConceptDef {
    key: String,
    name: String,
    formation_key: String,
    assignments: HashMap<String, String>,
}

impl TryFrom<ConceptDefRaw> for ConceptDef {
    type Error = String;

    fn try_from(item: ConceptDefRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(ConceptDef {
            key: item.key,
            name: item.name,
            formation_key: item.formation_key,
            assignments: item.assignments,
        })
    }
}

impl<'de> Deserialize<'de> for ConceptDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = ConceptDefRaw::deserialize(deserializer)?;
        ConceptDef::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl ConceptDef {
    pub fn new(
        key: &str,
        name: &str,
        formation_key: &str,
        assignments: HashMap<String, String>,
    ) -> Result<ConceptDef, String> {
        let raw = ConceptDefRaw {
            key: key.to_string(),
            name: name.to_string(),
            formation_key: formation_key.to_string(),
            assignments,
        };
        ConceptDef::try_from(raw)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formation_key(&self) -> &str {
        &self.formation_key
    }

    pub fn assignments(&self) -> &HashMap<String, String> {
        &self.assignments
    }

    pub fn route_for(&self, player_id: &str) -> Option<&str> {
        self.assignments.get(player_id).map(|s| s.as_str())
    }
}

fn assignments(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(id, route)| (id.to_string(), route.to_string()))
        .collect()
}

/// The play concepts named in spec.md §6: `slant-flat`, `mesh`,
/// `four-verts`, `y-option`, `shallow-cross`, `six`.
pub fn standard_concepts() -> Vec<ConceptDef> {
    vec![
        ConceptDef::new(
            "slant-flat",
            "Slant-Flat",
            "singleback-11",
            assignments(&[
                ("off-wr1", "slant"),
                ("off-wr2", "go"),
                ("off-wr3", "curl"),
                ("off-te", "drag"),
                ("off-rb", "flat"),
            ]),
        )
        .unwrap(),
        ConceptDef::new(
            "mesh",
            "Mesh",
            "spread-2x2-11",
            assignments(&[
                ("off-wr1", "drag"),
                ("off-wr2", "drag"),
                ("off-wr3", "curl"),
                ("off-te", "dig"),
                ("off-rb", "flat"),
            ]),
        )
        .unwrap(),
        ConceptDef::new(
            "four-verts",
            "Four Verticals",
            "spread-2x2",
            assignments(&[
                ("off-wr1", "seam"),
                ("off-wr2", "go"),
                ("off-wr3", "seam"),
                ("off-wr4", "go"),
            ]),
        )
        .unwrap(),
        ConceptDef::new(
            "y-option",
            "Y-Option",
            "singleback-12",
            assignments(&[
                ("off-te1", "dig"),
                ("off-te2", "flat"),
                ("off-wr1", "go"),
                ("off-wr2", "comeback"),
                ("off-rb", "flat"),
            ]),
        )
        .unwrap(),
        ConceptDef::new(
            "shallow-cross",
            "Shallow Cross",
            "spread-2x2-11",
            assignments(&[
                ("off-wr1", "drag"),
                ("off-wr2", "dig"),
                ("off-wr3", "go"),
                ("off-te", "curl"),
                ("off-rb", "flat"),
            ]),
        )
        .unwrap(),
        ConceptDef::new(
            "six",
            "Six",
            "trips-right-11",
            assignments(&[
                ("off-wr1", "comeback"),
                ("off-wr2", "post"),
                ("off-wr3", "go"),
                ("off-te", "corner"),
                ("off-rb", "flat"),
            ]),
        )
        .unwrap(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for_known_player() {
        let concepts = standard_concepts();
        let slant_flat = concepts.iter().find(|c| c.key() == "slant-flat").unwrap();
        assert_eq!(slant_flat.route_for("off-wr1"), Some("slant"));
        assert_eq!(slant_flat.route_for("off-nobody"), None);
    }
}
