use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::Vector2D;
use crate::player::PlayerType;

/// A single offensive lineup slot: a stable player id, its position and
/// its on-field role.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    pub player_id: String,
    pub player_type: PlayerType,
    /// Position relative to the ball (x offset from the snapper, y offset
    /// from the line of scrimmage; negative y is behind the LOS).
    pub offset: Vector2D,
}

/// # `FormationDefRaw` struct
///
/// A `FormationDefRaw` is a `FormationDef` before its slots have been
/// validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormationDefRaw {
    key: String,
    name: String,
    slots: Vec<FormationSlot>,
}

impl FormationDefRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err(String::from("Formation key must not be empty"));
        }
        if !self.slots.iter().any(|s| s.player_type == PlayerType::QB) {
            return Err(format!("Formation '{}' has no QB", self.key));
        }
        if self.slots.iter().filter(|s| s.player_type == PlayerType::QB).count() > 1 {
            return Err(format!("Formation '{}' has more than one QB", self.key));
        }
        let mut seen = std::collections::HashSet::new();
        for slot in &self.slots {
            if !seen.insert(&slot.player_id) {
                return Err(format!(
                    "Formation '{}' assigns player id '{}' to more than one slot",
                    self.key, slot.player_id
                ));
            }
        }
        if self.slots.len() < 5 || self.slots.len() > 11 {
            return Err(format!(
                "Formation '{}' has {} offensive slots, expected 5-11",
                self.key,
                self.slots.len()
            ));
        }
        Ok(())
    }
}

/// # `FormationDef` struct
///
/// A `FormationDef` is a validated, immutable offensive formation: a
/// lineup of player-id -> relative position, plus the derived personnel
/// counts `{QB,RB,WR,TE,FB}`.
#[derive(Clone, Debug, Serialize)]
pub struct FormationDef {
    key: String,
    name: String,
    slots: Vec<FormationSlot>,
}

impl TryFrom<FormationDefRaw> for FormationDef {
    type Error = String;

    fn try_from(item: FormationDefRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(FormationDef {
            key: item.key,
            name: item.name,
            slots: item.slots,
        })
    }
}

impl<'de> Deserialize<'de> for FormationDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = FormationDefRaw::deserialize(deserializer)?;
        FormationDef::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl FormationDef {
    pub fn new(key: &str, name: &str, slots: Vec<FormationSlot>) -> Result<FormationDef, String> {
        let raw = FormationDefRaw {
            key: key.to_string(),
            name: name.to_string(),
            slots,
        };
        FormationDef::try_from(raw)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[FormationSlot] {
        &self.slots
    }

    /// Personnel counts for this formation, keyed by position.
    pub fn personnel_counts(&self) -> HashMap<PlayerType, u8> {
        let mut counts = HashMap::new();
        for slot in &self.slots {
            *counts.entry(slot.player_type).or_insert(0) += 1;
        }
        counts
    }

    /// The personnel package string `"{RB+FB}{TE}"`, e.g. `"11"` for one
    /// back and one tight end.
    pub fn personnel_package(&self) -> String {
        let counts = self.personnel_counts();
        let backs = counts.get(&PlayerType::RB).copied().unwrap_or(0)
            + counts.get(&PlayerType::FB).copied().unwrap_or(0);
        let tes = counts.get(&PlayerType::TE).copied().unwrap_or(0);
        format!("{}{}", backs, tes)
    }
}

fn slot(id: &str, player_type: PlayerType, x: f64, y: f64) -> FormationSlot {
    FormationSlot {
        player_id: id.to_string(),
        player_type,
        offset: Vector2D::new(x, y),
    }
}

/// Formation definitions named in spec.md §6: `trips-right(-10)`,
/// `singleback(-11/-12)`, `spread-2x2(-11)`, `empty`, `i-form-21`,
/// `strong-22`. Offsets are relative to the snapper: x is lateral
/// (negative = offense-left), y is depth behind the line of scrimmage
/// (negative = behind LOS).
pub fn standard_formations() -> Vec<FormationDef> {
    use PlayerType::*;
    vec![
        FormationDef::new(
            "singleback-11",
            "Singleback, 11 personnel",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-rb", RB, 0.0, -7.0),
                slot("off-te", TE, 8.0, -0.5),
                slot("off-wr1", WR, -18.0, 0.0),
                slot("off-wr2", WR, 18.0, 0.0),
                slot("off-wr3", WR, -12.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "singleback-12",
            "Singleback, 12 personnel",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-rb", RB, 0.0, -7.0),
                slot("off-te1", TE, 8.0, -0.5),
                slot("off-te2", TE, -8.0, -0.5),
                slot("off-wr1", WR, -18.0, 0.0),
                slot("off-wr2", WR, 18.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "trips-right-11",
            "Trips right, 11 personnel",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-rb", RB, -3.0, -7.0),
                slot("off-te", TE, 8.0, -0.5),
                slot("off-wr1", WR, 14.0, 0.0),
                slot("off-wr2", WR, 18.0, 0.0),
                slot("off-wr3", WR, 22.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "trips-right-10",
            "Trips right, 10 personnel",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-rb", RB, -3.0, -7.0),
                slot("off-wr1", WR, -18.0, 0.0),
                slot("off-wr2", WR, 14.0, 0.0),
                slot("off-wr3", WR, 18.0, 0.0),
                slot("off-wr4", WR, 22.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "spread-2x2-11",
            "Spread 2x2, 11 personnel",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-rb", RB, 3.0, -7.0),
                slot("off-te", TE, 8.0, -0.5),
                slot("off-wr1", WR, -18.0, 0.0),
                slot("off-wr2", WR, -12.0, 0.0),
                slot("off-wr3", WR, 18.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "spread-2x2",
            "Spread 2x2, empty backfield",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-wr1", WR, -18.0, 0.0),
                slot("off-wr2", WR, -12.0, 0.0),
                slot("off-wr3", WR, 18.0, 0.0),
                slot("off-wr4", WR, 12.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "empty",
            "Empty backfield",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-te", TE, 8.0, -0.5),
                slot("off-wr1", WR, -18.0, 0.0),
                slot("off-wr2", WR, -12.0, 0.0),
                slot("off-wr3", WR, 18.0, 0.0),
                slot("off-wr4", WR, 12.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "i-form-21",
            "I-formation, 21 personnel",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-fb", FB, 0.0, -8.0),
                slot("off-rb", RB, 0.0, -11.0),
                slot("off-te", TE, 8.0, -0.5),
                slot("off-wr1", WR, -18.0, 0.0),
                slot("off-wr2", WR, 18.0, 0.0),
            ],
        )
        .unwrap(),
        FormationDef::new(
            "strong-22",
            "Strong, 22 personnel",
            vec![
                slot("off-qb", QB, 0.0, -5.0),
                slot("off-fb", FB, 6.0, -7.0),
                slot("off-rb", RB, 0.0, -7.0),
                slot("off-te1", TE, 8.0, -0.5),
                slot("off-te2", TE, -8.0, -0.5),
                slot("off-wr1", WR, 18.0, 0.0),
            ],
        )
        .unwrap(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personnel_package_matches_formation_id() {
        let formations = standard_formations();
        let singleback_11 = formations.iter().find(|f| f.key() == "singleback-11").unwrap();
        assert_eq!(singleback_11.personnel_package(), "11");
        let strong_22 = formations.iter().find(|f| f.key() == "strong-22").unwrap();
        assert_eq!(strong_22.personnel_package(), "22");
    }

    #[test]
    fn test_formation_requires_exactly_one_qb() {
        let slots = vec![slot("off-wr1", PlayerType::WR, 0.0, 0.0)];
        assert!(FormationDef::new("bad", "Bad", slots).is_err());
    }

    #[test]
    fn test_formation_rejects_duplicate_player_id() {
        let slots = vec![
            slot("off-qb", PlayerType::QB, 0.0, -5.0),
            slot("off-qb", PlayerType::WR, 10.0, 0.0),
            slot("off-rb", PlayerType::RB, 0.0, -7.0),
            slot("off-wr2", PlayerType::WR, -10.0, 0.0),
            slot("off-wr3", PlayerType::WR, -18.0, 0.0),
        ];
        assert!(FormationDef::new("bad", "Bad", slots).is_err());
    }
}
