//! Core types shared across the damage resolution pipeline

use serde::{Deserialize, Serialize};

/// Kind of incoming damage. `Sharp` may be converted to `Blunt` while a hit
/// is being resolved, depending on the configured conversion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    Sharp,
    Blunt,
    Heat,
    /// Damage with no armor interaction (psychic, toxic, ...). Armor passes
    /// are skipped entirely for this kind.
    Other,
}

impl DamageKind {
    /// The armor rating category this damage is resolved against, if any.
    pub fn armor_category(self) -> Option<ArmorCategory> {
        match self {
            DamageKind::Sharp => Some(ArmorCategory::Sharp),
            DamageKind::Blunt => Some(ArmorCategory::Blunt),
            DamageKind::Heat => Some(ArmorCategory::Heat),
            DamageKind::Other => None,
        }
    }
}

/// Armor rating category. Selected once per attack from the *initial* damage
/// kind; a mid-pipeline Sharp→Blunt conversion does not reselect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorCategory {
    Sharp,
    Blunt,
    Heat,
}

/// Technology level of a weapon, armor piece or creature body.
///
/// The numeric gap between levels drives the tech scaling feature, so the
/// discriminants are part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechLevel {
    Undefined = 0,
    Animal = 1,
    Neolithic = 2,
    Medieval = 3,
    Industrial = 4,
    Spacer = 5,
    Ultra = 6,
    Archotech = 7,
}

impl Default for TechLevel {
    fn default() -> Self {
        TechLevel::Undefined
    }
}

/// Broad race category of a defender. Drives the per-race armor buffs and a
/// couple of special cases (mechanoid bodies count as metal and Ultra tech).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceKind {
    Mechanoid,
    Insect,
    AnomalyEntity,
    Humanlike,
    Other,
}

/// Armor material, for the durability type-interaction and metal-only sharp
/// conversion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Metal,
    Other,
}

/// Relation of an attack's instigator to the defender's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionRelation {
    /// Instigator belongs to the player faction (friendly fire candidate).
    Player,
    /// Instigator is hostile to the player.
    Hostile,
    /// Allied or neutral instigator.
    AllyOrNeutral,
}

/// Identifier for a targeted body region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyRegion(pub String);

impl From<&str> for BodyRegion {
    fn from(s: &str) -> Self {
        BodyRegion(s.to_string())
    }
}

impl From<String> for BodyRegion {
    fn from(s: String) -> Self {
        BodyRegion(s)
    }
}
