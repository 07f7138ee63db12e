//! AttackInfo - Description of one incoming attack

use crate::types::{DamageKind, FactionRelation, TechLevel};
use serde::{Deserialize, Serialize};

/// One attack as handed to the resolver. Built once per hit by the caller and
/// read-only for the duration of the resolution call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackInfo {
    /// Raw damage amount, before any pre-scaling.
    pub damage: f32,
    /// Armor penetration value.
    pub penetration: f32,
    /// Damage kind at the moment of impact.
    pub kind: DamageKind,
    /// Ranged hit (projectile) vs melee hit.
    pub is_ranged: bool,
    /// Tech level of the attacking weapon.
    pub weapon_tech: TechLevel,
    /// Who caused the hit, when known. Environmental damage has none.
    pub instigator: Option<Instigator>,
}

impl AttackInfo {
    /// Create an attack with the common defaults (melee, Industrial weapon,
    /// no instigator).
    pub fn new(damage: f32, penetration: f32, kind: DamageKind) -> Self {
        AttackInfo {
            damage,
            penetration,
            kind,
            is_ranged: false,
            // Unknown weapons are treated as Industrial, same as the
            // simulation's fallback.
            weapon_tech: TechLevel::Industrial,
            instigator: None,
        }
    }

    pub fn ranged(mut self) -> Self {
        self.is_ranged = true;
        self
    }

    pub fn with_weapon_tech(mut self, tech: TechLevel) -> Self {
        self.weapon_tech = tech;
        self
    }

    pub fn from_instigator(mut self, instigator: Instigator) -> Self {
        self.instigator = Some(instigator);
        self
    }
}

/// Identity of whoever caused an attack, as far as the resolver cares:
/// faction standing and an optional weapon id for usage tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instigator {
    pub relation: FactionRelation,
    /// Stable identity of the weapon used, for the tracking sink.
    pub weapon_id: Option<String>,
}

impl Instigator {
    pub fn new(relation: FactionRelation) -> Self {
        Instigator {
            relation,
            weapon_id: None,
        }
    }

    pub fn with_weapon(mut self, weapon_id: impl Into<String>) -> Self {
        self.weapon_id = Some(weapon_id.into());
        self
    }
}
