//! Defender - The entity on the receiving end of an attack

use crate::reaction::AdrenalineState;
use crate::types::{ArmorCategory, BodyRegion, MaterialKind, RaceKind, TechLevel};
use serde::{Deserialize, Serialize};

/// Armor rating per damage category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ArmorRatings {
    pub sharp: f32,
    pub blunt: f32,
    pub heat: f32,
}

impl ArmorRatings {
    pub fn new(sharp: f32, blunt: f32, heat: f32) -> Self {
        ArmorRatings { sharp, blunt, heat }
    }

    pub fn rating(&self, category: ArmorCategory) -> f32 {
        match category {
            ArmorCategory::Sharp => self.sharp,
            ArmorCategory::Blunt => self.blunt,
            ArmorCategory::Heat => self.heat,
        }
    }
}

/// One worn armor piece. Durability is only ever changed through the
/// [`DurabilityDamage`](crate::mitigation::DurabilityDamage) events returned
/// by a resolution call; the resolver itself never mutates a piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmorPiece {
    /// Display name, used in logs and tracker summaries.
    pub name: String,
    pub ratings: ArmorRatings,
    /// Remaining durability, in [0, max_durability].
    pub durability: u32,
    /// Maximum durability, at least 1.
    pub max_durability: u32,
    pub material: MaterialKind,
    pub tech_level: TechLevel,
    /// How many body layers this piece nominally covers. Only consulted when
    /// thick-armor layering is enabled; clamped to at least 1.
    pub layers: u32,
    /// Body regions this piece protects.
    pub covered_regions: Vec<BodyRegion>,
}

impl ArmorPiece {
    pub fn new(name: impl Into<String>, ratings: ArmorRatings, max_durability: u32) -> Self {
        let max_durability = max_durability.max(1);
        ArmorPiece {
            name: name.into(),
            ratings,
            durability: max_durability,
            max_durability,
            material: MaterialKind::Other,
            tech_level: TechLevel::Undefined,
            layers: 1,
            covered_regions: Vec::new(),
        }
    }

    pub fn metal(mut self) -> Self {
        self.material = MaterialKind::Metal;
        self
    }

    pub fn with_tech_level(mut self, tech: TechLevel) -> Self {
        self.tech_level = tech;
        self
    }

    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers.max(1);
        self
    }

    pub fn covering<I>(mut self, regions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<BodyRegion>,
    {
        self.covered_regions
            .extend(regions.into_iter().map(Into::into));
        self
    }

    pub fn covers(&self, region: &BodyRegion) -> bool {
        self.covered_regions.contains(region)
    }

    /// Remaining durability as a fraction of maximum.
    pub fn durability_fraction(&self) -> f32 {
        self.durability as f32 / self.max_durability as f32
    }

    /// Apply durability loss, saturating at zero.
    pub fn take_durability_damage(&mut self, amount: u32) {
        self.durability = self.durability.saturating_sub(amount);
    }
}

/// Health and pain state of a defender, as far as the resolver needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthState {
    /// Pain level in [0, 1].
    pub pain: f32,
    /// Overall body condition in [0, 1]; feeds the compatibility-mode
    /// propensity math for natural armor.
    pub summary_health: f32,
    pub adrenaline: AdrenalineState,
}

impl Default for HealthState {
    fn default() -> Self {
        HealthState {
            pain: 0.0,
            summary_health: 1.0,
            adrenaline: AdrenalineState::None,
        }
    }
}

/// The defending entity: race, natural armor, worn armor outermost-first and
/// an optional health model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defender {
    pub race: RaceKind,
    /// Player-controlled colonist, for the friendly-fire multiplier.
    pub is_player_colonist: bool,
    pub natural_armor: ArmorRatings,
    /// Worn armor, outermost piece first.
    pub armor: Vec<ArmorPiece>,
    pub health: Option<HealthState>,
}

impl Defender {
    pub fn new(race: RaceKind) -> Self {
        Defender {
            race,
            is_player_colonist: false,
            natural_armor: ArmorRatings::default(),
            armor: Vec::new(),
            health: None,
        }
    }

    pub fn player_colonist(mut self) -> Self {
        self.is_player_colonist = true;
        self
    }

    pub fn with_natural_armor(mut self, ratings: ArmorRatings) -> Self {
        self.natural_armor = ratings;
        self
    }

    pub fn wearing(mut self, piece: ArmorPiece) -> Self {
        self.armor.push(piece);
        self
    }

    pub fn with_health(mut self, health: HealthState) -> Self {
        self.health = Some(health);
        self
    }

    /// Overall body condition; defenders without a health model count as
    /// fully healthy.
    pub fn summary_health(&self) -> f32 {
        self.health.as_ref().map_or(1.0, |h| h.summary_health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durability_floor() {
        let mut piece = ArmorPiece::new("plate", ArmorRatings::new(1.0, 0.4, 0.3), 100);
        piece.take_durability_damage(40);
        assert_eq!(piece.durability, 60);
        piece.take_durability_damage(1000);
        assert_eq!(piece.durability, 0);
    }

    #[test]
    fn test_max_durability_at_least_one() {
        let piece = ArmorPiece::new("rag", ArmorRatings::default(), 0);
        assert_eq!(piece.max_durability, 1);
        assert!((piece.durability_fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_coverage() {
        let piece = ArmorPiece::new("helmet", ArmorRatings::default(), 80).covering(["head"]);
        assert!(piece.covers(&"head".into()));
        assert!(!piece.covers(&"torso".into()));
    }

    #[test]
    fn test_summary_health_defaults_to_full() {
        let defender = Defender::new(RaceKind::Other);
        assert!((defender.summary_health() - 1.0).abs() < f32::EPSILON);
    }
}
