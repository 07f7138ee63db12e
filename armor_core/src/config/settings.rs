//! Settings - the full set of combat tweak toggles
//!
//! Every field carries an explicit serde default so a settings file written
//! by an older version (or one with keys missing) still loads cleanly.

use super::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which algorithm finalizes a mitigation pass. The modes are mutually
/// exclusive by construction; the reworks would otherwise override the
/// calculation styles in a fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationMode {
    /// Deflect at `min(rating/2, 1)`, reduce at `rating`, one roll.
    Vanilla,
    /// Integer tiers for armor and weapons; big gaps decide the pass outright.
    ArmorTiers,
    /// Healthy armor always deflects and soaks the damage into durability;
    /// worn-down armor leaks a durability-scaled share through.
    DeflectionRework,
    /// Vanilla-style rolls, but penetration decays as it passes through
    /// armor and sharp damage is easier to deflect.
    AlgorithmicCustom,
    /// Emulation of an alternate engine's multiplicative propensity model.
    CompatibilityMode,
}

/// When sharp damage that got reduced or deflected converts to blunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpConversionRule {
    /// Any reducing or deflecting armor dulls the hit.
    Always,
    /// Only metal armor dulls the hit.
    MetalOnly,
    /// Only armor whose effective rating clears the configured threshold.
    RatingThreshold,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_unit() -> f32 {
    1.0
}
fn default_half() -> f32 {
    0.5
}
fn default_mode() -> MitigationMode {
    MitigationMode::AlgorithmicCustom
}
fn default_sharp_rule() -> SharpConversionRule {
    SharpConversionRule::RatingThreshold
}
fn default_sharp_threshold() -> f32 {
    0.2
}
fn default_not_armor_threshold() -> f32 {
    0.12
}
fn default_durability_loss_mult() -> f32 {
    0.004
}
fn default_adrenaline_chance() -> f32 {
    0.1
}
fn default_tech_boost() -> f32 {
    0.1
}
fn default_type_interaction_mult() -> f32 {
    1.5
}
fn default_max_armor() -> f32 {
    20.1
}
fn default_item_durability_mult() -> f32 {
    1.2
}
fn default_mechanoid_buff() -> f32 {
    1.2
}
fn default_heat_durability_mult() -> f32 {
    2.0
}

/// The ~45 independent combat tweaks. Immutable for the duration of one
/// resolution call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Features ===
    #[serde(default = "default_mode")]
    pub mitigation_mode: MitigationMode,
    #[serde(default = "default_sharp_rule")]
    pub sharp_conversion: SharpConversionRule,
    /// Effective rating above which sharp converts to blunt under
    /// [`SharpConversionRule::RatingThreshold`].
    #[serde(default = "default_sharp_threshold")]
    pub sharp_to_blunt_threshold: f32,
    /// Ratings under the threshold are not treated as armor at all.
    #[serde(default = "default_true")]
    pub not_armor: bool,
    /// Whether sub-threshold items still take durability damage (which also
    /// keeps them in the mitigation pipeline long enough to be damaged).
    #[serde(default = "default_true")]
    pub not_armor_still_damaged: bool,
    #[serde(default = "default_not_armor_threshold")]
    pub not_armor_threshold: f32,
    /// Armor protection scales with remaining durability.
    #[serde(default = "default_true")]
    pub durability_affects_armor: bool,
    /// Effectiveness lost per 1% durability missing.
    #[serde(default = "default_durability_loss_mult")]
    pub durability_armor_loss_mult: f32,
    /// Items under 50% durability lose effectiveness three times as fast.
    #[serde(default = "default_true")]
    pub tattered_armor_scaling: bool,
    /// Damage reduction scales with hit size, favoring single heavy hits.
    #[serde(default = "default_true")]
    pub damage_scaling_effect: bool,
    /// Reduction always triggers when deflection does not, with a
    /// rerandomized amount.
    #[serde(default = "default_false")]
    pub reliable_armors: bool,
    /// One mitigation pass per covered body layer, at diminishing strength.
    #[serde(default = "default_false")]
    pub thick_armor: bool,
    /// Rating multiplier applied per sub-layer after the first.
    #[serde(default = "default_half")]
    pub thick_armor_effectiveness_loss: f32,
    /// Armor with any effective rating always shaves off a minimum amount.
    #[serde(default = "default_true")]
    pub always_reduce_damage: bool,
    #[serde(default = "default_false")]
    pub adrenaline_enabled: bool,
    #[serde(default = "default_adrenaline_chance")]
    pub adrenaline_chance: f32,
    /// Armor and penetration scale with the tech gap between armor and weapon.
    #[serde(default = "default_true")]
    pub tech_level_scaling: bool,
    #[serde(default = "default_tech_boost")]
    pub tech_level_boost: f32,
    /// Blunt wears down metal armor faster, sharp wears down non-metal.
    #[serde(default = "default_true")]
    pub durability_type_interaction: bool,
    #[serde(default = "default_type_interaction_mult")]
    pub durability_type_interaction_mult: f32,
    /// Durability fraction above which the deflection rework fully absorbs.
    #[serde(default = "default_half")]
    pub deflection_rework_threshold: f32,
    /// Every worn piece protects every body region.
    #[serde(default = "default_false")]
    pub all_armor_protects_everywhere: bool,
    /// Armor effectiveness override for the compatibility mode.
    #[serde(default = "default_half")]
    pub compat_armor_effectiveness: f32,
    /// Per-item running averages of combat effectiveness.
    #[serde(default = "default_false")]
    pub tracking_enabled: bool,

    // === Tweaks ===
    /// Armor rating cap; values above 20 mean uncapped.
    #[serde(default = "default_max_armor")]
    pub max_armor_amount: f32,
    #[serde(default = "default_unit")]
    pub armor_strength: f32,
    #[serde(default = "default_unit")]
    pub weapon_range_multiplier: f32,
    #[serde(default = "default_unit")]
    pub burst_size_multiplier: f32,
    #[serde(default = "default_unit")]
    pub armor_pen_importance: f32,
    #[serde(default = "default_unit")]
    pub friendly_fire_multiplier: f32,
    #[serde(default = "default_unit")]
    pub enemy_damage_multiplier: f32,
    #[serde(default = "default_unit")]
    pub deflection_chance_multiplier: f32,
    #[serde(default = "default_unit")]
    pub reduction_chance_multiplier: f32,
    /// Base fraction of damage removed when a reduction triggers.
    #[serde(default = "default_half")]
    pub reduction_amount_multiplier: f32,
    #[serde(default = "default_unit")]
    pub damage_boost: f32,
    #[serde(default = "default_unit")]
    pub melee_damage_boost: f32,
    #[serde(default = "default_unit")]
    pub ranged_damage_boost: f32,
    #[serde(default = "default_item_durability_mult")]
    pub item_durability_multiplier: f32,
    #[serde(default = "default_mechanoid_buff")]
    pub mechanoid_buff: f32,
    #[serde(default = "default_unit")]
    pub anomaly_buff: f32,
    #[serde(default = "default_unit")]
    pub insect_buff: f32,
    #[serde(default = "default_unit")]
    pub humanlike_buff: f32,
    #[serde(default = "default_heat_durability_mult")]
    pub heat_durability_multiplier: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mitigation_mode: default_mode(),
            sharp_conversion: default_sharp_rule(),
            sharp_to_blunt_threshold: default_sharp_threshold(),
            not_armor: true,
            not_armor_still_damaged: true,
            not_armor_threshold: default_not_armor_threshold(),
            durability_affects_armor: true,
            durability_armor_loss_mult: default_durability_loss_mult(),
            tattered_armor_scaling: true,
            damage_scaling_effect: true,
            reliable_armors: false,
            thick_armor: false,
            thick_armor_effectiveness_loss: 0.5,
            always_reduce_damage: true,
            adrenaline_enabled: false,
            adrenaline_chance: default_adrenaline_chance(),
            tech_level_scaling: true,
            tech_level_boost: default_tech_boost(),
            durability_type_interaction: true,
            durability_type_interaction_mult: default_type_interaction_mult(),
            deflection_rework_threshold: 0.5,
            all_armor_protects_everywhere: false,
            compat_armor_effectiveness: 0.5,
            tracking_enabled: false,
            max_armor_amount: default_max_armor(),
            armor_strength: 1.0,
            weapon_range_multiplier: 1.0,
            burst_size_multiplier: 1.0,
            armor_pen_importance: 1.0,
            friendly_fire_multiplier: 1.0,
            enemy_damage_multiplier: 1.0,
            deflection_chance_multiplier: 1.0,
            reduction_chance_multiplier: 1.0,
            reduction_amount_multiplier: 0.5,
            damage_boost: 1.0,
            melee_damage_boost: 1.0,
            ranged_damage_boost: 1.0,
            item_durability_multiplier: default_item_durability_mult(),
            mechanoid_buff: default_mechanoid_buff(),
            anomaly_buff: 1.0,
            insect_buff: 1.0,
            humanlike_buff: 1.0,
            heat_durability_multiplier: default_heat_durability_mult(),
        }
    }
}

impl Settings {
    /// Preset matching the unmodded simulation as closely as possible: all
    /// optional rules off, vanilla roll model, rating cap at 200%.
    pub fn vanilla() -> Self {
        Settings {
            mitigation_mode: MitigationMode::Vanilla,
            sharp_conversion: SharpConversionRule::Always,
            sharp_to_blunt_threshold: 0.0,
            not_armor: false,
            not_armor_threshold: 0.15,
            durability_affects_armor: false,
            tattered_armor_scaling: false,
            damage_scaling_effect: false,
            always_reduce_damage: false,
            tech_level_scaling: false,
            tech_level_boost: 0.0,
            durability_type_interaction: false,
            durability_type_interaction_mult: 0.0,
            max_armor_amount: 2.0,
            item_durability_multiplier: 1.0,
            mechanoid_buff: 1.0,
            heat_durability_multiplier: 1.0,
            ..Settings::default()
        }
    }

    /// The "modder's choice" preset: defaults plus the reworked extras that
    /// play well together.
    pub fn recommended() -> Self {
        Settings {
            reliable_armors: true,
            thick_armor: true,
            adrenaline_enabled: true,
            item_durability_multiplier: 1.5,
            ..Settings::default()
        }
    }

    /// Preset emulating the alternate engine wholesale.
    pub fn compat() -> Self {
        Settings {
            mitigation_mode: MitigationMode::CompatibilityMode,
            compat_armor_effectiveness: 0.5,
            ..Settings::vanilla()
        }
    }

    /// Scramble every option, the way the settings screen's "Random" button
    /// does. Useful for stress tests.
    pub fn randomize(rng: &mut impl Rng) -> Self {
        fn round_to(value: f32, step: f32) -> f32 {
            (value / step).round() * step
        }

        let max_armor_amount = round_to(rng.gen_range(0.0..20.1), 0.1);
        Settings {
            mitigation_mode: match rng.gen_range(0..5) {
                0 => MitigationMode::Vanilla,
                1 => MitigationMode::ArmorTiers,
                2 => MitigationMode::DeflectionRework,
                3 => MitigationMode::AlgorithmicCustom,
                _ => MitigationMode::CompatibilityMode,
            },
            sharp_conversion: match rng.gen_range(0..3) {
                0 => SharpConversionRule::Always,
                1 => SharpConversionRule::MetalOnly,
                _ => SharpConversionRule::RatingThreshold,
            },
            sharp_to_blunt_threshold: round_to(rng.gen_range(0.0..max_armor_amount.max(0.05)), 0.05),
            not_armor: rng.gen_bool(0.5),
            not_armor_still_damaged: rng.gen_bool(0.5),
            not_armor_threshold: round_to(rng.gen_range(0.0..3.0), 0.05),
            durability_affects_armor: rng.gen_bool(0.5),
            durability_armor_loss_mult: round_to(rng.gen_range(0.0..0.05), 0.001),
            tattered_armor_scaling: rng.gen_bool(0.5),
            damage_scaling_effect: rng.gen_bool(0.5),
            reliable_armors: rng.gen_bool(0.5),
            thick_armor: rng.gen_bool(0.5),
            thick_armor_effectiveness_loss: round_to(rng.gen_range(0.0..1.0), 0.01),
            always_reduce_damage: rng.gen_bool(0.5),
            adrenaline_enabled: rng.gen_bool(0.5),
            adrenaline_chance: round_to(rng.gen_range(0.0..1.0), 0.01),
            tech_level_scaling: rng.gen_bool(0.5),
            tech_level_boost: round_to(rng.gen_range(0.0..2.0), 0.05),
            durability_type_interaction: rng.gen_bool(0.5),
            durability_type_interaction_mult: round_to(rng.gen_range(0.0..3.0), 0.05),
            deflection_rework_threshold: round_to(rng.gen_range(0.0..1.0), 0.05),
            all_armor_protects_everywhere: rng.gen_bool(0.5),
            compat_armor_effectiveness: round_to(rng.gen_range(0.0..1.0), 0.01),
            tracking_enabled: rng.gen_bool(0.5),
            max_armor_amount,
            armor_strength: round_to(rng.gen_range(0.0..3.0), 0.1),
            weapon_range_multiplier: round_to(rng.gen_range(0.0..3.0), 0.1),
            burst_size_multiplier: round_to(rng.gen_range(0.1..8.0), 0.1),
            armor_pen_importance: round_to(rng.gen_range(0.0..3.0), 0.1),
            friendly_fire_multiplier: round_to(rng.gen_range(0.0..3.0), 0.05),
            enemy_damage_multiplier: round_to(rng.gen_range(0.0..1.0), 0.05),
            deflection_chance_multiplier: round_to(rng.gen_range(0.0..3.0), 0.05),
            reduction_chance_multiplier: round_to(rng.gen_range(0.0..3.0), 0.05),
            reduction_amount_multiplier: round_to(rng.gen_range(0.01..1.0), 0.01),
            damage_boost: round_to(rng.gen_range(0.1..3.0), 0.1),
            melee_damage_boost: round_to(rng.gen_range(0.0..2.0), 0.05),
            ranged_damage_boost: round_to(rng.gen_range(0.0..2.0), 0.05),
            item_durability_multiplier: round_to(rng.gen_range(0.0..3.0), 0.1),
            mechanoid_buff: round_to(rng.gen_range(0.1..3.0), 0.1),
            anomaly_buff: round_to(rng.gen_range(0.0..3.0), 0.05),
            insect_buff: round_to(rng.gen_range(0.0..3.0), 0.05),
            humanlike_buff: round_to(rng.gen_range(0.0..3.0), 0.05),
            heat_durability_multiplier: round_to(rng.gen_range(0.0..3.0), 0.05),
        }
    }

    /// The armor rating cap, or `None` when the sentinel "infinite" value is
    /// set.
    pub fn armor_cap(&self) -> Option<f32> {
        if self.max_armor_amount < 20.05 {
            Some(self.max_armor_amount)
        } else {
            None
        }
    }

    /// Reject out-of-range or non-finite values before a settings object is
    /// allowed anywhere near combat.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check_unit(name: &str, value: f32) -> Result<(), ConfigError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
            Ok(())
        }
        fn check_non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
            Ok(())
        }

        check_unit("adrenaline_chance", self.adrenaline_chance)?;
        check_unit(
            "thick_armor_effectiveness_loss",
            self.thick_armor_effectiveness_loss,
        )?;
        check_unit("deflection_rework_threshold", self.deflection_rework_threshold)?;
        check_unit("compat_armor_effectiveness", self.compat_armor_effectiveness)?;
        check_unit("reduction_amount_multiplier", self.reduction_amount_multiplier)?;

        check_non_negative("sharp_to_blunt_threshold", self.sharp_to_blunt_threshold)?;
        check_non_negative("not_armor_threshold", self.not_armor_threshold)?;
        check_non_negative("durability_armor_loss_mult", self.durability_armor_loss_mult)?;
        check_non_negative("tech_level_boost", self.tech_level_boost)?;
        check_non_negative(
            "durability_type_interaction_mult",
            self.durability_type_interaction_mult,
        )?;
        check_non_negative("max_armor_amount", self.max_armor_amount)?;
        check_non_negative("armor_strength", self.armor_strength)?;
        check_non_negative("weapon_range_multiplier", self.weapon_range_multiplier)?;
        check_non_negative("burst_size_multiplier", self.burst_size_multiplier)?;
        check_non_negative("armor_pen_importance", self.armor_pen_importance)?;
        check_non_negative("friendly_fire_multiplier", self.friendly_fire_multiplier)?;
        check_non_negative("enemy_damage_multiplier", self.enemy_damage_multiplier)?;
        check_non_negative(
            "deflection_chance_multiplier",
            self.deflection_chance_multiplier,
        )?;
        check_non_negative(
            "reduction_chance_multiplier",
            self.reduction_chance_multiplier,
        )?;
        check_non_negative("damage_boost", self.damage_boost)?;
        check_non_negative("melee_damage_boost", self.melee_damage_boost)?;
        check_non_negative("ranged_damage_boost", self.ranged_damage_boost)?;
        check_non_negative("item_durability_multiplier", self.item_durability_multiplier)?;
        check_non_negative("mechanoid_buff", self.mechanoid_buff)?;
        check_non_negative("anomaly_buff", self.anomaly_buff)?;
        check_non_negative("insect_buff", self.insect_buff)?;
        check_non_negative("humanlike_buff", self.humanlike_buff)?;
        check_non_negative("heat_durability_multiplier", self.heat_durability_multiplier)?;
        Ok(())
    }

    /// Rough 0..1 estimate of how punishing the current settings are,
    /// shown as a difficulty bar in settings screens.
    pub fn difficulty_score(&self) -> f32 {
        fn clamp01(v: f32) -> f32 {
            v.clamp(0.0, 1.0)
        }

        let mut score = 0.14;

        if self.durability_affects_armor {
            score += 0.03;
        }
        if self.damage_scaling_effect {
            score += 0.03;
        }
        if self.always_reduce_damage {
            score += 0.03;
        }
        if self.durability_type_interaction {
            score += 0.03;
        }
        if self.mitigation_mode == MitigationMode::DeflectionRework {
            score += 0.03;
            score += clamp01(self.deflection_rework_threshold / 0.75) * 0.05;
        }

        if self.tech_level_scaling {
            score += clamp01(self.tech_level_boost / 0.5) * 0.05;
        }

        score -= (1.0 - clamp01(self.durability_type_interaction_mult / 2.0)) * 0.02;
        score += clamp01(self.damage_boost / 2.0) * 0.1;
        score += clamp01(self.item_durability_multiplier / 2.0) * 0.05;
        score += clamp01(self.armor_pen_importance / 1.5) * 0.05;
        score += clamp01(self.durability_type_interaction_mult / 2.0) * 0.05;

        score += (self.mechanoid_buff - 1.0) * 0.15;
        score += (self.anomaly_buff - 1.0) * 0.15;
        score += (self.insect_buff - 1.0) * 0.15;
        score += (self.enemy_damage_multiplier - 1.0) * 0.25;
        score += (self.friendly_fire_multiplier - 1.0) * 0.05;

        if self.sharp_conversion == SharpConversionRule::RatingThreshold
            && self.max_armor_amount > 0.0
        {
            score += clamp01(
                (self.max_armor_amount - self.sharp_to_blunt_threshold) / self.max_armor_amount,
            ) * 0.05;
        }

        clamp01(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.mitigation_mode, MitigationMode::AlgorithmicCustom);
        assert_eq!(settings.sharp_conversion, SharpConversionRule::RatingThreshold);
        assert!((settings.reduction_amount_multiplier - 0.5).abs() < f32::EPSILON);
        assert!(settings.armor_cap().is_none());
        settings.validate().unwrap();
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let settings: Settings = crate::config::parse_toml(
            r#"
mitigation_mode = "vanilla"
reliable_armors = true
"#,
        )
        .unwrap();
        assert_eq!(settings.mitigation_mode, MitigationMode::Vanilla);
        assert!(settings.reliable_armors);
        // Everything omitted keeps its default.
        assert!((settings.mechanoid_buff - 1.2).abs() < f32::EPSILON);
        assert!(settings.durability_affects_armor);
    }

    #[test]
    fn test_empty_config_loads() {
        let settings: Settings = crate::config::parse_toml("").unwrap();
        settings.validate().unwrap();
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let settings = Settings::recommended();
        let text = crate::config::to_toml(&settings).unwrap();
        let back: Settings = crate::config::parse_toml(&text).unwrap();
        assert_eq!(back.mitigation_mode, settings.mitigation_mode);
        assert_eq!(back.thick_armor, settings.thick_armor);
        assert!((back.item_durability_multiplier - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_vanilla_preset_disables_extras() {
        let settings = Settings::vanilla();
        assert_eq!(settings.mitigation_mode, MitigationMode::Vanilla);
        assert!(!settings.durability_affects_armor);
        assert!(!settings.always_reduce_damage);
        assert_eq!(settings.armor_cap(), Some(2.0));
        settings.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_bad_chance() {
        let settings = Settings {
            adrenaline_chance: 1.5,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_nan() {
        let settings = Settings {
            damage_boost: f32::NAN,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_randomized_settings_validate() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            Settings::randomize(&mut rng).validate().unwrap();
        }
    }

    #[test]
    fn test_difficulty_score_in_unit_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let score = Settings::randomize(&mut rng).difficulty_score();
            assert!((0.0..=1.0).contains(&score));
        }
        assert!((0.0..=1.0).contains(&Settings::vanilla().difficulty_score()));
    }
}
