//! The armor mitigation function: one armor rating against one damage pass
//!
//! Called once per sub-layer per armor piece, then once for natural armor.
//! Check order matters and is part of the observable behavior: the not-armor
//! rejection runs both before tech scaling and again after durability
//! feedback has lowered the rating.

use crate::attack::AttackInfo;
use crate::config::{MitigationMode, Settings, SharpConversionRule};
use crate::defender::{ArmorPiece, Defender};
use crate::mitigation::outcome::{DurabilityDamage, PassResult};
use crate::rng::round_random;
use crate::types::{DamageKind, MaterialKind, RaceKind, TechLevel};
use rand::Rng;
use tracing::trace;

/// Apply one armor rating to the threaded damage and penetration values.
///
/// `piece` is `None` for the natural-armor pass. `armor_tech` is the tech
/// level credited to this pass; sub-layers after the first are passed
/// `Undefined` so tech scaling only applies once per piece.
///
/// Durability loss is pushed onto `durability_out` rather than applied, and
/// the damage kind may be rewritten Sharp to Blunt in place.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_armor(
    damage: &mut f32,
    penetration: &mut f32,
    mut rating: f32,
    piece: Option<(usize, &ArmorPiece)>,
    kind: &mut DamageKind,
    defender: &Defender,
    attack: &AttackInfo,
    armor_tech: TechLevel,
    settings: &Settings,
    durability_out: &mut Vec<DurabilityDamage>,
    rng: &mut impl Rng,
) -> PassResult {
    let worn = piece.is_some();
    let metal = match piece {
        Some((_, p)) => p.material == MaterialKind::Metal,
        None => defender.race == RaceKind::Mechanoid,
    };

    // First not-armor check, on the raw rating.
    if settings.not_armor
        && rating < settings.not_armor_threshold
        && !settings.not_armor_still_damaged
    {
        trace!(rating, "pass skipped, rating below not-armor threshold");
        return PassResult::Ignored;
    }

    let tech_diff = armor_tech as i32 - attack.weapon_tech as i32;
    let tech_mult = tech_diff as f32 * settings.tech_level_boost;
    let mut pen = *penetration;
    let mut compat_pen = pen;

    if settings.tech_level_scaling {
        rating *= 1.0 + tech_mult * 0.9;
        pen *= 1.0 - tech_mult * 0.1;
    } else if settings.mitigation_mode == MitigationMode::CompatibilityMode {
        if let Some((_, p)) = piece {
            // Fixed penetration discounts for primitive weapons against
            // advanced armor, keyed on the piece's own tech level.
            if p.tech_level >= TechLevel::Spacer || defender.race == RaceKind::Mechanoid {
                if !attack.is_ranged {
                    if attack.weapon_tech <= TechLevel::Medieval {
                        compat_pen *= 0.5;
                    }
                } else if attack.weapon_tech <= TechLevel::Medieval {
                    compat_pen *= 0.35;
                }
            } else if p.tech_level >= TechLevel::Industrial {
                if !attack.is_ranged {
                    if attack.weapon_tech <= TechLevel::Neolithic {
                        compat_pen *= 0.75;
                    }
                } else if attack.weapon_tech <= TechLevel::Medieval {
                    compat_pen *= 0.5;
                }
            }
        }
    }

    let compat_margin = (rating - compat_pen).max(0.0);
    let compat_pierce = ((compat_pen - rating * 0.15) * 5.0).clamp(0.0, 1.0);

    let (current_hp, max_hp) = match piece {
        Some((_, p)) => (p.durability as f32, p.max_durability as f32),
        None => (0.0, 0.0),
    };

    if settings.durability_affects_armor && max_hp != 0.0 {
        let mut loss = settings.durability_armor_loss_mult * 100.0;
        if settings.tattered_armor_scaling && max_hp / 2.0 >= current_hp {
            loss *= 3.0;
        }
        rating *= (1.0 - (1.0 - current_hp / max_hp) * loss).clamp(0.0, 1.0);
    }

    let mut durability_mult = settings.item_durability_multiplier;

    if let Some((index, _)) = piece {
        if settings.mitigation_mode != MitigationMode::DeflectionRework {
            if settings.durability_type_interaction
                && ((*kind == DamageKind::Blunt && metal)
                    || (*kind == DamageKind::Sharp && !metal))
            {
                durability_mult *= settings.durability_type_interaction_mult;
            }
            if *kind == DamageKind::Heat {
                durability_mult *= settings.heat_durability_multiplier;
            }

            let loss = if settings.mitigation_mode == MitigationMode::CompatibilityMode {
                *damage * (0.2 + compat_pierce * 0.5) * durability_mult
            } else {
                *damage * 0.25 * durability_mult
            };
            if loss > 0.5 {
                durability_out.push(DurabilityDamage {
                    piece: index,
                    amount: round_random(loss, rng) as u32,
                });
            }

            // Second not-armor check, after durability feedback. The piece
            // still took its wear above.
            if settings.not_armor && rating < settings.not_armor_threshold {
                trace!(rating, "pass ignored, degraded rating below not-armor threshold");
                return PassResult::Ignored;
            }
        }
    }

    let health_ratio = if worn {
        current_hp / max_hp
    } else {
        defender.summary_health()
    };
    let compat_reduce_margin = (rating * 0.9 - compat_pen).max(0.0);
    let compat_leak = 1.0 - settings.compat_armor_effectiveness;

    if let Some(cap) = settings.armor_cap() {
        if rating > cap {
            rating = cap;
        }
    }
    let effective_rating = (rating - pen).max(0.0);

    let converts_to_blunt = match settings.sharp_conversion {
        SharpConversionRule::Always => true,
        SharpConversionRule::MetalOnly => metal,
        SharpConversionRule::RatingThreshold => {
            effective_rating > settings.sharp_to_blunt_threshold
        }
    };

    // === Deflection rework: durability is the armor's hit pool ===
    if settings.mitigation_mode == MitigationMode::DeflectionRework {
        let Some((index, _)) = piece else {
            // Natural armor has no durability pool to spend.
            return PassResult::Ignored;
        };

        let mut durability_loss = if effective_rating > 0.0 {
            *damage * durability_mult / effective_rating.max(1.0)
        } else {
            *damage * durability_mult * (1.0 + pen)
        };

        let result = if current_hp > max_hp * settings.deflection_rework_threshold {
            *damage = 0.0;
            PassResult::Deflected
        } else {
            durability_loss *= current_hp / max_hp;
            *damage = round_random(*damage * current_hp / max_hp, rng);
            PassResult::Reduced
        };
        if durability_loss > 0.5 {
            durability_out.push(DurabilityDamage {
                piece: index,
                amount: round_random(durability_loss, rng) as u32,
            });
        }
        if *kind == DamageKind::Sharp && converts_to_blunt {
            *kind = DamageKind::Blunt;
        }
        return result;
    }

    // === Armor tiers: big gaps decide without a roll ===
    let mut tier_chances = None;
    if settings.mitigation_mode == MitigationMode::ArmorTiers {
        let armor_tier =
            ((-15.0 + (225.0 + 8.0 * (rating * 100.0)).sqrt()) / 4.0).floor() as i32 + 1;
        let discriminant = (12.25 - 3.0 * (0.75 - penetration_percent(pen))).max(0.0);
        let ap_tier = ((-3.5 + discriminant.sqrt()) / 1.5).floor() as i32;
        trace!(armor_tier, ap_tier, "tier comparison");

        if armor_tier as f32 - 1.01 > ap_tier as f32 {
            *damage = 0.0;
            return PassResult::Deflected;
        }
        if ap_tier as f32 - 1.01 > armor_tier as f32 {
            return PassResult::Penetrated;
        }
        let gap = (2 + armor_tier - ap_tier) as f32;
        tier_chances = Some(((gap * 0.25).clamp(0.0, 1.0), (gap * 0.5).clamp(0.0, 1.0)));
    }

    // === Compatibility mode: multiplicative propensity model ===
    if settings.mitigation_mode == MitigationMode::CompatibilityMode {
        let roll: f32 = rng.gen();
        let mut result = PassResult::Ignored;

        if roll * compat_leak < compat_reduce_margin * health_ratio {
            if rng.gen::<f32>()
                < compat_margin.min(0.9) * settings.deflection_chance_multiplier
            {
                *damage = 0.0;
                return PassResult::Deflected;
            }
            let scale = if worn {
                0.25 + compat_pierce * 0.25
            } else {
                0.25 + compat_pierce * 0.5
            };
            *damage = round_random(*damage * scale, rng);
            if *kind == DamageKind::Sharp && converts_to_blunt {
                *kind = DamageKind::Blunt;
            }
            result = PassResult::Reduced;
        } else if roll
            < compat_margin * (0.5 + health_ratio * 0.5) * settings.reduction_chance_multiplier
        {
            *damage = round_random(*damage * 0.5, rng);
            if *kind == DamageKind::Sharp {
                *kind = DamageKind::Blunt;
            }
            result = PassResult::Reduced;
        }

        if settings.always_reduce_damage && effective_rating > 0.0 {
            *damage = ((*damage * 0.9).max(*damage - 3.0)).max(0.0);
            result = PassResult::Reduced;
        }
        *damage = damage.max(0.0);
        return result;
    }

    // === Algorithmic custom: pen decays through armor, sharp deflects more ===
    let mut deflection_modifier = 1.0f32;
    let mut new_pen = pen;
    if settings.mitigation_mode == MitigationMode::AlgorithmicCustom {
        new_pen = (pen - (effective_rating * 0.25).max(pen * 0.05)).min(0.0);
        if *kind == DamageKind::Sharp {
            deflection_modifier =
                (effective_rating * 0.5).min(1.0) * settings.deflection_chance_multiplier;
        } else {
            new_pen = (pen - (effective_rating * 0.5).max(pen * 0.1)).min(0.0);
        }
    }

    // === Shared roll model (Vanilla, ArmorTiers probabilistic, Custom) ===
    let (mut deflect_chance, mut reduce_chance) = tier_chances.unwrap_or((
        (effective_rating * 0.5 * deflection_modifier).min(1.0),
        effective_rating,
    ));
    deflect_chance *= settings.deflection_chance_multiplier;
    reduce_chance *= settings.reduction_chance_multiplier;
    if settings.reliable_armors {
        reduce_chance = 2.0;
    }

    let roll: f32 = rng.gen();
    trace!(roll, deflect_chance, reduce_chance, "mitigation roll");

    let result = if roll < deflect_chance.clamp(0.0, 1.0) {
        *damage = 0.0;
        PassResult::Deflected
    } else if roll < reduce_chance.clamp(0.0, 1.0) {
        let mut reduction = settings.reduction_amount_multiplier;
        if settings.reliable_armors {
            reduction *= (rating - pen) * rng.gen_range(0.7..2.0);
        }
        if settings.damage_scaling_effect && *damage > 0.0 {
            // Epsilon floor so the scaling term never divides by zero.
            let pen_floor = pen.max(0.01);
            reduction *= ((rating * 12.0) / (pen_floor * *damage)).clamp(0.4, 1.6);
        }
        *damage *= 1.0 - reduction.clamp(0.0, 1.0);
        if *damage < 0.5 {
            *damage = 0.0;
        }
        if *kind == DamageKind::Sharp && converts_to_blunt {
            *kind = DamageKind::Blunt;
        }
        PassResult::Reduced
    } else if settings.always_reduce_damage && effective_rating > 0.0 {
        *damage = (*damage * 1.8 * settings.reduction_amount_multiplier)
            .max(*damage * 0.95)
            .min(*damage - 3.0)
            .max(0.0);
        PassResult::Reduced
    } else {
        PassResult::Ignored
    };

    if settings.mitigation_mode == MitigationMode::AlgorithmicCustom {
        *penetration = new_pen;
    }
    *damage = damage.max(0.0);
    result
}

/// Penetration expressed in percent, as the tier formula expects it.
fn penetration_percent(pen: f32) -> f32 {
    pen * 100.0
}
