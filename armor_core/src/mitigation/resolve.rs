//! Full attack resolution: pre-scaling, the armor pass loop, side effects

use crate::attack::AttackInfo;
use crate::config::Settings;
use crate::defender::Defender;
use crate::mitigation::outcome::{MitigationOutcome, PassResult, TrackingEvent};
use crate::mitigation::pass::apply_armor;
use crate::types::{BodyRegion, FactionRelation, RaceKind, TechLevel};
use rand::Rng;
use tracing::{debug, trace};

/// Damage below this is treated as fully stopped.
const DEFLECT_EPSILON: f32 = 0.001;

/// Resolve one attack against one defender using the thread-local RNG.
pub fn resolve_damage(
    attack: &AttackInfo,
    defender: &Defender,
    region: Option<&BodyRegion>,
    settings: &Settings,
) -> MitigationOutcome {
    resolve_damage_with_rng(attack, defender, region, settings, &mut rand::thread_rng())
}

/// Resolve one attack with an injected random source.
///
/// The defender is never mutated; durability loss, tracking samples and the
/// adrenaline trigger come back on the outcome for the caller to apply.
pub fn resolve_damage_with_rng(
    attack: &AttackInfo,
    defender: &Defender,
    region: Option<&BodyRegion>,
    settings: &Settings,
    rng: &mut impl Rng,
) -> MitigationOutcome {
    let mut damage = attack.damage;
    let mut kind = attack.kind;

    // A hit with no body region is not resolvable; pass it through untouched.
    let Some(region) = region else {
        return MitigationOutcome::passthrough(damage, kind);
    };

    if let Some(instigator) = &attack.instigator {
        if defender.is_player_colonist && instigator.relation == FactionRelation::Player {
            damage *= settings.friendly_fire_multiplier;
        } else if instigator.relation == FactionRelation::Hostile {
            damage *= settings.enemy_damage_multiplier;
        }
    }
    damage *= settings.damage_boost;
    damage *= if attack.is_ranged {
        settings.ranged_damage_boost
    } else {
        settings.melee_damage_boost
    };

    let Some(category) = kind.armor_category() else {
        return MitigationOutcome::passthrough(damage, kind);
    };

    let mut armor_mult = settings.armor_strength;
    let mut armor_add = 0.0;
    let mut natural_tech = TechLevel::Undefined;
    match defender.race {
        RaceKind::Mechanoid => {
            natural_tech = TechLevel::Ultra;
            armor_add += (settings.mechanoid_buff - 1.0) / 10.0;
            armor_mult *= settings.mechanoid_buff;
        }
        RaceKind::Insect => {
            armor_add += (settings.insect_buff - 1.0) / 10.0;
            armor_mult *= settings.insect_buff;
        }
        RaceKind::AnomalyEntity => {
            armor_add += (settings.anomaly_buff - 1.0) / 10.0;
            armor_mult *= settings.anomaly_buff;
        }
        RaceKind::Humanlike => {
            armor_add += (settings.humanlike_buff - 1.0) / 10.0;
            armor_mult *= settings.humanlike_buff;
        }
        RaceKind::Other => {}
    }

    let mut penetration = attack.penetration * settings.armor_pen_importance;
    let original_damage = damage;

    debug!(
        damage,
        penetration,
        ?category,
        region = region.0.as_str(),
        "resolving attack"
    );

    let mut outcome = MitigationOutcome::passthrough(damage, kind);
    let mut any_penetrated = false;

    for (index, piece) in defender.armor.iter().enumerate() {
        if !piece.covers(region) && !settings.all_armor_protects_everywhere {
            continue;
        }
        let layers = if settings.thick_armor {
            piece.layers.max(1)
        } else {
            1
        };
        let before = damage;
        let mut rating = piece.ratings.rating(category) * armor_mult + armor_add;
        let mut layer_tech = piece.tech_level;

        for _ in 0..layers {
            let result = apply_armor(
                &mut damage,
                &mut penetration,
                rating,
                Some((index, piece)),
                &mut kind,
                defender,
                attack,
                layer_tech,
                settings,
                &mut outcome.durability_damage,
                rng,
            );
            match result {
                PassResult::Reduced => outcome.diminished = true,
                PassResult::Deflected => outcome.deflected = true,
                PassResult::Penetrated => any_penetrated = true,
                PassResult::Ignored => {}
            }
            // Deeper sub-layers protect at reduced strength and without the
            // tech bonus.
            rating *= settings.thick_armor_effectiveness_loss;
            layer_tech = TechLevel::Undefined;
        }

        if settings.tracking_enabled && before > 0.0 {
            outcome.tracking.push(TrackingEvent::Armor {
                piece: index,
                fraction_blocked: (before - damage) / before,
            });
        }
        trace!(piece = piece.name.as_str(), before, after = damage, "armor piece applied");

        if damage < DEFLECT_EPSILON {
            outcome.deflected = true;
            damage = 0.0;
            break;
        }
    }

    if damage > 0.0 {
        let rating = defender.natural_armor.rating(category) * armor_mult + armor_add;
        let result = apply_armor(
            &mut damage,
            &mut penetration,
            rating,
            None,
            &mut kind,
            defender,
            attack,
            natural_tech,
            settings,
            &mut outcome.durability_damage,
            rng,
        );
        match result {
            PassResult::Reduced => outcome.diminished = true,
            PassResult::Deflected => outcome.deflected = true,
            PassResult::Penetrated => any_penetrated = true,
            PassResult::Ignored => {}
        }
    }

    // Adrenaline only fires when no pass let the hit straight through, even
    // if a later pass still took the edge off.
    if !any_penetrated
        && defender.race == RaceKind::Humanlike
        && settings.adrenaline_enabled
    {
        if let Some(health) = &defender.health {
            if health.pain > 0.15
                && health.adrenaline.can_trigger()
                && rng.gen::<f32>() < settings.adrenaline_chance
            {
                debug!(pain = health.pain, "adrenaline triggered");
                outcome.adrenaline_triggered = true;
            }
        }
    }

    if settings.tracking_enabled && original_damage > 0.0 {
        if let Some(weapon_id) = attack
            .instigator
            .as_ref()
            .and_then(|i| i.weapon_id.as_deref())
        {
            outcome.tracking.push(TrackingEvent::Weapon {
                weapon_id: weapon_id.to_string(),
                damage_dealt: damage,
            });
        }
    }

    if damage < DEFLECT_EPSILON || outcome.deflected {
        damage = 0.0;
    }
    outcome.damage = damage;
    outcome.kind = kind;
    outcome
}
