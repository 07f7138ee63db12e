//! Example Skirmish - a small seeded combat loop built on armor_core
//!
//! This demo shows:
//! - Building a defender with layered armor and a health model
//! - Resolving attacks and applying the returned side effects
//! - Feeding tracking events into per-item usage trackers
//! - Rescaling weapon burst sizes and ranges through the tuning cache
//!
//! Run with `RUST_LOG=armor_core=debug` to watch the resolution pipeline.

use armor_core::{
    resolve_damage_with_rng, AttackInfo, ArmorPiece, ArmorRatings, BodyRegion, DamageKind,
    Defender, FactionRelation, HealthState, Instigator, RaceKind, Settings, TechLevel,
    TrackedKind, TrackingEvent, UsageTracker, WeaponProfile, WeaponTuning,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// One combatant on the receiving end, with the mutable state the core
/// itself never touches.
struct Combatant {
    name: String,
    defender: Defender,
    hit_points: f32,
    adrenaline_rounds_left: u32,
}

impl Combatant {
    fn new(name: impl Into<String>, defender: Defender, hit_points: f32) -> Self {
        Combatant {
            name: name.into(),
            defender,
            hit_points,
            adrenaline_rounds_left: 0,
        }
    }

    fn alive(&self) -> bool {
        self.hit_points > 0.0
    }
}

fn colonist() -> Combatant {
    let defender = Defender::new(RaceKind::Humanlike)
        .player_colonist()
        .wearing(
            ArmorPiece::new("marine helmet", ArmorRatings::new(1.06, 0.45, 0.36), 120)
                .metal()
                .with_tech_level(TechLevel::Spacer)
                .covering(["head"]),
        )
        .wearing(
            ArmorPiece::new("flak vest", ArmorRatings::new(0.8, 0.36, 0.27), 200)
                .with_tech_level(TechLevel::Industrial)
                .with_layers(2)
                .covering(["torso"]),
        )
        .wearing(
            ArmorPiece::new("duster", ArmorRatings::new(0.3, 0.12, 0.5), 160)
                .with_tech_level(TechLevel::Industrial)
                .covering(["torso", "legs"]),
        )
        .with_health(HealthState::default());
    Combatant::new("Dag", defender, 100.0)
}

fn raider_attacks() -> Vec<(AttackInfo, BodyRegion)> {
    let raider = || Instigator::new(FactionRelation::Hostile);
    vec![
        (
            AttackInfo::new(18.0, 0.25, DamageKind::Sharp)
                .ranged()
                .with_weapon_tech(TechLevel::Industrial)
                .from_instigator(raider().with_weapon("bolt_rifle")),
            BodyRegion::from("torso"),
        ),
        (
            AttackInfo::new(12.0, 0.15, DamageKind::Sharp)
                .with_weapon_tech(TechLevel::Medieval)
                .from_instigator(raider().with_weapon("gladius")),
            BodyRegion::from("torso"),
        ),
        (
            AttackInfo::new(9.0, 0.10, DamageKind::Blunt)
                .with_weapon_tech(TechLevel::Neolithic)
                .from_instigator(raider().with_weapon("club")),
            BodyRegion::from("head"),
        ),
        (
            AttackInfo::new(10.0, 0.0, DamageKind::Heat)
                .ranged()
                .with_weapon_tech(TechLevel::Industrial)
                .from_instigator(raider().with_weapon("incendiary_launcher")),
            BodyRegion::from("legs"),
        ),
    ]
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = Settings::recommended();
    if let Err(error) = settings.validate() {
        eprintln!("invalid settings: {error}");
        std::process::exit(1);
    }
    println!(
        "Skirmish settings: recommended preset, difficulty {:.0}%\n",
        settings.difficulty_score() * 100.0
    );

    // Weapon tuning runs once up front, the way a settings change would.
    let mut weapons = vec![
        WeaponProfile::ranged("bolt_rifle", 1, 37.0),
        WeaponProfile::ranged("incendiary_launcher", 1, 24.0),
        WeaponProfile::melee("gladius"),
        WeaponProfile::melee("club"),
    ];
    let mut tuning = WeaponTuning::new();
    tuning.initialize_baselines(&weapons);
    tuning.apply_burst_multiplier(&mut weapons, settings.burst_size_multiplier);
    tuning.apply_range_multiplier(&mut weapons, settings.weapon_range_multiplier);

    let mut rng = ChaCha8Rng::seed_from_u64(0xC0A7);
    let mut target = colonist();
    let attacks = raider_attacks();

    let mut armor_trackers: HashMap<String, UsageTracker> = HashMap::new();
    let mut weapon_trackers: HashMap<String, UsageTracker> = HashMap::new();
    let settings = Settings {
        tracking_enabled: true,
        ..settings
    };

    for round in 1..=12 {
        if !target.alive() {
            break;
        }
        let (attack, region) = &attacks[rng.gen_range(0..attacks.len())];
        let outcome =
            resolve_damage_with_rng(attack, &target.defender, Some(region), &settings, &mut rng);

        // Pain rises with lost health; the core reads it on the next hit.
        target.hit_points = (target.hit_points - outcome.damage).max(0.0);
        outcome.apply_to(&mut target.defender);
        if let Some(health) = target.defender.health.as_mut() {
            health.pain = (1.0 - target.hit_points / 100.0).min(1.0);
            if outcome.adrenaline_triggered {
                target.adrenaline_rounds_left = 3;
            } else if target.adrenaline_rounds_left > 0 {
                target.adrenaline_rounds_left -= 1;
                if target.adrenaline_rounds_left == 0 {
                    health.adrenaline.expire(target.hit_points > 0.0);
                }
            }
        }

        for event in &outcome.tracking {
            match event {
                TrackingEvent::Armor { piece, fraction_blocked } => {
                    let name = target.defender.armor[*piece].name.clone();
                    armor_trackers
                        .entry(name)
                        .or_default()
                        .record(*fraction_blocked);
                }
                TrackingEvent::Weapon { weapon_id, damage_dealt } => {
                    weapon_trackers
                        .entry(weapon_id.clone())
                        .or_default()
                        .record(*damage_dealt);
                }
            }
        }

        println!(
            "round {round:>2}: {} hit to the {} -> {}  ({} at {:.0} hp)",
            if attack.is_ranged { "ranged" } else { "melee" },
            region.0,
            outcome.summary(),
            target.name,
            target.hit_points
        );
    }

    println!("\n--- armor report ---");
    for piece in &target.defender.armor {
        let line = armor_trackers
            .get(&piece.name)
            .map(|t| t.summary(TrackedKind::Armor))
            .unwrap_or_else(|| "Not enough combat data recorded.".to_string());
        println!(
            "{:<16} {:>3}/{:<3} durability  {}",
            piece.name, piece.durability, piece.max_durability, line
        );
    }

    println!("\n--- weapon report ---");
    for weapon in &weapons {
        let line = weapon_trackers
            .get(&weapon.id)
            .map(|t| t.summary(TrackedKind::Weapon))
            .unwrap_or_else(|| "Not enough combat data recorded.".to_string());
        println!("{:<20} {}", weapon.id, line);
    }

    if target.alive() {
        println!("\n{} survived the skirmish.", target.name);
    } else {
        println!("\n{} fell in the skirmish.", target.name);
    }
}
