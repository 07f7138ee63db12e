//! Integration tests: full attack resolution through the public API
//!
//! Probability branches are pinned with scripted rolls so every scenario is
//! deterministic, including proofs that certain branches consume no
//! randomness at all.

use armor_core::rng::ScriptedRng;
use armor_core::{
    resolve_damage_with_rng, AttackInfo, ArmorPiece, ArmorRatings, AdrenalineState, BodyRegion,
    DamageKind, Defender, FactionRelation, HealthState, Instigator, MitigationMode, RaceKind,
    Settings, TrackedKind, TrackingEvent, UsageTracker,
};

fn torso() -> BodyRegion {
    BodyRegion::from("torso")
}

fn hostile_attack(damage: f32, penetration: f32, kind: DamageKind) -> AttackInfo {
    AttackInfo::new(damage, penetration, kind)
        .from_instigator(Instigator::new(FactionRelation::Hostile))
}

#[test]
fn test_vanilla_natural_armor_deflects() {
    let settings = Settings::vanilla();
    let defender =
        Defender::new(RaceKind::Other).with_natural_armor(ArmorRatings::new(0.30, 0.0, 0.0));
    let attack = hostile_attack(20.0, 0.10, DamageKind::Sharp);

    let mut rng = ScriptedRng::new([0.05]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);

    assert!(outcome.deflected);
    assert!((outcome.damage - 0.0).abs() < f32::EPSILON);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_vanilla_always_reduce_floor() {
    let settings = Settings {
        always_reduce_damage: true,
        ..Settings::vanilla()
    };
    let defender =
        Defender::new(RaceKind::Other).with_natural_armor(ArmorRatings::new(0.30, 0.0, 0.0));
    let attack = hostile_attack(20.0, 0.10, DamageKind::Sharp);

    // Above both the deflect (0.1) and reduce (0.2) thresholds.
    let mut rng = ScriptedRng::new([0.99]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);

    assert!(!outcome.deflected);
    assert!(outcome.diminished);
    // min(max(20 * 1.8 * 0.5, 20 * 0.95), 20 - 3) = 17
    assert!((outcome.damage - 17.0).abs() < 1e-4);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_thick_armor_sub_layers_lose_effectiveness() {
    let settings = Settings {
        thick_armor: true,
        thick_armor_effectiveness_loss: 0.75,
        item_durability_multiplier: 0.0,
        ..Settings::vanilla()
    };
    let piece = ArmorPiece::new("layered plate", ArmorRatings::new(1.0, 0.4, 0.2), 200)
        .with_layers(3)
        .covering(["torso"]);
    let defender = Defender::new(RaceKind::Other).wearing(piece);
    let attack = hostile_attack(20.0, 0.0, DamageKind::Sharp);

    // Sub-layer ratings 1.0, 0.75, 0.5625; deflect chances 0.5, 0.375,
    // 0.28125. The first roll lands a reduction (reduce chance 1.0), the
    // second misses everything, the third sits just under the third-layer
    // deflect chance.
    let mut rng = ScriptedRng::new([0.9, 0.9, 0.28]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!(outcome.deflected);
    assert!((outcome.damage - 0.0).abs() < f32::EPSILON);
    assert_eq!(rng.remaining(), 0);

    // Nudge the third roll just above 0.28125 and the deflection vanishes;
    // the fourth roll is consumed by the natural-armor pass.
    let mut rng = ScriptedRng::new([0.9, 0.9, 0.29, 0.5]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!(!outcome.deflected);
    assert!(outcome.diminished);
    // 20 halved by the first-layer reduction, then halved again by the
    // third layer.
    assert!((outcome.damage - 5.0).abs() < 1e-4);
    // Vanilla conversion rule dulls reduced sharp hits.
    assert_eq!(outcome.kind, DamageKind::Blunt);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_tier_gap_deflects_without_randomness() {
    let settings = Settings {
        mitigation_mode: MitigationMode::ArmorTiers,
        ..Settings::vanilla()
    };
    let defender =
        Defender::new(RaceKind::Other).with_natural_armor(ArmorRatings::new(0.40, 0.0, 0.0));
    let attack = hostile_attack(20.0, 0.05, DamageKind::Sharp);

    // Tier 3 armor against a tier 1 weapon: decided with no roll at all.
    let mut rng = ScriptedRng::empty();
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!(outcome.deflected);
    assert!((outcome.damage - 0.0).abs() < f32::EPSILON);
}

#[test]
fn test_tier_gap_penetrates_and_suppresses_adrenaline() {
    let settings = Settings {
        mitigation_mode: MitigationMode::ArmorTiers,
        adrenaline_enabled: true,
        ..Settings::vanilla()
    };
    let defender = Defender::new(RaceKind::Humanlike)
        .with_natural_armor(ArmorRatings::new(0.20, 0.0, 0.0))
        .with_health(HealthState {
            pain: 0.5,
            ..HealthState::default()
        });
    // Tier 4 weapon against tier 2 armor: guaranteed pass-through, and the
    // penetration also gates the adrenaline roll, so no randomness is used.
    let attack = hostile_attack(20.0, 0.27, DamageKind::Sharp);

    let mut rng = ScriptedRng::empty();
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!(!outcome.deflected);
    assert!(!outcome.diminished);
    assert!(!outcome.adrenaline_triggered);
    assert!((outcome.damage - 20.0).abs() < f32::EPSILON);
}

#[test]
fn test_penetrated_armor_suppresses_adrenaline_despite_later_reduction() {
    let settings = Settings {
        mitigation_mode: MitigationMode::ArmorTiers,
        adrenaline_enabled: true,
        adrenaline_chance: 1.0,
        item_durability_multiplier: 0.0,
        ..Settings::vanilla()
    };
    // Tier 2 vest against a tier 4 weapon: the worn pass is a guaranteed
    // pass-through. Tier 3 natural armor still gets a probabilistic pass.
    let piece =
        ArmorPiece::new("light vest", ArmorRatings::new(0.20, 0.1, 0.1), 100).covering(["torso"]);
    let defender = Defender::new(RaceKind::Humanlike)
        .wearing(piece)
        .with_natural_armor(ArmorRatings::new(0.50, 0.0, 0.0))
        .with_health(HealthState {
            pain: 0.5,
            ..HealthState::default()
        });
    let attack = hostile_attack(20.0, 0.27, DamageKind::Sharp);

    // One roll: the natural pass reduces (gap chances 0.25 / 0.5). The
    // adrenaline gate must not draw, because a pass was punched through.
    let mut rng = ScriptedRng::new([0.3]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!(outcome.diminished);
    assert!((outcome.damage - 10.0).abs() < 1e-4);
    assert!(!outcome.adrenaline_triggered);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_adrenaline_fires_once() {
    let settings = Settings {
        adrenaline_enabled: true,
        adrenaline_chance: 1.0,
        ..Settings::vanilla()
    };
    let mut defender = Defender::new(RaceKind::Humanlike).with_health(HealthState {
        pain: 0.5,
        ..HealthState::default()
    });
    let attack = hostile_attack(10.0, 0.0, DamageKind::Blunt);

    // One roll for the natural pass, one for the adrenaline gate.
    let mut rng = ScriptedRng::new([0.9, 0.0]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!(outcome.adrenaline_triggered);
    outcome.apply_to(&mut defender);
    assert_eq!(
        defender.health.as_ref().unwrap().adrenaline,
        AdrenalineState::Active
    );

    // While the rush is active no new trigger is possible and no gate roll
    // is drawn.
    let mut rng = ScriptedRng::new([0.9]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!(!outcome.adrenaline_triggered);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_durability_monotonic_and_floored() {
    use rand::SeedableRng;
    let settings = Settings {
        item_durability_multiplier: 100.0,
        ..Settings::vanilla()
    };
    let piece =
        ArmorPiece::new("vest", ArmorRatings::new(0.6, 0.3, 0.2), 80).covering(["torso"]);
    let mut defender = Defender::new(RaceKind::Other).wearing(piece);
    let attack = hostile_attack(30.0, 0.0, DamageKind::Sharp);
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);

    let mut last = defender.armor[0].durability;
    for _ in 0..20 {
        let outcome =
            resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
        outcome.apply_to(&mut defender);
        let current = defender.armor[0].durability;
        assert!(current <= last);
        last = current;
    }
    assert_eq!(defender.armor[0].durability, 0);
}

#[test]
fn test_tracking_events_feed_the_sink() {
    use rand::SeedableRng;
    let settings = Settings {
        tracking_enabled: true,
        ..Settings::vanilla()
    };
    let piece =
        ArmorPiece::new("flak vest", ArmorRatings::new(0.9, 0.3, 0.2), 200).covering(["torso"]);
    let defender = Defender::new(RaceKind::Other).wearing(piece);
    let attack = AttackInfo::new(12.0, 0.0, DamageKind::Sharp).from_instigator(
        Instigator::new(FactionRelation::Hostile).with_weapon("autopistol"),
    );
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);

    let mut armor_tracker = UsageTracker::new();
    let mut weapon_tracker = UsageTracker::new();
    for _ in 0..5 {
        let outcome =
            resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
        for event in &outcome.tracking {
            match event {
                TrackingEvent::Armor { piece: 0, fraction_blocked } => {
                    armor_tracker.record(*fraction_blocked)
                }
                TrackingEvent::Weapon { weapon_id, damage_dealt } => {
                    assert_eq!(weapon_id, "autopistol");
                    weapon_tracker.record(*damage_dealt);
                }
                other => panic!("unexpected tracking event: {other:?}"),
            }
        }
    }
    assert_eq!(armor_tracker.uses(), 5);
    assert_eq!(weapon_tracker.uses(), 5);
    assert!(armor_tracker
        .summary(TrackedKind::Armor)
        .contains("across 5 hits"));
}

#[test]
fn test_missing_region_passes_through() {
    let settings = Settings::vanilla();
    let defender = Defender::new(RaceKind::Other)
        .wearing(ArmorPiece::new("plate", ArmorRatings::new(2.0, 2.0, 2.0), 400).covering(["torso"]));
    let attack = hostile_attack(15.0, 0.0, DamageKind::Sharp);

    let mut rng = ScriptedRng::empty();
    let outcome = resolve_damage_with_rng(&attack, &defender, None, &settings, &mut rng);
    assert!((outcome.damage - 15.0).abs() < f32::EPSILON);
    assert!(!outcome.deflected);
    assert!(outcome.durability_damage.is_empty());
}

#[test]
fn test_unarmorable_damage_only_gets_prescaled() {
    let settings = Settings {
        melee_damage_boost: 0.5,
        ..Settings::vanilla()
    };
    let defender = Defender::new(RaceKind::Other)
        .with_natural_armor(ArmorRatings::new(1.0, 1.0, 1.0));
    let attack = hostile_attack(10.0, 0.0, DamageKind::Other);

    let mut rng = ScriptedRng::empty();
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!((outcome.damage - 5.0).abs() < f32::EPSILON);
    assert_eq!(outcome.kind, DamageKind::Other);
}

#[test]
fn test_friendly_fire_multiplier_applies() {
    let settings = Settings {
        friendly_fire_multiplier: 0.25,
        ..Settings::vanilla()
    };
    let defender = Defender::new(RaceKind::Humanlike).player_colonist();
    let attack = AttackInfo::new(16.0, 0.0, DamageKind::Blunt)
        .from_instigator(Instigator::new(FactionRelation::Player));

    // Natural pass has rating 0, so the single roll cannot mitigate.
    let mut rng = ScriptedRng::new([0.9]);
    let outcome = resolve_damage_with_rng(&attack, &defender, Some(&torso()), &settings, &mut rng);
    assert!((outcome.damage - 4.0).abs() < f32::EPSILON);
}
