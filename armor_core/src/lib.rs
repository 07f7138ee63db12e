//! armor_core - Post-armor damage resolution for combat entities
//!
//! This library provides:
//! - AttackInfo / Defender: Descriptions of one attack and its target
//! - resolve_damage: The full mitigation pipeline (pre-scaling, per-layer
//!   armor passes, natural armor, side-effect events)
//! - Settings: ~45 independently toggleable combat rules with TOML loading
//! - UsageTracker: Per-item running averages of combat effectiveness
//! - WeaponTuning: Burst-size and range rescaling caches

pub mod attack;
pub mod config;
pub mod defender;
pub mod mitigation;
pub mod reaction;
pub mod rng;
pub mod tracking;
pub mod tuning;
pub mod types;

// Re-export core types for convenience
pub use attack::{AttackInfo, Instigator};
pub use config::{ConfigError, MitigationMode, Settings, SharpConversionRule};
pub use defender::{ArmorPiece, ArmorRatings, Defender, HealthState};
pub use mitigation::{
    resolve_damage, resolve_damage_with_rng, DurabilityDamage, MitigationOutcome, PassResult,
    TrackingEvent,
};
pub use reaction::AdrenalineState;
pub use tracking::{TrackedKind, UsageTracker};
pub use tuning::{SharedWeaponTuning, WeaponProfile, WeaponTuning};
pub use types::{
    ArmorCategory, BodyRegion, DamageKind, FactionRelation, MaterialKind, RaceKind, TechLevel,
};
