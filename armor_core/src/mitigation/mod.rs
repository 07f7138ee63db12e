//! Damage mitigation: the per-pass armor function and the attack resolver

mod outcome;
mod pass;
mod resolve;

pub use outcome::{DurabilityDamage, MitigationOutcome, PassResult, TrackingEvent};
pub use resolve::{resolve_damage, resolve_damage_with_rng};
