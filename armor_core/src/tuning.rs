//! Weapon tuning caches: burst-size and range rescaling
//!
//! Both multipliers act on live weapon definitions, so reapplying a changed
//! setting must not compound on already-scaled values. Burst counts rescale
//! from a cached per-weapon baseline; ranges compose multiplicatively by
//! applying only the ratio between the new and the last multiplier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// The mutable fields of one ranged or melee weapon definition, as far as
/// the tuning pass cares.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponProfile {
    pub id: String,
    pub is_melee: bool,
    /// Shots per burst, at least 1 for ranged weapons.
    pub burst_count: u32,
    pub range: f32,
}

impl WeaponProfile {
    pub fn ranged(id: impl Into<String>, burst_count: u32, range: f32) -> Self {
        WeaponProfile {
            id: id.into(),
            is_melee: false,
            burst_count,
            range,
        }
    }

    pub fn melee(id: impl Into<String>) -> Self {
        WeaponProfile {
            id: id.into(),
            is_melee: true,
            burst_count: 1,
            range: 0.0,
        }
    }
}

/// Process-wide rescaling state. One instance per weapon table; guard with
/// [`SharedWeaponTuning`] when attacks run in parallel.
#[derive(Debug, Default)]
pub struct WeaponTuning {
    burst_baselines: HashMap<String, u32>,
    baselines_initialized: bool,
    last_burst_mult: f32,
    last_range_mult: f32,
}

/// Tuning state shared across threads.
pub type SharedWeaponTuning = Arc<Mutex<WeaponTuning>>;

impl WeaponTuning {
    pub fn new() -> Self {
        WeaponTuning {
            burst_baselines: HashMap::new(),
            baselines_initialized: false,
            last_burst_mult: 1.0,
            last_range_mult: 1.0,
        }
    }

    /// Cache the unscaled burst counts. Call before the first rescale, while
    /// the weapon table still holds its original values.
    pub fn initialize_baselines(&mut self, weapons: &[WeaponProfile]) {
        for weapon in weapons.iter().filter(|w| !w.is_melee) {
            self.burst_baselines
                .insert(weapon.id.clone(), weapon.burst_count.max(1));
        }
        self.baselines_initialized = true;
        debug!(count = self.burst_baselines.len(), "cached burst baselines");
    }

    /// Set every ranged weapon's burst count to `baseline * multiplier`,
    /// rounded, at least 1. Weapons added after initialization get a
    /// baseline estimated from their current count and the last multiplier.
    pub fn apply_burst_multiplier(&mut self, weapons: &mut [WeaponProfile], multiplier: f32) {
        let m = multiplier.clamp(0.01, 8.0);

        if !self.baselines_initialized {
            self.initialize_baselines(weapons);
        }

        if (m - self.last_burst_mult).abs() < 1e-4 {
            return;
        }

        let last = self.last_burst_mult.max(0.01);
        for weapon in weapons.iter_mut().filter(|w| !w.is_melee) {
            let baseline = *self
                .burst_baselines
                .entry(weapon.id.clone())
                .or_insert_with(|| ((weapon.burst_count as f32 / last).round() as u32).max(1));
            weapon.burst_count = ((baseline as f32 * m).round() as u32).max(1);
        }

        debug!(
            from = self.last_burst_mult,
            to = m,
            "rescaled burst sizes from baseline"
        );
        self.last_burst_mult = m;
    }

    /// Multiply every ranged weapon's range by `multiplier / last_multiplier`
    /// so repeated calls compose instead of compounding. The multiplier is
    /// floored at 0.01; a true zero would destroy the ranges with no way to
    /// divide back.
    pub fn apply_range_multiplier(&mut self, weapons: &mut [WeaponProfile], multiplier: f32) {
        let m = multiplier.clamp(0.01, 8.0);
        if (m - self.last_range_mult).abs() < 1e-4 {
            return;
        }
        if self.last_range_mult.abs() < 1e-6 {
            warn!("last range multiplier was zero, resetting baseline to 1");
            self.last_range_mult = 1.0;
        }

        let ratio = m / self.last_range_mult;
        for weapon in weapons.iter_mut().filter(|w| !w.is_melee) {
            weapon.range *= ratio;
        }

        self.last_range_mult = m;
        debug!(ratio, total = self.last_range_mult, "rescaled weapon ranges");
    }
}
