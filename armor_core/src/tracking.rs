//! Usage tracking - per-item running average of combat effectiveness
//!
//! Armor records the fraction of damage it prevented per hit; weapons record
//! points of damage dealt per attack. The sample count is capped so long
//! campaigns cannot grow the state without bound: past the cap, new samples
//! are blended in with exponential smoothing instead of being counted.

use serde::{Deserialize, Serialize};

/// Samples counted normally before exponential smoothing takes over.
pub const SAMPLE_CAP: u32 = 10_000;

/// Blend weight for samples recorded past the cap.
pub const SMOOTHING_WEIGHT: f32 = 0.001;

/// What an item's tracked value means, for the human-readable summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedKind {
    /// Fraction of incoming damage prevented.
    Armor,
    /// Points of damage dealt.
    Weapon,
}

/// Exponentially-damped running average for one tracked item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageTracker {
    total: f32,
    uses: u32,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample. Below [`SAMPLE_CAP`] this is a plain running sum;
    /// at the cap the sum is nudged towards the sample so the average keeps
    /// following recent performance while `uses` stays pinned.
    pub fn record(&mut self, value: f32) {
        if self.uses < SAMPLE_CAP {
            self.total += value;
            self.uses += 1;
        } else {
            self.total += (value - self.total) * SMOOTHING_WEIGHT;
        }
    }

    pub fn uses(&self) -> u32 {
        self.uses
    }

    /// Mean recorded value; zero until at least two samples exist.
    pub fn average(&self) -> f32 {
        if self.uses <= 1 {
            return 0.0;
        }
        self.total / self.uses as f32
    }

    /// Human-readable summary in the form shown in item stat panels.
    pub fn summary(&self, kind: TrackedKind) -> String {
        if self.uses <= 1 {
            return "Not enough combat data recorded.".to_string();
        }
        let uses = if self.uses >= SAMPLE_CAP {
            format!("over {SAMPLE_CAP}")
        } else {
            self.uses.to_string()
        };
        match kind {
            TrackedKind::Armor => format!(
                "Average damage prevented: {:.1}% across {} hits.",
                self.average() * 100.0,
                uses
            ),
            TrackedKind::Weapon => format!(
                "Average damage inflicted: {:.1} points across {} attacks.",
                self.average(),
                uses
            ),
        }
    }
}
