//! Resolution results and the side-effect events they carry
//!
//! The resolver never mutates the defender. Everything that should change as
//! a consequence of the hit (durability loss, tracker samples, an adrenaline
//! trigger) comes back as data on the [`MitigationOutcome`], and the caller
//! decides when and whether to apply it.

use crate::defender::Defender;
use crate::types::DamageKind;

/// Result of one mitigation pass.
///
/// `Penetrated` marks a pass where the armor was actively overwhelmed (tier
/// gap); any such pass suppresses the adrenaline reaction for the whole hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassResult {
    /// The armor did not interact with the hit.
    Ignored,
    /// The hit punched straight through (guaranteed by a tier gap).
    Penetrated,
    /// The armor reduced the damage.
    Reduced,
    /// The armor stopped the hit outright.
    Deflected,
}

/// Durability loss owed to one worn armor piece, by its index in
/// `Defender::armor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurabilityDamage {
    pub piece: usize,
    pub amount: u32,
}

/// One sample for the usage-tracking sink.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    /// A worn piece prevented some fraction of the damage that reached it.
    Armor { piece: usize, fraction_blocked: f32 },
    /// A weapon landed a hit for this much final damage.
    Weapon { weapon_id: String, damage_dealt: f32 },
}

/// Everything a resolution call produced.
#[derive(Debug, Clone)]
pub struct MitigationOutcome {
    /// Damage left after all armor passes, never negative.
    pub damage: f32,
    /// Damage kind after any sharp-to-blunt conversion.
    pub kind: DamageKind,
    /// Some pass zeroed the damage.
    pub deflected: bool,
    /// Some pass reduced the damage without zeroing it.
    pub diminished: bool,
    pub durability_damage: Vec<DurabilityDamage>,
    pub tracking: Vec<TrackingEvent>,
    /// The defender's adrenaline reaction fired on this hit.
    pub adrenaline_triggered: bool,
}

impl MitigationOutcome {
    pub(crate) fn passthrough(damage: f32, kind: DamageKind) -> Self {
        MitigationOutcome {
            damage,
            kind,
            deflected: false,
            diminished: false,
            durability_damage: Vec::new(),
            tracking: Vec::new(),
            adrenaline_triggered: false,
        }
    }

    /// Apply the queued durability losses and the adrenaline trigger to the
    /// defender. Tracking events are left to the caller's sink.
    pub fn apply_to(&self, defender: &mut Defender) {
        for event in &self.durability_damage {
            if let Some(piece) = defender.armor.get_mut(event.piece) {
                piece.take_durability_damage(event.amount);
            }
        }
        if self.adrenaline_triggered {
            if let Some(health) = defender.health.as_mut() {
                health.adrenaline.trigger();
            }
        }
    }

    /// One-line human-readable summary of the hit.
    pub fn summary(&self) -> String {
        let verdict = if self.deflected {
            "deflected"
        } else if self.diminished {
            "reduced"
        } else {
            "unmitigated"
        };
        format!(
            "{:.1} {:?} damage ({verdict}{})",
            self.damage,
            self.kind,
            if self.adrenaline_triggered {
                ", adrenaline"
            } else {
                ""
            }
        )
    }
}
