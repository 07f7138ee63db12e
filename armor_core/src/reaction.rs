//! Adrenaline reaction - transient state applied to humanlike defenders
//!
//! A two-step state machine: `None → Active → Aftermath → None`. The
//! resolver only decides *whether* the reaction triggers (returned as a flag
//! on the outcome); applying and expiring the states is the caller's job,
//! through the methods here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdrenalineState {
    None,
    /// The adrenaline rush itself.
    Active,
    /// The crash that follows once the rush wears off.
    Aftermath,
}

impl Default for AdrenalineState {
    fn default() -> Self {
        AdrenalineState::None
    }
}

impl AdrenalineState {
    /// A new rush can only start when neither the rush nor its crash is
    /// present.
    pub fn can_trigger(self) -> bool {
        self == AdrenalineState::None
    }

    /// Begin the rush. No-op unless currently `None`.
    pub fn trigger(&mut self) {
        if self.can_trigger() {
            *self = AdrenalineState::Active;
        }
    }

    /// The rush has run out. A living defender always crashes; a dead or
    /// despawned one just clears.
    pub fn expire(&mut self, alive: bool) {
        *self = match (*self, alive) {
            (AdrenalineState::Active, true) => AdrenalineState::Aftermath,
            _ => AdrenalineState::None,
        };
    }

    /// The crash has run out.
    pub fn clear_aftermath(&mut self) {
        if *self == AdrenalineState::Aftermath {
            *self = AdrenalineState::None;
        }
    }
}
