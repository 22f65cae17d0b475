//! Coupler identity and the host-side coupler interface

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::{CouplingError, MaterialRef, Pose};

/// Vehicle identifier assigned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CarId(pub u32);

impl std::fmt::Display for CarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which end of the vehicle a coupler sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouplerEnd {
    Front,
    Rear,
}

impl CouplerEnd {
    pub fn suffix(&self) -> char {
        match self {
            CouplerEnd::Front => 'f',
            CouplerEnd::Rear => 'r',
        }
    }
}

/// One end of one vehicle. Interactions are keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CouplerId {
    pub car: CarId,
    pub end: CouplerEnd,
}

impl CouplerId {
    pub fn new(car: u32, end: CouplerEnd) -> Self {
        Self { car: CarId(car), end }
    }

    pub fn front(car: u32) -> Self {
        Self::new(car, CouplerEnd::Front)
    }

    pub fn rear(car: u32) -> Self {
        Self::new(car, CouplerEnd::Rear)
    }
}

impl std::fmt::Display for CouplerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.car, self.end.suffix())
    }
}

impl FromStr for CouplerId {
    type Err = CouplingError;

    /// Parses `12f` / `12r`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CouplingError::InvalidCoupler(s.to_string());
        let end = match s.chars().last().map(|c| c.to_ascii_lowercase()) {
            Some('f') => CouplerEnd::Front,
            Some('r') => CouplerEnd::Rear,
            _ => return Err(invalid()),
        };
        let digits = &s[..s.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let car = digits.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(car, end))
    }
}

/// Parameters the host's uncouple operation takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncoupleRequest {
    pub play_audio: bool,
    pub called_on_other_coupler: bool,
    pub due_to_broken_couple: bool,
    pub via_chain_interaction: bool,
}

impl UncoupleRequest {
    /// Player released the hook on this side
    pub fn hook_release() -> Self {
        Self {
            play_audio: true,
            called_on_other_coupler: false,
            due_to_broken_couple: false,
            via_chain_interaction: true,
        }
    }

    /// Uncouple ordered by the host itself (menus, scripts, remote)
    pub fn host_initiated() -> Self {
        Self {
            play_audio: true,
            called_on_other_coupler: false,
            due_to_broken_couple: false,
            via_chain_interaction: false,
        }
    }
}

/// What the interaction layer needs from the host simulation.
///
/// Implementations must be cheap: every method is called on the tick path.
pub trait CouplerHost {
    /// Physically coupled partner, if any. May name a coupler that no
    /// longer exists.
    fn coupled_to(&self, coupler: CouplerId) -> Option<CouplerId>;

    fn is_coupled(&self, coupler: CouplerId) -> bool {
        self.coupled_to(coupler).is_some()
    }

    /// Break the coupling at `coupler`
    fn uncouple(&mut self, coupler: CouplerId, request: UncoupleRequest);

    /// World pose of the coupler transform
    fn coupler_pose(&self, coupler: CouplerId) -> Option<Pose>;

    /// Material of the vehicle's buffer plate, reused for the hook
    fn buffer_material(&self, car: CarId) -> Option<MaterialRef>;
}

// =============================================================================
// TESTS
// =============================================================================
