//! Reason codes for state decisions

use serde::{Deserialize, Serialize};

/// Why the decision step picked a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R1xx: Rigid hook decisions
    // =========================================================================
    /// Coupler reports no partner
    R101_NOT_COUPLED,
    /// Partner coupler and its interaction both resolved
    R102_PARTNER_RESOLVED,
    /// Coupler reports a partner that cannot be resolved
    R103_PARTNER_UNRESOLVED,

    // =========================================================================
    // R2xx: Host default
    // =========================================================================
    /// Decision delegated to the host chain behaviour
    R201_HOST_DEFAULT,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_NOT_COUPLED => "R101_NOT_COUPLED",
            Self::R102_PARTNER_RESOLVED => "R102_PARTNER_RESOLVED",
            Self::R103_PARTNER_UNRESOLVED => "R103_PARTNER_UNRESOLVED",
            Self::R201_HOST_DEFAULT => "R201_HOST_DEFAULT",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_NOT_COUPLED => "Not coupled - parked",
            Self::R102_PARTNER_RESOLVED => "Partner resolved - rigidly attached",
            Self::R103_PARTNER_UNRESOLVED => "Partner missing - geometry torn down",
            Self::R201_HOST_DEFAULT => "Host chain logic decided",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
