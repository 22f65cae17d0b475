//! Per-coupler interaction record
//!
//! Mutation goes through the registry, which owns the link protocol and the
//! pivot lifecycle.

use serde::{Deserialize, Serialize};

use crate::core::pivot::CouplingPivot;
use crate::core::visibility::ChainVisuals;
use crate::types::{CouplerId, InteractionState};

#[derive(Debug, Clone)]
pub struct CouplingInteraction {
    coupler: CouplerId,
    state: InteractionState,
    pub(crate) pivot: Option<CouplingPivot>,
    pub(crate) attached_to: Option<CouplerId>,
    pub(crate) chain: ChainVisuals,
}

impl CouplingInteraction {
    /// New interactions start disabled with no geometry
    pub fn new(coupler: CouplerId) -> Self {
        Self {
            coupler,
            state: InteractionState::Disabled,
            pivot: None,
            attached_to: None,
            chain: ChainVisuals::default(),
        }
    }

    pub fn coupler(&self) -> CouplerId {
        self.coupler
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn pivot(&self) -> Option<&CouplingPivot> {
        self.pivot.as_ref()
    }

    pub fn attached_to(&self) -> Option<CouplerId> {
        self.attached_to
    }

    pub fn chain(&self) -> &ChainVisuals {
        &self.chain
    }

    pub(crate) fn set_state(&mut self, state: InteractionState) {
        self.state = state;
    }

    pub fn snapshot(&self) -> InteractionSnapshot {
        InteractionSnapshot {
            coupler: self.coupler,
            state: self.state,
            attached_to: self.attached_to,
            has_pivot: self.pivot.is_some(),
            yaw_degrees: self.pivot.as_ref().map(|p| p.yaw()),
            hook_active: self
                .pivot
                .as_ref()
                .map(|p| p.collision_enabled())
                .unwrap_or(false),
            visible_links: self.chain.visible_count(),
        }
    }
}

/// Read-only view for reports and the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSnapshot {
    pub coupler: CouplerId,
    pub state: InteractionState,
    pub attached_to: Option<CouplerId>,
    pub has_pivot: bool,
    pub yaw_degrees: Option<f32>,
    pub hook_active: bool,
    pub visible_links: usize,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CHAIN_LINK_COUNT;

    #[test]
    fn test_new_interaction_is_bare() {
        let interaction = CouplingInteraction::new(CouplerId::rear(4));
        let snap = interaction.snapshot();

        assert_eq!(snap.state, InteractionState::Disabled);
        assert!(!snap.has_pivot);
        assert_eq!(snap.yaw_degrees, None);
        assert!(!snap.hook_active);
        assert_eq!(snap.attached_to, None);
        assert_eq!(interaction.chain().links().len(), CHAIN_LINK_COUNT);
        assert_eq!(snap.visible_links, 0);
    }
}
