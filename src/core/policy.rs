//! Decision policy selection
//!
//! The policy is fixed when the registry is built. `HostDefault` forwards
//! every decision and callback to the host's own chain behaviour; `RigidHook`
//! replaces them.

use serde::{Deserialize, Serialize};

use crate::types::{CouplerHost, CouplerId, HookConfig, InteractionState, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingPolicy {
    HostDefault,
    RigidHook,
}

impl CouplingPolicy {
    pub fn from_config(config: &HookConfig) -> Self {
        if config.hook_enabled() {
            Self::RigidHook
        } else {
            Self::HostDefault
        }
    }
}

/// The host's unmodified chain coupling logic
///
/// Callbacks see only the coupler and scope. The registry's link protocol
/// is not reachable from here, so under [`CouplingPolicy::HostDefault`]
/// `attached_to` stays `None` even while a coupler is `Attached`.
pub trait ChainBehavior: Send + Sync {
    fn determine_next_state(
        &mut self,
        coupler: CouplerId,
        current: InteractionState,
        host: &dyn CouplerHost,
    ) -> InteractionState;

    fn on_enter(&mut self, _coupler: CouplerId, _scope: Scope) {}

    fn on_exit(&mut self, _coupler: CouplerId, _scope: Scope) {}

    fn on_tick(&mut self, _coupler: CouplerId, _scope: Scope) {}
}

/// Stock model: a coupled coupler hangs a loose chain, otherwise it is parked.
/// The chain keeps no partner link, the host's coupling is the only record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LooseChain;

impl ChainBehavior for LooseChain {
    fn determine_next_state(
        &mut self,
        coupler: CouplerId,
        _current: InteractionState,
        host: &dyn CouplerHost,
    ) -> InteractionState {
        if host.is_coupled(coupler) {
            InteractionState::Attached
        } else {
            InteractionState::Parked
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
