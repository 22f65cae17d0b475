//! Interaction registry: every coupler's interaction keyed by `CouplerId`
//!
//! Owns the partner link protocol and the enter/exit/tick callbacks the
//! scheduler fires. A partner that has gone away is a lookup miss, never a
//! dangling reference.
//!
//! Link invariant: `attached_to(a) == Some(b)` implies
//! `attached_to(b) == Some(a)`, except inside a single tick while the second
//! side has not run its own transition yet.

use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

use crate::core::aligner::align_pair;
use crate::core::assets::{AssetBundle, HookPrefab};
use crate::core::interaction::{CouplingInteraction, InteractionSnapshot};
use crate::core::pivot::CouplingPivot;
use crate::core::policy::{ChainBehavior, CouplingPolicy, LooseChain};
use crate::core::visibility::VisibilityOptimizer;
use crate::types::{
    CouplerHost, CouplerId, CouplingError, CouplingEvent, HookConfig, InteractionState,
    ReasonCode, Scope, UncoupleRequest,
};

pub struct InteractionRegistry {
    config: HookConfig,
    policy: CouplingPolicy,
    prefab: HookPrefab,
    fallback: Box<dyn ChainBehavior>,
    optimizer: VisibilityOptimizer,
    interactions: BTreeMap<CouplerId, CouplingInteraction>,
    events: Vec<CouplingEvent>,
}

impl std::fmt::Debug for InteractionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionRegistry")
            .field("policy", &self.policy)
            .field("interactions", &self.interactions.len())
            .finish_non_exhaustive()
    }
}

impl InteractionRegistry {
    /// Registry using the built-in hook prefab and the stock chain model
    pub fn new(config: HookConfig) -> Self {
        Self::build(config, HookPrefab::builtin())
    }

    /// Registry using the hook prefab from `bundle`
    pub fn with_assets(config: HookConfig, bundle: &AssetBundle) -> Result<Self, CouplingError> {
        let prefab = bundle.hook()?.clone();
        Ok(Self::build(config, prefab))
    }

    fn build(config: HookConfig, prefab: HookPrefab) -> Self {
        let policy = CouplingPolicy::from_config(&config);
        Self {
            config,
            policy,
            prefab,
            fallback: Box::new(LooseChain),
            optimizer: VisibilityOptimizer::new(policy),
            interactions: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Replace the host chain behaviour used under `HostDefault`
    pub fn with_fallback(mut self, fallback: impl ChainBehavior + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub fn policy(&self) -> CouplingPolicy {
        self.policy
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Add a disabled interaction. Returns false if one already exists.
    pub fn register(&mut self, coupler: CouplerId) -> bool {
        if self.interactions.contains_key(&coupler) {
            return false;
        }
        debug!("registered interaction for {}", coupler);
        self.interactions
            .insert(coupler, CouplingInteraction::new(coupler));
        true
    }

    /// Drop an interaction with its vehicle. The partner keeps its link
    /// until its own next transition clears it.
    pub fn remove(&mut self, coupler: CouplerId) -> Option<CouplingInteraction> {
        let mut removed = self.interactions.remove(&coupler)?;
        if removed.pivot.take().is_some() {
            self.events.push(CouplingEvent::PivotDestroyed { coupler });
        }
        debug!("removed interaction for {}", coupler);
        Some(removed)
    }

    pub fn get(&self, coupler: CouplerId) -> Option<&CouplingInteraction> {
        self.interactions.get(&coupler)
    }

    pub fn contains(&self, coupler: CouplerId) -> bool {
        self.interactions.contains_key(&coupler)
    }

    pub fn state(&self, coupler: CouplerId) -> Option<InteractionState> {
        self.get(coupler).map(|i| i.state())
    }

    pub fn attached_to(&self, coupler: CouplerId) -> Option<CouplerId> {
        self.get(coupler).and_then(|i| i.attached_to())
    }

    /// Registered couplers in key order
    pub fn ids(&self) -> Vec<CouplerId> {
        self.interactions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    pub fn interactions(&self) -> impl Iterator<Item = &CouplingInteraction> {
        self.interactions.values()
    }

    pub fn snapshots(&self) -> Vec<InteractionSnapshot> {
        self.interactions.values().map(|i| i.snapshot()).collect()
    }

    /// Number of live pivots
    pub fn pivot_count(&self) -> usize {
        self.interactions
            .values()
            .filter(|i| i.pivot().is_some())
            .count()
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<CouplingEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn record(&mut self, event: CouplingEvent) {
        self.events.push(event);
    }

    pub(crate) fn set_state(&mut self, coupler: CouplerId, state: InteractionState) {
        if let Some(interaction) = self.interactions.get_mut(&coupler) {
            interaction.set_state(state);
        }
    }

    // =========================================================================
    // Decision
    // =========================================================================

    /// The state `coupler` should be in now. `None` if it is not registered.
    ///
    /// Pure over the host's coupler state, so repeated calls with nothing
    /// changed return the same answer.
    pub fn next_state(
        &mut self,
        coupler: CouplerId,
        host: &dyn CouplerHost,
    ) -> Option<(InteractionState, ReasonCode)> {
        let current = self.state(coupler)?;
        Some(match self.policy {
            CouplingPolicy::HostDefault => (
                self.fallback.determine_next_state(coupler, current, host),
                ReasonCode::R201_HOST_DEFAULT,
            ),
            CouplingPolicy::RigidHook => self.decide_rigid(coupler, host),
        })
    }

    fn decide_rigid(
        &self,
        coupler: CouplerId,
        host: &dyn CouplerHost,
    ) -> (InteractionState, ReasonCode) {
        if !host.is_coupled(coupler) {
            return (InteractionState::Parked, ReasonCode::R101_NOT_COUPLED);
        }
        match self.resolve_partner(coupler, host) {
            Some(_) => (
                InteractionState::AttachedTight,
                ReasonCode::R102_PARTNER_RESOLVED,
            ),
            None => (InteractionState::Disabled, ReasonCode::R103_PARTNER_UNRESOLVED),
        }
    }

    /// Partner interaction, if the host's partner exists here and is coupled
    /// back to `coupler`
    pub fn resolve_partner(&self, coupler: CouplerId, host: &dyn CouplerHost) -> Option<CouplerId> {
        let partner = host.coupled_to(coupler)?;
        if partner == coupler || !self.contains(partner) {
            return None;
        }
        if host.coupled_to(partner) != Some(coupler) {
            return None;
        }
        Some(partner)
    }

    // =========================================================================
    // Link protocol
    // =========================================================================

    /// Set both sides of a link in one step. Any link either side held to a
    /// third coupler is cleared first. Returns false if either side is
    /// missing.
    pub fn link(&mut self, a: CouplerId, b: CouplerId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        if self.attached_to(a) == Some(b) && self.attached_to(b) == Some(a) {
            return true;
        }
        for side in [a, b] {
            if let Some(other) = self.attached_to(side) {
                if other != a && other != b {
                    self.unlink(side);
                }
            }
        }
        for (side, partner) in [(a, b), (b, a)] {
            if let Some(interaction) = self.interactions.get_mut(&side) {
                interaction.attached_to = Some(partner);
            }
        }
        info!("{} linked to {}", a, b);
        self.events.push(CouplingEvent::Linked {
            coupler: a,
            partner: b,
        });
        true
    }

    /// Clear `coupler`'s link and the partner's back reference if it still
    /// points here. Tolerates the partner being gone or already cleared.
    pub fn unlink(&mut self, coupler: CouplerId) -> Option<CouplerId> {
        let partner = self.interactions.get_mut(&coupler)?.attached_to.take()?;
        let mutual = match self.interactions.get_mut(&partner) {
            Some(other) if other.attached_to == Some(coupler) => {
                other.attached_to = None;
                true
            }
            _ => false,
        };
        if mutual {
            info!("{} unlinked from {}", coupler, partner);
        } else {
            debug!("{} dropped stale link to {}", coupler, partner);
        }
        self.events.push(CouplingEvent::Unlinked {
            coupler,
            partner: mutual.then_some(partner),
        });
        Some(partner)
    }

    // =========================================================================
    // Scheduler callbacks
    // =========================================================================

    pub fn on_enter(&mut self, coupler: CouplerId, scope: Scope, host: &dyn CouplerHost) {
        trace!("{} enter {:?}", coupler, scope);
        if scope == Scope::Enabled {
            self.refresh_chain(coupler);
        }
        match self.policy {
            CouplingPolicy::HostDefault => self.fallback.on_enter(coupler, scope),
            CouplingPolicy::RigidHook => match scope {
                Scope::Enabled => self.create_pivot(coupler, host),
                Scope::Attached => self.attach(coupler, host),
                _ => {}
            },
        }
    }

    pub fn on_exit(&mut self, coupler: CouplerId, scope: Scope, _host: &dyn CouplerHost) {
        trace!("{} exit {:?}", coupler, scope);
        match self.policy {
            CouplingPolicy::HostDefault => self.fallback.on_exit(coupler, scope),
            CouplingPolicy::RigidHook => match scope {
                Scope::Enabled => self.destroy_pivot(coupler),
                Scope::Attached => self.detach(coupler),
                _ => {}
            },
        }
    }

    pub fn on_tick(&mut self, coupler: CouplerId, scope: Scope, host: &dyn CouplerHost) {
        match self.policy {
            CouplingPolicy::HostDefault => self.fallback.on_tick(coupler, scope),
            CouplingPolicy::RigidHook => {
                if scope == Scope::Attached {
                    self.relink(coupler, host);
                    self.align(coupler, host);
                }
            }
        }
    }

    /// Player pressed the hook on `coupler`. Issues exactly one uncouple
    /// request when the hook is live.
    pub fn activate_hook(
        &mut self,
        coupler: CouplerId,
        host: &mut dyn CouplerHost,
    ) -> Option<UncoupleRequest> {
        if self.policy != CouplingPolicy::RigidHook {
            return None;
        }
        let interaction = self.get(coupler)?;
        if !interaction.state().is_attached() {
            debug!("{} hook pressed while {}", coupler, interaction.state());
            return None;
        }
        let binding = interaction.pivot()?.hook.activate()?;
        info!("{} hook released, uncoupling", binding.coupler);
        host.uncouple(binding.coupler, binding.request);
        self.events.push(CouplingEvent::UncoupleRequested {
            coupler: binding.coupler,
            request: binding.request,
        });
        Some(binding.request)
    }

    // =========================================================================
    // Rigid hook behaviour
    // =========================================================================

    fn create_pivot(&mut self, coupler: CouplerId, host: &dyn CouplerHost) {
        let material = host.buffer_material(coupler.car);
        if material.is_none() {
            debug!(
                "{} has no material at {}, hook left unpainted",
                coupler, self.config.material_source
            );
        }
        let pivot = CouplingPivot::build(&self.config, &self.prefab, material);
        let Some(interaction) = self.interactions.get_mut(&coupler) else {
            return;
        };
        if interaction.pivot.replace(pivot).is_some() {
            warn!("{} already had a pivot, replaced", coupler);
        }
        self.events.push(CouplingEvent::PivotCreated { coupler });
    }

    fn destroy_pivot(&mut self, coupler: CouplerId) {
        let destroyed = self
            .interactions
            .get_mut(&coupler)
            .and_then(|i| i.pivot.take())
            .is_some();
        if destroyed {
            self.events.push(CouplingEvent::PivotDestroyed { coupler });
        }
    }

    fn attach(&mut self, coupler: CouplerId, host: &dyn CouplerHost) {
        match self.pivot_mut(coupler) {
            Some(pivot) => {
                pivot.hook.bind(coupler, UncoupleRequest::hook_release());
                pivot.set_collision(true);
            }
            None => warn!("{} attached without a pivot, hook not wired", coupler),
        }
        match self.resolve_partner(coupler, host) {
            Some(partner) => {
                self.link(coupler, partner);
            }
            None => warn!("{} attached but its partner did not resolve", coupler),
        }
    }

    fn detach(&mut self, coupler: CouplerId) {
        if let Some(pivot) = self.pivot_mut(coupler) {
            pivot.reset_rotation();
            pivot.set_collision(false);
            pivot.hook.unbind();
        }
        self.unlink(coupler);
    }

    /// The host can re-pair couplers between ticks without either side
    /// leaving Attached, so the link is checked against the host every tick
    fn relink(&mut self, coupler: CouplerId, host: &dyn CouplerHost) {
        let Some(partner) = self.resolve_partner(coupler, host) else {
            return;
        };
        if self.attached_to(coupler) != Some(partner) {
            debug!("{} partner changed, relinking to {}", coupler, partner);
            self.link(coupler, partner);
        }
    }

    fn align(&mut self, coupler: CouplerId, host: &dyn CouplerHost) {
        let Some(partner) = self.attached_to(coupler) else {
            return;
        };
        let (Some(own_pose), Some(partner_pose)) =
            (host.coupler_pose(coupler), host.coupler_pose(partner))
        else {
            trace!("{} alignment skipped, pose unavailable", coupler);
            return;
        };
        if self.get(coupler).and_then(|i| i.pivot()).is_none() {
            return;
        }
        // Borrow the partner pivot out so both can be mutated at once
        let Some(mut partner_pivot) = self
            .interactions
            .get_mut(&partner)
            .and_then(|i| i.pivot.take())
        else {
            return;
        };
        if let Some(own_pivot) = self.pivot_mut(coupler) {
            let (yaw, partner_yaw) = align_pair(own_pivot, own_pose, &mut partner_pivot, partner_pose);
            trace!("{} yaw {:.3}, {} yaw {:.3}", coupler, yaw, partner, partner_yaw);
        }
        if let Some(interaction) = self.interactions.get_mut(&partner) {
            interaction.pivot = Some(partner_pivot);
        }
    }

    fn refresh_chain(&mut self, coupler: CouplerId) {
        let optimizer = self.optimizer;
        let Some(interaction) = self.interactions.get_mut(&coupler) else {
            return;
        };
        let hidden = optimizer.enable(&mut interaction.chain);
        if hidden > 0 {
            self.events.push(CouplingEvent::ChainHidden {
                coupler,
                links: hidden,
            });
        }
    }

    fn pivot_mut(&mut self, coupler: CouplerId) -> Option<&mut CouplingPivot> {
        self.interactions
            .get_mut(&coupler)
            .and_then(|i| i.pivot.as_mut())
    }
}

// =============================================================================
// TESTS
// =============================================================================
