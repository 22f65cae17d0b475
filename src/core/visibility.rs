//! Chain link visibility
//!
//! The host shows chain links when a coupler becomes enabled. Under the rigid
//! hook policy every link stays hidden, since the hook replaces the chain.

use serde::{Deserialize, Serialize};

use crate::core::policy::CouplingPolicy;
use crate::CHAIN_LINK_COUNT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub name: String,
    pub active: bool,
}

/// Child visuals of one coupler's chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVisuals {
    links: Vec<ChainLink>,
}

impl Default for ChainVisuals {
    fn default() -> Self {
        Self::with_links(CHAIN_LINK_COUNT)
    }
}

impl ChainVisuals {
    /// `count` inactive links
    pub fn with_links(count: usize) -> Self {
        Self {
            links: (0..count)
                .map(|i| ChainLink {
                    name: format!("chain_link_{}", i),
                    active: false,
                })
                .collect(),
        }
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn visible_count(&self) -> usize {
        self.links.iter().filter(|l| l.active).count()
    }

    fn set_all(&mut self, active: bool) {
        for link in &mut self.links {
            link.active = active;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VisibilityOptimizer {
    policy: CouplingPolicy,
}

impl VisibilityOptimizer {
    pub fn new(policy: CouplingPolicy) -> Self {
        Self { policy }
    }

    /// Apply visibility for a freshly enabled coupler. Returns how many
    /// links were forced hidden.
    pub fn enable(&self, visuals: &mut ChainVisuals) -> usize {
        visuals.set_all(true);
        match self.policy {
            CouplingPolicy::HostDefault => 0,
            CouplingPolicy::RigidHook => {
                visuals.set_all(false);
                visuals.links.len()
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_default_shows_links() {
        let mut visuals = ChainVisuals::default();
        let hidden = VisibilityOptimizer::new(CouplingPolicy::HostDefault).enable(&mut visuals);
        assert_eq!(hidden, 0);
        assert_eq!(visuals.visible_count(), CHAIN_LINK_COUNT);
    }

    #[test]
    fn test_rigid_hook_hides_every_link() {
        let mut visuals = ChainVisuals::with_links(3);
        let optimizer = VisibilityOptimizer::new(CouplingPolicy::RigidHook);
        assert_eq!(optimizer.enable(&mut visuals), 3);
        assert_eq!(visuals.visible_count(), 0);

        // Re-enabling never brings them back
        optimizer.enable(&mut visuals);
        assert_eq!(visuals.visible_count(), 0);
    }
}
