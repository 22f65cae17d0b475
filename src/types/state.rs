//! Coupling interaction state definitions

use colored::Color;
use serde::{Deserialize, Serialize};

/// The four states of a coupling interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionState {
    /// No coupling geometry exists for this coupler
    Disabled,
    /// Enabled but not joined to any partner
    Parked,
    /// Joined with chain slack
    Attached,
    /// Rigidly joined, pivots track each other every tick
    AttachedTight,
}

/// Hierarchical region a state lives in.
///
/// Enter/exit callbacks fire per scope, so a move between two enabled
/// states never re-enters `Enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    Disabled,
    Enabled,
    Parked,
    Attached,
    AttachedTight,
}

impl InteractionState {
    /// All states, in declaration order
    pub const ALL: [InteractionState; 4] = [
        InteractionState::Disabled,
        InteractionState::Parked,
        InteractionState::Attached,
        InteractionState::AttachedTight,
    ];

    /// Any state that owns a pivot
    pub fn is_enabled(&self) -> bool {
        !matches!(self, InteractionState::Disabled)
    }

    /// Loose or tight attachment
    pub fn is_attached(&self) -> bool {
        matches!(self, InteractionState::Attached | InteractionState::AttachedTight)
    }

    /// Scopes from outermost to innermost
    pub fn scopes(&self) -> &'static [Scope] {
        match self {
            InteractionState::Disabled => &[Scope::Disabled],
            InteractionState::Parked => &[Scope::Enabled, Scope::Parked],
            InteractionState::Attached => &[Scope::Enabled, Scope::Attached],
            InteractionState::AttachedTight => {
                &[Scope::Enabled, Scope::Attached, Scope::AttachedTight]
            }
        }
    }

    /// Terminal color for this state
    pub fn color(&self) -> Color {
        match self {
            InteractionState::Disabled => Color::BrightBlack,
            InteractionState::Parked => Color::Yellow,
            InteractionState::Attached => Color::Cyan,
            InteractionState::AttachedTight => Color::Green,
        }
    }

    /// Short marker for terminal output
    pub fn marker(&self) -> &'static str {
        match self {
            InteractionState::Disabled => "·",
            InteractionState::Parked => "○",
            InteractionState::Attached => "◐",
            InteractionState::AttachedTight => "●",
        }
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InteractionState::Disabled => "DISABLED",
            InteractionState::Parked => "PARKED",
            InteractionState::Attached => "ATTACHED",
            InteractionState::AttachedTight => "ATTACHED_TIGHT",
        };
        write!(f, "{}", name)
    }
}

/// A single state change and the scope edges it crosses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: InteractionState,
    pub to: InteractionState,
}

impl Transition {
    pub fn new(from: InteractionState, to: InteractionState) -> Self {
        Self { from, to }
    }

    /// True when nothing changes
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Scopes left behind, innermost first
    pub fn exits(&self) -> Vec<Scope> {
        if self.is_noop() {
            return Vec::new();
        }
        let keep = self.to.scopes();
        self.from
            .scopes()
            .iter()
            .rev()
            .filter(|s| !keep.contains(s))
            .copied()
            .collect()
    }

    /// Scopes newly entered, outermost first
    pub fn entries(&self) -> Vec<Scope> {
        if self.is_noop() {
            return Vec::new();
        }
        let had = self.from.scopes();
        self.to
            .scopes()
            .iter()
            .filter(|s| !had.contains(s))
            .copied()
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_family() {
        assert!(!InteractionState::Disabled.is_enabled());
        assert!(InteractionState::Parked.is_enabled());
        assert!(InteractionState::AttachedTight.is_enabled());
        assert!(InteractionState::Attached.is_attached());
        assert!(!InteractionState::Parked.is_attached());
    }

    #[test]
    fn test_disabled_to_tight_enters_outermost_first() {
        let t = Transition::new(InteractionState::Disabled, InteractionState::AttachedTight);
        assert_eq!(t.exits(), vec![Scope::Disabled]);
        assert_eq!(
            t.entries(),
            vec![Scope::Enabled, Scope::Attached, Scope::AttachedTight]
        );
    }

    #[test]
    fn test_tight_to_parked_keeps_enabled() {
        let t = Transition::new(InteractionState::AttachedTight, InteractionState::Parked);
        assert_eq!(t.exits(), vec![Scope::AttachedTight, Scope::Attached]);
        assert_eq!(t.entries(), vec![Scope::Parked]);
    }

    #[test]
    fn test_loose_to_tight_only_enters_tight() {
        let t = Transition::new(InteractionState::Attached, InteractionState::AttachedTight);
        assert!(t.exits().is_empty());
        assert_eq!(t.entries(), vec![Scope::AttachedTight]);
    }

    #[test]
    fn test_noop_transition_has_no_edges() {
        for state in InteractionState::ALL {
            let t = Transition::new(state, state);
            assert!(t.exits().is_empty());
            assert!(t.entries().is_empty());
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(InteractionState::AttachedTight.to_string(), "ATTACHED_TIGHT");
        assert_eq!(InteractionState::Disabled.to_string(), "DISABLED");
    }
}
