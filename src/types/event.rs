//! Side effects recorded while the scheduler runs

use serde::{Deserialize, Serialize};

use crate::types::{CouplerId, InteractionState, ReasonCode, UncoupleRequest};

/// One observable side effect of a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CouplingEvent {
    Transition {
        coupler: CouplerId,
        from: InteractionState,
        to: InteractionState,
        reason: ReasonCode,
    },
    PivotCreated {
        coupler: CouplerId,
    },
    PivotDestroyed {
        coupler: CouplerId,
    },
    Linked {
        coupler: CouplerId,
        partner: CouplerId,
    },
    /// `partner` is `None` when the link was already gone on the other side
    Unlinked {
        coupler: CouplerId,
        partner: Option<CouplerId>,
    },
    UncoupleRequested {
        coupler: CouplerId,
        request: UncoupleRequest,
    },
    ChainHidden {
        coupler: CouplerId,
        links: usize,
    },
}

impl CouplingEvent {
    /// Coupler the event happened on
    pub fn coupler(&self) -> CouplerId {
        match self {
            Self::Transition { coupler, .. }
            | Self::PivotCreated { coupler }
            | Self::PivotDestroyed { coupler }
            | Self::Linked { coupler, .. }
            | Self::Unlinked { coupler, .. }
            | Self::UncoupleRequested { coupler, .. }
            | Self::ChainHidden { coupler, .. } => *coupler,
        }
    }

    /// Short label for terminal output
    pub fn label(&self) -> String {
        match self {
            Self::Transition { coupler, from, to, reason } => {
                format!("{} {} -> {} ({})", coupler, from, to, reason.code())
            }
            Self::PivotCreated { coupler } => format!("{} pivot created", coupler),
            Self::PivotDestroyed { coupler } => format!("{} pivot destroyed", coupler),
            Self::Linked { coupler, partner } => format!("{} linked to {}", coupler, partner),
            Self::Unlinked { coupler, partner: Some(p) } => {
                format!("{} unlinked from {}", coupler, p)
            }
            Self::Unlinked { coupler, partner: None } => format!("{} dropped stale link", coupler),
            Self::UncoupleRequested { coupler, .. } => format!("{} hook released", coupler),
            Self::ChainHidden { coupler, links } => {
                format!("{} chain hidden ({} links)", coupler, links)
            }
        }
    }
}
