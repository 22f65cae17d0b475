//! Core types for Couplehook

mod config;
mod coupler;
mod error;
mod event;
mod geometry;
mod output;
mod reason;
mod state;

pub use config::{CouplerType, HookConfig};
pub use coupler::{CarId, CouplerEnd, CouplerHost, CouplerId, UncoupleRequest};
pub use error::CouplingError;
pub use event::CouplingEvent;
pub use geometry::{MaterialRef, Pose};
pub use output::{TickOutput, TickReport};
pub use reason::ReasonCode;
pub use state::{InteractionState, Scope, Transition};
