//! Output structures for terminal display

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{CouplerId, CouplingEvent, InteractionState, ReasonCode};

/// Per-interaction result of one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Scheduler tick number
    pub tick: u64,
    pub coupler: CouplerId,
    /// State after the tick
    pub state: InteractionState,
    /// Did the state change this tick?
    pub changed: bool,
    /// Reason for current state
    pub reason: ReasonCode,
    pub attached_to: Option<CouplerId>,
    /// Pivot yaw in degrees, if a pivot exists
    pub yaw_degrees: Option<f32>,
    /// Is the hook interactable?
    pub hook_active: bool,
}

impl TickOutput {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let line = format!(
            "{} {:>4} | state={} | attached={} | yaw={} | {}",
            self.state.marker(),
            self.coupler.to_string(),
            self.state,
            self.attached_label(),
            self.yaw_label(),
            self.reason.code()
        );
        let colored = line.color(self.state.color());
        if self.changed {
            colored.bold().to_string()
        } else {
            colored.to_string()
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "tick={} | coupler={} | state={} | attached={} | yaw={} | hook={} | reason={}",
            self.tick,
            self.coupler,
            self.state,
            self.attached_label(),
            self.yaw_label(),
            if self.hook_active { "on" } else { "off" },
            self.reason.code()
        )
    }

    fn attached_label(&self) -> String {
        self.attached_to
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    fn yaw_label(&self) -> String {
        self.yaw_degrees
            .map(|y| format!("{:.2}", y))
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Everything one scheduler pass produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub outputs: Vec<TickOutput>,
    pub events: Vec<CouplingEvent>,
}

impl TickReport {
    /// Output for one coupler, if it was ticked
    pub fn output(&self, coupler: CouplerId) -> Option<&TickOutput> {
        self.outputs.iter().find(|o| o.coupler == coupler)
    }

    /// Number of state changes in this tick
    pub fn transition_count(&self) -> usize {
        self.outputs.iter().filter(|o| o.changed).count()
    }
}
