//! Tick scheduler
//!
//! One pass per frame over every registered interaction:
//! decide → exit old scopes (innermost first) → commit → enter new scopes
//! (outermost first) → tick every scope of the current state.
//!
//! Edges fire only on a real state change, so re-running with nothing
//! changed on the host never re-enters or re-exits anything.

use chrono::Utc;
use tracing::debug;

use crate::core::registry::InteractionRegistry;
use crate::types::{CouplerHost, CouplingEvent, TickOutput, TickReport, Transition};

#[derive(Debug, Default)]
pub struct Scheduler {
    tick: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Run one pass
    pub fn tick(&mut self, registry: &mut InteractionRegistry, host: &dyn CouplerHost) -> TickReport {
        self.tick += 1;
        let mut outputs = Vec::with_capacity(registry.len());

        for coupler in registry.ids() {
            let Some(current) = registry.state(coupler) else {
                continue;
            };
            let Some((next, reason)) = registry.next_state(coupler, host) else {
                continue;
            };

            let transition = Transition::new(current, next);
            let changed = !transition.is_noop();
            if changed {
                debug!("{} {} -> {} ({})", coupler, current, next, reason.code());
                for scope in transition.exits() {
                    registry.on_exit(coupler, scope, host);
                }
                registry.set_state(coupler, next);
                for scope in transition.entries() {
                    registry.on_enter(coupler, scope, host);
                }
                registry.record(CouplingEvent::Transition {
                    coupler,
                    from: current,
                    to: next,
                    reason,
                });
            }

            for scope in next.scopes() {
                registry.on_tick(coupler, *scope, host);
            }

            let snapshot = registry.get(coupler).map(|i| i.snapshot());
            outputs.push(TickOutput {
                timestamp: Utc::now(),
                tick: self.tick,
                coupler,
                state: next,
                changed,
                reason,
                attached_to: snapshot.as_ref().and_then(|s| s.attached_to),
                yaw_degrees: snapshot.as_ref().and_then(|s| s.yaw_degrees),
                hook_active: snapshot.map(|s| s.hook_active).unwrap_or(false),
            });
        }

        TickReport {
            tick: self.tick,
            outputs,
            events: registry.drain_events(),
        }
    }

    /// Run `n` passes
    pub fn run(
        &mut self,
        n: usize,
        registry: &mut InteractionRegistry,
        host: &dyn CouplerHost,
    ) -> Vec<TickReport> {
        (0..n).map(|_| self.tick(registry, host)).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
