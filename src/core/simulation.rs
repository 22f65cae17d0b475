//! Scenario driver: a yard, its interactions and a scheduler
//!
//! Used by the CLI and the HTTP sessions.

use glam::Vec3;
use tracing::info;

use crate::core::assets::AssetBundle;
use crate::core::registry::InteractionRegistry;
use crate::core::scheduler::Scheduler;
use crate::core::script::{parse_script, Command};
use crate::core::yard::{Car, Yard};
use crate::types::{
    CarId, CouplerHost, CouplingError, HookConfig, MaterialRef, TickReport, UncoupleRequest,
};

#[derive(Debug)]
pub struct Simulation {
    yard: Yard,
    registry: InteractionRegistry,
    scheduler: Scheduler,
}

impl Simulation {
    pub fn new(config: HookConfig) -> Self {
        Self::with_registry(InteractionRegistry::new(config))
    }

    pub fn with_assets(config: HookConfig, bundle: &AssetBundle) -> Result<Self, CouplingError> {
        Ok(Self::with_registry(InteractionRegistry::with_assets(config, bundle)?))
    }

    pub fn with_registry(registry: InteractionRegistry) -> Self {
        Self {
            yard: Yard::new(),
            registry,
            scheduler: Scheduler::new(),
        }
    }

    pub fn yard(&self) -> &Yard {
        &self.yard
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick_count()
    }

    pub fn tick(&mut self) -> TickReport {
        self.scheduler.tick(&mut self.registry, &self.yard)
    }

    /// Apply one command. Only `tick` produces reports.
    pub fn apply(&mut self, command: &Command) -> Result<Vec<TickReport>, CouplingError> {
        match command {
            Command::Spawn {
                car,
                x,
                z,
                heading,
                material,
            } => {
                let mut new_car = Car::new(*car, Vec3::new(*x, 0.0, *z)).with_heading(*heading);
                if let Some(name) = material {
                    new_car = new_car.with_material(MaterialRef::new(name.clone()));
                }
                for coupler in self.yard.spawn(new_car)? {
                    self.registry.register(coupler);
                }
            }
            Command::Despawn { car } => {
                for coupler in self.yard.despawn(CarId(*car))? {
                    self.registry.remove(coupler);
                }
            }
            Command::Move { car, x, z } => {
                self.yard.move_car(CarId(*car), Vec3::new(*x, 0.0, *z))?;
            }
            Command::Couple { a, b } => self.yard.couple(*a, *b)?,
            Command::Uncouple { coupler } => {
                self.yard.uncouple(*coupler, UncoupleRequest::host_initiated());
            }
            Command::Activate { coupler } => {
                if self.registry.activate_hook(*coupler, &mut self.yard).is_none() {
                    info!("{} hook is not live, press ignored", coupler);
                }
            }
            Command::Tick { count } => {
                return Ok(self.scheduler.run(*count, &mut self.registry, &self.yard));
            }
        }
        Ok(Vec::new())
    }

    /// Parse and run a whole script. Host errors are reported with the
    /// offending line.
    pub fn run_script(&mut self, text: &str) -> Result<Vec<TickReport>, CouplingError> {
        let mut reports = Vec::new();
        for (line, command) in parse_script(text)? {
            let produced = self
                .apply(&command)
                .map_err(|e| CouplingError::script(line, e.to_string()))?;
            reports.extend(produced);
        }
        Ok(reports)
    }
}
