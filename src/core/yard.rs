//! Reference host: cars on a plane with symmetric couplings
//!
//! Front coupler sits at +length/2 along the car's heading and faces
//! forward; the rear coupler sits at -length/2 and faces backward.
//!
//! Destroying a car does not clear the survivor's coupling. The survivor
//! keeps reporting the dead coupler until it is uncoupled, the same way a
//! host scene keeps a reference to a destroyed object until it is cleaned up.

use glam::Vec3;
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{
    CarId, CouplerEnd, CouplerHost, CouplerId, CouplingError, MaterialRef, Pose, UncoupleRequest,
};
use crate::CAR_LENGTH;

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: CarId,
    pub position: Vec3,
    /// Yaw of the car body in degrees, 0 = +Z
    pub heading: f32,
    pub length: f32,
    pub material: Option<MaterialRef>,
}

impl Car {
    pub fn new(id: u32, position: Vec3) -> Self {
        Self {
            id: CarId(id),
            position,
            heading: 0.0,
            length: CAR_LENGTH,
            material: None,
        }
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_material(mut self, material: MaterialRef) -> Self {
        self.material = Some(material);
        self
    }

    /// World pose of one of this car's couplers
    pub fn coupler_pose(&self, end: CouplerEnd) -> Pose {
        let body = Pose::from_yaw_degrees(self.position, self.heading);
        let half = self.length / 2.0;
        match end {
            CouplerEnd::Front => Pose::from_yaw_degrees(body.transform_point(half * Vec3::Z), self.heading),
            CouplerEnd::Rear => {
                Pose::from_yaw_degrees(body.transform_point(-half * Vec3::Z), self.heading + 180.0)
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Yard {
    cars: BTreeMap<CarId, Car>,
    couplings: BTreeMap<CouplerId, CouplerId>,
    uncouple_log: Vec<(CouplerId, UncoupleRequest)>,
}

impl Yard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, car: Car) -> Result<[CouplerId; 2], CouplingError> {
        if self.cars.contains_key(&car.id) {
            return Err(CouplingError::DuplicateCar(car.id));
        }
        let id = car.id;
        debug!("spawned car {} at {:?}", id, car.position);
        self.cars.insert(id, car);
        Ok(Self::couplers_of(id))
    }

    /// Remove a car. Its own couplings go with it; partners are left dangling.
    pub fn despawn(&mut self, car: CarId) -> Result<[CouplerId; 2], CouplingError> {
        self.cars.remove(&car).ok_or(CouplingError::UnknownCar(car))?;
        let couplers = Self::couplers_of(car);
        for coupler in couplers {
            self.couplings.remove(&coupler);
        }
        debug!("despawned car {}", car);
        Ok(couplers)
    }

    pub fn move_car(&mut self, car: CarId, position: Vec3) -> Result<(), CouplingError> {
        let entry = self.cars.get_mut(&car).ok_or(CouplingError::UnknownCar(car))?;
        entry.position = position;
        Ok(())
    }

    pub fn couple(&mut self, a: CouplerId, b: CouplerId) -> Result<(), CouplingError> {
        if a == b {
            return Err(CouplingError::SelfCoupling(a));
        }
        for side in [a, b] {
            if !self.cars.contains_key(&side.car) {
                return Err(CouplingError::UnknownCar(side.car));
            }
            if self.couplings.contains_key(&side) {
                return Err(CouplingError::AlreadyCoupled(side));
            }
        }
        self.couplings.insert(a, b);
        self.couplings.insert(b, a);
        debug!("coupled {} <-> {}", a, b);
        Ok(())
    }

    pub fn car(&self, car: CarId) -> Option<&Car> {
        self.cars.get(&car)
    }

    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.cars.values()
    }

    /// Every uncouple call received, in order
    pub fn uncouple_log(&self) -> &[(CouplerId, UncoupleRequest)] {
        &self.uncouple_log
    }

    pub fn couplers_of(car: CarId) -> [CouplerId; 2] {
        [
            CouplerId { car, end: CouplerEnd::Front },
            CouplerId { car, end: CouplerEnd::Rear },
        ]
    }
}

impl CouplerHost for Yard {
    fn coupled_to(&self, coupler: CouplerId) -> Option<CouplerId> {
        self.couplings.get(&coupler).copied()
    }

    fn uncouple(&mut self, coupler: CouplerId, request: UncoupleRequest) {
        self.uncouple_log.push((coupler, request));
        if let Some(partner) = self.couplings.remove(&coupler) {
            if self.couplings.get(&partner) == Some(&coupler) {
                self.couplings.remove(&partner);
            }
            debug!("uncoupled {} from {}", coupler, partner);
        }
    }

    fn coupler_pose(&self, coupler: CouplerId) -> Option<Pose> {
        self.cars.get(&coupler.car).map(|c| c.coupler_pose(coupler.end))
    }

    fn buffer_material(&self, car: CarId) -> Option<MaterialRef> {
        self.cars.get(&car).and_then(|c| c.material.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
