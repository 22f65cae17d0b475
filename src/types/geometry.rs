//! Pose and material handles shared with the host scene

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World (or parent-relative) placement of a transform. Unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose with a pure yaw about +Y, +Z forward
    pub fn from_yaw_degrees(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw.to_radians()),
        }
    }

    /// Local point to world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// World point to this pose's local space
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// World pose of a child placed at `local_position` / `local_rotation`
    pub fn child(&self, local_position: Vec3, local_rotation: Quat) -> Pose {
        Pose {
            position: self.transform_point(local_position),
            rotation: self.rotation * local_rotation,
        }
    }

    /// Forward (+Z) axis in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Handle to a material owned by the host renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialRef(pub String);

impl MaterialRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
