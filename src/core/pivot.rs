//! Hook pivot geometry
//!
//! A pivot hangs under its coupler, one pivot length back. The hook sits one
//! pivot length forward of the pivot, so it rests at the coupler face and
//! swings with the pivot's yaw.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::assets::HookPrefab;
use crate::types::{CouplerId, HookConfig, MaterialRef, Pose, UncoupleRequest};
use crate::PIVOT_NAME;

/// Collision volume on the hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider {
    pub enabled: bool,
    pub convex: bool,
    pub is_trigger: bool,
}

/// What activating the hook does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookBinding {
    pub coupler: CouplerId,
    pub request: UncoupleRequest,
}

/// The interactable hook object
#[derive(Debug, Clone, PartialEq)]
pub struct Hook {
    pub name: String,
    pub layer: String,
    pub mesh: String,
    pub local_position: Vec3,
    pub material: Option<MaterialRef>,
    pub collider: Collider,
    binding: Option<HookBinding>,
}

impl Hook {
    /// Set the activation callback
    pub fn bind(&mut self, coupler: CouplerId, request: UncoupleRequest) {
        self.binding = Some(HookBinding { coupler, request });
    }

    pub fn unbind(&mut self) {
        self.binding = None;
    }

    pub fn binding(&self) -> Option<HookBinding> {
        self.binding
    }

    /// Press the hook. Only reachable while its collider is enabled.
    pub fn activate(&self) -> Option<HookBinding> {
        if self.collider.enabled {
            self.binding
        } else {
            None
        }
    }
}

/// Pivot transform + hook, owned by exactly one interaction
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingPivot {
    pub name: String,
    pub local_position: Vec3,
    yaw: f32,
    pub hook: Hook,
}

impl CouplingPivot {
    /// Instantiate the prefab under a fresh pivot
    pub fn build(config: &HookConfig, prefab: &HookPrefab, material: Option<MaterialRef>) -> Self {
        let hook = Hook {
            name: prefab.name.clone(),
            layer: config.hook_layer.clone(),
            mesh: prefab.mesh.clone(),
            local_position: config.pivot_length * Vec3::Z,
            material,
            collider: Collider {
                enabled: false,
                convex: prefab.convex,
                is_trigger: prefab.is_trigger,
            },
            binding: None,
        };
        Self {
            name: PIVOT_NAME.to_string(),
            local_position: config.pivot_offset(),
            yaw: 0.0,
            hook,
        }
    }

    /// Local yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn local_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
    }

    pub fn reset_rotation(&mut self) {
        self.yaw = 0.0;
    }

    /// World pose given the coupler's pose
    pub fn world_pose(&self, parent: Pose) -> Pose {
        parent.child(self.local_position, self.local_rotation())
    }

    /// World position. Independent of the pivot's own rotation.
    pub fn world_position(&self, parent: Pose) -> Vec3 {
        parent.transform_point(self.local_position)
    }

    /// World position of the hook itself
    pub fn hook_position(&self, parent: Pose) -> Vec3 {
        self.world_pose(parent).transform_point(self.hook.local_position)
    }

    pub fn set_collision(&mut self, enabled: bool) {
        self.hook.collider.enabled = enabled;
    }

    pub fn collision_enabled(&self) -> bool {
        self.hook.collider.enabled
    }
}

// =============================================================================
// TESTS
// =============================================================================
