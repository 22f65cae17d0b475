//! Yaw-only look-at between two pivots
//!
//! Snaps immediately, no smoothing. A pivot's world position does not depend
//! on its own rotation, so aligning one side never disturbs the other side's
//! input.

use glam::Vec3;

use crate::core::pivot::CouplingPivot;
use crate::types::Pose;

/// Yaw in degrees, in (-180, 180], turning `pivot`'s +Z toward `target`.
///
/// `pivot` must be the pivot's world pose with its local rotation at identity.
pub fn yaw_towards(pivot: Pose, target: Vec3) -> f32 {
    let offset = pivot.inverse_transform_point(target);
    let yaw = offset.x.atan2(offset.z).to_degrees();
    // atan2(-0.0, -z) lands on -180
    if yaw <= -180.0 {
        yaw + 360.0
    } else {
        yaw
    }
}

/// Reset the pivot, then yaw it toward `target`. Returns the new yaw.
pub fn y_look_at(pivot: &mut CouplingPivot, parent: Pose, target: Vec3) -> f32 {
    pivot.reset_rotation();
    let yaw = yaw_towards(pivot.world_pose(parent), target);
    pivot.set_yaw(yaw);
    yaw
}

/// Point two pivots at each other. Both positions are read before either
/// rotation is written.
pub fn align_pair(
    a: &mut CouplingPivot,
    a_parent: Pose,
    b: &mut CouplingPivot,
    b_parent: Pose,
) -> (f32, f32) {
    let a_pos = a.world_position(a_parent);
    let b_pos = b.world_position(b_parent);
    (y_look_at(a, a_parent, b_pos), y_look_at(b, b_parent, a_pos))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::AssetBundle;
    use crate::types::HookConfig;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn pivot() -> CouplingPivot {
        CouplingPivot::build(&HookConfig::knuckle(), AssetBundle::builtin().hook().unwrap(), None)
    }

    #[test]
    fn test_diagonal_target() {
        assert!(approx(yaw_towards(Pose::IDENTITY, Vec3::new(1.0, 0.0, 1.0)), 45.0));
    }

    #[test]
    fn test_target_ahead() {
        assert!(approx(yaw_towards(Pose::IDENTITY, Vec3::new(0.0, 0.0, 5.0)), 0.0));
    }

    #[test]
    fn test_target_behind_is_positive_half_turn() {
        assert!(approx(yaw_towards(Pose::IDENTITY, Vec3::new(0.0, 0.0, -5.0)), 180.0));
        assert!(approx(yaw_towards(Pose::IDENTITY, Vec3::new(-0.0, 0.0, -5.0)), 180.0));
    }

    #[test]
    fn test_height_is_ignored() {
        assert!(approx(yaw_towards(Pose::IDENTITY, Vec3::new(1.0, 40.0, 1.0)), 45.0));
    }

    #[test]
    fn test_parent_rotation_is_respected() {
        // Parent faces +X, target straight along +X
        let parent = Pose::from_yaw_degrees(Vec3::ZERO, 90.0);
        assert!(approx(yaw_towards(parent, Vec3::new(3.0, 0.0, 0.0)), 0.0));
    }

    #[test]
    fn test_look_at_ignores_previous_rotation() {
        let mut p = pivot();
        let parent = Pose::IDENTITY;
        let target = p.world_position(parent) + Vec3::new(1.0, 0.0, 1.0);

        p.set_yaw(-120.0);
        let yaw = y_look_at(&mut p, parent, target);
        assert!(approx(yaw, 45.0));

        // Repeating is stable: no drift
        let again = y_look_at(&mut p, parent, target);
        assert!(approx(again, yaw));
    }

    #[test]
    fn test_pair_is_order_independent() {
        let a_parent = Pose::from_yaw_degrees(Vec3::new(0.0, 0.0, 6.0), 0.0);
        let b_parent = Pose::from_yaw_degrees(Vec3::new(0.5, 0.0, 6.0), 180.0);

        let (mut a1, mut b1) = (pivot(), pivot());
        let (ya1, yb1) = align_pair(&mut a1, a_parent, &mut b1, b_parent);

        let (mut a2, mut b2) = (pivot(), pivot());
        let (yb2, ya2) = align_pair(&mut b2, b_parent, &mut a2, a_parent);

        assert!(approx(ya1, ya2));
        assert!(approx(yb1, yb2));
    }
}
