//! Integration tests for the rigid hook coupling lifecycle
//!
//! Tests the coupling contract:
//! - A coupled pair reaches ATTACHED_TIGHT with a mutual link in one tick
//! - Ticks with nothing changed are idempotent
//! - Pressing the hook issues exactly one uncouple and parks both sides
//! - A despawned partner never leaves a dangling link

use couplehook::core::{Command, InteractionRegistry, Scheduler, Simulation};
use couplehook::types::{
    CarId, CouplerHost, CouplerId, CouplingEvent, HookConfig, InteractionState, MaterialRef, Pose,
    ReasonCode, UncoupleRequest,
};
use couplehook::HOOK_LAYER;
use glam::Vec3;

fn coupled_pair() -> Simulation {
    let mut sim = Simulation::new(HookConfig::knuckle());
    sim.run_script("spawn 1 at 0 0\nspawn 2 at 0 12\ncouple 1f 2r\n")
        .unwrap();
    sim
}

// =============================================================================
// SCENARIO 1: Coupling a pair
// =============================================================================

#[test]
fn test_pair_goes_tight_in_one_tick() {
    let mut sim = coupled_pair();
    let (a, b) = (CouplerId::front(1), CouplerId::rear(2));

    let report = sim.tick();

    assert_eq!(sim.registry().state(a), Some(InteractionState::AttachedTight));
    assert_eq!(sim.registry().state(b), Some(InteractionState::AttachedTight));
    assert_eq!(sim.registry().attached_to(a), Some(b));
    assert_eq!(sim.registry().attached_to(b), Some(a));

    let out = report.output(a).unwrap();
    assert!(out.changed);
    assert_eq!(out.reason, ReasonCode::R102_PARTNER_RESOLVED);
    assert!(out.hook_active, "Attached hook should be interactable");
}

#[test]
fn test_free_ends_park() {
    let mut sim = coupled_pair();
    sim.tick();

    for free in [CouplerId::rear(1), CouplerId::front(2)] {
        assert_eq!(sim.registry().state(free), Some(InteractionState::Parked));
        assert_eq!(sim.registry().attached_to(free), None);
        let snap = sim.registry().get(free).unwrap().snapshot();
        assert!(snap.has_pivot, "Parked coupler should own a pivot");
        assert!(!snap.hook_active, "Parked hook should not be interactable");
    }
}

#[test]
fn test_link_recorded_once() {
    let mut sim = coupled_pair();
    let report = sim.tick();

    let links: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, CouplingEvent::Linked { .. }))
        .collect();
    assert_eq!(links.len(), 1, "Second side must not relink: {:?}", links);
}

#[test]
fn test_chain_hidden_under_hook() {
    let mut sim = coupled_pair();
    sim.tick();

    for interaction in sim.registry().interactions() {
        assert_eq!(interaction.chain().visible_count(), 0);
    }
}

// =============================================================================
// SCENARIO 2: Idempotence
// =============================================================================

#[test]
fn test_second_tick_changes_nothing() {
    let mut sim = coupled_pair();
    sim.tick();
    let before = sim.registry().snapshots();

    let report = sim.tick();

    assert_eq!(report.transition_count(), 0);
    assert!(report.events.is_empty(), "Unexpected events: {:?}", report.events);
    assert_eq!(sim.registry().snapshots(), before);
}

#[test]
fn test_many_ticks_keep_one_pivot_each() {
    let mut sim = coupled_pair();
    let reports = sim.apply(&Command::Tick { count: 20 }).unwrap();

    assert_eq!(reports.len(), 20);
    assert_eq!(sim.registry().pivot_count(), 4);
    let created = reports
        .iter()
        .flat_map(|r| r.events.iter())
        .filter(|e| matches!(e, CouplingEvent::PivotCreated { .. }))
        .count();
    assert_eq!(created, 4);
}

// =============================================================================
// SCENARIO 3: Hook activation
// =============================================================================

#[test]
fn test_activation_uncouples_once() {
    let mut sim = coupled_pair();
    sim.tick();

    sim.run_script("activate 1f").unwrap();

    let log = sim.yard().uncouple_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].0, CouplerId::front(1));
    assert_eq!(log[0].1, UncoupleRequest::hook_release());
    assert!(log[0].1.via_chain_interaction);
    assert!(log[0].1.play_audio);
    assert!(!log[0].1.called_on_other_coupler);
    assert!(!log[0].1.due_to_broken_couple);
}

#[test]
fn test_activation_parks_both_sides() {
    let mut sim = coupled_pair();
    sim.tick();
    sim.run_script("activate 1f").unwrap();

    let report = sim.tick();

    for side in [CouplerId::front(1), CouplerId::rear(2)] {
        assert_eq!(sim.registry().state(side), Some(InteractionState::Parked));
        assert_eq!(sim.registry().attached_to(side), None);
        assert_eq!(report.output(side).unwrap().reason, ReasonCode::R101_NOT_COUPLED);

        let pivot = sim.registry().get(side).unwrap().pivot().unwrap();
        assert_eq!(pivot.yaw(), 0.0, "Detach resets the pivot");
        assert!(!pivot.collision_enabled());
        assert!(pivot.hook.binding().is_none());
    }
}

#[test]
fn test_parked_hook_ignores_press() {
    let mut sim = coupled_pair();
    sim.tick();

    sim.run_script("activate 1r").unwrap();
    assert!(sim.yard().uncouple_log().is_empty());
}

#[test]
fn test_press_before_first_tick_is_ignored() {
    let mut sim = coupled_pair();
    sim.run_script("activate 1f").unwrap();

    assert!(sim.yard().uncouple_log().is_empty());
    assert!(sim.yard().is_coupled(CouplerId::front(1)));
}

#[test]
fn test_recoupling_after_release() {
    let mut sim = coupled_pair();
    sim.tick();
    sim.run_script("activate 2r\ntick\ncouple 1f 2r\ntick").unwrap();

    assert_eq!(
        sim.registry().state(CouplerId::front(1)),
        Some(InteractionState::AttachedTight)
    );
    assert_eq!(sim.registry().attached_to(CouplerId::front(1)), Some(CouplerId::rear(2)));
}

// =============================================================================
// SCENARIO 4: Partner removal and swaps
// =============================================================================

#[test]
fn test_despawned_partner_clears_link() {
    let mut sim = coupled_pair();
    sim.tick();

    sim.run_script("despawn 2").unwrap();
    let report = sim.tick();

    let survivor = CouplerId::front(1);
    assert_eq!(sim.registry().attached_to(survivor), None);
    assert_eq!(sim.registry().state(survivor), Some(InteractionState::Disabled));
    assert_eq!(
        report.output(survivor).unwrap().reason,
        ReasonCode::R103_PARTNER_UNRESOLVED
    );
    assert!(report.events.contains(&CouplingEvent::Unlinked {
        coupler: survivor,
        partner: None,
    }));
    assert!(report.events.contains(&CouplingEvent::PivotDestroyed {
        coupler: CouplerId::rear(2)
    }));
}

#[test]
fn test_despawn_releases_every_pivot() {
    let mut sim = coupled_pair();
    sim.tick();
    sim.run_script("despawn 2\ntick").unwrap();

    // 1f went disabled, 1r is still parked
    assert_eq!(sim.registry().pivot_count(), 1);
    assert_eq!(sim.registry().len(), 2);
}

#[test]
fn test_survivor_parks_once_host_clears() {
    let mut sim = coupled_pair();
    sim.tick();
    sim.run_script("despawn 2\ntick\nuncouple 1f\ntick").unwrap();

    let survivor = CouplerId::front(1);
    assert_eq!(sim.registry().state(survivor), Some(InteractionState::Parked));
    assert!(sim.registry().get(survivor).unwrap().pivot().is_some());
}

#[test]
fn test_partner_swap_relinks() {
    let mut sim = Simulation::new(HookConfig::knuckle());
    sim.run_script(
        "spawn 1 at 0 0\nspawn 2 at 0 12\nspawn 3 at 0 24\nspawn 4 at 3 36\n\
         couple 1f 2r\ncouple 3f 4r\ntick\n\
         uncouple 1f\nuncouple 3f\ncouple 1f 4r\ncouple 3f 2r\n",
    )
    .unwrap();

    // Every side stays coupled, so no state changes on this tick
    let report = sim.tick();
    assert_eq!(report.transition_count(), 0);

    let registry = sim.registry();
    let (f1, r2, f3, r4) = (
        CouplerId::front(1),
        CouplerId::rear(2),
        CouplerId::front(3),
        CouplerId::rear(4),
    );
    assert_eq!(registry.attached_to(f1), Some(r4));
    assert_eq!(registry.attached_to(r4), Some(f1));
    assert_eq!(registry.attached_to(f3), Some(r2));
    assert_eq!(registry.attached_to(r2), Some(f3));
    for coupler in [f1, r2, f3, r4] {
        assert_eq!(registry.state(coupler), Some(InteractionState::AttachedTight));
    }

    assert!(report.events.contains(&CouplingEvent::Linked {
        coupler: f1,
        partner: r4,
    }));
    assert!(report.events.contains(&CouplingEvent::Linked {
        coupler: r2,
        partner: f3,
    }));

    // Car 4 sits off to the side, so 1f now swings toward it
    let yaw = registry.get(f1).unwrap().pivot().unwrap().yaw();
    assert!(yaw.abs() > 1.0, "1f yaw {}", yaw);

    // Settled links are not touched again
    let report = sim.tick();
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, CouplingEvent::Linked { .. } | CouplingEvent::Unlinked { .. })));
}

// =============================================================================
// SCENARIO 5: Hosts that disagree
// =============================================================================

/// Host whose coupling table is set directly, without symmetry checks
#[derive(Default)]
struct OneSidedHost {
    coupled: Vec<(CouplerId, CouplerId)>,
}

impl CouplerHost for OneSidedHost {
    fn coupled_to(&self, coupler: CouplerId) -> Option<CouplerId> {
        self.coupled
            .iter()
            .find(|(from, _)| *from == coupler)
            .map(|(_, to)| *to)
    }

    fn uncouple(&mut self, coupler: CouplerId, _request: UncoupleRequest) {
        self.coupled.retain(|(from, _)| *from != coupler);
    }

    fn coupler_pose(&self, coupler: CouplerId) -> Option<Pose> {
        Some(Pose::from_yaw_degrees(
            Vec3::new(0.0, 0.0, coupler.car.0 as f32 * 12.0),
            0.0,
        ))
    }

    fn buffer_material(&self, _car: CarId) -> Option<MaterialRef> {
        None
    }
}

#[test]
fn test_one_sided_coupling_does_not_attach() {
    let (a, b) = (CouplerId::front(1), CouplerId::rear(2));
    let host = OneSidedHost {
        coupled: vec![(a, b)],
    };
    let mut registry = InteractionRegistry::new(HookConfig::knuckle());
    registry.register(a);
    registry.register(b);

    let report = Scheduler::new().tick(&mut registry, &host);

    assert_eq!(registry.state(a), Some(InteractionState::Disabled));
    assert_eq!(registry.state(b), Some(InteractionState::Parked));
    assert_eq!(registry.attached_to(a), None);
    assert_eq!(registry.attached_to(b), None);
    assert_eq!(report.output(a).unwrap().reason, ReasonCode::R103_PARTNER_UNRESOLVED);
}

#[test]
fn test_partner_pointing_elsewhere_does_not_attach() {
    let (a, b, c) = (CouplerId::front(1), CouplerId::rear(2), CouplerId::rear(3));
    let host = OneSidedHost {
        coupled: vec![(a, b), (b, c), (c, b)],
    };
    let mut registry = InteractionRegistry::new(HookConfig::knuckle());
    for id in [a, b, c] {
        registry.register(id);
    }

    Scheduler::new().tick(&mut registry, &host);

    assert_eq!(registry.state(a), Some(InteractionState::Disabled));
    assert_eq!(registry.attached_to(b), Some(c));
    assert_eq!(registry.attached_to(c), Some(b));
}

#[test]
fn test_self_coupling_is_unresolved() {
    let a = CouplerId::front(1);
    let host = OneSidedHost {
        coupled: vec![(a, a)],
    };
    let mut registry = InteractionRegistry::new(HookConfig::knuckle());
    registry.register(a);

    Scheduler::new().tick(&mut registry, &host);

    assert_eq!(registry.state(a), Some(InteractionState::Disabled));
    assert_eq!(registry.attached_to(a), None);
}

// =============================================================================
// SCENARIO 6: Hook geometry
// =============================================================================

#[test]
fn test_hook_borrows_buffer_material() {
    let mut sim = Simulation::new(HookConfig::knuckle());
    sim.run_script("spawn 1 at 0 0 material plate_red\ntick").unwrap();

    let pivot = sim.registry().get(CouplerId::front(1)).unwrap().pivot().unwrap();
    assert_eq!(pivot.hook.material, Some(MaterialRef::new("plate_red")));
    assert_eq!(pivot.hook.layer, HOOK_LAYER);
    assert!(pivot.hook.collider.convex);
    assert!(pivot.hook.collider.is_trigger);
}

#[test]
fn test_missing_material_still_builds_hook() {
    let mut sim = Simulation::new(HookConfig::knuckle());
    sim.run_script("spawn 1 at 0 0\ntick").unwrap();

    let pivot = sim.registry().get(CouplerId::front(1)).unwrap().pivot().unwrap();
    assert_eq!(pivot.hook.material, None);
}

#[test]
fn test_pivot_sits_behind_and_below_coupler() {
    let mut sim = Simulation::new(HookConfig::knuckle());
    sim.run_script("spawn 1 at 0 0\ntick").unwrap();

    let coupler = CouplerId::front(1);
    let parent = sim.yard().coupler_pose(coupler).unwrap();
    let pivot = sim.registry().get(coupler).unwrap().pivot().unwrap();

    let world = pivot.world_position(parent);
    assert!((world - Vec3::new(0.0, -0.067, 5.0)).length() < 1e-5, "got {:?}", world);
    // Hook rests at the coupler face
    let hook = pivot.hook_position(parent);
    assert!((hook - Vec3::new(0.0, -0.067, 6.0)).length() < 1e-5, "got {:?}", hook);
}
