//! Save and restore across a simulated session boundary.
//!
//! Each test runs a rule partway through a session, captures its save
//! record, rebuilds the rule from authored data (as a host would after a
//! reload), restores, and checks behavior resumes mid-cycle.

use glam::Vec3;
use spatial_triggers::{
    Action, ActionKind, ActionTiming, ActorSnapshot, Condition, EventHandle, Frame, LevelId,
    MemoryWorld, PortalId, PortalRef, PortalSaveKey, Rule, RuleSave, VisibilityId, VisibilityState,
};

const COUNTER: EventHandle = EventHandle::new(1);

fn world() -> MemoryWorld {
    let mut w = MemoryWorld::new(LevelId::new(0));
    w.add_event(COUNTER);
    w
}

fn actor(dot: f32) -> ActorSnapshot {
    let x = (1.0 - dot * dot).max(0.0).sqrt();
    ActorSnapshot::new(Vec3::ZERO, Vec3::new(x, 0.0, dot))
}

fn authored() -> Rule {
    Rule::new("door")
        .with_condition(Condition::facing_direction(Vec3::Z).with_threshold(0.5))
        .with_action(Action::new(
            ActionTiming::ONCE_WHILE_ON_STAY,
            ActionKind::FireEvent { handle: COUNTER },
        ))
}

#[test]
fn test_one_shot_survives_reload_mid_run() {
    let mut world = world();
    let mut rule = authored();
    let frame = Frame::IDENTITY;

    rule.on_begin(&frame, &actor(0.9), &mut world);
    rule.on_stay(&frame, &actor(0.9), &mut world);
    assert_eq!(world.event_count(COUNTER), 1);

    let record = rule.save().unwrap();

    let mut reloaded = authored();
    reloaded.restore(&record, &world).unwrap();

    // Occupancy is not persisted; physics re-delivers the begin. The stay
    // flag is persisted, so the one-shot must not re-fire.
    reloaded.on_begin(&frame, &actor(0.9), &mut world);
    reloaded.on_stay(&frame, &actor(0.9), &mut world);
    assert_eq!(world.event_count(COUNTER), 1);

    // The cycle continues normally: backward re-arms forward.
    reloaded.on_stay(&frame, &actor(-0.9), &mut world);
    reloaded.on_stay(&frame, &actor(0.9), &mut world);
    assert_eq!(world.event_count(COUNTER), 2);
}

#[test]
fn test_backward_flag_round_trips() {
    let mut world = world();
    let mut rule = authored();
    let frame = Frame::IDENTITY;

    rule.on_stay(&frame, &actor(-0.9), &mut world);
    assert!(rule.state().has_negative_triggered_on_stay);

    let record = rule.save().unwrap();
    let mut reloaded = authored();
    reloaded.restore(&record, &world).unwrap();

    assert!(reloaded.state().has_negative_triggered_on_stay);
    assert!(!reloaded.state().has_triggered_on_stay);
}

#[test]
fn test_save_record_serializes_with_serde() {
    let mut world = world();
    let mut rule = authored();
    let frame = Frame::IDENTITY;
    rule.on_stay(&frame, &actor(0.9), &mut world);

    // Hosts embed the record in their own save files; it must round-trip
    // through an outer serde format without loss.
    let record = rule.save().unwrap();
    let json = serde_json::to_string(&record).unwrap();
    let back: RuleSave = serde_json::from_str(&json).unwrap();
    assert_eq!(record, back);
}

#[test]
fn test_promoted_portal_refs_survive_reload() {
    let mut world = world();
    world.add_persisted_portal(PortalSaveKey::new(42));
    world.add_portal(PortalId::new(7));

    let make = || {
        Rule::new("portal-gate").with_action(Action::new(
            ActionTiming::ON_ENTER,
            ActionKind::TogglePortalRendering {
                pause: vec![PortalRef::Persisted(PortalSaveKey::new(42))],
                resume: vec![],
            },
        ))
    };

    let mut rule = make();
    rule.actions[0].promote_portal(PortalSaveKey::new(42), PortalId::new(7));
    let record = rule.save().unwrap();

    let mut reloaded = make();
    reloaded.restore(&record, &world).unwrap();

    // The reloaded instance dispatches via the promoted live reference.
    let frame = Frame::IDENTITY;
    reloaded.on_begin(&frame, &actor(0.9), &mut world);
    assert_eq!(
        world.portal_paused(PortalRef::Live(PortalId::new(7))),
        Some(true)
    );
    assert_eq!(
        world.portal_paused(PortalRef::Persisted(PortalSaveKey::new(42))),
        Some(false)
    );
}

#[test]
fn test_unresolvable_action_goes_inert_not_fatal() {
    let record = authored().save().unwrap();

    // The event binding no longer exists in the reloaded world.
    let mut bare = MemoryWorld::new(LevelId::new(0));
    let mut reloaded = authored();
    reloaded.restore(&record, &bare).unwrap();
    assert!(reloaded.actions[0].state.inert);

    // The inert action stays quiet for the rest of the session.
    let frame = Frame::IDENTITY;
    reloaded.on_stay(&frame, &actor(0.9), &mut bare);
    assert!(reloaded.state().has_triggered_on_stay);
}

#[test]
fn test_visibility_action_state_round_trips() {
    let mut world = world();
    world.add_visibility(VisibilityId::new(1), VisibilityState::Invisible);

    let make = || {
        Rule::new("reveal").with_action(Action::new(
            ActionTiming::ON_ENTER,
            ActionKind::SetVisibilityState {
                targets: vec![VisibilityId::new(1)],
                state: VisibilityState::Visible,
            },
        ))
    };

    let mut rule = make();
    let frame = Frame::IDENTITY;
    rule.on_begin(&frame, &actor(0.9), &mut world);
    assert!(rule.actions[0].state.has_fired);

    let record = rule.save().unwrap();
    let mut reloaded = make();
    reloaded.restore(&record, &world).unwrap();
    assert!(reloaded.actions[0].state.has_fired);
    assert!(!reloaded.actions[0].state.inert);
}
