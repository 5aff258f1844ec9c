//! A composite trigger volume feeding a rule.
//!
//! Simulates the raw physics callbacks a multi-shape volume produces and
//! checks that the aggregator collapses them so the rule sees exactly one
//! begin/stay/end per external object per frame.

use glam::Vec3;
use spatial_triggers::{
    Action, ActionKind, ActionTiming, ActorId, ActorSnapshot, CompositeAggregator, Condition,
    EventHandle, Frame, LevelId, MemoryWorld, OverlapKind, Rule, ShapeId,
};

const COUNTER: EventHandle = EventHandle::new(1);
const PLAYER: ActorId = ActorId::new(1);

fn world() -> MemoryWorld {
    let mut w = MemoryWorld::new(LevelId::new(0));
    w.add_event(COUNTER);
    w
}

fn counting_rule(timing: ActionTiming) -> Rule {
    Rule::new("composite")
        .with_condition(Condition::facing_direction(Vec3::Z).with_threshold(0.5))
        .with_action(Action::new(timing, ActionKind::FireEvent { handle: COUNTER }))
}

fn actor() -> ActorSnapshot {
    ActorSnapshot::new(Vec3::ZERO, Vec3::Z)
}

/// One physics tick: every sub-shape reports `kind` for the player, and
/// only admitted notifications reach the rule.
fn tick(
    agg: &mut CompositeAggregator,
    rule: &mut Rule,
    world: &mut MemoryWorld,
    shapes: u32,
    kind: OverlapKind,
) {
    let frame = Frame::IDENTITY;
    let snapshot = actor();
    for i in 0..shapes {
        if !agg.admit(ShapeId::new(i), kind, PLAYER) {
            continue;
        }
        match kind {
            OverlapKind::Begin => {
                rule.on_begin(&frame, &snapshot, world);
            }
            OverlapKind::Stay => {
                rule.on_stay(&frame, &snapshot, world);
            }
            OverlapKind::End => {
                rule.on_end(world);
            }
        }
    }
    agg.end_frame();
}

#[test]
fn test_four_shapes_one_enter() {
    let mut world = world();
    let mut agg = CompositeAggregator::new((0..4).map(ShapeId::new));
    let mut rule = counting_rule(ActionTiming::ON_ENTER);

    tick(&mut agg, &mut rule, &mut world, 4, OverlapKind::Begin);
    assert_eq!(world.event_count(COUNTER), 1);
}

#[test]
fn test_four_shapes_one_stay_per_frame() {
    let mut world = world();
    let mut agg = CompositeAggregator::new((0..4).map(ShapeId::new));
    let mut rule = counting_rule(ActionTiming::EVERY_FRAME_ON_STAY);

    tick(&mut agg, &mut rule, &mut world, 4, OverlapKind::Begin);
    for _ in 0..3 {
        tick(&mut agg, &mut rule, &mut world, 4, OverlapKind::Stay);
    }

    // Three frames of stays, not twelve.
    assert_eq!(world.event_count(COUNTER), 3);
}

#[test]
fn test_full_session_through_composite() {
    let mut world = world();
    let mut agg = CompositeAggregator::new((0..3).map(ShapeId::new));
    let mut rule = counting_rule(ActionTiming::ONCE_WHILE_ON_STAY);

    tick(&mut agg, &mut rule, &mut world, 3, OverlapKind::Begin);
    tick(&mut agg, &mut rule, &mut world, 3, OverlapKind::Stay);
    tick(&mut agg, &mut rule, &mut world, 3, OverlapKind::Stay);
    assert_eq!(world.event_count(COUNTER), 1);
    assert!(rule.state().has_triggered_on_stay);

    // All sub-shape exits collapse to one end; the rule resets once.
    tick(&mut agg, &mut rule, &mut world, 3, OverlapKind::End);
    assert!(!rule.state().is_occupied);
    assert!(!rule.state().has_triggered_on_stay);
}

#[test]
fn test_two_actors_each_admitted() {
    let mut agg = CompositeAggregator::new((0..2).map(ShapeId::new));
    let other = ActorId::new(2);

    // Interleaved duplicates from both shapes for both actors.
    assert!(agg.admit(ShapeId::new(0), OverlapKind::Begin, PLAYER));
    assert!(agg.admit(ShapeId::new(0), OverlapKind::Begin, other));
    assert!(!agg.admit(ShapeId::new(1), OverlapKind::Begin, PLAYER));
    assert!(!agg.admit(ShapeId::new(1), OverlapKind::Begin, other));
}

#[test]
fn test_foreign_shape_notification_dropped() {
    let mut world = world();
    let mut agg = CompositeAggregator::new((0..2).map(ShapeId::new));
    let mut rule = counting_rule(ActionTiming::ON_ENTER);

    // A notification from a shape this volume does not own never reaches
    // the rule and does not consume the frame's dedup slot.
    assert!(!agg.admit(ShapeId::new(7), OverlapKind::Begin, PLAYER));
    tick(&mut agg, &mut rule, &mut world, 2, OverlapKind::Begin);
    assert_eq!(world.event_count(COUNTER), 1);
}
