//! Property checks over random tick sequences.
//!
//! A tiny reference model tracks what the hysteresis flags should be after
//! each step; proptest drives the real rule through arbitrary interleavings
//! of stays, exits, and re-entries and compares.

use glam::Vec3;
use proptest::prelude::*;
use spatial_triggers::{
    Action, ActionKind, ActionTiming, ActorSnapshot, Condition, EventHandle, Frame, LevelId,
    MemoryWorld, Rule,
};

const COUNTER: EventHandle = EventHandle::new(1);

#[derive(Clone, Copy, Debug)]
enum Step {
    /// A stay tick with the given facing dot against +Z.
    Stay(f32),
    /// Exit then immediate re-enter with the given facing dot.
    Cycle(f32),
    /// Deferred reset followed by the next fixed tick.
    Reset,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let dot = prop_oneof![Just(-0.9f32), Just(0.0), Just(0.9)];
    prop_oneof![
        4 => dot.clone().prop_map(Step::Stay),
        1 => dot.prop_map(Step::Cycle),
        1 => Just(Step::Reset),
    ]
}

fn actor(dot: f32) -> ActorSnapshot {
    let x = (1.0 - dot * dot).max(0.0).sqrt();
    ActorSnapshot::new(Vec3::ZERO, Vec3::new(x, 0.0, dot))
}

fn rule() -> Rule {
    Rule::new("modelled")
        .with_condition(Condition::facing_direction(Vec3::Z).with_threshold(0.5))
        .with_action(Action::new(
            ActionTiming::ONCE_WHILE_ON_STAY,
            ActionKind::FireEvent { handle: COUNTER },
        ))
}

/// Reference model of the two stay flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Model {
    forward: bool,
    backward: bool,
    forward_fires: u32,
}

impl Model {
    fn stay(&mut self, dot: f32) {
        if dot > 0.5 {
            if !self.forward {
                self.forward = true;
                self.backward = false;
                self.forward_fires += 1;
            }
        } else if dot < -0.5 {
            if !self.backward {
                self.backward = true;
                self.forward = false;
            }
        }
        // Deadband: nothing moves.
    }

    fn reset(&mut self) {
        self.forward = false;
        self.backward = false;
    }
}

proptest! {
    #[test]
    fn flags_match_model_and_stay_exclusive(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let mut world = MemoryWorld::new(LevelId::new(0));
        world.add_event(COUNTER);

        let mut rule = rule();
        let mut model = Model::default();
        let frame = Frame::IDENTITY;

        rule.on_begin(&frame, &actor(0.0), &mut world);

        for step in steps {
            match step {
                Step::Stay(dot) => {
                    rule.on_stay(&frame, &actor(dot), &mut world);
                    model.stay(dot);
                }
                Step::Cycle(dot) => {
                    rule.on_end(&mut world);
                    model.reset();
                    rule.on_begin(&frame, &actor(dot), &mut world);
                }
                Step::Reset => {
                    rule.schedule_reset();
                    rule.fixed_tick();
                    model.reset();
                }
            }

            let state = rule.state();
            // Mutual exclusion holds after every step.
            prop_assert!(!(state.has_triggered_on_stay && state.has_negative_triggered_on_stay));
            prop_assert_eq!(state.has_triggered_on_stay, model.forward);
            prop_assert_eq!(state.has_negative_triggered_on_stay, model.backward);
        }

        // The one-shot fired exactly once per forward run.
        prop_assert_eq!(world.event_count(COUNTER), model.forward_fires);
    }

    #[test]
    fn deadband_ticks_never_move_state(
        setup in prop_oneof![Just(-0.9f32), Just(0.9)],
        deadband_ticks in 1usize..20,
    ) {
        let mut world = MemoryWorld::new(LevelId::new(0));
        world.add_event(COUNTER);

        let mut rule = rule();
        let frame = Frame::IDENTITY;

        rule.on_stay(&frame, &actor(setup), &mut world);
        let before = *rule.state();
        let fired_before = world.event_count(COUNTER);

        for _ in 0..deadband_ticks {
            let events = rule.on_stay(&frame, &actor(0.0), &mut world);
            prop_assert!(events.is_empty());
        }

        prop_assert_eq!(*rule.state(), before);
        prop_assert_eq!(world.event_count(COUNTER), fired_before);
    }
}
