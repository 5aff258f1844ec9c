//! Save and restore of rule state.
//!
//! A rule's save record is its two hysteresis flags plus one opaque payload
//! per action, by list position. The payloads are produced and consumed by
//! the actions themselves; the rule never looks inside them. Restore runs
//! on a reconstructed rule before any ticks resume.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::WorldQuery;

use super::rule::Rule;

/// Errors surfaced by save/restore.
#[derive(Debug, Error)]
pub enum SaveError {
    /// An action payload failed to encode or decode.
    #[error("action state payload: {0}")]
    Payload(#[from] bincode::Error),

    /// The save record does not match the rule's action list.
    #[error("save record has {found} action payloads, rule has {expected} actions")]
    ActionCountMismatch { expected: usize, found: usize },

    /// The saved flags violate the mutual-exclusion invariant.
    #[error("save record has both stay flags set")]
    ConflictingFlags,
}

/// Persistent record of one rule's mutable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSave {
    /// Forward one-shot flag at save time.
    pub has_triggered_on_stay: bool,
    /// Backward one-shot flag at save time.
    pub has_negative_triggered_on_stay: bool,
    /// Opaque per-action payloads, by list position.
    pub actions: Vec<Vec<u8>>,
}

impl Rule {
    /// Capture this rule's mutable state.
    pub fn save(&self) -> Result<RuleSave, SaveError> {
        let actions = self
            .actions
            .iter()
            .map(|instance| instance.save())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RuleSave {
            has_triggered_on_stay: self.state.has_triggered_on_stay,
            has_negative_triggered_on_stay: self.state.has_negative_triggered_on_stay,
            actions,
        })
    }

    /// Restore saved state onto a reconstructed rule.
    ///
    /// Actions whose targets no longer resolve go inert rather than
    /// failing the load. Occupancy is not persisted: physics re-delivers
    /// overlap events after a load.
    pub fn restore(&mut self, save: &RuleSave, world: &dyn WorldQuery) -> Result<(), SaveError> {
        if save.actions.len() != self.actions.len() {
            return Err(SaveError::ActionCountMismatch {
                expected: self.actions.len(),
                found: save.actions.len(),
            });
        }
        if save.has_triggered_on_stay && save.has_negative_triggered_on_stay {
            return Err(SaveError::ConflictingFlags);
        }

        for (instance, payload) in self.actions.iter_mut().zip(&save.actions) {
            instance.restore(payload, world)?;
        }

        self.state.has_triggered_on_stay = save.has_triggered_on_stay;
        self.state.has_negative_triggered_on_stay = save.has_negative_triggered_on_stay;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, ActionKind, ActionTiming};
    use crate::conditions::Condition;
    use crate::core::{ActorSnapshot, EventHandle, Frame, LevelId};
    use crate::world::MemoryWorld;
    use glam::Vec3;

    const COUNTER: EventHandle = EventHandle::new(1);

    fn rule() -> Rule {
        Rule::new("saved")
            .with_condition(Condition::facing_direction(Vec3::Z).with_threshold(0.5))
            .with_action(Action::new(
                ActionTiming::ONCE_WHILE_ON_STAY,
                ActionKind::FireEvent { handle: COUNTER },
            ))
    }

    fn world() -> MemoryWorld {
        let mut w = MemoryWorld::new(LevelId::new(0));
        w.add_event(COUNTER);
        w
    }

    #[test]
    fn test_save_restore_roundtrip() {
        let mut world = world();
        let mut original = rule();
        let frame = Frame::IDENTITY;
        let actor = ActorSnapshot::new(Vec3::ZERO, Vec3::Z);

        original.on_stay(&frame, &actor, &mut world);
        assert!(original.state().has_triggered_on_stay);
        assert_eq!(world.event_count(COUNTER), 1);

        let record = original.save().unwrap();

        // Reconstruct from authored data, then restore.
        let mut reloaded = rule();
        reloaded.restore(&record, &world).unwrap();
        assert!(reloaded.state().has_triggered_on_stay);
        assert!(reloaded.actions[0].state.has_fired);

        // The one-shot does not re-fire after a load mid-run.
        reloaded.on_stay(&frame, &actor, &mut world);
        assert_eq!(world.event_count(COUNTER), 1);
    }

    #[test]
    fn test_restore_count_mismatch() {
        let world = world();
        let record = RuleSave {
            has_triggered_on_stay: false,
            has_negative_triggered_on_stay: false,
            actions: vec![],
        };

        let mut reloaded = rule();
        let err = reloaded.restore(&record, &world).unwrap_err();
        assert!(matches!(
            err,
            SaveError::ActionCountMismatch {
                expected: 1,
                found: 0
            }
        ));
    }

    #[test]
    fn test_restore_rejects_conflicting_flags() {
        let world = world();
        let mut reloaded = rule();
        let record = RuleSave {
            has_triggered_on_stay: true,
            has_negative_triggered_on_stay: true,
            actions: vec![reloaded.actions[0].save().unwrap()],
        };

        assert!(matches!(
            reloaded.restore(&record, &world).unwrap_err(),
            SaveError::ConflictingFlags
        ));
    }

    #[test]
    fn test_restore_with_destroyed_target_goes_inert() {
        let world_with = world();
        let record = {
            let original = rule();
            original.save().unwrap()
        };

        // Restore into a world where the event binding is gone.
        let empty_world = MemoryWorld::new(LevelId::new(0));
        let mut reloaded = rule();
        reloaded.restore(&record, &empty_world).unwrap();
        assert!(reloaded.actions[0].state.inert);

        // The inert action never dispatches again.
        let mut w = world_with;
        let frame = Frame::IDENTITY;
        let actor = ActorSnapshot::new(Vec3::ZERO, Vec3::Z);
        reloaded.on_stay(&frame, &actor, &mut w);
        assert_eq!(w.event_count(COUNTER), 0);
    }
}
