//! Poll-driven rules.
//!
//! A global rule has no trigger volume and never sees overlap events.
//! Once per rendered frame, if the world is ready, it runs the same stay
//! logic as a physics-backed rule. Enter/exit timings are meaningless here
//! and are rejected at validation time.

use crate::actions::ActionTiming;
use crate::core::{ActorSnapshot, Frame, LevelId};
use crate::rule::{Rule, RuleEvents, ValidationError};
use crate::world::{World, WorldQuery};

/// A rule driven by the render clock instead of physics overlap events.
#[derive(Clone, Debug)]
pub struct GlobalRule {
    /// The wrapped rule. Its stay path is the poll body.
    pub rule: Rule,

    /// The level this rule was authored in.
    pub owning_level: LevelId,

    /// If set, the rule only polls while its owning level is active.
    pub only_when_level_active: bool,
}

impl GlobalRule {
    /// Wrap a rule as poll-driven.
    #[must_use]
    pub fn new(rule: Rule, owning_level: LevelId) -> Self {
        Self {
            rule,
            owning_level,
            only_when_level_active: false,
        }
    }

    /// Only poll while the owning level is active (builder pattern).
    #[must_use]
    pub fn gated_on_owning_level(mut self) -> Self {
        self.only_when_level_active = true;
        self
    }

    /// One render-frame poll.
    ///
    /// Gates: the world must have finished loading, no level transition may
    /// be in progress, and (if configured) the owning level must be active.
    /// When the gates pass, this is exactly the stay handler.
    pub fn poll<W: World>(
        &mut self,
        frame: &Frame,
        actor: &ActorSnapshot,
        world: &mut W,
    ) -> RuleEvents {
        if world.is_loading() || world.transition_in_progress() {
            return RuleEvents::new();
        }
        if self.only_when_level_active && world.active_level() != self.owning_level {
            return RuleEvents::new();
        }
        self.rule.on_stay(frame, actor, world)
    }

    /// Validate the wrapped rule, additionally rejecting enter/exit
    /// timings, which can never fire without overlap events.
    pub fn validate(&self, world: &dyn WorldQuery) -> Vec<ValidationError> {
        let mut errors = self.rule.validate(world);

        for (index, instance) in self.rule.actions.iter().enumerate() {
            if instance.action.timing.intersects(ActionTiming::OVERLAP_ONLY) {
                errors.push(ValidationError::OverlapTimingOnGlobal {
                    rule: self.rule.name.clone(),
                    index,
                });
            }
        }
        errors
    }
}
