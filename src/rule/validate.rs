//! Configuration-time validation.
//!
//! Malformed authored data (empty timing masks, dangling references) is
//! caught here, once, when a scene loads, not at dispatch time in the
//! frame loop. Errors are diagnosable warnings; nothing panics.

use thiserror::Error;
use tracing::warn;

use crate::actions::ActionKind;
use crate::conditions::ConditionKind;
use crate::core::TargetRef;
use crate::world::WorldQuery;

use super::rule::Rule;

/// A problem with authored rule data.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    /// An action's timing mask is empty: it could never fire.
    #[error("rule '{rule}': action {index} has an empty timing mask")]
    EmptyTiming { rule: String, index: usize },

    /// An action references something that does not exist.
    #[error("rule '{rule}': action {index} holds dangling reference {target}")]
    DanglingActionRef {
        rule: String,
        index: usize,
        target: TargetRef,
    },

    /// A condition references something that does not exist.
    #[error("rule '{rule}': condition {index} holds dangling reference {target}")]
    DanglingConditionRef {
        rule: String,
        index: usize,
        target: TargetRef,
    },

    /// A global (poll-driven) rule authored an overlap-only timing.
    #[error("rule '{rule}': action {index} uses an enter/exit timing on a poll-driven rule")]
    OverlapTimingOnGlobal { rule: String, index: usize },

    /// A disable-self action on a rule with no matching owner reference.
    /// It would fail at dispatch on every fire.
    #[error("rule '{rule}': action {index} disables self but the rule has no owner reference")]
    MissingOwnerRef { rule: String, index: usize },

    /// A levels-active condition lists the "no level" sentinel, which can
    /// never be the active level.
    #[error("rule '{rule}': condition {index} lists the sentinel level in its active set")]
    SentinelLevelInSet { rule: String, index: usize },
}

impl Rule {
    /// Validate authored data against the current world.
    ///
    /// Returns every problem found (empty means valid). Each problem is
    /// also logged, so misconfigured scenes are loud even when the caller
    /// drops the list.
    pub fn validate(&self, world: &dyn WorldQuery) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (index, condition) in self.conditions.iter().enumerate() {
            if let ConditionKind::LevelsActive { levels } = &condition.kind {
                if levels.iter().any(|l| l.is_none()) {
                    errors.push(ValidationError::SentinelLevelInSet {
                        rule: self.name.clone(),
                        index,
                    });
                }
            }
            for target in condition.target_refs() {
                if !world.resolves(&target) {
                    errors.push(ValidationError::DanglingConditionRef {
                        rule: self.name.clone(),
                        index,
                        target,
                    });
                }
            }
        }

        for (index, instance) in self.actions.iter().enumerate() {
            if instance.action.timing.is_empty() {
                errors.push(ValidationError::EmptyTiming {
                    rule: self.name.clone(),
                    index,
                });
            }

            // Disable-self kinds target the owner, which never appears in
            // `target_refs`; check it here.
            let owner_target = match &instance.action.kind {
                ActionKind::DisableSelfScript => Some(self.owner.script.map(TargetRef::Script)),
                ActionKind::DisableSelfObject => Some(self.owner.object.map(TargetRef::Object)),
                _ => None,
            };
            match owner_target {
                Some(None) => errors.push(ValidationError::MissingOwnerRef {
                    rule: self.name.clone(),
                    index,
                }),
                Some(Some(target)) if !world.resolves(&target) => {
                    errors.push(ValidationError::DanglingActionRef {
                        rule: self.name.clone(),
                        index,
                        target,
                    });
                }
                _ => {}
            }

            for target in instance.action.target_refs() {
                if !world.resolves(&target) {
                    errors.push(ValidationError::DanglingActionRef {
                        rule: self.name.clone(),
                        index,
                        target,
                    });
                }
            }
        }

        for error in &errors {
            warn!(%error, "rule validation");
        }
        errors
    }
}
