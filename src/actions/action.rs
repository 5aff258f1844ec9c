//! Action definitions.
//!
//! An action pairs a timing mask with one kind from a closed set. Each kind
//! has a forward effect and a negative effect, and the two are asymmetric:
//! many negatives are deliberate no-ops, some are true inverses, some
//! restore recorded defaults. See [`dispatch`](super::dispatch) for the
//! execution matrix.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    ColliderId, EventHandle, LevelId, ObjectId, PortalRef, PowerTrailId, ScriptId, TargetRef,
    VisibilityId, VisibilityState,
};

bitflags! {
    /// When an action fires.
    ///
    /// Authored as a mask; an action may fire on several timings. An empty
    /// mask is a validation error.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ActionTiming: u8 {
        /// Once when the actor starts overlapping, if the verdict holds.
        const ON_ENTER = 1 << 0;
        /// When the actor stops overlapping, regardless of the verdict.
        const ON_EXIT = 1 << 1;
        /// Once per contiguous satisfied run while overlapping.
        const ONCE_WHILE_ON_STAY = 1 << 2;
        /// Every satisfied tick while overlapping.
        const EVERY_FRAME_ON_STAY = 1 << 3;
    }
}

impl ActionTiming {
    /// Timings that only make sense with physics overlap events.
    /// Global (poll-driven) rules reject these at validation time.
    pub const OVERLAP_ONLY: ActionTiming = ActionTiming::ON_ENTER.union(ActionTiming::ON_EXIT);
}

// The bitflags macro does not emit serde impls; the mask persists as its
// raw bits. Unknown bits in saved data are dropped, not an error.
impl Serialize for ActionTiming {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for ActionTiming {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(ActionTiming::from_bits_truncate(bits))
    }
}

/// What an action does.
///
/// The set is closed: dispatch matches exhaustively on both the forward and
/// the negative path, so a new kind cannot compile without defining both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    // === Self ===

    /// Disable the rule's own script. Negative: no-op.
    DisableSelfScript,

    /// Deactivate the rule's own object. Negative: no-op.
    DisableSelfObject,

    // === Enable/disable sets ===

    /// Enable one script set, disable another. Negative: no-op.
    EnableDisableScripts {
        enable: Vec<ScriptId>,
        disable: Vec<ScriptId>,
    },

    /// Activate one object set, deactivate another. Negative: no-op.
    EnableDisableObjects {
        enable: Vec<ObjectId>,
        disable: Vec<ObjectId>,
    },

    // === Toggles (true inverses) ===

    /// Like `EnableDisableScripts`, but the negative swaps the sets.
    ToggleScripts {
        enable: Vec<ScriptId>,
        disable: Vec<ScriptId>,
    },

    /// Like `EnableDisableObjects`, but the negative swaps the sets.
    ToggleObjects {
        enable: Vec<ObjectId>,
        disable: Vec<ObjectId>,
    },

    /// Enable one collider set, disable another; negative swaps the sets.
    ToggleColliders {
        enable: Vec<ColliderId>,
        disable: Vec<ColliderId>,
    },

    // === Level flow ===

    /// Switch levels. Either direction may be `LevelId::NONE`, the
    /// "no transition" sentinel; a switch to the already-active level is
    /// also skipped.
    ChangeLevel {
        forward: LevelId,
        backward: LevelId,
    },

    /// Trigger the camera flythrough for a level. Negative: no-op.
    PlayFlythrough { level: LevelId },

    // === World state ===

    /// Set a power trail's state; negative sets the logical complement.
    PowerToggle {
        trail: PowerTrailId,
        powered: bool,
    },

    /// Set every target to one configured visibility state; negative
    /// restores each target to its own recorded default.
    SetVisibilityState {
        targets: Vec<VisibilityId>,
        state: VisibilityState,
    },

    /// Pause rendering on one portal set, resume on another; negative swaps.
    /// References may be live or persisted-but-unloaded.
    TogglePortalRendering {
        pause: Vec<PortalRef>,
        resume: Vec<PortalRef>,
    },

    /// Invoke externally-bound callbacks. Negative: no-op.
    FireEvent { handle: EventHandle },
}

/// An authored action: timing mask, direction gate, and kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Which timings this action fires on. Must be non-empty.
    pub timing: ActionTiming,

    /// If set, the negative path is a global no-op regardless of kind.
    pub only_trigger_forward: bool,

    /// What the action does.
    pub kind: ActionKind,
}

impl Action {
    /// Create an action.
    #[must_use]
    pub fn new(timing: ActionTiming, kind: ActionKind) -> Self {
        Self {
            timing,
            only_trigger_forward: false,
            kind,
        }
    }

    /// Suppress the negative path entirely (builder pattern).
    #[must_use]
    pub fn forward_only(mut self) -> Self {
        self.only_trigger_forward = true;
        self
    }

    /// External references this action holds, for validation and restore.
    #[must_use]
    pub fn target_refs(&self) -> SmallVec<[TargetRef; 4]> {
        let mut refs = SmallVec::new();
        match &self.kind {
            ActionKind::DisableSelfScript | ActionKind::DisableSelfObject => {}

            ActionKind::EnableDisableScripts { enable, disable }
            | ActionKind::ToggleScripts { enable, disable } => {
                refs.extend(enable.iter().chain(disable).map(|s| TargetRef::Script(*s)));
            }

            ActionKind::EnableDisableObjects { enable, disable }
            | ActionKind::ToggleObjects { enable, disable } => {
                refs.extend(enable.iter().chain(disable).map(|o| TargetRef::Object(*o)));
            }

            ActionKind::ToggleColliders { enable, disable } => {
                refs.extend(enable.iter().chain(disable).map(|c| TargetRef::Collider(*c)));
            }

            ActionKind::ChangeLevel { forward, backward } => {
                for level in [forward, backward] {
                    if !level.is_none() {
                        refs.push(TargetRef::Level(*level));
                    }
                }
            }

            ActionKind::PlayFlythrough { level } => refs.push(TargetRef::Level(*level)),

            ActionKind::PowerToggle { trail, .. } => refs.push(TargetRef::PowerTrail(*trail)),

            ActionKind::SetVisibilityState { targets, .. } => {
                refs.extend(targets.iter().map(|t| TargetRef::Visibility(*t)));
            }

            ActionKind::TogglePortalRendering { pause, resume } => {
                refs.extend(pause.iter().chain(resume).map(|p| TargetRef::Portal(*p)));
            }

            ActionKind::FireEvent { handle } => refs.push(TargetRef::Event(*handle)),
        }
        refs
    }

    /// Whether this kind disables its own rule when executed forward.
    #[must_use]
    pub fn disables_self(&self) -> bool {
        matches!(
            self.kind,
            ActionKind::DisableSelfScript | ActionKind::DisableSelfObject
        )
    }
}
