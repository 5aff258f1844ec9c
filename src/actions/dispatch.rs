//! Action dispatch: forward and negative execution.
//!
//! The dispatcher is deliberately forgiving at runtime: an unresolvable
//! reference inside a set is logged and skipped, and a failed action never
//! stops its siblings. Hard guarantees (non-empty timing, resolvable
//! references) belong to validation at configuration time.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{
    ColliderId, LevelId, ObjectId, PortalId, PortalRef, PortalSaveKey, ScriptId, TargetRef,
};
use crate::world::{World, WorldError, WorldQuery};

use super::action::{Action, ActionKind};

/// The rule's own script/object references, targets of the disable-self kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRefs {
    /// The rule's own behavior script.
    pub script: Option<ScriptId>,
    /// The rule's own scene object.
    pub object: Option<ObjectId>,
}

/// Runtime-promoted portal reference sets.
///
/// When a persisted portal's scene loads mid-session, its reference is
/// promoted to a live one. The promoted sets replace the authored ones at
/// dispatch and round-trip through the save payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalOverrides {
    pub pause: Vec<PortalRef>,
    pub resume: Vec<PortalRef>,
}

/// Opaque, instance-specific action state.
///
/// Independent of the authored payload; this is what round-trips through
/// the rule's save record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    /// Has the forward path ever run to completion?
    pub has_fired: bool,

    /// An inert action no-ops in both directions. Set when a restore finds
    /// the action's targets unresolvable.
    pub inert: bool,

    /// Runtime-mutated portal references, if any were promoted.
    pub portal_overrides: Option<PortalOverrides>,
}

/// Outcome of dispatching one action.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchResult {
    /// The action ran.
    Success,
    /// The action was a deliberate no-op (direction gate, sentinel level,
    /// inert instance).
    Skipped,
    /// One or more targets failed; siblings were still attempted.
    Failed(String),
}

/// An authored action paired with its runtime state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionInstance {
    /// The authored action.
    pub action: Action,
    /// Instance-specific runtime state.
    pub state: ActionState,
}

impl ActionInstance {
    /// Wrap an authored action with fresh state.
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            state: ActionState::default(),
        }
    }

    /// Execute the forward effect.
    pub fn execute(&mut self, owner: &OwnerRefs, world: &mut dyn World) -> DispatchResult {
        if self.state.inert {
            return DispatchResult::Skipped;
        }

        let result = match &self.action.kind {
            ActionKind::DisableSelfScript => match owner.script {
                Some(script) => apply_one(world.set_script_enabled(script, false)),
                None => DispatchResult::Failed("rule has no owner script".to_string()),
            },

            ActionKind::DisableSelfObject => match owner.object {
                Some(object) => apply_one(world.set_object_active(object, false)),
                None => DispatchResult::Failed("rule has no owner object".to_string()),
            },

            ActionKind::EnableDisableScripts { enable, disable }
            | ActionKind::ToggleScripts { enable, disable } => {
                apply_scripts(world, enable, disable)
            }

            ActionKind::EnableDisableObjects { enable, disable }
            | ActionKind::ToggleObjects { enable, disable } => {
                apply_objects(world, enable, disable)
            }

            ActionKind::ToggleColliders { enable, disable } => {
                apply_colliders(world, enable, disable)
            }

            ActionKind::ChangeLevel { forward, .. } => change_level(world, *forward),

            ActionKind::PlayFlythrough { level } => apply_one(world.play_flythrough(*level)),

            ActionKind::PowerToggle { trail, powered } => {
                apply_one(world.set_power(*trail, *powered))
            }

            ActionKind::SetVisibilityState { targets, state } => {
                apply_set(targets, |t| world.set_visibility(t, *state))
            }

            ActionKind::TogglePortalRendering { pause, resume } => {
                let (pause, resume) = self.effective_portals(pause, resume);
                apply_portals(world, &pause, &resume)
            }

            ActionKind::FireEvent { handle } => apply_one(world.fire_event(*handle)),
        };

        if matches!(result, DispatchResult::Success) {
            self.state.has_fired = true;
        }
        result
    }

    /// Execute the negative effect.
    ///
    /// A hard no-op when `only_trigger_forward` is set, before any
    /// kind-specific logic.
    pub fn negative_execute(
        &mut self,
        _owner: &OwnerRefs,
        world: &mut dyn World,
    ) -> DispatchResult {
        if self.action.only_trigger_forward || self.state.inert {
            return DispatchResult::Skipped;
        }

        match &self.action.kind {
            // Deliberate no-ops.
            ActionKind::DisableSelfScript
            | ActionKind::DisableSelfObject
            | ActionKind::EnableDisableScripts { .. }
            | ActionKind::EnableDisableObjects { .. }
            | ActionKind::PlayFlythrough { .. }
            | ActionKind::FireEvent { .. } => DispatchResult::Skipped,

            // True inverses: swap the sets.
            ActionKind::ToggleScripts { enable, disable } => {
                apply_scripts(world, disable, enable)
            }

            ActionKind::ToggleObjects { enable, disable } => {
                apply_objects(world, disable, enable)
            }

            ActionKind::ToggleColliders { enable, disable } => {
                apply_colliders(world, disable, enable)
            }

            ActionKind::ChangeLevel { backward, .. } => change_level(world, *backward),

            // Logical complement of the configured value.
            ActionKind::PowerToggle { trail, powered } => {
                apply_one(world.set_power(*trail, !*powered))
            }

            // Each target goes back to its own recorded default.
            ActionKind::SetVisibilityState { targets, .. } => apply_set(targets, |t| {
                let default = world
                    .default_visibility(t)
                    .ok_or(WorldError::UnresolvedRef(TargetRef::Visibility(t)))?;
                world.set_visibility(t, default)
            }),

            ActionKind::TogglePortalRendering { pause, resume } => {
                let (pause, resume) = self.effective_portals(pause, resume);
                apply_portals(world, &resume, &pause)
            }
        }
    }

    /// Promote a persisted portal reference to a live one.
    ///
    /// Called by the host when the portal's scene finishes loading. The
    /// promoted sets become part of this instance's save state.
    pub fn promote_portal(&mut self, key: PortalSaveKey, live: PortalId) {
        let ActionKind::TogglePortalRendering { pause, resume } = &self.action.kind else {
            return;
        };

        let promote = |refs: &[PortalRef]| -> Vec<PortalRef> {
            refs.iter()
                .map(|r| match r {
                    PortalRef::Persisted(k) if *k == key => PortalRef::Live(live),
                    other => *other,
                })
                .collect()
        };

        let current = self
            .state
            .portal_overrides
            .take()
            .unwrap_or_else(|| PortalOverrides {
                pause: pause.clone(),
                resume: resume.clone(),
            });

        self.state.portal_overrides = Some(PortalOverrides {
            pause: promote(&current.pause),
            resume: promote(&current.resume),
        });
    }

    /// Serialize this instance's opaque state.
    pub fn save(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&self.state)
    }

    /// Re-hydrate opaque state onto a reconstructed instance.
    ///
    /// If the action's targets no longer resolve, the instance goes inert
    /// instead of failing the load.
    pub fn restore(&mut self, payload: &[u8], world: &dyn WorldQuery) -> Result<(), bincode::Error> {
        self.state = bincode::deserialize(payload)?;

        if self.action.target_refs().iter().any(|r| !world.resolves(r)) {
            warn!(action = ?self.action.kind, "restored action has unresolvable targets; going inert");
            self.state.inert = true;
        }
        Ok(())
    }

    fn effective_portals(
        &self,
        pause: &[PortalRef],
        resume: &[PortalRef],
    ) -> (Vec<PortalRef>, Vec<PortalRef>) {
        match &self.state.portal_overrides {
            Some(overrides) => (overrides.pause.clone(), overrides.resume.clone()),
            None => (pause.to_vec(), resume.to_vec()),
        }
    }
}

/// Apply a closure to every item, logging and counting failures.
/// Failures never stop the remaining items.
fn apply_set<T: Copy>(
    items: &[T],
    mut apply: impl FnMut(T) -> Result<(), WorldError>,
) -> DispatchResult {
    let mut failures = 0usize;
    for &item in items {
        if let Err(err) = apply(item) {
            warn!(error = %err, "skipping unresolvable dispatch target");
            failures += 1;
        }
    }
    if failures > 0 {
        DispatchResult::Failed(format!("{failures} target(s) failed"))
    } else {
        DispatchResult::Success
    }
}

fn apply_one(result: Result<(), WorldError>) -> DispatchResult {
    match result {
        Ok(()) => DispatchResult::Success,
        Err(err) => {
            warn!(error = %err, "dispatch target failed");
            DispatchResult::Failed(err.to_string())
        }
    }
}

fn apply_scripts(world: &mut dyn World, enable: &[ScriptId], disable: &[ScriptId]) -> DispatchResult {
    merge(
        apply_set(enable, |s| world.set_script_enabled(s, true)),
        apply_set(disable, |s| world.set_script_enabled(s, false)),
    )
}

fn apply_objects(world: &mut dyn World, enable: &[ObjectId], disable: &[ObjectId]) -> DispatchResult {
    merge(
        apply_set(enable, |o| world.set_object_active(o, true)),
        apply_set(disable, |o| world.set_object_active(o, false)),
    )
}

fn apply_colliders(
    world: &mut dyn World,
    enable: &[ColliderId],
    disable: &[ColliderId],
) -> DispatchResult {
    merge(
        apply_set(enable, |c| world.set_collider_enabled(c, true)),
        apply_set(disable, |c| world.set_collider_enabled(c, false)),
    )
}

fn apply_portals(world: &mut dyn World, pause: &[PortalRef], resume: &[PortalRef]) -> DispatchResult {
    merge(
        apply_set(pause, |p| world.set_portal_paused(p, true)),
        apply_set(resume, |p| world.set_portal_paused(p, false)),
    )
}

fn change_level(world: &mut dyn World, level: LevelId) -> DispatchResult {
    if level.is_none() || world.active_level() == level {
        return DispatchResult::Skipped;
    }
    apply_one(world.switch_level(level))
}

fn merge(a: DispatchResult, b: DispatchResult) -> DispatchResult {
    match (a, b) {
        (DispatchResult::Failed(a), DispatchResult::Failed(b)) => {
            DispatchResult::Failed(format!("{a}; {b}"))
        }
        (DispatchResult::Failed(msg), _) | (_, DispatchResult::Failed(msg)) => {
            DispatchResult::Failed(msg)
        }
        _ => DispatchResult::Success,
    }
}
