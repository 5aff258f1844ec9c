//! The trigger rule and its hysteresis state machine.
//!
//! A rule ANDs its conditions into a three-way verdict (forward, backward,
//! deadband) and drives a per-rule state machine across overlap events.
//! The two stay flags give the rule hysteresis: once a direction has fired
//! its one-shot actions, it will not fire them again until the opposite
//! direction takes over or the actor leaves. The deadband between the two
//! verdicts holds state steady, so an actor lingering at a threshold
//! boundary cannot flap the rule.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::actions::{Action, ActionInstance, ActionTiming, DispatchResult, OwnerRefs};
use crate::conditions::{Condition, ConditionContext};
use crate::core::{ActorSnapshot, Frame};
use crate::world::World;

/// Events a rule emits as handlers run. Hosts use these for sounds, UI,
/// and cross-system notifications; the rule itself does not interpret them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleEvent {
    /// Verdict was forward when the actor began overlapping.
    ForwardEnter,
    /// Verdict was backward when the actor began overlapping.
    BackwardEnter,
    /// Forward verdict held for a stay tick.
    ForwardStay,
    /// Backward verdict held for a stay tick.
    BackwardStay,
    /// First forward-satisfied tick of a contiguous run.
    ForwardStayOneTime,
    /// First backward-satisfied tick of a contiguous run.
    BackwardStayOneTime,
    /// The actor stopped overlapping.
    Exit,
}

/// Event buffer returned by rule handlers.
pub type RuleEvents = SmallVec<[RuleEvent; 2]>;

/// The three-way outcome of evaluating all conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Every condition satisfied forward.
    Forward,
    /// Every condition satisfied backward.
    Backward,
    /// Neither: per-condition thresholds disagree. State is held.
    Deadband,
}

/// Per-rule mutable state.
///
/// Invariant: `has_triggered_on_stay` and `has_negative_triggered_on_stay`
/// are never simultaneously true.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleState {
    /// The forward one-shot has fired for the current satisfied run.
    pub has_triggered_on_stay: bool,
    /// The backward one-shot has fired for the current satisfied run.
    pub has_negative_triggered_on_stay: bool,
    /// An actor currently overlaps the rule's volume.
    pub is_occupied: bool,
}

/// Which dispatch direction a timing bucket runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
    /// Exit timing runs both paths per action, forward first.
    Both,
}

/// A trigger rule: conditions ANDed together, actions in authored order,
/// and the hysteresis state machine between them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rule {
    /// Human-readable name (for diagnostics).
    pub name: String,

    /// The rule's own script/object, targets of disable-self actions.
    pub owner: OwnerRefs,

    /// Conditions, ANDed. Order is irrelevant to the verdict but kept for
    /// deterministic diagnostics.
    pub conditions: Vec<Condition>,

    /// Actions, executed in authored order within each timing bucket.
    pub actions: Vec<ActionInstance>,

    pub(super) enabled: bool,
    pub(super) state: RuleState,
    pub(super) pending_reset: bool,
}

impl Rule {
    /// Create an empty, enabled rule.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: OwnerRefs::default(),
            conditions: Vec::new(),
            actions: Vec::new(),
            enabled: true,
            state: RuleState::default(),
            pending_reset: false,
        }
    }

    /// Set the owner references (builder pattern).
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerRefs) -> Self {
        self.owner = owner;
        self
    }

    /// Add a condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an action (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(ActionInstance::new(action));
        self
    }

    /// Current mutable state.
    #[must_use]
    pub fn state(&self) -> &RuleState {
        &self.state
    }

    /// Is the rule enabled?
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Is a deferred reset waiting for the next fixed tick?
    #[must_use]
    pub fn has_pending_reset(&self) -> bool {
        self.pending_reset
    }

    /// Evaluate the three-way verdict for the given inputs.
    ///
    /// A rule with no conditions is always forward-satisfied.
    #[must_use]
    pub fn verdict(&self, ctx: &ConditionContext) -> Verdict {
        if self.conditions.iter().all(|c| c.is_triggered(ctx)) {
            Verdict::Forward
        } else if self.conditions.iter().all(|c| c.is_reverse_triggered(ctx)) {
            Verdict::Backward
        } else {
            Verdict::Deadband
        }
    }

    /// Actor started overlapping the rule's volume.
    ///
    /// Runs `ON_ENTER` actions in the verdict's direction. Does not touch
    /// the stay flags: enter is not part of the hysteresis cycle.
    pub fn on_begin<W: World>(
        &mut self,
        frame: &Frame,
        actor: &ActorSnapshot,
        world: &mut W,
    ) -> RuleEvents {
        let mut events = RuleEvents::new();
        if !self.enabled {
            return events;
        }

        self.state.is_occupied = true;

        let verdict = self.verdict(&ConditionContext::new(frame, actor, &*world));
        match verdict {
            Verdict::Forward => {
                debug!(rule = %self.name, "enter, forward");
                self.run_bucket(ActionTiming::ON_ENTER, Direction::Forward, world);
                events.push(RuleEvent::ForwardEnter);
            }
            Verdict::Backward => {
                debug!(rule = %self.name, "enter, backward");
                self.run_bucket(ActionTiming::ON_ENTER, Direction::Backward, world);
                events.push(RuleEvent::BackwardEnter);
            }
            Verdict::Deadband => {}
        }
        events
    }

    /// Actor continues overlapping; also the poll body of global rules.
    ///
    /// `EVERY_FRAME_ON_STAY` actions run on every satisfied tick;
    /// `ONCE_WHILE_ON_STAY` actions run only on the tick that flips the
    /// direction's stay flag. A deadband tick changes nothing.
    pub fn on_stay<W: World>(
        &mut self,
        frame: &Frame,
        actor: &ActorSnapshot,
        world: &mut W,
    ) -> RuleEvents {
        let mut events = RuleEvents::new();
        if !self.enabled {
            return events;
        }

        let verdict = self.verdict(&ConditionContext::new(frame, actor, &*world));
        match verdict {
            Verdict::Forward => {
                self.run_bucket(ActionTiming::EVERY_FRAME_ON_STAY, Direction::Forward, world);
                events.push(RuleEvent::ForwardStay);

                if !self.state.has_triggered_on_stay {
                    debug!(rule = %self.name, "stay one-shot, forward");
                    self.state.has_triggered_on_stay = true;
                    self.state.has_negative_triggered_on_stay = false;
                    self.run_bucket(ActionTiming::ONCE_WHILE_ON_STAY, Direction::Forward, world);
                    events.push(RuleEvent::ForwardStayOneTime);
                }
            }
            Verdict::Backward => {
                self.run_bucket(
                    ActionTiming::EVERY_FRAME_ON_STAY,
                    Direction::Backward,
                    world,
                );
                events.push(RuleEvent::BackwardStay);

                if !self.state.has_negative_triggered_on_stay {
                    debug!(rule = %self.name, "stay one-shot, backward");
                    self.state.has_negative_triggered_on_stay = true;
                    self.state.has_triggered_on_stay = false;
                    self.run_bucket(
                        ActionTiming::ONCE_WHILE_ON_STAY,
                        Direction::Backward,
                        world,
                    );
                    events.push(RuleEvent::BackwardStayOneTime);
                }
            }
            Verdict::Deadband => {}
        }
        events
    }

    /// Actor stopped overlapping.
    ///
    /// `ON_EXIT` actions run unconditionally, in both directions, ignoring
    /// the current verdict; then both stay flags reset.
    pub fn on_end<W: World>(&mut self, world: &mut W) -> RuleEvents {
        let mut events = RuleEvents::new();
        if !self.enabled {
            return events;
        }

        debug!(rule = %self.name, "exit");
        self.state.is_occupied = false;
        self.run_bucket(ActionTiming::ON_EXIT, Direction::Both, world);
        events.push(RuleEvent::Exit);

        self.state.has_triggered_on_stay = false;
        self.state.has_negative_triggered_on_stay = false;
        events
    }

    /// Disable the rule: synchronous reset of all mutable state, cancels
    /// any pending deferred reset, fires nothing.
    pub fn disable(&mut self) {
        debug!(rule = %self.name, "disabled");
        self.enabled = false;
        self.state = RuleState::default();
        self.pending_reset = false;
    }

    /// Re-enable a disabled rule. State starts from scratch.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Schedule a reset of both stay flags for the next fixed tick.
    ///
    /// Other logic in the current step still sees the flags; the reset
    /// lands at the next step boundary. Disabling the rule first cancels
    /// it.
    pub fn schedule_reset(&mut self) {
        if self.enabled {
            self.pending_reset = true;
        }
    }

    /// Fixed-step boundary. Consumes a pending deferred reset, if any.
    /// Call once per physics tick, before delivering overlap events.
    pub fn fixed_tick(&mut self) {
        if self.pending_reset {
            self.pending_reset = false;
            self.state.has_triggered_on_stay = false;
            self.state.has_negative_triggered_on_stay = false;
            debug!(rule = %self.name, "deferred reset applied");
        }
    }

    fn run_bucket<W: World>(&mut self, timing: ActionTiming, direction: Direction, world: &mut W) {
        let mut disable_self = false;

        for instance in &mut self.actions {
            if !instance.action.timing.intersects(timing) {
                continue;
            }

            let result = match direction {
                Direction::Forward => instance.execute(&self.owner, world),
                Direction::Backward => instance.negative_execute(&self.owner, world),
                Direction::Both => {
                    let forward = instance.execute(&self.owner, world);
                    let negative = instance.negative_execute(&self.owner, world);
                    match (forward, negative) {
                        (f @ DispatchResult::Failed(_), _) => f,
                        (_, n @ DispatchResult::Failed(_)) => n,
                        (f, _) => f,
                    }
                }
            };

            if let DispatchResult::Failed(err) = &result {
                warn!(rule = %self.name, error = %err, "action dispatch failed");
            }

            if instance.action.disables_self()
                && direction != Direction::Backward
                && matches!(result, DispatchResult::Success)
            {
                disable_self = true;
            }
        }

        // Self-disabling actions take effect after their bucket finishes,
        // so siblings in the same bucket still run.
        if disable_self {
            self.disable();
        }
    }
}
