//! # spatial-triggers
//!
//! A declarative trigger rule engine for first-person games: signed scalar
//! conditions ANDed into a pass/fail/deadband verdict, a per-rule hysteresis
//! state machine over discrete overlap events, and timing-gated actions with
//! distinct forward and negative semantics.
//!
//! ## Design Principles
//!
//! 1. **Engine-agnostic**: physics, rendering, and scene management live
//!    behind the [`World`] trait seam. The engine holds opaque ids only.
//!
//! 2. **Closed sums**: conditions and actions are tagged unions with
//!    exhaustive matches. A new kind cannot compile without defining its
//!    scalar (conditions) or both dispatch paths (actions).
//!
//! 3. **Loud, non-fatal errors**: malformed authoring fails validation at
//!    load; a dangling reference at dispatch is logged and skipped, never a
//!    crash, and never stops sibling actions.
//!
//! ## Architecture
//!
//! - **Deadband hysteresis**: per-condition thresholds split each scalar
//!   into forward / deadband / backward. Only a unanimous verdict moves the
//!   state machine, so an actor lingering at a boundary cannot flap it.
//!
//! - **Two clocks**: a fixed physics step drives begin/stay/end and the
//!   composite dedup window; the render clock drives poll-based rules and
//!   the deferred-reset suspension point.
//!
//! ## Modules
//!
//! - `core`: ids, frames, actor snapshots, shared reference types
//! - `conditions`: pure scalar predicates over actor state
//! - `actions`: timing-gated forward/negative effects and dispatch
//! - `rule`: the hysteresis state machine, validation, save/restore
//! - `composite`: per-frame dedup for multi-shape trigger volumes
//! - `global`: poll-driven rules (no trigger volume)
//! - `world`: the external-collaborator seam + in-memory implementation

pub mod actions;
pub mod composite;
pub mod conditions;
pub mod core;
pub mod global;
pub mod rule;
pub mod world;

// Re-export commonly used types
pub use crate::core::{
    ActorId, ActorSnapshot, ColliderId, EventHandle, Frame, LevelId, ObjectId, PortalId,
    PortalRef, PortalSaveKey, PowerTrailId, ScriptId, ShapeId, SurfaceId, TargetRef,
    VisibilityId, VisibilityState, VolumeId,
};

pub use crate::conditions::{Condition, ConditionContext, ConditionKind, DEFAULT_THRESHOLD};

pub use crate::actions::{
    Action, ActionInstance, ActionKind, ActionState, ActionTiming, DispatchResult, OwnerRefs,
    PortalOverrides,
};

pub use crate::rule::{
    Rule, RuleEvent, RuleEvents, RuleSave, RuleState, SaveError, ValidationError, Verdict,
};

pub use crate::composite::{CompositeAggregator, OverlapKind};

pub use crate::global::GlobalRule;

pub use crate::world::{Aabb, MemoryWorld, World, WorldError, WorldQuery};
