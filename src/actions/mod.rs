//! Actions: timing-gated, forward/negative side effects.
//!
//! ## Key Components
//!
//! - [`ActionTiming`]: bitmask of the timings an action fires on
//! - [`ActionKind`]: the closed set of effects, each with a forward and a
//!   negative path
//! - [`Action`]: authored data (timing + direction gate + kind)
//! - [`ActionInstance`]: an action plus its opaque runtime state
//! - [`DispatchResult`]: per-action outcome; failures never stop siblings
//!
//! ## Forward vs. negative
//!
//! The negative path is not a mechanical inverse. Toggles invert, power
//! toggles complement, visibility restores recorded defaults, and several
//! kinds deliberately no-op backwards. `only_trigger_forward` suppresses
//! the negative path for any kind.

mod action;
mod dispatch;

pub use action::{Action, ActionKind, ActionTiming};
pub use dispatch::{ActionInstance, ActionState, DispatchResult, OwnerRefs, PortalOverrides};
