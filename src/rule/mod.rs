//! The trigger rule: conditions, actions, and the hysteresis state machine.
//!
//! ## Key Components
//!
//! - [`Rule`]: authored conditions + actions + per-rule mutable state
//! - [`RuleState`]: the two stay flags and occupancy
//! - [`RuleEvent`]: notifications handlers emit as they run
//! - [`ValidationError`]: configuration-time checks
//! - [`RuleSave`]: the persistence record (flags + opaque action payloads)
//!
//! ## State machine
//!
//! Three states, derived from the two flags: neutral, triggered-forward,
//! triggered-backward. Transitions happen only in the stay handler; begin
//! and end force occupancy and resets but never flip a stay flag directly.
//! The deadband (per-condition thresholds disagreeing) freezes everything.

mod rule;
mod save;
mod validate;

pub use rule::{Rule, RuleEvent, RuleEvents, RuleState, Verdict};
pub use save::{RuleSave, SaveError};
pub use validate::ValidationError;
