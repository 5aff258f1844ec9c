//! Condition evaluation: pure scalar predicates over actor state.
//!
//! Every condition produces a signed scalar in [-1, 1]. The rule ANDs
//! `is_triggered` across its conditions for the forward verdict and
//! `is_reverse_triggered` for the backward one; disagreement is the
//! deadband and freezes the state machine.
//!
//! ## Key Components
//!
//! - [`ConditionKind`]: the closed set of measurable quantities
//! - [`Condition`]: kind + threshold + coordinate-space flag
//! - [`ConditionContext`]: frame, actor snapshot, and world queries

mod condition;

pub use condition::{Condition, ConditionContext, ConditionKind, DEFAULT_THRESHOLD};
