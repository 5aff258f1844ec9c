//! Composite trigger volumes: per-frame event de-duplication.
//!
//! A trigger volume built from several sub-shapes produces one raw physics
//! notification per sub-shape per external object. The aggregator sits in
//! front of the rule and collapses those to exactly one begin/stay/end per
//! external object per frame. The dedup tables are cleared once, at the
//! end of the frame, after all physics callbacks for the tick have run.

use rustc_hash::FxHashSet;

use crate::core::{ActorId, ShapeId};

/// Which overlap notification a sub-shape reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlapKind {
    /// The object started overlapping this sub-shape.
    Begin,
    /// The object continues overlapping this sub-shape.
    Stay,
    /// The object stopped overlapping this sub-shape.
    End,
}

/// Per-frame de-duplication layer in front of one rule.
#[derive(Clone, Debug, Default)]
pub struct CompositeAggregator {
    shapes: FxHashSet<ShapeId>,
    begun: FxHashSet<ActorId>,
    stayed: FxHashSet<ActorId>,
    ended: FxHashSet<ActorId>,
}

impl CompositeAggregator {
    /// Create an aggregator over a set of sub-shapes.
    #[must_use]
    pub fn new(shapes: impl IntoIterator<Item = ShapeId>) -> Self {
        Self {
            shapes: shapes.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Add a sub-shape.
    pub fn add_shape(&mut self, shape: ShapeId) {
        self.shapes.insert(shape);
    }

    /// Does this aggregator own the given sub-shape?
    #[must_use]
    pub fn covers(&self, shape: ShapeId) -> bool {
        self.shapes.contains(&shape)
    }

    /// Filter one raw sub-shape notification.
    ///
    /// Returns `true` exactly once per (kind, external object) per frame.
    /// Duplicates from other sub-shapes, and notifications for shapes this
    /// aggregator does not own, return `false` and must not reach the rule.
    pub fn admit(&mut self, shape: ShapeId, kind: OverlapKind, external: ActorId) -> bool {
        if !self.shapes.contains(&shape) {
            return false;
        }
        let seen = match kind {
            OverlapKind::Begin => &mut self.begun,
            OverlapKind::Stay => &mut self.stayed,
            OverlapKind::End => &mut self.ended,
        };
        seen.insert(external)
    }

    /// Clear all three dedup tables. Call once per frame, after the tick's
    /// physics callbacks have all run.
    pub fn end_frame(&mut self) {
        self.begun.clear();
        self.stayed.clear();
        self.ended.clear();
    }
}
