//! Trigger conditions.
//!
//! A condition maps one actor snapshot to a signed scalar in [-1, 1].
//! Positive values past the threshold satisfy the forward direction,
//! negative values past `-threshold` the backward direction, and the band
//! in between is the deadband: neither verdict holds and the rule's state
//! machine stays put.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ActorSnapshot, Frame, LevelId, SurfaceId, TargetRef, VolumeId};
use crate::world::WorldQuery;

/// Default threshold: effectively "same sign as the scalar".
pub const DEFAULT_THRESHOLD: f32 = 0.01;

/// What a condition measures.
///
/// The set is closed: `evaluate` matches exhaustively, so a new kind cannot
/// compile without defining its scalar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConditionKind {
    // === Facing ===

    /// Alignment of the actor's forward vector with a fixed direction.
    FacingDirection { direction: Vec3 },

    /// Alignment of the actor's forward vector with the direction to the
    /// closest point on a surface.
    FacingObject { target: SurfaceId },

    /// Negation of [`ConditionKind::FacingObject`].
    FacingAwayFromObject { target: SurfaceId },

    /// Alignment of the actor's forward vector with the direction to a point.
    FacingPosition { position: Vec3 },

    /// Negation of [`ConditionKind::FacingPosition`].
    FacingAwayFromPosition { position: Vec3 },

    // === Motion ===

    /// Alignment of the actor's velocity with a fixed direction.
    MovingDirection { direction: Vec3 },

    // === Placement ===

    /// Alignment of a fixed direction with the direction from a point to
    /// the actor.
    DirectionFromPoint { direction: Vec3, point: Vec3 },

    // === Boolean queries (endpoint-valued) ===

    /// +1 when the surface is rendered, -1 when it is not.
    RendererVisible { target: SurfaceId },

    /// +1 when the surface is not rendered, -1 when it is.
    RendererNotVisible { target: SurfaceId },

    /// +1 when the active level is in the set, -1 otherwise.
    LevelsActive { levels: Vec<LevelId> },

    // === Legacy ===

    /// +1 when the actor's scale is within [min, max], -1 otherwise.
    ScaleInRange { min: f32, max: f32 },

    /// +1 when the actor is inside the volume, 0 otherwise.
    ///
    /// Returns 0, not -1: this kind can never reverse-trigger. Kept exactly
    /// as the original behaved.
    InsideVolume { volume: VolumeId },

    /// +1 when the actor is outside the volume, 0 otherwise. Same
    /// forward-only asymmetry as [`ConditionKind::InsideVolume`].
    OutsideVolume { volume: VolumeId },
}

/// A condition with its threshold and coordinate-space flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// What to measure.
    pub kind: ConditionKind,

    /// Satisfaction threshold, in [-1, 1].
    pub threshold: f32,

    /// If set, direction/point payloads are in the rule's local frame and
    /// are transformed to world space before evaluation.
    pub use_local_coordinates: bool,
}

/// Inputs to condition evaluation.
///
/// Everything `evaluate` may read: the rule's frame, the actor snapshot,
/// and the read-only world seam for surface/volume/level queries.
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    /// The rule's own transform.
    pub frame: &'a Frame,
    /// The actor at evaluation time.
    pub actor: &'a ActorSnapshot,
    /// Read-only world queries.
    pub world: &'a dyn WorldQuery,
}

impl<'a> ConditionContext<'a> {
    /// Create a new context.
    pub fn new(frame: &'a Frame, actor: &'a ActorSnapshot, world: &'a dyn WorldQuery) -> Self {
        Self { frame, actor, world }
    }
}

impl Condition {
    /// Create a condition with the default threshold, in world coordinates.
    #[must_use]
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            threshold: DEFAULT_THRESHOLD,
            use_local_coordinates: false,
        }
    }

    /// Set the threshold (builder pattern).
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Interpret direction/point payloads in the rule's local frame
    /// (builder pattern).
    #[must_use]
    pub fn in_local_space(mut self) -> Self {
        self.use_local_coordinates = true;
        self
    }

    /// Facing a fixed direction.
    #[must_use]
    pub fn facing_direction(direction: Vec3) -> Self {
        Self::new(ConditionKind::FacingDirection { direction })
    }

    /// Facing toward a surface.
    #[must_use]
    pub fn facing_object(target: SurfaceId) -> Self {
        Self::new(ConditionKind::FacingObject { target })
    }

    /// Moving along a fixed direction.
    #[must_use]
    pub fn moving_direction(direction: Vec3) -> Self {
        Self::new(ConditionKind::MovingDirection { direction })
    }

    /// Active level in a set.
    #[must_use]
    pub fn levels_active(levels: impl IntoIterator<Item = LevelId>) -> Self {
        Self::new(ConditionKind::LevelsActive {
            levels: levels.into_iter().collect(),
        })
    }

    /// Evaluate the scalar in [-1, 1].
    ///
    /// Pure: no side effects, no hidden state. Unresolvable references
    /// evaluate to 0.0, which sits inside the deadband for any positive
    /// threshold; validation reports them at configuration time.
    #[must_use]
    pub fn evaluate(&self, ctx: &ConditionContext) -> f32 {
        let actor = ctx.actor;
        match &self.kind {
            ConditionKind::FacingDirection { direction } => {
                let dir = self.to_world_dir(ctx.frame, *direction);
                actor.forward.dot(dir.normalize_or_zero())
            }

            ConditionKind::FacingObject { target } => {
                self.facing_surface_scalar(ctx, *target, 1.0)
            }

            ConditionKind::FacingAwayFromObject { target } => {
                self.facing_surface_scalar(ctx, *target, -1.0)
            }

            ConditionKind::FacingPosition { position } => {
                let point = self.to_world_point(ctx.frame, *position);
                actor.forward.dot((point - actor.position).normalize_or_zero())
            }

            ConditionKind::FacingAwayFromPosition { position } => {
                let point = self.to_world_point(ctx.frame, *position);
                -actor.forward.dot((point - actor.position).normalize_or_zero())
            }

            ConditionKind::MovingDirection { direction } => {
                let dir = self.to_world_dir(ctx.frame, *direction);
                actor
                    .velocity
                    .normalize_or_zero()
                    .dot(dir.normalize_or_zero())
            }

            ConditionKind::DirectionFromPoint { direction, point } => {
                let dir = self.to_world_dir(ctx.frame, *direction);
                let point = self.to_world_point(ctx.frame, *point);
                dir.normalize_or_zero()
                    .dot((actor.position - point).normalize_or_zero())
            }

            ConditionKind::RendererVisible { target } => {
                match ctx.world.is_surface_visible(*target) {
                    Some(true) => 1.0,
                    Some(false) => -1.0,
                    None => 0.0,
                }
            }

            ConditionKind::RendererNotVisible { target } => {
                match ctx.world.is_surface_visible(*target) {
                    Some(true) => -1.0,
                    Some(false) => 1.0,
                    None => 0.0,
                }
            }

            ConditionKind::LevelsActive { levels } => {
                if levels.contains(&ctx.world.active_level()) {
                    1.0
                } else {
                    -1.0
                }
            }

            ConditionKind::ScaleInRange { min, max } => {
                if actor.scale >= *min && actor.scale <= *max {
                    1.0
                } else {
                    -1.0
                }
            }

            // Legacy asymmetry: 0 on the miss side, never -1.
            ConditionKind::InsideVolume { volume } => {
                match ctx.world.volume_contains(*volume, actor.position) {
                    Some(true) => 1.0,
                    _ => 0.0,
                }
            }

            ConditionKind::OutsideVolume { volume } => {
                match ctx.world.volume_contains(*volume, actor.position) {
                    Some(false) => 1.0,
                    _ => 0.0,
                }
            }
        }
    }

    /// Is the forward direction satisfied?
    #[must_use]
    pub fn is_triggered(&self, ctx: &ConditionContext) -> bool {
        self.evaluate(ctx) > self.threshold
    }

    /// Is the backward direction satisfied?
    #[must_use]
    pub fn is_reverse_triggered(&self, ctx: &ConditionContext) -> bool {
        self.evaluate(ctx) < -self.threshold
    }

    /// External references this condition holds, for validation.
    #[must_use]
    pub fn target_refs(&self) -> SmallVec<[TargetRef; 2]> {
        let mut refs = SmallVec::new();
        match &self.kind {
            ConditionKind::FacingObject { target }
            | ConditionKind::FacingAwayFromObject { target }
            | ConditionKind::RendererVisible { target }
            | ConditionKind::RendererNotVisible { target } => {
                refs.push(TargetRef::Surface(*target));
            }
            ConditionKind::InsideVolume { volume } | ConditionKind::OutsideVolume { volume } => {
                refs.push(TargetRef::Volume(*volume));
            }
            ConditionKind::LevelsActive { levels } => {
                refs.extend(
                    levels
                        .iter()
                        .filter(|l| !l.is_none())
                        .map(|l| TargetRef::Level(*l)),
                );
            }
            _ => {}
        }
        refs
    }

    fn to_world_dir(&self, frame: &Frame, direction: Vec3) -> Vec3 {
        if self.use_local_coordinates {
            frame.direction_to_world(direction)
        } else {
            direction
        }
    }

    fn to_world_point(&self, frame: &Frame, point: Vec3) -> Vec3 {
        if self.use_local_coordinates {
            frame.point_to_world(point)
        } else {
            point
        }
    }

    fn facing_surface_scalar(&self, ctx: &ConditionContext, target: SurfaceId, sign: f32) -> f32 {
        match ctx.world.closest_point_on_surface(target, ctx.actor.position) {
            Some(point) => {
                let to_surface = (point - ctx.actor.position).normalize_or_zero();
                sign * ctx.actor.forward.dot(to_surface)
            }
            None => 0.0,
        }
    }
}
