//! The external-collaborator seam.
//!
//! The rule engine never touches engine objects directly. Everything it
//! needs from the host (surface queries for conditions, mutations for
//! actions, load/transition status for the global variant) goes through
//! the two traits here. Hosts implement them over the live scene;
//! [`MemoryWorld`] is a complete hash-map-backed implementation used by
//! this crate's own tests.

mod memory;

pub use memory::{Aabb, MemoryWorld};

use glam::Vec3;
use thiserror::Error;

use crate::core::{
    ColliderId, EventHandle, LevelId, ObjectId, PortalRef, PowerTrailId, ScriptId, SurfaceId,
    TargetRef, VisibilityId, VisibilityState, VolumeId,
};

/// Errors surfaced by world mutations.
///
/// A failed mutation is a diagnosable condition, not a crash: dispatch logs
/// it and keeps going with sibling references.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WorldError {
    /// The referenced target does not exist (destroyed or never loaded).
    #[error("unresolved reference: {0}")]
    UnresolvedRef(TargetRef),

    /// A level switch was requested for a level the host does not know.
    #[error("unknown level: {0}")]
    UnknownLevel(LevelId),

    /// The host refused the operation in its current state.
    #[error("operation rejected: {0}")]
    Rejected(String),
}

/// Read-only world queries.
///
/// Used by condition evaluation, configuration validation, and restore.
/// Implementations must be side-effect free.
pub trait WorldQuery {
    /// Closest point on a surface to `from`, or `None` if the surface is gone.
    fn closest_point_on_surface(&self, surface: SurfaceId, from: Vec3) -> Option<Vec3>;

    /// Whether a surface is currently rendered, or `None` if it is gone.
    fn is_surface_visible(&self, surface: SurfaceId) -> Option<bool>;

    /// Whether a point lies inside a volume, or `None` if the volume is gone.
    fn volume_contains(&self, volume: VolumeId, point: Vec3) -> Option<bool>;

    /// The currently active level.
    fn active_level(&self) -> LevelId;

    /// Whether the world is still loading. Global rules do not poll until
    /// loading finishes.
    fn is_loading(&self) -> bool;

    /// Whether a level transition is in progress.
    fn transition_in_progress(&self) -> bool;

    /// Whether a reference resolves to something real right now.
    fn resolves(&self, target: &TargetRef) -> bool;

    /// The recorded default visibility state of an object, or `None` if the
    /// object is gone. Negative visibility actions restore to this.
    fn default_visibility(&self, target: VisibilityId) -> Option<VisibilityState>;
}

/// Mutable world operations, invoked by action dispatch.
///
/// Every method returns `Err` for an unresolvable reference so the
/// dispatcher can log it loudly and move on.
pub trait World: WorldQuery {
    /// Activate or deactivate a scene object.
    fn set_object_active(&mut self, object: ObjectId, active: bool) -> Result<(), WorldError>;

    /// Enable or disable a behavior script.
    fn set_script_enabled(&mut self, script: ScriptId, enabled: bool) -> Result<(), WorldError>;

    /// Enable or disable a collider.
    fn set_collider_enabled(
        &mut self,
        collider: ColliderId,
        enabled: bool,
    ) -> Result<(), WorldError>;

    /// Switch to a level. Callers guard the `LevelId::NONE` sentinel and the
    /// already-active case; the world only sees real switches.
    fn switch_level(&mut self, level: LevelId) -> Result<(), WorldError>;

    /// Set a power trail's on/off state.
    fn set_power(&mut self, trail: PowerTrailId, powered: bool) -> Result<(), WorldError>;

    /// Set a visibility object's state.
    fn set_visibility(
        &mut self,
        target: VisibilityId,
        state: VisibilityState,
    ) -> Result<(), WorldError>;

    /// Trigger the camera flythrough for a level.
    fn play_flythrough(&mut self, level: LevelId) -> Result<(), WorldError>;

    /// Pause or resume rendering of a portal, live or persisted.
    fn set_portal_paused(&mut self, portal: PortalRef, paused: bool) -> Result<(), WorldError>;

    /// Invoke the callbacks bound to an external event handle.
    fn fire_event(&mut self, handle: EventHandle) -> Result<(), WorldError>;
}
