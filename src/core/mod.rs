//! Core types: identifiers, actor snapshots, frames, shared references.
//!
//! These are the building blocks everything else consumes. The engine host
//! allocates ids; the rule engine treats them as opaque.

pub mod actor;
pub mod ids;
pub mod refs;

pub use actor::{ActorSnapshot, Frame};
pub use ids::{
    ActorId, ColliderId, EventHandle, LevelId, ObjectId, PortalId, PortalSaveKey, PowerTrailId,
    ScriptId, ShapeId, SurfaceId, VisibilityId, VolumeId,
};
pub use refs::{PortalRef, TargetRef, VisibilityState};
