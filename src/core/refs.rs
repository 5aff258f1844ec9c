//! Shared reference types: visibility states, portal references, and the
//! closed set of external target kinds used by validation and restore.

use serde::{Deserialize, Serialize};

use super::ids::{
    ColliderId, EventHandle, LevelId, ObjectId, PortalId, PortalSaveKey, PowerTrailId, ScriptId,
    SurfaceId, VisibilityId, VolumeId,
};

/// Visibility state of a dimension-visibility object.
///
/// Mirrors the four-state model of the visibility system: fully visible,
/// fully invisible, and the two transitional states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VisibilityState {
    /// Not rendered in any dimension.
    Invisible,
    /// Fading in / visible in some dimensions.
    PartiallyVisible,
    /// Fully rendered.
    #[default]
    Visible,
    /// Fading out / invisible in some dimensions.
    PartiallyInvisible,
}

/// Reference to a portal that may or may not be loaded.
///
/// A portal in the active scene is addressed by a live id. A portal known
/// only through save data (its scene not loaded) is addressed by its save
/// key. One dispatch path handles both tags; no runtime type inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalRef {
    /// Portal loaded in the active scene.
    Live(PortalId),
    /// Portal present only as persisted save data.
    Persisted(PortalSaveKey),
}

impl std::fmt::Display for PortalRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortalRef::Live(id) => write!(f, "portal {id}"),
            PortalRef::Persisted(key) => write!(f, "persisted {key}"),
        }
    }
}

/// Every kind of external reference an authored condition or action can hold.
///
/// Validation and restore ask the world a single question per reference:
/// does this resolve? See [`WorldQuery::resolves`](crate::world::WorldQuery::resolves).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    Object(ObjectId),
    Script(ScriptId),
    Collider(ColliderId),
    Surface(SurfaceId),
    Volume(VolumeId),
    Portal(PortalRef),
    PowerTrail(PowerTrailId),
    Visibility(VisibilityId),
    Event(EventHandle),
    Level(LevelId),
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRef::Object(id) => write!(f, "{id}"),
            TargetRef::Script(id) => write!(f, "{id}"),
            TargetRef::Collider(id) => write!(f, "{id}"),
            TargetRef::Surface(id) => write!(f, "{id}"),
            TargetRef::Volume(id) => write!(f, "{id}"),
            TargetRef::Portal(p) => write!(f, "{p}"),
            TargetRef::PowerTrail(id) => write!(f, "{id}"),
            TargetRef::Visibility(id) => write!(f, "{id}"),
            TargetRef::Event(id) => write!(f, "{id}"),
            TargetRef::Level(id) => write!(f, "{id}"),
        }
    }
}
