//! Identifier newtypes for everything the rule engine references.
//!
//! The engine never owns engine-side objects (renderers, colliders, scripts,
//! portals). It holds opaque ids and asks the [`World`](crate::world::World)
//! seam to act on them. Ids are engine-assigned and stable for the lifetime
//! of a scene.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw id value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

id_type! {
    /// An external object overlapping a trigger volume (usually the player).
    ActorId
}

id_type! {
    /// One sub-shape of a composite trigger volume.
    ShapeId
}

id_type! {
    /// An arbitrary scene object that can be activated/deactivated.
    ObjectId
}

id_type! {
    /// A behavior script that can be enabled/disabled independently of its object.
    ScriptId
}

id_type! {
    /// A physics collider that can be enabled/disabled.
    ColliderId
}

id_type! {
    /// A visual surface: supports closest-point queries and visibility checks.
    SurfaceId
}

id_type! {
    /// A bounded volume supporting point-membership queries (legacy conditions).
    VolumeId
}

id_type! {
    /// A portal whose rendering can be paused/resumed, currently loaded.
    PortalId
}

id_type! {
    /// A power trail carrying a single on/off state.
    PowerTrailId
}

id_type! {
    /// An object participating in the dimension-visibility system.
    VisibilityId
}

id_type! {
    /// A handle to externally-bound callbacks (UI events and the like).
    EventHandle
}

/// Key for a portal known only through persisted save data (not loaded).
///
/// Wider than the live ids: save files key portals by a stable hash of their
/// scene path, which does not fit in a scene-local `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortalSaveKey(pub u64);

impl PortalSaveKey {
    /// Create a new key.
    #[must_use]
    pub const fn new(key: u64) -> Self {
        Self(key)
    }

    /// Get the raw key value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PortalSaveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PortalSaveKey({})", self.0)
    }
}

/// Identifier for a level (scene) the game can switch to.
///
/// `LevelId::NONE` is the sentinel "no transition" value: a change-level
/// action configured with it performs no scene switch in that direction.
/// The default is the first level, not the sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(pub u32);

impl LevelId {
    /// Sentinel: no level / no transition.
    pub const NONE: LevelId = LevelId(u32::MAX);

    /// Create a new level id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check whether this is the "no transition" sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "Level(none)")
        } else {
            write!(f, "Level({})", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = ActorId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "ActorId(7)");
    }

    #[test]
    fn test_level_sentinel() {
        assert!(LevelId::NONE.is_none());
        assert!(!LevelId::new(3).is_none());
        assert_eq!(format!("{}", LevelId::NONE), "Level(none)");
        assert_eq!(format!("{}", LevelId::new(3)), "Level(3)");
    }

    #[test]
    fn test_level_default_is_not_sentinel() {
        assert_eq!(LevelId::default(), LevelId::new(0));
        assert!(!LevelId::default().is_none());
    }

    #[test]
    fn test_id_serialization() {
        let id = PortalSaveKey::new(0xDEAD_BEEF_CAFE);
        let json = serde_json::to_string(&id).unwrap();
        let back: PortalSaveKey = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
