//! In-memory world implementation.
//!
//! A complete, hash-map-backed [`World`] used by this crate's tests and as a
//! reference for hosts writing their own adapter. Surfaces and volumes are
//! axis-aligned boxes, which is enough to exercise every condition kind.

use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{
    ColliderId, EventHandle, LevelId, ObjectId, PortalId, PortalRef, PortalSaveKey, PowerTrailId,
    ScriptId, SurfaceId, TargetRef, VisibilityId, VisibilityState, VolumeId,
};

use super::{World, WorldError, WorldQuery};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from opposite corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from center and half-extents.
    #[must_use]
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Closest point inside or on the box to `from`.
    #[must_use]
    pub fn closest_point(&self, from: Vec3) -> Vec3 {
        from.clamp(self.min, self.max)
    }

    /// Whether a point lies inside the box (inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[derive(Clone, Copy, Debug)]
struct Surface {
    bounds: Aabb,
    visible: bool,
}

#[derive(Clone, Copy, Debug)]
struct Visibility {
    current: VisibilityState,
    default: VisibilityState,
}

/// Hash-map-backed world.
///
/// Populate with the `add_*` methods, then hand `&mut` to rule handlers.
/// Mutation history that matters for assertions (level switches, flythroughs,
/// event fire counts) is recorded.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorld {
    objects: FxHashMap<ObjectId, bool>,
    scripts: FxHashMap<ScriptId, bool>,
    colliders: FxHashMap<ColliderId, bool>,
    surfaces: FxHashMap<SurfaceId, Surface>,
    volumes: FxHashMap<VolumeId, Aabb>,
    portals: FxHashMap<PortalId, bool>,
    persisted_portals: FxHashMap<PortalSaveKey, bool>,
    power_trails: FxHashMap<PowerTrailId, bool>,
    visibility: FxHashMap<VisibilityId, Visibility>,
    events: FxHashMap<EventHandle, u32>,
    levels: Vec<LevelId>,
    active_level: LevelId,
    loading: bool,
    transition_in_progress: bool,
    level_switches: Vec<LevelId>,
    flythroughs: Vec<LevelId>,
}

impl MemoryWorld {
    /// Create an empty world with one active level.
    #[must_use]
    pub fn new(active_level: LevelId) -> Self {
        Self {
            active_level,
            levels: vec![active_level],
            ..Self::default()
        }
    }

    // === Population ===

    /// Register a level.
    pub fn add_level(&mut self, level: LevelId) {
        if !self.levels.contains(&level) {
            self.levels.push(level);
        }
    }

    /// Add an object with an initial active state.
    pub fn add_object(&mut self, object: ObjectId, active: bool) {
        self.objects.insert(object, active);
    }

    /// Add a script with an initial enabled state.
    pub fn add_script(&mut self, script: ScriptId, enabled: bool) {
        self.scripts.insert(script, enabled);
    }

    /// Add a collider with an initial enabled state.
    pub fn add_collider(&mut self, collider: ColliderId, enabled: bool) {
        self.colliders.insert(collider, enabled);
    }

    /// Add a surface with bounds and an initial visibility.
    pub fn add_surface(&mut self, surface: SurfaceId, bounds: Aabb, visible: bool) {
        self.surfaces.insert(surface, Surface { bounds, visible });
    }

    /// Add a volume.
    pub fn add_volume(&mut self, volume: VolumeId, bounds: Aabb) {
        self.volumes.insert(volume, bounds);
    }

    /// Add a live portal (initially rendering).
    pub fn add_portal(&mut self, portal: PortalId) {
        self.portals.insert(portal, false);
    }

    /// Add persisted portal state for an unloaded portal.
    pub fn add_persisted_portal(&mut self, key: PortalSaveKey) {
        self.persisted_portals.insert(key, false);
    }

    /// Add a power trail with an initial powered state.
    pub fn add_power_trail(&mut self, trail: PowerTrailId, powered: bool) {
        self.power_trails.insert(trail, powered);
    }

    /// Add a visibility object; its current state starts at its default.
    pub fn add_visibility(&mut self, target: VisibilityId, default: VisibilityState) {
        self.visibility.insert(
            target,
            Visibility {
                current: default,
                default,
            },
        );
    }

    /// Bind an external event handle.
    pub fn add_event(&mut self, handle: EventHandle) {
        self.events.insert(handle, 0);
    }

    // === Host-side state ===

    /// Set the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Set the level-transition flag.
    pub fn set_transition_in_progress(&mut self, in_progress: bool) {
        self.transition_in_progress = in_progress;
    }

    /// Remove an object, leaving references to it dangling.
    pub fn destroy_object(&mut self, object: ObjectId) {
        self.objects.remove(&object);
    }

    /// Remove a script, leaving references to it dangling.
    pub fn destroy_script(&mut self, script: ScriptId) {
        self.scripts.remove(&script);
    }

    /// Change a surface's visibility.
    pub fn set_surface_visible(&mut self, surface: SurfaceId, visible: bool) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.visible = visible;
        }
    }

    // === Inspection ===

    /// Is an object active?
    #[must_use]
    pub fn object_active(&self, object: ObjectId) -> Option<bool> {
        self.objects.get(&object).copied()
    }

    /// Is a script enabled?
    #[must_use]
    pub fn script_enabled(&self, script: ScriptId) -> Option<bool> {
        self.scripts.get(&script).copied()
    }

    /// Is a collider enabled?
    #[must_use]
    pub fn collider_enabled(&self, collider: ColliderId) -> Option<bool> {
        self.colliders.get(&collider).copied()
    }

    /// Is a portal's rendering paused?
    #[must_use]
    pub fn portal_paused(&self, portal: PortalRef) -> Option<bool> {
        match portal {
            PortalRef::Live(id) => self.portals.get(&id).copied(),
            PortalRef::Persisted(key) => self.persisted_portals.get(&key).copied(),
        }
    }

    /// Is a power trail powered?
    #[must_use]
    pub fn powered(&self, trail: PowerTrailId) -> Option<bool> {
        self.power_trails.get(&trail).copied()
    }

    /// Current visibility state of an object.
    #[must_use]
    pub fn visibility(&self, target: VisibilityId) -> Option<VisibilityState> {
        self.visibility.get(&target).map(|v| v.current)
    }

    /// How many times an event handle has fired.
    #[must_use]
    pub fn event_count(&self, handle: EventHandle) -> u32 {
        self.events.get(&handle).copied().unwrap_or(0)
    }

    /// Every level switch performed, in order.
    #[must_use]
    pub fn level_switches(&self) -> &[LevelId] {
        &self.level_switches
    }

    /// Every flythrough played, in order.
    #[must_use]
    pub fn flythroughs(&self) -> &[LevelId] {
        &self.flythroughs
    }
}

impl WorldQuery for MemoryWorld {
    fn closest_point_on_surface(&self, surface: SurfaceId, from: Vec3) -> Option<Vec3> {
        self.surfaces.get(&surface).map(|s| s.bounds.closest_point(from))
    }

    fn is_surface_visible(&self, surface: SurfaceId) -> Option<bool> {
        self.surfaces.get(&surface).map(|s| s.visible)
    }

    fn volume_contains(&self, volume: VolumeId, point: Vec3) -> Option<bool> {
        self.volumes.get(&volume).map(|v| v.contains(point))
    }

    fn active_level(&self) -> LevelId {
        self.active_level
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn transition_in_progress(&self) -> bool {
        self.transition_in_progress
    }

    fn resolves(&self, target: &TargetRef) -> bool {
        match target {
            TargetRef::Object(id) => self.objects.contains_key(id),
            TargetRef::Script(id) => self.scripts.contains_key(id),
            TargetRef::Collider(id) => self.colliders.contains_key(id),
            TargetRef::Surface(id) => self.surfaces.contains_key(id),
            TargetRef::Volume(id) => self.volumes.contains_key(id),
            TargetRef::Portal(PortalRef::Live(id)) => self.portals.contains_key(id),
            TargetRef::Portal(PortalRef::Persisted(key)) => {
                self.persisted_portals.contains_key(key)
            }
            TargetRef::PowerTrail(id) => self.power_trails.contains_key(id),
            TargetRef::Visibility(id) => self.visibility.contains_key(id),
            TargetRef::Event(id) => self.events.contains_key(id),
            TargetRef::Level(id) => self.levels.contains(id),
        }
    }

    fn default_visibility(&self, target: VisibilityId) -> Option<VisibilityState> {
        self.visibility.get(&target).map(|v| v.default)
    }
}

impl World for MemoryWorld {
    fn set_object_active(&mut self, object: ObjectId, active: bool) -> Result<(), WorldError> {
        match self.objects.get_mut(&object) {
            Some(state) => {
                *state = active;
                Ok(())
            }
            None => Err(WorldError::UnresolvedRef(TargetRef::Object(object))),
        }
    }

    fn set_script_enabled(&mut self, script: ScriptId, enabled: bool) -> Result<(), WorldError> {
        match self.scripts.get_mut(&script) {
            Some(state) => {
                *state = enabled;
                Ok(())
            }
            None => Err(WorldError::UnresolvedRef(TargetRef::Script(script))),
        }
    }

    fn set_collider_enabled(
        &mut self,
        collider: ColliderId,
        enabled: bool,
    ) -> Result<(), WorldError> {
        match self.colliders.get_mut(&collider) {
            Some(state) => {
                *state = enabled;
                Ok(())
            }
            None => Err(WorldError::UnresolvedRef(TargetRef::Collider(collider))),
        }
    }

    fn switch_level(&mut self, level: LevelId) -> Result<(), WorldError> {
        if !self.levels.contains(&level) {
            return Err(WorldError::UnknownLevel(level));
        }
        self.active_level = level;
        self.level_switches.push(level);
        Ok(())
    }

    fn set_power(&mut self, trail: PowerTrailId, powered: bool) -> Result<(), WorldError> {
        match self.power_trails.get_mut(&trail) {
            Some(state) => {
                *state = powered;
                Ok(())
            }
            None => Err(WorldError::UnresolvedRef(TargetRef::PowerTrail(trail))),
        }
    }

    fn set_visibility(
        &mut self,
        target: VisibilityId,
        state: VisibilityState,
    ) -> Result<(), WorldError> {
        match self.visibility.get_mut(&target) {
            Some(v) => {
                v.current = state;
                Ok(())
            }
            None => Err(WorldError::UnresolvedRef(TargetRef::Visibility(target))),
        }
    }

    fn play_flythrough(&mut self, level: LevelId) -> Result<(), WorldError> {
        if !self.levels.contains(&level) {
            return Err(WorldError::UnknownLevel(level));
        }
        self.flythroughs.push(level);
        Ok(())
    }

    fn set_portal_paused(&mut self, portal: PortalRef, paused: bool) -> Result<(), WorldError> {
        let slot = match portal {
            PortalRef::Live(id) => self.portals.get_mut(&id),
            PortalRef::Persisted(key) => self.persisted_portals.get_mut(&key),
        };
        match slot {
            Some(state) => {
                *state = paused;
                Ok(())
            }
            None => Err(WorldError::UnresolvedRef(TargetRef::Portal(portal))),
        }
    }

    fn fire_event(&mut self, handle: EventHandle) -> Result<(), WorldError> {
        match self.events.get_mut(&handle) {
            Some(count) => {
                *count += 1;
                Ok(())
            }
            None => Err(WorldError::UnresolvedRef(TargetRef::Event(handle))),
        }
    }
}
