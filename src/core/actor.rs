//! Actor snapshots and frames of reference.
//!
//! Condition evaluation is pure: it sees one [`ActorSnapshot`] (where the
//! actor is, which way it faces, how it moves) and one [`Frame`] (the trigger
//! object's own transform, for conditions authored in local coordinates).
//! The engine host captures both at evaluation time; the rule engine never
//! reads live transforms.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The trigger object's own transform: frame of reference for conditions
/// with `use_local_coordinates` set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// World-space position of the trigger object.
    pub position: Vec3,
    /// World-space rotation of the trigger object.
    pub rotation: Quat,
}

impl Frame {
    /// The identity frame: local coordinates equal world coordinates.
    pub const IDENTITY: Frame = Frame {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a frame from position and rotation.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Transform a local-space direction into world space.
    ///
    /// Directions rotate but do not translate.
    #[must_use]
    pub fn direction_to_world(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Transform a local-space point into world space.
    #[must_use]
    pub fn point_to_world(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Snapshot of the actor (player) at evaluation time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// World-space position.
    pub position: Vec3,
    /// World-space facing direction. Expected unit length.
    pub forward: Vec3,
    /// World-space velocity. May be zero.
    pub velocity: Vec3,
    /// Uniform scale. Only the legacy scale-in-range condition reads this.
    pub scale: f32,
}

impl ActorSnapshot {
    /// Create a snapshot with unit scale and zero velocity.
    #[must_use]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            velocity: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Set the velocity (builder pattern).
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the scale (builder pattern).
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_frame() {
        let frame = Frame::IDENTITY;
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(frame.direction_to_world(v), v);
        assert_eq!(frame.point_to_world(v), v);
    }

    #[test]
    fn test_frame_rotates_directions_without_translating() {
        // Quarter turn about Y: +Z becomes +X.
        let frame = Frame::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );

        let world_dir = frame.direction_to_world(Vec3::Z);
        assert!((world_dir - Vec3::X).length() < 1e-5);

        let world_point = frame.point_to_world(Vec3::Z);
        assert!((world_point - Vec3::new(11.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_snapshot_builder() {
        let actor = ActorSnapshot::new(Vec3::ZERO, Vec3::Z)
            .with_velocity(Vec3::X)
            .with_scale(2.0);
        assert_eq!(actor.velocity, Vec3::X);
        assert_eq!(actor.scale, 2.0);
    }
}
