use bevy::prelude::*;
use rand::Rng;

use crate::engine::point_cloud::PointCloud;

/// The point the player currently has to touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub index: usize,
    /// Position in model-local space, as stored in the point cloud.
    pub local_position: Vec3,
    /// Centre of the marker and of the collision sphere.
    pub world_position: Vec3,
    pub hit_radius: f32,
}

impl Target {
    /// Same target placed under a different model transform.
    pub fn anchored_to(&self, placement: &Transform) -> Self {
        Self {
            world_position: placement.transform_point(self.local_position),
            ..*self
        }
    }
}

/// Uniform index in `0..len`, redrawn until it differs from `previous`.
/// A single point is necessarily chosen again.
pub fn pick_index<R: Rng + ?Sized>(len: usize, previous: Option<usize>, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }

    loop {
        let candidate = rng.gen_range(0..len);
        if Some(candidate) != previous {
            return candidate;
        }
    }
}

/// Picks a fresh target and resolves its world position from the model
/// placement at the time of selection.
pub fn select_target<R: Rng + ?Sized>(
    cloud: &PointCloud,
    placement: &Transform,
    previous: Option<usize>,
    hit_radius: f32,
    rng: &mut R,
) -> Target {
    let index = pick_index(cloud.len(), previous, rng);
    let local_position = cloud.positions()[index];

    Target {
        index,
        local_position,
        world_position: placement.transform_point(local_position),
        hit_radius,
    }
}
