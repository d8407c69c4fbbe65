use bevy::prelude::*;

use super::selector::Target;

/// Controller or touch ray. A finite probe: targets further than `reach`
/// along the ray cannot be touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerRay {
    pub origin: Vec3,
    pub direction: Dir3,
    pub reach: f32,
}

impl ControllerRay {
    /// Returns `None` for a zero or non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3, reach: f32) -> Option<Self> {
        let direction = Dir3::new(direction).ok()?;
        Some(Self {
            origin,
            direction,
            reach,
        })
    }
}

/// Ray–sphere intersection. Returns the parametric distance at which the ray
/// enters the sphere, `0.0` when the origin is already inside, or `None` when
/// the sphere is missed or lies behind the origin. `dir` must be unit length.
pub fn ray_sphere_hit_t(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let t_closest = to_center.dot(dir);

    // Perpendicular offset from the ray line, measured directly to keep the
    // radius boundary exact.
    let offset_sq = (to_center - dir * t_closest).length_squared();
    let radius_sq = radius * radius;
    if offset_sq > radius_sq {
        return None;
    }

    let half_chord = (radius_sq - offset_sq).sqrt();
    let t_exit = t_closest + half_chord;
    if t_exit < 0.0 {
        return None;
    }

    Some((t_closest - half_chord).max(0.0))
}

/// True when the ray touches the target's collision sphere within reach.
pub fn test_hit(ray: &ControllerRay, target: &Target) -> bool {
    ray_sphere_hit_t(
        ray.origin,
        ray.direction.as_vec3(),
        target.world_position,
        target.hit_radius,
    )
    .is_some_and(|t| t <= ray.reach)
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::game::{TARGET_HIT_RADIUS, TOUCH_REACH};

    fn target_at(world_position: Vec3) -> Target {
        Target {
            index: 0,
            local_position: world_position,
            world_position,
            hit_radius: TARGET_HIT_RADIUS,
        }
    }

    fn forward_ray() -> ControllerRay {
        ControllerRay::new(Vec3::ZERO, Vec3::NEG_Z, TOUCH_REACH).unwrap()
    }

    #[test]
    fn target_one_unit_ahead_is_hit() {
        assert!(test_hit(&forward_ray(), &target_at(Vec3::new(0.0, 0.0, -1.0))));
    }

    #[test]
    fn target_five_units_ahead_is_out_of_reach() {
        assert!(!test_hit(&forward_ray(), &target_at(Vec3::new(0.0, 0.0, -5.0))));
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let ray = forward_ray();
        assert!(test_hit(&ray, &target_at(Vec3::new(0.15, 0.0, -1.0))));
        assert!(!test_hit(&ray, &target_at(Vec3::new(0.1501, 0.0, -1.0))));
    }

    #[test]
    fn target_behind_origin_is_missed() {
        assert!(!test_hit(&forward_ray(), &target_at(Vec3::new(0.0, 0.0, 1.0))));
    }

    #[test]
    fn origin_inside_sphere_hits_at_zero() {
        let t = ray_sphere_hit_t(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, 0.05), 0.15);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn entry_distance_is_reported() {
        let t = ray_sphere_hit_t(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, -1.0), 0.15).unwrap();
        assert!((t - 0.85).abs() < 1e-5);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(ControllerRay::new(Vec3::ZERO, Vec3::ZERO, TOUCH_REACH).is_none());
    }
}
