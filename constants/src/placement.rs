/// Distance in front of the controller at which the model is placed.
pub const PLACEMENT_DISTANCE: f32 = 1.0;

/// Largest extent of the model after fit scaling (5 / 4 units).
pub const MODEL_FIT_EXTENT: f32 = 5.0 / 4.0;

/// Default viewer position for native builds, roughly standing eye height.
pub const VIEWER_START_POSITION: [f32; 3] = [0.0, 1.6, 3.0];
pub const VIEWER_LOOK_AT: [f32; 3] = [0.0, 1.6, 0.0];

/// Drag sensitivities: world units per pixel for move, radians per pixel for rotate.
pub const DRAG_MOVE_SENSITIVITY: f32 = 0.002;
pub const DRAG_ROTATE_SENSITIVITY: f32 = 0.01;

/// Fit scale that maps the largest extent of a model onto `MODEL_FIT_EXTENT`.
/// Degenerate (zero sized) models keep their native scale.
pub fn fit_scale(max_extent: f32) -> f32 {
    if max_extent <= f32::EPSILON || !max_extent.is_finite() {
        return 1.0;
    }
    MODEL_FIT_EXTENT / max_extent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_scale_matches_five_over_four_times_extent() {
        let max_extent = 2.0;
        assert!((fit_scale(max_extent) - 5.0 / (max_extent * 4.0)).abs() < 1e-6);
    }

    #[test]
    fn degenerate_extent_keeps_native_scale() {
        assert_eq!(fit_scale(0.0), 1.0);
        assert_eq!(fit_scale(f32::NAN), 1.0);
    }
}
