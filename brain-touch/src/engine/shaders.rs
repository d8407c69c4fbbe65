use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use constants::path::POINT_SPRITE_SHADER_PATH;

/// Unlit, camera-facing point sprites with a world-space size.
///
/// `params[0]` holds the linear RGBA colour, `params[1].x` the sprite size.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct PointSpriteMaterial {
    #[uniform(0)]
    pub params: [Vec4; 2],
}

impl PointSpriteMaterial {
    pub fn new(colour: Color, size: f32) -> Self {
        let linear = colour.to_linear();
        Self {
            params: [
                Vec4::new(linear.red, linear.green, linear.blue, linear.alpha),
                Vec4::new(size, 0.0, 0.0, 0.0),
            ],
        }
    }

    #[cfg(test)]
    pub fn size(&self) -> f32 {
        self.params[1].x
    }

    pub fn opacity(&self) -> f32 {
        self.params[0].w
    }
}

impl Material for PointSpriteMaterial {
    fn vertex_shader() -> ShaderRef {
        POINT_SPRITE_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        POINT_SPRITE_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        if self.opacity() < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::render_settings::{
        BRAIN_POINT_COLOUR, BRAIN_POINT_SIZE, TARGET_POINT_COLOUR, TARGET_POINT_SIZE,
    };

    #[test]
    fn translucent_marker_blends() {
        let marker = PointSpriteMaterial::new(TARGET_POINT_COLOUR, TARGET_POINT_SIZE);
        assert_eq!(marker.size(), TARGET_POINT_SIZE);
        assert!((marker.opacity() - 0.8).abs() < 1e-6);
        assert!(matches!(marker.alpha_mode(), AlphaMode::Blend));
    }

    #[test]
    fn brain_points_are_opaque() {
        let points = PointSpriteMaterial::new(BRAIN_POINT_COLOUR, BRAIN_POINT_SIZE);
        assert!(matches!(points.alpha_mode(), AlphaMode::Opaque));
    }
}
