use bevy::prelude::*;
use bevy::render::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;
use thiserror::Error;

/// Corners of the camera-facing quad every point is expanded into.
/// Two counter-clockwise triangles in view space.
const SPRITE_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PointCloudError {
    #[error("point cloud has no points")]
    Empty,
    #[error("point {index} has a non-finite coordinate: {position}")]
    NonFinite { index: usize, position: Vec3 },
}

/// Ordered, immutable set of model-local positions sampled from the brain mesh.
/// Never empty: every index in `0..len()` is a valid target.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    positions: Vec<Vec3>,
}

impl PointCloud {
    pub fn from_positions(positions: Vec<Vec3>) -> Result<Self, PointCloudError> {
        if positions.is_empty() {
            return Err(PointCloudError::Empty);
        }
        if let Some((index, position)) = positions
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite())
        {
            return Err(PointCloudError::NonFinite {
                index,
                position: *position,
            });
        }
        Ok(Self { positions })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn bounds(&self) -> PointCloudBounds {
        let (min, max) = self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        PointCloudBounds { min, max }
    }
}

/// Axis aligned bounds of a point cloud in model-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCloudBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl PointCloudBounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }
}

/// Reads the `Float32x3` position attribute of a mesh. Other layouts are skipped.
pub fn mesh_positions(mesh: &Mesh) -> Option<Vec<Vec3>> {
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
        VertexAttributeValues::Float32x3(values) => {
            Some(values.iter().map(|p| Vec3::from_array(*p)).collect())
        }
        _ => None,
    }
}

/// Builds a sprite mesh: each point becomes a quad whose six vertices share the
/// point position and carry their corner in `UV_0`. The point sprite shader
/// pushes the corners out in view space.
pub fn create_point_sprite_mesh(positions: &[Vec3]) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );

    let mut vertices = Vec::with_capacity(positions.len() * SPRITE_CORNERS.len());
    let mut corners = Vec::with_capacity(positions.len() * SPRITE_CORNERS.len());
    for position in positions {
        for corner in SPRITE_CORNERS {
            vertices.push(position.to_array());
            corners.push(corner);
        }
    }

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, corners);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cloud_is_rejected() {
        assert_eq!(
            PointCloud::from_positions(Vec::new()),
            Err(PointCloudError::Empty)
        );
    }

    #[test]
    fn non_finite_point_is_rejected() {
        let result = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)]);
        assert!(matches!(
            result,
            Err(PointCloudError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn bounds_cover_all_points() {
        let cloud = PointCloud::from_positions(vec![
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(0.0, 4.0, 1.0),
        ])
        .unwrap();

        let bounds = cloud.bounds();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(bounds.max_extent(), 6.0);
    }

    #[test]
    fn sprite_mesh_expands_each_point_into_a_quad() {
        let mesh = create_point_sprite_mesh(&[Vec3::ZERO, Vec3::ONE]);
        assert_eq!(mesh.count_vertices(), 12);

        let positions = mesh_positions(&mesh).unwrap();
        assert!(positions[..6].iter().all(|p| *p == Vec3::ZERO));
        assert!(positions[6..].iter().all(|p| *p == Vec3::ONE));
    }

    #[test]
    fn positions_are_read_back_from_mesh() {
        let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
        );
        assert_eq!(
            mesh_positions(&mesh),
            Some(vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)])
        );
    }
}
