use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::gltf::{Gltf, GltfMesh};
use bevy::prelude::*;
use thiserror::Error;

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::point_cloud::{PointCloud, PointCloudError, mesh_positions};
use crate::game::session::GameSession;
use crate::game::settings::GameSettings;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("could not load {path}: {reason}")]
    Failed { path: String, reason: String },
    #[error("{0} contains no meshes")]
    NoMeshes(String),
    #[error("no mesh primitive in {0} has Float32x3 positions")]
    NoPositions(String),
    #[error(transparent)]
    PointCloud(#[from] PointCloudError),
}

#[derive(Resource, Default)]
pub struct ModelLoader {
    handle: Option<Handle<Gltf>>,
    path: String,
}

/// Requests the model once the settings, which name its path, are resolved.
pub fn request_model_system(
    mut loading_progress: ResMut<LoadingProgress>,
    mut model_loader: ResMut<ModelLoader>,
    settings: Res<GameSettings>,
    asset_server: Res<AssetServer>,
) {
    if !loading_progress.settings_resolved || loading_progress.model_requested {
        return;
    }

    println!("Loading brain model from: {}", settings.model_path);
    model_loader.path = settings.model_path.clone();
    model_loader.handle = Some(asset_server.load(settings.model_path.clone()));
    loading_progress.model_requested = true;
}

/// Builds the point cloud once the GLTF and all of its meshes are in.
pub fn load_model_system(
    mut loading_progress: ResMut<LoadingProgress>,
    model_loader: Res<ModelLoader>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    meshes: Res<Assets<Mesh>>,
    mut session: ResMut<GameSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if loading_progress.point_cloud_created || loading_progress.failure.is_some() {
        return;
    }
    let Some(handle) = model_loader.handle.as_ref() else {
        return;
    };

    let result = if let Some(reason) = load_failure(&asset_server, handle) {
        Err(ModelLoadError::Failed {
            path: model_loader.path.clone(),
            reason,
        })
    } else if !asset_server.is_loaded_with_dependencies(handle.id()) {
        return;
    } else {
        match gltfs.get(handle) {
            Some(gltf) => extract_point_cloud(gltf, &gltf_meshes, &meshes, &model_loader.path),
            None => return,
        }
    };

    match result {
        Ok(cloud) => {
            println!("✓ Brain point cloud ready: {} points", cloud.len());
            session.attach_point_cloud(cloud);
            loading_progress.point_cloud_created = true;
        }
        Err(err) => {
            error!("Brain model unusable: {}", err);
            rpc_interface.send_notification(
                "model_load_failed",
                serde_json::json!({
                    "path": model_loader.path,
                    "reason": err.to_string()
                }),
            );
            loading_progress.failure = Some(err.to_string());
        }
    }
}

fn load_failure(asset_server: &AssetServer, handle: &Handle<Gltf>) -> Option<String> {
    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        return Some(err.to_string());
    }
    if let Some(RecursiveDependencyLoadState::Failed(err)) =
        asset_server.get_recursive_dependency_load_state(handle.id())
    {
        return Some(err.to_string());
    }
    None
}

/// Flattens the positions of every mesh primitive, in document order, into
/// one point cloud.
pub fn extract_point_cloud(
    gltf: &Gltf,
    gltf_meshes: &Assets<GltfMesh>,
    meshes: &Assets<Mesh>,
    path: &str,
) -> Result<PointCloud, ModelLoadError> {
    if gltf.meshes.is_empty() {
        return Err(ModelLoadError::NoMeshes(path.to_string()));
    }

    let primitive_meshes = gltf
        .meshes
        .iter()
        .filter_map(|handle| gltf_meshes.get(handle))
        .flat_map(|gltf_mesh| gltf_mesh.primitives.iter())
        .map(|primitive| meshes.get(&primitive.mesh));

    collect_positions(primitive_meshes, path)
}

/// Primitives that are missing or have no usable positions are skipped.
fn collect_positions<'a>(
    primitive_meshes: impl Iterator<Item = Option<&'a Mesh>>,
    path: &str,
) -> Result<PointCloud, ModelLoadError> {
    let positions: Vec<Vec3> = primitive_meshes
        .flatten()
        .filter_map(mesh_positions)
        .flatten()
        .collect();

    if positions.is_empty() {
        return Err(ModelLoadError::NoPositions(path.to_string()));
    }

    Ok(PointCloud::from_positions(positions)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::PrimitiveTopology;
    use bevy::render::render_asset::RenderAssetUsages;

    fn mesh_with(positions: Vec<[f32; 3]>) -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    }

    #[test]
    fn primitives_are_flattened_in_order() {
        let first = mesh_with(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let second = mesh_with(vec![[0.0, 2.0, 0.0]]);

        let cloud = collect_positions([Some(&first), Some(&second)].into_iter(), "brain.glb")
            .unwrap();

        assert_eq!(
            cloud.positions(),
            &[Vec3::ZERO, Vec3::X, Vec3::new(0.0, 2.0, 0.0)]
        );
    }

    #[test]
    fn primitives_without_positions_are_skipped() {
        let bare = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        let usable = mesh_with(vec![[0.0, 0.0, -1.0]]);

        let cloud = collect_positions([Some(&bare), None, Some(&usable)].into_iter(), "brain.glb")
            .unwrap();
        assert_eq!(cloud.positions(), &[Vec3::NEG_Z]);
    }

    #[test]
    fn no_usable_positions_is_an_error() {
        let empty = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        let err = collect_positions([Some(&empty)].into_iter(), "brain.glb").unwrap_err();
        assert!(matches!(err, ModelLoadError::NoPositions(path) if path == "brain.glb"));
    }

    #[test]
    fn non_finite_vertices_are_rejected() {
        let broken = mesh_with(vec![[0.0, f32::NAN, 0.0]]);
        let err = collect_positions([Some(&broken)].into_iter(), "brain.glb").unwrap_err();
        assert!(matches!(
            err,
            ModelLoadError::PointCloud(PointCloudError::NonFinite { index: 0, .. })
        ));
    }
}
