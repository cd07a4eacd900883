use std::path::PathBuf;

use bevy::prelude::*;

use crate::constants::DEFAULT_SAVE_PATH;
use crate::messages::network::RecomputeConnectivity;
use crate::messages::save::{
    LoadRoadsRequest, RoadPersistFailed, RoadsLoaded, RoadsSaved, SaveRoadsRequest,
};
use crate::network::{RoadGraph, RoadNetworkSet, load_from_path, save_to_path};

/// Plugin that writes the road layer to disk and reads it back.
pub struct RoadSavePlugin;

/// Default save settings (currently only the fallback save path).
#[derive(Resource, Debug, Clone)]
pub struct SaveSettings {
    /// Default filesystem path used when requests do not provide one.
    pub default_path: PathBuf,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_SAVE_PATH),
        }
    }
}

impl Plugin for RoadSavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSettings>()
            .add_message::<SaveRoadsRequest>()
            .add_message::<LoadRoadsRequest>()
            .add_message::<RoadsSaved>()
            .add_message::<RoadsLoaded>()
            .add_message::<RoadPersistFailed>()
            .add_message::<RecomputeConnectivity>()
            .add_systems(
                Update,
                (process_save_requests, process_load_requests)
                    .chain()
                    .before(RoadNetworkSet::Input),
            );
    }
}

fn resolve_path(requested: &Option<PathBuf>, settings: &SaveSettings) -> PathBuf {
    requested
        .clone()
        .unwrap_or_else(|| settings.default_path.clone())
}

/// Write the committed roads for every save request
pub fn process_save_requests(
    mut requests: MessageReader<SaveRoadsRequest>,
    settings: Res<SaveSettings>,
    graph: Res<RoadGraph>,
    mut saved: MessageWriter<RoadsSaved>,
    mut failed: MessageWriter<RoadPersistFailed>,
) {
    for request in requests.read() {
        let path = resolve_path(&request.path, &settings);
        match save_to_path(&graph, &path) {
            Ok(()) => {
                info!("Saved roads to {}", path.display());
                saved.write(RoadsSaved { path });
            }
            Err(err) => {
                error!("Failed to save roads to {}: {}", path.display(), err);
                failed.write(RoadPersistFailed {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Restore roads from disk. Only the latest request of a frame is honored.
pub fn process_load_requests(
    mut requests: MessageReader<LoadRoadsRequest>,
    settings: Res<SaveSettings>,
    mut graph: ResMut<RoadGraph>,
    mut loaded: MessageWriter<RoadsLoaded>,
    mut failed: MessageWriter<RoadPersistFailed>,
    mut recompute: MessageWriter<RecomputeConnectivity>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };
    let path = resolve_path(&request.path, &settings);

    let result = load_from_path(&path).and_then(|snapshot| graph.restore(&snapshot));
    match result {
        Ok(restored) => {
            info!(
                "Loaded {} road tiles from {}",
                restored.len(),
                path.display()
            );
            recompute.write(RecomputeConnectivity);
            loaded.write(RoadsLoaded { path, restored });
        }
        Err(err) => {
            error!("Failed to load roads from {}: {}", path.display(), err);
            failed.write(RoadPersistFailed {
                path,
                reason: err.to_string(),
            });
        }
    }
}
