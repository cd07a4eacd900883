use bevy::prelude::*;
use std::path::PathBuf;

use crate::map::TileIndex;

/// Request to write the road layer to disk.
#[derive(Message, Debug, Clone, Default)]
pub struct SaveRoadsRequest {
    pub path: Option<PathBuf>,
}

/// Request to load the road layer from disk.
#[derive(Message, Debug, Clone, Default)]
pub struct LoadRoadsRequest {
    pub path: Option<PathBuf>,
}

/// Notification emitted after a successful save.
#[derive(Message, Debug, Clone)]
pub struct RoadsSaved {
    pub path: PathBuf,
}

/// Notification emitted after a successful load; `restored` lists road tiles whose
/// visuals need rebuilding.
#[derive(Message, Debug, Clone)]
pub struct RoadsLoaded {
    pub path: PathBuf,
    pub restored: Vec<TileIndex>,
}

/// A save or load failed; the graph was not modified.
#[derive(Message, Debug, Clone)]
pub struct RoadPersistFailed {
    pub path: PathBuf,
    pub reason: String,
}
