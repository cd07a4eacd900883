use bevy::prelude::*;

use crate::constants::{MAP_HEIGHT, MAP_WIDTH, MAX_CONNECTIONS_PER_SOURCE, MAX_TRACE_LEN};
use crate::map::HexGrid;

/// Sizing and soft caps for the road network.
///
/// Insert before adding `RoadNetworkPlugin` to override the defaults; the plugin sizes
/// every per-tile array from it.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub width: u32,
    pub height: u32,
    /// Summaries kept per source before the search stops early
    pub max_connections_per_source: usize,
    /// Tiles a single trace may hold before further extends are ignored
    pub max_trace_len: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            max_connections_per_source: MAX_CONNECTIONS_PER_SOURCE,
            max_trace_len: MAX_TRACE_LEN,
        }
    }
}

impl NetworkConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..default()
        }
    }

    pub fn grid(&self) -> HexGrid {
        HexGrid::new(self.width, self.height)
    }
}
