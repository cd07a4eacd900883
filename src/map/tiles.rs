use bevy::prelude::*;

use super::grid::TileIndex;

/// Terrain types that matter to road building
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TerrainType {
    #[default]
    Grass,
    Forest,
    Hills,
    Desert,
    Swamp,
    Mountain,
    Water,
}

/// Check if terrain accepts a road
/// Returns (buildable, optional error message)
pub fn can_build_road_on_terrain(terrain: TerrainType) -> (bool, Option<&'static str>) {
    match terrain {
        TerrainType::Water => (false, Some("Cannot build roads on water")),
        TerrainType::Mountain => (false, Some("Cannot build roads across mountains")),
        _ => (true, None),
    }
}

/// Terrain and occupancy view of the map consulted by the build tool.
///
/// This is a plain snapshot: whoever owns the world representation refreshes it, and
/// the road network only ever reads it.
#[derive(Resource, Debug, Clone, Default)]
pub struct TerrainSnapshot {
    terrain: Vec<TerrainType>,
    occupied: Vec<bool>,
}

impl TerrainSnapshot {
    /// All grass, nothing occupied
    pub fn open(len: usize) -> Self {
        Self {
            terrain: vec![TerrainType::Grass; len],
            occupied: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.terrain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty()
    }

    pub fn terrain(&self, index: TileIndex) -> Option<TerrainType> {
        self.terrain.get(index).copied()
    }

    pub fn set_terrain(&mut self, index: TileIndex, terrain: TerrainType) {
        if let Some(slot) = self.terrain.get_mut(index) {
            *slot = terrain;
        }
    }

    pub fn set_occupied(&mut self, index: TileIndex, occupied: bool) {
        if let Some(slot) = self.occupied.get_mut(index) {
            *slot = occupied;
        }
    }

    /// Whether a road may be laid on `index`; the reason is given when it may not
    pub fn check_buildable(&self, index: TileIndex) -> Result<(), &'static str> {
        let Some(terrain) = self.terrain(index) else {
            return Err("Tile not found");
        };
        if self.occupied.get(index).copied().unwrap_or(false) {
            return Err("Tile is occupied by a building");
        }
        match can_build_road_on_terrain(terrain) {
            (true, _) => Ok(()),
            (false, reason) => Err(reason.unwrap_or("terrain restriction")),
        }
    }

    pub fn is_buildable(&self, index: TileIndex) -> bool {
        self.check_buildable(index).is_ok()
    }
}
