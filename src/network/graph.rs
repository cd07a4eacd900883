use bevy::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

use crate::constants::{MAP_HEIGHT, MAP_WIDTH};
use crate::map::{Direction, DirectionMask, HexGrid, TileIndex};
use crate::resources::ResourceFilter;

use super::arena::SummarySpan;
use super::types::{DestinationRecord, RegionId, RoadTile, SourceRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoadGraphError {
    #[error("tile {0} is outside the grid")]
    OutOfBounds(TileIndex),
    #[error("tiles {from} and {to} are not adjacent")]
    NotAdjacent { from: TileIndex, to: TileIndex },
}

/// The committed road network: per-tile flow masks and flags plus the registered
/// sources, destinations and export depots.
///
/// Every mutation marks the graph dirty; the connectivity solver clears the flag once
/// it has recomputed all connections.
#[derive(Resource, Debug, Clone)]
pub struct RoadGraph {
    grid: HexGrid,
    tiles: Vec<RoadTile>,
    sources: BTreeMap<TileIndex, SourceRecord>,
    destinations: BTreeMap<TileIndex, DestinationRecord>,
    proxies: HashMap<RegionId, BTreeSet<TileIndex>>,
    dirty: bool,
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::new(HexGrid::new(MAP_WIDTH, MAP_HEIGHT))
    }
}

impl RoadGraph {
    pub fn new(grid: HexGrid) -> Self {
        Self {
            grid,
            tiles: vec![RoadTile::default(); grid.len()],
            sources: BTreeMap::new(),
            destinations: BTreeMap::new(),
            proxies: HashMap::new(),
            dirty: false,
        }
    }

    pub fn grid(&self) -> HexGrid {
        self.grid
    }

    pub fn tile(&self, index: TileIndex) -> Option<&RoadTile> {
        self.tiles.get(index)
    }

    pub(crate) fn tile_mut(&mut self, index: TileIndex) -> Result<&mut RoadTile, RoadGraphError> {
        self.tiles
            .get_mut(index)
            .ok_or(RoadGraphError::OutOfBounds(index))
    }

    pub(crate) fn tiles(&self) -> &[RoadTile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [RoadTile] {
        &mut self.tiles
    }

    /// Committed outgoing directions; empty for out-of-range tiles
    pub fn flow(&self, index: TileIndex) -> DirectionMask {
        self.tile(index).map(|t| t.flow).unwrap_or_default()
    }

    pub fn region(&self, index: TileIndex) -> RegionId {
        self.tile(index).map(|t| t.region).unwrap_or_default()
    }

    pub fn is_anchor(&self, index: TileIndex) -> bool {
        self.tile(index).is_some_and(|t| t.flags.anchor)
    }

    pub fn is_road(&self, index: TileIndex) -> bool {
        self.tile(index).is_some_and(|t| t.flags.road)
    }

    pub fn is_proxy(&self, index: TileIndex) -> bool {
        self.tile(index).is_some_and(|t| t.flags.proxy)
    }

    /// Whether traffic entering the tile may continue along its flow: the tile carries
    /// road and no building is registered on it. Depends only on durable flow and live
    /// registrations, never on the `road` flag.
    pub fn passes_traffic(&self, index: TileIndex) -> bool {
        self.tile(index)
            .is_some_and(|t| !t.flow.is_empty() && !t.flags.is_registered())
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    // ------------------------------------------------------------------
    // Tile mutation
    // ------------------------------------------------------------------

    pub fn set_region(&mut self, index: TileIndex, region: RegionId) -> Result<(), RoadGraphError> {
        let tile = self.tile_mut(index)?;
        if tile.region != region {
            tile.region = region;
            self.dirty = true;
        }
        Ok(())
    }

    /// Directions in `mask` survive `remove_road` on this tile
    pub fn set_preserved(&mut self, index: TileIndex, mask: DirectionMask) -> Result<(), RoadGraphError> {
        self.tile_mut(index)?.preserved = mask;
        Ok(())
    }

    /// Toggle one outgoing bit of one tile. The neighbor is not touched.
    pub fn set_outgoing(
        &mut self,
        index: TileIndex,
        direction: Direction,
        present: bool,
    ) -> Result<(), RoadGraphError> {
        let tile = self.tile_mut(index)?;
        if present {
            tile.flow.insert(direction);
        } else {
            tile.flow.remove(direction);
        }
        self.dirty = true;
        Ok(())
    }

    /// Merge `directions` into the tile's flow and set the reverse bit on each
    /// neighbor. Directions leading off the grid are dropped.
    pub fn commit_segment(
        &mut self,
        index: TileIndex,
        directions: DirectionMask,
    ) -> Result<(), RoadGraphError> {
        if !self.grid.is_valid_index(index) {
            return Err(RoadGraphError::OutOfBounds(index));
        }
        for dir in directions.iter() {
            let Some(neighbor) = self.grid.neighbor(index, dir) else {
                debug!("Dropping off-grid direction {:?} on tile {}", dir, index);
                continue;
            };
            self.tiles[index].flow.insert(dir);
            self.tiles[neighbor].flow.insert(dir.reverse());
        }
        self.dirty = true;
        Ok(())
    }

    /// Lay a road along an already validated path without going through the build tool
    /// (scripted placement, map fixtures). Interior tiles become roads, both ends
    /// become anchors.
    pub fn commit_path(&mut self, path: &[TileIndex]) -> Result<(), RoadGraphError> {
        for &tile in path {
            if !self.grid.is_valid_index(tile) {
                return Err(RoadGraphError::OutOfBounds(tile));
            }
        }
        let mut steps = Vec::with_capacity(path.len().saturating_sub(1));
        for pair in path.windows(2) {
            let dir = self
                .grid
                .direction_between(pair[0], pair[1])
                .ok_or(RoadGraphError::NotAdjacent {
                    from: pair[0],
                    to: pair[1],
                })?;
            steps.push((pair[0], dir));
        }
        for (tile, dir) in steps {
            self.commit_segment(tile, DirectionMask::single(dir))?;
        }
        self.flag_committed_path(path);
        Ok(())
    }

    /// Interior tiles are flagged as road; endpoints only become anchors and keep any
    /// road flag they already had.
    pub(crate) fn flag_committed_path(&mut self, path: &[TileIndex]) {
        let last = path.len().saturating_sub(1);
        for (position, &tile) in path.iter().enumerate() {
            let Some(record) = self.tiles.get_mut(tile) else {
                continue;
            };
            record.flags.anchor = true;
            if position != 0 && position != last {
                record.flags.road = true;
            }
        }
        self.dirty = true;
    }

    /// Directions `remove_road` would clear on this tile
    pub fn removable(&self, index: TileIndex) -> DirectionMask {
        self.tile(index)
            .map(|t| t.flow.difference(t.preserved))
            .unwrap_or_default()
    }

    /// Clear the tile's outgoing flow except preserved directions. With
    /// `also_remove_incoming` the matching reverse bit is cleared on each neighbor.
    /// Returns the directions that were removed.
    pub fn remove_road(
        &mut self,
        index: TileIndex,
        also_remove_incoming: bool,
    ) -> Result<DirectionMask, RoadGraphError> {
        let tile = self.tile_mut(index)?;
        let removed = tile.flow.difference(tile.preserved);
        tile.flow = tile.flow.intersection(tile.preserved);

        if also_remove_incoming {
            for dir in removed.iter() {
                if let Some(neighbor) = self.grid.neighbor(index, dir) {
                    self.tiles[neighbor].flow.remove(dir.reverse());
                    self.retire_if_bare(neighbor);
                }
            }
        }
        self.retire_if_bare(index);
        self.dirty = true;
        Ok(removed)
    }

    /// A tile left without flow stops being a road, and stops being an anchor unless a
    /// building is still registered on it.
    fn retire_if_bare(&mut self, index: TileIndex) {
        let tile = &mut self.tiles[index];
        if tile.flow.is_empty() {
            tile.flags.road = false;
            tile.flags.anchor = tile.flags.is_registered();
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn register_source(
        &mut self,
        tile: TileIndex,
        region: RegionId,
        filter: ResourceFilter,
        external: bool,
    ) -> Result<(), RoadGraphError> {
        let record = self.tile_mut(tile)?;
        record.flags.source = true;
        record.flags.anchor = true;
        record.region = region;

        self.sources
            .entry(tile)
            .and_modify(|existing| {
                existing.filter = existing.filter.union(filter);
                existing.region = region;
                existing.external |= external;
            })
            .or_insert_with(|| SourceRecord::new(tile, region, filter, external));
        self.dirty = true;
        Ok(())
    }

    pub fn register_destination(
        &mut self,
        tile: TileIndex,
        region: RegionId,
        filter: ResourceFilter,
        external: bool,
    ) -> Result<(), RoadGraphError> {
        let record = self.tile_mut(tile)?;
        record.flags.destination = true;
        record.flags.anchor = true;
        record.region = region;

        self.destinations
            .entry(tile)
            .and_modify(|existing| {
                existing.filter = existing.filter.union(filter);
                existing.region = region;
                existing.external |= external;
            })
            .or_insert(DestinationRecord {
                tile,
                region,
                filter,
                external,
            });
        self.dirty = true;
        Ok(())
    }

    /// An export depot is both a source and a destination with the same filter
    pub fn register_proxy(
        &mut self,
        tile: TileIndex,
        region: RegionId,
        filter: ResourceFilter,
        external: bool,
    ) -> Result<(), RoadGraphError> {
        self.register_source(tile, region, filter, external)?;
        self.register_destination(tile, region, filter, external)?;
        // A depot belongs to one region: the latest registration wins
        self.forget_proxy(tile);
        self.tiles[tile].flags.proxy = true;
        self.proxies.entry(region).or_default().insert(tile);
        Ok(())
    }

    /// Returns whether a source was registered on `tile`. A depot on the tile stops
    /// being a depot.
    pub fn deregister_source(&mut self, tile: TileIndex) -> bool {
        let was_proxy = self.forget_proxy(tile);
        let existed = self.sources.remove(&tile).is_some();
        if let Some(record) = self.tiles.get_mut(tile) {
            record.flags.source = false;
            Self::drop_anchor_if_unused(record);
        }
        self.dirty |= existed || was_proxy;
        existed
    }

    /// Returns whether a destination was registered on `tile`. A depot on the tile
    /// stops being a depot.
    pub fn deregister_destination(&mut self, tile: TileIndex) -> bool {
        let was_proxy = self.forget_proxy(tile);
        let existed = self.destinations.remove(&tile).is_some();
        if let Some(record) = self.tiles.get_mut(tile) {
            record.flags.destination = false;
            Self::drop_anchor_if_unused(record);
        }
        self.dirty |= existed || was_proxy;
        existed
    }

    /// Returns whether a depot was registered on `tile`
    pub fn deregister_proxy(&mut self, tile: TileIndex) -> bool {
        let existed = self.forget_proxy(tile);
        self.deregister_source(tile);
        self.deregister_destination(tile);
        existed
    }

    /// Drop the tile from every region's depot set and clear its depot flag
    fn forget_proxy(&mut self, tile: TileIndex) -> bool {
        let mut existed = false;
        for members in self.proxies.values_mut() {
            existed |= members.remove(&tile);
        }
        self.proxies.retain(|_, members| !members.is_empty());
        if let Some(record) = self.tiles.get_mut(tile) {
            record.flags.proxy = false;
        }
        existed
    }

    // A tile still carrying road keeps its anchor so traces can start from it
    fn drop_anchor_if_unused(record: &mut RoadTile) {
        if !record.flags.source
            && !record.flags.destination
            && !record.flags.road
            && record.flow.is_empty()
        {
            record.flags.anchor = false;
        }
    }

    pub fn source(&self, tile: TileIndex) -> Option<&SourceRecord> {
        self.sources.get(&tile)
    }

    pub fn destination(&self, tile: TileIndex) -> Option<&DestinationRecord> {
        self.destinations.get(&tile)
    }

    /// Sources in tile order
    pub fn sources(&self) -> impl Iterator<Item = &SourceRecord> {
        self.sources.values()
    }

    /// Destinations in tile order
    pub fn destinations(&self) -> impl Iterator<Item = &DestinationRecord> {
        self.destinations.values()
    }

    /// Export depots registered in `region`, in tile order
    pub fn proxies_in(&self, region: RegionId) -> impl Iterator<Item = TileIndex> + '_ {
        self.proxies
            .get(&region)
            .into_iter()
            .flat_map(|members| members.iter().copied())
    }

    pub fn is_proxy_in(&self, region: RegionId, tile: TileIndex) -> bool {
        self.proxies
            .get(&region)
            .is_some_and(|members| members.contains(&tile))
    }

    pub(crate) fn set_connections(&mut self, tile: TileIndex, span: SummarySpan) {
        if let Some(source) = self.sources.get_mut(&tile) {
            source.connections = span;
        }
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// First tile/direction whose outgoing bit has no matching reverse bit on the
    /// neighbor
    pub fn find_asymmetry(&self) -> Option<(TileIndex, Direction)> {
        let flows: Vec<DirectionMask> = self.tiles.iter().map(|t| t.flow).collect();
        find_asymmetry(self.grid, &flows)
    }
}

/// Symmetry check over any flow sequence laid out in tile order
pub(crate) fn find_asymmetry(
    grid: HexGrid,
    flows: &[DirectionMask],
) -> Option<(TileIndex, Direction)> {
    for (index, flow) in flows.iter().enumerate() {
        for dir in flow.iter() {
            let Some(neighbor) = grid.neighbor(index, dir) else {
                continue;
            };
            if !flows[neighbor].contains(dir.reverse()) {
                return Some((index, dir));
            }
        }
    }
    None
}
