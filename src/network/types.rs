use crate::map::{DirectionMask, TileIndex};
use crate::resources::ResourceFilter;

use super::arena::SummarySpan;

/// Partition of the grid (island, province, ...) a tile belongs to
pub type RegionId = u16;

/// Per-tile role flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileFlags {
    pub road: bool,        // Interior of a committed trace
    pub anchor: bool,      // Valid place to start or end a road
    pub source: bool,      // Registered producer
    pub destination: bool, // Registered consumer
    pub proxy: bool,       // Export depot bridging regions
}

impl TileFlags {
    /// Registered as anything a building owns
    pub fn is_registered(&self) -> bool {
        self.source || self.destination || self.proxy
    }
}

/// Everything the store knows about a single tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoadTile {
    /// Committed outgoing road directions
    pub flow: DirectionMask,
    /// Directions that survive road removal
    pub preserved: DirectionMask,
    pub flags: TileFlags,
    pub region: RegionId,
}

/// A producer registered on a tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub tile: TileIndex,
    pub region: RegionId,
    pub filter: ResourceFilter,
    pub external: bool,
    // Owned by the connectivity solver, replaced on every pass
    pub(crate) connections: SummarySpan,
}

impl SourceRecord {
    pub(crate) fn new(tile: TileIndex, region: RegionId, filter: ResourceFilter, external: bool) -> Self {
        Self {
            tile,
            region,
            filter,
            external,
            connections: SummarySpan::default(),
        }
    }

    /// Span of path summaries produced by the latest solver pass
    pub fn connections(&self) -> SummarySpan {
        self.connections
    }
}

/// A consumer registered on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationRecord {
    pub tile: TileIndex,
    pub region: RegionId,
    pub filter: ResourceFilter,
    pub external: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathFlags {
    /// Connected without a road (source and destination share a tile)
    pub forced: bool,
    /// Resolved through an export depot in the source's region
    pub via_proxy: bool,
    /// Either endpoint is an external (off-map) record
    pub external: bool,
}

/// Result of one (source, destination) resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSummary {
    pub destination: TileIndex,
    pub proxy: Option<TileIndex>,
    /// Tiles from source to destination (or to the proxy), both ends included
    pub tiles: Vec<TileIndex>,
    pub region_crossings: u32,
    pub flags: PathFlags,
}

impl PathSummary {
    /// Same-tile connection that needs no road
    pub fn forced(destination: TileIndex, external: bool) -> Self {
        Self {
            destination,
            proxy: None,
            tiles: Vec::new(),
            region_crossings: 0,
            flags: PathFlags {
                forced: true,
                via_proxy: false,
                external,
            },
        }
    }

    pub fn distance(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }

    pub fn is_connected(&self) -> bool {
        !self.tiles.is_empty() || self.flags.forced
    }
}
