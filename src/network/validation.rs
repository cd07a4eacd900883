use crate::map::{Direction, TerrainSnapshot, TileIndex};

use super::graph::RoadGraph;

/// Check if a road may be laid on `tile`.
/// Anchors (existing roads, sources, destinations) are always accepted; anything else
/// must pass the terrain snapshot.
pub fn can_build_road(
    graph: &RoadGraph,
    terrain: &TerrainSnapshot,
    tile: TileIndex,
) -> Result<(), &'static str> {
    if graph.is_anchor(tile) {
        return Ok(());
    }
    terrain.check_buildable(tile)
}

/// Every outgoing bit must be mirrored by the neighbor's reverse bit.
///
/// All store mutations keep this true, so a violation means some caller bypassed the
/// paired-update operations.
pub fn check_flow_symmetry(graph: &RoadGraph) -> Result<(), (TileIndex, Direction)> {
    match graph.find_asymmetry() {
        Some(broken) => Err(broken),
        None => Ok(()),
    }
}
