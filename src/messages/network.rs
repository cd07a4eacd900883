use bevy::prelude::*;

use crate::map::{DirectionMask, TileIndex};
use crate::network::connectivity::SolveStats;
use crate::network::construction::{BuildRejection, BuildStep};
use crate::network::types::RegionId;
use crate::resources::ResourceFilter;

/// Build-tool input, in the order the player produced it.
/// Tile indices come from cursor resolution upstream.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadToolAction {
    Begin(TileIndex),
    Extend(TileIndex),
    /// Commit if possible, keep tracing otherwise
    Commit,
    /// Pointer released: commit if possible, cancel otherwise
    Release,
    Cancel,
}

/// Accepted build-tool action with the resulting trace, for visual feedback
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct BuildFeedback {
    pub step: BuildStep,
    pub trace: Vec<TileIndex>,
}

/// Refused build-tool action
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRejected {
    pub action: RoadToolAction,
    pub reason: BuildRejection,
}

/// Bulldoze the road on a tile. Without `also_remove_incoming` the request is
/// refused unless the tile has nothing to clear.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveRoad {
    pub tile: TileIndex,
    pub also_remove_incoming: bool,
}

/// Directions actually removed by a `RemoveRoad`
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadRemoved {
    pub tile: TileIndex,
    pub directions: DirectionMask,
}

/// Registration changes issued by building placement
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRegistration {
    Source {
        tile: TileIndex,
        region: RegionId,
        filter: ResourceFilter,
        external: bool,
    },
    Destination {
        tile: TileIndex,
        region: RegionId,
        filter: ResourceFilter,
        external: bool,
    },
    Proxy {
        tile: TileIndex,
        region: RegionId,
        filter: ResourceFilter,
        external: bool,
    },
    RemoveSource(TileIndex),
    RemoveDestination(TileIndex),
    RemoveProxy(TileIndex),
}

/// Message to force a connectivity recomputation on the next pass
#[derive(Message, Debug, Clone, Copy)]
pub struct RecomputeConnectivity;

/// Emitted after every solver pass
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityUpdated {
    pub stats: SolveStats,
}
