use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::MIN_COMMIT_LEN;
use crate::map::{Direction, DirectionMask, TerrainSnapshot, TileIndex};

use super::graph::{RoadGraph, RoadGraphError};
use super::validation::can_build_road;

/// Why a build-tool action was refused. Nothing in the committed graph changes when
/// one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildRejection {
    #[error("tile {tile} is outside the grid")]
    OutOfBounds { tile: TileIndex },
    #[error("roads must start on an existing road, source or destination (tile {tile})")]
    InvalidStart { tile: TileIndex },
    #[error("no road is being traced")]
    NotTracing,
    #[error("tile {to} is not adjacent to tile {from}")]
    NotAdjacent { from: TileIndex, to: TileIndex },
    #[error("cannot build on tile {tile}: {reason}")]
    NotBuildable { tile: TileIndex, reason: &'static str },
    #[error("a road needs at least {MIN_COMMIT_LEN} tiles, traced {len}")]
    TooShort { len: usize },
    #[error("road must end on a road, source or destination (tile {tile})")]
    EndpointNotAnchor { tile: TileIndex },
    #[error(transparent)]
    Graph(#[from] RoadGraphError),
}

/// What an accepted build-tool action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStep {
    Started { tile: TileIndex },
    Staged { tile: TileIndex, reached_anchor: bool },
    /// Tiles unstaged by walking back onto `to`, last traced first
    Rewound { to: TileIndex, removed: Vec<TileIndex> },
    Unchanged,
    /// Trace is full; the tile was not staged
    Truncated { tile: TileIndex },
    Committed { tiles: Vec<TileIndex> },
    Cancelled { tiles: Vec<TileIndex> },
    /// Nothing was being traced
    Idle,
}

/// The road a player is currently tracing.
///
/// Staged directions live here, never in the `RoadGraph`, so abandoning a trace leaves
/// the committed network untouched.
#[derive(Resource, Debug, Clone, Default)]
pub struct BuildSession {
    trace: Vec<TileIndex>,
    // steps[k] leads from trace[k] to trace[k + 1]
    steps: Vec<Direction>,
    last: Option<TileIndex>,
    dragging: bool,
    staged: HashMap<TileIndex, DirectionMask>,
}

impl BuildSession {
    pub fn is_tracing(&self) -> bool {
        !self.trace.is_empty()
    }

    pub fn trace(&self) -> &[TileIndex] {
        &self.trace
    }

    pub fn last(&self) -> Option<TileIndex> {
        self.last
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging && self.is_tracing();
    }

    /// Directions staged on `tile` by the current trace
    pub fn staged(&self, tile: TileIndex) -> DirectionMask {
        self.staged.get(&tile).copied().unwrap_or_default()
    }

    /// Every tile with at least one staged direction
    pub fn staged_tiles(&self) -> impl Iterator<Item = (TileIndex, DirectionMask)> + '_ {
        self.staged
            .iter()
            .filter(|(_, mask)| !mask.is_empty())
            .map(|(tile, mask)| (*tile, *mask))
    }

    /// The trace ends on an anchor and is long enough to commit
    pub fn can_commit(&self, graph: &RoadGraph) -> bool {
        self.trace.len() >= MIN_COMMIT_LEN && self.last.is_some_and(|tile| graph.is_anchor(tile))
    }

    /// Start tracing from an existing anchor. A trace already in progress is cancelled
    /// first.
    pub fn begin(&mut self, graph: &RoadGraph, tile: TileIndex) -> Result<BuildStep, BuildRejection> {
        if !graph.grid().is_valid_index(tile) {
            return Err(BuildRejection::OutOfBounds { tile });
        }
        if !graph.is_anchor(tile) {
            return Err(BuildRejection::InvalidStart { tile });
        }
        if self.is_tracing() {
            self.cancel();
        }
        self.trace.push(tile);
        self.last = Some(tile);
        self.dragging = true;
        Ok(BuildStep::Started { tile })
    }

    /// Extend the trace to a tile adjacent to the last traced one, rewinding when the
    /// tile was already traced.
    pub fn extend(
        &mut self,
        graph: &RoadGraph,
        terrain: &TerrainSnapshot,
        max_len: usize,
        tile: TileIndex,
    ) -> Result<BuildStep, BuildRejection> {
        let Some(last) = self.last else {
            return Err(BuildRejection::NotTracing);
        };
        let grid = graph.grid();
        if !grid.is_valid_index(tile) {
            return Err(BuildRejection::OutOfBounds { tile });
        }
        if tile == last {
            return Ok(BuildStep::Unchanged);
        }
        let Some(direction) = grid.direction_between(last, tile) else {
            return Err(BuildRejection::NotAdjacent { from: last, to: tile });
        };

        if let Some(position) = self.trace.iter().position(|&traced| traced == tile) {
            let removed = self.rewind_to(position);
            return Ok(BuildStep::Rewound { to: tile, removed });
        }

        if let Err(reason) = can_build_road(graph, terrain, tile) {
            self.cancel();
            return Err(BuildRejection::NotBuildable { tile, reason });
        }

        if self.trace.len() >= max_len {
            warn!(
                "Road trace reached its cap of {} tiles; ignoring tile {}",
                max_len, tile
            );
            return Ok(BuildStep::Truncated { tile });
        }

        self.staged.entry(last).or_default().insert(direction);
        self.staged.entry(tile).or_default().insert(direction.reverse());
        self.steps.push(direction);
        self.trace.push(tile);
        self.last = Some(tile);

        Ok(BuildStep::Staged {
            tile,
            reached_anchor: graph.is_anchor(tile),
        })
    }

    /// Merge every staged direction into the graph. On rejection the trace is kept so
    /// the player can keep going.
    pub fn try_commit(&mut self, graph: &mut RoadGraph) -> Result<BuildStep, BuildRejection> {
        let Some(last) = self.last else {
            return Err(BuildRejection::NotTracing);
        };
        if self.trace.len() < MIN_COMMIT_LEN {
            return Err(BuildRejection::TooShort {
                len: self.trace.len(),
            });
        }
        if !graph.is_anchor(last) {
            return Err(BuildRejection::EndpointNotAnchor { tile: last });
        }

        for &tile in &self.trace {
            let mask = self.staged(tile);
            graph.commit_segment(tile, mask)?;
        }
        graph.flag_committed_path(&self.trace);

        let tiles = std::mem::take(&mut self.trace);
        self.reset();
        info!(
            "Committed road of {} tiles from {} to {}",
            tiles.len(),
            tiles[0],
            last
        );
        Ok(BuildStep::Committed { tiles })
    }

    /// Abandon the trace. Harmless when nothing is being traced.
    pub fn cancel(&mut self) -> BuildStep {
        if !self.is_tracing() {
            self.reset();
            return BuildStep::Idle;
        }
        let mut tiles = Vec::with_capacity(self.trace.len());
        while let Some(tile) = self.unstage_last() {
            tiles.push(tile);
        }
        tiles.extend(self.trace.pop());
        self.reset();
        BuildStep::Cancelled { tiles }
    }

    /// Unstage every tile after `position`, newest first, and truncate the trace so the
    /// tile at `position` becomes the last one.
    fn rewind_to(&mut self, position: usize) -> Vec<TileIndex> {
        let mut removed = Vec::new();
        while self.trace.len() > position + 1 {
            let Some(tile) = self.unstage_last() else {
                break;
            };
            removed.push(tile);
        }
        self.last = self.trace.last().copied();
        removed
    }

    /// Pop the newest tile and clear the two directions that linked it to its
    /// predecessor
    fn unstage_last(&mut self) -> Option<TileIndex> {
        if self.trace.len() < 2 {
            return None;
        }
        let tile = self.trace.pop()?;
        let direction = self.steps.pop()?;
        let previous = *self.trace.last()?;
        if let Some(mask) = self.staged.get_mut(&previous) {
            mask.remove(direction);
        }
        if let Some(mask) = self.staged.get_mut(&tile) {
            mask.remove(direction.reverse());
        }
        self.staged.retain(|_, mask| !mask.is_empty());
        Some(tile)
    }

    fn reset(&mut self) {
        self.trace.clear();
        self.steps.clear();
        self.last = None;
        self.dragging = false;
        self.staged.clear();
    }
}
