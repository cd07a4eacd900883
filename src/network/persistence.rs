use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::map::{Direction, DirectionMask, TileIndex};

use super::graph::{RoadGraph, find_asymmetry};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access road save: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed road save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("road save holds {found} tiles but the grid has {expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("tile {tile} has invalid flow bits {bits:#010b}")]
    InvalidMask { tile: TileIndex, bits: u8 },
    #[error("tile {tile} flows {direction:?} but its neighbor has no road back")]
    Asymmetric { tile: TileIndex, direction: Direction },
}

/// Durable form of the road layer: one flow mask per tile in index order.
///
/// Sources, destinations and depots are not saved; the buildings owning them register
/// again after a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSnapshot {
    pub width: u32,
    pub height: u32,
    pub flows: Vec<u8>,
}

impl RoadGraph {
    pub fn snapshot(&self) -> RoadSnapshot {
        let grid = self.grid();
        RoadSnapshot {
            width: grid.width(),
            height: grid.height(),
            flows: self.tiles().iter().map(|tile| tile.flow.bits()).collect(),
        }
    }

    /// Replace every tile's flow with the snapshot's and rebuild the anchor flag for
    /// tiles that carry flow. Returns the tiles that carry flow.
    ///
    /// The `road` flag is not recreated: the mask cannot tell an interior tile from an
    /// endpoint, and the solver routes by [`RoadGraph::passes_traffic`] instead.
    ///
    /// The snapshot is fully validated first; on error the graph is left as it was.
    pub fn restore(&mut self, snapshot: &RoadSnapshot) -> Result<Vec<TileIndex>, PersistError> {
        let grid = self.grid();
        if snapshot.width != grid.width()
            || snapshot.height != grid.height()
            || snapshot.flows.len() != grid.len()
        {
            return Err(PersistError::SizeMismatch {
                expected: grid.len(),
                found: snapshot.flows.len(),
            });
        }

        let flows = snapshot
            .flows
            .iter()
            .enumerate()
            .map(|(tile, &bits)| {
                DirectionMask::from_bits(bits).ok_or(PersistError::InvalidMask { tile, bits })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some((tile, direction)) = find_asymmetry(grid, &flows) {
            return Err(PersistError::Asymmetric { tile, direction });
        }

        let mut restored = Vec::new();
        for (index, (tile, flow)) in self.tiles_mut().iter_mut().zip(flows).enumerate() {
            tile.flow = flow;
            tile.flags.road = false;
            tile.flags.anchor = !flow.is_empty() || tile.flags.is_registered();
            if !flow.is_empty() {
                restored.push(index);
            }
        }
        self.mark_dirty();
        Ok(restored)
    }
}

pub fn save_to_path(graph: &RoadGraph, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, &graph.snapshot())?;
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<RoadSnapshot, PersistError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
