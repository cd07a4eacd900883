use hexx::Hex;
use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Linear tile index, `row * width + col`
pub type TileIndex = usize;

/// Offset ("odd-r") grid position, used for index math only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub col: u32,
    pub row: u32,
}

/// Fixed-size pointy-top hex grid laid out in odd-r offset rows.
///
/// The axial `Hex` is the canonical coordinate; indices and offset coordinates are
/// derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexGrid {
    width: u32,
    height: u32,
}

impl HexGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles; every per-tile array has exactly this length
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid_index(&self, index: TileIndex) -> bool {
        index < self.len()
    }

    pub fn index_to_offset(&self, index: TileIndex) -> Option<GridCoord> {
        if !self.is_valid_index(index) {
            return None;
        }
        let width = self.width as usize;
        Some(GridCoord {
            col: (index % width) as u32,
            row: (index / width) as u32,
        })
    }

    pub fn offset_to_index(&self, coord: GridCoord) -> Option<TileIndex> {
        if coord.col >= self.width || coord.row >= self.height {
            return None;
        }
        Some(coord.row as usize * self.width as usize + coord.col as usize)
    }

    pub fn index_to_hex(&self, index: TileIndex) -> Option<Hex> {
        self.is_valid_index(index)
            .then(|| self.index_to_hex_unchecked(index))
    }

    /// Caller guarantees `index` is inside the grid
    pub fn index_to_hex_unchecked(&self, index: TileIndex) -> Hex {
        debug_assert!(self.is_valid_index(index), "tile {index} outside grid");
        let width = self.width.max(1) as usize;
        offset_to_axial((index % width) as i32, (index / width) as i32)
    }

    pub fn hex_to_index(&self, hex: Hex) -> Option<TileIndex> {
        let (col, row) = axial_to_offset(hex);
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Caller guarantees `hex` lies inside the grid
    pub fn hex_to_index_unchecked(&self, hex: Hex) -> TileIndex {
        let (col, row) = axial_to_offset(hex);
        debug_assert!(col >= 0 && row >= 0, "hex {hex:?} outside grid");
        row as usize * self.width as usize + col as usize
    }

    /// Step one tile from `hex` towards `direction`
    pub fn offset(hex: Hex, direction: Direction) -> Hex {
        hex + direction.offset()
    }

    pub fn neighbor(&self, index: TileIndex, direction: Direction) -> Option<TileIndex> {
        let hex = self.index_to_hex(index)?;
        self.hex_to_index(Self::offset(hex, direction))
    }

    pub fn is_valid_offset(&self, index: TileIndex, direction: Direction) -> bool {
        self.neighbor(index, direction).is_some()
    }

    /// In-grid neighbors of `index` in direction enumeration order
    pub fn neighbors(&self, index: TileIndex) -> impl Iterator<Item = (Direction, TileIndex)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(index, dir).map(|n| (dir, n)))
    }

    /// Direction of the edge `from -> to`; `None` when the tiles are not adjacent
    /// (including `from == to`)
    pub fn direction_between(&self, from: TileIndex, to: TileIndex) -> Option<Direction> {
        let a = self.index_to_hex(from)?;
        let b = self.index_to_hex(to)?;
        Direction::from_offset(b - a)
    }

    pub fn are_adjacent(&self, a: TileIndex, b: TileIndex) -> bool {
        self.direction_between(a, b).is_some()
    }

    /// Cubic distance, `(|dq| + |dr| + |ds|) / 2`
    pub fn distance(&self, a: TileIndex, b: TileIndex) -> Option<u32> {
        let ha = self.index_to_hex(a)?;
        let hb = self.index_to_hex(b)?;
        Some(ha.distance_to(hb) as u32)
    }
}

fn offset_to_axial(col: i32, row: i32) -> Hex {
    Hex::new(col - (row - (row & 1)) / 2, row)
}

fn axial_to_offset(hex: Hex) -> (i32, i32) {
    (hex.x + (hex.y - (hex.y & 1)) / 2, hex.y)
}
