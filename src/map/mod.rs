// Hex coordinate system and terrain view
pub mod direction;
pub mod grid;
pub mod tiles;

// Re-exports for convenience
pub use direction::{Direction, DirectionMask};
pub use grid::{GridCoord, HexGrid, TileIndex};
pub use tiles::{TerrainSnapshot, TerrainType, can_build_road_on_terrain};
