//! Road network constants and default configuration values
//!
//! This module centralizes the magic numbers used by the grid, the build tool and the
//! connectivity solver.

// ============================================================================
// MAP CONSTANTS
// ============================================================================

/// Default map width (tiles per row)
pub const MAP_WIDTH: u32 = 32;

/// Default map height (rows)
pub const MAP_HEIGHT: u32 = 32;

// ============================================================================
// BUILD TOOL CONSTANTS
// ============================================================================

/// Maximum number of tiles a single traced road may contain
pub const MAX_TRACE_LEN: usize = 128;

/// Minimum number of traced tiles accepted by a commit (anchor, cell, anchor)
pub const MIN_COMMIT_LEN: usize = 3;

// ============================================================================
// SOLVER CONSTANTS
// ============================================================================

/// Maximum number of path summaries kept per source in one solver pass
pub const MAX_CONNECTIONS_PER_SOURCE: usize = 64;

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Default file the road layer is written to
pub const DEFAULT_SAVE_PATH: &str = "saves/roads.json";
