//! Testing utilities for the road network
//!
//! Helpers to build small graphs and headless apps so tests can focus on the
//! behavior under test rather than setup.

use bevy::prelude::*;

use crate::map::{HexGrid, TerrainSnapshot, TileIndex};
use crate::network::{
    ConnectionArena, NetworkConfig, RegionId, RoadGraph, RoadNetworkPlugin, SolveStats,
    SolverScratch, solve,
};
use crate::resources::{ResourceClass, ResourceFilter};

/// Side length of the default test grid
pub const TEST_SIZE: u32 = 4;

pub fn grain() -> ResourceFilter {
    ResourceFilter::from(ResourceClass::Grain)
}

/// Empty 4x4 graph
pub fn test_graph() -> RoadGraph {
    RoadGraph::new(HexGrid::new(TEST_SIZE, TEST_SIZE))
}

/// All-grass terrain matching `test_graph`
pub fn open_terrain() -> TerrainSnapshot {
    TerrainSnapshot::open((TEST_SIZE * TEST_SIZE) as usize)
}

/// Register a grain source on `from`, a grain destination on `to`, both in `region`
pub fn register_pair(graph: &mut RoadGraph, from: TileIndex, to: TileIndex, region: RegionId) {
    graph.register_source(from, region, grain(), false).unwrap();
    graph.register_destination(to, region, grain(), false).unwrap();
}

/// Owns everything a solver pass needs outside the graph
pub struct SolverHarness {
    pub arena: ConnectionArena,
    pub scratch: SolverScratch,
    pub config: NetworkConfig,
}

impl SolverHarness {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            scratch: SolverScratch::with_capacity(config.grid().len()),
            arena: ConnectionArena::default(),
            config,
        }
    }

    pub fn solve(&mut self, graph: &mut RoadGraph) -> SolveStats {
        solve(graph, &mut self.arena, &mut self.scratch, &self.config)
    }
}

impl Default for SolverHarness {
    fn default() -> Self {
        Self::new(NetworkConfig::with_size(TEST_SIZE, TEST_SIZE))
    }
}

/// Headless app with only the road network installed on a 4x4 grid
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.insert_resource(NetworkConfig::with_size(TEST_SIZE, TEST_SIZE))
        .add_plugins(RoadNetworkPlugin);
    app
}
