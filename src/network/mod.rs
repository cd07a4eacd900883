use bevy::prelude::*;

use crate::map::TerrainSnapshot;
use crate::messages::network::{
    BuildFeedback, BuildRejected, ConnectivityUpdated, NodeRegistration, RecomputeConnectivity,
    RemoveRoad, RoadRemoved, RoadToolAction,
};

// Core types and structs
pub mod types;
pub use types::{
    DestinationRecord, PathFlags, PathSummary, RegionId, RoadTile, SourceRecord, TileFlags,
};

// Sizing and caps
pub mod config;
pub use config::NetworkConfig;

// Solver storage
pub mod arena;
pub use arena::{ConnectionArena, SolverScratch, SummarySpan};

// Committed road store
pub mod graph;
pub use graph::{RoadGraph, RoadGraphError};

// Validation logic
pub mod validation;
pub use validation::{can_build_road, check_flow_symmetry};

// Build tool state machine
pub mod construction;
pub use construction::{BuildRejection, BuildSession, BuildStep};

// Input handlers (Input Layer)
pub mod input;
pub use input::{apply_registrations, apply_road_removals, apply_road_tool};

// Connectivity systems (Logic Layer)
pub mod connectivity;
pub use connectivity::{
    SolveStats, recompute_connectivity, request_recompute, reset_solver_scratch,
    road_graph_dirty, solve,
};

// Read side
pub mod query;
pub use query::RoadConnections;

// Save format
pub mod persistence;
pub use persistence::{PersistError, RoadSnapshot, load_from_path, save_to_path};

#[cfg(test)]
mod connectivity_tests;

/// Ordering of road network work inside `Update`
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoadNetworkSet {
    /// Registrations, build tool actions and removals, in that order
    Input,
    /// Connectivity recomputation when the graph changed
    Solve,
}

/// Road building and connectivity.
///
/// Sized from `NetworkConfig` when one was inserted before the plugin, otherwise from
/// the defaults.
pub struct RoadNetworkPlugin;

impl Plugin for RoadNetworkPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<NetworkConfig>()
            .cloned()
            .unwrap_or_default();
        let grid = config.grid();
        info!("Road network on a {}x{} grid", grid.width(), grid.height());

        if !app.world().contains_resource::<TerrainSnapshot>() {
            app.insert_resource(TerrainSnapshot::open(grid.len()));
        }

        app.insert_resource(RoadGraph::new(grid))
            .insert_resource(SolverScratch::with_capacity(grid.len()))
            .insert_resource(config)
            .init_resource::<BuildSession>()
            .init_resource::<ConnectionArena>()
            .add_message::<RoadToolAction>()
            .add_message::<BuildFeedback>()
            .add_message::<BuildRejected>()
            .add_message::<RemoveRoad>()
            .add_message::<RoadRemoved>()
            .add_message::<NodeRegistration>()
            .add_message::<RecomputeConnectivity>()
            .add_message::<ConnectivityUpdated>()
            .configure_sets(Update, (RoadNetworkSet::Input, RoadNetworkSet::Solve).chain())
            .add_systems(First, reset_solver_scratch)
            .add_systems(
                Update,
                (
                    apply_registrations,
                    apply_road_tool,
                    apply_road_removals,
                    request_recompute,
                )
                    .chain()
                    .in_set(RoadNetworkSet::Input),
            )
            .add_systems(
                Update,
                recompute_connectivity
                    .run_if(road_graph_dirty)
                    .in_set(RoadNetworkSet::Solve),
            );
    }
}
