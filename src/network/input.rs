use bevy::prelude::*;

use crate::map::TerrainSnapshot;
use crate::messages::network::{
    BuildFeedback, BuildRejected, NodeRegistration, RemoveRoad, RoadRemoved, RoadToolAction,
};

use super::config::NetworkConfig;
use super::construction::{BuildRejection, BuildSession, BuildStep};
use super::graph::RoadGraph;

/// Apply build-tool actions (Input Layer)
/// Reads RoadToolAction messages in order and drives the build session
pub fn apply_road_tool(
    mut actions: MessageReader<RoadToolAction>,
    mut session: ResMut<BuildSession>,
    mut graph: ResMut<RoadGraph>,
    terrain: Res<TerrainSnapshot>,
    config: Res<NetworkConfig>,
    mut feedback: MessageWriter<BuildFeedback>,
    mut rejected: MessageWriter<BuildRejected>,
) {
    for &action in actions.read() {
        let result = handle_action(action, &mut session, &mut graph, &terrain, &config);
        match result {
            Ok(BuildStep::Unchanged) => {}
            Ok(step) => {
                debug!("Road tool {:?}: {:?}", action, step);
                feedback.write(BuildFeedback {
                    step,
                    trace: session.trace().to_vec(),
                });
            }
            Err(reason) => {
                debug!("Road tool {:?} rejected: {}", action, reason);
                rejected.write(BuildRejected { action, reason });
            }
        }
    }
}

fn handle_action(
    action: RoadToolAction,
    session: &mut BuildSession,
    graph: &mut RoadGraph,
    terrain: &TerrainSnapshot,
    config: &NetworkConfig,
) -> Result<BuildStep, BuildRejection> {
    match action {
        RoadToolAction::Begin(tile) => session.begin(graph, tile),
        RoadToolAction::Extend(tile) => session.extend(graph, terrain, config.max_trace_len, tile),
        RoadToolAction::Commit => session.try_commit(graph),
        RoadToolAction::Release => {
            session.set_dragging(false);
            if !session.is_tracing() {
                return Ok(BuildStep::Idle);
            }
            match session.try_commit(graph) {
                Ok(step) => Ok(step),
                Err(reason) => {
                    session.cancel();
                    Err(reason)
                }
            }
        }
        RoadToolAction::Cancel => Ok(session.cancel()),
    }
}

/// Apply road removals (Input Layer)
/// A removal that keeps the incoming side is refused whenever it would clear anything,
/// since the neighbors would be left flowing into a tile with no road back.
pub fn apply_road_removals(
    mut requests: MessageReader<RemoveRoad>,
    mut graph: ResMut<RoadGraph>,
    mut removed: MessageWriter<RoadRemoved>,
) {
    for request in requests.read() {
        if !request.also_remove_incoming && !graph.removable(request.tile).is_empty() {
            warn!(
                "Refusing to remove road on tile {} without its incoming side",
                request.tile
            );
            continue;
        }
        match graph.remove_road(request.tile, request.also_remove_incoming) {
            Ok(directions) => {
                info!(
                    "Removed road on tile {} ({} directions)",
                    request.tile,
                    directions.len()
                );
                removed.write(RoadRemoved {
                    tile: request.tile,
                    directions,
                });
            }
            Err(err) => warn!("Cannot remove road: {}", err),
        }
    }
}

/// Apply source/destination/depot registrations (Input Layer)
pub fn apply_registrations(
    mut changes: MessageReader<NodeRegistration>,
    mut graph: ResMut<RoadGraph>,
) {
    for change in changes.read() {
        let result = match *change {
            NodeRegistration::Source {
                tile,
                region,
                filter,
                external,
            } => graph.register_source(tile, region, filter, external),
            NodeRegistration::Destination {
                tile,
                region,
                filter,
                external,
            } => graph.register_destination(tile, region, filter, external),
            NodeRegistration::Proxy {
                tile,
                region,
                filter,
                external,
            } => graph.register_proxy(tile, region, filter, external),
            NodeRegistration::RemoveSource(tile) => {
                graph.deregister_source(tile);
                Ok(())
            }
            NodeRegistration::RemoveDestination(tile) => {
                graph.deregister_destination(tile);
                Ok(())
            }
            NodeRegistration::RemoveProxy(tile) => {
                graph.deregister_proxy(tile);
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!("Ignoring registration {:?}: {}", change, err);
        }
    }
}
