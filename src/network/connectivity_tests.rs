use bevy::ecs::message::Messages;
use bevy::ecs::system::SystemState;

use crate::messages::network::{ConnectivityUpdated, NodeRegistration, RecomputeConnectivity};
use crate::network::{ConnectionArena, NetworkConfig, RoadConnections, RoadGraph};
use crate::resources::{ResourceClass, ResourceFilter};
use crate::test_utils::*;

const FARM: usize = 0;
const MILL: usize = 15;
const ROUTE: [usize; 7] = [0, 1, 2, 3, 7, 11, 15];

fn scenario() -> RoadGraph {
    let mut graph = test_graph();
    register_pair(&mut graph, FARM, MILL, 0);
    graph.commit_path(&ROUTE).unwrap();
    graph
}

#[test]
fn farm_reaches_mill_along_the_committed_road() {
    let mut graph = scenario();
    let mut harness = SolverHarness::default();
    let stats = harness.solve(&mut graph);

    assert_eq!(stats.sources, 1);
    assert_eq!(stats.connections, 1);
    assert_eq!(stats.truncated_sources, 0);

    let summary = graph.connection(&harness.arena, FARM, MILL).unwrap();
    assert_eq!(summary.tiles, ROUTE.to_vec());
    assert_eq!(summary.distance(), 6);
    assert_eq!(summary.region_crossings, 0);
    assert_eq!(summary.proxy, None);
    assert!(!summary.flags.forced);
    assert!(!graph.is_dirty());
    assert!(harness.scratch.is_clear());
}

#[test]
fn shortest_route_wins_when_roads_fork() {
    let mut graph = scenario();
    // Shortcut 2 -> 6 -> 11 bypasses 3 and 7
    graph.commit_path(&[2, 6, 11]).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    let summary = graph.connection(&harness.arena, FARM, MILL).unwrap();
    assert_eq!(summary.tiles, vec![0, 1, 2, 6, 11, 15]);
}

#[test]
fn mismatched_filters_do_not_connect() {
    let mut graph = test_graph();
    graph.register_source(FARM, 0, grain(), false).unwrap();
    graph
        .register_destination(MILL, 0, ResourceFilter::from(ResourceClass::Timber), false)
        .unwrap();
    graph.commit_path(&ROUTE).unwrap();
    let mut harness = SolverHarness::default();
    let stats = harness.solve(&mut graph);

    assert_eq!(stats.connections, 0);
    assert!(graph.connection(&harness.arena, FARM, MILL).is_none());
}

#[test]
fn buildings_do_not_pass_traffic() {
    let mut graph = test_graph();
    graph.register_source(FARM, 0, grain(), false).unwrap();
    graph.register_destination(2, 0, grain(), false).unwrap();
    graph.register_destination(7, 0, grain(), false).unwrap();
    // Tile 2 ends both roads
    graph.commit_path(&[0, 1, 2]).unwrap();
    graph.commit_path(&[2, 6, 7]).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    assert!(graph.connection(&harness.arena, FARM, 2).is_some());
    assert!(graph.connection(&harness.arena, FARM, 7).is_none());

    // Once the building on 2 is gone its road joins the two
    graph.deregister_destination(2);
    harness.solve(&mut graph);
    let summary = graph.connection(&harness.arena, FARM, 7).unwrap();
    assert_eq!(summary.tiles, vec![0, 1, 2, 6, 7]);
}

#[test]
fn cap_keeps_the_nearest_destinations() {
    let mut graph = test_graph();
    graph.register_source(FARM, 0, grain(), false).unwrap();
    // Destinations hang off the trunk road at distances 2, 3 and 4
    graph.commit_path(&[0, 1, 2, 3]).unwrap();
    for spur in [[1, 5], [2, 6], [3, 7]] {
        graph.commit_path(&spur).unwrap();
        graph.register_destination(spur[1], 0, grain(), false).unwrap();
    }

    let mut harness = SolverHarness::new(NetworkConfig {
        max_connections_per_source: 2,
        ..NetworkConfig::with_size(4, 4)
    });
    let stats = harness.solve(&mut graph);

    assert_eq!(stats.truncated_sources, 1);
    let reached: Vec<usize> = graph
        .connections(&harness.arena, FARM)
        .iter()
        .map(|summary| summary.destination)
        .collect();
    assert_eq!(reached, vec![5, 6]);
}

#[test]
fn shared_tile_is_a_forced_connection() {
    let mut graph = test_graph();
    register_pair(&mut graph, 5, 5, 0);
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    let summary = graph.connection(&harness.arena, 5, 5).unwrap();
    assert!(summary.flags.forced);
    assert!(summary.tiles.is_empty());
    assert_eq!(summary.distance(), 0);
}

#[test]
fn depots_do_not_force_connect_to_themselves() {
    let mut graph = test_graph();
    graph.register_proxy(5, 0, grain(), false).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    assert!(graph.connection(&harness.arena, 5, 5).is_none());
}

#[test]
fn external_endpoints_mark_the_summary() {
    let mut graph = test_graph();
    graph.register_source(FARM, 0, grain(), false).unwrap();
    graph.register_destination(MILL, 0, grain(), true).unwrap();
    graph.commit_path(&ROUTE).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    let summary = graph.connection(&harness.arena, FARM, MILL).unwrap();
    assert!(summary.flags.external);
}

#[test]
fn region_boundaries_are_counted() {
    let mut graph = scenario();
    graph.set_region(3, 1).unwrap();
    graph.set_region(7, 1).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    let summary = graph.connection(&harness.arena, FARM, MILL).unwrap();
    assert_eq!(summary.region_crossings, 2);
}

#[test]
fn unregistered_tiles_are_simply_unconnected() {
    let mut graph = scenario();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    assert!(graph.connection(&harness.arena, 4, MILL).is_none());
    assert!(graph.connections(&harness.arena, 4).is_empty());
    assert!(graph.connection(&harness.arena, FARM, 4).is_none());
}

#[test]
fn removing_a_road_disconnects_after_the_next_pass() {
    let mut graph = scenario();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);
    let stale = graph.source(FARM).unwrap().connections();

    graph.remove_road(7, true).unwrap();
    assert!(graph.is_dirty());
    harness.solve(&mut graph);

    assert!(graph.connection(&harness.arena, FARM, MILL).is_none());
    assert!(harness.arena.get(stale).is_empty());
}

/// Region 0: farm on 0, depot on 2. Region 1: depot on 12, mill on 14.
fn two_islands() -> RoadGraph {
    let mut graph = test_graph();
    graph.register_source(0, 0, grain(), false).unwrap();
    graph.register_proxy(2, 0, grain(), false).unwrap();
    graph.register_proxy(12, 1, grain(), false).unwrap();
    graph.register_destination(14, 1, grain(), false).unwrap();
    graph.set_region(13, 1).unwrap();
    graph.commit_path(&[0, 1, 2]).unwrap();
    graph.commit_path(&[12, 13, 14]).unwrap();
    graph
}

#[test]
fn depots_bridge_regions() {
    let mut graph = two_islands();
    let mut harness = SolverHarness::default();
    let stats = harness.solve(&mut graph);

    assert_eq!(stats.proxied, 1);
    let summary = graph.connection(&harness.arena, 0, 14).unwrap();
    assert_eq!(summary.proxy, Some(2));
    assert!(summary.flags.via_proxy);
    assert_eq!(summary.tiles, vec![0, 1, 2]);

    // The depot leg itself is a direct connection
    let leg = graph.connection(&harness.arena, 0, 2).unwrap();
    assert_eq!(leg.proxy, None);
}

#[test]
fn depot_carries_to_destinations_without_roads() {
    let mut graph = test_graph();
    graph.register_source(0, 0, grain(), false).unwrap();
    graph.register_proxy(2, 0, grain(), false).unwrap();
    graph.register_destination(14, 1, grain(), false).unwrap();
    graph.commit_path(&[0, 1, 2]).unwrap();
    let mut harness = SolverHarness::default();
    let stats = harness.solve(&mut graph);

    assert_eq!(stats.proxied, 1);
    let summary = graph.connection(&harness.arena, 0, 14).unwrap();
    assert_eq!(summary.proxy, Some(2));
    assert_eq!(summary.distance(), 2);

    // Same once the far side's depot is gone
    let mut graph = two_islands();
    graph.deregister_proxy(12);
    harness.solve(&mut graph);
    let summary = graph.connection(&harness.arena, 0, 14).unwrap();
    assert_eq!(summary.proxy, Some(2));
}

#[test]
fn depots_only_bridge_to_other_regions() {
    let mut graph = test_graph();
    graph.register_source(0, 0, grain(), false).unwrap();
    graph.register_proxy(2, 0, grain(), false).unwrap();
    graph.register_destination(14, 0, grain(), false).unwrap();
    graph.commit_path(&[0, 1, 2]).unwrap();
    let mut harness = SolverHarness::default();
    let stats = harness.solve(&mut graph);

    assert_eq!(stats.proxied, 0);
    assert!(graph.connection(&harness.arena, 0, 14).is_none());
}

/// One depot on tile 2 joins both regions: road 0-1-2 in region 0, road 2-3-7 into
/// region 1.
#[test]
fn shared_depot_joins_two_regions() {
    let mut graph = test_graph();
    graph.register_source(0, 0, grain(), false).unwrap();
    graph.register_proxy(2, 0, grain(), false).unwrap();
    graph.register_source(3, 1, grain(), false).unwrap();
    graph.register_destination(7, 1, grain(), false).unwrap();
    graph.commit_path(&[0, 1, 2]).unwrap();
    graph.commit_path(&[2, 3, 7]).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    let to_depot = graph.connection(&harness.arena, 0, 2).unwrap().distance();
    let summary = graph.connection(&harness.arena, 0, 7).unwrap();
    assert_eq!(summary.proxy, Some(2));
    assert!(summary.flags.via_proxy);
    assert_eq!(summary.distance(), to_depot);
    assert_eq!(summary.distance(), 2);

    // Inside region 1 the road is direct and carries no depot
    let local = graph.connection(&harness.arena, 3, 7).unwrap();
    assert_eq!(local.proxy, None);
    assert_eq!(local.distance(), 1);
}

#[test]
fn bridging_needs_the_source_to_reach_its_depot() {
    let mut graph = two_islands();
    graph.remove_road(1, true).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    assert!(graph.connection(&harness.arena, 0, 14).is_none());
}

#[test]
fn direct_roads_take_precedence_over_depots() {
    let mut graph = two_islands();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);
    assert_eq!(graph.connection(&harness.arena, 0, 14).unwrap().proxy, Some(2));

    // Land bridge 1 -> 5 -> 10 -> 14 crossing into region 1
    graph.commit_path(&[1, 5, 10, 14]).unwrap();
    harness.solve(&mut graph);
    let to_mill: Vec<_> = graph
        .connections(&harness.arena, 0)
        .iter()
        .filter(|summary| summary.destination == 14)
        .collect();
    assert_eq!(to_mill.len(), 1);
    assert_eq!(to_mill[0].proxy, None);
    assert_eq!(to_mill[0].tiles, vec![0, 1, 5, 10, 14]);
    assert_eq!(to_mill[0].region_crossings, 1);
}

#[test]
fn depot_tiles_do_not_pass_traffic() {
    let mut graph = two_islands();
    // Road continues past the depot at 2 towards the mill
    graph.commit_path(&[1, 2, 6, 10, 14]).unwrap();
    let mut harness = SolverHarness::default();
    harness.solve(&mut graph);

    let summary = graph.connection(&harness.arena, 0, 14).unwrap();
    assert_eq!(summary.proxy, Some(2));
    assert_eq!(summary.distance(), 2);
}

#[test]
fn plugin_recomputes_when_dirty_or_requested() {
    let mut app = create_test_app();
    let world = app.world_mut();
    world.write_message(NodeRegistration::Source {
        tile: FARM,
        region: 0,
        filter: grain(),
        external: false,
    });
    world.write_message(NodeRegistration::Destination {
        tile: MILL,
        region: 0,
        filter: grain(),
        external: false,
    });
    world.resource_mut::<RoadGraph>().commit_path(&ROUTE).unwrap();
    app.update();

    let updates = |app: &bevy::app::App| {
        app.world()
            .resource::<Messages<ConnectivityUpdated>>()
            .iter_current_update_messages()
            .count()
    };
    assert_eq!(updates(&app), 1);
    {
        let graph = app.world().resource::<RoadGraph>();
        let arena = app.world().resource::<ConnectionArena>();
        assert!(graph.connection(arena, FARM, MILL).is_some());
    }

    // Clean graph: the solver stays idle
    app.update();
    assert_eq!(updates(&app), 0);

    app.world_mut().write_message(RecomputeConnectivity);
    app.update();
    assert_eq!(updates(&app), 1);

    let mut state: SystemState<RoadConnections> = SystemState::new(app.world_mut());
    let connections = state.get(app.world());
    assert!(connections.is_connected(FARM, MILL));
    assert_eq!(connections.connections_of(FARM).len(), 1);
    assert!(!connections.is_connected(MILL, FARM));
}
