//! Headless walkthrough of the road tool: register a farm and a mill, trace a road
//! between them, then print what the solver found.
//! Run with: cargo run --bin main

use bevy::prelude::*;
use hex_roads::messages::{NodeRegistration, RoadToolAction, SaveRoadsRequest};
use hex_roads::network::{ConnectionArena, NetworkConfig, RoadGraph};
use hex_roads::resources::{ResourceClass, ResourceFilter};

const FARM: usize = 0;
const MILL: usize = 15;

fn main() {
    let mut app = App::new();
    app.insert_resource(NetworkConfig::with_size(4, 4));
    app.add_plugins(bevy::log::LogPlugin::default())
        .add_plugins(hex_roads::LogicPlugins);

    let grain = ResourceFilter::of(&[ResourceClass::Grain]);
    let world = app.world_mut();
    world.write_message(NodeRegistration::Source {
        tile: FARM,
        region: 0,
        filter: grain,
        external: false,
    });
    world.write_message(NodeRegistration::Destination {
        tile: MILL,
        region: 0,
        filter: grain,
        external: false,
    });
    app.update();

    // Drag along the top row, then down the right edge
    let world = app.world_mut();
    world.write_message(RoadToolAction::Begin(FARM));
    for tile in [1, 2, 3, 7, 11, MILL] {
        world.write_message(RoadToolAction::Extend(tile));
    }
    world.write_message(RoadToolAction::Release);
    app.update();

    let graph = app.world().resource::<RoadGraph>();
    let arena = app.world().resource::<ConnectionArena>();
    match graph.connection(arena, FARM, MILL) {
        Some(summary) => info!(
            "Farm reaches mill over {} tiles: {:?}",
            summary.distance(),
            summary.tiles
        ),
        None => warn!("Farm is not connected to the mill"),
    }

    app.world_mut().write_message(SaveRoadsRequest::default());
    app.update();
}
