#![allow(dead_code)]

use bevy::ecs::message::{Message, Messages};
use bevy::prelude::*;
use hex_roads::messages::NodeRegistration;
use hex_roads::network::{ConnectionArena, NetworkConfig, RoadGraph};
use hex_roads::resources::{ResourceClass, ResourceFilter};

pub fn grain() -> ResourceFilter {
    ResourceFilter::from(ResourceClass::Grain)
}

/// Headless app with the road logic installed on a `width` x `height` grid
pub fn headless_app(width: u32, height: u32) -> App {
    let mut app = App::new();
    app.insert_resource(NetworkConfig::with_size(width, height))
        .add_plugins(hex_roads::LogicPlugins);
    app
}

/// Queue source and destination registrations for a grain route
pub fn register_route(app: &mut App, source: usize, destination: usize) {
    let world = app.world_mut();
    world.write_message(NodeRegistration::Source {
        tile: source,
        region: 0,
        filter: grain(),
        external: false,
    });
    world.write_message(NodeRegistration::Destination {
        tile: destination,
        region: 0,
        filter: grain(),
        external: false,
    });
}

pub fn is_connected(app: &App, source: usize, destination: usize) -> bool {
    let graph = app.world().resource::<RoadGraph>();
    let arena = app.world().resource::<ConnectionArena>();
    graph.connection(arena, source, destination).is_some()
}

/// Messages written during the latest update
pub fn written<M: Message + Clone>(app: &App) -> Vec<M> {
    app.world()
        .resource::<Messages<M>>()
        .iter_current_update_messages()
        .cloned()
        .collect()
}
