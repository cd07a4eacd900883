//! Hex Roads - road building and connectivity on a hexagonal tile grid
//!
//! This library exposes the road network as headless Bevy plugins plus the plain data
//! structures behind them, so the solver can be driven from tests and tools without an
//! app.

use bevy::app::PluginGroup;
use bevy::prelude::*;

use crate::network::RoadNetworkPlugin;
use crate::save::RoadSavePlugin;

pub mod constants;
pub mod map;
pub mod messages;
pub mod network;
pub mod resources;
pub mod save;

/// Plugin group for road logic (headless-compatible)
/// Insert a `NetworkConfig` before adding it to size the grid
pub struct LogicPlugins;

impl PluginGroup for LogicPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(RoadNetworkPlugin)
            .add(RoadSavePlugin)
    }
}

/// Headless app with logging and the road logic installed
pub fn app() -> App {
    let mut app = App::new();

    app.add_plugins(bevy::log::LogPlugin::default())
        .add_plugins(LogicPlugins);

    app
}

#[cfg(test)]
pub mod test_utils;
