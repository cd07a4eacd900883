use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::map::TileIndex;

use super::arena::ConnectionArena;
use super::graph::RoadGraph;
use super::types::PathSummary;

impl RoadGraph {
    /// Summaries the latest solver pass attached to `source`; empty when the tile has no
    /// registered source
    pub fn connections<'a>(&self, arena: &'a ConnectionArena, source: TileIndex) -> &'a [PathSummary] {
        self.source(source)
            .map(|record| arena.get(record.connections()))
            .unwrap_or(&[])
    }

    /// Summary for `source -> destination`, or `None` when not connected. Unregistered
    /// tiles are simply not connected.
    pub fn connection<'a>(
        &self,
        arena: &'a ConnectionArena,
        source: TileIndex,
        destination: TileIndex,
    ) -> Option<&'a PathSummary> {
        self.connections(arena, source)
            .iter()
            .find(|summary| summary.destination == destination && summary.is_connected())
    }
}

/// Read-only access to solver results for economy-side systems
#[derive(SystemParam)]
pub struct RoadConnections<'w> {
    graph: Res<'w, RoadGraph>,
    arena: Res<'w, ConnectionArena>,
}

impl RoadConnections<'_> {
    pub fn between(&self, source: TileIndex, destination: TileIndex) -> Option<&PathSummary> {
        self.graph.connection(&self.arena, source, destination)
    }

    pub fn is_connected(&self, source: TileIndex, destination: TileIndex) -> bool {
        self.between(source, destination).is_some()
    }

    pub fn connections_of(&self, source: TileIndex) -> &[PathSummary] {
        self.graph.connections(&self.arena, source)
    }
}
