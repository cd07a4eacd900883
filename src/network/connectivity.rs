use bevy::prelude::*;
use std::collections::BTreeSet;

use crate::map::TileIndex;
use crate::messages::network::{ConnectivityUpdated, RecomputeConnectivity};

use super::arena::{ConnectionArena, SolverScratch, Visit};
use super::config::NetworkConfig;
use super::graph::RoadGraph;
use super::types::{PathFlags, PathSummary, SourceRecord};
use super::validation::check_flow_symmetry;

/// Counters from one solver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub sources: usize,
    pub connections: usize,
    pub proxied: usize,
    /// Sources whose search stopped at the per-source cap
    pub truncated_sources: usize,
}

/// Recompute every (source, destination) connection from scratch, in source tile
/// order. The dirty flag is cleared at the end of the pass.
pub fn solve(
    graph: &mut RoadGraph,
    arena: &mut ConnectionArena,
    scratch: &mut SolverScratch,
    config: &NetworkConfig,
) -> SolveStats {
    debug_assert!(
        check_flow_symmetry(graph).is_ok(),
        "road flow is asymmetric at {:?}",
        graph.find_asymmetry()
    );

    arena.reset();
    let cap = config.max_connections_per_source.max(1);
    let tiles = graph.grid().len();
    let mut stats = SolveStats::default();

    let order: Vec<TileIndex> = graph.sources().map(|source| source.tile).collect();
    for tile in order {
        let Some(source) = graph.source(tile).cloned() else {
            continue;
        };
        scratch.reset(tiles);

        let mut truncated = search_from(graph, &source, scratch, cap);
        if !truncated && !graph.is_proxy(tile) {
            let (proxied, capped) = bridge_through_proxies(graph, &source, scratch, cap);
            stats.proxied += proxied;
            truncated = capped;
        }
        if truncated {
            stats.truncated_sources += 1;
            warn!(
                "Source at tile {} hit the cap of {} connections; remaining destinations skipped",
                tile, cap
            );
        }

        let span = arena.alloc(scratch.summaries.drain(..));
        stats.connections += span.len();
        stats.sources += 1;
        graph.set_connections(tile, span);
    }

    scratch.clear();
    graph.clear_dirty();
    stats
}

/// Breadth-first search over committed flow from one source. Returns `true` when the
/// summary cap stopped the search early.
fn search_from(
    graph: &RoadGraph,
    source: &SourceRecord,
    scratch: &mut SolverScratch,
    cap: usize,
) -> bool {
    let start = source.tile;
    let grid = graph.grid();

    // Same tile: connected without searching
    if !graph.is_proxy(start)
        && let Some(dest) = graph.destination(start)
        && dest.filter.intersects(source.filter)
    {
        scratch
            .summaries
            .push(PathSummary::forced(start, source.external || dest.external));
        if scratch.summaries.len() >= cap {
            return true;
        }
    }

    scratch.visited[start] = Visit::Start;
    scratch.queue.push_back(start);

    while let Some(current) = scratch.queue.pop_front() {
        if current != start
            && let Some(dest) = graph.destination(current)
            && dest.filter.intersects(source.filter)
        {
            let (tiles, region_crossings) = trace_back(graph, &scratch.visited, start, current);
            scratch.summaries.push(PathSummary {
                destination: current,
                proxy: None,
                tiles,
                region_crossings,
                flags: PathFlags {
                    forced: false,
                    via_proxy: false,
                    external: source.external || dest.external,
                },
            });
            if scratch.summaries.len() >= cap {
                return true;
            }
        }

        // Buildings receive traffic but do not pass it on
        if current != start && !graph.passes_traffic(current) {
            continue;
        }

        for dir in graph.flow(current).iter() {
            let Some(next) = grid.neighbor(current, dir) else {
                continue;
            };
            if scratch.visited[next] == Visit::Unvisited {
                scratch.visited[next] = Visit::From(dir);
                scratch.queue.push_back(next);
            }
        }
    }
    false
}

/// Walk the visited-from directions back to the start. Returns the tiles in travel
/// order and the number of region boundaries crossed.
fn trace_back(
    graph: &RoadGraph,
    visited: &[Visit],
    start: TileIndex,
    end: TileIndex,
) -> (Vec<TileIndex>, u32) {
    let grid = graph.grid();
    let mut tiles = vec![end];
    let mut current = end;
    while current != start {
        let Visit::From(dir) = visited[current] else {
            break;
        };
        let Some(previous) = grid.neighbor(current, dir.reverse()) else {
            break;
        };
        tiles.push(previous);
        current = previous;
    }
    tiles.reverse();

    let crossings = tiles
        .windows(2)
        .filter(|pair| graph.region(pair[0]) != graph.region(pair[1]))
        .count() as u32;
    (tiles, crossings)
}

/// Connect an ordinary source to destinations in other regions through an export depot
/// of its own region. The depot carries the resource the rest of the way, so the
/// summary ends at the depot. Direct connections always win; among depots the nearest
/// one the source reached wins.
///
/// Returns how many summaries were added and whether the cap was hit.
fn bridge_through_proxies(
    graph: &RoadGraph,
    source: &SourceRecord,
    scratch: &mut SolverScratch,
    cap: usize,
) -> (usize, bool) {
    // Summaries are in BFS order, so the first depot found is the nearest
    let Some(via) = scratch
        .summaries
        .iter()
        .find(|summary| graph.is_proxy_in(source.region, summary.destination))
        .cloned()
    else {
        return (0, false);
    };

    let reached: BTreeSet<TileIndex> = scratch
        .summaries
        .iter()
        .map(|summary| summary.destination)
        .collect();

    let mut bridged = Vec::new();
    for dest in graph.destinations() {
        if dest.region == source.region
            || dest.tile == source.tile
            || graph.is_proxy(dest.tile)
            || reached.contains(&dest.tile)
            || !dest.filter.intersects(source.filter)
        {
            continue;
        }

        bridged.push(PathSummary {
            destination: dest.tile,
            proxy: Some(via.destination),
            tiles: via.tiles.clone(),
            region_crossings: via.region_crossings,
            flags: PathFlags {
                forced: via.flags.forced,
                via_proxy: true,
                external: source.external || dest.external,
            },
        });
    }

    let room = cap.saturating_sub(scratch.summaries.len());
    let capped = bridged.len() > room;
    bridged.truncate(room);
    let added = bridged.len();
    scratch.summaries.extend(bridged);
    (added, capped)
}

/// Run condition: the graph changed since the last pass
pub fn road_graph_dirty(graph: Res<RoadGraph>) -> bool {
    graph.is_dirty()
}

/// Explicit recompute requests (post-load, region reassignment by external systems)
pub fn request_recompute(
    mut events: MessageReader<RecomputeConnectivity>,
    mut graph: ResMut<RoadGraph>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    graph.mark_dirty();
}

/// Recompute connectivity for all sources (Logic Layer)
/// Only runs when the graph is dirty; clears the flag when done
pub fn recompute_connectivity(
    mut graph: ResMut<RoadGraph>,
    mut arena: ResMut<ConnectionArena>,
    mut scratch: ResMut<SolverScratch>,
    config: Res<NetworkConfig>,
    mut updated: MessageWriter<ConnectivityUpdated>,
) {
    let stats = solve(&mut graph, &mut arena, &mut scratch, &config);
    info!(
        "Recomputed road connectivity: {} sources, {} connections ({} via depots)",
        stats.sources, stats.connections, stats.proxied
    );
    updated.write(ConnectivityUpdated { stats });
}

/// Frame arena reset, runs every tick whether or not a search ran
pub fn reset_solver_scratch(mut scratch: ResMut<SolverScratch>) {
    scratch.clear();
}
