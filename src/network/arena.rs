use bevy::prelude::*;
use std::collections::VecDeque;

use crate::map::{Direction, TileIndex};

use super::types::PathSummary;

/// Handle to a contiguous run of summaries inside a `ConnectionArena`.
///
/// Spans remember the arena generation they were allocated in; once the arena is
/// reset they resolve to an empty slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummarySpan {
    start: u32,
    len: u32,
    generation: u32,
}

impl SummarySpan {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Long-lived storage for the path summaries attached to sources.
///
/// Summaries are never freed one by one; the whole arena is reset right before each
/// solver pass.
#[derive(Resource, Debug)]
pub struct ConnectionArena {
    summaries: Vec<PathSummary>,
    generation: u32,
}

impl Default for ConnectionArena {
    fn default() -> Self {
        Self {
            summaries: Vec::new(),
            // Generation 0 is reserved for default (never allocated) spans
            generation: 1,
        }
    }
}

impl ConnectionArena {
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Invalidate every span handed out so far
    pub fn reset(&mut self) {
        self.summaries.clear();
        self.generation = self.generation.wrapping_add(1).max(1);
    }

    pub fn alloc(&mut self, summaries: impl IntoIterator<Item = PathSummary>) -> SummarySpan {
        let start = self.summaries.len();
        self.summaries.extend(summaries);
        SummarySpan {
            start: start as u32,
            len: (self.summaries.len() - start) as u32,
            generation: self.generation,
        }
    }

    pub fn get(&self, span: SummarySpan) -> &[PathSummary] {
        if span.generation != self.generation {
            return &[];
        }
        let start = span.start as usize;
        self.summaries
            .get(start..start + span.len as usize)
            .unwrap_or(&[])
    }
}

/// How the search reached a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Visit {
    #[default]
    Unvisited,
    Start,
    /// Entered by stepping in this direction from the previous tile
    From(Direction),
}

/// Per-tick working memory of the connectivity solver
#[derive(Resource, Debug, Default)]
pub struct SolverScratch {
    pub(crate) queue: VecDeque<TileIndex>,
    pub(crate) visited: Vec<Visit>,
    pub(crate) summaries: Vec<PathSummary>,
}

impl SolverScratch {
    pub fn with_capacity(tiles: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(tiles),
            visited: Vec::with_capacity(tiles),
            summaries: Vec::new(),
        }
    }

    /// Prepare for a search over `tiles` tiles
    pub fn reset(&mut self, tiles: usize) {
        self.queue.clear();
        self.visited.clear();
        self.visited.resize(tiles, Visit::Unvisited);
        self.summaries.clear();
    }

    /// Drop everything but keep the allocations
    pub fn clear(&mut self) {
        self.queue.clear();
        self.visited.clear();
        self.summaries.clear();
    }

    pub fn is_clear(&self) -> bool {
        self.queue.is_empty() && self.visited.is_empty() && self.summaries.is_empty()
    }
}
