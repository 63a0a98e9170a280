#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic breadth-first pathfinding over the tile grid.
//!
//! The planner answers one question: given a start and a target tile, which
//! single step should an entity take next along a shortest 4-connected path?
//! Expansion follows a fixed neighbor order (up, down, left, right) so ties
//! always break the same way, and tiles are excluded through an injected
//! occupancy predicate rather than any knowledge of entities.

use std::collections::VecDeque;

use tilerunner_core::{Direction, StepOffset, TilePoint};

/// Breadth-first planner with reusable scratch buffers.
///
/// The buffers are resized to the grid on each call, so one planner instance
/// can serve grids of different sizes across ticks without reallocating in
/// the steady state.
#[derive(Clone, Debug, Default)]
pub struct PathPlanner {
    queue: VecDeque<TilePoint>,
    visited: Vec<bool>,
    parents: Vec<Option<TilePoint>>,
}

impl PathPlanner {
    /// Creates a new planner with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the first step of a shortest path from `start` to `target`.
    ///
    /// Returns [`StepOffset::ZERO`] when either endpoint is out of bounds,
    /// when `start` equals `target`, or when no path exists. The occupancy
    /// predicate reports tiles the caller may not traverse; the start tile is
    /// always expanded so an entity standing on a contested tile can leave it.
    pub fn next_step<F>(
        &mut self,
        width: u32,
        height: u32,
        start: TilePoint,
        target: TilePoint,
        mut is_blocked: F,
    ) -> StepOffset
    where
        F: FnMut(TilePoint) -> bool,
    {
        if !start.in_bounds(width, height) || !target.in_bounds(width, height) {
            return StepOffset::ZERO;
        }
        if start == target {
            return StepOffset::ZERO;
        }

        let width_usize = width as usize;
        let cell_count = width_usize * height as usize;
        self.prepare(cell_count);

        let start_index = index(width_usize, start);
        self.visited[start_index] = true;
        self.queue.push_back(start);

        let mut found = false;
        while let Some(cell) = self.queue.pop_front() {
            if cell == target {
                found = true;
                break;
            }

            for direction in Direction::ALL {
                let neighbor = cell.offset_by(direction.offset());
                if !neighbor.in_bounds(width, height) {
                    continue;
                }
                let neighbor_index = index(width_usize, neighbor);
                if self.visited[neighbor_index] {
                    continue;
                }
                if is_blocked(neighbor) {
                    continue;
                }

                self.visited[neighbor_index] = true;
                self.parents[neighbor_index] = Some(cell);
                self.queue.push_back(neighbor);
            }
        }

        if !found {
            return StepOffset::ZERO;
        }

        // Walk the parent chain back to the tile adjacent to the start.
        let mut cursor = target;
        loop {
            let parent = match self.parents[index(width_usize, cursor)] {
                Some(parent) => parent,
                None => return StepOffset::ZERO,
            };
            if parent == start {
                break;
            }
            cursor = parent;
        }

        StepOffset::new(cursor.x() - start.x(), cursor.y() - start.y())
    }

    fn prepare(&mut self, cell_count: usize) {
        self.queue.clear();
        if self.visited.len() != cell_count {
            self.visited = vec![false; cell_count];
            self.parents = vec![None; cell_count];
        } else {
            self.visited.fill(false);
            self.parents.fill(None);
        }
    }
}

fn index(width: usize, tile: TilePoint) -> usize {
    tile.y() as usize * width + tile.x() as usize
}
