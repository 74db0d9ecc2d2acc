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
//! Searches expand neighbours in [`Direction::ALL`] order (up, down, left,
//! right) and record the first predecessor that discovers each cell. When
//! several shortest paths exist the one implied by that order is returned,
//! so identical requests always produce identical paths.
//!
//! [`Direction::ALL`]: capital_siege_core::Direction::ALL

use std::collections::VecDeque;

use capital_siege_core::{Path, PathError, Position};
use capital_siege_world::Grid;

const UNVISITED: usize = usize::MAX;

/// Finds a shortest walkable path between two cells.
///
/// Convenience wrapper around a fresh [`PathFinder`].
pub fn find_path(grid: &Grid, source: Position, destination: Position) -> Result<Path, PathError> {
    PathFinder::default().find(grid, source, destination)
}

/// Breadth-first path planner that reuses its scratch buffers between
/// requests.
///
/// Results never depend on earlier requests; only allocations are shared.
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    predecessors: Vec<usize>,
    distances: Vec<u32>,
    frontier: VecDeque<usize>,
}

impl PathFinder {
    /// Creates a planner with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a shortest path from `source` to `destination`, both inclusive.
    ///
    /// Fails with [`PathError::InvalidPosition`] when an endpoint lies outside
    /// the grid, [`PathError::BlockedEndpoint`] when an endpoint is a wall and
    /// [`PathError::NoPathFound`] when the destination is unreachable. The
    /// source is validated before the destination.
    pub fn find(
        &mut self,
        grid: &Grid,
        source: Position,
        destination: Position,
    ) -> Result<Path, PathError> {
        let source_index = endpoint_index(grid, source)?;
        let destination_index = endpoint_index(grid, destination)?;

        if source_index == destination_index {
            return Ok(Path::single(source));
        }

        self.search(grid, source_index, Some(destination_index));

        if self.predecessors[destination_index] == UNVISITED {
            tracing::debug!(%source, %destination, "destination unreachable");
            return Err(PathError::NoPathFound {
                origin: source,
                destination,
            });
        }

        let path = self.reconstruct(grid, source_index, destination_index);
        tracing::trace!(%source, %destination, steps = path.step_count(), "path found");
        Ok(path)
    }

    /// Step distances from `source` to every cell of the grid.
    ///
    /// Walls and unreachable cells report `None`.
    pub fn distances_from(
        &mut self,
        grid: &Grid,
        source: Position,
    ) -> Result<DistanceField, PathError> {
        let source_index = endpoint_index(grid, source)?;
        self.search(grid, source_index, None);

        let distances = self
            .distances
            .iter()
            .map(|&distance| (distance != u32::MAX).then_some(distance))
            .collect();

        Ok(DistanceField {
            rows: grid.rows(),
            columns: grid.columns(),
            distances,
        })
    }

    fn reset(&mut self, cell_count: usize) {
        if self.predecessors.len() != cell_count {
            self.predecessors = vec![UNVISITED; cell_count];
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.predecessors.fill(UNVISITED);
            self.distances.fill(u32::MAX);
        }
        self.frontier.clear();
    }

    fn search(&mut self, grid: &Grid, source_index: usize, goal: Option<usize>) {
        self.reset(grid.cell_count());

        self.predecessors[source_index] = source_index;
        self.distances[source_index] = 0;
        self.frontier.push_back(source_index);

        while let Some(current) = self.frontier.pop_front() {
            if Some(current) == goal {
                break;
            }

            let Some(cell) = grid.position_at(current) else {
                continue;
            };
            let next_distance = self.distances[current].saturating_add(1);

            for neighbor in grid.neighbors(cell) {
                if !grid.is_walkable(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };

                if self.predecessors[neighbor_index] != UNVISITED {
                    continue;
                }

                self.predecessors[neighbor_index] = current;
                self.distances[neighbor_index] = next_distance;
                self.frontier.push_back(neighbor_index);
            }
        }
    }

    fn reconstruct(&self, grid: &Grid, source_index: usize, destination_index: usize) -> Path {
        let length = usize::try_from(self.distances[destination_index]).unwrap_or(0);
        let mut positions = Vec::with_capacity(length + 1);
        let mut cursor = destination_index;

        loop {
            if let Some(position) = grid.position_at(cursor) {
                positions.push(position);
            }
            if cursor == source_index {
                break;
            }
            cursor = self.predecessors[cursor];
        }

        positions.reverse();
        Path::from_positions(positions)
    }
}

/// Dense step-distance field produced by [`PathFinder::distances_from`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    rows: u32,
    columns: u32,
    distances: Vec<Option<u32>>,
}

impl DistanceField {
    /// Number of rows covered by the field.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns covered by the field.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Steps needed to reach the position, if it is reachable.
    #[must_use]
    pub fn distance(&self, position: Position) -> Option<u32> {
        if position.row() >= self.rows || position.col() >= self.columns {
            return None;
        }

        let row = usize::try_from(position.row()).ok()?;
        let col = usize::try_from(position.col()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.distances
            .get(row.checked_mul(width)?.checked_add(col)?)
            .copied()
            .flatten()
    }

    /// Reports whether the position can be reached from the field's source.
    #[must_use]
    pub fn is_reachable(&self, position: Position) -> bool {
        self.distance(position).is_some()
    }

    /// Number of reachable cells, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|entry| entry.is_some()).count()
    }
}

fn endpoint_index(grid: &Grid, position: Position) -> Result<usize, PathError> {
    let index = grid.index(position).ok_or(PathError::InvalidPosition {
        position,
        rows: grid.rows(),
        columns: grid.columns(),
    })?;

    if !grid.is_walkable(position) {
        return Err(PathError::BlockedEndpoint { position });
    }

    Ok(index)
}
