#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Capital Siege engine.
//!
//! This crate defines the value types that flow between the grid model, the
//! pathfinding system and the adapters. Everything here is plain data with
//! structural equality so that callers and tests can compare results
//! directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as row and column indices.
///
/// Row zero is the top of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    col: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Reports whether `other` lies exactly one orthogonal step away.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Moves one cell in the provided direction.
    ///
    /// Returns `None` when the step would leave the unsigned coordinate space.
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Position> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(row, self.col)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(row, self.col)),
            Direction::Left => self.col.checked_sub(1).map(|col| Self::new(self.row, col)),
            Direction::Right => self.col.checked_add(1).map(|col| Self::new(self.row, col)),
        }
    }

    /// Direction of the single step leading from `self` to `other`, if the
    /// two positions are 4-adjacent.
    #[must_use]
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.step(direction) == Some(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cardinal movement directions available to units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Neighbour expansion order used by every search over the grid.
    ///
    /// Changing the order changes which of several equally short paths is
    /// returned.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Short lowercase label used in logs and CLI output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable cell.
    Wall,
    /// Cell units may stand on and traverse.
    Walkable,
}

impl Tile {
    /// Reports whether units may traverse the tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Walkable)
    }

    /// Parses a tile from its map symbol.
    ///
    /// `W` and `#` denote walls, `K` and `.` walkable ground.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'W' | '#' => Some(Self::Wall),
            'K' | '.' => Some(Self::Walkable),
            _ => None,
        }
    }

    /// Canonical map symbol for the tile.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => 'W',
            Self::Walkable => 'K',
        }
    }
}

/// Ordered sequence of positions from a source to a destination, both
/// inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    positions: Vec<Position>,
}

impl Path {
    /// Wraps an ordered list of positions.
    ///
    /// Callers are expected to provide orthogonally adjacent positions; use
    /// [`Path::is_contiguous`] to verify externally sourced data.
    #[must_use]
    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Path consisting of a single position.
    #[must_use]
    pub fn single(position: Position) -> Self {
        Self {
            positions: vec![position],
        }
    }

    /// First position of the path.
    #[must_use]
    pub fn source(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    /// Last position of the path.
    #[must_use]
    pub fn destination(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// Number of positions, endpoints included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether the path holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of steps needed to walk the path.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// Positions in walking order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Iterator over the positions in walking order.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    /// Directions a unit takes to walk the path.
    ///
    /// Pairs that are not adjacent are skipped, which never happens for paths
    /// produced by the pathfinding system.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.positions
            .windows(2)
            .filter_map(|pair| pair[0].direction_to(pair[1]))
    }

    /// Reports whether every consecutive pair is 4-adjacent.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.positions
            .windows(2)
            .all(|pair| pair[0].is_adjacent(pair[1]))
    }

    /// Consumes the path, yielding the underlying positions.
    #[must_use]
    pub fn into_vec(self) -> Vec<Position> {
        self.positions
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, position) in self.positions.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{position}")?;
        }
        Ok(())
    }
}

/// Reasons a path request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PathError {
    /// The position lies outside the grid bounds.
    #[error("position {position} lies outside the {rows}x{columns} grid")]
    InvalidPosition {
        /// Offending position.
        position: Position,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
    /// The source or destination tile is a wall.
    #[error("endpoint {position} is a wall")]
    BlockedEndpoint {
        /// Endpoint that landed on a wall.
        position: Position,
    },
    /// No walkable route connects the endpoints.
    #[error("no walkable route from {origin} to {destination}")]
    NoPathFound {
        /// Requested source.
        origin: Position,
        /// Requested destination.
        destination: Position,
    },
}

/// Reasons a grid description may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The description contained no rows.
    #[error("grid must contain at least one row")]
    Empty,
    /// A row contained no tiles.
    #[error("row {row} contains no tiles")]
    EmptyRow {
        /// Index of the empty row.
        row: usize,
    },
    /// A row's length differs from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Index of the ragged row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A symbol did not name a known tile.
    #[error("unknown tile symbol '{symbol}' at row {row}, column {col}")]
    UnknownSymbol {
        /// Row containing the symbol.
        row: usize,
        /// Column containing the symbol.
        col: usize,
        /// Unrecognised symbol.
        symbol: char,
    },
    /// The grid is too large to be addressed with `u32` coordinates.
    #[error("grid dimension {0} exceeds the addressable range")]
    TooLarge(usize),
}

#[cfg(test)]
mod tests {
    use super::{Direction, Path, PathError, Position, Tile};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(3, 4);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_wrap_below_zero() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(corner.step(Direction::Right), Some(Position::new(0, 1)));
    }

    #[test]
    fn direction_to_only_reports_adjacent_cells() {
        let center = Position::new(2, 2);
        assert_eq!(
            center.direction_to(Position::new(1, 2)),
            Some(Direction::Up)
        );
        assert_eq!(
            center.direction_to(Position::new(2, 3)),
            Some(Direction::Right)
        );
        assert_eq!(center.direction_to(Position::new(3, 3)), None);
        assert_eq!(center.direction_to(center), None);
    }

    #[test]
    fn tile_symbols_accept_both_alphabets() {
        assert_eq!(Tile::from_symbol('W'), Some(Tile::Wall));
        assert_eq!(Tile::from_symbol('#'), Some(Tile::Wall));
        assert_eq!(Tile::from_symbol('K'), Some(Tile::Walkable));
        assert_eq!(Tile::from_symbol('.'), Some(Tile::Walkable));
        assert_eq!(Tile::from_symbol('x'), None);
        assert_eq!(Tile::Wall.symbol(), 'W');
    }

    #[test]
    fn path_reports_directions_and_contiguity() {
        let path = Path::from_positions(vec![
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(2, 2),
        ]);

        assert!(path.is_contiguous());
        assert_eq!(path.step_count(), 2);
        assert_eq!(
            path.directions().collect::<Vec<_>>(),
            vec![Direction::Right, Direction::Down]
        );
        assert_eq!(path.to_string(), "(1, 1) -> (1, 2) -> (2, 2)");

        let broken = Path::from_positions(vec![Position::new(0, 0), Position::new(1, 1)]);
        assert!(!broken.is_contiguous());
    }

    #[test]
    fn single_position_path_has_matching_endpoints() {
        let path = Path::single(Position::new(4, 7));
        assert_eq!(path.source(), path.destination());
        assert_eq!(path.step_count(), 0);
        assert!(!path.is_empty());
    }

    #[test]
    fn path_error_messages_name_the_positions() {
        let error = PathError::NoPathFound {
            origin: Position::new(0, 0),
            destination: Position::new(3, 1),
        };
        assert_eq!(
            error.to_string(),
            "no walkable route from (0, 0) to (3, 1)"
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn path_round_trips_through_bincode() {
        let path = Path::from_positions(vec![Position::new(3, 2), Position::new(2, 2)]);
        assert_round_trip(&path);
    }

    #[test]
    fn path_error_round_trips_through_bincode() {
        assert_round_trip(&PathError::BlockedEndpoint {
            position: Position::new(0, 1),
        });
    }
}
