#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile grid for Capital Siege.
//!
//! The grid is a fixed-size rectangle of [`Tile`] values stored in row-major
//! order. It is validated once during construction and never changes shape
//! afterwards, so systems can borrow it freely while planning.

use std::fmt;

use capital_siege_core::{Direction, GridError, Position, Tile};
use serde::{Deserialize, Serialize};

/// Rectangular grid of tiles indexed `[row][col]` with row zero on top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Grid {
    rows: u32,
    columns: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a grid from nested rows of tiles.
    ///
    /// Fails when there are no rows, a row is empty, or the rows differ in
    /// length.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        let expected = match rows.first() {
            None => return Err(GridError::Empty),
            Some(first) if first.is_empty() => return Err(GridError::EmptyRow { row: 0 }),
            Some(first) => first.len(),
        };

        for (index, row) in rows.iter().enumerate() {
            if row.is_empty() {
                return Err(GridError::EmptyRow { row: index });
            }
            if row.len() != expected {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
        }

        let row_count = u32::try_from(rows.len()).map_err(|_| GridError::TooLarge(rows.len()))?;
        let column_count = u32::try_from(expected).map_err(|_| GridError::TooLarge(expected))?;
        let tiles: Vec<Tile> = rows.into_iter().flatten().collect();

        tracing::debug!(rows = row_count, columns = column_count, "grid constructed");

        Ok(Self {
            rows: row_count,
            columns: column_count,
            tiles,
        })
    }

    /// Builds a grid from rows of tile symbols such as `"WWKW"`.
    ///
    /// Whitespace inside a row is ignored so that `"W W K W"` is accepted too.
    pub fn from_symbol_rows<S>(rows: &[S]) -> Result<Self, GridError>
    where
        S: AsRef<str>,
    {
        let mut parsed = Vec::with_capacity(rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let mut tiles = Vec::new();
            for (col_index, symbol) in row
                .as_ref()
                .chars()
                .filter(|symbol| !symbol.is_whitespace())
                .enumerate()
            {
                let tile = Tile::from_symbol(symbol).ok_or(GridError::UnknownSymbol {
                    row: row_index,
                    col: col_index,
                    symbol,
                })?;
                tiles.push(tile);
            }
            parsed.push(tiles);
        }

        Self::from_rows(parsed)
    }

    /// Parses a multi-line map, one row per non-blank line.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_symbol_rows(&rows)
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the position lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row() < self.rows && position.col() < self.columns
    }

    /// Row-major offset of the position, if it lies within the grid.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }

        let row = usize::try_from(position.row()).ok()?;
        let col = usize::try_from(position.col()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }

    /// Position stored at the provided row-major offset.
    #[must_use]
    pub fn position_at(&self, index: usize) -> Option<Position> {
        if index >= self.tiles.len() {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let row = u32::try_from(index / width).ok()?;
        let col = u32::try_from(index % width).ok()?;
        Some(Position::new(row, col))
    }

    /// Tile stored at the position, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<Tile> {
        self.index(position)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the position is inside the grid and walkable.
    #[must_use]
    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_walkable)
    }

    /// In-bounds orthogonal neighbours in [`Direction::ALL`] order.
    ///
    /// Walls are included; callers filter on walkability.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> {
        let mut candidates = [None; 4];
        for (slot, direction) in candidates.iter_mut().zip(Direction::ALL) {
            *slot = position
                .step(direction)
                .filter(|&neighbor| self.contains(neighbor));
        }

        candidates.into_iter().flatten()
    }

    /// Iterator over the rows of the grid.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.tiles.chunks(width)
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_symbol_rows(&rows)
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.iter_rows()
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.iter_rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", tile.symbol())?;
            }
        }
        Ok(())
    }
}
