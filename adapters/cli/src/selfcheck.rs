//! Built-in fixture cases for the pathfinding and coordinate mapping cores.
//!
//! Every case returns its own [`CaseOutcome`]; the [`Report`] is assembled
//! from those values once all cases ran.

use std::fmt::Debug;

use capital_siege_core::{PathError, Position};
use capital_siege_rendering::{pixel_to_logical_tile_pos, LogicalTilePos, UnitTileUiInfo};
use capital_siege_system_pathfinding::find_path;
use capital_siege_world::Grid;
use glam::DVec2;

const FIXTURE_ROWS: [&str; 4] = ["WWKW", "KKKK", "KWKW", "KKKW"];

const L: f64 = 10.0;
const W: f64 = 8.0;
const DL: f64 = 20.0;
const DW: f64 = 16.0;
const TOP_LEFT: DVec2 = DVec2::new(100.0, 50.0);

type Check = fn() -> Result<(), String>;

/// Result of a single fixture case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CaseOutcome {
    /// Name of the case.
    pub(crate) name: &'static str,
    /// Description of the mismatch, if the case failed.
    pub(crate) failure: Option<String>,
}

impl CaseOutcome {
    fn from_check(name: &'static str, check: Check) -> Self {
        Self {
            name,
            failure: check().err(),
        }
    }

    /// Reports whether the case passed.
    pub(crate) fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Aggregated outcome of a self-check run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Report {
    outcomes: Vec<CaseOutcome>,
}

impl Report {
    /// Outcomes in execution order.
    pub(crate) fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    /// Number of passing cases.
    pub(crate) fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed()).count()
    }

    /// Number of failing cases.
    pub(crate) fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Reports whether every case passed.
    pub(crate) fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl FromIterator<CaseOutcome> for Report {
    fn from_iter<I: IntoIterator<Item = CaseOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Runs every built-in case.
pub(crate) fn run() -> Report {
    CASES
        .iter()
        .map(|&(name, check)| CaseOutcome::from_check(name, check))
        .collect()
}

const CASES: [(&str, Check); 13] = [
    ("path top to bottom", path_top_to_bottom),
    ("path bottom to top", path_bottom_to_top),
    ("path detours around wall", path_detour),
    ("path with identical endpoints", path_identical_endpoints),
    ("path from wall is blocked", path_blocked_endpoint),
    ("path outside grid is invalid", path_out_of_bounds),
    ("path to sealed cell is missing", path_unreachable),
    ("pixel at origin", pixel_origin),
    ("pixel at end of lead-in", pixel_lead_in),
    ("pixel one past lead-in", pixel_half_tile),
    ("pixel at end of span", pixel_full_tile),
    ("pixel past end of span", pixel_clamped),
    ("pixel several tiles away", pixel_distant),
];

fn expect_eq<T>(actual: T, expected: T) -> Result<(), String>
where
    T: PartialEq + Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, found {actual:?}"))
    }
}

fn fixture() -> Result<Grid, String> {
    Grid::from_symbol_rows(&FIXTURE_ROWS).map_err(|error| error.to_string())
}

fn cells(pairs: &[(u32, u32)]) -> Vec<Position> {
    pairs
        .iter()
        .map(|&(row, col)| Position::new(row, col))
        .collect()
}

fn path_cells(from: (u32, u32), to: (u32, u32)) -> Result<Vec<Position>, String> {
    let grid = fixture()?;
    find_path(
        &grid,
        Position::new(from.0, from.1),
        Position::new(to.0, to.1),
    )
    .map(|path| path.into_vec())
    .map_err(|error| error.to_string())
}

fn path_error(from: (u32, u32), to: (u32, u32)) -> Result<PathError, String> {
    let grid = fixture()?;
    match find_path(
        &grid,
        Position::new(from.0, from.1),
        Position::new(to.0, to.1),
    ) {
        Ok(path) => Err(format!("expected an error, found path {path}")),
        Err(error) => Ok(error),
    }
}

fn path_top_to_bottom() -> Result<(), String> {
    expect_eq(
        path_cells((0, 2), (3, 2))?,
        cells(&[(0, 2), (1, 2), (2, 2), (3, 2)]),
    )
}

fn path_bottom_to_top() -> Result<(), String> {
    expect_eq(
        path_cells((3, 2), (0, 2))?,
        cells(&[(3, 2), (2, 2), (1, 2), (0, 2)]),
    )
}

fn path_detour() -> Result<(), String> {
    expect_eq(
        path_cells((1, 1), (3, 2))?,
        cells(&[(1, 1), (1, 2), (2, 2), (3, 2)]),
    )
}

fn path_identical_endpoints() -> Result<(), String> {
    expect_eq(path_cells((3, 0), (3, 0))?, cells(&[(3, 0)]))
}

fn path_blocked_endpoint() -> Result<(), String> {
    expect_eq(
        path_error((0, 0), (1, 1))?,
        PathError::BlockedEndpoint {
            position: Position::new(0, 0),
        },
    )
}

fn path_out_of_bounds() -> Result<(), String> {
    expect_eq(
        path_error((1, 1), (1, 4))?,
        PathError::InvalidPosition {
            position: Position::new(1, 4),
            rows: 4,
            columns: 4,
        },
    )
}

fn path_unreachable() -> Result<(), String> {
    let grid = Grid::from_symbol_rows(&["KWK", "KWK"]).map_err(|error| error.to_string())?;
    let outcome = find_path(&grid, Position::new(0, 0), Position::new(1, 2));
    expect_eq(
        outcome,
        Err(PathError::NoPathFound {
            origin: Position::new(0, 0),
            destination: Position::new(1, 2),
        }),
    )
}

fn map_offset(x: f64, y: f64) -> Result<LogicalTilePos, String> {
    let info = UnitTileUiInfo::new(L, W, DL, DW, TOP_LEFT.x, TOP_LEFT.y)
        .map_err(|error| error.to_string())?;
    Ok(pixel_to_logical_tile_pos(TOP_LEFT + DVec2::new(x, y), &info))
}

fn pixel_origin() -> Result<(), String> {
    expect_eq(map_offset(0.0, 0.0)?, LogicalTilePos::new(0.0, 0.0))
}

fn pixel_lead_in() -> Result<(), String> {
    expect_eq(map_offset(L, W)?, LogicalTilePos::new(0.0, 0.0))
}

fn pixel_half_tile() -> Result<(), String> {
    expect_eq(map_offset(L + 1.0, W)?, LogicalTilePos::new(0.5, 0.0))
}

fn pixel_full_tile() -> Result<(), String> {
    expect_eq(map_offset(L + DL, W + DW)?, LogicalTilePos::new(1.0, 1.0))
}

fn pixel_clamped() -> Result<(), String> {
    expect_eq(
        map_offset(L + DL + 1.0, W + DW + 1.0)?,
        LogicalTilePos::new(1.0, 1.0),
    )
}

fn pixel_distant() -> Result<(), String> {
    expect_eq(
        map_offset(3.0 * (L + DL) + L - 3.0, 6.0 * (W + DW) + W - 7.0)?,
        LogicalTilePos::new(3.0, 6.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_cases_pass() {
        let report = run();

        let failures: Vec<_> = report
            .outcomes()
            .iter()
            .filter(|outcome| !outcome.passed())
            .collect();
        assert!(failures.is_empty(), "failing cases: {failures:?}");
        assert_eq!(report.passed(), CASES.len());
    }

    #[test]
    fn report_counts_failures() {
        let report: Report = [
            CaseOutcome::from_check("ok", || Ok(())),
            CaseOutcome::from_check("broken", || expect_eq(1, 2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(
            report.outcomes()[1].failure.as_deref(),
            Some("expected 2, found 1")
        );
    }
}
