use std::{fs, path::Path};

use anyhow::{Context, Result};
use capital_siege_core::Position;
use capital_siege_rendering::UnitTileUiInfo;
use capital_siege_world::Grid;
use glam::DVec2;
use serde::Deserialize;

/// Map, rendering geometry and queries loaded from a TOML scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Tile grid the queries run against.
    pub(crate) grid: Grid,
    /// Unit-rendering geometry used by pixel queries.
    #[serde(default)]
    ui: Option<UnitTileUiInfo>,
    /// Path requests issued by `run` and `path`.
    #[serde(default)]
    pub(crate) paths: Vec<PathRequest>,
    /// Pixels converted by `run`.
    #[serde(default)]
    pub(crate) pixels: Vec<PixelQuery>,
}

impl Scenario {
    /// Loads and validates the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        let scenario = Self::parse(&contents)
            .with_context(|| format!("failed to parse scenario at {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            rows = scenario.grid.rows(),
            columns = scenario.grid.columns(),
            paths = scenario.paths.len(),
            pixels = scenario.pixels.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid scenario toml")
    }

    /// Rendering geometry, required by pixel queries.
    pub(crate) fn ui(&self) -> Result<&UnitTileUiInfo> {
        self.ui
            .as_ref()
            .context("scenario has no [ui] table describing the unit-rendering area")
    }
}

/// Source and destination of a single path request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PathRequest {
    /// Cell the unit starts on.
    pub(crate) from: Position,
    /// Cell the unit should reach.
    pub(crate) to: Position,
}

/// Display pixel to convert into tile space.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PixelQuery {
    x: f64,
    y: f64,
}

impl PixelQuery {
    /// Creates a query for the provided pixel.
    pub(crate) const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Query coordinates as a vector.
    pub(crate) fn pixel(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// Parses a `row,col` pair supplied on the command line.
pub(crate) fn parse_position(value: &str) -> Result<Position, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, received '{value}'"))?;

    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row '{row}': {error}"))?;
    let col = col
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column '{col}': {error}"))?;

    Ok(Position::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../scenarios/fixture.toml");

    #[test]
    fn bundled_fixture_parses() {
        let scenario = Scenario::parse(FIXTURE).expect("fixture scenario parses");

        assert_eq!(scenario.grid.rows(), 4);
        assert_eq!(scenario.grid.columns(), 4);
        assert_eq!(scenario.paths.len(), 4);
        assert_eq!(
            scenario.paths[0],
            PathRequest {
                from: Position::new(0, 2),
                to: Position::new(3, 2),
            }
        );
        assert_eq!(scenario.pixels[0], PixelQuery::new(111.0, 58.0));
        assert!(scenario.ui().is_ok());
    }

    #[test]
    fn optional_tables_default_to_empty() {
        let scenario = Scenario::parse(r#"grid = ["KK"]"#).expect("minimal scenario parses");

        assert!(scenario.paths.is_empty());
        assert!(scenario.pixels.is_empty());
        assert!(scenario.ui().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = Scenario::parse(
            r#"
            grid = ["KK"]
            units = 3
            "#,
        )
        .expect_err("unknown key must be rejected");

        assert!(format!("{error:#}").contains("unknown field"));
    }

    #[test]
    fn invalid_grid_is_reported() {
        let error = Scenario::parse(r#"grid = ["KK", "KQ"]"#).expect_err("bad symbol");

        assert!(format!("{error:#}").contains("unknown tile symbol 'Q'"));
    }

    #[test]
    fn parse_position_accepts_row_col_pairs() {
        assert_eq!(parse_position("3, 2"), Ok(Position::new(3, 2)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,2").is_err());
        assert!(parse_position("-1,2").is_err());
    }
}
