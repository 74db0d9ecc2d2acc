#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that exercises the Capital Siege core.

mod scenario;
mod selfcheck;

use std::{collections::HashSet, path::PathBuf};

use anyhow::{bail, Result};
use capital_siege_core::{Path, Position};
use capital_siege_rendering::pixel_to_logical_tile_pos;
use capital_siege_system_pathfinding::PathFinder;
use capital_siege_world::Grid;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::scenario::{parse_position, PathRequest, PixelQuery, Scenario};

/// Pathfinding and unit placement tools for Capital Siege maps.
#[derive(Debug, Parser)]
#[command(name = "capital-siege", version)]
struct Cli {
    /// Emit debug diagnostics on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Finds paths for the scenario's requests or for a single pair of cells.
    Path {
        /// Scenario file describing the grid.
        #[arg(long)]
        scenario: PathBuf,
        /// Source cell as `row,col`.
        #[arg(long, value_parser = parse_position, requires = "to")]
        from: Option<Position>,
        /// Destination cell as `row,col`.
        #[arg(long, value_parser = parse_position, requires = "from")]
        to: Option<Position>,
    },
    /// Converts a display pixel into a logical tile position.
    Locate {
        /// Scenario file providing the `[ui]` geometry.
        #[arg(long)]
        scenario: PathBuf,
        /// Horizontal pixel coordinate.
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        /// Vertical pixel coordinate.
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Executes every path request and pixel query in a scenario.
    Run {
        /// Scenario file to execute.
        #[arg(long)]
        scenario: PathBuf,
    },
    /// Runs the built-in fixture cases.
    Selfcheck,
}

/// Entry point for the Capital Siege command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        CliCommand::Path { scenario, from, to } => {
            let scenario = Scenario::load(&scenario)?;
            let requests = match (from, to) {
                (Some(from), Some(to)) => vec![PathRequest { from, to }],
                _ => scenario.paths.clone(),
            };
            if requests.is_empty() {
                bail!("scenario defines no path requests; pass --from and --to");
            }
            let failed = run_paths(&scenario.grid, &requests);
            tracing::debug!(requests = requests.len(), failed, "path requests complete");
        }
        CliCommand::Locate { scenario, x, y } => {
            let scenario = Scenario::load(&scenario)?;
            run_pixels(&scenario, &[PixelQuery::new(x, y)])?;
        }
        CliCommand::Run { scenario } => {
            let scenario = Scenario::load(&scenario)?;
            let failed = run_paths(&scenario.grid, &scenario.paths);
            if !scenario.pixels.is_empty() {
                run_pixels(&scenario, &scenario.pixels)?;
            }
            tracing::info!(
                paths = scenario.paths.len(),
                failed_paths = failed,
                pixels = scenario.pixels.len(),
                "scenario complete"
            );
        }
        CliCommand::Selfcheck => {
            let report = selfcheck::run();
            for outcome in report.outcomes() {
                match &outcome.failure {
                    None => println!("ok   {}", outcome.name),
                    Some(failure) => println!("FAIL {}: {failure}", outcome.name),
                }
            }
            println!("{} passed, {} failed", report.passed(), report.failed());
            if !report.is_success() {
                bail!("{} self-check case(s) failed", report.failed());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Prints the outcome of each request and returns the number that failed.
fn run_paths(grid: &Grid, requests: &[PathRequest]) -> usize {
    let mut finder = PathFinder::new();
    let mut failed = 0;

    for request in requests {
        match finder.find(grid, request.from, request.to) {
            Ok(path) => {
                println!("path {} -> {}: {path}", request.from, request.to);
                let steps: Vec<_> = path.directions().map(|direction| direction.label()).collect();
                if !steps.is_empty() {
                    println!("steps: {}", steps.join(", "));
                }
                println!("{}", overlay(grid, &path));
            }
            Err(error) => {
                failed += 1;
                tracing::warn!(from = %request.from, to = %request.to, %error, "path request failed");
                println!("path {} -> {}: {error}", request.from, request.to);
            }
        }
    }

    failed
}

fn run_pixels(scenario: &Scenario, queries: &[PixelQuery]) -> Result<()> {
    let info = scenario.ui()?;
    tracing::debug!(
        l = info.l(),
        w = info.w(),
        dl = info.dl(),
        dw = info.dw(),
        "unit tile geometry"
    );

    for query in queries {
        let pixel = query.pixel();
        let logical = pixel_to_logical_tile_pos(pixel, info);
        let prefix = format!(
            "pixel ({:.1}, {:.1}) -> tile (x={:.2}, y={:.2})",
            pixel.x, pixel.y, logical.x, logical.y
        );
        match logical.cell() {
            Some(cell) => {
                println!("{prefix} in cell {cell}");
                if !scenario.grid.contains(cell) {
                    tracing::warn!(%cell, "pixel maps outside the grid");
                }
            }
            None => {
                println!("{prefix} beyond addressable cells");
                tracing::warn!(x = logical.x, y = logical.y, "pixel maps beyond addressable cells");
            }
        }
    }

    Ok(())
}

/// Renders the grid with the path drawn over it.
///
/// `S` marks the source, `D` the destination and `*` the cells in between.
fn overlay(grid: &Grid, path: &Path) -> String {
    let on_path: HashSet<Position> = path.iter().copied().collect();
    let source = path.source();
    let destination = path.destination();
    let mut rendered = String::new();

    let cells = (0..grid.cell_count()).filter_map(|index| grid.position_at(index));
    for cell in cells {
        if cell.col() == 0 && cell.row() > 0 {
            rendered.push('\n');
        }
        let symbol = if Some(cell) == source {
            'S'
        } else if Some(cell) == destination {
            'D'
        } else if on_path.contains(&cell) {
            '*'
        } else {
            grid.tile(cell).map_or('?', |tile| tile.symbol())
        };
        rendered.push(symbol);
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_marks_path_cells() {
        let grid = Grid::from_symbol_rows(&["WWKW", "KKKK", "KWKW", "KKKW"]).expect("grid");
        let mut finder = PathFinder::new();
        let path = finder
            .find(&grid, Position::new(1, 1), Position::new(3, 2))
            .expect("path");

        assert_eq!(overlay(&grid, &path), "WWKW\nKS*K\nKW*W\nKKDW");
    }

    #[test]
    fn overlay_covers_every_row_of_a_wide_grid() {
        let row = "K".repeat(300);
        let grid = Grid::from_symbol_rows(&[row.as_str(), row.as_str()]).expect("grid");
        let mut finder = PathFinder::new();
        let path = finder
            .find(&grid, Position::new(0, 0), Position::new(1, 299))
            .expect("path");

        let rendered = overlay(&grid, &path);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.chars().count() == 300));
        assert!(lines[0].starts_with('S'));
        assert!(lines[1].ends_with('D'));
    }

    #[test]
    fn cli_accepts_fractional_pixels() {
        let cli = Cli::try_parse_from([
            "capital-siege",
            "locate",
            "--scenario",
            "map.toml",
            "--x",
            "117.3",
            "--y",
            "-2.5",
        ])
        .expect("arguments parse");

        match cli.command {
            CliCommand::Locate { x, y, .. } => {
                assert_eq!(x, 117.3);
                assert_eq!(y, -2.5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parses_path_pairs() {
        let cli = Cli::try_parse_from([
            "capital-siege",
            "path",
            "--scenario",
            "map.toml",
            "--from",
            "0,2",
            "--to",
            "3,2",
        ])
        .expect("arguments parse");

        match cli.command {
            CliCommand::Path { from, to, .. } => {
                assert_eq!(from, Some(Position::new(0, 2)));
                assert_eq!(to, Some(Position::new(3, 2)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_requires_both_endpoints() {
        assert!(Cli::try_parse_from([
            "capital-siege",
            "path",
            "--scenario",
            "map.toml",
            "--from",
            "0,2",
        ])
        .is_err());
    }
}
