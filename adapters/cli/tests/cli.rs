use std::{
    io::Write,
    path::PathBuf,
    process::{Command, Output},
};

fn fixture_scenario() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/fixture.toml")
}

fn capital_siege(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_capital-siege"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to invoke capital-siege binary")
}

#[test]
fn selfcheck_passes() {
    let output = capital_siege(&["selfcheck"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "selfcheck failed:\n{stdout}");
    assert!(stdout.contains("13 passed, 0 failed"));
}

#[test]
fn run_prints_fixture_paths_and_pixels() {
    let scenario = fixture_scenario();
    let output = capital_siege(&["run", "--scenario", scenario.to_str().expect("utf-8 path")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "run failed:\n{stdout}");
    assert!(stdout.contains("path (0, 2) -> (3, 2): (0, 2) -> (1, 2) -> (2, 2) -> (3, 2)"));
    assert!(stdout.contains("path (3, 2) -> (0, 2): (3, 2) -> (2, 2) -> (1, 2) -> (0, 2)"));
    assert!(stdout.contains("path (1, 1) -> (3, 2): (1, 1) -> (1, 2) -> (2, 2) -> (3, 2)"));
    assert!(stdout.contains("path (1, 1) -> (0, 0): endpoint (0, 0) is a wall"));
    assert!(stdout.contains("pixel (111.0, 58.0) -> tile (x=0.50, y=0.00) in cell (0, 0)"));
    assert!(stdout.contains("pixel (197.0, 195.0) -> tile (x=3.00, y=6.00) in cell (6, 3)"));
}

#[test]
fn path_accepts_explicit_endpoints() {
    let scenario = fixture_scenario();
    let output = capital_siege(&[
        "path",
        "--scenario",
        scenario.to_str().expect("utf-8 path"),
        "--from",
        "2,0",
        "--to",
        "3,2",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("steps: down, right, right"));
    assert!(!stdout.contains("path (0, 2)"));
}

#[test]
fn locate_reports_logical_position() {
    let scenario = fixture_scenario();
    let output = capital_siege(&[
        "locate",
        "--scenario",
        scenario.to_str().expect("utf-8 path"),
        "--x",
        "130",
        "--y",
        "74",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("tile (x=1.00, y=1.00) in cell (1, 1)"));
}

#[test]
fn malformed_scenario_is_fatal() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"grid = [\"KK\", \"K\"]\n")
        .expect("write scenario");

    let output = capital_siege(&[
        "run",
        "--scenario",
        file.path().to_str().expect("utf-8 path"),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("failed to parse scenario"));
}
