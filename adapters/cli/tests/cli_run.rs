use std::{path::PathBuf, process::Command};

fn sample_scenario() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join("skirmish.toml")
}

fn skirmish(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_skirmish"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch skirmish binary")
}

#[test]
fn sample_scenario_plays_to_a_summary() {
    let scenario = sample_scenario();
    let output = skirmish(&["--scenario", scenario.to_str().expect("utf-8 path")]);

    assert!(
        output.status.success(),
        "skirmish failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    let initial = "Initial board\n\
                   ........\n\
                   .P.#..p.\n\
                   X..#...s\n\
                   .B.##...\n\
                   S.....p.\n\
                   ........\n";
    assert!(stdout.starts_with(initial), "unexpected board:\n{stdout}");
    assert!(stdout.contains("Round 1: Enemy"));
    assert!(stdout.contains("wins after") || stdout.contains("Draw after"));
}

#[test]
fn round_flag_overrides_the_scenario() {
    let scenario = sample_scenario();
    let output = skirmish(&[
        "--scenario",
        scenario.to_str().expect("utf-8 path"),
        "--rounds",
        "1",
        "--first-team",
        "ally",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(stdout.contains("Round 1: Ally"));
    assert!(!stdout.contains("Round 2"));
}

#[test]
fn missing_scenario_file_fails() {
    let output = skirmish(&["--scenario", "does/not/exist.toml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load"), "stderr was: {stderr}");
}
