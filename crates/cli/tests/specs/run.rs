//! Recipe run specs

use crate::prelude::*;

fn project_with_soup() -> Project {
    let project = Project::empty();
    project.file("soup.toml", SOUP_TOML);
    project.file("fast.toml", FAST_CONFIG);
    project
}

#[test]
fn run_prints_events_and_completes() {
    project_with_soup()
        .sous()
        .args(&["run", "soup.toml", "--config", "fast.toml"])
        .passes()
        .stdout_has("Appliance powered on and ready")
        .stdout_has("Recipe \"Vegetable soup\" prepared (2 steps)")
        .stdout_has("[running]")
        .stdout_has("Starting Dice at speed 6")
        .stdout_has("Dice finished")
        .stdout_has("Starting Boil at 100°C")
        .stdout_has("Recipe completed successfully")
        .stdout_has("[done]")
        .stdout_has("100%")
        .stdout_has("Recipe completed (2/2 steps, 100%)");
}

#[test]
fn quiet_prints_only_the_summary() {
    project_with_soup()
        .sous()
        .args(&["run", "soup.toml", "--config", "fast.toml", "--quiet"])
        .passes()
        .stdout_eq("Recipe completed (2/2 steps, 100%)\n");
}

#[test]
fn json_streams_notifications_then_status() {
    let output = project_with_soup()
        .sous()
        .args(&["run", "soup.toml", "--config", "fast.toml", "--format", "json"])
        .passes();

    let stdout = output.stdout();
    let first_line = stdout.lines().next().unwrap();
    let first: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(first["kind"], "state_changed");
    assert_eq!(first["value"], "idle");

    assert!(stdout.contains(r#"{"kind":"event","value":"Recipe completed successfully"}"#));

    // The final status is pretty-printed after the stream
    let status_start = stdout.find("{\n").unwrap();
    let status: serde_json::Value = serde_json::from_str(&stdout[status_start..]).unwrap();
    assert_eq!(status["state"], "done");
    assert_eq!(status["recipe_progress"], 100);
    assert_eq!(status["temperature_c"], 0);
}

#[test]
fn invalid_step_ends_in_error() {
    let project = Project::empty();
    project.file("fast.toml", FAST_CONFIG);
    project.file(
        "steam.toml",
        r#"
name = "Greens"
[[steps]]
type = "temperature"
operation = "steam"
duration_seconds = 10
temperature_c = 90
"#,
    );
    project.file("strict.toml", &format!("strict_steam = true\n{FAST_CONFIG}"));

    project
        .sous()
        .args(&["run", "steam.toml", "--config", "fast.toml", "--quiet"])
        .passes();

    project
        .sous()
        .args(&["run", "steam.toml", "--config", "strict.toml"])
        .fails()
        .stdout_has("Error: invalid task: steaming requires 100°C")
        .stdout_has("[error]")
        .stdout_has("Recipe failed (0/1 steps");
}

#[test]
fn speed_multiplier_flag_is_validated() {
    project_with_soup()
        .sous()
        .args(&["run", "soup.toml", "--speed-multiplier", "0"])
        .fails()
        .stderr_has("speed multiplier must be a positive number");
}

#[test]
fn bad_config_fails_before_running() {
    let project = project_with_soup();
    project.file("broken.toml", "[simulator]\nmin_ticks = 0\n");

    project
        .sous()
        .args(&["run", "soup.toml", "--config", "broken.toml"])
        .fails()
        .stderr_has("cannot load config 'broken.toml'")
        .stdout_lacks("powered on");
}

#[test]
fn log_filter_enables_engine_tracing() {
    project_with_soup()
        .sous()
        .env("SOUS_LOG", "sous_core=info")
        .args(&["run", "soup.toml", "--config", "fast.toml", "--quiet"])
        .passes()
        .stderr_has("state transition")
        .stderr_has("recipe completed");
}
