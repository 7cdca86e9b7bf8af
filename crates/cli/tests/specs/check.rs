//! Recipe check specs

use crate::prelude::*;

#[test]
fn valid_toml_recipe_passes() {
    let project = Project::empty();
    project.file("soup.toml", SOUP_TOML);

    project
        .sous()
        .args(&["check", "soup.toml"])
        .passes()
        .stdout_eq("ok: Vegetable soup (1m 20s, 2 steps)\n");
}

#[test]
fn valid_json_recipe_passes() {
    let project = Project::empty();
    project.file("bread.json", BREAD_JSON);

    project
        .sous()
        .args(&["check", "bread.json"])
        .passes()
        .stdout_has("ok: Flatbread");
}

#[test]
fn unknown_step_type_fails() {
    let project = Project::empty();
    project.file(
        "fried.toml",
        r#"
name = "Fried"
[[steps]]
type = "fry"
duration_seconds = 10
"#,
    );

    project
        .sous()
        .args(&["check", "fried.toml"])
        .fails()
        .stderr_has("cannot load recipe 'fried.toml'")
        .stderr_has("step 1");
}

#[test]
fn zero_duration_fails() {
    let project = Project::empty();
    project.file(
        "instant.toml",
        r#"
name = "Instant"
[[steps]]
type = "cut"
duration_seconds = 0
"#,
    );

    project
        .sous()
        .args(&["check", "instant.toml"])
        .fails()
        .stderr_has("duration must be greater than 0");
}

#[test]
fn empty_recipe_fails() {
    let project = Project::empty();
    project.file("empty.json", r#"{"name": "Nothing", "steps": []}"#);

    project
        .sous()
        .args(&["check", "empty.json"])
        .fails()
        .stderr_has("has no steps");
}

#[test]
fn missing_file_fails() {
    Project::empty()
        .sous()
        .args(&["check", "nope.toml"])
        .fails()
        .stderr_has("cannot load recipe 'nope.toml'");
}

#[test]
fn unsupported_extension_fails() {
    let project = Project::empty();
    project.file("soup.yaml", "name: soup\n");

    project
        .sous()
        .args(&["check", "soup.yaml"])
        .fails()
        .stderr_has(".toml or .json");
}
