// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Integration tests for running recipe files
//!
//! Loads recipes from disk, runs them through the controller and checks the
//! notification stream a UI would see.

use sous_core::{
    ApplianceConfig, ApplianceState, Controller, Notification, Recipe, RecipeLoadError,
};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

const SOUP_TOML: &str = r#"
name = "Vegetable soup"
description = "Quick weeknight soup"
total_duration_seconds = 80
servings = 2

[[ingredients]]
name = "carrot"
quantity = 2
unit = "pcs"

[[ingredients]]
name = "salt"
quantity = 0
unit = "to taste"

[[steps]]
type = "cut"
operation = "dice"
duration_seconds = 20
speed = 6

[[steps]]
type = "temperature"
operation = "boil"
duration_seconds = 60
temperature_c = 100
"#;

const BREAD_JSON: &str = r#"{
  "name": "Flatbread",
  "steps": [
    {"type": "mechanical", "name": "knead", "duration_seconds": 30, "speed": 4},
    {"type": "temperature", "operation": "heat", "duration_seconds": 15, "temperature_c": 230}
  ]
}"#;

fn write_recipe(dir: &TempDir, file: &str, content: &str) -> PathBuf {
    let path = dir.path().join(file);
    std::fs::write(&path, content).unwrap();
    path
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

fn event_messages(notes: &[Notification]) -> Vec<&str> {
    notes
        .iter()
        .filter_map(|n| match n {
            Notification::Event(m) => Some(m.as_str()),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Full runs
// =============================================================================

#[tokio::test(start_paused = true)]
async fn toml_recipe_runs_to_completion() {
    let dir = TempDir::new().unwrap();
    let recipe = Recipe::load(write_recipe(&dir, "soup.toml", SOUP_TOML)).unwrap();
    assert_eq!(recipe.servings, 2);
    assert_eq!(recipe.ingredient_count(), 2);

    let controller = Controller::default();
    controller.power_on();
    let mut rx = controller.subscribe();

    assert!(controller.run_recipe(recipe).await.unwrap());

    let notes = drain(&mut rx);
    assert_eq!(
        event_messages(&notes),
        vec![
            "Recipe \"Vegetable soup\" prepared (2 steps)",
            "Starting recipe: Vegetable soup",
            "Starting Dice at speed 6",
            "Dice finished",
            "Starting Boil at 100°C",
            "Boil finished",
            "Recipe completed successfully",
        ]
    );

    let status = controller.status();
    assert_eq!(status.state, ApplianceState::Done);
    assert_eq!(status.recipe_progress, 100);
    assert_eq!((status.temperature_c, status.speed), (0, 0));
}

#[tokio::test(start_paused = true)]
async fn json_recipe_clamps_hot_step() {
    let dir = TempDir::new().unwrap();
    let recipe = Recipe::load(write_recipe(&dir, "bread.JSON", BREAD_JSON)).unwrap();

    let controller = Controller::default();
    controller.power_on();
    let mut rx = controller.subscribe();

    assert!(controller.run_recipe(recipe).await.unwrap());
    assert!(event_messages(&drain(&mut rx)).contains(&"Starting Heat at 200°C"));
}

#[tokio::test(start_paused = true)]
async fn compressed_timing_follows_config() {
    let config = ApplianceConfig::from_toml_str(
        r#"
step_settle = "1ms"

[simulator]
min_real_wait = "10ms"
speed_multiplier = 0.001
"#,
    )
    .unwrap();
    let controller = Controller::with_config(config);
    controller.power_on();

    let started = tokio::time::Instant::now();
    let recipe = Recipe::from_toml_str(SOUP_TOML).unwrap();
    assert!(controller.run_recipe(recipe).await.unwrap());

    // 20s and 60s at 0.001 take 20ms and 60ms, both above the floor
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(80), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(150), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn second_recipe_after_done() {
    let controller = Controller::default();
    controller.power_on();

    let soup = Recipe::from_toml_str(SOUP_TOML).unwrap();
    let bread = Recipe::from_json_str(BREAD_JSON).unwrap();
    assert!(controller.run_recipe(soup).await.unwrap());
    assert!(controller.run_recipe(bread).await.unwrap());
    assert_eq!(controller.status().active_recipe.as_deref(), Some("Flatbread"));
}

// =============================================================================
// Load errors
// =============================================================================

#[test]
fn load_rejects_unknown_step_type() {
    let dir = TempDir::new().unwrap();
    let path = write_recipe(
        &dir,
        "bad.toml",
        r#"
name = "Fried"
[[steps]]
type = "fry"
duration_seconds = 10
"#,
    );

    let err = Recipe::load(path).unwrap_err();
    assert!(matches!(err, RecipeLoadError::Invalid(_)), "{err}");
    assert!(err.to_string().contains("step 1"), "{err}");
}

#[test]
fn load_rejects_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_recipe(&dir, "soup.yaml", "name: soup");
    assert!(matches!(
        Recipe::load(path),
        Err(RecipeLoadError::UnsupportedFormat(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn run_stops_on_emergency_stop_and_recovers() {
    let controller = Controller::default();
    controller.power_on();

    let recipe = Recipe::from_toml_str(SOUP_TOML).unwrap();
    let handle = controller.spawn_recipe(recipe.clone()).unwrap();
    tokio::time::sleep(Duration::from_millis(700)).await;
    controller.emergency_stop();

    assert!(!handle.await.unwrap().unwrap());
    assert_eq!(controller.state(), ApplianceState::Idle);

    assert!(controller.run_recipe(recipe).await.unwrap());
}
