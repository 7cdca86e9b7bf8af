//! Recipe show specs

use crate::prelude::*;

#[test]
fn text_lists_metadata_ingredients_and_steps() {
    let project = Project::empty();
    project.file("soup.toml", SOUP_TOML);

    project
        .sous()
        .args(&["show", "soup.toml"])
        .passes()
        .stdout_eq(
            "Vegetable soup\n\
             Quick weeknight soup\n\
             Servings: 2 | Difficulty: Medium | Time: 1m 20s\n\
             \n\
             Ingredients:\n  \
             - 2 pcs of carrot\n  \
             - salt (to taste)\n\
             \n\
             Steps:\n  \
             1. cut Dice (20s, speed 6) - Dice the carrots\n  \
             2. temperature Boil (60s, 100°C, speed 1)\n",
        );
}

#[test]
fn text_shows_clamped_temperature() {
    let project = Project::empty();
    project.file("bread.json", BREAD_JSON);

    project
        .sous()
        .args(&["show", "bread.json"])
        .passes()
        .stdout_has("1. mechanical Knead (30s, speed 4)")
        .stdout_has("2. temperature Heat (15s, 200°C, speed 1)")
        .stdout_lacks("Ingredients:");
}

#[test]
fn json_round_trips_the_recipe() {
    let project = Project::empty();
    project.file("soup.toml", SOUP_TOML);

    let output = project
        .sous()
        .args(&["show", "soup.toml", "--format", "json"])
        .passes();
    let json: serde_json::Value = serde_json::from_str(output.stdout()).unwrap();

    assert_eq!(json["name"], "Vegetable soup");
    assert_eq!(json["servings"], 2);
    assert_eq!(json["steps"][0]["type"], "cut");
    assert_eq!(json["steps"][1]["temperature_c"], 100);
    assert_eq!(json["ingredients"][1]["unit"], "to taste");
}
