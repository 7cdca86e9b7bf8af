//! Help and usage specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .sous()
        .args(&["--help"])
        .passes()
        .stdout_has("check")
        .stdout_has("show")
        .stdout_has("run");
}

#[test]
fn unknown_command_fails() {
    Project::empty()
        .sous()
        .args(&["bake"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn run_requires_a_recipe() {
    Project::empty()
        .sous()
        .args(&["run"])
        .fails()
        .stderr_has("<RECIPE>");
}

#[test]
fn version_names_the_binary() {
    Project::empty()
        .sous()
        .args(&["--version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("sous "));
}

#[test]
fn completions_generate_for_bash() {
    Project::empty()
        .sous()
        .args(&["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_sous()").and(predicate::str::contains("completions")));
}

#[test]
fn completions_reject_unknown_shell() {
    Project::empty()
        .sous()
        .args(&["completions", "tcsh"])
        .fails()
        .stderr_has("invalid value 'tcsh'");
}
