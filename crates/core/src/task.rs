// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Physical operations executed by the appliance
//!
//! A task is built fresh from each recipe step, validated, applied to the
//! appliance setpoints, and discarded once the step finishes. Construction
//! clamps temperature and speed into range; it never rejects them.

use crate::error::ApplianceError;
use crate::recipe::StepSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_TEMPERATURE_C: u16 = 0;
pub const MAX_TEMPERATURE_C: u16 = 200;
pub const MIN_SPEED: u8 = 0;
pub const MAX_SPEED: u8 = 10;
/// Blades and paddles never run below this speed
pub const MIN_MOTOR_SPEED: u8 = 1;
pub const STEAM_TEMPERATURE_C: u16 = 100;

const DEFAULT_CUT_SPEED: i32 = 5;
const DEFAULT_TEMPERATURE_C: i32 = 100;
const DEFAULT_HEATING_SPEED: i32 = 1;
const DEFAULT_MECHANICAL_SPEED: i32 = 5;
const DEFAULT_MECHANICAL_NAME: &str = "Mix";

/// Device setpoints driven by tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setpoints {
    pub temperature_c: u16,
    pub speed: u8,
}

/// Family of a task, selected by the step `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Cut,
    Temperature,
    Mechanical,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Cut => "cut",
            TaskKind::Temperature => "temperature",
            TaskKind::Mechanical => "mechanical",
        }
    }
}

impl FromStr for TaskKind {
    type Err = ApplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cut" => Ok(TaskKind::Cut),
            "temperature" => Ok(TaskKind::Temperature),
            "mechanical" => Ok(TaskKind::Mechanical),
            other => Err(ApplianceError::InvalidTask(format!(
                "unknown task type: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named operations understood by the appliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    // Cutting
    Chop,
    Dice,
    Crush,
    Grate,
    // Heating
    Saute,
    Boil,
    Steam,
    Heat,
    // Mechanical
    Knead,
    Mix,
    Beat,
    Stir,
}

impl Operation {
    /// The task family this operation belongs to
    pub fn kind(self) -> TaskKind {
        use Operation::*;

        match self {
            Chop | Dice | Crush | Grate => TaskKind::Cut,
            Saute | Boil | Steam | Heat => TaskKind::Temperature,
            Knead | Mix | Beat | Stir => TaskKind::Mechanical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Chop => "chop",
            Operation::Dice => "dice",
            Operation::Crush => "crush",
            Operation::Grate => "grate",
            Operation::Saute => "saute",
            Operation::Boil => "boil",
            Operation::Steam => "steam",
            Operation::Heat => "heat",
            Operation::Knead => "knead",
            Operation::Mix => "mix",
            Operation::Beat => "beat",
            Operation::Stir => "stir",
        }
    }

    /// Capitalized display name, e.g. "Chop"
    pub fn label(self) -> String {
        title_case(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ApplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "chop" => Operation::Chop,
            "dice" => Operation::Dice,
            "crush" => Operation::Crush,
            "grate" => Operation::Grate,
            "saute" => Operation::Saute,
            "boil" => Operation::Boil,
            "steam" => Operation::Steam,
            "heat" => Operation::Heat,
            "knead" => Operation::Knead,
            "mix" => Operation::Mix,
            "beat" => Operation::Beat,
            "stir" => Operation::Stir,
            other => {
                return Err(ApplianceError::InvalidTask(format!(
                    "unknown operation: {other:?}"
                )))
            }
        };
        Ok(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional validation rules layered on top of the universal ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskRules {
    /// Steaming must run at exactly 100°C
    pub strict_steam: bool,
}

/// One physical operation with its duration and setpoints
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Cut {
        operation: Operation,
        duration_s: u32,
        speed: u8,
        description: Option<String>,
    },
    Temperature {
        operation: Operation,
        duration_s: u32,
        temperature_c: u16,
        speed: u8,
        description: Option<String>,
    },
    Mechanical {
        name: String,
        duration_s: u32,
        speed: u8,
        description: Option<String>,
    },
}

impl Task {
    /// Cutting task; speed is clamped to [1, 10]
    pub fn cut(operation: Operation, duration_s: u32, speed: i32) -> Self {
        Task::Cut {
            operation,
            duration_s,
            speed: clamp_speed(speed, MIN_MOTOR_SPEED),
            description: None,
        }
    }

    /// Heating task; temperature is clamped to [0, 200] and speed to [0, 10]
    pub fn temperature(
        operation: Operation,
        duration_s: u32,
        temperature_c: i32,
        speed: i32,
    ) -> Self {
        let temperature_c = temperature_c.clamp(MIN_TEMPERATURE_C as i32, MAX_TEMPERATURE_C as i32);
        Task::Temperature {
            operation,
            duration_s,
            temperature_c: temperature_c as u16,
            speed: clamp_speed(speed, MIN_SPEED),
            description: None,
        }
    }

    /// Mechanical task; speed is clamped to [1, 10]
    pub fn mechanical(name: &str, duration_s: u32, speed: i32) -> Self {
        Task::Mechanical {
            name: title_case(name),
            duration_s,
            speed: clamp_speed(speed, MIN_MOTOR_SPEED),
            description: None,
        }
    }

    pub fn with_description(mut self, text: Option<String>) -> Self {
        match &mut self {
            Task::Cut { description, .. }
            | Task::Temperature { description, .. }
            | Task::Mechanical { description, .. } => *description = text,
        }
        self
    }

    /// Build a task from a recipe step
    ///
    /// The step `type` maps onto exactly one variant; anything else is an
    /// `InvalidTask` error. Missing optional fields fall back to per-kind
    /// defaults.
    pub fn from_step(step: &StepSpec) -> Result<Task, ApplianceError> {
        let kind: TaskKind = step.kind.parse()?;
        let description = step.description.clone();

        let task = match kind {
            TaskKind::Cut => {
                let operation = parse_operation(step.operation.as_deref(), Operation::Chop)?;
                Task::cut(
                    operation,
                    step.duration_seconds,
                    step.speed.unwrap_or(DEFAULT_CUT_SPEED),
                )
            }
            TaskKind::Temperature => {
                let operation = parse_operation(step.operation.as_deref(), Operation::Boil)?;
                Task::temperature(
                    operation,
                    step.duration_seconds,
                    step.temperature_c.unwrap_or(DEFAULT_TEMPERATURE_C),
                    step.speed.unwrap_or(DEFAULT_HEATING_SPEED),
                )
            }
            TaskKind::Mechanical => {
                let name = step
                    .name
                    .as_deref()
                    .or(step.operation.as_deref())
                    .unwrap_or(DEFAULT_MECHANICAL_NAME);
                Task::mechanical(
                    name,
                    step.duration_seconds,
                    step.speed.unwrap_or(DEFAULT_MECHANICAL_SPEED),
                )
            }
        };

        Ok(task.with_description(description))
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Cut { .. } => TaskKind::Cut,
            Task::Temperature { .. } => TaskKind::Temperature,
            Task::Mechanical { .. } => TaskKind::Mechanical,
        }
    }

    /// Display name of the operation
    pub fn name(&self) -> String {
        match self {
            Task::Cut { operation, .. } | Task::Temperature { operation, .. } => operation.label(),
            Task::Mechanical { name, .. } => name.clone(),
        }
    }

    pub fn duration_s(&self) -> u32 {
        match self {
            Task::Cut { duration_s, .. }
            | Task::Temperature { duration_s, .. }
            | Task::Mechanical { duration_s, .. } => *duration_s,
        }
    }

    pub fn speed(&self) -> u8 {
        match self {
            Task::Cut { speed, .. }
            | Task::Temperature { speed, .. }
            | Task::Mechanical { speed, .. } => *speed,
        }
    }

    /// Target temperature, only for heating tasks
    pub fn temperature_c(&self) -> Option<u16> {
        match self {
            Task::Temperature { temperature_c, .. } => Some(*temperature_c),
            Task::Cut { .. } | Task::Mechanical { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Task::Cut { description, .. }
            | Task::Temperature { description, .. }
            | Task::Mechanical { description, .. } => description.as_deref(),
        }
    }

    /// Validate with the universal rules only
    pub fn validate(&self) -> Result<(), String> {
        self.validate_with(&TaskRules::default())
    }

    /// Check that the task is executable, returning the reason when it is not
    pub fn validate_with(&self, rules: &TaskRules) -> Result<(), String> {
        if self.duration_s() == 0 {
            return Err("duration must be greater than 0".to_string());
        }

        match self {
            Task::Cut { operation, .. } if operation.kind() != TaskKind::Cut => {
                Err(format!("{operation} is not a cutting operation"))
            }
            Task::Temperature { operation, .. } if operation.kind() != TaskKind::Temperature => {
                Err(format!("{operation} is not a heating operation"))
            }
            Task::Temperature {
                operation: Operation::Steam,
                temperature_c,
                ..
            } if rules.strict_steam && *temperature_c != STEAM_TEMPERATURE_C => Err(format!(
                "steaming requires {STEAM_TEMPERATURE_C}°C, got {temperature_c}°C"
            )),
            _ => Ok(()),
        }
    }

    /// Drive the setpoints for this task
    pub fn apply(&self, setpoints: &mut Setpoints) {
        match self {
            Task::Cut { speed, .. } | Task::Mechanical { speed, .. } => {
                setpoints.temperature_c = 0;
                setpoints.speed = *speed;
            }
            Task::Temperature {
                temperature_c,
                speed,
                ..
            } => {
                setpoints.temperature_c = *temperature_c;
                setpoints.speed = *speed;
            }
        }
    }

    pub fn start_message(&self) -> String {
        match self {
            Task::Cut { speed, .. } | Task::Mechanical { speed, .. } => {
                format!("Starting {} at speed {}", self.name(), speed)
            }
            Task::Temperature { temperature_c, .. } => {
                format!("Starting {} at {}°C", self.name(), temperature_c)
            }
        }
    }

    pub fn finish_message(&self) -> String {
        format!("{} finished", self.name())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}s", self.kind(), self.name(), self.duration_s())?;
        if let Some(t) = self.temperature_c() {
            write!(f, ", {t}°C")?;
        }
        write!(f, ", speed {})", self.speed())
    }
}

fn parse_operation(raw: Option<&str>, default: Operation) -> Result<Operation, ApplianceError> {
    raw.map_or(Ok(default), str::parse)
}

fn clamp_speed(speed: i32, min: u8) -> u8 {
    speed.clamp(min as i32, MAX_SPEED as i32) as u8
}

/// Capitalize the first letter of every word, lowercase the rest
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
