use cogbat_core::{ProbeKind, TaskKind};
use serde::Serialize;

/// One appended line of the session log.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrialRecord {
    Probe {
        combination: usize,
        task: TaskKind,
        probe: ProbeKind,
        probe_trial: usize,
        stimulus: String,
        key: String,
        is_correct: bool,
        rt_ms: f64,
        elapsed_ms: u64,
    },
    Task {
        combination: usize,
        task: TaskKind,
        task_trial: usize,
        step: TaskStep,
        stimulus: Option<String>,
        is_correct: Option<bool>,
        solution_ms: Option<f64>,
        elapsed_ms: u64,
    },
}

/// What a task was asking of the participant when the line was logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStep {
    Memorize,
    Recall,
    Stimulus,
    Sort,
    Finished,
}
