use thiserror::Error;

use crate::kind::ProbeKind;

/// Construction-time misuse. Fatal, never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("an empty probe set is prohibited")]
    EmptyProbeSet,
    #[error("every probe must be unique, but there are {repeats} repeats in the probe set")]
    DuplicateProbes { repeats: usize },
    #[error("probes and answers must pair up, but there are {probes} probes and {answers} answers")]
    AnswerCountMismatch { probes: usize, answers: usize },
    #[error("probe kind {kind} requires an answer key")]
    MissingAnswers { kind: ProbeKind },
    #[error("the switch rule alternates over two groups of 4, but {probes} probes were supplied")]
    SwitchGroupMismatch { probes: usize },
    #[error("probe `{probe}` is too short to classify as congruent or incongruent")]
    UnclassifiableProbe { probe: String },
    #[error("the inhibition ratio needs both a congruent and an incongruent probe group")]
    MissingCongruencyGroup,
    #[error("memorize sequences shorter than one trial are prohibited")]
    InvalidSequenceLength,
    #[error("at least one memorize sequence length is required")]
    NoSequenceLengths,
    #[error("examples and words must pair up, but there are {examples} examples and {words} words")]
    StimulusPairMismatch { examples: usize, words: usize },
    #[error("every stimulus must be unique, but there are {repeats} repeats in the bank")]
    DuplicateStimuli { repeats: usize },
    #[error("an empty stimulus pool is prohibited")]
    EmptyStimulusPool,
    #[error("probe kind `{0}` is not implemented")]
    UnknownProbeKind(String),
}

/// Lifecycle and call-order violations raised by the task state machines.
/// These mean the driving loop broke the required sequence, not that the
/// participant did anything wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("call to next_subtask before the first new_task is prohibited")]
    NotStarted,
    #[error("call to new_task on an unfinished task is prohibited")]
    UnfinishedTask,
    #[error("call to next_subtask on a finished task is prohibited, call new_task before")]
    FinishedTask,
    #[error("correctness was already judged for this trial")]
    CorrectnessAlreadyJudged,
    #[error("next_subtask requires a preceding is_correct call")]
    MissingJudgment,
    #[error("the stimulus bank ran out before the task finished")]
    BankExhausted,
}

/// Scoring rejections from the probe family.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("this probe kind does not score key presses")]
    Unscored,
    #[error("key `{0}` is prohibited for an update probe")]
    ProhibitedKey(String),
}
