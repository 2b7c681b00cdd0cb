use cogbat_core::{ConfigError, TaskError};
use rand::Rng;

use crate::deck::{StimulusDeck, count_repeats};

/// Fixed-count stimulus consumption for the Stroop-like inhibition task.
///
/// A block spans `trials_before_task_finished + 1` calls: one stimulus per
/// trial, then a closing call that returns no stimulus and flags the block
/// finished. The pool is shuffled once and never repeats across blocks.
#[derive(Debug)]
pub struct InhibitionTask {
    stimuli: StimulusDeck,
    trials_before_task_finished: usize,
    trial: usize,
    started: bool,
}

impl InhibitionTask {
    pub fn new<R: Rng>(
        stimuli: Vec<String>,
        trials_before_task_finished: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if stimuli.is_empty() {
            return Err(ConfigError::EmptyStimulusPool);
        }
        let repeats = count_repeats(&stimuli);
        if repeats > 0 {
            return Err(ConfigError::DuplicateStimuli { repeats });
        }
        Ok(Self {
            stimuli: StimulusDeck::new(stimuli, rng),
            trials_before_task_finished,
            trial: 0,
            started: false,
        })
    }

    /// One call per trial: `Some(stimulus)` while the block runs, `None`
    /// exactly on the finishing call, an error for any call past that.
    pub fn next_subtask(&mut self) -> Result<Option<&str>, TaskError> {
        if !self.started {
            return Err(TaskError::NotStarted);
        }

        self.trial += 1;
        if self.trial > self.trials_before_task_finished + 1 {
            return Err(TaskError::FinishedTask);
        }
        if self.is_task_finished() {
            return Ok(None);
        }
        Ok(Some(self.stimuli.draw()?))
    }

    /// Arms the machine on first use; afterwards restarts a finished block
    pub fn new_task(&mut self) -> Result<(), TaskError> {
        if !self.started {
            self.started = true;
            return Ok(());
        }
        if !self.is_task_finished() {
            return Err(TaskError::UnfinishedTask);
        }
        self.trial = 0;
        Ok(())
    }

    pub fn is_task_finished(&self) -> bool {
        self.trial == self.trials_before_task_finished + 1
    }

    /// Stimuli left in the pool across all future blocks
    pub fn remaining(&self) -> usize {
        self.stimuli.remaining()
    }

    pub fn trial(&self) -> usize {
        self.trial
    }
}
