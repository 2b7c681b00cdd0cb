use cogbat_core::{ConfigError, TaskError};
use log::debug;
use rand::Rng;

use crate::deck::{StimulusDeck, count_repeats};

/// Memorize/recall block machine for the operation-span update task.
///
/// Each block shows a run of example/word pairs whose length is drawn from
/// `possible_sequences`, then holds one recall step where the participant
/// reproduces the memorized words. The drawn countdown gets one extra slot
/// so the recall step consumes a call of its own.
#[derive(Debug)]
pub struct UpdateTask<R: Rng> {
    examples: StimulusDeck,
    words: StimulusDeck,
    example: Option<String>,
    word: Option<String>,
    possible_sequences: Vec<usize>,
    before_answer: usize,
    blocks_finished: usize,
    blocks_before_task_finished: usize,
    started: bool,
    rng: R,
}

impl<R: Rng> UpdateTask<R> {
    /// Shuffles examples and words independently, decoupling which example
    /// appears with which word, then consumes both single-pass.
    pub fn new(
        examples: Vec<String>,
        words: Vec<String>,
        possible_sequences: Vec<usize>,
        blocks_before_task_finished: usize,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        if possible_sequences.is_empty() {
            return Err(ConfigError::NoSequenceLengths);
        }
        if possible_sequences.contains(&0) {
            return Err(ConfigError::InvalidSequenceLength);
        }
        if examples.len() != words.len() {
            return Err(ConfigError::StimulusPairMismatch {
                examples: examples.len(),
                words: words.len(),
            });
        }
        for bank in [&examples, &words] {
            let repeats = count_repeats(bank);
            if repeats > 0 {
                return Err(ConfigError::DuplicateStimuli { repeats });
            }
        }

        let before_answer =
            possible_sequences[rng.random_range(0..possible_sequences.len())] + 1;
        let examples = StimulusDeck::new(examples, &mut rng);
        let words = StimulusDeck::new(words, &mut rng);

        Ok(Self {
            examples,
            words,
            example: None,
            word: None,
            possible_sequences,
            before_answer,
            blocks_finished: 0,
            blocks_before_task_finished,
            started: false,
            rng,
        })
    }

    /// Advances one step: memorize steps draw a fresh pair, the recall step
    /// closes the block, and the step observing completion changes nothing.
    pub fn next_subtask(&mut self) -> Result<(), TaskError> {
        if !self.started {
            return Err(TaskError::NotStarted);
        }

        if self.is_answer_time() {
            self.blocks_finished += 1;
            self.before_answer = self.draw_block_len();
            debug!("update block {} closed at recall", self.blocks_finished);
        }

        if self.is_task_finished() {
            return Ok(());
        }

        self.before_answer -= 1;
        if !self.is_answer_time() {
            self.example = Some(self.examples.draw()?.to_owned());
            self.word = Some(self.words.draw()?.to_owned());
        }
        Ok(())
    }

    /// Arms the machine on first use; afterwards restarts a finished task
    /// for another block run.
    pub fn new_task(&mut self) -> Result<(), TaskError> {
        if self.started && !self.is_task_finished() {
            return Err(TaskError::UnfinishedTask);
        }
        if !self.started {
            self.started = true;
            return Ok(());
        }
        self.blocks_finished = 0;
        Ok(())
    }

    /// The memorize countdown hit zero: this step is the recall prompt
    pub fn is_answer_time(&self) -> bool {
        self.before_answer == 0
    }

    pub fn is_task_finished(&self) -> bool {
        self.blocks_finished == self.blocks_before_task_finished
    }

    /// Example shown on the current memorize step
    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// Word to hold in memory for the coming recall
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// Unused example/word pairs left in the bank
    pub fn remaining(&self) -> usize {
        self.examples.remaining()
    }

    pub fn blocks_finished(&self) -> usize {
        self.blocks_finished
    }

    fn draw_block_len(&mut self) -> usize {
        self.possible_sequences[self.rng.random_range(0..self.possible_sequences.len())] + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pairs(n: usize) -> (Vec<String>, Vec<String>) {
        let examples = (0..n).map(|i| format!("example_{i}")).collect();
        let words = (0..n).map(|i| format!("word_{i}")).collect();
        (examples, words)
    }

    #[test]
    fn zero_length_sequences_are_rejected() {
        let (examples, words) = pairs(10);
        let err = UpdateTask::new(examples, words, vec![3, 0], 5, StdRng::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidSequenceLength);
    }

    #[test]
    fn at_least_one_sequence_length_is_required() {
        let (examples, words) = pairs(10);
        let err =
            UpdateTask::new(examples, words, vec![], 5, StdRng::seed_from_u64(2)).unwrap_err();
        assert_eq!(err, ConfigError::NoSequenceLengths);
    }

    #[test]
    fn duplicate_stimuli_are_rejected() {
        let (examples, _) = pairs(4);
        let words = vec![
            "word_0".to_string(),
            "word_1".to_string(),
            "word_1".to_string(),
            "word_2".to_string(),
        ];
        let err = UpdateTask::new(examples, words, vec![3], 5, StdRng::seed_from_u64(9))
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateStimuli { repeats: 1 });
    }

    #[test]
    fn example_and_word_banks_must_pair_up() {
        let (examples, _) = pairs(10);
        let (_, words) = pairs(7);
        let err = UpdateTask::new(examples, words, vec![3], 5, StdRng::seed_from_u64(3))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::StimulusPairMismatch {
                examples: 10,
                words: 7
            }
        );
    }

    #[test]
    fn advancing_before_arming_is_prohibited() {
        let (examples, words) = pairs(10);
        let mut task =
            UpdateTask::new(examples, words, vec![3], 1, StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(task.next_subtask().unwrap_err(), TaskError::NotStarted);
    }

    #[test]
    fn rearming_an_unfinished_task_is_prohibited() {
        let (examples, words) = pairs(10);
        let mut task =
            UpdateTask::new(examples, words, vec![3], 2, StdRng::seed_from_u64(5)).unwrap();
        task.new_task().unwrap();
        task.next_subtask().unwrap();
        assert_eq!(task.new_task().unwrap_err(), TaskError::UnfinishedTask);
    }

    #[test]
    fn too_small_a_bank_depletes() {
        let (examples, words) = pairs(2);
        let mut task =
            UpdateTask::new(examples, words, vec![4], 1, StdRng::seed_from_u64(6)).unwrap();
        task.new_task().unwrap();
        task.next_subtask().unwrap();
        task.next_subtask().unwrap();
        assert_eq!(task.next_subtask().unwrap_err(), TaskError::BankExhausted);
    }
}
