use std::collections::HashSet;

use cogbat_core::TaskError;
use rand::Rng;
use rand::seq::SliceRandom;

/// Pre-shuffled stimulus arena consumed front to back, one draw per trial
#[derive(Debug, Clone)]
pub struct StimulusDeck {
    items: Vec<String>,
    cursor: usize,
}

impl StimulusDeck {
    /// Shuffles once; the draw order is fixed from here on
    pub fn new<R: Rng>(mut items: Vec<String>, rng: &mut R) -> Self {
        items.shuffle(rng);
        Self { items, cursor: 0 }
    }

    /// Next unused stimulus, or a depletion error once the arena is spent
    pub fn draw(&mut self) -> Result<&str, TaskError> {
        let item = self
            .items
            .get(self.cursor)
            .ok_or(TaskError::BankExhausted)?;
        self.cursor += 1;
        Ok(item.as_str())
    }

    /// Stimuli not yet drawn
    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }
}

/// Number of stimuli appearing more than once in the bank
pub(crate) fn count_repeats(items: &[String]) -> usize {
    let unique: HashSet<&str> = items.iter().map(String::as_str).collect();
    items.len() - unique.len()
}
