use cogbat_core::{CardRule, TaskError, WisconsinCard};
use log::debug;
use rand::Rng;

/// Card-sorting state machine: streaks of correct sorts rotate the hidden
/// rule, while the trial count and the rule-change count race toward
/// independent finish thresholds (`None` leaves a dimension unbounded).
///
/// Strict per-trial protocol: exactly one `is_correct`, then one
/// `next_subtask`. A finished task tolerates further `next_subtask` calls
/// as no-ops until `new_task` restarts it.
#[derive(Debug)]
pub struct WisconsinTest<R: Rng> {
    rule: CardRule,
    previous_rule: Option<CardRule>,
    streak: usize,
    trial: usize,
    rules_changed: usize,
    max_streak: usize,
    max_trials: Option<usize>,
    max_rules_changed: Option<usize>,
    pending: Option<bool>,
    first_trial_after_rule_change: bool,
    started: bool,
    rng: R,
}

impl<R: Rng> WisconsinTest<R> {
    pub fn new(
        max_streak: usize,
        max_trials: Option<usize>,
        max_rules_changed: Option<usize>,
        mut rng: R,
    ) -> Self {
        let rule = CardRule::ALL[rng.random_range(0..CardRule::ALL.len())];
        debug!("wisconsin test armed with starting rule {rule}");

        Self {
            rule,
            previous_rule: None,
            streak: 0,
            trial: 0,
            rules_changed: 0,
            max_streak,
            max_trials,
            max_rules_changed,
            pending: None,
            first_trial_after_rule_change: false,
            started: false,
            rng,
        }
    }

    /// Judges the chosen card against the target at the hidden rule's
    /// dimension. Must be called exactly once per trial; the verdict is
    /// held for the paired `next_subtask`.
    pub fn is_correct(
        &mut self,
        chosen: &WisconsinCard,
        target: &WisconsinCard,
    ) -> Result<bool, TaskError> {
        if self.pending.is_some() {
            return Err(TaskError::CorrectnessAlreadyJudged);
        }
        let correct = chosen.feature(self.rule) == target.feature(self.rule);
        self.pending = Some(correct);
        Ok(correct)
    }

    /// Folds the held verdict into the streak, counts the trial, and
    /// rotates the rule when the streak fills up. On a finished task this
    /// is a tolerated no-op boundary.
    pub fn next_subtask(&mut self) -> Result<(), TaskError> {
        if !self.started {
            return Err(TaskError::NotStarted);
        }
        if self.is_task_finished() {
            return Ok(());
        }
        let correct = self.pending.ok_or(TaskError::MissingJudgment)?;

        if correct {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.pending = None;
        self.first_trial_after_rule_change = false;
        self.trial += 1;

        if self.streak == self.max_streak {
            self.rules_changed += 1;
            if !self.is_task_finished() {
                self.prepare_for_new_rule();
            }
        }
        Ok(())
    }

    /// Arms the machine on first use; afterwards restarts a finished task
    /// under a freshly rotated rule with zeroed counters.
    pub fn new_task(&mut self) -> Result<(), TaskError> {
        if !self.started {
            self.started = true;
            return Ok(());
        }
        if !self.is_task_finished() {
            return Err(TaskError::UnfinishedTask);
        }
        self.prepare_for_new_rule();
        self.trial = 0;
        self.rules_changed = 0;
        self.pending = None;
        Ok(())
    }

    pub fn is_task_finished(&self) -> bool {
        self.finished_by_trial() || self.finished_by_rule_change()
    }

    pub fn rule(&self) -> CardRule {
        self.rule
    }

    pub fn previous_rule(&self) -> Option<CardRule> {
        self.previous_rule
    }

    pub fn streak(&self) -> usize {
        self.streak
    }

    pub fn trial(&self) -> usize {
        self.trial
    }

    pub fn rules_changed(&self) -> usize {
        self.rules_changed
    }

    /// True on the first trial presented under a freshly rotated rule
    pub fn is_first_trial_after_rule_change(&self) -> bool {
        self.first_trial_after_rule_change
    }

    fn finished_by_trial(&self) -> bool {
        self.max_trials.map_or(false, |max| self.trial == max + 1)
    }

    fn finished_by_rule_change(&self) -> bool {
        self.max_rules_changed
            .map_or(false, |max| self.rules_changed == max)
    }

    /// Rotates to one of the two other rules, never repeating the current
    fn prepare_for_new_rule(&mut self) {
        self.streak = 0;
        self.first_trial_after_rule_change = true;

        let options = self.rule.others();
        self.previous_rule = Some(self.rule);
        self.rule = options[self.rng.random_range(0..options.len())];
        debug!(
            "sorting rule rotated to {} after {} trials",
            self.rule, self.trial
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    // Cards with identical features are correct under every rule; fully
    // distinct ones are incorrect under every rule.
    fn matching_pair() -> (WisconsinCard, WisconsinCard) {
        (WisconsinCard::new(0, 1, 2), WisconsinCard::new(0, 1, 2))
    }

    fn clashing_pair() -> (WisconsinCard, WisconsinCard) {
        (WisconsinCard::new(0, 1, 2), WisconsinCard::new(2, 0, 1))
    }

    fn armed(max_streak: usize, seed: u64) -> WisconsinTest<StdRng> {
        let mut task = WisconsinTest::new(max_streak, None, None, StdRng::seed_from_u64(seed));
        task.new_task().unwrap();
        task
    }

    #[test]
    fn double_judgment_is_prohibited() {
        let mut task = armed(3, 31);
        let (chosen, target) = matching_pair();
        task.is_correct(&chosen, &target).unwrap();
        assert_eq!(
            task.is_correct(&chosen, &target).unwrap_err(),
            TaskError::CorrectnessAlreadyJudged
        );
    }

    #[test]
    fn advancing_without_judgment_is_prohibited() {
        let mut task = armed(3, 32);
        assert_eq!(task.next_subtask().unwrap_err(), TaskError::MissingJudgment);
    }

    #[test]
    fn advancing_before_arming_is_prohibited() {
        let mut task = WisconsinTest::new(3, None, None, StdRng::seed_from_u64(33));
        assert_eq!(task.next_subtask().unwrap_err(), TaskError::NotStarted);
    }

    #[test]
    fn judgment_matches_the_rule_dimension() {
        let mut task = armed(3, 34);
        let (chosen, target) = matching_pair();
        assert_eq!(task.is_correct(&chosen, &target), Ok(true));
        task.next_subtask().unwrap();

        let (chosen, target) = clashing_pair();
        assert_eq!(task.is_correct(&chosen, &target), Ok(false));
    }

    #[test]
    fn incorrect_answers_reset_the_streak_without_rotating() {
        let mut task = armed(5, 35);
        let rule = task.rule();

        let (chosen, target) = matching_pair();
        for _ in 0..3 {
            task.is_correct(&chosen, &target).unwrap();
            task.next_subtask().unwrap();
        }
        assert_eq!(task.streak(), 3);

        let (chosen, target) = clashing_pair();
        task.is_correct(&chosen, &target).unwrap();
        task.next_subtask().unwrap();

        assert_eq!(task.streak(), 0);
        assert_eq!(task.rule(), rule);
        assert_eq!(task.rules_changed(), 0);
    }
}
