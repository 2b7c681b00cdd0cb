use std::time::Instant;

use anyhow::Context;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use cogbat_core::{CardRule, ProbeKind, ScoreError, TaskKind, WisconsinCard};
use cogbat_presenter::{BatteryConfig, InhibitionTask, Probe, UpdateTask, WisconsinTest};

use crate::records::{TaskStep, TrialRecord};

/// Drives every task and probe combination once, with a simulated
/// participant pressing the keys.
pub struct Session {
    accuracy: f64,
    probe_rate: usize,
    two_alternatives: Probe<StdRng>,
    update_probe: Probe<StdRng>,
    switch_probe: Probe<StdRng>,
    inhibition_probe: Probe<StdRng>,
    update_task: UpdateTask<StdRng>,
    inhibition_task: InhibitionTask,
    wisconsin: WisconsinTest<StdRng>,
    rng: StdRng,
    records: Vec<TrialRecord>,
    started: Instant,
    combination: usize,
    probe_trial: usize,
    task_trial: usize,
}

impl Session {
    pub fn new(
        config: BatteryConfig,
        accuracy: f64,
        probe_rate: usize,
        seed: u64,
        inhibition_pool: Vec<String>,
    ) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&accuracy) {
            anyhow::bail!("accuracy must be a probability within 0..=1, got {accuracy}");
        }
        let mut rng = StdRng::seed_from_u64(seed);

        let (examples, words) = synthesized_pairs(120);
        let update_task = UpdateTask::new(
            examples,
            words,
            config.update_task.possible_sequences,
            config.update_task.blocks_before_task_finished,
            StdRng::seed_from_u64(rng.random()),
        )
        .context("building the update task")?;
        let inhibition_task = InhibitionTask::new(
            inhibition_pool,
            config.inhibition_task.trials_before_task_finished,
            &mut rng,
        )
        .context("building the inhibition task")?;
        let wisconsin = WisconsinTest::new(
            config.wisconsin.max_streak,
            config.wisconsin.max_trials,
            config.wisconsin.max_rules_changed,
            StdRng::seed_from_u64(rng.random()),
        );

        let two_alternatives = config
            .two_alternatives
            .build(StdRng::seed_from_u64(rng.random()))
            .context("building the two-alternatives probe")?;
        let update_probe = config
            .update_probe
            .build(StdRng::seed_from_u64(rng.random()))
            .context("building the update probe")?;
        let switch_probe = config
            .switch_probe
            .build(StdRng::seed_from_u64(rng.random()))
            .context("building the switch probe")?;
        let inhibition_probe = config
            .inhibition_probe
            .build(StdRng::seed_from_u64(rng.random()))
            .context("building the inhibition probe")?;

        Ok(Self {
            accuracy,
            probe_rate,
            two_alternatives,
            update_probe,
            switch_probe,
            inhibition_probe,
            update_task,
            inhibition_task,
            wisconsin,
            rng,
            records: Vec::new(),
            started: Instant::now(),
            combination: 0,
            probe_trial: 0,
            task_trial: 0,
        })
    }

    pub fn run(mut self) -> anyhow::Result<Vec<TrialRecord>> {
        let pairings = self.plan();
        info!("running {} task and probe combinations", pairings.len());
        for (task, probe) in pairings {
            self.run_pairing(task, probe)?;
        }
        Ok(self.records)
    }

    /// Every task crossed with every probe, in shuffled order.
    fn plan(&mut self) -> Vec<(TaskKind, ProbeKind)> {
        let mut pairings = Vec::new();
        for task in TaskKind::ALL {
            for probe in ProbeKind::ALL {
                pairings.push((task, probe));
            }
        }
        pairings.shuffle(&mut self.rng);
        pairings
    }

    fn run_pairing(&mut self, task: TaskKind, probe: ProbeKind) -> anyhow::Result<()> {
        self.combination += 1;
        self.probe_trial = 0;
        self.task_trial = 0;
        info!(
            "combination {}: {} task with {} probe",
            self.combination, task, probe
        );
        self.probe_mut(probe).prepare_for_new_task();
        match task {
            TaskKind::Update => self.run_update(probe),
            TaskKind::Inhibition => self.run_inhibition(probe),
            TaskKind::Switch => self.run_wisconsin(probe),
        }
    }

    fn run_update(&mut self, probe: ProbeKind) -> anyhow::Result<()> {
        self.update_task.new_task()?;
        loop {
            self.update_task.next_subtask()?;
            if self.update_task.is_task_finished() {
                self.push_task_record(TaskKind::Update, TaskStep::Finished, None, None, None);
                return Ok(());
            }
            self.task_trial += 1;
            let solution = self.solution_ms();
            if self.update_task.is_answer_time() {
                self.push_task_record(
                    TaskKind::Update,
                    TaskStep::Recall,
                    None,
                    None,
                    Some(solution),
                );
            } else {
                let pair = match (self.update_task.example(), self.update_task.word()) {
                    (Some(example), Some(word)) => Some(format!("{example} / {word}")),
                    _ => None,
                };
                self.push_task_record(
                    TaskKind::Update,
                    TaskStep::Memorize,
                    pair,
                    None,
                    Some(solution),
                );
            }
            self.run_probe_block(TaskKind::Update, probe)?;
        }
    }

    fn run_inhibition(&mut self, probe: ProbeKind) -> anyhow::Result<()> {
        self.inhibition_task.new_task()?;
        loop {
            let stimulus = self.inhibition_task.next_subtask()?.map(str::to_owned);
            match stimulus {
                Some(stimulus) => {
                    self.task_trial += 1;
                    let solution = self.solution_ms();
                    self.push_task_record(
                        TaskKind::Inhibition,
                        TaskStep::Stimulus,
                        Some(stimulus),
                        None,
                        Some(solution),
                    );
                    self.run_probe_block(TaskKind::Inhibition, probe)?;
                }
                None => {
                    self.push_task_record(TaskKind::Inhibition, TaskStep::Finished, None, None, None);
                    return Ok(());
                }
            }
        }
    }

    fn run_wisconsin(&mut self, probe: ProbeKind) -> anyhow::Result<()> {
        self.wisconsin.new_task()?;
        let mut guess = CardRule::ALL[self.rng.random_range(0..CardRule::ALL.len())];
        while !self.wisconsin.is_task_finished() {
            let deal = deal_cards(&mut self.rng);
            let chosen = pick_matching(&deal, guess);
            let correct = self.wisconsin.is_correct(&chosen, &deal.target)?;
            if !correct {
                // lose-shift: abandon the guessed rule on negative feedback
                let options = guess.others();
                guess = options[self.rng.random_range(0..options.len())];
            }
            self.task_trial += 1;
            let stimulus = format!(
                "rule {} target {}{}{}",
                self.wisconsin.rule(),
                deal.target.feature(CardRule::Color),
                deal.target.feature(CardRule::Shape),
                deal.target.feature(CardRule::Quantity),
            );
            let solution = self.solution_ms();
            self.push_task_record(
                TaskKind::Switch,
                TaskStep::Sort,
                Some(stimulus),
                Some(correct),
                Some(solution),
            );
            self.wisconsin.next_subtask()?;
            self.run_probe_block(TaskKind::Switch, probe)?;
        }
        self.push_task_record(TaskKind::Switch, TaskStep::Finished, None, None, None);
        Ok(())
    }

    fn run_probe_block(&mut self, task: TaskKind, kind: ProbeKind) -> anyhow::Result<()> {
        for _ in 0..self.probe_rate {
            self.run_probe_trial(task, kind)?;
        }
        Ok(())
    }

    fn run_probe_trial(&mut self, task: TaskKind, kind: ProbeKind) -> anyhow::Result<()> {
        let stimulus = self.probe(kind).current_probe().to_owned();
        let key = self.simulated_key(kind)?;
        let is_correct = self.probe(kind).press_correctness(key)?;
        let rt_ms = self.rng.random_range(250.0..900.0);
        self.probe_trial += 1;
        self.records.push(TrialRecord::Probe {
            combination: self.combination,
            task,
            probe: kind,
            probe_trial: self.probe_trial,
            stimulus,
            key: key.to_string(),
            is_correct,
            rt_ms,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        });
        self.probe_mut(kind).next_probe();
        Ok(())
    }

    /// The participant knows the right key and presses it with the
    /// configured accuracy; both keyboards are binary right/left.
    fn simulated_key(&mut self, kind: ProbeKind) -> Result<&'static str, ScoreError> {
        let accurate = self.rng.random_bool(self.accuracy);
        let intended = if self.probe(kind).press_correctness("right")? {
            "right"
        } else {
            "left"
        };
        Ok(if accurate { intended } else { flip(intended) })
    }

    fn probe(&self, kind: ProbeKind) -> &Probe<StdRng> {
        match kind {
            ProbeKind::TwoAlternatives => &self.two_alternatives,
            ProbeKind::Update => &self.update_probe,
            ProbeKind::Switch => &self.switch_probe,
            ProbeKind::Inhibition => &self.inhibition_probe,
        }
    }

    fn probe_mut(&mut self, kind: ProbeKind) -> &mut Probe<StdRng> {
        match kind {
            ProbeKind::TwoAlternatives => &mut self.two_alternatives,
            ProbeKind::Update => &mut self.update_probe,
            ProbeKind::Switch => &mut self.switch_probe,
            ProbeKind::Inhibition => &mut self.inhibition_probe,
        }
    }

    fn push_task_record(
        &mut self,
        task: TaskKind,
        step: TaskStep,
        stimulus: Option<String>,
        is_correct: Option<bool>,
        solution_ms: Option<f64>,
    ) {
        debug!("{task} task step {step:?} at trial {}", self.task_trial);
        self.records.push(TrialRecord::Task {
            combination: self.combination,
            task,
            task_trial: self.task_trial,
            step,
            stimulus,
            is_correct,
            solution_ms,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        });
    }

    fn solution_ms(&mut self) -> f64 {
        self.rng.random_range(1_500.0..6_000.0)
    }
}

fn flip(key: &str) -> &'static str {
    if key == "right" { "left" } else { "right" }
}

/// A sorting trial: four choice cards and the target to match.
struct Deal {
    choices: [WisconsinCard; 4],
    target: WisconsinCard,
}

/// Deals one permutation of feature values per dimension across the four
/// choice cards, so exactly one card matches the target in any single
/// dimension, then draws the target features uniformly.
fn deal_cards(rng: &mut StdRng) -> Deal {
    let mut dims = [[0u8; 4]; 3];
    for dim in &mut dims {
        let mut values = [0u8, 1, 2, 3];
        values.shuffle(rng);
        *dim = values;
    }
    let choices: [WisconsinCard; 4] =
        std::array::from_fn(|card| WisconsinCard::new(dims[0][card], dims[1][card], dims[2][card]));
    let target = WisconsinCard::new(
        rng.random_range(0..4),
        rng.random_range(0..4),
        rng.random_range(0..4),
    );
    Deal { choices, target }
}

/// The choice card agreeing with the target at the guessed dimension.
fn pick_matching(deal: &Deal, rule: CardRule) -> WisconsinCard {
    deal.choices
        .iter()
        .copied()
        .find(|card| card.feature(rule) == deal.target.feature(rule))
        .expect("one choice card matches each dimension")
}

/// Stand-in operation-span bank: sums to verify paired with nonsense
/// words to hold in memory. Operands step through coprime cycles so no
/// equation repeats; the decks shuffle the order later.
fn synthesized_pairs(len: usize) -> (Vec<String>, Vec<String>) {
    let syllables = ["ba", "de", "ki", "lo", "mu", "ne", "po", "ra", "si", "tu"];
    let mut examples = Vec::with_capacity(len);
    let mut words = Vec::with_capacity(len);
    for i in 0..len {
        let a = 2 + i % 28;
        let b = 2 + (i * 7) % 23;
        examples.push(format!("{a} + {b} = {}", a + b));
        words.push(format!(
            "{}{}{i}",
            syllables[i % syllables.len()],
            syllables[(i / syllables.len() + 3) % syllables.len()],
        ));
    }
    (examples, words)
}

/// Placeholder image names standing in for the packaged ink-color pool.
pub fn synthesized_pool(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("stroop_{i:02}.png")).collect()
}
