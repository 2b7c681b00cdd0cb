use std::collections::HashSet;

use cogbat_core::{ConfigError, ProbeKind, ScoreError};
use log::debug;
use rand::Rng;

/// How the next probe index gets drawn
#[derive(Debug, Clone)]
enum Selection {
    /// Uniform over the whole bank, independent of history
    Uniform,
    /// Two fixed index groups visited in runs of two: first group twice,
    /// second group twice, repeating
    GroupRuns { groups: [Vec<usize>; 2], step: usize },
    /// Weighted group choice, 5/6 incongruent and 1/6 congruent, then
    /// uniform within the chosen group
    CongruencyRatio {
        incongruent: Vec<usize>,
        congruent: Vec<usize>,
    },
}

impl Selection {
    fn draw<R: Rng>(&mut self, bank_len: usize, rng: &mut R) -> usize {
        match self {
            Selection::Uniform => rng.random_range(0..bank_len),
            Selection::GroupRuns { groups, step } => {
                let group = &groups[*step / 2];
                let idx = group[rng.random_range(0..group.len())];
                *step = (*step + 1) % 4;
                idx
            }
            Selection::CongruencyRatio {
                incongruent,
                congruent,
            } => {
                let group: &[usize] = if rng.random_range(0..6) == 0 {
                    congruent
                } else {
                    incongruent
                };
                group[rng.random_range(0..group.len())]
            }
        }
    }
}

/// How a key press is judged against the current probe
#[derive(Debug, Clone)]
enum Scoring {
    /// Never scores
    Unscored,
    /// Per-index expected key
    AnswerKey { answers: Vec<String> },
    /// n-back match: "right" means same stimulus as the previous trial,
    /// "left" means a different one
    BackMatch { previous: Option<usize> },
}

/// Stimulus selection and keypress scoring over one probe bank.
///
/// Construction performs the initial draw, so a current stimulus exists
/// before the first trial starts.
#[derive(Debug)]
pub struct Probe<R: Rng> {
    probes: Vec<String>,
    selection: Selection,
    scoring: Scoring,
    current: usize,
    rng: R,
}

impl<R: Rng> Probe<R> {
    /// Builds the probe variant selected by `kind` over the given bank.
    ///
    /// `answers` is required for the key-mapped kinds and ignored by the
    /// n-back kind, which scores from history alone.
    pub fn new(
        probes: Vec<String>,
        answers: Option<Vec<String>>,
        kind: ProbeKind,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        validate_unique(&probes)?;

        let (mut selection, scoring) = match kind {
            ProbeKind::TwoAlternatives => {
                (Selection::Uniform, answer_key(&probes, answers, kind)?)
            }
            ProbeKind::Update => (
                Selection::Uniform,
                Scoring::BackMatch { previous: None },
            ),
            ProbeKind::Switch => (switch_groups(&probes)?, answer_key(&probes, answers, kind)?),
            ProbeKind::Inhibition => (
                congruency_groups(&probes)?,
                answer_key(&probes, answers, kind)?,
            ),
        };

        let current = selection.draw(probes.len(), &mut rng);
        debug!(
            "{kind} probe armed over {} stimuli, starting at index {current}",
            probes.len()
        );

        Ok(Self {
            probes,
            selection,
            scoring,
            current,
            rng,
        })
    }

    /// Plain variant: uniform draws, never scores a key press.
    pub fn unscored(probes: Vec<String>, mut rng: R) -> Result<Self, ConfigError> {
        validate_unique(&probes)?;

        let mut selection = Selection::Uniform;
        let current = selection.draw(probes.len(), &mut rng);

        Ok(Self {
            probes,
            selection,
            scoring: Scoring::Unscored,
            current,
            rng,
        })
    }

    /// Judges a key press against the current stimulus
    pub fn press_correctness(&self, key: &str) -> Result<bool, ScoreError> {
        match &self.scoring {
            Scoring::Unscored => Err(ScoreError::Unscored),
            Scoring::AnswerKey { answers } => Ok(answers[self.current] == key),
            Scoring::BackMatch { previous } => match previous {
                None => Ok(true),
                Some(previous) => match key {
                    "right" => Ok(*previous == self.current),
                    "left" => Ok(*previous != self.current),
                    other => Err(ScoreError::ProhibitedKey(other.to_string())),
                },
            },
        }
    }

    /// Advances to a fresh stimulus, recording n-back history where relevant
    pub fn next_probe(&mut self) {
        if let Scoring::BackMatch { previous } = &mut self.scoring {
            *previous = Some(self.current);
        }
        self.current = self.selection.draw(self.probes.len(), &mut self.rng);
    }

    /// Clears n-back history ahead of a new task pairing; a no-op for the
    /// other kinds
    pub fn prepare_for_new_task(&mut self) {
        if let Scoring::BackMatch { previous } = &mut self.scoring {
            *previous = None;
        }
    }

    /// Index of the current stimulus
    pub fn probe_number(&self) -> usize {
        self.current
    }

    /// Identifier of the current stimulus
    pub fn current_probe(&self) -> &str {
        &self.probes[self.current]
    }

    /// Bank size; construction guarantees at least one stimulus
    pub fn len(&self) -> usize {
        self.probes.len()
    }
}

fn validate_unique(probes: &[String]) -> Result<(), ConfigError> {
    if probes.is_empty() {
        return Err(ConfigError::EmptyProbeSet);
    }
    let unique: HashSet<&str> = probes.iter().map(String::as_str).collect();
    let repeats = probes.len() - unique.len();
    if repeats > 0 {
        return Err(ConfigError::DuplicateProbes { repeats });
    }
    Ok(())
}

fn answer_key(
    probes: &[String],
    answers: Option<Vec<String>>,
    kind: ProbeKind,
) -> Result<Scoring, ConfigError> {
    let answers = answers.ok_or(ConfigError::MissingAnswers { kind })?;
    if answers.len() != probes.len() {
        return Err(ConfigError::AnswerCountMismatch {
            probes: probes.len(),
            answers: answers.len(),
        });
    }
    Ok(Scoring::AnswerKey { answers })
}

/// The switch cadence runs over the study's fixed split of an 8-stimulus
/// bank: cue group {0, 1, 4, 5} against cue group {2, 3, 6, 7}
fn switch_groups(probes: &[String]) -> Result<Selection, ConfigError> {
    if probes.len() != 8 {
        return Err(ConfigError::SwitchGroupMismatch {
            probes: probes.len(),
        });
    }
    Ok(Selection::GroupRuns {
        groups: [vec![0, 1, 4, 5], vec![2, 3, 6, 7]],
        step: 0,
    })
}

/// Congruent probes encode the same attribute twice (first two characters
/// equal); everything else lands in the incongruent group
fn congruency_groups(probes: &[String]) -> Result<Selection, ConfigError> {
    let mut congruent = Vec::new();
    let mut incongruent = Vec::new();

    for (idx, probe) in probes.iter().enumerate() {
        let mut chars = probe.chars();
        match (chars.next(), chars.next()) {
            (Some(first), Some(second)) if first == second => congruent.push(idx),
            (Some(_), Some(_)) => incongruent.push(idx),
            _ => {
                return Err(ConfigError::UnclassifiableProbe {
                    probe: probe.clone(),
                });
            }
        }
    }

    if congruent.is_empty() || incongruent.is_empty() {
        return Err(ConfigError::MissingCongruencyGroup);
    }

    Ok(Selection::CongruencyRatio {
        incongruent,
        congruent,
    })
}
