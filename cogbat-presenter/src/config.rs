use cogbat_core::{ConfigError, ProbeKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::probe::Probe;

/// One probe bank: stimuli plus the optional answer key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeBank {
    pub kind: ProbeKind,
    pub probes: Vec<String>,
    #[serde(default)]
    pub answers: Option<Vec<String>>,
}

impl ProbeBank {
    /// Instantiates the presenter for this bank
    pub fn build<R: Rng>(&self, rng: R) -> Result<Probe<R>, ConfigError> {
        Probe::new(self.probes.clone(), self.answers.clone(), self.kind, rng)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTaskConfig {
    pub possible_sequences: Vec<usize>,
    pub blocks_before_task_finished: usize,
}

impl Default for UpdateTaskConfig {
    fn default() -> Self {
        Self {
            possible_sequences: vec![3, 4],
            blocks_before_task_finished: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InhibitionTaskConfig {
    pub trials_before_task_finished: usize,
}

impl Default for InhibitionTaskConfig {
    fn default() -> Self {
        Self {
            trials_before_task_finished: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WisconsinTestConfig {
    pub max_streak: usize,
    pub max_trials: Option<usize>,
    pub max_rules_changed: Option<usize>,
}

impl Default for WisconsinTestConfig {
    fn default() -> Self {
        Self {
            max_streak: 8,
            max_trials: Some(32),
            max_rules_changed: None,
        }
    }
}

/// Complete battery setup; the defaults reproduce the study constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    pub two_alternatives: ProbeBank,
    pub update_probe: ProbeBank,
    pub switch_probe: ProbeBank,
    pub inhibition_probe: ProbeBank,
    pub update_task: UpdateTaskConfig,
    pub inhibition_task: InhibitionTaskConfig,
    pub wisconsin: WisconsinTestConfig,
}

impl BatteryConfig {
    /// Bank backing the given probe kind
    pub fn probe_bank(&self, kind: ProbeKind) -> &ProbeBank {
        match kind {
            ProbeKind::TwoAlternatives => &self.two_alternatives,
            ProbeKind::Update => &self.update_probe,
            ProbeKind::Switch => &self.switch_probe,
            ProbeKind::Inhibition => &self.inhibition_probe,
        }
    }

    /// Parses a configuration from JSON text; absent fields keep their
    /// defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            two_alternatives: ProbeBank {
                kind: ProbeKind::TwoAlternatives,
                probes: strings(&["green", "red"]),
                answers: Some(strings(&["right", "left"])),
            },
            update_probe: ProbeBank {
                kind: ProbeKind::Update,
                probes: strings(&["1", "2", "3"]),
                answers: None,
            },
            switch_probe: ProbeBank {
                kind: ProbeKind::Switch,
                probes: strings(&["1", "2", "3", "4", "5", "6", "7", "8"]),
                answers: Some(strings(&[
                    "right", "right", "left", "right", "left", "left", "left", "right",
                ])),
            },
            inhibition_probe: inhibition_bank(),
            update_task: UpdateTaskConfig::default(),
            inhibition_task: InhibitionTaskConfig::default(),
            wisconsin: WisconsinTestConfig::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Color-word probes: every two-letter product of R/G/B/Y, answered by the
/// ink letter in second position. The equal-letter diagonal forms the
/// congruent group.
fn inhibition_bank() -> ProbeBank {
    let colors = ['R', 'G', 'B', 'Y'];
    let mut probes = Vec::new();
    let mut answers = Vec::new();

    for word in colors {
        for ink in colors {
            probes.push(format!("{word}{ink}"));
            answers.push(match ink {
                'R' | 'Y' => "right".to_string(),
                _ => "left".to_string(),
            });
        }
    }

    ProbeBank {
        kind: ProbeKind::Inhibition,
        probes,
        answers: Some(answers),
    }
}
