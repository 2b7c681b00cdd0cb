use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Probe variants selectable by configuration tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeKind {
    TwoAlternatives,
    Update,
    Switch,
    Inhibition,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 4] = [
        ProbeKind::TwoAlternatives,
        ProbeKind::Update,
        ProbeKind::Switch,
        ProbeKind::Inhibition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProbeKind::TwoAlternatives => "TwoAlternatives",
            ProbeKind::Update => "Update",
            ProbeKind::Switch => "Switch",
            ProbeKind::Inhibition => "Inhibition",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TwoAlternatives" => Ok(ProbeKind::TwoAlternatives),
            "Update" => Ok(ProbeKind::Update),
            "Switch" => Ok(ProbeKind::Switch),
            "Inhibition" => Ok(ProbeKind::Inhibition),
            other => Err(ConfigError::UnknownProbeKind(other.to_string())),
        }
    }
}

/// Executive-function task variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Update,
    Inhibition,
    Switch,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Update, TaskKind::Inhibition, TaskKind::Switch];

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Update => "Update",
            TaskKind::Inhibition => "Inhibition",
            TaskKind::Switch => "Switch",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
