pub mod card;
pub mod error;
pub mod kind;

pub use card::{CardRule, WisconsinCard};
pub use error::{ConfigError, ScoreError, TaskError};
pub use kind::{ProbeKind, TaskKind};
