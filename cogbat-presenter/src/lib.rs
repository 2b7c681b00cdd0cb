pub mod config;
pub mod deck;
pub mod inhibition;
pub mod probe;
pub mod update;
pub mod wisconsin;

pub use config::{
    BatteryConfig, InhibitionTaskConfig, ProbeBank, UpdateTaskConfig, WisconsinTestConfig,
};
pub use deck::StimulusDeck;
pub use inhibition::InhibitionTask;
pub use probe::Probe;
pub use update::UpdateTask;
pub use wisconsin::WisconsinTest;
