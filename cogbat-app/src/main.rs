mod records;
mod session;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::Rng;

use cogbat_presenter::BatteryConfig;

use crate::records::TrialRecord;
use crate::session::{Session, synthesized_pool};

/// Scripted run of the executive-function battery with a simulated
/// participant, logging every trial as a JSON line.
#[derive(Parser)]
#[command(name = "cogbat", version, about)]
struct Args {
    /// Battery configuration as JSON; the study defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
    /// Trial log destination
    #[arg(long, default_value = "cogbat-results.jsonl")]
    out: PathBuf,
    /// Directory of ink-color stimulus images; synthesized names when omitted
    #[arg(long)]
    stimulus_dir: Option<PathBuf>,
    /// Probability that the simulated participant answers a probe correctly
    #[arg(long, default_value_t = 0.9)]
    accuracy: f64,
    /// Probe trials interleaved after each task step
    #[arg(long, default_value_t = 2)]
    probe_rate: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BatteryConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!("session seed {seed}");

    let pool = match &args.stimulus_dir {
        Some(dir) => image_pool(dir)?,
        None => synthesized_pool(24),
    };

    let session = Session::new(config, args.accuracy, args.probe_rate, seed, pool)?;
    let records = session.run()?;
    summarize(&records);

    write_log(&args.out, &records)?;
    info!(
        "{} trial records written to {}",
        records.len(),
        args.out.display()
    );
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<BatteryConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    BatteryConfig::from_json(&text)
        .with_context(|| format!("parsing configuration {}", path.display()))
}

fn image_pool(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut pool = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing stimuli in {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "png") {
            pool.push(path.display().to_string());
        }
    }
    pool.sort();
    Ok(pool)
}

fn write_log(path: &Path, records: &[TrialRecord]) -> anyhow::Result<()> {
    let mut lines = String::new();
    for record in records {
        lines.push_str(&serde_json::to_string(record)?);
        lines.push('\n');
    }
    fs::write(path, lines).with_context(|| format!("writing {}", path.display()))
}

fn summarize(records: &[TrialRecord]) {
    let mut task_steps = 0usize;
    let mut per_probe: BTreeMap<&'static str, (usize, usize)> = BTreeMap::new();
    for record in records {
        match record {
            TrialRecord::Probe {
                probe, is_correct, ..
            } => {
                let (trials, correct) = per_probe.entry(probe.name()).or_default();
                *trials += 1;
                if *is_correct {
                    *correct += 1;
                }
            }
            TrialRecord::Task { .. } => task_steps += 1,
        }
    }
    info!("{task_steps} task steps simulated");
    for (probe, (trials, correct)) in per_probe {
        info!(
            "probe {probe}: {correct}/{trials} correct ({:.1}%)",
            100.0 * correct as f64 / trials as f64
        );
    }
}
