//! Distribution and scoring behavior of the probe family, driven with
//! seeded generators.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use cogbat_core::{ProbeKind, ScoreError};
use cogbat_presenter::{BatteryConfig, Probe};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn switch_probe(seed: u64) -> Probe<StdRng> {
    BatteryConfig::default()
        .switch_probe
        .build(StdRng::seed_from_u64(seed))
        .unwrap()
}

fn inhibition_probe(seed: u64) -> Probe<StdRng> {
    BatteryConfig::default()
        .inhibition_probe
        .build(StdRng::seed_from_u64(seed))
        .unwrap()
}

#[test]
fn exactly_one_answer_key_scores_per_trial() {
    let answers = ["right", "left"];
    let mut probe = Probe::new(
        strings(&["green", "red"]),
        Some(strings(&answers)),
        ProbeKind::TwoAlternatives,
        StdRng::seed_from_u64(101),
    )
    .unwrap();

    for _ in 0..15 {
        let correct_keys = answers
            .iter()
            .filter(|key| probe.press_correctness(key).unwrap())
            .count();
        assert_eq!(correct_keys, 1);
        probe.next_probe();
    }
}

#[test]
fn exactly_one_distinct_key_scores_for_the_switch_bank() {
    let mut probe = switch_probe(110);

    for _ in 0..30 {
        let correct_keys = ["right", "left"]
            .iter()
            .filter(|key| probe.press_correctness(key).unwrap())
            .count();
        assert_eq!(correct_keys, 1);
        probe.next_probe();
    }
}

#[test]
fn exactly_one_distinct_key_scores_for_the_inhibition_bank() {
    let mut probe = inhibition_probe(102);

    for _ in 0..30 {
        let correct_keys = ["right", "left"]
            .iter()
            .filter(|key| probe.press_correctness(key).unwrap())
            .count();
        assert_eq!(correct_keys, 1);
        probe.next_probe();
    }
}

#[test]
fn uniform_draws_cover_the_whole_bank() {
    let mut probe = Probe::new(
        strings(&["1", "2", "3"]),
        None,
        ProbeKind::Update,
        StdRng::seed_from_u64(103),
    )
    .unwrap();

    let mut seen = HashSet::new();
    for _ in 0..200 {
        seen.insert(probe.probe_number());
        probe.next_probe();
    }
    assert_eq!(seen.len(), probe.len());
}

#[test]
fn switch_draws_cover_the_whole_bank() {
    let mut probe = switch_probe(104);

    let mut seen = HashSet::new();
    for _ in 0..400 {
        seen.insert(probe.probe_number());
        probe.next_probe();
    }
    assert_eq!(seen.len(), 8);
}

#[test]
fn inhibition_draws_cover_the_whole_bank() {
    let mut probe = inhibition_probe(105);

    let mut seen = HashSet::new();
    for _ in 0..1000 {
        seen.insert(probe.probe_number());
        probe.next_probe();
    }
    assert_eq!(seen.len(), 16);
}

#[test]
fn switch_cadence_alternates_in_runs_of_two() {
    let cue_group = |idx: usize| -> usize {
        if [0, 1, 4, 5].contains(&idx) { 0 } else { 1 }
    };

    // the construction draw consumes the first schedule slot
    let mut probe = switch_probe(106);
    let mut groups = vec![cue_group(probe.probe_number())];
    for _ in 0..39 {
        probe.next_probe();
        groups.push(cue_group(probe.probe_number()));
    }

    for (slot, group) in groups.iter().enumerate() {
        let expected = [0, 0, 1, 1][slot % 4];
        assert_eq!(*group, expected, "wrong cue group at slot {slot}");
    }
}

#[test]
fn congruent_fraction_approaches_one_sixth() {
    let bank = BatteryConfig::default().inhibition_probe;
    let congruent: HashSet<usize> = bank
        .probes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.as_bytes()[0] == p.as_bytes()[1])
        .map(|(idx, _)| idx)
        .collect();

    // average ten independent 100-trial runs
    let mut fractions = Vec::new();
    for seed in 0..10u64 {
        let mut probe = bank.build(StdRng::seed_from_u64(200 + seed)).unwrap();
        let mut hits = 0usize;
        for _ in 0..100 {
            if congruent.contains(&probe.probe_number()) {
                hits += 1;
            }
            probe.next_probe();
        }
        fractions.push(hits as f64 / 100.0);
    }

    let mean = fractions.iter().sum::<f64>() / fractions.len() as f64;
    assert!(
        (mean - 1.0 / 6.0).abs() <= 0.07,
        "congruent fraction {mean} strays from 1/6"
    );
}

#[test]
fn sequence_scoring_follows_the_nback_truth_table() {
    let mut probe = Probe::new(
        strings(&["1", "2", "3"]),
        None,
        ProbeKind::Update,
        StdRng::seed_from_u64(107),
    )
    .unwrap();

    // first trial has no history: any key is correct
    assert_eq!(probe.press_correctness("right"), Ok(true));
    assert_eq!(probe.press_correctness("left"), Ok(true));
    assert_eq!(probe.press_correctness("space"), Ok(true));

    let mut previous = probe.probe_number();
    for _ in 0..30 {
        probe.next_probe();
        let current = probe.probe_number();

        assert_eq!(probe.press_correctness("right"), Ok(current == previous));
        assert_eq!(probe.press_correctness("left"), Ok(current != previous));
        assert_eq!(
            probe.press_correctness("space"),
            Err(ScoreError::ProhibitedKey("space".to_string()))
        );

        previous = current;
    }
}

#[test]
fn prepare_for_new_task_clears_nback_history() {
    let mut probe = Probe::new(
        strings(&["1", "2", "3"]),
        None,
        ProbeKind::Update,
        StdRng::seed_from_u64(108),
    )
    .unwrap();

    for _ in 0..5 {
        probe.next_probe();
    }
    probe.prepare_for_new_task();

    // back to the no-history case
    assert_eq!(probe.press_correctness("space"), Ok(true));
}

proptest! {
    #[test]
    fn probe_number_stays_in_bounds(seed in 0u64..1000, bank_size in 1usize..20, draws in 1usize..60) {
        let probes: Vec<String> = (0..bank_size).map(|i| format!("p{i}")).collect();
        let mut probe = Probe::unscored(probes, StdRng::seed_from_u64(seed)).unwrap();

        for _ in 0..draws {
            prop_assert!(probe.probe_number() < probe.len());
            probe.next_probe();
        }
        prop_assert!(probe.probe_number() < probe.len());
    }

    #[test]
    fn switch_probe_number_stays_in_bounds(seed in 0u64..1000, draws in 1usize..60) {
        let mut probe = switch_probe(seed);

        for _ in 0..draws {
            prop_assert!(probe.probe_number() < 8);
            probe.next_probe();
        }
    }

    #[test]
    fn inhibition_probe_number_stays_in_bounds(seed in 0u64..1000, draws in 1usize..60) {
        let mut probe = inhibition_probe(seed);

        for _ in 0..draws {
            prop_assert!(probe.probe_number() < 16);
            probe.next_probe();
        }
    }
}
