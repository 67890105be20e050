use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use phinet::{run_experiment, Dataset, ExperimentConfig};

fn blob_dataset(per_class: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0_f32, 0.4).unwrap();

    let n = per_class * 2;
    let mut x = Array2::zeros((n, 2));
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let label = (i % 2) as u8;
        let center = if label == 1 { 2.0 } else { -2.0 };
        x[[i, 0]] = center + noise.sample(&mut rng);
        x[[i, 1]] = center + noise.sample(&mut rng);
        y.push(label);
    }
    Dataset::new(x, y).unwrap()
}

#[test]
fn test_full_experiment_on_separable_data() {
    let dataset = blob_dataset(100, 41);

    let config = ExperimentConfig {
        hidden: vec![4],
        epsilon_candidates: vec![0.001, 10.0],
        trials_per_candidate: 2,
        search_iterations: 800,
        final_iterations: 2500,
        seed: 7,
        ..ExperimentConfig::default()
    };

    let report = run_experiment(&dataset, &config).unwrap();
    println!(
        "best epsilon {}, accuracy {}, phi {}",
        report.best_epsilon, report.scores.accuracy, report.scores.phi
    );

    assert_eq!(report.best_epsilon, 0.001);
    assert!(!report.collapsed);
    assert!(!report.timed_out);
    assert_eq!(report.rate_table.entries().len(), 2);
    assert!(report.scores.accuracy > 0.9);
    assert!(report.scores.phi > 0.5);
}

#[test]
fn test_expired_deadline_is_observable_in_the_report() {
    let dataset = blob_dataset(20, 47);

    // A zero deadline expires every fit immediately: each search trial is
    // discarded, every candidate bottoms out at the phi floor, and the
    // final network stops before its first iteration.
    let config = ExperimentConfig {
        hidden: vec![3],
        epsilon_candidates: vec![0.001, 0.01],
        trials_per_candidate: 1,
        search_iterations: 50,
        final_iterations: 50,
        trial_deadline: Some(std::time::Duration::ZERO),
        ..ExperimentConfig::default()
    };

    let report = run_experiment(&dataset, &config).unwrap();
    assert!(report.timed_out);
    // All candidates tied at the floor, so insertion order picked the first.
    assert_eq!(report.best_epsilon, 0.001);
}

#[test]
fn test_experiment_rejects_empty_candidate_list() {
    let dataset = blob_dataset(20, 43);
    let config = ExperimentConfig {
        epsilon_candidates: vec![],
        ..ExperimentConfig::default()
    };
    assert!(run_experiment(&dataset, &config).is_err());
}
