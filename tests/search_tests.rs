use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use phinet::EpsilonSearch;

fn blobs(per_class: usize, seed: u64) -> (Array2<f32>, Vec<u8>) {
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
    (x, y)
}

fn small_search(candidates: Vec<f32>) -> EpsilonSearch {
    let mut search = EpsilonSearch::new(candidates, 0.01, vec![4]);
    search.trials = 2;
    search.trial_iterations = 1500;
    search
}

#[test]
fn test_search_prefers_the_learning_rate_that_separates() {
    let (x, y) = blobs(100, 31);

    // 0.001 trains cleanly; 10.0 diverges within a few iterations, its
    // trials collapse and the candidate bottoms out at phi -1.
    let search = small_search(vec![0.001, 10.0]);
    let table = search.run(&x, &y, 77).unwrap();

    assert_eq!(table.entries().len(), 2);
    let (good_eps, good_phi) = table.entries()[0];
    let (bad_eps, bad_phi) = table.entries()[1];
    println!("phi at {good_eps}: {good_phi}, phi at {bad_eps}: {bad_phi}");
    assert!(good_phi > bad_phi);

    assert_eq!(table.best_epsilon().unwrap(), 0.001);
}

#[test]
fn test_table_preserves_candidate_order() {
    let (x, y) = blobs(40, 13);
    let search = small_search(vec![0.01, 0.001, 0.1]);
    let table = search.run(&x, &y, 5).unwrap();

    let recorded: Vec<f32> = table.entries().iter().map(|&(e, _)| e).collect();
    assert_eq!(recorded, vec![0.01, 0.001, 0.1]);
}

#[test]
fn test_search_is_deterministic_for_a_fixed_seed() {
    let (x, y) = blobs(40, 17);
    let search = small_search(vec![0.001, 0.01]);

    let first = search.run(&x, &y, 123).unwrap();
    let second = search.run(&x, &y, 123).unwrap();
    assert_eq!(first.entries(), second.entries());
}
