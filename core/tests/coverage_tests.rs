// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use map_reduce_core::map_reduce;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Runs a counting job over `0..n` and asserts that the mapper saw
/// every record exactly once and that the reduced totals agree.
async fn assert_full_coverage(n: u64, num_workers: usize, chunksize: usize) {
    // Arrange
    let mapped = Arc::new(AtomicUsize::new(0));
    let counter = mapped.clone();
    let engine = map_reduce(
        move |record: u64| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![(record % 7, 1u64)])
        },
        |key: &u64, values: Vec<u64>| Ok((*key, values.into_iter().sum::<u64>())),
        num_workers,
    )
    .unwrap();

    // Act
    let results = engine.run((0..n).collect(), chunksize, false).await.unwrap();

    // Assert
    assert_eq!(
        mapped.load(Ordering::SeqCst),
        n as usize,
        "num_workers={num_workers} chunksize={chunksize}"
    );
    let total: u64 = results.iter().map(|(_, count)| count).sum();
    assert_eq!(total, n, "num_workers={num_workers} chunksize={chunksize}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_record_mapped_exactly_once() {
    for (num_workers, chunksize) in [(1, 1), (2, 3), (8, 16), (4, 1000)] {
        assert_full_coverage(250, num_workers, chunksize).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_coverage_on_randomized_input_sizes() {
    let mut rng = rand::rng();
    for _ in 0..5 {
        let n = rng.random_range(1..500);
        let num_workers = rng.random_range(1..9);
        let chunksize = rng.random_range(1..64);
        assert_full_coverage(n, num_workers, chunksize).await;
    }
}

#[tokio::test]
async fn test_single_record_input() {
    assert_full_coverage(1, 8, 16).await;
}
