// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use map_reduce_core::{BoxError, map_reduce};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn csv_key_mapper(record: String) -> Result<Vec<(String, i64)>, BoxError> {
    let key = record
        .split(',')
        .next()
        .ok_or("record has no first field")?
        .to_string();
    Ok(vec![(key, 1)])
}

#[tokio::test]
async fn test_sum_by_first_field() {
    // Arrange
    let inputs: Vec<String> = ["a,1", "b,1", "a,1"].iter().map(|s| s.to_string()).collect();
    let engine = map_reduce(
        csv_key_mapper,
        |key: &String, values: Vec<i64>| Ok((key.clone(), values.into_iter().sum::<i64>())),
        4,
    )
    .unwrap();

    // Act
    let results = engine.run(inputs, 1, false).await.unwrap();

    // Assert
    let results: HashSet<(String, i64)> = results.into_iter().collect();
    let expected: HashSet<(String, i64)> =
        [("a".to_string(), 2), ("b".to_string(), 1)].into_iter().collect();
    assert_eq!(results, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reducer_invoked_once_per_distinct_key() {
    // Arrange
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = invocations.clone();
    let inputs: Vec<u64> = (0..200).collect();
    let engine = map_reduce(
        |record: u64| Ok(vec![(record % 10, record)]),
        move |key: &u64, values: Vec<u64>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok((*key, values.len()))
        },
        8,
    )
    .unwrap();

    // Act
    let results = engine.run(inputs, 7, false).await.unwrap();

    // Assert
    assert_eq!(invocations.load(Ordering::SeqCst), 10);
    assert_eq!(results.len(), 10);
    for (_, group_size) in results {
        assert_eq!(group_size, 20);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_groups_are_complete_and_exclusive() {
    // Arrange
    let inputs: Vec<u64> = (0..300).collect();
    let engine = map_reduce(
        |record: u64| Ok(vec![(record % 3, record)]),
        |key: &u64, mut values: Vec<u64>| {
            values.sort_unstable();
            Ok((*key, values))
        },
        8,
    )
    .unwrap();

    // Act
    let results = engine.run(inputs, 16, false).await.unwrap();

    // Assert: each group holds exactly the records congruent to its
    // key, each exactly once
    let groups: HashMap<u64, Vec<u64>> = results.into_iter().collect();
    assert_eq!(groups.len(), 3);
    for (key, values) in groups {
        let expected: Vec<u64> = (0..300).filter(|n| n % 3 == key).collect();
        assert_eq!(values, expected);
    }
}

#[tokio::test]
async fn test_oversized_chunksize_matches_chunksize_one() {
    // Arrange
    let inputs: Vec<String> = ["x,1", "y,1", "x,1", "z,1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let engine = map_reduce(
        csv_key_mapper,
        |key: &String, values: Vec<i64>| Ok((key.clone(), values.into_iter().sum::<i64>())),
        2,
    )
    .unwrap();

    // Act
    let oversized = engine.run(inputs.clone(), 1000, false).await.unwrap();
    let minimal = engine.run(inputs, 1, false).await.unwrap();

    // Assert
    let oversized: HashSet<(String, i64)> = oversized.into_iter().collect();
    let minimal: HashSet<(String, i64)> = minimal.into_iter().collect();
    assert_eq!(oversized, minimal);
}

#[derive(Debug, Clone)]
enum Info {
    Count(u64),
    Name(String),
}

#[tokio::test]
async fn test_tagged_variant_values() {
    // Arrange: play records count per user, name records carry the
    // user's name; the reducer pattern-matches on the variant
    let inputs: Vec<String> = [
        "play,7",
        "name,7,ada",
        "play,7",
        "play,3",
        "name,3,grace",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let engine = map_reduce(
        |record: String| {
            let fields: Vec<&str> = record.split(',').collect();
            match fields.as_slice() {
                ["play", id] => Ok(vec![(id.parse::<u32>()?, Info::Count(1))]),
                ["name", id, name] => Ok(vec![(id.parse::<u32>()?, Info::Name(name.to_string()))]),
                _ => Err(format!("malformed record: {record}").into()),
            }
        },
        |key: &u32, values: Vec<Info>| {
            let mut plays = 0;
            let mut name = String::new();
            for value in values {
                match value {
                    Info::Count(n) => plays += n,
                    Info::Name(n) => name = n,
                }
            }
            Ok((*key, name, plays))
        },
        4,
    )
    .unwrap();

    // Act
    let results = engine.run(inputs, 2, false).await.unwrap();

    // Assert
    let results: HashSet<(u32, String, u64)> = results.into_iter().collect();
    let expected: HashSet<(u32, String, u64)> =
        [(7, "ada".to_string(), 2), (3, "grace".to_string(), 1)]
            .into_iter()
            .collect();
    assert_eq!(results, expected);
}

#[tokio::test]
async fn test_sorted_mode_orders_by_key() {
    // Arrange
    let inputs: Vec<String> = ["c,1", "a,1", "b,1", "a,1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let engine = map_reduce(
        csv_key_mapper,
        |key: &String, values: Vec<i64>| Ok((key.clone(), values.into_iter().sum::<i64>())),
        4,
    )
    .unwrap();

    // Act
    let results = engine.run_sorted(inputs, 1, false).await.unwrap();

    // Assert
    assert_eq!(
        results,
        vec![
            ("a".to_string(), 2),
            ("b".to_string(), 1),
            ("c".to_string(), 1)
        ]
    );
}
