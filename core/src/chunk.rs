// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// A contiguous slice of the input, claimed atomically by one worker.
///
/// Chunk ids follow input order; together the chunks partition the
/// input exactly once.
#[derive(Debug)]
pub struct Chunk<T> {
    pub id: usize,
    pub records: Vec<T>,
}

/// Splits the input into chunks of at most `chunksize` records,
/// lazily and in input order. The last chunk may be shorter; a
/// `chunksize` larger than the input yields a single chunk; empty
/// input yields no chunks.
pub fn partition<T>(records: Vec<T>, chunksize: usize) -> impl Iterator<Item = Chunk<T>> {
    let mut records = records.into_iter();
    let mut next_id = 0;
    std::iter::from_fn(move || {
        let batch: Vec<T> = records.by_ref().take(chunksize).collect();
        if batch.is_empty() {
            return None;
        }
        let id = next_id;
        next_id += 1;
        Some(Chunk { id, records: batch })
    })
}
