// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::mem;
use std::sync::{Arc, Mutex};

/// Shared accumulation buffer for the collect stage. Reduce workers
/// push one `(key, output)` pair per group; keeping the key alongside
/// the output lets the orchestrator offer a sorted, deterministic
/// output mode without inspecting the output itself.
pub struct ResultStore<K, O> {
    results: Arc<Mutex<Vec<(K, O)>>>,
}

impl<K, O> Clone for ResultStore<K, O> {
    fn clone(&self) -> Self {
        Self {
            results: self.results.clone(),
        }
    }
}

impl<K, O> Default for ResultStore<K, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, O> ResultStore<K, O> {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, key: K, output: O) {
        let mut results = self.results.lock().unwrap();
        results.push((key, output));
    }

    pub fn into_results(self) -> Vec<(K, O)> {
        let mut results = self.results.lock().unwrap();
        mem::take(&mut *results)
    }
}
