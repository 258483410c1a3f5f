// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;
use std::sync::{Arc, Mutex};

/// All values emitted for one key, handed to exactly one reducer
/// invocation. Value order reflects worker completion order and is
/// unspecified.
#[derive(Debug)]
pub struct Group<K, V> {
    pub key: K,
    pub values: Vec<V>,
}

/// Shared in-memory grouping store for the shuffle stage, using
/// `Arc<Mutex<HashMap>>`. Map workers push pairs as they are
/// produced; the orchestrator drains the store into groups only
/// after every map worker has been joined.
pub struct GroupStore<K, V> {
    map: Arc<Mutex<HashMap<K, Vec<V>>>>,
}

impl<K, V> Clone for GroupStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, V> Default for GroupStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> GroupStore<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            map: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Appends a value to the key's group.
    pub fn push(&self, key: K, value: V) {
        let mut map = self.map.lock().unwrap();
        map.entry(key).or_default().push(value);
    }

    /// Drains the store into one group per distinct key. Group order
    /// is unspecified.
    pub fn into_groups(self) -> Vec<Group<K, V>> {
        let mut map = self.map.lock().unwrap();
        mem::take(&mut *map)
            .into_iter()
            .map(|(key, values)| Group { key, values })
            .collect()
    }
}
