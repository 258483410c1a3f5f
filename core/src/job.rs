// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::BoxError;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/// Trait that defines a specific map-reduce job.
/// Abstracts the job domain from the execution model.
///
/// Keys are grouped by `Eq`/`Hash`; callers must normalize keys to a
/// canonical form before emitting them, since two equal-but-distinct
/// representations of the same logical key produce two groups.
pub trait MapReduceJob: Send + Sync + 'static {
    /// Opaque input record, consumed by the mapper exactly once
    type Record: Send + 'static;

    /// Grouping key emitted by the mapper
    type Key: Eq + Hash + Debug + Send + 'static;

    /// Value emitted by the mapper, opaque to the engine
    type Value: Send + 'static;

    /// Result of one reducer invocation
    type Output: Send + 'static;

    /// Maps one record to zero or more key-value pairs. An empty
    /// vector means the record contributes nothing (a skipped header
    /// line, a filtered-out row).
    fn map(&self, record: Self::Record) -> Result<Vec<(Self::Key, Self::Value)>, BoxError>;

    /// Reduces all values emitted for one key into a single result.
    fn reduce(&self, key: &Self::Key, values: Vec<Self::Value>) -> Result<Self::Output, BoxError>;
}

/// Adapter that builds a [`MapReduceJob`] from two plain functions.
pub struct FnJob<M, R, Rec, K, V, Out> {
    mapper: M,
    reducer: R,
    _types: PhantomData<fn(Rec) -> (K, V, Out)>,
}

impl<M, R, Rec, K, V, Out> FnJob<M, R, Rec, K, V, Out> {
    pub fn new(mapper: M, reducer: R) -> Self {
        Self {
            mapper,
            reducer,
            _types: PhantomData,
        }
    }
}

impl<M, R, Rec, K, V, Out> MapReduceJob for FnJob<M, R, Rec, K, V, Out>
where
    M: Fn(Rec) -> Result<Vec<(K, V)>, BoxError> + Send + Sync + 'static,
    R: Fn(&K, Vec<V>) -> Result<Out, BoxError> + Send + Sync + 'static,
    Rec: Send + 'static,
    K: Eq + Hash + Debug + Send + 'static,
    V: Send + 'static,
    Out: Send + 'static,
{
    type Record = Rec;
    type Key = K;
    type Value = V;
    type Output = Out;

    fn map(&self, record: Rec) -> Result<Vec<(K, V)>, BoxError> {
        (self.mapper)(record)
    }

    fn reduce(&self, key: &K, values: Vec<V>) -> Result<Out, BoxError> {
        (self.reducer)(key, values)
    }
}
