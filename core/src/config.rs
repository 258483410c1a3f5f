// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{BoxError, EngineError};
use serde::{Deserialize, Serialize};
use std::fs;

/// Configuration for one map-reduce invocation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobConfig {
    /// Number of concurrent workers per phase
    pub num_workers: usize,
    /// Maximum number of records per chunk
    pub chunksize: usize,
    /// Emit progress diagnostics; never affects results
    #[serde(default)]
    pub debug: bool,
}

impl JobConfig {
    pub fn new(num_workers: usize, chunksize: usize, debug: bool) -> Self {
        Self {
            num_workers,
            chunksize,
            debug,
        }
    }

    pub fn load(path: &str) -> Result<Self, BoxError> {
        let contents = fs::read_to_string(path)?;
        let config: JobConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.num_workers < 1 {
            return Err(EngineError::Config(format!(
                "num_workers must be positive, got {}",
                self.num_workers
            )));
        }
        if self.chunksize < 1 {
            return Err(EngineError::Config(format!(
                "chunksize must be positive, got {}",
                self.chunksize
            )));
        }
        Ok(())
    }
}
