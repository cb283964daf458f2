//! FILENAME: core/runs-model/src/run.rs
//! PURPOSE: The Run entity and its parameter/metric sub-entities.
//!
//! A Run is one recorded experiment execution. It is a plain data snapshot
//! supplied by the data-fetching layer; the grouping engine never mutates
//! runs, it only reads them during a pass.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::dataset::DatasetIdentity;

// ============================================================================
// RESERVED TAGS
// ============================================================================

/// Tag naming the parent run of a nested (child) run.
/// Runs carrying this tag are rendered but cannot be pinned.
pub const TAG_PARENT_RUN_ID: &str = "parent_run_id";

// ============================================================================
// SUB-ENTITIES
// ============================================================================

/// A single logged parameter: string key, string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParam {
    pub key: String,
    pub value: String,
}

impl RunParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        RunParam {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single logged metric value at a given step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetric {
    pub key: String,
    pub value: f64,
    pub step: i64,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
}

impl RunMetric {
    pub fn new(key: impl Into<String>, value: f64, step: i64, timestamp: i64) -> Self {
        RunMetric {
            key: key.into(),
            value,
            step,
            timestamp,
        }
    }
}

// ============================================================================
// RUN
// ============================================================================

/// One experiment execution with its logged data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier for this run.
    pub run_id: String,

    /// Logged parameters (latest value per key).
    pub params: Vec<RunParam>,

    /// Logged metrics (latest value per key).
    pub metrics: Vec<RunMetric>,

    /// Tag name -> tag value.
    pub tags: HashMap<String, String>,

    /// Datasets this run consumed. Usually 0-2 entries.
    pub dataset_inputs: SmallVec<[DatasetIdentity; 2]>,
}

impl Run {
    pub fn new(run_id: impl Into<String>) -> Self {
        Run {
            run_id: run_id.into(),
            params: Vec::new(),
            metrics: Vec::new(),
            tags: HashMap::new(),
            dataset_inputs: SmallVec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(RunParam::new(key, value));
        self
    }

    pub fn with_metric(mut self, metric: RunMetric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    pub fn with_dataset(mut self, dataset: DatasetIdentity) -> Self {
        self.dataset_inputs.push(dataset);
        self
    }

    /// Looks up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(|v| v.as_str())
    }

    /// Looks up a parameter value by key (first match).
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// The parent run id, if this run was nested under another run.
    pub fn parent_run_id(&self) -> Option<&str> {
        self.tag(TAG_PARENT_RUN_ID)
    }

    /// Whether this run is a child (nested) run.
    pub fn is_child_run(&self) -> bool {
        self.parent_run_id().is_some()
    }
}
