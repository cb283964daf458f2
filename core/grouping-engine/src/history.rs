//! FILENAME: core/grouping-engine/src/history.rs
//! Synthetic metric history - per-step aggregates for charting a group.
//!
//! The chart view draws a grouped set of runs as one line per aggregate
//! variant. This module builds those synthetic series directly from the
//! flattened raw histories, without re-running the grouping pass.

use serde::{Deserialize, Serialize};

use runs_model::RunMetric;

// ============================================================================
// ENTITIES
// ============================================================================

/// One raw history sample, flattened across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricHistoryEntry {
    pub value: f64,
    pub step: i64,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
}

impl MetricHistoryEntry {
    pub fn new(value: f64, step: i64, timestamp: i64) -> Self {
        MetricHistoryEntry {
            value,
            step,
            timestamp,
        }
    }
}

impl From<&RunMetric> for MetricHistoryEntry {
    fn from(metric: &RunMetric) -> Self {
        MetricHistoryEntry {
            value: metric.value,
            step: metric.step,
            timestamp: metric.timestamp,
        }
    }
}

/// One point of a synthetic aggregated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticMetricPoint {
    pub key: String,
    pub step: i64,
    /// NaN when no raw entries contributed at this step. Callers must treat
    /// NaN as "no data", never plot it as zero.
    pub value: f64,
    /// Rounded average of contributing timestamps; 0 when the step has no
    /// contributors (the NaN value is the no-data signal, check it first).
    pub timestamp: i64,
}

/// The three parallel synthetic series for one metric, one point per
/// requested step in each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetricHistory {
    pub min: Vec<SyntheticMetricPoint>,
    pub max: Vec<SyntheticMetricPoint>,
    pub average: Vec<SyntheticMetricPoint>,
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Builds the min/max/average synthetic series for `metric_key` over the
/// requested steps.
///
/// `entries` is the flattened raw history of every member run. Entries are
/// matched to steps by exact step number; a step with no matches yields a
/// NaN-valued point in all three series.
pub fn create_aggregated_metric_history(
    steps: &[i64],
    metric_key: &str,
    entries: &[MetricHistoryEntry],
) -> AggregatedMetricHistory {
    let mut min = Vec::with_capacity(steps.len());
    let mut max = Vec::with_capacity(steps.len());
    let mut average = Vec::with_capacity(steps.len());

    for &step in steps {
        let mut min_value = f64::NAN;
        let mut max_value = f64::NAN;
        let mut sum = 0.0;
        let mut timestamp_sum: i64 = 0;
        let mut count: usize = 0;

        for entry in entries.iter().filter(|e| e.step == step) {
            if count == 0 {
                // First contributor initializes the extrema.
                min_value = entry.value;
                max_value = entry.value;
            } else {
                // NaN contaminates all three variants alike, matching the
                // key/value aggregator: a step is either data in every
                // series or no-data in every series.
                min_value = if min_value.is_nan() || entry.value.is_nan() {
                    f64::NAN
                } else {
                    min_value.min(entry.value)
                };
                max_value = if max_value.is_nan() || entry.value.is_nan() {
                    f64::NAN
                } else {
                    max_value.max(entry.value)
                };
            }
            sum += entry.value;
            timestamp_sum += entry.timestamp;
            count += 1;
        }

        let (average_value, timestamp) = if count > 0 {
            (
                sum / count as f64,
                (timestamp_sum as f64 / count as f64).round() as i64,
            )
        } else {
            (f64::NAN, 0)
        };

        min.push(SyntheticMetricPoint {
            key: metric_key.to_string(),
            step,
            value: min_value,
            timestamp,
        });
        max.push(SyntheticMetricPoint {
            key: metric_key.to_string(),
            step,
            value: max_value,
            timestamp,
        });
        average.push(SyntheticMetricPoint {
            key: metric_key.to_string(),
            step,
            value: average_value,
            timestamp,
        });
    }

    AggregatedMetricHistory { min, max, average }
}
