//! FILENAME: core/grouping-engine/src/lib.rs
//! Run grouping subsystem for the experiment-tracking table.
//!
//! This crate computes how a flat list of experiment runs is partitioned
//! into display groups for a virtualized table, and how numeric values are
//! summarized within each group. It depends on `runs-model` only for the
//! shared entity types (Run, RunMetric, DatasetIdentity).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the grouping IS)
//! - `aggregate`: Key/value reduction across a group's members
//! - `view`: Renderable output for the frontend (WHAT we display)
//! - `engine`: The grouping pass (HOW we partition and expand)
//! - `history`: Synthetic per-step metric series for charting a group

pub mod aggregate;
pub mod definition;
pub mod engine;
pub mod history;
pub mod view;

pub use aggregate::{aggregate_key_values, AggregatedEntity, KeyValueEntity};
pub use definition::{encode_group_by_key, AggregateFunction, GroupByConfig, GroupByMode};
pub use engine::{flat_row_render_metadata, group_render_rows, grouped_row_render_metadata};
pub use history::{
    create_aggregated_metric_history, AggregatedMetricHistory, MetricHistoryEntry,
    SyntheticMetricPoint,
};
pub use view::{GroupRowRenderMetadata, GroupValue, RowRenderMetadata, RunRowRenderMetadata};
