//! FILENAME: core/grouping-engine/src/engine.rs
//! Grouping Engine - partitions runs into display groups.
//!
//! This module takes the run list, the grouping configuration and the
//! caller-owned expand/collapse state, and produces the ordered render
//! record list the table displays.
//!
//! Algorithm:
//! 1. Bucket runs by the configured field (tag/param) or by dataset identity
//! 2. Route runs with no value into the remaining (catch-all) bucket
//! 3. For each bucket, emit one header record with aggregated values
//! 4. For expanded buckets, append one row record per member run
//!
//! The pass is a pure function: it never mutates its inputs, and the same
//! config + run set always produces the same group identifiers, so the
//! caller's expand/collapse map stays valid across passes.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::HashMap;

use crate::aggregate::{aggregate_key_values, KeyValueEntity};
use crate::definition::{AggregateFunction, GroupByConfig, GroupByMode};
use crate::view::{GroupRowRenderMetadata, GroupValue, RowRenderMetadata, RunRowRenderMetadata};
use runs_model::Run;

// ============================================================================
// BUCKETS
// ============================================================================

/// One concrete group discovered during partitioning.
struct Bucket<'a> {
    id: String,
    value: GroupValue,
    members: Vec<&'a Run>,
}

/// Identifier for a concrete group: `{mode}.{field}.{value}`.
fn group_id(mode: GroupByMode, field: &str, value_token: &str) -> String {
    format!("{}.{}.{}", mode.as_str(), field, value_token)
}

/// Identifier for the remaining bucket: `{mode}.{field}`.
fn remaining_group_id(mode: GroupByMode, field: &str) -> String {
    format!("{}.{}", mode.as_str(), field)
}

/// Buckets runs by a string-valued field (tag or parameter value).
///
/// Exclusive partition: each run lands in exactly one bucket. Runs with an
/// absent or empty value go to the remaining list. Bucket order is the
/// order of first appearance of each distinct value.
fn partition_by_field<'a>(
    runs: &'a [Run],
    mode: GroupByMode,
    field: &str,
    extract: impl Fn(&'a Run) -> Option<&'a str>,
) -> (Vec<Bucket<'a>>, Vec<&'a Run>) {
    let mut slots: FxHashMap<&'a str, usize> = FxHashMap::default();
    let mut buckets: Vec<Bucket<'a>> = Vec::new();
    let mut remaining: Vec<&'a Run> = Vec::new();

    for run in runs {
        let value = match extract(run) {
            Some(v) if !v.is_empty() => v,
            _ => {
                remaining.push(run);
                continue;
            }
        };

        let idx = match slots.get(value) {
            Some(&idx) => idx,
            None => {
                slots.insert(value, buckets.len());
                buckets.push(Bucket {
                    id: group_id(mode, field, value),
                    value: GroupValue::Text(value.to_string()),
                    members: Vec::new(),
                });
                buckets.len() - 1
            }
        };
        buckets[idx].members.push(run);
    }

    (buckets, remaining)
}

/// Buckets runs by dataset identity.
///
/// Deliberately many-to-many: a run joins the bucket of EVERY distinct
/// dataset it references, so the same run may render under several groups.
/// A run referencing the same dataset twice is added to that bucket once.
/// Runs with no dataset references go to the remaining list.
fn partition_by_dataset(runs: &[Run]) -> (Vec<Bucket<'_>>, Vec<&Run>) {
    let mut slots: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    let mut buckets: Vec<Bucket<'_>> = Vec::new();
    // Per-bucket duplicate-add guard, parallel to `buckets`.
    let mut seen: Vec<FxHashSet<&str>> = Vec::new();
    let mut remaining: Vec<&Run> = Vec::new();

    for run in runs {
        if run.dataset_inputs.is_empty() {
            remaining.push(run);
            continue;
        }

        for dataset in &run.dataset_inputs {
            let slot_key = (dataset.name.as_str(), dataset.digest.as_str());
            let idx = match slots.get(&slot_key) {
                Some(&idx) => idx,
                None => {
                    slots.insert(slot_key, buckets.len());
                    buckets.push(Bucket {
                        id: group_id(GroupByMode::Dataset, "", &dataset.group_token()),
                        value: GroupValue::Dataset(dataset.clone()),
                        members: Vec::new(),
                    });
                    seen.push(FxHashSet::default());
                    buckets.len() - 1
                }
            };
            if seen[idx].insert(run.run_id.as_str()) {
                buckets[idx].members.push(run);
            }
        }
    }

    (buckets, remaining)
}

// ============================================================================
// RENDER METADATA BUILDER
// ============================================================================

/// Builds the ordered record list for one group.
///
/// The header always comes first and always carries the aggregated metric
/// and parameter values, even for a collapsed group. Member rows are only
/// materialized when the group is expanded.
pub fn group_render_rows(
    group_id: &str,
    expanded: bool,
    members: &[&Run],
    aggregate_function: AggregateFunction,
    value: GroupValue,
    is_remaining: bool,
) -> Vec<RowRenderMetadata> {
    let aggregated_metrics = aggregate_key_values(
        members.iter().map(|run| {
            run.metrics
                .iter()
                .map(|m| KeyValueEntity::new(&m.key, m.value))
        }),
        aggregate_function,
    );
    let aggregated_params = aggregate_key_values(
        members.iter().map(|run| {
            run.params
                .iter()
                .map(|p| KeyValueEntity::parsed(&p.key, &p.value))
        }),
        aggregate_function,
    );

    let mut records = Vec::with_capacity(if expanded { 1 + members.len() } else { 1 });
    records.push(RowRenderMetadata::Group(GroupRowRenderMetadata {
        group_id: group_id.to_string(),
        is_group: true,
        expanded,
        run_ids: members.iter().map(|run| run.run_id.clone()).collect(),
        aggregated_metrics,
        aggregated_params,
        value,
    }));

    if expanded {
        for run in members {
            records.push(RowRenderMetadata::Run(RunRowRenderMetadata {
                row_id: format!("{}.{}", group_id, run.run_id),
                is_group: false,
                run: (*run).clone(),
                belongs_to_group: !is_remaining,
                is_pinnable: !run.is_child_run(),
            }));
        }
    }

    records
}

// ============================================================================
// GROUPING PASS
// ============================================================================

/// Runs one grouping pass and returns the ordered render record list.
///
/// Returns `None` when no grouping is configured; the caller then renders
/// the flat list (`flat_row_render_metadata`).
///
/// Expansion defaults: a concrete group is expanded unless the caller's
/// state map explicitly says `false`; the remaining bucket is collapsed
/// unless the map explicitly says `true`. Concrete groups are the primary
/// focus, the catch-all is supplementary.
pub fn grouped_row_render_metadata(
    runs: &[Run],
    config: Option<&GroupByConfig>,
    groups_expanded: &HashMap<String, bool>,
) -> Option<Vec<RowRenderMetadata>> {
    let config = config?;

    let (buckets, remaining) = match config.mode {
        GroupByMode::Tag => {
            partition_by_field(runs, GroupByMode::Tag, &config.group_by_data, |run| {
                run.tag(&config.group_by_data)
            })
        }
        GroupByMode::Param => {
            partition_by_field(runs, GroupByMode::Param, &config.group_by_data, |run| {
                run.param(&config.group_by_data)
            })
        }
        GroupByMode::Dataset => partition_by_dataset(runs),
    };

    let mut records = Vec::new();
    for bucket in &buckets {
        let expanded = groups_expanded.get(&bucket.id).copied().unwrap_or(true);
        records.extend(group_render_rows(
            &bucket.id,
            expanded,
            &bucket.members,
            config.aggregate_function,
            bucket.value.clone(),
            false,
        ));
    }

    if !remaining.is_empty() {
        let id = remaining_group_id(config.mode, &config.group_by_data);
        let expanded = groups_expanded.get(&id).copied().unwrap_or(false);
        records.extend(group_render_rows(
            &id,
            expanded,
            &remaining,
            config.aggregate_function,
            GroupValue::Remaining,
            true,
        ));
    }

    debug!(
        "grouping pass: {} runs -> {} groups ({} ungrouped)",
        runs.len(),
        buckets.len(),
        remaining.len()
    );

    Some(records)
}

/// The ungrouped fallback: one row per run, in input order.
///
/// Used when `grouped_row_render_metadata` returns `None`. Rows keep their
/// plain run id since there is no group to disambiguate against.
pub fn flat_row_render_metadata(runs: &[Run]) -> Vec<RowRenderMetadata> {
    runs.iter()
        .map(|run| {
            RowRenderMetadata::Run(RunRowRenderMetadata {
                row_id: run.run_id.clone(),
                is_group: false,
                run: run.clone(),
                belongs_to_group: false,
                is_pinnable: !run.is_child_run(),
            })
        })
        .collect()
}
