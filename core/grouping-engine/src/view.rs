//! FILENAME: core/grouping-engine/src/view.rs
//! Render metadata - the output records the table displays.
//!
//! A grouping pass produces a flat, ordered list of these records; the
//! virtualized table renders them top to bottom. Consumers distinguish the
//! two record kinds by the `is_group` flag and must not assume shape
//! otherwise.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatedEntity;
use runs_model::{DatasetIdentity, Run};

// ============================================================================
// GROUP VALUE
// ============================================================================

/// The value a group of runs shares.
///
/// The remaining (catch-all) bucket is its own variant rather than a
/// sentinel string, so it can never collide with a legitimate tag or
/// parameter value, including the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupValue {
    /// A shared tag or parameter value.
    Text(String),
    /// A shared dataset identity.
    Dataset(DatasetIdentity),
    /// The catch-all bucket for runs matching no concrete value.
    Remaining,
}

impl GroupValue {
    pub fn is_remaining(&self) -> bool {
        matches!(self, GroupValue::Remaining)
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// Header record for one group of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRowRenderMetadata {
    /// Stable identifier for this group; expand/collapse state is keyed by
    /// it and survives re-grouping with the same config and run set.
    pub group_id: String,

    /// Always true; lets consumers key off one flag.
    pub is_group: bool,

    /// Whether member rows follow this header.
    pub expanded: bool,

    /// Member run ids in bucket order.
    pub run_ids: Vec<String>,

    /// Aggregated metric values across members, one entry per key.
    pub aggregated_metrics: Vec<AggregatedEntity>,

    /// Aggregated (numerically coerced) parameter values across members.
    pub aggregated_params: Vec<AggregatedEntity>,

    /// What the members share.
    pub value: GroupValue,
}

/// Row record for one run inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRowRenderMetadata {
    /// `{group_id}.{run_id}` - unique even when dataset grouping renders
    /// the same run under several groups.
    pub row_id: String,

    /// Always false.
    pub is_group: bool,

    /// The run this row displays.
    pub run: Run,

    /// False for rows in the remaining bucket: they are rendered under the
    /// catch-all header but do not belong to a concrete group.
    pub belongs_to_group: bool,

    /// Only runs without a parent-run tag can be pinned.
    pub is_pinnable: bool,
}

/// One record in the ordered render list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowRenderMetadata {
    Group(GroupRowRenderMetadata),
    Run(RunRowRenderMetadata),
}

impl RowRenderMetadata {
    pub fn is_group(&self) -> bool {
        matches!(self, RowRenderMetadata::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupRowRenderMetadata> {
        match self {
            RowRenderMetadata::Group(g) => Some(g),
            RowRenderMetadata::Run(_) => None,
        }
    }

    pub fn as_run(&self) -> Option<&RunRowRenderMetadata> {
        match self {
            RowRenderMetadata::Group(_) => None,
            RowRenderMetadata::Run(r) => Some(r),
        }
    }
}
