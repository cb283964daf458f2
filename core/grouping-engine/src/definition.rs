//! FILENAME: core/grouping-engine/src/definition.rs
//! Grouping Definition - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a grouping: which field the
//! runs are bucketed by and how member values are summarized. These
//! structures are designed to be:
//! - Serializable (for saving view state)
//! - Round-trippable through a single URL-safe string token
//! - Immutable snapshots of user intent

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// GROUPING MODE
// ============================================================================

/// What attribute of a run the grouping keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupByMode {
    /// Group by the value of a named tag.
    Tag,
    /// Group by the value of a named parameter.
    Param,
    /// Group by associated dataset identity (name + digest).
    Dataset,
}

impl GroupByMode {
    /// Lowercase token used in the persisted key format.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupByMode::Tag => "tag",
            GroupByMode::Param => "param",
            GroupByMode::Dataset => "dataset",
        }
    }

    /// Parses a persisted token. Unrecognized tokens are rejected.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "tag" => Some(GroupByMode::Tag),
            "param" => Some(GroupByMode::Param),
            "dataset" => Some(GroupByMode::Dataset),
            _ => None,
        }
    }
}

// ============================================================================
// AGGREGATE FUNCTION
// ============================================================================

/// Supported aggregate functions for group summaries.
///
/// The set is closed: the codec rejects any other token, so downstream code
/// can match exhaustively and no "unknown function" path exists at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Min,
    Max,
    Average,
}

impl Default for AggregateFunction {
    fn default() -> Self {
        AggregateFunction::Average
    }
}

impl AggregateFunction {
    /// Lowercase token used in the persisted key format.
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Average => "average",
        }
    }

    /// Parses a persisted token. Unrecognized tokens are rejected.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "min" => Some(AggregateFunction::Min),
            "max" => Some(AggregateFunction::Max),
            "average" => Some(AggregateFunction::Average),
            _ => None,
        }
    }
}

// ============================================================================
// GROUP BY CONFIG
// ============================================================================

/// The complete, serializable description of one grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupByConfig {
    /// What run attribute to group by.
    pub mode: GroupByMode,

    /// How member values are summarized in group headers.
    pub aggregate_function: AggregateFunction,

    /// The tag or parameter name to group by.
    /// Empty for `GroupByMode::Dataset`.
    pub group_by_data: String,
}

impl GroupByConfig {
    pub fn new(
        mode: GroupByMode,
        aggregate_function: AggregateFunction,
        group_by_data: impl Into<String>,
    ) -> Self {
        GroupByConfig {
            mode,
            aggregate_function,
            group_by_data: group_by_data.into(),
        }
    }

    /// Serializes this config to its persisted single-string form:
    /// `{mode}.{aggregate_function}.{group_by_data}`.
    pub fn to_key(&self) -> String {
        encode_group_by_key(
            Some(self.mode),
            &self.group_by_data,
            self.aggregate_function,
        )
    }

    /// Parses a persisted key back into a config.
    ///
    /// Returns `None` for an empty token, or when the mode/aggregate
    /// function token is not recognized. The grouping field is the greedy
    /// remainder after the first two dot-delimited tokens, so it may itself
    /// contain dots.
    pub fn from_key(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }

        let (mode_token, rest) = token.split_once('.')?;
        let (func_token, group_by_data) = rest.split_once('.')?;

        let mode = match GroupByMode::from_token(mode_token) {
            Some(m) => m,
            None => {
                warn!("ignoring group-by key with unknown mode: {:?}", mode_token);
                return None;
            }
        };
        let aggregate_function = match AggregateFunction::from_token(func_token) {
            Some(f) => f,
            None => {
                warn!(
                    "ignoring group-by key with unknown aggregate function: {:?}",
                    func_token
                );
                return None;
            }
        };

        Some(GroupByConfig {
            mode,
            aggregate_function,
            group_by_data: group_by_data.to_string(),
        })
    }
}

impl fmt::Display for GroupByConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

impl FromStr for GroupByConfig {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupByConfig::from_key(s).ok_or(())
    }
}

/// Serializes a grouping configuration to its persisted single-string form.
///
/// Returns the empty string when `mode` is absent (no grouping configured);
/// the empty string decodes back to `None`.
pub fn encode_group_by_key(
    mode: Option<GroupByMode>,
    group_by_data: &str,
    aggregate_function: AggregateFunction,
) -> String {
    match mode {
        Some(mode) => format!(
            "{}.{}.{}",
            mode.as_str(),
            aggregate_function.as_str(),
            group_by_data
        ),
        None => String::new(),
    }
}
