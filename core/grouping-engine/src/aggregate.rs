//! FILENAME: core/grouping-engine/src/aggregate.rs
//! Value aggregation - reduces many per-run key/value lists into one.
//!
//! Group headers show one summarized value per metric/parameter key. This
//! module folds every member run's entities into a single list, one entry
//! per distinct key, using the configured aggregate function.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::AggregateFunction;

// ============================================================================
// ENTITIES
// ============================================================================

/// A borrowed key/value pair fed into aggregation.
///
/// Metric entities carry numeric values directly; parameter entities carry
/// strings that are coerced with `str::parse` (unparseable values coerce to
/// NaN and fall out of the result).
#[derive(Debug, Clone, Copy)]
pub struct KeyValueEntity<'a> {
    pub key: &'a str,
    pub value: f64,
}

impl<'a> KeyValueEntity<'a> {
    pub fn new(key: &'a str, value: f64) -> Self {
        KeyValueEntity { key, value }
    }

    /// Coerces a string value the way the table coerces parameters.
    pub fn parsed(key: &'a str, value: &str) -> Self {
        KeyValueEntity {
            key,
            value: value.parse::<f64>().unwrap_or(f64::NAN),
        }
    }
}

/// One summarized key/value produced by aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEntity {
    pub key: String,
    pub value: f64,
}

// ============================================================================
// ACCUMULATORS
// ============================================================================

/// Running state for one key. NaN contaminates: once any contributing value
/// is NaN the key's final value is NaN and the key is dropped, matching the
/// numeric semantics the table always had.
#[derive(Debug, Clone, Copy)]
enum Accumulator {
    Extremum(f64),
    Mean { sum: f64, count: usize },
}

impl Accumulator {
    fn new(function: AggregateFunction, first: f64) -> Self {
        match function {
            AggregateFunction::Min | AggregateFunction::Max => Accumulator::Extremum(first),
            AggregateFunction::Average => Accumulator::Mean {
                sum: first,
                count: 1,
            },
        }
    }

    fn fold(&mut self, function: AggregateFunction, value: f64) {
        match self {
            Accumulator::Extremum(acc) => {
                *acc = if acc.is_nan() || value.is_nan() {
                    f64::NAN
                } else if function == AggregateFunction::Min {
                    acc.min(value)
                } else {
                    acc.max(value)
                };
            }
            Accumulator::Mean { sum, count } => {
                *sum += value;
                *count += 1;
            }
        }
    }

    fn finish(self) -> f64 {
        match self {
            Accumulator::Extremum(acc) => acc,
            Accumulator::Mean { sum, count } => sum / count as f64,
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Reduces per-run key/value lists into one aggregated list.
///
/// Output ordering is insertion order: the first time a key is seen across
/// the concatenation of all lists fixes its position, so column ordering is
/// stable across re-renders with identical input. Keys whose final value is
/// NaN are dropped.
pub fn aggregate_key_values<'a, I, E>(
    entity_lists: I,
    aggregate_function: AggregateFunction,
) -> Vec<AggregatedEntity>
where
    I: IntoIterator<Item = E>,
    E: IntoIterator<Item = KeyValueEntity<'a>>,
{
    // Parallel structures: the map finds a key's slot, the vec keeps
    // first-seen order.
    let mut slots: FxHashMap<String, usize> = FxHashMap::default();
    let mut ordered: Vec<(String, Accumulator)> = Vec::new();

    for list in entity_lists {
        for entity in list {
            match slots.get(entity.key) {
                Some(&idx) => ordered[idx].1.fold(aggregate_function, entity.value),
                None => {
                    slots.insert(entity.key.to_string(), ordered.len());
                    ordered.push((
                        entity.key.to_string(),
                        Accumulator::new(aggregate_function, entity.value),
                    ));
                }
            }
        }
    }

    ordered
        .into_iter()
        .filter_map(|(key, acc)| {
            let value = acc.finish();
            if value.is_nan() {
                None
            } else {
                Some(AggregatedEntity { key, value })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists<'a>(data: &'a [Vec<(&'a str, f64)>]) -> Vec<Vec<KeyValueEntity<'a>>> {
        data.iter()
            .map(|run| {
                run.iter()
                    .map(|&(k, v)| KeyValueEntity::new(k, v))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_average() {
        let data = vec![vec![("a", 2.0)], vec![("a", 4.0)]];
        let result = aggregate_key_values(lists(&data), AggregateFunction::Average);
        assert_eq!(
            result,
            vec![AggregatedEntity {
                key: "a".to_string(),
                value: 3.0
            }]
        );
    }

    #[test]
    fn test_min_and_max() {
        let data = vec![vec![("a", 2.0)], vec![("a", 4.0)]];
        let max = aggregate_key_values(lists(&data), AggregateFunction::Max);
        assert_eq!(max[0].value, 4.0);

        let min = aggregate_key_values(lists(&data), AggregateFunction::Min);
        assert_eq!(min[0].value, 2.0);
    }

    #[test]
    fn test_all_nan_key_is_dropped() {
        let data = vec![
            vec![("a", 1.0), ("b", f64::NAN)],
            vec![("b", f64::NAN), ("a", 3.0)],
        ];
        let result = aggregate_key_values(lists(&data), AggregateFunction::Average);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].key, "a");
        assert_eq!(result[0].value, 2.0);
    }

    #[test]
    fn test_nan_contaminates_mixed_key() {
        let data = vec![vec![("a", 1.0)], vec![("a", f64::NAN)]];
        for func in [
            AggregateFunction::Min,
            AggregateFunction::Max,
            AggregateFunction::Average,
        ] {
            let result = aggregate_key_values(lists(&data), func);
            assert!(result.is_empty(), "{:?} should drop contaminated key", func);
        }
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let data = vec![
            vec![("loss", 1.0), ("acc", 0.8)],
            vec![("acc", 0.9), ("f1", 0.7), ("loss", 2.0)],
        ];
        let result = aggregate_key_values(lists(&data), AggregateFunction::Min);
        let keys: Vec<&str> = result.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["loss", "acc", "f1"]);
    }

    #[test]
    fn test_string_coercion() {
        let entity = KeyValueEntity::parsed("lr", "0.5");
        assert_eq!(entity.value, 0.5);

        let bad = KeyValueEntity::parsed("name", "resnet");
        assert!(bad.value.is_nan());
    }

    #[test]
    fn test_empty_input() {
        let result =
            aggregate_key_values(Vec::<Vec<KeyValueEntity>>::new(), AggregateFunction::Max);
        assert!(result.is_empty());
    }
}
