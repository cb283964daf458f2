//! FILENAME: core/runs-model/src/lib.rs
//! PURPOSE: Main library entry point for the shared run entity types.
//! CONTEXT: Re-exports public types for use by the grouping engine and the
//! host application.

pub mod dataset;
pub mod run;

// Re-export commonly used types at the crate root
pub use dataset::DatasetIdentity;
pub use run::{Run, RunMetric, RunParam, TAG_PARENT_RUN_ID};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_runs() {
        let run = Run::new("run-1")
            .with_param("lr", "0.01")
            .with_metric(RunMetric::new("loss", 0.5, 1, 100));

        assert_eq!(run.run_id, "run-1");
        assert_eq!(run.param("lr"), Some("0.01"));
        assert_eq!(run.metrics.len(), 1);
    }

    #[test]
    fn it_detects_child_runs() {
        let parent = Run::new("parent");
        let child = Run::new("child").with_tag(TAG_PARENT_RUN_ID, "parent");

        assert!(!parent.is_child_run());
        assert!(child.is_child_run());
        assert_eq!(child.parent_run_id(), Some("parent"));
    }
}
