//! Dispatch context for rule evaluation.

use std::collections::HashMap;

use crate::models::ProcessPlan;

/// Data a dispatching rule may consult when scoring a job.
///
/// Holds the total processing time per job type, computed once from the
/// process plan (sum over stages of the shortest eligible machine).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchContext {
    total_processing_time: HashMap<String, i64>,
}

impl DispatchContext {
    /// Builds the context for a process plan.
    pub fn from_plan(plan: &ProcessPlan) -> Self {
        Self {
            total_processing_time: plan
                .job_types()
                .iter()
                .map(|t| (t.clone(), plan.total_processing_time(t)))
                .collect(),
        }
    }

    /// Total processing time of a job type (0 for an unknown type).
    pub fn total_processing_time(&self, job_type: &str) -> i64 {
        self.total_processing_time
            .get(job_type)
            .copied()
            .unwrap_or(0)
    }
}
