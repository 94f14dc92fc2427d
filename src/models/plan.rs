//! Process plan.
//!
//! The immutable definition of the shop: job types, stages in order, and
//! per stage the machines with their eligibility and resolved processing
//! times. Processing times are resolved once at load time and stored on
//! each machine keyed by job type name, whatever form the configuration
//! used. Lookups never depend on the order jobs were declared in.

use serde::{Deserialize, Serialize};

use super::{Machine, Stage};

/// Shop definition consumed by dispatching and scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPlan {
    /// Job type names, indexed by job-type index.
    job_types: Vec<String>,
    /// Stage templates (idle machines) in stage order.
    stages: Vec<Stage>,
}

impl ProcessPlan {
    /// Creates a plan for the given job types.
    pub fn new<I, S>(job_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            job_types: job_types.into_iter().map(Into::into).collect(),
            stages: Vec::new(),
        }
    }

    /// Appends a stage; its position is the current stage count.
    pub fn with_stage(mut self, id: impl Into<String>, machines: Vec<Machine>) -> Self {
        self.push_stage(id, machines);
        self
    }

    /// Appends a stage in place.
    pub fn push_stage(&mut self, id: impl Into<String>, machines: Vec<Machine>) {
        let position = self.stages.len();
        let mut stage = Stage::new(id, position);
        stage.machines = machines;
        self.stages.push(stage);
    }

    /// Number of stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage templates in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Job type names in index order.
    pub fn job_types(&self) -> &[String] {
        &self.job_types
    }

    /// Index of a job type.
    pub fn type_index(&self, job_type: &str) -> Option<usize> {
        self.job_types.iter().position(|t| t == job_type)
    }

    /// Processing time of a job type on one machine.
    pub fn duration(&self, job_type: &str, stage: usize, machine: usize) -> Option<i64> {
        let m = self.stages.get(stage)?.machines.get(machine)?;
        if !m.eligibility.accepts(job_type) {
            return None;
        }
        m.processing_time(job_type)
    }

    /// Shortest processing time of a job type at a stage over its eligible
    /// machines (`None` if no machine can take it).
    pub fn min_duration(&self, job_type: &str, stage: usize) -> Option<i64> {
        let machine_count = self.stages.get(stage)?.machines.len();
        (0..machine_count)
            .filter_map(|m| self.duration(job_type, stage, m))
            .min()
    }

    /// Total processing time of a job type: the sum over stages of
    /// [`min_duration`](Self::min_duration). Stages with no eligible
    /// machine contribute nothing. Saturates at `i64::MAX`.
    pub fn total_processing_time(&self, job_type: &str) -> i64 {
        (0..self.stages.len())
            .filter_map(|s| self.min_duration(job_type, s))
            .fold(0, i64::saturating_add)
    }

    /// Fresh stages with idle machines for one scheduling run.
    pub fn instantiate(&self) -> Vec<Stage> {
        let mut stages = self.stages.clone();
        for machine in stages.iter_mut().flat_map(|s| s.machines.iter_mut()) {
            machine.reset();
        }
        stages
    }
}
