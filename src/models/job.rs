//! Job model and job catalog.
//!
//! A job instance is one unit of demand. It carries its job type and,
//! per stage, the timing record written by the scheduler.
//!
//! # Time Representation
//! All times are integer time units relative to the scheduling epoch (t=0).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sequential job identifier (1-based, stable for one run).
pub type JobId = u32;

/// Demand table: job type → number of instances.
///
/// Iteration order is declaration order. It determines job ids and the
/// dense job-type index used throughout the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Demand {
    #[serde(with = "crate::ordered_map")]
    entries: Vec<(String, u32)>,
}

impl Demand {
    /// Creates an empty demand table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the count for a job type.
    ///
    /// An existing type keeps its position and only its count changes.
    pub fn with(mut self, job_type: impl Into<String>, count: u32) -> Self {
        self.set(job_type, count);
        self
    }

    /// Sets the count for a job type in place.
    pub fn set(&mut self, job_type: impl Into<String>, count: u32) {
        let job_type = job_type.into();
        match self.entries.iter_mut().find(|(t, _)| *t == job_type) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((job_type, count)),
        }
    }

    /// Count for a job type (0 if not declared).
    pub fn count(&self, job_type: &str) -> u32 {
        self.entries
            .iter()
            .find(|(t, _)| t == job_type)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// Declared job types in order.
    pub fn job_types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// Position of a job type in declaration order.
    pub fn type_index(&self, job_type: &str) -> Option<usize> {
        self.entries.iter().position(|(t, _)| t == job_type)
    }

    /// Total number of job instances.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }

    /// Number of declared job types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no job type is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Timing of one job at one stage.
///
/// The setup interval, when non-zero, occupies `[start - setup, start)`
/// on the same machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    /// Processing start.
    pub start: i64,
    /// Processing end.
    pub end: i64,
    /// Setup charged before `start`.
    pub setup: i64,
}

impl StageTiming {
    /// Creates a timing record.
    pub const fn new(start: i64, end: i64, setup: i64) -> Self {
        Self { start, end, setup }
    }

    /// Processing duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Start of the setup interval.
    #[inline]
    pub fn setup_start(&self) -> i64 {
        self.start - self.setup
    }
}

/// One unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInstance {
    /// Sequential identifier.
    pub id: JobId,
    /// Job type name.
    pub job_type: String,
    /// Timing per stage position. Absent = never scheduled at that stage.
    timings: BTreeMap<usize, StageTiming>,
}

impl JobInstance {
    /// Creates an unscheduled job.
    pub fn new(id: JobId, job_type: impl Into<String>) -> Self {
        Self {
            id,
            job_type: job_type.into(),
            timings: BTreeMap::new(),
        }
    }

    /// Timing at a stage position, if scheduled there.
    pub fn timing(&self, stage: usize) -> Option<&StageTiming> {
        self.timings.get(&stage)
    }

    /// Writes the timing record for a stage.
    ///
    /// Records are write-once: returns `false` and leaves the existing
    /// record untouched if the stage was already scheduled.
    pub fn record(&mut self, stage: usize, timing: StageTiming) -> bool {
        if self.timings.contains_key(&stage) {
            return false;
        }
        self.timings.insert(stage, timing);
        true
    }

    /// Drops every timing record, making the job unscheduled again.
    pub fn clear_timings(&mut self) {
        self.timings.clear();
    }

    /// Whether the job has a timing record at `stage`.
    pub fn is_scheduled_at(&self, stage: usize) -> bool {
        self.timings.contains_key(&stage)
    }

    /// All timing records in stage order.
    pub fn timings(&self) -> impl Iterator<Item = (usize, &StageTiming)> {
        self.timings.iter().map(|(s, t)| (*s, t))
    }

    /// Number of stages the job was scheduled at.
    pub fn scheduled_stage_count(&self) -> usize {
        self.timings.len()
    }

    /// Latest end over all recorded stages.
    pub fn completion_time(&self) -> Option<i64> {
        self.timings.values().map(|t| t.end).max()
    }
}

/// Enumerates job instances from a demand table.
///
/// Ids start at 1 and follow declaration order: every instance of one
/// type precedes the next type. A zero count yields no instances.
pub fn build_jobs(demand: &Demand) -> Vec<JobInstance> {
    let mut jobs = Vec::with_capacity(demand.total() as usize);
    let mut next_id: JobId = 1;
    for (job_type, count) in demand.iter() {
        for _ in 0..count {
            jobs.push(JobInstance::new(next_id, job_type));
            next_id += 1;
        }
    }
    jobs
}
