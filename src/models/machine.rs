//! Machine model.
//!
//! A machine belongs to exactly one stage. It owns its clock (the time at
//! which it becomes free) and the ordered list of jobs it has processed.
//! Only the stage scheduler appends to a machine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Eligibility, JobId, JobInstance, StageTiming};

/// One job processed on a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSlot {
    /// Processed job.
    pub job_id: JobId,
    /// Type of the processed job.
    pub job_type: String,
    /// Processing start.
    pub start: i64,
    /// Processing end.
    pub end: i64,
    /// Setup charged before `start`.
    pub setup: i64,
}

impl MachineSlot {
    /// Timing record matching this slot.
    pub fn timing(&self) -> StageTiming {
        StageTiming::new(self.start, self.end, self.setup)
    }

    /// Start of the setup interval `[setup_start, start)`.
    #[inline]
    pub fn setup_start(&self) -> i64 {
        self.start - self.setup
    }

    /// Occupied time including setup.
    #[inline]
    pub fn busy_time(&self) -> i64 {
        self.end - self.start + self.setup
    }
}

/// A parallel machine at one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Machine identifier (unique within its stage).
    pub id: String,
    /// Job types this machine may process.
    pub eligibility: Eligibility,
    /// Processing time per job type (absent = not processable).
    #[serde(skip)]
    durations: BTreeMap<String, i64>,
    /// Time at which the machine becomes free.
    available_at: i64,
    /// Processed jobs in append (dispatch) order.
    slots: Vec<MachineSlot>,
}

impl Machine {
    /// Creates an idle machine with no processing times.
    pub fn new(id: impl Into<String>, eligibility: Eligibility) -> Self {
        Self {
            id: id.into(),
            eligibility,
            durations: BTreeMap::new(),
            available_at: 0,
            slots: Vec::new(),
        }
    }

    /// Sets the processing time of one job type.
    pub fn with_duration(mut self, job_type: impl Into<String>, duration: i64) -> Self {
        self.durations.insert(job_type.into(), duration);
        self
    }

    /// Sets processing times from (job type, duration) pairs.
    pub fn with_durations<I, S>(mut self, durations: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        self.durations
            .extend(durations.into_iter().map(|(t, d)| (t.into(), d)));
        self
    }

    /// Processing time of a job type on this machine.
    pub fn processing_time(&self, job_type: &str) -> Option<i64> {
        self.durations.get(job_type).copied()
    }

    /// Whether this machine can take the job (eligible and timed).
    pub fn accepts(&self, job: &JobInstance) -> bool {
        self.eligibility.accepts(&job.job_type) && self.processing_time(&job.job_type).is_some()
    }

    /// Time at which the machine becomes free.
    pub fn available_at(&self) -> i64 {
        self.available_at
    }

    /// Processed jobs in append order.
    pub fn slots(&self) -> &[MachineSlot] {
        &self.slots
    }

    /// Type of the most recently appended job.
    pub fn last_job_type(&self) -> Option<&str> {
        self.slots.last().map(|s| s.job_type.as_str())
    }

    /// Whether nothing has been assigned yet.
    pub fn is_idle(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends a job and advances the clock to its end.
    pub fn append(&mut self, slot: MachineSlot) {
        debug_assert!(slot.start - slot.setup >= self.available_at);
        self.available_at = slot.end;
        self.slots.push(slot);
    }

    /// Total processing plus setup time.
    pub fn busy_time(&self) -> i64 {
        self.slots.iter().map(MachineSlot::busy_time).sum()
    }

    /// Total setup time charged on this machine.
    pub fn setup_time(&self) -> i64 {
        self.slots.iter().map(|s| s.setup).sum()
    }

    /// Clears assignments, keeping identity and processing times.
    pub fn reset(&mut self) {
        self.available_at = 0;
        self.slots.clear();
    }
}
