//! Schedule (solution) snapshot.
//!
//! The result of one scheduling run: every stage with its machines and
//! their ordered slots, every job with its per-stage timing records, and
//! the (job, stage) pairs that could not be placed. All queries are pure
//! projections of this data.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Deserializer, Serialize};

use super::{JobId, JobInstance, Machine, MachineSlot, SetupTable, Stage, StageTiming};

/// Result of a scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Name of the dispatch rule that produced the job order.
    pub rule: String,
    /// Stages with their machines' timelines.
    pub stages: Vec<Stage>,
    /// Jobs sorted by id.
    #[serde(deserialize_with = "deserialize_sorted_jobs")]
    pub jobs: Vec<JobInstance>,
    /// Job ids in dispatch (priority) order.
    pub dispatch_order: Vec<JobId>,
    /// (job, stage) pairs left without a timing record.
    pub unscheduled: Vec<UnscheduledJob>,
}

fn deserialize_sorted_jobs<'de, D>(deserializer: D) -> Result<Vec<JobInstance>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut jobs = Vec::<JobInstance>::deserialize(deserializer)?;
    jobs.sort_by_key(|j| j.id);
    Ok(jobs)
}

/// A (job, stage) pair that received no machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledJob {
    /// Job left unscheduled.
    pub job_id: JobId,
    /// Its job type.
    pub job_type: String,
    /// Stage identifier.
    pub stage_id: String,
    /// 0-based stage position.
    pub stage: usize,
    /// Why the job was not placed.
    pub reason: UnscheduledReason,
}

/// Why a job has no timing record at a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscheduledReason {
    /// No machine at the stage accepts the job type.
    NoEligibleMachine,
    /// An earlier stage failed and the run abandons the job's later stages.
    EarlierStageUnscheduled,
}

/// One step of a job's stage-by-stage trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry<'a> {
    /// Stage identifier.
    pub stage_id: &'a str,
    /// 0-based stage position.
    pub stage: usize,
    /// Machine that processed the job (`None` = never scheduled here).
    pub machine_id: Option<&'a str>,
    /// Timing record (`None` = never scheduled here).
    pub timing: Option<StageTiming>,
}

/// Gantt rows of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTimeline<'a> {
    /// Stage identifier.
    pub stage_id: &'a str,
    /// One row per machine, in declaration order.
    pub machines: Vec<MachineTimeline<'a>>,
}

/// Gantt row of one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineTimeline<'a> {
    /// Machine identifier.
    pub machine_id: &'a str,
    /// Slots in start order; each occupies `[setup_start, end)`.
    pub slots: &'a [MachineSlot],
}

/// A constraint violation found by [`Schedule::verify`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (job id or "stage/machine").
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A stage started before the job's previous stage ended.
    PrecedenceViolation,
    /// A job started before the previous job on its machine ended plus setup.
    SetupGapViolation,
    /// The first job on a machine was charged a setup.
    FirstSetupCharged,
    /// A job runs on a machine that does not accept its type.
    IneligibleAssignment,
    /// Machine slots are not in start-time order.
    OrderViolation,
    /// A job's timing record disagrees with its machine slot.
    TimingMismatch,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            severity,
        }
    }
}

impl UnscheduledJob {
    /// Creates a record for `job` at `stage`.
    pub fn new(job: &JobInstance, stage: &Stage, reason: UnscheduledReason) -> Self {
        Self {
            job_id: job.id,
            job_type: job.job_type.clone(),
            stage_id: stage.id.clone(),
            stage: stage.position,
            reason,
        }
    }
}

impl Schedule {
    /// Assembles a snapshot; `jobs` are given in dispatch order.
    pub fn new(
        rule: impl Into<String>,
        stages: Vec<Stage>,
        jobs: Vec<JobInstance>,
        unscheduled: Vec<UnscheduledJob>,
    ) -> Self {
        let dispatch_order = jobs.iter().map(|j| j.id).collect();
        let mut jobs = jobs;
        jobs.sort_by_key(|j| j.id);
        Self {
            rule: rule.into(),
            stages,
            jobs,
            dispatch_order,
            unscheduled,
        }
    }

    /// Makespan: latest machine clock over all stages.
    pub fn makespan(&self) -> i64 {
        self.stages
            .iter()
            .map(Stage::completion_time)
            .max()
            .unwrap_or(0)
    }

    /// Finds a stage by id.
    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    /// All machines with their stage, in stage then declaration order.
    pub fn machines(&self) -> impl Iterator<Item = (&Stage, &Machine)> {
        self.stages
            .iter()
            .flat_map(|s| s.machines.iter().map(move |m| (s, m)))
    }

    /// Slots of one machine sorted by start time.
    ///
    /// The sort is stable; for a valid schedule it returns append order.
    pub fn machine_timeline(&self, stage_id: &str, machine_id: &str) -> Option<Vec<&MachineSlot>> {
        let machine = self.stage(stage_id)?.machine(machine_id)?;
        let mut slots: Vec<&MachineSlot> = machine.slots().iter().collect();
        slots.sort_by_key(|s| s.start);
        Some(slots)
    }

    /// Per-stage, per-machine slot rows for Gantt rendering.
    ///
    /// Machines that processed nothing are included with empty rows.
    pub fn stage_timelines(&self) -> Vec<StageTimeline<'_>> {
        self.stages
            .iter()
            .map(|stage| StageTimeline {
                stage_id: &stage.id,
                machines: stage
                    .machines
                    .iter()
                    .map(|m| MachineTimeline {
                        machine_id: &m.id,
                        slots: m.slots(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Finds a job by id.
    pub fn job(&self, job_id: JobId) -> Option<&JobInstance> {
        self.jobs
            .binary_search_by_key(&job_id, |j| j.id)
            .ok()
            .map(|i| &self.jobs[i])
    }

    /// Stage-by-stage trace of one job, including stages it missed.
    pub fn job_trace(&self, job_id: JobId) -> Option<Vec<TraceEntry<'_>>> {
        let job = self.job(job_id)?;
        let trace = self
            .stages
            .iter()
            .map(|stage| {
                let machine_id = stage
                    .machines
                    .iter()
                    .find(|m| m.slots().iter().any(|s| s.job_id == job_id))
                    .map(|m| m.id.as_str());
                TraceEntry {
                    stage_id: &stage.id,
                    stage: stage.position,
                    machine_id,
                    timing: job.timing(stage.position).copied(),
                }
            })
            .collect();
        Some(trace)
    }

    /// Jobs with a timing record at every stage.
    pub fn completed_jobs(&self) -> impl Iterator<Item = &JobInstance> {
        let stage_count = self.stages.len();
        self.jobs
            .iter()
            .filter(move |j| j.scheduled_stage_count() == stage_count)
    }

    /// Whether every job was placed at every stage.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    /// Total setup time over all machines.
    pub fn total_setup_time(&self) -> i64 {
        self.machines().map(|(_, m)| m.setup_time()).sum()
    }

    /// Number of (job, stage) assignments.
    pub fn slot_count(&self) -> usize {
        self.stages.iter().map(Stage::slot_count).sum()
    }

    /// Checks the schedule against precedence, setup, eligibility and
    /// ordering rules. Returns every violation found (empty = valid).
    pub fn verify(&self, setups: &SetupTable) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (stage, machine) in self.machines() {
            let entity = format!("{}/{}", stage.id, machine.id);
            let slots = machine.slots();

            if let Some(first) = slots.first() {
                if first.setup != 0 {
                    violations.push(Violation::new(
                        ViolationType::FirstSetupCharged,
                        &entity,
                        format!("job {} is first but charged setup {}", first.job_id, first.setup),
                        60,
                    ));
                }
            }

            for pair in slots.windows(2) {
                let (prev, next) = (&pair[0], &pair[1]);
                let required = setups.get(&prev.job_type, &next.job_type);
                if next.start < prev.start {
                    violations.push(Violation::new(
                        ViolationType::OrderViolation,
                        &entity,
                        format!("job {} starts before job {}", next.job_id, prev.job_id),
                        70,
                    ));
                }
                if next.start < prev.end.saturating_add(required) || next.setup != required {
                    violations.push(Violation::new(
                        ViolationType::SetupGapViolation,
                        &entity,
                        format!(
                            "job {} starts at {} (setup {}), job {} ends at {} (setup {} owed)",
                            next.job_id, next.start, next.setup, prev.job_id, prev.end, required
                        ),
                        90,
                    ));
                }
            }

            for slot in slots {
                if !machine.eligibility.accepts(&slot.job_type) {
                    violations.push(Violation::new(
                        ViolationType::IneligibleAssignment,
                        &entity,
                        format!("job {} of type {} is not eligible", slot.job_id, slot.job_type),
                        95,
                    ));
                }
                let recorded = self
                    .job(slot.job_id)
                    .and_then(|j| j.timing(stage.position).copied());
                if recorded != Some(slot.timing()) {
                    violations.push(Violation::new(
                        ViolationType::TimingMismatch,
                        &entity,
                        format!("job {} timing record disagrees with machine slot", slot.job_id),
                        80,
                    ));
                }
            }
        }

        for job in &self.jobs {
            let timings: Vec<(usize, &StageTiming)> = job.timings().collect();
            for pair in timings.windows(2) {
                let ((k, before), (next_k, after)) = (pair[0], pair[1]);
                if next_k == k + 1 && before.end > after.start {
                    violations.push(Violation::new(
                        ViolationType::PrecedenceViolation,
                        job.id.to_string(),
                        format!(
                            "stage {} starts at {} before stage {} ends at {}",
                            next_k, after.start, k, before.end
                        ),
                        95,
                    ));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Eligibility;

    fn slot(job_id: JobId, job_type: &str, start: i64, end: i64, setup: i64) -> MachineSlot {
        MachineSlot {
            job_id,
            job_type: job_type.into(),
            start,
            end,
            setup,
        }
    }

    // One stage, one machine: job 1 (A) [0,3], job 2 (B) [9,15] after setup 6.
    fn sample_schedule() -> Schedule {
        let mut machine = Machine::new("M_1", Eligibility::Any);
        machine.append(slot(1, "A", 0, 3, 0));
        machine.append(slot(2, "B", 9, 15, 6));
        let stage = Stage::new("OP_1", 0).with_machine(machine);

        let mut j1 = JobInstance::new(1, "A");
        j1.record(0, StageTiming::new(0, 3, 0));
        let mut j2 = JobInstance::new(2, "B");
        j2.record(0, StageTiming::new(9, 15, 6));

        Schedule::new("SPT", vec![stage], vec![j2, j1], Vec::new())
    }

    #[test]
    fn test_makespan() {
        assert_eq!(sample_schedule().makespan(), 15);
        assert_eq!(Schedule::default().makespan(), 0);
    }

    #[test]
    fn test_jobs_sorted_and_dispatch_order_kept() {
        let s = sample_schedule();
        assert_eq!(s.dispatch_order, vec![2, 1]);
        assert_eq!(s.jobs[0].id, 1);
        assert_eq!(s.job(2).unwrap().job_type, "B");
        assert!(s.job(99).is_none());
    }

    #[test]
    fn test_deserialized_jobs_are_sorted() {
        let mut value = serde_json::to_value(sample_schedule()).unwrap();
        let jobs = value["jobs"].as_array_mut().unwrap();
        jobs.reverse();
        assert_eq!(jobs[0]["id"], 2);

        let s: Schedule = serde_json::from_value(value).unwrap();
        assert_eq!(s.jobs[0].id, 1);
        assert_eq!(s.job(1).unwrap().job_type, "A");
        assert_eq!(s.job(2).unwrap().job_type, "B");
        assert_eq!(s.dispatch_order, vec![2, 1]);
        let setups = SetupTable::new().with_symmetric("A", "B", 6);
        assert!(s.verify(&setups).is_empty());
    }

    #[test]
    fn test_verify_extreme_setup_does_not_overflow() {
        let s = sample_schedule();
        let setups = SetupTable::new().with_symmetric("A", "B", i64::MAX);
        let kinds: Vec<ViolationType> =
            s.verify(&setups).into_iter().map(|v| v.violation_type).collect();
        assert_eq!(kinds, vec![ViolationType::SetupGapViolation]);
    }

    #[test]
    fn test_machine_timeline() {
        let s = sample_schedule();
        let timeline = s.machine_timeline("OP_1", "M_1").unwrap();
        let ids: Vec<JobId> = timeline.iter().map(|t| t.job_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(s.machine_timeline("OP_1", "M_9").is_none());
        assert!(s.machine_timeline("OP_9", "M_1").is_none());
    }

    #[test]
    fn test_stage_timelines() {
        let mut s = sample_schedule();
        s.stages[0].machines.push(Machine::new("M_2", Eligibility::Any));
        let timelines = s.stage_timelines();
        assert_eq!(timelines.len(), 1);
        assert_eq!(timelines[0].stage_id, "OP_1");
        assert_eq!(timelines[0].machines.len(), 2);

        let row = &timelines[0].machines[0];
        assert_eq!(row.machine_id, "M_1");
        assert_eq!(row.slots[1].setup_start(), 3);
        assert!(timelines[0].machines[1].slots.is_empty());
    }

    #[test]
    fn test_job_trace() {
        let s = sample_schedule();
        let trace = s.job_trace(2).unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].machine_id, Some("M_1"));
        assert_eq!(trace[0].timing.unwrap().start, 9);
    }

    #[test]
    fn test_verify_valid() {
        let s = sample_schedule();
        let setups = SetupTable::new().with_symmetric("A", "B", 6);
        assert!(s.verify(&setups).is_empty());
        assert_eq!(s.total_setup_time(), 6);
        assert_eq!(s.slot_count(), 2);
        assert_eq!(s.completed_jobs().count(), 2);
        assert!(s.is_complete());
    }

    #[test]
    fn test_verify_detects_setup_gap() {
        let s = sample_schedule();
        let setups = SetupTable::new().with_symmetric("A", "B", 10);
        let violations = s.verify(&setups);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::SetupGapViolation));
    }

    #[test]
    fn test_verify_detects_precedence() {
        let mut first = Machine::new("M_1", Eligibility::Any);
        first.append(slot(1, "A", 0, 5, 0));
        let mut second = Machine::new("M_1", Eligibility::Any);
        second.append(slot(1, "A", 3, 6, 0));
        let stages = vec![
            Stage::new("OP_1", 0).with_machine(first),
            Stage::new("OP_2", 1).with_machine(second),
        ];
        let mut job = JobInstance::new(1, "A");
        job.record(0, StageTiming::new(0, 5, 0));
        job.record(1, StageTiming::new(3, 6, 0));

        let s = Schedule::new("SPT", stages, vec![job], Vec::new());
        let violations = s.verify(&SetupTable::new());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::PrecedenceViolation);
        assert_eq!(violations[0].entity_id, "1");
    }

    #[test]
    fn test_verify_detects_ineligible_and_mismatch() {
        let mut machine = Machine::new("M_1", Eligibility::only(["A"]));
        machine.append(slot(1, "B", 0, 4, 0));
        let stage = Stage::new("OP_1", 0).with_machine(machine);
        let job = JobInstance::new(1, "B"); // no timing record

        let s = Schedule::new("LPT", vec![stage], vec![job], Vec::new());
        let kinds: Vec<ViolationType> = s
            .verify(&SetupTable::new())
            .into_iter()
            .map(|v| v.violation_type)
            .collect();
        assert!(kinds.contains(&ViolationType::IneligibleAssignment));
        assert!(kinds.contains(&ViolationType::TimingMismatch));
    }

    #[test]
    fn test_unscheduled_record() {
        let stage = Stage::new("OP_2", 1);
        let job = JobInstance::new(4, "C");
        let u = UnscheduledJob::new(&job, &stage, UnscheduledReason::NoEligibleMachine);
        assert_eq!(u.job_id, 4);
        assert_eq!(u.stage_id, "OP_2");
        assert_eq!(u.stage, 1);
        assert_eq!(
            serde_json::to_value(u.reason).unwrap(),
            serde_json::json!("no_eligible_machine")
        );
    }
}
