//! Machine selection for one (job, stage) pair.
//!
//! # Algorithm
//!
//! 1. Keep machines that accept the job type.
//! 2. For each, candidate start = max(clock + setup owed, earliest).
//! 3. Pick the smallest candidate start; ties go to the first declared machine.
//!
//! # Complexity
//! O(c) where c = machines at the stage.

use crate::models::{JobInstance, MachineSlot, SetupTable, Stage, StageTiming};

/// Outcome of machine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineChoice {
    /// Index of the chosen machine within its stage.
    pub machine: usize,
    /// Processing start.
    pub start: i64,
    /// Setup charged before `start`.
    pub setup: i64,
    /// Processing duration on the chosen machine.
    pub duration: i64,
}

impl MachineChoice {
    /// Processing end, saturating at `i64::MAX`.
    #[inline]
    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.duration)
    }
}

/// Selects the eligible machine with the earliest feasible start.
///
/// Returns `None` when no machine at the stage accepts the job. Does not
/// modify any state; see [`assign`].
pub fn select_machine(
    job: &JobInstance,
    stage: &Stage,
    earliest: i64,
    setups: &SetupTable,
) -> Option<MachineChoice> {
    let mut best: Option<MachineChoice> = None;

    for (index, machine) in stage.eligible_machines(job) {
        let Some(duration) = machine.processing_time(&job.job_type) else {
            continue;
        };
        let setup = setups.owed(machine.last_job_type(), &job.job_type);
        let start = machine.available_at().saturating_add(setup).max(earliest);

        let better = match best {
            Some(b) => start < b.start,
            None => true,
        };
        if better {
            best = Some(MachineChoice {
                machine: index,
                start,
                setup,
                duration,
            });
        }
    }

    best
}

/// Commits a choice: appends the job to the machine and writes the job's
/// timing record for the stage.
pub fn assign(stage: &mut Stage, job: &mut JobInstance, choice: MachineChoice) -> StageTiming {
    let timing = StageTiming::new(choice.start, choice.end(), choice.setup);
    stage.machines[choice.machine].append(MachineSlot {
        job_id: job.id,
        job_type: job.job_type.clone(),
        start: timing.start,
        end: timing.end,
        setup: timing.setup,
    });
    let recorded = job.record(stage.position, timing);
    debug_assert!(recorded, "job {} already timed at stage {}", job.id, stage.position);
    timing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Eligibility, Machine};

    fn stage(machines: Vec<Machine>) -> Stage {
        let mut s = Stage::new("OP_1", 0);
        s.machines = machines;
        s
    }

    fn both(id: &str, a: i64, b: i64) -> Machine {
        Machine::new(id, Eligibility::Any).with_durations([("A", a), ("B", b)])
    }

    #[test]
    fn test_first_declared_wins_ties() {
        let s = stage(vec![both("M_1", 3, 5), both("M_2", 3, 5)]);
        let job = JobInstance::new(1, "A");
        let choice = select_machine(&job, &s, 0, &SetupTable::new()).unwrap();
        assert_eq!(choice.machine, 0);
        assert_eq!(choice.start, 0);
        assert_eq!(choice.setup, 0);
        assert_eq!(choice.end(), 3);
    }

    #[test]
    fn test_earliest_available_machine() {
        let mut s = stage(vec![both("M_1", 3, 5), both("M_2", 3, 5)]);
        let mut j1 = JobInstance::new(1, "A");
        let c1 = select_machine(&j1, &s, 0, &SetupTable::new()).unwrap();
        assign(&mut s, &mut j1, c1);

        let j2 = JobInstance::new(2, "A");
        let c2 = select_machine(&j2, &s, 0, &SetupTable::new()).unwrap();
        assert_eq!(c2.machine, 1);
        assert_eq!(c2.start, 0);
    }

    #[test]
    fn test_earliest_permitted_start_respected() {
        let s = stage(vec![both("M_1", 3, 5)]);
        let job = JobInstance::new(1, "B");
        let choice = select_machine(&job, &s, 7, &SetupTable::new()).unwrap();
        assert_eq!(choice.start, 7);
        assert_eq!(choice.end(), 12);
    }

    #[test]
    fn test_setup_counts_toward_candidate_start() {
        // M_1 ran A until 3; M_2 ran B until 5. Next job is B with A→B = 6.
        let mut s = stage(vec![both("M_1", 3, 5), both("M_2", 3, 5)]);
        let setups = SetupTable::new().with_symmetric("A", "B", 6);
        let mut a = JobInstance::new(1, "A");
        assign(
            &mut s,
            &mut a,
            MachineChoice {
                machine: 0,
                start: 0,
                setup: 0,
                duration: 3,
            },
        );
        let mut b = JobInstance::new(2, "B");
        assign(
            &mut s,
            &mut b,
            MachineChoice {
                machine: 1,
                start: 0,
                setup: 0,
                duration: 5,
            },
        );

        let next = JobInstance::new(3, "B");
        let choice = select_machine(&next, &s, 0, &setups).unwrap();
        // M_1: 3 + 6 = 9, M_2: 5 + 0 = 5
        assert_eq!(choice.machine, 1);
        assert_eq!(choice.start, 5);
        assert_eq!(choice.setup, 0);
    }

    #[test]
    fn test_setup_absorbed_by_late_arrival() {
        let mut s = stage(vec![both("M_1", 3, 6)]);
        let setups = SetupTable::new().with_symmetric("A", "B", 6);
        let mut a = JobInstance::new(1, "A");
        let c = select_machine(&a, &s, 0, &setups).unwrap();
        assign(&mut s, &mut a, c);

        let b = JobInstance::new(2, "B");
        let choice = select_machine(&b, &s, 20, &setups).unwrap();
        assert_eq!(choice.start, 20);
        assert_eq!(choice.setup, 6);
    }

    #[test]
    fn test_no_eligible_machine() {
        let s = stage(vec![Machine::new("M_1", Eligibility::only(["A"])).with_duration("A", 3)]);
        let job = JobInstance::new(1, "B");
        assert!(select_machine(&job, &s, 0, &SetupTable::new()).is_none());

        let empty = stage(vec![Machine::new("M_1", Eligibility::only(Vec::<String>::new()))]);
        assert!(select_machine(&job, &empty, 0, &SetupTable::new()).is_none());
    }

    #[test]
    fn test_assign_updates_machine_and_job() {
        let mut s = stage(vec![both("M_1", 4, 4)]);
        let mut job = JobInstance::new(1, "A");
        let choice = select_machine(&job, &s, 2, &SetupTable::new()).unwrap();
        let timing = assign(&mut s, &mut job, choice);

        assert_eq!(timing, StageTiming::new(2, 6, 0));
        assert_eq!(job.timing(0), Some(&timing));
        assert_eq!(s.machines[0].available_at(), 6);
        assert_eq!(s.machines[0].slots()[0].job_id, 1);
    }

    #[test]
    fn test_extreme_times_saturate() {
        let mut s = stage(vec![both("M_1", i64::MAX, 1), both("M_2", i64::MAX, 1)]);
        let setups = SetupTable::new().with_symmetric("A", "B", i64::MAX);
        let mut a = JobInstance::new(1, "A");
        let c = select_machine(&a, &s, 0, &setups).unwrap();
        let timing = assign(&mut s, &mut a, c);
        assert_eq!(timing.end, i64::MAX);

        // M_1 is busy until i64::MAX and owes a changeover; M_2 is idle.
        let b = JobInstance::new(2, "B");
        let choice = select_machine(&b, &s, i64::MAX - 1, &setups).unwrap();
        assert_eq!(choice.machine, 1);
        assert_eq!(choice.start, i64::MAX - 1);
        assert_eq!(choice.end(), i64::MAX);
    }
}
