//! Problem instance and solver input view.
//!
//! A [`ProblemInstance`] bundles the demand table, the resolved process
//! plan and the setup table. It is normally produced by
//! [`ProblemConfig::into_problem`](crate::config::ProblemConfig::into_problem),
//! which validates the input first.
//!
//! [`SolverInput`] re-expresses the same instance in the indexed form of
//! the mixed-integer formulation (jobs `j`, stages `k = 1..s`, machines
//! `m = 1..M_k`), so heuristic and exact results can be compared on
//! identical data. This crate never runs a solver itself.

use std::collections::{BTreeMap, BTreeSet};

use super::{build_jobs, Demand, JobId, ProcessPlan, SetupTable};

/// A validated hybrid flow-shop instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInstance {
    demand: Demand,
    plan: ProcessPlan,
    setups: SetupTable,
}

/// Indexed view of a problem for an exact solver (1-based stages/machines).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverInput {
    /// Number of stages `s`.
    pub stage_count: usize,
    /// Machines per stage `M_k`, indexed by `k - 1`.
    pub machines_per_stage: Vec<usize>,
    /// Job → job type.
    pub job_types: BTreeMap<JobId, String>,
    /// `p_jk`: processing time of job `j` at stage `k` (shortest eligible
    /// machine). Missing when no machine at `k` accepts the job.
    pub processing_time: BTreeMap<(JobId, usize), i64>,
    /// Setup between distinct jobs `g → h` on a shared machine.
    pub setup_time: BTreeMap<(JobId, JobId), i64>,
    /// Allowed (job, stage, machine) triples.
    pub eligible: BTreeSet<(JobId, usize, usize)>,
}

impl ProblemInstance {
    /// Assembles an instance. Callers are expected to have validated the
    /// parts; prefer `ProblemConfig::into_problem`.
    pub fn new(demand: Demand, plan: ProcessPlan, setups: SetupTable) -> Self {
        Self {
            demand,
            plan,
            setups,
        }
    }

    /// Demand table.
    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    /// Process plan.
    pub fn plan(&self) -> &ProcessPlan {
        &self.plan
    }

    /// Setup table.
    pub fn setups(&self) -> &SetupTable {
        &self.setups
    }

    /// Same instance with one count changed.
    pub fn with_demand(mut self, job_type: impl Into<String>, count: u32) -> Self {
        self.demand.set(job_type, count);
        self
    }

    /// Projects the instance onto the solver's indexed data model.
    pub fn solver_input(&self) -> SolverInput {
        let jobs = build_jobs(&self.demand);
        let mut input = SolverInput {
            stage_count: self.plan.stage_count(),
            machines_per_stage: self.plan.stages().iter().map(|s| s.machines.len()).collect(),
            ..SolverInput::default()
        };

        for job in &jobs {
            input.job_types.insert(job.id, job.job_type.clone());
            for stage in self.plan.stages() {
                let k = stage.position + 1;
                if let Some(p) = self.plan.min_duration(&job.job_type, stage.position) {
                    input.processing_time.insert((job.id, k), p);
                }
                for (m, _) in stage.eligible_machines(job) {
                    input.eligible.insert((job.id, k, m + 1));
                }
            }
        }

        for g in &jobs {
            for h in jobs.iter().filter(|h| h.id != g.id) {
                let setup = self.setups.get(&g.job_type, &h.job_type);
                input.setup_time.insert((g.id, h.id), setup);
            }
        }

        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Eligibility, Machine};

    // Two-stage shop: stage 1 splits A/B across machines, stage 2 shares M_2.
    fn sample_problem() -> ProblemInstance {
        let plan = ProcessPlan::new(["A", "B"])
            .with_stage(
                "OP_1",
                vec![
                    Machine::new("M_1", Eligibility::only(["A"])).with_duration("A", 4),
                    Machine::new("M_2", Eligibility::only(["B"])).with_duration("B", 3),
                ],
            )
            .with_stage(
                "OP_2",
                vec![
                    Machine::new("M_1", Eligibility::only(["A"])).with_duration("A", 6),
                    Machine::new("M_2", Eligibility::Any).with_durations([("A", 6), ("B", 1)]),
                ],
            );
        ProblemInstance::new(
            Demand::new().with("A", 1).with("B", 2),
            plan,
            SetupTable::new().with_symmetric("A", "B", 6),
        )
    }

    #[test]
    fn test_solver_input_shape() {
        let input = sample_problem().solver_input();
        assert_eq!(input.stage_count, 2);
        assert_eq!(input.machines_per_stage, vec![2, 2]);
        assert_eq!(input.job_types.len(), 3);
        assert_eq!(input.job_types[&2], "B");
    }

    #[test]
    fn test_solver_processing_times() {
        let input = sample_problem().solver_input();
        assert_eq!(input.processing_time[&(1, 1)], 4);
        assert_eq!(input.processing_time[&(1, 2)], 6);
        assert_eq!(input.processing_time[&(2, 1)], 3);
        assert_eq!(input.processing_time[&(3, 2)], 1);
    }

    #[test]
    fn test_solver_setup_and_eligibility() {
        let input = sample_problem().solver_input();
        assert_eq!(input.setup_time[&(1, 2)], 6);
        assert_eq!(input.setup_time[&(2, 3)], 0);
        assert!(!input.setup_time.contains_key(&(1, 1)));

        assert!(input.eligible.contains(&(1, 1, 1)));
        assert!(!input.eligible.contains(&(1, 1, 2)));
        assert!(input.eligible.contains(&(2, 2, 2)));
        assert!(!input.eligible.contains(&(2, 2, 1)));
    }

    #[test]
    fn test_with_demand() {
        let problem = sample_problem().with_demand("A", 3);
        assert_eq!(problem.demand().total(), 5);
        assert_eq!(problem.solver_input().job_types.len(), 5);
    }
}
