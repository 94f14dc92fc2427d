//! Hybrid flow-shop list scheduler.
//!
//! # Algorithm
//!
//! 1. Enumerate jobs from the demand table.
//! 2. Sort them once by the dispatching rule (static priority).
//! 3. For each job in priority order, walk the stages in order.
//! 4. At each stage, place the job on the eligible machine with the
//!    earliest feasible start, charging sequence-dependent setup.
//!
//! Assignments are never revised (greedy, non-backtracking).
//!
//! # Complexity
//! O(n * s * c) where n=jobs, s=stages, c=machines per stage.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::selector::{assign, select_machine};
use crate::dispatching::{order_jobs, DispatchRule, DispatchingRule};
use crate::models::{
    build_jobs, JobInstance, ProblemInstance, Schedule, UnscheduledJob, UnscheduledReason,
};

/// What the scheduler does with a job's later stages after it could not
/// be placed at some stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStagePolicy {
    /// Attempt the next stage with an earliest start of 0.
    #[default]
    ResetToZero,
    /// Attempt the next stage no earlier than the last stage that was
    /// actually scheduled for the job.
    CarryForward,
    /// Leave all later stages of the job unscheduled.
    SkipRemaining,
}

/// Greedy stage-by-stage list scheduler.
///
/// # Example
///
/// ```
/// use u_flowshop::config::{MachineConfig, ProblemConfig, StageConfig};
/// use u_flowshop::models::Eligibility;
/// use u_flowshop::scheduler::FlowShopScheduler;
///
/// let problem = ProblemConfig::new()
///     .with_demand("A", 2)
///     .with_stage(
///         StageConfig::new("OP_1").with_machine(
///             "M_1",
///             MachineConfig::new(Eligibility::Any).with_uniform_duration(4),
///         ),
///     )
///     .into_problem()
///     .unwrap();
///
/// let schedule = FlowShopScheduler::new().schedule(&problem);
/// assert_eq!(schedule.makespan(), 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowShopScheduler {
    rule: DispatchRule,
    policy: MissingStagePolicy,
}

impl FlowShopScheduler {
    /// Creates a scheduler using SPT and [`MissingStagePolicy::ResetToZero`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dispatching rule.
    pub fn with_rule(mut self, rule: DispatchRule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the policy for stages following an unscheduled one.
    pub fn with_policy(mut self, policy: MissingStagePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Dispatching rule in use.
    pub fn rule(&self) -> DispatchRule {
        self.rule
    }

    /// Missing-stage policy in use.
    pub fn policy(&self) -> MissingStagePolicy {
        self.policy
    }

    /// Builds, orders and schedules all jobs of a problem.
    pub fn schedule(&self, problem: &ProblemInstance) -> Schedule {
        let jobs = build_jobs(problem.demand());
        let ordered = order_jobs(jobs, problem.plan(), &self.rule);
        debug!(
            rule = %self.rule,
            order = ?ordered.iter().map(|j| j.id).collect::<Vec<_>>(),
            "dispatch order"
        );
        self.schedule_jobs(ordered, problem)
    }

    /// Schedules jobs already in priority order on fresh machines.
    ///
    /// Timing records the jobs carry from an earlier run are discarded, so
    /// the jobs of a returned [`Schedule`] can be scheduled again.
    ///
    /// # Algorithm
    /// For each job (outer loop) and each stage in order (inner loop), the
    /// earliest permitted start is the job's end at the previous stage (0 at
    /// the first stage). Jobs with no eligible machine at a stage are
    /// recorded as unscheduled there; the run always completes.
    pub fn schedule_jobs(&self, mut jobs: Vec<JobInstance>, problem: &ProblemInstance) -> Schedule {
        let mut stages = problem.plan().instantiate();
        let mut unscheduled = Vec::new();

        for job in jobs.iter_mut() {
            job.clear_timings();
            let mut earliest = 0;
            let mut abandoned = false;

            for stage in stages.iter_mut() {
                if abandoned {
                    unscheduled.push(UnscheduledJob::new(
                        job,
                        stage,
                        UnscheduledReason::EarlierStageUnscheduled,
                    ));
                    continue;
                }

                match select_machine(job, stage, earliest, problem.setups()) {
                    Some(choice) => {
                        let timing = assign(stage, job, choice);
                        debug!(
                            job_id = job.id,
                            job_type = %job.job_type,
                            stage = %stage.id,
                            machine = %stage.machines[choice.machine].id,
                            start = timing.start,
                            end = timing.end,
                            setup = timing.setup,
                            "assigned"
                        );
                        earliest = timing.end;
                    }
                    None => {
                        warn!(
                            job_id = job.id,
                            job_type = %job.job_type,
                            stage = %stage.id,
                            "no eligible machine; job left unscheduled at stage"
                        );
                        unscheduled.push(UnscheduledJob::new(
                            job,
                            stage,
                            UnscheduledReason::NoEligibleMachine,
                        ));
                        match self.policy {
                            MissingStagePolicy::ResetToZero => earliest = 0,
                            MissingStagePolicy::CarryForward => {}
                            MissingStagePolicy::SkipRemaining => abandoned = true,
                        }
                    }
                }
            }
        }

        let schedule = Schedule::new(self.rule.name(), stages, jobs, unscheduled);
        info!(
            rule = %self.rule,
            jobs = schedule.jobs.len(),
            makespan = schedule.makespan(),
            unscheduled = schedule.unscheduled.len(),
            "schedule complete"
        );
        schedule
    }

    /// Runs the same problem under several rules, each on fresh machines.
    pub fn compare_rules(
        &self,
        problem: &ProblemInstance,
        rules: &[DispatchRule],
    ) -> Vec<Schedule> {
        rules
            .iter()
            .map(|&rule| self.clone().with_rule(rule).schedule(problem))
            .collect()
    }

    /// Schedule with the smallest makespan among `rules` (ties → first listed).
    pub fn best_rule(&self, problem: &ProblemInstance, rules: &[DispatchRule]) -> Option<Schedule> {
        let mut best: Option<Schedule> = None;
        for schedule in self.compare_rules(problem, rules) {
            let better = match &best {
                Some(b) => schedule.makespan() < b.makespan(),
                None => true,
            };
            if better {
                best = Some(schedule);
            }
        }
        best
    }
}
