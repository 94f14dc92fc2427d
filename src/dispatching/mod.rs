//! Dispatching rules and job ordering.
//!
//! Provides the priority rules (SPT, LPT) that fix the static order in
//! which jobs are handed to the stage scheduler.
//!
//! # Usage
//!
//! ```
//! use u_flowshop::dispatching::{order_jobs, DispatchRule};
//! use u_flowshop::models::{build_jobs, Demand, Eligibility, Machine, ProcessPlan};
//!
//! let plan = ProcessPlan::new(["A", "B"]).with_stage(
//!     "OP_1",
//!     vec![Machine::new("M_1", Eligibility::Any).with_durations([("A", 3), ("B", 5)])],
//! );
//! let jobs = build_jobs(&Demand::new().with("B", 1).with("A", 1));
//! let ordered = order_jobs(jobs, &plan, &DispatchRule::Spt);
//! assert_eq!(ordered[0].job_type, "A");
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod order;
pub mod rules;

pub use context::DispatchContext;
pub use order::{order_indices, order_jobs, order_jobs_by_name};
pub use rules::DispatchRule;

use crate::models::JobInstance;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = i64;

/// A dispatching rule that evaluates job priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for jobs that should be dispatched first.
///
/// # Reference
/// Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "LPT").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a job.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, job: &JobInstance, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
