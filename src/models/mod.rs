//! Flow-shop domain models.
//!
//! Provides the data types of a hybrid flow-shop problem and of its
//! solution: jobs and their per-stage timings, machines with eligibility
//! and clocks, stages, the process plan, the setup table, and the
//! schedule snapshot.
//!
//! # Domain Mappings
//!
//! | u-flowshop | Manufacturing | Textbook |
//! |------------|---------------|----------|
//! | JobInstance | Work order unit | Job `j` |
//! | Stage | Operation / process step | Stage `k` |
//! | Machine | Parallel machine | Machine `m ∈ M_k` |
//! | SetupTable | Changeover matrix | `s_gh` |
//! | Schedule | Production plan | Solution |

mod eligibility;
mod job;
mod machine;
mod plan;
mod problem;
mod schedule;
mod setup;
mod stage;

pub use eligibility::{Eligibility, ALL_TYPES};
pub use job::{build_jobs, Demand, JobId, JobInstance, StageTiming};
pub use machine::{Machine, MachineSlot};
pub use plan::ProcessPlan;
pub use problem::{ProblemInstance, SolverInput};
pub use schedule::{
    MachineTimeline, Schedule, StageTimeline, TraceEntry, UnscheduledJob, UnscheduledReason,
    Violation, ViolationType,
};
pub use setup::SetupTable;
pub use stage::Stage;
