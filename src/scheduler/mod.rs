//! Greedy flow-shop scheduler and KPI evaluation.
//!
//! # Algorithm
//!
//! `FlowShopScheduler` performs static-priority list scheduling: jobs are
//! ordered once by a dispatching rule, then placed stage by stage on the
//! eligible machine with the earliest feasible start, including
//! sequence-dependent setup. It is not optimal, but fast and deterministic.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, setup totals, utilization and flow time.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Ruiz & Vázquez-Rodríguez (2010), "The hybrid flow shop scheduling problem"

mod flow_shop;
mod kpi;
mod selector;

pub use flow_shop::{FlowShopScheduler, MissingStagePolicy};
pub use kpi::{MachineUtilization, ScheduleKpi};
pub use selector::{assign, select_machine, MachineChoice};
