//! Greedy list scheduling for hybrid flow shops.
//!
//! Jobs of several types flow through an ordered sequence of stages. Each
//! stage has parallel machines with their own eligibility sets, processing
//! times, and sequence-dependent setup. Jobs are ordered once by a static
//! dispatching rule (SPT or LPT), then placed stage by stage on the
//! machine that can start them earliest.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Demand`, `JobInstance`, `Machine`,
//!   `Stage`, `ProcessPlan`, `SetupTable`, `ProblemInstance`, `Schedule`
//! - **`dispatching`**: Priority rules and job ordering
//! - **`scheduler`**: `FlowShopScheduler`, machine selection, KPIs
//! - **`config`**: JSON problem definition and its resolution into a model
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown types,
//!   missing durations, negative times)
//!
//! # Example
//!
//! ```
//! use u_flowshop::config::ProblemConfig;
//!
//! let config = ProblemConfig::from_json_str(r#"{
//!     "demand": { "A": 1, "B": 1 },
//!     "stages": [ { "id": "OP_1", "machines": {
//!         "M_1": { "eligible": "*", "durations": { "A": 3, "B": 6 } } } } ],
//!     "setup_time": { "A": { "B": 2 } }
//! }"#).unwrap();
//! let (problem, scheduler) = config.build().unwrap();
//! let schedule = scheduler.schedule(&problem);
//! assert_eq!(schedule.makespan(), 11);
//! assert!(schedule.verify(problem.setups()).is_empty());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Ruiz & Vázquez-Rodríguez (2010), "The hybrid flow shop scheduling problem"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
mod ordered_map;
pub mod scheduler;
pub mod validation;

pub use error::{FlowShopError, Result};
