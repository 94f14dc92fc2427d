//! Schedule quality metrics (KPIs).
//!
//! Computes standard performance indicators from a completed schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest machine clock |
//! | Total Setup | Sum of setup time charged on all machines |
//! | Utilization | (processing + setup) / makespan, per machine |
//! | Avg / Max Flow Time | Completion of fully scheduled jobs (release = 0) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::models::Schedule;

/// Utilization of one machine.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineUtilization {
    /// Stage identifier.
    pub stage_id: String,
    /// Machine identifier.
    pub machine_id: String,
    /// Busy fraction of the makespan (0.0..1.0).
    pub utilization: f64,
}

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: i64,
    /// Setup time charged across all machines.
    pub total_setup_time: i64,
    /// Average machine utilization (0.0..1.0), idle machines included.
    pub avg_utilization: f64,
    /// Per-machine utilization in stage then declaration order.
    pub utilization_by_machine: Vec<MachineUtilization>,
    /// Mean completion time of jobs scheduled at every stage.
    pub avg_flow_time: f64,
    /// Largest completion time of jobs scheduled at every stage.
    pub max_flow_time: i64,
    /// Jobs scheduled at every stage.
    pub completed_jobs: usize,
    /// (job, stage) pairs left without a machine.
    pub unscheduled_operations: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let makespan = schedule.makespan();

        let utilization_by_machine: Vec<MachineUtilization> = schedule
            .machines()
            .map(|(stage, machine)| MachineUtilization {
                stage_id: stage.id.clone(),
                machine_id: machine.id.clone(),
                utilization: if makespan > 0 {
                    machine.busy_time() as f64 / makespan as f64
                } else {
                    0.0
                },
            })
            .collect();

        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_machine.iter().map(|u| u.utilization).sum();
            sum / utilization_by_machine.len() as f64
        };

        let completions: Vec<i64> = schedule
            .completed_jobs()
            .filter_map(|j| j.completion_time())
            .collect();
        let avg_flow_time = if completions.is_empty() {
            0.0
        } else {
            completions.iter().sum::<i64>() as f64 / completions.len() as f64
        };

        Self {
            makespan,
            total_setup_time: schedule.total_setup_time(),
            avg_utilization,
            utilization_by_machine,
            avg_flow_time,
            max_flow_time: completions.iter().copied().max().unwrap_or(0),
            completed_jobs: completions.len(),
            unscheduled_operations: schedule.unscheduled.len(),
        }
    }

    /// Utilization of one machine, if present.
    pub fn utilization(&self, stage_id: &str, machine_id: &str) -> Option<f64> {
        self.utilization_by_machine
            .iter()
            .find(|u| u.stage_id == stage_id && u.machine_id == machine_id)
            .map(|u| u.utilization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Eligibility, JobInstance, Machine, MachineSlot, Stage, StageTiming};

    fn slot(job_id: u32, job_type: &str, start: i64, end: i64, setup: i64) -> MachineSlot {
        MachineSlot {
            job_id,
            job_type: job_type.into(),
            start,
            end,
            setup,
        }
    }

    // M_1: A [0,3], B [9,15] with setup 6. M_2 idle.
    fn sample_schedule() -> Schedule {
        let mut m1 = Machine::new("M_1", Eligibility::Any);
        m1.append(slot(1, "A", 0, 3, 0));
        m1.append(slot(2, "B", 9, 15, 6));
        let m2 = Machine::new("M_2", Eligibility::Any);
        let stage = Stage::new("OP_1", 0).with_machine(m1).with_machine(m2);

        let mut j1 = JobInstance::new(1, "A");
        j1.record(0, StageTiming::new(0, 3, 0));
        let mut j2 = JobInstance::new(2, "B");
        j2.record(0, StageTiming::new(9, 15, 6));
        Schedule::new("SPT", vec![stage], vec![j1, j2], Vec::new())
    }

    #[test]
    fn test_kpi_basic() {
        let kpi = ScheduleKpi::calculate(&sample_schedule());
        assert_eq!(kpi.makespan, 15);
        assert_eq!(kpi.total_setup_time, 6);
        assert_eq!(kpi.completed_jobs, 2);
        assert_eq!(kpi.max_flow_time, 15);
        assert!((kpi.avg_flow_time - 9.0).abs() < 1e-10);
        assert_eq!(kpi.unscheduled_operations, 0);
    }

    #[test]
    fn test_kpi_utilization() {
        let kpi = ScheduleKpi::calculate(&sample_schedule());
        // M_1 busy 3 + 6 + 6 = 15 of 15; M_2 idle.
        assert!((kpi.utilization("OP_1", "M_1").unwrap() - 1.0).abs() < 1e-10);
        assert!((kpi.utilization("OP_1", "M_2").unwrap() - 0.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.5).abs() < 1e-10);
        assert!(kpi.utilization("OP_9", "M_1").is_none());
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&Schedule::default());
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.completed_jobs, 0);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
        assert!((kpi.avg_flow_time - 0.0).abs() < 1e-10);
    }
}
