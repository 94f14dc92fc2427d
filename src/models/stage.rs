//! Stage (operation) model.
//!
//! A stage is one ordered step of the process plan. It owns its parallel
//! machines in declaration order; that order breaks ties between machines.

use serde::{Deserialize, Serialize};

use super::{JobInstance, Machine};

/// A production stage with its machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Stage identifier (e.g. "OP_1").
    pub id: String,
    /// 0-based position in the process plan.
    pub position: usize,
    /// Parallel machines in declaration order.
    pub machines: Vec<Machine>,
}

impl Stage {
    /// Creates a stage without machines.
    pub fn new(id: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.into(),
            position,
            machines: Vec::new(),
        }
    }

    /// Adds a machine.
    pub fn with_machine(mut self, machine: Machine) -> Self {
        self.machines.push(machine);
        self
    }

    /// Finds a machine by id.
    pub fn machine(&self, machine_id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == machine_id)
    }

    /// Machines that can take the job, in declaration order.
    pub fn eligible_machines<'a>(
        &'a self,
        job: &'a JobInstance,
    ) -> impl Iterator<Item = (usize, &'a Machine)> + 'a {
        self.machines
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.accepts(job))
    }

    /// Latest machine clock at this stage.
    pub fn completion_time(&self) -> i64 {
        self.machines
            .iter()
            .map(Machine::available_at)
            .max()
            .unwrap_or(0)
    }

    /// Number of jobs processed at this stage.
    pub fn slot_count(&self) -> usize {
        self.machines.iter().map(|m| m.slots().len()).sum()
    }
}
