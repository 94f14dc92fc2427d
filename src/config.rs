//! Problem configuration.
//!
//! The JSON document a caller hands in to describe a shop:
//!
//! ```json
//! {
//!   "demand": { "A": 4, "B": 6 },
//!   "stages": [
//!     { "id": "OP_1", "machines": {
//!         "M_1": { "eligible": "A" },
//!         "M_2": { "eligible": ["A", "B"], "durations": { "A": 3, "B": 6 } },
//!         "M_3": { "eligible": "*", "durations": 5 } } }
//!   ],
//!   "type_durations": { "A": [4], "B": [3] },
//!   "setup_time": { "A": { "B": 6 }, "B": { "A": 6 } },
//!   "rule": "SPT"
//! }
//! ```
//!
//! Demand and machine tables keep document order: demand order fixes job
//! ids and job-type indices, machine order breaks selection ties.
//!
//! A machine's processing time for a type is taken from its own
//! `durations` (a scalar shared by all types, an object per type, or an
//! array indexed by demand order where a single element is shared), and
//! otherwise from `type_durations[type][stage position]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dispatching::DispatchRule;
use crate::error::Result;
use crate::models::{Demand, Eligibility, Machine, ProblemInstance, ProcessPlan, SetupTable};
use crate::scheduler::{FlowShopScheduler, MissingStagePolicy};
use crate::validation::validate_config;

fn default_rule() -> String {
    DispatchRule::default().to_string()
}

/// Complete problem definition as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Job type → count, in declaration order.
    pub demand: Demand,
    /// Stages in process order.
    pub stages: Vec<StageConfig>,
    /// Job type → processing time per stage position.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_durations: BTreeMap<String, Vec<i64>>,
    /// from → to → setup time.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub setup_time: BTreeMap<String, BTreeMap<String, i64>>,
    /// Setup time for distinct-type changeovers without an explicit entry.
    #[serde(default)]
    pub setup_default: i64,
    /// Dispatching rule name ("SPT" or "LPT").
    #[serde(default = "default_rule")]
    pub rule: String,
    /// Behavior after a job misses a stage.
    #[serde(default)]
    pub missing_stage_policy: MissingStagePolicy,
}

/// One stage of the process plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Stage identifier.
    pub id: String,
    /// Machine id → machine definition, in declaration order.
    #[serde(with = "crate::ordered_map")]
    pub machines: Vec<(String, MachineConfig)>,
}

/// One machine of a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Job types the machine accepts.
    pub eligible: Eligibility,
    /// Machine-specific processing times.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durations: Option<MachineDurations>,
}

/// Machine-level processing time table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MachineDurations {
    /// Same time for every type.
    Uniform(i64),
    /// Indexed by demand order; a single element applies to every type.
    ByIndex(Vec<i64>),
    /// Explicit time per job type.
    ByType(BTreeMap<String, i64>),
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            demand: Demand::new(),
            stages: Vec::new(),
            type_durations: BTreeMap::new(),
            setup_time: BTreeMap::new(),
            setup_default: 0,
            rule: default_rule(),
            missing_stage_policy: MissingStagePolicy::default(),
        }
    }
}

impl ProblemConfig {
    /// Creates an empty configuration (SPT, reset-to-zero policy).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the demand for a job type.
    pub fn with_demand(mut self, job_type: impl Into<String>, count: u32) -> Self {
        self.demand.set(job_type, count);
        self
    }

    /// Appends a stage.
    pub fn with_stage(mut self, stage: StageConfig) -> Self {
        self.stages.push(stage);
        self
    }

    /// Sets the per-stage processing times of a job type.
    pub fn with_type_durations(mut self, job_type: impl Into<String>, durations: Vec<i64>) -> Self {
        self.type_durations.insert(job_type.into(), durations);
        self
    }

    /// Sets one setup time.
    pub fn with_setup(mut self, from: impl Into<String>, to: impl Into<String>, time: i64) -> Self {
        self.setup_time
            .entry(from.into())
            .or_default()
            .insert(to.into(), time);
        self
    }

    /// Sets the default changeover time.
    pub fn with_setup_default(mut self, time: i64) -> Self {
        self.setup_default = time;
        self
    }

    /// Sets the dispatching rule by name.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    /// Sets the missing-stage policy.
    pub fn with_policy(mut self, policy: MissingStagePolicy) -> Self {
        self.missing_stage_policy = policy;
        self
    }

    /// Processing time of `job_type` on `machine` at stage `stage`.
    ///
    /// Machine-level durations take precedence over the per-type vector.
    /// Eligibility is not checked here.
    pub fn duration_for(
        &self,
        stage: usize,
        machine: &MachineConfig,
        job_type: &str,
        type_index: usize,
    ) -> Option<i64> {
        let machine_level = match &machine.durations {
            Some(MachineDurations::Uniform(d)) => Some(*d),
            Some(MachineDurations::ByIndex(v)) if v.len() == 1 => Some(v[0]),
            Some(MachineDurations::ByIndex(v)) => v.get(type_index).copied(),
            Some(MachineDurations::ByType(m)) => m.get(job_type).copied(),
            None => None,
        };
        machine_level.or_else(|| {
            self.type_durations
                .get(job_type)
                .and_then(|v| v.get(stage))
                .copied()
        })
    }

    /// Parses the configured dispatching rule.
    pub fn dispatch_rule(&self) -> Result<DispatchRule> {
        self.rule.parse()
    }

    /// Scheduler configured with this rule and policy.
    pub fn scheduler(&self) -> Result<FlowShopScheduler> {
        Ok(FlowShopScheduler::new()
            .with_rule(self.dispatch_rule()?)
            .with_policy(self.missing_stage_policy))
    }

    /// Validates the configuration and resolves it into a problem instance.
    ///
    /// All processing times are resolved here and stored on each machine,
    /// keyed by job type. Types a machine does not accept get no entry.
    pub fn into_problem(self) -> Result<ProblemInstance> {
        validate_config(&self)?;

        let job_types: Vec<String> = self.demand.job_types().map(String::from).collect();
        let mut plan = ProcessPlan::new(job_types.iter().cloned());
        for (position, stage) in self.stages.iter().enumerate() {
            let machines = stage
                .machines
                .iter()
                .map(|(id, mc)| {
                    let durations = job_types
                        .iter()
                        .enumerate()
                        .filter(|(_, name)| mc.eligible.accepts(name))
                        .filter_map(|(t, name)| {
                            self.duration_for(position, mc, name, t)
                                .map(|d| (name.clone(), d))
                        });
                    Machine::new(id.clone(), mc.eligible.clone()).with_durations(durations)
                })
                .collect();
            plan.push_stage(stage.id.clone(), machines);
        }

        let mut setups = SetupTable::new().with_default(self.setup_default);
        for (from, row) in &self.setup_time {
            for (to, time) in row {
                setups.set_transition(from.clone(), to.clone(), *time);
            }
        }

        Ok(ProblemInstance::new(self.demand, plan, setups))
    }

    /// Validates and returns both the problem and its scheduler.
    pub fn build(self) -> Result<(ProblemInstance, FlowShopScheduler)> {
        let scheduler = self.scheduler()?;
        let problem = self.into_problem()?;
        Ok((problem, scheduler))
    }
}

impl StageConfig {
    /// Creates a stage without machines.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            machines: Vec::new(),
        }
    }

    /// Appends a machine.
    pub fn with_machine(mut self, id: impl Into<String>, machine: MachineConfig) -> Self {
        self.machines.push((id.into(), machine));
        self
    }
}

impl MachineConfig {
    /// Creates a machine without machine-level durations.
    pub fn new(eligible: Eligibility) -> Self {
        Self {
            eligible,
            durations: None,
        }
    }

    /// Same processing time for every type.
    pub fn with_uniform_duration(mut self, duration: i64) -> Self {
        self.durations = Some(MachineDurations::Uniform(duration));
        self
    }

    /// Processing time for one job type. Replaces a uniform or indexed table.
    pub fn with_type_duration(mut self, job_type: impl Into<String>, duration: i64) -> Self {
        let mut table = match self.durations.take() {
            Some(MachineDurations::ByType(m)) => m,
            _ => BTreeMap::new(),
        };
        table.insert(job_type.into(), duration);
        self.durations = Some(MachineDurations::ByType(table));
        self
    }

    /// Processing times indexed by demand order.
    pub fn with_indexed_durations(mut self, durations: Vec<i64>) -> Self {
        self.durations = Some(MachineDurations::ByIndex(durations));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowShopError;
    use crate::validation::ValidationErrorKind;

    const SHOP: &str = r#"{
        "demand": { "A": 4, "B": 6 },
        "stages": [
            { "id": "OP_1", "machines": {
                "M_1": { "eligible": ["A", "B"], "durations": [3, 6] },
                "M_2": { "eligible": ["A", "B"], "durations": [3, 6] } } },
            { "id": "OP_2", "machines": {
                "M_1": { "eligible": ["A"], "durations": [3] },
                "M_3": { "eligible": "*", "durations": { "A": 3, "B": 6 } } } }
        ],
        "setup_time": { "A": { "A": 0, "B": 6 }, "B": { "A": 6, "B": 0 } },
        "rule": "LPT"
    }"#;

    #[test]
    fn test_parse_json() {
        let config = ProblemConfig::from_json_str(SHOP).unwrap();
        assert_eq!(config.demand.total(), 10);
        assert_eq!(config.stages.len(), 2);
        assert_eq!(config.stages[1].machines[1].0, "M_3");
        assert_eq!(config.stages[1].machines[1].1.eligible, Eligibility::Any);
        assert_eq!(config.rule, "LPT");
        assert_eq!(config.missing_stage_policy, MissingStagePolicy::ResetToZero);
    }

    #[test]
    fn test_duration_forms() {
        let config = ProblemConfig::from_json_str(SHOP).unwrap();
        let op1_m1 = &config.stages[0].machines[0].1;
        assert_eq!(config.duration_for(0, op1_m1, "A", 0), Some(3));
        assert_eq!(config.duration_for(0, op1_m1, "B", 1), Some(6));
        let op2_m1 = &config.stages[1].machines[0].1;
        assert_eq!(config.duration_for(1, op2_m1, "B", 1), Some(3)); // single element shared
        let op2_m3 = &config.stages[1].machines[1].1;
        assert_eq!(config.duration_for(1, op2_m3, "B", 1), Some(6));
    }

    #[test]
    fn test_type_duration_fallback() {
        let any = || MachineConfig::new(Eligibility::Any);
        let config = ProblemConfig::new()
            .with_demand("A", 1)
            .with_type_durations("A", vec![4, 6])
            .with_stage(StageConfig::new("OP_1").with_machine("M_1", any()))
            .with_stage(StageConfig::new("OP_2").with_machine("M_1", any()));
        let m = &config.stages[1].machines[0].1;
        assert_eq!(config.duration_for(1, m, "A", 0), Some(6));
        assert_eq!(config.duration_for(2, m, "A", 0), None);
    }

    #[test]
    fn test_into_problem_resolves_plan() {
        let problem = ProblemConfig::from_json_str(SHOP).unwrap().into_problem().unwrap();
        let plan = problem.plan();
        assert_eq!(plan.stage_count(), 2);
        assert_eq!(plan.job_types(), &["A".to_string(), "B".to_string()]);
        assert_eq!(plan.duration("B", 0, 1), Some(6));
        assert_eq!(plan.duration("B", 1, 0), None); // OP_2/M_1 rejects B
        assert_eq!(plan.stages()[1].machines[0].processing_time("B"), None);
        assert_eq!(problem.setups().get("A", "B"), 6);
    }

    #[test]
    fn test_scheduler_from_config() {
        let config = ProblemConfig::from_json_str(SHOP)
            .unwrap()
            .with_policy(MissingStagePolicy::SkipRemaining);
        let scheduler = config.scheduler().unwrap();
        assert_eq!(scheduler.rule(), DispatchRule::Lpt);
        assert_eq!(scheduler.policy(), MissingStagePolicy::SkipRemaining);
    }

    #[test]
    fn test_unknown_rule_is_invalid_configuration() {
        let config = ProblemConfig::from_json_str(SHOP).unwrap().with_rule("RANDOM");
        let err = config.build().unwrap_err();
        assert!(matches!(err, FlowShopError::InvalidConfiguration(_)));
        assert_eq!(err.validation_errors()[0].kind, ValidationErrorKind::UnknownDispatchRule);
    }

    #[test]
    fn test_time_beyond_limit_rejected() {
        let config = ProblemConfig::from_json_str(
            r#"{
                "demand": { "A": 2 },
                "stages": [ { "id": "OP_1", "machines": {
                    "M_1": { "eligible": "*", "durations": 9223372036854775807 } } } ]
            }"#,
        )
        .unwrap();
        let err = config.build().unwrap_err();
        assert_eq!(err.validation_errors()[0].kind, ValidationErrorKind::TimeOutOfRange);
    }

    #[test]
    fn test_malformed_json() {
        let err = ProblemConfig::from_json_str(r#"{"demand": 3}"#).unwrap_err();
        assert!(matches!(err, FlowShopError::Parse(_)));
    }

    #[test]
    fn test_builder_type_duration_replaces_uniform() {
        let m = MachineConfig::new(Eligibility::Any)
            .with_uniform_duration(9)
            .with_type_duration("A", 2)
            .with_type_duration("B", 3);
        match m.durations {
            Some(MachineDurations::ByType(table)) => assert_eq!(table.len(), 2),
            other => panic!("unexpected durations: {other:?}"),
        }
    }

    #[test]
    fn test_default_rule() {
        let config: ProblemConfig =
            serde_json::from_str(r#"{"demand": {}, "stages": []}"#).unwrap();
        assert_eq!(config.rule, "SPT");
        assert_eq!(config.setup_default, 0);
    }
}
