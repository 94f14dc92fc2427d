//! Built-in dispatching rules.
//!
//! - **SPT**: shortest total processing time first.
//! - **LPT**: longest total processing time first.
//!
//! # Score Convention
//! All rules return lower scores for higher priority jobs. LPT negates the
//! total instead of reversing the order, so a stable sort keeps catalog
//! order among equal totals.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::error::FlowShopError;
use crate::models::JobInstance;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Shortest Processing Time.
///
/// Prioritizes jobs with shorter total processing time.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, job: &JobInstance, context: &DispatchContext) -> RuleScore {
        context.total_processing_time(&job.job_type)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
///
/// Prioritizes jobs with longer total processing time.
/// Useful for load balancing in parallel machine environments.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, job: &JobInstance, context: &DispatchContext) -> RuleScore {
        -context.total_processing_time(&job.job_type)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

/// Rule selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchRule {
    /// Shortest Processing Time first.
    #[default]
    #[serde(rename = "SPT")]
    Spt,
    /// Longest Processing Time first.
    #[serde(rename = "LPT")]
    Lpt,
}

impl DispatchRule {
    /// All built-in rules.
    pub const ALL: [DispatchRule; 2] = [DispatchRule::Spt, DispatchRule::Lpt];
}

impl DispatchingRule for DispatchRule {
    fn name(&self) -> &'static str {
        match self {
            DispatchRule::Spt => Spt.name(),
            DispatchRule::Lpt => Lpt.name(),
        }
    }

    fn evaluate(&self, job: &JobInstance, context: &DispatchContext) -> RuleScore {
        match self {
            DispatchRule::Spt => Spt.evaluate(job, context),
            DispatchRule::Lpt => Lpt.evaluate(job, context),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            DispatchRule::Spt => Spt.description(),
            DispatchRule::Lpt => Lpt.description(),
        }
    }
}

impl fmt::Display for DispatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DispatchRule {
    type Err = FlowShopError;

    /// Parses "SPT" or "LPT" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SPT" => Ok(DispatchRule::Spt),
            "LPT" => Ok(DispatchRule::Lpt),
            _ => Err(ValidationError::new(
                ValidationErrorKind::UnknownDispatchRule,
                format!("Unknown dispatch rule '{s}' (expected SPT or LPT)"),
            )
            .into()),
        }
    }
}
