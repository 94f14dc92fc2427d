//! Machine eligibility.
//!
//! Configuration may name a single job type, a list of job types, or the
//! wildcard `"*"` (also `"all"`). All forms normalize into [`Eligibility`]
//! at load time, so the scheduler only ever asks `accepts(job_type)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Wildcard accepted in configuration for "all job types".
pub const ALL_TYPES: &str = "*";

/// Set of job types a machine may process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EligibilityForm", into = "EligibilityForm")]
pub enum Eligibility {
    /// Every job type.
    #[default]
    Any,
    /// Only the listed job types. An empty set accepts nothing.
    Only(BTreeSet<String>),
}

/// Wire form of an eligibility entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum EligibilityForm {
    One(String),
    Many(Vec<String>),
}

fn is_wildcard(s: &str) -> bool {
    s == ALL_TYPES || s.eq_ignore_ascii_case("all")
}

impl From<EligibilityForm> for Eligibility {
    fn from(form: EligibilityForm) -> Self {
        match form {
            EligibilityForm::One(s) if is_wildcard(&s) => Eligibility::Any,
            EligibilityForm::One(s) => Eligibility::only([s]),
            EligibilityForm::Many(v) if v.iter().any(|s| is_wildcard(s)) => Eligibility::Any,
            EligibilityForm::Many(v) => Eligibility::only(v),
        }
    }
}

impl From<Eligibility> for EligibilityForm {
    fn from(e: Eligibility) -> Self {
        match e {
            Eligibility::Any => EligibilityForm::One(ALL_TYPES.to_string()),
            Eligibility::Only(set) if set.len() == 1 => {
                EligibilityForm::One(set.into_iter().next().unwrap_or_default())
            }
            Eligibility::Only(set) => EligibilityForm::Many(set.into_iter().collect()),
        }
    }
}

impl Eligibility {
    /// Eligibility restricted to the given job types.
    pub fn only<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Eligibility::Only(types.into_iter().map(Into::into).collect())
    }

    /// Whether a machine with this eligibility may process `job_type`.
    pub fn accepts(&self, job_type: &str) -> bool {
        match self {
            Eligibility::Any => true,
            Eligibility::Only(types) => types.contains(job_type),
        }
    }

    /// Whether nothing is accepted.
    pub fn is_empty(&self) -> bool {
        matches!(self, Eligibility::Only(types) if types.is_empty())
    }

    /// Explicitly named job types (`None` for the wildcard).
    pub fn named_types(&self) -> Option<&BTreeSet<String>> {
        match self {
            Eligibility::Any => None,
            Eligibility::Only(types) => Some(types),
        }
    }
}
