//! Input validation for flow-shop problems.
//!
//! Checks structural integrity of a configuration before scheduling.
//! Detects:
//! - Duplicate job type, stage, and machine IDs
//! - References to undeclared job types
//! - Missing processing times for eligible (type, stage, machine) triples
//! - Negative processing or setup times, and times above [`MAX_TIME`]
//! - Malformed duration vectors
//! - Unknown dispatching rules
//!
//! All problems are collected, not just the first one.
//!
//! Eligibility lists and duration tables must only name job types that
//! appear in the demand table. The setup matrix may carry rows and columns
//! for other types; those entries are never consulted and are not reported.

use std::collections::HashSet;
use std::fmt;

use crate::config::{MachineDurations, ProblemConfig};
use crate::dispatching::DispatchRule;

/// Largest accepted processing or setup time.
///
/// Keeps every machine clock and every sum of times within `i64`.
pub const MAX_TIME: i64 = 1_000_000_000_000;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A job type is referenced but not declared in the demand table.
    UnknownJobType,
    /// An eligible (type, stage, machine) has no processing time.
    MissingDuration,
    /// A processing or setup time is negative.
    NegativeTime,
    /// A processing or setup time exceeds [`MAX_TIME`].
    TimeOutOfRange,
    /// A duration vector has the wrong length.
    DurationShape,
    /// The process plan has no stages.
    EmptyPlan,
    /// The dispatching rule name is not recognized.
    UnknownDispatchRule,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a problem configuration.
///
/// Checks:
/// 1. No duplicate job types, stage IDs, or machine IDs within a stage
/// 2. At least one stage
/// 3. Eligibility and duration tables only name declared job types
/// 4. Duration vectors have a valid length
/// 5. Processing and setup times lie in `0..=MAX_TIME`
/// 6. Every eligible (type, stage, machine) resolves to a processing time
/// 7. The dispatching rule is known
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &ProblemConfig) -> ValidationResult {
    let mut errors = Vec::new();

    // Job types
    let mut types = HashSet::new();
    for job_type in config.demand.job_types() {
        if !types.insert(job_type) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job type in demand: {job_type}"),
            ));
        }
    }
    let type_count = types.len();
    let check_type = |job_type: &str, context: &str, errors: &mut Vec<ValidationError>| {
        if !types.contains(job_type) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownJobType,
                format!("{context} references undeclared job type '{job_type}'"),
            ));
        }
    };
    let check_time = |time: i64, context: String, errors: &mut Vec<ValidationError>| {
        if time < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeTime,
                format!("{context} is negative ({time})"),
            ));
        } else if time > MAX_TIME {
            errors.push(ValidationError::new(
                ValidationErrorKind::TimeOutOfRange,
                format!("{context} exceeds {MAX_TIME} ({time})"),
            ));
        }
    };

    // Stages and machines
    if config.stages.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyPlan,
            "Process plan has no stages",
        ));
    }

    let mut stage_ids = HashSet::new();
    for stage in &config.stages {
        if !stage_ids.insert(stage.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate stage ID: {}", stage.id),
            ));
        }

        let mut machine_ids = HashSet::new();
        for (machine_id, machine) in &stage.machines {
            let context = format!("Machine '{}/{}'", stage.id, machine_id);
            if !machine_ids.insert(machine_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate machine ID in stage '{}': {}", stage.id, machine_id),
                ));
            }

            if let Some(named) = machine.eligible.named_types() {
                for job_type in named {
                    check_type(job_type, &context, &mut errors);
                }
            }

            match &machine.durations {
                Some(MachineDurations::Uniform(d)) => {
                    check_time(*d, format!("{context} duration"), &mut errors)
                }
                Some(MachineDurations::ByIndex(v)) => {
                    if v.len() != 1 && v.len() != type_count {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::DurationShape,
                            format!(
                                "{context} has {} indexed durations, expected 1 or {type_count}",
                                v.len()
                            ),
                        ));
                    }
                    for d in v {
                        check_time(*d, format!("{context} duration"), &mut errors);
                    }
                }
                Some(MachineDurations::ByType(m)) => {
                    for (job_type, d) in m {
                        check_type(job_type, &context, &mut errors);
                        let what = format!("{context} duration for '{job_type}'");
                        check_time(*d, what, &mut errors);
                    }
                }
                None => {}
            }
        }
    }

    // Per-type stage vectors
    for (job_type, durations) in &config.type_durations {
        check_type(job_type, "Type duration table", &mut errors);
        if durations.len() != config.stages.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DurationShape,
                format!(
                    "Type '{job_type}' has {} stage durations, expected {}",
                    durations.len(),
                    config.stages.len()
                ),
            ));
        }
        for d in durations {
            check_time(*d, format!("Type '{job_type}' duration"), &mut errors);
        }
    }

    // Every eligible triple must resolve to a processing time
    for (position, stage) in config.stages.iter().enumerate() {
        for (machine_id, machine) in &stage.machines {
            for (type_index, job_type) in config.demand.job_types().enumerate() {
                if machine.eligible.accepts(job_type)
                    && config
                        .duration_for(position, machine, job_type, type_index)
                        .is_none()
                {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingDuration,
                        format!(
                            "No processing time for type '{job_type}' on machine '{}/{}'",
                            stage.id, machine_id
                        ),
                    ));
                }
            }
        }
    }

    // Setup table
    for (from, row) in &config.setup_time {
        for (to, time) in row {
            check_time(*time, format!("Setup time {from} → {to}"), &mut errors);
        }
    }
    check_time(config.setup_default, "Default setup time".to_string(), &mut errors);

    // Dispatching rule
    if let Err(err) = config.rule.parse::<DispatchRule>() {
        errors.extend(err.validation_errors().iter().cloned());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
