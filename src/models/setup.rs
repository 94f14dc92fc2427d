//! Sequence-dependent setup times.
//!
//! Maps (previous job type, next job type) → setup duration. A setup is
//! charged only between two consecutive jobs on the same machine; the first
//! job on a machine never pays one.
//!
//! # Reference
//! Allahverdi et al. (2008), "A survey of scheduling problems with
//! setup times or costs"

use std::collections::HashMap;

/// Setup-time table shared by all machines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupTable {
    /// from → to → duration.
    transitions: HashMap<String, HashMap<String, i64>>,
    /// Setup for a changeover between distinct types with no explicit entry.
    pub default_time: i64,
}

impl SetupTable {
    /// Creates an empty table (every changeover is free).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default changeover time.
    pub fn with_default(mut self, default_time: i64) -> Self {
        self.default_time = default_time;
        self
    }

    /// Builder: defines a transition time and returns self.
    pub fn with_transition(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        time: i64,
    ) -> Self {
        self.set_transition(from, to, time);
        self
    }

    /// Builder: same setup time in both directions.
    pub fn with_symmetric(self, a: impl Into<String>, b: impl Into<String>, time: i64) -> Self {
        let (a, b) = (a.into(), b.into());
        self.with_transition(a.clone(), b.clone(), time)
            .with_transition(b, a, time)
    }

    /// Defines a transition time between two job types.
    pub fn set_transition(&mut self, from: impl Into<String>, to: impl Into<String>, time: i64) {
        self.transitions
            .entry(from.into())
            .or_default()
            .insert(to.into(), time);
    }

    /// Setup time when `to` follows `from` on one machine.
    ///
    /// Returns the explicit time if defined, otherwise the default.
    /// Same-type transitions return 0 unless explicitly set.
    pub fn get(&self, from: &str, to: &str) -> i64 {
        let explicit = self.transitions.get(from).and_then(|row| row.get(to));
        match explicit {
            Some(&time) => time,
            None if from == to => 0,
            None => self.default_time,
        }
    }

    /// Setup owed by a job of type `to` on a machine whose last job had
    /// type `last` (`None` = empty machine, no setup).
    pub fn owed(&self, last: Option<&str>, to: &str) -> i64 {
        last.map(|from| self.get(from, to)).unwrap_or(0)
    }

    /// Number of explicitly defined transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(HashMap::len).sum()
    }

    /// Explicit entries as (from, to, time).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, i64)> {
        self.transitions.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, time)| (from.as_str(), to.as_str(), *time))
        })
    }
}
