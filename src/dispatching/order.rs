//! Static job ordering by dispatching rule.
//!
//! The order is computed once and used as the dispatch priority for the
//! whole run (non-adaptive list scheduling).

use super::{DispatchContext, DispatchRule, DispatchingRule, RuleScore};
use crate::error::Result;
use crate::models::{JobInstance, ProcessPlan};

/// Returns indices into `jobs` sorted by rule score.
///
/// Stable: jobs with equal scores keep their catalog order.
pub fn order_indices<R>(jobs: &[JobInstance], context: &DispatchContext, rule: &R) -> Vec<usize>
where
    R: DispatchingRule + ?Sized,
{
    let scores: Vec<RuleScore> = jobs.iter().map(|j| rule.evaluate(j, context)).collect();
    let mut indices: Vec<usize> = (0..jobs.len()).collect();
    indices.sort_by_key(|&i| scores[i]);
    indices
}

/// Orders the job catalog by a dispatching rule.
pub fn order_jobs<R>(jobs: Vec<JobInstance>, plan: &ProcessPlan, rule: &R) -> Vec<JobInstance>
where
    R: DispatchingRule + ?Sized,
{
    let context = DispatchContext::from_plan(plan);
    let mut keyed: Vec<(RuleScore, JobInstance)> = jobs
        .into_iter()
        .map(|j| (rule.evaluate(&j, &context), j))
        .collect();
    keyed.sort_by_key(|(score, _)| *score);
    keyed.into_iter().map(|(_, j)| j).collect()
}

/// Orders the job catalog by a rule given by name ("SPT" / "LPT").
///
/// An unknown name fails with `InvalidConfiguration` and no ordering.
pub fn order_jobs_by_name(
    jobs: Vec<JobInstance>,
    plan: &ProcessPlan,
    rule: &str,
) -> Result<Vec<JobInstance>> {
    let rule: DispatchRule = rule.parse()?;
    Ok(order_jobs(jobs, plan, &rule))
}
