//! Study plan engine: scoring, ranking, selection, layout, progress and feedback.
//!
//! Flow for one generation call:
//!   candidate pool → annotate (quality) → filter → rank → select → lay out → `StudyPlan`
//!
//! Everything here is synchronous and free of I/O. Callers own persistence and
//! must serialize writes to a single plan.

pub mod prioritize;
pub mod progress;
pub mod quality;
pub mod recommend;
pub mod schedule;
pub mod select;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{CandidateProblem, GenerationOptions, PlanForm, StudyPlan};
use crate::error::{PlanError, Result};
use prioritize::{Annotated, Prioritizer};
use schedule::LayoutParams;
use select::SelectionLimits;

/// Longest plan accepted, in weeks.
pub const MAX_DURATION_WEEKS: u32 = 52;
/// Most problems per day accepted.
pub const MAX_DAILY_GOAL: u32 = 50;

/// Reject forms that cannot produce a plan. Runs before any generation work.
pub fn validate_form(form: &PlanForm) -> Result<()> {
    if !(1..=MAX_DURATION_WEEKS).contains(&form.duration) {
        return Err(PlanError::InvalidConfig(format!("duration must be between 1 and {MAX_DURATION_WEEKS} weeks")));
    }
    if !(1..=MAX_DAILY_GOAL).contains(&form.daily_goal) {
        return Err(PlanError::InvalidConfig(format!("dailyGoal must be between 1 and {MAX_DAILY_GOAL}")));
    }
    if form.target_companies.iter().all(|c| c.trim().is_empty()) {
        return Err(PlanError::InvalidConfig("at least one target company is required".into()));
    }
    Ok(())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Annotate the pool and keep what this form can use.
///
/// Keeps target-company problems, problems sharing a topic with non-empty focus
/// areas, and problems at or above `min_quality_score`; first title wins.
/// Kept problems carry the form's spelling of their company, so every later
/// per-company count and breakdown keys on `targetCompanies` exactly.
pub fn annotate_and_filter(pool: &[CandidateProblem], form: &PlanForm, options: &GenerationOptions) -> Vec<Annotated> {
    let mut seen = HashSet::new();
    pool.iter()
        .filter_map(|p| {
            let target = form.target_companies.iter().find(|c| eq_ignore_case(c, &p.company))?;
            Some((p, target.as_str()))
        })
        .filter(|(p, _)| {
            form.focus_areas.is_empty()
                || p.topics.iter().any(|t| form.focus_areas.iter().any(|f| eq_ignore_case(f, t)))
        })
        .map(|(p, target)| {
            let problem = CandidateProblem { company: target.to_string(), ..p.clone() };
            let quality = quality::annotate(&problem, options.learning_mode);
            Annotated { problem, quality }
        })
        .filter(|a| a.quality.quality_score >= options.min_quality_score)
        .filter(|a| seen.insert(a.problem.title.clone()))
        .collect()
}

/// Build a plan from a form and a candidate pool.
///
/// Never fails on a small or empty pool: the plan just has fewer sessions.
/// Compare `progress.total_problems` with `duration × 7 × dailyGoal` to detect under-fill.
#[instrument(level = "info", target = "planner", skip_all, fields(name = %form.name, pool = pool.len()))]
pub fn generate(form: &PlanForm, pool: &[CandidateProblem], options: &GenerationOptions, now: DateTime<Utc>) -> Result<StudyPlan> {
    validate_form(form)?;

    let weeks = form.duration as usize;
    let daily_goal = form.daily_goal as usize;
    let total_needed = weeks * 7 * daily_goal;

    let candidates = annotate_and_filter(pool, form, options);
    let prioritizer = Prioritizer {
        skill_level: form.skill_level,
        learning_mode: options.learning_mode,
        quality_preference: options.quality_preference,
    };
    let ranked = prioritizer.rank(candidates);

    let limits = SelectionLimits {
        total_needed,
        max_per_company: options.max_problems_per_company,
        balance_across_companies: options.balance_across_companies,
        target_company_count: form.target_companies.len(),
        adaptive_difficulty: options.adaptive_difficulty,
        skill_level: form.skill_level,
        daily_goal,
    };
    let selection = select::select(&ranked, &limits);
    if selection.selected.len() < total_needed {
        warn!(
            target: "planner",
            requested = total_needed,
            selected = selection.selected.len(),
            eligible = ranked.len(),
            "Selection under-filled"
        );
    }

    let params = LayoutParams { skill_level: form.skill_level, weeks, daily_goal, start_date: form.start_date };
    let mut schedule = schedule::build_schedule(selection.selected, &params);
    if !options.include_quality_metrics {
        for p in schedule.iter_mut().flat_map(|s| s.problems.iter_mut()) {
            p.quality = None;
        }
    }

    let progress = progress::compute_progress(&schedule, now.date_naive());
    info!(
        target: "planner",
        sessions = schedule.len(),
        problems = progress.total_problems,
        requested = total_needed,
        "Study plan generated"
    );

    Ok(StudyPlan {
        id: Uuid::new_v4().to_string(),
        name: form.name.clone(),
        target_companies: form.target_companies.clone(),
        duration: form.duration,
        daily_goal: form.daily_goal,
        skill_level: form.skill_level,
        focus_areas: form.focus_areas.clone(),
        schedule,
        progress,
        created_at: now,
        updated_at: now,
    })
}
