//! Status updates and wholesale progress recomputation.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::domain::{ProblemStatus, StudyPlan, StudyProblem, StudyProgress, StudySession, Tally};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Streaks over the dates of fully completed sessions.
///
/// The current streak only counts if its last day is `today` or the day before.
pub fn calculate_streaks(completed_dates: &[NaiveDate], today: NaiveDate) -> Streaks {
    let mut dates = completed_dates.to_vec();
    dates.sort_unstable();
    dates.dedup();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for d in &dates {
        run = match prev {
            Some(p) if *d - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*d);
    }

    let current = match prev {
        Some(last) if last == today || last + Duration::days(1) == today => run,
        _ => 0,
    };
    Streaks { current, longest }
}

fn bump(map: &mut BTreeMap<String, Tally>, key: &str, done: bool) {
    let t = map.entry(key.to_string()).or_default();
    t.total += 1;
    if done {
        t.completed += 1;
    }
}

/// Rebuild the full aggregate from the schedule. Pure in (schedule, today).
pub fn compute_progress(schedule: &[StudySession], today: NaiveDate) -> StudyProgress {
    let mut p = StudyProgress::default();

    for problem in schedule.iter().flat_map(|s| s.problems.iter()) {
        let done = problem.status == ProblemStatus::Completed;
        p.total_problems += 1;
        match problem.status {
            ProblemStatus::Completed => p.completed_problems += 1,
            ProblemStatus::Skipped => p.skipped_problems += 1,
            _ => {}
        }

        let t = p.difficulty_breakdown.entry(problem.problem.difficulty).or_default();
        t.total += 1;
        if done {
            t.completed += 1;
        }
        for topic in &problem.problem.topics {
            bump(&mut p.topic_breakdown, topic, done);
        }
        bump(&mut p.company_breakdown, &problem.problem.company, done);
    }

    let completed_dates: Vec<NaiveDate> = schedule.iter().filter(|s| s.completed).map(|s| s.date).collect();
    if !completed_dates.is_empty() {
        p.average_problems_per_day = p.completed_problems as f64 / completed_dates.len() as f64;
    }
    let streaks = calculate_streaks(&completed_dates, today);
    p.current_streak = streaks.current;
    p.longest_streak = streaks.longest;

    p.completion_rate = if p.total_problems == 0 {
        0.0
    } else {
        100.0 * p.completed_problems as f64 / p.total_problems as f64
    };
    p
}

fn find_problem<'a>(plan: &'a mut StudyPlan, session_id: &str, title: &str) -> Option<(usize, &'a mut StudyProblem)> {
    let (idx, session) = plan.schedule.iter_mut().enumerate().find(|(_, s)| s.id == session_id)?;
    let problem = session.problems.iter_mut().find(|p| p.problem.title == title)?;
    Some((idx, problem))
}

fn refresh_session(session: &mut StudySession, now: DateTime<Utc>) {
    let completed = session.all_terminal();
    if completed && !session.completed {
        session.completed_at = Some(now);
    } else if !completed {
        session.completed_at = None;
    }
    session.completed = completed;
}

/// Set a problem's status (and notes), then recompute the session flag and
/// the plan's progress. Unknown session or title leaves the plan untouched
/// and returns `false`.
#[instrument(level = "info", target = "planner", skip_all, fields(plan_id = %plan.id, %session_id, %title, ?status))]
pub fn update_status(
    plan: &mut StudyPlan,
    session_id: &str,
    title: &str,
    status: ProblemStatus,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> bool {
    let Some((idx, problem)) = find_problem(plan, session_id, title) else {
        debug!(target: "planner", "No matching problem; status update ignored");
        return false;
    };

    if status == ProblemStatus::Completed {
        if problem.status != ProblemStatus::Completed {
            problem.completed_at = Some(now);
        }
    } else {
        problem.completed_at = None;
    }
    problem.status = status;
    if notes.is_some() {
        problem.notes = notes;
    }

    refresh_session(&mut plan.schedule[idx], now);
    plan.progress = compute_progress(&plan.schedule, now.date_naive());
    plan.updated_at = now;
    info!(
        target: "planner",
        completed = plan.progress.completed_problems,
        total = plan.progress.total_problems,
        current_streak = plan.progress.current_streak,
        "Progress recomputed"
    );
    true
}

/// Flip a problem's bookmark. Progress is unaffected.
pub fn toggle_bookmark(plan: &mut StudyPlan, session_id: &str, title: &str, now: DateTime<Utc>) -> Option<bool> {
    let (_, problem) = find_problem(plan, session_id, title)?;
    problem.bookmarked = !problem.bookmarked;
    let state = problem.bookmarked;
    plan.updated_at = now;
    Some(state)
}
