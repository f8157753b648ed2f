//! Calendar layout: selected problems → daily sessions with a weekly difficulty progression.
//!
//! Layout walks a single read cursor over the progression-sorted pool. Each day
//! scans forward from the cursor for problems matching that day's per-difficulty
//! targets, tops up from any unconsumed problem in the same window, then moves
//! the cursor by the number of problems it assigned. Problems the scan passed
//! over without taking fall behind the cursor and are not scheduled.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use tracing::{debug, instrument, warn};

use crate::domain::{Difficulty, SkillLevel, StudyProblem, StudySession};
use crate::planner::prioritize::rank_in;

/// Target difficulty mix for one week.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeekRatios {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
}

impl WeekRatios {
    const fn new(easy: f64, medium: f64, hard: f64) -> Self {
        Self { easy, medium, hard }
    }

    pub fn share(&self, d: Difficulty) -> f64 {
        match d {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Unknown => 0.0,
        }
    }
}

pub const PROGRESSION_WEEKS: usize = 8;

const BEGINNER: [WeekRatios; PROGRESSION_WEEKS] = [
    WeekRatios::new(0.70, 0.30, 0.00),
    WeekRatios::new(0.60, 0.40, 0.00),
    WeekRatios::new(0.50, 0.45, 0.05),
    WeekRatios::new(0.40, 0.50, 0.10),
    WeekRatios::new(0.35, 0.50, 0.15),
    WeekRatios::new(0.30, 0.50, 0.20),
    WeekRatios::new(0.25, 0.50, 0.25),
    WeekRatios::new(0.20, 0.50, 0.30),
];

const INTERMEDIATE: [WeekRatios; PROGRESSION_WEEKS] = [
    WeekRatios::new(0.40, 0.50, 0.10),
    WeekRatios::new(0.35, 0.50, 0.15),
    WeekRatios::new(0.30, 0.50, 0.20),
    WeekRatios::new(0.25, 0.50, 0.25),
    WeekRatios::new(0.20, 0.50, 0.30),
    WeekRatios::new(0.15, 0.50, 0.35),
    WeekRatios::new(0.10, 0.50, 0.40),
    WeekRatios::new(0.10, 0.45, 0.45),
];

const ADVANCED: [WeekRatios; PROGRESSION_WEEKS] = [
    WeekRatios::new(0.20, 0.50, 0.30),
    WeekRatios::new(0.15, 0.50, 0.35),
    WeekRatios::new(0.10, 0.50, 0.40),
    WeekRatios::new(0.10, 0.45, 0.45),
    WeekRatios::new(0.05, 0.45, 0.50),
    WeekRatios::new(0.05, 0.40, 0.55),
    WeekRatios::new(0.00, 0.40, 0.60),
    WeekRatios::new(0.00, 0.35, 0.65),
];

/// Ratios for a 1-based week; weeks past the table reuse the last row.
pub fn week_ratios(level: SkillLevel, week: usize) -> WeekRatios {
    let table = match level {
        SkillLevel::Beginner => &BEGINNER,
        SkillLevel::Intermediate => &INTERMEDIATE,
        SkillLevel::Advanced => &ADVANCED,
    };
    table[week.clamp(1, PROGRESSION_WEEKS) - 1]
}

/// Difficulty order used when laying out sessions.
pub fn layout_order(level: SkillLevel) -> [Difficulty; 3] {
    match level {
        SkillLevel::Beginner | SkillLevel::Intermediate => [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
        SkillLevel::Advanced => [Difficulty::Medium, Difficulty::Easy, Difficulty::Hard],
    }
}

fn progression_cmp(level: SkillLevel, a: &StudyProblem, b: &StudyProblem) -> Ordering {
    let (qa, qb) = (a.quality_score(), b.quality_score());
    if (qa - qb).abs() > 0.1 {
        return qb.total_cmp(&qa);
    }
    let order = layout_order(level);
    let by_difficulty = rank_in(&order, a.problem.difficulty).cmp(&rank_in(&order, b.problem.difficulty));
    if by_difficulty != Ordering::Equal {
        return by_difficulty;
    }
    b.acceptance_rate().total_cmp(&a.acceptance_rate())
}

/// Per-difficulty slot counts for one day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayTargets {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DayTargets {
    pub fn get(&self, d: Difficulty) -> usize {
        match d {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Unknown => 0,
        }
    }

    fn slot(&mut self, d: Difficulty) -> Option<&mut usize> {
        match d {
            Difficulty::Easy => Some(&mut self.easy),
            Difficulty::Medium => Some(&mut self.medium),
            Difficulty::Hard => Some(&mut self.hard),
            Difficulty::Unknown => None,
        }
    }

    pub fn sum(&self) -> usize {
        self.easy + self.medium + self.hard
    }
}

/// Round `daily_goal × ratio` per difficulty, then put any rounding shortfall
/// on the difficulty this week weights most (ties go to layout order).
pub fn day_targets(level: SkillLevel, ratios: WeekRatios, daily_goal: usize) -> DayTargets {
    let round = |r: f64| (daily_goal as f64 * r).round() as usize;
    let mut t = DayTargets { easy: round(ratios.easy), medium: round(ratios.medium), hard: round(ratios.hard) };

    let shortfall = daily_goal.saturating_sub(t.sum());
    if shortfall > 0 {
        let preferred = layout_order(level)
            .into_iter()
            .fold(None::<Difficulty>, |best, d| match best {
                Some(b) if ratios.share(b) >= ratios.share(d) => Some(b),
                _ => Some(d),
            })
            .unwrap_or(Difficulty::Medium);
        if let Some(slot) = t.slot(preferred) {
            *slot += shortfall;
        }
    }
    t
}

/// Everything the layout needs from the plan form.
#[derive(Clone, Copy, Debug)]
pub struct LayoutParams {
    pub skill_level: SkillLevel,
    pub weeks: usize,
    pub daily_goal: usize,
    pub start_date: NaiveDate,
}

#[instrument(level = "debug", target = "planner", skip_all, fields(selected = selected.len(), weeks = params.weeks, daily_goal = params.daily_goal))]
pub fn build_schedule(mut selected: Vec<StudyProblem>, params: &LayoutParams) -> Vec<StudySession> {
    selected.sort_by(|a, b| progression_cmp(params.skill_level, a, b));
    let mut pool: Vec<Option<StudyProblem>> = selected.into_iter().map(Some).collect();
    let mut cursor = 0usize;
    let mut sessions = Vec::new();
    let daily_goal = params.daily_goal;

    'weeks: for week in 1..=params.weeks {
        let ratios = week_ratios(params.skill_level, week);
        let targets = day_targets(params.skill_level, ratios, daily_goal);

        for day in 0..7 {
            if cursor >= pool.len() {
                break 'weeks;
            }

            let mut taken: Vec<usize> = Vec::with_capacity(daily_goal.min(pool.len() - cursor));
            let mut counts = DayTargets::default();
            for idx in cursor..pool.len() {
                if taken.len() >= daily_goal {
                    break;
                }
                let Some(p) = &pool[idx] else { continue };
                let d = p.problem.difficulty;
                if counts.get(d) < targets.get(d) {
                    if let Some(c) = counts.slot(d) {
                        *c += 1;
                    }
                    taken.push(idx);
                }
            }
            if taken.len() < daily_goal {
                for idx in cursor..pool.len() {
                    if taken.len() >= daily_goal {
                        break;
                    }
                    if pool[idx].is_some() && !taken.contains(&idx) {
                        taken.push(idx);
                    }
                }
            }

            if taken.is_empty() {
                break 'weeks;
            }
            taken.sort_unstable();
            let problems: Vec<StudyProblem> = taken.iter().filter_map(|&i| pool[i].take()).collect();
            cursor += problems.len();

            let offset = ((week - 1) * 7 + day) as i64;
            let date = params.start_date + Duration::days(offset);
            debug!(target: "planner", %date, week, problems = problems.len(), "Session laid out");
            sessions.push(StudySession::new(date, problems));
        }
    }

    let dropped = pool.iter().filter(|p| p.is_some()).count();
    if dropped > 0 {
        warn!(target: "planner", dropped, sessions = sessions.len(), "Selected problems left out of the schedule");
    }
    sessions
}
