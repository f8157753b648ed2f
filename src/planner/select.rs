//! Greedy, constraint-aware selection over the ranked candidate list.
//!
//! One forward pass, no backfill: when the constraints are tighter than the
//! pool allows, fewer than `total_needed` problems come back.

use std::collections::HashMap;
use std::ops::ControlFlow;

use crate::domain::{Difficulty, ProblemStatus, SkillLevel, StudyProblem};
use crate::planner::prioritize::Annotated;
use crate::planner::schedule::week_ratios;

/// Selection only starts checking the difficulty mix after this many picks.
const ADAPTIVE_WARMUP: usize = 10;
/// Allowed overshoot of a difficulty's share above its weekly target.
const ADAPTIVE_TOLERANCE: f64 = 0.10;
/// Slack above an even per-company split when balancing.
const BALANCE_SLACK: f64 = 2.0;

#[derive(Clone, Debug)]
pub struct SelectionLimits {
    pub total_needed: usize,
    pub max_per_company: usize,
    pub balance_across_companies: bool,
    pub target_company_count: usize,
    pub adaptive_difficulty: bool,
    pub skill_level: SkillLevel,
    pub daily_goal: usize,
}

/// Running state threaded through the pass.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub selected: Vec<StudyProblem>,
    pub by_company: HashMap<String, usize>,
    pub by_difficulty: HashMap<Difficulty, usize>,
}

impl Selection {
    fn company_count(&self, company: &str) -> usize {
        self.by_company.get(company).copied().unwrap_or(0)
    }

    fn difficulty_count(&self, d: Difficulty) -> usize {
        self.by_difficulty.get(&d).copied().unwrap_or(0)
    }

    /// Why `c` cannot be taken right now, if anything.
    fn rejects(&self, c: &Annotated, limits: &SelectionLimits) -> Option<&'static str> {
        let company = c.problem.company.as_str();
        let count = self.company_count(company);
        if count >= limits.max_per_company {
            return Some("company_cap");
        }

        if limits.balance_across_companies && limits.target_company_count > 0 {
            let fair = self.selected.len() as f64 / limits.target_company_count as f64 + BALANCE_SLACK;
            if count as f64 > fair {
                return Some("company_balance");
            }
        }

        let d = c.problem.difficulty;
        if limits.adaptive_difficulty && self.selected.len() > ADAPTIVE_WARMUP && d != Difficulty::Unknown {
            let per_week = (limits.daily_goal * 7).max(1);
            let week = self.selected.len() / per_week + 1;
            let target = week_ratios(limits.skill_level, week).share(d);
            let share = self.difficulty_count(d) as f64 / self.selected.len() as f64;
            if share - target > ADAPTIVE_TOLERANCE {
                return Some("difficulty_mix");
            }
        }
        None
    }

    fn accept(mut self, c: &Annotated) -> Self {
        *self.by_company.entry(c.problem.company.clone()).or_default() += 1;
        *self.by_difficulty.entry(c.problem.difficulty).or_default() += 1;
        self.selected.push(StudyProblem {
            problem: c.problem.clone(),
            status: ProblemStatus::NotStarted,
            notes: None,
            bookmarked: false,
            completed_at: None,
            quality: Some(c.quality.clone()),
        });
        self
    }
}

/// Walk `ranked` in order, keeping what the limits allow, until `total_needed`.
pub fn select(ranked: &[Annotated], limits: &SelectionLimits) -> Selection {
    let flow = ranked.iter().try_fold(Selection::default(), |acc, c| {
        if acc.selected.len() >= limits.total_needed {
            return ControlFlow::Break(acc);
        }
        match acc.rejects(c, limits) {
            Some(rule) => {
                tracing::trace!(target: "planner", title = %c.problem.title, rule, "Candidate skipped");
                ControlFlow::Continue(acc)
            }
            None => ControlFlow::Continue(acc.accept(c)),
        }
    });
    match flow {
        ControlFlow::Break(acc) | ControlFlow::Continue(acc) => acc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateProblem, LearningMode};
    use crate::planner::quality::annotate;

    fn cand(title: &str, company: &str, d: Difficulty) -> Annotated {
        let problem = CandidateProblem {
            title: title.into(),
            company: company.into(),
            difficulty: d,
            ..Default::default()
        };
        let quality = annotate(&problem, LearningMode::Balanced);
        Annotated { problem, quality }
    }

    fn limits(total: usize, cap: usize, companies: usize) -> SelectionLimits {
        SelectionLimits {
            total_needed: total,
            max_per_company: cap,
            balance_across_companies: true,
            target_company_count: companies,
            adaptive_difficulty: true,
            skill_level: SkillLevel::Intermediate,
            daily_goal: 2,
        }
    }

    #[test]
    fn company_cap_underfills_instead_of_violating() {
        let mut pool = Vec::new();
        for company in ["A", "B", "C"] {
            for i in 0..5 {
                pool.push(cand(&format!("{company}{i}"), company, Difficulty::Medium));
            }
        }
        let sel = select(&pool, &limits(10, 1, 3));
        assert_eq!(sel.selected.len(), 3);
        for company in ["A", "B", "C"] {
            assert_eq!(sel.by_company[company], 1);
        }
    }

    #[test]
    fn stops_at_total_needed() {
        let pool: Vec<Annotated> = (0..20).map(|i| cand(&format!("p{i}"), "A", Difficulty::Medium)).collect();
        let mut l = limits(4, 50, 1);
        l.adaptive_difficulty = false;
        let sel = select(&pool, &l);
        let titles: Vec<&str> = sel.selected.iter().map(|p| p.problem.title.as_str()).collect();
        assert_eq!(titles, ["p0", "p1", "p2", "p3"]);
        assert!(sel.selected.iter().all(|p| p.status == ProblemStatus::NotStarted && p.quality.is_some()));
    }

    #[test]
    fn balance_holds_back_a_dominant_company() {
        // A comes first in rank order; balancing caps how far it can run ahead.
        let mut pool: Vec<Annotated> = (0..6).map(|i| cand(&format!("A{i}"), "A", Difficulty::Medium)).collect();
        pool.extend((0..6).map(|i| cand(&format!("B{i}"), "B", Difficulty::Medium)));
        let mut l = limits(8, 50, 2);
        l.adaptive_difficulty = false;
        let sel = select(&pool, &l);
        // A5 is the first pick where A's count (5) exceeds 5/2 + 2; B fills the rest.
        assert_eq!(sel.by_company["A"], 5);
        assert_eq!(sel.by_company["B"], 3);

        l.balance_across_companies = false;
        let unbalanced = select(&pool, &l);
        assert_eq!(unbalanced.by_company["A"], 6);
    }

    #[test]
    fn adaptive_mix_skips_overrepresented_difficulty() {
        // Intermediate week 1 targets hard at 10%; once more than ten picks
        // exist, hard stops being taken while it sits above 20%.
        let mut pool: Vec<Annotated> = (0..12).map(|i| cand(&format!("h{i}"), "A", Difficulty::Hard)).collect();
        pool.extend((0..12).map(|i| cand(&format!("m{i}"), "A", Difficulty::Medium)));
        let mut l = limits(14, 50, 1);
        l.balance_across_companies = false;
        let sel = select(&pool, &l);
        assert_eq!(sel.by_difficulty[&Difficulty::Hard], 11);
        assert_eq!(sel.by_difficulty[&Difficulty::Medium], 3);

        l.adaptive_difficulty = false;
        let flat = select(&pool, &l);
        assert_eq!(flat.by_difficulty[&Difficulty::Hard], 12);
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let sel = select(&[], &limits(10, 5, 2));
        assert!(sel.selected.is_empty());
    }
}
