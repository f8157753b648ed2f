//! Rule-based feedback and adaptive guidance derived from a plan's progress.

use serde::Serialize;

use crate::domain::{Difficulty, ProblemStatus, StudyPlan, Tally};

const DEFAULT_TOPICS: [&str; 3] = ["Array", "String", "Hash Table"];

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Feedback {
    pub feedback: Vec<String>,
    pub recommendations: Vec<String>,
    pub insights: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveRecommendations {
    pub suggested_difficulty: Vec<Difficulty>,
    pub suggested_topics: Vec<String>,
    pub suggested_companies: Vec<String>,
    pub reasoning: String,
}

/// One upcoming problem, tagged with where it sits in the schedule.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NextProblem {
    pub session_id: String,
    pub date: chrono::NaiveDate,
    pub title: String,
    pub difficulty: Difficulty,
    pub company: String,
    pub link: String,
    pub status: ProblemStatus,
}

fn tally(plan: &StudyPlan, d: Difficulty) -> Tally {
    plan.progress.difficulty_breakdown.get(&d).copied().unwrap_or_default()
}

pub fn generate_feedback(plan: &StudyPlan) -> Feedback {
    let p = &plan.progress;
    let mut out = Feedback::default();

    let rate = p.completion_rate;
    out.feedback.push(if rate >= 80.0 {
        format!("Excellent work! You've completed {rate:.0}% of your plan.")
    } else if rate >= 60.0 {
        format!("Good progress: {rate:.0}% done. Keep the momentum going.")
    } else if rate >= 40.0 {
        format!("You're {rate:.0}% of the way through. A little more consistency will pay off.")
    } else {
        format!("You're at {rate:.0}%. Small daily sessions add up quickly.")
    });

    if p.current_streak >= 7 {
        out.feedback.push(format!("Amazing {}-day streak! Your consistency is paying off.", p.current_streak));
    } else if p.current_streak >= 3 {
        out.feedback.push(format!("Nice {}-day streak. Keep it alive tomorrow.", p.current_streak));
    } else if p.current_streak == 0 && p.longest_streak > 0 {
        out.recommendations.push(format!(
            "Your longest streak was {} days. Finish today's session to start a new one.",
            p.longest_streak
        ));
    }

    let (easy, medium, hard) = (tally(plan, Difficulty::Easy), tally(plan, Difficulty::Medium), tally(plan, Difficulty::Hard));
    if easy.total > 0 && easy.ratio() >= 0.8 && medium.ratio() < 0.5 {
        out.recommendations.push("You've got Easy problems down. Shift your focus to Medium problems.".into());
    }
    if medium.total > 0 && medium.ratio() >= 0.7 && hard.ratio() < 0.5 {
        out.recommendations.push("Medium problems are going well. You're ready to take on more Hard problems.".into());
    }

    for (topic, t) in &p.topic_breakdown {
        if t.total < 3 {
            continue;
        }
        if t.ratio() < 0.5 {
            out.insights.push(format!(
                "{topic} needs attention: {} of {} completed.",
                t.completed, t.total
            ));
        } else if t.ratio() >= 0.8 {
            out.insights.push(format!("{topic} is a strong area: {} of {} completed.", t.completed, t.total));
        }
    }

    let completed_days = plan.schedule.iter().filter(|s| s.completed).count();
    let goal = plan.daily_goal as f64;
    if completed_days > 0 && goal > 0.0 {
        let avg = p.average_problems_per_day;
        if avg < goal * 0.7 {
            out.recommendations.push(format!(
                "You're averaging {avg:.1} problems per day against a goal of {}. Consider a smaller daily goal.",
                plan.daily_goal
            ));
        } else if avg > goal * 1.2 {
            out.insights.push(format!(
                "You're averaging {avg:.1} problems per day, ahead of your goal of {}.",
                plan.daily_goal
            ));
        }
    }

    for company in &plan.target_companies {
        if let Some(t) = p.company_breakdown.get(company) {
            if t.total >= 5 && t.ratio() < 0.5 {
                out.recommendations.push(format!(
                    "{company} problems are lagging ({} of {}). Schedule extra time for them.",
                    t.completed, t.total
                ));
            }
        }
    }

    if p.skipped_problems > 0 && p.skipped_problems as f64 > 0.3 * p.completed_problems as f64 {
        out.recommendations.push(format!(
            "You've skipped {} problems. Try attempting them before moving on.",
            p.skipped_problems
        ));
    }

    out
}

fn weakest<'a, I>(items: I, min_total: usize, take: usize) -> Vec<String>
where
    I: Iterator<Item = (&'a String, &'a Tally)>,
{
    let mut v: Vec<(&String, f64)> = items.filter(|(_, t)| t.total >= min_total).map(|(k, t)| (k, t.ratio())).collect();
    v.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    v.into_iter().take(take).map(|(k, _)| k.clone()).collect()
}

pub fn adaptive_recommendations(plan: &StudyPlan) -> AdaptiveRecommendations {
    let p = &plan.progress;
    let easy = tally(plan, Difficulty::Easy).ratio();
    let medium = tally(plan, Difficulty::Medium).ratio();

    let suggested_difficulty = if easy >= 0.7 && medium >= 0.6 {
        vec![Difficulty::Hard, Difficulty::Medium]
    } else if easy >= 0.7 {
        vec![Difficulty::Medium, Difficulty::Hard]
    } else if easy >= 0.4 {
        vec![Difficulty::Easy, Difficulty::Medium]
    } else {
        vec![Difficulty::Easy]
    };

    let mut suggested_topics = weakest(p.topic_breakdown.iter(), 2, 3);
    if suggested_topics.is_empty() {
        suggested_topics = DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect();
    }

    let targets = p
        .company_breakdown
        .iter()
        .filter(|(name, _)| plan.target_companies.contains(*name));
    let mut suggested_companies = weakest(targets, 3, 2);
    if suggested_companies.is_empty() {
        suggested_companies = plan.target_companies.iter().take(2).cloned().collect();
    }

    let levels: Vec<&str> = suggested_difficulty.iter().map(|d| d.label()).collect();
    let reasoning = format!(
        "At {:.0}% completion with a {}-day streak, focus on {} problems in {}.",
        p.completion_rate,
        p.current_streak,
        levels.join("/"),
        suggested_topics.join(", ")
    );

    AdaptiveRecommendations { suggested_difficulty, suggested_topics, suggested_companies, reasoning }
}

/// Unfinished problems in schedule order.
pub fn next_problems(plan: &StudyPlan, limit: usize) -> Vec<NextProblem> {
    plan.schedule
        .iter()
        .flat_map(|s| s.problems.iter().map(move |p| (s, p)))
        .filter(|(_, p)| matches!(p.status, ProblemStatus::NotStarted | ProblemStatus::InProgress))
        .take(limit)
        .map(|(s, p)| NextProblem {
            session_id: s.id.clone(),
            date: s.date,
            title: p.problem.title.clone(),
            difficulty: p.problem.difficulty,
            company: p.problem.company.clone(),
            link: p.problem.link.clone(),
            status: p.status,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateProblem, SkillLevel, StudyProblem, StudyProgress, StudySession};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn plan(progress: StudyProgress, schedule: Vec<StudySession>) -> StudyPlan {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        StudyPlan {
            id: "p".into(),
            name: "p".into(),
            target_companies: vec!["Acme".into(), "Globex".into(), "Initech".into()],
            duration: 2,
            daily_goal: 3,
            skill_level: SkillLevel::Intermediate,
            focus_areas: vec![],
            schedule,
            progress,
            created_at: now,
            updated_at: now,
        }
    }

    fn t(completed: usize, total: usize) -> Tally {
        Tally { completed, total }
    }

    fn done_session(day: u32) -> StudySession {
        let mut s = StudySession::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), vec![]);
        s.completed = true;
        s
    }

    #[test]
    fn completion_bands() {
        for (rate, prefix) in [(85.0, "Excellent"), (60.0, "Good"), (45.0, "You're 45%"), (10.0, "You're at")] {
            let fb = generate_feedback(&plan(StudyProgress { completion_rate: rate, ..Default::default() }, vec![]));
            assert!(fb.feedback[0].starts_with(prefix), "{rate}: {}", fb.feedback[0]);
        }
    }

    #[test]
    fn streak_bands() {
        let fb = generate_feedback(&plan(StudyProgress { current_streak: 7, longest_streak: 7, ..Default::default() }, vec![]));
        assert!(fb.feedback.iter().any(|f| f.contains("7-day streak")));
        let fb = generate_feedback(&plan(StudyProgress { current_streak: 3, longest_streak: 4, ..Default::default() }, vec![]));
        assert!(fb.feedback.iter().any(|f| f.starts_with("Nice 3-day")));
        let fb = generate_feedback(&plan(StudyProgress { current_streak: 0, longest_streak: 4, ..Default::default() }, vec![]));
        assert!(fb.recommendations.iter().any(|r| r.contains("longest streak was 4")));
        let fb = generate_feedback(&plan(StudyProgress::default(), vec![]));
        assert_eq!(fb.feedback.len(), 1);
        assert!(fb.recommendations.is_empty());
        assert!(fb.insights.is_empty());
    }

    #[test]
    fn difficulty_progression_hints() {
        let mut p = StudyProgress::default();
        p.difficulty_breakdown.insert(Difficulty::Easy, t(9, 10));
        p.difficulty_breakdown.insert(Difficulty::Medium, t(1, 10));
        let fb = generate_feedback(&plan(p.clone(), vec![]));
        assert!(fb.recommendations.iter().any(|r| r.contains("Shift your focus to Medium")));

        p.difficulty_breakdown.insert(Difficulty::Medium, t(8, 10));
        let fb = generate_feedback(&plan(p, vec![]));
        assert!(!fb.recommendations.iter().any(|r| r.contains("Shift your focus")));
        assert!(fb.recommendations.iter().any(|r| r.contains("more Hard problems")));
    }

    #[test]
    fn topic_insights_need_three_attempts() {
        let mut p = StudyProgress::default();
        p.topic_breakdown.insert("Graph".into(), t(1, 4));
        p.topic_breakdown.insert("Array".into(), t(4, 5));
        p.topic_breakdown.insert("Tree".into(), t(0, 2));
        let fb = generate_feedback(&plan(p, vec![]));
        assert!(fb.insights.iter().any(|i| i.starts_with("Graph needs attention")));
        assert!(fb.insights.iter().any(|i| i.starts_with("Array is a strong area")));
        assert!(!fb.insights.iter().any(|i| i.starts_with("Tree")));
    }

    #[test]
    fn velocity_bands() {
        let slow = StudyProgress { average_problems_per_day: 1.0, ..Default::default() };
        let fb = generate_feedback(&plan(slow, vec![done_session(1)]));
        assert!(fb.recommendations.iter().any(|r| r.contains("smaller daily goal")));

        let fast = StudyProgress { average_problems_per_day: 4.0, ..Default::default() };
        let fb = generate_feedback(&plan(fast, vec![done_session(1)]));
        assert!(fb.insights.iter().any(|i| i.contains("ahead of your goal")));

        // No completed sessions, no velocity verdict.
        let idle = StudyProgress { average_problems_per_day: 0.0, ..Default::default() };
        let fb = generate_feedback(&plan(idle, vec![]));
        assert!(!fb.recommendations.iter().any(|r| r.contains("daily goal")));
    }

    #[test]
    fn weak_company_and_skip_rate() {
        let mut p = StudyProgress { completed_problems: 3, skipped_problems: 2, ..Default::default() };
        p.company_breakdown.insert("Acme".into(), t(1, 5));
        p.company_breakdown.insert("Hooli".into(), t(0, 9));
        let fb = generate_feedback(&plan(p, vec![]));
        assert!(fb.recommendations.iter().any(|r| r.starts_with("Acme problems are lagging")));
        assert!(!fb.recommendations.iter().any(|r| r.starts_with("Hooli")));
        assert!(fb.recommendations.iter().any(|r| r.contains("skipped 2 problems")));
    }

    #[test]
    fn adaptive_difficulty_order_tracks_ratios() {
        let mut p = StudyProgress::default();
        let d = |p: &StudyProgress| adaptive_recommendations(&plan(p.clone(), vec![])).suggested_difficulty;
        assert_eq!(d(&p), vec![Difficulty::Easy]);
        p.difficulty_breakdown.insert(Difficulty::Easy, t(5, 10));
        assert_eq!(d(&p), vec![Difficulty::Easy, Difficulty::Medium]);
        p.difficulty_breakdown.insert(Difficulty::Easy, t(7, 10));
        assert_eq!(d(&p), vec![Difficulty::Medium, Difficulty::Hard]);
        p.difficulty_breakdown.insert(Difficulty::Medium, t(6, 10));
        assert_eq!(d(&p), vec![Difficulty::Hard, Difficulty::Medium]);
    }

    #[test]
    fn adaptive_picks_weakest_topics_and_companies() {
        let mut p = StudyProgress::default();
        p.topic_breakdown.insert("Graph".into(), t(0, 2));
        p.topic_breakdown.insert("Array".into(), t(3, 4));
        p.topic_breakdown.insert("Tree".into(), t(1, 3));
        p.topic_breakdown.insert("Heap".into(), t(2, 4));
        p.topic_breakdown.insert("Trie".into(), t(0, 1));
        p.company_breakdown.insert("Acme".into(), t(1, 4));
        p.company_breakdown.insert("Globex".into(), t(3, 3));
        p.company_breakdown.insert("Initech".into(), t(0, 2));
        p.company_breakdown.insert("Hooli".into(), t(0, 9));

        let r = adaptive_recommendations(&plan(p, vec![]));
        assert_eq!(r.suggested_topics, ["Graph", "Tree", "Heap"]);
        assert_eq!(r.suggested_companies, ["Acme", "Globex"]);
        assert!(r.reasoning.contains("Graph, Tree, Heap"));
    }

    #[test]
    fn adaptive_falls_back_to_defaults() {
        let r = adaptive_recommendations(&plan(StudyProgress::default(), vec![]));
        assert_eq!(r.suggested_topics, ["Array", "String", "Hash Table"]);
        assert_eq!(r.suggested_companies, ["Acme", "Globex"]);
    }

    #[test]
    fn next_problems_skips_finished_work() {
        let mk = |title: &str, status: ProblemStatus| StudyProblem {
            problem: CandidateProblem { title: title.into(), ..Default::default() },
            status,
            notes: None,
            bookmarked: false,
            completed_at: None,
            quality: None,
        };
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let schedule = vec![
            StudySession::new(d1, vec![mk("a", ProblemStatus::Completed), mk("b", ProblemStatus::InProgress)]),
            StudySession::new(d2, vec![mk("c", ProblemStatus::Skipped), mk("d", ProblemStatus::NotStarted), mk("e", ProblemStatus::NotStarted)]),
        ];
        let next = next_problems(&plan(StudyProgress::default(), schedule), 2);
        let titles: Vec<&str> = next.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["b", "d"]);
        assert_eq!(next[1].session_id, "2024-01-02");
    }
}
