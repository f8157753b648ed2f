//! Ranking of annotated candidates by skill level, learning mode and quality preference.

use std::cmp::Ordering;

use crate::domain::{
    CandidateProblem, Difficulty, LearningMode, QualityAnnotation, QualityPreference, SkillLevel,
};

/// A candidate paired with its annotation, as it flows from scoring into selection.
#[derive(Clone, Debug)]
pub struct Annotated {
    pub problem: CandidateProblem,
    pub quality: QualityAnnotation,
}

/// Preferred difficulty order used for ranking.
pub fn difficulty_preference(level: SkillLevel) -> [Difficulty; 3] {
    match level {
        SkillLevel::Beginner => [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
        SkillLevel::Intermediate => [Difficulty::Medium, Difficulty::Easy, Difficulty::Hard],
        SkillLevel::Advanced => [Difficulty::Hard, Difficulty::Medium, Difficulty::Easy],
    }
}

/// Position of `d` in `order`; difficulties outside the order rank last.
pub fn rank_in(order: &[Difficulty], d: Difficulty) -> usize {
    order.iter().position(|x| *x == d).unwrap_or(order.len())
}

fn mode_bonus(q: &QualityAnnotation, mode: LearningMode) -> f64 {
    let s = &q.signals;
    match mode {
        LearningMode::InterviewClassics => {
            let classic = if q.is_interview_classic { 0.5 } else { 0.0 };
            classic + (s.likes as f64 / 5_000.0).min(0.3)
        }
        LearningMode::HiddenGems => {
            let gem = if q.is_hidden_gem { 0.5 } else { 0.0 };
            gem + s.originality_score * 0.3
        }
        LearningMode::Adaptive => {
            let classic = if q.is_interview_classic { 0.2 } else { 0.0 };
            let gem = if q.is_hidden_gem { 0.3 } else { 0.0 };
            classic + gem
        }
        LearningMode::Balanced => {
            let classic = if q.is_interview_classic { 0.1 } else { 0.0 };
            let gem = if q.is_hidden_gem { 0.1 } else { 0.0 };
            classic + gem
        }
    }
}

fn preference_bonus(q: &QualityAnnotation, pref: QualityPreference) -> f64 {
    let s = &q.signals;
    match pref {
        QualityPreference::QualityFirst => s.originality_score * 0.4,
        QualityPreference::PopularityFirst => (s.likes as f64 / 10_000.0).min(0.4),
        QualityPreference::Discovery => if q.is_hidden_gem { 0.4 } else { 0.0 },
        QualityPreference::Balanced => 0.0,
    }
}

/// Weighted quality used by the second ranking layer.
pub fn quality_weight(q: &QualityAnnotation, mode: LearningMode, pref: QualityPreference) -> f64 {
    q.quality_score + mode_bonus(q, mode) + preference_bonus(q, pref)
}

#[derive(Clone, Copy, Debug)]
pub struct Prioritizer {
    pub skill_level: SkillLevel,
    pub learning_mode: LearningMode,
    pub quality_preference: QualityPreference,
}

impl Prioritizer {
    /// Layered comparator; each layer decides only when the previous ones tie.
    pub fn compare(&self, a: &Annotated, b: &Annotated) -> Ordering {
        let order = difficulty_preference(self.skill_level);
        let by_difficulty = rank_in(&order, a.problem.difficulty).cmp(&rank_in(&order, b.problem.difficulty));
        if by_difficulty != Ordering::Equal {
            return by_difficulty;
        }

        let wa = quality_weight(&a.quality, self.learning_mode, self.quality_preference);
        let wb = quality_weight(&b.quality, self.learning_mode, self.quality_preference);
        let by_quality = wb.total_cmp(&wa);
        if by_quality != Ordering::Equal {
            return by_quality;
        }

        let by_frequency = b.quality.signals.frequency.total_cmp(&a.quality.signals.frequency);
        if by_frequency != Ordering::Equal {
            return by_frequency;
        }

        let (ra, rb) = (a.quality.signals.acceptance_rate, b.quality.signals.acceptance_rate);
        match self.skill_level {
            SkillLevel::Beginner => rb.total_cmp(&ra),
            _ => ra.total_cmp(&rb),
        }
    }

    /// Stable sort of the candidate list into ranking order.
    pub fn rank(&self, mut items: Vec<Annotated>) -> Vec<Annotated> {
        items.sort_by(|a, b| self.compare(a, b));
        items
    }
}
