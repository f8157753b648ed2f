//! Quality scoring: candidate problem → score, tier, gem/classic flags, reason.

use crate::domain::{CandidateProblem, LearningMode, QualityAnnotation, QualitySignals, QualityTier};

const DEFAULT_ORIGINALITY: f64 = 0.5;
const DEFAULT_ACCEPTANCE: f64 = 0.5;
const DEFAULT_TOTAL_VOTES: u64 = 1;

/// Resolve optional catalog fields into concrete signals.
///
/// Originality and acceptance are clamped into [0,1]. Acceptance rates above 1
/// are taken to be percentages.
pub fn resolve_signals(p: &CandidateProblem) -> QualitySignals {
    let acceptance = match p.acceptance_rate {
        Some(a) if a > 1.0 => a / 100.0,
        Some(a) => a,
        None => DEFAULT_ACCEPTANCE,
    };
    QualitySignals {
        originality_score: unit(p.originality_score.unwrap_or(DEFAULT_ORIGINALITY)),
        likes: p.likes.unwrap_or(0),
        dislikes: p.dislikes.unwrap_or(0),
        total_votes: p.total_votes.unwrap_or(DEFAULT_TOTAL_VOTES),
        acceptance_rate: unit(acceptance),
        frequency: p.frequency.unwrap_or(0.0),
    }
}

fn unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

pub fn score(s: &QualitySignals) -> f64 {
    let popularity = (s.likes as f64 / 10_000.0).min(1.0);
    let exposure = if s.total_votes > 100 { 0.1 } else { 0.0 };
    let raw = s.originality_score * 0.4 + popularity * 0.3 + s.acceptance_rate * 0.2 + exposure;
    raw.clamp(0.0, 1.0)
}

pub fn tier(score: f64) -> QualityTier {
    if score >= 0.8 {
        QualityTier::Premium
    } else if score >= 0.6 {
        QualityTier::High
    } else if score >= 0.4 {
        QualityTier::Good
    } else if score >= 0.2 {
        QualityTier::Average
    } else {
        QualityTier::Unknown
    }
}

pub fn is_interview_classic(s: &QualitySignals) -> bool {
    s.likes >= 1000 && s.originality_score >= 0.75 && s.total_votes >= 2000
}

pub fn is_hidden_gem(s: &QualitySignals) -> bool {
    s.originality_score >= 0.85 && s.total_votes <= 2000 && s.likes >= 50
}

fn reason(score: f64, classic: bool, gem: bool, mode: LearningMode) -> String {
    let text = if classic && mode == LearningMode::InterviewClassics {
        "Interview classic: widely liked and asked again and again."
    } else if gem && mode == LearningMode::HiddenGems {
        "Hidden gem: a highly original problem few people have tried yet."
    } else if score >= 0.8 {
        "Premium quality problem with excellent community feedback."
    } else if score >= 0.6 {
        "High quality problem that the community rates well."
    } else {
        "Chosen for balanced learning across topics and difficulty."
    };
    text.to_string()
}

/// Full annotation for one candidate. Deterministic in (problem, mode).
pub fn annotate(p: &CandidateProblem, mode: LearningMode) -> QualityAnnotation {
    let signals = resolve_signals(p);
    let quality_score = score(&signals);
    let is_interview_classic = is_interview_classic(&signals);
    let is_hidden_gem = is_hidden_gem(&signals);
    QualityAnnotation {
        quality_score,
        tier: tier(quality_score),
        is_hidden_gem,
        is_interview_classic,
        recommendation_reason: reason(quality_score, is_interview_classic, is_hidden_gem, mode),
        signals,
    }
}
