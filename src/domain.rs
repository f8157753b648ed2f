//! Domain models: candidate problems, quality annotations, and the study plan itself.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Problem difficulty as reported by the catalog. Anything unrecognized is `Unknown`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  #[serde(other)]
  Unknown,
}

impl Default for Difficulty {
  fn default() -> Self { Difficulty::Unknown }
}

impl Difficulty {
  /// Human label used in feedback text.
  pub fn label(&self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
      Difficulty::Unknown => "Unknown",
    }
  }
}

/// A problem as supplied by the external catalog. Quality fields are optional;
/// defaults are resolved once into `QualitySignals`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProblem {
  pub title: String,
  #[serde(default)] pub difficulty: Difficulty,
  #[serde(default)] pub topics: Vec<String>,
  #[serde(default)] pub company: String,
  #[serde(default)] pub link: String,
  #[serde(default)] pub frequency: Option<f64>,
  #[serde(default)] pub acceptance_rate: Option<f64>,
  #[serde(default)] pub originality_score: Option<f64>,
  #[serde(default)] pub likes: Option<u64>,
  #[serde(default)] pub dislikes: Option<u64>,
  #[serde(default)] pub total_votes: Option<u64>,
}

/// Quality inputs with catalog defaults applied.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualitySignals {
  pub originality_score: f64,
  pub likes: u64,
  pub dislikes: u64,
  pub total_votes: u64,
  pub acceptance_rate: f64,
  pub frequency: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QualityTier {
  Premium,
  High,
  Good,
  Average,
  Unknown,
}

/// Derived, immutable quality view of a candidate problem.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityAnnotation {
  pub quality_score: f64,
  pub tier: QualityTier,
  pub is_hidden_gem: bool,
  pub is_interview_classic: bool,
  pub recommendation_reason: String,
  pub signals: QualitySignals,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProblemStatus {
  NotStarted,
  InProgress,
  Completed,
  Skipped,
}

impl Default for ProblemStatus {
  fn default() -> Self { ProblemStatus::NotStarted }
}

impl ProblemStatus {
  /// Completed and skipped problems close out their slot in a session.
  pub fn is_terminal(&self) -> bool {
    matches!(self, ProblemStatus::Completed | ProblemStatus::Skipped)
  }
}

/// A problem owned by a plan: candidate snapshot + per-plan state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyProblem {
  #[serde(flatten)]
  pub problem: CandidateProblem,
  #[serde(default)] pub status: ProblemStatus,
  #[serde(default)] pub notes: Option<String>,
  #[serde(default)] pub bookmarked: bool,
  #[serde(default)] pub completed_at: Option<DateTime<Utc>>,
  /// Taken at selection time; never re-derived.
  #[serde(default)] pub quality: Option<QualityAnnotation>,
}

impl StudyProblem {
  pub fn quality_score(&self) -> f64 {
    self.quality.as_ref().map(|q| q.quality_score).unwrap_or(0.0)
  }

  pub fn acceptance_rate(&self) -> f64 {
    self.quality
      .as_ref()
      .map(|q| q.signals.acceptance_rate)
      .unwrap_or_else(|| crate::planner::quality::resolve_signals(&self.problem).acceptance_rate)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
  /// ISO date of the session; unique within a plan.
  pub id: String,
  pub date: NaiveDate,
  pub problems: Vec<StudyProblem>,
  #[serde(default)] pub completed: bool,
  #[serde(default)] pub completed_at: Option<DateTime<Utc>>,
}

impl StudySession {
  pub fn new(date: NaiveDate, problems: Vec<StudyProblem>) -> Self {
    Self { id: date.to_string(), date, problems, completed: false, completed_at: None }
  }

  pub fn all_terminal(&self) -> bool {
    !self.problems.is_empty() && self.problems.iter().all(|p| p.status.is_terminal())
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Tally {
  pub completed: usize,
  pub total: usize,
}

impl Tally {
  pub fn ratio(&self) -> f64 {
    if self.total == 0 { 0.0 } else { self.completed as f64 / self.total as f64 }
  }
}

/// Aggregate over a plan's schedule. Always recomputed wholesale.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
  pub total_problems: usize,
  pub completed_problems: usize,
  pub skipped_problems: usize,
  pub current_streak: u32,
  pub longest_streak: u32,
  pub average_problems_per_day: f64,
  pub completion_rate: f64,
  pub difficulty_breakdown: BTreeMap<Difficulty, Tally>,
  pub topic_breakdown: BTreeMap<String, Tally>,
  pub company_breakdown: BTreeMap<String, Tally>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
  Beginner,
  Intermediate,
  Advanced,
}

impl Default for SkillLevel {
  fn default() -> Self { SkillLevel::Intermediate }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LearningMode {
  #[default]
  Balanced,
  InterviewClassics,
  HiddenGems,
  Adaptive,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreference {
  #[default]
  Balanced,
  QualityFirst,
  PopularityFirst,
  Discovery,
}

/// User-supplied plan parameters. Validated before generation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanForm {
  pub name: String,
  pub target_companies: Vec<String>,
  /// Weeks.
  pub duration: u32,
  pub daily_goal: u32,
  #[serde(default)] pub skill_level: SkillLevel,
  #[serde(default)] pub focus_areas: Vec<String>,
  pub start_date: NaiveDate,
}

/// Generation knobs. Every field is optional on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
  pub balance_across_companies: bool,
  pub max_problems_per_company: usize,
  pub learning_mode: LearningMode,
  pub quality_preference: QualityPreference,
  pub min_quality_score: f64,
  pub adaptive_difficulty: bool,
  pub include_quality_metrics: bool,
}

impl Default for GenerationOptions {
  fn default() -> Self {
    Self {
      balance_across_companies: true,
      max_problems_per_company: 50,
      learning_mode: LearningMode::Balanced,
      quality_preference: QualityPreference::Balanced,
      min_quality_score: 0.0,
      adaptive_difficulty: true,
      include_quality_metrics: true,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
  pub id: String,
  pub name: String,
  pub target_companies: Vec<String>,
  pub duration: u32,
  pub daily_goal: u32,
  pub skill_level: SkillLevel,
  pub focus_areas: Vec<String>,
  pub schedule: Vec<StudySession>,
  pub progress: StudyProgress,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
