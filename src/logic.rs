//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Creating plans (form + options + optional request-supplied pool)
//!   - Status updates and bookmark toggles under the store's write lock
//!   - Feedback, adaptive recommendations and next-problem lookups
//!   - Catalog browsing with quality annotations

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::domain::{CandidateProblem, GenerationOptions, PlanForm, ProblemStatus, StudyPlan};
use crate::error::Result;
use crate::planner::{self, progress, quality, recommend};
use crate::protocol::{AnnotatedProblemOut, BookmarkOut, PlanSummaryOut, StatusOut};
use crate::state::AppState;
use crate::util::trunc_for_log;

pub const DEFAULT_NEXT_LIMIT: usize = 5;

#[instrument(level = "info", skip(state, form, options, pool), fields(name = %trunc_for_log(&form.name, 64)))]
pub async fn create_plan(
  state: &AppState,
  form: PlanForm,
  options: Option<GenerationOptions>,
  pool: Option<Vec<CandidateProblem>>,
) -> Result<StudyPlan> {
  let options = options.unwrap_or_else(|| state.defaults.clone());
  let plan = match &pool {
    Some(p) => planner::generate(&form, p, &options, Utc::now())?,
    None => planner::generate(&form, &state.catalog, &options, Utc::now())?,
  };

  info!(target: "planner", id = %plan.id, sessions = plan.schedule.len(), request_pool = pool.is_some(), "Plan created");
  state.insert_plan(plan.clone()).await;
  Ok(plan)
}

#[instrument(level = "info", skip_all, fields(%plan_id, %session_id, %title, ?status))]
pub async fn update_status(
  state: &AppState,
  plan_id: &str,
  session_id: &str,
  title: &str,
  status: ProblemStatus,
  notes: Option<String>,
) -> Result<StatusOut> {
  let (changed, plan) = state
    .with_plan_mut(plan_id, |plan| progress::update_status(plan, session_id, title, status, notes, Utc::now()))
    .await?;
  if !changed {
    warn!(target: "planner", %plan_id, %session_id, %title, "Status update matched no problem");
  }
  Ok(StatusOut { changed, plan })
}

#[instrument(level = "info", skip_all, fields(%plan_id, %session_id, %title))]
pub async fn toggle_bookmark(state: &AppState, plan_id: &str, session_id: &str, title: &str) -> Result<BookmarkOut> {
  let (bookmarked, _) = state
    .with_plan_mut(plan_id, |plan| progress::toggle_bookmark(plan, session_id, title, Utc::now()))
    .await?;
  Ok(BookmarkOut { changed: bookmarked.is_some(), bookmarked: bookmarked.unwrap_or(false) })
}

pub async fn feedback(state: &AppState, plan_id: &str) -> Result<recommend::Feedback> {
  let plan = state.get_plan(plan_id).await?;
  Ok(recommend::generate_feedback(&plan))
}

pub async fn adaptive(state: &AppState, plan_id: &str) -> Result<recommend::AdaptiveRecommendations> {
  let plan = state.get_plan(plan_id).await?;
  Ok(recommend::adaptive_recommendations(&plan))
}

pub async fn next_problems(state: &AppState, plan_id: &str, limit: Option<usize>) -> Result<Vec<recommend::NextProblem>> {
  let plan = state.get_plan(plan_id).await?;
  Ok(recommend::next_problems(&plan, limit.unwrap_or(DEFAULT_NEXT_LIMIT)))
}

pub async fn list_plans(state: &AppState) -> Vec<PlanSummaryOut> {
  state.list_plans().await.iter().map(PlanSummaryOut::from).collect()
}

/// Catalog entries with their quality annotation, in catalog order.
pub fn annotated_catalog(state: &AppState) -> Vec<AnnotatedProblemOut> {
  let mode = state.defaults.learning_mode;
  state
    .catalog
    .iter()
    .map(|p| AnnotatedProblemOut { problem: p.clone(), quality: quality::annotate(p, mode) })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::SkillLevel;
  use crate::error::PlanError;
  use chrono::NaiveDate;

  fn form() -> PlanForm {
    PlanForm {
      name: "Logic".into(),
      target_companies: vec!["Google".into(), "Meta".into()],
      duration: 1,
      daily_goal: 1,
      skill_level: SkillLevel::Intermediate,
      focus_areas: vec![],
      start_date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
    }
  }

  #[tokio::test]
  async fn created_plan_is_stored() {
    let state = AppState::from_config(None);
    let plan = create_plan(&state, form(), None, None).await.unwrap();
    assert_eq!(state.get_plan(&plan.id).await.unwrap(), plan);
    assert!(plan.progress.total_problems > 0);
    assert!(plan.schedule.iter().flat_map(|s| &s.problems).all(|p| p.problem.company == "Google" || p.problem.company == "Meta"));
  }

  #[tokio::test]
  async fn request_pool_overrides_catalog() {
    let state = AppState::from_config(None);
    let pool = vec![CandidateProblem { title: "Custom".into(), company: "Google".into(), ..Default::default() }];
    let plan = create_plan(&state, form(), None, Some(pool)).await.unwrap();
    assert_eq!(plan.progress.total_problems, 1);
    assert_eq!(plan.schedule[0].problems[0].problem.title, "Custom");
  }

  #[tokio::test]
  async fn invalid_form_is_not_stored() {
    let state = AppState::from_config(None);
    let mut bad = form();
    bad.daily_goal = 0;
    assert!(matches!(create_plan(&state, bad, None, None).await, Err(PlanError::InvalidConfig(_))));
    assert!(state.list_plans().await.is_empty());
  }

  #[tokio::test]
  async fn status_update_flows_into_feedback() {
    let state = AppState::from_config(None);
    let plan = create_plan(&state, form(), None, None).await.unwrap();
    let session = &plan.schedule[0];
    let title = session.problems[0].problem.title.clone();

    let out = update_status(&state, &plan.id, &session.id, &title, ProblemStatus::Completed, None).await.unwrap();
    assert!(out.changed);
    assert_eq!(out.plan.progress.completed_problems, 1);
    assert_eq!(state.get_plan(&plan.id).await.unwrap(), out.plan);

    let miss = update_status(&state, &plan.id, &session.id, "nope", ProblemStatus::Completed, None).await.unwrap();
    assert!(!miss.changed);
    assert_eq!(miss.plan.progress.completed_problems, 1);

    let fb = feedback(&state, &plan.id).await.unwrap();
    assert!(!fb.feedback.is_empty());
    let next = next_problems(&state, &plan.id, Some(100)).await.unwrap();
    assert_eq!(next.len(), plan.progress.total_problems - 1);
  }

  #[tokio::test]
  async fn unknown_plan_is_not_found() {
    let state = AppState::from_config(None);
    assert!(matches!(feedback(&state, "missing").await, Err(PlanError::NotFound(_))));
    assert!(matches!(adaptive(&state, "missing").await, Err(PlanError::NotFound(_))));
    assert!(matches!(toggle_bookmark(&state, "missing", "s", "t").await, Err(PlanError::NotFound(_))));
  }

  #[test]
  fn catalog_is_annotated() {
    let state = AppState::from_config(None);
    let out = annotated_catalog(&state);
    assert_eq!(out.len(), state.catalog.len());
    assert!(out.iter().all(|a| (0.0..=1.0).contains(&a.quality.quality_score)));
  }
}
