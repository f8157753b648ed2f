//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::error::PlanError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

impl IntoResponse for PlanError {
  fn into_response(self) -> Response {
    let status = match &self {
      PlanError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
      PlanError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    warn!(target: "studyplan_backend", %status, error = %self, "Request rejected");
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

type ApiResult<T> = Result<Json<T>, PlanError>;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_problems(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let problems = logic::annotated_catalog(&state);
  info!(target: "planner", count = problems.len(), "HTTP catalog served");
  Json(problems)
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_plans(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(logic::list_plans(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(companies = body.form.target_companies.len(), request_pool = body.problems.is_some()))]
pub async fn http_create_plan(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CreatePlanIn>,
) -> Result<(StatusCode, Json<crate::domain::StudyPlan>), PlanError> {
  let plan = logic::create_plan(&state, body.form, body.options, body.problems).await?;
  Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn http_get_plan(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> ApiResult<crate::domain::StudyPlan> {
  Ok(Json(state.get_plan(&id).await?))
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn http_delete_plan(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, PlanError> {
  state.delete_plan(&id).await?;
  info!(target: "planner", %id, "Plan deleted");
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip_all, fields(%id, %body.session_id, status = ?body.status))]
pub async fn http_update_status(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<StatusIn>,
) -> ApiResult<StatusOut> {
  let out = logic::update_status(&state, &id, &body.session_id, &body.problem_title, body.status, body.notes).await?;
  info!(target: "planner", %id, changed = out.changed, completed = out.plan.progress.completed_problems, "HTTP status updated");
  Ok(Json(out))
}

#[instrument(level = "info", skip_all, fields(%id, %body.session_id))]
pub async fn http_toggle_bookmark(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<BookmarkIn>,
) -> ApiResult<BookmarkOut> {
  Ok(Json(logic::toggle_bookmark(&state, &id, &body.session_id, &body.problem_title).await?))
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn http_get_feedback(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> ApiResult<crate::planner::recommend::Feedback> {
  Ok(Json(logic::feedback(&state, &id).await?))
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn http_get_recommendations(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> ApiResult<crate::planner::recommend::AdaptiveRecommendations> {
  Ok(Json(logic::adaptive(&state, &id).await?))
}

#[instrument(level = "info", skip_all, fields(%id, limit = ?q.limit))]
pub async fn http_get_next(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Query(q): Query<NextQuery>,
) -> ApiResult<Vec<crate::planner::recommend::NextProblem>> {
  Ok(Json(logic::next_problems(&state, &id, q.limit).await?))
}
