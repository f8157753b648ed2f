//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and dashboard independently.

use serde::{Deserialize, Serialize};

use crate::domain::{CandidateProblem, GenerationOptions, PlanForm, ProblemStatus, QualityAnnotation, StudyPlan};
use crate::planner::recommend::{AdaptiveRecommendations, Feedback, NextProblem};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    CreatePlan(CreatePlanIn),
    GetPlan {
        #[serde(rename = "planId")]
        plan_id: String,
    },
    UpdateStatus {
        #[serde(rename = "planId")]
        plan_id: String,
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "problemTitle")]
        problem_title: String,
        status: ProblemStatus,
        #[serde(default)]
        notes: Option<String>,
    },
    ToggleBookmark {
        #[serde(rename = "planId")]
        plan_id: String,
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "problemTitle")]
        problem_title: String,
    },
    Feedback {
        #[serde(rename = "planId")]
        plan_id: String,
    },
    Recommendations {
        #[serde(rename = "planId")]
        plan_id: String,
    },
    NextProblems {
        #[serde(rename = "planId")]
        plan_id: String,
        #[serde(default)]
        limit: Option<usize>,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Plan {
        plan: Box<StudyPlan>,
    },
    StatusResult(StatusOut),
    BookmarkResult(BookmarkOut),
    Feedback(Feedback),
    Recommendations(AdaptiveRecommendations),
    NextProblems {
        problems: Vec<NextProblem>,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

/// Plan creation: the form fields at top level, plus optional options and pool.
#[derive(Debug, Deserialize)]
pub struct CreatePlanIn {
    #[serde(flatten)]
    pub form: PlanForm,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
    /// Candidate pool supplied by the caller; the configured catalog is used when absent.
    #[serde(default)]
    pub problems: Option<Vec<CandidateProblem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusIn {
    pub session_id: String,
    pub problem_title: String,
    pub status: ProblemStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusOut {
    /// False when no problem matched; the plan is returned unchanged.
    pub changed: bool,
    pub plan: StudyPlan,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkIn {
    pub session_id: String,
    pub problem_title: String,
}

#[derive(Debug, Serialize)]
pub struct BookmarkOut {
    pub changed: bool,
    pub bookmarked: bool,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummaryOut {
    pub id: String,
    pub name: String,
    pub duration: u32,
    pub daily_goal: u32,
    pub total_problems: usize,
    pub completion_rate: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&StudyPlan> for PlanSummaryOut {
    fn from(p: &StudyPlan) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            duration: p.duration,
            daily_goal: p.daily_goal,
            total_problems: p.progress.total_problems,
            completion_rate: p.progress.completion_rate,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnotatedProblemOut {
    #[serde(flatten)]
    pub problem: CandidateProblem,
    pub quality: QualityAnnotation,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
