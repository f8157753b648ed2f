//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::PlanError;
use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "studyplan_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "studyplan_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "studyplan_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "studyplan_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "studyplan_backend", "WebSocket disconnected");
}

fn reply<T>(res: Result<T, PlanError>, ok: impl FnOnce(T) -> ServerWsMessage) -> ServerWsMessage {
  match res {
    Ok(v) => ok(v),
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::CreatePlan(body) => {
      let res = logic::create_plan(state, body.form, body.options, body.problems).await;
      reply(res, |plan| ServerWsMessage::Plan { plan: Box::new(plan) })
    }

    ClientWsMessage::GetPlan { plan_id } => {
      reply(state.get_plan(&plan_id).await, |plan| ServerWsMessage::Plan { plan: Box::new(plan) })
    }

    ClientWsMessage::UpdateStatus { plan_id, session_id, problem_title, status, notes } => {
      let res = logic::update_status(state, &plan_id, &session_id, &problem_title, status, notes).await;
      if let Ok(out) = &res {
        info!(target: "planner", id = %plan_id, changed = out.changed, "WS update_status applied");
      }
      reply(res, ServerWsMessage::StatusResult)
    }

    ClientWsMessage::ToggleBookmark { plan_id, session_id, problem_title } => {
      reply(logic::toggle_bookmark(state, &plan_id, &session_id, &problem_title).await, ServerWsMessage::BookmarkResult)
    }

    ClientWsMessage::Feedback { plan_id } => {
      reply(logic::feedback(state, &plan_id).await, ServerWsMessage::Feedback)
    }

    ClientWsMessage::Recommendations { plan_id } => {
      reply(logic::adaptive(state, &plan_id).await, ServerWsMessage::Recommendations)
    }

    ClientWsMessage::NextProblems { plan_id, limit } => {
      reply(logic::next_problems(state, &plan_id, limit).await, |problems| ServerWsMessage::NextProblems { problems })
    }
  }
}
