//! Study Plan Backend · interview-prep planner service
//!
//! - Axum HTTP + WebSocket API for generating and tracking study plans
//! - Problem catalog from TOML config or built-in seeds
//! - Static dashboard fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   PLANNER_CONFIG_PATH : path to TOML config (generation defaults + optional problem catalog)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod state;
mod protocol;
mod logic;
mod planner;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

const DEFAULT_PORT: u16 = 3000;

fn listen_addr() -> SocketAddr {
  let port = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .unwrap_or(DEFAULT_PORT);
  SocketAddr::from(([0, 0, 0, 0], port))
}

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Catalog, generation defaults and the empty plan store.
  let state = Arc::new(AppState::new());
  let app = build_router(state.clone());

  let addr = listen_addr();
  let listener = TcpListener::bind(addr).await?;
  info!(target: "studyplan_backend", %addr, catalog = state.catalog.len(), "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
