//! Loading planner configuration (generation defaults + optional problem catalog) from TOML.
//!
//! Expected schema:
//!
//! ```toml
//! [generation]
//! maxProblemsPerCompany = 20
//! learningMode = "hidden_gems"
//!
//! [[problems]]
//! title = "Two Sum"
//! difficulty = "EASY"
//! company = "Google"
//! topics = ["Array", "Hash Table"]
//! likes = 52000
//! ```

use serde::Deserialize;
use tracing::{info, error};

use crate::domain::{CandidateProblem, GenerationOptions};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PlannerConfig {
  #[serde(default)]
  pub generation: GenerationOptions,
  #[serde(default)]
  pub problems: Vec<CandidateProblem>,
}

pub fn parse_planner_config(s: &str) -> Result<PlannerConfig, toml::de::Error> {
  toml::from_str::<PlannerConfig>(s)
}

/// Attempt to load `PlannerConfig` from PLANNER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_planner_config_from_env() -> Option<PlannerConfig> {
  let path = std::env::var("PLANNER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_planner_config(&s) {
      Ok(cfg) => {
        info!(target: "studyplan_backend", %path, problems = cfg.problems.len(), "Loaded planner config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "studyplan_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "studyplan_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
