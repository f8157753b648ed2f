//! Application state: problem catalog, generation defaults, and the in-memory plan store.
//!
//! This module owns:
//!   - the candidate catalog (from TOML or built-in seeds)
//!   - default generation options (from TOML or built-in defaults)
//!   - plans by id
//!
//! Every plan mutation runs under the store's write lock, so two updates to the
//! same plan can never interleave their read-modify-write cycles.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{load_planner_config_from_env, PlannerConfig};
use crate::domain::{CandidateProblem, GenerationOptions, StudyPlan};
use crate::error::{PlanError, Result};
use crate::seeds::seed_problems;

#[derive(Clone)]
pub struct AppState {
    pub plans: Arc<RwLock<HashMap<String, StudyPlan>>>,
    pub catalog: Arc<Vec<CandidateProblem>>,
    pub defaults: GenerationOptions,
}

impl AppState {
    /// Build state from env: load config, fall back to seeds for the catalog.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_config(load_planner_config_from_env())
    }

    pub fn from_config(cfg: Option<PlannerConfig>) -> Self {
        let cfg = cfg.unwrap_or_default();
        let (catalog, source) = if cfg.problems.is_empty() {
            (seed_problems(), "seed")
        } else {
            (cfg.problems, "config")
        };

        // Inventory summary by company.
        let mut by_company: HashMap<&str, usize> = HashMap::new();
        for p in &catalog {
            *by_company.entry(p.company.as_str()).or_default() += 1;
        }
        for (company, count) in &by_company {
            info!(target: "studyplan_backend", %company, count, source, "Startup catalog inventory");
        }

        let defaults = cfg.generation;
        info!(target: "studyplan_backend", ?defaults, "Generation defaults");

        Self {
            plans: Arc::new(RwLock::new(HashMap::new())),
            catalog: Arc::new(catalog),
            defaults,
        }
    }

    #[instrument(level = "debug", skip(self, plan), fields(id = %plan.id))]
    pub async fn insert_plan(&self, plan: StudyPlan) {
        self.plans.write().await.insert(plan.id.clone(), plan);
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_plan(&self, id: &str) -> Result<StudyPlan> {
        self.plans
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PlanError::NotFound(id.to_string()))
    }

    /// All plans, newest first.
    pub async fn list_plans(&self) -> Vec<StudyPlan> {
        let mut plans: Vec<StudyPlan> = self.plans.read().await.values().cloned().collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        plans
    }

    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn delete_plan(&self, id: &str) -> Result<()> {
        self.plans
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PlanError::NotFound(id.to_string()))
    }

    /// Run `f` on the stored plan while holding the write lock; returns its
    /// output together with a copy of the plan as left by `f`.
    pub async fn with_plan_mut<T>(&self, id: &str, f: impl FnOnce(&mut StudyPlan) -> T) -> Result<(T, StudyPlan)> {
        let mut plans = self.plans.write().await;
        let plan = plans.get_mut(id).ok_or_else(|| PlanError::NotFound(id.to_string()))?;
        let out = f(plan);
        Ok((out, plan.clone()))
    }
}
