//! HTTP endpoint handlers. These are thin wrappers that validate the request,
//! forward to core logic, and persist the audit row before responding.
//! Each handler is instrumented; logs include parameters and basic result info.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::Value;
use tracing::{info, instrument};

use crate::db;
use crate::docx;
use crate::error::ApiError;
use crate::evaluate;
use crate::protocol::*;
use crate::questions;
use crate::segment;
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

/// Sorted .docx filenames from the configured document directory.
#[instrument(level = "info", skip(state))]
pub async fn http_list_files(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
  let dir = &state.config.document_dir;
  let entries = std::fs::read_dir(dir)
    .map_err(|e| ApiError::upstream(format!("failed to list {}: {}", dir, e)))?;

  let mut files: Vec<String> = entries
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.file_name().to_string_lossy().into_owned())
    .filter(|name| name.to_lowercase().ends_with(".docx"))
    .collect();
  files.sort();

  info!(target: "mailexam_backend", count = files.len(), "Listed documents");
  Ok(Json(files))
}

#[instrument(level = "info", skip_all)]
pub async fn http_generate_questions(
  State(state): State<Arc<AppState>>,
  Json(raw): Json<Value>,
) -> Result<Json<GenerateQuestionsOut>, ApiError> {
  // Keep the raw payload around: it is what gets persisted as request_json,
  // unknown fields included.
  let body: GenerateQuestionsIn = serde_json::from_value(raw.clone())
    .map_err(|e| ApiError::validation(format!("invalid request body: {}", e)))?;
  if body.file_path.is_empty() || body.scenario.is_empty() || body.cefr_level.is_empty() {
    return Err(ApiError::validation("file_path, scenario, cefr_level are required"));
  }

  let abs_path = Path::new(&state.config.document_dir).join(&body.file_path);
  if !abs_path.exists() {
    return Err(ApiError::not_found(format!("File not found: {}", abs_path.display())));
  }

  let full_content = docx::extract_text(&abs_path).map_err(ApiError::upstream)?;
  let examples = segment::split_into_examples(&full_content);
  if examples.is_empty() {
    return Err(ApiError::validation("No examples found in file"));
  }

  let gemini = state.gemini()?;
  // The recent-question window is scoped to this request's loop: concurrent
  // requests do not deduplicate against each other.
  let mut recent: Vec<String> = Vec::new();
  let mut new_questions: Vec<String> = Vec::new();
  for chunk in &examples {
    let accepted = questions::generate(
      gemini,
      &state.config.prompts,
      chunk,
      &body.scenario,
      &body.cefr_level,
      &body.existing_questions,
      &mut recent,
    )
    .await
    .map_err(ApiError::Model)?;
    if let Some(q) = accepted {
      new_questions.push(q);
    }
  }

  let resp = GenerateQuestionsOut { new_questions };
  let request_json = serde_json::to_string(&raw)
    .map_err(|e| ApiError::upstream(format!("failed to serialize request: {}", e)))?;
  let response_json = serde_json::to_string(&resp)
    .map_err(|e| ApiError::upstream(format!("failed to serialize response: {}", e)))?;
  db::record_interaction(
    &state.pool,
    "questions",
    &body.scenario,
    &body.cefr_level,
    &request_json,
    &response_json,
  )
  .await?;

  info!(
    target: "audit",
    chunks = examples.len(),
    accepted = resp.new_questions.len(),
    scenario = %trunc_for_log(&body.scenario, 80),
    "Question generation recorded"
  );
  Ok(Json(resp))
}

#[instrument(level = "info", skip_all)]
pub async fn http_evaluate_email(
  State(state): State<Arc<AppState>>,
  Json(raw): Json<Value>,
) -> Result<Json<EvaluationOut>, ApiError> {
  let body: EvaluateEmailIn = serde_json::from_value(raw.clone())
    .map_err(|e| ApiError::validation(format!("invalid request body: {}", e)))?;
  if body.email_content.is_empty()
    || body.scenario.is_empty()
    || body.scenario_question.is_empty()
    || body.cefr_level.is_empty()
  {
    return Err(ApiError::validation(
      "email_content, scenario, scenario_question, cefr_level are required",
    ));
  }

  let gemini = state.gemini()?;
  let resp = evaluate::evaluate(
    gemini,
    &state.config.prompts,
    &body.email_content,
    &body.scenario,
    &body.scenario_question,
    &body.cefr_level,
  )
  .await
  .map_err(ApiError::Model)?;

  let request_json = serde_json::to_string(&raw)
    .map_err(|e| ApiError::upstream(format!("failed to serialize request: {}", e)))?;
  let response_json = serde_json::to_string(&resp)
    .map_err(|e| ApiError::upstream(format!("failed to serialize response: {}", e)))?;
  db::record_interaction(
    &state.pool,
    "email",
    &body.scenario,
    &body.cefr_level,
    &request_json,
    &response_json,
  )
  .await?;

  info!(
    target: "audit",
    rating = resp.rating,
    scenario = %trunc_for_log(&body.scenario, 80),
    "Email evaluation recorded"
  );
  Ok(Json(resp))
}

/// Most recent audit rows, newest first, capped at 20.
#[instrument(level = "info", skip(state))]
pub async fn http_logs(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<db::Interaction>>, ApiError> {
  let rows = db::recent_interactions(&state.pool, db::RECENT_LIMIT).await?;
  Ok(Json(rows))
}
