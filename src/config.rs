//! Process configuration: immutable `AppConfig` read once from the
//! environment, plus the prompt templates used for model calls.
//!
//! Prompts have sensible defaults and can be overridden from a TOML file via
//! PROMPTS_CONFIG_PATH. See `Prompts` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

/// Immutable process-wide configuration. Built once in `main`, passed around
/// read-only inside `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
  pub port: u16,
  pub database_url: String,
  /// Directory holding the uploaded .docx reference documents.
  pub document_dir: String,
  pub prompts: Prompts,
}

impl AppConfig {
  pub fn from_env() -> Self {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(8000);
    let database_url = std::env::var("DATABASE_URL")
      .unwrap_or_else(|_| "sqlite:mailexam.db?mode=rwc".into());
    let document_dir = std::env::var("DOCUMENT_DIR")
      .unwrap_or_else(|_| "./downloads/email_bot/Email Writing".into());
    let prompts = load_prompts_from_env().unwrap_or_default();

    Self { port, database_url, document_dir, prompts }
  }
}

/// Prompt templates sent to the model. `{key}` placeholders are filled via
/// `util::fill_template`. Override them in TOML to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub question_template: String,
  pub evaluation_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      question_template: "\
You are an English exam question creator.

Scenario: {scenario}
CEFR Level: {cefr_level}

Existing Questions:
{existing_questions}

Content for reference:
{content}

Task:
Generate one unique scenario-based email-writing question based on the given content and CEFR level.
The question must NOT duplicate any from Existing Questions or Recent Questions.
Keep it concise and engaging.
".into(),
      evaluation_template: "\
You are an English writing evaluator.
Scenario: {scenario}
Scenario Question: {scenario_question}
CEFR Level: {cefr_level}
Email content to evaluate:
{email_content}

Evaluate the email based on:
- Greeting
- Body clarity and relevance
- Sign-off
- Grammar and vocabulary

Give a rating from 1 to 5 and detailed feedback.
".into(),
    }
  }
}

/// Attempt to load `Prompts` from PROMPTS_CONFIG_PATH. On any parsing/IO
/// error, returns None and the defaults stay in effect.
pub fn load_prompts_from_env() -> Option<Prompts> {
  let path = std::env::var("PROMPTS_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<Prompts>(&s) {
      Ok(p) => {
        info!(target: "mailexam_backend", %path, "Loaded prompt config (TOML)");
        Some(p)
      }
      Err(e) => {
        error!(target: "mailexam_backend", %path, error = %e, "Failed to parse TOML prompt config");
        None
      }
    },
    Err(e) => {
      error!(target: "mailexam_backend", %path, error = %e, "Failed to read TOML prompt config file");
      None
    }
  }
}
