//! Mailexam · English-Writing Exam Backend
//!
//! - Axum HTTP JSON API (question generation + email evaluation)
//! - Gemini integration for question/feedback text (via environment variables)
//! - SQLite audit log of every request/response pair
//! - Static frontend from ./static
//!
//! Important env variables:
//!   PORT              : u16 (default 8000)
//!   GEMINI_API_KEY    : required for the model endpoints to work
//!   GEMINI_BASE_URL   : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL      : default "gemini-1.5-pro-002"
//!   DATABASE_URL      : default "sqlite:mailexam.db?mode=rwc"
//!   DOCUMENT_DIR      : default "./downloads/email_bot/Email Writing"
//!   PROMPTS_CONFIG_PATH : path to TOML with prompt overrides
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod config;
mod error;
mod docx;
mod segment;
mod gemini;
mod questions;
mod evaluate;
mod db;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Immutable process configuration, read once from the environment.
  let config = AppConfig::from_env();

  // Shared application state (config, prompts, Gemini client, SQLite pool).
  // Creates the interactions table if it does not exist yet.
  let state = Arc::new(AppState::new(config).await?);

  // HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "mailexam_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
