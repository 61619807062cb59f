//! Application state shared across handlers: immutable config, the optional
//! Gemini client, and the SQLite pool.

use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::db;
use crate::error::ApiError;
use crate::gemini::Gemini;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub gemini: Option<Gemini>,
    pub pool: SqlitePool,
}

impl AppState {
    /// Build state from config: open the pool, ensure the schema, and init
    /// the Gemini client if an API key is present.
    #[instrument(level = "info", skip_all)]
    pub async fn new(config: AppConfig) -> Result<Self, sqlx::Error> {
        let pool = db::connect(&config.database_url).await?;
        db::init_schema(&pool).await?;

        let gemini = Gemini::from_env();
        if let Some(g) = &gemini {
            info!(target: "mailexam_backend", base_url = %g.base_url, model = %g.model, "Gemini enabled.");
        } else {
            warn!(target: "mailexam_backend", "Gemini disabled (no GEMINI_API_KEY). Model endpoints will fail.");
        }

        Ok(Self { config, gemini, pool })
    }

    /// The Gemini client, or a model error when it was never configured.
    pub fn gemini(&self) -> Result<&Gemini, ApiError> {
        self.gemini
            .as_ref()
            .ok_or_else(|| ApiError::Model("Gemini is not configured (GEMINI_API_KEY not set)".into()))
    }
}
