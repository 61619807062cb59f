//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! The audit log's `request_json` holds the raw JSON payload as received
//! (handlers deserialize these structs from it), so unknown client fields
//! survive into the log. Empty strings count as missing; handlers reject
//! them with 400 before any model call or persistence.

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsIn {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub cefr_level: String,
    #[serde(default)]
    pub existing_questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsOut {
    pub new_questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateEmailIn {
    #[serde(default)]
    pub email_content: String,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub scenario_question: String,
    #[serde(default)]
    pub cefr_level: String,
}

/// Three independent structural checks computed locally from the email text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatEvaluation {
    pub greeting: bool,
    pub body: bool,
    pub sign_off: bool,
}

#[derive(Debug, Serialize)]
pub struct EvaluationOut {
    pub feedback: String,
    pub rating: u8,
    pub format_evaluation: FormatEvaluation,
}
