//! Question generation: prompt assembly, the model call, and the
//! per-request de-duplication window.

use tracing::{info, instrument};

use crate::config::Prompts;
use crate::gemini::Gemini;
use crate::util::fill_template;

/// Max questions remembered per request for de-duplication. Oldest entries
/// are evicted first once the window is full.
pub const RECENT_WINDOW: usize = 5;

/// Accept a model completion as a new question only if it is non-empty and
/// not already present in `existing` or `recent`. On acceptance the question
/// joins the recent window (FIFO, bounded to `RECENT_WINDOW`).
pub fn accept_question(
  candidate: &str,
  existing: &[String],
  recent: &mut Vec<String>,
) -> Option<String> {
  let candidate = candidate.trim();
  if candidate.is_empty() {
    return None;
  }
  if existing.iter().any(|q| q == candidate) || recent.iter().any(|q| q == candidate) {
    return None;
  }
  recent.push(candidate.to_string());
  if recent.len() > RECENT_WINDOW {
    recent.remove(0);
  }
  Some(candidate.to_string())
}

fn render_question_list(questions: &[String]) -> String {
  if questions.is_empty() {
    return "(none)".into();
  }
  questions.iter().map(|q| format!("- {}", q)).collect::<Vec<_>>().join("\n")
}

/// Ask the model for one new question grounded in `chunk`. Returns Ok(None)
/// when the completion is empty or a duplicate; the caller does not retry.
#[instrument(level = "info", skip_all, fields(chunk_len = chunk.len(), %cefr_level, existing = existing.len(), recent = recent.len()))]
pub async fn generate(
  gemini: &Gemini,
  prompts: &Prompts,
  chunk: &str,
  scenario: &str,
  cefr_level: &str,
  existing: &[String],
  recent: &mut Vec<String>,
) -> Result<Option<String>, String> {
  let prompt = fill_template(
    &prompts.question_template,
    &[
      ("scenario", scenario),
      ("cefr_level", cefr_level),
      ("existing_questions", &render_question_list(existing)),
      ("content", chunk),
    ],
  );

  let completion = gemini.generate_text(&prompt).await?;
  let accepted = accept_question(&completion, existing, recent);
  match &accepted {
    Some(q) => info!(target: "mailexam_backend", question_len = q.len(), "New question accepted"),
    None => info!(target: "mailexam_backend", "Completion rejected (empty or duplicate)"),
  }
  Ok(accepted)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_first_then_rejects_identical_completion() {
    let existing = vec![];
    let mut recent = Vec::new();
    let first = accept_question("Write an email to your landlord.", &existing, &mut recent);
    assert_eq!(first.as_deref(), Some("Write an email to your landlord."));
    let second = accept_question("Write an email to your landlord.", &existing, &mut recent);
    assert_eq!(second, None);
  }

  #[test]
  fn rejects_empty_and_existing() {
    let existing = vec!["Known question".to_string()];
    let mut recent = Vec::new();
    assert_eq!(accept_question("   ", &existing, &mut recent), None);
    assert_eq!(accept_question("Known question", &existing, &mut recent), None);
    assert!(recent.is_empty());
  }

  #[test]
  fn window_evicts_oldest_beyond_five() {
    let existing = vec![];
    let mut recent = Vec::new();
    for i in 1..=6 {
      let q = format!("question {}", i);
      assert!(accept_question(&q, &existing, &mut recent).is_some());
    }
    assert_eq!(recent.len(), RECENT_WINDOW);
    assert_eq!(recent[0], "question 2");
    assert_eq!(recent[4], "question 6");
    // The evicted question is acceptable again.
    assert!(accept_question("question 1", &existing, &mut recent).is_some());
  }

  #[test]
  fn trims_completion_before_comparing() {
    let existing = vec![];
    let mut recent = vec!["A question".to_string()];
    assert_eq!(accept_question("  A question \n", &existing, &mut recent), None);
  }

  #[test]
  fn renders_existing_list_one_per_line() {
    let qs = vec!["a".to_string(), "b".to_string()];
    assert_eq!(render_question_list(&qs), "- a\n- b");
    assert_eq!(render_question_list(&[]), "(none)");
  }
}
