//! Email evaluation: the rubric prompt plus locally computed structure
//! checks and the rating heuristic.

use tracing::instrument;

use crate::config::Prompts;
use crate::gemini::Gemini;
use crate::protocol::{EvaluationOut, FormatEvaluation};
use crate::util::fill_template;

const GREETING_WORDS: [&str; 3] = ["dear", "hello", "hi"];
const SIGN_OFF_WORDS: [&str; 3] = ["regards", "sincerely", "thank you"];
const MIN_BODY_WORDS: usize = 20;

/// Structural checks computed from the email text itself, independent of
/// whatever the model says in its feedback.
pub fn format_checks(email: &str) -> FormatEvaluation {
  let lower = email.to_lowercase();
  FormatEvaluation {
    greeting: GREETING_WORDS.iter().any(|w| lower.contains(w)),
    body: email.split_whitespace().count() > MIN_BODY_WORDS,
    sign_off: SIGN_OFF_WORDS.iter().any(|w| lower.contains(w)),
  }
}

/// Rating heuristic: count of '.' in the feedback, mod 6, clamped into
/// [1, 5]. This does NOT parse the rating the model states in its own text;
/// it is preserved literally for compatibility with the existing contract.
pub fn rating_from_feedback(feedback: &str) -> u8 {
  let periods = feedback.chars().filter(|c| *c == '.').count();
  (periods % 6).clamp(1, 5) as u8
}

/// Build the rubric prompt, ask the model for feedback, and assemble the
/// full evaluation result.
#[instrument(level = "info", skip_all, fields(email_len = email_content.len(), %cefr_level))]
pub async fn evaluate(
  gemini: &Gemini,
  prompts: &Prompts,
  email_content: &str,
  scenario: &str,
  scenario_question: &str,
  cefr_level: &str,
) -> Result<EvaluationOut, String> {
  let prompt = fill_template(
    &prompts.evaluation_template,
    &[
      ("scenario", scenario),
      ("scenario_question", scenario_question),
      ("cefr_level", cefr_level),
      ("email_content", email_content),
    ],
  );

  let feedback = gemini.generate_text(&prompt).await?;
  let rating = rating_from_feedback(&feedback);
  let format_evaluation = format_checks(email_content);
  Ok(EvaluationOut { feedback, rating, format_evaluation })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn feedback_with_periods(n: usize) -> String {
    let mut s = String::from("Feedback");
    for _ in 0..n {
      s.push_str(" sentence.");
    }
    s
  }

  #[test]
  fn rating_seven_periods_is_one() {
    assert_eq!(rating_from_feedback(&feedback_with_periods(7)), 1);
  }

  #[test]
  fn rating_six_periods_clamps_up_to_one() {
    assert_eq!(rating_from_feedback(&feedback_with_periods(6)), 1);
  }

  #[test]
  fn rating_eleven_periods_is_five() {
    assert_eq!(rating_from_feedback(&feedback_with_periods(11)), 5);
  }

  #[test]
  fn rating_stays_within_bounds() {
    for n in 0..30 {
      let r = rating_from_feedback(&feedback_with_periods(n));
      assert!((1..=5).contains(&r), "n={} gave {}", n, r);
    }
  }

  #[test]
  fn full_email_passes_all_format_checks() {
    let email = "Dear Sir, I am writing to ask about the apartment you listed \
                 last week because I am very interested in renting it from next \
                 month onwards. Regards, Jane";
    let checks = format_checks(email);
    assert!(checks.greeting);
    assert!(checks.body);
    assert!(checks.sign_off);
  }

  #[test]
  fn bare_email_fails_all_format_checks() {
    let checks = format_checks("Send me the report by Friday.");
    assert!(!checks.greeting);
    assert!(!checks.body);
    assert!(!checks.sign_off);
  }

  #[test]
  fn keyword_checks_are_case_insensitive() {
    let checks = format_checks("HELLO there. THANK YOU.");
    assert!(checks.greeting);
    assert!(checks.sign_off);
  }
}
