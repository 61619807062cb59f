//! Splitting extracted document text into "Example N" chunks.

use std::sync::OnceLock;

use regex::Regex;

/// Marker pattern: "Example", optional whitespace, digits, optional
/// whitespace, optional colon. Case-insensitive.
fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Example\s*\d+\s*:?").expect("valid marker regex"))
}

/// Split the full text into chunks, one per marker. A chunk spans from its
/// marker to the start of the next marker (or end of text). Trimmed; empty
/// chunks omitted. No markers means no chunks — the caller treats that as a
/// client error.
pub fn split_into_examples(text: &str) -> Vec<String> {
    let starts: Vec<usize> = marker_regex().find_iter(text).map(|m| m.start()).collect();
    let mut out = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let chunk = text[start..end].trim();
        if !chunk.is_empty() {
            out.push(chunk.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_each_marker_case_insensitively() {
        let text = "Example 1: write to a friend.\nSome body.\n\
                    Example 2 invite a colleague.\nMore body.\n\
                    EXAMPLE 3 : complain politely.\nTail.";
        let chunks = split_into_examples(text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("Example 1:"));
        assert!(chunks[0].ends_with("Some body."));
        assert!(chunks[1].starts_with("Example 2"));
        assert!(chunks[1].ends_with("More body."));
        assert!(chunks[2].starts_with("EXAMPLE 3 :"));
        assert!(chunks[2].ends_with("Tail."));
    }

    #[test]
    fn no_markers_yields_empty() {
        assert!(split_into_examples("just some prose with no markers").is_empty());
    }

    #[test]
    fn marker_without_colon_or_spacing_still_matches() {
        let chunks = split_into_examples("example2 ask for a refund");
        assert_eq!(chunks, vec!["example2 ask for a refund"]);
    }

    #[test]
    fn last_chunk_runs_to_end_of_text() {
        let chunks = split_into_examples("Example 1: a\nExample 2: b with tail text");
        assert_eq!(chunks, vec!["Example 1: a", "Example 2: b with tail text"]);
    }
}
