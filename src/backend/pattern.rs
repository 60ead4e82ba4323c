/// Pattern evaluation for the regex lab.
use anyhow::{Result, anyhow};
use regex::Regex;

use crate::regexlab::MatchSpan;

/// Compile `pattern` and collect every match against `subject`, with byte
/// offsets and capture groups. A compile error is the interesting failure
/// mode here — its message is shown inline under the pattern input.
pub fn evaluate(pattern: &str, subject: &str) -> Result<Vec<MatchSpan>> {
    let re = Regex::new(pattern).map_err(|e| anyhow!("{e}"))?;

    Ok(re
        .captures_iter(subject)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(MatchSpan {
                start: whole.start(),
                end: whole.end(),
                text: whole.as_str().to_string(),
                groups: caps
                    .iter()
                    .skip(1)
                    .map(|g| g.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect(),
            })
        })
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_carry_offsets_and_text() {
        let spans = evaluate(r"\b\w+\b", "hi there").unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end, spans[0].text.as_str()), (0, 2, "hi"));
        assert_eq!((spans[1].start, spans[1].end, spans[1].text.as_str()), (3, 8, "there"));
    }

    #[test]
    fn capture_groups_are_collected_in_order() {
        let spans = evaluate(r"(\w+)@(\w+)\.com", "mail bob@example.com now").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].groups, vec!["bob", "example"]);
    }

    #[test]
    fn non_participating_groups_are_empty() {
        let spans = evaluate(r"(a)|(b)", "b").unwrap();
        assert_eq!(spans[0].groups, vec!["", "b"]);
    }

    #[test]
    fn invalid_pattern_reports_a_message() {
        let err = evaluate("(unclosed", "text").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn no_matches_is_an_empty_list() {
        assert!(evaluate("xyz", "abc").unwrap().is_empty());
    }
}
