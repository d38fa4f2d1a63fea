//! Locating the structured plan object inside free-form generated text.
//!
//! Two strategies, in priority order:
//!
//! 1. A fenced code block labelled `json` (label matched case-insensitively).
//! 2. A depth-counted, string-aware scan starting at the first `{`.
//!
//! An object whose braces never balance is reported as truncated rather than
//! guessed at; the repair-retry controller relies on that signal.

use std::fmt;

/// Opening fence label searched for, compared case-insensitively.
const FENCE_LABEL: &str = "json";
const FENCE: &str = "```";

/// Why no candidate object could be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionError {
    /// Input was empty, whitespace only, or contained no opening brace.
    Empty,
    /// An object was opened but its braces never balanced.
    Truncated,
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Empty => write!(f, "no structured content found"),
            ExtractionError::Truncated => write!(f, "structured content is truncated"),
        }
    }
}

impl std::error::Error for ExtractionError {}

/// Returns the best candidate object in `text`, or `None`.
///
/// ```rust
/// use compass_core::pipeline::extract;
///
/// let reply = "Here you go:\n```JSON\n{\"reply\": \"hi\"}\n```\nGood luck!";
/// assert_eq!(extract(reply), Some("{\"reply\": \"hi\"}"));
///
/// assert_eq!(extract("{\"milestones\": [{\"title\": \"Start"), None);
/// ```
pub fn extract(text: &str) -> Option<&str> {
    extract_candidate(text).ok()
}

/// Like [`extract`], but reports why extraction failed.
pub fn extract_candidate(text: &str) -> Result<&str, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    if let Some(inner) = fenced_block(text) {
        return Ok(inner);
    }

    balanced_object(text)
}

/// Finds the first closed code fence whose label is `json`.
fn fenced_block(text: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find(FENCE) {
        let label_start = search_from + offset + FENCE.len();
        let line_end = text[label_start..]
            .find('\n')
            .map_or(text.len(), |i| label_start + i);
        let label = text[label_start..line_end].trim();

        if label.eq_ignore_ascii_case(FENCE_LABEL) {
            let body_start = (line_end + 1).min(text.len());
            let close = text[body_start..].find(FENCE)?;
            return Some(text[body_start..body_start + close].trim());
        }

        // Not our fence: skip past the matching closing fence if there is one.
        match text[line_end..].find(FENCE) {
            Some(close) => search_from = line_end + close + FENCE.len(),
            None => return None,
        }
    }

    None
}

/// Scans from the first `{` until depth returns to zero, ignoring braces
/// inside string literals.
fn balanced_object(text: &str) -> Result<&str, ExtractionError> {
    let start = text.find('{').ok_or(ExtractionError::Empty)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractionError::Truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_is_returned_verbatim() {
        let body = "{\n  \"reply\": \"ok\",\n  \"milestones\": []\n}";
        let text = format!("Sure! Here is the plan.\n\n```json\n{body}\n```\n\nLet me know.");
        assert_eq!(extract(&text), Some(body));
    }

    #[test]
    fn test_fence_label_is_case_insensitive() {
        let text = "```Json\n{\"a\": 1}\n```";
        assert_eq!(extract(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_other_fences_are_skipped() {
        let text = "```python\nprint({1: 2})\n```\nthen\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract(text), Some("{\"b\": 2}"));
    }

    #[test]
    fn test_brace_scan_without_fence() {
        let text = "Plan follows {\"reply\": \"x\", \"milestones\": [{\"title\": \"y\"}]} trailing";
        assert_eq!(
            extract(text),
            Some("{\"reply\": \"x\", \"milestones\": [{\"title\": \"y\"}]}")
        );
    }

    #[test]
    fn test_braces_inside_strings_do_not_count() {
        let text = r#"{"title": "Learn {curly} braces }}", "n": 1} tail"#;
        assert_eq!(
            extract(text),
            Some(r#"{"title": "Learn {curly} braces }}", "n": 1}"#)
        );
    }

    #[test]
    fn test_escaped_quotes_keep_string_state() {
        let text = r#"{"title": "say \"{\" loudly", "ok": true}"#;
        assert_eq!(extract(text), Some(text));
    }

    #[test]
    fn test_truncated_object_is_absent() {
        let text = "```json\n{\"reply\": \"x\", \"milestones\": [{\"title\": \"Fir";
        assert_eq!(extract(text), None);
        assert_eq!(extract_candidate(text), Err(ExtractionError::Truncated));
    }

    #[test]
    fn test_unterminated_string_is_truncated() {
        let text = "{\"reply\": \"never closed }";
        assert_eq!(extract_candidate(text), Err(ExtractionError::Truncated));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(extract_candidate(""), Err(ExtractionError::Empty));
        assert_eq!(extract_candidate("   \n\t"), Err(ExtractionError::Empty));
        assert_eq!(
            extract_candidate("no structure at all"),
            Err(ExtractionError::Empty)
        );
    }

    #[test]
    fn test_only_first_complete_object_is_considered() {
        let text = "{\"first\": 1} and {\"second\": 2}";
        assert_eq!(extract(text), Some("{\"first\": 1}"));
    }

    #[test]
    fn test_multibyte_text_is_sliced_on_char_boundaries() {
        let text = "计划如下：{\"reply\": \"加油 {\"} 完成";
        assert_eq!(extract(text), Some("{\"reply\": \"加油 {\"}"));
    }
}
