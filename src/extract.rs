//! Turning raw completion text into structured results
//!
//! Models are asked for bare JSON but routinely wrap it in a fenced code block,
//! so fences are stripped before decoding. Decoding happens in two steps to keep
//! the failure kinds apart: text that is not JSON at all is `MalformedEncoding`,
//! JSON that does not fit the result type is `ShapeMismatch`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ExtractionError;
use crate::schema::{ImpactReport, ReviewResult};

const FENCE: &str = "```";

/// Remove a surrounding fenced block and whitespace
///
/// The opening fence must start the (trimmed) text and may carry a language
/// tag; the closing fence is the last fence in the text. Text that does not
/// start with a fence is only trimmed.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };

    if !is_fence_tag(&rest[..newline]) {
        return trimmed;
    }

    let body = &rest[newline + 1..];
    match body.rfind(FENCE) {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

fn is_fence_tag(tag: &str) -> bool {
    tag.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.' | '#'))
}

/// A line that only opens or closes a fence
fn is_fence_line(line: &str) -> bool {
    line.trim()
        .strip_prefix(FENCE)
        .is_some_and(is_fence_tag)
}

/// Body of the first closed fenced block, for replies with prose before the code
fn first_fenced_block(text: &str) -> Option<&str> {
    let mut offset = 0;
    let mut open = None;
    for line in text.split_inclusive('\n') {
        if is_fence_line(line) {
            match open {
                None => open = Some(offset + line.len()),
                Some(start) => return Some(&text[start..offset]),
            }
        }
        offset += line.len();
    }
    None
}

/// Post-decode fixups and invariant checks for a result type
pub trait Normalize: Sized {
    fn normalize(self) -> Result<Self, ExtractionError>;
}

impl Normalize for ReviewResult {
    fn normalize(mut self) -> Result<Self, ExtractionError> {
        for issue in &mut self.issues {
            if issue
                .fix_example
                .as_deref()
                .is_some_and(|fix| fix.trim().is_empty())
            {
                issue.fix_example = None;
            }
        }
        Ok(self)
    }
}

impl Normalize for ImpactReport {
    fn normalize(mut self) -> Result<Self, ExtractionError> {
        let mut seen = std::collections::HashSet::new();
        self.dependent_services
            .retain(|service| seen.insert(service.clone()));

        self.visual_graph
            .validate()
            .map_err(|message| ExtractionError::ShapeMismatch { message })?;
        Ok(self)
    }
}

/// Decode a JSON result from raw completion text
pub fn extract_json<T>(raw: &str) -> Result<T, ExtractionError>
where
    T: DeserializeOwned + Normalize,
{
    let text = strip_fences(raw);
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(err) => outermost_object(text)
            .and_then(|candidate| serde_json::from_str::<Value>(candidate).ok())
            .ok_or_else(|| ExtractionError::MalformedEncoding {
                message: err.to_string(),
            })?,
    };

    if !value.is_object() {
        return Err(ExtractionError::ShapeMismatch {
            message: format!("expected a JSON object, got {}", json_kind(&value)),
        });
    }

    let decoded: T = serde_json::from_value(value).map_err(|e| ExtractionError::ShapeMismatch {
        message: e.to_string(),
    })?;
    decoded.normalize()
}

/// Free-text result (code or markdown): fence stripping only
pub fn extract_text(raw: &str) -> Result<String, ExtractionError> {
    let text = strip_fences(raw);
    if text.is_empty() {
        return Err(ExtractionError::ShapeMismatch {
            message: "completion text is empty".to_string(),
        });
    }
    Ok(text.to_string())
}

/// Generated code: fenced body when prose surrounds it, stray fence lines dropped
///
/// Unlike [`extract_text`], fences inside the reply are never content here.
pub fn extract_code(raw: &str) -> Result<String, ExtractionError> {
    let text = strip_fences(raw);
    let body = first_fenced_block(text).unwrap_or(text);
    let code = body
        .lines()
        .filter(|line| !is_fence_line(line))
        .collect::<Vec<_>>()
        .join("\n");

    let code = code.trim();
    if code.is_empty() {
        return Err(ExtractionError::ShapeMismatch {
            message: "completion contained no code".to_string(),
        });
    }
    Ok(code.to_string())
}

/// Span from the first `{` to the last `}`, for replies with chatter around the JSON
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IssueSeverity, RiskLevel, SecuritySeverity};

    const REVIEW_JSON: &str = r#"{
        "codeHealthScore": 70,
        "issues": [
            {"line": 2, "message": "m", "severity": "warning", "reasoning": "r", "fixExample": ""}
        ],
        "securityIssues": [],
        "complexity": "O(n)",
        "spaceComplexity": "O(1)",
        "refactoredCode": "print('x')"
    }"#;

    #[test]
    fn test_strip_plain_text_is_trimmed() {
        assert_eq!(strip_fences("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fence() {
        let raw = "```json\n{\"a\":1}\n```";
        assert_eq!(strip_fences(raw), "{\"a\":1}");
    }

    #[test]
    fn test_strip_bare_fence_and_trailing_chatter() {
        let raw = "```\nfn main() {}\n```\nLet me know if you need more.";
        assert_eq!(strip_fences(raw), "fn main() {}");
    }

    #[test]
    fn test_code_after_preamble() {
        let raw = "Here is the code:\n```python\nprint(1)\n```";
        assert_eq!(extract_code(raw).unwrap(), "print(1)");

        let raw = "Sure.\n\n```go\nfunc main() {}\n```\nThis compiles with go 1.22.";
        assert_eq!(extract_code(raw).unwrap(), "func main() {}");
    }

    #[test]
    fn test_code_drops_unclosed_fence_marker() {
        assert_eq!(
            extract_code("Code below\n```rust\nfn main() {}\n").unwrap(),
            "Code below\nfn main() {}"
        );
        assert_eq!(extract_code("```js\nlet a = 1;\n```").unwrap(), "let a = 1;");
        assert!(matches!(
            extract_code("```\n```"),
            Err(ExtractionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_strip_keeps_inner_fences() {
        let raw = "```markdown\n# Title\n\n```rust\nlet x = 1;\n```\n\nDone.\n```";
        assert_eq!(
            strip_fences(raw),
            "# Title\n\n```rust\nlet x = 1;\n```\n\nDone."
        );
    }

    #[test]
    fn test_strip_unclosed_fence() {
        assert_eq!(strip_fences("```python\nprint(1)\n"), "print(1)");
    }

    #[test]
    fn test_markdown_not_starting_with_fence_is_untouched() {
        let docs = "# Widget\n\n```js\nnew Widget();\n```";
        assert_eq!(strip_fences(docs), docs);
    }

    #[test]
    fn test_fenced_and_unfenced_decode_identically() {
        for tag in ["", "json", "JSON", "javascript"] {
            let wrapped = format!("```{}\n{}\n```", tag, REVIEW_JSON);
            let a: ReviewResult = extract_json(&wrapped).unwrap();
            let b: ReviewResult = extract_json(REVIEW_JSON).unwrap();
            assert_eq!(a, b, "tag {:?}", tag);
        }
    }

    #[test]
    fn test_review_normalization() {
        let review: ReviewResult = extract_json(REVIEW_JSON).unwrap();
        assert_eq!(review.code_health_score, 70);
        assert_eq!(review.issues[0].severity, IssueSeverity::Warning);
        assert_eq!(review.issues[0].fix_example, None);
    }

    #[test]
    fn test_review_tolerates_capitalized_severity_and_nulls() {
        let raw = r#"{
            "codeHealthScore": null,
            "issues": [
                {"line": null, "message": "m", "severity": "Warning", "reasoning": "r", "fixExample": null}
            ],
            "securityIssues": [
                {"line": 3, "message": "sql", "severity": "HIGH", "reasoning": null}
            ],
            "complexity": "O(n)",
            "spaceComplexity": null,
            "refactoredCode": "x"
        }"#;
        let review: ReviewResult = extract_json(raw).unwrap();
        assert_eq!(review.code_health_score, 0);
        assert_eq!(review.issues[0].line, 0);
        assert_eq!(review.issues[0].severity, IssueSeverity::Warning);
        assert_eq!(review.issues[0].fix_example, None);
        assert_eq!(review.security_issues[0].severity, SecuritySeverity::High);
        assert_eq!(review.security_issues[0].reasoning, "");
        assert_eq!(review.space_complexity, "");
    }

    #[test]
    fn test_missing_fields_default() {
        let review: ReviewResult = extract_json("{}").unwrap();
        assert_eq!(review.code_health_score, 0);
        assert!(review.issues.is_empty());
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = extract_json::<ReviewResult>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedEncoding { .. }));
    }

    #[test]
    fn test_chatter_around_object_is_recovered() {
        let raw = "Sure! Here is the analysis:\n{\"codeHealthScore\": 55}\nHope it helps.";
        let review: ReviewResult = extract_json(raw).unwrap();
        assert_eq!(review.code_health_score, 55);
    }

    #[test]
    fn test_non_object_is_shape_mismatch() {
        let err = extract_json::<ReviewResult>("[1, 2, 3]").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::ShapeMismatch {
                message: "expected a JSON object, got an array".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_field_type_is_shape_mismatch() {
        let err = extract_json::<ReviewResult>(r#"{"issues": "none"}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_impact_requires_risk_level() {
        let err = extract_json::<ImpactReport>(r#"{"affectedFiles": []}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_impact_rejects_dangling_edges() {
        let raw = r#"{
            "riskLevel": "Low",
            "visualGraph": {
                "nodes": [{"id": 1, "label": "Your Code", "type": "change"}],
                "edges": [{"from": 1, "to": 2}]
            }
        }"#;
        let err = extract_json::<ImpactReport>(raw).unwrap_err();
        assert!(matches!(err, ExtractionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_impact_dedups_services() {
        let raw = r#"{
            "riskLevel": "medium",
            "dependentServices": ["Auth", "Billing", "Auth"]
        }"#;
        let report: ImpactReport = extract_json(raw).unwrap();
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert_eq!(report.dependent_services, vec!["Auth", "Billing"]);
    }

    #[test]
    fn test_extract_text() {
        assert_eq!(
            extract_text("```python\nprint('hi')\n```").unwrap(),
            "print('hi')"
        );
        assert!(matches!(
            extract_text("```\n```"),
            Err(ExtractionError::ShapeMismatch { .. })
        ));
    }
}
