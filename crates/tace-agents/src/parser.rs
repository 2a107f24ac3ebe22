use std::collections::HashMap;

use tace_models::Signal;

use crate::error::AgentError;

/// Extract the first JSON object from raw process output.
///
/// Agent and predictor commands are often thin wrappers around language
/// models, so the payload may arrive clean, fenced in markdown, or buried
/// after prose. All three shapes are accepted.
pub fn extract_json(text: &str) -> Result<String, AgentError> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    if let Some(candidate) = fenced_block(trimmed) {
        if serde_json::from_str::<serde_json::Value>(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    if let Some(candidate) = first_balanced_object(trimmed) {
        if serde_json::from_str::<serde_json::Value>(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    Err(AgentError::Parse(format!(
        "no JSON object found in output (length={})",
        text.len()
    )))
}

/// Contents of the first ``` or ```json fence, if any.
fn fenced_block(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let after_marker = &text[start + 3..];
    // Skip an optional language tag up to the end of the line.
    let body_start = after_marker.find('\n')? + 1;
    let body = &after_marker[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim().to_string())
}

/// First balanced `{ ... }` span, skipping braces inside string literals.
fn first_balanced_object(text: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| text[s..=i].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a Signal from raw agent command output.
pub fn parse_signal(raw: &str) -> Result<Signal, AgentError> {
    let json_str = extract_json(raw)?;
    serde_json::from_str(&json_str)
        .map_err(|e| AgentError::Parse(format!("invalid Signal: {e}\nJSON: {json_str}")))
}

/// Parse an `{agent: score}` map from raw predictor command output.
pub fn parse_score_map(raw: &str) -> Result<HashMap<String, f64>, AgentError> {
    let json_str = extract_json(raw)?;
    serde_json::from_str(&json_str)
        .map_err(|e| AgentError::Parse(format!("invalid score map: {e}\nJSON: {json_str}")))
}
