//! Extraction of JSON documents from free-form model replies.

use tourscribe_error::{JsonError, TourscribeResult};

/// Extract JSON from a reply that may contain markdown or extra text.
///
/// A reply that already parses as JSON is returned trimmed. Otherwise tries
/// a fenced code block, then the first balanced object or array, whichever
/// opens earlier.
///
/// # Errors
///
/// Returns a [`JsonError`] if no JSON-looking span is present.
///
/// # Examples
///
/// ```
/// use tourscribe_interface::extract_json;
///
/// let reply = "Decision below.\n```json\n{\"is_ready\": true, \"feedback\": \"\"}\n```\n";
/// let json = extract_json(reply).unwrap();
/// assert!(json.starts_with('{'));
///
/// let bare = "Sure! {\"is_ready\": false, \"feedback\": \"Add {braces} care\"} thanks";
/// assert_eq!(
///     extract_json(bare).unwrap(),
///     "{\"is_ready\": false, \"feedback\": \"Add {braces} care\"}"
/// );
/// ```
pub fn extract_json(response: &str) -> TourscribeResult<String> {
    let trimmed = response.trim();
    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    let (first, second) = match (response.find('['), response.find('{')) {
        (Some(bracket), Some(brace)) if bracket < brace => (('[', ']'), ('{', '}')),
        _ => (('{', '}'), ('[', ']')),
    };

    if let Some(json) = extract_balanced(response, first.0, first.1)
        .or_else(|| extract_balanced(response, second.0, second.1))
    {
        return Ok(json);
    }

    tracing::error!(response_length = response.len(), "No JSON found in response");
    Err(JsonError::new(format!(
        "No JSON found in response (length: {})",
        response.len()
    ))
    .into())
}

/// Content of the first ``` fence, tolerating a missing closing fence.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")? + 3;
    // Skip the language tag, if any
    let body_start = response[start..]
        .find('\n')
        .map(|n| start + n + 1)
        .unwrap_or(start);
    let body = &response[body_start..];
    let body = body.find("```").map_or(body, |end| &body[..end]);
    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// First span between balanced `open`/`close`, ignoring delimiters in strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
