//! Response-shape normalization for Gemini replies.
//!
//! The provider answers in two shapes: a flat `text` string, or structured
//! candidates whose parts mix plain text, `thought`-flagged text, and
//! inline image data. `normalize` folds both into [`NormalizedResponse`]
//! so the HTTP boundary never branches on the provider's shape.

use crate::ai::gemini::types::GenerateContentResponse;
use crate::models::{Attachment, NormalizedResponse};
use crate::{Error, Result};

const THOUGHT_OPEN: &str = "<div class=\"thought\"";
const DIV_CLOSE: &str = "</div>";

/// Fold a provider response into a [`NormalizedResponse`].
///
/// Missing optional fields degrade to empty strings or `None`; the only
/// error case is a response with no text and no images anywhere, which is
/// [`Error::NoContent`]. An empty text string is still content.
pub fn normalize(response: &GenerateContentResponse) -> Result<NormalizedResponse> {
    let token_count = response
        .usage_metadata
        .as_ref()
        .and_then(|usage| usage.total_token_count);

    let parts = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| content.parts.as_slice())
        .unwrap_or(&[]);

    if parts.is_empty() {
        return match &response.text {
            Some(text) => Ok(from_flat_text(text, token_count)),
            None => Err(Error::NoContent),
        };
    }

    let mut answer_text = String::new();
    let mut thought_text = String::new();
    let mut images = Vec::new();
    let mut found_content = false;

    for part in parts {
        if let Some(text) = &part.text {
            found_content = true;
            if part.thought.unwrap_or(false) {
                thought_text.push_str(text);
            } else {
                answer_text.push_str(text);
            }
        }
        if let Some(inline) = &part.inline_data {
            if inline.mime_type.starts_with("image/") {
                found_content = true;
                images.push(Attachment {
                    data: inline.data.clone(),
                    mime_type: inline.mime_type.clone(),
                });
            }
        }
    }

    if !found_content {
        // Structured envelope with nothing usable inside; a flat text
        // field, if present, still counts.
        return match &response.text {
            Some(text) => Ok(from_flat_text(text, token_count)),
            None => Err(Error::NoContent),
        };
    }

    let thought_text = trimmed_non_empty(&thought_text);
    Ok(NormalizedResponse {
        answer_text,
        thought_text,
        images,
        token_count,
    })
}

fn from_flat_text(text: &str, token_count: Option<u32>) -> NormalizedResponse {
    let (answer_text, thought_text) = split_thought(text);
    NormalizedResponse {
        answer_text,
        thought_text,
        images: Vec::new(),
        token_count,
    }
}

/// Extract one `<div class="thought">...</div>` fragment embedded in a flat
/// HTML answer.
///
/// Deliberately a tolerant scanner rather than an HTML parser: the fragment
/// is assumed non-nested, and anything malformed (missing `>`, unterminated
/// tag) means "no thought found", never an error.
fn split_thought(text: &str) -> (String, Option<String>) {
    let Some(fragment) = find_thought_fragment(text) else {
        return (text.trim().to_string(), None);
    };

    let mut answer = String::with_capacity(text.len());
    answer.push_str(&text[..fragment.start]);
    answer.push_str(&text[fragment.end..]);

    let thought = trimmed_non_empty(&text[fragment.inner_start..fragment.inner_end]);
    (answer.trim().to_string(), thought)
}

struct ThoughtFragment {
    start: usize,
    inner_start: usize,
    inner_end: usize,
    end: usize,
}

fn find_thought_fragment(text: &str) -> Option<ThoughtFragment> {
    let start = text.find(THOUGHT_OPEN)?;
    let after_prefix = &text[start + THOUGHT_OPEN.len()..];

    // Guard against matching a longer class name like "thoughtful".
    let next = after_prefix.chars().next()?;
    if next != '>' && !next.is_whitespace() {
        return None;
    }

    let gt = after_prefix.find('>')?;
    let inner_start = start + THOUGHT_OPEN.len() + gt + 1;
    let close = text[inner_start..].find(DIV_CLOSE)?;

    Some(ThoughtFragment {
        start,
        inner_start,
        inner_end: inner_start + close,
        end: inner_start + close + DIV_CLOSE.len(),
    })
}

fn trimmed_non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
