use crate::model::reply::CharacterReply;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("empty reply text")]
    Empty,

    #[error("invalid reply JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the raw JSON text the model produced into a typed reply.
/// Tolerates a surrounding markdown code fence.
pub fn decode_character_reply(raw: &str) -> Result<CharacterReply, DecodeError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }

    Ok(serde_json::from_str(body)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string ("json") on the opening fence line
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
