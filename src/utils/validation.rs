use crate::services::media_host::MediaSource;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Handles are stored and looked up with a leading `@`.
pub fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{}", trimmed)
    }
}

/// First character of the display name, upper-cased. Falls back to the
/// handle when the display name is blank.
pub fn avatar_initial(display_name: &str, username: &str) -> String {
    display_name
        .trim()
        .chars()
        .next()
        .or_else(|| username.trim_start_matches('@').chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// Trims, strips `#`, lower-cases, drops empties and duplicates (first wins).
pub fn normalize_hashtags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.as_ref().trim().trim_start_matches('#').trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Accepts raw base64, a `data:<mime>;base64,` URL, or an http(s) URL the
/// media host can fetch itself.
pub fn decode_media_payload(payload: &str) -> Result<MediaSource, ValidationError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(ValidationError {
            code: "EMPTY_FILE",
            message: "File payload is empty".to_string(),
        });
    }

    if payload.starts_with("http://") || payload.starts_with("https://") {
        return Ok(MediaSource::Url(payload.to_string()));
    }

    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| ValidationError {
                code: "INVALID_DATA_URL",
                message: "Data URL must be base64 encoded".to_string(),
            })?,
        None => payload,
    };

    let bytes = STANDARD.decode(encoded).map_err(|e| ValidationError {
        code: "INVALID_BASE64",
        message: format!("File payload is not valid base64: {}", e),
    })?;

    if bytes.is_empty() {
        return Err(ValidationError {
            code: "EMPTY_FILE",
            message: "File payload is empty".to_string(),
        });
    }

    Ok(MediaSource::Bytes(bytes.into()))
}

/// Keeps a safe subset of characters for names sent to the media host.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
