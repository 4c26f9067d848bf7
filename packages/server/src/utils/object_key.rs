use chrono::{DateTime, Utc};

/// Storage key for a generated image: `<user segment>/<millis>.png`.
///
/// The user id comes from an external auth provider and may contain
/// characters that are awkward in object keys, so it is sanitized first.
pub fn derive(user_id: &str, at: DateTime<Utc>) -> String {
    format!("{}/{}.png", sanitize_segment(user_id), at.timestamp_millis())
}

fn sanitize_segment(raw: &str) -> String {
    let mut segment: String = raw
        .chars()
        .take(64)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    segment = segment.trim_matches('-').to_owned();
    if segment.is_empty() {
        "anonymous".to_owned()
    } else {
        segment
    }
}
