//! URL to route resolution.

use percent_encoding::percent_decode_str;

/// What a request URL asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/<hash>.svg`
    Svg(String),
    /// `/<hash>.json`
    Json(String),
    /// `/text/<percent-encoded text>.svg`, already decoded
    Text(String),
    /// `/events`
    Events,
    NotFound,
}

impl Route {
    /// Resolve a request URL. The query string is ignored.
    pub fn parse(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_prefix('/').unwrap_or(path);

        if path == "events" {
            return Self::Events;
        }

        if let Some(encoded) = path
            .strip_prefix("text/")
            .and_then(|rest| rest.strip_suffix(".svg"))
        {
            return match percent_decode_str(encoded).decode_utf8() {
                Ok(text) if !text.is_empty() => Self::Text(text.into_owned()),
                _ => Self::NotFound,
            };
        }

        if let Some((hash, extension)) = path.rsplit_once('.')
            && is_hash_segment(hash)
        {
            return match extension {
                "svg" => Self::Svg(hash.to_string()),
                "json" => Self::Json(hash.to_string()),
                _ => Self::NotFound,
            };
        }

        Self::NotFound
    }
}

/// A single non-empty path segment. Digit validity is the generator's call.
fn is_hash_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains(['/', '.', '%'])
}
