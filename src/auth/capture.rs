use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::error::AppResult;

use super::storage::{LocalStorage, TOKEN_KEY};

/// Path the location is replaced with once the token has been stored.
pub const CANONICAL_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureOutcome {
    pub captured: bool,
    pub location: String,
}

/// Stores the `token` query parameter of `location`, if any, and returns the
/// location the client should land on.
///
/// A location that does not parse or carries no usable token is left as is.
pub fn capture_token(location: &str, storage: &dyn LocalStorage) -> AppResult<CaptureOutcome> {
    let Some(mut url) = parse_location(location) else {
        debug!(location, "redirect location did not parse; nothing to capture");
        return Ok(unchanged(location));
    };

    let Some(token) = extract_token(&url) else {
        debug!("no token parameter on redirect location");
        return Ok(unchanged(location));
    };

    storage.set(TOKEN_KEY, &token)?;
    info!("captured session token from redirect");

    url.set_path(CANONICAL_PATH);
    url.set_query(None);
    url.set_fragment(None);

    Ok(CaptureOutcome {
        captured: true,
        location: render_location(location, &url),
    })
}

fn extract_token(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

// Relative locations such as `/auth?token=...` are resolved against a
// placeholder origin and rendered back as a bare path.
fn parse_location(location: &str) -> Option<Url> {
    let location = location.trim();
    if location.starts_with('/') {
        return Url::parse(&format!("http://localhost{location}")).ok();
    }
    Url::parse(location).ok()
}

fn render_location(original: &str, url: &Url) -> String {
    if original.trim().starts_with('/') {
        return url.path().to_string();
    }
    url.to_string()
}

fn unchanged(location: &str) -> CaptureOutcome {
    CaptureOutcome {
        captured: false,
        location: location.to_string(),
    }
}
