//! Favicon resolution for shortcut tiles

use crate::config;
use url::Url;

/// Icon URL for a tile linking to `link`.
///
/// Uses the icon service keyed by the link's host, or the generic glyph
/// when the link does not parse or has no host.
pub fn favicon_url(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => config::FAVICON_SERVICE_URL.replace("{domain}", host),
            _ => config::FALLBACK_FAVICON.to_string(),
        },
        Err(e) => {
            tracing::debug!("Cannot extract host from {:?}: {}", link, e);
            config::FALLBACK_FAVICON.to_string()
        }
    }
}
