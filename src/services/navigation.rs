// Pure navigation input parsing. No view or store access, unit-testable
// in isolation.
//
// Unsafe or unparsable input is never surfaced as an error to the caller:
// it is reclassified as a search query and always yields a navigable url.

use url::Url;

use crate::types::settings::ShellSettings;

/// Schemes that are never navigable from the url bar.
pub const BLOCKED_SCHEMES: &[&str] = &["javascript", "data", "vbscript", "file", "ftp"];

/// Scheme for pages served by the shell itself (settings, notes).
pub const INTERNAL_SCHEME: &str = "tabdeck";

/// Turns url-bar input into a navigable url.
///
/// - empty input -> `about:blank`
/// - control characters or a blocked scheme -> search query
/// - implicit localhost/IP -> `http://` prefix
/// - bare domain-looking token -> `https://` (or `http://` when
///   `https_only` is off)
/// - anything else -> search-engine query url
pub fn sanitize_input(input: &str, settings: &ShellSettings) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return "about:blank".to_string();
    }

    if trimmed.chars().any(|c| c.is_control()) {
        let cleaned: String = trimmed.chars().filter(|c| !c.is_control()).collect();
        return settings.search_engine.query_url(cleaned.trim());
    }

    // Force http for implicit localhost/IP before generic parsing:
    // "localhost:3000" would otherwise parse with scheme "localhost".
    let has_scheme_separator = trimmed.contains("://");
    let is_localhost = trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1");
    let is_ip = trimmed.parse::<std::net::IpAddr>().is_ok();
    if (is_localhost || is_ip) && !has_scheme_separator {
        let candidate = format!("http://{}", trimmed);
        if let Ok(u) = Url::parse(&candidate) {
            return u.to_string();
        }
    }

    if let Ok(u) = Url::parse(trimmed) {
        let scheme = u.scheme();
        if BLOCKED_SCHEMES.contains(&scheme) {
            return settings.search_engine.query_url(trimmed);
        }
        if scheme == "http" || scheme == "https" || scheme == "about" || scheme == INTERNAL_SCHEME {
            return u.to_string();
        }
        // Unknown scheme, e.g. "docs.rs:443" parsing as scheme "docs.rs".
        // Fall through to the domain heuristic and search fallback.
    }

    if !trimmed.contains(' ') && trimmed.contains('.') && !trimmed.ends_with('.') {
        let scheme = if settings.https_only { "https" } else { "http" };
        let candidate = format!("{}://{}", scheme, trimmed);
        if let Ok(u) = Url::parse(&candidate) {
            if u.host().is_some() {
                return u.to_string();
            }
        }
    }

    settings.search_engine.query_url(trimmed)
}

/// Whether a url counts as a real destination for recovery purposes.
pub fn is_real_url(url: &str) -> bool {
    !url.is_empty() && url != "about:blank"
}
