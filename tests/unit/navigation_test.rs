use rstest::rstest;

use tabdeck::services::navigation::{is_real_url, sanitize_input};
use tabdeck::types::settings::{SearchEngine, ShellSettings};

fn default_settings() -> ShellSettings {
    ShellSettings::default()
}

#[rstest]
#[case("", "about:blank")]
#[case("   ", "about:blank")]
#[case("about:blank", "about:blank")]
fn empty_input_yields_blank(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sanitize_input(input, &default_settings()), expected);
}

#[rstest]
#[case("https://example.com", "https://example.com/")]
#[case("https://example.com/path?q=1", "https://example.com/path?q=1")]
#[case("http://example.com", "http://example.com/")]
#[case("  https://example.com  ", "https://example.com/")]
fn explicit_urls_pass_through_normalized(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sanitize_input(input, &default_settings()), expected);
}

#[rstest]
#[case("localhost:3000", "http://localhost:3000/")]
#[case("localhost", "http://localhost/")]
#[case("127.0.0.1:8080", "http://127.0.0.1:8080/")]
#[case("192.168.1.10", "http://192.168.1.10/")]
fn local_addresses_get_http(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sanitize_input(input, &default_settings()), expected);
}

#[rstest]
#[case("example.com", "https://example.com/")]
#[case("docs.rs/serde", "https://docs.rs/serde")]
#[case("sub.domain.example.com", "https://sub.domain.example.com/")]
fn bare_domains_get_https(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sanitize_input(input, &default_settings()), expected);
}

#[test]
fn bare_domains_get_http_when_https_only_is_off() {
    let settings = ShellSettings {
        https_only: false,
        ..ShellSettings::default()
    };
    assert_eq!(sanitize_input("example.com", &settings), "http://example.com/");
}

#[rstest]
#[case("javascript:alert(1)")]
#[case("data:text/html,<script>alert(1)</script>")]
#[case("vbscript:msgbox")]
#[case("file:///etc/passwd")]
#[case("ftp://host/file")]
fn blocked_schemes_become_search_queries(#[case] input: &str) {
    let settings = default_settings();
    assert_eq!(
        sanitize_input(input, &settings),
        settings.search_engine.query_url(input)
    );
}

#[rstest]
#[case("hello world", "https://duckduckgo.com/?q=hello%20world")]
#[case("rust", "https://duckduckgo.com/?q=rust")]
#[case("ends.", "https://duckduckgo.com/?q=ends.")]
fn free_text_becomes_a_search_query(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sanitize_input(input, &default_settings()), expected);
}

#[test]
fn control_characters_are_stripped_and_searched() {
    assert_eq!(
        sanitize_input("evil\u{7}query", &default_settings()),
        "https://duckduckgo.com/?q=evilquery"
    );
}

#[test]
fn internal_pages_are_navigable() {
    assert_eq!(
        sanitize_input("tabdeck://settings", &default_settings()),
        "tabdeck://settings"
    );
}

#[rstest]
#[case(SearchEngine::Google, "https://google.com/search?q=query")]
#[case(SearchEngine::Bing, "https://bing.com/search?q=query")]
#[case(SearchEngine::Brave, "https://search.brave.com/search?q=query")]
fn configured_search_engine_is_honored(#[case] engine: SearchEngine, #[case] expected: &str) {
    let settings = ShellSettings {
        search_engine: engine,
        ..ShellSettings::default()
    };
    assert_eq!(sanitize_input("query", &settings), expected);
}

#[rstest]
#[case("https://example.com/", true)]
#[case("tabdeck://notes", true)]
#[case("about:blank", false)]
#[case("", false)]
fn recovery_eligibility(#[case] url: &str, #[case] expected: bool) {
    assert_eq!(is_real_url(url), expected);
}
