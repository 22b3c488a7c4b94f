use serde::{Deserialize, Serialize};

/// Search engine used when navigation input is reclassified as a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchEngine {
    DuckDuckGo,
    Google,
    Bing,
    Brave,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::DuckDuckGo
    }
}

impl SearchEngine {
    pub fn query_url(&self, query: &str) -> String {
        let q = urlencoding::encode(query);
        match self {
            Self::DuckDuckGo => format!("https://duckduckgo.com/?q={}", q),
            Self::Google => format!("https://google.com/search?q={}", q),
            Self::Bing => format!("https://bing.com/search?q={}", q),
            Self::Brave => format!("https://search.brave.com/search?q={}", q),
        }
    }
}

/// User-facing shell configuration, persisted through the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellSettings {
    pub homepage: String,
    pub search_engine: SearchEngine,
    pub https_only: bool,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            homepage: "https://duckduckgo.com".to_string(),
            search_engine: SearchEngine::default(),
            https_only: true,
        }
    }
}
