mod fetch;
mod item;
mod url;

use serde::Serialize;
use std::collections::HashMap;

pub use fetch::{
    fetch_candidate, Fetch, HttpFetcher, LoadError, RequestError, Response, DEFAULT_TIMEOUT,
};
pub use item::{fallback_items, parse_items, Item};
pub use url::{alternate_filename, normalize_source_url};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadDiagnostics {
    pub attempted_urls: Vec<String>,
    pub last_error: Option<String>,
    /// URL whose body was accepted; unset when the fallback is in use
    pub resolved_source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Remote,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub items: Vec<Item>,
    pub diagnostics: LoadDiagnostics,
    pub origin: Origin,
}

impl LoadOutcome {
    pub fn used_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }
}

/// Memoizes one outcome per source URL for the lifetime of the loader.
pub struct Loader<F: Fetch> {
    fetcher: F,
    cache: HashMap<String, LoadOutcome>,
}

impl<F: Fetch> Loader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: HashMap::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Never fails: anything that goes wrong yields the fallback items plus
    /// the diagnostics gathered on the way.
    pub fn load(&mut self, source_url: &str) -> &LoadOutcome {
        if self.cache.contains_key(source_url) {
            log::debug!("using cached items for {}", source_url);
        } else {
            let outcome = load_uncached(&self.fetcher, source_url);
            self.cache.insert(source_url.to_string(), outcome);
        }
        &self.cache[source_url]
    }
}

fn load_uncached<F: Fetch + ?Sized>(fetcher: &F, source_url: &str) -> LoadOutcome {
    let mut diagnostics = LoadDiagnostics::default();
    let url = normalize_source_url(source_url);
    if url != source_url {
        log::debug!("normalized {} to {}", source_url, url);
    }

    let candidate = fetch_candidate(fetcher, &url, &mut diagnostics);
    let validated = candidate.map(|document| {
        parse_items(&document).map_err(|e| LoadError::Schema(format!("{:#}", e)))
    });

    match validated {
        Some(Ok(items)) => {
            log::info!(
                "loaded {} items from {}",
                items.len(),
                diagnostics.resolved_source.as_deref().unwrap_or(&url)
            );
            LoadOutcome {
                items,
                diagnostics,
                origin: Origin::Remote,
            }
        }
        Some(Err(e)) => {
            log::warn!("rejecting item set: {}", e);
            diagnostics.last_error = Some(e.to_string());
            diagnostics.resolved_source = None;
            fallback(diagnostics)
        }
        None => fallback(diagnostics),
    }
}

fn fallback(diagnostics: LoadDiagnostics) -> LoadOutcome {
    log::warn!("falling back to the built-in question set");
    LoadOutcome {
        items: fallback_items(),
        diagnostics,
        origin: Origin::Fallback,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeFetcher;
    use super::{fallback_items, Loader, Origin};

    const ITEMS_URL: &str = "https://raw.githubusercontent.com/u/r/main/items.json";
    const ITEM_URL: &str = "https://raw.githubusercontent.com/u/r/main/item.json";
    const GOOD: &str = r#"[
        {"pregunta": "¿2 + 2?", "opciones": ["3", "4"], "correcta": 1},
        {"pregunta": "¿Capital de Chile?", "opciones": ["Lima", "Santiago"], "correcta": 1}
    ]"#;

    #[test]
    fn loads_items_from_primary_url() {
        let mut loader = Loader::new(FakeFetcher::default().with(ITEMS_URL, 200, GOOD));
        let outcome = loader.load(ITEMS_URL).clone();

        assert_eq!(outcome.origin, Origin::Remote);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.diagnostics.attempted_urls, vec![ITEMS_URL]);
        assert_eq!(outcome.diagnostics.resolved_source.as_deref(), Some(ITEMS_URL));
        assert_eq!(loader.fetcher().calls.borrow().len(), 1);
    }

    #[test]
    fn retries_once_with_alternate_filename() {
        let mut loader = Loader::new(FakeFetcher::default().with(ITEM_URL, 200, GOOD));
        let outcome = loader.load(ITEMS_URL).clone();

        assert_eq!(outcome.origin, Origin::Remote);
        assert_eq!(outcome.diagnostics.attempted_urls, vec![ITEMS_URL, ITEM_URL]);
        assert_eq!(outcome.diagnostics.resolved_source.as_deref(), Some(ITEM_URL));
    }

    #[test]
    fn falls_back_after_both_attempts_fail() {
        let fetcher = FakeFetcher::default()
            .failing(ITEMS_URL, "connection timed out")
            .with(ITEM_URL, 200, "   ");
        let mut loader = Loader::new(fetcher);
        let outcome = loader.load(ITEMS_URL).clone();

        assert_eq!(outcome.origin, Origin::Fallback);
        assert_eq!(outcome.items, fallback_items());
        assert_eq!(outcome.diagnostics.attempted_urls, vec![ITEMS_URL, ITEM_URL]);
        assert_eq!(
            outcome.diagnostics.last_error.as_deref(),
            Some("malformed response: empty body")
        );
        assert_eq!(outcome.diagnostics.resolved_source, None);
        assert_eq!(loader.fetcher().calls.borrow().len(), 2);
    }

    #[test]
    fn network_error_is_reported_in_diagnostics() {
        let fetcher = FakeFetcher::default().failing("https://h.test/quiz.json", "timed out");
        let mut loader = Loader::new(fetcher);
        let outcome = loader.load("https://h.test/quiz.json");

        assert!(outcome.used_fallback());
        let last_error = outcome.diagnostics.last_error.as_deref().unwrap();
        assert!(last_error.starts_with("network error"), "{last_error}");
    }

    #[test]
    fn object_document_falls_back_without_retry() {
        let fetcher = FakeFetcher::default().with(ITEMS_URL, 200, r#"{"pregunta": "x"}"#);
        let mut loader = Loader::new(fetcher);
        let outcome = loader.load(ITEMS_URL).clone();

        assert_eq!(outcome.origin, Origin::Fallback);
        assert_eq!(outcome.items, fallback_items());
        assert_eq!(outcome.diagnostics.attempted_urls, vec![ITEMS_URL]);
        assert!(outcome
            .diagnostics
            .last_error
            .as_deref()
            .unwrap()
            .starts_with("schema error"));
    }

    #[test]
    fn invalid_json_counts_as_failed_attempt() {
        let fetcher = FakeFetcher::default()
            .with(ITEMS_URL, 200, "<html>not json</html>")
            .with(ITEM_URL, 200, GOOD);
        let mut loader = Loader::new(fetcher);
        let outcome = loader.load(ITEMS_URL);

        assert_eq!(outcome.origin, Origin::Remote);
        assert_eq!(outcome.diagnostics.attempted_urls.len(), 2);
    }

    #[test]
    fn non_conventional_filename_is_attempted_once() {
        let mut loader = Loader::new(FakeFetcher::default());
        let outcome = loader.load("https://h.test/quiz.json").clone();

        assert!(outcome.used_fallback());
        assert_eq!(outcome.diagnostics.attempted_urls, vec!["https://h.test/quiz.json"]);
        assert_eq!(
            outcome.diagnostics.last_error.as_deref(),
            Some("malformed response: server returned HTTP 404")
        );
    }

    #[test]
    fn blob_urls_are_fetched_from_raw_host() {
        let mut loader = Loader::new(FakeFetcher::default().with(ITEMS_URL, 200, GOOD));
        let outcome = loader.load("https://github.com/u/r/blob/main/items.json");

        assert_eq!(outcome.origin, Origin::Remote);
        assert_eq!(outcome.diagnostics.attempted_urls, vec![ITEMS_URL]);
    }

    #[test]
    fn repeated_loads_hit_the_cache() {
        let mut loader = Loader::new(FakeFetcher::default());
        loader.load(ITEMS_URL);
        loader.load(ITEMS_URL);

        assert_eq!(
            *loader.fetcher().calls.borrow(),
            vec![ITEMS_URL.to_string(), ITEM_URL.to_string()]
        );
    }
}
