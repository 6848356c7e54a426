//! Request handling: listings and entry views, backed by the cache.
//!
//! Cache failures never fail a request. An unreadable or corrupt cache item
//! is logged and refetched, and a failed store is logged and skipped.

use crate::cache::{self, Cache};
use crate::client::Client;
use crate::convert::MarkdownConverter;
use crate::document::MarkdownDocument;
use crate::entry_index::EntryIndex;
use crate::locator::EntryLocator;
use crate::section_index::SectionIndex;
use crate::view::EntryView;
use crate::{Docset, Entry, Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point for the CLI and other front ends.
pub struct Service {
    cache: Arc<dyn Cache>,
    client: Client,
    converter: MarkdownConverter,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("client", &self.client)
            .field("converter", &self.converter)
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Service reading through `cache`, fetching with `client`.
    #[must_use]
    pub fn new(cache: Arc<dyn Cache>, client: Client, converter: MarkdownConverter) -> Self {
        Self {
            cache,
            client,
            converter,
        }
    }

    /// Every docset the aggregator offers. Not cached.
    pub async fn list_docsets(&self) -> Result<Vec<Docset>> {
        self.client.list_docsets().await
    }

    /// Entries of `docset` in listing order.
    pub async fn list_entries(&self, docset: &str) -> Result<Vec<Entry>> {
        let index = self.entry_index(docset).await?;
        Ok(index.entries().to_vec())
    }

    /// Entry Index of `docset`, from cache when possible.
    pub async fn entry_index(&self, docset: &str) -> Result<EntryIndex> {
        let key = cache::entries_key(docset);
        if let Some(text) = self.cached_text(&key) {
            match EntryIndex::parse(&text) {
                Ok(index) => return Ok(index),
                Err(e) => warn!(key = %key, error = %e, "corrupt cached entry index, refetching"),
            }
        }

        let manifest = self.client.list_entries(docset).await?;
        let index = EntryIndex::from_entries(manifest.entries);
        self.store(&key, index.serialize().as_bytes());
        Ok(index)
    }

    /// View of `raw_path` (`path[#fragment]`) in `docset`.
    ///
    /// The path is looked up in the Entry Index, with the `/index` fallback.
    /// When that fails and a fragment was given, the bare path is tried, so a
    /// section of any listed page can be addressed. A fragment given by the
    /// caller replaces one stored in the entry path.
    pub async fn show_entry(&self, docset: &str, raw_path: &str) -> Result<EntryView> {
        let index = self.entry_index(docset).await?;
        self.show_entry_in(&index, docset, raw_path).await
    }

    /// [`show_entry`](Self::show_entry) against an Entry Index the caller
    /// already holds, so a miss can be answered from the same index.
    pub async fn show_entry_in(
        &self,
        index: &EntryIndex,
        docset: &str,
        raw_path: &str,
    ) -> Result<EntryView> {
        let requested = EntryLocator::parse(raw_path);

        let entry = index
            .get(raw_path)
            .or_else(|| {
                requested
                    .has_fragment()
                    .then(|| index.get(&requested.path))
                    .flatten()
            })
            .ok_or_else(|| Error::EntryNotFound {
                docset: docset.to_string(),
                path: raw_path.to_string(),
            })?;
        debug!(docset, requested = raw_path, resolved = %entry.path, "resolved entry");

        let mut locator = EntryLocator::parse(&entry.path);
        if requested.has_fragment() {
            locator = locator.with_fragment(requested.fragment);
        }

        let document = self.document(docset, &locator).await?;
        EntryView::resolve(document)
    }

    /// Converted document at `locator`, from cache when possible.
    async fn document(&self, docset: &str, locator: &EntryLocator) -> Result<MarkdownDocument> {
        let md_key = cache::document_key(docset, &locator.path);
        let sections_key = cache::sections_key(docset, &locator.path);

        if let Some(document) = self.cached_document(docset, locator, &md_key, &sections_key) {
            return Ok(document);
        }

        let html = self.client.get_document(docset, locator).await?;
        let document = self.converter.convert(&html)?;
        info!(docset, path = %locator.path, sections = document.index.len(), "converted document");

        self.store(&md_key, document.content.as_bytes());
        self.store(&sections_key, document.index.serialize().as_bytes());
        Ok(document)
    }

    fn cached_document(
        &self,
        docset: &str,
        locator: &EntryLocator,
        md_key: &str,
        sections_key: &str,
    ) -> Option<MarkdownDocument> {
        let content = self.cached_text(md_key)?;
        let sections = self.cached_text(sections_key)?;
        let index = match SectionIndex::parse(&sections) {
            Ok(index) => index,
            Err(e) => {
                warn!(key = %sections_key, error = %e, "corrupt cached section index, refetching");
                return None;
            },
        };

        Some(MarkdownDocument {
            docset: docset.to_string(),
            entry: locator.clone(),
            content,
            index,
        })
    }

    fn cached_text(&self, key: &str) -> Option<String> {
        match self.cache.retrieve(key) {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => Some(text),
                Err(_) => {
                    warn!(key, "cached item is not UTF-8, ignoring");
                    None
                },
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                None
            },
        }
    }

    fn store(&self, key: &str, data: &[u8]) {
        if let Err(e) = self.cache.store(key, data) {
            warn!(key, error = %e, "cache write failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCache, NoCache};
    use crate::client::ClientOptions;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const ENTRIES: &str = r#"{"entries":[
        {"name":"Array","path":"array/index","type":"Global"},
        {"name":"Array.length","path":"array/index#length","type":"Global"},
        {"name":"Promise","path":"promise","type":"Global"}
    ]}"#;

    const ARRAY_HTML: &str = r#"<h1>Array</h1><p>Lists.</p>
        <h2 id="length">length</h2><p>Count.</p>
        <h3 id="length-example">Example</h3><pre>a.length</pre>
        <h2 id="map">map()</h2><p>Maps.</p>"#;

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/javascript/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ENTRIES))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/javascript/array/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARRAY_HTML))
            .mount(&server)
            .await;
        server
    }

    fn service(server: &MockServer, cache: Arc<dyn Cache>) -> Service {
        let client = Client::new(ClientOptions {
            root_url: server.uri(),
            documents_url: format!("{}/documents", server.uri()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        Service::new(cache, client, MarkdownConverter::default())
    }

    #[tokio::test]
    async fn test_list_entries_keeps_order() {
        let server = server().await;
        let entries = service(&server, Arc::new(MemoryCache::new()))
            .list_entries("javascript")
            .await
            .unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["array/index", "array/index#length", "promise"]);
    }

    #[tokio::test]
    async fn test_show_whole_document_via_index_fallback() {
        let server = server().await;
        let view = service(&server, Arc::new(MemoryCache::new()))
            .show_entry("javascript", "array")
            .await
            .unwrap();

        assert!(!view.is_excerpt());
        assert!(view.render_to_string().starts_with("# Array\n"));
        assert_eq!(view.document.index.ids(), ["length", "length-example", "map"]);
    }

    #[tokio::test]
    async fn test_show_section_from_entry_fragment() {
        let server = server().await;
        let view = service(&server, Arc::new(MemoryCache::new()))
            .show_entry("javascript", "array/index#length")
            .await
            .unwrap();

        assert!(view.is_excerpt());
        let text = view.render_to_string();
        assert!(text.starts_with("## length\n"));
        assert!(text.contains("### Example"));
        assert!(!text.contains("map()"));
    }

    #[tokio::test]
    async fn test_requested_fragment_on_unlisted_section() {
        let server = server().await;
        let view = service(&server, Arc::new(MemoryCache::new()))
            .show_entry("javascript", "array#map")
            .await
            .unwrap();
        assert_eq!(view.document.entry.to_string(), "array/index#map");
        assert!(view.render_to_string().starts_with("## map()\n"));
    }

    #[tokio::test]
    async fn test_unknown_entry() {
        let server = server().await;
        match service(&server, Arc::new(MemoryCache::new()))
            .show_entry("javascript", "nope#x")
            .await
        {
            Err(Error::EntryNotFound { docset, path }) => {
                assert_eq!(docset, "javascript");
                assert_eq!(path, "nope#x");
            },
            other => panic!("expected EntryNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_show_entry_in_reuses_the_given_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/javascript/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ENTRIES))
            .expect(1)
            .mount(&server)
            .await;
        let svc = service(&server, Arc::new(NoCache));

        let index = svc.entry_index("javascript").await.unwrap();
        let err = svc.show_entry_in(&index, "javascript", "arry").await.unwrap_err();
        assert!(matches!(err, Error::EntryNotFound { .. }));
        assert!(index.suggest("arry", 5).iter().any(|e| e.path == "array/index"));

        server.verify().await;
    }

    #[test]
    fn test_debug_names_the_parts() {
        let client = Client::new(ClientOptions::default()).unwrap();
        let svc = Service::new(Arc::new(NoCache), client, MarkdownConverter::default());
        let debug = format!("{svc:?}");
        assert!(debug.starts_with("Service {"));
        assert!(debug.contains("MarkdownConverter"));
    }

    #[tokio::test]
    async fn test_unknown_section() {
        let server = server().await;
        match service(&server, Arc::new(MemoryCache::new()))
            .show_entry("javascript", "array#nope")
            .await
        {
            Err(Error::SectionNotFound { docset, path, id }) => {
                assert_eq!(docset, "javascript");
                assert_eq!(path, "array/index");
                assert_eq!(id, "nope");
            },
            other => panic!("expected SectionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_documents_are_served_from_cache() {
        let server = server().await;
        let cache = Arc::new(MemoryCache::new());
        let svc = service(&server, cache.clone());

        svc.show_entry("javascript", "array").await.unwrap();
        assert!(cache.retrieve("javascript/entries.tsv").unwrap().is_some());
        assert!(cache.retrieve("javascript/array/index.md").unwrap().is_some());
        assert!(cache.retrieve("javascript/array/index.sections").unwrap().is_some());

        server.reset().await;
        let view = svc.show_entry("javascript", "array#map").await.unwrap();
        assert!(view.is_excerpt());
    }

    #[tokio::test]
    async fn test_corrupt_cached_index_is_refetched() {
        let server = server().await;
        let cache = Arc::new(MemoryCache::new());
        cache.store("javascript/entries.tsv", b"garbage without tabs\n").unwrap();
        cache.store("javascript/array/index.md", b"## length\n").unwrap();
        cache.store("javascript/array/index.sections", b"abc:1 length\n").unwrap();

        let view = service(&server, cache.clone())
            .show_entry("javascript", "array#length")
            .await
            .unwrap();
        assert_eq!(view.lines.map(|r| r.start), Some(5));

        let repaired = cache.retrieve("javascript/entries.tsv").unwrap().unwrap();
        assert!(EntryIndex::parse(std::str::from_utf8(&repaired).unwrap()).is_ok());
    }
}
