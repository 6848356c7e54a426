//! HTTP client for the documentation aggregator.
//!
//! Two hosts are involved: the root host serves docset and entry listings as
//! JSON, and the documents host serves the individual HTML pages.

use crate::document::HtmlDocument;
use crate::locator::EntryLocator;
use crate::{Docset, EntryManifest, Error, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default root host.
pub const DEFAULT_ROOT_URL: &str = "https://devdocs.io/";
/// Default documents host.
pub const DEFAULT_DOCUMENTS_URL: &str = "https://documents.devdocs.io/";
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Aggregator root, serving `docs/docs.json` and docset listings.
    pub root_url: String,
    /// Base URL of document pages.
    pub documents_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            documents_url: DEFAULT_DOCUMENTS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Aggregator client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    root: Url,
    documents: Url,
}

impl Client {
    /// Build a client. Fails when a URL does not parse.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("devdocs/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            http,
            root: base_url(&options.root_url)?,
            documents: base_url(&options.documents_url)?,
        })
    }

    /// Every docset the aggregator offers.
    pub async fn list_docsets(&self) -> Result<Vec<Docset>> {
        let url = self.root.join("docs/docs.json")?;
        let response = self.get(&url).await?;
        let response = check_status(response, || {
            Error::Parse(format!("docset listing not found at '{url}'"))
        })?;
        let docsets: Vec<Docset> = decode(response).await?;
        info!(count = docsets.len(), "fetched docset listing");
        Ok(docsets)
    }

    /// Entry listing for one docset.
    pub async fn list_entries(&self, docset: &str) -> Result<EntryManifest> {
        let url = self.root.join(&format!("docs/{docset}/index.json"))?;
        let response = self.get(&url).await?;
        let response = check_status(response, || Error::DocsetNotFound {
            docset: docset.to_string(),
        })?;
        let mut manifest: EntryManifest = decode(response).await?;
        manifest.docset = docset.to_string();
        info!(docset, count = manifest.entries.len(), "fetched entry listing");
        Ok(manifest)
    }

    /// HTML page at `locator.path`. The fragment is carried into the result.
    pub async fn get_document(&self, docset: &str, locator: &EntryLocator) -> Result<HtmlDocument> {
        let url = self
            .documents
            .join(&format!("{docset}/{}.html", locator.path))?;
        let response = self.get(&url).await?;
        let response = check_status(response, || Error::DocumentNotFound {
            docset: docset.to_string(),
            path: locator.path.clone(),
        })?;
        let content = response.text().await?;
        info!(docset, path = %locator.path, bytes = content.len(), "fetched document");

        Ok(HtmlDocument {
            docset: docset.to_string(),
            entry: locator.clone(),
            content,
        })
    }

    async fn get(&self, url: &Url) -> Result<Response> {
        debug!(%url, "GET");
        Ok(self.http.get(url.clone()).send().await?)
    }
}

/// Parse `raw` as a base URL, making sure relative joins extend its path.
fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Map 404 through `not_found` and any other failure status to a network error.
fn check_status(response: Response, not_found: impl FnOnce() -> Error) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(not_found());
    }
    response.error_for_status().map_err(Error::Network)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| Error::Parse(format!("invalid JSON payload: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn client_for(server: &MockServer) -> Client {
        Client::new(ClientOptions {
            root_url: server.uri(),
            documents_url: format!("{}/documents", server.uri()),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = base_url("https://example.com/mirror").unwrap();
        assert_eq!(url.join("docs/docs.json").unwrap().as_str(), "https://example.com/mirror/docs/docs.json");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = Client::new(ClientOptions {
            root_url: "not a url".into(),
            ..ClientOptions::default()
        })
        .unwrap_err();
        assert_eq!(err.category(), "invalid_url");
    }

    #[tokio::test]
    async fn test_list_docsets() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/docs.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"name":"Go","slug":"go","release":"1.22","mtime":1},{"name":"Bash","slug":"bash"}]"#,
            ))
            .mount(&server)
            .await;

        let docsets = client_for(&server).list_docsets().await?;
        assert_eq!(docsets.len(), 2);
        assert_eq!(docsets[0].full_name(), "Go 1.22");
        assert_eq!(docsets[1].release, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_entries_sets_docset() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/go/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"entries":[{"name":"net/http","path":"net/http/index","type":"net"}],"types":[]}"#,
            ))
            .mount(&server)
            .await;

        let manifest = client_for(&server).list_entries("go").await?;
        assert_eq!(manifest.docset, "go");
        assert_eq!(manifest.entries[0].path, "net/http/index");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_docset_is_docset_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        match client_for(&server).list_entries("nope").await {
            Err(Error::DocsetNotFound { docset }) => assert_eq!(docset, "nope"),
            other => panic!("expected DocsetNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_document() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/go/net/http/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h2 id=\"Client\">Client</h2>"))
            .mount(&server)
            .await;

        let locator = EntryLocator::parse("net/http/index#Client");
        let doc = client_for(&server).get_document("go", &locator).await?;
        assert_eq!(doc.docset, "go");
        assert_eq!(doc.entry, locator);
        assert!(doc.content.contains("Client"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_document_is_document_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let locator = EntryLocator::parse("missing");
        match client_for(&server).get_document("go", &locator).await {
            Err(Error::DocumentNotFound { docset, path }) => {
                assert_eq!(docset, "go");
                assert_eq!(path, "missing");
            },
            other => panic!("expected DocumentNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).list_docsets().await.unwrap_err();
        assert_eq!(err.category(), "network");
    }

    #[tokio::test]
    async fn test_bad_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_docsets().await.unwrap_err();
        assert_eq!(err.category(), "parse");
    }
}
