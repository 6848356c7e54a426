#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

pub const DOCSETS: &str = r#"[
    {"name":"Go","slug":"go","release":"1.22"},
    {"name":"JavaScript","slug":"javascript"}
]"#;

pub const ENTRIES: &str = r#"{"entries":[
    {"name":"Array","path":"array/index","type":"Global"},
    {"name":"Array.length","path":"array/index#length","type":"Global"},
    {"name":"Promise","path":"promise","type":"Global"}
]}"#;

pub const ARRAY_HTML: &str = r#"<h1>Array</h1><p>Lists.</p>
<h2 id="length">length</h2><p>Count.</p>
<h2 id="map">map()</h2><p>Maps.</p>"#;

/// A mock aggregator serving one docset.
pub async fn mock_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/docs.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOCSETS))
        .mount(&server)
        .await;
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

/// `devdocs` pointed at `server`, with config and cache isolated in `dir`.
pub fn devdocs_cmd(server: &MockServer, dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("devdocs"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("DEVDOCS_URL", server.uri());
    cmd.env("DEVDOCS_DOCUMENTS_URL", format!("{}/documents", server.uri()));
    cmd.env("DEVDOCS_CONFIG", dir.join("config.toml"));
    cmd.env("DEVDOCS_CACHE_DIR", dir.join("cache"));
    cmd.env_remove("DEVDOCS_PAGER");
    cmd.env("NO_COLOR", "1");
    cmd
}
