//! `devdocs` binary.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    devdocs_cli::run().await
}
