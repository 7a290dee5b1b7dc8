//! neighbourly CLI entry point
//!
//! Neighbourhood resolution and proximity search - CLI + HTTP API

use neighbourly::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
