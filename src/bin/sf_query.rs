//! Run a SOQL query against an org and print the records as JSON lines.
//!
//! ```sh
//! export SF_USER=me@example.com SF_PASS=... SF_TOKEN=...
//! cargo run --bin sf-query -- "SELECT Id, Subject FROM Case LIMIT 5"
//! ```
//!
//! `--tooling` sends the query to the Tooling API.

use sflite::{ForceClient, PasswordCredentials};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut tooling = false;
    let mut soql = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--tooling" {
            tooling = true;
        } else {
            soql.push(arg);
        }
    }
    if soql.is_empty() {
        return Err("usage: sf-query [--tooling] <SOQL>".into());
    }
    let soql = soql.join(" ");

    let creds = PasswordCredentials::from_env()?;
    let client = ForceClient::builder()
        .base_url(creds.login_url())
        .use_tooling_api(tooling)
        .build()?;
    client.login(&creds).await?;

    if let Some(user) = client.user() {
        tracing::info!(user = %user.user_name, instance = ?client.instance_url(), "Logged in");
    }

    let mut page = client.query(&soql).await?;
    let mut printed = 0usize;
    loop {
        for record in &page.records {
            println!("{}", serde_json::to_string(record)?);
            printed += 1;
        }
        match page.next_records_url.take() {
            Some(next) if !page.done => page = client.query_more(&next).await?,
            _ => break,
        }
    }

    eprintln!("{printed} of {} record(s)", page.total_size);
    Ok(())
}
