//! `modfed doctor` — policy and connectivity checks for configured remotes.
//!
//! For each enabled product: evaluate the origin policy for the active
//! environment, then probe the remote entry script over HTTP. Security
//! rejections are reported with remote references redacted.

use anyhow::Result;
use logging::redact_remote_refs;
use modfed_config::{ConfigFeed, RemoteProductConfig};
use modfed_core::{LoadError, OriginPolicy};
use modfed_loader::validate_remote_url;
use tracing::warn;

use crate::config::Config;

pub async fn run(config: &Config) -> Result<()> {
    let policy = config.origin_policy();
    let feed = ConfigFeed::new(&config.config_url);
    let remote_config = feed.load().await;
    let client = reqwest::Client::new();

    println!("Environment: {}", config.mode.as_str());

    let mut failures = 0usize;
    for product in remote_config.enabled_products() {
        match check_remote(&client, &policy, product).await {
            Ok(()) => println!("  ok      {:<8} {}", product.id, product.url),
            Err(error) => {
                failures += 1;
                let detail = match &error {
                    LoadError::SecurityViolation { .. } => redact_remote_refs(&error.to_string()),
                    other => other.to_string(),
                };
                warn!(product = %product.id, error = %error, "Doctor check failed");
                println!("  failed  {:<8} {}", product.id, detail);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} remote(s) failed the doctor check");
    }
    println!("All remotes healthy.");
    Ok(())
}

async fn check_remote(
    client: &reqwest::Client,
    policy: &OriginPolicy,
    product: &RemoteProductConfig,
) -> Result<(), LoadError> {
    validate_remote_url(policy, &product.url)?;

    let response = client
        .get(&product.url)
        .send()
        .await
        .map_err(|error| LoadError::ScriptLoadFailure {
            url: product.url.clone(),
            reason: error.to_string(),
        })?;
    if !response.status().is_success() {
        return Err(LoadError::ScriptLoadFailure {
            url: product.url.clone(),
            reason: format!("HTTP {}", response.status()),
        });
    }
    Ok(())
}
