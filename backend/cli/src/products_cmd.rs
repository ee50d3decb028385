//! `modfed products` — list the products enabled in the configuration feed.

use anyhow::Result;
use modfed_config::ConfigFeed;

use crate::config::Config;

pub async fn run(config: &Config, json: bool) -> Result<()> {
    let feed = ConfigFeed::new(&config.config_url);
    let remote_config = feed.load().await;

    if json {
        println!("{}", serde_json::to_string_pretty(remote_config)?);
        return Ok(());
    }

    let enabled = remote_config.enabled_products();
    if enabled.is_empty() {
        println!("No enabled products.");
        return Ok(());
    }

    for product in enabled {
        println!(
            "{:<8} {:<24} {} (scope: {})",
            product.id, product.name, product.url, product.scope
        );
    }
    Ok(())
}
