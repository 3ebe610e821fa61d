use crate::config::Config;
use crate::interface::{DirectoryClient, FacilityApi};
use crate::state::build_shared_http_client;

pub async fn cmd_history(
    config: &Config,
    user: Option<&str>,
    api: Option<&str>,
) -> anyhow::Result<()> {
    let base_url = api.unwrap_or(&config.interface.api_base_url);
    let http = build_shared_http_client(config.places.request_timeout_seconds)?;
    let client = DirectoryClient::new(http, base_url)?;

    let history = client.history(user).await?;

    if history.is_empty() {
        println!("No search history.");
        return Ok(());
    }

    println!("Recent Searches (last {}):", history.len());
    println!("{:-<70}", "");

    for item in history {
        let facility = item
            .facility
            .as_ref()
            .map_or_else(|| "Unknown facility".to_string(), |f| f.name.clone());
        println!("• \"{}\" -> {}", item.entry.search_query, facility);
        println!(
            "  {}",
            item.entry.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}
