use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::search::print_facility;
use crate::config::Config;
use crate::interface::{DirectoryClient, FacilityApi, SearchSession, SearchState};
use crate::state::build_shared_http_client;

const HISTORY_FLUSH_WAIT: Duration = Duration::from_secs(2);

const HELP: &str = "Type to search. :N selects result N, :clear, :directions, :save, :history, :quit";

enum Command {
    Select(usize),
    Clear,
    Directions,
    Save,
    History,
    Help,
    Quit,
    Input(String),
}

fn parse_line(line: &str) -> Command {
    let Some(cmd) = line.trim().strip_prefix(':') else {
        return Command::Input(line.to_string());
    };

    match cmd {
        "clear" | "c" => Command::Clear,
        "directions" | "d" => Command::Directions,
        "save" | "s" => Command::Save,
        "history" | "h" => Command::History,
        "quit" | "q" => Command::Quit,
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map_or(Command::Help, |n| Command::Select(n - 1)),
    }
}

fn render(session: &SearchSession) {
    let search_box = session.search_box();
    match search_box.state() {
        SearchState::Idle => {
            if let Some(selected) = search_box.selection() {
                println!("Selected:");
                print_facility(selected);
            }
        }
        SearchState::Typing => println!("(keep typing to search)"),
        SearchState::Pending | SearchState::Loading => println!("Searching..."),
        SearchState::NoResults => println!(
            "No facilities found for \"{}\". Try a different search term.",
            search_box.active_query().unwrap_or_default()
        ),
        SearchState::Error => println!("{}", search_box.error().unwrap_or_default()),
        SearchState::ShowingResults => {
            for (i, facility) in search_box.results().iter().enumerate() {
                println!(
                    "{:>2}. {} [{}] - {}",
                    i + 1,
                    facility.name,
                    facility.facility_type,
                    facility.address
                );
            }
        }
    }
}

pub async fn cmd_find(config: &Config, api: Option<&str>) -> anyhow::Result<()> {
    let base_url = api.unwrap_or(&config.interface.api_base_url);
    let http = build_shared_http_client(config.places.request_timeout_seconds)?;
    let client = Arc::new(DirectoryClient::new(http, base_url)?);

    let mut session = SearchSession::new(
        client.clone(),
        Duration::from_millis(config.interface.debounce_ms),
        config.interface.min_query_len,
    );

    println!("HealthFinder search ({base_url})");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Command::Input(text) => {
                session.input(text);
                session.settle().await;
                render(&session);
            }
            Command::Select(index) => match session.select(index) {
                Some(facility) => {
                    println!("Selected:");
                    print_facility(facility);
                }
                None => println!("No result #{}", index + 1),
            },
            Command::Clear => {
                session.clear();
                println!("Cleared.");
            }
            Command::Directions => match session.search_box().directions_url() {
                Some(url) => println!("{url}"),
                None => println!("Select a facility first."),
            },
            Command::Save => match session.search_box().save() {
                Some(ack) => println!("Facility Saved: {ack}"),
                None => println!("Select a facility first."),
            },
            Command::History => match client.history(None).await {
                Ok(history) if history.is_empty() => println!("No search history."),
                Ok(history) => {
                    for item in history {
                        let name = item.facility.map_or_else(
                            || "Unknown facility".to_string(),
                            |f| f.name,
                        );
                        println!("• \"{}\" -> {}", item.entry.search_query, name);
                    }
                }
                Err(e) => println!("Failed to fetch search history: {e}"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    // Selections record history in the background; give them a moment.
    session.flush_history(HISTORY_FLUSH_WAIT).await;
    Ok(())
}
