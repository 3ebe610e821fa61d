use std::sync::Arc;

use crate::config::Config;
use crate::domain::Coordinates;
use crate::models::Facility;
use crate::state::SharedState;

pub async fn cmd_search(config: Config, query: &str, location: Option<&str>) -> anyhow::Result<()> {
    let location = location
        .map(str::parse::<Coordinates>)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid --location: {e}"))?;

    println!("Searching for: {query}");

    let shared = Arc::new(SharedState::new(config)?);
    let facilities = shared
        .directory
        .search_facilities(Some(query), location)
        .await?;

    if facilities.is_empty() {
        println!("No facilities found for \"{query}\". Try a different search term.");
        return Ok(());
    }

    println!();
    println!("Search Results ({}):", facilities.len());
    println!("{:-<60}", "");

    for facility in &facilities {
        print_facility(facility);
        println!();
    }

    Ok(())
}

pub(super) fn print_facility(facility: &Facility) {
    println!("• {} [{}]", facility.name, facility.facility_type);
    println!("  {}", facility.address);

    let mut details = Vec::new();
    if let Some(phone) = &facility.phone {
        details.push(format!("Phone: {phone}"));
    }
    if let Some(rating) = &facility.rating {
        details.push(format!("Rating: {rating}"));
    }
    if let Some(distance) = &facility.distance {
        details.push(distance.clone());
    }
    if !details.is_empty() {
        println!("  {}", details.join(" | "));
    }
    if let Some(hours) = &facility.hours {
        println!("  Hours: {hours}");
    }
}
