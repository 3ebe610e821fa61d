use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created default config.toml");
    } else {
        println!("config.toml already exists, leaving it unchanged");
    }
    println!(
        "Set {} (or [places] api_key) to search with Google Places, or set [places] provider = \"catalog\".",
        crate::config::PLACES_API_KEY_ENV
    );
    Ok(())
}
