//! `sonjutalk onboard` — First-time setup.

use sonjutalk_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("손주톡톡 — First-Time Setup");
    println!("===========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config file exists: {}", config_path.display());
        println!("\nNothing to do — edit the file directly to change settings.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("  Wrote default config: {}", config_path.display());

    println!();
    println!("Next steps:");
    println!("  1. Set your API key:");
    println!("       export SONJUTALK_API_KEY='sk-...'");
    println!("     (or add api_key to the config file)");
    println!("  2. Check connectivity:");
    println!("       sonjutalk doctor");
    println!("  3. Start chatting:");
    println!("       sonjutalk chat");

    Ok(())
}
