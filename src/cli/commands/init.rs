//! Config bootstrap command

use crate::config::{Config, JWT_SECRET_ENV};

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("✓ Created config.toml");
        println!();
        println!("Set a signing secret before serving, either in config.toml:");
        println!("  [security]");
        println!("  jwt_secret = \"<at least 32 random characters>\"");
        println!("or via the {JWT_SECRET_ENV} environment variable.");
    } else {
        println!("config.toml already exists");
    }
    Ok(())
}
