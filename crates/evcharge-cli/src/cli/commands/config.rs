//! Config command handlers.

use anyhow::{Context, Result};
use evcharge_core::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let config_path = paths::config_path();
    if force {
        Config::init_force(&config_path)
    } else {
        Config::init(&config_path)
    }
    .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}
