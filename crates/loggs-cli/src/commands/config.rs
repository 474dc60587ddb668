use anyhow::Result;

use loggs_core::AppConfig;

pub fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("\nTo overwrite it with defaults, run:");
        println!("  loggs config init --force");
        return Ok(());
    }

    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
