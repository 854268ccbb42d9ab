//! config command - Show the effective configuration

use crate::cli::Context;
use anyhow::{Context as _, Result};

/// Print where configuration came from and the values in effect.
pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    if ctx.json {
        let value = serde_json::json!({
            "path": config.path().map(|p| p.display().to_string()),
            "log_filter": config.log_filter(),
            "id_length": config.id_length(),
            "root_message": config.root_message(),
            "json_output": config.json_output(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match config.path() {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# no config file found; showing defaults"),
    }
    let rendered = config
        .to_effective_toml()
        .context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
