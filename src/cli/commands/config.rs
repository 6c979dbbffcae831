//! Config command implementation
//!
//! Shows, sets and clears the stored configuration.

use crate::cli::context::CommandContext;
use crate::cli::output::Output;
use crate::cli::prompt;
use crate::core::config::{mask_secret, StoredConfig, CONFIG_KEYS};

/// Run `config show`
pub fn run_config_show(ctx: &CommandContext) -> anyhow::Result<()> {
    if !ctx.stored.is_initialized() {
        Output::warning("No configuration found. Run `neonbx init` first.");
        Output::note(&format!("Config file: {}", ctx.config_path.display()));
        return Ok(());
    }

    Output::header("neonbx configuration");
    for key in CONFIG_KEYS {
        let value = match ctx.stored.get(key)? {
            Some(v) if *key == "apiKey" => mask_secret(v),
            Some(v) => v.to_string(),
            None => Output::not_set(),
        };
        Output::kv(key, &value);
    }
    println!();
    Output::note(&format!("Config file: {}", ctx.config_path.display()));
    Ok(())
}

/// Run `config set <key> <value>`
pub fn run_config_set(ctx: &CommandContext, key: &str, value: &str) -> anyhow::Result<()> {
    let mut stored = ctx.stored.clone();
    stored.set(key, value)?;
    stored.save(&ctx.config_path)?;

    let shown = if key == "apiKey" {
        mask_secret(value.trim())
    } else {
        value.trim().to_string()
    };
    Output::success(&format!("Set {} = {}", Output::key(key), shown));
    Ok(())
}

/// Run `config reset`
pub fn run_config_reset(ctx: &CommandContext, yes: bool) -> anyhow::Result<()> {
    if !yes && !prompt::confirm("Are you sure you want to clear all config?")? {
        Output::info("Reset cancelled.");
        return Ok(());
    }
    StoredConfig::clear(&ctx.config_path)?;
    Output::success("Configuration cleared.");
    Ok(())
}
