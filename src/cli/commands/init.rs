//! Init command implementation
//!
//! Interactive setup wizard. Re-running it pre-fills the current values.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use crate::cli::context::CommandContext;
use crate::cli::output::Output;
use crate::cli::prompt;
use crate::core::config::{
    DEFAULT_BRANCH, DEFAULT_ENV_FILE, DEFAULT_POOLED_KEY, DEFAULT_UNPOOLED_KEY,
};
use crate::core::credentials::{Authenticator, CredentialSource, NeonctlAuth};

/// Run the init command
pub fn run_init(ctx: &CommandContext) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    let current = &ctx.stored;
    Output::header("neonbx - Neon Branch Navigator");
    println!();

    let project_id = ask(&theme, "Neon project ID", current.project_id.as_deref(), None)?;

    let api_key: String = Password::with_theme(&theme)
        .with_prompt("Neon API key (leave empty to use neonctl login)")
        .allow_empty_password(true)
        .interact()?;

    let env_file_path = ask(
        &theme,
        "Path to your .env file",
        current.env_file_path.as_deref(),
        Some(DEFAULT_ENV_FILE),
    )?;
    let pooled_key = ask(
        &theme,
        "Pooled database URL env key",
        current.pooled_key.as_deref(),
        Some(DEFAULT_POOLED_KEY),
    )?;
    let unpooled_key = ask(
        &theme,
        "Unpooled database URL env key",
        current.unpooled_key.as_deref(),
        Some(DEFAULT_UNPOOLED_KEY),
    )?;
    let default_branch = ask(
        &theme,
        "Default Neon branch for git main/master",
        current.default_branch.as_deref(),
        Some(DEFAULT_BRANCH),
    )?;

    let mut stored = current.clone();
    stored.set("projectId", &project_id)?;
    if !api_key.trim().is_empty() {
        stored.set("apiKey", &api_key)?;
    }
    stored.set("envFilePath", &env_file_path)?;
    stored.set("pooledKey", &pooled_key)?;
    stored.set("unpooledKey", &unpooled_key)?;
    stored.set("defaultBranch", &default_branch)?;
    stored.save(&ctx.config_path)?;
    Output::success("Configuration saved.");
    Output::note(&format!("Config file: {}", ctx.config_path.display()));

    if let Some(config) = stored.require() {
        let source = CredentialSource::from_env(&config);
        if !source.has_credentials()
            && prompt::confirm("No Neon credentials found. Authenticate with neonctl now?")?
        {
            NeonctlAuth.authenticate()?;
            Output::success("Authenticated with Neon.");
        }
    }

    Output::info("You're all set! Run `neonbx list` to see your branches.");
    Ok(())
}

fn ask(
    theme: &ColorfulTheme,
    prompt: &str,
    current: Option<&str>,
    fallback: Option<&str>,
) -> anyhow::Result<String> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if let Some(initial) = current.or(fallback) {
        input = input.with_initial_text(initial);
    }
    let value = input
        .validate_with(|v: &String| -> Result<(), String> {
            if v.trim().is_empty() {
                Err(format!("{} is required.", prompt))
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}
