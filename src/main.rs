//! neonbx CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use neonbx::cli::commands;
use neonbx::cli::CommandContext;
use neonbx::neon::DEFAULT_API_URL;
use neonbx::telemetry::{init_telemetry, TelemetryConfig};

#[derive(Parser)]
#[command(name = "neonbx")]
#[command(author, version, about = "Neon Database Branch Navigator", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Neon API base URL
    #[arg(long, global = true, hide = true, env = "NEONBX_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive setup wizard (re-runnable)
    Init,
    /// Manage neonbx configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// List all Neon branches
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which branch the current DB URL points to
    Current,
    /// Switch to a different branch
    Switch {
        /// Branch name (interactive selection when omitted)
        branch: Option<String>,
    },
    /// Switch to the Neon branch matching the current git branch
    Sync,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Config key (projectId, apiKey, envFilePath, pooledKey, unpooledKey, defaultBranch, roleName, databaseName)
        key: String,
        /// New value
        value: String,
    },
    /// Clear all configuration
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    let _guard = init_telemetry(&telemetry)?;

    let Some(command) = cli.command else {
        println!("neonbx - Neon Database Branch Navigator");
        println!("Run 'neonbx --help' for usage");
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "neonbx", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = match &command {
        Commands::Init
        | Commands::Config {
            action: ConfigCommands::Reset { .. },
        } => CommandContext::load_recovering(Some(cli.api_url), cli.verbose)?,
        _ => CommandContext::load(Some(cli.api_url), cli.verbose)?,
    };

    match command {
        Commands::Init => commands::init::run_init(&ctx)?,
        Commands::Config { action } => match action {
            ConfigCommands::Show => commands::config::run_config_show(&ctx)?,
            ConfigCommands::Set { key, value } => {
                commands::config::run_config_set(&ctx, &key, &value)?
            }
            ConfigCommands::Reset { yes } => commands::config::run_config_reset(&ctx, yes)?,
        },
        Commands::List { json } => commands::list::run_list(&ctx, json).await?,
        Commands::Current => commands::current::run_current(&ctx).await?,
        Commands::Switch { branch } => {
            commands::switch::run_switch(&ctx, branch.as_deref()).await?
        }
        Commands::Sync => commands::sync::run_sync(&ctx).await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
