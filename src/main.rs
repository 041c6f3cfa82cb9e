mod cli;
mod core;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "costwatch",
    about = "AWS cost report notifier for Slack",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: ~/.config/costwatch/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch yesterday's cost and the monthly forecast, then post to Slack
    Report {
        /// Render the report to stdout instead of delivering it
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let output_opts = cli::output::OutputOptions {
        use_color: cli::output::detect_color(!cli.no_color),
        verbose: cli.verbose,
    };
    let config_path = cli.config.as_deref();

    match cli.command {
        None | Some(Commands::Report { .. }) => {
            let dry_run = match cli.command {
                Some(Commands::Report { dry_run }) => dry_run,
                _ => false,
            };
            cli::report_cmd::run(config_path, dry_run, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init()?,
            ConfigAction::Check => cli::config_cmd::check(config_path)?,
        },
    }

    Ok(())
}
