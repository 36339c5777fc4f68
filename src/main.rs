// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::RunOptions;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_path = cli.db_path;

    match cli.command {
        Some(Commands::Init) => commands::cmd_init(&db_path),
        Some(Commands::Import { file }) => commands::cmd_import(&db_path, &file),
        Some(Commands::Migrate {
            dry_run,
            post_type,
            status,
            limit,
            jobs,
            resume,
            report_unchanged,
            log_dir,
            json,
        }) => {
            let config = RunOptions {
                dry_run,
                post_type,
                status,
                limit,
                jobs,
                resume,
                report_unchanged,
            }
            .into_config()?;
            commands::cmd_migrate(&db_path, &config, log_dir.as_deref(), json)
        }
        Some(Commands::Reset {
            dry_run,
            post_type,
            status,
            limit,
            jobs,
            json,
        }) => {
            let config = RunOptions {
                dry_run,
                post_type,
                status,
                limit,
                jobs,
                resume: false,
                report_unchanged: false,
            }
            .into_config()?;
            commands::cmd_reset(&db_path, &config, json)
        }
        Some(Commands::Status) => commands::cmd_status(&db_path),
        None => {
            println!("shortcode-migrate v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'shortcode-migrate --help' for usage information");
            Ok(())
        }
    }
}
