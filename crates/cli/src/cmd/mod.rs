mod alerts;
mod config;
mod editor;
pub(crate) mod helpers;
mod hives;
mod version;

use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    #[command(subcommand)]
    Alerts(alerts::AlertsCmd),
    #[command(subcommand)]
    Hives(hives::HivesCmd),
    #[command(subcommand)]
    Config(config::ConfigCmd),
    Version,
}

pub async fn run(opts: crate::Opts) -> Result<()> {
    let mode = opts.output_mode();
    match opts.cmd {
        Commands::Alerts(cmd) => alerts::execute(cmd, mode, opts.server, opts.config).await,
        Commands::Hives(cmd) => hives::execute(cmd, mode, opts.server, opts.config).await,
        Commands::Config(cmd) => config::execute(cmd, mode, opts.config).await,
        Commands::Version => {
            version::execute(mode);
            Ok(())
        }
    }
}
