use anyhow::Result;
use clap::Subcommand;

use super::helpers;
use crate::output::{build_table, print_json, print_success, spinner, theme, OutputMode};

#[derive(Subcommand)]
pub enum HivesCmd {
    List,
}

pub async fn execute(
    cmd: HivesCmd,
    mode: OutputMode,
    server: Option<String>,
    config_path: Option<String>,
) -> Result<()> {
    match cmd {
        HivesCmd::List => list(mode, server, config_path).await,
    }
}

async fn list(
    mode: OutputMode,
    server: Option<String>,
    config_path: Option<String>,
) -> Result<()> {
    let api = helpers::build_client(server.as_deref(), config_path.as_deref())?;

    let sp = match mode {
        OutputMode::Human => Some(spinner::create("Fetching hives...")),
        OutputMode::Json => None,
    };

    let hives = api.list_hives().await?;

    if let Some(sp) = sp {
        spinner::finish_clear(&sp);
    }

    match mode {
        OutputMode::Json => print_json(&hives)?,
        OutputMode::Human => {
            if hives.is_empty() {
                print_success("No hives registered");
                return Ok(());
            }
            theme::print_header("Hives");
            let mut table = build_table(&["ID", "Name", "Location"]);
            for h in &hives {
                table.add_row(vec![h.id.as_str(), h.name.as_str(), h.location.as_str()]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
