use anyhow::Result;
use clap::Subcommand;

use hivemon_client::config::TOKEN_ENV;

use super::helpers;
use crate::output::{print_error, print_json, print_success, theme, OutputMode};

#[derive(Subcommand)]
pub enum ConfigCmd {
    Show,
    Validate,
    Path,
}

pub async fn execute(cmd: ConfigCmd, mode: OutputMode, config_path: Option<String>) -> Result<()> {
    match cmd {
        ConfigCmd::Show => show(mode, config_path),
        ConfigCmd::Validate => validate(mode, config_path),
        ConfigCmd::Path => path(config_path),
    }
}

fn show(mode: OutputMode, config_path: Option<String>) -> Result<()> {
    let cfg = helpers::load_config(config_path.as_deref())?;
    let file_token_set = cfg.auth.token.as_deref().is_some_and(|t| !t.is_empty());
    let env_token_set = std::env::var(TOKEN_ENV).map(|t| !t.is_empty()).unwrap_or(false);

    match mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "server": cfg.server,
            "token_in_file": file_token_set,
            "token_in_env": env_token_set,
        }))?,
        OutputMode::Human => {
            theme::print_header("Console Configuration");
            theme::print_kv("Server", &cfg.server);

            theme::print_section("Credential");
            theme::print_kv("Config file", if file_token_set { "<set>" } else { "<not set>" });
            theme::print_kv(TOKEN_ENV, if env_token_set { "<set>" } else { "<not set>" });
            println!();
        }
    }

    Ok(())
}

fn validate(mode: OutputMode, config_path: Option<String>) -> Result<()> {
    match helpers::load_config(config_path.as_deref()) {
        Ok(_) => match mode {
            OutputMode::Json => print_json(&serde_json::json!({"valid": true}))?,
            OutputMode::Human => print_success("Configuration is valid"),
        },
        Err(e) => match mode {
            OutputMode::Json => {
                print_json(&serde_json::json!({"valid": false, "error": e.to_string()}))?;
            }
            OutputMode::Human => print_error(&format!("Invalid configuration: {e}")),
        },
    }

    Ok(())
}

fn path(config_path: Option<String>) -> Result<()> {
    let p = config_path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(helpers::default_config_path);

    println!("{}", p.display());
    Ok(())
}
