use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use hivemon_client::config::{self, ConsoleConfig};
use hivemon_client::ApiClient;
use hivemon_common::condition::{
    ConditionSet, Operator, Parameter, TriggerCondition, MAX_CONDITIONS,
};

pub fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("hivemon").join("console.yml");
    }
    PathBuf::from("/etc/hivemon/console.yml")
}

pub fn load_config(config_path: Option<&str>) -> Result<ConsoleConfig> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    config::load_from_file(&path)
        .with_context(|| format!("loading config from {}", path.display()))
}

pub fn resolve_server(server_flag: Option<&str>, config_path: Option<&str>) -> Result<String> {
    if let Some(s) = server_flag {
        return Ok(s.trim_end_matches('/').to_string());
    }
    let cfg = load_config(config_path)?;
    Ok(cfg.server.trim_end_matches('/').to_string())
}

/// Builds the API client from flags, environment, and config file. A missing
/// token is not an error here; every call fails cleanly before the network
/// when no credential is available.
pub fn build_client(server_flag: Option<&str>, config_path: Option<&str>) -> Result<ApiClient> {
    let server = resolve_server(server_flag, config_path)?;
    let file_token = load_config(config_path)
        .ok()
        .and_then(|cfg| cfg.auth.token);
    let token = config::resolve_token(file_token.as_deref());
    Ok(ApiClient::new(&server, token))
}

/// Parses the `--condition` shorthand, e.g. `temperature>38` or
/// `humidity<=40.5`.
pub fn parse_condition(spec: &str) -> Result<TriggerCondition> {
    // two-character operators first so ">=" is not split at ">"
    let found = spec
        .find(">=")
        .map(|i| (i, Operator::GreaterOrEqual))
        .or_else(|| spec.find("<=").map(|i| (i, Operator::LessOrEqual)))
        .or_else(|| spec.find('>').map(|i| (i, Operator::GreaterThan)))
        .or_else(|| spec.find('<').map(|i| (i, Operator::LessThan)));

    let Some((at, operator)) = found else {
        bail!("invalid condition '{spec}': expected <parameter><operator><value>");
    };

    let parameter = Parameter::from_str(spec[..at].trim())
        .map_err(|e| anyhow::anyhow!("invalid condition '{spec}': {e}"))?;

    let value = spec[at + operator.symbol().len()..].trim();
    if value.is_empty() || value.parse::<f64>().is_err() {
        bail!("invalid condition '{spec}': threshold must be a number");
    }

    Ok(TriggerCondition::new(parameter, operator, value))
}

pub fn parse_condition_set(specs: &[String]) -> Result<ConditionSet> {
    if specs.len() > MAX_CONDITIONS {
        bail!("at most {MAX_CONDITIONS} trigger conditions are allowed");
    }
    let mut conditions = Vec::with_capacity(specs.len());
    for spec in specs {
        conditions.push(parse_condition(spec)?);
    }
    Ok(ConditionSet::from_conditions(conditions))
}
