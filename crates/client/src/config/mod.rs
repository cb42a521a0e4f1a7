mod loader;
mod schema;

pub use loader::{load_from_file, load_from_str, LoadError};
pub use schema::{AuthConfig, ConsoleConfig};

/// Environment variable that overrides the token stored in the config file.
pub const TOKEN_ENV: &str = "HIVEMON_TOKEN";

/// The bearer token the console should use: the environment wins over the
/// config file, matching how operators hand a fresh session token to a
/// one-off command.
pub fn resolve_token(file_token: Option<&str>) -> Option<String> {
    if let Ok(t) = std::env::var(TOKEN_ENV) {
        if !t.is_empty() {
            return Some(t);
        }
    }
    file_token
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}
