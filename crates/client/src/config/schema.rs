use serde::{Deserialize, Serialize};

/// `console.yml`: where the console finds the backend and, optionally, a
/// stored session token. Token issue happens elsewhere; the console only
/// consumes one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    pub server: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: Option<String>,
}
