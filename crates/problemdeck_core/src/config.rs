//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::text::normalize_optional_nonempty;
use serde::Deserialize;
use std::env;

/// Environment variable selecting the remote endpoint root.
pub const API_BASE_URL_ENV: &str = "PROBLEMDECK_API_BASE_URL";
/// Environment variable overriding the transport timeout (seconds).
pub const TIMEOUT_ENV: &str = "PROBLEMDECK_TIMEOUT_SECS";
/// Environment variable that pre-answers confirmation prompts.
pub const ASSUME_YES_ENV: &str = "PROBLEMDECK_ASSUME_YES";

/// Runtime configuration for ProblemDeck clients.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            assume_yes: false,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment; missing or unrecognized is `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Strip trailing slashes so path segments can be appended uniformly.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Pick the explicit base URL when it is non-blank, else the literal default.
pub fn resolve_base_url(explicit: Option<String>) -> String {
    let chosen = normalize_optional_nonempty(explicit)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    normalize_base_url(&chosen)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let timeout_secs = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            api_base_url: resolve_base_url(env::var(API_BASE_URL_ENV).ok()),
            timeout_secs,
            assume_yes: env_flag_enabled(ASSUME_YES_ENV),
        }
    }

    /// Apply command-line overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        assume_yes: bool,
    ) -> Self {
        if let Some(url) = normalize_optional_nonempty(base_url) {
            self.api_base_url = normalize_base_url(&url);
        }
        if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
            self.timeout_secs = secs;
        }
        self.assume_yes |= assume_yes;
        self
    }
}
