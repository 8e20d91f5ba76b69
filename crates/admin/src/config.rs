//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BAZAAR_API_URL` - Base URL of the remote API (fallback: `BACKEND_URL`,
//!   default: `http://localhost:4000`)
//! - `BAZAAR_API_TOKEN` - Bearer token; takes precedence over the token file
//! - `BAZAAR_TOKEN_FILE` - File holding the persisted bearer token
//!   (default: `.bazaar-token`)
//! - `BAZAAR_DECK_URL` - Presentation generator endpoint
//!   (default: `<api>/api/v1/ppt/generate`)
//! - `BAZAAR_SUBMISSION_POLICY` - `last-write-wins` (default) or
//!   `reject-while-pending`
//! - `BAZAAR_REPORT_UTC_OFFSET` - Offset report days are evaluated in
//!   (e.g. `+05:30`, default: `+00:00`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::path::PathBuf;

use chrono::FixedOffset;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::store::SubmissionPolicy;

const DEFAULT_API_URL: &str = "http://localhost:4000";
const DEFAULT_TOKEN_FILE: &str = ".bazaar-token";
const DECK_PATH: &str = "/api/v1/ppt/generate";
/// Tokens below this many bits of entropy per character are reported as weak.
const MIN_TOKEN_ENTROPY: f64 = 3.3;

/// Fragments of copy-pasted sample values (matched case-insensitively).
const PLACEHOLDER_TOKENS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "enter-",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin console configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Remote API configuration
    pub api: ApiConfig,
    /// How concurrent submissions on the same resource are handled
    pub submission_policy: SubmissionPolicy,
    /// Offset report date ranges are evaluated in
    pub report_offset: FixedOffset,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Remote API configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto
    pub base_url: Url,
    /// Where the bearer token comes from
    pub token: TokenConfig,
    /// Presentation generator endpoint
    pub deck_url: Url,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token)
            .field("deck_url", &self.deck_url.as_str())
            .finish()
    }
}

/// Source of the bearer token attached to API requests.
#[derive(Clone)]
pub enum TokenConfig {
    /// No credential; requests go out without an `Authorization` header.
    Anonymous,
    /// Token provided directly through the environment.
    Static(SecretString),
    /// Token persisted on disk, re-read before every request.
    File(PathBuf),
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Static(_) => f.debug_tuple("Static").field(&"[REDACTED]").finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let api = ApiConfig::from_env(&env)?;
        let submission_policy = env
            .get_or_default("BAZAAR_SUBMISSION_POLICY", "last-write-wins")
            .parse::<SubmissionPolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_SUBMISSION_POLICY".to_string(), e))?;
        let report_offset = env
            .get("BAZAAR_REPORT_UTC_OFFSET")
            .map_or_else(|| Ok(utc()), |raw| parse_utc_offset(&raw))
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_REPORT_UTC_OFFSET".to_string(), e))?;

        let sentry_dsn = env.get("SENTRY_DSN");
        let sentry_environment = env.get("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .get("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .get("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api,
            submission_policy,
            report_offset,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns a reference to the remote API configuration.
    #[must_use]
    pub const fn api(&self) -> &ApiConfig {
        &self.api
    }
}

impl ApiConfig {
    /// Configuration pointing at `base_url` that sends no credential.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_url("BAZAAR_API_URL", base_url)?;
        let deck_url = deck_url_for(&base_url)?;
        Ok(Self {
            base_url,
            token: TokenConfig::Anonymous,
            deck_url,
        })
    }

    /// Replace the token source.
    #[must_use]
    pub fn with_token(mut self, token: TokenConfig) -> Self {
        self.token = token;
        self
    }

    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let raw_url = env
            .get("BAZAAR_API_URL")
            .or_else(|| env.get("BACKEND_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = parse_url("BAZAAR_API_URL", &raw_url)?;

        let token = if let Some(token) = env.get("BAZAAR_API_TOKEN") {
            // Weak-looking tokens are allowed but flagged
            if let Some(reason) = weak_token_reason(&token) {
                tracing::warn!(%reason, "BAZAAR_API_TOKEN looks weak");
            }
            TokenConfig::Static(SecretString::from(token))
        } else {
            TokenConfig::File(PathBuf::from(
                env.get_or_default("BAZAAR_TOKEN_FILE", DEFAULT_TOKEN_FILE),
            ))
        };

        let deck_url = match env.get("BAZAAR_DECK_URL") {
            Some(raw) => parse_url("BAZAAR_DECK_URL", &raw)?,
            None => deck_url_for(&base_url)?,
        };

        Ok(Self {
            base_url,
            token,
            deck_url,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Borrowed variable lookup with the usual helpers.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable, treating blank values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(var.to_string(), e.to_string()))
}

/// Append the deck path to the API base, keeping any path prefix it carries.
fn deck_url_for(base_url: &Url) -> Result<Url, ConfigError> {
    let joined = format!("{}{DECK_PATH}", base_url.as_str().trim_end_matches('/'));
    parse_url("BAZAAR_DECK_URL", &joined)
}

fn utc() -> FixedOffset {
    chrono::Offset::fix(&chrono::Utc)
}

/// Parse `+HH:MM` / `-HH:MM` (or `Z`) into a fixed offset.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }

    let invalid = || format!("expected +HH:MM or -HH:MM, got '{raw}'");

    let (sign, rest) = match raw.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Bits of entropy per character of `token`, by character frequency.
fn entropy_per_char(token: &str) -> f64 {
    let mut chars: Vec<char> = token.chars().collect();
    if chars.is_empty() {
        return 0.0;
    }
    chars.sort_unstable();

    #[allow(clippy::cast_precision_loss)]
    let total = chars.len() as f64;
    chars
        .chunk_by(|a, b| a == b)
        .map(|run| {
            #[allow(clippy::cast_precision_loss)]
            let share = run.len() as f64 / total;
            -share * share.log2()
        })
        .sum()
}

/// Why `token` looks like a sample value or a guessable string, if it does.
fn weak_token_reason(token: &str) -> Option<String> {
    let lower = token.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_TOKENS.iter().find(|p| lower.contains(*p)) {
        return Some(format!("contains placeholder text '{fragment}'"));
    }

    let entropy = entropy_per_char(token);
    (entropy < MIN_TOKEN_ENTROPY)
        .then(|| format!("only {entropy:.2} bits of entropy per character"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:4000/");
        assert_eq!(
            config.api.deck_url.as_str(),
            "http://localhost:4000/api/v1/ppt/generate"
        );
        assert!(matches!(&config.api.token, TokenConfig::File(p) if p == &PathBuf::from(".bazaar-token")));
        assert_eq!(config.submission_policy, SubmissionPolicy::LastWriteWins);
        assert_eq!(config.report_offset.local_minus_utc(), 0);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_backend_url_fallback() {
        let config = config_from(&[("BACKEND_URL", "https://api.example.test")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.example.test/");

        let config = config_from(&[
            ("BAZAAR_API_URL", "https://primary.test"),
            ("BACKEND_URL", "https://fallback.test"),
        ])
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://primary.test/");
    }

    #[test]
    fn test_invalid_api_url() {
        let err = config_from(&[("BAZAAR_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "BAZAAR_API_URL"));
    }

    #[test]
    fn test_static_token_takes_precedence() {
        let config = config_from(&[
            ("BAZAAR_API_TOKEN", "eyJhbGciOiJIUzI1NiJ9.k3Y9.q8Zx"),
            ("BAZAAR_TOKEN_FILE", "/tmp/token"),
        ])
        .unwrap();
        match &config.api.token {
            TokenConfig::Static(secret) => {
                assert_eq!(secret.expose_secret(), "eyJhbGciOiJIUzI1NiJ9.k3Y9.q8Zx");
            }
            other => panic!("expected static token, got {other:?}"),
        }
    }

    #[test]
    fn test_submission_policy_parsing() {
        let config = config_from(&[("BAZAAR_SUBMISSION_POLICY", "reject-while-pending")]).unwrap();
        assert_eq!(config.submission_policy, SubmissionPolicy::RejectWhilePending);

        let err = config_from(&[("BAZAAR_SUBMISSION_POLICY", "first-wins")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_report_offset_parsing() {
        let config = config_from(&[("BAZAAR_REPORT_UTC_OFFSET", "+05:30")]).unwrap();
        assert_eq!(config.report_offset.local_minus_utc(), 19_800);

        assert_eq!(parse_utc_offset("-04:00").unwrap().local_minus_utc(), -14_400);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("0530").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
    }

    #[test]
    fn test_explicit_deck_url() {
        let config = config_from(&[("BAZAAR_DECK_URL", "https://decks.test/generate")]).unwrap();
        assert_eq!(config.api.deck_url.as_str(), "https://decks.test/generate");
    }

    #[test]
    fn test_entropy_per_char() {
        assert!(entropy_per_char("").abs() < f64::EPSILON);
        assert!((entropy_per_char("abab") - 1.0).abs() < 1e-9);
        assert!(entropy_per_char("aaaa").abs() < f64::EPSILON);
    }

    #[test]
    fn test_weak_token_reasons() {
        assert!(
            weak_token_reason("Your-Token-Here")
                .unwrap()
                .contains("placeholder")
        );
        assert!(weak_token_reason("abcabcabc").unwrap().contains("entropy"));
        assert!(weak_token_reason("eyJhbGciOiJIUzI1NiJ9.k3Y9.q8Zx").is_none());
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = ApiConfig::new("http://localhost:4000")
            .unwrap()
            .with_token(TokenConfig::Static(SecretString::from("super-secret-bearer")));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:4000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-bearer"));
    }
}
