//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Address the web UI listens on when none is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:7860";

/// Base URL of the hosted inference service. Models live under `/models/{repo_id}`.
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference";

/// Base URL of the model hub, used to check models at startup.
pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";

/// Per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Credential provider name for the model hub.
pub const PROVIDER: &str = "huggingface";

/// Environment variable consulted when no token is stored.
pub const TOKEN_ENV: &str = "HF_TOKEN";

/// Default database path: `~/.qa-compare/qa-compare.db`.
/// Single DB for credentials and config.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".qa-compare")
        .join("qa-compare.db")
}
