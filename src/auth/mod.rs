pub mod storage;

pub use storage::AuthStorage;

use anyhow::{Context, Result, bail};
use storage::Credential;

/// Providers that accept a stored token.
const SUPPORTED_PROVIDERS: &[&str] = &["huggingface"];

/// Save an access token for a provider, replacing any previous one.
pub fn login(db_path: &str, provider: &str, token: &str) -> Result<()> {
    if !SUPPORTED_PROVIDERS.contains(&provider) {
        bail!("unsupported provider: {provider}");
    }
    let token = token.trim();
    if token.is_empty() {
        bail!("no token provided");
    }
    let storage = AuthStorage::open(db_path).context("failed to open auth storage")?;
    storage
        .set(
            provider,
            Credential::ApiKey {
                key: token.to_string(),
            },
        )
        .context("failed to save credentials")?;
    Ok(())
}

/// Remove stored credentials for a provider.
pub fn logout(db_path: &str, provider: &str) -> Result<()> {
    let storage = AuthStorage::open(db_path).context("failed to open auth storage")?;
    storage
        .remove(provider)
        .context("failed to remove credentials")?;
    Ok(())
}
