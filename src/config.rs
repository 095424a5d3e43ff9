use anyhow::Context as _;

/// Remote backend configuration for the CLI and session plumbing.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl RemoteConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("LECTERN_BACKEND_URL")
            .context("LECTERN_BACKEND_URL is required (e.g. http://localhost:5000)")?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            anyhow::bail!("LECTERN_BACKEND_URL is empty");
        }

        let auth_token = std::env::var("LECTERN_AUTH_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            base_url,
            auth_token,
        })
    }
}
