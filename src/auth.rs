//! Opaque bearer-token seam. Token issuance lives elsewhere; this crate
//! only attaches whatever the provider hands back.

use async_trait::async_trait;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token, or `None` for unauthenticated
    /// requests.
    async fn token(&self) -> anyhow::Result<Option<String>>;
}

/// Fixed token, e.g. from configuration or a CLI environment variable.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> anyhow::Result<Option<String>> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_tokens_collapse_to_none() {
        assert_eq!(StaticToken::new(Some("  ".to_owned())).token().await.unwrap(), None);
        assert_eq!(
            StaticToken::new(Some(" abc ".to_owned())).token().await.unwrap(),
            Some("abc".to_owned())
        );
        assert_eq!(StaticToken::new(None).token().await.unwrap(), None);
    }
}
