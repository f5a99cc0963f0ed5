//! GitHub credentials
//!
//! Tokens are passed explicitly into every fetch; nothing is stored globally.

/// Environment variable holding the default token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Opaque GitHub access token
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubToken(String);

impl GitHubToken {
    /// Wrap a token; blank strings are treated as absent
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(TOKEN_ENV).ok().and_then(Self::new)
    }

    /// A token supplied with the request wins over the configured default
    pub fn resolve(request_token: Option<&str>, default: Option<&GitHubToken>) -> Option<Self> {
        request_token
            .and_then(Self::new)
            .or_else(|| default.cloned())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GitHubToken(***)")
    }
}
