/// Base URL used when `RESEARCH_API_URL` is not set.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "RESEARCH_API_URL";

/// Where the research API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        let trimmed = api_base.trim().trim_end_matches('/');
        let api_base = if trimmed.is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            trimmed.to_string()
        };
        Self { api_base }
    }

    /// Reads `RESEARCH_API_URL` (loading `.env` first when present).
    #[cfg(feature = "native")]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(API_URL_ENV) {
            Ok(base) => Self::new(base),
            Err(_) => Self::default(),
        }
    }

    /// Joins `path` (which starts with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ClientConfig::new("http://papers.local/api///");
        assert_eq!(config.url("/groups"), "http://papers.local/api/groups");
    }

    #[test]
    fn blank_base_uses_default() {
        assert_eq!(ClientConfig::new("  ").api_base, DEFAULT_API_BASE);
    }
}
