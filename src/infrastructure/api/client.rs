//! HTTP client for the advisory feed endpoint

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::advisory::Advisory;

/// One configured advisory API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub url: String,
}

impl ApiEndpoint {
    /// Accepts bare host:port values and defaults the scheme to http.
    pub fn new(url: &str) -> Self {
        let trimmed = url.trim();
        let url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };
        Self {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn display(&self) -> String {
        self.url.clone()
    }

    /// Full URL of the advisories listing.
    pub fn advisories_url(&self) -> String {
        format!("{}/api/advisories", self.url)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("advisory endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("advisory payload is not a JSON array: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Seam between the worker and the advisory backend.
#[async_trait]
pub trait AdvisorySource: Send + Sync {
    async fn fetch_advisories(&self) -> Result<Vec<Advisory>, ApiError>;

    fn endpoint(&self) -> String;
}

pub struct HttpAdvisorySource {
    http: reqwest::Client,
    endpoint: ApiEndpoint,
}

impl HttpAdvisorySource {
    pub fn new(endpoint: ApiEndpoint) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl AdvisorySource for HttpAdvisorySource {
    async fn fetch_advisories(&self) -> Result<Vec<Advisory>, ApiError> {
        let response = self.http.get(self.endpoint.advisories_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        // Decode from the body text so transport and parse failures stay
        // distinguishable.
        let body = response.text().await?;
        let advisories: Vec<Advisory> = serde_json::from_str(&body)?;
        Ok(advisories)
    }

    fn endpoint(&self) -> String {
        self.endpoint.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalization() {
        assert_eq!(
            ApiEndpoint::new("localhost:5000").url,
            "http://localhost:5000"
        );
        assert_eq!(
            ApiEndpoint::new("https://intel.example/").url,
            "https://intel.example"
        );
    }

    #[test]
    fn test_advisories_url() {
        let endpoint = ApiEndpoint::new("http://127.0.0.1:5000");
        assert_eq!(
            endpoint.advisories_url(),
            "http://127.0.0.1:5000/api/advisories"
        );
    }
}
