//! GitHub Releases API release index

use std::collections::HashSet;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_API_URL, HTTP_TIMEOUT_MS};
use crate::release::error::IndexError;
use crate::release::index::ReleaseIndex;
use crate::release::types::ReleaseEntry;
use crate::version::semver::parse_concrete_version;

/// Releases requested per page (GitHub maximum)
const PER_PAGE: u32 = 100;

/// Response from GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    assets: Vec<Asset>,
}

/// Downloadable file attached to a GitHub release
#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// Release index backed by `GET /repos/{owner}/{tool}/releases`
pub struct GitHubReleaseIndex {
    client: reqwest::Client,
    base_url: String,
    owner: String,
    token: Option<String>,
}

impl GitHubReleaseIndex {
    /// Creates a new GitHubReleaseIndex with a custom base URL
    pub fn new(base_url: &str, owner: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("setup-go-actions")
                .timeout(Duration::from_millis(HTTP_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            token: None,
        }
    }

    /// Creates an index against api.github.com
    pub fn github(owner: &str) -> Self {
        Self::new(DEFAULT_API_URL, owner)
    }

    /// Authenticate API requests, raising the rate limit
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }
}

#[async_trait::async_trait]
impl ReleaseIndex for GitHubReleaseIndex {
    async fn list_releases(&self, tool_name: &str) -> Result<Vec<ReleaseEntry>, IndexError> {
        let url = format!(
            "{}/repos/{}/{}/releases?per_page={}",
            self.base_url, self.owner, tool_name, PER_PAGE
        );
        debug!(%url, "Fetching release index");

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(IndexError::NotFound(format!("{}/{}", self.owner, tool_name)));
        }

        let rate_limited = status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN
                && response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .is_some_and(|v| v.as_bytes() == b"0"));
        if rate_limited {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(IndexError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(IndexError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let releases: Vec<Release> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub releases response: {}", e);
            IndexError::InvalidResponse(e.to_string())
        })?;

        Ok(into_entries(releases))
    }
}

/// Convert API releases into entries, keeping the first release seen for each version.
fn into_entries(releases: Vec<Release>) -> Vec<ReleaseEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(releases.len());

    for release in releases {
        if release.draft {
            debug!(tag = %release.tag_name, "Skipping draft release");
            continue;
        }
        let Some(version) = parse_concrete_version(&release.tag_name) else {
            debug!(tag = %release.tag_name, "Skipping release without a concrete version");
            continue;
        };
        if !seen.insert(version.clone()) {
            debug!(tag = %release.tag_name, "Skipping duplicate release");
            continue;
        }

        let assets: IndexMap<String, String> = release
            .assets
            .into_iter()
            .map(|asset| (asset.name, asset.browser_download_url))
            .collect();
        entries.push(ReleaseEntry::new(version, assets));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use semver::Version;

    #[tokio::test]
    async fn list_releases_returns_entries_with_assets() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {
                        "tag_name": "v0.5.0",
                        "draft": false,
                        "assets": [
                            {"name": "actions_0.5.0_linux_amd64.tar.gz", "browser_download_url": "https://dl/linux"},
                            {"name": "actions_0.5.0_darwin_amd64.tar.gz", "browser_download_url": "https://dl/darwin"}
                        ]
                    },
                    {"tag_name": "v0.4.0", "assets": []}
                ]"#,
            )
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("go-actions").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].version, Version::new(0, 5, 0));
        assert_eq!(
            result[0].assets.get("actions_0.5.0_linux_amd64.tar.gz"),
            Some(&"https://dl/linux".to_string())
        );
        assert_eq!(result[1].version, Version::new(0, 4, 0));
        assert!(result[1].assets.is_empty());
    }

    #[tokio::test]
    async fn list_releases_skips_drafts_prereleases_and_duplicates() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v0.6.0", "draft": true, "assets": []},
                    {"tag_name": "v0.6.0-rc.1", "assets": []},
                    {"tag_name": "nightly", "assets": []},
                    {"tag_name": "v0.5.0", "assets": [{"name": "first", "browser_download_url": "https://dl/first"}]},
                    {"tag_name": "0.5.0", "assets": [{"name": "second", "browser_download_url": "https://dl/second"}]}
                ]"#,
            )
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("go-actions").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].version, Version::new(0, 5, 0));
        assert!(result[0].assets.contains_key("first"));
    }

    #[tokio::test]
    async fn list_releases_sends_bearer_token_when_configured() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev")
            .with_token(Some("secret".to_string()));
        let result = index.list_releases("go-actions").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn list_releases_returns_not_found_for_nonexistent_repo() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/missing/releases")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("missing").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(IndexError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_releases_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("retry-after", "60")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("go-actions").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(IndexError::RateLimited {
                retry_after_secs: Some(60)
            })
        ));
    }

    #[tokio::test]
    async fn list_releases_returns_rate_limited_for_exhausted_403() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("go-actions").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(IndexError::RateLimited {
                retry_after_secs: None
            })
        ));
    }

    #[tokio::test]
    async fn list_releases_returns_invalid_response_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"not": "an array"}"#)
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("go-actions").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(IndexError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn list_releases_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("go-actions").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(IndexError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn list_releases_treats_403_with_remaining_quota_as_invalid_response() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/variantdev/go-actions/releases")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("retry-after", "30")
            .with_header("x-ratelimit-remaining", "42")
            .with_body(r#"{"message": "Resource not accessible"}"#)
            .create_async()
            .await;

        let index = GitHubReleaseIndex::new(&server.url(), "variantdev");
        let result = index.list_releases("go-actions").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(IndexError::InvalidResponse(_))));
    }
}
