use crate::config::GitHubConfig;
use crate::error::FetchError;
use crate::github::models::*;
use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;

/// GitHub client abstraction
pub enum GitHubClient {
    Real(RealGitHub),
    #[cfg(test)]
    Mock(MockGitHub),
}

impl GitHubClient {
    /// Create a new real GitHub client
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        Ok(GitHubClient::Real(RealGitHub::new(config)?))
    }

    /// Create a mock client for testing
    #[cfg(test)]
    pub fn mock() -> Self {
        GitHubClient::Mock(MockGitHub::new())
    }

    /// Fetch the contributor list of a repository (single attempt)
    pub fn fetch_contributors(&self, repo: &str) -> Result<Vec<RemoteContributor>, FetchError> {
        match self {
            GitHubClient::Real(client) => client.fetch_contributors(repo),
            #[cfg(test)]
            GitHubClient::Mock(client) => client.fetch_contributors(repo),
        }
    }
}

/// Contributors endpoint for a repository
pub fn contributors_url(api_base: &str, owner: &str, repo: &str) -> String {
    format!(
        "{}/repos/{}/{}/contributors",
        api_base.trim_end_matches('/'),
        owner,
        repo
    )
}

/// Parse a contributors response body
pub fn parse_contributors(url: &str, body: &str) -> Result<Vec<RemoteContributor>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Payload {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Real GitHub client over the REST API
pub struct RealGitHub {
    client: HttpClient,
    api_base: String,
    owner: String,
}

impl RealGitHub {
    /// Create a new real GitHub client
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).context("Invalid Accept header value")?,
        );

        let client = HttpClient::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout.as_duration())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(RealGitHub {
            client,
            api_base: config.api_base.clone(),
            owner: config.owner.clone(),
        })
    }

    pub fn fetch_contributors(&self, repo: &str) -> Result<Vec<RemoteContributor>, FetchError> {
        let url = contributors_url(&self.api_base, &self.owner, repo);
        debug!("GET {}", url);

        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.clone(),
            message: e.to_string(),
        };

        let response = self.client.get(&url).send().map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport)?;
        parse_contributors(&url, &body)
    }
}

/// Canned response for the mock client
#[cfg(test)]
#[derive(Debug, Clone)]
pub enum MockResponse {
    Ok(Vec<RemoteContributor>),
    Status(u16),
    Body(String),
    /// The retrieval panics instead of returning
    Panic,
}

/// Mock GitHub client for testing.
///
/// Each repository has a queue of responses; the last one repeats once the
/// queue is drained.
#[cfg(test)]
pub struct MockGitHub {
    responses: std::sync::Mutex<std::collections::HashMap<String, std::collections::VecDeque<MockResponse>>>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockGitHub {
    pub fn new() -> Self {
        MockGitHub {
            responses: std::sync::Mutex::new(std::collections::HashMap::new()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, repo: &str, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn with_contributors(self, repo: &str, contributors: Vec<RemoteContributor>) -> Self {
        self.with_response(repo, MockResponse::Ok(contributors))
    }

    /// Repositories requested so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_contributors(&self, repo: &str) -> Result<Vec<RemoteContributor>, FetchError> {
        self.calls.lock().unwrap().push(repo.to_string());

        let url = contributors_url("https://mock.github", "owner", repo);
        let response = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(repo) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match response {
            Some(MockResponse::Ok(contributors)) => Ok(contributors),
            Some(MockResponse::Status(status)) => Err(FetchError::Status { url, status }),
            Some(MockResponse::Body(body)) => parse_contributors(&url, &body),
            Some(MockResponse::Panic) => panic!("mock retrieval of {} panicked", repo),
            None => Err(FetchError::Status { url, status: 404 }),
        }
    }
}

#[cfg(test)]
pub fn contributor(login: &str, contributions: u64) -> RemoteContributor {
    RemoteContributor {
        login: login.to_string(),
        id: 0,
        avatar_url: format!("https://avatars.githubusercontent.com/{}", login),
        html_url: format!("https://github.com/{}", login),
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributors_url() {
        assert_eq!(
            contributors_url("https://api.github.com/", "orionis-framework", "framework"),
            "https://api.github.com/repos/orionis-framework/framework/contributors"
        );
    }

    #[test]
    fn test_parse_contributors_error_is_payload() {
        let err = parse_contributors("u", "{\"message\": \"Not Found\"}").unwrap_err();
        assert!(matches!(err, FetchError::Payload { .. }));
    }

    #[test]
    fn test_mock_github_queue() {
        let client = GitHubClient::Mock(
            MockGitHub::new()
                .with_response("framework", MockResponse::Status(502))
                .with_contributors("framework", vec![contributor("a", 1)]),
        );

        let first = client.fetch_contributors("framework");
        assert!(matches!(first, Err(FetchError::Status { status: 502, .. })));

        // The final response repeats
        for _ in 0..2 {
            let contributors = client.fetch_contributors("framework").unwrap();
            assert_eq!(contributors[0].login, "a");
        }
    }

    #[test]
    fn test_mock_unknown_repo_is_not_found() {
        let client = GitHubClient::mock();
        let err = client.fetch_contributors("nope").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[test]
    fn test_real_client_builds_from_defaults() {
        let config = GitHubConfig::default();
        assert!(RealGitHub::new(&config).is_ok());
    }

    #[test]
    fn test_real_client_rejects_bad_accept() {
        let config = GitHubConfig {
            accept: "bad\nvalue".to_string(),
            ..GitHubConfig::default()
        };
        assert!(RealGitHub::new(&config).is_err());
    }
}
