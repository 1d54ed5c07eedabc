use crate::{error::MonitorError, Notifier};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Files issues through the GitHub REST API.
pub struct GithubNotifier {
    client: reqwest::Client,
    api: String,
    token: String,
    owner: String,
    repo: String,
}

impl GithubNotifier {
    /// `repository` is the `owner/repo` slug as exported in `GITHUB_REPOSITORY`.
    pub fn new(api: &str, token: &str, repository: &str) -> Result<GithubNotifier, MonitorError> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| MonitorError::Repository(repository.to_string()))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GithubNotifier {
            client,
            api: api.trim_end_matches('/').to_string(),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.api, self.owner, self.repo)
    }
}

#[async_trait::async_trait]
impl Notifier for GithubNotifier {
    async fn notify(&self, issue: &Issue) -> Result<String, MonitorError> {
        let url = self.issues_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(issue)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiError>().await {
                Ok(e) => e.message,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(MonitorError::IssueRejected { status, message });
        }

        Ok(response.json::<CreatedIssue>().await?.html_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_issues_url() {
        let n = GithubNotifier::new("https://api.github.com/", "t", "octo/watch").unwrap();
        assert_eq!(n.issues_url(), "https://api.github.com/repos/octo/watch/issues");
    }

    #[test]
    fn test_invalid_repository() {
        for slug in ["octo", "/watch", "octo/", "a/b/c"] {
            assert!(matches!(
                GithubNotifier::new(GITHUB_API, "t", slug),
                Err(MonitorError::Repository(_))
            ));
        }
    }

    #[test]
    fn test_issue_payload() {
        let issue = Issue {
            title: "t".to_string(),
            body: "b".to_string(),
            labels: vec!["auto-generated".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            serde_json::json!({"title": "t", "body": "b", "labels": ["auto-generated"]})
        );
    }
}
