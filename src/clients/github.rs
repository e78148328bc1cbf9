//! GitHub Actions API client for the rebuild workflow

#[cfg(test)]
use mockall::automock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clients::USER_AGENT;
use crate::clients::error::ApiError;
use crate::config::WorkflowConfig;

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// API version pinned via `X-GitHub-Api-Version`
const API_VERSION: &str = "2022-11-28";

/// A single workflow run as returned by the runs listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkflowRun {
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub html_url: Option<String>,
}

impl WorkflowRun {
    pub fn succeeded(&self) -> bool {
        self.conclusion.as_deref() == Some("success")
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowRuns {
    #[serde(default)]
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Serialize)]
struct DispatchRequest<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

/// Trait for querying and dispatching the rebuild workflow
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Returns the most recent run of the workflow, if it ever ran
    async fn latest_run(&self) -> Result<Option<WorkflowRun>, ApiError>;

    /// Starts a new run of the workflow
    async fn dispatch(&self) -> Result<(), ApiError>;
}

/// GitHub Actions client bound to one workflow
pub struct GitHubActionsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    workflow: WorkflowConfig,
}

impl GitHubActionsClient {
    pub fn new(base_url: &str, token: &str, workflow: WorkflowConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            workflow,
        })
    }

    fn workflow_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows/{}/{}",
            self.base_url,
            self.workflow.owner,
            self.workflow.repo,
            self.workflow.workflow_id,
            suffix
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

#[async_trait::async_trait]
impl WorkflowApi for GitHubActionsClient {
    async fn latest_run(&self) -> Result<Option<WorkflowRun>, ApiError> {
        let url = self.workflow_url("runs?per_page=1");

        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(ApiError::UnexpectedStatus {
                endpoint: "workflow runs".to_string(),
                status,
            });
        }

        let runs: WorkflowRuns = response.json().await.map_err(|e| {
            warn!("Failed to parse workflow runs response: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })?;

        let latest = runs.workflow_runs.into_iter().next();
        match &latest {
            Some(run) => info!(
                "Latest {} run: status={:?} conclusion={:?} url={:?}",
                self.workflow.workflow_id, run.status, run.conclusion, run.html_url
            ),
            None => info!("No previous runs of {}", self.workflow.workflow_id),
        }

        Ok(latest)
    }

    async fn dispatch(&self) -> Result<(), ApiError> {
        let url = self.workflow_url("dispatches");

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&DispatchRequest {
                git_ref: &self.workflow.git_ref,
            })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(ApiError::UnexpectedStatus {
                endpoint: "workflow dispatch".to_string(),
                status,
            });
        }

        info!(
            "Dispatched {} on {}",
            self.workflow.workflow_id, self.workflow.git_ref
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn workflow() -> WorkflowConfig {
        WorkflowConfig {
            owner: "fxclient".to_string(),
            repo: "FXclient".to_string(),
            workflow_id: "deploy.yml".to_string(),
            git_ref: "main".to_string(),
        }
    }

    #[tokio::test]
    async fn latest_run_returns_most_recent_run() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/fxclient/FXclient/actions/workflows/deploy.yml/runs")
            .match_query(Matcher::UrlEncoded("per_page".into(), "1".into()))
            .match_header("authorization", "Bearer gh-token")
            .match_header("x-github-api-version", "2022-11-28")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "total_count": 12,
                    "workflow_runs": [
                        {"status": "completed", "conclusion": "failure", "html_url": "https://github.com/fxclient/FXclient/actions/runs/1"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = GitHubActionsClient::new(&server.url(), "gh-token", workflow()).unwrap();
        let result = client.latest_run().await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(result.conclusion.as_deref(), Some("failure"));
        assert!(!result.succeeded());
    }

    #[tokio::test]
    async fn latest_run_returns_none_without_runs() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/fxclient/FXclient/actions/workflows/deploy.yml/runs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total_count": 0, "workflow_runs": []}"#)
            .create_async()
            .await;

        let client = GitHubActionsClient::new(&server.url(), "gh-token", workflow()).unwrap();
        let result = client.latest_run().await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn latest_run_returns_error_for_not_found() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/fxclient/FXclient/actions/workflows/deploy.yml/runs")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let client = GitHubActionsClient::new(&server.url(), "gh-token", workflow()).unwrap();
        let result = client.latest_run().await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(ApiError::UnexpectedStatus { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn latest_run_returns_invalid_response_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/fxclient/FXclient/actions/workflows/deploy.yml/runs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let client = GitHubActionsClient::new(&server.url(), "gh-token", workflow()).unwrap();
        let result = client.latest_run().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn dispatch_posts_configured_ref() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock(
                "POST",
                "/repos/fxclient/FXclient/actions/workflows/deploy.yml/dispatches",
            )
            .match_header("authorization", "Bearer gh-token")
            .match_body(Matcher::Json(json!({ "ref": "main" })))
            .with_status(204)
            .create_async()
            .await;

        let client = GitHubActionsClient::new(&server.url(), "gh-token", workflow()).unwrap();
        client.dispatch().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn dispatch_returns_error_for_rejected_request() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock(
                "POST",
                "/repos/fxclient/FXclient/actions/workflows/deploy.yml/dispatches",
            )
            .with_status(422)
            .with_body(r#"{"message": "Unexpected inputs provided"}"#)
            .create_async()
            .await;

        let client = GitHubActionsClient::new(&server.url(), "gh-token", workflow()).unwrap();
        let result = client.dispatch().await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(ApiError::UnexpectedStatus { status, .. }) if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        ));
    }
}
