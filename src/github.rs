use std::process::Command;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

const ACCEPT_HEADER: &str = "Accept: application/vnd.github+json";

/// Abstraction over `gh` CLI execution for testability.
pub trait GhClient {
    fn run(&self, args: &[&str]) -> Result<String>;
}

/// Real `gh` CLI client. Authenticates through `GH_TOKEN`; no retries.
struct DefaultGhClient {
    token: String,
}

impl GhClient for DefaultGhClient {
    fn run(&self, args: &[&str]) -> Result<String> {
        let command = format!("gh {}", args.join(" "));
        let output = Command::new("gh")
            .args(args)
            .env("GH_TOKEN", &self.token)
            .output()
            .map_err(|e| Error::Api {
                command: command.clone(),
                status: "failed to spawn".to_string(),
                stdout: String::new(),
                stderr: e.to_string(),
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout)
                .map_err(|e| Error::ApiResponse(format!("invalid utf8 from gh: {e}")))
        } else {
            Err(Error::Api {
                command,
                status: output.status.to_string(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// The two read-only resources this tool requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    PullRequest { repo: &'a str, number: u64 },
    IssueComments { repo: &'a str, number: u64 },
}

impl Resource<'_> {
    pub fn path(&self) -> String {
        match self {
            Resource::PullRequest { repo, number } => format!("repos/{repo}/pulls/{number}"),
            Resource::IssueComments { repo, number } => {
                format!("repos/{repo}/issues/{number}/comments")
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoRef {
    pub full_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadRef {
    #[serde(rename = "ref", default)]
    pub branch: String,
    /// Null when the source repository has been deleted.
    #[serde(default)]
    pub repo: Option<RepoRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub head: HeadRef,
}

impl PullRequest {
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    pub fn head_repo_full_name(&self) -> Option<&str> {
        self.head.repo.as_ref().map(|r| r.full_name.as_str())
    }

    /// True when the head branch lives in `repo` itself rather than a fork.
    pub fn is_from_repo(&self, repo: &str) -> bool {
        self.head_repo_full_name() == Some(repo)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentAuthor {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<CommentAuthor>,
}

pub struct GitHubApi {
    client: Box<dyn GhClient>,
}

impl GitHubApi {
    pub fn new(token: &str) -> Self {
        Self {
            client: Box::new(DefaultGhClient {
                token: token.to_string(),
            }),
        }
    }

    pub fn with_client(client: Box<dyn GhClient>) -> Self {
        Self { client }
    }

    /// Issue `gh api <path>` and decode the JSON body.
    pub fn fetch(&self, resource: Resource<'_>) -> Result<serde_json::Value> {
        let path = resource.path();
        debug!(%path, "gh api request");
        let body = self.client.run(&["api", &path, "-H", ACCEPT_HEADER])?;
        serde_json::from_str(&body)
            .map_err(|e| Error::ApiResponse(format!("failed to parse {path}: {e}")))
    }

    fn fetch_as<T: DeserializeOwned>(&self, resource: Resource<'_>) -> Result<T> {
        let value = self.fetch(resource)?;
        serde_json::from_value(value)
            .map_err(|e| Error::ApiResponse(format!("unexpected shape for {}: {e}", resource.path())))
    }

    pub fn pull_request(&self, repo: &str, number: u64) -> Result<PullRequest> {
        self.fetch_as(Resource::PullRequest { repo, number })
    }

    pub fn issue_comments(&self, repo: &str, number: u64) -> Result<Vec<Comment>> {
        self.fetch_as(Resource::IssueComments { repo, number })
    }
}
