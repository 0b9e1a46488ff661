use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubApi;
use crate::normalizer::{Fix, normalize_file};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The trigger label is not on the pull request.
    LabelMissing,
    /// The head branch lives outside the target repository.
    ForkSkipped { head: Option<String> },
    NoChanges,
    /// Fixes were applied (and written, unless dry-run).
    Changed(Vec<Fix>),
}

pub struct Orchestrator {
    api: GitHubApi,
    config: Config,
}

impl Orchestrator {
    pub fn new(api: GitHubApi, config: Config) -> Self {
        Self { api, config }
    }

    /// Run the label-gated normalization once.
    ///
    /// Benign stops (label missing, fork) are `Ok` outcomes; no file is read
    /// or written in those cases.
    pub fn run(&self) -> Result<Outcome> {
        let repo = self.config.repo.as_str();
        let number = self.config.pr_number;
        debug!(state = "START", repo, number);

        let pr = self.api.pull_request(repo, number)?;
        debug!(state = "FETCHED_PR", labels = ?pr.label_names());

        if !pr.has_label(&self.config.label) {
            info!(label = %self.config.label, "no {} label; exiting", self.config.label);
            return Ok(Outcome::LabelMissing);
        }
        debug!(state = "LABEL_OK");

        // Fetched for logging only; no rule reads comment content.
        let comments = self.api.issue_comments(repo, number)?;
        debug!(state = "FETCHED_COMMENTS", count = comments.len());

        if !pr.is_from_repo(repo) {
            let head = pr.head_repo_full_name().map(str::to_string);
            info!(head = ?head, target = repo, "PR is from a fork; skipping");
            return Ok(Outcome::ForkSkipped { head });
        }
        debug!(state = "FORK_OK");

        let target = &self.config.target;
        let result = normalize_file(target, !self.config.dry_run)?;
        debug!(state = "NORMALIZED", fixes = result.fixes.len());

        if !result.changed() {
            info!(path = %target.display(), "no changes applied");
            debug!(state = "NO_OP");
            return Ok(Outcome::NoChanges);
        }

        if self.config.dry_run {
            info!(
                path = %target.display(),
                fixes = result.fixes.len(),
                "dry run: not writing file or publishing signal"
            );
        } else {
            self.config.signal.publish()?;
            debug!(state = "SIGNALED");
        }
        Ok(Outcome::Changed(result.fixes))
    }
}
