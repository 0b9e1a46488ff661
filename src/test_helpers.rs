use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::github::GhClient;

/// Scripted `gh` client: pops one response per call and records the args.
#[derive(Clone, Default)]
pub struct MockGhClient {
    responses: Rc<RefCell<VecDeque<Result<String>>>>,
    calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockGhClient {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Rc::new(RefCell::new(responses.into())),
            calls: Rc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl GhClient for MockGhClient {
    fn run(&self, args: &[&str]) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::ApiResponse("no more mock responses".to_string())))
    }
}

/// Pull request JSON as returned by `gh api repos/{repo}/pulls/{n}`.
pub fn pr_json(number: u64, labels: &[&str], head_repo: Option<&str>) -> String {
    let repo = head_repo.map(|name| serde_json::json!({ "full_name": name }));
    serde_json::json!({
        "number": number,
        "labels": labels.iter().map(|l| serde_json::json!({ "name": l })).collect::<Vec<_>>(),
        "head": { "ref": "feature", "repo": repo },
    })
    .to_string()
}

/// Issue comments JSON as returned by `gh api repos/{repo}/issues/{n}/comments`.
pub fn comments_json(bodies: &[&str]) -> String {
    let comments: Vec<_> = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            serde_json::json!({
                "id": i + 1,
                "body": body,
                "user": { "login": "coderabbitai[bot]" },
            })
        })
        .collect();
    serde_json::Value::Array(comments).to_string()
}

/// A `.coderabbit.yaml` that already satisfies every normalization rule.
pub const COMPLIANT_YAML: &str = r#"version: 2
reviews:
  profile: assertive
  auto_review:
    enabled: true
    drafts: true
  path_instructions: []
summaries:
  enabled: true
  placement: PR_COMMENT
ignore:
  files:
  - '**/*.min.*'
  - '**/*.sum'
  - .claude/**
  - .coderabbit.yaml
  - dist/**
  - docs/generated/**
  - vendor/**
"#;
