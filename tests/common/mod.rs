#![allow(dead_code)]

use std::path::{Path, PathBuf};

use cr_iterate::config::{Config, DEFAULT_CHANGES_VAR, DEFAULT_LABEL};
use cr_iterate::signal::ChangeSignal;

pub const REPO: &str = "acme/widgets";
pub const PR_NUMBER: u64 = 42;

/// Sensible default `Config` for tests rooted in `dir`. Callers can override fields via struct update syntax.
pub fn default_test_config(dir: &Path) -> Config {
    Config {
        token: "test-token".to_string(),
        repo: REPO.to_string(),
        pr_number: PR_NUMBER,
        label: DEFAULT_LABEL.to_string(),
        target: dir.join(".coderabbit.yaml"),
        dry_run: false,
        signal: ChangeSignal {
            name: DEFAULT_CHANGES_VAR.to_string(),
            github_output: Some(github_output_path(dir)),
            github_env: None,
        },
    }
}

pub fn github_output_path(dir: &Path) -> PathBuf {
    dir.join("github_output")
}

pub fn read_signal(dir: &Path) -> Option<String> {
    std::fs::read_to_string(github_output_path(dir)).ok()
}
