mod common;

use cr_iterate::config::DEFAULT_LABEL;
use cr_iterate::error::Error;
use cr_iterate::github::GitHubApi;
use cr_iterate::normalizer::{DEFAULT_IGNORE_FILES, Fix};
use cr_iterate::orchestrator::{Orchestrator, Outcome};
use cr_iterate::test_helpers::{COMPLIANT_YAML, MockGhClient, comments_json, pr_json};
use serde_yaml::Value;

use common::{PR_NUMBER, REPO, default_test_config, read_signal};

fn orchestrator(client: &MockGhClient, config: cr_iterate::config::Config) -> Orchestrator {
    Orchestrator::new(GitHubApi::with_client(Box::new(client.clone())), config)
}

fn labeled_same_repo_pr() -> String {
    pr_json(PR_NUMBER, &[DEFAULT_LABEL, "ci"], Some(REPO))
}

#[test]
fn label_missing_stops_before_file_access() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());
    std::fs::write(&config.target, "version: 1\n").unwrap();

    let client = MockGhClient::new(vec![Ok(pr_json(PR_NUMBER, &["bug"], Some(REPO)))]);
    let outcome = orchestrator(&client, config.clone()).run().unwrap();

    assert_eq!(outcome, Outcome::LabelMissing);
    assert_eq!(client.calls().len(), 1, "comments must not be fetched");
    assert_eq!(std::fs::read_to_string(&config.target).unwrap(), "version: 1\n");
    assert!(read_signal(tmp.path()).is_none());
}

#[test]
fn fork_stops_before_file_access() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());
    std::fs::write(&config.target, "version: 1\n").unwrap();

    let client = MockGhClient::new(vec![
        Ok(pr_json(PR_NUMBER, &[DEFAULT_LABEL], Some("mallory/widgets"))),
        Ok(comments_json(&["please fix"])),
    ]);
    let outcome = orchestrator(&client, config.clone()).run().unwrap();

    assert_eq!(
        outcome,
        Outcome::ForkSkipped {
            head: Some("mallory/widgets".to_string())
        }
    );
    assert_eq!(std::fs::read_to_string(&config.target).unwrap(), "version: 1\n");
    assert!(read_signal(tmp.path()).is_none());
}

#[test]
fn deleted_head_repo_treated_as_fork() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());

    let client = MockGhClient::new(vec![
        Ok(pr_json(PR_NUMBER, &[DEFAULT_LABEL], None)),
        Ok(comments_json(&[])),
    ]);
    let outcome = orchestrator(&client, config).run().unwrap();
    assert_eq!(outcome, Outcome::ForkSkipped { head: None });
}

#[test]
fn requests_pull_then_comments() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());

    let client = MockGhClient::new(vec![Ok(labeled_same_repo_pr()), Ok(comments_json(&[]))]);
    orchestrator(&client, config).run().unwrap();

    let paths: Vec<String> = client.calls().iter().map(|c| c[1].clone()).collect();
    assert_eq!(
        paths,
        vec![
            format!("repos/{REPO}/pulls/{PR_NUMBER}"),
            format!("repos/{REPO}/issues/{PR_NUMBER}/comments"),
        ]
    );
}

#[test]
fn missing_config_file_is_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());

    let client = MockGhClient::new(vec![Ok(labeled_same_repo_pr()), Ok(comments_json(&[]))]);
    let outcome = orchestrator(&client, config.clone()).run().unwrap();

    assert_eq!(outcome, Outcome::NoChanges);
    assert!(!config.target.exists());
    assert!(read_signal(tmp.path()).is_none());
}

#[test]
fn empty_mapping_is_normalized_and_signaled() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());
    std::fs::write(&config.target, "{}\n").unwrap();

    let client = MockGhClient::new(vec![
        Ok(labeled_same_repo_pr()),
        Ok(comments_json(&["@coderabbitai review"])),
    ]);
    let outcome = orchestrator(&client, config.clone()).run().unwrap();

    let Outcome::Changed(fixes) = outcome else {
        panic!("expected Changed, got {outcome:?}");
    };
    assert!(fixes.contains(&Fix::VersionPinned));
    assert!(fixes.contains(&Fix::PathInstructionsAdded));
    assert_eq!(read_signal(tmp.path()).as_deref(), Some("CR_CHANGES=true\n"));

    let written: Value =
        serde_yaml::from_str(&std::fs::read_to_string(&config.target).unwrap()).unwrap();
    assert_eq!(written["version"].as_u64(), Some(2));
    assert_eq!(written["reviews"]["profile"].as_str(), Some("chill"));
    assert_eq!(written["summaries"]["placement"].as_str(), Some("PR_BODY"));
    let files = written["ignore"]["files"].as_sequence().unwrap();
    assert_eq!(files.len(), DEFAULT_IGNORE_FILES.len());
}

#[test]
fn compliant_file_left_byte_for_byte() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());
    let authored = format!("# hand-written\n{COMPLIANT_YAML}");
    std::fs::write(&config.target, &authored).unwrap();

    let client = MockGhClient::new(vec![Ok(labeled_same_repo_pr()), Ok(comments_json(&[]))]);
    let outcome = orchestrator(&client, config.clone()).run().unwrap();

    assert_eq!(outcome, Outcome::NoChanges);
    assert_eq!(std::fs::read_to_string(&config.target).unwrap(), authored);
    assert!(read_signal(tmp.path()).is_none());
}

#[test]
fn second_run_reports_no_changes() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());
    std::fs::write(&config.target, "reviews:\n  profile: lenient\nui:\n  theme: dark\n").unwrap();

    let client = MockGhClient::new(vec![
        Ok(labeled_same_repo_pr()),
        Ok(comments_json(&[])),
        Ok(labeled_same_repo_pr()),
        Ok(comments_json(&[])),
    ]);
    let orch = orchestrator(&client, config.clone());

    let first = orch.run().unwrap();
    assert!(matches!(first, Outcome::Changed(ref fixes) if fixes.contains(&Fix::KeyRemoved("ui".to_string()))));
    let after_first = std::fs::read_to_string(&config.target).unwrap();

    assert_eq!(orch.run().unwrap(), Outcome::NoChanges);
    assert_eq!(std::fs::read_to_string(&config.target).unwrap(), after_first);
}

#[test]
fn dry_run_reports_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = cr_iterate::config::Config {
        dry_run: true,
        ..default_test_config(tmp.path())
    };
    std::fs::write(&config.target, "version: 1\n").unwrap();

    let client = MockGhClient::new(vec![Ok(labeled_same_repo_pr()), Ok(comments_json(&[]))]);
    let outcome = orchestrator(&client, config.clone()).run().unwrap();

    assert!(matches!(outcome, Outcome::Changed(_)));
    assert_eq!(std::fs::read_to_string(&config.target).unwrap(), "version: 1\n");
    assert!(read_signal(tmp.path()).is_none());
}

#[test]
fn custom_label_gates_run() {
    let tmp = tempfile::tempdir().unwrap();
    let config = cr_iterate::config::Config {
        label: "bot:normalize".to_string(),
        ..default_test_config(tmp.path())
    };

    let client = MockGhClient::new(vec![Ok(labeled_same_repo_pr())]);
    let outcome = orchestrator(&client, config).run().unwrap();
    assert_eq!(outcome, Outcome::LabelMissing);
}

#[test]
fn api_failure_aborts_without_side_effects() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());
    std::fs::write(&config.target, "version: 1\n").unwrap();

    let client = MockGhClient::new(vec![
        Ok(labeled_same_repo_pr()),
        Err(Error::Api {
            command: "gh api comments".to_string(),
            status: "exit status: 1".to_string(),
            stdout: String::new(),
            stderr: "HTTP 502".to_string(),
        }),
    ]);
    let err = orchestrator(&client, config.clone()).run().unwrap_err();

    assert!(err.to_string().contains("HTTP 502"));
    assert_eq!(std::fs::read_to_string(&config.target).unwrap(), "version: 1\n");
    assert!(read_signal(tmp.path()).is_none());
}

#[test]
fn invalid_yaml_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = default_test_config(tmp.path());
    std::fs::write(&config.target, "reviews: [unclosed\n").unwrap();

    let client = MockGhClient::new(vec![Ok(labeled_same_repo_pr()), Ok(comments_json(&[]))]);
    let err = orchestrator(&client, config).run().unwrap_err();
    assert!(matches!(err, Error::Yaml(_)));
}
