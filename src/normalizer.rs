//! Whitelisted corrections for `.coderabbit.yaml`.
//!
//! Each rule is a presence/shape check with a fixed safe default. Nothing here
//! validates the wider schema; keys outside the rules are left as authored.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::document::{self, is_bool, is_true, mapping_or_empty, str_in};
use crate::error::Result;

pub const ALLOWED_PROFILES: &[&str] = &["chill", "assertive"];
pub const DEFAULT_PROFILE: &str = "chill";

pub const ALLOWED_PLACEMENTS: &[&str] = &["PR_BODY", "PR_COMMENT"];
pub const DEFAULT_PLACEMENT: &str = "PR_BODY";

/// Top-level keys the review bot no longer accepts.
pub const UNSUPPORTED_KEYS: &[&str] = &["fail_conditions", "labels", "comments", "ui"];

pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    "dist/**",
    "vendor/**",
    "**/*.sum",
    "**/*.min.*",
    ".claude/**",
    ".coderabbit.yaml",
];

/// `(path glob, instructions)` pairs inserted when `path_instructions` is absent.
pub const DEFAULT_PATH_INSTRUCTIONS: &[(&str, &str)] = &[
    (
        "internal/storage/**",
        "Use assertive scrutiny for storage internals (correctness, concurrency, durability).",
    ),
    (
        "cmd/**",
        "Normal scrutiny; ensure CLI UX and error handling.",
    ),
    (
        "**/*_test.go",
        "Chill profile acceptable for tests/tooling.",
    ),
];

const VERSION: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fix {
    VersionPinned,
    ProfileReset,
    AutoReviewEnabled,
    DraftsDefaulted,
    PathInstructionsAdded,
    KeyRemoved(String),
    SummariesAdded,
    SummariesEnabled,
    PlacementReset,
    IgnoreFilesExtended(Vec<String>),
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fix::VersionPinned => write!(f, "set version to {VERSION}"),
            Fix::ProfileReset => write!(f, "set reviews.profile to {DEFAULT_PROFILE}"),
            Fix::AutoReviewEnabled => write!(f, "set reviews.auto_review.enabled to true"),
            Fix::DraftsDefaulted => write!(f, "set reviews.auto_review.drafts to false"),
            Fix::PathInstructionsAdded => write!(f, "added default reviews.path_instructions"),
            Fix::KeyRemoved(key) => write!(f, "removed unsupported key {key}"),
            Fix::SummariesAdded => write!(f, "added default summaries section"),
            Fix::SummariesEnabled => write!(f, "set summaries.enabled to true"),
            Fix::PlacementReset => write!(f, "set summaries.placement to {DEFAULT_PLACEMENT}"),
            Fix::IgnoreFilesExtended(added) => {
                write!(f, "added ignore.files defaults: {}", added.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalization {
    pub fixes: Vec<Fix>,
}

impl Normalization {
    pub fn changed(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Apply every rule to `doc` in place.
///
/// A null document (empty file) or a non-mapping root is left untouched.
pub fn normalize(doc: &mut Value) -> Normalization {
    let mut result = Normalization::default();
    let root = match doc {
        Value::Mapping(root) => root,
        Value::Null => return result,
        other => {
            warn!(kind = value_kind(other), "config root is not a mapping; skipping");
            return result;
        }
    };

    pin_version(root, &mut result.fixes);
    normalize_reviews(root, &mut result.fixes);
    prune_unsupported(root, &mut result.fixes);
    normalize_summaries(root, &mut result.fixes);
    extend_ignore_files(root, &mut result.fixes);

    result
}

/// Normalize the file at `path`. A missing file is a no-op. The file is
/// rewritten only when something changed and `write` is set.
pub fn normalize_file(path: &Path, write: bool) -> Result<Normalization> {
    let Some(mut doc) = document::load(path)? else {
        info!(path = %path.display(), "config file not found; nothing to normalize");
        return Ok(Normalization::default());
    };

    let result = normalize(&mut doc);
    for fix in &result.fixes {
        info!(path = %path.display(), "{fix}");
    }

    if result.changed() && write {
        document::save(path, &doc)?;
        debug!(path = %path.display(), fixes = result.fixes.len(), "wrote normalized config");
    }
    Ok(result)
}

fn pin_version(root: &mut Mapping, fixes: &mut Vec<Fix>) {
    if root.get("version").and_then(Value::as_u64) != Some(VERSION) {
        root.insert("version".into(), VERSION.into());
        fixes.push(Fix::VersionPinned);
    }
}

fn normalize_reviews(root: &mut Mapping, fixes: &mut Vec<Fix>) {
    let mut reviews = mapping_or_empty(root.get("reviews"));

    if !str_in(reviews.get("profile"), ALLOWED_PROFILES) {
        reviews.insert("profile".into(), DEFAULT_PROFILE.into());
        fixes.push(Fix::ProfileReset);
    }

    let mut auto = mapping_or_empty(reviews.get("auto_review"));
    if !is_true(auto.get("enabled")) {
        auto.insert("enabled".into(), true.into());
        fixes.push(Fix::AutoReviewEnabled);
    }
    if !is_bool(auto.get("drafts")) {
        auto.insert("drafts".into(), false.into());
        fixes.push(Fix::DraftsDefaulted);
    }
    reviews.insert("auto_review".into(), Value::Mapping(auto));

    if !reviews.contains_key("path_instructions") {
        reviews.insert("path_instructions".into(), default_path_instructions());
        fixes.push(Fix::PathInstructionsAdded);
    }

    root.insert("reviews".into(), Value::Mapping(reviews));
}

fn default_path_instructions() -> Value {
    DEFAULT_PATH_INSTRUCTIONS
        .iter()
        .map(|(path, instructions)| {
            let mut entry = Mapping::new();
            entry.insert("path".into(), (*path).into());
            entry.insert("instructions".into(), (*instructions).into());
            Value::Mapping(entry)
        })
        .collect()
}

fn prune_unsupported(root: &mut Mapping, fixes: &mut Vec<Fix>) {
    let removed: Vec<String> = root
        .iter()
        .map(|(key, _)| key)
        .filter_map(Value::as_str)
        .filter(|key| UNSUPPORTED_KEYS.contains(key))
        .map(str::to_string)
        .collect();
    if removed.is_empty() {
        return;
    }

    *root = std::mem::take(root)
        .into_iter()
        .filter(|(key, _)| !key.as_str().is_some_and(|k| UNSUPPORTED_KEYS.contains(&k)))
        .collect();
    fixes.extend(removed.into_iter().map(Fix::KeyRemoved));
}

fn normalize_summaries(root: &mut Mapping, fixes: &mut Vec<Fix>) {
    let summaries = match root.get("summaries") {
        Some(Value::Mapping(existing)) if !existing.is_empty() => {
            let mut summaries = existing.clone();
            if !is_true(summaries.get("enabled")) {
                summaries.insert("enabled".into(), true.into());
                fixes.push(Fix::SummariesEnabled);
            }
            if !str_in(summaries.get("placement"), ALLOWED_PLACEMENTS) {
                summaries.insert("placement".into(), DEFAULT_PLACEMENT.into());
                fixes.push(Fix::PlacementReset);
            }
            summaries
        }
        _ => {
            let mut summaries = Mapping::new();
            summaries.insert("enabled".into(), true.into());
            summaries.insert("placement".into(), DEFAULT_PLACEMENT.into());
            fixes.push(Fix::SummariesAdded);
            summaries
        }
    };
    root.insert("summaries".into(), Value::Mapping(summaries));
}

fn extend_ignore_files(root: &mut Mapping, fixes: &mut Vec<Fix>) {
    let mut ignore = mapping_or_empty(root.get("ignore"));
    let mut files = ignore_entries(ignore.get("files"));

    let added: Vec<String> = DEFAULT_IGNORE_FILES
        .iter()
        .filter(|glob| !files.contains(**glob))
        .map(|glob| glob.to_string())
        .collect();
    if added.is_empty() {
        return;
    }

    files.extend(added.iter().cloned());
    ignore.insert(
        "files".into(),
        files.into_iter().map(Value::String).collect(),
    );
    root.insert("ignore".into(), Value::Mapping(ignore));
    fixes.push(Fix::IgnoreFilesExtended(added));
}

/// Existing `ignore.files` entries as a sorted set of strings.
fn ignore_entries(value: Option<&Value>) -> BTreeSet<String> {
    let items: Vec<&Value> = match value {
        Some(Value::Sequence(seq)) => seq.iter().collect(),
        Some(scalar @ Value::String(_)) => vec![scalar],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                warn!(kind = value_kind(other), "dropping non-scalar ignore.files entry");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
