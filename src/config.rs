use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::signal::ChangeSignal;

pub const DEFAULT_CONFIG_PATH: &str = ".cr-iterate.toml";
pub const DEFAULT_LABEL: &str = "cr:auto-iterate";
pub const DEFAULT_TARGET: &str = ".coderabbit.yaml";
pub const DEFAULT_CHANGES_VAR: &str = "CR_CHANGES";

static REPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub label: Option<String>,
    pub target: Option<String>,
    pub changes_var: Option<String>,
}

#[derive(Clone, PartialEq)]
pub struct Config {
    pub token: String,
    pub repo: String,
    pub pr_number: u64,
    pub label: String,
    pub target: PathBuf,
    pub dry_run: bool,
    pub signal: ChangeSignal,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("repo", &self.repo)
            .field("pr_number", &self.pr_number)
            .field("label", &self.label)
            .field("target", &self.target)
            .field("dry_run", &self.dry_run)
            .field("signal", &self.signal)
            .finish()
    }
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        Self::load_with_env(cli, |key| std::env::var(key).ok())
    }

    /// Load config with an injectable environment lookup.
    pub fn load_with_env<F>(cli: &Cli, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_config = read_config_file(cli.config.as_deref())?;
        merge(file_config, cli, env)
    }
}

fn read_config_file(explicit: Option<&str>) -> Result<ConfigFile> {
    let path = Path::new(explicit.unwrap_or(DEFAULT_CONFIG_PATH));
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        parse_config(&content)
    } else if explicit.is_some() {
        Err(Error::ConfigNotFound(path.to_path_buf()))
    } else {
        Ok(ConfigFile::default())
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(ref label) = config.label
        && label.trim().is_empty()
    {
        return Err(Error::ConfigValidation("label must not be empty".to_string()));
    }
    if let Some(ref target) = config.target
        && target.trim().is_empty()
    {
        return Err(Error::ConfigValidation(
            "target must not be empty".to_string(),
        ));
    }
    if let Some(ref var) = config.changes_var
        && !is_env_name(var)
    {
        return Err(Error::ConfigValidation(format!(
            "changes_var is not a valid variable name: {var}"
        )));
    }
    Ok(())
}

fn is_env_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Merge file config, CLI flags and the environment into a validated `Config`.
/// CLI flags win over the environment, which wins over defaults.
pub fn merge<F>(file: ConfigFile, cli: &Cli, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| {
        env(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let token = lookup("GITHUB_TOKEN").or_else(|| lookup("GH_TOKEN"));
    let pr_number = cli.pr_number.clone().or_else(|| lookup("PR_NUMBER"));
    let repo = cli.repo.clone().or_else(|| lookup("REPO"));

    let (Some(token), Some(pr_number), Some(repo)) = (token.clone(), pr_number.clone(), repo.clone())
    else {
        let mut missing = Vec::new();
        if token.is_none() {
            missing.push("GITHUB_TOKEN".to_string());
        }
        if pr_number.is_none() {
            missing.push("PR_NUMBER".to_string());
        }
        if repo.is_none() {
            missing.push("REPO".to_string());
        }
        return Err(Error::MissingEnv(missing));
    };

    let pr_number = match pr_number.trim().parse::<u64>() {
        Ok(n) if n > 0 => n,
        _ => {
            return Err(Error::ConfigValidation(format!(
                "PR_NUMBER must be a positive integer, got: {pr_number}"
            )));
        }
    };

    if !REPO_RE.is_match(&repo) {
        return Err(Error::ConfigValidation(format!(
            "REPO must be in owner/name form, got: {repo}"
        )));
    }

    let label = cli
        .label
        .clone()
        .or(file.label)
        .unwrap_or_else(|| DEFAULT_LABEL.to_string());
    if label.trim().is_empty() {
        return Err(Error::ConfigValidation("label must not be empty".to_string()));
    }

    let target = cli
        .target
        .clone()
        .or(file.target)
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());

    let signal = ChangeSignal {
        name: file
            .changes_var
            .unwrap_or_else(|| DEFAULT_CHANGES_VAR.to_string()),
        github_output: lookup("GITHUB_OUTPUT").map(PathBuf::from),
        github_env: lookup("GITHUB_ENV").map(PathBuf::from),
    };

    Ok(Config {
        token,
        repo,
        pr_number,
        label,
        target: PathBuf::from(target),
        dry_run: cli.dry_run,
        signal,
    })
}
