use clap::Parser;

/// cr-iterate — normalize .coderabbit.yaml on labeled pull requests
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cr-iterate", version, about)]
pub struct Cli {
    /// Path to config file (default: .cr-iterate.toml, optional)
    #[arg(long)]
    pub config: Option<String>,

    /// Trigger label that gates the run (default: cr:auto-iterate)
    #[arg(long)]
    pub label: Option<String>,

    /// Review-bot config file to normalize (default: .coderabbit.yaml)
    #[arg(long = "file")]
    pub target: Option<String>,

    /// Target repository in owner/name form (overrides REPO)
    #[arg(long)]
    pub repo: Option<String>,

    /// Pull request number (overrides PR_NUMBER)
    #[arg(long)]
    pub pr_number: Option<String>,

    /// Compute fixes without writing the file or publishing the signal
    #[arg(long)]
    pub dry_run: bool,
}
