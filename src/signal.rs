use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// Where the "changes occurred" flag is published for the calling workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSignal {
    pub name: String,
    pub github_output: Option<PathBuf>,
    pub github_env: Option<PathBuf>,
}

impl ChangeSignal {
    pub fn line(&self) -> String {
        format!("{}=true", self.name)
    }

    /// Append `NAME=true` to each configured sink. Falls back to stdout when
    /// no workflow file is configured.
    pub fn publish(&self) -> Result<()> {
        let line = self.line();
        let sinks: Vec<&Path> = [self.github_output.as_deref(), self.github_env.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if sinks.is_empty() {
            println!("{line}");
            info!(signal = %line, "published change signal to stdout");
            return Ok(());
        }

        for sink in sinks {
            append_line(sink, &line)?;
            info!(signal = %line, path = %sink.display(), "published change signal");
        }
        Ok(())
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
