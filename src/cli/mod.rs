//! CLI support for jt
//!
//! Everything the `jt` binary does short of argument parsing lives here, so
//! the filter can be embedded in other tools and driven from tests.

mod run;
mod script;

pub use run::{RunSummary, Runner};
pub use script::{ScriptSource, resolve_script};

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{EvalError, ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Could not understand program:\n{0}")]
    Parse(#[from] ParseError),

    /// A rule failed while processing a line and the policy is to abort
    #[error("could not evaluate rule {rule}: {source}")]
    Rule {
        rule: String,
        #[source]
        source: EvalError,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("can't read script file {}: {source}", path.display())]
    ScriptFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No script provided. Use -e, -f or pass the script as the first argument.")]
    NoScript,

    #[error("No input provided. Pass input files or pipe text to stdin.")]
    NoInput,

    #[error("{count} input file(s) could not be read")]
    UnreadableInputs { count: usize },
}

/// What to do when a rule fails on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop processing and report the failure
    #[default]
    Abort,
    /// Report the failure on stderr and carry on with the next rule
    Continue,
}

/// What the runner writes for each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Run the blocks of matching rules
    #[default]
    Execute,
    /// Write one JSON report per line naming the matching rules; blocks are
    /// not run
    Report,
}

/// Options for a run over the input
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub on_error: ErrorPolicy,
    pub mode: OutputMode,
}
