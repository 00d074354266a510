//! Where the script comes from and which arguments are inputs

use std::{fs, path::PathBuf};

use super::CliError;

/// How the script was supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// `-e SCRIPT`
    Expression(String),
    /// `-f FILE`
    File(PathBuf),
    /// First positional argument
    Positional(String),
}

impl ScriptSource {
    pub fn load(&self) -> Result<String, CliError> {
        match self {
            ScriptSource::Expression(script) | ScriptSource::Positional(script) => {
                Ok(script.clone())
            }
            ScriptSource::File(path) => {
                fs::read_to_string(path).map_err(|source| CliError::ScriptFile {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

/// Decides where the script comes from. `-e` wins over `-f`; with neither,
/// the first positional argument is the script. Whatever positional
/// arguments remain are input files.
pub fn resolve_script(
    expression: Option<String>,
    file: Option<PathBuf>,
    mut positional: Vec<String>,
) -> Result<(ScriptSource, Vec<PathBuf>), CliError> {
    let source = match (expression, file) {
        (Some(script), _) => ScriptSource::Expression(script),
        (None, Some(path)) => ScriptSource::File(path),
        (None, None) => {
            if positional.is_empty() {
                return Err(CliError::NoScript);
            }
            ScriptSource::Positional(positional.remove(0))
        }
    };
    let inputs = positional.into_iter().map(PathBuf::from).collect();
    Ok((source, inputs))
}
