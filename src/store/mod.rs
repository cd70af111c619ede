//! Prompt workspace: templates and variable files on disk

mod tree;
mod variables;
mod workspace;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::EngineError;
use crate::settings::SettingsError;

pub use tree::{build_tree, format_tree, TreeItem};
pub use variables::{VariableFile, VariableOption};
pub use workspace::{PromptEntry, Selections, VariableSet, Workspace};

/// Errors that can occur while reading a workspace
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list prompts: {0}")]
    Walk(#[from] walkdir::Error),

    /// No template with this id under the prompts directory
    #[error("prompt not found: {id}")]
    UnknownPrompt { id: String },

    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    /// A variable file with the wrong shape
    #[error("invalid variable file {path}: {message}")]
    InvalidVariableFile { path: PathBuf, message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl StoreError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn invalid_variable(path: &Path, err: serde_yaml::Error) -> Self {
        Self::InvalidVariableFile {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}
