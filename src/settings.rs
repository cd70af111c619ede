//! Workspace settings
//!
//! Settings name the directories of a prompt workspace and the file
//! extensions used for templates and variable files. They are read from
//! `skellaprompter.toml` in the workspace root when that file exists.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// File name looked up in the workspace root
pub const SETTINGS_FILE: &str = "skellaprompter.toml";

/// Errors that can occur when loading or parsing settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Directory names and extensions for a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Templates, searched recursively
    pub prompts_dir: String,
    /// Global variable files
    pub vars_dir: String,
    /// Local variable files, one subdirectory per template
    pub prompt_vars_dir: String,
    pub template_extension: String,
    pub variable_extension: String,
}

/// TOML structure for deserializing settings
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    #[serde(default)]
    directories: TomlDirectories,
    #[serde(default)]
    templates: TomlTemplates,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlDirectories {
    prompts: Option<String>,
    vars: Option<String>,
    prompt_vars: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlTemplates {
    extension: Option<String>,
    variable_extension: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompts_dir: "prompts".to_string(),
            vars_dir: "vars".to_string(),
            prompt_vars_dir: "prompt-vars".to_string(),
            template_extension: "md".to_string(),
            variable_extension: "yaml".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from `skellaprompter.toml` under `root`, or defaults
    pub fn load(root: &Path) -> Result<Self, SettingsError> {
        let path = root.join(SETTINGS_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from TOML string; missing keys keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let defaults = Self::default();

        let settings = Settings {
            prompts_dir: parsed.directories.prompts.unwrap_or(defaults.prompts_dir),
            vars_dir: parsed.directories.vars.unwrap_or(defaults.vars_dir),
            prompt_vars_dir: parsed
                .directories
                .prompt_vars
                .unwrap_or(defaults.prompt_vars_dir),
            template_extension: parsed
                .templates
                .extension
                .unwrap_or(defaults.template_extension),
            variable_extension: parsed
                .templates
                .variable_extension
                .unwrap_or(defaults.variable_extension),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for (key, dir) in [
            ("directories.prompts", &self.prompts_dir),
            ("directories.vars", &self.vars_dir),
            ("directories.prompt_vars", &self.prompt_vars_dir),
        ] {
            if dir.trim().is_empty() {
                return Err(SettingsError::Invalid(format!("{key} must not be empty")));
            }
        }
        for (key, ext) in [
            ("templates.extension", &self.template_extension),
            ("templates.variable_extension", &self.variable_extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(SettingsError::Invalid(format!(
                    "{key} must be an extension without the leading dot"
                )));
            }
        }
        Ok(())
    }

    /// Set the templates directory
    pub fn with_prompts_dir(mut self, dir: impl Into<String>) -> Self {
        self.prompts_dir = dir.into();
        self
    }

    /// Set the global variables directory
    pub fn with_vars_dir(mut self, dir: impl Into<String>) -> Self {
        self.vars_dir = dir.into();
        self
    }

    /// Set the local variables directory
    pub fn with_prompt_vars_dir(mut self, dir: impl Into<String>) -> Self {
        self.prompt_vars_dir = dir.into();
        self
    }

    pub fn with_template_extension(mut self, ext: impl Into<String>) -> Self {
        self.template_extension = ext.into();
        self
    }
}
