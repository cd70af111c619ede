//! Prompt workspace on disk
//!
//! ```text
//! <root>/
//!   skellaprompter.toml           optional settings
//!   prompts/<folders>/<name>.md   templates
//!   vars/<var>.yaml               global variables
//!   prompt-vars/<prompt id>/<var>.yaml  variables local to one template
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::parser::{Scope, Template};
use crate::settings::Settings;
use crate::template::{Catalog, Field, VariablePool};

use super::variables::{VariableFile, VariableOption};
use super::StoreError;

/// A template file found under the prompts directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEntry {
    /// Path relative to the prompts directory, without extension, `/`-separated
    pub id: String,
    pub path: PathBuf,
    /// File stem shown in the navigation tree
    pub display_name: String,
    /// Enclosing folders, outermost first
    pub folders: Vec<String>,
}

/// Caller choices for catalog variables, by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub global: HashMap<String, String>,
    pub local: HashMap<String, String>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.global.insert(name.into(), value.into());
        self
    }

    pub fn with_local(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.local.insert(name.into(), value.into());
        self
    }
}

/// Variable files referenced by one template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    global: HashMap<String, VariableFile>,
    local: HashMap<String, VariableFile>,
}

impl VariableSet {
    pub fn file(&self, scope: Scope, name: &str) -> Option<&VariableFile> {
        match scope {
            Scope::Global => self.global.get(name),
            Scope::Local => self.local.get(name),
            Scope::ShortFreeform | Scope::LongFreeform => None,
        }
    }

    /// Snapshot the files and selections into a catalog.
    ///
    /// A selection without a file still becomes an entry.
    pub fn catalog(&self, selections: &Selections) -> Result<Catalog, StoreError> {
        let global = build_pool(&self.global, &selections.global);
        let local = build_pool(&self.local, &selections.local);
        Ok(Catalog::build(global, local)?)
    }

    /// Options to offer for a choice field; empty when the file is missing
    pub fn choices(&self, field: &Field) -> Vec<VariableOption> {
        match self.file(field.scope, &field.name) {
            Some(file) => file.choices(field.inline_default.as_deref()),
            None => Vec::new(),
        }
    }
}

fn build_pool(
    files: &HashMap<String, VariableFile>,
    selections: &HashMap<String, String>,
) -> VariablePool {
    let mut pool: VariablePool = files
        .iter()
        .map(|(name, file)| {
            let selection = selections.get(name).map(String::as_str);
            (name.clone(), file.to_entry(selection))
        })
        .collect();
    for (name, selection) in selections {
        if !files.contains_key(name) {
            pool.insert(name.clone(), VariableFile::default().to_entry(Some(selection)));
        }
    }
    pool
}

/// A base directory holding prompts and variable files
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    settings: Settings,
}

impl Workspace {
    /// Open a workspace, reading its settings file if present
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let settings = Settings::load(&root)?;
        Ok(Self { root, settings })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.join(&self.settings.prompts_dir)
    }

    pub fn vars_dir(&self) -> PathBuf {
        self.root.join(&self.settings.vars_dir)
    }

    pub fn prompt_vars_dir(&self) -> PathBuf {
        self.root.join(&self.settings.prompt_vars_dir)
    }

    /// Create the prompts and variable directories if missing
    pub fn ensure_directories(&self) -> Result<(), StoreError> {
        for dir in [self.prompts_dir(), self.vars_dir(), self.prompt_vars_dir()] {
            fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
            debug!(path = %dir.display(), "ensured directory exists");
        }
        Ok(())
    }

    /// All templates under the prompts directory, sorted by path
    pub fn list_prompts(&self) -> Result<Vec<PromptEntry>, StoreError> {
        let prompts_dir = self.prompts_dir();
        if !prompts_dir.is_dir() {
            debug!(path = %prompts_dir.display(), "prompts directory missing");
            return Ok(Vec::new());
        }

        let mut prompts = Vec::new();
        for entry in WalkDir::new(&prompts_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.is_template(entry.path()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&prompts_dir)
                .unwrap_or(entry.path());
            prompts.push(prompt_entry(entry.path(), relative));
        }
        debug!(count = prompts.len(), "listed prompts");
        Ok(prompts)
    }

    /// Find a template by id (`folder/name`, extension optional)
    pub fn find_prompt(&self, id: &str) -> Result<PromptEntry, StoreError> {
        let unknown = || StoreError::UnknownPrompt { id: id.to_string() };
        let ext = &self.settings.template_extension;
        let trimmed = id
            .strip_suffix(&format!(".{ext}"))
            .unwrap_or(id)
            .trim_matches('/');
        if trimmed.is_empty() || !is_plain_relative(Path::new(trimmed)) {
            return Err(unknown());
        }

        let relative = PathBuf::from(format!("{trimmed}.{ext}"));
        let path = self.prompts_dir().join(&relative);
        if !path.is_file() {
            return Err(unknown());
        }
        Ok(prompt_entry(&path, &relative))
    }

    pub fn load_template(&self, prompt: &PromptEntry) -> Result<String, StoreError> {
        read_text(&prompt.path)
    }

    /// Load the variable files a template refers to.
    ///
    /// Local files are only looked up when the template came from the
    /// workspace. Missing files are skipped.
    pub fn variables_for(
        &self,
        template: &Template,
        prompt: Option<&PromptEntry>,
    ) -> Result<VariableSet, StoreError> {
        let mut set = VariableSet::default();
        for occurrence in template.placeholders() {
            let placeholder = occurrence.placeholder;
            let (files, dir) = match (placeholder.scope, prompt) {
                (Scope::Global, _) => (&mut set.global, self.vars_dir()),
                (Scope::Local, Some(prompt)) => (&mut set.local, self.local_dir(prompt)),
                _ => continue,
            };
            if files.contains_key(&placeholder.name) {
                continue;
            }
            if let Some(file) = self.load_variable(&dir, &placeholder.name)? {
                files.insert(placeholder.name.clone(), file);
            }
        }
        Ok(set)
    }

    /// Directory holding the local variables of `prompt`
    pub fn local_dir(&self, prompt: &PromptEntry) -> PathBuf {
        prompt
            .id
            .split('/')
            .fold(self.prompt_vars_dir(), |dir, part| dir.join(part))
    }

    /// Read `<dir>/<name>.<ext>`; `None` when it does not exist
    pub fn load_variable(&self, dir: &Path, name: &str) -> Result<Option<VariableFile>, StoreError> {
        if !is_file_name(name) {
            warn!(name, "variable name cannot be used as a file name, skipping");
            return Ok(None);
        }
        let path = dir.join(format!("{name}.{}", self.settings.variable_extension));
        if !path.is_file() {
            debug!(path = %path.display(), "variable file missing");
            return Ok(None);
        }
        let content = read_text(&path)?;
        let file =
            VariableFile::from_str(&content).map_err(|e| StoreError::invalid_variable(&path, e))?;
        debug!(path = %path.display(), options = file.options.len(), "loaded variable file");
        Ok(Some(file))
    }

    fn is_template(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.settings.template_extension.as_str())
    }
}

fn prompt_entry(path: &Path, relative: &Path) -> PromptEntry {
    let without_ext = relative.with_extension("");
    let parts: Vec<String> = without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let display_name = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folders = parts[..parts.len().saturating_sub(1)].to_vec();
    PromptEntry {
        id: parts.join("/"),
        path: path.to_path_buf(),
        display_name,
        folders,
    }
}

fn read_text(path: &Path) -> Result<String, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| StoreError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

/// Only normal components: no root, no `..`, no `.`
fn is_plain_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn is_file_name(name: &str) -> bool {
    !name.contains(['/', '\\', '\0']) && !name.contains("..") && name != "."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_entry_from_relative_path() {
        let entry = prompt_entry(
            Path::new("/base/prompts/stories/intro.md"),
            Path::new("stories/intro.md"),
        );
        assert_eq!(entry.id, "stories/intro");
        assert_eq!(entry.display_name, "intro");
        assert_eq!(entry.folders, vec!["stories".to_string()]);
    }

    #[test]
    fn test_top_level_prompt_has_no_folders() {
        let entry = prompt_entry(Path::new("/p/hello.md"), Path::new("hello.md"));
        assert_eq!(entry.id, "hello");
        assert!(entry.folders.is_empty());
    }

    #[test]
    fn test_file_name_guard() {
        assert!(is_file_name("Character"));
        assert!(is_file_name("Main Character"));
        assert!(!is_file_name("../secret"));
        assert!(!is_file_name("a/b"));
        assert!(!is_file_name("."));
    }

    #[test]
    fn test_plain_relative_guard() {
        assert!(is_plain_relative(Path::new("a/b")));
        assert!(!is_plain_relative(Path::new("../a")));
        assert!(!is_plain_relative(Path::new("/etc/passwd")));
    }

    #[test]
    fn test_selection_without_file_becomes_entry() {
        let set = VariableSet::default();
        let catalog = set
            .catalog(&Selections::new().with_global("Name", "Bob"))
            .unwrap();
        assert_eq!(
            catalog.lookup(Scope::Global, "Name").map(|e| e.value.as_str()),
            Some("Bob")
        );
    }

    #[test]
    fn test_invalid_selection_name_is_rejected() {
        let set = VariableSet::default();
        let result = set.catalog(&Selections::new().with_local(" padded", "x"));
        assert!(matches!(result, Err(StoreError::Engine(_))));
    }
}
