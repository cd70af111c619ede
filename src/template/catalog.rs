//! Variable catalog for global and local placeholder lookup

use std::collections::HashMap;

use crate::error::EngineError;
use crate::parser::Scope;

/// One named value in a variable pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableEntry {
    /// Current value, possibly empty
    pub value: String,
    /// Used when the value is empty and the placeholder has no inline default
    pub scope_default: Option<String>,
}

impl VariableEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scope_default: None,
        }
    }

    /// An entry with no current value, only a fallback
    pub fn default_only(default: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            scope_default: Some(default.into()),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.scope_default = Some(default.into());
        self
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Name to entry mapping for one scope
pub type VariablePool = HashMap<String, VariableEntry>;

/// Read-only snapshot of the global and local pools for one render.
///
/// The two pools are separate namespaces: the same name may appear in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    global: VariablePool,
    local: VariablePool,
}

impl Catalog {
    /// An empty catalog: every lookup misses
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting pool keys no placeholder could reference
    pub fn build(global: VariablePool, local: VariablePool) -> Result<Self, EngineError> {
        validate_pool(Scope::Global, &global)?;
        validate_pool(Scope::Local, &local)?;
        Ok(Self { global, local })
    }

    /// Look up `name` in the pool for `scope`.
    ///
    /// Freeform scopes have no pool and always miss.
    pub fn lookup(&self, scope: Scope, name: &str) -> Option<&VariableEntry> {
        match scope {
            Scope::Global => self.global.get(name),
            Scope::Local => self.local.get(name),
            Scope::ShortFreeform | Scope::LongFreeform => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.local.is_empty()
    }
}

fn validate_pool(scope: Scope, pool: &VariablePool) -> Result<(), EngineError> {
    for name in pool.keys() {
        if let Some(reason) = invalid_name_reason(scope, name) {
            return Err(EngineError::invalid_name(scope, name.clone(), reason));
        }
    }
    Ok(())
}

fn invalid_name_reason(scope: Scope, name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("name is empty");
    }
    if name.trim() != name {
        return Some("name has surrounding whitespace");
    }
    if name.contains('|') {
        return Some("name contains '|'");
    }
    let delimiter = match scope {
        Scope::Global => name.contains(['{', '}']),
        Scope::Local => name.contains(['<', '>']),
        Scope::ShortFreeform | Scope::LongFreeform => false,
    };
    if delimiter {
        return Some("name contains a delimiter character");
    }
    None
}
