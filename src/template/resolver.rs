//! Placeholder resolution - picks the value each placeholder renders as

use std::collections::HashMap;

use tracing::trace;

use crate::parser::{Occurrence, Placeholder, Scope, Template};

use super::catalog::Catalog;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Non-empty value stored in the catalog
    CatalogValue,
    /// Caller capture for a freeform placeholder
    Override,
    /// Text after `|` in the placeholder itself
    InlineDefault,
    /// Fallback stored alongside an empty catalog entry
    ScopeDefault,
    Empty,
}

/// Final value of one placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    pub provenance: Provenance,
}

impl Resolution {
    fn new(value: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            value: value.into(),
            provenance,
        }
    }

    fn empty() -> Self {
        Self::new(String::new(), Provenance::Empty)
    }
}

impl AsRef<str> for Resolution {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Caller-captured values for freeform placeholders.
///
/// Captures keyed by occurrence index take precedence over captures keyed by
/// name. An empty capture counts as no capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    by_name: HashMap<String, String>,
    by_occurrence: HashMap<usize, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a value for every freeform occurrence named `name`
    pub fn with_name(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_name(name, value);
        self
    }

    /// Capture a value for the placeholder at `index` only
    pub fn with_occurrence(mut self, index: usize, value: impl Into<String>) -> Self {
        self.insert_occurrence(index, value);
        self
    }

    pub fn insert_name(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.by_name.insert(name.into(), value.into());
    }

    pub fn insert_occurrence(&mut self, index: usize, value: impl Into<String>) {
        self.by_occurrence.insert(index, value.into());
    }

    /// Capture for an occurrence, if any non-empty one applies
    pub fn get(&self, index: Option<usize>, name: &str) -> Option<&str> {
        index
            .and_then(|i| self.by_occurrence.get(&i))
            .filter(|v| !v.is_empty())
            .or_else(|| self.by_name.get(name).filter(|v| !v.is_empty()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_occurrence.is_empty()
    }

    /// Occurrence indices with a capture, ascending
    pub fn occurrences(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.by_occurrence.keys().copied().collect();
        indices.sort_unstable();
        indices
    }
}

/// Resolves placeholders against one catalog snapshot
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    overrides: Option<&'a Overrides>,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            overrides: None,
        }
    }

    pub fn with_overrides(mut self, overrides: &'a Overrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Resolve one occurrence; occurrence-keyed overrides apply
    pub fn resolve(&self, occurrence: Occurrence<'_>) -> Resolution {
        let placeholder = occurrence.placeholder;
        self.resolve_at(
            placeholder,
            Some(occurrence.index),
            placeholder.inline_default.as_deref(),
        )
    }

    /// Resolve a placeholder without knowing its position
    pub fn resolve_placeholder(&self, placeholder: &Placeholder) -> Resolution {
        self.resolve_at(placeholder, None, placeholder.inline_default.as_deref())
    }

    /// Resolve every placeholder of a template, in order.
    ///
    /// The first occurrence of a `(scope, name)` pair supplies the inline
    /// default for all of its occurrences.
    pub fn resolve_all(&self, template: &Template) -> Vec<Resolution> {
        let mut first_defaults: HashMap<(Scope, &str), Option<&str>> = HashMap::new();
        template
            .placeholders()
            .map(|o| {
                let placeholder = o.placeholder;
                let default = *first_defaults
                    .entry((placeholder.scope, placeholder.name.as_str()))
                    .or_insert(placeholder.inline_default.as_deref());
                self.resolve_at(placeholder, Some(o.index), default)
            })
            .collect()
    }

    fn resolve_at(
        &self,
        placeholder: &Placeholder,
        index: Option<usize>,
        inline_default: Option<&str>,
    ) -> Resolution {
        let resolution = if placeholder.scope.is_catalog() {
            self.resolve_catalog(placeholder, inline_default)
        } else {
            self.resolve_freeform(placeholder, index, inline_default)
        };
        trace!(
            scope = %placeholder.scope,
            name = %placeholder.name,
            provenance = ?resolution.provenance,
            "resolved placeholder"
        );
        resolution
    }

    fn resolve_catalog(
        &self,
        placeholder: &Placeholder,
        inline_default: Option<&str>,
    ) -> Resolution {
        let entry = self.catalog.lookup(placeholder.scope, &placeholder.name);

        if let Some(entry) = entry.filter(|e| e.has_value()) {
            return Resolution::new(entry.value.clone(), Provenance::CatalogValue);
        }
        if let Some(default) = inline_default {
            return Resolution::new(default, Provenance::InlineDefault);
        }
        if let Some(default) = entry.and_then(|e| e.scope_default.as_ref()) {
            return Resolution::new(default.clone(), Provenance::ScopeDefault);
        }
        Resolution::empty()
    }

    fn resolve_freeform(
        &self,
        placeholder: &Placeholder,
        index: Option<usize>,
        inline_default: Option<&str>,
    ) -> Resolution {
        if let Some(value) = self
            .overrides
            .and_then(|o| o.get(index, &placeholder.name))
        {
            return Resolution::new(value, Provenance::Override);
        }
        match inline_default {
            Some(default) => Resolution::new(default, Provenance::InlineDefault),
            None => Resolution::empty(),
        }
    }
}

/// Resolve a single placeholder against a catalog
pub fn resolve(placeholder: &Placeholder, catalog: &Catalog) -> Resolution {
    Resolver::new(catalog).resolve_placeholder(placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::catalog::{VariableEntry, VariablePool};

    fn catalog(global: &[(&str, VariableEntry)], local: &[(&str, VariableEntry)]) -> Catalog {
        let to_pool = |entries: &[(&str, VariableEntry)]| -> VariablePool {
            entries
                .iter()
                .map(|(n, e)| (n.to_string(), e.clone()))
                .collect()
        };
        Catalog::build(to_pool(global), to_pool(local)).expect("valid pools")
    }

    fn global(name: &str) -> Placeholder {
        Placeholder::new(Scope::Global, name, 0..1)
    }

    #[test]
    fn test_missing_without_default_is_empty() {
        let r = resolve(&global("Name"), &Catalog::new());
        assert_eq!(r, Resolution::empty());
    }

    #[test]
    fn test_inline_default_when_missing() {
        let r = resolve(&global("Name").with_default("Traveler"), &Catalog::new());
        assert_eq!(r.value, "Traveler");
        assert_eq!(r.provenance, Provenance::InlineDefault);
    }

    #[test]
    fn test_catalog_value_beats_inline_default() {
        let cat = catalog(&[("X", VariableEntry::new("V"))], &[]);
        let r = resolve(&global("X").with_default("D"), &cat);
        assert_eq!(r.value, "V");
        assert_eq!(r.provenance, Provenance::CatalogValue);
    }

    #[test]
    fn test_inline_default_beats_scope_default() {
        let cat = catalog(&[("X", VariableEntry::default_only("S"))], &[]);
        let r = resolve(&global("X").with_default("D"), &cat);
        assert_eq!(r.value, "D");
    }

    #[test]
    fn test_scope_default_when_value_empty() {
        let cat = catalog(&[("X", VariableEntry::default_only("S"))], &[]);
        let r = resolve(&global("X"), &cat);
        assert_eq!(r.value, "S");
        assert_eq!(r.provenance, Provenance::ScopeDefault);
    }

    #[test]
    fn test_empty_entry_without_defaults() {
        let cat = catalog(&[("X", VariableEntry::new(""))], &[]);
        assert_eq!(resolve(&global("X"), &cat), Resolution::empty());
    }

    #[test]
    fn test_scopes_do_not_leak() {
        let cat = catalog(&[("Place", VariableEntry::new("global"))], &[]);
        let local = Placeholder::new(Scope::Local, "Place", 0..1);
        assert_eq!(resolve(&local, &cat).provenance, Provenance::Empty);
    }

    #[test]
    fn test_freeform_ignores_catalog() {
        let cat = catalog(&[("Y", VariableEntry::new("from catalog"))], &[]);
        let short = Placeholder::new(Scope::ShortFreeform, "Y", 0..1);
        let long = Placeholder::new(Scope::LongFreeform, "Y", 0..1).with_default("d");
        assert_eq!(resolve(&short, &cat).value, "");
        assert_eq!(resolve(&long, &cat).value, "d");
    }

    #[test]
    fn test_override_applies_to_freeform_only() {
        let overrides = Overrides::new().with_name("Notes", "captured");
        let cat = Catalog::new();
        let resolver = Resolver::new(&cat).with_overrides(&overrides);

        let long = Placeholder::new(Scope::LongFreeform, "Notes", 0..1).with_default("d");
        let r = resolver.resolve_placeholder(&long);
        assert_eq!(r.value, "captured");
        assert_eq!(r.provenance, Provenance::Override);

        let global = global("Notes");
        assert_eq!(resolver.resolve_placeholder(&global).value, "");
    }

    #[test]
    fn test_occurrence_override_beats_name_override() {
        let template = Template::parse("[[a]] [[a]]");
        let overrides = Overrides::new()
            .with_name("a", "by name")
            .with_occurrence(1, "second");
        let cat = Catalog::new();
        let values: Vec<String> = Resolver::new(&cat)
            .with_overrides(&overrides)
            .resolve_all(&template)
            .into_iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(values, vec!["by name", "second"]);
    }

    #[test]
    fn test_empty_override_falls_back_to_inline_default() {
        let overrides = Overrides::new().with_name("a", "");
        let cat = Catalog::new();
        let short = Placeholder::new(Scope::ShortFreeform, "a", 0..1).with_default("d");
        let r = Resolver::new(&cat)
            .with_overrides(&overrides)
            .resolve_placeholder(&short);
        assert_eq!(r.value, "d");
        assert_eq!(r.provenance, Provenance::InlineDefault);
    }

    #[test]
    fn test_first_inline_default_governs_repeats() {
        let template = Template::parse("{{A}} and {{A|x}} [[B|one]] [[B|two]] <<A|y>>");
        let cat = Catalog::new();
        let values: Vec<String> = Resolver::new(&cat)
            .resolve_all(&template)
            .into_iter()
            .map(|r| r.value)
            .collect();
        // Local A is a different variable from global A
        assert_eq!(values, vec!["", "", "one", "one", "y"]);
    }

    #[test]
    fn test_first_default_applies_before_scope_default() {
        let cat = catalog(&[("A", VariableEntry::default_only("S"))], &[]);
        let template = Template::parse("{{A|first}} {{A}}");
        let resolutions = Resolver::new(&cat).resolve_all(&template);
        assert_eq!(resolutions[1].value, "first");
        assert_eq!(resolutions[1].provenance, Provenance::InlineDefault);
    }

    #[test]
    fn test_occurrence_indices_sorted() {
        let overrides = Overrides::new()
            .with_occurrence(4, "x")
            .with_occurrence(1, "y")
            .with_name("n", "z");
        assert_eq!(overrides.occurrences(), vec![1, 4]);
        assert!(!overrides.is_empty());
        assert!(Overrides::new().is_empty());
    }

    #[test]
    fn test_duplicates_resolve_identically() {
        let template = Template::parse("{{Z}} and {{Z}}");
        let cat = Catalog::new();
        let resolutions = Resolver::new(&cat).resolve_all(&template);
        assert_eq!(resolutions.len(), 2);
        assert_eq!(resolutions[0], resolutions[1]);
    }
}
