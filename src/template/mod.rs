//! Variable resolution for scanned templates
//!
//! A [`Catalog`] snapshots the global and local variable pools. A
//! [`Resolver`] picks each placeholder's value from the catalog, the inline
//! default, the entry's scope default, or caller [`Overrides`] for freeform
//! placeholders. Resolution never mutates the catalog, so repeated
//! placeholders always agree.
//!
//! # Example
//!
//! ```rust
//! use skellaprompter::template::{Catalog, VariableEntry, VariablePool};
//! use skellaprompter::Template;
//!
//! let mut local = VariablePool::new();
//! local.insert("Place".to_string(), VariableEntry::new("the Dungeon"));
//! let catalog = Catalog::build(VariablePool::new(), local).unwrap();
//!
//! let template = Template::parse("Hello {{Name|Traveler}}, welcome to <<Place>>.");
//! let composition = template.compose(&catalog, None);
//! assert_eq!(composition.text, "Hello Traveler, welcome to the Dungeon.");
//! ```

mod catalog;
mod fields;
mod resolver;

pub use catalog::{Catalog, VariableEntry, VariablePool};
pub use fields::{collect_fields, Field, InputHint};
pub use resolver::{resolve, Overrides, Provenance, Resolution, Resolver};

use tracing::warn;

use crate::parser::Template;
use crate::renderer::render;

/// A rendered document and the resolution behind each placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub text: String,
    pub resolutions: Vec<Resolution>,
}

impl Template {
    /// Resolve every placeholder and render the document
    pub fn compose(&self, catalog: &Catalog, overrides: Option<&Overrides>) -> Composition {
        if let Some(overrides) = overrides.filter(|o| !o.is_empty()) {
            for index in self.unmatched_occurrences(overrides) {
                warn!(index, "occurrence capture matches no free-text placeholder");
            }
        }
        let resolver = resolver_for(catalog, overrides);
        let resolutions = resolver.resolve_all(self);
        let text = render(&self.tokens, &resolutions);
        Composition { text, resolutions }
    }

    /// The input fields for this template, pre-filled from `catalog`
    pub fn fields(&self, catalog: &Catalog, overrides: Option<&Overrides>) -> Vec<Field> {
        collect_fields(self, &resolver_for(catalog, overrides))
    }

    /// Occurrence captures that point past the last placeholder or at a
    /// catalog placeholder, ascending
    pub fn unmatched_occurrences(&self, overrides: &Overrides) -> Vec<usize> {
        let freeform: Vec<usize> = self
            .placeholders()
            .filter(|o| o.placeholder.scope.is_freeform())
            .map(|o| o.index)
            .collect();
        overrides
            .occurrences()
            .into_iter()
            .filter(|index| !freeform.contains(index))
            .collect()
    }
}

fn resolver_for<'a>(catalog: &'a Catalog, overrides: Option<&'a Overrides>) -> Resolver<'a> {
    match overrides {
        Some(overrides) => Resolver::new(catalog).with_overrides(overrides),
        None => Resolver::new(catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_agree_with_composition() {
        let template = Template::parse("{{A}} and {{A|x}} [[B|one]] [[B|two]]");
        let catalog = Catalog::new();
        let composition = template.compose(&catalog, None);
        assert_eq!(composition.text, " and  one one");

        let fields = template.fields(&catalog, None);
        assert_eq!(fields.len(), 2);
        for field in &fields {
            let rendered = &composition.resolutions[field.first_index];
            assert_eq!(&field.prefill, rendered);
        }
        assert_eq!(composition.resolutions[1].value, fields[0].prefill.value);
        assert_eq!(composition.resolutions[3].value, fields[1].prefill.value);
    }

    #[test]
    fn test_unmatched_occurrences() {
        let template = Template::parse("{{a}} [[b]] <<c>> [[[d]]]");
        let overrides = Overrides::new()
            .with_occurrence(0, "catalog")
            .with_occurrence(1, "ok")
            .with_occurrence(3, "ok")
            .with_occurrence(9, "past the end")
            .with_name("b", "by name");
        assert_eq!(template.unmatched_occurrences(&overrides), vec![0, 9]);

        // Stray captures do not change the output
        let text = template.compose(&Catalog::new(), Some(&overrides)).text;
        assert_eq!(text, " ok  ok");
    }
}
