//! Input fields a caller presents for a template

use std::fmt;

use crate::parser::{Scope, Template};

use super::resolver::{Resolution, Resolver};

/// How a field should be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputHint {
    /// Pick from a stored variable's options
    Choice,
    SingleLine,
    MultiLine,
}

impl From<Scope> for InputHint {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Global | Scope::Local => InputHint::Choice,
            Scope::ShortFreeform => InputHint::SingleLine,
            Scope::LongFreeform => InputHint::MultiLine,
        }
    }
}

impl fmt::Display for InputHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputHint::Choice => write!(f, "choice"),
            InputHint::SingleLine => write!(f, "line"),
            InputHint::MultiLine => write!(f, "text"),
        }
    }
}

/// One distinct `(scope, name)` pair of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub scope: Scope,
    pub name: String,
    /// Inline default of the first occurrence
    pub inline_default: Option<String>,
    pub hint: InputHint,
    /// Index of the first occurrence
    pub first_index: usize,
    pub occurrences: usize,
    /// Value the field starts out with
    pub prefill: Resolution,
}

/// Collect fields in first-occurrence order
pub fn collect_fields(template: &Template, resolver: &Resolver<'_>) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    for occurrence in template.placeholders() {
        let placeholder = occurrence.placeholder;
        if let Some(field) = fields
            .iter_mut()
            .find(|f| f.scope == placeholder.scope && f.name == placeholder.name)
        {
            field.occurrences += 1;
            continue;
        }
        fields.push(Field {
            scope: placeholder.scope,
            name: placeholder.name.clone(),
            inline_default: placeholder.inline_default.clone(),
            hint: placeholder.scope.into(),
            first_index: occurrence.index,
            occurrences: 1,
            prefill: resolver.resolve(occurrence),
        });
    }
    fields
}
