//! A scanned template

use crate::error::MalformedToken;

use super::scanner::scan_with_diagnostics;
use super::token::{Placeholder, Token};

/// Template text split into tokens, plus any delimiters that fell back to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<MalformedToken>,
}

/// A placeholder together with its ordinal among all placeholders
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    pub index: usize,
    pub placeholder: &'a Placeholder,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let (tokens, diagnostics) = scan_with_diagnostics(source);
        Self {
            tokens,
            diagnostics,
        }
    }

    /// Placeholders in template order, numbered from zero
    pub fn placeholders(&self) -> impl Iterator<Item = Occurrence<'_>> {
        self.tokens
            .iter()
            .filter_map(Token::as_placeholder)
            .enumerate()
            .map(|(index, placeholder)| Occurrence { index, placeholder })
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders().count()
    }

    /// Whether the template has no placeholders at all
    pub fn is_static(&self) -> bool {
        self.tokens.iter().all(Token::is_literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Scope;

    #[test]
    fn test_occurrences_are_numbered_in_order() {
        let template = Template::parse("[[a]] text {{b}} <<a>>");
        let found: Vec<(usize, Scope, &str)> = template
            .placeholders()
            .map(|o| (o.index, o.placeholder.scope, o.placeholder.name.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (0, Scope::ShortFreeform, "a"),
                (1, Scope::Global, "b"),
                (2, Scope::Local, "a"),
            ]
        );
        assert_eq!(template.placeholder_count(), 3);
    }

    #[test]
    fn test_static_template() {
        let template = Template::parse("no {{ placeholders");
        assert!(template.is_static());
        assert_eq!(template.diagnostics.len(), 1);
    }
}
