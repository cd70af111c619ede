//! Skellaprompter - compose prompts from Markdown templates
//!
//! A template holds literal text and placeholders:
//!
//! | Syntax        | Scope                      |
//! |---------------|----------------------------|
//! | `{{name}}`    | global variable            |
//! | `<<name>>`    | variable local to a prompt |
//! | `[[name]]`    | short free text            |
//! | `[[[name]]]`  | long free text             |
//!
//! Any placeholder may carry an inline default after a pipe, as in
//! `{{Character|John}}`. Malformed delimiters are kept as plain text.
//!
//! # Example
//!
//! ```rust
//! use skellaprompter::{render, VariableEntry, VariablePool};
//!
//! let mut local = VariablePool::new();
//! local.insert("Place".to_string(), VariableEntry::new("the Dungeon"));
//!
//! let text = render(
//!     "Hello {{Name|Traveler}}, welcome to <<Place>>.",
//!     VariablePool::new(),
//!     local,
//! )
//! .unwrap();
//! assert_eq!(text, "Hello Traveler, welcome to the Dungeon.");
//! ```

pub mod error;
pub mod parser;
pub mod renderer;
pub mod settings;
pub mod store;
pub mod template;

pub use error::{EngineError, MalformedReason, MalformedToken};
pub use parser::{scan, scan_with_diagnostics, Placeholder, Scope, Template, Token};
pub use settings::Settings;
pub use template::{
    Catalog, Composition, Field, InputHint, Overrides, Provenance, Resolution, VariableEntry,
    VariablePool,
};

/// Render a template against an already built catalog
///
/// # Example
///
/// ```rust
/// use skellaprompter::{compose, Catalog, Overrides};
///
/// let overrides = Overrides::new().with_name("Notes", "line1\nline2");
/// let composition = compose("[[[Notes]]]", &Catalog::new(), Some(&overrides));
/// assert_eq!(composition.text, "line1\nline2");
/// ```
pub fn compose(source: &str, catalog: &Catalog, overrides: Option<&Overrides>) -> Composition {
    Template::parse(source).compose(catalog, overrides)
}

/// Render a template from global and local variable pools
///
/// Fails only when a pool contains a name no placeholder could refer to.
pub fn render(
    source: &str,
    global: VariablePool,
    local: VariablePool,
) -> Result<String, EngineError> {
    let catalog = Catalog::build(global, local)?;
    Ok(compose(source, &catalog, None).text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_static_text() {
        let text = render("# Title\n\nBody", VariablePool::new(), VariablePool::new()).unwrap();
        assert_eq!(text, "# Title\n\nBody");
    }

    #[test]
    fn test_render_global_value() {
        let mut global = VariablePool::new();
        global.insert("X".to_string(), VariableEntry::new("V"));
        let text = render("{{X|D}}", global, VariablePool::new()).unwrap();
        assert_eq!(text, "V");
    }

    #[test]
    fn test_render_invalid_pool_error() {
        let mut global = VariablePool::new();
        global.insert(String::new(), VariableEntry::new("V"));
        let result = render("{{X}}", global, VariablePool::new());
        assert!(matches!(result, Err(EngineError::InvalidVariableName { .. })));
    }

    #[test]
    fn test_compose_reports_provenance() {
        let composition = compose("{{a|x}} [[b]]", &Catalog::new(), None);
        let provenance: Vec<Provenance> =
            composition.resolutions.iter().map(|r| r.provenance).collect();
        assert_eq!(provenance, vec![Provenance::InlineDefault, Provenance::Empty]);
        assert_eq!(composition.text, "x ");
    }
}
