//! Template scanning

mod document;
mod scanner;
mod token;

pub use document::{Occurrence, Template};
pub use scanner::{scan, scan_with_diagnostics};
pub use token::{Placeholder, Scope, Span, Token};
