//! Error types and scanner diagnostics

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::{Scope, Span};

/// Errors raised at the engine boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A pool key that no placeholder could ever reference
    #[error("invalid {scope} variable name {name:?}: {reason}")]
    InvalidVariableName {
        scope: Scope,
        name: String,
        reason: &'static str,
    },
}

impl EngineError {
    pub fn invalid_name(scope: Scope, name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidVariableName {
            scope,
            name: name.into(),
            reason,
        }
    }
}

/// Why a delimiter sequence fell back to literal text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// No closing delimiter before end of input
    Unterminated,
    /// Nothing but whitespace before the `|` (or no content at all)
    EmptyName,
    /// A delimiter character appeared before the closing delimiter
    Interrupted,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::Unterminated => write!(f, "unterminated"),
            MalformedReason::EmptyName => write!(f, "empty name"),
            MalformedReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// A delimiter that was emitted as literal text.
///
/// Never an error: rendering always proceeds. Collected so callers can warn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedToken {
    /// Span of the opening delimiter
    pub span: Span,
    pub scope: Scope,
    pub reason: MalformedReason,
}

impl fmt::Display for MalformedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} placeholder at {:?} left as text",
            self.reason, self.scope, self.span
        )
    }
}

impl MalformedToken {
    pub fn message(&self) -> String {
        let open = self.scope.open();
        let close = self.scope.close();
        match self.reason {
            MalformedReason::Unterminated => format!("'{open}' is never closed by '{close}'"),
            MalformedReason::EmptyName => format!("'{open}{close}' has no variable name"),
            MalformedReason::Interrupted => {
                format!("'{open}' is interrupted by a delimiter character before '{close}'")
            }
        }
    }

    /// Format the warning with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = char_span(source, &self.span);
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Warning, filename, span.start)
            .with_message(format!("malformed {} placeholder", self.scope))
            .with_label(
                Label::new((filename, span))
                    .with_message(self.message())
                    .with_color(Color::Yellow),
            )
            .with_note("the text is kept as written")
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// ariadne labels count characters, spans count bytes
fn char_span(source: &str, span: &Span) -> Span {
    let start = source.get(..span.start).map_or(0, |s| s.chars().count());
    let len = source
        .get(span.start..span.end)
        .map_or(0, |s| s.chars().count());
    start..start + len
}
