//! Token types produced by the template scanner

use std::fmt;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Where a placeholder takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `{{name}}` - shared variable pool
    Global,
    /// `<<name>>` - variable pool paired with one template
    Local,
    /// `[[name]]` - single-line capture, never persisted
    ShortFreeform,
    /// `[[[name]]]` - multi-line capture, never persisted
    LongFreeform,
}

impl Scope {
    /// All scopes in scanning priority order (most specific delimiter first)
    pub const PRIORITY: [Scope; 4] = [
        Scope::LongFreeform,
        Scope::ShortFreeform,
        Scope::Global,
        Scope::Local,
    ];

    pub fn open(self) -> &'static str {
        match self {
            Scope::LongFreeform => "[[[",
            Scope::ShortFreeform => "[[",
            Scope::Global => "{{",
            Scope::Local => "<<",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Scope::LongFreeform => "]]]",
            Scope::ShortFreeform => "]]",
            Scope::Global => "}}",
            Scope::Local => ">>",
        }
    }

    /// Whether values for this scope come from a variable catalog
    pub fn is_catalog(self) -> bool {
        matches!(self, Scope::Global | Scope::Local)
    }

    pub fn is_freeform(self) -> bool {
        !self.is_catalog()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Local => "local",
            Scope::ShortFreeform => "short",
            Scope::LongFreeform => "long",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeholder occurrence such as `{{Name|Traveler}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub scope: Scope,
    /// Trimmed text before the first `|`
    pub name: String,
    /// Verbatim text after the first `|`, if any
    pub inline_default: Option<String>,
    /// Span of the whole placeholder including delimiters
    pub span: Span,
}

impl Placeholder {
    pub fn new(scope: Scope, name: impl Into<String>, span: Span) -> Self {
        Self {
            scope,
            name: name.into(),
            inline_default: None,
            span,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.inline_default = Some(default.into());
        self
    }
}

/// One contiguous unit of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text emitted unchanged
    Literal { text: String, span: Span },
    Placeholder(Placeholder),
}

impl Token {
    pub fn span(&self) -> &Span {
        match self {
            Token::Literal { span, .. } => span,
            Token::Placeholder(p) => &p.span,
        }
    }

    pub fn as_placeholder(&self) -> Option<&Placeholder> {
        match self {
            Token::Placeholder(p) => Some(p),
            Token::Literal { .. } => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Literal { .. })
    }
}
