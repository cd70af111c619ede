//! Hand-written scanner for template placeholders
//!
//! The scanner walks the template as a two-state machine (`InLiteral`,
//! `InPlaceholderCandidate`). At each opening delimiter it tries the
//! delimiter forms in priority order, longest first. A candidate that does
//! not close cleanly backtracks: its first character becomes literal text and
//! scanning resumes one character later. Nothing here ever fails.
//!
//! Scanning is linear in the template length. Each delimiter family keeps the
//! position of the next character that ends placeholder content, so repeated
//! candidates never rescan the same stretch of text.

use tracing::trace;

use crate::error::{MalformedReason, MalformedToken};

use super::token::{Placeholder, Scope, Span, Token};

/// Scan a template into literal and placeholder tokens
pub fn scan(source: &str) -> Vec<Token> {
    scan_with_diagnostics(source).0
}

/// Scan a template, also reporting delimiters that degraded to literal text
pub fn scan_with_diagnostics(source: &str) -> (Vec<Token>, Vec<MalformedToken>) {
    let mut scanner = Scanner::new(source);
    scanner.run();
    trace!(
        tokens = scanner.tokens.len(),
        malformed = scanner.diagnostics.len(),
        "scanned template"
    );
    (scanner.tokens, scanner.diagnostics)
}

#[derive(Debug, Clone, Copy)]
enum State {
    InLiteral,
    InPlaceholderCandidate { start: usize },
}

/// Characters that end placeholder content, per delimiter family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Brackets,
    Braces,
    Angles,
}

impl Family {
    fn of(scope: Scope) -> Self {
        match scope {
            Scope::LongFreeform | Scope::ShortFreeform => Family::Brackets,
            Scope::Global => Family::Braces,
            Scope::Local => Family::Angles,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn stops_at(self, byte: u8) -> bool {
        match self {
            Family::Brackets => byte == b']',
            Family::Braces => byte == b'{' || byte == b'}',
            Family::Angles => byte == b'<' || byte == b'>',
        }
    }
}

/// Cached result of the last stop-character search for one family
#[derive(Debug, Clone, Copy)]
struct StopCache {
    searched_from: usize,
    found: Option<usize>,
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    tokens: Vec<Token>,
    diagnostics: Vec<MalformedToken>,
    literal_start: usize,
    stops: [Option<StopCache>; 3],
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            literal_start: 0,
            stops: [None; 3],
        }
    }

    fn run(&mut self) {
        let mut state = State::InLiteral;
        let mut pos = 0;
        loop {
            match state {
                State::InLiteral => match self.next_opener(pos) {
                    Some(at) => state = State::InPlaceholderCandidate { start: at },
                    None => break,
                },
                State::InPlaceholderCandidate { start } => {
                    match self.candidate(start) {
                        Ok(placeholder) => {
                            self.flush_literal(start);
                            pos = placeholder.span.end;
                            self.literal_start = pos;
                            self.tokens.push(Token::Placeholder(placeholder));
                        }
                        Err(malformed) => {
                            if let Some(malformed) = malformed {
                                self.report(malformed);
                            }
                            // Backtrack: the opener's first character is literal text
                            pos = start + 1;
                        }
                    }
                    state = State::InLiteral;
                }
            }
        }
        self.flush_literal(self.bytes.len());
    }

    /// Position of the next byte that could open a placeholder
    fn next_opener(&self, from: usize) -> Option<usize> {
        let rest = self.bytes.get(from..)?;
        rest.windows(2)
            .position(|w| w[0] == w[1] && matches!(w[0], b'[' | b'{' | b'<'))
            .map(|offset| from + offset)
    }

    /// Try each delimiter form at `start` in priority order.
    ///
    /// On failure returns the diagnostic for the highest-priority form whose
    /// opener was present.
    fn candidate(&mut self, start: usize) -> Result<Placeholder, Option<MalformedToken>> {
        let mut first_failure = None;
        for scope in Scope::PRIORITY {
            if !self.source[start..].starts_with(scope.open()) {
                continue;
            }
            match self.try_form(scope, start) {
                Ok(placeholder) => return Ok(placeholder),
                Err(reason) => {
                    first_failure.get_or_insert(MalformedToken {
                        span: start..start + scope.open().len(),
                        scope,
                        reason,
                    });
                }
            }
        }
        Err(first_failure)
    }

    fn try_form(&mut self, scope: Scope, start: usize) -> Result<Placeholder, MalformedReason> {
        let content_start = start + scope.open().len();
        let stop = self
            .next_stop(Family::of(scope), content_start)
            .ok_or(MalformedReason::Unterminated)?;
        if !self.source[stop..].starts_with(scope.close()) {
            return Err(MalformedReason::Interrupted);
        }

        let content = &self.source[content_start..stop];
        let (name, inline_default) = match content.split_once('|') {
            Some((name, default)) => (name.trim(), Some(default.to_string())),
            None => (content.trim(), None),
        };
        if name.is_empty() {
            return Err(MalformedReason::EmptyName);
        }

        Ok(Placeholder {
            scope,
            name: name.to_string(),
            inline_default,
            span: start..stop + scope.close().len(),
        })
    }

    /// First byte at or after `from` that ends content for `family`
    fn next_stop(&mut self, family: Family, from: usize) -> Option<usize> {
        let found = match self.stops[family.index()] {
            Some(cache) if from >= cache.searched_from => match cache.found {
                None => return None,
                Some(found) if found >= from => return Some(found),
                Some(_) => self.search(family, from, self.bytes.len()),
            },
            // Only the gap before the previous search needs scanning
            Some(cache) => self
                .search(family, from, cache.searched_from)
                .or(cache.found),
            None => self.search(family, from, self.bytes.len()),
        };
        self.stops[family.index()] = Some(StopCache {
            searched_from: from,
            found,
        });
        found
    }

    fn search(&self, family: Family, from: usize, to: usize) -> Option<usize> {
        self.bytes
            .get(from..to)
            .and_then(|range| range.iter().position(|&b| family.stops_at(b)))
            .map(|offset| from + offset)
    }

    fn report(&mut self, malformed: MalformedToken) {
        // An opener inside the previously reported opener is the same mistake
        if let Some(last) = self.diagnostics.last() {
            if malformed.span.start < last.span.end {
                return;
            }
        }
        trace!(span = ?malformed.span, reason = %malformed.reason, "malformed placeholder");
        self.diagnostics.push(malformed);
    }

    fn flush_literal(&mut self, end: usize) {
        if end > self.literal_start {
            let span: Span = self.literal_start..end;
            self.tokens.push(Token::Literal {
                text: self.source[span.clone()].to_string(),
                span,
            });
        }
        self.literal_start = end;
    }
}
