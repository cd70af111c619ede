//! Reassembles a document from tokens and resolved values

use tracing::warn;

use crate::parser::Token;

/// Concatenate literal spans and placeholder values in token order.
///
/// Placeholders consume `values` in order. A placeholder with no matching
/// value renders as the empty string; surplus values are ignored.
pub fn render<S: AsRef<str>>(tokens: &[Token], values: &[S]) -> String {
    let mut output = String::with_capacity(estimated_len(tokens, values));
    let mut values = values.iter();
    let mut missing = 0usize;

    for token in tokens {
        match token {
            Token::Literal { text, .. } => output.push_str(text),
            Token::Placeholder(_) => match values.next() {
                Some(value) => output.push_str(value.as_ref()),
                None => missing += 1,
            },
        }
    }

    let surplus = values.count();
    if missing > 0 || surplus > 0 {
        warn!(missing, surplus, "placeholder and value counts differ");
    }
    output
}

fn estimated_len<S: AsRef<str>>(tokens: &[Token], values: &[S]) -> usize {
    let literal: usize = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Literal { text, .. } => Some(text.len()),
            Token::Placeholder(_) => None,
        })
        .sum();
    literal + values.iter().map(|v| v.as_ref().len()).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan;

    #[test]
    fn test_literals_only() {
        let tokens = scan("plain <b>markdown</b> text");
        assert_eq!(render::<&str>(&tokens, &[]), "plain <b>markdown</b> text");
    }

    #[test]
    fn test_values_replace_placeholders_in_order() {
        let tokens = scan("{{a}}-<<b>>-[[c]]");
        assert_eq!(render(&tokens, &["1", "2", "3"]), "1-2-3");
    }

    #[test]
    fn test_no_delimiters_left() {
        let tokens = scan("[[[Notes]]]");
        assert_eq!(render(&tokens, &["line1\nline2"]), "line1\nline2");
    }

    #[test]
    fn test_missing_values_render_empty() {
        let tokens = scan("x{{a}}y{{b}}z");
        assert_eq!(render(&tokens, &["1"]), "x1yz");
    }

    #[test]
    fn test_surplus_values_ignored() {
        let tokens = scan("x{{a}}");
        assert_eq!(render(&tokens, &["1", "2"]), "x1");
    }
}
