//! The data-collection container (C5): a normalised view over a
//! heterogeneous input stream that reconciles plain text with opaque
//! payloads while preserving ordering and indices.

use crate::value::Token;
use indexmap::IndexSet;

/// A sequence of [`Token`]s plus a cursor. Every mutating method advances or
/// rewinds the cursor only; the underlying token vector is never touched
/// after construction, so `origin()` always reflects the caller's input.
#[derive(Clone, Debug)]
pub struct DataCollection {
    tokens: Vec<Token>,
    pos: usize,
}

impl DataCollection {
    pub fn new(tokens: Vec<Token>) -> Self {
        DataCollection { tokens, pos: 0 }
    }

    /// Tokenizes a plain string by whitespace, preserving quoted
    /// substrings as single tokens and stripping CR/LF unless `keep_crlf`.
    pub fn from_str(input: &str, keep_crlf: bool) -> Self {
        let cleaned: String = if keep_crlf {
            input.to_string()
        } else {
            input.chars().filter(|c| *c != '\r' && *c != '\n').collect()
        };
        DataCollection::new(tokenize_quoted(&cleaned))
    }

    /// Builds a collection from a sequence of text/payload tokens, dropping
    /// any payload whose type tag is in `filter_out`.
    pub fn from_mixed(items: Vec<Token>, filter_out: &IndexSet<String>) -> Self {
        let tokens = items
            .into_iter()
            .filter(|t| match t {
                Token::Payload(p) => !filter_out.contains(p.type_name()),
                Token::Text(_) => true,
            })
            .collect();
        DataCollection::new(tokens)
    }

    /// All tokens as originally supplied, regardless of cursor position.
    pub fn origin(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_text(&self) -> Option<&str> {
        self.peek().and_then(Token::as_text)
    }

    pub fn pop_front(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// The tokens from the cursor to the end, for patterns that may consume
    /// more than one token (e.g. `AllParam`, `sequence`).
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    /// Splits the current head *text* token on the first occurrence of
    /// `sep`, returning `(before, after)` without consuming the token. The
    /// analyser uses this to peel one word off a packed token like
    /// `--foo=bar` without destroying the tail.
    pub fn split_once(&self, sep: &str) -> Option<(String, String)> {
        let head = self.peek_text()?;
        head.split_once(sep).map(|(a, b)| (a.to_string(), b.to_string()))
    }

    /// A restorable cursor position, used by the analyser's backtracking
    /// discipline: every attempt that consumes tokens records one of these
    /// before it starts, and restores it on failure.
    pub fn savepoint(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, savepoint: usize) {
        self.pos = savepoint;
    }

    pub fn rewind(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    pub fn len_remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }
}

/// Whitespace tokenizer that keeps `'...'`/`"..."` runs as a single token
/// and drops the quote characters themselves.
fn tokenize_quoted(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            } else {
                current.push(c);
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                in_token = true;
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(Token::Text(std::mem::take(&mut current)));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(Token::Text(current));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_whitespace() {
        let dc = DataCollection::from_str("test hello world", false);
        assert_eq!(dc.origin().len(), 3);
        assert_eq!(dc.origin()[0].as_text(), Some("test"));
    }

    #[test]
    fn preserves_quoted_substrings() {
        let dc = DataCollection::from_str(r#"say "hello world" now"#, false);
        let texts: Vec<_> = dc.origin().iter().filter_map(Token::as_text).collect();
        assert_eq!(texts, vec!["say", "hello world", "now"]);
    }

    #[test]
    fn strips_crlf_unless_kept() {
        let dc = DataCollection::from_str("a\r\nb", false);
        let texts: Vec<_> = dc.origin().iter().filter_map(Token::as_text).collect();
        assert_eq!(texts, vec!["ab"]);
    }

    #[test]
    fn savepoint_restores_position() {
        let mut dc = DataCollection::from_str("a b c", false);
        dc.pop_front();
        let sp = dc.savepoint();
        dc.pop_front();
        dc.restore(sp);
        assert_eq!(dc.peek_text(), Some("b"));
    }
}
