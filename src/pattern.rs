//! The type-pattern engine (C1): a value that validates and coerces a single
//! stream token (or a run of tokens, for `AllParam`/`sequence`) into a typed
//! [`Value`].

use crate::value::{Token, Value};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// How a pattern decides whether a token matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Accepts any single token unconditionally.
    Direct,
    /// Matches a string token against a regex, keeping the raw text.
    RegexMatch,
    /// Matches a string token against a regex, then runs a transform.
    RegexTransform,
    /// Matches a payload token by its runtime type tag.
    TypeCheck,
    /// Matches a string token, converting it with a fallible transform.
    TypeConvert,
}

/// The outcome of attempting to match a pattern against the head of a token
/// slice.
#[derive(Clone, Debug)]
pub enum Outcome {
    Success { value: Value, consumed: usize },
    Failure { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

type Transform = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;
type Predicate = Arc<dyn Fn(&Token) -> bool + Send + Sync>;

enum Matcher {
    Direct,
    Regex(Regex),
    RegexTransform(Regex, Transform),
    TypeCheck(&'static str),
    Predicate(Predicate),
    Literal(Vec<String>),
    All,
    Empty,
    Union(Vec<Pattern>),
    Sequence(Vec<Pattern>),
    Anti(Box<Pattern>),
    Optional(Box<Pattern>, Value),
}

struct Inner {
    name: String,
    kind: TokenKind,
    matcher: Matcher,
}

/// A composable, value-equal-by-identity matcher for one logical argument
/// value. Cheap to clone (an `Arc` around the matcher).
#[derive(Clone)]
pub struct Pattern(Arc<Inner>);

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({})", self.0.name)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Pattern {
    fn new(name: impl Into<String>, kind: TokenKind, matcher: Matcher) -> Self {
        Pattern(Arc::new(Inner { name: name.into(), kind, matcher }))
    }

    pub fn display_name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> TokenKind {
        self.0.kind
    }

    /// Total: always returns a result, never panics, for any slice
    /// (including an empty one).
    pub fn try_match(&self, tokens: &[Token]) -> Outcome {
        match &self.0.matcher {
            Matcher::Direct => match tokens.first() {
                Some(Token::Text(s)) => {
                    Outcome::Success { value: Value::Str(s.clone()), consumed: 1 }
                }
                Some(Token::Payload(p)) => {
                    Outcome::Success { value: Value::Payload(p.clone()), consumed: 1 }
                }
                None => Outcome::Failure { reason: "no token available".into() },
            },
            Matcher::Regex(re) => match tokens.first() {
                Some(Token::Text(s)) if re.is_match(s) => {
                    Outcome::Success { value: Value::Str(s.clone()), consumed: 1 }
                }
                Some(Token::Text(s)) => {
                    Outcome::Failure { reason: format!("`{s}` does not match {}", self.0.name) }
                }
                _ => Outcome::Failure { reason: "expected a text token".into() },
            },
            Matcher::RegexTransform(re, transform) => match tokens.first() {
                Some(Token::Text(s)) if re.is_match(s) => match transform(s) {
                    Ok(value) => Outcome::Success { value, consumed: 1 },
                    Err(reason) => Outcome::Failure { reason },
                },
                Some(Token::Text(s)) => {
                    Outcome::Failure { reason: format!("`{s}` does not match {}", self.0.name) }
                }
                _ => Outcome::Failure { reason: "expected a text token".into() },
            },
            Matcher::TypeCheck(tag) => match tokens.first() {
                Some(Token::Payload(p)) if p.type_name() == *tag => {
                    Outcome::Success { value: Value::Payload(p.clone()), consumed: 1 }
                }
                Some(_) => Outcome::Failure { reason: format!("expected a `{tag}` payload") },
                None => Outcome::Failure { reason: "no token available".into() },
            },
            Matcher::Predicate(pred) => match tokens.first() {
                Some(tok) if pred(tok) => {
                    let value = match tok {
                        Token::Text(s) => Value::Str(s.clone()),
                        Token::Payload(p) => Value::Payload(p.clone()),
                    };
                    Outcome::Success { value, consumed: 1 }
                }
                Some(_) => Outcome::Failure { reason: format!("does not satisfy {}", self.0.name) },
                None => Outcome::Failure { reason: "no token available".into() },
            },
            Matcher::Literal(choices) => match tokens.first() {
                Some(Token::Text(s)) if choices.iter().any(|c| c == s) => {
                    Outcome::Success { value: Value::Str(s.clone()), consumed: 1 }
                }
                _ => Outcome::Failure { reason: format!("expected one of {:?}", choices) },
            },
            Matcher::All => {
                if tokens.is_empty() {
                    return Outcome::Success { value: Value::List(Vec::new()), consumed: 0 };
                }
                let values = tokens
                    .iter()
                    .map(|t| match t {
                        Token::Text(s) => Value::Str(s.clone()),
                        Token::Payload(p) => Value::Payload(p.clone()),
                    })
                    .collect();
                Outcome::Success { value: Value::List(values), consumed: tokens.len() }
            }
            Matcher::Empty => Outcome::Success { value: Value::Empty, consumed: 0 },
            Matcher::Union(patterns) => {
                for p in patterns {
                    let outcome = p.try_match(tokens);
                    if outcome.is_success() {
                        return outcome;
                    }
                }
                Outcome::Failure { reason: format!("no alternative of {} matched", self.0.name) }
            }
            Matcher::Sequence(patterns) => {
                let mut total = 0usize;
                let mut values = Vec::with_capacity(patterns.len());
                for p in patterns {
                    match p.try_match(&tokens[total..]) {
                        Outcome::Success { value, consumed } => {
                            values.push(value);
                            total += consumed;
                        }
                        Outcome::Failure { reason } => return Outcome::Failure { reason },
                    }
                }
                Outcome::Success { value: Value::List(values), consumed: total }
            }
            Matcher::Anti(inner) => {
                if inner.try_match(tokens).is_success() {
                    Outcome::Failure { reason: format!("must not match {}", inner.display_name()) }
                } else {
                    match tokens.first() {
                        Some(Token::Text(s)) => {
                            Outcome::Success { value: Value::Str(s.clone()), consumed: 1 }
                        }
                        Some(Token::Payload(p)) => {
                            Outcome::Success { value: Value::Payload(p.clone()), consumed: 1 }
                        }
                        None => Outcome::Failure { reason: "no token available".into() },
                    }
                }
            }
            Matcher::Optional(inner, default) => match inner.try_match(tokens) {
                success @ Outcome::Success { .. } => success,
                Outcome::Failure { .. } => {
                    Outcome::Success { value: default.clone(), consumed: 0 }
                }
            },
        }
    }
}

// ---- combinators -----------------------------------------------------

pub fn union(name: impl Into<String>, patterns: Vec<Pattern>) -> Pattern {
    Pattern::new(name, TokenKind::Direct, Matcher::Union(patterns))
}

pub fn sequence(name: impl Into<String>, patterns: Vec<Pattern>) -> Pattern {
    Pattern::new(name, TokenKind::Direct, Matcher::Sequence(patterns))
}

pub fn anti(pattern: Pattern) -> Pattern {
    let name = format!("!{}", pattern.display_name());
    Pattern::new(name, TokenKind::Direct, Matcher::Anti(Box::new(pattern)))
}

pub fn optional(pattern: Pattern, default: Value) -> Pattern {
    let name = format!("{}?", pattern.display_name());
    Pattern::new(name, TokenKind::Direct, Matcher::Optional(Box::new(pattern), default))
}

pub fn predicate(
    name: impl Into<String>,
    f: impl Fn(&Token) -> bool + Send + Sync + 'static,
) -> Pattern {
    Pattern::new(name, TokenKind::Direct, Matcher::Predicate(Arc::new(f)))
}

pub fn literal(name: impl Into<String>, choices: Vec<String>) -> Pattern {
    Pattern::new(name, TokenKind::Direct, Matcher::Literal(choices))
}

pub fn type_check(name: impl Into<String>, type_tag: &'static str) -> Pattern {
    Pattern::new(name, TokenKind::TypeCheck, Matcher::TypeCheck(type_tag))
}

fn regex_transform(
    name: &'static str,
    re: &str,
    transform: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
) -> Pattern {
    Pattern::new(
        name,
        TokenKind::RegexTransform,
        Matcher::RegexTransform(Regex::new(re).expect("builtin regex is valid"), Arc::new(transform)),
    )
}

// ---- predefined patterns ----------------------------------------------

pub fn int() -> Pattern {
    regex_transform("int", r"^[+-]?\d+$", |s| {
        s.parse::<i64>().map(Value::Int).map_err(|e| e.to_string())
    })
}

pub fn float() -> Pattern {
    regex_transform("float", r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$", |s| {
        s.parse::<f64>().map(Value::Float).map_err(|e| e.to_string())
    })
}

pub fn bool_() -> Pattern {
    regex_transform("bool", r"(?i)^(true|false|yes|no|on|off)$", |s| {
        match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(format!("`{s}` is not a boolean")),
        }
    })
}

pub fn str_() -> Pattern {
    Pattern::new("str", TokenKind::Direct, Matcher::Direct)
}

pub fn url() -> Pattern {
    regex_transform("url", r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s]+$", |s| Ok(Value::Str(s.to_string())))
}

pub fn ip() -> Pattern {
    regex_transform(
        "ip",
        r"^(\d{1,3}\.){3}\d{1,3}(:\d{1,5})?$",
        |s| Ok(Value::Str(s.to_string())),
    )
}

pub fn email() -> Pattern {
    regex_transform(
        "email",
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
        |s| Ok(Value::Str(s.to_string())),
    )
}

pub fn hex() -> Pattern {
    regex_transform("hex", r"^(0[xX])?[0-9a-fA-F]+$", |s| {
        let trimmed = s.trim_start_matches("0x").trim_start_matches("0X");
        i64::from_str_radix(trimmed, 16).map(Value::Int).map_err(|e| e.to_string())
    })
}

/// Accepts exactly one token of any kind, text or payload.
pub fn any_one() -> Pattern {
    Pattern::new("any", TokenKind::Direct, Matcher::Direct)
}

/// Consumes the rest of the stream as a single list value. With `greedy =
/// false` (the default produced here) the caller is expected to scope the
/// slice it hands to `try_match` to the current node's remaining tokens;
/// `greedy = true` variants are opted into explicitly at the `Args` level
/// (see [`crate::args::ArgFlag::GREEDY`]).
pub fn all_param() -> Pattern {
    Pattern::new("...", TokenKind::Direct, Matcher::All)
}

/// A sentinel pattern that always succeeds, consuming nothing.
pub fn empty() -> Pattern {
    Pattern::new("empty", TokenKind::Direct, Matcher::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn int_matches_and_converts() {
        let p = int();
        match p.try_match(&[text("42")]) {
            Outcome::Success { value, consumed } => {
                assert_eq!(consumed, 1);
                assert_eq!(value.as_i64(), Some(42));
            }
            Outcome::Failure { reason } => panic!("unexpected failure: {reason}"),
        }
    }

    #[test]
    fn int_rejects_non_numeric() {
        let p = int();
        assert!(!p.try_match(&[text("abc")]).is_success());
    }

    #[test]
    fn union_tries_left_to_right() {
        let p = union("int-or-str", vec![int(), str_()]);
        assert!(matches!(
            p.try_match(&[text("7")]),
            Outcome::Success { value: Value::Int(7), .. }
        ));
        assert!(matches!(
            p.try_match(&[text("hi")]),
            Outcome::Success { value: Value::Str(_), .. }
        ));
    }

    #[test]
    fn optional_never_fails() {
        let p = optional(int(), Value::Int(0));
        match p.try_match(&[text("nope")]) {
            Outcome::Success { value, consumed } => {
                assert_eq!(consumed, 0);
                assert_eq!(value.as_i64(), Some(0));
            }
            _ => panic!("optional must not fail"),
        }
    }

    #[test]
    fn anti_inverts() {
        let p = anti(int());
        assert!(!p.try_match(&[text("7")]).is_success());
        assert!(p.try_match(&[text("hi")]).is_success());
    }

    #[test]
    fn all_param_consumes_remainder() {
        let p = all_param();
        let toks = vec![text("a"), text("b"), text("c")];
        match p.try_match(&toks) {
            Outcome::Success { value: Value::List(items), consumed } => {
                assert_eq!(consumed, 3);
                assert_eq!(items.len(), 3);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
