//! The pattern-string mini-grammar (§6): a textual shorthand for building
//! `Args`/`OptionNode`/headers without the declarative builder calls.
//!
//! - Head: `name` or `[p1|p2|...]` alternatives.
//! - Arg slot: `<name:type>` required, `<name:type=default>` defaulted,
//!   `[name]` literal.
//! - Help: trailing `#help text` applies to the nearest preceding element.
//! - Option: `--long|-short <arg:type> [true|false|const] #help`.
//!
//! The bracketed `store_const` value is parsed by [`parse_const_literal`],
//! a closed-set literal parser — never host-language evaluation.

use crate::args::{ArgField, Args};
use crate::command::Header;
use crate::error::{Error, Result};
use crate::node::{ArgAction, OptionNode, StoreConst, StoreFalse, StoreTrue};
use crate::pattern::{self, Pattern};
use crate::value::Value;
use std::sync::Arc;

/// Parses a command head: a bare name, or `[a|b|c]` alternatives.
pub fn parse_head(s: &str) -> Result<Vec<Header>> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        if inner.is_empty() {
            return Err(Error::Grammar("empty head alternatives".into()));
        }
        Ok(inner.split('|').map(|p| Header::bare(p.trim())).collect())
    } else if s.is_empty() {
        Err(Error::Grammar("empty head".into()))
    } else {
        Ok(vec![Header::bare(s)])
    }
}

fn type_from_name(name: &str) -> Result<Pattern> {
    Ok(match name {
        "int" => pattern::int(),
        "float" => pattern::float(),
        "bool" => pattern::bool_(),
        "str" => pattern::str_(),
        "url" => pattern::url(),
        "ip" => pattern::ip(),
        "email" => pattern::email(),
        "hex" => pattern::hex(),
        "any" => pattern::any_one(),
        other => return Err(Error::Grammar(format!("unknown type `{other}` in grammar"))),
    })
}

/// A safe literal parser for the closed set `{true, false, integer, float,
/// quoted string, bare identifier}`. No host-language evaluation.
pub fn parse_const_literal(s: &str) -> Result<Value> {
    match s {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    if let Ok(f) = s.parse::<f64>() {
        return Ok(Value::Float(f));
    }
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        return Ok(Value::Str(s[1..s.len() - 1].to_string()));
    }
    if !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Ok(Value::Str(s.to_string()));
    }
    Err(Error::Grammar(format!("`{s}` is not a valid literal")))
}

/// Parses a sequence of `<name:type>`, `<name:type=default>`, `[name]`, and
/// `#help` grammar tokens into an `Args`.
pub fn parse_args_grammar(s: &str) -> Result<Args> {
    let mut args = Args::new();
    let tokens: Vec<&str> = s.split_whitespace().collect();
    let mut iter = tokens.into_iter().peekable();
    let mut last_name: Option<String> = None;

    while let Some(tok) = iter.next() {
        if let Some(rest) = tok.strip_prefix('#') {
            let mut parts = vec![rest.to_string()];
            while let Some(next) = iter.peek() {
                if next.starts_with('<') || next.starts_with('[') {
                    break;
                }
                parts.push(iter.next().unwrap().to_string());
            }
            let help = parts.join(" ");
            if let Some(name) = &last_name {
                args = args.with_field(name, ArgField { notice: Some(help), ..Default::default() });
            }
            continue;
        }

        if let Some(inner) = tok.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            let (name_and_type, default) = match inner.split_once('=') {
                Some((a, b)) => (a, Some(b)),
                None => (inner, None),
            };
            let (name, ty) = name_and_type
                .split_once(':')
                .ok_or_else(|| Error::Grammar(format!("missing `:type` in `{tok}`")))?;
            let pattern = type_from_name(ty)?;
            args = match default {
                Some(d) => {
                    let value = parse_const_literal(d)?;
                    args.push_optional(name, pattern, value)
                }
                None => args.push(name, pattern),
            };
            last_name = Some(name.to_string());
        } else if let Some(name) = tok.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            args = args.push_optional(
                name,
                pattern::literal(name, vec![name.to_string()]),
                Value::Str(name.to_string()),
            );
            last_name = Some(name.to_string());
        } else {
            return Err(Error::Grammar(format!("unrecognised grammar token `{tok}`")));
        }
    }
    Ok(args)
}

/// Parses a full option-grammar string: `--long|-short <arg:type>
/// [true|false|const] #help`.
pub fn parse_option_grammar(s: &str) -> Result<OptionNode> {
    let mut tokens = s.split_whitespace().peekable();
    let head = tokens.next().ok_or_else(|| Error::Grammar("empty option grammar".into()))?;
    let mut node = OptionNode::new(head);

    let mut arg_tokens: Vec<String> = Vec::new();
    let mut action: Option<Arc<dyn ArgAction>> = None;
    let mut help: Option<String> = None;

    while let Some(tok) = tokens.next() {
        if let Some(rest) = tok.strip_prefix('#') {
            let mut parts = vec![rest.to_string()];
            parts.extend(tokens.by_ref().map(str::to_string));
            help = Some(parts.join(" "));
            break;
        } else if let Some(inner) = tok.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            action = Some(match inner {
                "true" => Arc::new(StoreTrue) as Arc<dyn ArgAction>,
                "false" => Arc::new(StoreFalse) as Arc<dyn ArgAction>,
                other => Arc::new(StoreConst(parse_const_literal(other)?)) as Arc<dyn ArgAction>,
            });
        } else {
            arg_tokens.push(tok.to_string());
        }
    }

    if !arg_tokens.is_empty() {
        node = node.args(parse_args_grammar(&arg_tokens.join(" "))?);
    }
    if let Some(action) = action {
        node = node.action(action);
    }
    if let Some(help) = help {
        node = node.help(help);
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_head() {
        let headers = parse_head("greet").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].literal(), "greet");
    }

    #[test]
    fn parses_alternative_heads() {
        let headers = parse_head("[hello|hi]").unwrap();
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn parses_required_and_defaulted_slots() {
        let args = parse_args_grammar("<name:str> <age:int=18>").unwrap();
        assert_eq!(args.slots().len(), 2);
        assert_eq!(args.slots()[0].name, "name");
        assert_eq!(args.slots()[1].field.default, Some(Value::Int(18)));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(parse_args_grammar("<x:frobnicate>").is_err());
    }

    #[test]
    fn parses_option_with_store_true() {
        let opt = parse_option_grammar("--verbose|-v [true] #be loud").unwrap();
        assert!(opt.action.is_some());
        assert_eq!(opt.base.help_text.as_deref(), Some("be loud"));
    }

    #[test]
    fn const_literal_parser_rejects_arbitrary_expressions() {
        assert!(parse_const_literal("1 + 1").is_err());
        assert_eq!(parse_const_literal("42").unwrap(), Value::Int(42));
        assert_eq!(parse_const_literal("\"hi\"").unwrap(), Value::Str("hi".to_string()));
    }
}
