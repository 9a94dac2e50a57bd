//! The structured analysis result (C7): head match, per-option and
//! per-subcommand results, a dotted-path query surface, and the entry
//! point into the behavior pipeline.

use crate::error::{Error, Result};
use crate::value::{Token, Value, ValueKind};
use indexmap::IndexMap;
use std::sync::Arc;

/// The per-option parse outcome stored under its `dest`.
#[derive(Clone, Debug, Default)]
pub struct OptionResult {
    pub matched: bool,
    pub args: IndexMap<String, Value>,
}

/// The per-subcommand parse outcome, recursively holding its own options
/// and nested subcommands.
#[derive(Clone, Debug, Default)]
pub struct SubcommandResult {
    pub matched: bool,
    pub args: IndexMap<String, Value>,
    pub options: IndexMap<String, OptionResult>,
    pub subcommands: IndexMap<String, SubcommandResult>,
}

/// The non-fatal or captured-fatal error state of a parse, attached to
/// `Arparma.error_info` when `raise_exception` is false (or, for fuzzy
/// suggestions, unconditionally).
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorInfo {
    HeaderMissing,
    FuzzyMatchSuccess(String),
    HelpRequested(String),
    CompletionRequested(crate::completion::CompletionHint),
    UnexpectedToken(String),
    ArgMissing(String),
    ArgInvalid { name: String, reason: String },
    OutBoundsBehave(String),
}

/// The structured result of one `analyse()` call. Immutable to user code
/// except through the behavior pipeline; cheap to discard once its
/// contents have been extracted.
#[derive(Clone, Debug)]
pub struct Arparma {
    pub(crate) origin: Vec<Token>,
    pub matched: bool,
    pub header: Option<String>,
    pub main_args: IndexMap<String, Value>,
    pub other_args: IndexMap<String, Value>,
    pub options: IndexMap<String, OptionResult>,
    pub subcommands: IndexMap<String, SubcommandResult>,
    pub error_info: Option<ErrorInfo>,
    pub error_data: Vec<String>,
    pub(crate) command_id: String,
}

impl Arparma {
    pub fn origin(&self) -> &[Token] {
        &self.origin
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    /// Resolves a dotted path. Bare names search `main_args`, then
    /// `other_args`, then `options`, then `subcommands`; a bare name that
    /// exists as both an option and a subcommand is an ambiguity error.
    /// `options.foo` / `subcommands.bar` scope the lookup explicitly and
    /// return `None` rather than erroring when absent.
    pub fn query(&self, path: &str) -> Result<Option<Value>> {
        let mut parts = path.splitn(2, '.');
        let head = parts.next().unwrap_or_default();
        let rest = parts.next();
        match head {
            "options" => Ok(self.query_options(rest)),
            "subcommands" => Ok(self.query_subcommands(rest)),
            name => {
                if let Some(v) = self.main_args.get(name) {
                    return Ok(Some(v.clone()));
                }
                if let Some(v) = self.other_args.get(name) {
                    return Ok(Some(v.clone()));
                }
                let in_opts = self.options.contains_key(name);
                let in_subs = self.subcommands.contains_key(name);
                if in_opts && in_subs {
                    return Err(Error::AmbiguousQuery(name.to_string()));
                }
                if in_opts {
                    return Ok(Some(Value::Dict(self.options[name].args.clone())));
                }
                if in_subs {
                    return Ok(Some(Value::Dict(self.subcommands[name].args.clone())));
                }
                Ok(None)
            }
        }
    }

    fn query_options(&self, rest: Option<&str>) -> Option<Value> {
        let rest = rest?;
        let mut it = rest.splitn(2, '.');
        let name = it.next()?;
        let tail = it.next();
        let opt = self.options.get(name)?;
        match tail {
            None => Some(Value::Dict(opt.args.clone())),
            Some("args") => Some(Value::Dict(opt.args.clone())),
            Some("value") => opt.args.get("value").or_else(|| opt.args.values().next()).cloned(),
            Some(field) => opt.args.get(field).cloned(),
        }
    }

    fn query_subcommands(&self, rest: Option<&str>) -> Option<Value> {
        let rest = rest?;
        let mut it = rest.splitn(2, '.');
        let name = it.next()?;
        let tail = it.next();
        let sub = self.subcommands.get(name)?;
        match tail {
            None => Some(Value::Dict(sub.args.clone())),
            Some("args") => Some(Value::Dict(sub.args.clone())),
            Some(field) => {
                if let Some(v) = sub.args.get(field) {
                    return Some(v.clone());
                }
                if let Some(opt) = sub.options.get(field) {
                    return Some(Value::Dict(opt.args.clone()));
                }
                sub.subcommands.get(field).map(|s| Value::Dict(s.args.clone()))
            }
        }
    }

    /// Like [`Self::query`], but drops any hit whose runtime kind doesn't
    /// match `kind`.
    pub fn query_with(&self, kind: ValueKind, path: &str) -> Result<Option<Value>> {
        Ok(self.query(path)?.filter(|v| v.kind() == kind))
    }

    pub fn find(&self, path: &str) -> bool {
        matches!(self.query(path), Ok(Some(_)))
    }

    /// Runs `behaviors` over this result via [`crate::behavior::execute`].
    pub fn execute(self, behaviors: &[Arc<dyn crate::behavior::Behavior>]) -> Arparma {
        crate::behavior::execute(self, behaviors)
    }

    /// Invokes `target` with the union of `main_args`, `other_args`, and
    /// `extra`, provided the parse matched. Rust has no reflective
    /// parameter-name introspection, so the callee declares which of these
    /// keys it wants via [`Callable::call`].
    pub fn call(&self, target: &dyn Callable, extra: &IndexMap<String, Value>) -> Result<()> {
        if !self.matched {
            return Err(Error::Declaration("cannot call target on an unmatched result".into()));
        }
        let mut merged = self.main_args.clone();
        merged.extend(self.other_args.clone());
        merged.extend(extra.clone());
        target.call(&merged)
    }

    /// Projects this result into a user-declared typed view.
    pub fn get_duplication<T: Duplication>(&self) -> Result<T> {
        T::from_arparma(self)
    }
}

/// Implemented by a callback target for [`Arparma::call`].
pub trait Callable {
    fn call(&self, args: &IndexMap<String, Value>) -> Result<()>;
}

/// A user-declared typed projection of an `Arparma`, mapping
/// options/subcommands to fields by `dest`.
pub trait Duplication: Sized {
    fn from_arparma(result: &Arparma) -> Result<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(command_id: &str) -> Arparma {
        Arparma {
            origin: Vec::new(),
            matched: true,
            header: Some("test".to_string()),
            main_args: IndexMap::new(),
            other_args: IndexMap::new(),
            options: IndexMap::new(),
            subcommands: IndexMap::new(),
            error_info: None,
            error_data: Vec::new(),
            command_id: command_id.to_string(),
        }
    }

    #[test]
    fn scoped_query_resolves_option_over_ambiguous_bare_name() {
        let mut result = bare("test");
        let mut args = IndexMap::new();
        args.insert("value".to_string(), Value::Str("opt".to_string()));
        result.options.insert("foo".to_string(), OptionResult { matched: true, args });
        result.subcommands.insert("foo".to_string(), SubcommandResult::default());

        assert_eq!(
            result.query("options.foo.value").unwrap(),
            Some(Value::Str("opt".to_string()))
        );
        assert!(matches!(result.query("foo"), Err(Error::AmbiguousQuery(_))));
    }

    #[test]
    fn absent_scoped_option_query_returns_none_not_whole_dict() {
        let result = bare("test");
        assert_eq!(result.query("options.missing").unwrap(), None);
    }

    #[test]
    fn bare_name_falls_back_through_main_then_other_args() {
        let mut result = bare("test");
        result.other_args.insert("x".to_string(), Value::Int(7));
        assert_eq!(result.query("x").unwrap(), Some(Value::Int(7)));
    }
}
