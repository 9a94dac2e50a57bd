//! The analyser state machine (C6): compiles a command's option/subcommand
//! tree into lookup tables once, then walks a [`DataCollection`] matching
//! header, options, subcommands, and main arguments with backtracking,
//! alias-priority resolution, and requirement chains.

use crate::args::{ArgFlag, Args};
use crate::arparma::{Arparma, ErrorInfo, OptionResult, SubcommandResult};
use crate::collection::DataCollection;
use crate::command::{Alconna, Header, Meta};
use crate::completion::{CompletionHint, CompletionRing};
use crate::error::{Error, Result};
use crate::fuzzy;
use crate::help;
use crate::node::Node;
use crate::pattern::Outcome;
use crate::value::{Token, Value};
use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use std::sync::Arc;

const COMPLETION_RING_CAPACITY: usize = 16;

/// One level of the compiled node tree: the top-level command's own
/// options/subcommands, or one subcommand's nested options/subcommands.
struct CompiledScope {
    /// Alias -> nodes sharing that alias, sorted by descending priority.
    alias_table: IndexMap<String, Vec<Node>>,
    /// Subcommand name -> its compiled child scope.
    children: IndexMap<String, CompiledScope>,
    /// Every alias and every requirement-chain word at this level — the
    /// stop-word set that bounds main-argument consumption.
    param_ids: IndexSet<String>,
    /// Every distinct, non-empty `requires` chain declared by a node at
    /// this level. A plain word may only be provisionally buffered as a
    /// requirement-chain prefix if it extends one of these.
    requires_chains: Vec<Vec<String>>,
    part_len: usize,
}

/// A frozen, reusable view of one [`Alconna`], produced once by
/// [`compile`] and cheap to run against many inputs.
pub struct Analyser {
    command: Arc<Alconna>,
    root: CompiledScope,
    completion_ring: Mutex<CompletionRing>,
}

struct ScopeOutput {
    args: IndexMap<String, Value>,
    options: IndexMap<String, OptionResult>,
    subcommands: IndexMap<String, SubcommandResult>,
}

fn compile_scope(options: &[Node]) -> Result<CompiledScope> {
    let mut alias_table: IndexMap<String, Vec<Node>> = IndexMap::new();
    let mut children = IndexMap::new();
    let mut param_ids = IndexSet::new();
    let mut requires_chains: Vec<Vec<String>> = Vec::new();
    let mut max_requires_len = 0usize;

    for node in options {
        let base = node.base();
        max_requires_len = max_requires_len.max(base.requires.len());
        if !base.requires.is_empty() && !requires_chains.contains(&base.requires) {
            requires_chains.push(base.requires.clone());
        }
        for alias in &base.aliases {
            alias_table.entry(alias.clone()).or_default().push(node.clone());
            param_ids.insert(alias.clone());
        }
        for word in &base.requires {
            param_ids.insert(word.clone());
        }
        if let Node::Subcommand(sub) = node {
            children.insert(sub.base.name.clone(), compile_scope(&sub.options)?);
        }
    }

    for (alias, nodes) in alias_table.iter_mut() {
        if nodes.len() > 1 {
            let mut priorities: Vec<i32> = nodes.iter().map(|n| n.base().priority).collect();
            priorities.sort_unstable();
            if priorities.windows(2).any(|w| w[0] == w[1]) {
                return Err(Error::Declaration(format!(
                    "alias `{alias}` is shared by multiple nodes at the same priority"
                )));
            }
            nodes.sort_by(|a, b| b.base().priority.cmp(&a.base().priority));
        }
    }

    Ok(CompiledScope {
        alias_table,
        children,
        param_ids,
        requires_chains,
        part_len: options.len() + 1 + max_requires_len,
    })
}

/// Compiles `command` into a reusable [`Analyser`].
pub fn compile(command: Arc<Alconna>) -> Result<Analyser> {
    let root = compile_scope(&command.options)?;
    Ok(Analyser {
        command,
        root,
        completion_ring: Mutex::new(CompletionRing::new(COMPLETION_RING_CAPACITY)),
    })
}

fn header_literal_matches(headers: &[Header], text: &str) -> bool {
    headers.iter().any(|h| h.literal() == text)
}

/// Whether appending `text` to `buffer` still forms a strict prefix of at
/// least one node's declared `requires` chain at this scope. This is the
/// only condition under which an unrecognized plain word may be
/// provisionally absorbed rather than treated as an error — a scope with
/// no `requires` chains at all (`requires_chains` empty) never buffers
/// anything.
fn extends_requirement_chain(chains: &[Vec<String>], buffer: &[String], text: &str) -> bool {
    chains.iter().any(|chain| {
        chain.len() > buffer.len() && chain[buffer.len()] == text && chain[..buffer.len()] == buffer[..]
    })
}

/// Consumes one slot's worth of tokens per entry in `args`, honoring
/// optional defaults, the variadic slot's greedy flag, and the stop-word
/// set so a positional slot never eats a token that belongs to a sibling
/// option or subcommand.
fn analyse_args(args: &Args, dc: &mut DataCollection, stop_words: &IndexSet<String>) -> Result<IndexMap<String, Value>> {
    let mut dict = IndexMap::new();
    for slot in args.slots() {
        if slot.is_filler() {
            continue;
        }
        if slot.flags.contains(ArgFlag::KW_ONLY) {
            if let Some(default) = &slot.field.default {
                dict.insert(slot.name.clone(), default.clone());
            }
            continue;
        }

        match &slot.value {
            crate::args::SlotValue::Nested(nested) => {
                let nested_dict = analyse_args(nested, dc, stop_words)?;
                dict.insert(slot.name.clone(), Value::Dict(nested_dict));
            }
            crate::args::SlotValue::Pattern(pattern) => {
                if slot.flags.contains(ArgFlag::MULTIPLE) {
                    let remaining = dc.remaining();
                    let scoped_len = if slot.flags.contains(ArgFlag::GREEDY) {
                        remaining.len()
                    } else {
                        remaining
                            .iter()
                            .position(|t| matches!(t, Token::Text(s) if stop_words.contains(s)))
                            .unwrap_or(remaining.len())
                    };
                    let scoped = &remaining[..scoped_len];
                    match pattern.try_match(scoped) {
                        Outcome::Success { value, consumed } => {
                            dc.advance(consumed);
                            dict.insert(slot.name.clone(), value);
                        }
                        Outcome::Failure { reason } => {
                            if slot.flags.contains(ArgFlag::OPTIONAL) {
                                dict.insert(
                                    slot.name.clone(),
                                    slot.field.default.clone().unwrap_or(Value::Empty),
                                );
                            } else {
                                return Err(Error::ArgInvalid { name: slot.name.clone(), reason });
                            }
                        }
                    }
                    continue;
                }

                if let Some(text) = dc.peek_text() {
                    if stop_words.contains(text) {
                        if slot.flags.contains(ArgFlag::OPTIONAL) {
                            dict.insert(
                                slot.name.clone(),
                                slot.field.default.clone().unwrap_or(Value::Empty),
                            );
                            continue;
                        }
                        return Err(Error::ArgMissing(slot.name.clone()));
                    }
                }

                match pattern.try_match(dc.remaining()) {
                    Outcome::Success { value, consumed } => {
                        dc.advance(consumed);
                        dict.insert(slot.name.clone(), value);
                    }
                    Outcome::Failure { reason } => {
                        if slot.flags.contains(ArgFlag::OPTIONAL) {
                            dict.insert(
                                slot.name.clone(),
                                slot.field.default.clone().unwrap_or(Value::Empty),
                            );
                        } else if dc.is_exhausted() {
                            return Err(Error::ArgMissing(slot.name.clone()));
                        } else {
                            return Err(Error::ArgInvalid { name: slot.name.clone(), reason });
                        }
                    }
                }
            }
        }
    }
    Ok(dict)
}

/// Merges a repeated option invocation's dict into `existing`, turning
/// colliding keys into a `Value::List` accumulation.
fn merge_accumulate(existing: &mut OptionResult, new_dict: IndexMap<String, Value>) {
    for (k, v) in new_dict {
        match existing.args.get_mut(&k) {
            Some(slot) => {
                let combined = match std::mem::replace(slot, Value::Empty) {
                    Value::List(mut items) => {
                        items.push(v);
                        Value::List(items)
                    }
                    other => Value::List(vec![other, v]),
                };
                *slot = combined;
            }
            None => {
                existing.args.insert(k, v);
            }
        }
    }
}

fn flatten_other_args(
    options: &IndexMap<String, OptionResult>,
    subcommands: &IndexMap<String, SubcommandResult>,
) -> IndexMap<String, Value> {
    let mut out = IndexMap::new();
    for opt in options.values() {
        for (k, v) in &opt.args {
            out.insert(k.clone(), v.clone());
        }
    }
    for sub in subcommands.values() {
        for (k, v) in &sub.args {
            out.insert(k.clone(), v.clone());
        }
        out.extend(flatten_other_args(&sub.options, &sub.subcommands));
    }
    out
}

impl Analyser {
    /// Runs the full compile-then-analyse pipeline's second half: matches
    /// the header, then walks the token stream to produce an [`Arparma`].
    pub fn analyse(&self, input: DataCollection) -> Result<Arparma> {
        let mut dc = input;
        let origin = dc.origin().to_vec();
        let meta = &self.command.meta;

        let head_text = match dc.peek_text() {
            Some(t) => t.to_string(),
            None => return self.fail_or_capture(origin, Error::HeaderMissing, meta),
        };

        if !header_literal_matches(&self.command.headers, &head_text) {
            if meta.fuzzy_match {
                let literals: Vec<String> = self.command.headers.iter().map(Header::literal).collect();
                if let Some(suggestion) = fuzzy::suggest(&head_text, &literals, meta.fuzzy_threshold) {
                    return Ok(self.synthetic_result(origin, ErrorInfo::FuzzyMatchSuccess(suggestion)));
                }
            }
            return self.fail_or_capture(origin, Error::HeaderMissing, meta);
        }
        dc.pop_front();

        match self.run_scope(&self.root, &self.command.main_args, &mut dc) {
            Ok(out) => {
                let other_args = flatten_other_args(&out.options, &out.subcommands);
                Ok(Arparma {
                    origin,
                    matched: true,
                    header: Some(head_text),
                    main_args: out.args,
                    other_args,
                    options: out.options,
                    subcommands: out.subcommands,
                    error_info: None,
                    error_data: Vec::new(),
                    command_id: self.command.id.clone(),
                })
            }
            Err(e) => self.fail_or_capture(origin, e, meta),
        }
    }

    /// A minimal completion projection: the aliases reachable from the
    /// command's top-level scope. Does not follow partially-typed
    /// subcommand paths — callers wanting completion mid-subcommand should
    /// re-derive from `get_commands`/`get_command` and recompile.
    pub fn candidates(&self) -> Vec<String> {
        self.root.alias_table.keys().cloned().collect()
    }

    fn try_activate(
        &self,
        node: &Node,
        scope: &CompiledScope,
        dc: &mut DataCollection,
        options_result: &mut IndexMap<String, OptionResult>,
        subcommands_result: &mut IndexMap<String, SubcommandResult>,
    ) -> Result<()> {
        match node {
            Node::Option(opt) => {
                let empty = Args::new();
                let args = opt.base.args.as_ref().unwrap_or(&empty);
                let raw = analyse_args(args, dc, &scope.param_ids)?;
                let dict = match &opt.action {
                    Some(action) => action.handle(raw)?,
                    None => raw,
                };
                let dest = opt.base.dest.clone();
                if let Some(existing) = options_result.get_mut(&dest) {
                    let accumulates = opt.action.as_ref().map(|a| a.accumulates()).unwrap_or(false);
                    if !accumulates {
                        return Err(Error::DuplicateOption(dest));
                    }
                    merge_accumulate(existing, dict);
                } else {
                    options_result.insert(dest, OptionResult { matched: true, args: dict });
                }
                Ok(())
            }
            Node::Subcommand(sub) => {
                let empty = Args::new();
                let own_args = sub.base.args.as_ref().unwrap_or(&empty);
                let child_scope = scope
                    .children
                    .get(&sub.base.name)
                    .expect("every Subcommand node has a compiled child scope");
                let nested = self.run_scope(child_scope, own_args, dc)?;
                subcommands_result.insert(
                    sub.base.dest.clone(),
                    SubcommandResult {
                        matched: true,
                        args: nested.args,
                        options: nested.options,
                        subcommands: nested.subcommands,
                    },
                );
                Ok(())
            }
        }
    }

    /// Walks one scope (the top-level command, or one subcommand's body):
    /// dispatches each token to a matching option/subcommand (respecting
    /// requirement chains and alias priority) or into the scope's own main
    /// args, until the stream runs dry or no interpretation applies.
    fn run_scope(&self, scope: &CompiledScope, own_args: &Args, dc: &mut DataCollection) -> Result<ScopeOutput> {
        let meta = &self.command.meta;
        let mut main_dict = IndexMap::new();
        let mut options_result = IndexMap::new();
        let mut subcommands_result = IndexMap::new();
        let mut chain_buffer: Vec<String> = Vec::new();
        let mut main_args_done = own_args.is_empty();

        let bound = (scope.part_len * 4).max(8) + dc.len_remaining();
        let mut iterations = 0usize;

        while !dc.is_exhausted() {
            iterations += 1;
            if iterations > bound {
                break;
            }

            let text = match dc.peek_text() {
                Some(t) => t.to_string(),
                None => break,
            };

            if meta.builtin_option_names.help.iter().any(|a| a == &text) {
                dc.pop_front();
                return Err(Error::HelpRequested(help::render_help(&self.command)));
            }

            if meta.builtin_option_names.completion.iter().any(|a| a == &text) {
                dc.pop_front();
                self.completion_ring.lock().push(text.clone());
                let candidates = scope.alias_table.keys().cloned().collect();
                return Err(Error::CompletionRequested(CompletionHint { candidates }));
            }

            if meta.builtin_option_names.shortcut.iter().any(|a| a == &text) {
                dc.pop_front();
                continue;
            }

            if let Some(candidates) = scope.alias_table.get(&text) {
                let eligible: Vec<&Node> = candidates
                    .iter()
                    .filter(|n| {
                        let req = &n.base().requires;
                        req.is_empty()
                            || (chain_buffer.len() >= req.len()
                                && chain_buffer[chain_buffer.len() - req.len()..] == req[..])
                    })
                    .collect();

                let mut activated = false;
                for node in eligible {
                    let sp = dc.savepoint();
                    dc.pop_front();
                    match self.try_activate(node, scope, dc, &mut options_result, &mut subcommands_result) {
                        Ok(()) => {
                            activated = true;
                            chain_buffer.clear();
                            break;
                        }
                        Err(_) => dc.restore(sp),
                    }
                }
                if activated {
                    continue;
                }
            }

            if !main_args_done {
                let sp = dc.savepoint();
                match analyse_args(own_args, dc, &scope.param_ids) {
                    Ok(dict) => {
                        main_dict = dict;
                        main_args_done = true;
                        continue;
                    }
                    Err(_) => dc.restore(sp),
                }
            }

            if !scope.alias_table.contains_key(&text)
                && extends_requirement_chain(&scope.requires_chains, &chain_buffer, &text)
            {
                chain_buffer.push(text);
                dc.pop_front();
                continue;
            }

            let reason = fuzzy::best_ranked(&text, &scope.alias_table.keys().cloned().collect::<Vec<_>>())
                .map(|s| format!("{text} (did you mean `{s}`?)"))
                .unwrap_or(text);
            return Err(Error::UnexpectedToken(reason));
        }

        if !main_args_done {
            main_dict = analyse_args(own_args, dc, &scope.param_ids)?;
        }

        Ok(ScopeOutput { args: main_dict, options: options_result, subcommands: subcommands_result })
    }

    /// The partial inputs that have triggered the builtin completion alias
    /// since this analyser was compiled, oldest first.
    pub fn completion_history(&self) -> Vec<String> {
        self.completion_ring.lock().iter().cloned().collect()
    }

    fn fail_or_capture(&self, origin: Vec<Token>, err: Error, meta: &Meta) -> Result<Arparma> {
        match &err {
            Error::HelpRequested(text) => {
                return Ok(self.synthetic_result(origin, ErrorInfo::HelpRequested(text.clone())))
            }
            Error::CompletionRequested(hint) => {
                return Ok(self.synthetic_result(origin, ErrorInfo::CompletionRequested(hint.clone())))
            }
            _ => {}
        }
        if meta.raise_exception {
            return Err(err);
        }
        let error_info = match &err {
            Error::HeaderMissing => Some(ErrorInfo::HeaderMissing),
            Error::UnexpectedToken(t) => Some(ErrorInfo::UnexpectedToken(t.clone())),
            Error::ArgMissing(n) => Some(ErrorInfo::ArgMissing(n.clone())),
            Error::ArgInvalid { name, reason } => {
                Some(ErrorInfo::ArgInvalid { name: name.clone(), reason: reason.clone() })
            }
            _ => None,
        };
        Ok(Arparma {
            origin,
            matched: false,
            header: None,
            main_args: IndexMap::new(),
            other_args: IndexMap::new(),
            options: IndexMap::new(),
            subcommands: IndexMap::new(),
            error_info,
            error_data: vec![err.to_string()],
            command_id: self.command.id.clone(),
        })
    }

    fn synthetic_result(&self, origin: Vec<Token>, error_info: ErrorInfo) -> Arparma {
        Arparma {
            origin,
            matched: false,
            header: None,
            main_args: IndexMap::new(),
            other_args: IndexMap::new(),
            options: IndexMap::new(),
            subcommands: IndexMap::new(),
            error_info: Some(error_info),
            error_data: Vec::new(),
            command_id: self.command.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Alconna;
    use crate::node::{OptionNode, Subcommand};
    use crate::pattern;
    use crate::value::{Payload, PayloadKind};
    use std::any::Any;

    #[test]
    fn basic_positional_matches() {
        let cmd = Alconna::builder("test")
            .main_args(Args::new().push("bar", pattern::any_one()))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        let result = analyser.analyse(DataCollection::from_str("test hello", false)).unwrap();
        assert!(result.matched());
        assert_eq!(result.query("bar").unwrap().unwrap().as_str(), Some("hello"));
    }

    #[test]
    fn option_alias_idempotence() {
        let cmd = Alconna::builder("greet")
            .option(Node::Option(Arc::new(
                OptionNode::new("--name|-n").args(Args::new().push("name", pattern::str_())),
            )))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();

        let long = analyser.analyse(DataCollection::from_str("greet --name Alice", false)).unwrap();
        let short = analyser.analyse(DataCollection::from_str("greet -n Alice", false)).unwrap();

        assert_eq!(
            long.query("options.name.value").unwrap(),
            short.query("options.name.value").unwrap()
        );
    }

    #[test]
    fn subcommand_with_requirement_chain() {
        let set_sub = Subcommand::new("set")
            .args(Args::new().push("key", pattern::str_()).push("val", pattern::str_()))
            .requires(vec!["perm".to_string()]);
        let cmd = Alconna::builder("lp")
            .option(Node::Subcommand(Arc::new(set_sub)))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();

        let result = analyser.analyse(DataCollection::from_str("lp perm set admin true", false)).unwrap();
        assert!(result.matched());
        assert_eq!(result.query("subcommands.set.key").unwrap().unwrap().as_str(), Some("admin"));
        assert_eq!(result.query("subcommands.set.val").unwrap().unwrap().as_str(), Some("true"));
    }

    #[derive(Debug)]
    struct At(u64);
    impl PayloadKind for At {
        fn type_name(&self) -> &'static str {
            "At"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn mixed_payload_stream_matches() {
        let cmd = Alconna::builder("test")
            .header(Header::bare(".test"))
            .main_args(Args::new().push("bar", pattern::any_one()))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();

        let tokens = vec![Token::Text(".test".to_string()), Token::Payload(Payload::new(At(124)))];
        let result = analyser.analyse(DataCollection::new(tokens)).unwrap();
        assert!(result.matched());
        let bar = result.query("bar").unwrap().unwrap();
        assert_eq!(bar.as_payload().unwrap().downcast_ref::<At>().unwrap().0, 124);
    }

    #[test]
    fn fuzzy_header_suggestion() {
        let cmd = Alconna::builder("greet").build_unregistered().unwrap();
        let analyser = compile(cmd).unwrap();
        let result = analyser.analyse(DataCollection::from_str("greett", false)).unwrap();
        assert!(!result.matched());
        assert_eq!(result.error_info, Some(ErrorInfo::FuzzyMatchSuccess("greet".to_string())));
    }

    #[test]
    fn unmatched_header_without_fuzzy_candidate_raises() {
        let cmd = Alconna::builder("greet").build_unregistered().unwrap();
        let analyser = compile(cmd).unwrap();
        let err = analyser.analyse(DataCollection::from_str("completely different", false)).unwrap_err();
        assert_eq!(err, Error::HeaderMissing);
    }

    #[test]
    fn backtracking_restores_position_on_failed_option_attempt() {
        let cmd = Alconna::builder("test")
            .option(Node::Option(Arc::new(
                OptionNode::new("--count").args(Args::new().push("n", pattern::int())),
            )))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        // "--count" expects an int but gets a non-numeric token; the option
        // attempt must fail and restore the stream position rather than
        // leaving it partially consumed.
        let err = analyser.analyse(DataCollection::from_str("test --count notanumber", false));
        assert!(err.is_err());
    }

    #[test]
    fn trailing_unrecognized_token_after_main_args_is_not_silently_absorbed() {
        let cmd = Alconna::builder("test")
            .main_args(Args::new().push("bar", pattern::any_one()))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        // "bar" consumes "hello"; "world" has nowhere to go and must not be
        // swallowed as a free requirement-chain token.
        let err = analyser.analyse(DataCollection::from_str("test hello world", false)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken(_)));
    }

    #[test]
    fn option_typo_is_fuzzy_matched_immediately_not_after_the_next_token() {
        let cmd = Alconna::builder("greet")
            .option(Node::Option(Arc::new(
                OptionNode::new("--name|-n").args(Args::new().push("name", pattern::str_())),
            )))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        let err = analyser.analyse(DataCollection::from_str("greet --nam Alice", false)).unwrap_err();
        match err {
            Error::UnexpectedToken(msg) => {
                assert!(msg.contains("--nam"));
                assert!(msg.contains("did you mean"));
            }
            other => panic!("expected UnexpectedToken, got {other:?}"),
        }
    }

    #[test]
    fn two_word_requirement_chain_is_matched_incrementally() {
        let deep = Subcommand::new("go").requires(vec!["please".to_string(), "confirm".to_string()]);
        let cmd = Alconna::builder("app")
            .option(Node::Subcommand(Arc::new(deep)))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        let result = analyser.analyse(DataCollection::from_str("app please confirm go", false)).unwrap();
        assert!(result.matched());
        assert!(result.query("subcommands.go").unwrap().is_some());
    }

    #[test]
    fn help_alias_short_circuits_with_rendered_help_text() {
        let cmd = Alconna::builder("greet")
            .option(Node::Option(Arc::new(OptionNode::new("--name|-n").help("who to greet"))))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        let result = analyser.analyse(DataCollection::from_str("greet --help", false)).unwrap();
        assert!(!result.matched());
        match &result.error_info {
            Some(ErrorInfo::HelpRequested(text)) => {
                assert!(text.contains("Usage:"));
                assert!(text.contains("--name"));
            }
            other => panic!("expected HelpRequested, got {other:?}"),
        }
    }

    #[test]
    fn completion_alias_short_circuits_with_reachable_candidates_and_records_history() {
        let cmd = Alconna::builder("greet")
            .option(Node::Option(Arc::new(OptionNode::new("--name|-n"))))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        let result = analyser.analyse(DataCollection::from_str("greet --comp", false)).unwrap();
        assert!(!result.matched());
        match &result.error_info {
            Some(ErrorInfo::CompletionRequested(hint)) => {
                assert!(hint.candidates.contains(&"--name".to_string()));
                assert!(hint.candidates.contains(&"-n".to_string()));
            }
            other => panic!("expected CompletionRequested, got {other:?}"),
        }
        assert_eq!(analyser.completion_history(), vec!["--comp".to_string()]);
    }

    #[test]
    fn shortcut_alias_is_consumed_without_erroring() {
        let cmd = Alconna::builder("greet")
            .option(Node::Option(Arc::new(
                OptionNode::new("--name|-n").args(Args::new().push("name", pattern::str_())),
            )))
            .build_unregistered()
            .unwrap();
        let analyser = compile(cmd).unwrap();
        let result =
            analyser.analyse(DataCollection::from_str("greet --shortcut --name Alice", false)).unwrap();
        assert!(result.matched());
        assert_eq!(result.query("options.name.value").unwrap().unwrap().as_str(), Some("Alice"));
    }
}
