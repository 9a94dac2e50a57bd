//! The node model (C3): options, subcommands, and the synthesized
//! requirement-chain markers the analyser's alias table uses internally.

use crate::args::Args;
use crate::error::Result;
use crate::value::Value;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

/// A post-args hook attached to an option. Runs after the option's own
/// `Args` have been populated; its return value replaces the args dict.
pub trait ArgAction: fmt::Debug + Send + Sync {
    fn handle(&self, dict: IndexMap<String, Value>) -> Result<IndexMap<String, Value>>;

    /// Whether a repeated invocation of the owning option should accumulate
    /// (merge) instead of being rejected as a duplicate.
    fn accumulates(&self) -> bool {
        false
    }
}

/// Sets a boolean sentinel regardless of any parsed args (`--verbose`).
#[derive(Debug)]
pub struct StoreTrue;
impl ArgAction for StoreTrue {
    fn handle(&self, mut dict: IndexMap<String, Value>) -> Result<IndexMap<String, Value>> {
        dict.insert("value".to_string(), Value::Bool(true));
        Ok(dict)
    }
}

#[derive(Debug)]
pub struct StoreFalse;
impl ArgAction for StoreFalse {
    fn handle(&self, mut dict: IndexMap<String, Value>) -> Result<IndexMap<String, Value>> {
        dict.insert("value".to_string(), Value::Bool(false));
        Ok(dict)
    }
}

/// Sets a fixed constant regardless of any parsed args.
#[derive(Debug)]
pub struct StoreConst(pub Value);
impl ArgAction for StoreConst {
    fn handle(&self, mut dict: IndexMap<String, Value>) -> Result<IndexMap<String, Value>> {
        dict.insert("value".to_string(), self.0.clone());
        Ok(dict)
    }
}

/// Lets an option be repeated, merging successive invocations into a list
/// under `key`.
#[derive(Debug)]
pub struct Accumulate {
    pub key: String,
}
impl ArgAction for Accumulate {
    fn handle(&self, dict: IndexMap<String, Value>) -> Result<IndexMap<String, Value>> {
        Ok(dict)
    }
    fn accumulates(&self) -> bool {
        true
    }
}

/// Fields shared by every node kind.
#[derive(Clone)]
pub struct CommandNodeBase {
    pub name: String,
    pub aliases: IndexSet<String>,
    pub args: Option<Args>,
    pub separators: IndexSet<String>,
    pub requires: Vec<String>,
    pub priority: i32,
    pub help_text: Option<String>,
    pub dest: String,
}

impl CommandNodeBase {
    fn new(spec: &str) -> Self {
        let (name, aliases) = split_aliases(spec);
        let mut separators = IndexSet::new();
        separators.insert(" ".to_string());
        CommandNodeBase {
            dest: name.clone(),
            name,
            aliases,
            args: None,
            separators,
            requires: Vec::new(),
            priority: 0,
            help_text: None,
        }
    }
}

/// `"--foo|-f"` -> (name="--foo", aliases={"--foo", "-f"}).
fn split_aliases(spec: &str) -> (String, IndexSet<String>) {
    let mut parts = spec.split('|').map(str::trim);
    let name = parts.next().unwrap_or(spec).to_string();
    let mut aliases: IndexSet<String> = IndexSet::new();
    aliases.insert(name.clone());
    for p in parts {
        if !p.is_empty() {
            aliases.insert(p.to_string());
        }
    }
    (name, aliases)
}

#[derive(Clone)]
pub struct OptionNode {
    pub base: CommandNodeBase,
    pub action: Option<Arc<dyn ArgAction>>,
}

impl fmt::Debug for OptionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionNode").field("name", &self.base.name).finish()
    }
}

impl OptionNode {
    pub fn new(spec: &str) -> Self {
        OptionNode { base: CommandNodeBase::new(spec), action: None }
    }

    pub fn args(mut self, args: Args) -> Self {
        self.base.args = Some(args);
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.base.help_text = Some(text.into());
        self
    }

    pub fn requires(mut self, words: Vec<String>) -> Self {
        self.base.requires = words;
        self
    }

    pub fn priority(mut self, p: i32) -> Self {
        self.base.priority = p;
        self
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.base.dest = dest.into();
        self
    }

    pub fn action(mut self, action: Arc<dyn ArgAction>) -> Self {
        self.action = Some(action);
        self
    }
}

#[derive(Clone)]
pub struct Subcommand {
    pub base: CommandNodeBase,
    pub options: Vec<Node>,
}

impl fmt::Debug for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcommand").field("name", &self.base.name).finish()
    }
}

impl Subcommand {
    pub fn new(spec: &str) -> Self {
        Subcommand { base: CommandNodeBase::new(spec), options: Vec::new() }
    }

    pub fn args(mut self, args: Args) -> Self {
        self.base.args = Some(args);
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.base.help_text = Some(text.into());
        self
    }

    pub fn requires(mut self, words: Vec<String>) -> Self {
        self.base.requires = words;
        self
    }

    pub fn priority(mut self, p: i32) -> Self {
        self.base.priority = p;
        self
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.base.dest = dest.into();
        self
    }

    pub fn option(mut self, option: OptionNode) -> Self {
        self.options.push(Node::Option(Arc::new(option)));
        self
    }

    pub fn subcommand(mut self, sub: Subcommand) -> Self {
        self.options.push(Node::Subcommand(Arc::new(sub)));
        self
    }
}

/// A child of a command or subcommand: either an option or a nested
/// subcommand. Wrapped in `Arc` so the analyser's compiled scope tree can
/// share nodes cheaply instead of re-borrowing from the owning `Alconna`.
#[derive(Clone, Debug)]
pub enum Node {
    Option(Arc<OptionNode>),
    Subcommand(Arc<Subcommand>),
}

impl Node {
    pub fn base(&self) -> &CommandNodeBase {
        match self {
            Node::Option(o) => &o.base,
            Node::Subcommand(s) => &s.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_name_and_short_alias() {
        let opt = OptionNode::new("--name|-n");
        assert_eq!(opt.base.name, "--name");
        assert!(opt.base.aliases.contains("-n"));
        assert!(opt.base.aliases.contains("--name"));
    }
}
