//! The top-level command model (C4): headers, the command's own args, its
//! options/subcommands, namespace, and metadata. `Alconna` is the unit the
//! [`crate::manager::CommandManager`] interns by fingerprint.

use crate::analyser::{compile, Analyser};
use crate::args::Args;
use crate::behavior::Behavior;
use crate::collection::DataCollection;
use crate::error::Result;
use crate::manager::command_manager;
use crate::node::Node;
use indexmap::IndexSet;
use std::sync::Arc;

/// One accepted invocation prefix: an optional literal prefix (e.g. `/`)
/// plus the command name that must immediately follow it in the same
/// token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    pub prefix: Option<String>,
    pub name: String,
}

impl Header {
    pub fn bare(name: impl Into<String>) -> Self {
        Header { prefix: None, name: name.into() }
    }

    pub fn prefixed(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Header { prefix: Some(prefix.into()), name: name.into() }
    }

    /// The literal text a single head token must equal to match.
    pub fn literal(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{p}{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Command-level configuration. Maps to the per-namespace behavior a
/// command can override locally.
#[derive(Clone, Debug)]
pub struct Meta {
    pub description: String,
    pub usage: Option<String>,
    pub example: Option<String>,
    pub fuzzy_match: bool,
    pub fuzzy_threshold: u32,
    pub keep_crlf: bool,
    pub raise_exception: bool,
    pub builtin_option_names: crate::config::BuiltinOptionNames,
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            description: String::new(),
            usage: None,
            example: None,
            fuzzy_match: true,
            fuzzy_threshold: 2,
            keep_crlf: false,
            raise_exception: true,
            builtin_option_names: crate::config::BuiltinOptionNames::default(),
        }
    }
}

/// A fully declared command: headers, main args, options/subcommands,
/// namespace, metadata, and the behaviors run after analysis.
pub struct Alconna {
    pub headers: Vec<Header>,
    pub command: String,
    pub main_args: Args,
    pub options: Vec<Node>,
    pub namespace: String,
    pub meta: Meta,
    pub behaviors: Vec<Arc<dyn Behavior>>,
    pub id: String,
}

impl Alconna {
    pub fn builder(command: impl Into<String>) -> AlconnaBuilder {
        AlconnaBuilder::new(command)
    }

    /// Compiles this command into a frozen, reusable [`Analyser`].
    pub fn compile(self: &Arc<Self>) -> Result<Analyser> {
        compile(self.clone())
    }

    /// Compiles and analyses `input`, consulting and then populating the
    /// process-wide [`crate::manager::CommandManager`]'s parse cache for
    /// this command's `(id, namespace)` pair. The cache only actually
    /// stores anything once `enable_message_cache` has been turned on for
    /// the namespace (see [`crate::config::NamespaceConfig::apply`]); until
    /// then this is equivalent to a plain `compile().analyse()`.
    pub fn parse(self: &Arc<Self>, input: DataCollection) -> Result<crate::arparma::Arparma> {
        let hash = crate::manager::hash_input(input.origin());
        if let Some(cached) = command_manager().lookup_cache(&self.id, &self.namespace, hash) {
            return Ok(cached);
        }
        let analyser = self.compile()?;
        let result = analyser.analyse(input)?;
        command_manager().store_cache(&self.id, &self.namespace, hash, result.clone());
        Ok(result)
    }

    fn fingerprint(namespace: &str, headers: &[Header], command: &str) -> String {
        let salt: String = headers.iter().map(Header::literal).collect::<Vec<_>>().join(",");
        format!("{namespace}::{command}::{salt}")
    }
}

pub struct AlconnaBuilder {
    headers: Vec<Header>,
    command: String,
    main_args: Args,
    options: Vec<Node>,
    namespace: String,
    meta: Meta,
    behaviors: Vec<Arc<dyn Behavior>>,
}

impl AlconnaBuilder {
    pub fn new(command: impl Into<String>) -> Self {
        AlconnaBuilder {
            headers: Vec::new(),
            command: command.into(),
            main_args: Args::new(),
            options: Vec::new(),
            namespace: "default".to_string(),
            meta: Meta::default(),
            behaviors: Vec::new(),
        }
    }

    pub fn header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    pub fn headers(mut self, headers: impl IntoIterator<Item = Header>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn main_args(mut self, args: Args) -> Self {
        self.main_args = args;
        self
    }

    pub fn option(mut self, node: Node) -> Self {
        self.options.push(node);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn behavior(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Finalizes the command, validates its argument lists, and registers
    /// it with the process-wide [`crate::manager::CommandManager`]. Fails
    /// with [`crate::error::Error::DuplicateCommand`] if a command with the
    /// same `(headers, command)` fingerprint is already registered in this
    /// namespace.
    pub fn build(self) -> Result<Arc<Alconna>> {
        self.build_with(false)
    }

    /// Like [`Self::build`], but replaces an existing registration instead
    /// of rejecting the collision.
    pub fn build_replacing(self) -> Result<Arc<Alconna>> {
        self.build_with(true)
    }

    /// Builds the command without registering it — used by tests that want
    /// an isolated `Alconna` unaffected by the global registry/cache.
    pub fn build_unregistered(mut self) -> Result<Arc<Alconna>> {
        if self.headers.is_empty() {
            self.headers.push(Header::bare(self.command.clone()));
        }
        self.main_args.validate()?;
        let id = Alconna::fingerprint(&self.namespace, &self.headers, &self.command);
        Ok(Arc::new(Alconna {
            headers: self.headers,
            command: self.command,
            main_args: self.main_args,
            options: self.options,
            namespace: self.namespace,
            meta: self.meta,
            behaviors: self.behaviors,
            id,
        }))
    }

    fn build_with(self, replace: bool) -> Result<Arc<Alconna>> {
        let namespace = self.namespace.clone();
        let cmd = self.build_unregistered()?;
        command_manager().register(namespace, cmd, replace)
    }
}

pub(crate) fn header_literals(headers: &[Header]) -> IndexSet<String> {
    headers.iter().map(Header::literal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use crate::collection::DataCollection;
    use crate::pattern;

    #[test]
    fn parse_populates_and_then_serves_the_cache_once_enabled() {
        // A namespace unique to this test so it doesn't interact with the
        // process-wide manager's state from other tests.
        let namespace = "cache_wiring_test_ns";
        command_manager().enable_cache(namespace, true);

        let cmd = AlconnaBuilder::new("test")
            .namespace(namespace)
            .main_args(Args::new().push("bar", pattern::any_one()))
            .build_unregistered()
            .unwrap();

        let first = cmd.parse(DataCollection::from_str("test hello", false)).unwrap();
        assert!(first.matched());

        let hash = crate::manager::hash_input(DataCollection::from_str("test hello", false).origin());
        let cached = command_manager()
            .lookup_cache(&cmd.id, namespace, hash)
            .expect("parse() must have populated the cache");
        assert_eq!(cached.command_id(), cmd.id);
    }
}
