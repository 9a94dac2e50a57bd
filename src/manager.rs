//! The process-wide command registry and parse cache (C4 registry half,
//! C8 cache half). A single [`CommandManager`] instance lives behind a
//! `OnceLock`, lazily initialised on first use; `reset()` gives tests an
//! explicit way to clear it instead of relying on destructor ordering.

use crate::arparma::Arparma;
use crate::command::Alconna;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A bounded, order-preserving cache: `(command_id, input_hash) ->
/// Arparma`. Access moves the entry to the back (most recently used);
/// insertion evicts from the front when over capacity.
struct LruCache {
    capacity: usize,
    map: IndexMap<(String, u64), Arparma>,
}

impl LruCache {
    fn new(capacity: usize) -> Self {
        LruCache { capacity, map: IndexMap::new() }
    }

    fn get(&mut self, key: &(String, u64)) -> Option<Arparma> {
        let idx = self.map.get_index_of(key)?;
        let value = self.map[idx].clone();
        let last = self.map.len() - 1;
        self.map.move_index(idx, last);
        Some(value)
    }

    fn insert(&mut self, key: (String, u64), value: Arparma) {
        if self.capacity == 0 {
            return;
        }
        if let Some(idx) = self.map.get_index_of(&key) {
            self.map.move_index(idx, self.map.len() - 1);
            *self.map.get_index_mut(self.map.len() - 1).unwrap().1 = value;
            return;
        }
        while self.map.len() >= self.capacity {
            self.map.shift_remove_index(0);
        }
        self.map.insert(key, value);
    }

    fn purge_command(&mut self, command_id: &str) {
        self.map.retain(|(id, _), _| id != command_id);
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.capacity > 0 && self.map.len() > self.capacity {
            self.map.shift_remove_index(0);
        }
    }
}

/// Per-namespace toggle for whether successful parses participate in the
/// LRU cache at all.
#[derive(Default)]
struct NamespaceSettings {
    enable_message_cache: bool,
}

pub struct CommandManager {
    commands: Mutex<IndexMap<String, IndexMap<String, Arc<Alconna>>>>,
    cache: Mutex<LruCache>,
    namespaces: Mutex<IndexMap<String, NamespaceSettings>>,
}

impl CommandManager {
    fn new() -> Self {
        CommandManager {
            commands: Mutex::new(IndexMap::new()),
            cache: Mutex::new(LruCache::new(DEFAULT_CACHE_CAPACITY)),
            namespaces: Mutex::new(IndexMap::new()),
        }
    }

    pub fn register(
        &self,
        namespace: String,
        command: Arc<Alconna>,
        replace: bool,
    ) -> Result<Arc<Alconna>> {
        let mut commands = self.commands.lock();
        let ns_map = commands.entry(namespace).or_default();
        if ns_map.contains_key(&command.id) && !replace {
            return Err(Error::DuplicateCommand(command.id.clone()));
        }
        if ns_map.contains_key(&command.id) {
            self.cache.lock().purge_command(&command.id);
        }
        tracing::debug!(command_id = %command.id, "registering command");
        ns_map.insert(command.id.clone(), command.clone());
        Ok(command)
    }

    pub fn get_command(&self, id: &str) -> Option<Arc<Alconna>> {
        let commands = self.commands.lock();
        commands.values().find_map(|ns| ns.get(id).cloned())
    }

    pub fn get_commands(&self, namespace: &str) -> Vec<Arc<Alconna>> {
        let commands = self.commands.lock();
        commands.get(namespace).map(|ns| ns.values().cloned().collect()).unwrap_or_default()
    }

    pub fn delete(&self, id: &str) {
        let mut commands = self.commands.lock();
        for ns in commands.values_mut() {
            ns.shift_remove(id);
        }
        self.cache.lock().purge_command(id);
        tracing::debug!(command_id = %id, "deregistered command");
    }

    pub fn enable_cache(&self, namespace: &str, enabled: bool) {
        self.namespaces.lock().entry(namespace.to_string()).or_default().enable_message_cache = enabled;
    }

    fn cache_enabled(&self, namespace: &str) -> bool {
        self.namespaces.lock().get(namespace).map(|s| s.enable_message_cache).unwrap_or(false)
    }

    pub fn lookup_cache(&self, command_id: &str, namespace: &str, input_hash: u64) -> Option<Arparma> {
        if !self.cache_enabled(namespace) {
            return None;
        }
        let hit = self.cache.lock().get(&(command_id.to_string(), input_hash));
        if hit.is_some() {
            tracing::trace!(command_id, "cache hit");
        }
        hit
    }

    pub fn store_cache(&self, command_id: &str, namespace: &str, input_hash: u64, result: Arparma) {
        if !self.cache_enabled(namespace) {
            return;
        }
        self.cache.lock().insert((command_id.to_string(), input_hash), result);
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    pub fn set_cache_capacity(&self, capacity: usize) {
        self.cache.lock().set_capacity(capacity);
    }

    /// Drops every registered command and the whole cache. Intended for
    /// test isolation only.
    pub fn reset(&self) {
        self.commands.lock().clear();
        self.cache.lock().clear();
        self.namespaces.lock().clear();
    }
}

static MANAGER: OnceLock<CommandManager> = OnceLock::new();

/// The process-wide [`CommandManager`] singleton, initialised lazily on
/// first access.
pub fn command_manager() -> &'static CommandManager {
    MANAGER.get_or_init(CommandManager::new)
}

/// A stable hash of a token stream's canonical text form, used as the
/// second half of the cache key.
pub fn hash_input(tokens: &[crate::value::Token]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for tok in tokens {
        match tok {
            crate::value::Token::Text(s) => s.hash(&mut hasher),
            crate::value::Token::Payload(p) => p.type_name().hash(&mut hasher),
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Alconna;

    fn sample_arparma(id: &str) -> Arparma {
        Arparma {
            origin: Vec::new(),
            matched: true,
            header: None,
            main_args: IndexMap::new(),
            other_args: IndexMap::new(),
            options: IndexMap::new(),
            subcommands: IndexMap::new(),
            error_info: None,
            error_data: Vec::new(),
            command_id: id.to_string(),
        }
    }

    // Uses a freshly constructed `CommandManager` instead of the process-wide
    // singleton so this test isn't sensitive to ordering against other tests
    // sharing `command_manager()`.
    #[test]
    fn cache_is_gated_by_enable_cache_and_serves_hits_once_on() {
        let mgr = CommandManager::new();
        let hash = hash_input(&[]);

        assert!(mgr.lookup_cache("cmd", "ns", hash).is_none());

        mgr.store_cache("cmd", "ns", hash, sample_arparma("cmd"));
        assert!(mgr.lookup_cache("cmd", "ns", hash).is_none(), "cache disabled for namespace");

        mgr.enable_cache("ns", true);
        mgr.store_cache("cmd", "ns", hash, sample_arparma("cmd"));
        let hit = mgr.lookup_cache("cmd", "ns", hash).expect("cache enabled, entry stored");
        assert_eq!(hit.command_id(), "cmd");
    }

    #[test]
    fn reregistering_a_command_purges_its_cache_entries() {
        let mgr = CommandManager::new();
        mgr.enable_cache("ns", true);
        let hash = hash_input(&[]);

        let cmd = Alconna::builder("cmd").namespace("ns").build_unregistered().unwrap();
        mgr.register("ns".to_string(), cmd.clone(), false).unwrap();
        mgr.store_cache(&cmd.id, "ns", hash, sample_arparma(&cmd.id));
        assert!(mgr.lookup_cache(&cmd.id, "ns", hash).is_some());

        mgr.register("ns".to_string(), cmd.clone(), true).unwrap();
        assert!(mgr.lookup_cache(&cmd.id, "ns", hash).is_none(), "re-registration must purge the cache");
    }
}
