//! The per-namespace configuration surface (ambient C9). A plain struct
//! with `Default`, optionally `serde`-deserializable the way the pack's
//! CLI tools load their TOML configs; loading the file itself is left to
//! the caller.

use indexmap::IndexSet;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct BuiltinOptionNames {
    pub help: Vec<String>,
    pub completion: Vec<String>,
    pub shortcut: Vec<String>,
}

impl Default for BuiltinOptionNames {
    fn default() -> Self {
        BuiltinOptionNames {
            help: vec!["--help".to_string(), "-h".to_string()],
            completion: vec!["--comp".to_string(), "--completion".to_string()],
            shortcut: vec!["--shortcut".to_string()],
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct NamespaceConfig {
    pub enable_message_cache: bool,
    pub fuzzy_match: bool,
    pub fuzzy_threshold: u32,
    pub raise_exception: bool,
    pub keep_crlf: bool,
    pub builtin_option_names: BuiltinOptionNames,
    pub separators: IndexSet<String>,
    pub filter_out: IndexSet<String>,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        let mut separators = IndexSet::new();
        separators.insert(" ".to_string());
        NamespaceConfig {
            enable_message_cache: false,
            fuzzy_match: true,
            fuzzy_threshold: 2,
            raise_exception: true,
            keep_crlf: false,
            builtin_option_names: BuiltinOptionNames::default(),
            separators,
            filter_out: IndexSet::new(),
        }
    }
}

impl NamespaceConfig {
    /// Installs this config for `namespace`, enabling/disabling the parse
    /// cache on the global [`crate::manager::CommandManager`] accordingly.
    pub fn apply(&self, namespace: &str) {
        crate::manager::command_manager().enable_cache(namespace, self.enable_message_cache);
    }
}
