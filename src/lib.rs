//! A declarative command-grammar compiler and analyser for text/payload
//! streams: build a command once (headers, positional/keyword args,
//! options, subcommands, requirement chains), compile it into a reusable
//! [`Analyser`], then run it against many inputs to get a structured,
//! queryable [`Arparma`].
//!
//! ```
//! use cmdforge::args::Args;
//! use cmdforge::collection::DataCollection;
//! use cmdforge::command::Alconna;
//! use cmdforge::pattern;
//!
//! let cmd = Alconna::builder("test")
//!     .main_args(Args::new().push("bar", pattern::any_one()))
//!     .build_unregistered()
//!     .unwrap();
//! let result = cmd.parse(DataCollection::from_str("test hello", false)).unwrap();
//! assert!(result.matched());
//! assert_eq!(result.query("bar").unwrap().unwrap().as_str(), Some("hello"));
//! ```

pub mod analyser;
pub mod args;
pub mod arparma;
pub mod behavior;
pub mod collection;
pub mod command;
pub mod completion;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod grammar;
pub mod help;
pub mod manager;
pub mod node;
pub mod pattern;
pub mod value;

pub use analyser::Analyser;
pub use arparma::Arparma;
pub use command::{Alconna, AlconnaBuilder, Header, Meta};
pub use error::{Error, Result};
pub use manager::{command_manager, CommandManager};
pub use value::{Payload, PayloadKind, Token, Value};
