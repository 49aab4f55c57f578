//! cmdtree Core Library
//!
//! This crate resolves interactively typed command lines against a
//! dictionary of registered multi-word commands. It identifies the longest
//! matching command, binds the remaining words to declared flags, keys and
//! positional values, validates them, and classifies every character of the
//! line for colored display.
//!
//! # Key Features
//!
//! - **Lexing**: whitespace and `=` separated words, quoting and escapes
//! - **Command Dictionary**: a compressed trie of command words with access
//!   masks and hidden commands
//! - **Parameter Binding**: flags, key/value pairs, positional values and
//!   defaults
//! - **Validation**: pluggable validators, with built-in integer and boolean
//!   types and choice lists
//! - **Auto-completion and Help**: completion of command words and context
//!   help for the current line
//! - **Configuration**: command sets, validators and a color theme loaded
//!   from YAML
//!
//! # Examples
//!
//! Loading command definitions and resolving a line:
//!
//! ```no_run
//! use cmdtree_core::config::get_config_path;
//! use cmdtree_core::dictionary::UNLOCK_ALL;
//! use cmdtree_core::file_handling::load_definitions;
//! use cmdtree_core::resolver::Resolver;
//! use cmdtree_core::validation::ValidatorRegistry;
//!
//! let definitions = load_definitions(&get_config_path(&None))?;
//! let mut resolver = Resolver::new(ValidatorRegistry::with_builtins());
//! definitions.register(&mut resolver)?;
//!
//! resolver.set_line("show statistics");
//! println!("{}", resolver.resolve(UNLOCK_ALL)?);
//! # Ok::<(), cmdtree_core::error::Error>(())
//! ```

pub mod binder;
pub mod command;
pub mod completion;
pub mod config;
pub mod cursor;
pub mod definitions;
pub mod dictionary;
pub mod error;
pub mod file_handling;
pub mod help;
pub mod lexer;
pub mod parameter;
pub mod resolver;
pub mod token;
pub mod validation;
