//! cmdtree CLI Library
//!
//! This crate provides the interactive front end of cmdtree: a shell that
//! resolves the line as it is typed against the command definitions loaded
//! by `cmdtree-core`.
//!
//! # Key Features
//!
//! - **Live Highlighting**: Every character is colored by its role in the line
//! - **Completion**: Tab completes command words or lists the alternatives
//! - **Help**: `?` lists parameters or matching commands
//! - **Single Line Mode**: Resolve one line from the command line and exit
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`shell`]: The interactive loop, line editing and rendering
//!
//! # Examples
//!
//! ```bash
//! # Interactive shell with the default definitions file
//! cmdtree
//!
//! # Restricted access mask
//! cmdtree --mask 0x1
//!
//! # Resolve one line and report it
//! cmdtree --line "throw ball 3"
//! ```

pub mod cli_args;
pub mod shell;
