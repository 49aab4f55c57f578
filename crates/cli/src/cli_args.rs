//! Command-line argument parsing.
//!
//! This module defines the command-line interface of the `cmdtree` binary
//! using the `clap` crate.

use clap::Parser;
use cmdtree_core::dictionary::{Mask, UNLOCK_ALL};

/// Access mask used when none is given: every bit.
const DEFAULT_ACCESS: &str = "0xffffffffffffffff";

/// Parses an access mask in decimal or `0x` prefixed hexadecimal.
///
/// # Examples
///
/// ```
/// use cmdtree_cli::cli_args::parse_mask;
///
/// assert_eq!(parse_mask("0x10"), Ok(16));
/// assert_eq!(parse_mask("3"), Ok(3));
/// assert!(parse_mask("lots").is_err());
/// ```
pub fn parse_mask(value: &str) -> std::result::Result<Mask, String> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => Mask::from_str_radix(&hex.replace('_', ""), 16),
        None => value.replace('_', "").parse::<Mask>(),
    };
    parsed.map_err(|e| format!("invalid mask `{value}`: {e}"))
}

/// Command-line arguments for the `cmdtree` shell.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use cmdtree_cli::cli_args::Args;
///
/// let args = Args::parse_from(["cmdtree", "--line", "show statistics"]);
/// assert_eq!(args.line.as_deref(), Some("show statistics"));
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the command definition config file YAML.
    ///
    /// If not provided, defaults to `~/.cmdtree/commands.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Access mask of the session, decimal or `0x` hexadecimal.
    ///
    /// Only commands whose mask shares a bit with it are visible.
    #[arg(long, short = 'm', value_parser = parse_mask, default_value = DEFAULT_ACCESS)]
    pub mask: Mask,

    /// Resolve this single line, print the outcome and exit.
    ///
    /// The exit code is zero only for a valid command.
    #[arg(long, short = 'l')]
    pub line: Option<String>,

    /// Prompt shown in front of the input line.
    #[arg(long, short = 'p', default_value = "> ")]
    pub prompt: String,
}

impl Args {
    /// Whether the session runs with every access bit.
    pub fn unlocked(&self) -> bool {
        self.mask == UNLOCK_ALL
    }
}
