//! Context help for the current line.

use std::fmt::{Display, Formatter};

use crate::command::Command;
use crate::parameter::{Parameter, ParameterKind};
use crate::resolver::{Resolver, Status};

/// One line of a command listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub words: String,
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Help {
    /// Parameter listing of the resolved command.
    Parameters(Vec<String>),
    /// Commands starting with the typed words.
    Commands(Vec<HelpEntry>),
    NoMatch,
}

impl Display for Help {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Help::Parameters(lines) => {
                for line in lines {
                    writeln!(formatter, "{}", line)?;
                }
                Ok(())
            }
            Help::Commands(entries) => {
                let width = entries.iter().map(|e| e.words.len()).max().unwrap_or(0);
                for entry in entries {
                    writeln!(formatter, "{:<width$} : {}", entry.words, entry.help)?;
                }
                Ok(())
            }
            Help::NoMatch => writeln!(formatter, "No known commands match current line"),
        }
    }
}

fn summary(command: &Command) -> String {
    format!("{} : {}", command.words(), command.help().unwrap_or_default())
}

fn with_details(mut line: String, help: Option<&str>, default: Option<&str>) -> String {
    if let Some(help) = help.filter(|h| !h.is_empty()) {
        line.push_str(" : ");
        line.push_str(help);
    }
    if let Some(default) = default.filter(|d| !d.is_empty()) {
        line.push_str(&format!(" (default:{})", default));
    }
    line
}

fn default_of(parameter: &Parameter) -> Option<&str> {
    if parameter.is_mandatory() {
        None
    } else {
        parameter.default()
    }
}

/// Keys first, then positionals numbered from one, then flags.
pub fn parameter_lines(command: &Command) -> Vec<String> {
    let visible = || command.parameters().iter().filter(|p| !p.is_hidden());

    let mut lines: Vec<String> = visible()
        .filter(|p| matches!(p.kind(), ParameterKind::Key { .. }))
        .map(|p| with_details(p.to_string(), p.help(), default_of(p)))
        .collect();

    let positionals = visible().filter(|p| matches!(p.kind(), ParameterKind::Value { .. }));
    for (position, parameter) in positionals.enumerate() {
        let name = if parameter.is_mandatory() {
            format!("<arg{}>", position + 1)
        } else {
            format!("[arg{}]", position + 1)
        };
        lines.push(with_details(name, parameter.help(), default_of(parameter)));
    }

    let mut flags = visible()
        .filter(|p| matches!(p.kind(), ParameterKind::Flag { .. }))
        .peekable();
    if flags.peek().is_some() {
        lines.push("====== optional flags ======".to_string());
        lines.extend(flags.map(|p| with_details(p.to_string(), p.help(), None)));
    }

    if lines.is_empty() {
        lines.push(summary(command));
    }
    lines
}

impl Resolver {
    /// Help for the line as of the last resolution.
    ///
    /// With a resolved command this lists its parameters. With an empty or
    /// partial line it lists the visible commands starting with the typed
    /// words; a cursor past the last word restricts the listing to commands
    /// continuing with another word.
    pub fn help(&self) -> Help {
        if let Some(command) = self.command().filter(|_| self.status.has_command()) {
            return Help::Parameters(parameter_lines(command));
        }
        if self.status == Status::NoCommand {
            return Help::NoMatch;
        }

        let typed: Vec<_> = self.tokens.iter().filter(|t| t.in_string()).collect();
        let mut search = typed
            .iter()
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if typed.last().is_some_and(|t| self.cursor > t.end()) {
            search.push(' ');
        }

        let entries = self
            .sorted_commands()
            .filter(|c| (c.mask() & self.mask) != 0 && !c.hidden())
            .filter(|c| c.words().starts_with(&search))
            .map(|c| HelpEntry {
                words: c.words().to_string(),
                help: c.help().unwrap_or_default().to_string(),
            })
            .collect();
        Help::Commands(entries)
    }
}
