//! Commands and command sets.
//!
//! Commands are registered into named [`CommandSet`]s. Only commands of
//! active sets take part in resolution; activating or deactivating a set, or
//! adding to it, marks it modified so the owning resolver rebuilds its
//! dictionary before the next resolution.

use std::fmt::{Display, Formatter};

use log::debug;

use crate::dictionary::Mask;
use crate::error::{Error, Result};
use crate::lexer::tokenize;
use crate::parameter::Parameter;
use crate::token::Id;

/// Location of a command inside a resolver: set index and position in that
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandKey {
    pub set: usize,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    id: Option<Id>,
    name: Option<String>,
    words: String,
    mask: Mask,
    hidden: bool,
    parameters: Vec<Parameter>,
    help: Option<String>,
}

impl Command {
    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Command words joined by single spaces.
    pub fn words(&self) -> &str {
        &self.words
    }

    pub fn word_list(&self) -> impl Iterator<Item = &str> {
        self.words.split(' ')
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn set_help(&mut self, help: &str) -> &mut Self {
        self.help = Some(help.to_string());
        self
    }

    /// Appends a parameter declaration.
    pub fn add(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }
}

impl Display for Command {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.words)?;
        match (&self.name, self.id) {
            (Some(name), Some(id)) => write!(formatter, " ({}, #{})", name, id),
            (Some(name), None) => write!(formatter, " ({})", name),
            (None, Some(id)) => write!(formatter, " (#{})", id),
            (None, None) => Ok(()),
        }
    }
}

/// Turns `words` into the canonical single-space form, rejecting quoted or
/// empty words.
fn sanitize(words: &str) -> Result<String> {
    let tokens = tokenize(words);
    if tokens.is_empty() {
        return Err(Error::EmptyCommand);
    }
    if tokens.iter().any(|t| t.is_quoted() || t.value.is_empty()) {
        return Err(Error::InvalidCommandWord(words.to_string()));
    }

    Ok(tokens
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(" "))
}

#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    name: String,
    commands: Vec<Command>,
    active: bool,
    dirty: bool,
}

impl CommandSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a command.
    ///
    /// # Arguments
    ///
    /// * `words` - Command words, separated by whitespace
    /// * `name` - Optional name used to look the command up
    /// * `id` - Optional numeric id
    /// * `mask` - Access mask
    /// * `hidden` - Hidden commands resolve but are never offered
    ///
    /// # Errors
    ///
    /// Returns an error if neither `name` nor `id` is given, if `words` is
    /// empty or contains quoted words, or if this set already holds a
    /// command with the same words.
    pub fn add(
        &mut self,
        words: &str,
        name: Option<&str>,
        id: Option<Id>,
        mask: Mask,
        hidden: bool,
    ) -> Result<&mut Command> {
        if name.is_none() && id.is_none() {
            return Err(Error::MissingIdentity(words.to_string()));
        }
        let words = sanitize(words)?;
        if self.commands.iter().any(|c| c.words == words) {
            return Err(Error::DuplicateCommand(words));
        }

        debug!("set[{}] +command[{}] mask[{:#x}]", self.name, words, mask);
        self.dirty = true;
        self.commands.push(Command {
            id,
            name: name.map(str::to_string),
            words,
            mask,
            hidden,
            parameters: Vec::new(),
            help: None,
        });

        let index = self.commands.len() - 1;
        Ok(&mut self.commands[index])
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.dirty = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.dirty = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Reports whether the set changed since the last call, and resets the
    /// flag.
    pub fn modified(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn command_mut(&mut self, index: usize) -> Option<&mut Command> {
        self.commands.get_mut(index)
    }

    pub fn find_by_id(&self, id: Id) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == Some(id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name.as_deref() == Some(name))
    }
}
