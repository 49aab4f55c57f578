//! Line resolution.
//!
//! The [`Resolver`] owns the registered command sets, the dictionary built
//! from them, the validator registry and the line being edited. Calling
//! [`Resolver::resolve`] runs the whole pipeline:
//!
//! 1. rebuild the dictionary if any command set changed
//! 2. tokenize the line
//! 3. walk the tokens through the dictionary, keeping the longest command
//! 4. bind the remaining tokens to that command's parameters
//! 5. validate bound values
//! 6. classify every character of the line for display
//!
//! Results are memoized: resolving again without changing the line, the
//! mask or the registered commands returns the previous status.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::dictionary::UNLOCK_ALL;
//! use cmdtree_core::parameter::Parameter;
//! use cmdtree_core::resolver::{Resolver, Status};
//! use cmdtree_core::validation::{ValidatorRegistry, VALIDATOR_INTEGER};
//!
//! let mut resolver = Resolver::new(ValidatorRegistry::with_builtins());
//! resolver
//!     .default_set()
//!     .add("throw ball", Some("throw"), Some(1), 1, false)?
//!     .add(Parameter::key(1, "angle", VALIDATOR_INTEGER).with_default("45"));
//!
//! resolver.set_line("throw ball");
//! assert_eq!(resolver.resolve(UNLOCK_ALL)?, Status::ValidCommand);
//! assert_eq!(resolver.key_value("angle"), Some("45"));
//! # Ok::<(), cmdtree_core::error::Error>(())
//! ```

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use log::{debug, log_enabled, Level};

use crate::binder::bind;
use crate::command::{Command, CommandKey, CommandSet};
use crate::cursor::CommandCursor;
use crate::dictionary::{Dictionary, Leaf, Mask, DEFAULT_MASK, ROOT};
use crate::error::Result;
use crate::lexer::tokenize;
use crate::token::{Id, Token, TokenKind, TokenStatus};
use crate::validation::{ValidatorRegistry, Validity};

/// Outcome of resolving a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// A command was found and all arguments bound and validated.
    ValidCommand,
    /// The line holds no tokens.
    Empty,
    /// The first word matches nothing.
    NoCommand,
    /// The words match a dictionary path but no command yet.
    PartialCommand,
    /// A key was given without a value.
    MissingValue,
    /// Arguments bound, but at least one value failed validation.
    InvalidArgument,
    TooFewArgs,
    TooManyArgs,
}

impl Status {
    /// Whether a command was identified, regardless of its arguments.
    pub fn has_command(&self) -> bool {
        !matches!(self, Status::Empty | Status::NoCommand | Status::PartialCommand)
    }
}

impl Display for Status {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            Status::ValidCommand => "valid command",
            Status::Empty => "empty line",
            Status::NoCommand => "no command matches",
            Status::PartialCommand => "incomplete command",
            Status::MissingValue => "missing value for key",
            Status::InvalidArgument => "invalid argument",
            Status::TooFewArgs => "too few arguments",
            Status::TooManyArgs => "too many arguments",
        };
        write!(formatter, "{}", description)
    }
}

/// Display category of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Normal,
    UnknownToken,
    ValidCommand,
    PartialCommand,
    InvalidCommand,
    Completion,
    QuotedString,
    ValidArgument,
    PartialArgument,
    InvalidArgument,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Normal,
        Category::UnknownToken,
        Category::ValidCommand,
        Category::PartialCommand,
        Category::InvalidCommand,
        Category::Completion,
        Category::QuotedString,
        Category::ValidArgument,
        Category::PartialArgument,
        Category::InvalidArgument,
    ];

    /// Name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::UnknownToken => "unknown_token",
            Category::ValidCommand => "valid_command",
            Category::PartialCommand => "partial_command",
            Category::InvalidCommand => "invalid_command",
            Category::Completion => "completion",
            Category::QuotedString => "quoted_string",
            Category::ValidArgument => "valid_argument",
            Category::PartialArgument => "partial_argument",
            Category::InvalidArgument => "invalid_argument",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|category| category.name() == name)
    }
}

/// Classification of one character of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharClass {
    /// Index of the token the character belongs to. Whitespace is linked to
    /// the token that follows it.
    pub token: Option<usize>,
    pub category: Category,
    /// Byte offset in the line.
    pub offset: usize,
    /// Character position in the line.
    pub display_offset: usize,
    /// `1`, or `0` for the end-of-line marker.
    pub display_length: usize,
}

#[derive(Debug)]
pub struct Resolver {
    pub(crate) sets: IndexMap<String, CommandSet>,
    pub(crate) dictionary: Dictionary,
    /// Active commands ordered by their words.
    pub(crate) sorted: Vec<CommandKey>,
    pub(crate) validators: ValidatorRegistry,
    pub(crate) mask: Mask,
    pub(crate) line: String,
    pub(crate) cursor: usize,
    pub(crate) tokens: Vec<Token>,
    pub(crate) first_argument: usize,
    pub(crate) command: Option<CommandKey>,
    pub(crate) status: Status,
    pub(crate) characters: Vec<CharClass>,
    line_dirty: bool,
    stale: bool,
    dictionary_dirty: bool,
    resolved_mask: Option<Mask>,
}

impl Resolver {
    pub fn new(validators: ValidatorRegistry) -> Self {
        Self {
            sets: IndexMap::new(),
            dictionary: Dictionary::new(),
            sorted: Vec::new(),
            validators,
            mask: DEFAULT_MASK,
            line: String::new(),
            cursor: 0,
            tokens: Vec::new(),
            first_argument: 0,
            command: None,
            status: Status::Empty,
            characters: Vec::new(),
            line_dirty: true,
            stale: true,
            dictionary_dirty: false,
            resolved_mask: None,
        }
    }

    /// The unnamed set. It is activated on first use and stays active.
    pub fn default_set(&mut self) -> &mut CommandSet {
        self.command_set("")
    }

    /// Returns the set called `name`, creating it inactive if needed. The
    /// empty name refers to the default set.
    pub fn command_set(&mut self, name: &str) -> &mut CommandSet {
        self.stale = true;
        let set = self
            .sets
            .entry(name.to_string())
            .or_insert_with(|| CommandSet::new(name));
        if name.is_empty() && !set.is_active() {
            set.activate();
        }
        set
    }

    pub fn has_command_set(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    pub fn command_sets(&self) -> impl Iterator<Item = &CommandSet> {
        self.sets.values()
    }

    /// Deactivates every named set. The default set stays active.
    pub fn deactivate_all_sets(&mut self) {
        for set in self.sets.values_mut().filter(|s| !s.name().is_empty()) {
            set.deactivate();
        }
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    pub fn validators_mut(&mut self) -> &mut ValidatorRegistry {
        self.stale = true;
        &mut self.validators
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn command_by_key(&self, key: CommandKey) -> Option<&Command> {
        self.sets
            .get_index(key.set)
            .and_then(|(_, set)| set.commands().get(key.index))
    }

    /// Active commands ordered by their words, as of the last rebuild.
    pub fn sorted_commands(&self) -> impl Iterator<Item = &Command> {
        self.sorted.iter().filter_map(|&key| self.command_by_key(key))
    }

    /// Rebuilds the dictionary if any set changed since the last rebuild.
    ///
    /// The new dictionary replaces the old one only when every command was
    /// inserted successfully.
    ///
    /// # Returns
    ///
    /// `true` if the dictionary was rebuilt.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::DuplicateCommand`] when two active
    /// commands share the same words, or an allocation error.
    pub fn rebuild(&mut self) -> Result<bool> {
        let mut modified = self.dictionary_dirty;
        for set in self.sets.values_mut() {
            modified |= set.modified();
        }
        if !modified {
            return Ok(false);
        }

        self.dictionary_dirty = true;
        let mut dictionary = Dictionary::new();
        let mut sorted = Vec::new();

        for (set_index, set) in self.sets.values().enumerate() {
            if !set.is_active() {
                continue;
            }
            for (index, command) in set.commands().iter().enumerate() {
                let key = CommandKey {
                    set: set_index,
                    index,
                };
                let (mask, hidden) = (command.mask(), command.hidden());

                let mut root = ROOT;
                let mut node = ROOT;
                for (position, word) in command.word_list().enumerate() {
                    if position > 0 {
                        root = dictionary.add_word_root(node, mask, hidden)?;
                    }
                    node = dictionary.insert(root, word, mask, hidden)?;
                }
                let leaf = Leaf {
                    command: key,
                    mask,
                    hidden,
                };
                dictionary.associate(node, leaf, command.words())?;
                sorted.push(key);
            }
        }

        sorted.sort_by(|&a, &b| {
            let words = |key: CommandKey| self.command_by_key(key).map(Command::words);
            words(a).cmp(&words(b))
        });

        debug!(
            "Rebuilt dictionary: {} command(s), {} node(s)",
            sorted.len(),
            dictionary.len()
        );
        dictionary.dump();

        self.dictionary = dictionary;
        self.sorted = sorted;
        self.dictionary_dirty = false;
        self.dump_commands();
        Ok(true)
    }

    fn dump_commands(&self) {
        if log_enabled!(Level::Debug) {
            for command in self.sorted_commands() {
                debug!(
                    "[{:#010x}/{}] {}",
                    command.mask(),
                    if command.hidden() { "HIDDEN" } else { "VISIBLE" },
                    command.words()
                );
            }
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Cursor position as a byte offset in the line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the line and puts the cursor at its end.
    pub fn set_line(&mut self, line: &str) {
        self.set_line_with_cursor(line, line.len());
    }

    /// Replaces the line. The cursor is clamped to the line and moved back
    /// to a character boundary.
    pub fn set_line_with_cursor(&mut self, line: &str, cursor: usize) {
        self.line = line.to_string();
        let mut cursor = cursor.min(self.line.len());
        while !self.line.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
        self.line_dirty = true;
    }

    /// Inserts `text` at the cursor and moves the cursor past it.
    pub fn insert_str(&mut self, text: &str) {
        self.line.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.line_dirty = true;
    }

    pub fn clear_line(&mut self) {
        self.set_line("");
    }

    /// Resolves the line for a caller holding `mask`.
    ///
    /// # Errors
    ///
    /// Only fails if the dictionary has to be rebuilt and the rebuild
    /// fails; see [`Resolver::rebuild`].
    pub fn resolve(&mut self, mask: Mask) -> Result<Status> {
        let rebuilt = self.rebuild()?;
        if !rebuilt && !self.line_dirty && !self.stale && self.resolved_mask == Some(mask) {
            return Ok(self.status);
        }

        self.mask = mask;
        self.resolved_mask = Some(mask);
        self.line_dirty = false;
        self.stale = false;

        self.tokens = tokenize(&self.line);
        self.command = None;
        self.first_argument = self.tokens.len();
        self.status = self.match_command();

        if let Some(key) = self.command {
            let command = self
                .sets
                .get_index(key.set)
                .and_then(|(_, set)| set.commands().get(key.index));
            if let Some(command) = command {
                self.status = bind(command, &mut self.tokens, self.first_argument);
                self.validate();

                let rejected = self.tokens[self.first_argument..].iter().any(|t| {
                    t.status.contains(TokenStatus::IS_VALUE)
                        && !t.status.contains(TokenStatus::VALIDATED)
                });
                if self.status == Status::ValidCommand && rejected {
                    self.status = Status::InvalidArgument;
                }
            }
        }

        self.classify();
        debug!("Resolved `{}`: {}", self.line, self.status);
        self.dump_tokens();
        Ok(self.status)
    }

    /// One line per token of the last resolution: its text, its role and
    /// its status bits.
    pub fn token_table(&self) -> Vec<String> {
        self.tokens
            .iter()
            .map(|token| {
                let is_value = token.status.contains(TokenStatus::IS_VALUE);
                let role = match token.kind {
                    TokenKind::Unknown => "unknown",
                    TokenKind::Command => "command",
                    TokenKind::Value => "value",
                    TokenKind::Flag => "flag",
                    TokenKind::Key if is_value => "pair-value",
                    TokenKind::Key => "pair-key",
                };
                let text = match token.kind {
                    TokenKind::Flag => token.name.as_deref().unwrap_or_default(),
                    TokenKind::Key if !is_value => token.name.as_deref().unwrap_or_default(),
                    _ => token.value.as_str(),
                };
                format!("({}): {} {:?}", text, role, token.status)
            })
            .collect()
    }

    fn dump_tokens(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        if let Some(command) = self.command() {
            debug!("cmd[{}] first argument[{}]", command, self.first_argument);
        }
        for line in self.token_table() {
            debug!("  {}", line);
        }
    }

    /// Walks the command words through the dictionary and records the
    /// longest visible command.
    fn match_command(&mut self) -> Status {
        let mut status = if self.tokens.is_empty() {
            Status::Empty
        } else {
            Status::NoCommand
        };
        let mask = self.mask;
        let mut cursor = CommandCursor::new(&self.dictionary);

        for (index, token) in self.tokens.iter_mut().enumerate() {
            if token.is_quoted() || token.value.is_empty() || !cursor.find(&token.value, mask, true)
            {
                if self.command.is_none() {
                    status = Status::NoCommand;
                }
                break;
            }

            token.kind = TokenKind::Command;
            status = Status::PartialCommand;
            if !cursor.end() {
                break;
            }
            if cursor.command(mask, true) {
                self.command = cursor.leaf().map(|leaf| leaf.command);
                self.first_argument = index + 1;
            }
            if !cursor.next_root() {
                break;
            }
        }

        status
    }

    fn validate(&mut self) {
        for token in &mut self.tokens[self.first_argument..] {
            if token.status.contains(TokenStatus::INVALID) {
                continue;
            }
            let is_value = token.status.contains(TokenStatus::IS_VALUE);
            match token.kind {
                TokenKind::Key | TokenKind::Value if is_value => {
                    token.status.remove(TokenStatus::PARTIAL_ARG);
                    match self.validators.check(token.value_type, &token.value) {
                        Validity::Invalid => {}
                        Validity::Partial => token.status |= TokenStatus::PARTIAL_ARG,
                        Validity::Valid => token.status |= TokenStatus::VALIDATED,
                    }
                }
                TokenKind::Unknown => {}
                _ => token.status |= TokenStatus::VALIDATED,
            }
        }
    }

    fn token_category(&self, token: &Token, command_tokens_seen: bool) -> Category {
        let status = token.status;
        if token.kind == TokenKind::Command {
            if self.command.is_some() {
                Category::ValidCommand
            } else {
                Category::PartialCommand
            }
        } else if status.contains(TokenStatus::INVALID) {
            Category::InvalidArgument
        } else if token.kind == TokenKind::Unknown {
            if command_tokens_seen && self.command.is_none() {
                Category::InvalidCommand
            } else if !status.contains(TokenStatus::PARTIAL_ARG)
                && matches!(self.status, Status::MissingValue | Status::TooFewArgs)
            {
                Category::InvalidArgument
            } else {
                Category::UnknownToken
            }
        } else if status.contains(TokenStatus::VALIDATED) {
            if token.is_quoted() {
                Category::QuotedString
            } else {
                Category::ValidArgument
            }
        } else if status.contains(TokenStatus::PARTIAL_ARG) {
            Category::PartialArgument
        } else {
            Category::InvalidArgument
        }
    }

    fn classify(&mut self) {
        let mut command_tokens_seen = false;
        let mut spans = Vec::new();
        for (index, token) in self.tokens.iter().enumerate() {
            if !token.in_string() {
                continue;
            }
            command_tokens_seen |= token.kind == TokenKind::Command;
            spans.push((index, self.token_category(token, command_tokens_seen)));
        }

        let mut characters = Vec::with_capacity(self.line.len() + 1);
        let mut span = 0;
        let mut display_offset = 0;
        for (offset, _) in self.line.char_indices() {
            while span < spans.len() && offset >= self.tokens[spans[span].0].end() {
                span += 1;
            }
            let (token, category) = match spans.get(span) {
                Some(&(index, category)) if offset >= self.tokens[index].offset => {
                    (Some(index), category)
                }
                Some(&(index, _)) => (Some(index), Category::Normal),
                None => (None, Category::Normal),
            };
            characters.push(CharClass {
                token,
                category,
                offset,
                display_offset,
                display_length: 1,
            });
            display_offset += 1;
        }
        characters.push(CharClass {
            token: None,
            category: Category::Normal,
            offset: self.line.len(),
            display_offset,
            display_length: 0,
        });

        self.characters = characters;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Mask used by the last resolution.
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// The resolved command, if any.
    pub fn command(&self) -> Option<&Command> {
        self.command.and_then(|key| self.command_by_key(key))
    }

    pub fn command_key(&self) -> Option<CommandKey> {
        self.command
    }

    /// All tokens of the line, followed by any default tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens following the command words. Empty without a command.
    pub fn arguments(&self) -> &[Token] {
        if self.command.is_some() {
            &self.tokens[self.first_argument..]
        } else {
            &[]
        }
    }

    /// Per-character classification of the line, plus an end-of-line
    /// marker.
    pub fn characters(&self) -> &[CharClass] {
        &self.characters
    }

    /// The value token following the key token at `index`, if the pair is
    /// complete.
    fn key_pair_value(&self, arguments: &[Token], index: usize) -> Option<usize> {
        let value = arguments.get(index + 1)?;
        (value.kind == TokenKind::Key && value.status.contains(TokenStatus::IS_VALUE))
            .then_some(index + 1)
    }

    /// Argument bound to the parameter `id`. For keys this is the value
    /// token; a key without its value yields nothing.
    pub fn find_arg(&self, id: Id) -> Option<&Token> {
        let arguments = self.arguments();
        let index = arguments.iter().position(|t| t.id == Some(id))?;
        if arguments[index].kind == TokenKind::Key
            && !arguments[index].status.contains(TokenStatus::IS_VALUE)
        {
            return self
                .key_pair_value(arguments, index)
                .map(|value| &arguments[value]);
        }
        Some(&arguments[index])
    }

    /// The flag token named `name`, if the flag was given.
    pub fn find_flag(&self, name: &str) -> Option<&Token> {
        self.arguments()
            .iter()
            .find(|t| t.kind == TokenKind::Flag && t.name.as_deref() == Some(name))
    }

    /// The value token of key `name`, if the key and its value are present.
    pub fn find_key(&self, name: &str) -> Option<&Token> {
        let arguments = self.arguments();
        let index = arguments.iter().position(|t| {
            t.kind == TokenKind::Key
                && t.name.as_deref() == Some(name)
                && !t.status.contains(TokenStatus::IS_VALUE)
        })?;
        self.key_pair_value(arguments, index)
            .map(|value| &arguments[value])
    }

    pub fn key_value(&self, name: &str) -> Option<&str> {
        self.find_key(name).map(|t| t.value.as_str())
    }

    /// Positional values in line order, defaults last.
    pub fn positionals(&self) -> impl Iterator<Item = &Token> {
        self.arguments()
            .iter()
            .filter(|t| t.kind == TokenKind::Value)
    }

    /// The `n`th positional value, counting from zero.
    pub fn positional(&self, n: usize) -> Option<&Token> {
        self.positionals().nth(n)
    }

    /// Token under the cursor and the cursor offset inside it. A cursor right
    /// after a token counts as inside it.
    pub fn current_token(&self) -> Option<(usize, usize)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.in_string())
            .find(|(_, t)| t.offset <= self.cursor && self.cursor <= t.end())
            .map(|(index, t)| (index, self.cursor - t.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::UNLOCK_ALL;
    use crate::parameter::Parameter;
    use crate::validation::{Choice, VALIDATOR_INTEGER, VALIDATOR_USER};

    const VTYPE_COLOR: u32 = VALIDATOR_USER;

    fn resolver() -> Resolver {
        let mut validators = ValidatorRegistry::with_builtins();
        validators
            .add_with_id(VTYPE_COLOR, Some("color"), Choice::new(["red", "white", "blue"]))
            .unwrap();

        let mut resolver = Resolver::new(validators);
        let set = resolver.default_set();
        set.add("exit", None, Some(100), DEFAULT_MASK, false).unwrap();
        set.add("throw ball", None, Some(1), DEFAULT_MASK, false)
            .unwrap()
            .add(Parameter::value(3, 0));
        set.add("throw ball back", None, Some(5), 0x2, false).unwrap();
        set.add("throw balls", Some("many"), Some(2), 0x3, false).unwrap();
        set.add("set ball", Some("set"), Some(9), DEFAULT_MASK, false)
            .unwrap()
            .add(Parameter::key(1, "color", VTYPE_COLOR))
            .add(Parameter::flag(2, "fast"));
        resolver
    }

    fn resolve(resolver: &mut Resolver, line: &str) -> Status {
        resolver.set_line(line);
        resolver.resolve(UNLOCK_ALL).unwrap()
    }

    #[test]
    fn test_empty_line() {
        let mut resolver = resolver();
        assert_eq!(resolve(&mut resolver, "   "), Status::Empty);
        assert!(resolver.command().is_none());
    }

    #[test]
    fn test_longest_match_wins() {
        let mut resolver = resolver();
        assert_eq!(resolve(&mut resolver, "throw ball back"), Status::ValidCommand);
        assert_eq!(resolver.command().and_then(Command::id), Some(5));
    }

    #[test]
    fn test_shorter_command_takes_rest_as_arguments() {
        let mut resolver = resolver();
        assert_eq!(resolve(&mut resolver, "throw ball high"), Status::ValidCommand);
        assert_eq!(resolver.command().and_then(Command::id), Some(1));
        assert_eq!(resolver.positional(0).map(|t| t.value.as_str()), Some("high"));
    }

    #[test]
    fn test_partial_and_no_command() {
        let mut resolver = resolver();
        assert_eq!(resolve(&mut resolver, "thr"), Status::PartialCommand);
        assert_eq!(resolve(&mut resolver, "throw"), Status::PartialCommand);
        assert_eq!(resolve(&mut resolver, "catch"), Status::NoCommand);
        assert_eq!(resolve(&mut resolver, "throw xyz"), Status::NoCommand);
    }

    #[test]
    fn test_validation_outcomes() {
        let mut resolver = resolver();
        assert_eq!(resolve(&mut resolver, "set ball color red"), Status::ValidCommand);
        assert_eq!(resolver.key_value("color"), Some("red"));

        assert_eq!(resolve(&mut resolver, "set ball color bl"), Status::InvalidArgument);
        let value = resolver.find_key("color").unwrap();
        assert!(value.status.contains(TokenStatus::PARTIAL_ARG));

        assert_eq!(resolve(&mut resolver, "set ball color pink"), Status::InvalidArgument);
    }

    #[test]
    fn test_argument_lookup() {
        let mut resolver = resolver();
        resolve(&mut resolver, "set ball fast color blue");

        assert!(resolver.find_flag("fast").is_some());
        assert_eq!(resolver.find_arg(1).map(|t| t.value.as_str()), Some("blue"));
        assert_eq!(resolver.find_arg(2).and_then(|t| t.name.as_deref()), Some("fast"));
        assert!(resolver.find_arg(42).is_none());
        assert!(resolver.find_flag("slow").is_none());
    }

    #[test]
    fn test_mask_hides_commands() {
        let mut resolver = resolver();
        resolver.set_line("throw ball back");
        assert_eq!(resolver.resolve(0x1).unwrap(), Status::ValidCommand);
        assert_eq!(resolver.command().and_then(Command::id), Some(1));
        assert_eq!(resolver.positional(0).map(|t| t.value.as_str()), Some("back"));
        // Changing only the mask invalidates the memoized result.
        assert_eq!(resolver.resolve(0x2).unwrap(), Status::ValidCommand);
        assert_eq!(resolver.command().and_then(Command::id), Some(5));
    }

    #[test]
    fn test_memoized_until_line_changes() {
        let mut resolver = resolver();
        resolve(&mut resolver, "exit");
        let tokens = resolver.tokens().len();
        assert_eq!(resolver.resolve(UNLOCK_ALL).unwrap(), Status::ValidCommand);
        assert_eq!(resolver.tokens().len(), tokens);

        resolver.insert_str(" now");
        assert_eq!(resolver.resolve(UNLOCK_ALL).unwrap(), Status::TooManyArgs);
    }

    #[test]
    fn test_character_classes() {
        let mut resolver = resolver();
        resolve(&mut resolver, " exit x ");
        let categories: Vec<Category> = resolver.characters().iter().map(|c| c.category).collect();

        use Category::*;
        assert_eq!(
            categories,
            vec![
                Normal,
                ValidCommand,
                ValidCommand,
                ValidCommand,
                ValidCommand,
                Normal,
                InvalidArgument,
                Normal,
                Normal
            ]
        );
        let characters = resolver.characters();
        assert_eq!(characters[0].token, Some(0));
        assert_eq!(characters[5].token, Some(1));
        assert_eq!(characters[7].token, None);
        assert_eq!(characters[8].display_length, 0);
    }

    #[test]
    fn test_invalid_command_category() {
        let mut resolver = resolver();
        resolve(&mut resolver, "throw xyz");
        let categories: Vec<Category> = resolver.characters().iter().map(|c| c.category).collect();
        assert_eq!(categories[0], Category::PartialCommand);
        assert_eq!(categories[6], Category::InvalidCommand);
    }

    #[test]
    fn test_duplicate_across_sets_fails_rebuild() {
        let mut resolver = resolver();
        resolver
            .command_set("extra")
            .add("exit", None, Some(7), DEFAULT_MASK, false)
            .unwrap();
        resolver.command_set("extra").activate();

        resolver.set_line("exit");
        assert!(resolver.resolve(UNLOCK_ALL).is_err());

        // The failed rebuild is retried once the conflict is gone.
        resolver.deactivate_all_sets();
        assert_eq!(resolver.resolve(UNLOCK_ALL).unwrap(), Status::ValidCommand);
    }

    #[test]
    fn test_inactive_sets_are_ignored() {
        let mut resolver = resolver();
        resolver
            .command_set("LEVEL2")
            .add("hello", None, Some(501), DEFAULT_MASK, false)
            .unwrap();
        assert_eq!(resolve(&mut resolver, "hello"), Status::NoCommand);

        resolver.command_set("LEVEL2").activate();
        assert_eq!(resolve(&mut resolver, "hello"), Status::ValidCommand);
        assert!(resolver.has_command_set("LEVEL2"));
        assert!(!resolver.has_command_set("LEVEL3"));
    }

    #[test]
    fn test_sorted_commands() {
        let mut resolver = resolver();
        resolver.rebuild().unwrap();
        let words: Vec<&str> = resolver.sorted_commands().map(Command::words).collect();
        assert_eq!(
            words,
            vec!["exit", "set ball", "throw ball", "throw ball back", "throw balls"]
        );
    }

    #[test]
    fn test_current_token() {
        let mut resolver = resolver();
        resolver.set_line_with_cursor("throw ball", 3);
        resolver.resolve(UNLOCK_ALL).unwrap();
        assert_eq!(resolver.current_token(), Some((0, 3)));

        resolver.set_line("throw ");
        resolver.resolve(UNLOCK_ALL).unwrap();
        assert_eq!(resolver.current_token(), None);
    }

    #[test]
    fn test_positional_default_is_validated() {
        let mut resolver = Resolver::new(ValidatorRegistry::with_builtins());
        let set = resolver.default_set();
        set.add("go", None, Some(1), DEFAULT_MASK, false)
            .unwrap()
            .add(Parameter::value(1, VALIDATOR_INTEGER).with_default("abc"));
        set.add("wait", None, Some(2), DEFAULT_MASK, false)
            .unwrap()
            .add(Parameter::value(1, VALIDATOR_INTEGER).with_default("7"));

        assert_eq!(resolve(&mut resolver, "go"), Status::InvalidArgument);
        let value = resolver.positional(0).unwrap();
        assert!(!value.status.contains(TokenStatus::VALIDATED));

        assert_eq!(resolve(&mut resolver, "wait"), Status::ValidCommand);
        let value = resolver.positional(0).unwrap();
        assert!(value.status.contains(TokenStatus::VALIDATED | TokenStatus::DEFAULT_USED));
    }

    #[test]
    fn test_token_table() {
        let mut resolver = resolver();
        assert_eq!(resolve(&mut resolver, "set ball color red fast"), Status::ValidCommand);

        let table = resolver.token_table();
        assert_eq!(table.len(), 5);
        assert!(table[0].starts_with("(set): command"));
        assert!(table[2].starts_with("(color): pair-key"));
        assert!(table[3].starts_with("(red): pair-value"));
        assert!(table[4].starts_with("(fast): flag"));
    }
}
