//! Declared parameters of a command.
//!
//! A command accepts three kinds of arguments:
//!
//! - **Flags**: a bare word such as `hard`, always optional
//! - **Keys**: a name followed by a value, e.g. `angle 45` or `angle=45`
//! - **Values**: positional arguments, matched in declaration order
//!
//! Keys and values are mandatory until they are given a default or marked
//! optional.

use std::fmt::{Display, Formatter};

use crate::token::{Id, TokenKind};
use crate::validation::{ValidatorId, VALIDATOR_NONE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    Flag { name: String },
    Key { name: String, value_type: ValidatorId },
    Value { value_type: ValidatorId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    kind: ParameterKind,
    id: Id,
    help: Option<String>,
    default: Option<String>,
    mandatory: bool,
    hidden: bool,
}

impl Parameter {
    fn new(kind: ParameterKind, id: Id, mandatory: bool) -> Self {
        Self {
            kind,
            id,
            help: None,
            default: None,
            mandatory,
            hidden: false,
        }
    }

    pub fn flag(id: Id, name: &str) -> Self {
        Self::new(
            ParameterKind::Flag {
                name: name.to_string(),
            },
            id,
            false,
        )
    }

    pub fn key(id: Id, name: &str, value_type: ValidatorId) -> Self {
        Self::new(
            ParameterKind::Key {
                name: name.to_string(),
                value_type,
            },
            id,
            true,
        )
    }

    pub fn value(id: Id, value_type: ValidatorId) -> Self {
        Self::new(ParameterKind::Value { value_type }, id, true)
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Sets the value used when the argument is omitted. This also makes the
    /// parameter optional. Defaults on flags are ignored while binding.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self.mandatory = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    /// Hides the parameter from help listings.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn token_kind(&self) -> TokenKind {
        match self.kind {
            ParameterKind::Flag { .. } => TokenKind::Flag,
            ParameterKind::Key { .. } => TokenKind::Key,
            ParameterKind::Value { .. } => TokenKind::Value,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of a flag or key; positional values have none.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ParameterKind::Flag { name } | ParameterKind::Key { name, .. } => Some(name),
            ParameterKind::Value { .. } => None,
        }
    }

    pub fn value_type(&self) -> ValidatorId {
        match self.kind {
            ParameterKind::Key { value_type, .. } | ParameterKind::Value { value_type } => {
                value_type
            }
            ParameterKind::Flag { .. } => VALIDATOR_NONE,
        }
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Display for Parameter {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let (open, close) = if self.mandatory { ('<', '>') } else { ('[', ']') };
        match &self.kind {
            ParameterKind::Flag { name } => write!(formatter, "[{}]", name),
            ParameterKind::Key { name, .. } => write!(formatter, "{}{}{} = <arg>", open, name, close),
            ParameterKind::Value { .. } => write!(formatter, "{}arg{}", open, close),
        }
    }
}
