//! Value validators and their registry.
//!
//! Every KEY and VALUE parameter declares a [`ValidatorId`]. When a line is
//! resolved the resolver looks that id up in a [`ValidatorRegistry`] and asks
//! the validator whether the bound text is acceptable.
//!
//! Ids are split into ranges:
//!
//! | Range          | Owner                                      |
//! |----------------|--------------------------------------------|
//! | `0`            | [`VALIDATOR_NONE`], always valid           |
//! | `1..128`       | validators shipped with this crate         |
//! | `128..1024`    | ids handed out by [`ValidatorRegistry::add`] |
//! | `1024..`       | ids chosen by the application              |

use std::fmt::{Debug, Formatter};

use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};

pub type ValidatorId = u32;

pub const VALIDATOR_NONE: ValidatorId = 0;
/// First id reserved for built-in validators.
pub const VALIDATOR_INTERNAL: ValidatorId = 1;
/// First automatically assigned id.
pub const VALIDATOR_AUTO: ValidatorId = 128;
/// First id an application may pick itself.
pub const VALIDATOR_USER: ValidatorId = 1024;

/// Optionally signed decimal integer.
pub const VALIDATOR_INTEGER: ValidatorId = VALIDATOR_INTERNAL;
/// `true`, `false`, `yes`, `no`, `on` or `off`.
pub const VALIDATOR_BOOLEAN: ValidatorId = VALIDATOR_INTERNAL + 1;

/// Outcome of checking a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Invalid,
    /// The value is a prefix of something acceptable.
    Partial,
    Valid,
}

pub trait Validator {
    fn check(&self, value: &str) -> Validity;
}

impl<F> Validator for F
where
    F: Fn(&str) -> Validity,
{
    fn check(&self, value: &str) -> Validity {
        self(value)
    }
}

/// Accepts one word out of a fixed list; prefixes of a word are partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    choices: Vec<String>,
}

impl Choice {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl Validator for Choice {
    fn check(&self, value: &str) -> Validity {
        if self.choices.iter().any(|choice| choice == value) {
            Validity::Valid
        } else if self.choices.iter().any(|choice| choice.starts_with(value)) {
            Validity::Partial
        } else {
            Validity::Invalid
        }
    }
}

fn check_integer(value: &str) -> Validity {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    if digits.is_empty() {
        return Validity::Partial;
    }
    if digits.chars().all(|c| c.is_ascii_digit()) {
        Validity::Valid
    } else {
        Validity::Invalid
    }
}

fn check_boolean(value: &str) -> Validity {
    Choice::new(["true", "false", "yes", "no", "on", "off"]).check(&value.to_lowercase())
}

struct Entry {
    name: Option<String>,
    validator: Box<dyn Validator>,
}

/// Lookup table from [`ValidatorId`] to validator.
pub struct ValidatorRegistry {
    entries: IndexMap<ValidatorId, Entry>,
    next_auto: ValidatorId,
}

impl Debug for ValidatorRegistry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_map()
            .entries(self.entries.iter().map(|(id, entry)| (id, &entry.name)))
            .finish()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            next_auto: VALIDATOR_AUTO,
        }
    }

    /// Creates a registry holding the built-in `integer` and `boolean`
    /// validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(VALIDATOR_INTEGER, Some("integer".to_string()), Box::new(check_integer));
        registry.insert(VALIDATOR_BOOLEAN, Some("boolean".to_string()), Box::new(check_boolean));
        registry
    }

    fn insert(&mut self, id: ValidatorId, name: Option<String>, validator: Box<dyn Validator>) {
        debug!("Registering validator {} ({:?})", id, name);
        self.entries.insert(id, Entry { name, validator });
    }

    fn ensure_unique_name(&self, name: &Option<String>) -> Result<()> {
        if let Some(name) = name {
            if self.id_by_name(name).is_some() {
                return Err(Error::duplicate_validator("name", name.clone()));
            }
        }
        Ok(())
    }

    /// Registers a validator under the next free automatic id.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is already taken or the automatic range is
    /// used up.
    pub fn add<V>(&mut self, name: Option<&str>, validator: V) -> Result<ValidatorId>
    where
        V: Validator + 'static,
    {
        let name = name.map(str::to_string);
        self.ensure_unique_name(&name)?;

        while self.entries.contains_key(&self.next_auto) {
            self.next_auto += 1;
        }
        if self.next_auto >= VALIDATOR_USER {
            return Err(Error::ValidatorIdsExhausted);
        }

        let id = self.next_auto;
        self.next_auto += 1;
        self.insert(id, name, Box::new(validator));
        Ok(id)
    }

    /// Registers a validator under an application chosen id.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is below [`VALIDATOR_USER`], or if either the
    /// id or the name is already registered.
    pub fn add_with_id<V>(&mut self, id: ValidatorId, name: Option<&str>, validator: V) -> Result<()>
    where
        V: Validator + 'static,
    {
        if id < VALIDATOR_USER {
            return Err(Error::validator_out_of_range(id, "user"));
        }
        if self.entries.contains_key(&id) {
            return Err(Error::duplicate_validator("id", id.to_string()));
        }
        let name = name.map(str::to_string);
        self.ensure_unique_name(&name)?;

        self.insert(id, name, Box::new(validator));
        Ok(())
    }

    pub fn id_by_name(&self, name: &str) -> Option<ValidatorId> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
    }

    pub fn get(&self, id: ValidatorId) -> Option<&dyn Validator> {
        self.entries.get(&id).map(|entry| entry.validator.as_ref())
    }

    pub fn contains(&self, id: ValidatorId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Checks `value` with the validator registered under `id`. Unknown ids,
    /// including [`VALIDATOR_NONE`], accept everything.
    pub fn check(&self, id: ValidatorId, value: &str) -> Validity {
        match self.get(id) {
            Some(validator) => validator.check(value),
            None => Validity::Valid,
        }
    }
}
