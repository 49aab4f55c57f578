use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::dictionary::{Mask, DEFAULT_MASK};
use crate::error::{Error, Result};
use crate::parameter::Parameter;
use crate::resolver::{Category, Resolver};
use crate::token::Id;
use crate::validation::{Choice, ValidatorId, ValidatorRegistry, VALIDATOR_NONE};

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColorDefinition {
    pub rgb: Option<(u8, u8, u8)>,
    pub ansi: Option<u8>,
    pub name: Option<String>,
}

/// A choice validator declared in the configuration file.
#[derive(Deserialize, Debug, Clone)]
pub struct ValidatorDefinition {
    pub name: String,
    pub choices: Vec<String>,
}

/// A parameter declaration. Exactly one of `flag`, `key` or `value` must be
/// set; `value` holds a label for the positional argument.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ParameterDefinition {
    pub flag: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub id: Option<Id>,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub default: Option<String>,
    pub optional: Option<bool>,
    pub hidden: Option<bool>,
    pub help: Option<String>,
}

impl ParameterDefinition {
    /// Number of `flag`, `key` and `value` fields that are set.
    pub(crate) fn shape_count(&self) -> usize {
        [&self.flag, &self.key, &self.value]
            .iter()
            .filter(|field| field.is_some())
            .count()
    }

    fn resolve_type(&self, command: &str, validators: &ValidatorRegistry) -> Result<ValidatorId> {
        match &self.value_type {
            None => Ok(VALIDATOR_NONE),
            Some(name) => validators
                .id_by_name(name)
                .ok_or_else(|| Error::UnknownValidator(command.to_string(), name.clone())),
        }
    }

    /// Builds the parameter. Without an explicit `id` the position in the
    /// command, counting from one, is used.
    pub fn to_parameter(
        &self,
        position: usize,
        command: &str,
        validators: &ValidatorRegistry,
    ) -> Result<Parameter> {
        let id = self.id.unwrap_or(position as Id + 1);
        let value_type = self.resolve_type(command, validators)?;

        let mut parameter = match (&self.flag, &self.key, &self.value) {
            (Some(name), None, None) => Parameter::flag(id, name),
            (None, Some(name), None) => Parameter::key(id, name, value_type),
            (None, None, Some(_)) => Parameter::value(id, value_type),
            _ => return Err(Error::InvalidParameterShape(command.to_string())),
        };

        let help = self.help.as_deref().or(self.value.as_deref());
        if let Some(help) = help {
            parameter = parameter.with_help(help);
        }
        if let Some(default) = &self.default {
            parameter = parameter.with_default(default);
        }
        if self.optional.unwrap_or(false) {
            parameter = parameter.optional();
        }
        if self.hidden.unwrap_or(false) {
            parameter = parameter.hidden();
        }
        Ok(parameter)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommandDefinition {
    pub words: String,
    pub id: Option<Id>,
    pub name: Option<String>,
    pub mask: Option<Mask>,
    pub hidden: Option<bool>,
    pub help: Option<String>,
    pub parameters: Option<Vec<ParameterDefinition>>,
}

impl Display for CommandDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.name, &self.help) {
            (Some(name), Some(help)) => write!(formatter, "{} ({})", name, help),
            (Some(name), None) => formatter.write_str(name),
            (None, Some(help)) => write!(formatter, "{} ({})", self.words, help),
            (None, None) => formatter.write_str(&self.words),
        }
    }
}

/// A command set. The set without a name is the default set.
#[derive(Deserialize, Debug, Clone)]
pub struct SetDefinition {
    #[serde(default)]
    pub name: String,
    /// Sets are active unless stated otherwise.
    pub active: Option<bool>,
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Definitions {
    pub sets: Vec<SetDefinition>,
    pub validators: Option<Vec<ValidatorDefinition>>,
    /// Colors by category name, e.g. `valid_command`.
    pub theme: Option<IndexMap<String, ColorDefinition>>,
}

impl Definitions {
    /// Total number of commands over all sets.
    pub fn command_count(&self) -> usize {
        self.sets.iter().map(|set| set.commands.len()).sum()
    }

    /// Theme entries with a known category.
    pub fn theme(&self) -> impl Iterator<Item = (Category, &ColorDefinition)> {
        self.theme
            .iter()
            .flatten()
            .filter_map(|(name, color)| Category::from_name(name).map(|category| (category, color)))
    }

    /// Registers validators, sets and commands with `resolver`.
    ///
    /// Validators are registered first so commands can refer to them by
    /// name. Named sets are activated unless `active: false` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if a validator name is taken, a parameter refers to
    /// an unknown validator or has an invalid shape, or a command cannot be
    /// registered.
    pub fn register(&self, resolver: &mut Resolver) -> Result<()> {
        for validator in self.validators.iter().flatten() {
            let id = resolver
                .validators_mut()
                .add(Some(&validator.name), Choice::new(validator.choices.iter()))?;
            debug!("Validator `{}` registered as {}", validator.name, id);
        }

        for set_definition in &self.sets {
            for command_definition in &set_definition.commands {
                let parameters = command_definition
                    .parameters
                    .iter()
                    .flatten()
                    .enumerate()
                    .map(|(position, parameter)| {
                        parameter.to_parameter(
                            position,
                            &command_definition.words,
                            resolver.validators(),
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;

                let command = resolver.command_set(&set_definition.name).add(
                    &command_definition.words,
                    command_definition.name.as_deref(),
                    command_definition.id,
                    command_definition.mask.unwrap_or(DEFAULT_MASK),
                    command_definition.hidden.unwrap_or(false),
                )?;
                if let Some(help) = &command_definition.help {
                    command.set_help(help);
                }
                for parameter in parameters {
                    command.add(parameter);
                }
            }

            let set = resolver.command_set(&set_definition.name);
            if set_definition.active.unwrap_or(true) {
                set.activate();
            } else if !set_definition.name.is_empty() {
                set.deactivate();
            }
        }

        Ok(())
    }
}
