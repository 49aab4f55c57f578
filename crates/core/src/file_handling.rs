//! Loading and validation of command definition files.

use std::collections::HashSet;
use std::fs::File;

use log::debug;

use crate::definitions::{Definitions, SetDefinition};
use crate::error::{Error, Result};
use crate::resolver::Category;

/// Validator names that exist in every registry built with builtins.
const BUILTIN_VALIDATORS: [&str; 2] = ["integer", "boolean"];

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

fn validate_set(set: &SetDefinition, known_types: &HashSet<&str>) -> Result<()> {
    let mut ids = HashSet::new();
    for command in &set.commands {
        if let Some(id) = command.id {
            if !ids.insert(id) {
                return Err(Error::NonUniqueCommandId(set.name.clone(), id));
            }
        }

        for parameter in command.parameters.iter().flatten() {
            if parameter.shape_count() != 1 {
                return Err(Error::InvalidParameterShape(command.words.clone()));
            }
            if let Some(value_type) = &parameter.value_type {
                if !known_types.contains(value_type.as_str()) {
                    return Err(Error::UnknownValidator(
                        command.words.clone(),
                        value_type.clone(),
                    ));
                }
            }
        }
    }

    Ok(())
}

fn validate_definitions(definitions: &Definitions) -> Result<()> {
    let mut known_types: HashSet<&str> = BUILTIN_VALIDATORS.into_iter().collect();
    known_types.extend(
        definitions
            .validators
            .iter()
            .flatten()
            .map(|validator| validator.name.as_str()),
    );

    for set in &definitions.sets {
        validate_set(set, &known_types)?;
    }

    for name in definitions.theme.iter().flat_map(|theme| theme.keys()) {
        if Category::from_name(name).is_none() {
            return Err(Error::UnknownCategory(name.clone()));
        }
    }

    Ok(())
}

/// Loads and validates command definitions from a configuration file.
///
/// # Arguments
///
/// * `config_path` - Path to the YAML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be read
/// - The YAML is malformed or doesn't match the expected structure
/// - The file defines no commands
/// - Command IDs repeat within a set
/// - A parameter declares more or less than one of `flag`, `key`, `value`
/// - A parameter type names no builtin or declared validator
/// - A theme entry names an unknown category
///
/// # Examples
///
/// ```no_run
/// use cmdtree_core::file_handling::load_definitions;
///
/// let definitions = load_definitions("/etc/cmdtree/commands.yml")?;
/// println!("Loaded {} commands", definitions.command_count());
/// # Ok::<(), cmdtree_core::error::Error>(())
/// ```
pub fn load_definitions(config_path: &str) -> Result<Definitions> {
    let config_reader = get_reader("config", config_path)?;

    let definitions: Definitions = serde_yaml::from_reader(config_reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            config_path.to_string(),
            e,
        )
    })?;

    if definitions.command_count() == 0 {
        return Err(Error::empty_command_definition(config_path.to_string()));
    }

    validate_definitions(&definitions)?;
    debug!(
        "Loaded {} command(s) in {} set(s) from {}",
        definitions.command_count(),
        definitions.sets.len(),
        config_path
    );

    Ok(definitions)
}
