use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Command `{}` is already registered on this dictionary path.", .0)]
    DuplicateCommand(String),

    #[error("Command `{}` needs a name or an ID.", .0)]
    MissingIdentity(String),

    #[error("A command needs at least one word.")]
    EmptyCommand,

    #[error("Invalid command word in `{}`: words may not be quoted or empty", .0)]
    InvalidCommandWord(String),

    #[error("Could not grow the command dictionary: {}", .0)]
    DictionaryAllocation(#[from] std::collections::TryReserveError),

    #[error("Validator ID {} is outside the range allowed for {} validators.", .id, .range)]
    ValidatorIdOutOfRange { id: u32, range: &'static str },

    #[error("A validator with {} `{}` is already registered.", .field, .value)]
    DuplicateValidator { field: &'static str, value: String },

    #[error("No automatic validator IDs are left.")]
    ValidatorIdsExhausted,

    #[error("Unknown validator type `{}` used by command `{}`.", .1, .0)]
    UnknownValidator(String, String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("No commands were found in the command definition YAML. Is `{}` empty?", .path)]
    EmptyCommandDefinition { path: String },

    #[error("Found a non-unique command ID in set `{}`: `{}`", .0, .1)]
    NonUniqueCommandId(String, u32),

    #[error("Parameter on command `{}` must declare exactly one of `flag`, `key` or `value`.", .0)]
    InvalidParameterShape(String),

    #[error("For a color, only one of `rgb`, `ansi` or `name` should be defined.")]
    MultipleColorTypes,

    #[error("Unknown color name: \"{}\"", _0)]
    UnknownColorName(String),

    #[error("Unknown theme category: \"{}\"", _0)]
    UnknownCategory(String),

    #[error("Terminal error: {}", .0)]
    Terminal(#[from] std::io::Error),
}

impl Error {
    pub fn empty_command_definition(path: String) -> Self {
        Self::EmptyCommandDefinition { path }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn validator_out_of_range(id: u32, range: &'static str) -> Self {
        Self::ValidatorIdOutOfRange { id, range }
    }

    pub fn duplicate_validator(field: &'static str, value: String) -> Self {
        Self::DuplicateValidator { field, value }
    }
}
