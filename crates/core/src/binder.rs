//! Assignment of argument tokens to declared parameters.
//!
//! Binding runs in a fixed order over the tokens that follow the matched
//! command words:
//!
//! 1. flags, by exact name
//! 2. keys, by exact name, each taking the token after it as its value
//! 3. a check that every mandatory key was given
//! 4. positional values, in line order against declaration order
//! 5. leftovers, which are marked invalid
//! 6. defaults, appended as synthetic tokens for omitted optional parameters
//!
//! Because flags are bound first, a word naming both a flag and a key of the
//! same command binds to the flag. A token that is only a prefix of a flag or
//! key name is never bound; it is marked [`TokenStatus::PARTIAL_ARG`] so it
//! can be highlighted while the user is still typing.

use log::debug;

use crate::command::Command;
use crate::parameter::{Parameter, ParameterKind};
use crate::resolver::Status;
use crate::token::{Token, TokenKind, TokenStatus};

/// Bits a token inherits from the parameter it is bound to.
fn inherited_status(parameter: &Parameter) -> TokenStatus {
    let mut status = TokenStatus::empty();
    status.set(TokenStatus::MANDATORY, parameter.is_mandatory());
    status.set(TokenStatus::HIDDEN, parameter.is_hidden());
    status.set(TokenStatus::DEFAULT_SET, parameter.default().is_some());
    status
}

fn bindable_by_name(token: &Token) -> bool {
    !token.status.intersects(TokenStatus::IS_QUOTED | TokenStatus::SORTED)
}

/// Binds `tokens[first_argument..]` to the parameters of `command`.
///
/// Tokens are annotated in place and default tokens are appended to
/// `tokens` when binding succeeds.
///
/// # Returns
///
/// [`Status::ValidCommand`] on success, otherwise the first problem found:
/// [`Status::MissingValue`], [`Status::TooFewArgs`] or
/// [`Status::TooManyArgs`].
pub fn bind(command: &Command, tokens: &mut Vec<Token>, first_argument: usize) -> Status {
    let parameters = command.parameters();
    let mut bound = vec![false; parameters.len()];
    let first_argument = first_argument.min(tokens.len());
    let available = tokens.len() - first_argument;
    let mut assigned = 0;

    // Flags.
    for token in &mut tokens[first_argument..] {
        if !bindable_by_name(token) {
            continue;
        }
        for (index, parameter) in parameters.iter().enumerate() {
            let ParameterKind::Flag { name } = parameter.kind() else {
                continue;
            };
            if bound[index] {
                continue;
            }
            if *name == token.value {
                token.status |=
                    TokenStatus::SORTED | TokenStatus::IN_STRING | inherited_status(parameter);
                token.kind = TokenKind::Flag;
                token.name = Some(name.clone());
                token.id = Some(parameter.id());
                token.value.clear();
                bound[index] = true;
                assigned += 1;
                break;
            } else if name.starts_with(token.value.as_str()) {
                token.status |= TokenStatus::PARTIAL_ARG;
            }
        }
    }

    // Keys and their values.
    let mut position = first_argument;
    while position < tokens.len() {
        if bindable_by_name(&tokens[position]) {
            for (index, parameter) in parameters.iter().enumerate() {
                let ParameterKind::Key { name, value_type } = parameter.kind() else {
                    continue;
                };
                if bound[index] {
                    continue;
                }

                let token = &mut tokens[position];
                if *name == token.value {
                    token.status.remove(TokenStatus::PARTIAL_ARG);
                    token.status |=
                        TokenStatus::SORTED | TokenStatus::IN_STRING | inherited_status(parameter);
                    token.kind = TokenKind::Key;
                    token.name = Some(name.clone());
                    token.id = Some(parameter.id());
                    token.value.clear();

                    let follower = position + 1;
                    if follower >= tokens.len() || tokens[follower].is_sorted() {
                        debug!("Key `{}` has no value", name);
                        return Status::MissingValue;
                    }

                    let value = &mut tokens[follower];
                    value.status |= TokenStatus::SORTED
                        | TokenStatus::IN_STRING
                        | TokenStatus::IS_VALUE
                        | inherited_status(parameter);
                    value.kind = TokenKind::Key;
                    value.name = Some(name.clone());
                    value.id = Some(parameter.id());
                    value.value_type = *value_type;
                    bound[index] = true;
                    assigned += 2;
                    position = follower;
                    break;
                } else if name.starts_with(token.value.as_str()) {
                    token.status |= TokenStatus::PARTIAL_ARG;
                }
            }
        }
        position += 1;
    }

    // Mandatory keys.
    let mut mandatory_values = 0;
    for (index, parameter) in parameters.iter().enumerate() {
        match parameter.kind() {
            ParameterKind::Key { name, .. } if parameter.is_mandatory() && !bound[index] => {
                debug!("Mandatory key `{}` is missing", name);
                return Status::TooFewArgs;
            }
            ParameterKind::Value { .. } if parameter.is_mandatory() => mandatory_values += 1,
            _ => {}
        }
    }

    // Positional values.
    let mut remaining = available - assigned;
    let mut next_parameter = 0;
    for token in &mut tokens[first_argument..] {
        if remaining == 0 {
            break;
        }
        if token.is_sorted() {
            continue;
        }

        let Some(index) = (next_parameter..parameters.len()).find(|&index| {
            !bound[index] && matches!(parameters[index].kind(), ParameterKind::Value { .. })
        }) else {
            break;
        };
        let parameter = &parameters[index];

        token.status |= TokenStatus::SORTED
            | TokenStatus::IN_STRING
            | TokenStatus::IS_VALUE
            | inherited_status(parameter);
        token.kind = TokenKind::Value;
        token.value_type = parameter.value_type();
        token.id = Some(parameter.id());
        bound[index] = true;
        next_parameter = index + 1;
        remaining -= 1;
        if parameter.is_mandatory() {
            mandatory_values -= 1;
        }
    }

    // Leftovers.
    for token in tokens[first_argument..].iter_mut().filter(|t| !t.is_sorted()) {
        token.status |= TokenStatus::SORTED | TokenStatus::IN_STRING;
        if !token.status.contains(TokenStatus::PARTIAL_ARG) {
            token.status |= TokenStatus::INVALID;
        }
        token.kind = TokenKind::Unknown;
    }

    if remaining > 0 {
        debug!("{} argument(s) too many", remaining);
        return Status::TooManyArgs;
    }
    if mandatory_values > 0 {
        debug!("{} mandatory argument(s) missing", mandatory_values);
        return Status::TooFewArgs;
    }

    append_defaults(command, &bound, tokens);
    Status::ValidCommand
}

fn append_defaults(command: &Command, bound: &[bool], tokens: &mut Vec<Token>) {
    for (parameter, _) in command
        .parameters()
        .iter()
        .zip(bound)
        .filter(|(_, bound)| !**bound)
    {
        let Some(default) = parameter.default() else {
            continue;
        };
        let inherited = inherited_status(parameter);

        match parameter.kind() {
            ParameterKind::Flag { .. } => {}
            ParameterKind::Value { value_type } => {
                let mut token = Token::synthetic(
                    default.to_string(),
                    TokenKind::Value,
                    TokenStatus::SORTED
                        | TokenStatus::IS_VALUE
                        | TokenStatus::DEFAULT_USED
                        | inherited,
                );
                token.id = Some(parameter.id());
                token.value_type = *value_type;
                tokens.push(token);
            }
            ParameterKind::Key { name, value_type } => {
                let mut key =
                    Token::synthetic(String::new(), TokenKind::Key, TokenStatus::SORTED | inherited);
                key.id = Some(parameter.id());
                key.name = Some(name.clone());
                key.value_type = *value_type;

                let mut value = Token::synthetic(
                    default.to_string(),
                    TokenKind::Key,
                    TokenStatus::SORTED
                        | TokenStatus::IS_VALUE
                        | TokenStatus::DEFAULT_USED
                        | inherited,
                );
                value.id = Some(parameter.id());
                value.name = Some(name.clone());
                value.value_type = *value_type;

                tokens.push(key);
                tokens.push(value);
            }
        }
    }
}
