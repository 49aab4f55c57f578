//! Describing a resolved line to the user.

use cmdtree_core::dictionary::Mask;
use cmdtree_core::resolver::{Resolver, Status};
use cmdtree_core::token::{Token, TokenKind, TokenStatus};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use itertools::Itertools;

fn describe_argument(token: &Token, key_name: Option<&str>) -> String {
    let default = if token.status.contains(TokenStatus::DEFAULT_USED) {
        " (default)"
    } else {
        ""
    };
    match (key_name, token.id) {
        (Some(name), _) => format!("{} = {}{}", name, token.value, default),
        (None, Some(id)) => format!("#{} = {}{}", id, token.value, default),
        (None, None) => format!("{}{}", token.value, default),
    }
}

/// One line per bound argument: flags by name, keys as `name = value` and
/// positional values as `#id = value`.
pub fn bound_arguments(resolver: &Resolver) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending_key: Option<&str> = None;
    for token in resolver.arguments() {
        match token.kind {
            TokenKind::Flag => lines.push(token.name.clone().unwrap_or_default()),
            TokenKind::Key if !token.status.contains(TokenStatus::IS_VALUE) => {
                pending_key = token.name.as_deref();
            }
            TokenKind::Key => {
                lines.push(describe_argument(token, pending_key.take()));
            }
            TokenKind::Value => lines.push(describe_argument(token, None)),
            _ => {}
        }
    }
    lines
}

/// The outcome of the last resolution: the command and its arguments for a
/// valid command, the status otherwise.
///
/// # Examples
///
/// ```
/// use cmdtree_cli::shell::report::outcome;
/// use cmdtree_core::dictionary::{DEFAULT_MASK, UNLOCK_ALL};
/// use cmdtree_core::resolver::Resolver;
/// use cmdtree_core::validation::ValidatorRegistry;
///
/// let mut resolver = Resolver::new(ValidatorRegistry::new());
/// resolver.default_set().add("exit", None, Some(1), DEFAULT_MASK, false).unwrap();
/// resolver.set_line("exit");
/// resolver.resolve(UNLOCK_ALL).unwrap();
///
/// assert_eq!(outcome(&resolver), "exit (#1)");
/// ```
pub fn outcome(resolver: &Resolver) -> String {
    let status = resolver.status();
    match resolver.command() {
        Some(command) if status == Status::ValidCommand => {
            let arguments = bound_arguments(resolver);
            if arguments.is_empty() {
                command.to_string()
            } else {
                format!(
                    "{}\n{}",
                    command,
                    arguments.iter().map(|line| format!("  {}", line)).join("\n")
                )
            }
        }
        Some(command) => format!("{}: {}", command.words(), status),
        None => status.to_string(),
    }
}

/// The visible command closest to the typed line, for lines that matched
/// nothing.
pub fn suggestion(resolver: &Resolver, mask: Mask) -> Option<String> {
    let typed = resolver
        .tokens()
        .iter()
        .filter(|t| t.in_string())
        .map(|t| t.value.as_str())
        .join(" ");
    if typed.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    resolver
        .sorted_commands()
        .filter(|command| command.mask() & mask != 0 && !command.hidden())
        .filter_map(|command| {
            matcher
                .fuzzy_match(command.words(), &typed)
                .map(|score| (score, command.words()))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, words)| words.to_string())
}

/// Everything printed after a line is submitted.
pub fn report(resolver: &Resolver, mask: Mask) -> String {
    let mut text = outcome(resolver);
    if resolver.status() == Status::NoCommand {
        if let Some(words) = suggestion(resolver, mask) {
            text.push_str(&format!("\ndid you mean `{}`?", words));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::dictionary::{DEFAULT_MASK, UNLOCK_ALL};
    use cmdtree_core::parameter::Parameter;
    use cmdtree_core::validation::{ValidatorRegistry, VALIDATOR_INTEGER};

    fn resolver() -> Resolver {
        let mut resolver = Resolver::new(ValidatorRegistry::with_builtins());
        resolver
            .default_set()
            .add("show statistics", Some("stats"), None, DEFAULT_MASK, false)
            .unwrap();
        resolver
            .default_set()
            .add("throw ball", None, Some(10), DEFAULT_MASK, false)
            .unwrap()
            .add(Parameter::flag(1, "hard"))
            .add(Parameter::key(2, "angle", VALIDATOR_INTEGER).with_default("45"))
            .add(Parameter::value(3, VALIDATOR_INTEGER));
        resolver
            .default_set()
            .add("debug dump", None, Some(99), DEFAULT_MASK, true)
            .unwrap();
        resolver
    }

    fn resolved(line: &str) -> Resolver {
        let mut resolver = resolver();
        resolver.set_line(line);
        resolver.resolve(UNLOCK_ALL).unwrap();
        resolver
    }

    #[test]
    fn test_outcome_lists_arguments() {
        let resolver = resolved("throw ball 3 hard");
        assert_eq!(
            outcome(&resolver),
            "throw ball (#10)\n  #3 = 3\n  hard\n  angle = 45 (default)"
        );
    }

    #[test]
    fn test_outcome_of_failures() {
        assert_eq!(outcome(&resolved("throw ball")), format!("throw ball: {}", Status::TooFewArgs));
        assert_eq!(outcome(&resolved("")), Status::Empty.to_string());
    }

    #[test]
    fn test_suggestion_for_unknown_line() {
        let resolver = resolved("shw stat");
        assert_eq!(resolver.status(), Status::NoCommand);
        assert_eq!(suggestion(&resolver, UNLOCK_ALL), Some("show statistics".to_string()));
        assert!(report(&resolver, UNLOCK_ALL).ends_with("did you mean `show statistics`?"));
    }

    #[test]
    fn test_suggestion_skips_hidden_commands() {
        let resolver = resolved("dbg dmp");
        assert_eq!(suggestion(&resolver, UNLOCK_ALL), None);
    }
}
