//! Auto-completion of command words.
//!
//! Completion only applies when the cursor sits at the end of the line and
//! is not inside a quoted token. The command words typed so far are walked
//! through the dictionary, and every path below that point ending on a
//! visible command or word boundary becomes a candidate.

use log::debug;

use crate::cursor::CommandCursor;
use crate::dictionary::Mask;
use crate::error::Result;
use crate::resolver::Resolver;

/// Result of [`Resolver::complete`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Text appended to the line.
    pub inserted: String,
    /// Alternatives left for the user to choose from. Only filled when they
    /// share no common prefix; the line is then untouched.
    pub candidates: Vec<String>,
    /// Line text the candidates continue.
    pub stem: String,
}

impl Completion {
    /// Whether the completion neither changed the line nor offered
    /// alternatives.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.candidates.is_empty()
    }
}

struct Options {
    candidates: Vec<String>,
    /// The last candidate completes a command.
    is_command: bool,
    /// The typed text ends exactly on a complete word.
    at_boundary: bool,
    stem: String,
}

/// Longest common prefix of `words`, on character boundaries.
fn common_prefix(words: &[String]) -> &str {
    let Some((first, rest)) = words.split_first() else {
        return "";
    };
    let mut length = first.len();
    for word in rest {
        length = first
            .char_indices()
            .zip(word.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(length);
    }
    &first[..length]
}

impl Resolver {
    fn options(&self, mask: Mask) -> Option<Options> {
        if self.cursor < self.line.len() {
            return None;
        }

        let current = self.current_token();
        if let Some((index, offset)) = current {
            let token = &self.tokens[index];
            if offset < token.length || token.is_quoted() {
                return None;
            }
        }

        let mut stem = String::new();
        let mut cursor = CommandCursor::new(&self.dictionary);
        for (index, token) in self.tokens.iter().enumerate() {
            if !token.in_string() {
                break;
            }
            if token.is_quoted() {
                return None;
            }
            stem.push_str(&token.value);
            if current.is_some_and(|(current, _)| current == index) {
                if !cursor.find(&token.value, mask, false) {
                    return None;
                }
                break;
            }
            stem.push(' ');
            if !cursor.find(&token.value, mask, false) || !cursor.next_root() {
                return None;
            }
        }

        let mut candidates = Vec::new();
        let mut is_command = false;
        let mut walk = cursor.branch();
        while walk.next() {
            if !walk.word().is_empty()
                && walk.end()
                && (walk.command(mask, false) || walk.subword(mask, false))
            {
                candidates.push(walk.word().to_string());
                is_command = walk.command(mask, false);
            }
        }
        if !candidates.is_empty()
            && cursor.end()
            && (cursor.command(mask, false) || cursor.subword(mask, false))
        {
            candidates.push(String::new());
        }

        Some(Options {
            candidates,
            is_command,
            at_boundary: !cursor.word().is_empty() && cursor.end(),
            stem,
        })
    }

    /// Continuations of the line offered by completion, without modifying
    /// the line. An empty string stands for "the line is complete as is".
    ///
    /// # Errors
    ///
    /// Fails only if the dictionary must be rebuilt and the rebuild fails.
    pub fn candidates(&mut self, mask: Mask) -> Result<Vec<String>> {
        self.resolve(mask)?;
        Ok(self
            .options(mask)
            .map(|options| options.candidates)
            .unwrap_or_default())
    }

    /// Completes the line as far as it is unambiguous.
    ///
    /// A single candidate is inserted and completion continues from the new
    /// line until a command is complete. Several candidates insert their
    /// common prefix, or are returned when there is none. A complete word
    /// with no continuation gets a trailing space.
    ///
    /// # Errors
    ///
    /// Fails only if the dictionary must be rebuilt and the rebuild fails.
    pub fn complete(&mut self, mask: Mask) -> Result<Completion> {
        let mut completion = Completion::default();

        loop {
            self.resolve(mask)?;
            let Some(options) = self.options(mask) else {
                break;
            };
            completion.stem = options.stem;

            match options.candidates.as_slice() {
                [] if options.at_boundary => {
                    debug!("Completion: word boundary");
                    self.insert_str(" ");
                    completion.inserted.push(' ');
                }
                [] => break,
                [only] => {
                    debug!("Completion: single candidate `{}`", only);
                    self.insert_str(only);
                    completion.inserted.push_str(only);
                    if options.is_command {
                        self.resolve(mask)?;
                        break;
                    }
                }
                several => {
                    let prefix = common_prefix(several);
                    if prefix.is_empty() {
                        debug!("Completion: {} candidates", several.len());
                        completion.candidates = options.candidates;
                    } else {
                        self.insert_str(prefix);
                        completion.inserted.push_str(prefix);
                        self.resolve(mask)?;
                    }
                    break;
                }
            }
        }

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{DEFAULT_MASK, UNLOCK_ALL};
    use crate::resolver::Status;
    use crate::validation::ValidatorRegistry;

    fn resolver() -> Resolver {
        let mut resolver = Resolver::new(ValidatorRegistry::new());
        let set = resolver.default_set();
        set.add("exit", None, Some(100), DEFAULT_MASK, false).unwrap();
        set.add("throw ball", None, Some(1), DEFAULT_MASK, false).unwrap();
        set.add("throw balls", Some("many"), Some(2), DEFAULT_MASK, false)
            .unwrap();
        set.add("show statistics", None, Some(10), DEFAULT_MASK, false)
            .unwrap();
        set.add("unlock special", None, Some(200), DEFAULT_MASK, true)
            .unwrap();
        resolver
    }

    #[test]
    fn test_common_prefix() {
        let words = |w: &[&str]| w.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(common_prefix(&words(&["all", "alls"])), "all");
        assert_eq!(common_prefix(&words(&["s", ""])), "");
        assert_eq!(common_prefix(&words(&["héllo", "hélp"])), "hél");
        assert_eq!(common_prefix(&[]), "");
    }

    #[test]
    fn test_common_prefix_inserted() {
        let mut resolver = resolver();
        resolver.set_line("throw b");
        assert_eq!(resolver.candidates(UNLOCK_ALL).unwrap(), vec!["all", "alls"]);

        let completion = resolver.complete(UNLOCK_ALL).unwrap();
        assert_eq!(completion.inserted, "all");
        assert!(completion.candidates.is_empty());
        assert_eq!(resolver.line(), "throw ball");
    }

    #[test]
    fn test_candidates_listed_without_prefix() {
        let mut resolver = resolver();
        resolver.set_line("throw ball");
        let completion = resolver.complete(UNLOCK_ALL).unwrap();
        assert_eq!(completion.candidates, vec!["s".to_string(), String::new()]);
        assert_eq!(completion.stem, "throw ball");
        assert_eq!(resolver.line(), "throw ball");
    }

    #[test]
    fn test_unambiguous_branch_expands() {
        let mut resolver = resolver();
        resolver.set_line("sh");
        let completion = resolver.complete(UNLOCK_ALL).unwrap();
        assert_eq!(completion.inserted, "ow statistics");
        assert_eq!(resolver.line(), "show statistics");
        assert_eq!(resolver.status(), Status::ValidCommand);
    }

    #[test]
    fn test_complete_command_gets_separator() {
        let mut resolver = resolver();
        resolver.set_line("exit");
        let completion = resolver.complete(UNLOCK_ALL).unwrap();
        assert_eq!(completion.inserted, " ");
        assert_eq!(resolver.line(), "exit ");
    }

    #[test]
    fn test_hidden_commands_not_offered() {
        let mut resolver = resolver();
        resolver.set_line("");
        let candidates = resolver.candidates(UNLOCK_ALL).unwrap();
        assert!(candidates.iter().all(|c| !c.starts_with("unlock")));

        resolver.set_line("unl");
        assert!(resolver.complete(UNLOCK_ALL).unwrap().is_empty());
    }

    #[test]
    fn test_no_completion_mid_line_or_in_quotes() {
        let mut resolver = resolver();
        resolver.set_line_with_cursor("throw b", 3);
        assert!(resolver.complete(UNLOCK_ALL).unwrap().is_empty());

        resolver.set_line("throw \"b");
        assert!(resolver.complete(UNLOCK_ALL).unwrap().is_empty());
        assert_eq!(resolver.line(), "throw \"b");
    }

    #[test]
    fn test_no_completion_for_arguments() {
        let mut resolver = resolver();
        resolver.set_line("exit now");
        assert!(resolver.candidates(UNLOCK_ALL).unwrap().is_empty());
    }
}
