//! Line tokenizer.
//!
//! The lexer is a small table-driven state machine. Each input character is
//! classified, the pair `(state, class)` selects a transition, and the
//! transition's actions decide whether a token starts, grows or ends.
//!
//! # Key Features
//!
//! - `=` separates tokens like whitespace, so `key=value` reads as `key value`
//! - `"..."` groups text into a single quoted token
//! - `\` escapes exactly the next character, inside or outside quotes
//! - Token offsets and lengths index the input line, quotes included

use bitflags::bitflags;

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Whitespace,
    Token,
    Quoted,
    EscapeInToken,
    EscapeInQuoted,
    EndOfLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Whitespace,
    Printable,
    Quote,
    Escape,
    EndOfLine,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Action: u8 {
        /// Start a new token at the current character.
        const START = 1 << 0;
        /// Add the current character to the open token.
        const PUSH = 1 << 1;
        /// Close the open token before the current character.
        const END = 1 << 2;
        /// Close the open token including the current character.
        const PUSH_END = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    next: State,
    action: Action,
}

const fn tr(next: State, action: Action) -> Transition {
    Transition { next, action }
}

const NONE: Action = Action::empty();
const START: Action = Action::START;
const PUSH: Action = Action::PUSH;
const END: Action = Action::END;
const PUSH_END: Action = Action::PUSH_END;
const START_END: Action = Action::START.union(Action::END);

// Columns: whitespace, printable, quote, escape, end of line.
const TRANSITIONS: [[Transition; 5]; 6] = [
    // whitespace
    [
        tr(State::Whitespace, NONE),
        tr(State::Token, START),
        tr(State::Quoted, START),
        tr(State::EscapeInToken, START),
        tr(State::EndOfLine, NONE),
    ],
    // token
    [
        tr(State::Whitespace, END),
        tr(State::Token, PUSH),
        tr(State::Quoted, START_END),
        tr(State::EscapeInToken, PUSH),
        tr(State::EndOfLine, END),
    ],
    // quoted
    [
        tr(State::Quoted, PUSH),
        tr(State::Quoted, PUSH),
        tr(State::Whitespace, PUSH_END),
        tr(State::EscapeInQuoted, PUSH),
        tr(State::EndOfLine, END),
    ],
    // escape in token
    [
        tr(State::Token, PUSH),
        tr(State::Token, PUSH),
        tr(State::Token, PUSH),
        tr(State::Token, PUSH),
        tr(State::EndOfLine, END),
    ],
    // escape in quoted
    [
        tr(State::Quoted, PUSH),
        tr(State::Quoted, PUSH),
        tr(State::Quoted, PUSH),
        tr(State::Quoted, PUSH),
        tr(State::EndOfLine, END),
    ],
    // end of line
    [
        tr(State::EndOfLine, NONE),
        tr(State::EndOfLine, NONE),
        tr(State::EndOfLine, NONE),
        tr(State::EndOfLine, NONE),
        tr(State::EndOfLine, NONE),
    ],
];

fn classify(c: Option<char>) -> Class {
    match c {
        None => Class::EndOfLine,
        Some('\\') => Class::Escape,
        Some('"') => Class::Quote,
        Some(c) if c.is_whitespace() || c.is_control() || c == '=' => Class::Whitespace,
        Some(_) => Class::Printable,
    }
}

fn transition(state: State, class: Class) -> Transition {
    TRANSITIONS[state as usize][class as usize]
}

/// Splits a line into tokens.
///
/// Escapes are applied and quote characters removed from each token's
/// `value`, while `offset` and `length` keep pointing at the raw text.
/// An explicit `""` yields a quoted token with an empty value; runs of
/// separators yield nothing. A backslash at the very end of the line is
/// kept as a literal character.
///
/// # Examples
///
/// ```
/// use cmdtree_core::lexer::tokenize;
///
/// let tokens = tokenize(r#"key="a b" flag"#);
/// let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
/// assert_eq!(values, vec!["key", "a b", "flag"]);
/// assert!(tokens[1].is_quoted());
/// ```
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut state = State::Whitespace;
    let mut start = 0;
    let mut value = String::new();

    let characters = line
        .char_indices()
        .map(|(offset, c)| (offset, Some(c)))
        .chain(std::iter::once((line.len(), None)));

    for (offset, c) in characters {
        let class = classify(c);
        let Transition { next, action } = transition(state, class);

        if action.intersects(Action::END | Action::PUSH_END) && offset > start {
            let quoted = matches!(state, State::Quoted | State::EscapeInQuoted);
            let mut length = offset - start;
            if action.contains(Action::PUSH_END) {
                length += c.map_or(0, char::len_utf8);
            }
            if class == Class::EndOfLine
                && matches!(state, State::EscapeInToken | State::EscapeInQuoted)
            {
                value.push('\\');
            }
            tokens.push(Token::from_line(
                std::mem::take(&mut value),
                start,
                length,
                quoted,
            ));
        }

        if action.contains(Action::START) {
            start = offset;
            value.clear();
        }

        if action.intersects(Action::START | Action::PUSH) {
            if let Some(c) = c {
                let escaped = matches!(state, State::EscapeInToken | State::EscapeInQuoted);
                if escaped || !matches!(class, Class::Quote | Class::Escape) {
                    value.push(c);
                }
            }
        }

        state = next;
        if state == State::EndOfLine {
            break;
        }
    }

    tokens
}
