//! Integration tests for cmdtree-core
//!
//! These tests register a realistic command dictionary and drive it through
//! whole resolutions, completions and help requests.

use std::io::Write;

use cmdtree_core::{
    dictionary::{Mask, DEFAULT_MASK, UNLOCK_ALL},
    error::Error,
    file_handling::load_definitions,
    help::Help,
    lexer::tokenize,
    parameter::Parameter,
    resolver::{Category, Resolver, Status},
    token::{TokenKind, TokenStatus},
    validation::{Choice, ValidatorRegistry, VALIDATOR_INTEGER, VALIDATOR_USER},
};
use tempfile::NamedTempFile;

const VTYPE_COLOR: u32 = VALIDATOR_USER + 1;
const SPECIAL: Mask = 0x10000;
const DEFAULT_ACCESS: Mask = UNLOCK_ALL & !SPECIAL;

fn game() -> Resolver {
    let mut validators = ValidatorRegistry::with_builtins();
    validators
        .add_with_id(VTYPE_COLOR, Some("color"), Choice::new(["red", "white", "blue"]))
        .unwrap();
    let mut resolver = Resolver::new(validators);

    let set = resolver.default_set();
    set.add("exit", None, Some(100), DEFAULT_MASK, false).unwrap();
    set.add("clear", None, Some(101), DEFAULT_MASK, false).unwrap();
    set.add("throw ball", None, Some(1), DEFAULT_MASK, false)
        .unwrap()
        .set_help("Throw the ball")
        .add(Parameter::key(1, "angle", VALIDATOR_INTEGER).with_default("45"))
        .add(Parameter::flag(2, "hard"))
        .add(Parameter::value(3, VALIDATOR_INTEGER))
        .add(Parameter::value(4, 0).optional().hidden());
    set.add("throw ball back", None, Some(5), 0x2, false).unwrap();
    set.add("throw balls", Some("many"), Some(2), 0x3, false).unwrap();
    set.add("throw-away", None, Some(3), 0x3, false).unwrap();
    set.add("set ball", Some("set"), Some(9), DEFAULT_MASK, false)
        .unwrap()
        .add(Parameter::key(1, "color", VTYPE_COLOR))
        .add(Parameter::flag(2, "fast"))
        .add(Parameter::value(3, 0).with_default("ACME"));
    set.add("set ball none", None, Some(99), DEFAULT_MASK, false).unwrap();
    set.add("show statistics", None, Some(10), DEFAULT_MASK, false)
        .unwrap()
        .set_help("Print counters");
    set.add("unlock special", None, Some(200), DEFAULT_MASK, true)
        .unwrap();
    set.add("use special command", None, Some(201), SPECIAL, false)
        .unwrap();
    set.add("enter level", None, Some(500), DEFAULT_MASK, false)
        .unwrap();

    let level = resolver.command_set("LEVEL2");
    level.add("hello", None, Some(501), DEFAULT_MASK, false).unwrap();
    level.add("return", None, Some(502), DEFAULT_MASK, false).unwrap();

    resolver
}

fn resolve(resolver: &mut Resolver, line: &str, mask: Mask) -> Status {
    resolver.set_line(line);
    resolver.resolve(mask).unwrap()
}

fn command_id(resolver: &Resolver) -> Option<u32> {
    resolver.command().and_then(|c| c.id())
}

#[test]
fn test_longest_match_wins() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "throw ball back", UNLOCK_ALL),
        Status::ValidCommand
    );
    assert_eq!(command_id(&resolver), Some(5));

    assert_eq!(resolve(&mut resolver, "throw balls", UNLOCK_ALL), Status::ValidCommand);
    assert_eq!(resolver.command().and_then(|c| c.name()), Some("many"));

    assert_eq!(resolve(&mut resolver, "throw-away", UNLOCK_ALL), Status::ValidCommand);
    assert_eq!(command_id(&resolver), Some(3));
}

#[test]
fn test_keys_bind_only_on_exact_names() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "set ball color red", UNLOCK_ALL),
        Status::ValidCommand
    );
    assert_eq!(resolver.key_value("color"), Some("red"));

    assert_ne!(
        resolve(&mut resolver, "set ball colo red", UNLOCK_ALL),
        Status::ValidCommand
    );
    assert!(resolver.find_key("color").is_none());
    let partial = &resolver.arguments()[0];
    assert!(partial.status.contains(TokenStatus::PARTIAL_ARG));
}

#[test]
fn test_key_without_value() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "set ball color", UNLOCK_ALL),
        Status::MissingValue
    );
    assert_eq!(
        resolve(&mut resolver, "throw ball 3 angle", UNLOCK_ALL),
        Status::MissingValue
    );
}

#[test]
fn test_key_value_with_equals_sign() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "throw ball angle=30 12", UNLOCK_ALL),
        Status::ValidCommand
    );
    assert_eq!(resolver.key_value("angle"), Some("30"));
    assert_eq!(resolver.positional(0).map(|t| t.value.as_str()), Some("12"));
}

#[test]
fn test_defaults_are_materialized() {
    let mut resolver = game();
    assert_eq!(resolve(&mut resolver, "throw ball 7", UNLOCK_ALL), Status::ValidCommand);

    let angle = resolver.find_key("angle").unwrap();
    assert_eq!(angle.value, "45");
    assert!(angle.status.contains(TokenStatus::DEFAULT_USED));
    assert!(!angle.in_string());

    assert_eq!(resolve(&mut resolver, "set ball color blue", UNLOCK_ALL), Status::ValidCommand);
    let brand = resolver.positional(0).unwrap();
    assert_eq!(brand.value, "ACME");
    assert!(brand.status.contains(TokenStatus::DEFAULT_USED));
}

#[test]
fn test_argument_counts() {
    let mut resolver = game();
    assert_eq!(resolve(&mut resolver, "throw ball", UNLOCK_ALL), Status::TooFewArgs);
    assert_eq!(
        resolve(&mut resolver, "throw ball 1 2 3", UNLOCK_ALL),
        Status::TooManyArgs
    );
    assert_eq!(resolve(&mut resolver, "exit now", UNLOCK_ALL), Status::TooManyArgs);
}

#[test]
fn test_flags_and_lookup_by_id() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "throw ball hard 9 angle 60", UNLOCK_ALL),
        Status::ValidCommand
    );
    assert!(resolver.find_flag("hard").is_some());
    assert_eq!(resolver.find_arg(1).map(|t| t.value.as_str()), Some("60"));
    assert_eq!(resolver.find_arg(3).map(|t| t.value.as_str()), Some("9"));
    assert!(resolver.find_arg(4).is_none());
}

#[test]
fn test_invalid_values() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "throw ball seven", UNLOCK_ALL),
        Status::InvalidArgument
    );
    let categories: Vec<Category> = resolver
        .characters()
        .iter()
        .skip(11)
        .take(5)
        .map(|c| c.category)
        .collect();
    assert!(categories.iter().all(|&c| c == Category::InvalidArgument));

    assert_eq!(
        resolve(&mut resolver, "set ball color gree", UNLOCK_ALL),
        Status::InvalidArgument
    );
}

#[test]
fn test_quoted_values() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "set ball color=\"red\" \"Big Co\"", UNLOCK_ALL),
        Status::ValidCommand
    );
    let brand = resolver.positional(0).unwrap();
    assert_eq!(brand.value, "Big Co");
    assert!(brand.is_quoted());

    let last = resolver.characters().iter().rev().nth(1).unwrap();
    assert_eq!(last.category, Category::QuotedString);
}

#[test]
fn test_quoted_word_never_matches_command() {
    let mut resolver = game();
    assert_eq!(resolve(&mut resolver, "\"exit\"", UNLOCK_ALL), Status::NoCommand);
}

#[test]
fn test_mask_visibility() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "use special command", DEFAULT_ACCESS),
        Status::NoCommand
    );
    assert_eq!(
        resolve(&mut resolver, "use special command", UNLOCK_ALL),
        Status::ValidCommand
    );

    resolver.set_line("us");
    assert!(resolver.candidates(DEFAULT_ACCESS).unwrap().is_empty());
    assert_eq!(resolver.candidates(UNLOCK_ALL).unwrap(), vec!["e"]);
}

#[test]
fn test_hidden_commands_resolve_but_are_not_offered() {
    let mut resolver = game();
    assert_eq!(
        resolve(&mut resolver, "unlock special", DEFAULT_ACCESS),
        Status::ValidCommand
    );
    assert_eq!(command_id(&resolver), Some(200));

    resolver.set_line("u");
    assert!(resolver.candidates(DEFAULT_ACCESS).unwrap().is_empty());

    resolver.set_line("");
    resolver.resolve(DEFAULT_ACCESS).unwrap();
    let Help::Commands(entries) = resolver.help() else {
        panic!("expected command listing");
    };
    assert!(entries.iter().all(|e| !e.words.starts_with("unlock")));
    assert!(entries.iter().all(|e| !e.words.starts_with("use")));
}

#[test]
fn test_completion_convergence() {
    let mut resolver = game();

    resolver.set_line("throw b");
    assert_eq!(resolver.candidates(DEFAULT_MASK).unwrap(), vec!["all", "alls"]);
    let completion = resolver.complete(DEFAULT_MASK).unwrap();
    assert_eq!(completion.inserted, "all");
    assert_eq!(resolver.line(), "throw ball");

    resolver.set_line("cle");
    resolver.complete(DEFAULT_MASK).unwrap();
    assert_eq!(resolver.line(), "clear");
    resolver.complete(DEFAULT_MASK).unwrap();
    assert_eq!(resolver.line(), "clear ");

    resolver.set_line("sh");
    resolver.complete(DEFAULT_MASK).unwrap();
    assert_eq!(resolver.line(), "show statistics");
    assert_eq!(resolver.status(), Status::ValidCommand);
}

#[test]
fn test_command_sets() {
    let mut resolver = game();
    assert_eq!(resolve(&mut resolver, "hello", UNLOCK_ALL), Status::NoCommand);

    resolver.command_set("LEVEL2").activate();
    assert_eq!(resolve(&mut resolver, "hello", UNLOCK_ALL), Status::ValidCommand);
    assert_eq!(command_id(&resolver), Some(501));

    resolver.deactivate_all_sets();
    assert_eq!(resolve(&mut resolver, "return", UNLOCK_ALL), Status::NoCommand);
    assert_eq!(resolve(&mut resolver, "exit", UNLOCK_ALL), Status::ValidCommand);
}

#[test]
fn test_duplicate_across_active_sets() {
    let mut resolver = game();
    let level = resolver.command_set("LEVEL3");
    level.add("exit", None, Some(900), DEFAULT_MASK, false).unwrap();
    level.activate();

    resolver.set_line("exit");
    let result = resolver.resolve(UNLOCK_ALL);
    assert!(matches!(result, Err(Error::DuplicateCommand(words)) if words == "exit"));
}

#[test]
fn test_every_character_classified() {
    let mut resolver = game();
    let line = "set  ball color=blé";
    resolve(&mut resolver, line, UNLOCK_ALL);

    let characters = resolver.characters();
    assert_eq!(characters.len(), line.chars().count() + 1);
    assert_eq!(characters.last().unwrap().display_length, 0);
    for (position, class) in characters.iter().enumerate() {
        assert_eq!(class.display_offset, position);
    }
    assert_eq!(characters[0].category, Category::ValidCommand);
    assert_eq!(characters[3].category, Category::Normal);
    assert_eq!(characters[3].token, Some(1));
}

#[test]
fn test_lexer_quoting() {
    let values: Vec<(String, bool)> = tokenize("key=\"a b\" flag")
        .into_iter()
        .map(|t| (t.value.clone(), t.is_quoted()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("key".to_string(), false),
            ("a b".to_string(), true),
            ("flag".to_string(), false)
        ]
    );

    let tokens = tokenize("a\\ b");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, "a b");
    assert_eq!(tokens[0].kind, TokenKind::Unknown);
}

#[test]
fn test_definitions_from_file() {
    let yaml_content = r#"
validators:
  - name: color
    choices: [red, white, blue]
sets:
  - commands:
      - words: set ball
        name: set
        id: 9
        parameters:
          - key: color
            type: color
          - flag: fast
  - name: LEVEL1
    commands:
      - words: jump high
        id: 20
        mask: 0x2
        parameters:
          - value: height
            type: integer
"#;
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{yaml_content}").unwrap();

    let definitions = load_definitions(temp_file.path().to_str().unwrap()).unwrap();
    let mut resolver = Resolver::new(ValidatorRegistry::with_builtins());
    definitions.register(&mut resolver).unwrap();

    assert_eq!(
        resolve(&mut resolver, "set ball fast color white", UNLOCK_ALL),
        Status::ValidCommand
    );
    assert_eq!(resolve(&mut resolver, "jump high 3", 0x1), Status::NoCommand);
    assert_eq!(resolve(&mut resolver, "jump high 3", 0x2), Status::ValidCommand);
    assert_eq!(resolve(&mut resolver, "jump high x", 0x2), Status::InvalidArgument);
}
