// ⌨️ Command Parser - Turns one line of console input into a `Command`
//
// Two syntaxes are accepted:
//   verb [args...]               e.g. `show State 1234`
//   Class.method(args)           e.g. `State.show("1234")`
// The second form is rewritten into the first before parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// `Identifier.Identifier(arguments)`
static METHOD_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_]\w*)\.([A-Za-z_]\w*)\((.*)\)\s*$").expect("valid method-call pattern")
});

/// Methods reachable through `Class.method(args)`
const DOT_METHODS: [&str; 5] = ["all", "count", "show", "destroy", "update"];

// ============================================================================
// COMMAND
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Blank line - does nothing
    Empty,
    Quit,
    /// End of input (Ctrl+D or a literal `EOF`)
    Eof,
    Help {
        topic: Option<String>,
    },
    Create {
        class: Option<String>,
    },
    Show {
        class: Option<String>,
        id: Option<String>,
    },
    Destroy {
        class: Option<String>,
        id: Option<String>,
    },
    All {
        class: Option<String>,
    },
    Update {
        class: Option<String>,
        id: Option<String>,
        attribute: Option<String>,
        value: Option<String>,
    },
    /// `Class.update("id", {"attr": value, ...})`
    UpdateMany {
        class: String,
        id: String,
        values: Map<String, Value>,
    },
    Count {
        class: Option<String>,
    },
    /// Anything else; carries the original line for the error message
    Unknown(String),
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }

        if let Some(caps) = METHOD_CALL.captures(trimmed) {
            return Self::parse_method_call(trimmed, &caps[1], &caps[2], &caps[3]);
        }

        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest),
            None => (trimmed, ""),
        };
        let mut args = tokenize(rest).into_iter();

        match verb {
            "quit" => Command::Quit,
            "EOF" => Command::Eof,
            "help" => Command::Help { topic: args.next() },
            "create" => Command::Create { class: args.next() },
            "show" => Command::Show {
                class: args.next(),
                id: args.next(),
            },
            "destroy" => Command::Destroy {
                class: args.next(),
                id: args.next(),
            },
            "all" => Command::All { class: args.next() },
            "update" => Command::Update {
                class: args.next(),
                id: args.next(),
                attribute: args.next(),
                value: args.next(),
            },
            "count" => Command::Count { class: args.next() },
            _ => Command::Unknown(trimmed.to_string()),
        }
    }

    /// `Class.method(args)` → `method Class args` (commas stripped)
    fn parse_method_call(line: &str, class: &str, method: &str, args: &str) -> Command {
        if !DOT_METHODS.contains(&method) {
            return Command::Unknown(line.to_string());
        }

        if method == "update" {
            if let Some(command) = parse_update_with_dict(line, class, args) {
                return command;
            }
        }

        let rewritten = format!("{} {} {}", method, class, args.replace(',', " "));
        Command::parse(&rewritten)
    }
}

/// `"id", {"attr": value}` → `UpdateMany`
///
/// `None` when the second argument is not a dictionary. Once it is, the line
/// is either an `UpdateMany` or `Unknown`; it never falls back to the
/// positional form.
fn parse_update_with_dict(line: &str, class: &str, args: &str) -> Option<Command> {
    let (id, dict) = args.split_once(',')?;
    let dict = dict.trim();
    if !dict.starts_with('{') {
        return None;
    }

    let values = serde_json::from_str::<Map<String, Value>>(dict)
        .or_else(|_| serde_json::from_str::<Map<String, Value>>(&single_to_double_quotes(dict)));

    let command = match (values, tokenize(id).into_iter().next()) {
        (Ok(values), Some(id)) => Command::UpdateMany {
            class: class.to_string(),
            id,
            values,
        },
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

/// Rewrite 'single quoted' strings as "double quoted" JSON strings
///
/// Double-quoted strings pass through untouched, so `{'a': "O'Brien"}` keeps
/// its apostrophe. Inside a single-quoted string `"` is escaped and `\'`
/// becomes a plain apostrophe.
fn single_to_double_quotes(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (None, '\'') => {
                quote = Some('\'');
                out.push('"');
            }
            (None, '"') => {
                quote = Some('"');
                out.push('"');
            }
            (None, _) => out.push(c),
            (Some(q), '\\') => match chars.next() {
                Some('\'') if q == '\'' => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            (Some('\''), '\'') | (Some('"'), '"') => {
                quote = None;
                out.push('"');
            }
            (Some('\''), '"') => out.push_str("\\\""),
            (Some(_), _) => out.push(c),
        }
    }

    out
}

// ============================================================================
// TOKENIZER
// ============================================================================

/// Split on whitespace, keeping "double" or 'single' quoted runs together
///
/// Quotes are removed. An unterminated quote runs to the end of the line.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(tokenize(r#"State 12 name "New York""#), vec!["State", "12", "name", "New York"]);
        assert_eq!(tokenize("  a   'b c'  "), vec!["a", "b c"]);
        assert_eq!(tokenize(r#"name """#), vec!["name", ""]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("EOF"), Command::Eof);
        assert_eq!(Command::parse("create"), Command::Create { class: None });
        assert_eq!(Command::parse("create User"), Command::Create { class: some("User") });
        assert_eq!(Command::parse("all"), Command::All { class: None });
        assert_eq!(Command::parse("help show"), Command::Help { topic: some("show") });
    }

    #[test]
    fn test_parse_update_arguments() {
        assert_eq!(
            Command::parse(r#"update State 42 name "California""#),
            Command::Update {
                class: some("State"),
                id: some("42"),
                attribute: some("name"),
                value: some("California"),
            }
        );
        assert_eq!(
            Command::parse("update State 42"),
            Command::Update {
                class: some("State"),
                id: some("42"),
                attribute: None,
                value: None,
            }
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("fly away"), Command::Unknown("fly away".to_string()));
        assert_eq!(Command::parse("User.fly()"), Command::Unknown("User.fly()".to_string()));
    }

    #[test]
    fn test_dot_syntax_rewrite() {
        assert_eq!(Command::parse("User.count()"), Command::parse("count User"));
        assert_eq!(Command::parse("User.all()"), Command::All { class: some("User") });
        assert_eq!(
            Command::parse(r#"User.show("abc-123")"#),
            Command::Show {
                class: some("User"),
                id: some("abc-123"),
            }
        );
        assert_eq!(
            Command::parse(r#"User.update("abc", "first_name", "Betty")"#),
            Command::Update {
                class: some("User"),
                id: some("abc"),
                attribute: some("first_name"),
                value: some("Betty"),
            }
        );
    }

    #[test]
    fn test_dot_syntax_unknown_class_still_rewrites() {
        assert_eq!(Command::parse("Country.count()"), Command::Count { class: some("Country") });
    }

    #[test]
    fn test_dot_syntax_update_with_dict() {
        let command = Command::parse(r#"Place.update("p1", {"max_guest": 4, "name": "Loft"})"#);

        let mut values = Map::new();
        values.insert("max_guest".to_string(), json!(4));
        values.insert("name".to_string(), json!("Loft"));
        assert_eq!(
            command,
            Command::UpdateMany {
                class: "Place".to_string(),
                id: "p1".to_string(),
                values,
            }
        );
    }

    #[test]
    fn test_dot_syntax_update_with_single_quoted_dict() {
        let command = Command::parse("User.update('u1', {'email': 'a@b.c'})");

        match command {
            Command::UpdateMany { id, values, .. } => {
                assert_eq!(id, "u1");
                assert_eq!(values.get("email"), Some(&json!("a@b.c")));
            }
            other => panic!("expected UpdateMany, got {:?}", other),
        }
    }

    #[test]
    fn test_dot_syntax_update_with_apostrophe_in_value() {
        let command = Command::parse(r#"User.update("u1", {'last_name': "O'Brien", 'nick': 'say "hi"'})"#);

        match command {
            Command::UpdateMany { id, values, .. } => {
                assert_eq!(id, "u1");
                assert_eq!(values.get("last_name"), Some(&json!("O'Brien")));
                assert_eq!(values.get("nick"), Some(&json!("say \"hi\"")));
            }
            other => panic!("expected UpdateMany, got {:?}", other),
        }
    }

    #[test]
    fn test_dot_syntax_malformed_dict_is_unknown() {
        let line = r#"User.update("u1", {'last_name': })"#;
        assert_eq!(Command::parse(line), Command::Unknown(line.to_string()));

        let line = r#"User.update(, {"last_name": "Holt"})"#;
        assert_eq!(Command::parse(line), Command::Unknown(line.to_string()));
    }

    #[test]
    fn test_single_to_double_quotes() {
        assert_eq!(single_to_double_quotes("{'a': 'b'}"), r#"{"a": "b"}"#);
        assert_eq!(single_to_double_quotes(r#"{'a': "it's"}"#), r#"{"a": "it's"}"#);
        assert_eq!(single_to_double_quotes(r"{'a': 'it\'s'}"), r#"{"a": "it's"}"#);
        assert_eq!(single_to_double_quotes(r#"{'a': 'x"y'}"#), r#"{"a": "x\"y"}"#);
    }
}
