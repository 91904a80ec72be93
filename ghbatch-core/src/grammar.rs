//! Project-line grammar.
//!
//! ```text
//! line   := name (WS flag)*
//! name   := [A-Za-z0-9._-]+
//! flag   := "--" key ("=" value | WS value)?   bare value must not start with '-'
//!         | "-" short (WS value)?              short aliases of `gh repo create`
//! token  := bare | '"' escaped* '"' | "'" literal* "'"
//! ```
//!
//! Inside double quotes `\n`, `\r`, `\t`, `\"` and `\\` are unescaped, so a
//! description can carry line breaks on a single list line. They are removed
//! again by the sanitizer, which flags the description for review.

use crate::error::ParseFailure;
use crate::sanitize::sanitize_description;
use crate::types::{Flag, ProjectSpec, VISIBILITY_FLAGS};

const DESCRIPTION_KEY: &str = "description";

/// Short flag aliases accepted on project lines.
const SHORT_ALIASES: [(&str, &str); 9] = [
    ("c", "clone"),
    ("d", "description"),
    ("g", "gitignore"),
    ("h", "homepage"),
    ("l", "license"),
    ("p", "template"),
    ("r", "remote"),
    ("s", "source"),
    ("t", "team"),
];

/// One shell-style token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// The token opened with a quote; it is always a value, never a flag.
    pub quoted: bool,
}

impl Token {
    fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }
}

/// Split a line into shell-style tokens.
pub fn tokenize(line: &str) -> Result<Vec<Token>, ParseFailure> {
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let buf = &mut current
                    .get_or_insert_with(|| Token {
                        text: String::new(),
                        quoted: true,
                    })
                    .text;
                let mut closed = false;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('n') => buf.push('\n'),
                            Some('r') => buf.push('\r'),
                            Some('t') => buf.push('\t'),
                            Some('"') => buf.push('"'),
                            Some('\\') => buf.push('\\'),
                            Some(other) => {
                                buf.push('\\');
                                buf.push(other);
                            }
                            None => break,
                        },
                        other => buf.push(other),
                    }
                }
                if !closed {
                    return Err(ParseFailure::UnterminatedQuote { quote: '"' });
                }
            }
            '\'' => {
                let buf = &mut current
                    .get_or_insert_with(|| Token {
                        text: String::new(),
                        quoted: true,
                    })
                    .text;
                let mut closed = false;
                for q in chars.by_ref() {
                    if q == '\'' {
                        closed = true;
                        break;
                    }
                    buf.push(q);
                }
                if !closed {
                    return Err(ParseFailure::UnterminatedQuote { quote: '\'' });
                }
            }
            c if c.is_whitespace() => {
                if let Some(token) = current.take() {
                    tokens.push(token);
                }
            }
            other => current.get_or_insert_with(|| Token::bare("")).text.push(other),
        }
    }
    if let Some(token) = current.take() {
        tokens.push(token);
    }
    Ok(tokens)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('-')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}

/// Key and inline `=value` of a flag token.
fn flag_key(token: &Token) -> Result<(String, Option<String>), ParseFailure> {
    let unexpected = || ParseFailure::UnexpectedToken {
        token: token.text.clone(),
    };
    if token.quoted {
        return Err(unexpected());
    }
    if let Some(long) = token.text.strip_prefix("--") {
        let (key, value) = match long.split_once('=') {
            Some((k, v)) => (k, Some(v.to_string())),
            None => (long, None),
        };
        if !is_valid_key(key) {
            return Err(unexpected());
        }
        return Ok((key.to_string(), value));
    }
    let short = token.text.strip_prefix('-').ok_or_else(unexpected)?;
    SHORT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == short)
        .map(|(_, long)| (long.to_string(), None))
        .ok_or_else(unexpected)
}

/// Parse the flag tokens that follow the project name.
///
/// A flag without an inline value takes the next token as its value when
/// that token is quoted or does not start with `-`.
pub fn parse_flags(tokens: &[Token]) -> Result<Vec<Flag>, ParseFailure> {
    let mut flags = Vec::new();
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        let (key, inline) = flag_key(token)?;
        if let Some(value) = inline {
            flags.push(Flag::with_value(key, value));
            continue;
        }
        match iter.peek() {
            Some(next) if next.quoted || !next.text.starts_with('-') => {
                flags.push(Flag::with_value(key, next.text.as_str()));
                iter.next();
            }
            _ => flags.push(Flag::switch(key)),
        }
    }
    Ok(flags)
}

/// Parse one non-comment list line into a [`ProjectSpec`].
///
/// The description flag is lifted out and sanitized; `--private` is added when
/// no visibility flag is present.
pub fn parse_project_line(line: &str) -> Result<ProjectSpec, ParseFailure> {
    let tokens = tokenize(line)?;
    let (name, rest) = tokens.split_first().ok_or(ParseFailure::Empty)?;
    if !is_valid_name(&name.text) {
        return Err(ParseFailure::InvalidName {
            name: name.text.clone(),
        });
    }

    let mut description = None;
    let mut flags = Vec::new();
    for flag in parse_flags(rest)? {
        if flag.key == DESCRIPTION_KEY {
            description = Some(sanitize_description(flag.value.as_deref().unwrap_or("")));
        } else {
            flags.push(flag);
        }
    }

    if !flags
        .iter()
        .any(|f| VISIBILITY_FLAGS.contains(&f.key.as_str()))
    {
        flags.insert(0, Flag::switch("private"));
    }

    Ok(ProjectSpec {
        name: name.text.clone(),
        flags,
        description,
    })
}
