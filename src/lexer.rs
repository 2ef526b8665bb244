//! Splits Corsfile text into line-numbered tokens.
//!
//! Tokens are separated by whitespace. A `#` at the start of a token begins a
//! comment that runs to the end of the line, and `"..."` quotes a token that
//! may contain whitespace (`\"` escapes a quote inside it).

use crate::error::SyntaxError;

/// A single configuration token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text with quotes removed
    pub text: String,

    /// 1-based line the token starts on
    pub line: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// Tokenize `input`, using `file` to label errors.
pub fn tokenize(file: &str, input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut line = 1;
    let mut start_line = 1;
    let mut in_token = false;
    let mut quoted = false;
    let mut escaped = false;
    let mut comment = false;

    for ch in input.chars() {
        if comment {
            if ch == '\n' {
                comment = false;
                line += 1;
            }
            continue;
        }

        if quoted {
            if ch == '\n' {
                line += 1;
            }
            if escaped {
                if ch != '"' {
                    current.push('\\');
                }
                current.push(ch);
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' => {
                    quoted = false;
                    in_token = false;
                    tokens.push(Token::new(std::mem::take(&mut current), start_line));
                }
                _ => current.push(ch),
            }
            continue;
        }

        if ch.is_whitespace() {
            if in_token {
                in_token = false;
                tokens.push(Token::new(std::mem::take(&mut current), start_line));
            }
            if ch == '\n' {
                line += 1;
            }
            continue;
        }

        if !in_token {
            start_line = line;
            match ch {
                '#' => {
                    comment = true;
                    continue;
                }
                '"' => {
                    quoted = true;
                    in_token = true;
                    continue;
                }
                _ => in_token = true,
            }
        }
        current.push(ch);
    }

    if quoted {
        return Err(SyntaxError {
            file: file.to_string(),
            line: start_line,
            token: current,
            message: "unterminated quoted string".to_string(),
        });
    }
    if in_token {
        tokens.push(Token::new(current, start_line));
    }

    Ok(tokens)
}
