//! Cursor over configuration tokens.
//!
//! The dispenser walks a flat token list the way directive parsers expect:
//! `next` moves to the following token anywhere in the input, `next_arg` only
//! moves along the current line, and `next_block` steps through the
//! sub-directives of a `{ ... }` block that opens on the directive's line.

use crate::error::SyntaxError;
use crate::lexer::{tokenize, Token};

/// Token cursor handed to directive parsers
#[derive(Debug, Clone)]
pub struct Dispenser {
    file: String,
    tokens: Vec<Token>,
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    /// Create a dispenser positioned before the first token
    pub fn new(file: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            file: file.into(),
            tokens,
            cursor: None,
            nesting: 0,
        }
    }

    /// Lex `input` into a dispenser for `directive`.
    ///
    /// Every top-level directive in `input` must be `directive`, and blocks
    /// must be balanced and open on their directive's line.
    pub fn for_directive(file: &str, input: &str, directive: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(file, input)?;
        validate_directives(file, &tokens, directive)?;
        Ok(Self::new(file, tokens))
    }

    /// Advance to the next token. Returns false at the end of input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    /// Advance to the next token only if it is on the same line as the
    /// current one.
    pub fn next_arg(&mut self) -> bool {
        let Some(cursor) = self.cursor else {
            return self.next();
        };
        let (Some(current), Some(following)) =
            (self.tokens.get(cursor), self.tokens.get(cursor + 1))
        else {
            return false;
        };
        let end_line = current.line + current.text.matches('\n').count();
        if end_line == following.line {
            self.cursor = Some(cursor + 1);
            true
        } else {
            false
        }
    }

    /// Consume and return the remaining arguments on the current line,
    /// stopping before an opening brace.
    pub fn remaining_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while self.next_arg() {
            if self.val() == "{" {
                self.back();
                break;
            }
            args.push(self.val().to_string());
        }
        args
    }

    /// Step to the next sub-directive of the block belonging to the current
    /// directive. Returns false when there is no block or it has ended.
    pub fn next_block(&mut self) -> bool {
        if self.nesting > 0 {
            if !self.next() {
                self.nesting = 0;
                return false;
            }
            if self.val() == "}" {
                self.nesting -= 1;
                return false;
            }
            return true;
        }

        if !self.next_arg() {
            return false;
        }
        if self.val() != "{" {
            self.back();
            return false;
        }
        if !self.next() || self.val() == "}" {
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Text of the current token (empty before the first `next`)
    pub fn val(&self) -> &str {
        self.current().map_or("", |t| t.text.as_str())
    }

    /// Line of the current token
    pub fn line(&self) -> usize {
        self.current().map_or(0, |t| t.line)
    }

    /// Build a syntax error pointing at the current token
    pub fn err(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            file: self.file.clone(),
            line: self.line(),
            token: self.val().to_string(),
            message: message.into(),
        }
    }

    fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|c| self.tokens.get(c))
    }

    fn back(&mut self) {
        self.cursor = match self.cursor {
            Some(0) | None => None,
            Some(c) => Some(c - 1),
        };
    }
}

/// Check brace balance and that every top-level directive is `directive`.
fn validate_directives(file: &str, tokens: &[Token], directive: &str) -> Result<(), SyntaxError> {
    let error = |token: &Token, message: String| SyntaxError {
        file: file.to_string(),
        line: token.line,
        token: token.text.clone(),
        message,
    };

    let mut depth = 0usize;
    let mut directive_line = 0usize;
    let mut expect_directive = true;
    let mut open: Option<&Token> = None;

    for token in tokens {
        if depth == 0 && token.line != directive_line {
            expect_directive = true;
        }

        match token.text.as_str() {
            "{" => {
                if depth == 0 && expect_directive {
                    return Err(error(
                        token,
                        "block must open on the same line as its directive".to_string(),
                    ));
                }
                if depth == 0 {
                    open = Some(token);
                }
                depth += 1;
            }
            "}" => {
                if depth == 0 {
                    return Err(error(token, "unexpected '}'".to_string()));
                }
                depth -= 1;
                if depth == 0 {
                    expect_directive = true;
                    directive_line = 0;
                }
            }
            name if depth == 0 && expect_directive => {
                if name != directive {
                    return Err(error(token, format!("unknown directive '{}'", name)));
                }
                expect_directive = false;
                directive_line = token.line;
            }
            _ => {}
        }
    }

    if let Some(token) = open.filter(|_| depth > 0) {
        return Err(error(token, "unexpected end of input: unclosed block".to_string()));
    }

    Ok(())
}
