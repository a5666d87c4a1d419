//! Delimiter balance check over emitted text
//!
//! A regression guard on the emitter, not a Go parser: `{}`, `()` and `[]`
//! must nest correctly outside of string literals. Interpreted strings
//! (`"..."` with backslash escapes) and raw strings (`` `...` ``) are skipped.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BraceError {
    #[error("unexpected '{found}' at line {line}, column {column}")]
    UnexpectedClose { found: char, line: usize, column: usize },

    #[error("'{found}' at line {line}, column {column} closes '{open}' opened at line {open_line}")]
    Mismatched {
        found: char,
        open: char,
        line: usize,
        column: usize,
        open_line: usize,
    },

    #[error("{count} unclosed delimiter(s), first '{open}' at line {line}")]
    Unclosed { count: usize, open: char, line: usize },
}

/// Delimiter counts of a balanced text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BraceReport {
    pub braces: usize,
    pub parens: usize,
    pub brackets: usize,
    pub max_depth: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Interpreted,
    Raw,
}

fn opener_of(close: char) -> char {
    match close {
        '}' => '{',
        ')' => '(',
        _ => '[',
    }
}

pub fn check_braces(text: &str) -> Result<BraceReport, BraceError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut report = BraceReport::default();
    let mut mode = Mode::Code;
    let mut escaped = false;
    let (mut line, mut column) = (1, 0);

    for c in text.chars() {
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }

        match mode {
            Mode::Interpreted => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    mode = Mode::Code;
                }
            }
            Mode::Raw => {
                if c == '`' {
                    mode = Mode::Code;
                }
            }
            Mode::Code => match c {
                '"' => mode = Mode::Interpreted,
                '`' => mode = Mode::Raw,
                '{' | '(' | '[' => {
                    match c {
                        '{' => report.braces += 1,
                        '(' => report.parens += 1,
                        _ => report.brackets += 1,
                    }
                    stack.push((c, line));
                    report.max_depth = report.max_depth.max(stack.len());
                }
                '}' | ')' | ']' => match stack.pop() {
                    None => return Err(BraceError::UnexpectedClose { found: c, line, column }),
                    Some((open, open_line)) if open != opener_of(c) => {
                        return Err(BraceError::Mismatched {
                            found: c,
                            open,
                            line,
                            column,
                            open_line,
                        });
                    }
                    Some(_) => {}
                },
                _ => {}
            },
        }
    }

    match stack.first() {
        Some(&(open, line)) => Err(BraceError::Unclosed {
            count: stack.len(),
            open,
            line,
        }),
        None => {
            tracing::debug!(braces = report.braces, max_depth = report.max_depth, "delimiters balanced");
            Ok(report)
        }
    }
}
