// ABOUTME: Error types for the three propagating error classes (lexical, static, runtime)

use thiserror::Error;

/// A lexical error, reported inline while scanning continues (spec.md §4.1).
#[derive(Error, Debug, Clone)]
#[error("[line {line}] Error: {message}")]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

impl LexError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        LexError {
            line,
            message: message.into(),
        }
    }
}

/// Shared diagnostic shape for parser and resolver errors (spec.md §6):
/// `[line N] Error at '<lexeme>': <msg>`, or `Error at end` at EOF.
#[derive(Error, Debug, Clone)]
pub enum SyntaxError {
    #[error("[line {line}] Error at '{lexeme}': {message}")]
    AtToken {
        line: usize,
        lexeme: String,
        message: String,
    },
    #[error("[line {line}] Error at end: {message}")]
    AtEnd { line: usize, message: String },
}

impl SyntaxError {
    pub fn at_token(line: usize, lexeme: impl Into<String>, message: impl Into<String>) -> Self {
        SyntaxError::AtToken {
            line,
            lexeme: lexeme.into(),
            message: message.into(),
        }
    }

    pub fn at_end(line: usize, message: impl Into<String>) -> Self {
        SyntaxError::AtEnd {
            line,
            message: message.into(),
        }
    }
}

/// A runtime error, reported as `<message>\n[line N]` (spec.md §6) and
/// aborting the execution of the offending statement.
#[derive(Error, Debug, Clone)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        RuntimeError {
            message: message.into(),
            line,
        }
    }

    pub fn undefined_variable(name: &str, line: usize) -> Self {
        Self::new(format!("undefined variable {name}"), line)
    }

    pub fn operands_must_be_numbers(line: usize) -> Self {
        Self::new("Operands must be numbers.", line)
    }

    pub fn operands_must_be_two_numbers_or_two_strings(line: usize) -> Self {
        Self::new("Operands must be two numbers or two strings.", line)
    }

    pub fn not_callable(line: usize) -> Self {
        Self::new("can only call functions and classes", line)
    }

    pub fn arity_mismatch(expected: usize, got: usize, line: usize) -> Self {
        Self::new(format!("expected {expected} arguments but got {got}"), line)
    }

    pub fn only_instances_have_fields(line: usize) -> Self {
        Self::new("only instances have fields", line)
    }

    pub fn undefined_property(name: &str, line: usize) -> Self {
        Self::new(format!("undefined property {name}"), line)
    }

    pub fn superclass_must_be_a_class(line: usize) -> Self {
        Self::new("Superclass must be a class", line)
    }

    pub fn super_not_supported(line: usize) -> Self {
        Self::new("'super' is not supported", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_formats_per_spec() {
        let e = LexError::new(3, "Unexpected character: $");
        assert_eq!(e.to_string(), "[line 3] Error: Unexpected character: $");
    }

    #[test]
    fn syntax_error_at_token_formats_per_spec() {
        let e = SyntaxError::at_token(5, "+", "Expect expression.");
        assert_eq!(e.to_string(), "[line 5] Error at '+': Expect expression.");
    }

    #[test]
    fn runtime_error_formats_per_spec() {
        let e = RuntimeError::operands_must_be_numbers(7);
        assert_eq!(e.to_string(), "Operands must be numbers.\n[line 7]");
    }
}
