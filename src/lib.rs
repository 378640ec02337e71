// ABOUTME: Library module exposing the interpreter pipeline for the CLI and integration tests

pub mod ast;
pub mod class;
pub mod config;
pub mod environment;
pub mod error;
pub mod function;
pub mod instance;
pub mod interpreter;
pub mod lexer;
pub mod native;
pub mod parser;
pub mod printer;
pub mod resolver;
pub mod token;
pub mod value;

use error::{LexError, RuntimeError, SyntaxError};
use std::collections::HashMap;

/// Outcome of running the pipeline up through parsing: the statements it
/// managed to build (possibly partial, per spec.md §4.2 panic-mode
/// recovery) plus every error collected along the way.
pub struct ParseOutcome {
    pub statements: Vec<ast::Stmt>,
    pub lex_errors: Vec<LexError>,
    pub syntax_errors: Vec<SyntaxError>,
}

impl ParseOutcome {
    pub fn had_error(&self) -> bool {
        !self.lex_errors.is_empty() || !self.syntax_errors.is_empty()
    }
}

/// Scans and parses `source` into a statement list (§6 `run`/`evaluate` path).
pub fn parse_program(source: &str) -> ParseOutcome {
    let (tokens, lex_errors) = lexer::Scanner::new(source).scan_tokens();
    let (statements, syntax_errors) = parser::Parser::new(&tokens).parse();
    ParseOutcome {
        statements,
        lex_errors,
        syntax_errors,
    }
}

/// Scans and parses `source` as a sequence of top-level expressions,
/// used by `parse`/`evaluate` mode (spec.md §6).
pub fn parse_expressions(source: &str) -> (Vec<ast::Expr>, Vec<LexError>, Vec<SyntaxError>) {
    let (tokens, lex_errors) = lexer::Scanner::new(source).scan_tokens();
    let (expressions, syntax_errors) = parser::Parser::new(&tokens).parse_expressions();
    (expressions, lex_errors, syntax_errors)
}

/// Runs the resolver over already-parsed statements, returning the
/// scope-depth side table and any static errors (spec.md §4.3).
pub fn resolve(statements: &[ast::Stmt]) -> (HashMap<u32, usize>, Vec<SyntaxError>) {
    resolver::Resolver::new().resolve(statements)
}

/// Executes a fully parsed-and-resolved program (spec.md §6 `run` mode).
pub fn interpret(
    statements: &[ast::Stmt],
    locals: HashMap<u32, usize>,
) -> Result<(), RuntimeError> {
    interpreter::Interpreter::new(locals).interpret(statements)
}
