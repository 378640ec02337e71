// ABOUTME: CLI driver: argument dispatch, file I/O, and exit-code mapping (spec.md §6)

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use lox_treewalk::{interpret, parse_expressions, parse_program, resolve};
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for a small dynamically-typed scripting language.
#[derive(Parser, Debug)]
#[command(name = "lox-treewalk")]
#[command(version = lox_treewalk::config::VERSION)]
#[command(about = "A tree-walking interpreter for a small dynamically-typed scripting language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one formatted token per line, ending in `EOF  null`.
    Tokenize { path: PathBuf },
    /// Print the parenthesized AST form of each top-level expression.
    Parse { path: PathBuf },
    /// Evaluate each top-level expression and print its value.
    Evaluate { path: PathBuf },
    /// Execute the program, running `print` statements to stdout.
    Run { path: PathBuf },
}

const EXIT_SUCCESS: u8 = 0;
const EXIT_DATA_ERROR: u8 = 65;
const EXIT_RUNTIME_ERROR: u8 = 70;
const EXIT_USAGE_ERROR: u8 = 1;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // `--help`/`--version` are requests, not usage errors: let clap
            // print them and exit 0 the way it normally would.
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            eprint!("{err}");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let path = match &cli.command {
        Command::Tokenize { path }
        | Command::Parse { path }
        | Command::Evaluate { path }
        | Command::Run { path } => path,
    };

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: could not read file {}: {}", path.display(), err);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let code = match cli.command {
        Command::Tokenize { .. } => run_tokenize(&source),
        Command::Parse { .. } => run_parse(&source),
        Command::Evaluate { .. } => run_evaluate(&source),
        Command::Run { .. } => run_program(&source),
    };

    ExitCode::from(code)
}

/// `tokenize` mode (spec.md §6): one formatted token per line, lexical
/// errors to stderr, exit 65 if any occurred.
fn run_tokenize(source: &str) -> u8 {
    let (tokens, errors) = lox_treewalk::lexer::Scanner::new(source).scan_tokens();

    for error in &errors {
        eprintln!("{error}");
    }
    for token in &tokens {
        println!("{}", token.tokenize_form());
    }

    if errors.is_empty() { EXIT_SUCCESS } else { EXIT_DATA_ERROR }
}

/// `parse` mode (spec.md §6): the parenthesized AST form of each
/// top-level expression, lex+parse errors to stderr.
fn run_parse(source: &str) -> u8 {
    let (expressions, lex_errors, syntax_errors) = parse_expressions(source);

    for error in &lex_errors {
        eprintln!("{error}");
    }
    for error in &syntax_errors {
        eprintln!("{error}");
    }
    for expr in &expressions {
        println!("{}", lox_treewalk::printer::print_expr(expr));
    }

    if lex_errors.is_empty() && syntax_errors.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_DATA_ERROR
    }
}

/// `evaluate` mode (spec.md §6): the value of each top-level expression,
/// rendered in parse context. Lex+parse errors stop before any
/// evaluation happens; a runtime error aborts at the offending expression.
fn run_evaluate(source: &str) -> u8 {
    let (expressions, lex_errors, syntax_errors) = parse_expressions(source);

    for error in &lex_errors {
        eprintln!("{error}");
    }
    for error in &syntax_errors {
        eprintln!("{error}");
    }
    if !lex_errors.is_empty() || !syntax_errors.is_empty() {
        return EXIT_DATA_ERROR;
    }

    for expr in &expressions {
        let (locals, resolve_errors) =
            resolve(&[lox_treewalk::ast::Stmt::Expression(expr.clone())]);
        if !resolve_errors.is_empty() {
            for error in &resolve_errors {
                eprintln!("{error}");
            }
            return EXIT_DATA_ERROR;
        }

        let interpreter = lox_treewalk::interpreter::Interpreter::new(locals);
        match interpreter.interpret_expression(expr) {
            Ok(value) => println!("{}", format_value(&value)),
            Err(err) => {
                eprintln!("{err}");
                return EXIT_RUNTIME_ERROR;
            }
        }
    }

    EXIT_SUCCESS
}

fn format_value(value: &lox_treewalk::value::Value) -> String {
    value.to_parse_string()
}

/// `run` mode (spec.md §6): execute the whole program. Lex/parse/resolve
/// errors stop the pipeline before interpretation; a runtime error aborts
/// execution at the offending statement.
fn run_program(source: &str) -> u8 {
    let outcome = parse_program(source);

    for error in &outcome.lex_errors {
        eprintln!("{error}");
    }
    for error in &outcome.syntax_errors {
        eprintln!("{error}");
    }
    if outcome.had_error() {
        return EXIT_DATA_ERROR;
    }

    let (locals, resolve_errors) = resolve(&outcome.statements);
    if !resolve_errors.is_empty() {
        for error in &resolve_errors {
            eprintln!("{error}");
        }
        return EXIT_DATA_ERROR;
    }

    match interpret(&outcome.statements, locals) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            EXIT_RUNTIME_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_reports_success_for_clean_source() {
        assert_eq!(run_tokenize("1 + 2;"), EXIT_SUCCESS);
    }

    #[test]
    fn tokenize_reports_exit_65_on_lexical_error() {
        assert_eq!(run_tokenize("@"), EXIT_DATA_ERROR);
    }

    #[test]
    fn parse_reports_exit_65_on_syntax_error() {
        assert_eq!(run_parse("(1 + 2"), EXIT_DATA_ERROR);
    }

    #[test]
    fn evaluate_reports_exit_70_on_runtime_error() {
        assert_eq!(run_evaluate("\"a\" + 1;"), EXIT_RUNTIME_ERROR);
    }

    #[test]
    fn run_reports_exit_65_on_resolver_error() {
        assert_eq!(run_program("return 1;"), EXIT_DATA_ERROR);
    }

    #[test]
    fn run_reports_success_for_a_clean_program() {
        assert_eq!(run_program("print 1 + 2;"), EXIT_SUCCESS);
    }
}
