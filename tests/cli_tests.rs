// ABOUTME: Black-box CLI tests exercising the tokenize/parse/evaluate/run commands end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn script(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp script file");
    write!(file, "{source}").expect("failed to write temp script file");
    file
}

fn bin() -> Command {
    Command::cargo_bin("lox-treewalk").expect("failed to locate built binary")
}

#[test]
fn run_prints_arithmetic_result() {
    let file = script("print 1 + 2;");
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("3\n"));
}

#[test]
fn run_demonstrates_block_scope_shadowing() {
    let file = script("var a = 1; { var a = 2; print a; } print a;");
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("2\n1\n"));
}

#[test]
fn run_demonstrates_closures_sharing_captured_state() {
    let source = r#"
        fun mk(){var i=0; fun inc(){i=i+1; return i;} return inc;}
        var f = mk();
        print f();
        print f();
        print f();
    "#;
    let file = script(source);
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("1\n2\n3\n"));
}

#[test]
fn run_demonstrates_single_inheritance_method_dispatch() {
    let source = r#"class A { greet(){ return "hi"; } } class B < A {} print B().greet();"#;
    let file = script(source);
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("hi\n"));
}

#[test]
fn run_demonstrates_initializer_convention() {
    let source = r#"class C { init(x){ this.x = x; } } var c = C(7); print c.x;"#;
    let file = script(source);
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("7\n"));
}

#[test]
fn run_demonstrates_for_loop_desugaring() {
    let file = script("for (var i=0; i<3; i=i+1) print i;");
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("0\n1\n2\n"));
}

#[test]
fn run_reports_mixed_plus_operand_runtime_error_with_exit_70() {
    let file = script(r#"print "a" + 1;"#);
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Operands must be"));
}

#[test]
fn run_reports_unterminated_string_with_exit_65() {
    let file = script("\"unterminated");
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Unterminated string."));
}

#[test]
fn run_reports_self_initializer_read_with_exit_65() {
    let file = script("{ var x = x; }");
    bin().arg("run").arg(file.path()).assert().code(65);
}

#[test]
fn run_reports_top_level_return_with_exit_65() {
    let file = script("return;");
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Can't return from top-level code"));
}

#[test]
fn run_reports_calling_a_non_callable_with_exit_70() {
    let file = script("var x = 1; x();");
    bin().arg("run").arg(file.path()).assert().code(70);
}

#[test]
fn run_reports_arity_mismatch() {
    let file = script("fun f(a, b) { return a + b; } f(1);");
    bin()
        .arg("run")
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(predicate::str::contains("expected 2 arguments but got 1"));
}

#[test]
fn tokenize_prints_one_token_per_line_ending_in_eof() {
    let file = script("(1 + 2)");
    bin()
        .arg("tokenize")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("LEFT_PAREN ( null\n"))
        .stdout(predicate::str::contains("EOF  null"));
}

#[test]
fn tokenize_reports_unexpected_character_and_exits_65() {
    let file = script("@");
    bin()
        .arg("tokenize")
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Unexpected character: @"));
}

#[test]
fn parse_prints_parenthesized_ast_for_each_expression() {
    let file = script("1 + 2 * 3;");
    bin()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("(+ 1.0 (* 2.0 3.0))\n"));
}

#[test]
fn parse_reports_syntax_error_with_exit_65() {
    let file = script("(1 + 2");
    bin()
        .arg("parse")
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Expect ')' after expression."));
}

#[test]
fn evaluate_prints_the_value_of_each_top_level_expression() {
    let file = script("1 + 2; \"a\" + \"b\";");
    bin()
        .arg("evaluate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("3.0\nab\n"));
}

#[test]
fn evaluate_reports_runtime_error_with_exit_70() {
    let file = script(r#""a" + 1;"#);
    bin()
        .arg("evaluate")
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Operands must be"));
}

#[test]
fn missing_file_reports_exit_1() {
    bin()
        .arg("run")
        .arg("/nonexistent/path/to/a/script.lox")
        .assert()
        .code(1);
}

#[test]
fn unknown_subcommand_reports_exit_1() {
    bin().arg("bogus").assert().code(1);
}
