// ABOUTME: Tree-walking evaluator: executes statements and evaluates expressions

use crate::ast::{Expr, ExprKind, LiteralValue, Stmt};
use crate::class::LoxClass;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::function::LoxFunction;
use crate::instance::LoxInstance;
use crate::native;
use crate::token::TokenKind;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Unwinds the call stack for either an uncaught runtime error or a
/// `return` statement. An explicit result sum stands in for the
/// original walker's exception-based control flow (spec.md §9).
#[derive(Debug)]
pub enum Unwind {
    Error(RuntimeError),
    Return(Value),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

type EvalResult<T> = Result<T, Unwind>;

pub struct Interpreter {
    globals: Environment,
    locals: HashMap<u32, usize>,
}

impl Interpreter {
    pub fn new(locals: HashMap<u32, usize>) -> Self {
        let globals = Environment::new_global();
        globals.define("clock", Value::Native(Rc::new(native::CLOCK)));
        Interpreter { globals, locals }
    }

    /// Executes a full program, stopping (and reporting) at the first
    /// uncaught runtime error (spec.md §4.4/§6).
    pub fn interpret(&self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let env = self.globals.clone();
        for stmt in statements {
            match self.execute(stmt, &env) {
                Ok(()) => {}
                Err(Unwind::Error(err)) => return Err(err),
                Err(Unwind::Return(_)) => {
                    // A bare top-level `return` is rejected by the resolver;
                    // reaching here would be a resolver bug, not user input.
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Evaluates a single expression for `evaluate` mode.
    pub fn interpret_expression(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        let env = self.globals.clone();
        match self.evaluate(expr, &env) {
            Ok(value) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
            Err(Unwind::Return(_)) => unreachable!("a bare expression cannot contain `return`"),
        }
    }

    fn execute(&self, stmt: &Stmt, env: &Environment) -> EvalResult<()> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr, env)?;
                println!("{}", value.to_run_string());
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                env.define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(statements) => {
                let block_env = Environment::child_of(env);
                self.execute_block(statements, &block_env)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.execute(then_branch, env)
                } else if let Some(branch) = else_branch {
                    self.execute(branch, env)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition, env)?.is_truthy() {
                    self.execute(body, env)?;
                }
                Ok(())
            }
            Stmt::Function(decl) => {
                let function = LoxFunction::new(Rc::clone(decl), env.clone(), false);
                env.define(decl.name.lexeme.clone(), Value::Function(Rc::new(function)));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods, env),
        }
    }

    fn execute_class(
        &self,
        name: &crate::token::Token,
        superclass: Option<&Expr>,
        methods: &[Rc<crate::ast::FunctionDecl>],
        env: &Environment,
    ) -> EvalResult<()> {
        let superclass_value = match superclass {
            Some(expr) => {
                let value = self.evaluate(expr, env)?;
                match value {
                    Value::Class(class) => Some(class),
                    _ => return Err(RuntimeError::superclass_must_be_a_class(expr.line).into()),
                }
            }
            None => None,
        };

        env.define(name.lexeme.clone(), Value::Nil);

        let methods_env = if let Some(superclass) = &superclass_value {
            let super_env = Environment::child_of(env);
            super_env.define("super", Value::Class(Rc::clone(superclass)));
            super_env
        } else {
            env.clone()
        };

        let mut method_table = HashMap::new();
        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function = LoxFunction::new(Rc::clone(method), methods_env.clone(), is_initializer);
            method_table.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = LoxClass::new(name.lexeme.clone(), superclass_value, method_table);
        env.assign_at(0, &name.lexeme, Value::Class(Rc::new(class)));
        Ok(())
    }

    /// Runs a statement list in `env`, propagating the first error or
    /// return unwind. Used for blocks and function bodies alike.
    fn execute_block(&self, statements: &[Stmt], env: &Environment) -> EvalResult<()> {
        for stmt in statements {
            self.execute(stmt, env)?;
        }
        Ok(())
    }

    fn evaluate(&self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(literal_to_value(value)),
            ExprKind::Grouping(inner) => self.evaluate(inner, env),
            ExprKind::Unary { op, right } => self.evaluate_unary(op, right, expr.line, env),
            ExprKind::Binary { left, op, right } => self.evaluate_binary(left, op, right, expr.line, env),
            ExprKind::Logical { left, op, right } => self.evaluate_logical(left, op, right, env),
            ExprKind::Variable { name } => self.lookup_variable(expr.id, name, env),
            ExprKind::Assign { name, value } => {
                let value = self.evaluate(value, env)?;
                match self.locals.get(&expr.id) {
                    Some(&distance) => env.assign_at(distance, &name.lexeme, value.clone()),
                    None => env.assign_global(&name.lexeme, value.clone(), name.line)?,
                }
                Ok(value)
            }
            ExprKind::Call { callee, paren, arguments } => {
                self.evaluate_call(callee, paren, arguments, env)
            }
            ExprKind::Get { object, name } => {
                let object = self.evaluate(object, env)?;
                match object {
                    Value::Instance(instance) => {
                        Ok(LoxInstance::get(&instance, &name.lexeme, name.line)?)
                    }
                    _ => Err(RuntimeError::only_instances_have_fields(name.line).into()),
                }
            }
            ExprKind::Set { object, name, value } => {
                let object = self.evaluate(object, env)?;
                match object {
                    Value::Instance(instance) => {
                        let value = self.evaluate(value, env)?;
                        instance.borrow_mut().set(name.lexeme.clone(), value.clone());
                        Ok(value)
                    }
                    _ => Err(RuntimeError::only_instances_have_fields(name.line).into()),
                }
            }
            ExprKind::This { keyword } => self.lookup_variable(expr.id, keyword, env),
            ExprKind::Super { keyword, .. } => {
                Err(RuntimeError::super_not_supported(keyword.line).into())
            }
        }
    }

    fn lookup_variable(&self, expr_id: u32, name: &crate::token::Token, env: &Environment) -> EvalResult<Value> {
        match self.locals.get(&expr_id) {
            Some(&distance) => Ok(env.get_at(distance, &name.lexeme)),
            None => Ok(env.get_global(&name.lexeme, name.line)?),
        }
    }

    fn evaluate_unary(&self, op: &crate::token::Token, right: &Expr, line: usize, env: &Environment) -> EvalResult<Value> {
        let right = self.evaluate(right, env)?;
        match op.kind {
            TokenKind::Minus => {
                let n = as_number(&right, line)?;
                Ok(Value::Number(-n))
            }
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("parser only produces ! and - unary operators"),
        }
    }

    fn evaluate_logical(&self, left: &Expr, op: &crate::token::Token, right: &Expr, env: &Environment) -> EvalResult<Value> {
        let left = self.evaluate(left, env)?;
        match op.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(right, env),
        }
    }

    fn evaluate_binary(
        &self,
        left: &Expr,
        op: &crate::token::Token,
        right: &Expr,
        line: usize,
        env: &Environment,
    ) -> EvalResult<Value> {
        let left = self.evaluate(left, env)?;
        let right = self.evaluate(right, env)?;

        match op.kind {
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
                _ => Err(RuntimeError::operands_must_be_two_numbers_or_two_strings(line).into()),
            },
            TokenKind::Minus => {
                let (a, b) = as_numbers(&left, &right, line)?;
                Ok(Value::Number(a - b))
            }
            TokenKind::Star => {
                let (a, b) = as_numbers(&left, &right, line)?;
                Ok(Value::Number(a * b))
            }
            TokenKind::Slash => {
                let (a, b) = as_numbers(&left, &right, line)?;
                Ok(Value::Number(a / b))
            }
            TokenKind::Greater => {
                let (a, b) = as_numbers(&left, &right, line)?;
                Ok(Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                let (a, b) = as_numbers(&left, &right, line)?;
                Ok(Value::Bool(a >= b))
            }
            TokenKind::Less => {
                let (a, b) = as_numbers(&left, &right, line)?;
                Ok(Value::Bool(a < b))
            }
            TokenKind::LessEqual => {
                let (a, b) = as_numbers(&left, &right, line)?;
                Ok(Value::Bool(a <= b))
            }
            TokenKind::EqualEqual => Ok(Value::Bool(left.equals(&right))),
            TokenKind::BangEqual => Ok(Value::Bool(!left.equals(&right))),
            _ => unreachable!("parser only produces binary-level operators here"),
        }
    }

    fn evaluate_call(
        &self,
        callee: &Expr,
        paren: &crate::token::Token,
        arguments: &[Expr],
        env: &Environment,
    ) -> EvalResult<Value> {
        let callee = self.evaluate(callee, env)?;
        let mut args = Vec::with_capacity(arguments.len());
        for arg in arguments {
            args.push(self.evaluate(arg, env)?);
        }

        match callee {
            Value::Function(function) => self.call_function(&function, args, paren.line),
            Value::Native(native) => {
                if args.len() != native.arity {
                    return Err(RuntimeError::arity_mismatch(native.arity, args.len(), paren.line).into());
                }
                Ok((native.func)(&args))
            }
            Value::Class(class) => self.instantiate(&class, args, paren.line),
            _ => Err(RuntimeError::not_callable(paren.line).into()),
        }
    }

    fn call_function(&self, function: &Rc<LoxFunction>, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        if args.len() != function.arity() {
            return Err(RuntimeError::arity_mismatch(function.arity(), args.len(), line).into());
        }

        let call_env = Environment::child_of(function.closure());
        for (param, arg) in function.declaration().params.iter().zip(args) {
            call_env.define(param.lexeme.clone(), arg);
        }

        match self.execute_block(&function.declaration().body, &call_env) {
            Ok(()) => {
                if function.is_initializer() {
                    Ok(function.closure().get_at(0, "this"))
                } else {
                    Ok(Value::Nil)
                }
            }
            Err(Unwind::Return(value)) => {
                if function.is_initializer() {
                    Ok(function.closure().get_at(0, "this"))
                } else {
                    Ok(value)
                }
            }
            Err(err @ Unwind::Error(_)) => Err(err),
        }
    }

    fn instantiate(&self, class: &Rc<LoxClass>, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        if args.len() != class.arity() {
            return Err(RuntimeError::arity_mismatch(class.arity(), args.len(), line).into());
        }

        let instance = Rc::new(RefCell::new(LoxInstance::new(Rc::clone(class))));
        if let Some(initializer) = class.find_method("init") {
            let bound = Rc::new(initializer.bind(Rc::clone(&instance)));
            self.call_function(&bound, args, line)?;
        }

        Ok(Value::Instance(instance))
    }
}

fn literal_to_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Nil => Value::Nil,
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::String(s) => Value::string(s.clone()),
    }
}

fn as_number(value: &Value, line: usize) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::operands_must_be_numbers(line)),
    }
}

fn as_numbers(left: &Value, right: &Value, line: usize) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::operands_must_be_numbers(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use crate::resolver::Resolver;

    fn run(src: &str) -> Result<(), RuntimeError> {
        let (tokens, lex_errors) = Scanner::new(src).scan_tokens();
        assert!(lex_errors.is_empty());
        let (statements, parse_errors) = Parser::new(&tokens).parse();
        assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");
        let (locals, resolve_errors) = Resolver::new().resolve(&statements);
        assert!(resolve_errors.is_empty(), "unexpected resolve errors: {resolve_errors:?}");
        Interpreter::new(locals).interpret(&statements)
    }

    fn eval(src: &str) -> Value {
        let (tokens, _) = Scanner::new(src).scan_tokens();
        let (expr, errors) = Parser::new(&tokens).parse_expression();
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        let expr = expr.unwrap();
        let (locals, _) = Resolver::new().resolve(&[Stmt::Expression(expr.clone())]);
        Interpreter::new(locals).interpret_expression(&expr).unwrap()
    }

    #[test]
    fn arithmetic_and_string_concatenation() {
        assert!(eval("1 + 2 * 3").equals(&Value::Number(7.0)));
        assert!(eval("\"a\" + \"b\"").equals(&Value::string("ab")));
    }

    #[test]
    fn mixed_plus_operands_is_a_runtime_error() {
        let src = "1 + \"a\";";
        let err = run(src).unwrap_err();
        assert_eq!(err.to_string(), "Operands must be two numbers or two strings.\n[line 1]");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let src = r#"
            fun makeCounter() {
                var count = 0;
                fun increment() {
                    count = count + 1;
                    return count;
                }
                return increment;
            }
            var counter = makeCounter();
            if (counter() != 1) { print "fail1"; }
            if (counter() != 2) { print "fail2"; }
        "#;
        run(src).unwrap();
    }

    #[test]
    fn class_construction_and_method_dispatch() {
        let src = r#"
            class Greeter {
                init(name) {
                    this.name = name;
                }
                greet() {
                    return "hi " + this.name;
                }
            }
            var g = Greeter("Ada");
            if (g.greet() != "hi Ada") { print "fail"; }
        "#;
        run(src).unwrap();
    }

    #[test]
    fn inherited_methods_resolve_through_superclass_chain() {
        let src = r#"
            class Animal {
                speak() { return "..."; }
            }
            class Dog < Animal {}
            var d = Dog();
            if (d.speak() != "...") { print "fail"; }
        "#;
        run(src).unwrap();
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        let err = run("print nope;").unwrap_err();
        assert_eq!(err.to_string(), "undefined variable nope\n[line 1]");
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let err = run("var x = 1; x();").unwrap_err();
        assert_eq!(err.to_string(), "can only call functions and classes\n[line 1]");
    }
}
