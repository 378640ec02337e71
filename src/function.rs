// ABOUTME: Closures over a function declaration, callable by the interpreter

use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::instance::LoxInstance;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// A function value: the parsed declaration plus the environment that was
/// active when the `fun` statement (or method) ran, captured by reference
/// so later calls see mutations the closure made to its surrounding scope
/// (spec.md §5 closures).
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Environment,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Environment, is_initializer: bool) -> Self {
        LoxFunction {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    pub fn declaration(&self) -> &Rc<FunctionDecl> {
        &self.declaration
    }

    pub fn closure(&self) -> &Environment {
        &self.closure
    }

    pub fn is_initializer(&self) -> bool {
        self.is_initializer
    }

    /// Produces a copy of this function whose closure is a fresh scope
    /// binding `this` to `instance`, used when a method is looked up on an
    /// instance (spec.md §5 `this`/methods).
    pub fn bind(&self, instance: Rc<RefCell<LoxInstance>>) -> LoxFunction {
        let env = Environment::child_of(&self.closure);
        env.define("this", Value::Instance(instance));
        LoxFunction {
            declaration: Rc::clone(&self.declaration),
            closure: env,
            is_initializer: self.is_initializer,
        }
    }
}
