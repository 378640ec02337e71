// ABOUTME: Lexical scope chain mapping names to values

use crate::error::RuntimeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct EnvironmentData {
    values: RefCell<HashMap<String, Value>>,
    parent: Option<Environment>,
}

/// A scope is an `Rc` handle so closures can share it by reference: a
/// `FunctionStmt`'s closure keeps its declaration-time environment alive,
/// and mutations through one handle are visible through every other
/// handle over the same scope (spec.md §5).
#[derive(Clone, Debug)]
pub struct Environment(Rc<EnvironmentData>);

impl Environment {
    pub fn new_global() -> Self {
        Environment(Rc::new(EnvironmentData {
            values: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    pub fn child_of(parent: &Environment) -> Self {
        Environment(Rc::new(EnvironmentData {
            values: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        }))
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.values.borrow_mut().insert(name.into(), value);
    }

    pub fn get_at(&self, distance: usize, name: &str) -> Value {
        self.ancestor(distance)
            .0
            .values
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or(Value::Nil)
    }

    pub fn assign_at(&self, distance: usize, name: &str, value: Value) {
        self.ancestor(distance)
            .0
            .values
            .borrow_mut()
            .insert(name.to_string(), value);
    }

    /// Reads a global by name, used when the resolver found no local
    /// binding (spec.md invariant (i): globals have no side-table entry).
    pub fn get_global(&self, name: &str, line: usize) -> Result<Value, RuntimeError> {
        self.global()
            .0
            .values
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name, line))
    }

    pub fn assign_global(&self, name: &str, value: Value, line: usize) -> Result<(), RuntimeError> {
        let global = self.global();
        let mut values = global.0.values.borrow_mut();
        if !values.contains_key(name) {
            return Err(RuntimeError::undefined_variable(name, line));
        }
        values.insert(name.to_string(), value);
        Ok(())
    }

    fn ancestor(&self, distance: usize) -> Environment {
        let mut env = self.clone();
        for _ in 0..distance {
            env = env
                .0
                .parent
                .clone()
                .expect("resolver-computed depth must stay within the environment chain");
        }
        env
    }

    fn global(&self) -> Environment {
        let mut env = self.clone();
        while let Some(parent) = env.0.parent.clone() {
            env = parent;
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_and_reads_in_same_scope() {
        let env = Environment::new_global();
        env.define("x", Value::Number(42.0));
        assert!(env.get_at(0, "x").equals(&Value::Number(42.0)));
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Environment::new_global();
        parent.define("x", Value::Number(1.0));
        let child = Environment::child_of(&parent);
        child.define("x", Value::Number(2.0));

        assert!(child.get_at(0, "x").equals(&Value::Number(2.0)));
        assert!(child.get_at(1, "x").equals(&Value::Number(1.0)));
    }

    #[test]
    fn assign_at_mutates_shared_scope() {
        let parent = Environment::new_global();
        parent.define("x", Value::Number(1.0));
        let child = Environment::child_of(&parent);

        child.assign_at(1, "x", Value::Number(9.0));
        assert!(parent.get_at(0, "x").equals(&Value::Number(9.0)));
    }

    #[test]
    fn undefined_global_is_a_runtime_error() {
        let env = Environment::new_global();
        assert!(env.get_global("missing", 3).is_err());
    }

    #[test]
    fn global_assign_requires_prior_definition() {
        let env = Environment::new_global();
        assert!(env.assign_global("missing", Value::Nil, 1).is_err());
        env.define("x", Value::Nil);
        assert!(env.assign_global("x", Value::Number(5.0), 1).is_ok());
    }
}
