// ABOUTME: Class objects: a name, an optional superclass, and a method table

use crate::function::LoxFunction;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct LoxClass {
    pub name: String,
    pub superclass: Option<Rc<LoxClass>>,
    methods: HashMap<String, Rc<LoxFunction>>,
}

impl LoxClass {
    pub fn new(
        name: impl Into<String>,
        superclass: Option<Rc<LoxClass>>,
        methods: HashMap<String, Rc<LoxFunction>>,
    ) -> Self {
        LoxClass {
            name: name.into(),
            superclass,
            methods,
        }
    }

    /// Looks up a method on this class, falling back through the
    /// superclass chain (spec.md §5 inheritance).
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass
            .as_ref()
            .and_then(|super_class| super_class.find_method(name))
    }

    /// A class's arity is its `init` method's arity, or zero if it has
    /// none (spec.md §5 construction).
    pub fn arity(&self) -> usize {
        self.find_method("init").map(|f| f.arity()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FunctionDecl;
    use crate::environment::Environment;
    use crate::token::{Literal, Token, TokenKind};

    fn make_method(name: &str, params: usize) -> Rc<LoxFunction> {
        let decl = Rc::new(FunctionDecl {
            name: Token::new(TokenKind::Identifier, name, Literal::None, 1),
            params: (0..params)
                .map(|i| Token::new(TokenKind::Identifier, format!("p{i}"), Literal::None, 1))
                .collect(),
            body: Vec::new(),
        });
        Rc::new(LoxFunction::new(decl, Environment::new_global(), name == "init"))
    }

    #[test]
    fn finds_method_on_superclass_when_missing_locally() {
        let mut super_methods = HashMap::new();
        super_methods.insert("greet".to_string(), make_method("greet", 0));
        let superclass = Rc::new(LoxClass::new("Animal", None, super_methods));

        let subclass = LoxClass::new("Dog", Some(superclass), HashMap::new());
        assert!(subclass.find_method("greet").is_some());
        assert!(subclass.find_method("missing").is_none());
    }

    #[test]
    fn arity_comes_from_init_method() {
        let mut methods = HashMap::new();
        methods.insert("init".to_string(), make_method("init", 2));
        let class = LoxClass::new("Point", None, methods);
        assert_eq!(class.arity(), 2);
    }

    #[test]
    fn arity_is_zero_without_init() {
        let class = LoxClass::new("Empty", None, HashMap::new());
        assert_eq!(class.arity(), 0);
    }
}
