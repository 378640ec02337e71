// ABOUTME: Static scope-depth pass that precomputes variable resolution distances

use crate::ast::{Expr, ExprKind, FunctionDecl, Stmt};
use crate::error::SyntaxError;
use crate::token::Token;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Resolves every variable reference to a lexical-scope distance ahead of
/// interpretation, the same separation of concerns as the original
/// walker's resolver pass (spec.md §4.3). Distances are keyed by each
/// expression's stable id rather than by AST node identity/pointer,
/// which is the natural Rust substitute (spec.md §9).
pub struct Resolver {
    scopes: Vec<HashMap<String, bool>>,
    locals: HashMap<u32, usize>,
    current_function: FunctionType,
    current_class: ClassType,
    errors: Vec<SyntaxError>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            scopes: Vec::new(),
            locals: HashMap::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            errors: Vec::new(),
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> (HashMap<u32, usize>, Vec<SyntaxError>) {
        self.resolve_statements(statements);
        (self.locals, self.errors)
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(branch) = else_branch {
                    self.resolve_stmt(branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::Function(decl) => {
                self.declare_as(&decl.name, "function");
                self.define(&decl.name);
                self.resolve_function(decl, FunctionType::Function);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error(keyword, "Can't return from top-level code");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(keyword, "Can't return a value from initializer");
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Class { name, superclass, methods } => {
                self.resolve_class(name, superclass.as_ref(), methods);
            }
        }
    }

    fn resolve_class(&mut self, name: &Token, superclass: Option<&Expr>, methods: &[std::rc::Rc<FunctionDecl>]) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(name);
        self.define(name);

        if let Some(Expr { kind: ExprKind::Variable { name: super_name }, .. }) = superclass {
            if super_name.lexeme == name.lexeme {
                self.error(super_name, "a class can't inherit from itself");
            }
            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass.unwrap());
            self.begin_scope();
            self.scopes
                .last_mut()
                .expect("scope just pushed")
                .insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes
            .last_mut()
            .expect("scope just pushed")
            .insert("this".to_string(), true);

        for method in methods {
            let declaration = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, declaration);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &decl.params {
            self.declare_as(param, "parameter");
            self.define(param);
        }
        self.resolve_statements(&decl.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Grouping(inner) => self.resolve_expr(inner),
            ExprKind::Unary { right, .. } => self.resolve_expr(right),
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Variable { name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.error(name, "Can't read local variable in its own initializer");
                    }
                }
                self.resolve_local(expr.id, name);
            }
            ExprKind::Assign { name, value } => {
                self.resolve_expr(value);
                self.resolve_local(expr.id, name);
            }
            ExprKind::Call { callee, arguments, .. } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }
            ExprKind::Get { object, .. } => self.resolve_expr(object),
            ExprKind::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            ExprKind::This { keyword } => {
                if self.current_class == ClassType::None {
                    self.error(keyword, "Can't use 'this' outside of a class");
                    return;
                }
                self.resolve_local(expr.id, keyword);
            }
            ExprKind::Super { keyword, .. } => {
                match self.current_class {
                    ClassType::None => self.error(keyword, "Can't use 'super' outside of a class."),
                    ClassType::Class => self.error(keyword, "Can't use 'super' in a class with no superclass."),
                    ClassType::Subclass => {}
                }
                self.error(keyword, "'super' is not supported.");
            }
        }
    }

    fn resolve_local(&mut self, expr_id: u32, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(expr_id, depth);
                return;
            }
        }
        // Not found in any scope: treated as a global, resolved by name at
        // runtime (spec.md §9 expression-identity note).
    }

    fn declare(&mut self, name: &Token) {
        self.declare_as(name, "variable");
    }

    /// Declares `name` in the innermost scope, reporting a duplicate with
    /// wording keyed by what's being declared (the original walker
    /// distinguishes "variable"/"function"/"parameter" redeclarations
    /// even though they share one underlying shadowing rule).
    fn declare_as(&mut self, name: &Token, kind: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                self.error(name, &format!("Already a {kind} with this name in this scope"));
            }
            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn error(&mut self, token: &Token, message: &str) {
        self.errors.push(SyntaxError::at_token(token.line, token.lexeme.clone(), message));
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
