// ABOUTME: Parenthesized-prefix AST printer used by `parse` mode

use crate::ast::{Expr, ExprKind, LiteralValue};
use crate::value::{format_number, NumberMode};

/// Renders an expression the way `parse` mode prints it: a fully
/// parenthesized prefix form, e.g. `(+ 1 2)` or `(group (* 2 3))`
/// (spec.md §6).
pub fn print_expr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(value) => print_literal(value),
        ExprKind::Grouping(inner) => parenthesize("group", &[inner]),
        ExprKind::Unary { op, right } => parenthesize(&op.lexeme, &[right]),
        ExprKind::Binary { left, op, right } => parenthesize(&op.lexeme, &[left, right]),
        ExprKind::Logical { left, op, right } => parenthesize(&op.lexeme, &[left, right]),
        ExprKind::Variable { name } => name.lexeme.clone(),
        ExprKind::Assign { name, value } => {
            format!("(= {} {})", name.lexeme, print_expr(value))
        }
        ExprKind::Call { callee, arguments, .. } => {
            let args = arguments.iter().map(print_expr).collect::<Vec<_>>().join(", ");
            format!("{}({})", print_expr(callee), args)
        }
        ExprKind::Get { object, name } => format!("(. {} {})", print_expr(object), name.lexeme),
        ExprKind::Set { object, name, value } => {
            format!("(set {} {} {})", print_expr(object), name.lexeme, print_expr(value))
        }
        ExprKind::This { .. } => "this".to_string(),
        ExprKind::Super { method, .. } => format!("(super {})", method.lexeme),
    }
}

fn print_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Nil => "nil".to_string(),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Number(n) => format_number(*n, NumberMode::Parse),
        LiteralValue::String(s) => s.clone(),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut out = format!("({name}");
    for expr in exprs {
        out.push(' ');
        out.push_str(&print_expr(expr));
    }
    out.push(')');
    out
}
