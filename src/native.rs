// ABOUTME: Built-in native functions exposed in the global scope

use crate::value::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// A host-implemented callable, distinguished from `LoxFunction` so the
/// interpreter's call dispatch can skip environment/closure setup for it
/// (spec.md §4.4).
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> Value,
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// Seconds since the Unix epoch, as a float, matching the original
/// walker's `time.Now()`-backed `clock()` (spec.md §4.4, ported from
/// `original_source`).
fn clock(_args: &[Value]) -> Value {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs_f64();
    Value::Number(seconds)
}

pub const CLOCK: NativeFunction = NativeFunction {
    name: "clock",
    arity: 0,
    func: clock,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_returns_a_nonnegative_number() {
        match (CLOCK.func)(&[]) {
            Value::Number(n) => assert!(n > 0.0),
            other => panic!("expected a number, got {other:?}"),
        }
    }
}
