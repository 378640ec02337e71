// ABOUTME: Instances: a class reference plus a mutable field map

use crate::class::LoxClass;
use crate::error::RuntimeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct LoxInstance {
    pub class: Rc<LoxClass>,
    fields: HashMap<String, Value>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        LoxInstance {
            class,
            fields: HashMap::new(),
        }
    }

    /// Looks up a property, checking fields before methods (spec.md §5:
    /// a field shadows a method of the same name). A method hit is bound
    /// to `this` pointing back at `instance`.
    pub fn get(instance: &Rc<RefCell<LoxInstance>>, name: &str, line: usize) -> Result<Value, RuntimeError> {
        {
            let borrowed = instance.borrow();
            if let Some(value) = borrowed.fields.get(name) {
                return Ok(value.clone());
            }
        }

        let class = Rc::clone(&instance.borrow().class);
        if let Some(method) = class.find_method(name) {
            let bound = method.bind(Rc::clone(instance));
            return Ok(Value::Function(Rc::new(bound)));
        }

        Err(RuntimeError::undefined_property(name, line))
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}
