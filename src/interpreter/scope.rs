use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::error::InterpreterError;
use crate::value::Value;

/// Transient per-scope control signals.
///
/// `return_value` distinguishes "never returned" (`None`) from "returned with
/// no operand" (`Some(Value::Unset)`); a bare `lotaao` still stops the body.
#[derive(Debug, Default)]
struct Signals {
    return_value: Option<Value>,
    break_loop: bool,
    continue_loop: bool,
}

/// One scope level: a variable map, an optional parent link, the control
/// signals, and the module export tables.
///
/// A program or module run owns one root scope; every function call gets a
/// fresh child scope that is dropped when the call returns. Lookup walks the
/// parent chain outward and fails if no scope defines the name.
#[derive(Debug, Default)]
pub struct Scope {
    vars: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Scope>>,
    signals: RefCell<Signals>,
    exports: RefCell<IndexMap<String, Value>>,
    exported_fns: RefCell<Vec<String>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Rc<Scope>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Bind or overwrite a variable in this scope only.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.vars.borrow_mut().insert(name.into(), value);
    }

    /// Read a variable from this scope only (no parent walk).
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.vars.borrow().get(name).cloned()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.vars.borrow().contains_key(name)
    }

    pub fn remove_local(&self, name: &str) -> Option<Value> {
        self.vars.borrow_mut().remove(name)
    }

    /// Resolve a variable through the scope chain, innermost first.
    pub fn resolve(&self, name: &str) -> Result<Value, InterpreterError> {
        if let Some(value) = self.vars.borrow().get(name) {
            return Ok(value.clone());
        }
        let mut current = self.parent.clone();
        while let Some(scope) = current {
            if let Some(value) = scope.vars.borrow().get(name) {
                return Ok(value.clone());
            }
            current = scope.parent.clone();
        }
        Err(InterpreterError::undefined_variable(name))
    }

    // --- control signals ---

    pub fn set_return(&self, value: Value) {
        self.signals.borrow_mut().return_value = Some(value);
    }

    pub fn return_value(&self) -> Option<Value> {
        self.signals.borrow().return_value.clone()
    }

    pub fn has_return(&self) -> bool {
        self.signals.borrow().return_value.is_some()
    }

    pub fn set_break(&self) {
        self.signals.borrow_mut().break_loop = true;
    }

    pub fn set_continue(&self) {
        self.signals.borrow_mut().continue_loop = true;
    }

    pub fn break_pending(&self) -> bool {
        self.signals.borrow().break_loop
    }

    pub fn continue_pending(&self) -> bool {
        self.signals.borrow().continue_loop
    }

    /// Read-and-clear the break flag; loops consume the signal they act on.
    pub fn take_break(&self) -> bool {
        std::mem::take(&mut self.signals.borrow_mut().break_loop)
    }

    pub fn take_continue(&self) -> bool {
        std::mem::take(&mut self.signals.borrow_mut().continue_loop)
    }

    // --- module exports ---

    pub fn export(&self, name: impl Into<String>, value: Value) {
        self.exports.borrow_mut().insert(name.into(), value);
    }

    pub fn export_function(&self, name: impl Into<String>) {
        self.exported_fns.borrow_mut().push(name.into());
    }

    pub fn exports(&self) -> Ref<'_, IndexMap<String, Value>> {
        self.exports.borrow()
    }

    pub fn exported_functions(&self) -> Vec<String> {
        self.exported_fns.borrow().clone()
    }
}
