use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use super::error::InterpreterError;
use super::runner::Runner;
use super::scope::Scope;
use super::statement;
use crate::token::Token;
use crate::value::Value;

/// A user-defined function: its parameter names and pre-tokenized body lines.
///
/// The defining scope is kept only so imported functions stay alive together
/// with the module scope they were written against; calls do NOT close over
/// it. A call body runs in a child of the CALLER's scope, so bodies can read
/// the caller's variables.
#[derive(Debug)]
pub struct FunctionDef {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<Vec<Token>>,
    #[allow(dead_code)]
    pub defining_scope: Rc<Scope>,
}

/// Registry of functions for one program or module run, plus the active call
/// stack used for recursion-aware logging.
#[derive(Debug, Default)]
pub struct FunctionManager {
    functions: RefCell<IndexMap<String, Rc<FunctionDef>>>,
    call_stack: RefCell<Vec<String>>,
}

impl FunctionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new function. Redefinition is an error.
    pub fn define(&self, def: FunctionDef) -> Result<(), InterpreterError> {
        let mut functions = self.functions.borrow_mut();
        if functions.contains_key(&def.name) {
            return Err(InterpreterError::duplicate_function(&def.name));
        }
        functions.insert(def.name.clone(), Rc::new(def));
        Ok(())
    }

    /// Register a function imported from a module, skipping names already
    /// present. Importing the same module twice is a no-op, not an error.
    pub fn adopt(&self, def: Rc<FunctionDef>) {
        let mut functions = self.functions.borrow_mut();
        if !functions.contains_key(&def.name) {
            functions.insert(def.name.clone(), def);
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.functions.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.borrow().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.functions.borrow().keys().cloned().collect()
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.borrow().len()
    }

    /// Call a function with already-evaluated arguments.
    ///
    /// The body executes in a fresh scope whose parent is the caller's scope,
    /// with the parameters bound positionally. Execution stops at the first
    /// `lotaao`; a body that never returns yields `Value::Unset`.
    pub fn execute(
        &self,
        name: &str,
        args: Vec<Value>,
        caller: &Rc<Scope>,
        runner: &mut Runner,
    ) -> Result<Value, InterpreterError> {
        let def = self
            .get(name)
            .ok_or_else(|| InterpreterError::undefined_function(name))?;
        if args.len() != def.parameters.len() {
            return Err(InterpreterError::arity(
                name,
                def.parameters.len(),
                args.len(),
            ));
        }

        let child = Rc::new(Scope::with_parent(Rc::clone(caller)));
        for (param, arg) in def.parameters.iter().zip(args) {
            child.define(param, arg);
        }

        self.call_stack.borrow_mut().push(name.to_string());
        let result = self.run_body(&def, &child, runner);
        self.call_stack.borrow_mut().pop();
        result
    }

    fn run_body(
        &self,
        def: &FunctionDef,
        scope: &Rc<Scope>,
        runner: &mut Runner,
    ) -> Result<Value, InterpreterError> {
        for line in &def.body {
            statement::interpret_line(line, scope, self, runner)?;
            if let Some(value) = scope.return_value() {
                return Ok(value);
            }
        }
        Ok(Value::Unset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_line;

    fn body(lines: &[&str]) -> Vec<Vec<Token>> {
        lines.iter().map(|l| tokenize_line(l).unwrap()).collect()
    }

    fn def(name: &str, params: &[&str], lines: &[&str]) -> FunctionDef {
        FunctionDef {
            name: name.to_string(),
            parameters: params.iter().map(|p| p.to_string()).collect(),
            body: body(lines),
            defining_scope: Rc::new(Scope::new()),
        }
    }

    #[test]
    fn test_call_returns_value() {
        let fns = FunctionManager::new();
        fns.define(def("double", &["n"], &["lotaao n * 2"])).unwrap();

        let mut runner = Runner::capturing();
        let caller = Rc::new(Scope::new());
        let value = fns
            .execute("double", vec![Value::Number(5.0)], &caller, &mut runner)
            .unwrap();
        assert_eq!(value, Value::Number(10.0));
        assert_eq!(fns.call_depth(), 0);
    }

    #[test]
    fn test_body_without_return_yields_unset() {
        let fns = FunctionManager::new();
        fns.define(def("shor", &[], &["bolo \"hello\""])).unwrap();

        let mut runner = Runner::capturing();
        let caller = Rc::new(Scope::new());
        let value = fns.execute("shor", vec![], &caller, &mut runner).unwrap();
        assert_eq!(value, Value::Unset);
        assert_eq!(runner.captured(), &["hello"]);
    }

    #[test]
    fn test_bare_return_stops_the_body() {
        let fns = FunctionManager::new();
        fns.define(def("ruko", &[], &["lotaao", "bolo \"unreachable\""]))
            .unwrap();

        let mut runner = Runner::capturing();
        let caller = Rc::new(Scope::new());
        let value = fns.execute("ruko", vec![], &caller, &mut runner).unwrap();
        assert_eq!(value, Value::Unset);
        assert!(runner.captured().is_empty());
    }

    #[test]
    fn test_body_reads_caller_scope() {
        let fns = FunctionManager::new();
        fns.define(def("padho", &[], &["lotaao sandesh"])).unwrap();

        let mut runner = Runner::capturing();
        let caller = Rc::new(Scope::new());
        caller.define("sandesh", Value::string("namaste"));
        let value = fns.execute("padho", vec![], &caller, &mut runner).unwrap();
        assert_eq!(value, Value::string("namaste"));
    }

    #[test]
    fn test_arity_mismatch() {
        let fns = FunctionManager::new();
        fns.define(def("jodo", &["a", "b"], &["lotaao a + b"]))
            .unwrap();

        let mut runner = Runner::capturing();
        let caller = Rc::new(Scope::new());
        let err = fns
            .execute("jodo", vec![Value::Number(1.0)], &caller, &mut runner)
            .unwrap_err();
        assert!(matches!(
            err,
            InterpreterError::Arity {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_definition_rejected_but_adopt_is_idempotent() {
        let fns = FunctionManager::new();
        fns.define(def("ek", &[], &["lotaao 1"])).unwrap();
        assert!(matches!(
            fns.define(def("ek", &[], &["lotaao 2"])),
            Err(InterpreterError::DuplicateFunction { .. })
        ));

        let copy = fns.get("ek").unwrap();
        fns.adopt(copy);
        assert!(fns.contains("ek"));
    }
}
