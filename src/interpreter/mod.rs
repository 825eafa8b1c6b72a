pub mod capture;
pub mod error;
pub mod eval;
pub mod functions;
pub mod runner;
pub mod scope;
pub mod statement;

pub use error::InterpreterError;
pub use functions::{FunctionDef, FunctionManager};
pub use runner::{Module, OutputSink, Runner};
pub use scope::Scope;
