use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::lexer::LexError;

#[derive(Debug, Clone)]
pub enum InterpreterError {
    Syntax { message: String },
    UnknownCommand { command: String },
    UndefinedVariable { name: String },
    UndefinedFunction { name: String },
    DuplicateFunction { name: String },
    Type { message: String },
    DivisionByZero,
    Arity { name: String, expected: usize, got: usize },
    Module { path: PathBuf, message: String },
    /// A lower-level error annotated with where it happened: the 1-based line
    /// number and the trimmed source text of that line.
    AtLine {
        line: usize,
        source: String,
        inner: Box<InterpreterError>,
    },
}

impl InterpreterError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    pub fn undefined_variable(name: impl Into<String>) -> Self {
        Self::UndefinedVariable { name: name.into() }
    }

    pub fn undefined_function(name: impl Into<String>) -> Self {
        Self::UndefinedFunction { name: name.into() }
    }

    pub fn duplicate_function(name: impl Into<String>) -> Self {
        Self::DuplicateFunction { name: name.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
        }
    }

    pub fn arity(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::Arity {
            name: name.into(),
            expected,
            got,
        }
    }

    pub fn module(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Module {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn at_line(line: usize, source: impl Into<String>, inner: InterpreterError) -> Self {
        Self::AtLine {
            line,
            source: source.into(),
            inner: Box::new(inner),
        }
    }

    /// Unwraps any `AtLine` annotation layers down to the original error.
    pub fn root_cause(&self) -> &InterpreterError {
        match self {
            Self::AtLine { inner, .. } => inner.root_cause(),
            other => other,
        }
    }

    /// The innermost annotated line number, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, inner, .. } => Some(inner.line().unwrap_or(*line)),
            _ => None,
        }
    }

    fn code(&self) -> &'static str {
        match self.root_cause() {
            Self::Syntax { .. } => "E0101",
            Self::UnknownCommand { .. } => "E0102",
            Self::UndefinedVariable { .. } => "E0201",
            Self::UndefinedFunction { .. } => "E0202",
            Self::DuplicateFunction { .. } => "E0203",
            Self::Type { .. } => "E0204",
            Self::DivisionByZero => "E0205",
            Self::Arity { .. } => "E0206",
            Self::Module { .. } => "E0301",
            Self::AtLine { .. } => unreachable!("root_cause never returns AtLine"),
        }
    }

    /// Convert to a diagnostic for pretty printing
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.root_cause().to_string()).with_code(self.code());
        if let Some(line) = self.line() {
            diag = diag.with_line(line);
        }
        if let Self::UndefinedVariable { .. } = self.root_cause() {
            diag = diag.with_help("declare it first with `hai` or `YAAR`");
        }
        diag
    }
}

impl From<LexError> for InterpreterError {
    fn from(err: LexError) -> Self {
        Self::Syntax {
            message: err.message,
        }
    }
}

impl std::fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax { message } => write!(f, "syntax error: {}", message),
            Self::UnknownCommand { command } => write!(f, "unknown command \"{}\"", command),
            Self::UndefinedVariable { name } => write!(f, "unknown variable \"{}\"", name),
            Self::UndefinedFunction { name } => write!(f, "function \"{}\" not found", name),
            Self::DuplicateFunction { name } => {
                write!(f, "function \"{}\" is already defined", name)
            }
            Self::Type { message } => write!(f, "type error: {}", message),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Arity {
                name,
                expected,
                got,
            } => write!(
                f,
                "function \"{}\" expects {} arguments, but got {}",
                name, expected, got
            ),
            Self::Module { path, message } => {
                write!(f, "cannot load module '{}': {}", path.display(), message)
            }
            Self::AtLine {
                line,
                source,
                inner,
            } => write!(f, "{}\n  -> Line {}: {}", inner, line, source),
        }
    }
}

impl std::error::Error for InterpreterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_annotation_display() {
        let err = InterpreterError::at_line(3, "ADD x 4", InterpreterError::undefined_variable("x"));
        let text = err.to_string();
        assert!(text.contains("unknown variable \"x\""));
        assert!(text.contains("-> Line 3: ADD x 4"));
    }

    #[test]
    fn test_root_cause_unwraps_nested_annotations() {
        let err = InterpreterError::at_line(
            2,
            "lao \"util.hindi\"",
            InterpreterError::at_line(5, "DIVIDE x 0", InterpreterError::DivisionByZero),
        );
        assert!(matches!(err.root_cause(), InterpreterError::DivisionByZero));
        assert_eq!(err.line(), Some(5));
    }
}
