use std::rc::Rc;

use super::error::InterpreterError;
use super::eval;
use super::functions::FunctionManager;
use super::runner::Runner;
use super::scope::Scope;
use crate::format::display_value;
use crate::token::Token;
use crate::value::Value;

/// Executes one already-tokenized statement line.
///
/// Dispatch order matters: the `name hai expr` assignment form is recognized
/// before command keywords so a variable named `print` still assigns, and an
/// unrecognized head word falls through to plain expression evaluation before
/// it becomes an unknown-command error.
pub fn interpret_line(
    tokens: &[Token],
    scope: &Rc<Scope>,
    fns: &FunctionManager,
    runner: &mut Runner,
) -> Result<(), InterpreterError> {
    if tokens.is_empty() {
        return Ok(());
    }

    if let Token::FuncCall(name) = &tokens[0] {
        let args = simple_call_args(&tokens[1..], scope)?;
        fns.execute(name, args, scope, runner)?;
        return Ok(());
    }

    // `<name> hai <expr>` assignment.
    if tokens.len() >= 3 && tokens[0].word().is_some() && tokens[1].is_keyword("hai") {
        let name = tokens[0].word().unwrap_or_default().to_string();
        let value = eval::evaluate(&tokens[2..], scope)?;
        scope.define(name, value);
        return Ok(());
    }

    let head = match tokens[0].word() {
        Some(w) => w,
        None => {
            return Err(InterpreterError::syntax("command must start with a word"));
        }
    };

    match head.to_ascii_lowercase().as_str() {
        "bolo" | "print" => run_print(&tokens[1..], scope, fns, runner),
        "lotaao" => {
            let value = if tokens.len() > 1 {
                eval::evaluate(&tokens[1..], scope)?
            } else {
                Value::Unset
            };
            scope.set_return(value);
            Ok(())
        }
        "kaam_karo" => run_kaam_karo(&tokens[1..], scope, fns, runner),
        "add" => run_mutation(&tokens[1..], scope, Mutation::Add),
        "minus" => run_mutation(&tokens[1..], scope, Mutation::Minus),
        "multiply" => run_mutation(&tokens[1..], scope, Mutation::Multiply),
        "divide" => run_mutation(&tokens[1..], scope, Mutation::Divide),
        "yaar" => {
            let name = tokens
                .get(1)
                .and_then(Token::word)
                .ok_or_else(|| InterpreterError::syntax("YAAR needs a variable name"))?
                .to_string();
            let value = eval::evaluate(&tokens[2..], scope)?;
            scope.define(name, value);
            Ok(())
        }
        "bhejo" => run_bhejo(&tokens[1..], scope, fns),
        "bas_kar" => {
            scope.set_break();
            Ok(())
        }
        "agla" => {
            scope.set_continue();
            Ok(())
        }
        "hai" => Err(InterpreterError::syntax(
            "`hai` needs a variable name on its left",
        )),
        _ => {
            // Not a command: maybe the line is a bare expression.
            match eval::evaluate(tokens, scope) {
                Ok(_) => Ok(()),
                Err(_) => Err(InterpreterError::unknown_command(head.to_uppercase())),
            }
        }
    }
}

/// `bolo` / `PRINT`. The one statement position where a parenthesized call
/// prints its result; everything else prints the evaluated expression.
fn run_print(
    rest: &[Token],
    scope: &Rc<Scope>,
    fns: &FunctionManager,
    runner: &mut Runner,
) -> Result<(), InterpreterError> {
    if let Some(Token::FuncCall(name)) = rest.first() {
        if call_spans_rest(rest) {
            let args = split_call_args(&rest[2..rest.len() - 1], scope)?;
            let value = fns.execute(name, args, scope, runner)?;
            runner.emit(display_value(&value));
            return Ok(());
        }
    }
    let value = eval::evaluate(rest, scope)?;
    runner.emit(display_value(&value));
    Ok(())
}

/// True when `rest` is exactly `FuncCall ( ... )` with the closing paren as
/// the final token.
fn call_spans_rest(rest: &[Token]) -> bool {
    rest.len() >= 3
        && matches!(rest.get(1), Some(Token::LParen))
        && matches!(rest.last(), Some(Token::RParen))
}

/// Splits call arguments at top-level commas and evaluates each slice.
fn split_call_args(
    tokens: &[Token],
    scope: &Rc<Scope>,
) -> Result<Vec<Value>, InterpreterError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Token::LParen | Token::LBrack => depth += 1,
            Token::RParen | Token::RBrack => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                args.push(eval::evaluate(&tokens[start..i], scope)?);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(eval::evaluate(&tokens[start..], scope)?);
    Ok(args)
}

/// Arguments of a bare `name(...)` statement line: literals and variable
/// names only, as the lexer guarantees. The call must be the whole
/// statement; tokens after the closing paren are rejected.
fn simple_call_args(
    rest: &[Token],
    scope: &Rc<Scope>,
) -> Result<Vec<Value>, InterpreterError> {
    let mut args = Vec::new();
    for (i, tok) in rest.iter().enumerate() {
        match tok {
            Token::LParen | Token::Comma => {}
            Token::RParen => {
                if i + 1 < rest.len() {
                    return Err(InterpreterError::syntax(
                        "unexpected tokens after the function call",
                    ));
                }
                break;
            }
            Token::Number(n) => args.push(Value::Number(*n)),
            Token::Str(s) => args.push(Value::string(s)),
            Token::Word(_) => args.push(eval::evaluate(std::slice::from_ref(tok), scope)?),
            other => {
                return Err(InterpreterError::syntax(format!(
                    "unexpected token {:?} in function call",
                    other
                )))
            }
        }
    }
    Ok(args)
}

/// `kaam_karo name args...`. A comma anywhere switches to comma-separated
/// expression arguments; otherwise every token is its own argument, except
/// that a parenthesized group stays one argument.
fn run_kaam_karo(
    rest: &[Token],
    scope: &Rc<Scope>,
    fns: &FunctionManager,
    runner: &mut Runner,
) -> Result<(), InterpreterError> {
    let name = rest
        .first()
        .and_then(Token::word)
        .ok_or_else(|| InterpreterError::syntax("kaam_karo needs a function name"))?
        .to_string();
    let arg_tokens = &rest[1..];

    let args = if arg_tokens.iter().any(|t| matches!(t, Token::Comma)) {
        let mut args = Vec::new();
        for slice in arg_tokens.split(|t| matches!(t, Token::Comma)) {
            args.push(eval::evaluate(slice, scope)?);
        }
        args
    } else {
        let mut args = Vec::new();
        let mut i = 0;
        while i < arg_tokens.len() {
            if matches!(arg_tokens[i], Token::LParen) {
                let end = matching_paren(arg_tokens, i)?;
                args.push(eval::evaluate(&arg_tokens[i..=end], scope)?);
                i = end + 1;
            } else {
                args.push(eval::evaluate(&arg_tokens[i..=i], scope)?);
                i += 1;
            }
        }
        args
    };

    fns.execute(&name, args, scope, runner)?;
    Ok(())
}

fn matching_paren(tokens: &[Token], open: usize) -> Result<usize, InterpreterError> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        match tok {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(InterpreterError::syntax("unbalanced parentheses"))
}

enum Mutation {
    Add,
    Minus,
    Multiply,
    Divide,
}

/// `ADD x expr` and friends: read-modify-write on a variable in the CURRENT
/// scope only. A variable that only exists in an enclosing scope is not
/// mutated through; that is an error.
fn run_mutation(
    rest: &[Token],
    scope: &Rc<Scope>,
    mutation: Mutation,
) -> Result<(), InterpreterError> {
    let name = rest
        .first()
        .and_then(Token::word)
        .ok_or_else(|| InterpreterError::syntax("expected a variable name"))?
        .to_string();
    let current = scope
        .get_local(&name)
        .ok_or_else(|| InterpreterError::undefined_variable(&name))?;
    let operand = eval::evaluate(&rest[1..], scope)?;

    let next = match mutation {
        Mutation::Add => eval::add_values(&current, &operand)?,
        Mutation::Minus => eval::sub_values(&current, &operand)?,
        Mutation::Multiply => eval::mul_values(&current, &operand)?,
        Mutation::Divide => {
            if operand == Value::Number(0.0) {
                return Err(InterpreterError::DivisionByZero);
            }
            eval::div_values(&current, &operand)?
        }
    };
    scope.define(name, next);
    Ok(())
}

/// `BHEJO name [expr]`: records a module export. With no expression the
/// current value of `name` is exported; a name that is only a function gets
/// recorded as a function export instead.
fn run_bhejo(
    rest: &[Token],
    scope: &Rc<Scope>,
    fns: &FunctionManager,
) -> Result<(), InterpreterError> {
    let name = rest
        .first()
        .and_then(Token::word)
        .ok_or_else(|| InterpreterError::syntax("BHEJO needs a name to export"))?
        .to_string();

    if rest.len() > 1 {
        let value = eval::evaluate(&rest[1..], scope)?;
        scope.export(name, value);
        return Ok(());
    }

    match scope.resolve(&name) {
        Ok(value) => {
            scope.export(name, value);
            Ok(())
        }
        Err(InterpreterError::UndefinedVariable { .. }) if fns.contains(&name) => {
            scope.export_function(name);
            Ok(())
        }
        Err(err) => Err(err),
    }
}
