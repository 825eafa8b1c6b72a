use std::rc::Rc;

use super::error::InterpreterError;
use super::scope::Scope;
use crate::format::display_value;
use crate::token::Token;
use crate::value::Value;

/// Evaluates a token slice as one expression against a scope.
///
/// The grammar is small on purpose: arithmetic with the usual precedence,
/// unary minus, the postfix `mila?` existence check, parenthesized groups,
/// list literals, and the `sach`/`jhoot`/`khaali` keywords. Anything left
/// over after the expression ends is a syntax error.
pub fn evaluate(tokens: &[Token], scope: &Rc<Scope>) -> Result<Value, InterpreterError> {
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        scope,
    };
    let value = parser.expression()?;
    if parser.pos < parser.tokens.len() {
        return Err(InterpreterError::syntax("unexpected tokens after expression"));
    }
    Ok(value)
}

/// Recursive-descent expression parser over an already-lexed line.
///
/// Precedence, loosest to tightest: `+ -`, `* / %`, `^`, unary `-`,
/// postfix `mila?`.
struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    scope: &'a Rc<Scope>,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expression(&mut self) -> Result<Value, InterpreterError> {
        self.additive()
    }

    fn additive(&mut self) -> Result<Value, InterpreterError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    lhs = add_values(&lhs, &rhs)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    lhs = sub_values(&lhs, &rhs)?;
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Value, InterpreterError> {
        let mut lhs = self.power()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.power()?;
                    lhs = mul_values(&lhs, &rhs)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.power()?;
                    lhs = div_values(&lhs, &rhs)?;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    let rhs = self.power()?;
                    lhs = rem_values(&lhs, &rhs)?;
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    // Left-associative: `2 ^ 3 ^ 2` is `(2 ^ 3) ^ 2`.
    fn power(&mut self) -> Result<Value, InterpreterError> {
        let mut lhs = self.unary()?;
        while matches!(self.peek(), Some(Token::Caret)) {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = pow_values(&lhs, &rhs)?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Value, InterpreterError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.pos += 1;
            let operand = self.unary()?;
            return neg_value(&operand);
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Value, InterpreterError> {
        let mut value = self.primary()?;
        while matches!(self.peek(), Some(Token::Exists)) {
            self.pos += 1;
            value = Value::Bool(value.exists());
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Value, InterpreterError> {
        let tok = self
            .advance()
            .ok_or_else(|| InterpreterError::syntax("expected an expression"))?
            .clone();
        match tok {
            Token::Number(n) => Ok(Value::Number(n)),
            Token::Str(s) => Ok(Value::string(s)),
            Token::Word(w) => {
                if w.eq_ignore_ascii_case("sach") {
                    Ok(Value::Bool(true))
                } else if w.eq_ignore_ascii_case("jhoot") {
                    Ok(Value::Bool(false))
                } else if w.eq_ignore_ascii_case("khaali") {
                    Ok(Value::Null)
                } else {
                    self.scope.resolve(&w)
                }
            }
            Token::LParen => {
                let inner = self.expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(InterpreterError::syntax("expected ')'")),
                }
            }
            Token::LBrack => self.list_literal(),
            other => Err(InterpreterError::syntax(format!(
                "unexpected token {:?} in expression",
                other
            ))),
        }
    }

    fn list_literal(&mut self) -> Result<Value, InterpreterError> {
        let mut items = Vec::new();
        if matches!(self.peek(), Some(Token::RBrack)) {
            self.pos += 1;
            return Ok(Value::list(items));
        }
        loop {
            items.push(self.expression()?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RBrack) => break,
                _ => return Err(InterpreterError::syntax("expected ',' or ']' in list")),
            }
        }
        Ok(Value::list(items))
    }
}

// --- arithmetic helpers, shared with the ADD/MINUS/... commands ---

/// `+` concatenates when either side is a string, adds numbers otherwise.
pub(crate) fn add_values(lhs: &Value, rhs: &Value) -> Result<Value, InterpreterError> {
    match (lhs, rhs) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::string(format!(
            "{}{}",
            display_value(lhs),
            display_value(rhs)
        ))),
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        _ => Err(InterpreterError::type_error(format!(
            "cannot add {} and {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

pub(crate) fn sub_values(lhs: &Value, rhs: &Value) -> Result<Value, InterpreterError> {
    numeric_op(lhs, rhs, "subtract", |a, b| a - b)
}

pub(crate) fn mul_values(lhs: &Value, rhs: &Value) -> Result<Value, InterpreterError> {
    numeric_op(lhs, rhs, "multiply", |a, b| a * b)
}

/// Plain IEEE division; `x / 0` yields an infinity here. The `DIVIDE`
/// statement rejects a zero divisor before calling this.
pub(crate) fn div_values(lhs: &Value, rhs: &Value) -> Result<Value, InterpreterError> {
    numeric_op(lhs, rhs, "divide", |a, b| a / b)
}

pub(crate) fn rem_values(lhs: &Value, rhs: &Value) -> Result<Value, InterpreterError> {
    numeric_op(lhs, rhs, "take the remainder of", |a, b| a % b)
}

pub(crate) fn pow_values(lhs: &Value, rhs: &Value) -> Result<Value, InterpreterError> {
    numeric_op(lhs, rhs, "exponentiate", |a, b| a.powf(b))
}

pub(crate) fn neg_value(value: &Value) -> Result<Value, InterpreterError> {
    match value {
        Value::Number(n) => Ok(Value::Number(-n)),
        other => Err(InterpreterError::type_error(format!(
            "cannot negate {}",
            other.type_name()
        ))),
    }
}

fn numeric_op(
    lhs: &Value,
    rhs: &Value,
    verb: &str,
    op: impl Fn(f64, f64) -> f64,
) -> Result<Value, InterpreterError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(op(*a, *b))),
        _ => Err(InterpreterError::type_error(format!(
            "cannot {} {} and {}",
            verb,
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}
