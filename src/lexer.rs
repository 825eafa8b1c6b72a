use chumsky::prelude::*;

use crate::token::Token;

/// A lexing failure for a single line.
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
}

impl LexError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

pub fn lexer<'a>()
-> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| Token::Number(s.parse().unwrap()));

    // A leading-dot number like `.5`.
    let dot_number = just('.')
        .then(text::digits(10))
        .to_slice()
        .map(|s: &str| Token::Number(s.parse().unwrap()));

    let string = just('"')
        .ignore_then(none_of('"').repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(Token::Str);

    let word = text::ident().map(|s: &str| Token::Word(s.to_string()));

    let op = choice((
        just('{').to(Token::Brace('{')),
        just('}').to(Token::Brace('}')),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBrack),
        just(']').to(Token::RBrack),
        just(',').to(Token::Comma),
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('^').to(Token::Caret),
        just('%').to(Token::Percent),
        just('?').to(Token::Question),
    ));

    let token = number
        .or(dot_number)
        .or(string)
        .or(word)
        .or(op)
        .map_with(|tok, e| (tok, e.span()))
        .padded();

    token.repeated().collect().then_ignore(end())
}

/// Tokenizes one raw source line.
///
/// Everything from the first `#` onward is treated as a comment; a line that
/// is empty after comment stripping yields an empty token sequence. The
/// adjacency-sensitive forms are resolved here: an identifier immediately
/// followed by `(` becomes [`Token::FuncCall`] with its restricted argument
/// list, and `mila` immediately followed by `?` becomes [`Token::Exists`].
pub fn tokenize_line(line: &str) -> Result<Vec<Token>, LexError> {
    let raw = line.split('#').next().unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let spanned = match lexer().parse(raw).into_output() {
        Some(tokens) => tokens,
        None => return Err(diagnose(raw)),
    };

    resolve_adjacency(spanned)
}

/// Second pass over the spanned token stream: fold `mila` + `?` into EXISTS
/// and identifier + `(` into a function call, validating the call's argument
/// sub-grammar (literals, identifiers and commas only, closed by `)`).
fn resolve_adjacency(spanned: Vec<(Token, SimpleSpan)>) -> Result<Vec<Token>, LexError> {
    let mut out = Vec::with_capacity(spanned.len());
    let mut i = 0;

    while i < spanned.len() {
        let (tok, span) = &spanned[i];
        match tok {
            Token::Word(word) => {
                let adjacent_next = spanned
                    .get(i + 1)
                    .filter(|(_, next_span)| next_span.start == span.end)
                    .map(|(next, _)| next);

                match adjacent_next {
                    Some(Token::Question) => {
                        if word.eq_ignore_ascii_case("mila") {
                            out.push(Token::Exists);
                            i += 2;
                        } else {
                            return Err(LexError::new("unexpected character '?'"));
                        }
                    }
                    Some(Token::LParen) => {
                        out.push(Token::FuncCall(word.clone()));
                        out.push(Token::LParen);
                        i += 2;
                        loop {
                            match spanned.get(i).map(|(t, _)| t) {
                                Some(Token::RParen) => {
                                    out.push(Token::RParen);
                                    i += 1;
                                    break;
                                }
                                Some(
                                    arg @ (Token::Number(_)
                                    | Token::Str(_)
                                    | Token::Word(_)
                                    | Token::Comma),
                                ) => {
                                    out.push(arg.clone());
                                    i += 1;
                                }
                                Some(other) => {
                                    return Err(LexError::new(format!(
                                        "unexpected token in function call: {:?}",
                                        other
                                    )));
                                }
                                None => {
                                    return Err(LexError::new("unterminated function call"));
                                }
                            }
                        }
                    }
                    _ => {
                        out.push(Token::Word(word.clone()));
                        i += 1;
                    }
                }
            }
            Token::Question => return Err(LexError::new("unexpected character '?'")),
            other => {
                out.push(other.clone());
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Recovers a useful message for a line the lexer rejected.
fn diagnose(raw: &str) -> LexError {
    if raw.matches('"').count() % 2 == 1 {
        return LexError::new("unterminated string");
    }
    let mut in_string = false;
    for c in raw.chars() {
        if c == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        let allowed = c.is_whitespace()
            || c.is_ascii_alphanumeric()
            || matches!(c, '_' | '{' | '}' | '(' | ')' | '[' | ']' | ',')
            || matches!(c, '+' | '-' | '*' | '/' | '^' | '%' | '?');
        if !allowed {
            return LexError::new(format!("unexpected character '{}'", c));
        }
    }
    LexError::new("malformed line")
}
