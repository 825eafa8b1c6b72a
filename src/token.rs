/// A single token from one line of source text.
///
/// Tokens are produced fresh per line and carry no cross-line identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal, always stored as a float.
    Number(f64),
    /// Double-quoted string literal (quotes stripped, no escapes).
    Str(String),
    /// Identifier or command keyword.
    Word(String),
    /// Identifier immediately followed by `(` — a parenthesized call.
    FuncCall(String),
    LParen,
    RParen,
    LBrack,
    RBrack,
    /// `{` or `}`; block delimiters are one token type with the raw character.
    Brace(char),
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    /// The postfix existence check, spelled `mila?` in source.
    Exists,
    /// A bare `?`. Only ever an intermediate lexer output: the post-pass
    /// either folds it into [`Token::Exists`] or rejects the line.
    Question,
}

impl Token {
    pub fn word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }

    /// True for `Word` tokens equal to `keyword`, ignoring ASCII case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}
