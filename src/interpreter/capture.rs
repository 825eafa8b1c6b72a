use super::error::InterpreterError;
use crate::token::Token;

/// The block-opening control keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Agar,
    NahiTo,
    Warna,
    JabTak,
    HarEk,
}

impl BlockKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("agar") {
            Some(Self::Agar)
        } else if word.eq_ignore_ascii_case("nahi_to") {
            Some(Self::NahiTo)
        } else if word.eq_ignore_ascii_case("warna") {
            Some(Self::Warna)
        } else if word.eq_ignore_ascii_case("jab_tak") {
            Some(Self::JabTak)
        } else if word.eq_ignore_ascii_case("har_ek") {
            Some(Self::HarEk)
        } else {
            None
        }
    }
}

/// A fully captured control block: the header line's tokens and the raw body
/// lines between the braces. The closing-brace line is never part of the body.
#[derive(Debug)]
pub struct BlockCapture {
    pub kind: BlockKind,
    pub header: Vec<Token>,
    pub body: Vec<String>,
}

/// Counts `{` minus `}` in raw line text. Brace depth is tracked on the raw
/// text so a malformed line cannot desynchronize capture.
pub fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    for c in line.chars() {
        match c {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Line collector for one control block.
///
/// The runner feeds it raw lines between `start` and the line where the brace
/// depth returns to zero; nesting is handled by depth counting, not by
/// recursive parsing, so inner blocks pass through as plain body text.
#[derive(Debug, Default)]
pub struct ControlParser {
    active: Option<BlockCapture>,
    depth: i32,
}

impl ControlParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, kind: BlockKind, header: Vec<Token>) -> Result<(), InterpreterError> {
        if self.active.is_some() {
            return Err(InterpreterError::syntax(
                "already capturing a control block",
            ));
        }
        self.active = Some(BlockCapture {
            kind,
            header,
            body: Vec::new(),
        });
        self.depth = 0;
        Ok(())
    }

    /// Folds one raw line's braces into the depth. Returns true when the
    /// block just closed.
    pub fn handle_brace(&mut self, raw_line: &str) -> bool {
        self.depth += brace_delta(raw_line);
        self.depth <= 0
    }

    pub fn add_line(&mut self, line: &str) {
        if let Some(block) = self.active.as_mut() {
            block.body.push(line.to_string());
        }
    }

    pub fn finish(&mut self) -> Option<BlockCapture> {
        self.depth = 0;
        self.active.take()
    }
}

/// Line collector for a `function` / `kaam` definition body. Functions do not
/// nest, so starting a second capture while one is open is an error.
#[derive(Debug, Default)]
pub struct FunctionCapture {
    active: Option<PendingFunction>,
    depth: i32,
}

#[derive(Debug)]
pub struct PendingFunction {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<String>,
}

impl FunctionCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(
        &mut self,
        name: String,
        parameters: Vec<String>,
    ) -> Result<(), InterpreterError> {
        if self.active.is_some() {
            return Err(InterpreterError::syntax(
                "cannot define a function inside another function",
            ));
        }
        self.active = Some(PendingFunction {
            name,
            parameters,
            body: Vec::new(),
        });
        self.depth = 0;
        Ok(())
    }

    pub fn handle_brace(&mut self, raw_line: &str) -> bool {
        self.depth += brace_delta(raw_line);
        self.depth <= 0
    }

    pub fn add_line(&mut self, line: &str) {
        if let Some(func) = self.active.as_mut() {
            func.body.push(line.to_string());
        }
    }

    pub fn finish(&mut self) -> Option<PendingFunction> {
        self.depth = 0;
        self.active.take()
    }
}
