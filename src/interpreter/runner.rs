use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use super::capture::{brace_delta, BlockCapture, BlockKind, ControlParser, FunctionCapture, PendingFunction};
use super::error::InterpreterError;
use super::functions::{FunctionDef, FunctionManager};
use super::scope::Scope;
use super::statement;
use crate::lexer::tokenize_line;
use crate::token::Token;
use crate::value::Value;

/// Upper bound on `jab_tak` iterations; the loop exits silently when hit.
const LOOP_CEILING: usize = 100_000;

/// Where `bolo` output goes. Capturing is for embedding and tests.
#[derive(Debug)]
pub enum OutputSink {
    Stdout,
    Capture(Vec<String>),
}

/// The result of running a program or an imported file: its root scope (with
/// the export tables) and its function registry.
#[derive(Debug, Clone)]
pub struct Module {
    pub scope: Rc<Scope>,
    pub functions: Rc<FunctionManager>,
}

/// Executes whole programs line by line and services `lao` imports.
///
/// Each imported file runs once per runner; subsequent imports of the same
/// resolved path replay the cached module's exports. Files currently being
/// loaded are tracked so import cycles degrade to no-ops instead of
/// recursing forever.
#[derive(Debug)]
pub struct Runner {
    cache: HashMap<PathBuf, Module>,
    loading: HashSet<PathBuf>,
    base_dirs: Vec<PathBuf>,
    out: OutputSink,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            loading: HashSet::new(),
            base_dirs: Vec::new(),
            out: OutputSink::Stdout,
        }
    }

    /// A runner that buffers `bolo` output instead of printing it.
    pub fn capturing() -> Self {
        Self {
            cache: HashMap::new(),
            loading: HashSet::new(),
            base_dirs: Vec::new(),
            out: OutputSink::Capture(Vec::new()),
        }
    }

    pub fn emit(&mut self, line: String) {
        match &mut self.out {
            OutputSink::Stdout => println!("{}", line),
            OutputSink::Capture(buffer) => buffer.push(line),
        }
    }

    pub fn captured(&self) -> &[String] {
        match &self.out {
            OutputSink::Stdout => &[],
            OutputSink::Capture(buffer) => buffer,
        }
    }

    pub fn take_output(&mut self) -> Vec<String> {
        match &mut self.out {
            OutputSink::Stdout => Vec::new(),
            OutputSink::Capture(buffer) => std::mem::take(buffer),
        }
    }

    /// Run a whole program. `path` anchors relative `lao` imports and keys
    /// the module cache; pass `None` for anonymous sources, which resolve
    /// imports against the working directory.
    pub fn run_program(
        &mut self,
        source: &str,
        path: Option<&Path>,
    ) -> Result<Module, InterpreterError> {
        let key = path.map(normalize);
        if let Some(key) = &key {
            self.loading.insert(key.clone());
            self.base_dirs
                .push(key.parent().map(Path::to_path_buf).unwrap_or_default());
        }

        let result = self.exec_program(source);

        if let Some(key) = key {
            self.base_dirs.pop();
            self.loading.remove(&key);
            if let Ok(module) = &result {
                self.cache.insert(key, module.clone());
            }
        }
        result
    }

    fn exec_program(&mut self, source: &str) -> Result<Module, InterpreterError> {
        let scope = Rc::new(Scope::new());
        let functions = Rc::new(FunctionManager::new());
        let lines: Vec<String> = source.lines().map(String::from).collect();
        self.exec_lines(&lines, 0, &scope, &functions, false)?;
        Ok(Module { scope, functions })
    }

    /// The line engine. `base` is the 0-based file index of `lines[0]`, used
    /// for error attribution. With `stop_on_signals` set, execution halts as
    /// soon as a return, break, or continue signal is raised; block bodies
    /// run with it set, whole programs without.
    fn exec_lines(
        &mut self,
        lines: &[String],
        base: usize,
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
        stop_on_signals: bool,
    ) -> Result<(), InterpreterError> {
        let mut func_capture = FunctionCapture::new();
        let mut ctrl = ControlParser::new();
        let mut ctrl_body_base = 0usize;
        let mut ln = 0usize;

        while ln < lines.len() {
            let current = ln;
            let raw = lines[current].clone();
            self.step(
                lines,
                &raw,
                &mut ln,
                base,
                &mut func_capture,
                &mut ctrl,
                &mut ctrl_body_base,
                scope,
                fns,
            )
            .map_err(|e| InterpreterError::at_line(base + current + 1, raw.trim(), e))?;

            if stop_on_signals
                && (scope.has_return() || scope.break_pending() || scope.continue_pending())
            {
                return Ok(());
            }
            ln += 1;
        }

        if func_capture.is_capturing() {
            return Err(InterpreterError::syntax("unterminated function definition"));
        }
        if ctrl.is_capturing() {
            return Err(InterpreterError::syntax("unterminated control block"));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn step(
        &mut self,
        lines: &[String],
        raw: &str,
        ln: &mut usize,
        base: usize,
        func_capture: &mut FunctionCapture,
        ctrl: &mut ControlParser,
        ctrl_body_base: &mut usize,
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
    ) -> Result<(), InterpreterError> {
        let current = *ln;

        // A function body is being collected; lines are stored, not run.
        if func_capture.is_capturing() {
            if func_capture.handle_brace(raw) {
                if let Some(pending) = func_capture.finish() {
                    define_function(pending, scope, fns)?;
                }
            } else {
                func_capture.add_line(raw);
            }
            return Ok(());
        }

        // Same for a control block body.
        if ctrl.is_capturing() {
            if ctrl.handle_brace(raw) {
                if let Some(block) = ctrl.finish() {
                    self.execute_block(block, lines, ln, base, base + *ctrl_body_base, scope, fns)?;
                }
            } else {
                ctrl.add_line(raw);
            }
            return Ok(());
        }

        let tokens = tokenize_line(raw)?;
        if tokens.is_empty() {
            return Ok(());
        }

        // Function definition header.
        if tokens[0].is_keyword("function") || tokens[0].is_keyword("kaam") {
            return self.start_function(&tokens, raw, func_capture, scope, fns);
        }

        // Control block header.
        if let Some(kind) = tokens.first().and_then(Token::word).and_then(BlockKind::from_keyword) {
            if matches!(kind, BlockKind::NahiTo | BlockKind::Warna) {
                return Err(InterpreterError::syntax(
                    "nahi_to/warna without a preceding agar",
                ));
            }
            if !raw.contains('{') {
                return Err(InterpreterError::syntax("expected '{' after the condition"));
            }
            ctrl.start(kind, tokens)?;
            let closed = ctrl.handle_brace(raw);
            // Text after the `{` becomes body[0] and lives on the header
            // line itself; error attribution has to account for that.
            *ctrl_body_base = current + 1;
            if let Some(trailing) = inline_body_text(raw, closed) {
                ctrl.add_line(&trailing);
                *ctrl_body_base = current;
            }
            if closed {
                if let Some(block) = ctrl.finish() {
                    self.execute_block(block, lines, ln, base, base + current, scope, fns)?;
                }
            }
            return Ok(());
        }

        if tokens[0].is_keyword("lao") {
            return self.import(&tokens, scope, fns);
        }

        statement::interpret_line(&tokens, scope, fns, self)
    }

    /// Parse a `function name params... {` header. A body completed on the
    /// same line is split into statements and registered immediately;
    /// otherwise capture begins.
    fn start_function(
        &mut self,
        tokens: &[Token],
        raw: &str,
        func_capture: &mut FunctionCapture,
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
    ) -> Result<(), InterpreterError> {
        let name = tokens
            .get(1)
            .and_then(Token::word)
            .ok_or_else(|| InterpreterError::syntax("function definition needs a name"))?
            .to_string();

        let mut parameters = Vec::new();
        let mut i = 2;
        while let Some(param) = tokens.get(i).and_then(Token::word) {
            parameters.push(param.to_string());
            i += 1;
        }
        if !matches!(tokens.get(i), Some(Token::Brace('{'))) {
            return Err(InterpreterError::syntax(
                "expected '{' after the function header",
            ));
        }

        if brace_delta(raw) <= 0 {
            // `function double n { lotaao n * 2 }` on one line.
            let inner = inline_body_text(raw, true).unwrap_or_default();
            let body = split_inline_statements(&tokenize_line(&inner)?);
            fns.define(FunctionDef {
                name,
                parameters,
                body,
                defining_scope: Rc::clone(scope),
            })?;
            return Ok(());
        }

        func_capture.start(name, parameters)?;
        func_capture.handle_brace(raw);
        if let Some(trailing) = inline_body_text(raw, false) {
            func_capture.add_line(&trailing);
        }
        Ok(())
    }

    /// Run one captured control block. `body_base` is the 0-based file index
    /// of the line holding the first body statement (the header line itself
    /// when text follows its `{`); `ln` sits on the block's closing line and
    /// is advanced past any `nahi_to` / `warna` continuation blocks.
    fn execute_block(
        &mut self,
        block: BlockCapture,
        lines: &[String],
        ln: &mut usize,
        base: usize,
        body_base: usize,
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
    ) -> Result<(), InterpreterError> {
        let cond = header_condition(&block.header);
        match block.kind {
            BlockKind::Agar => {
                let taken = self.eval_condition(cond, "__if_cond", scope, fns)?;
                if taken {
                    self.exec_lines(&block.body, body_base, scope, fns, true)?;
                }
                let mut cursor = *ln + 1;
                let mut done = taken;
                while let Some(chain) = capture_chain_at(lines, cursor)? {
                    if !done {
                        match chain.kind {
                            BlockKind::NahiTo => {
                                let cond = header_condition(&chain.header);
                                if self.eval_condition(cond, "__elif_cond", scope, fns)? {
                                    self.exec_lines(
                                        &chain.body,
                                        base + chain.body_base,
                                        scope,
                                        fns,
                                        true,
                                    )?;
                                    done = true;
                                }
                            }
                            BlockKind::Warna => {
                                self.exec_lines(
                                    &chain.body,
                                    base + chain.body_base,
                                    scope,
                                    fns,
                                    true,
                                )?;
                                done = true;
                            }
                            _ => {}
                        }
                    }
                    cursor = chain.end_ln + 1;
                }
                // The main loop adds one after we return.
                *ln = cursor - 1;
                Ok(())
            }
            BlockKind::JabTak => {
                let mut remaining = LOOP_CEILING;
                while remaining > 0 {
                    remaining -= 1;
                    if !self.eval_condition(cond, "__while_cond", scope, fns)? {
                        break;
                    }
                    self.exec_lines(&block.body, body_base, scope, fns, true)?;
                    if scope.has_return() {
                        break;
                    }
                    if scope.take_break() {
                        break;
                    }
                    scope.take_continue();
                }
                Ok(())
            }
            BlockKind::HarEk => {
                self.execute_har_ek(&block, body_base, scope, fns)
            }
            BlockKind::NahiTo | BlockKind::Warna => Err(InterpreterError::syntax(
                "nahi_to/warna without a preceding agar",
            )),
        }
    }

    fn execute_har_ek(
        &mut self,
        block: &BlockCapture,
        body_base: usize,
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
    ) -> Result<(), InterpreterError> {
        let header = header_condition(&block.header);
        let var = header
            .first()
            .and_then(Token::word)
            .filter(|_| header.get(1).is_some_and(|t| t.is_keyword("in")))
            .ok_or_else(|| {
                InterpreterError::syntax("har_ek syntax: har_ek <name> in <expr> { ... }")
            })?
            .to_string();

        let iterable = self.eval_header_expr(&header[2..], "__for_iter", scope, fns)?;
        let items = match iterable.as_list() {
            Some(items) => items.clone(),
            None => {
                return Err(InterpreterError::type_error(format!(
                    "har_ek expects an iterable, got {}",
                    iterable.type_name()
                )))
            }
        };

        for item in items {
            scope.define(var.as_str(), item);
            self.exec_lines(&block.body, body_base, scope, fns, true)?;
            if scope.has_return() {
                break;
            }
            if scope.take_break() {
                break;
            }
            scope.take_continue();
        }
        Ok(())
    }

    /// Conditions run through the normal assignment statement: the tokens are
    /// spliced into `<tmp> hai <expr>`, the temporary is read back, removed,
    /// and tested for truthiness.
    fn eval_condition(
        &mut self,
        cond: &[Token],
        tmp: &str,
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
    ) -> Result<bool, InterpreterError> {
        Ok(self.eval_header_expr(cond, tmp, scope, fns)?.is_truthy())
    }

    fn eval_header_expr(
        &mut self,
        expr: &[Token],
        tmp: &str,
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
    ) -> Result<Value, InterpreterError> {
        if expr.is_empty() {
            return Err(InterpreterError::syntax("expected a condition"));
        }
        let mut line = vec![
            Token::Word(tmp.to_string()),
            Token::Word("hai".to_string()),
        ];
        line.extend_from_slice(expr);
        statement::interpret_line(&line, scope, fns, self)?;
        let value = scope.get_local(tmp).unwrap_or(Value::Unset);
        scope.remove_local(tmp);
        Ok(value)
    }

    /// `lao "path"`: run the file once and splice its exports into the
    /// importing scope. Cached modules are merged without re-running.
    fn import(
        &mut self,
        tokens: &[Token],
        scope: &Rc<Scope>,
        fns: &Rc<FunctionManager>,
    ) -> Result<(), InterpreterError> {
        let rel = match tokens.get(1) {
            Some(Token::Str(path)) => path.clone(),
            _ => {
                return Err(InterpreterError::syntax("lao needs a quoted file path"));
            }
        };

        let base = match self.base_dirs.last() {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        let candidate = if Path::new(&rel).is_absolute() {
            PathBuf::from(&rel)
        } else {
            base.join(&rel)
        };
        let resolved = normalize(&candidate);

        // Cycles (including self-import) are quietly skipped.
        if self.loading.contains(&resolved) {
            return Ok(());
        }
        if let Some(module) = self.cache.get(&resolved).cloned() {
            merge_module(&module, scope, fns);
            return Ok(());
        }

        let source = fs::read_to_string(&resolved)
            .map_err(|e| InterpreterError::module(&resolved, e.to_string()))?;
        let module = self.run_program(&source, Some(&resolved))?;
        merge_module(&module, scope, fns);
        Ok(())
    }
}

/// Copy a module's exported variables and functions into an importing scope.
/// Function adoption is idempotent, so importing twice never conflicts.
fn merge_module(module: &Module, scope: &Rc<Scope>, fns: &Rc<FunctionManager>) {
    for (name, value) in module.scope.exports().iter() {
        scope.define(name.clone(), value.clone());
    }
    for name in module.scope.exported_functions() {
        if let Some(def) = module.functions.get(&name) {
            fns.adopt(def);
        }
    }
}

fn define_function(
    pending: PendingFunction,
    scope: &Rc<Scope>,
    fns: &Rc<FunctionManager>,
) -> Result<(), InterpreterError> {
    let mut body = Vec::new();
    for line in &pending.body {
        let tokens = tokenize_line(line)?;
        if !tokens.is_empty() {
            body.push(tokens);
        }
    }
    fns.define(FunctionDef {
        name: pending.name,
        parameters: pending.parameters,
        body,
        defining_scope: Rc::clone(scope),
    })
}

/// Header tokens between the opening keyword and the `{`.
fn header_condition(header: &[Token]) -> &[Token] {
    let end = header
        .iter()
        .position(|t| matches!(t, Token::Brace(_)))
        .unwrap_or(header.len());
    &header[1..end]
}

/// Source text after the first `{` on a header line, to be treated as the
/// first body line. With `strip_close` the text after the last `}` is cut
/// too, for blocks that open and close on the same line.
fn inline_body_text(raw: &str, strip_close: bool) -> Option<String> {
    let open = raw.find('{')?;
    let mut inner = &raw[open + 1..];
    if strip_close {
        if let Some(close) = inner.rfind('}') {
            inner = &inner[..close];
        }
    }
    let inner = inner.trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// Split a one-line function body into statements, starting a new one at
/// every command keyword.
fn split_inline_statements(tokens: &[Token]) -> Vec<Vec<Token>> {
    const COMMANDS: &[&str] = &[
        "YAAR", "ADD", "MINUS", "MULTIPLY", "DIVIDE", "PRINT", "BOLO", "KAAM_KARO", "BHEJO",
        "LOTAAO", "BAS_KAR", "AGLA",
    ];
    let mut statements = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    for tok in tokens {
        let is_command = tok
            .word()
            .is_some_and(|w| COMMANDS.contains(&w.to_uppercase().as_str()));
        if is_command && !current.is_empty() {
            statements.push(std::mem::take(&mut current));
        }
        current.push(tok.clone());
    }
    if !current.is_empty() {
        statements.push(current);
    }
    statements
}

/// One `nahi_to` / `warna` continuation block found after an `agar`.
struct ChainBlock {
    kind: BlockKind,
    header: Vec<Token>,
    body: Vec<String>,
    /// 0-based index, within the scanned slice, of the line holding body[0].
    body_base: usize,
    /// 0-based index of the block's last line (the closing brace).
    end_ln: usize,
}

/// Look at `lines[start]` and capture it as a chain block if it opens one.
/// Lines that do not start with `nahi_to` or `warna` end the chain.
fn capture_chain_at(
    lines: &[String],
    start: usize,
) -> Result<Option<ChainBlock>, InterpreterError> {
    let raw = match lines.get(start) {
        Some(line) => line,
        None => return Ok(None),
    };
    let tokens = match tokenize_line(raw) {
        Ok(tokens) => tokens,
        Err(_) => return Ok(None),
    };
    let kind = match tokens.first().and_then(Token::word).and_then(BlockKind::from_keyword) {
        Some(kind @ (BlockKind::NahiTo | BlockKind::Warna)) => kind,
        _ => return Ok(None),
    };

    let mut depth = brace_delta(raw);
    let mut body = Vec::new();
    let mut body_base = start + 1;
    if let Some(trailing) = inline_body_text(raw, depth <= 0) {
        body.push(trailing);
        body_base = start;
    }
    if depth <= 0 {
        return Ok(Some(ChainBlock {
            kind,
            header: tokens,
            body,
            body_base: start,
            end_ln: start,
        }));
    }

    let mut i = start + 1;
    while i < lines.len() {
        depth += brace_delta(&lines[i]);
        if depth <= 0 {
            break;
        }
        body.push(lines[i].clone());
        i += 1;
    }
    Ok(Some(ChainBlock {
        kind,
        header: tokens,
        body,
        body_base,
        end_ln: i.min(lines.len().saturating_sub(1)),
    }))
}

/// Lexical path cleanup: fold `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Vec<String> {
        let mut runner = Runner::capturing();
        runner.run_program(source, None).unwrap();
        runner.take_output()
    }

    fn run_err(source: &str) -> InterpreterError {
        let mut runner = Runner::capturing();
        runner.run_program(source, None).unwrap_err()
    }

    #[test]
    fn test_hello_program() {
        let out = run("sandesh hai \"namaste duniya\"\nbolo sandesh\n");
        assert_eq!(out, vec!["namaste duniya"]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let out = run("# shuruaat\n\nx hai 1\nbolo x # inline\n");
        assert_eq!(out, vec!["1"]);
    }

    #[test]
    fn test_agar_takes_the_truthy_branch() {
        let source = "\
x hai 5
agar x {
bolo \"haan\"
}
warna {
bolo \"na\"
}
bolo \"done\"
";
        assert_eq!(run(source), vec!["haan", "done"]);
    }

    #[test]
    fn test_agar_chain_falls_through_to_warna() {
        let source = "\
x hai 0
agar x {
bolo \"pehla\"
}
nahi_to x - 1 {
bolo \"doosra\"
}
warna {
bolo \"teesra\"
}
";
        assert_eq!(run(source), vec!["teesra"]);
    }

    #[test]
    fn test_nahi_to_branch_is_taken_once() {
        let source = "\
x hai 0
agar x {
bolo \"pehla\"
}
nahi_to 1 {
bolo \"doosra\"
}
warna {
bolo \"teesra\"
}
";
        assert_eq!(run(source), vec!["doosra"]);
    }

    #[test]
    fn test_jab_tak_counts_down() {
        let source = "\
n hai 3
jab_tak n {
bolo n
MINUS n 1
}
bolo \"bas\"
";
        assert_eq!(run(source), vec!["3", "2", "1", "bas"]);
    }

    #[test]
    fn test_jab_tak_break_and_continue() {
        let source = "\
n hai 0
jab_tak 1 {
ADD n 1
agar n - 5 {
}
warna {
BAS_KAR
}
}
bolo n
";
        assert_eq!(run(source), vec!["5"]);
    }

    #[test]
    fn test_har_ek_sums_a_list() {
        let source = "\
kul hai 0
har_ek n in [1, 2, 3] {
ADD kul n
}
bolo kul
";
        assert_eq!(run(source), vec!["6"]);
    }

    #[test]
    fn test_har_ek_break_exits_the_loop() {
        let source = "\
har_ek n in [1, 2, 3] {
bolo n
BAS_KAR
}
";
        assert_eq!(run(source), vec!["1"]);
    }

    #[test]
    fn test_har_ek_continue_skips_to_the_next_element() {
        let source = "\
har_ek n in [1, 2, 3] {
AGLA
bolo n
}
bolo \"done\"
";
        assert_eq!(run(source), vec!["done"]);
    }

    #[test]
    fn test_har_ek_rejects_non_lists() {
        let err = run_err("har_ek n in 5 {\nbolo n\n}\n");
        assert!(matches!(err.root_cause(), InterpreterError::Type { .. }));
    }

    #[test]
    fn test_multi_line_function_definition_and_call() {
        let source = "\
function jodo a b {
lotaao a + b
}
bolo jodo(2, 3)
kaam_karo jodo 10, 20
";
        assert_eq!(run(source), vec!["5"]);
    }

    #[test]
    fn test_inline_function_definition() {
        let source = "function double n { lotaao n * 2 }\nbolo double(5)\n";
        assert_eq!(run(source), vec!["10"]);
    }

    #[test]
    fn test_function_reads_caller_variables() {
        let source = "\
kaam padho {
lotaao sandesh
}
sandesh hai \"gupt\"
bolo padho()
";
        assert_eq!(run(source), vec!["gupt"]);
    }

    #[test]
    fn test_function_without_return_prints_khaali() {
        let source = "\
function chup {
x hai 1
}
bolo chup()
";
        assert_eq!(run(source), vec!["khaali"]);
    }

    #[test]
    fn test_nested_blocks() {
        let source = "\
n hai 2
jab_tak n {
agar n - 1 {
bolo \"bada\"
}
warna {
bolo \"chhota\"
}
MINUS n 1
}
";
        assert_eq!(run(source), vec!["bada", "chhota"]);
    }

    #[test]
    fn test_infinite_loop_hits_the_ceiling() {
        let source = "\
n hai 0
jab_tak 1 {
ADD n 1
}
bolo n
";
        assert_eq!(run(source), vec!["100000"]);
    }

    #[test]
    fn test_block_header_with_trailing_statement() {
        let source = "agar 1 { bolo \"pehla\"\nbolo \"doosra\"\n}\n";
        assert_eq!(run(source), vec!["pehla", "doosra"]);
    }

    #[test]
    fn test_trailing_header_statement_keeps_line_numbers() {
        let err = run_err("agar 1 { bolo \"pehla\"\nbolo gayab\n}\n");
        assert!(matches!(
            err.root_cause(),
            InterpreterError::UndefinedVariable { .. }
        ));
        assert_eq!(err.line(), Some(2));

        let err = run_err("agar 1 { bolo gayab\n}\n");
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_error_carries_line_number() {
        let err = run_err("x hai 1\nbolo gayab\n");
        assert!(matches!(
            err.root_cause(),
            InterpreterError::UndefinedVariable { .. }
        ));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        let err = run_err("agar 1 {\nbolo \"adhura\"\n");
        assert!(matches!(
            err.root_cause(),
            InterpreterError::Syntax { .. }
        ));
    }

    #[test]
    fn test_orphan_warna_is_an_error() {
        let err = run_err("warna {\nbolo \"akela\"\n}\n");
        assert!(matches!(err.root_cause(), InterpreterError::Syntax { .. }));
    }

    #[test]
    fn test_duplicate_function_is_an_error() {
        let source = "\
function ek { lotaao 1 }
function ek { lotaao 2 }
";
        let err = run_err(source);
        assert!(matches!(
            err.root_cause(),
            InterpreterError::DuplicateFunction { .. }
        ));
    }

    #[test]
    fn test_normalize_folds_dot_segments() {
        assert_eq!(
            normalize(Path::new("/a/b/../c/./d.hindi")),
            PathBuf::from("/a/c/d.hindi")
        );
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
    }
}
