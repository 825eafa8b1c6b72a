use std::fmt;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A complete diagnostic message, anchored to a 1-based source line.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub line: Option<usize>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            line: None,
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Diagnostic renderer for Rust-like error output
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    /// Render a diagnostic to a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        self.render_header(&mut output, diagnostic);

        if let Some(line_num) = diagnostic.line {
            output.push_str(&format!(
                "  {} {}:{}\n",
                self.style_blue("-->"),
                self.file_name,
                line_num
            ));

            if let Some(content) = self.source.lines().nth(line_num.saturating_sub(1)) {
                let content = content.trim_end();
                let width = line_num.to_string().len();
                let gutter = " ".repeat(width + 1);

                output.push_str(&format!("{} {}\n", gutter, self.style_blue("|")));
                output.push_str(&format!(
                    "{:>width$} {} {}\n",
                    self.style_blue(&line_num.to_string()),
                    self.style_blue("|"),
                    content,
                    width = width + 1
                ));

                let leading = content.len() - content.trim_start().len();
                let underline = format!(
                    "{}{}",
                    " ".repeat(leading),
                    "^".repeat(content.trim_start().len().max(1))
                );
                output.push_str(&format!(
                    "{} {} {}\n",
                    gutter,
                    self.style_blue("|"),
                    self.style_red(&underline)
                ));
                output.push_str(&format!("{} {}\n", gutter, self.style_blue("|")));
            }
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style_blue("="), note));
        }

        output
    }

    fn render_header(&self, output: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => self.style_red_bold("error"),
            Severity::Warning => self.style_yellow_bold("warning"),
            Severity::Note => self.style_blue("note"),
        };

        if let Some(code) = &diagnostic.code {
            output.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code,
                self.style_bold(&diagnostic.message)
            ));
        } else {
            output.push_str(&format!(
                "{}: {}\n",
                severity_str,
                self.style_bold(&diagnostic.message)
            ));
        }
    }

    // Color helpers
    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_red_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_yellow_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;33m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_blue(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[34m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}

/// Render a single diagnostic against its source file.
pub fn render_diagnostic(
    source: &str,
    file_name: &str,
    diagnostic: &Diagnostic,
    use_color: bool,
) -> String {
    DiagnosticRenderer::new(source, file_name, use_color).render(diagnostic)
}
