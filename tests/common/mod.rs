use hindime::interpreter::{InterpreterError, Runner};
use std::fs::{self, File};
use std::io::Write;

/// Run a program with captured output and return the `bolo` lines.
pub fn run_script(source: &str) -> Vec<String> {
    let mut runner = Runner::capturing();
    runner
        .run_program(source, None)
        .expect("script should succeed");
    runner.take_output()
}

/// Run a program expected to fail and return the error.
pub fn run_script_err(source: &str) -> InterpreterError {
    let mut runner = Runner::capturing();
    runner
        .run_program(source, None)
        .expect_err("script should fail")
}

/// Helper struct to create and automatically clean up temporary script files
pub struct TempScript {
    path: String,
    escaped_path: String,
}

impl TempScript {
    pub fn new(name: &str, content: &str) -> std::io::Result<Self> {
        let temp_dir = std::env::temp_dir();
        let path = temp_dir.join(format!("hindime_test_{}.hindi", name));
        let path_str = path.to_string_lossy().to_string();
        let mut file = File::create(&path)?;
        file.write_all(content.as_bytes())?;
        let escaped_path = path_str.replace('\\', "\\\\");
        Ok(Self {
            path: path_str,
            escaped_path,
        })
    }

    /// The path as it can be spliced into a `lao "..."` string.
    pub fn path(&self) -> &str {
        &self.escaped_path
    }

    pub fn raw_path(&self) -> &str {
        &self.path
    }
}

impl Drop for TempScript {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
