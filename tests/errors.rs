mod common;

use common::run_script_err;
use hindime::diagnostic::render_diagnostic;
use hindime::InterpreterError;

#[test]
fn test_errors_carry_the_failing_line() {
    let err = run_script_err("x hai 1\nbolo gayab\n");
    assert_eq!(err.line(), Some(2));
    let text = err.to_string();
    assert!(text.contains("unknown variable \"gayab\""));
    assert!(text.contains("-> Line 2: bolo gayab"));
}

#[test]
fn test_errors_inside_blocks_point_at_the_body_line() {
    let source = "\
agar 1 {
bolo theek
}
";
    let err = run_script_err(source);
    assert!(matches!(
        err.root_cause(),
        InterpreterError::UndefinedVariable { .. }
    ));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_unterminated_string_is_a_syntax_error() {
    let err = run_script_err("bolo \"adha\n");
    assert!(matches!(err.root_cause(), InterpreterError::Syntax { .. }));
    assert!(err.to_string().contains("unterminated string"));
}

#[test]
fn test_unexpected_character_is_reported() {
    let err = run_script_err("x hai 3 & 4\n");
    assert!(err.to_string().contains('&'));
}

#[test]
fn test_assignment_without_a_target() {
    let err = run_script_err("hai 5\n");
    assert!(matches!(err.root_cause(), InterpreterError::Syntax { .. }));
}

#[test]
fn test_unterminated_function_definition() {
    let err = run_script_err("function adhura {\nlotaao 1\n");
    assert!(matches!(err.root_cause(), InterpreterError::Syntax { .. }));
    assert!(err.to_string().contains("unterminated function"));
}

#[test]
fn test_function_header_without_brace() {
    let err = run_script_err("function bina_brace n\nlotaao n\n");
    assert!(matches!(err.root_cause(), InterpreterError::Syntax { .. }));
}

#[test]
fn test_diagnostic_rendering_for_a_script_error() {
    let source = "x hai 1\nbolo gayab\n";
    let err = run_script_err(source);
    let rendered = render_diagnostic(source, "script.hindi", &err.to_diagnostic(), false);

    assert!(rendered.contains("error[E0201]"));
    assert!(rendered.contains("script.hindi:2"));
    assert!(rendered.contains("bolo gayab"));
    assert!(rendered.contains("help:"));
}

#[test]
fn test_division_by_zero_code() {
    let err = run_script_err("x hai 1\nDIVIDE x 0\n");
    let diag = err.to_diagnostic();
    assert_eq!(diag.code.as_deref(), Some("E0205"));
    assert_eq!(diag.line, Some(2));
}

#[test]
fn test_module_errors_keep_the_inner_line() {
    // The inner failure is annotated with both the module line and the
    // importing line; the innermost wins.
    let script = common::TempScript::new(
        "err_inner",
        "theek hai 1\nbolo toota\n",
    )
    .unwrap();
    let source = format!("lao \"{}\"\n", script.path());
    let err = run_script_err(&source);
    assert!(matches!(
        err.root_cause(),
        InterpreterError::UndefinedVariable { .. }
    ));
    assert_eq!(err.line(), Some(2));
}
