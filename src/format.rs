use crate::value::Value;

/// Renders a value the way `bolo` prints it: strings bare, numbers without a
/// trailing `.0` when integral, booleans and null as their source literals.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null | Value::Unset => "khaali".to_string(),
        Value::Bool(true) => "sach".to_string(),
        Value::Bool(false) => "jhoot".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Str(s) => s.to_string(),
        Value::List(items) => {
            let parts: Vec<String> = items.borrow().iter().map(repr_value).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

/// Like [`display_value`] but quotes strings; used for list elements.
fn repr_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("\"{}\"", s),
        other => display_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_numbers_drop_the_decimal() {
        assert_eq!(display_value(&Value::Number(7.0)), "7");
        assert_eq!(display_value(&Value::Number(-3.0)), "-3");
        assert_eq!(display_value(&Value::Number(3.14)), "3.14");
    }

    #[test]
    fn test_literals() {
        assert_eq!(display_value(&Value::Bool(true)), "sach");
        assert_eq!(display_value(&Value::Bool(false)), "jhoot");
        assert_eq!(display_value(&Value::Null), "khaali");
        assert_eq!(display_value(&Value::Unset), "khaali");
    }

    #[test]
    fn test_strings_print_bare_at_top_level() {
        assert_eq!(display_value(&Value::string("namaste")), "namaste");
    }

    #[test]
    fn test_lists_quote_their_strings() {
        let list = Value::list(vec![
            Value::Number(1.0),
            Value::string("do"),
            Value::list(vec![Value::Bool(false)]),
        ]);
        assert_eq!(display_value(&list), "[1, \"do\", [jhoot]]");
    }
}
