//! C++ literal rendering for module parameters

use std::fmt::Write;

use contracts::{ContractError, ParamValue};

/// Render a parameter value as a C++ literal.
///
/// Floats always carry a decimal point so they never parse as integers on
/// the device. NaN and infinities have no literal form and are rejected.
pub fn render_literal(value: &ParamValue) -> Result<String, ContractError> {
    match value {
        ParamValue::Bool(v) => Ok(v.to_string()),
        ParamValue::Integer(v) => Ok(render_integer(*v)),
        ParamValue::Float(v) => render_float(*v),
        ParamValue::String(v) => Ok(escape_string(v)),
    }
}

fn render_integer(v: i64) -> String {
    if i32::try_from(v).is_ok() {
        v.to_string()
    } else {
        format!("{v}LL")
    }
}

fn render_float(v: f64) -> Result<String, ContractError> {
    if !v.is_finite() {
        return Err(ContractError::config_validation(
            "parameters",
            format!("{v} has no C++ literal form"),
        ));
    }
    let mut s = v.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    Ok(s)
}

/// Quote and escape a string literal
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // octal escapes stop after three digits, unlike \x
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_literals() {
        assert_eq!(render_literal(&ParamValue::Bool(true)).unwrap(), "true");
        assert_eq!(render_literal(&ParamValue::Integer(-4)).unwrap(), "-4");
        assert_eq!(
            render_literal(&ParamValue::Integer(5_000_000_000)).unwrap(),
            "5000000000LL"
        );
    }

    #[test]
    fn test_float_always_has_decimal_point() {
        assert_eq!(render_literal(&ParamValue::Float(4.0)).unwrap(), "4.0");
        assert_eq!(render_literal(&ParamValue::Float(0.25)).unwrap(), "0.25");
        assert_eq!(render_literal(&ParamValue::Float(-0.0)).unwrap(), "-0.0");
        assert_eq!(render_literal(&ParamValue::Float(1e-7)).unwrap(), "0.0000001");
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                render_literal(&ParamValue::Float(v)),
                Err(ContractError::ConfigValidation { .. })
            ));
        }
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(escape_string("air"), "\"air\"");
        assert_eq!(escape_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(escape_string("x\ny"), "\"x\\ny\"");
        assert_eq!(escape_string("\u{1}7"), "\"\\0017\"");
        assert_eq!(escape_string("°C"), "\"°C\"");
    }
}
