/// distance below which a float is treated as the nearest integer
pub const INTEGER_SNAP: f64 = 1e-9;

/// Rounds values within `INTEGER_SNAP` of an integer to that integer; `-0.0` becomes `0.0`.
pub fn snap_to_integer(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < INTEGER_SNAP {
        rounded + 0.0
    } else {
        value
    }
}

/// Number as shown to the user: integers without a fractional part (`5`, not `5.0`),
/// everything else with at most `digits` decimals and no trailing zeros.
pub fn format_number(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    let snapped = snap_to_integer(value);
    if snapped.fract() == 0.0 && snapped.abs() < 1e15 {
        return format!("{}", snapped as i64);
    }
    let fixed = format!("{:.*}", digits, value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
