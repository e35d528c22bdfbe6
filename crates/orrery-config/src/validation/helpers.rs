//! Shared range-validation helpers used by all domain validators.

/// Push an error if `value` is outside `[min, max]` or not finite.
pub(crate) fn validate_range_f64(
    errors: &mut Vec<String>,
    name: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is not a finite number.
pub(crate) fn validate_finite(errors: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("{name} = {value} must be a finite number"));
    }
}

/// Push an error if `value` is not strictly positive.
pub(crate) fn validate_positive(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(format!("{name} = {value} must be positive"));
    }
}
