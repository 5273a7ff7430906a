use crate::error::{Error, Result};

/// Checks that a numerical value is in the provided interval `[a,b]`, reporting the
/// offending parameter by name if not
///
/// NaN is never in range.
pub(crate) fn check_interval(name: &'static str, value: f32, a: f32, b: f32) -> Result<f32> {
    if value >= a && value <= b {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: format!("must be in the interval [{a}, {b}]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_interval_bounds() {
        assert_eq!(check_interval("x", 0.0, 0.0, 1.0), Ok(0.0), "lower bound inclusive");
        assert_eq!(check_interval("x", 1.0, 0.0, 1.0), Ok(1.0), "upper bound inclusive");
        assert!(check_interval("x", 1.5, 0.0, 1.0).is_err(), "above range rejected");
        assert!(check_interval("x", f32::NAN, 0.0, 1.0).is_err(), "NaN rejected");
    }

    #[test]
    fn check_interval_names_parameter() {
        let err = check_interval("alpha", 2.0, 0.0, 1.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value 2 for `alpha`: must be in the interval [0, 1]",
            "error message names the parameter"
        );
    }
}
