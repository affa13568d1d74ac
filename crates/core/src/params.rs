//! Total helpers for reading tunables out of a JSON parameter object.
//!
//! A missing key or a value of the wrong JSON type yields the supplied
//! default, so a partial override object always produces a usable config.

use serde_json::Value;

/// Reads `params[name]` as `f64`, or `default` if missing or not a number.
///
/// JSON integers are accepted and widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads `params[name]` as a non-negative integer, or `default`.
///
/// Floats and negative integers fall back to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_float() {
        let params = json!({"damping": 0.98});
        assert!((param_f64(&params, "damping", 0.995) - 0.98).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_widens_integer() {
        let params = json!({"softening": 400});
        assert!((param_f64(&params, "softening", 1.0) - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_when_missing_or_mistyped() {
        let params = json!({"swirl_factor": "lots", "spring_k": null});
        assert!((param_f64(&params, "swirl_factor", 0.45) - 0.45).abs() < f64::EPSILON);
        assert!((param_f64(&params, "spring_k", 0.0002) - 0.0002).abs() < f64::EPSILON);
        assert!((param_f64(&params, "absent", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_for_non_object() {
        let params = json!([1, 2, 3]);
        assert!((param_f64(&params, "max_speed", 2.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_reads_integer() {
        let params = json!({"max_wells": 4});
        assert_eq!(param_usize(&params, "max_wells", 6), 4);
    }

    #[test]
    fn param_usize_rejects_float_and_negative() {
        assert_eq!(param_usize(&json!({"max_wells": 2.5}), "max_wells", 6), 6);
        assert_eq!(param_usize(&json!({"max_wells": -3}), "max_wells", 6), 6);
    }
}
