//! Prometheus Exposition Format output
//!
//! Line-level primitives for the text exposition format (version 0.0.4).
//!
//! # Format
//!
//! ```text
//! # TYPE <base_name> <type>
//! <metric_name>{<label1>="<value1>",<label2>="<value2>"} <value>
//! ```

/// Format a family TYPE header line
pub fn type_line(base_name: &str, metric_type: &str) -> String {
    format!("# TYPE {} {}\n", base_name, metric_type)
}

/// Format a single sample line
///
/// `labels` is the already comma-joined label buffer; braces are omitted
/// entirely when it is empty.
pub fn sample_line(name: &str, labels: &str, value: f64) -> String {
    if labels.is_empty() {
        format!("{} {}\n", name, format_value(value))
    } else {
        format!("{}{{{}}} {}\n", name, labels, format_value(value))
    }
}

/// Format one label name/value pair as `name="value"`
pub fn label_pair(name: &str, value: &str) -> String {
    format!("{}=\"{}\"", name, escape_label_value(value))
}

/// Format a numeric value for Prometheus
///
/// - NaN → "NaN"
/// - +Inf → "+Inf"
/// - -Inf → "-Inf"
/// - Integers are formatted without decimal point
/// - Large/small floats use scientific notation
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        // Format as integer if no fractional part and not too large
        format!("{}", value as i64)
    } else if value.abs() >= 1e6 || (value.abs() < 1e-3 && value != 0.0) {
        // Use scientific notation for very large or very small numbers
        format!("{:e}", value)
    } else {
        // Standard decimal format
        format!("{}", value)
    }
}

/// Escape a label value
///
/// Escapes backslash, double-quote, and newline characters as the text
/// format requires.
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_line() {
        assert_eq!(type_line("answer", "untyped"), "# TYPE answer untyped\n");
        assert_eq!(
            type_line("request_latency", "histogram"),
            "# TYPE request_latency histogram\n"
        );
    }

    #[test]
    fn test_sample_line_with_labels() {
        assert_eq!(
            sample_line("answer", "foo=\"bar\"", 42.0),
            "answer{foo=\"bar\"} 42\n"
        );
    }

    #[test]
    fn test_sample_line_without_labels() {
        let line = sample_line("thread_count", "", 42.0);
        assert_eq!(line, "thread_count 42\n");
        assert!(!line.contains('{'));
        assert!(!line.contains('}'));
    }

    #[test]
    fn test_label_pair() {
        assert_eq!(label_pair("foo", "bar"), "foo=\"bar\"");
        assert_eq!(label_pair("path", "a\"b"), "path=\"a\\\"b\"");
    }

    #[test]
    fn test_format_value_nan() {
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_value_infinity() {
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_value_integer() {
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-100.0), "-100");
        assert_eq!(format_value(123456789.0), "123456789");
    }

    #[test]
    fn test_format_value_decimal() {
        assert_eq!(format_value(97.5), "97.5");
        let formatted = format_value(1.23456);
        assert!(formatted.starts_with("1.23"));
    }

    #[test]
    fn test_format_value_scientific() {
        // Very small number
        let formatted = format_value(3.4204e-5);
        assert!(formatted.contains('e'), "expected scientific: {}", formatted);

        // Very large non-integral number
        let formatted = format_value(1.23e16);
        assert!(formatted.contains('e') || formatted.contains("12300000000000000"));
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("simple"), "simple");
        assert_eq!(escape_label_value("with\"quote"), "with\\\"quote");
        assert_eq!(escape_label_value("with\\backslash"), "with\\\\backslash");
        assert_eq!(escape_label_value("with\nnewline"), "with\\nnewline");
        assert_eq!(escape_label_value("all\"\\\n"), "all\\\"\\\\\\n");
    }
}
