use chrono::{DateTime, FixedOffset, Utc};
use itertools::Itertools;

pub(crate) fn now_in(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

fn group_digits(digits: &str) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",")
}

/// `1234567` -> `"1,234,567"`, sign preserved.
pub(crate) fn group_thousands(n: i64) -> String {
    let grouped = group_digits(&n.unsigned_abs().to_string());
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `12345.5` -> `"12,345.5"`, fraction rounded to two places.
pub(crate) fn group_decimal(n: f64) -> String {
    let rounded = (n * 100.0).round() / 100.0;
    let text = rounded.abs().to_string();
    let grouped = match text.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_digits(int), frac),
        None => group_digits(&text),
    };
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Delta with an explicit `+` for growth.
pub(crate) fn signed_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", group_thousands(delta))
    } else {
        group_thousands(delta)
    }
}

pub(crate) fn signed_decimal_delta(delta: f64) -> String {
    let grouped = group_decimal(delta);
    if grouped.starts_with('-') || grouped == "0" {
        grouped
    } else {
        format!("+{}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-200000), "-200,000");
        assert_eq!(group_thousands(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_group_decimal() {
        assert_eq!(group_decimal(96.5), "96.5");
        assert_eq!(group_decimal(1234567.25), "1,234,567.25");
        assert_eq!(group_decimal(15.900000000000006), "15.9");
        assert_eq!(group_decimal(-2000.0), "-2,000");
    }

    #[test]
    fn test_signed_decimal_delta() {
        assert_eq!(signed_decimal_delta(16.5), "+16.5");
        assert_eq!(signed_decimal_delta(-0.25), "-0.25");
        assert_eq!(signed_decimal_delta(0.001), "0");
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(signed_delta(50), "+50");
        assert_eq!(signed_delta(200000), "+200,000");
        assert_eq!(signed_delta(-2), "-2");
    }
}
