use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Serialize, Serializer};

/// Fixed-point quantity/money value with two decimal places (i64 hundredths).
/// Purchasing exports carry yen prices and piece counts; keeping both in the
/// same scaled-integer representation keeps aggregation exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Fixed2(i64);

impl Fixed2 {
    pub const ZERO: Fixed2 = Fixed2(0);

    pub fn from_hundredths(v: i64) -> Self {
        Fixed2(v)
    }

    pub fn from_int(v: i64) -> Self {
        Fixed2(v.saturating_mul(100))
    }

    /// Convert a spreadsheet numeric cell. Values beyond i64 range saturate.
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() {
            return Fixed2::ZERO;
        }
        let scaled = (v * 100.0).round();
        if scaled >= i64::MAX as f64 {
            Fixed2(i64::MAX)
        } else if scaled <= i64::MIN as f64 {
            Fixed2(i64::MIN)
        } else {
            Fixed2(scaled as i64)
        }
    }

    /// Parse a text cell: tolerates thousands separators, currency signs,
    /// surrounding quotes, and parenthesized negatives. Returns None for
    /// anything that is not a plain decimal number after stripping.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw
            .replace(',', "")
            .replace('"', "")
            .replace('$', "")
            .replace('\u{00a5}', "") // ¥
            .replace('\u{ffe5}', ""); // ￥
        let mut s = s.trim().to_string();
        if s.is_empty() {
            return None;
        }
        let mut negative = false;
        if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
            negative = true;
            s = inner.trim().to_string();
        }
        if let Some(rest) = s.strip_prefix('-') {
            negative = !negative;
            s = rest.to_string();
        } else if let Some(rest) = s.strip_prefix('+') {
            s = rest.to_string();
        }
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 2 {
            return None;
        }
        let int_part = if parts[0].is_empty() { "0" } else { parts[0] };
        if !int_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let frac_raw = if parts.len() == 2 { parts[1] } else { "" };
        if !frac_raw.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        // Truncate beyond two decimal places; the exports never carry more.
        let frac_val = match frac_raw.len() {
            0 => 0,
            1 => frac_raw.parse::<i64>().ok()? * 10,
            _ => frac_raw[..2].parse::<i64>().ok()?,
        };
        let int_val = int_part.parse::<i64>().ok()?;
        let mut hundredths = int_val.checked_mul(100)?.checked_add(frac_val)?;
        if negative {
            hundredths = -hundredths;
        }
        Some(Fixed2(hundredths))
    }

    pub fn hundredths(self) -> i64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// quantity × unit price, exact via a widened intermediate.
    pub fn times(self, other: Fixed2) -> Fixed2 {
        let product = self.0 as i128 * other.0 as i128 / 100;
        if product > i64::MAX as i128 {
            Fixed2(i64::MAX)
        } else if product < i64::MIN as i128 {
            Fixed2(i64::MIN)
        } else {
            Fixed2(product as i64)
        }
    }
}

impl Add for Fixed2 {
    type Output = Fixed2;
    fn add(self, rhs: Fixed2) -> Fixed2 {
        Fixed2(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed2 {
    fn add_assign(&mut self, rhs: Fixed2) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Fixed2 {
    fn sum<I: Iterator<Item = Fixed2>>(iter: I) -> Fixed2 {
        iter.fold(Fixed2::ZERO, Add::add)
    }
}

impl Serialize for Fixed2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.to_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(Fixed2::parse("1234"), Some(Fixed2::from_int(1234)));
        assert_eq!(Fixed2::parse("1,234.56"), Some(Fixed2::from_hundredths(123456)));
        assert_eq!(Fixed2::parse("  -42.50  "), Some(Fixed2::from_hundredths(-4250)));
        assert_eq!(Fixed2::parse("0"), Some(Fixed2::ZERO));
    }

    #[test]
    fn test_parse_currency_and_parens() {
        assert_eq!(Fixed2::parse("\u{00a5}1,200"), Some(Fixed2::from_int(1200)));
        assert_eq!(Fixed2::parse("(500.00)"), Some(Fixed2::from_int(-500)));
        assert_eq!(Fixed2::parse("\"2,000.00\""), Some(Fixed2::from_int(2000)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Fixed2::parse("N/A"), None);
        assert_eq!(Fixed2::parse(""), None);
        assert_eq!(Fixed2::parse("12.3.4"), None);
        assert_eq!(Fixed2::parse("1-2"), None);
    }

    #[test]
    fn test_parse_truncates_extra_decimals() {
        assert_eq!(Fixed2::parse("1.999"), Some(Fixed2::from_hundredths(199)));
        assert_eq!(Fixed2::parse("2.5"), Some(Fixed2::from_hundredths(250)));
    }

    #[test]
    fn test_times_is_exact() {
        let qty = Fixed2::from_int(3);
        let price = Fixed2::from_int(100);
        assert_eq!(qty.times(price), Fixed2::from_int(300));

        // 0.1 * 0.1 = 0.01 exactly, where f64 would drift
        let a = Fixed2::from_hundredths(10);
        assert_eq!(a.times(a), Fixed2::from_hundredths(1));
    }

    #[test]
    fn test_sum() {
        let total: Fixed2 = [Fixed2::from_int(200), Fixed2::from_int(300)]
            .into_iter()
            .sum();
        assert_eq!(total, Fixed2::from_int(500));
    }

    #[test]
    fn test_from_f64_rounds() {
        assert_eq!(Fixed2::from_f64(2.0), Fixed2::from_int(2));
        assert_eq!(Fixed2::from_f64(1.005), Fixed2::from_hundredths(100));
        assert_eq!(Fixed2::from_f64(f64::NAN), Fixed2::ZERO);
    }

    #[test]
    fn test_serialize_whole_values_as_integers() {
        assert_eq!(serde_json::to_string(&Fixed2::from_int(500)).unwrap(), "500");
        assert_eq!(
            serde_json::to_string(&Fixed2::from_hundredths(123456)).unwrap(),
            "1234.56"
        );
    }
}
