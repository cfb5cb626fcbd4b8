use crate::amount::Fixed2;

/// Group an unsigned digit string with thousands separators.
fn group(digits: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Format a monetary value as whole yen with thousands separators: ¥1,234
pub fn yen(val: Fixed2) -> String {
    let whole = (val.hundredths() as f64 / 100.0).round() as i64;
    let grouped = group(&whole.abs().to_string());
    if whole < 0 {
        format!("-\u{00a5}{grouped}")
    } else {
        format!("\u{00a5}{grouped}")
    }
}

/// Format a quantity: whole values without decimals, fractional with two.
pub fn qty(val: Fixed2) -> String {
    let h = val.hundredths();
    if h % 100 == 0 {
        let grouped = group(&(h / 100).abs().to_string());
        if h < 0 {
            format!("-{grouped}")
        } else {
            grouped
        }
    } else {
        format!("{:.2}", val.to_f64())
    }
}
