/// `1234567` -> `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Two-decimal dollar amount with thousands separators, e.g. `$1,234.50`.
pub fn currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_digits(int_part))
}

/// Signed percentage with one decimal, e.g. `+12.3%` or `-4.0%`.
pub fn signed_percent(pct: f64) -> String {
    format!("{pct:+.1}%")
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn formats_currency() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(50.0), "$50.00");
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(1_000_000.126), "$1,000,000.13");
        assert_eq!(currency(-12.5), "-$12.50");
    }

    #[test]
    fn formats_signed_percent() {
        assert_eq!(signed_percent(12.34), "+12.3%");
        assert_eq!(signed_percent(-50.0), "-50.0%");
        assert_eq!(signed_percent(0.0), "+0.0%");
    }
}
