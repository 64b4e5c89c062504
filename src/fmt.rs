/// Format a float as a euro amount, French style: 1 234,56 €
pub fn money(val: f64) -> String {
    if !val.is_finite() {
        // NaN and infinities have no cent representation
        return format!("{val} €");
    }
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{grouped},{dec_part} €")
    } else {
        format!("{grouped},{dec_part} €")
    }
}

/// Round to cents. Split arithmetic and reimbursement rates go through this.
pub fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

/// Month strings are stored as first-of-month dates; show just YYYY-MM.
pub fn month_label(month: &str) -> &str {
    month.get(..7).unwrap_or(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "1 234,56 €");
        assert_eq!(money(-500.00), "-500,00 €");
        assert_eq!(money(0.0), "0,00 €");
        assert_eq!(money(1000000.99), "1 000 000,99 €");
        assert_eq!(money(42.10), "42,10 €");
    }

    #[test]
    fn test_money_non_finite() {
        assert_eq!(money(f64::NAN), "NaN €");
        assert_eq!(money(f64::INFINITY), "inf €");
        assert_eq!(money(f64::NEG_INFINITY), "-inf €");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2025-03-01"), "2025-03");
        assert_eq!(month_label("2025-03"), "2025-03");
        assert_eq!(month_label("bad"), "bad");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(33.337), 33.34);
        assert_eq!(round2(-12.344), -12.34);
    }
}
