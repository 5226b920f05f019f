//! Number and calendar formatting for report output

use chrono::{Datelike, Months, NaiveDate};

/// Label for month `index` counted from `start` ("Apr 2024")
pub fn month_label(start: NaiveDate, index: u32) -> String {
    let first = start.with_day(1).unwrap_or(start);
    match first.checked_add_months(Months::new(index)) {
        Some(date) => date.format("%b %Y").to_string(),
        None => format!("Month {}", index + 1),
    }
}

/// Group the integer part with thousands separators
pub fn with_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Amount in millions with one decimal ("Rp 1,234.5M")
pub fn rupiah_millions(amount: f64) -> String {
    format!("Rp {}M", with_thousands(amount / 1_000_000.0, 1))
}

/// Percentage with one decimal ("12.3%")
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        assert_eq!(month_label(start, 0), "Apr 2024");
        assert_eq!(month_label(start, 8), "Dec 2024");
        assert_eq!(month_label(start, 9), "Jan 2025");
    }

    #[test]
    fn test_with_thousands() {
        assert_eq!(with_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(with_thousands(999.0, 0), "999");
        assert_eq!(with_thousands(1_000.0, 1), "1,000.0");
        assert_eq!(with_thousands(-45_250.0, 0), "-45,250");
        assert_eq!(with_thousands(-0.01, 1), "0.0");
    }

    #[test]
    fn test_rupiah_millions() {
        assert_eq!(rupiah_millions(587_500_000.0), "Rp 587.5M");
        assert_eq!(rupiah_millions(1_425_000_000.0), "Rp 1,425.0M");
        assert_eq!(rupiah_millions(-62_500_000.0), "Rp -62.5M");
    }
}
