// src/currency.rs
//! Salary conversion and display for the currencies of the supported countries

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Units of this currency per 1 EUR
    pub rate_to_eur: f64,
    pub position: SymbolPosition,
}

pub const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo {
        code: "EUR",
        symbol: "€",
        rate_to_eur: 1.0,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "GBP",
        symbol: "£",
        rate_to_eur: 0.86,
        position: SymbolPosition::Before,
    },
    CurrencyInfo {
        code: "MAD",
        symbol: "DH",
        rate_to_eur: 10.8,
        position: SymbolPosition::After,
    },
    CurrencyInfo {
        code: "TND",
        symbol: "DT",
        rate_to_eur: 3.4,
        position: SymbolPosition::After,
    },
    CurrencyInfo {
        code: "DZD",
        symbol: "DA",
        rate_to_eur: 146.0,
        position: SymbolPosition::After,
    },
    CurrencyInfo {
        code: "XOF",
        symbol: "CFA",
        rate_to_eur: 655.957,
        position: SymbolPosition::After,
    },
    CurrencyInfo {
        code: "ZAR",
        symbol: "R",
        rate_to_eur: 20.1,
        position: SymbolPosition::Before,
    },
];

pub fn currency_info(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Converts through EUR and rounds to whole units
pub fn convert_salary(amount: f64, from: &str, to: &str) -> Result<f64> {
    let from_info =
        currency_info(from).ok_or_else(|| anyhow::anyhow!("Unknown currency: {}", from))?;
    let to_info = currency_info(to).ok_or_else(|| anyhow::anyhow!("Unknown currency: {}", to))?;

    let in_eur = amount / from_info.rate_to_eur;
    Ok((in_eur * to_info.rate_to_eur).round())
}

pub fn format_salary(amount: f64, code: &str) -> String {
    match currency_info(code) {
        Some(info) => match info.position {
            SymbolPosition::Before => format!("{}{}", info.symbol, group_thousands(amount, ',')),
            SymbolPosition::After => format!("{} {}", group_thousands(amount, ' '), info.symbol),
        },
        None => format!("{} {}", group_thousands(amount, ' '), code),
    }
}

fn group_thousands(amount: f64, separator: char) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_eur_to_gbp() {
        assert_eq!(convert_salary(1000.0, "EUR", "GBP").unwrap(), 860.0);
    }

    #[test]
    fn test_convert_goes_through_eur() {
        // 10 800 MAD = 1 000 EUR = 860 GBP
        assert_eq!(convert_salary(10800.0, "MAD", "GBP").unwrap(), 860.0);
        assert_eq!(convert_salary(500.0, "gbp", "GBP").unwrap(), 500.0);
    }

    #[test]
    fn test_convert_unknown_currency() {
        assert!(convert_salary(1.0, "EUR", "XYZ").is_err());
    }

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(860.0, "GBP"), "£860");
        assert_eq!(format_salary(45000.0, "EUR"), "€45,000");
        assert_eq!(format_salary(1250000.0, "MAD"), "1 250 000 DH");
        assert_eq!(format_salary(300.0, "ABC"), "300 ABC");
    }
}
