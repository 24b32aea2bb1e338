// ABOUTME: Price and registration-number input handling for the wizard
// Indian digit grouping for rupee amounts and plate normalisation

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub const RUPEE: char = '₹';

/// Lowest expected price accepted by the listing endpoint
pub const MIN_EXPECTED_PRICE: u64 = 10_000;

lazy_static! {
    // e.g. MH12AB1234, DL3CAF0001, KA01M1234, 22BH1234AA
    static ref REGISTRATION_RE: Regex =
        Regex::new(r"^(?:[A-Z]{2}[0-9]{1,2}[A-Z]{0,3}[0-9]{4}|[0-9]{2}BH[0-9]{4}[A-Z]{1,2})$")
            .expect("registration pattern is valid");
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("Enter an amount")]
    Empty,

    #[error("Enter a whole rupee amount (e.g., 5,00,000)")]
    NotANumber,

    #[error("Expected price must be at least {0}")]
    TooLow(String),

    #[error("Enter a valid registration number (e.g., MH12AB1234)")]
    InvalidRegistration,
}

/// Format an amount with Indian digit grouping: `500000` → `5,00,000`
pub fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `500000` → `₹5,00,000`
pub fn format_rupees(amount: u64) -> String {
    format!("{RUPEE}{}", group_indian(amount))
}

/// Parse a currency-formatted string back to whole rupees.
///
/// Accepts the rupee sign, `Rs`/`INR` prefixes, grouping commas, spaces and a
/// trailing `.00`.
pub fn parse_price(input: &str) -> Result<u64, PriceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }

    let mut rest = trimmed.trim_start_matches(RUPEE).trim();
    for prefix in ["INR", "Rs.", "Rs", "inr", "rs.", "rs"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped.trim();
            break;
        }
    }

    let whole = match rest.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return Err(PriceError::NotANumber),
        None => rest,
    };

    let digits: String = whole.chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(PriceError::NotANumber);
    }
    digits.parse::<u64>().map_err(|_| PriceError::NotANumber)
}

/// Parse user input for the price step and return `(amount, formatted)`
pub fn validate_expected_price(input: &str) -> Result<(u64, String), PriceError> {
    let amount = parse_price(input)?;
    if amount < MIN_EXPECTED_PRICE {
        return Err(PriceError::TooLow(format_rupees(MIN_EXPECTED_PRICE)));
    }
    Ok((amount, format_rupees(amount)))
}

/// Upper-case, strip separators and validate a registration number
pub fn normalize_registration(input: &str) -> Result<String, PriceError> {
    let normalized: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if REGISTRATION_RE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(PriceError::InvalidRegistration)
    }
}
