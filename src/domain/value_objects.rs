use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card network tag, as the gateway spells it on the wire.
///
/// Detection is a first-digit heuristic, not BIN validation; unknown
/// prefixes fall back to Visa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Visa,
    Master,
    Amex,
    Discover,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::Visa => write!(f, "visa"),
            CardType::Master => write!(f, "master"),
            CardType::Amex => write!(f, "amex"),
            CardType::Discover => write!(f, "discover"),
        }
    }
}

/// Detect the card network from the first digit of the card number.
pub fn detect_card_type(card_number: &str) -> CardType {
    match card_number.trim().chars().next() {
        Some('3') => CardType::Amex,
        Some('4') => CardType::Visa,
        Some('5') => CardType::Master,
        Some('6') => CardType::Discover,
        _ => CardType::Visa,
    }
}

/// Strip whitespace and every non-digit character from a card number.
pub fn format_card_number(card_number: &str) -> String {
    card_number.chars().filter(char::is_ascii_digit).collect()
}

/// Format an expiration as the 4-digit MMYY the gateway requires.
/// 4-digit years keep their last two digits; both parts are zero-padded.
pub fn format_expiration(exp_month: &str, exp_year: &str) -> String {
    let year = exp_year.trim();
    let year = if year.len() == 4 { &year[2..] } else { year };
    format!("{:0>2}{:0>2}", exp_month.trim(), year)
}

/// Outcome of card detail validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CardValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Validate card number, expiration and CVV before any network call.
/// Pure function; collects every problem rather than stopping at the first.
pub fn validate_card_details(
    card_number: &str,
    exp_month: &str,
    exp_year: &str,
    cvv: &str,
) -> CardValidation {
    validate_card_details_at(card_number, exp_month, exp_year, cvv, Utc::now().year())
}

fn validate_card_details_at(
    card_number: &str,
    exp_month: &str,
    exp_year: &str,
    cvv: &str,
    current_year: i32,
) -> CardValidation {
    let mut errors = Vec::new();

    let clean_number = format_card_number(card_number);
    if clean_number.len() < 13 || clean_number.len() > 19 {
        errors.push("Invalid card number length".to_string());
    }

    match exp_month.trim().parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => {}
        _ => errors.push("Invalid expiration month".to_string()),
    }

    // Accept both YY and YYYY; two-digit years are assumed to be 20XX.
    let trimmed_year = exp_year.trim();
    let year = trimmed_year
        .parse::<i32>()
        .ok()
        .map(|y| if trimmed_year.len() == 2 { 2000 + y } else { y });
    match year {
        Some(y) if y >= current_year && y <= current_year + 20 => {}
        _ => errors.push("Invalid expiration year".to_string()),
    }

    let cvv = cvv.trim();
    if !((cvv.len() == 3 || cvv.len() == 4) && cvv.chars().all(|c| c.is_ascii_digit())) {
        errors.push("Invalid CVV".to_string());
    }

    CardValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Full state name (lowercase) to USPS abbreviation, 50 states plus DC.
const US_STATES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
    ("district of columbia", "DC"),
    ("washington dc", "DC"),
    ("washington d.c.", "DC"),
];

/// Normalize a free-text state to a 2-letter uppercase code.
///
/// Best-effort on purpose: input that is neither a known name nor a
/// 2-character code is truncated to its first two characters and
/// uppercased, which can yield a non-existent code. It never fails.
pub fn normalize_state(state: &str) -> String {
    let clean = state.trim();
    if clean.is_empty() {
        return String::new();
    }

    if clean.len() == 2 && clean == clean.to_uppercase() {
        return clean.to_string();
    }

    let lower = clean.to_lowercase();
    if let Some((_, abbr)) = US_STATES.iter().find(|(name, _)| *name == lower) {
        return (*abbr).to_string();
    }

    if clean.chars().count() == 2 {
        return clean.to_uppercase();
    }

    clean.chars().take(2).collect::<String>().to_uppercase()
}
