//! Structural validators for PII pattern matches
//!
//! Pure, total predicates that confirm a regex-matched substring is
//! plausible. A parse failure from the phone library is contained here and
//! treated as invalid, never propagated.

use phonenumber::country;

/// Region used for phone parsing before falling back to international parse
const DEFAULT_PHONE_REGION: country::Id = country::Id::US;

/// Luhn checksum validation for credit card candidates.
///
/// Strips spaces and dashes, requires 13-19 digits, rejects strings of one
/// repeated digit, then applies the standard doubling checksum.
pub fn is_valid_credit_card(text: &str) -> bool {
    let digits: Vec<u32> = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .unwrap_or_default();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    // Test numbers like 1111... pass Luhn but are never real cards
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let mut sum = 0;
    for (i, digit) in digits.iter().rev().enumerate() {
        let mut d = *digit;
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }

    sum % 10 == 0
}

/// SSN field-range validation for `AAA-GG-SSSS` candidates.
///
/// Area 000, 666, and 900-999 were never issued; group 00 and serial 0000
/// are invalid.
pub fn is_valid_ssn(text: &str) -> bool {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 3 || parts[1].len() != 2 || parts[2].len() != 4 {
        return false;
    }

    let (area, group, serial) = match (
        parts[0].parse::<u32>(),
        parts[1].parse::<u32>(),
        parts[2].parse::<u32>(),
    ) {
        (Ok(a), Ok(g), Ok(s)) => (a, g, s),
        _ => return false,
    };

    if area == 0 || area == 666 || area >= 900 {
        return false;
    }
    if group == 0 || serial == 0 {
        return false;
    }

    true
}

/// Structural email shape check.
///
/// Requires `local@domain.tld`, rejects leading/trailing/double dots in the
/// local part and a leading/trailing dot or hyphen in the domain.
pub fn is_valid_email(text: &str) -> bool {
    let mut parts = text.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(l), Some(d)) if !l.is_empty() && !d.is_empty() => (l, d),
        _ => return false,
    };

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain.contains("..")
    {
        return false;
    }

    // The TLD portion must exist and be alphabetic
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Phone number validity via the libphonenumber port.
///
/// Tries the default region first, then an international parse.
pub fn is_valid_phone(text: &str) -> bool {
    is_valid_phone_in(text, Some(DEFAULT_PHONE_REGION))
        || is_valid_phone_in(text, None)
}

fn is_valid_phone_in(text: &str, region: Option<country::Id>) -> bool {
    phonenumber::parse(region, text)
        .map(|number| phonenumber::is_valid(&number))
        .unwrap_or(false)
}
