//! Presentation helpers for patient fields.

use chrono::{DateTime, Datelike, NaiveDate};

/// Formats a phone number for display.
///
/// Ten digits become `(XXX) XXX-XXXX`, eleven become `+X (XXX) XXX-XXXX`. Anything else is
/// returned unchanged. Non-digit characters are ignored when counting.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        11 => format!(
            "+{} ({}) {}-{}",
            &digits[..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
        _ => phone.to_string(),
    }
}

/// Upper-case initials of the given names, or `??` when both are empty.
pub fn initials(first_name: &str, last_name: &str) -> String {
    let first = first_name.trim().chars().next();
    let last = last_name.trim().chars().next();
    if first.is_none() && last.is_none() {
        return "??".into();
    }
    first
        .into_iter()
        .chain(last)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Parses a stored date, accepting `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Whole years between `date_of_birth` and `today`, or `None` if the date does not parse.
pub fn age_on(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let birth = parse_date(date_of_birth)?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Cuts `text` to at most `max_chars` characters, appending `...` when anything was removed.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Capitalises the first letter of each space-separated word and lower-cases the rest.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Long-form date such as `March 4, 2024`. `N/A` when absent, `Invalid date` when unparsable.
pub fn format_date(value: Option<&str>) -> String {
    match value.map(str::trim) {
        None | Some("") => "N/A".into(),
        Some(v) => parse_date(v)
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| "Invalid date".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone_number() {
        assert_eq!(format_phone_number("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone_number("1-555-123-4567"), "+1 (555) 123-4567");
        assert_eq!(format_phone_number("12345"), "12345");
        assert_eq!(format_phone_number(""), "");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ada", "lovelace"), "AL");
        assert_eq!(initials("", "lovelace"), "L");
        assert_eq!(initials("", ""), "??");
    }

    #[test]
    fn test_age_on_respects_birthday() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(age_on("1990-06-15", today), Some(34));
        assert_eq!(age_on("1990-06-16", today), Some(33));
        assert_eq!(age_on("1990-06-14T08:00:00Z", today), Some(34));
        assert_eq!(age_on("yesterday", today), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a longer sentence", 8), "a longer...");
        assert_eq!(truncate("héllo wörld", 4), "héll...");
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("hELLO wORLD"), "Hello World");
        assert_eq!(capitalize_words("type  2 diabetes"), "Type  2 Diabetes");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-03-04")), "March 4, 2024");
        assert_eq!(format_date(Some("2024-03-04T23:00:00Z")), "March 4, 2024");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(Some("someday")), "Invalid date");
    }
}
