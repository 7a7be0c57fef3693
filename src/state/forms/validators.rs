//! Field validators and keystroke input filters
//!
//! Every validator is a pure function of the field value (plus the
//! [`ValidationContext`] where a rule depends on other data) and reports the
//! first rule that fails. The signup password validator is the exception: it
//! lists every unmet requirement at once.

use crate::regions::RegionData;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldCheck {
    pub valid: bool,
    pub message: String,
}

impl FieldCheck {
    /// A passing check with no message
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    /// A passing check that still shows positive feedback
    pub fn ok_with(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Cross-field data some validators need
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    pub regions: &'a RegionData,
    /// Currently selected state, used by the district rule
    pub state: String,
    /// Reference date for the age rule
    pub today: NaiveDate,
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect("static pattern compiles"))
        }
    };
}

pattern!(name_re, r"^[a-zA-Z\s]{2,50}$");
pattern!(mobile_re, r"^[6-9][0-9]{9}$");
pattern!(pincode_re, r"^[1-9][0-9]{5}$");
pattern!(city_re, r"^[a-zA-Z\s.'-]{2,50}$");
pattern!(email_re, r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
pattern!(
    gst_re,
    r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$"
);
pattern!(whitespace_re, r"\s+");

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Shared email shape check
pub fn is_valid_email(email: &str) -> bool {
    email_re().is_match(email)
}

pub fn validate_required(value: &str, message: &str) -> FieldCheck {
    if value.trim().is_empty() {
        FieldCheck::fail(message)
    } else {
        FieldCheck::ok()
    }
}

/// Required value that must also be one of `options`
pub fn validate_choice(value: &str, options: &[&str], message: &str) -> FieldCheck {
    if value.is_empty() || !options.contains(&value) {
        FieldCheck::fail(message)
    } else {
        FieldCheck::ok()
    }
}

/// At least one item selected
pub fn validate_selection(values: &[String], message: &str) -> FieldCheck {
    if values.is_empty() {
        FieldCheck::fail(message)
    } else {
        FieldCheck::ok()
    }
}

/// Numeric value strictly greater than zero
pub fn validate_positive_number(value: &str, message: &str) -> FieldCheck {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => FieldCheck::ok(),
        _ => FieldCheck::fail(message),
    }
}

pub fn validate_name(name: &str) -> FieldCheck {
    if name.is_empty() {
        return FieldCheck::fail("Name is required");
    }
    if !name_re().is_match(name) {
        return FieldCheck::fail("Name should contain only letters and spaces (2-50 characters)");
    }
    FieldCheck::ok()
}

/// Looser name rule used by the signup form
pub fn validate_signup_name(name: &str) -> FieldCheck {
    if name.is_empty() {
        return FieldCheck::fail("Name is required");
    }
    if name.chars().count() < 2 {
        return FieldCheck::fail("Name must be at least 2 characters long");
    }
    FieldCheck::ok()
}

/// Whole years between `birth` and `today`
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Date of birth as `YYYY-MM-DD`; the holder must be 18 to 100 years old
pub fn validate_dob(dob: &str, today: NaiveDate) -> FieldCheck {
    if dob.is_empty() {
        return FieldCheck::fail("Date of birth is required");
    }
    let Ok(birth) = NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d") else {
        return FieldCheck::fail("Please enter a valid date of birth");
    };
    let age = age_on(birth, today);
    if age < 18 {
        return FieldCheck::fail("You must be at least 18 years old");
    }
    if age > 100 {
        return FieldCheck::fail("Please enter a valid date of birth");
    }
    FieldCheck::ok()
}

pub fn validate_mobile(mobile: &str) -> FieldCheck {
    if mobile.is_empty() {
        return FieldCheck::fail("Phone number is required");
    }
    if !mobile_re().is_match(mobile) {
        return FieldCheck::fail("Please enter a valid 10-digit Indian mobile number");
    }
    FieldCheck::ok()
}

pub fn validate_state(state: &str, ctx: &ValidationContext) -> FieldCheck {
    if state.is_empty() {
        return FieldCheck::fail("Please select a state");
    }
    match ctx.regions.catalog() {
        Some(catalog) if !catalog.contains_state(state) => {
            FieldCheck::fail("Please select a valid state")
        }
        _ => FieldCheck::ok(),
    }
}

pub fn validate_district(district: &str, ctx: &ValidationContext) -> FieldCheck {
    if district.is_empty() {
        return FieldCheck::fail("Please select a district");
    }
    match ctx.regions.catalog() {
        Some(catalog) if !catalog.contains_district(&ctx.state, district) => {
            FieldCheck::fail("Please select a valid district for the selected state")
        }
        _ => FieldCheck::ok(),
    }
}

pub fn validate_village(village: &str) -> FieldCheck {
    if village.trim().chars().count() < 2 {
        return FieldCheck::fail("Please enter a valid village/town name");
    }
    FieldCheck::ok()
}

/// Collapse runs of whitespace and trim
pub fn sanitize_city(city: &str) -> String {
    whitespace_re().replace_all(city.trim(), " ").into_owned()
}

pub fn validate_city(city: &str) -> FieldCheck {
    let city = sanitize_city(city);
    let len = city.chars().count();
    if city.is_empty() {
        return FieldCheck::fail("Town/City name is required");
    }
    if len < 2 {
        return FieldCheck::fail("Town/City name must be at least 2 characters long");
    }
    if len > 50 {
        return FieldCheck::fail("Town/City name cannot exceed 50 characters");
    }
    if !city_re().is_match(&city) {
        return FieldCheck::fail(
            "Please enter a valid town/city name (letters, spaces, and basic punctuation only)",
        );
    }
    FieldCheck::ok()
}

pub fn validate_pincode(pincode: &str) -> FieldCheck {
    if pincode.trim().is_empty() {
        return FieldCheck::fail("Pincode is required");
    }
    if !pincode_re().is_match(pincode) {
        return FieldCheck::fail("Please enter a valid 6-digit pincode");
    }
    FieldCheck::ok()
}

pub fn validate_business_name(name: &str) -> FieldCheck {
    if name.trim().chars().count() < 2 {
        return FieldCheck::fail("Please enter a valid business name");
    }
    FieldCheck::ok()
}

pub fn validate_email(email: &str) -> FieldCheck {
    if email.is_empty() {
        return FieldCheck::fail("Email is required");
    }
    if !is_valid_email(email) {
        return FieldCheck::fail("Please enter a valid email address");
    }
    FieldCheck::ok()
}

/// Signup password: reports every unmet requirement in one message
pub fn validate_signup_password(password: &str) -> FieldCheck {
    let mut missing = Vec::new();
    if password.chars().count() < PASSWORD_MIN_LEN {
        missing.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("1 uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("1 number");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        missing.push("1 special character");
    }

    if missing.is_empty() {
        FieldCheck::ok_with("Password meets requirements")
    } else {
        FieldCheck::fail(format!("Missing: {}", missing.join(", ")))
    }
}

/// Login only needs a password to be present
pub fn validate_login_password(password: &str) -> FieldCheck {
    if password.is_empty() {
        FieldCheck::fail("Password is required")
    } else {
        FieldCheck::ok()
    }
}

pub fn validate_confirm_password(password: &str, confirm: &str) -> FieldCheck {
    if password != confirm {
        return FieldCheck::fail("Passwords do not match");
    }
    if confirm.is_empty() {
        return FieldCheck::fail("Please confirm your password");
    }
    FieldCheck::ok_with("Passwords match")
}

/// Optional GST identification number
pub fn validate_gst(gst: &str) -> FieldCheck {
    if !gst.is_empty() && !gst_re().is_match(gst) {
        return FieldCheck::fail("Please enter a valid GST number");
    }
    FieldCheck::ok()
}

/// Optional `latitude, longitude` pair
pub fn validate_coordinates(coordinates: &str) -> FieldCheck {
    if coordinates.trim().is_empty() {
        return FieldCheck::ok();
    }
    let parsed: Vec<Option<f64>> = coordinates
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect();
    match parsed.as_slice() {
        [Some(lat), Some(lng)] if (-90.0..=90.0).contains(lat) && (-180.0..=180.0).contains(lng) => {
            FieldCheck::ok()
        }
        _ => FieldCheck::fail("Please enter coordinates as latitude, longitude"),
    }
}

// Keystroke filters

/// Drop digits and capitalize the first letter of every word
pub fn filter_city(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_word = false;
    for c in input.chars().filter(|c| !c.is_ascii_digit()) {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

/// Keep ASCII digits only, truncated to `max` characters
pub fn filter_digits(input: &str, max: usize) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).take(max).collect()
}

/// Keep digits and the first decimal point
pub fn filter_decimal(input: &str) -> String {
    let mut seen_point = false;
    input
        .chars()
        .filter(|&c| {
            if c == '.' {
                let keep = !seen_point;
                seen_point = true;
                keep
            } else {
                c.is_ascii_digit()
            }
        })
        .collect()
}

/// Upper-case and truncate to `max` characters
pub fn filter_upper(input: &str, max: usize) -> String {
    input
        .chars()
        .flat_map(char::to_uppercase)
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::RegionCatalog;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn regions() -> RegionData {
        RegionData::Loaded(
            RegionCatalog::from_json(r#"{"Punjab": ["Ludhiana", "Patiala"], "Haryana": ["Karnal"]}"#)
                .unwrap(),
        )
    }

    mod name {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_name() {
            assert_eq!(validate_name(""), FieldCheck::fail("Name is required"));
        }

        #[test]
        fn test_name_rules() {
            assert!(validate_name("Jo").valid);
            assert!(validate_name("Asha Devi").valid);
            assert!(!validate_name("J").valid);
            assert!(!validate_name("R2D2").valid);
            assert!(!validate_name(&"a".repeat(51)).valid);
            assert_eq!(
                validate_name("O'Neil").message,
                "Name should contain only letters and spaces (2-50 characters)"
            );
        }

        #[test]
        fn test_signup_name_is_length_only() {
            assert!(validate_signup_name("O'Neil").valid);
            assert_eq!(
                validate_signup_name("A").message,
                "Name must be at least 2 characters long"
            );
        }
    }

    mod dob {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_age_adjusts_for_unreached_birthday() {
            let today = date("2024-06-15");
            assert_eq!(age_on(date("2006-06-15"), today), 18);
            assert_eq!(age_on(date("2006-06-16"), today), 17);
            assert_eq!(age_on(date("2006-07-01"), today), 17);
        }

        #[test]
        fn test_dob_rules_in_order() {
            let today = date("2024-06-15");
            assert_eq!(validate_dob("", today).message, "Date of birth is required");
            assert_eq!(
                validate_dob("15/06/2000", today).message,
                "Please enter a valid date of birth"
            );
            assert_eq!(
                validate_dob("2010-01-01", today).message,
                "You must be at least 18 years old"
            );
            assert_eq!(
                validate_dob("1900-01-01", today).message,
                "Please enter a valid date of birth"
            );
            assert!(validate_dob("1990-03-20", today).valid);
            assert!(validate_dob("1924-06-15", today).valid);
        }
    }

    mod mobile_and_pincode {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_mobile_first_digit_and_length() {
            for first in '0'..='9' {
                let number = format!("{first}123456789");
                assert_eq!(validate_mobile(&number).valid, ('6'..='9').contains(&first));
            }
            assert!(!validate_mobile("912345678").valid);
            assert!(!validate_mobile("91234567890").valid);
            assert!(!validate_mobile("91234a6789").valid);
            assert_eq!(validate_mobile("").message, "Phone number is required");
        }

        #[test]
        fn test_mobile_rejects_non_ascii_digits() {
            // Devanagari digits
            assert!(!validate_mobile("९१२३४५६७८९").valid);
        }

        #[test]
        fn test_pincode() {
            assert!(validate_pincode("141001").valid);
            assert!(!validate_pincode("041001").valid);
            assert!(!validate_pincode("14100").valid);
            assert!(!validate_pincode("1410011").valid);
            assert_eq!(validate_pincode("").message, "Pincode is required");
            assert_eq!(
                validate_pincode("04100").message,
                "Please enter a valid 6-digit pincode"
            );
        }
    }

    mod regions_rules {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_district_must_belong_to_state() {
            let data = regions();
            let ctx = ValidationContext {
                regions: &data,
                state: "Punjab".to_string(),
                today: date("2024-01-01"),
            };
            assert!(validate_district("Ludhiana", &ctx).valid);
            assert_eq!(
                validate_district("Karnal", &ctx).message,
                "Please select a valid district for the selected state"
            );
            assert_eq!(validate_district("", &ctx).message, "Please select a district");
        }

        #[test]
        fn test_state_membership() {
            let data = regions();
            let ctx = ValidationContext {
                regions: &data,
                state: String::new(),
                today: date("2024-01-01"),
            };
            assert!(validate_state("Haryana", &ctx).valid);
            assert_eq!(validate_state("Goa", &ctx).message, "Please select a valid state");
            assert_eq!(validate_state("", &ctx).message, "Please select a state");
        }

        #[test]
        fn test_unavailable_data_only_requires_presence() {
            let data = RegionData::Unavailable("offline".to_string());
            let ctx = ValidationContext {
                regions: &data,
                state: "Anywhere".to_string(),
                today: date("2024-01-01"),
            };
            assert!(validate_state("Anywhere", &ctx).valid);
            assert!(validate_district("Somewhere", &ctx).valid);
            assert!(!validate_district("", &ctx).valid);
        }
    }

    mod location_text {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_village_trimmed_length() {
            assert!(validate_village("Ab").valid);
            assert!(!validate_village(" a ").valid);
        }

        #[test]
        fn test_city_rules() {
            assert!(validate_city("St. John's-Wood").valid);
            assert!(validate_city("  New   Delhi ").valid);
            assert_eq!(validate_city("   ").message, "Town/City name is required");
            assert_eq!(
                validate_city("A").message,
                "Town/City name must be at least 2 characters long"
            );
            assert_eq!(
                validate_city(&"a".repeat(51)).message,
                "Town/City name cannot exceed 50 characters"
            );
            assert_eq!(
                validate_city("Delhi#1").message,
                "Please enter a valid town/city name (letters, spaces, and basic punctuation only)"
            );
        }

        #[test]
        fn test_coordinates_optional_but_checked() {
            assert!(validate_coordinates("").valid);
            assert!(validate_coordinates("30.9, 75.85").valid);
            assert!(!validate_coordinates("91, 75").valid);
            assert!(!validate_coordinates("30.9").valid);
            assert!(!validate_coordinates("north, east").valid);
        }
    }

    mod credentials {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_email() {
            assert!(validate_email("a@b.co").valid);
            assert_eq!(validate_email("").message, "Email is required");
            assert_eq!(
                validate_email("a@b").message,
                "Please enter a valid email address"
            );
            assert!(!validate_email("a b@c.d").valid);
        }

        #[test]
        fn test_password_accumulates_every_missing_rule() {
            let check = validate_signup_password("abc");
            assert!(!check.valid);
            assert_eq!(
                check.message,
                "Missing: at least 8 characters, 1 uppercase letter, 1 number, 1 special character"
            );
        }

        #[test]
        fn test_password_partial_missing() {
            let check = validate_signup_password("abcdefgh1");
            assert_eq!(check.message, "Missing: 1 uppercase letter, 1 special character");
        }

        #[test]
        fn test_password_meets_requirements() {
            let check = validate_signup_password("Abcdef1!");
            assert!(check.valid);
            assert_eq!(check.message, "Password meets requirements");
        }

        #[test]
        fn test_login_password_only_non_empty() {
            assert!(validate_login_password("x").valid);
            assert_eq!(validate_login_password("").message, "Password is required");
        }

        #[test]
        fn test_confirm_password() {
            assert_eq!(
                validate_confirm_password("Abcdef1!", "Abcdef1?").message,
                "Passwords do not match"
            );
            assert_eq!(
                validate_confirm_password("", "").message,
                "Please confirm your password"
            );
            assert_eq!(
                validate_confirm_password("Abcdef1!", "Abcdef1!"),
                FieldCheck::ok_with("Passwords match")
            );
        }
    }

    mod business {
        use super::*;

        #[test]
        fn test_gst_optional() {
            assert!(validate_gst("").valid);
            assert!(validate_gst("22AAAAA0000A1Z5").valid);
            assert!(!validate_gst("22AAAAA0000A1Y5").valid);
            assert!(!validate_gst("22aaaaa0000a1z5").valid);
        }

        #[test]
        fn test_positive_numbers() {
            assert!(validate_positive_number("2", "bad").valid);
            assert!(validate_positive_number("0.5", "bad").valid);
            assert!(!validate_positive_number("0", "bad").valid);
            assert!(!validate_positive_number("-3", "bad").valid);
            assert!(!validate_positive_number("", "bad").valid);
            assert!(!validate_positive_number("abc", "bad").valid);
        }

        #[test]
        fn test_choice_and_selection() {
            assert!(validate_choice("Hindi", &["Hindi", "English"], "pick").valid);
            assert!(!validate_choice("Klingon", &["Hindi"], "pick").valid);
            assert!(!validate_choice("", &["Hindi"], "pick").valid);
            assert!(!validate_selection(&[], "pick").valid);
            assert!(validate_selection(&["Rice".to_string()], "pick").valid);
        }
    }

    mod filters {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_city_filter() {
            assert_eq!(filter_city("new delhi 110"), "New Delhi ");
            assert_eq!(filter_city("st. john's"), "St. John'S");
        }

        #[test]
        fn test_digit_filter() {
            assert_eq!(filter_digits("14a10-01999", 6), "141001");
        }

        #[test]
        fn test_decimal_filter() {
            assert_eq!(filter_decimal("12.5.3t"), "12.53");
        }

        #[test]
        fn test_upper_filter() {
            assert_eq!(filter_upper("22aaaaa0000a1z5xx", 15), "22AAAAA0000A1Z5");
        }
    }
}
