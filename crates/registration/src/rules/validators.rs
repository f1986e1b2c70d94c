//! Field validators. All pure, cheap enough to run on every keystroke.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("valid email regex")
});

static BR_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").expect("valid phone regex"));

pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";
pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_PHONE_DIGITS: usize = 11;

/// Empty input does not match; whether empty is acceptable is the gate's call.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Brazilian numbers must be masked as `(DD) DDDD-DDDD` or `(DD) DDDDD-DDDD`.
/// The field is optional, so empty always passes.
pub fn is_valid_phone(phone: &str, country: &str) -> bool {
    if phone.is_empty() {
        return true;
    }
    if country.eq_ignore_ascii_case("BR") {
        return BR_PHONE_RE.is_match(phone);
    }
    true
}

/// Re-mask raw keystrokes into `(DD) DDDD(D)-DDDD`, keeping at most 11 digits
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_PHONE_DIGITS)
        .collect();

    let len = digits.len();
    match len {
        0 => String::new(),
        1..=2 => format!("({}", digits),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 5] = [
        PasswordRule::MinLength,
        PasswordRule::Uppercase,
        PasswordRule::Lowercase,
        PasswordRule::Digit,
        PasswordRule::Symbol,
    ];

    pub fn is_met(&self, password: &str) -> bool {
        match self {
            PasswordRule::MinLength => password.chars().count() >= MIN_PASSWORD_LEN,
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRule::Symbol => password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "Password must be at least 8 characters long",
            PasswordRule::Uppercase => "Password must contain an uppercase letter",
            PasswordRule::Lowercase => "Password must contain a lowercase letter",
            PasswordRule::Digit => "Password must contain a number",
            PasswordRule::Symbol => "Password must contain a special character",
        }
    }
}

/// Every rule the password does not satisfy yet, in checklist order
pub fn password_requirements(password: &str) -> Vec<PasswordRule> {
    PasswordRule::ALL
        .iter()
        .copied()
        .filter(|rule| !rule.is_met(password))
        .collect()
}

pub fn is_password_valid(password: &str) -> bool {
    password_requirements(password).is_empty()
}

pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password.as_bytes() == confirmation.as_bytes()
}

/// `YYYY-MM-DD`, not in the future
pub fn is_valid_birth_date(value: &str) -> bool {
    match chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date <= chrono::Utc::now().date_naive(),
        Err(_) => false,
    }
}

/// Recovery codes are six digits
pub fn is_valid_recovery_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}
