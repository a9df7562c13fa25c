//! Synchronous input filtering and validation shared by the form flows.
//!
//! Numeric fields are filtered on every edit, not on submit: the stored
//! value only ever contains digits and never exceeds its maximum length.

/// Phone numbers are exactly ten digits.
pub const PHONE_LEN: usize = 10;

/// One-time codes are six digits.
pub const OTP_LEN: usize = 6;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Strip non-digit characters and truncate to `max_len`.
///
/// Idempotent: filtering an already-filtered value is a no-op.
pub fn digits_only(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(max_len)
        .collect()
}

/// A usable email address: non-empty with a domain part.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// Sign-up password policy.
pub fn is_valid_signup_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// A complete ten-digit phone number.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_LEN && phone.chars().all(|c| c.is_ascii_digit())
}
