use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COUNTRY_CODE: &str = "971";
pub const CANONICAL_PHONE_LEN: usize = 12;

const ACCEPTED_PREFIXES: [&str; 5] = ["9710", "9715", "5", "05", COUNTRY_CODE];
const TRUNK_PREFIX: &str = "97105";
const COLLAPSED_TRUNK_PREFIX: &str = "9715";

/// A UAE mobile number in international form: twelve ASCII digits starting
/// with `971`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        normalize_phone(raw).ok_or_else(|| CoreError::InvalidPhone(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

pub fn normalize_phone(value: &str) -> Option<CanonicalPhone> {
    let digits = strip_non_digits(value);
    if digits.is_empty() {
        return None;
    }

    if !ACCEPTED_PREFIXES
        .iter()
        .any(|prefix| digits.starts_with(prefix))
    {
        return None;
    }

    let mut out = if digits.starts_with(COUNTRY_CODE) {
        digits
    } else {
        format!("{COUNTRY_CODE}{digits}")
    };

    // Only the leading trunk zero is collapsed.
    if let Some(rest) = out.strip_prefix(TRUNK_PREFIX) {
        out = format!("{COLLAPSED_TRUNK_PREFIX}{rest}");
    }

    if out.len() != CANONICAL_PHONE_LEN {
        return None;
    }

    Some(CanonicalPhone(out))
}
