//! Format checks for offender identifiers and contact phone numbers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One uppercase letter, four digits, two uppercase letters (`A1234BC`).
pub const OFFENDER_NO_PATTERN: &str = r"^[A-Z][0-9]{4}[A-Z]{2}$";

/// Optional `0` or `+44` prefix, then 9-10 digits with single spaces allowed
/// between digits.
pub const UK_PHONE_PATTERN: &str = r"^(?:0|\+44 ?)?[0-9](?: ?[0-9]){8,9}$";

static OFFENDER_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(OFFENDER_NO_PATTERN).expect("valid regex"));

static UK_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(UK_PHONE_PATTERN).expect("valid regex"));

/// A prisoner's offender identifier, guaranteed to be well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OffenderNo(String);

impl OffenderNo {
    /// Parse an offender identifier, rejecting anything not shaped like `A1234BC`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if is_valid_offender_no(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CoreError::BadRequest(format!(
                "Invalid offender identifier '{raw}'"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OffenderNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OffenderNo {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OffenderNo> for String {
    fn from(value: OffenderNo) -> Self {
        value.0
    }
}

pub fn is_valid_offender_no(raw: &str) -> bool {
    OFFENDER_NO_RE.is_match(raw)
}

pub fn is_valid_uk_phone_number(raw: &str) -> bool {
    UK_PHONE_RE.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn offender_no_accepts_expected_shape() {
        assert!(OffenderNo::parse("A1234BC").is_ok());
        assert!(OffenderNo::parse("Z0000ZZ").is_ok());
    }

    #[test]
    fn offender_no_rejects_other_shapes() {
        for raw in ["", "a1234bc", "A123BC", "A12345BC", "AB1234C", "A1234B", " A1234BC", "A1234BC "] {
            assert_matches!(OffenderNo::parse(raw), Err(CoreError::BadRequest(_)), "{raw}");
        }
    }

    #[test]
    fn offender_no_deserialize_validates() {
        let ok: Result<OffenderNo, _> = serde_json::from_str("\"A1234BC\"");
        assert!(ok.is_ok());
        let bad: Result<OffenderNo, _> = serde_json::from_str("\"<script>\"");
        assert!(bad.is_err());
    }

    #[test]
    fn phone_numbers_accepted() {
        for raw in [
            "01632 960 001",
            "07700 900 982",
            "+44 808 157 0192",
            "+448081570192",
            "07700900982",
            "0123456789",
            "123456789",
        ] {
            assert!(is_valid_uk_phone_number(raw), "{raw}");
        }
    }

    #[test]
    fn phone_numbers_rejected() {
        for raw in [
            "",
            "12345678",
            "0770090098212",
            "07700  900982",
            "07700-900-982",
            "+1 555 123 4567",
            " 07700900982",
            "07700900982 ",
            "phone",
        ] {
            assert!(!is_valid_uk_phone_number(raw), "{raw}");
        }
    }
}
