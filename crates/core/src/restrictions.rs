//! Visitor restrictions and ban-status evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Date;

// ---------------------------------------------------------------------------
// Restriction types
// ---------------------------------------------------------------------------

/// Restriction type code. Codes not listed here are passed through as
/// [`RestrictionType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RestrictionType {
    Ban,
    Closed,
    Restricted,
    NonContact,
    Other(String),
}

impl RestrictionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ban => "BAN",
            Self::Closed => "CLOSED",
            Self::Restricted => "RESTRICTED",
            Self::NonContact => "NONCON",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for RestrictionType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "BAN" => Self::Ban,
            "CLOSED" => Self::Closed,
            "RESTRICTED" => Self::Restricted,
            "NONCON" => Self::NonContact,
            _ => Self::Other(code),
        }
    }
}

impl From<RestrictionType> for String {
    fn from(value: RestrictionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RestrictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A restriction recorded against a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub restriction_type: RestrictionType,
    pub description: String,
    pub start_date: Date,
    /// `None` means the restriction never expires.
    pub expiry_date: Option<Date>,
    pub comment: Option<String>,
    pub global_restriction: bool,
}

// ---------------------------------------------------------------------------
// Ban status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanStatus {
    pub is_banned: bool,
    /// Days until the longest-running ban expires. Absent when there is no
    /// ban or when a ban is indefinite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_days: Option<i64>,
}

impl BanStatus {
    const NOT_BANNED: Self = Self {
        is_banned: false,
        num_days: None,
    };

    const INDEFINITE: Self = Self {
        is_banned: true,
        num_days: None,
    };
}

/// Decide whether a visitor's bans block a booking made today.
///
/// A visitor is blocked only if their longest ban runs beyond the furthest
/// date a visit can be booked (`today + booking_window_days`). A ban ending
/// exactly on that date does not block. Any ban without an expiry date
/// blocks unconditionally.
pub fn ban_status(restrictions: &[Restriction], booking_window_days: i64, today: Date) -> BanStatus {
    let bans: Vec<&Restriction> = restrictions
        .iter()
        .filter(|r| r.restriction_type == RestrictionType::Ban)
        .collect();

    if bans.is_empty() {
        return BanStatus::NOT_BANNED;
    }

    let mut longest: Option<i64> = None;
    for ban in bans {
        let Some(expiry) = ban.expiry_date else {
            return BanStatus::INDEFINITE;
        };
        let days = (expiry - today).num_days();
        longest = Some(longest.map_or(days, |current| current.max(days)));
    }

    match longest {
        Some(num_days) => BanStatus {
            is_banned: num_days > booking_window_days,
            num_days: Some(num_days),
        },
        None => BanStatus::NOT_BANNED,
    }
}
