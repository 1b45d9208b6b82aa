//! Additional support options a visit can request.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The closed set of support options offered by the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportType {
    Wheelchair,
    InductionLoop,
    BslInterpreter,
    MaskExempt,
    Other,
}

pub const ALL_SUPPORT_TYPES: [SupportType; 5] = [
    SupportType::Wheelchair,
    SupportType::InductionLoop,
    SupportType::BslInterpreter,
    SupportType::MaskExempt,
    SupportType::Other,
];

impl SupportType {
    /// Parse a support code from form input.
    pub fn from_code(code: &str) -> Result<Self, CoreError> {
        match code {
            "WHEELCHAIR" => Ok(Self::Wheelchair),
            "INDUCTION_LOOP" => Ok(Self::InductionLoop),
            "BSL_INTERPRETER" => Ok(Self::BslInterpreter),
            "MASK_EXEMPT" => Ok(Self::MaskExempt),
            "OTHER" => Ok(Self::Other),
            _ => Err(CoreError::Validation(format!(
                "Invalid support type '{code}'"
            ))),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Wheelchair => "WHEELCHAIR",
            Self::InductionLoop => "INDUCTION_LOOP",
            Self::BslInterpreter => "BSL_INTERPRETER",
            Self::MaskExempt => "MASK_EXEMPT",
            Self::Other => "OTHER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wheelchair => "Wheelchair ramp",
            Self::InductionLoop => "Portable induction loop for people with hearing aids",
            Self::BslInterpreter => "British Sign Language (BSL) Interpreter",
            Self::MaskExempt => "Mask exemption",
            Self::Other => "Other",
        }
    }
}

/// One requested support item. `text` is only set for [`SupportType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorSupport {
    #[serde(rename = "type")]
    pub support_type: SupportType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for support_type in ALL_SUPPORT_TYPES {
            assert_eq!(SupportType::from_code(support_type.code()).unwrap(), support_type);
            assert!(!support_type.label().is_empty());
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(SupportType::from_code("JETPACK").is_err());
        assert!(SupportType::from_code("wheelchair").is_err());
    }

    #[test]
    fn serializes_with_type_key() {
        let support = VisitorSupport {
            support_type: SupportType::Other,
            text: Some("Needs a chair".into()),
        };
        let json = serde_json::to_value(&support).unwrap();
        assert_eq!(json["type"], "OTHER");
        assert_eq!(json["text"], "Needs a chair");
    }
}
