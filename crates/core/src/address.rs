//! Postal address formatting.

use serde::{Deserialize, Serialize};

/// Shown wherever a contact has no usable address.
pub const ADDRESS_NOT_ENTERED: &str = "Not entered";

/// Separator placed between address lines.
pub const ADDRESS_LINE_SEPARATOR: &str = ",\n";

/// A structured postal address in its canonical internal shape.
///
/// Upstream wire shapes are mapped into this type by the client adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub flat: Option<String>,
    pub premise: Option<String>,
    pub street: Option<String>,
    pub locality: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Join the present address fields into one display string.
///
/// Fields are emitted in the order premise, `Flat {flat}`, street, locality,
/// town, county, postal code, country. Blank fields are skipped. Returns
/// [`ADDRESS_NOT_ENTERED`] when nothing is left.
pub fn format_address(address: Option<&Address>) -> String {
    let Some(address) = address else {
        return ADDRESS_NOT_ENTERED.to_string();
    };

    let flat = present(&address.flat).map(|flat| format!("Flat {flat}"));

    let lines: Vec<String> = [
        present(&address.premise).map(str::to_string),
        flat,
        present(&address.street).map(str::to_string),
        present(&address.locality).map(str::to_string),
        present(&address.town).map(str::to_string),
        present(&address.county).map(str::to_string),
        present(&address.postal_code).map(str::to_string),
        present(&address.country).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();

    if lines.is_empty() {
        ADDRESS_NOT_ENTERED.to_string()
    } else {
        lines.join(ADDRESS_LINE_SEPARATOR)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_address() -> Address {
        Address {
            flat: Some("23B".into()),
            premise: Some("Premises".into()),
            street: Some("123 The Street".into()),
            locality: Some("Springfield".into()),
            town: Some("Coventry".into()),
            county: Some("West Midlands".into()),
            postal_code: Some("C1 2AB".into()),
            country: Some("England".into()),
        }
    }

    #[test]
    fn formats_all_fields_in_order() {
        assert_eq!(
            format_address(Some(&full_address())),
            "Premises,\nFlat 23B,\n123 The Street,\nSpringfield,\nCoventry,\nWest Midlands,\nC1 2AB,\nEngland"
        );
    }

    #[test]
    fn skips_missing_and_blank_fields() {
        let address = Address {
            street: Some("2nd".into()),
            town: Some("  ".into()),
            postal_code: Some("".into()),
            ..Default::default()
        };
        assert_eq!(format_address(Some(&address)), "2nd");
    }

    #[test]
    fn flat_only_gets_prefix() {
        let address = Address {
            flat: Some("4".into()),
            ..Default::default()
        };
        assert_eq!(format_address(Some(&address)), "Flat 4");
    }

    #[test]
    fn absent_address_is_not_entered() {
        assert_eq!(format_address(None), ADDRESS_NOT_ENTERED);
    }

    #[test]
    fn empty_address_is_not_entered() {
        assert_eq!(format_address(Some(&Address::default())), ADDRESS_NOT_ENTERED);
    }
}
