//! Display-name formatting for prisoners and contacts.
//!
//! Upstream record systems hold names in upper case (`SMITH`); the booking
//! flow shows them title-cased.

/// Title-case a name, keeping hyphenated and apostrophised parts capitalised
/// (`O'BRIEN-SMITH` -> `O'Brien-Smith`).
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut capitalise_next = true;
    for ch in word.chars() {
        if capitalise_next {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        capitalise_next = matches!(ch, '-' | '\'');
    }
    out
}

/// `"Last, First"` for prisoners.
pub fn prisoner_name(first_name: &str, last_name: &str) -> String {
    format!("{}, {}", title_case(last_name), title_case(first_name))
}

/// `"First Last"` for visitors; middle names are not shown.
pub fn contact_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", title_case(first_name), title_case(last_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_simple_names() {
        assert_eq!(title_case("JOHN"), "John");
        assert_eq!(title_case("mary ann"), "Mary Ann");
    }

    #[test]
    fn title_cases_hyphen_and_apostrophe() {
        assert_eq!(title_case("O'BRIEN-SMITH"), "O'Brien-Smith");
    }

    #[test]
    fn collapses_extra_whitespace() {
        assert_eq!(title_case("  JOHN   PAUL "), "John Paul");
    }

    #[test]
    fn prisoner_name_is_last_first() {
        assert_eq!(prisoner_name("JOHN", "SMITH"), "Smith, John");
    }

    #[test]
    fn contact_name_is_first_last() {
        assert_eq!(contact_name("JEANETTE", "SMITH"), "Jeanette Smith");
    }
}
