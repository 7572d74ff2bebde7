//! Eastern Arabic numeral conversion
//!
//! One collection writes its document numbers with Eastern Arabic digits,
//! wrapped in corpus delimiter characters, and uses marker letters instead
//! of a number for unnumbered documents. Conversion is lenient about
//! wrappers and strict about markers: a marker means "no number" and the
//! document is skipped by the emitter, never an error.

/// Letters that mark an unnumbered document
const NO_NUMBER_MARKERS: [char; 3] = ['م', 'b', 'm'];

fn digit_value(c: char) -> Option<u32> {
    match c {
        // Extended Arabic-Indic digits (Persian forms used by the corpus)
        '۰'..='۹' => Some(c as u32 - '۰' as u32),
        // Arabic-Indic digits
        '٠'..='٩' => Some(c as u32 - '٠' as u32),
        '0'..='9' => Some(c as u32 - '0' as u32),
        _ => None,
    }
}

/// Convert an Eastern Arabic numeral string to an integer.
///
/// Non-digit wrapper characters are ignored. Returns `None` when the
/// string carries a no-number marker or contains no digits at all.
pub fn eastern_to_int(raw: &str) -> Option<u32> {
    if raw.chars().any(|c| NO_NUMBER_MARKERS.contains(&c)) {
        return None;
    }
    let mut value: u32 = 0;
    let mut seen = false;
    for c in raw.chars() {
        if let Some(d) = digit_value(c) {
            value = value.checked_mul(10)?.checked_add(d)?;
            seen = true;
        }
    }
    seen.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_arabic_indic_digits() {
        assert_eq!(eastern_to_int("۱۲۳"), Some(123));
        assert_eq!(eastern_to_int("۰"), Some(0));
    }

    #[test]
    fn test_arabic_indic_and_ascii_digits() {
        assert_eq!(eastern_to_int("٤٥"), Some(45));
        assert_eq!(eastern_to_int("67"), Some(67));
    }

    #[test]
    fn test_wrappers_ignored() {
        assert_eq!(eastern_to_int("~۱۲~"), Some(12));
    }

    #[test]
    fn test_markers_mean_no_number() {
        assert_eq!(eastern_to_int("~م~"), None);
        assert_eq!(eastern_to_int("۱م۲"), None);
        assert_eq!(eastern_to_int("b"), None);
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(eastern_to_int(""), None);
        assert_eq!(eastern_to_int("~~"), None);
    }
}
