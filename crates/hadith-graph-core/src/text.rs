//! Text normalization for Arabic and English hadith text
//!
//! All matching and tagging operates on normalized text: punctuation and
//! corpus delimiter characters removed, Arabic vowel diacritics (tashkeel)
//! stripped, stray Latin characters removed from Arabic, and whitespace
//! collapsed. Normalization is pure and idempotent.

use serde::Deserialize;
use serde::Serialize;

/// Language of a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lang {
    /// Arabic source text (diacritic-bearing)
    Arabic,
    /// English translation
    English,
}

/// Reserved delimiter characters used by the corpus tables.
///
/// `~` wraps field values in the source spreadsheets; `،` is the Arabic
/// comma used inside pattern cells.
const RESERVED: [char; 2] = ['~', '،'];

/// Tashkeel marks stripped from Arabic text: fathatan through sukun plus
/// the superscript alef.
fn is_tashkeel(c: char) -> bool {
    ('\u{064B}'..='\u{0652}').contains(&c) || c == '\u{0670}'
}

/// Remove ASCII punctuation plus the reserved corpus delimiters.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| !(c.is_ascii_punctuation() || RESERVED.contains(c)))
        .collect()
}

/// Remove Arabic vowel-diacritic marks.
pub fn strip_tashkeel(text: &str) -> String {
    text.chars().filter(|c| !is_tashkeel(*c)).collect()
}

/// Remove Latin letters embedded in Arabic text and collapse whitespace.
pub fn strip_foreign(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| !c.is_ascii_alphabetic()).collect();
    collapse_whitespace(&cleaned)
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a text field for matching and tagging.
///
/// English: punctuation removal and whitespace collapse. Arabic:
/// additionally strips tashkeel and embedded Latin letters.
pub fn normalize(text: &str, lang: Lang) -> String {
    let text = strip_punctuation(text);
    match lang {
        Lang::English => collapse_whitespace(&text),
        Lang::Arabic => strip_foreign(&strip_tashkeel(&text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_punctuation_ascii_and_reserved() {
        assert_eq!(strip_punctuation("a,b.c!"), "abc");
        assert_eq!(strip_punctuation("~123~"), "123");
        assert_eq!(strip_punctuation("قال، نعم"), "قال نعم");
    }

    #[test]
    fn test_strip_tashkeel() {
        // "muhammadun" with full vocalization reduces to bare letters
        assert_eq!(strip_tashkeel("مُحَمَّدٌ"), "محمد");
        assert_eq!(strip_tashkeel("صَلَّى اللَّهُ"), "صلى الله");
    }

    #[test]
    fn test_strip_foreign_removes_latin() {
        assert_eq!(strip_foreign("قال abc نعم"), "قال نعم");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a   b \t c  "), "a b c");
    }

    #[test]
    fn test_normalize_english() {
        assert_eq!(
            normalize("The Prophet (PBUH) said:  pray!", Lang::English),
            "The Prophet PBUH said pray"
        );
    }

    #[test]
    fn test_normalize_arabic() {
        let raw = "قَالَ رَسُولُ اللَّهِ، صَلَّى اللَّهُ عَلَيْهِ وَسَلَّمَ x";
        let n = normalize(raw, Lang::Arabic);
        assert_eq!(n, "قال رسول الله صلى الله عليه وسلم");
    }

    #[test]
    fn test_normalize_idempotent() {
        for (text, lang) in [
            ("قَالَ: نعم abc،  ", Lang::Arabic),
            ("  He said; \"yes\"!  ", Lang::English),
        ] {
            let once = normalize(text, lang);
            assert_eq!(normalize(&once, lang), once);
        }
    }
}
