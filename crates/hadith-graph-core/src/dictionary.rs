//! Bilingual reference dictionaries and lexicon lookup
//!
//! A dictionary row carries a canonical identifier and delimited pattern
//! lists per language. One configurable matcher replaces the per-category
//! matching loops of the source system; the policy and cell delimiter are
//! chosen per category.

use crate::error::Error;
use crate::error::Result;
use crate::text::strip_tashkeel;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Sentinel cell value meaning "no pattern for this language"
pub const NO_PATTERN: &str = "-";

/// Matching policy applied per dictionary row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Both an Arabic and an English pattern must appear
    Conjunctive,
    /// Either language's pattern set suffices
    Disjunctive,
    /// Arabic patterns only; rows without Arabic patterns fall back to
    /// English-only matching
    ArabicOnly,
}

/// Raw CSV row shape: `ID`, `ar`, `en`
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    ar: String,
    #[serde(default)]
    en: String,
}

/// One dictionary row with parsed pattern lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryRow {
    /// Canonical identifier, unique within one dictionary
    pub id: String,
    /// Arabic patterns, tashkeel-stripped at load; empty = sentinel
    pub ar: Vec<String>,
    /// English patterns, lowercased at load; empty = sentinel
    pub en: Vec<String>,
}

/// A loaded reference dictionary with its matching policy
#[derive(Debug, Clone)]
pub struct Dictionary {
    rows: Vec<DictionaryRow>,
    policy: MatchPolicy,
}

fn split_patterns(cell: &str, delimiter: char) -> Vec<String> {
    if cell.trim().is_empty() || cell.trim() == NO_PATTERN {
        return Vec::new();
    }
    cell.split(delimiter)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl Dictionary {
    /// Build a dictionary from rows (used by tests and multi-source merges)
    pub fn new(rows: Vec<DictionaryRow>, policy: MatchPolicy) -> Self {
        Self { rows, policy }
    }

    /// Load a dictionary from a CSV file with columns `ID`, `ar`, `en`.
    ///
    /// Pattern cells are split on `delimiter`; Arabic patterns are
    /// tashkeel-stripped and English patterns lowercased so matching is
    /// diacritic- and case-insensitive. A missing file is fatal.
    pub fn from_csv(path: &Path, delimiter: char, policy: MatchPolicy) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing_resource(path));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let raw: RawRow = record?;
            rows.push(DictionaryRow {
                id: raw.id,
                ar: split_patterns(&strip_tashkeel(&raw.ar), delimiter),
                en: split_patterns(&raw.en, delimiter)
                    .into_iter()
                    .map(|p| p.to_lowercase())
                    .collect(),
            });
        }
        debug!(path = %path.display(), rows = rows.len(), "loaded dictionary");
        Ok(Self { rows, policy })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dictionary has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Match one normalized document against every row.
    ///
    /// `ar_text` must already be normalized (tashkeel-stripped); English
    /// matching is case-insensitive. Substring presence is existential, no
    /// span boundaries are computed. Returns the identifiers of all
    /// matching rows.
    pub fn matches(&self, ar_text: &str, en_text: &str) -> BTreeSet<String> {
        let en_lower = en_text.to_lowercase();
        let mut ids = BTreeSet::new();
        for row in &self.rows {
            let ar_hit = row.ar.iter().any(|p| ar_text.contains(p.as_str()));
            let en_hit = row.en.iter().any(|p| en_lower.contains(p.as_str()));
            let matched = if row.ar.is_empty() {
                // Sentinel row: only the English side can be checked.
                en_hit
            } else {
                match self.policy {
                    MatchPolicy::Conjunctive => ar_hit && en_hit,
                    MatchPolicy::Disjunctive => ar_hit || en_hit,
                    MatchPolicy::ArabicOnly => ar_hit,
                }
            };
            if matched {
                ids.insert(row.id.clone());
            }
        }
        ids
    }
}

/// One lexicon entry: canonical identifier plus alternative spellings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Canonical identifier
    pub id: String,
    /// Alternative surface forms
    pub alternatives: Vec<String>,
}

/// Alternative-spelling table mapping tagged entity text to identifiers.
///
/// Used for tagger-driven categories: the tagger finds the span, the
/// lexicon maps its surface text to a canonical identifier.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

/// Raw lexicon CSV row shape: `id`, `alternatives`
#[derive(Debug, Deserialize)]
struct RawLexiconRow {
    id: String,
    alternatives: String,
}

impl Lexicon {
    /// Build a lexicon from entries
    pub fn new(entries: Vec<LexiconEntry>) -> Self {
        Self { entries }
    }

    /// Load a lexicon from a CSV file with columns `id`, `alternatives`.
    ///
    /// The alternatives cell is split on `delimiter` and tashkeel-stripped.
    pub fn from_csv(path: &Path, delimiter: char) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing_resource(path));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut entries = Vec::new();
        for record in reader.deserialize() {
            let raw: RawLexiconRow = record?;
            entries.push(LexiconEntry {
                id: raw.id,
                alternatives: split_patterns(&strip_tashkeel(&raw.alternatives), delimiter),
            });
        }
        debug!(path = %path.display(), entries = entries.len(), "loaded lexicon");
        Ok(Self { entries })
    }

    /// Resolve entity text to a canonical identifier.
    ///
    /// Returns the first identifier whose alternative list contains a
    /// substring of `entity_text`. `None` is a lookup miss, not an error;
    /// callers drop unresolved spans before aggregation.
    pub fn resolve(&self, entity_text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.alternatives.iter().any(|alt| entity_text.contains(alt.as_str())))
            .map(|e| e.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, ar: &[&str], en: &[&str]) -> DictionaryRow {
        DictionaryRow {
            id: id.into(),
            ar: ar.iter().map(|s| s.to_string()).collect(),
            en: en.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    #[test]
    fn test_conjunctive_round_trip() {
        let dict = Dictionary::new(vec![row("X", &["ا", "ب"], &["a", "b"])], MatchPolicy::Conjunctive);
        // Both sides present: match.
        assert!(dict.matches("قال ب نعم", "he said a").contains("X"));
        // Removing either side loses the match.
        assert!(dict.matches("قال نعم", "he said a").is_empty());
        assert!(dict.matches("قال ب نعم", "he said c").is_empty());
    }

    #[test]
    fn test_disjunctive_either_side() {
        let dict = Dictionary::new(vec![row("X", &["ب"], &["alms"])], MatchPolicy::Disjunctive);
        assert!(dict.matches("ب", "nothing").contains("X"));
        assert!(dict.matches("nothing", "giving Alms today").contains("X"));
        assert!(dict.matches("nothing", "nothing").is_empty());
    }

    #[test]
    fn test_arabic_only_with_sentinel_fallback() {
        let dict = Dictionary::new(
            vec![row("AR", &["التوراة"], &["torah"]), row("EN", &[], &["gospel"])],
            MatchPolicy::ArabicOnly,
        );
        // Arabic row ignores the English side entirely.
        assert!(dict.matches("ذكر التوراة", "").contains("AR"));
        assert!(dict.matches("", "the torah").is_empty());
        // Sentinel row falls back to English-only.
        assert!(dict.matches("", "the Gospel of").contains("EN"));
    }

    #[test]
    fn test_case_insensitive_english() {
        let dict = Dictionary::new(vec![row("X", &[], &["mecca"])], MatchPolicy::Conjunctive);
        assert!(dict.matches("", "he reached MECCA at dawn").contains("X"));
    }

    #[test]
    fn test_split_patterns_sentinel_and_delimiters() {
        assert!(split_patterns("-", ',').is_empty());
        assert!(split_patterns("  ", ',').is_empty());
        assert_eq!(split_patterns("a,b , c", ','), vec!["a", "b", "c"]);
        assert_eq!(split_patterns("cow-ox", '-'), vec!["cow", "ox"]);
    }

    #[test]
    fn test_lexicon_resolve_first_match() {
        let lex = Lexicon::new(vec![
            LexiconEntry { id: "QURANLOC1".into(), alternatives: vec!["عرفة".into()] },
            LexiconEntry { id: "QURANLOC2".into(), alternatives: vec!["منى".into(), "عرفة".into()] },
        ]);
        assert_eq!(lex.resolve("جبل عرفة"), Some("QURANLOC1"));
        assert_eq!(lex.resolve("منى"), Some("QURANLOC2"));
        assert_eq!(lex.resolve("المدينة"), None);
    }

    #[test]
    fn test_dictionary_csv_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concepts.csv");
        std::fs::write(&path, "ID,ar,en\nZakat,زكاة,\"alms,charity\"\nFasting,-,fasting\n").unwrap();
        let dict = Dictionary::from_csv(&path, ',', MatchPolicy::Disjunctive).unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.matches("أدوا الزكاة", "").contains("Zakat"));
        assert!(dict.matches("", "about Fasting").contains("Fasting"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = Dictionary::from_csv(Path::new("no/such.csv"), ',', MatchPolicy::Disjunctive)
            .unwrap_err();
        assert!(matches!(err, Error::MissingResource { .. }));
        assert!(err.is_fatal());
    }
}
