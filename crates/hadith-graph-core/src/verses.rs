//! Scripture-coordinate extraction from English translations
//!
//! English translations reference Quranic verses as `chapter.verse`
//! coordinates, optionally with a verse range (`75.16-17`). Each
//! coordinate becomes a dedicated literal identifier in the graph.

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

/// A (chapter, verse) coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerseRef {
    /// Chapter (surah) number
    pub chapter: u32,
    /// Verse (ayah) number
    pub verse: u32,
}

impl VerseRef {
    /// Graph identifier for this coordinate, e.g. `CH002_V005`
    pub fn graph_id(&self) -> String {
        format!("CH{:03}_V{:03}", self.chapter, self.verse)
    }
}

/// Extractor for verse coordinates in English text
#[derive(Debug)]
pub struct VerseExtractor {
    re: Regex,
}

impl Default for VerseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseExtractor {
    /// Create an extractor
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"(\d+)\.(\d+)(?:-(\d+))?").unwrap(),
        }
    }

    /// Extract all verse coordinates, expanding ranges.
    ///
    /// `75.16-17` yields (75,16) and (75,17). A range whose end precedes
    /// its start yields nothing. Coordinates too large for `u32` are
    /// ignored.
    pub fn extract(&self, text: &str) -> Vec<VerseRef> {
        let mut refs = Vec::new();
        for caps in self.re.captures_iter(text) {
            let chapter: u32 = match caps[1].parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let start: u32 = match caps[2].parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let end: u32 = match caps.get(3) {
                Some(m) => match m.as_str().parse() {
                    Ok(v) => v,
                    Err(_) => continue,
                },
                None => start,
            };
            for verse in start..=end {
                refs.push(VerseRef { chapter, verse });
            }
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_coordinate() {
        let ex = VerseExtractor::new();
        assert_eq!(ex.extract("see 2.5 here"), vec![VerseRef { chapter: 2, verse: 5 }]);
    }

    #[test]
    fn test_range_expansion() {
        let ex = VerseExtractor::new();
        assert_eq!(
            ex.extract("as in 75.16-17"),
            vec![
                VerseRef { chapter: 75, verse: 16 },
                VerseRef { chapter: 75, verse: 17 },
            ]
        );
    }

    #[test]
    fn test_multiple_and_none() {
        let ex = VerseExtractor::new();
        assert_eq!(ex.extract("nothing here"), Vec::new());
        assert_eq!(ex.extract("2.5 and 3.1").len(), 2);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let ex = VerseExtractor::new();
        assert!(ex.extract("75.17-16").is_empty());
    }

    #[test]
    fn test_graph_id_zero_padding() {
        assert_eq!(VerseRef { chapter: 2, verse: 5 }.graph_id(), "CH002_V005");
        assert_eq!(VerseRef { chapter: 114, verse: 1 }.graph_id(), "CH114_V001");
    }
}
