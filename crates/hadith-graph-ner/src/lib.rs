//! Gazetteer-based entity tagging
//!
//! The statistical tagging model is an external collaborator; this crate
//! provides the in-tree stand-in used for batch runs without a model
//! server: a gazetteer tagger that matches known surface phrases against
//! whitespace tokens and emits BIO tags over them. Longest phrase wins;
//! everything else is tagged `O`.

#![warn(missing_docs)]

use hadith_graph_core::error::Error;
use hadith_graph_core::error::Result;
use hadith_graph_core::tags::EntityTagger;
use hadith_graph_core::tags::TaggedToken;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use tracing::info;

/// One gazetteer phrase: pre-split tokens and the label they carry
#[derive(Debug, Clone)]
struct Phrase {
    tokens: Vec<String>,
    label: String,
}

/// Tagger matching known surface phrases against token windows.
///
/// Phrases are compared token-for-token after whitespace splitting, so
/// they must be given in the same normalized form the pipeline feeds the
/// tagger.
#[derive(Debug, Default)]
pub struct GazetteerTagger {
    /// Phrases grouped by first token, longest first
    phrases: HashMap<String, Vec<Phrase>>,
}

impl GazetteerTagger {
    /// Create an empty tagger; tags everything `O`
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one phrase under a BIO label (without the `B-`/`I-` prefix)
    pub fn add_phrase(&mut self, label: &str, phrase: &str) {
        let tokens: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return;
        }
        let bucket = self.phrases.entry(tokens[0].clone()).or_default();
        bucket.push(Phrase {
            tokens,
            label: label.to_string(),
        });
        bucket.sort_by_key(|p| std::cmp::Reverse(p.tokens.len()));
    }

    /// Load a tagger from a CSV gazetteer with columns `label`, `phrase`
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing_resource(path));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut tagger = Self::new();
        let mut entries = 0usize;
        for record in reader.records() {
            let record = record?;
            let label = record.get(0).unwrap_or("").trim();
            let phrase = record.get(1).unwrap_or("").trim();
            if label.is_empty() || phrase.is_empty() {
                continue;
            }
            tagger.add_phrase(label, phrase);
            entries += 1;
        }
        info!(path = %path.display(), entries, "loaded gazetteer");
        Ok(tagger)
    }

    /// Longest phrase starting at `tokens[at]`, if any
    fn match_at(&self, tokens: &[&str], at: usize) -> Option<&Phrase> {
        let rest = &tokens[at..];
        self.phrases.get(tokens[at])?.iter().find(|phrase| {
            rest.len() >= phrase.tokens.len()
                && phrase.tokens.iter().zip(rest).all(|(p, t)| p.as_str() == *t)
        })
    }
}

impl EntityTagger for GazetteerTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut tagged = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            match self.match_at(&tokens, i) {
                Some(phrase) => {
                    debug!(label = %phrase.label, len = phrase.tokens.len(), "phrase matched");
                    tagged.push(TaggedToken::new(tokens[i], format!("B-{}", phrase.label)));
                    for token in &tokens[i + 1..i + phrase.tokens.len()] {
                        tagged.push(TaggedToken::new(*token, format!("I-{}", phrase.label)));
                    }
                    i += phrase.tokens.len();
                }
                None => {
                    tagged.push(TaggedToken::new(tokens[i], "O"));
                    i += 1;
                }
            }
        }
        Ok(tagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hadith_graph_core::tags::resolve_spans;

    fn tagger() -> GazetteerTagger {
        let mut t = GazetteerTagger::new();
        t.add_phrase("LOC", "مكة");
        t.add_phrase("LOC", "بيت المقدس");
        t.add_phrase("PERS", "ابو هريرة");
        t
    }

    #[test]
    fn test_single_token_phrase() {
        let tags = tagger().tag("ذهب الى مكة").unwrap();
        let pairs: Vec<(&str, &str)> = tags.iter().map(|t| (t.text.as_str(), t.tag.as_str())).collect();
        assert_eq!(pairs, vec![("ذهب", "O"), ("الى", "O"), ("مكة", "B-LOC")]);
    }

    #[test]
    fn test_multi_token_phrase_gets_inside_tags() {
        let tags = tagger().tag("زار بيت المقدس").unwrap();
        assert_eq!(tags[1].tag, "B-LOC");
        assert_eq!(tags[2].tag, "I-LOC");
        let spans = resolve_spans(&tags).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "بيت المقدس");
        assert_eq!(spans[0].label, "LOC");
    }

    #[test]
    fn test_unknown_text_is_all_outside() {
        let tags = tagger().tag("كلام عادي").unwrap();
        assert!(tags.iter().all(|t| t.tag == "O"));
        assert!(resolve_spans(&tags).unwrap().is_empty());
    }

    #[test]
    fn test_two_labels_in_one_text() {
        let tags = tagger().tag("روى ابو هريرة عن مكة").unwrap();
        let spans = resolve_spans(&tags).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, "PERS");
        assert_eq!(spans[1].label, "LOC");
    }

    #[test]
    fn test_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gazetteer.csv");
        std::fs::write(&path, "label,phrase\nLOC,مكة\nPARA,الجنة\n").unwrap();
        let tagger = GazetteerTagger::from_csv(&path).unwrap();
        let tags = tagger.tag("ذكر الجنة").unwrap();
        assert_eq!(tags[1].tag, "B-PARA");
        assert!(GazetteerTagger::from_csv(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_empty_tagger_is_all_outside() {
        let tags = GazetteerTagger::new().tag("اي نص").unwrap();
        assert!(tags.iter().all(|t| t.tag == "O"));
    }
}
