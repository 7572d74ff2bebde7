//! BIO tag-span resolution and the tagger trait seam
//!
//! The statistical tagging model is an external collaborator: it takes
//! normalized text and returns token-level `(token, tag)` pairs where each
//! tag is `O`, `B-<LABEL>` or `I-<LABEL>`. This module merges those pairs
//! into entity spans.

use crate::error::Error;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;

/// One token with its BIO tag as produced by a tagging model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Token text
    pub text: String,
    /// BIO tag: `O`, `B-<LABEL>` or `I-<LABEL>`
    pub tag: String,
}

impl TaggedToken {
    /// Convenience constructor
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }
}

/// A resolved entity span: merged token text plus its category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Merged entity text (tokens joined with single spaces)
    pub text: String,
    /// Category label (the `<LABEL>` part of the BIO tag)
    pub label: String,
}

/// Trait for token-level tagging model implementations.
///
/// Implementations must be safe for concurrent calls or pooled per worker;
/// the pipeline holds them read-only after construction.
pub trait EntityTagger: Send + Sync {
    /// Tag normalized text, returning one `(token, tag)` pair per token
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>>;
}

/// Parsed view of a BIO tag string
enum BioTag<'a> {
    Outside,
    Begin(&'a str),
    Inside(&'a str),
}

impl<'a> BioTag<'a> {
    fn parse(tag: &'a str) -> Self {
        if let Some(label) = tag.strip_prefix("B-") {
            BioTag::Begin(label)
        } else if let Some(label) = tag.strip_prefix("I-") {
            BioTag::Inside(label)
        } else {
            // Anything that is not B-/I- (including `O`) closes the span.
            BioTag::Outside
        }
    }
}

/// Flush the accumulated span into `spans`.
///
/// When the accumulated label is empty the label of the most recently
/// flushed span is reused. This carry-over rule is inherited tagging-repair
/// behavior from the upstream annotation process, not a correctness
/// guarantee; with no prior span the sequence is malformed.
fn flush(spans: &mut Vec<EntitySpan>, text: &mut String, label: &mut String) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let resolved = if label.is_empty() {
        match spans.last() {
            Some(prev) => prev.label.clone(),
            None => {
                return Err(Error::tag_sequence(format!(
                    "span {text:?} has no category and no prior span to carry over from"
                )))
            }
        }
    } else {
        std::mem::take(label)
    };
    spans.push(EntitySpan {
        text: std::mem::take(text),
        label: resolved,
    });
    Ok(())
}

/// Merge a `(token, tag)` sequence into entity spans.
///
/// State machine over the token stream:
/// - `B-<C>` flushes any open span and starts a new one;
/// - `I-<C>` extends the open span when the label matches, otherwise
///   flushes and starts a new span;
/// - `O` flushes and resets;
/// - end of input flushes the remainder.
pub fn resolve_spans(tokens: &[TaggedToken]) -> Result<Vec<EntitySpan>> {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut label = String::new();

    for token in tokens {
        match BioTag::parse(&token.tag) {
            BioTag::Begin(l) => {
                flush(&mut spans, &mut text, &mut label)?;
                text = token.text.clone();
                label = l.to_string();
            }
            BioTag::Inside(l) => {
                if l == label && !text.is_empty() {
                    text.push(' ');
                    text.push_str(&token.text);
                } else {
                    flush(&mut spans, &mut text, &mut label)?;
                    text = token.text.clone();
                    label = l.to_string();
                }
            }
            BioTag::Outside => {
                flush(&mut spans, &mut text, &mut label)?;
            }
        }
    }
    flush(&mut spans, &mut text, &mut label)?;

    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs
            .iter()
            .map(|(text, tag)| TaggedToken::new(*text, *tag))
            .collect()
    }

    #[test]
    fn test_basic_merge() {
        let tokens = seq(&[
            ("قال", "O"),
            ("ابن", "B-PERS"),
            ("عباس", "I-PERS"),
            ("في", "O"),
            ("مكة", "B-LOC"),
        ]);
        let spans = resolve_spans(&tokens).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], EntitySpan { text: "ابن عباس".into(), label: "PERS".into() });
        assert_eq!(spans[1], EntitySpan { text: "مكة".into(), label: "LOC".into() });
    }

    #[test]
    fn test_span_count_equals_maximal_runs() {
        // Three maximal non-O runs sharing a label => three spans.
        let tokens = seq(&[
            ("a", "B-LOC"),
            ("b", "I-LOC"),
            ("x", "O"),
            ("c", "B-LOC"),
            ("d", "B-PERS"),
            ("e", "I-PERS"),
        ]);
        let spans = resolve_spans(&tokens).unwrap();
        assert_eq!(spans.len(), 3);
    }

    #[test]
    fn test_adjacent_begins_split() {
        let tokens = seq(&[("مكة", "B-LOC"), ("عرفة", "B-LOC")]);
        let spans = resolve_spans(&tokens).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "مكة");
        assert_eq!(spans[1].text, "عرفة");
    }

    #[test]
    fn test_inside_with_label_change_splits() {
        let tokens = seq(&[("ابن", "B-PERS"), ("مكة", "I-LOC")]);
        let spans = resolve_spans(&tokens).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, "PERS");
        assert_eq!(spans[1].label, "LOC");
    }

    #[test]
    fn test_orphan_inside_starts_span() {
        // I without a preceding B still opens a span with its own label.
        let tokens = seq(&[("x", "O"), ("عرفة", "I-LOC")]);
        let spans = resolve_spans(&tokens).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].label, "LOC");
    }

    #[test]
    fn test_carry_over_label() {
        // A bare `B-` tag leaves the label empty; the previous span's
        // label is reused. Inherited repair heuristic, kept as documented
        // behavior rather than a guaranteed property.
        let tokens = seq(&[("مكة", "B-LOC"), ("x", "O"), ("عرفة", "B-"), ("y", "O")]);
        let spans = resolve_spans(&tokens).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].label, "LOC");
    }

    #[test]
    fn test_no_carry_over_source_is_error() {
        let tokens = seq(&[("عرفة", "B-"), ("y", "O")]);
        let err = resolve_spans(&tokens).unwrap_err();
        assert!(matches!(err, Error::TagSequence(_)));
    }

    #[test]
    fn test_trailing_span_flushed() {
        let tokens = seq(&[("بني", "B-CLAN"), ("هاشم", "I-CLAN")]);
        let spans = resolve_spans(&tokens).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "بني هاشم");
    }

    #[test]
    fn test_empty_and_all_outside() {
        assert!(resolve_spans(&[]).unwrap().is_empty());
        let tokens = seq(&[("a", "O"), ("b", "O")]);
        assert!(resolve_spans(&tokens).unwrap().is_empty());
    }
}
