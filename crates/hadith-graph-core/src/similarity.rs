//! Similarity tiering over precomputed score matrices
//!
//! Pairwise similarity scores are computed offline, one square matrix per
//! language per collection, indexed by document order. Tiering buckets a
//! document's partners by the Arabic score and keeps the English score
//! alongside for reporting. Two modes: tier only the declared duplicate
//! partners of each document, or tier every pair.

use crate::annotate::decode_id_list;
use crate::annotate::encode_id_list;
use crate::corpus::Corpus;
use crate::error::Error;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use tracing::warn;

/// Similarity-strength tier, classified by the Arabic score.
///
/// Boundaries are inclusive-lower: a score of exactly 0.9 is `Strong`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// `[0.9, ∞)`
    Strong,
    /// `[0.8, 0.9)`
    High,
    /// `[0.7, 0.8)`
    Moderate,
    /// `(-∞, 0.7)`
    Weak,
}

impl Tier {
    /// Classify a score into exactly one tier
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Tier::Strong
        } else if score >= 0.8 {
            Tier::High
        } else if score >= 0.7 {
            Tier::Moderate
        } else {
            Tier::Weak
        }
    }
}

/// A square score matrix indexed by document order
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Build a matrix from rows, rejecting non-square input
    pub fn new(scores: Vec<Vec<f64>>) -> Result<Self> {
        let dim = scores.len();
        for (i, row) in scores.iter().enumerate() {
            if row.len() != dim {
                return Err(Error::invalid_matrix(format!(
                    "row {i} has {} columns, expected {dim}",
                    row.len()
                )));
            }
        }
        Ok(Self { scores })
    }

    /// Load from a header-less delimited table. A missing file is fatal.
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing_resource(path));
        }
        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_path(path)?;
        let mut scores = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    cell.trim().parse::<f64>().map_err(|_| {
                        Error::invalid_matrix(format!(
                            "{}: non-numeric cell {cell:?}",
                            path.display()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            scores.push(row);
        }
        Self::new(scores)
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.scores.len()
    }

    /// Score for an index pair
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.scores.get(i)?.get(j).copied()
    }
}

/// One tiered partner with both language scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerScore {
    /// Partner document number
    pub number: String,
    /// Arabic-text similarity score
    pub arabic: f64,
    /// English-text similarity score
    pub english: f64,
}

/// One document's similarity relations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRow {
    /// Document number
    pub number: String,
    /// Partners scoring `[0.9, ∞)`
    pub strong: BTreeSet<String>,
    /// Partners scoring `[0.8, 0.9)`
    pub high: BTreeSet<String>,
    /// Partners scoring `[0.7, 0.8)`
    pub moderate: BTreeSet<String>,
    /// Partners scoring below 0.7, recorded only for declared duplicates
    pub weak: BTreeSet<String>,
    /// Scored partner triples, recorded for declared duplicates
    pub partners: Vec<PartnerScore>,
}

impl SimilarityRow {
    fn new(number: &str) -> Self {
        Self {
            number: number.to_string(),
            ..Default::default()
        }
    }

    fn tier_set(&mut self, tier: Tier) -> &mut BTreeSet<String> {
        match tier {
            Tier::Strong => &mut self.strong,
            Tier::High => &mut self.high,
            Tier::Moderate => &mut self.moderate,
            Tier::Weak => &mut self.weak,
        }
    }
}

/// Per-document similarity relations for one collection
#[derive(Debug, Clone)]
pub struct SimilarityTable {
    rows: Vec<SimilarityRow>,
    index: HashMap<String, usize>,
}

impl SimilarityTable {
    fn from_rows(rows: Vec<SimilarityRow>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.number.clone(), i))
            .collect();
        Self { rows, index }
    }

    /// Rows in corpus order
    pub fn rows(&self) -> &[SimilarityRow] {
        &self.rows
    }

    /// Row for a document number
    pub fn get(&self, number: &str) -> Option<&SimilarityRow> {
        self.index.get(number).map(|&i| &self.rows[i])
    }

    /// Write the table as CSV with delimited identifier lists per tier
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            crate::corpus::COL_NUMBER,
            "strong",
            "high",
            "moderate",
            "weak",
            "partners",
        ])?;
        for row in &self.rows {
            writer.write_record([
                row.number.clone(),
                encode_id_list(&row.strong),
                encode_id_list(&row.high),
                encode_id_list(&row.moderate),
                encode_id_list(&row.weak),
                encode_partners(&row.partners),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table written by [`SimilarityTable::to_csv`]
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing_resource(path));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |i: usize| record.get(i).unwrap_or("");
            rows.push(SimilarityRow {
                number: cell(0).to_string(),
                strong: decode_id_list(cell(1)),
                high: decode_id_list(cell(2)),
                moderate: decode_id_list(cell(3)),
                weak: decode_id_list(cell(4)),
                partners: decode_partners(cell(5))?,
            });
        }
        Ok(Self::from_rows(rows))
    }
}

fn encode_partners(partners: &[PartnerScore]) -> String {
    partners
        .iter()
        .map(|p| format!("{}:{}:{}", p.number, p.arabic, p.english))
        .collect::<Vec<_>>()
        .join(";")
}

fn decode_partners(cell: &str) -> Result<Vec<PartnerScore>> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let number = parts.next().unwrap_or("").to_string();
            let arabic = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::validation(format!("bad partner entry {entry:?}")))?;
            let english = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::validation(format!("bad partner entry {entry:?}")))?;
            Ok(PartnerScore {
                number,
                arabic,
                english,
            })
        })
        .collect()
}

/// Parse a declared-duplicates cell into partner numbers.
///
/// Entries are comma-delimited; stray corpus delimiter characters (`~`)
/// and whitespace around entries are dropped.
pub fn parse_duplicate_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_matches('~').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_dimensions(corpus: &Corpus, arabic: &SimilarityMatrix, english: &SimilarityMatrix) -> Result<()> {
    if arabic.dim() != corpus.len() || english.dim() != corpus.len() {
        return Err(Error::invalid_matrix(format!(
            "matrix dimensions {}x{} do not match corpus of {} documents",
            arabic.dim(),
            english.dim(),
            corpus.len()
        )));
    }
    Ok(())
}

/// Tier the declared duplicate partners of each document.
///
/// Partners are looked up by document number; a partner number absent from
/// the corpus is logged and skipped. Self-references are ignored. Every
/// tiered partner is also recorded as a scored triple.
pub fn tier_duplicates(
    corpus: &Corpus,
    arabic: &SimilarityMatrix,
    english: &SimilarityMatrix,
) -> Result<SimilarityTable> {
    check_dimensions(corpus, arabic, english)?;
    let positions: HashMap<&str, usize> = corpus
        .documents()
        .iter()
        .enumerate()
        .map(|(i, d)| (d.number.as_str(), i))
        .collect();

    let mut rows = Vec::with_capacity(corpus.len());
    for (i, doc) in corpus.documents().iter().enumerate() {
        let mut row = SimilarityRow::new(&doc.number);
        for partner in doc
            .mukarrat
            .as_deref()
            .map(parse_duplicate_list)
            .unwrap_or_default()
        {
            if partner == doc.number {
                continue;
            }
            let Some(&j) = positions.get(partner.as_str()) else {
                warn!(number = %doc.number, %partner, "declared duplicate not in corpus");
                continue;
            };
            let ar = arabic.get(i, j).unwrap_or(0.0);
            let en = english.get(i, j).unwrap_or(0.0);
            row.tier_set(Tier::from_score(ar)).insert(partner.clone());
            row.partners.push(PartnerScore {
                number: partner,
                arabic: ar,
                english: en,
            });
        }
        rows.push(row);
    }
    info!(
        collection = corpus.collection.short_name(),
        documents = rows.len(),
        "tiered declared duplicates"
    );
    Ok(SimilarityTable::from_rows(rows))
}

/// Tier every pair of documents.
///
/// Each unordered pair is classified once by the Arabic score and recorded
/// symmetrically in both documents' tier sets. Pairs scoring below every
/// boundary are dropped; the weak set is only ever populated for declared
/// duplicates, where curation outweighs the score. Scored triples are not
/// kept in this mode.
pub fn tier_all_pairs(
    corpus: &Corpus,
    arabic: &SimilarityMatrix,
    english: &SimilarityMatrix,
) -> Result<SimilarityTable> {
    check_dimensions(corpus, arabic, english)?;
    let mut rows: Vec<SimilarityRow> = corpus
        .documents()
        .iter()
        .map(|d| SimilarityRow::new(&d.number))
        .collect();

    for i in 0..corpus.len() {
        for j in (i + 1)..corpus.len() {
            let tier = Tier::from_score(arabic.get(i, j).unwrap_or(0.0));
            if tier == Tier::Weak {
                continue;
            }
            let (a, b) = (rows[i].number.clone(), rows[j].number.clone());
            rows[i].tier_set(tier).insert(b);
            rows[j].tier_set(tier).insert(a);
        }
    }
    info!(
        collection = corpus.collection.short_name(),
        documents = rows.len(),
        "tiered all pairs"
    );
    Ok(SimilarityTable::from_rows(rows))
}
