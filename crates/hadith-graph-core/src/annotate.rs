//! Per-collection mention aggregation
//!
//! For one category and one collection, the annotator visits every
//! document, normalizes its text, applies the category's discovery method
//! and produces exactly one mention row per document, in corpus order.
//! Empty mention sets are kept as rows, never omitted, so all category
//! tables of a collection stay joinable by document number.

use crate::category::CategoryKind;
use crate::category::CategorySpec;
use crate::corpus::Corpus;
use crate::corpus::Document;
use crate::dictionary::Dictionary;
use crate::dictionary::Lexicon;
use crate::error::Error;
use crate::error::Result;
use crate::tags::resolve_spans;
use crate::tags::EntityTagger;
use crate::text::normalize;
use crate::text::Lang;
use crate::verses::VerseExtractor;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing::instrument;
use tracing::warn;

/// Separator for identifier lists inside one CSV cell.
///
/// Persisted tables hold one delimited identifier list per cell, decoded
/// by [`decode_id_list`] only. This replaces the source system's habit of
/// evaluating stringified collection literals when reading tables back.
pub const ID_LIST_SEPARATOR: char = ';';

/// Encode an identifier set for one CSV cell
pub fn encode_id_list(ids: &BTreeSet<String>) -> String {
    ids.iter().cloned().collect::<Vec<_>>().join(&ID_LIST_SEPARATOR.to_string())
}

/// Decode an identifier-list cell written by [`encode_id_list`]
pub fn decode_id_list(cell: &str) -> BTreeSet<String> {
    cell.split(ID_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// One document's mention set for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRow {
    /// Document number (raw, as in the corpus)
    pub number: String,
    /// Canonical identifiers mentioned; set semantics, no counts
    pub mentions: BTreeSet<String>,
}

/// Per-document mention sets for one category of one collection
#[derive(Debug, Clone)]
pub struct MentionTable {
    /// Category name
    pub category: String,
    /// Result-table column name
    pub column: String,
    rows: Vec<MentionRow>,
    index: HashMap<String, usize>,
}

impl MentionTable {
    /// Build a table, indexing rows by document number
    pub fn new(category: impl Into<String>, column: impl Into<String>, rows: Vec<MentionRow>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.number.clone(), i))
            .collect();
        Self {
            category: category.into(),
            column: column.into(),
            rows,
            index,
        }
    }

    /// Rows in corpus order
    pub fn rows(&self) -> &[MentionRow] {
        &self.rows
    }

    /// Number of rows (one per document)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mention set for a document number; keyed lookup, never positional
    pub fn get(&self, number: &str) -> Option<&BTreeSet<String>> {
        self.index.get(number).map(|&i| &self.rows[i].mentions)
    }

    /// Write the table as CSV: `hadith_number`, then the category column
    /// holding a delimited identifier list per row.
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([crate::corpus::COL_NUMBER, self.column.as_str()])?;
        for row in &self.rows {
            let cell = encode_id_list(&row.mentions);
            writer.write_record([row.number.as_str(), cell.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table written by [`MentionTable::to_csv`]
    pub fn from_csv(category: impl Into<String>, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing_resource(path));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let column = reader
            .headers()?
            .get(1)
            .ok_or_else(|| Error::validation(format!("{}: missing category column", path.display())))?
            .to_string();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let number = record
                .get(0)
                .ok_or_else(|| Error::validation(format!("{}: missing document number", path.display())))?
                .to_string();
            let mentions = decode_id_list(record.get(1).unwrap_or(""));
            rows.push(MentionRow { number, mentions });
        }
        Ok(Self::new(category, column, rows))
    }
}

/// Loaded, immutable resources for one category run
enum CategoryResources {
    Dictionaries {
        dictionaries: Vec<Dictionary>,
        excluded_ids: Vec<String>,
    },
    Tagger {
        label: String,
        lexicon: Option<Lexicon>,
        fixed_id: Option<String>,
    },
    Verses(VerseExtractor),
}

/// Runs one category over every document of a corpus.
///
/// Holds the tagging model behind its trait seam; reference tables are
/// loaded per category run and held read-only. No ambient global state.
pub struct Annotator {
    tagger: Arc<dyn EntityTagger>,
}

impl Annotator {
    /// Create an annotator around a tagging model
    pub fn new(tagger: Arc<dyn EntityTagger>) -> Self {
        Self { tagger }
    }

    /// Annotate every document for one category.
    ///
    /// Resource-load failures abort before any document is processed.
    /// Per-document failures are logged with the document number and
    /// yield an empty mention set; the batch continues.
    pub fn annotate(&self, corpus: &Corpus, spec: &CategorySpec) -> Result<MentionTable> {
        self.annotate_with_progress(corpus, spec, |_, _| {})
    }

    /// [`annotate`](Self::annotate) with a `(done, total)` progress callback
    #[instrument(skip_all, fields(collection = corpus.collection.short_name(), category = %spec.name))]
    pub fn annotate_with_progress(
        &self,
        corpus: &Corpus,
        spec: &CategorySpec,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<MentionTable> {
        let resources = self.load_resources(spec)?;
        let total = corpus.len();
        let mut rows = Vec::with_capacity(total);
        let mut failures = 0usize;

        for (done, doc) in corpus.documents().iter().enumerate() {
            let mentions = match self.annotate_document(doc, &resources) {
                Ok(mentions) => mentions,
                Err(err) => {
                    failures += 1;
                    warn!(number = %doc.number, %err, "document failed; keeping empty mention set");
                    BTreeSet::new()
                }
            };
            rows.push(MentionRow {
                number: doc.number.clone(),
                mentions,
            });
            progress(done + 1, total);
        }

        info!(
            documents = total,
            failures,
            mentioned = rows.iter().filter(|r| !r.mentions.is_empty()).count(),
            "category annotated"
        );
        Ok(MentionTable::new(spec.name.clone(), spec.column.clone(), rows))
    }

    fn load_resources(&self, spec: &CategorySpec) -> Result<CategoryResources> {
        match &spec.kind {
            CategoryKind::Dictionary {
                sources,
                policy,
                delimiter,
                excluded_ids,
            } => {
                let dictionaries = sources
                    .iter()
                    .map(|path| Dictionary::from_csv(path, *delimiter, *policy))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CategoryResources::Dictionaries {
                    dictionaries,
                    excluded_ids: excluded_ids.clone(),
                })
            }
            CategoryKind::Tagger {
                label,
                lexicon,
                lexicon_delimiter,
                fixed_id,
            } => {
                let lexicon = lexicon
                    .as_deref()
                    .map(|path| Lexicon::from_csv(path, *lexicon_delimiter))
                    .transpose()?;
                Ok(CategoryResources::Tagger {
                    label: label.clone(),
                    lexicon,
                    fixed_id: fixed_id.clone(),
                })
            }
            CategoryKind::Verses => Ok(CategoryResources::Verses(VerseExtractor::new())),
        }
    }

    fn annotate_document(
        &self,
        doc: &Document,
        resources: &CategoryResources,
    ) -> Result<BTreeSet<String>> {
        match resources {
            CategoryResources::Dictionaries {
                dictionaries,
                excluded_ids,
            } => {
                let ar = normalize(&doc.arabic, Lang::Arabic);
                let en = normalize(&doc.english, Lang::English);
                let mut ids = BTreeSet::new();
                for dict in dictionaries {
                    ids.extend(dict.matches(&ar, &en));
                }
                for excluded in excluded_ids {
                    ids.remove(excluded);
                }
                Ok(ids)
            }
            CategoryResources::Tagger {
                label,
                lexicon,
                fixed_id,
            } => {
                let ar = normalize(&doc.arabic, Lang::Arabic);
                let tokens = self.tagger.tag(&ar)?;
                let spans = resolve_spans(&tokens)?;
                let mut ids = BTreeSet::new();
                for span in spans.iter().filter(|s| s.label == *label) {
                    let id = match (fixed_id, lexicon) {
                        (Some(fixed), _) => Some(fixed.clone()),
                        // Lexicon misses are dropped, not errors.
                        (None, Some(lexicon)) => lexicon.resolve(&span.text).map(str::to_string),
                        (None, None) => Some(span.text.clone()),
                    };
                    if let Some(id) = id {
                        ids.insert(id);
                    }
                }
                Ok(ids)
            }
            CategoryResources::Verses(extractor) => Ok(extractor
                .extract(&doc.english)
                .into_iter()
                .map(|v| v.graph_id())
                .collect()),
        }
    }
}
